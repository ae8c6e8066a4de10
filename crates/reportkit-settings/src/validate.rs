//! Settings validation.
//!
//! Runs on the extracted record, after template fields have been
//! sanitized, so a custom field whose content was stripped entirely is
//! reported as blank.

use serde::Serialize;
use thiserror::Error;

use crate::model::{DataSourceType, FieldState, ReportSetting, TemplateField};

/// A single reason a record was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
pub enum ValidationIssue {
    #[error("File name is required")]
    MissingFileName,

    #[error("Report title is required")]
    MissingReportTitle,

    #[error("Data source is required")]
    MissingDataSource,

    #[error("Data source type must be 'csv' or 'api'")]
    InvalidDataSourceType,

    #[error("API configuration is required when data source type is 'api'")]
    MissingApiConfig,

    #[error("API endpoint is required in API configuration")]
    MissingApiEndpoint,

    #[error("Stock count must be at least 1")]
    StockCountTooLow,

    #[error("{} is required when set to Custom", .0.label())]
    BlankCustomTemplate(#[serde(serialize_with = "serialize_field")] TemplateField),
}

fn serialize_field<S: serde::Serializer>(field: &TemplateField, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(field.key())
}

/// Check a record, returning every issue found (empty if valid).
pub fn validate(setting: &ReportSetting) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if setting.file_name.is_empty() {
        issues.push(ValidationIssue::MissingFileName);
    }
    if setting.report_title.is_empty() {
        issues.push(ValidationIssue::MissingReportTitle);
    }
    if setting.data_source.is_empty() {
        issues.push(ValidationIssue::MissingDataSource);
    }

    match setting.data_source_type {
        None => issues.push(ValidationIssue::InvalidDataSourceType),
        Some(DataSourceType::Api) => match &setting.api_config {
            None => issues.push(ValidationIssue::MissingApiConfig),
            Some(api) if api.endpoint.is_empty() => issues.push(ValidationIssue::MissingApiEndpoint),
            Some(_) => {}
        },
        Some(DataSourceType::Csv) => {}
    }

    if setting.stock_count < 1 {
        issues.push(ValidationIssue::StockCountTooLow);
    }

    for field in TemplateField::ALL {
        let state = setting.stored_state(field).unwrap_or_default();
        if state == FieldState::Custom && setting.template(field).trim().is_empty() {
            issues.push(ValidationIssue::BlankCustomTemplate(field));
        }
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ApiConfig;

    fn valid() -> ReportSetting {
        ReportSetting {
            file_name: "weekly".into(),
            report_title: "Weekly Movers".into(),
            stock_count: 6,
            data_source_type: Some(DataSourceType::Csv),
            data_source: "stocks.csv".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_record() {
        assert!(validate(&valid()).is_empty());
    }

    #[test]
    fn test_required_fields() {
        let setting = ReportSetting {
            stock_count: 0,
            data_source_type: Some(DataSourceType::Csv),
            ..Default::default()
        };
        assert_eq!(
            validate(&setting),
            vec![
                ValidationIssue::MissingFileName,
                ValidationIssue::MissingReportTitle,
                ValidationIssue::MissingDataSource,
                ValidationIssue::StockCountTooLow,
            ]
        );
    }

    #[test]
    fn test_unknown_source_type() {
        let setting = ReportSetting {
            data_source_type: None,
            ..valid()
        };
        assert_eq!(validate(&setting), vec![ValidationIssue::InvalidDataSourceType]);
    }

    #[test]
    fn test_api_requires_endpoint() {
        let mut setting = ReportSetting {
            data_source_type: Some(DataSourceType::Api),
            ..valid()
        };
        assert_eq!(validate(&setting), vec![ValidationIssue::MissingApiConfig]);

        setting.api_config = Some(ApiConfig::default());
        assert_eq!(validate(&setting), vec![ValidationIssue::MissingApiEndpoint]);

        setting.api_config = Some(ApiConfig {
            endpoint: "most-actives".into(),
            filters: None,
        });
        assert!(validate(&setting).is_empty());
    }

    #[test]
    fn test_blank_custom_template() {
        let mut setting = valid();
        setting.set_template(TemplateField::Disclaimer, "  \n ".into(), FieldState::Custom);
        setting.set_template(TemplateField::StockBlock, String::new(), FieldState::Empty);

        let issues = validate(&setting);
        assert_eq!(issues, vec![ValidationIssue::BlankCustomTemplate(TemplateField::Disclaimer)]);
        assert_eq!(issues[0].to_string(), "Disclaimer HTML is required when set to Custom");
    }

    #[test]
    fn test_issue_serializes() {
        let json = serde_json::to_string(&ValidationIssue::BlankCustomTemplate(TemplateField::ReportIntro)).unwrap();
        assert_eq!(json, r#"{"BlankCustomTemplate":"report_intro_html"}"#);
    }
}
