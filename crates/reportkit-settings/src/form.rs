//! Submitted settings form.
//!
//! [`SettingsForm`] holds the raw strings of one add/update submission.
//! [`SettingsForm::extract`] is the only way to turn user input into a
//! [`ReportSetting`], and it runs every template field through the HTML
//! sanitizer on the way, so unsanitized template HTML never reaches a
//! [`SettingsStore`](crate::SettingsStore). A template the sanitizer refuses
//! (too large) fails the whole extraction.

use reportkit_sanitizer::HtmlSanitizer;
use serde::{Deserialize, Serialize};

use crate::config::SettingsConfig;
use crate::error::Result;
use crate::model::{
    data_source_for_endpoint, ApiConfig, ApiFilters, DataSourceType, FieldState, ReportSetting,
    TemplateField,
};

/// Raw form submission. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsForm {
    pub file_name: Option<String>,
    /// Record being edited, for updates that rename it.
    pub original_file_name: Option<String>,
    pub report_title: Option<String>,
    pub author_name: Option<String>,
    pub stock_count: Option<String>,

    pub existing_article_image: Option<String>,
    pub existing_pdf_cover: Option<String>,
    pub existing_manual_pdf: Option<String>,

    pub report_intro_html: Option<String>,
    pub report_intro_html_state: Option<String>,
    pub stock_block_html: Option<String>,
    pub stock_block_html_state: Option<String>,
    pub disclaimer_html: Option<String>,
    pub disclaimer_html_state: Option<String>,

    pub source_type: Option<String>,
    /// CSV file name when the source type is `csv`.
    pub api_placeholder: Option<String>,
    pub api_endpoint: Option<String>,
    pub api_filter_marketcap_min: Option<String>,
    pub api_filter_marketcap_max: Option<String>,
    pub api_filter_price_min: Option<String>,
    pub api_filter_price_max: Option<String>,
    pub api_filter_exchange: Option<String>,
    pub api_filter_country: Option<String>,
}

fn trimmed(value: &Option<String>) -> String {
    value.as_deref().map(str::trim).unwrap_or_default().to_string()
}

/// Present and not the empty string.
fn submitted(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Leading integer of `value`, ignoring leading whitespace; 0 if none.
fn leading_int(value: &str) -> i64 {
    let value = value.trim_start();
    let (sign, digits) = match value.as_bytes().first() {
        Some(b'-') => (-1, &value[1..]),
        Some(b'+') => (1, &value[1..]),
        _ => (1, value),
    };
    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end]
        .parse::<i64>()
        .map(|n| sign * n)
        .unwrap_or(0)
}

/// Leading decimal number of `value`; 0.0 if none.
fn leading_float(value: &str) -> f64 {
    let value = value.trim_start();
    let bytes = value.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'-' | b'+')) {
        end = 1;
    }
    let mut seen_dot = false;
    while let Some(&b) = bytes.get(end) {
        match b {
            b'0'..=b'9' => end += 1,
            b'.' if !seen_dot => {
                seen_dot = true;
                end += 1;
            }
            _ => break,
        }
    }
    value[..end].parse().unwrap_or(0.0)
}

impl SettingsForm {
    fn template(&self, field: TemplateField) -> (&Option<String>, &Option<String>) {
        match field {
            TemplateField::ReportIntro => (&self.report_intro_html, &self.report_intro_html_state),
            TemplateField::StockBlock => (&self.stock_block_html, &self.stock_block_html_state),
            TemplateField::Disclaimer => (&self.disclaimer_html, &self.disclaimer_html_state),
        }
    }

    /// Build a record from the submission.
    ///
    /// Text fields are trimmed, template HTML is sanitized and states are
    /// parsed. The result still has to pass [`validate`](crate::validate).
    ///
    /// Fails with [`SettingsError::Sanitizer`](crate::SettingsError::Sanitizer)
    /// when a template exceeds the sanitizer's input limit.
    pub fn extract(
        &self,
        sanitizer: &HtmlSanitizer,
        config: &SettingsConfig,
    ) -> Result<ReportSetting> {
        let source_type = self
            .source_type
            .as_deref()
            .map(str::trim)
            .unwrap_or("csv");

        let mut setting = ReportSetting {
            file_name: trimmed(&self.file_name),
            report_title: trimmed(&self.report_title),
            author_name: trimmed(&self.author_name),
            stock_count: self
                .stock_count
                .as_deref()
                .map_or(i64::from(config.default_stock_count), leading_int),
            article_image: self.existing_article_image.clone().unwrap_or_default(),
            pdf_cover_image: self.existing_pdf_cover.clone().unwrap_or_default(),
            manual_pdf_path: self.existing_manual_pdf.clone().unwrap_or_default(),
            data_source_type: DataSourceType::parse(source_type),
            ..Default::default()
        };

        for field in TemplateField::ALL {
            let (html, state) = self.template(field);
            let state = state.as_deref().map_or(FieldState::Default, FieldState::parse);
            let html = sanitizer.try_sanitize(html.as_deref().unwrap_or_default())?;
            setting.set_template(field, html, state);
        }

        match setting.data_source_type {
            Some(DataSourceType::Csv) => {
                setting.data_source = trimmed(&self.api_placeholder);
            }
            Some(DataSourceType::Api) => {
                let endpoint = trimmed(&self.api_endpoint);
                setting.data_source = data_source_for_endpoint(&endpoint).to_string();
                let filters = self.api_filters();
                setting.api_config = Some(ApiConfig {
                    endpoint,
                    filters: (!filters.is_empty()).then_some(filters),
                });
            }
            None => {}
        }

        Ok(setting)
    }

    fn api_filters(&self) -> ApiFilters {
        let text = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };
        ApiFilters {
            marketcap_min: submitted(&self.api_filter_marketcap_min).map(leading_int),
            marketcap_max: submitted(&self.api_filter_marketcap_max).map(leading_int),
            price_min: submitted(&self.api_filter_price_min).map(leading_float),
            price_max: submitted(&self.api_filter_price_max).map(leading_float),
            exchange: text(&self.api_filter_exchange),
            country: text(&self.api_filter_country),
        }
    }
}
