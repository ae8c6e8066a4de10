//! Report settings records.
//!
//! A [`ReportSetting`] is one saved report configuration, keyed by
//! `file_name`. Its serialized form is the settings file format: field names
//! match the submitted form keys, and records written before the
//! `data_source` rename still load (`api_placeholder` is read as
//! `data_source`, and a missing `data_source_type` means CSV).

use std::fmt;

use serde::{Deserialize, Serialize};

/// Rich-text template fields of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateField {
    ReportIntro,
    StockBlock,
    Disclaimer,
}

impl TemplateField {
    pub const ALL: [TemplateField; 3] = [Self::ReportIntro, Self::StockBlock, Self::Disclaimer];

    /// Storage and form key of the field's HTML.
    pub const fn key(self) -> &'static str {
        match self {
            Self::ReportIntro => "report_intro_html",
            Self::StockBlock => "stock_block_html",
            Self::Disclaimer => "disclaimer_html",
        }
    }

    /// Storage and form key of the field's state.
    pub const fn state_key(self) -> &'static str {
        match self {
            Self::ReportIntro => "report_intro_html_state",
            Self::StockBlock => "stock_block_html_state",
            Self::Disclaimer => "disclaimer_html_state",
        }
    }

    /// Human-readable label used in validation messages.
    pub const fn label(self) -> &'static str {
        match self {
            Self::ReportIntro => "Report Intro HTML",
            Self::StockBlock => "Stock Block HTML",
            Self::Disclaimer => "Disclaimer HTML",
        }
    }
}

impl fmt::Display for TemplateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How a template field is rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldState {
    /// Use the built-in template.
    #[default]
    Default,
    /// Use the stored HTML.
    Custom,
    /// Render nothing.
    Empty,
}

impl FieldState {
    /// Parse a submitted state. Unknown values fall back to `Default`.
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "custom" => Self::Custom,
            "empty" => Self::Empty,
            _ => Self::Default,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Custom => "custom",
            Self::Empty => "empty",
        }
    }
}

/// Where stock rows come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSourceType {
    #[default]
    Csv,
    Api,
}

impl DataSourceType {
    /// Parse a submitted source type. Returns `None` for anything else.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "csv" => Some(Self::Csv),
            "api" => Some(Self::Api),
            _ => None,
        }
    }
}

/// Data source name for the "most actives" API endpoint.
pub const MOST_ACTIVES_SOURCE: &str = "fmp-most-actives";

/// Submitted endpoint names and the data sources they select.
const ENDPOINT_SOURCES: &[(&str, &str)] = &[("most-actives", MOST_ACTIVES_SOURCE)];

/// Map a submitted API endpoint to its data source name.
///
/// Unknown endpoints fall back to the most-actives source.
pub fn data_source_for_endpoint(endpoint: &str) -> &'static str {
    ENDPOINT_SOURCES
        .iter()
        .find(|(name, _)| *name == endpoint)
        .map_or(MOST_ACTIVES_SOURCE, |&(_, source)| source)
}

/// Client-side filters applied to API rows. All optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marketcap_min: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marketcap_max: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exchange: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl ApiFilters {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// API source configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Endpoint name as submitted (e.g. `most-actives`).
    pub endpoint: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<ApiFilters>,
}

fn csv_source_type() -> Option<DataSourceType> {
    Some(DataSourceType::Csv)
}

/// One saved report configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportSetting {
    pub file_name: String,
    #[serde(default)]
    pub report_title: String,
    #[serde(default)]
    pub author_name: String,
    #[serde(default)]
    pub stock_count: i64,
    #[serde(default)]
    pub article_image: String,
    #[serde(default)]
    pub pdf_cover_image: String,
    #[serde(default)]
    pub manual_pdf_path: String,

    /// Sanitized HTML; only [`SettingsForm::extract`](crate::SettingsForm::extract)
    /// fills these from user input.
    #[serde(default)]
    pub report_intro_html: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_intro_html_state: Option<FieldState>,
    #[serde(default)]
    pub stock_block_html: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock_block_html_state: Option<FieldState>,
    #[serde(default)]
    pub disclaimer_html: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disclaimer_html_state: Option<FieldState>,

    /// `None` when the submitted type was not recognized.
    #[serde(default = "csv_source_type")]
    pub data_source_type: Option<DataSourceType>,
    #[serde(default, alias = "api_placeholder")]
    pub data_source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_config: Option<ApiConfig>,
}

impl ReportSetting {
    /// Stored HTML of a template field.
    pub fn template(&self, field: TemplateField) -> &str {
        match field {
            TemplateField::ReportIntro => &self.report_intro_html,
            TemplateField::StockBlock => &self.stock_block_html,
            TemplateField::Disclaimer => &self.disclaimer_html,
        }
    }

    /// Stored state of a template field, if any.
    pub fn stored_state(&self, field: TemplateField) -> Option<FieldState> {
        match field {
            TemplateField::ReportIntro => self.report_intro_html_state,
            TemplateField::StockBlock => self.stock_block_html_state,
            TemplateField::Disclaimer => self.disclaimer_html_state,
        }
    }

    /// Effective state of a template field for display.
    ///
    /// Records saved before states existed have none; for those, non-empty
    /// HTML counts as custom.
    pub fn field_state(&self, field: TemplateField) -> FieldState {
        match self.stored_state(field) {
            Some(state) => state,
            None if !self.template(field).is_empty() => FieldState::Custom,
            None => FieldState::Default,
        }
    }

    pub(crate) fn set_template(&mut self, field: TemplateField, html: String, state: FieldState) {
        let (slot, state_slot) = match field {
            TemplateField::ReportIntro => {
                (&mut self.report_intro_html, &mut self.report_intro_html_state)
            }
            TemplateField::StockBlock => {
                (&mut self.stock_block_html, &mut self.stock_block_html_state)
            }
            TemplateField::Disclaimer => (&mut self.disclaimer_html, &mut self.disclaimer_html_state),
        };
        *slot = html;
        *state_slot = Some(state);
    }
}

/// Field states for a form: all `Default` when creating a new record.
pub fn resolve_field_states(editing: Option<&ReportSetting>) -> [(TemplateField, FieldState); 3] {
    TemplateField::ALL.map(|field| {
        let state = editing.map_or(FieldState::Default, |setting| setting.field_state(field));
        (field, state)
    })
}
