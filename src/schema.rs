use crate::error::{AnalysisError, Result};
use crate::fields::Field;
use crate::labels::Language;
use log::debug;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum StatementKind {
    #[schemars(
        description = "Balance sheet: point-in-time balances of assets, liabilities and equity"
    )]
    Balance,

    #[schemars(
        description = "Income statement: revenue, costs, expenses and profit for the period"
    )]
    Income,

    #[schemars(
        description = "Cash-flow statement: net cash generated by operating, investing and financing activities"
    )]
    CashFlow,
}

/// One source row: a period identifier plus raw cell text keyed by canonical field.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct RawStatementRow {
    #[schemars(
        description = "Period end identifier as delivered by the source, e.g. '20231231', '2023-12-31', '2023-12' or '2023'"
    )]
    pub period: String,

    #[schemars(
        description = "Raw cell text per canonical field. Blank, '--' and non-numeric text are treated as absent; '1,234.5' and '(1,234)' are accepted."
    )]
    #[serde(default)]
    pub values: BTreeMap<Field, String>,
}

impl RawStatementRow {
    pub fn new(period: impl Into<String>) -> Self {
        Self {
            period: period.into(),
            values: BTreeMap::new(),
        }
    }

    pub fn with(mut self, field: Field, raw: impl Into<String>) -> Self {
        self.values.insert(field, raw.into());
        self
    }

    /// Builds a row from source-native labels (English or Chinese), resolving
    /// each label onto the canonical vocabulary. Unknown labels are skipped.
    pub fn from_labeled<I, L, V>(period: impl Into<String>, cells: I) -> Self
    where
        I: IntoIterator<Item = (L, V)>,
        L: AsRef<str>,
        V: Into<String>,
    {
        let mut row = Self::new(period);
        for (label, raw) in cells {
            match Field::from_label(label.as_ref()) {
                Some(field) => {
                    row.values.insert(field, raw.into());
                }
                None => debug!("Skipping unmapped source label '{}'", label.as_ref()),
            }
        }
        row
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AnalysisConfig {
    #[schemars(description = "Exchange code of the company being analyzed, e.g. '600519'")]
    pub company_code: String,

    #[serde(default)]
    #[schemars(description = "Language used for every label in the assembled payload")]
    pub language: Language,

    #[serde(default)]
    #[schemars(
        description = "Keep only the latest N periods of each statement. Omit to analyze every period."
    )]
    pub max_periods: Option<usize>,

    #[serde(default = "default_anomaly_window")]
    #[schemars(
        description = "Number of recent periods the anomaly rules compare against (minimum 2)"
    )]
    pub anomaly_window: usize,

    #[serde(default = "default_chart_extension")]
    #[schemars(description = "File extension used in the chart artifact manifest")]
    pub chart_extension: String,
}

fn default_anomaly_window() -> usize {
    4
}

fn default_chart_extension() -> String {
    "png".to_string()
}

impl AnalysisConfig {
    pub fn new(company_code: impl Into<String>, language: Language) -> Self {
        Self {
            company_code: company_code.into(),
            language,
            max_periods: None,
            anomaly_window: default_anomaly_window(),
            chart_extension: default_chart_extension(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.company_code.trim().is_empty() {
            return Err(AnalysisError::InvalidConfig(
                "company_code must not be empty".to_string(),
            ));
        }

        if self.max_periods == Some(0) {
            return Err(AnalysisError::InvalidConfig(
                "max_periods must be at least 1 when set".to_string(),
            ));
        }

        if self.anomaly_window < 2 {
            return Err(AnalysisError::InvalidConfig(format!(
                "anomaly_window must be at least 2, got {}",
                self.anomaly_window
            )));
        }

        let extension = self.chart_extension.trim();
        if extension.is_empty() || extension.contains(|c: char| matches!(c, '.' | '/' | '\\')) {
            return Err(AnalysisError::InvalidConfig(format!(
                "chart_extension '{}' must be a bare extension such as 'png'",
                self.chart_extension
            )));
        }

        Ok(())
    }

    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(AnalysisConfig)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults_from_json() {
        let config = AnalysisConfig::from_json(r#"{ "company_code": "600519" }"#).unwrap();
        assert_eq!(config.company_code, "600519");
        assert_eq!(config.language, Language::Zh);
        assert_eq!(config.anomaly_window, 4);
        assert_eq!(config.chart_extension, "png");
        assert!(config.max_periods.is_none());
    }

    #[test]
    fn test_config_validation() {
        let mut config = AnalysisConfig::new("600519", Language::En);
        assert!(config.validate().is_ok());

        config.max_periods = Some(0);
        assert!(matches!(
            config.validate(),
            Err(AnalysisError::InvalidConfig(_))
        ));

        config.max_periods = Some(3);
        config.anomaly_window = 1;
        assert!(config.validate().is_err());

        config.anomaly_window = 4;
        config.chart_extension = ".png".to_string();
        assert!(config.validate().is_err());

        let blank = AnalysisConfig::new("  ", Language::Zh);
        assert!(blank.validate().is_err());
    }

    #[test]
    fn test_row_from_bilingual_labels() {
        let row = RawStatementRow::from_labeled(
            "20231231",
            vec![
                ("资产总计", "1,000"),
                ("Total Liabilities", "400"),
                ("Not A Field", "1"),
            ],
        );
        assert_eq!(row.values.len(), 2);
        assert_eq!(row.values.get(&Field::TotalAssets).unwrap(), "1,000");
        assert_eq!(row.values.get(&Field::TotalLiabilities).unwrap(), "400");
    }

    #[test]
    fn test_config_schema_generation() {
        let schema = serde_json::to_string_pretty(&AnalysisConfig::generate_json_schema()).unwrap();
        assert!(schema.contains("company_code"));
        assert!(schema.contains("anomaly_window"));
    }
}
