use crate::anomaly::Anomaly;
use crate::error::Result;
use crate::formula::{MetricValue, Unit};
use crate::labels::{Language, Localized};
use crate::metric::{Category, ChartId, MetricId};
use crate::period::Period;
use crate::schema::StatementKind;
use crate::trend::SeriesSummary;
use schemars::JsonSchema;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, PartialOrd, Ord, Hash, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Balance,
    Income,
    CashFlow,
    CrossStatement,
}

impl From<StatementKind> for Section {
    fn from(kind: StatementKind) -> Self {
        match kind {
            StatementKind::Balance => Self::Balance,
            StatementKind::Income => Self::Income,
            StatementKind::CashFlow => Self::CashFlow,
        }
    }
}

impl Localized for Section {
    fn labels(&self) -> (&'static str, &'static str) {
        match self {
            Self::Balance => StatementKind::Balance.labels(),
            Self::Income => StatementKind::Income.labels(),
            Self::CashFlow => StatementKind::CashFlow.labels(),
            Self::CrossStatement => ("跨报表分析", "Cross-Statement Analysis"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct PayloadMetric {
    pub label: String,
    pub unit: Unit,
    pub approximation: bool,
    pub values: BTreeMap<Period, MetricValue>,
    /// Presentation text per period, rounded to two decimals.
    pub display: BTreeMap<Period, String>,
    pub summary: SeriesSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct PayloadCategory {
    pub label: String,
    pub metrics: BTreeMap<MetricId, PayloadMetric>,
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct PayloadSection {
    pub title: String,
    pub categories: BTreeMap<Category, PayloadCategory>,
}

/// Where a chart will be written, so consumers never scan the file system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct ChartArtifact {
    pub chart: ChartId,
    pub section: Section,
    pub title: String,
    pub file_name: String,
}

impl ChartArtifact {
    pub fn file_name(company_code: &str, chart: ChartId, extension: &str) -> String {
        format!("{}_{}.{}", company_code, chart.slug(), extension)
    }
}

/// The assembled, read-only result handed to the narrative generator.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct AnalysisPayload {
    company_code: String,
    language: Language,
    periods: Vec<Period>,
    sections: BTreeMap<Section, PayloadSection>,
    charts: Vec<ChartArtifact>,
    anomalies: Vec<Anomaly>,
    notes: Vec<String>,
}

impl AnalysisPayload {
    pub(crate) fn new(
        company_code: String,
        language: Language,
        periods: Vec<Period>,
        sections: BTreeMap<Section, PayloadSection>,
        charts: Vec<ChartArtifact>,
        anomalies: Vec<Anomaly>,
        notes: Vec<String>,
    ) -> Self {
        Self {
            company_code,
            language,
            periods,
            sections,
            charts,
            anomalies,
            notes,
        }
    }

    pub fn company_code(&self) -> &str {
        &self.company_code
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Union of every statement's periods, ascending.
    pub fn periods(&self) -> &[Period] {
        &self.periods
    }

    pub fn sections(&self) -> &BTreeMap<Section, PayloadSection> {
        &self.sections
    }

    pub fn section(&self, section: Section) -> Option<&PayloadSection> {
        self.sections.get(&section)
    }

    pub fn metric(&self, section: Section, id: MetricId) -> Option<&PayloadMetric> {
        self.sections
            .get(&section)?
            .categories
            .get(&id.category())?
            .metrics
            .get(&id)
    }

    pub fn charts(&self) -> &[ChartArtifact] {
        &self.charts
    }

    pub fn anomalies(&self) -> &[Anomaly] {
        &self.anomalies
    }

    pub fn notes(&self) -> &[String] {
        &self.notes
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_value(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(AnalysisPayload)
    }

    pub fn json_schema_string() -> Result<String> {
        Ok(serde_json::to_string_pretty(&Self::json_schema())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chart_file_name() {
        assert_eq!(
            ChartArtifact::file_name("600519", ChartId::Revenue, "png"),
            "600519_revenue_trend.png"
        );
    }

    #[test]
    fn test_section_titles() {
        assert_eq!(Section::CashFlow.label(Language::Zh), "现金流量表");
        assert_eq!(Section::CrossStatement.label(Language::En), "Cross-Statement Analysis");
        assert_eq!(Section::from(StatementKind::Income), Section::Income);
    }

    #[test]
    fn test_schema_describes_payload() {
        let schema = AnalysisPayload::json_schema_string().unwrap();
        assert!(schema.contains("company_code"));
        assert!(schema.contains("anomalies"));
        assert!(schema.contains("MetricValue"));
    }
}
