//! Seams to the systems around the engine: where statements come from, who
//! draws the charts, and who writes the narrative.

use crate::labels::Language;
use crate::metric::ChartId;
use crate::payload::AnalysisPayload;
use crate::report::TrendSeries;
use crate::schema::{RawStatementRow, StatementKind};
use serde::Serialize;
use std::error::Error;

/// Supplies raw statement rows for a company, keyed by period end date.
pub trait StatementSource {
    type Error: Error;

    fn fetch(
        &self,
        company_code: &str,
        statement: StatementKind,
    ) -> std::result::Result<Vec<RawStatementRow>, Self::Error>;
}

/// One chart to draw, with the file name the payload already refers to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartRequest {
    pub chart: ChartId,
    pub series_name: String,
    pub series: TrendSeries,
    pub language: Language,
    pub artifact: String,
}

pub trait ChartRenderer {
    type Error: Error;

    fn render(&mut self, request: &ChartRequest) -> std::result::Result<(), Self::Error>;
}

/// Turns a finished payload into prose.
pub trait NarrativeGenerator {
    type Output;
    type Error: Error;

    fn generate(
        &mut self,
        payload: AnalysisPayload,
    ) -> std::result::Result<Self::Output, Self::Error>;
}
