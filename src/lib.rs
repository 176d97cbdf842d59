//! # Financial Statement Analyzer
//!
//! A library for turning periodic financial statements (balance sheet, income
//! statement, cash-flow statement) into derived ratios, trend series and a
//! structured payload a narrative generator can write a report from.
//!
//! ## Core Concepts
//!
//! - **Statement Table**: one statement type across N periods, every field aligned with the periods
//! - **Metric**: a named value derived per period; a missing operand or zero
//!   denominator is NA, never zero
//! - **Trend Series**: an amount series with its period-over-period change
//! - **Metrics Report**: everything one statement analyzer derived, grouped by category
//! - **Analysis Payload**: the three reports plus cross-statement metrics, labelled in one language
//!
//! ## Example
//!
//! ```rust,ignore
//! use financial_statement_analyzer::*;
//!
//! let config = AnalysisConfig::new("600519", Language::En);
//!
//! let balance = ingestion::from_rows(
//!     StatementKind::Balance,
//!     &[
//!         RawStatementRow::new("20221231")
//!             .with(Field::TotalAssets, "1,000")
//!             .with(Field::TotalLiabilities, "400")
//!             .with(Field::ShareholdersEquity, "600"),
//!         RawStatementRow::new("20231231")
//!             .with(Field::TotalAssets, "1,200")
//!             .with(Field::TotalLiabilities, "600")
//!             .with(Field::ShareholdersEquity, "600"),
//!     ],
//! )?
//! .table;
//!
//! let run = FinancialReportProcessor::analyze_tables(
//!     &balance,
//!     &StatementTable::empty(StatementKind::Income),
//!     &StatementTable::empty(StatementKind::CashFlow),
//!     &config,
//! )?;
//!
//! println!("{}", run.payload.to_json()?);
//! ```

pub mod analyzer;
pub mod anomaly;
pub mod assembler;
pub mod collaborators;
pub mod error;
pub mod fields;
pub mod formula;
pub mod ingestion;
pub mod labels;
pub mod metric;
pub mod payload;
pub mod period;
pub mod report;
pub mod schema;
pub mod table;
pub mod trend;
pub mod utils;

pub use analyzer::{
    BalanceSheetAnalyzer, CashFlowAnalyzer, IncomeStatementAnalyzer, StatementAnalyzer,
};
pub use anomaly::{Anomaly, AnomalyRule, AnomalySubject};
pub use assembler::{cross_statement, CrossStatementReport, ReportAssembler};
pub use collaborators::{ChartRenderer, ChartRequest, NarrativeGenerator, StatementSource};
pub use error::{AnalysisError, Diagnostic, Result};
pub use fields::Field;
pub use formula::{MetricValue, NaReason, Unit};
pub use labels::{Language, Localized};
pub use metric::{Category, ChartId, MetricId};
pub use payload::{AnalysisPayload, ChartArtifact, PayloadMetric, Section};
pub use period::Period;
pub use report::{MetricSeries, MetricsReport, TrendPoint, TrendSeries};
pub use schema::*;
pub use table::StatementTable;
pub use trend::{pct_change, rolling_average, SeriesSummary};

use log::{debug, info, warn};

/// Output of one pipeline invocation.
#[derive(Debug, Clone)]
pub struct AnalysisRun {
    pub payload: AnalysisPayload,
    /// One request per entry in the payload's chart manifest.
    pub chart_requests: Vec<ChartRequest>,
    /// Rows dropped or statements degraded on the way in.
    pub diagnostics: Vec<Diagnostic>,
}

impl AnalysisRun {
    /// Hands every chart request to `renderer`, stopping at the first failure.
    pub fn render_charts<R: ChartRenderer>(
        &self,
        renderer: &mut R,
    ) -> std::result::Result<usize, R::Error> {
        for request in &self.chart_requests {
            debug!("Rendering chart {}", request.artifact);
            renderer.render(request)?;
        }
        Ok(self.chart_requests.len())
    }

    /// Consumes the run, passing the payload to `generator`.
    pub fn narrate<G: NarrativeGenerator>(
        self,
        generator: &mut G,
    ) -> std::result::Result<G::Output, G::Error> {
        generator.generate(self.payload)
    }
}

pub struct FinancialReportProcessor;

impl FinancialReportProcessor {
    /// Fetches, ingests, analyzes and assembles all three statements.
    ///
    /// A statement whose source fails is analyzed as empty and reported as a
    /// [`Diagnostic::SourceUnavailable`].
    pub fn run<S: StatementSource>(source: &S, config: &AnalysisConfig) -> Result<AnalysisRun> {
        config.validate()?;
        info!(
            "Starting financial statement analysis for {} ({})",
            config.company_code, config.language
        );

        let mut diagnostics = Vec::new();
        let balance = Self::fetch(source, config, StatementKind::Balance, &mut diagnostics)?;
        let income = Self::fetch(source, config, StatementKind::Income, &mut diagnostics)?;
        let cash_flow = Self::fetch(source, config, StatementKind::CashFlow, &mut diagnostics)?;

        let mut run = Self::analyze_tables(&balance, &income, &cash_flow, config)?;
        for diagnostic in run.diagnostics.drain(..) {
            if !diagnostics.contains(&diagnostic) {
                diagnostics.push(diagnostic);
            }
        }
        run.diagnostics = diagnostics;
        Ok(run)
    }

    fn fetch<S: StatementSource>(
        source: &S,
        config: &AnalysisConfig,
        kind: StatementKind,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Result<StatementTable> {
        match source.fetch(&config.company_code, kind) {
            Ok(rows) => {
                debug!("{:?}: fetched {} rows", kind, rows.len());
                let ingested = ingestion::from_rows(kind, &rows)?;
                diagnostics.extend(ingested.diagnostics);
                Ok(ingested.table)
            }
            Err(e) => {
                warn!("{:?}: source unavailable, treating as empty: {}", kind, e);
                diagnostics.push(Diagnostic::SourceUnavailable {
                    statement: kind,
                    reason: e.to_string(),
                });
                Ok(StatementTable::empty(kind))
            }
        }
    }

    /// Analyzes already-built tables.
    pub fn analyze_tables(
        balance: &StatementTable,
        income: &StatementTable,
        cash_flow: &StatementTable,
        config: &AnalysisConfig,
    ) -> Result<AnalysisRun> {
        config.validate()?;

        let limit = |table: &StatementTable| match config.max_periods {
            Some(n) => table.latest(n),
            None => table.clone(),
        };

        let balance_report = BalanceSheetAnalyzer.analyze(&limit(balance))?;
        let income_report = IncomeStatementAnalyzer.analyze(&limit(income))?;
        let cash_flow_report = CashFlowAnalyzer.analyze(&limit(cash_flow))?;

        let diagnostics: Vec<Diagnostic> = [&balance_report, &income_report, &cash_flow_report]
            .iter()
            .filter(|report| report.is_empty())
            .map(|report| Diagnostic::EmptyStatement {
                statement: report.statement,
            })
            .collect();
        for diagnostic in &diagnostics {
            warn!("Statement degraded: {:?}", diagnostic);
        }

        let (payload, chart_requests) = ReportAssembler::new(config).assemble_with_charts(
            &balance_report,
            &income_report,
            &cash_flow_report,
            &config.company_code,
            config.language,
        )?;

        info!(
            "Finished analysis for {}: {} sections, {} charts, {} diagnostics",
            config.company_code,
            payload.sections().len(),
            chart_requests.len(),
            diagnostics.len()
        );

        Ok(AnalysisRun {
            payload,
            chart_requests,
            diagnostics,
        })
    }
}

pub fn analyze_company<S: StatementSource>(
    source: &S,
    config: &AnalysisConfig,
) -> Result<AnalysisRun> {
    FinancialReportProcessor::run(source, config)
}
