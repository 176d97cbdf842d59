//! Statement analyzers: each one owns a formula table for its statement type
//! and turns a [`StatementTable`] into a [`MetricsReport`].

mod balance;
mod cash_flow;
mod income;

pub use balance::BalanceSheetAnalyzer;
pub use cash_flow::CashFlowAnalyzer;
pub use income::IncomeStatementAnalyzer;

use crate::error::{AnalysisError, Result};
use crate::formula::MetricValue;
use crate::metric::{Formula, MetricDef, PeriodView, PointFormula};
use crate::report::{MetricSeries, MetricsReport, TrendSeries};
use crate::schema::StatementKind;
use crate::table::StatementTable;
use log::debug;

pub trait StatementAnalyzer {
    fn statement(&self) -> StatementKind;

    fn formulas(&self) -> &'static [MetricDef];

    /// Applies every formula to every period of `table`.
    ///
    /// A formula whose inputs are missing yields NA values rather than an
    /// error; the only failure is being handed the wrong statement type.
    fn analyze(&self, table: &StatementTable) -> Result<MetricsReport> {
        if table.kind() != self.statement() {
            return Err(AnalysisError::StatementMismatch {
                analyzer: self.statement(),
                table: table.kind(),
            });
        }

        let mut report = MetricsReport::empty(self.statement());
        if table.is_empty() {
            debug!("{:?}: empty table, nothing to analyze", self.statement());
            return Ok(report);
        }

        report.periods = table.periods().to_vec();
        report.line_items = table
            .fields()
            .map(|(field, values)| (field, values.to_vec()))
            .collect();

        for def in self.formulas() {
            let values = match def.formula {
                Formula::Point(formula) => evaluate(table, formula),
                Formula::Growth { chart, amount } => {
                    let amounts = evaluate(table, amount);
                    let trend = TrendSeries::new(table.periods(), &amounts);
                    let changes = trend.changes();
                    report.charts.insert(chart, trend);
                    changes
                }
            };
            report.insert(def.id, MetricSeries::new(def.id, values));
        }

        debug!(
            "{:?}: derived {} metrics over {} periods",
            self.statement(),
            report.metric_count(),
            report.periods.len()
        );
        Ok(report)
    }
}

fn evaluate(table: &StatementTable, formula: PointFormula) -> Vec<MetricValue> {
    (0..table.len())
        .map(|index| formula(&PeriodView::new(table, index)))
        .collect()
}
