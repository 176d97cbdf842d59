use crate::anomaly::{self, JoinedSeries};
use crate::collaborators::ChartRequest;
use crate::error::{AnalysisError, Result};
use crate::fields::Field;
use crate::formula::{MetricValue, NaReason, ZERO_TOLERANCE};
use crate::labels::{Language, Localized, Note};
use crate::metric::{ChartId, MetricId};
use crate::payload::{
    AnalysisPayload, ChartArtifact, PayloadCategory, PayloadMetric, PayloadSection, Section,
};
use crate::period::{has_mixed_frequency, Period};
use crate::report::{MetricSeries, MetricsReport, TrendSeries};
use crate::schema::{AnalysisConfig, StatementKind};
use crate::trend::rolling_average;
use log::{debug, info};
use std::collections::{BTreeMap, BTreeSet};

const DAYS_PER_YEAR: f64 = 365.0;

/// Metrics that need more than one statement, computed over the union of
/// the statements' periods.
#[derive(Debug, Clone, PartialEq)]
pub struct CrossStatementReport {
    pub periods: Vec<Period>,
    pub metrics: BTreeMap<MetricId, MetricSeries>,
    pub charts: BTreeMap<ChartId, TrendSeries>,
}

impl CrossStatementReport {
    pub fn metric(&self, id: MetricId) -> Option<&MetricSeries> {
        self.metrics.get(&id)
    }
}

fn union_periods(reports: &[&MetricsReport]) -> Vec<Period> {
    reports
        .iter()
        .flat_map(|report| report.periods.iter().copied())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn line(report: &MetricsReport, field: Field, periods: &[Period]) -> Vec<MetricValue> {
    periods
        .iter()
        .map(|period| report.line_item_at(field, *period))
        .collect()
}

fn metric(report: &MetricsReport, id: MetricId, periods: &[Period]) -> Vec<MetricValue> {
    periods
        .iter()
        .map(|period| report.metric_at(id, *period))
        .collect()
}

fn zip_with(
    a: &[MetricValue],
    b: &[MetricValue],
    op: impl Fn(MetricValue, MetricValue) -> MetricValue,
) -> Vec<MetricValue> {
    a.iter().zip(b).map(|(x, y)| op(*x, *y)).collect()
}

fn ratio(numerator: &[MetricValue], denominator: &[MetricValue]) -> Vec<MetricValue> {
    zip_with(numerator, denominator, |n, d| n / d)
}

fn days(turnover: &[MetricValue]) -> Vec<MetricValue> {
    turnover
        .iter()
        .map(|t| MetricValue::Value(DAYS_PER_YEAR) / *t)
        .collect()
}

/// Operating revenue, or total revenue where operating revenue is not reported.
fn operating_revenue_or_total(income: &MetricsReport, periods: &[Period]) -> Vec<MetricValue> {
    zip_with(
        &line(income, Field::OperatingRevenue, periods),
        &line(income, Field::TotalRevenue, periods),
        MetricValue::or,
    )
}

/// Positive period-over-period increase; NA for the first period.
fn increase(series: &[MetricValue]) -> Vec<MetricValue> {
    series
        .iter()
        .enumerate()
        .map(|(i, current)| match i.checked_sub(1) {
            None => MetricValue::Na(NaReason::NoPriorPeriod),
            Some(j) => (*current - series[j]).map(|d| d.max(0.0)),
        })
        .collect()
}

/// Joins the three statement reports late, by period.
///
/// A period absent from a statement leaves every metric that needs that
/// statement NA with [`NaReason::JoinMismatch`] for that period only.
pub fn cross_statement(
    balance: &MetricsReport,
    income: &MetricsReport,
    cash_flow: &MetricsReport,
) -> CrossStatementReport {
    let periods = union_periods(&[balance, income, cash_flow]);

    let total_assets = line(balance, Field::TotalAssets, &periods);
    let equity = line(balance, Field::ShareholdersEquity, &periods);
    let receivables = line(balance, Field::AccountsReceivable, &periods);
    let inventories = line(balance, Field::Inventories, &periods);
    let long_term_assets: Vec<MetricValue> = [
        Field::FixedAssets,
        Field::ConstructionInProgress,
        Field::InvestmentProperty,
    ]
    .iter()
    .map(|field| line(balance, *field, &periods))
    .fold(vec![MetricValue::Value(0.0); periods.len()], |acc, column| {
        zip_with(&acc, &column, |a, b| a + b)
    });

    let operating_revenue = line(income, Field::OperatingRevenue, &periods);
    let operating_costs = line(income, Field::OperatingCosts, &periods);
    let net_profit = line(income, Field::NetProfit, &periods);
    let revenue = operating_revenue_or_total(income, &periods);

    let operating_cash_flow = line(cash_flow, Field::NetOperatingCashFlow, &periods);
    let capex: Vec<MetricValue> = line(cash_flow, Field::CapitalExpenditure, &periods)
        .into_iter()
        .map(|v| v.map(|c| c.max(0.0)))
        .collect();

    let avg_assets = rolling_average(&total_assets);
    let avg_equity = rolling_average(&equity);
    let avg_receivables = rolling_average(&receivables);
    let avg_inventories = rolling_average(&inventories);

    let receivables_turnover = ratio(&operating_revenue, &avg_receivables);
    let inventory_turnover = ratio(&operating_costs, &avg_inventories);
    let asset_turnover = ratio(&revenue, &avg_assets);

    let dupont_margin = ratio(&net_profit, &revenue);
    let dupont_multiplier = ratio(&avg_assets, &avg_equity);
    let dupont_roe = zip_with(
        &zip_with(&dupont_margin, &asset_turnover, |a, b| a * b),
        &dupont_multiplier,
        |a, b| a * b,
    );

    let capex_intensity = ratio(
        &zip_with(&increase(&long_term_assets), &capex, |a, b| a + b),
        &operating_revenue,
    );

    let computed = [
        (MetricId::ReturnOnAssets, ratio(&net_profit, &avg_assets)),
        (MetricId::ReturnOnEquity, ratio(&net_profit, &avg_equity)),
        (MetricId::ReceivablesTurnover, receivables_turnover.clone()),
        (MetricId::InventoryTurnover, inventory_turnover.clone()),
        (MetricId::AssetTurnover, asset_turnover.clone()),
        (MetricId::ReceivableDays, days(&receivables_turnover)),
        (MetricId::InventoryDays, days(&inventory_turnover)),
        (MetricId::ReceivablesToRevenue, ratio(&receivables, &operating_revenue)),
        (MetricId::InventoryToRevenue, ratio(&inventories, &operating_revenue)),
        (MetricId::CapexIntensity, capex_intensity),
        (MetricId::OperatingCashFlowToNetProfit, ratio(&operating_cash_flow, &net_profit)),
        (MetricId::DupontNetMargin, dupont_margin),
        (MetricId::DupontAssetTurnover, asset_turnover),
        (MetricId::DupontEquityMultiplier, dupont_multiplier),
        (MetricId::DupontRoe, dupont_roe.clone()),
    ];

    let mut charts = BTreeMap::new();
    charts.insert(ChartId::DupontRoe, TrendSeries::new(&periods, &dupont_roe));

    CrossStatementReport {
        metrics: computed
            .into_iter()
            .map(|(id, values)| (id, MetricSeries::new(id, values)))
            .collect(),
        periods,
        charts,
    }
}

fn depreciation_unavailable(cash_flow: &MetricsReport) -> bool {
    cash_flow
        .line_items
        .get(&Field::DepreciationAmortization)
        .map_or(true, |values| {
            values.iter().flatten().all(|v| v.abs() <= ZERO_TOLERANCE)
        })
}

fn joined_series(
    balance: &MetricsReport,
    income: &MetricsReport,
    cash_flow: &MetricsReport,
    cross: &CrossStatementReport,
) -> JoinedSeries {
    let periods = &cross.periods;
    let cross_values = |id: MetricId| {
        cross
            .metric(id)
            .map(|series| series.values.clone())
            .unwrap_or_else(|| vec![MetricValue::MISSING; periods.len()])
    };

    JoinedSeries {
        revenue: operating_revenue_or_total(income, periods),
        net_profit: line(income, Field::NetProfit, periods),
        operating_cash_flow: line(cash_flow, Field::NetOperatingCashFlow, periods),
        cost_rate: metric(income, MetricId::CostRate, periods),
        three_expense_ratio: metric(income, MetricId::ThreeExpenseRatio, periods),
        rd_expense_ratio: metric(income, MetricId::RdExpenseRatio, periods),
        current_ratio: metric(balance, MetricId::CurrentRatio, periods),
        liquidity_gap: metric(balance, MetricId::LiquidityGap, periods),
        short_term_debt_share: metric(balance, MetricId::ShortTermDebtShare, periods),
        long_term_asset_ratio: metric(balance, MetricId::LongTermAssetRatio, periods),
        ocf_to_net_profit: cross_values(MetricId::OperatingCashFlowToNetProfit),
        receivable_days: cross_values(MetricId::ReceivableDays),
        inventory_days: cross_values(MetricId::InventoryDays),
        receivables_to_revenue: cross_values(MetricId::ReceivablesToRevenue),
        inventory_to_revenue: cross_values(MetricId::InventoryToRevenue),
        capex_intensity: cross_values(MetricId::CapexIntensity),
        periods: periods.clone(),
    }
}

fn payload_section<'a>(
    section: Section,
    periods: &[Period],
    metrics: impl Iterator<Item = (MetricId, &'a MetricSeries)>,
    language: Language,
) -> PayloadSection {
    let mut categories: BTreeMap<_, PayloadCategory> = BTreeMap::new();

    for (id, series) in metrics {
        let values: BTreeMap<Period, MetricValue> =
            periods.iter().copied().zip(series.values.iter().copied()).collect();
        let display = values
            .iter()
            .map(|(period, value)| (*period, value.display(series.unit, language)))
            .collect();

        categories
            .entry(id.category())
            .or_insert_with(|| PayloadCategory {
                label: id.category().label(language).to_string(),
                metrics: BTreeMap::new(),
            })
            .metrics
            .insert(
                id,
                PayloadMetric {
                    label: id.label(language).to_string(),
                    unit: series.unit,
                    approximation: series.approximation,
                    values,
                    display,
                    summary: series.summary,
                },
            );
    }

    PayloadSection {
        title: section.label(language).to_string(),
        categories,
    }
}

/// Merges statement reports into the payload a narrative generator consumes.
#[derive(Debug, Clone)]
pub struct ReportAssembler {
    chart_extension: String,
    anomaly_window: usize,
}

impl Default for ReportAssembler {
    fn default() -> Self {
        Self {
            chart_extension: "png".to_string(),
            anomaly_window: 4,
        }
    }
}

impl ReportAssembler {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            chart_extension: config.chart_extension.trim().to_string(),
            anomaly_window: config.anomaly_window,
        }
    }

    pub fn assemble(
        &self,
        balance: &MetricsReport,
        income: &MetricsReport,
        cash_flow: &MetricsReport,
        company_code: &str,
        language: Language,
    ) -> Result<AnalysisPayload> {
        self.assemble_with_charts(balance, income, cash_flow, company_code, language)
            .map(|(payload, _)| payload)
    }

    /// Like [`ReportAssembler::assemble`], also returning one render request
    /// per chart in the payload's manifest.
    pub fn assemble_with_charts(
        &self,
        balance: &MetricsReport,
        income: &MetricsReport,
        cash_flow: &MetricsReport,
        company_code: &str,
        language: Language,
    ) -> Result<(AnalysisPayload, Vec<ChartRequest>)> {
        for (expected, report) in [
            (StatementKind::Balance, balance),
            (StatementKind::Income, income),
            (StatementKind::CashFlow, cash_flow),
        ] {
            if report.statement != expected {
                return Err(AnalysisError::StatementMismatch {
                    analyzer: expected,
                    table: report.statement,
                });
            }
        }

        let cross = cross_statement(balance, income, cash_flow);
        debug!(
            "Joined {} periods across statements into {} cross-statement metrics",
            cross.periods.len(),
            cross.metrics.len()
        );

        let mut sections = BTreeMap::new();
        for report in [balance, income, cash_flow] {
            let metrics = report
                .categories
                .values()
                .flat_map(|metrics| metrics.iter().map(|(id, series)| (*id, series)));
            let section = Section::from(report.statement);
            sections.insert(
                section,
                payload_section(section, &report.periods, metrics, language),
            );
        }
        sections.insert(
            Section::CrossStatement,
            payload_section(
                Section::CrossStatement,
                &cross.periods,
                cross.metrics.iter().map(|(id, series)| (*id, series)),
                language,
            ),
        );

        let chart_sources = [balance, income, cash_flow]
            .into_iter()
            .flat_map(|report| {
                let section = Section::from(report.statement);
                report.charts.iter().map(move |(id, trend)| (section, *id, trend))
            })
            .chain(
                cross
                    .charts
                    .iter()
                    .map(|(id, trend)| (Section::CrossStatement, *id, trend)),
            );

        let mut artifacts = Vec::new();
        let mut requests = Vec::new();
        for (section, chart, trend) in chart_sources {
            if trend.points.iter().all(|point| point.value.is_na()) {
                debug!("Skipping chart {:?}: no values to plot", chart);
                continue;
            }
            let title = chart.label(language).to_string();
            let file_name = ChartArtifact::file_name(company_code, chart, &self.chart_extension);
            requests.push(ChartRequest {
                chart,
                series_name: title.clone(),
                series: trend.clone(),
                language,
                artifact: file_name.clone(),
            });
            artifacts.push(ChartArtifact {
                chart,
                section,
                title,
                file_name,
            });
        }

        let mut notes = Vec::new();
        if has_mixed_frequency(&cross.periods) {
            notes.push(Note::MixedFrequency);
        }
        if !income.is_empty() {
            notes.push(Note::EbitdaApproximation);
        }
        if !cash_flow.is_empty() && depreciation_unavailable(cash_flow) {
            notes.push(Note::DepreciationUnavailable);
        }
        for report in [balance, income, cash_flow] {
            if report.is_empty() {
                notes.push(Note::EmptyStatement(report.statement));
            }
        }

        let joined = joined_series(balance, income, cash_flow, &cross);
        let anomalies = anomaly::evaluate(&joined, self.anomaly_window, language)?;

        info!(
            "Assembled payload for {} ({}): {} periods, {} charts, {} anomalies",
            company_code,
            language,
            cross.periods.len(),
            artifacts.len(),
            anomalies.len()
        );

        let payload = AnalysisPayload::new(
            company_code.to_string(),
            language,
            cross.periods.clone(),
            sections,
            artifacts,
            anomalies,
            notes.iter().map(|note| note.render(language)).collect(),
        );
        Ok((payload, requests))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::test_support::table;
    use crate::analyzer::{
        BalanceSheetAnalyzer, CashFlowAnalyzer, IncomeStatementAnalyzer, StatementAnalyzer,
    };
    use crate::table::StatementTable;

    fn reports() -> (MetricsReport, MetricsReport, MetricsReport) {
        let balance = table(
            StatementKind::Balance,
            &[2022, 2023],
            &[
                (Field::TotalAssets, vec![Some(1000.0), Some(1200.0)]),
                (Field::TotalLiabilities, vec![Some(400.0), Some(600.0)]),
                (Field::ShareholdersEquity, vec![Some(600.0), Some(600.0)]),
                (Field::AccountsReceivable, vec![Some(100.0), Some(140.0)]),
            ],
        );
        let income = table(
            StatementKind::Income,
            &[2022, 2023],
            &[
                (Field::TotalRevenue, vec![Some(1000.0), Some(1100.0)]),
                (Field::OperatingRevenue, vec![Some(960.0), Some(1080.0)]),
                (Field::NetProfit, vec![Some(60.0), Some(66.0)]),
            ],
        );
        let cash = table(
            StatementKind::CashFlow,
            &[2023],
            &[(Field::NetOperatingCashFlow, vec![Some(99.0)])],
        );

        (
            BalanceSheetAnalyzer.analyze(&balance).unwrap(),
            IncomeStatementAnalyzer.analyze(&income).unwrap(),
            CashFlowAnalyzer.analyze(&cash).unwrap(),
        )
    }

    fn at(report: &CrossStatementReport, id: MetricId, index: usize) -> MetricValue {
        report.metric(id).unwrap().values[index]
    }

    #[test]
    fn test_returns_use_averaged_balances() {
        let (balance, income, cash) = reports();
        let cross = cross_statement(&balance, &income, &cash);

        // 2022 has no prior period, so the average falls back to the balance itself.
        assert!((at(&cross, MetricId::ReturnOnAssets, 0).value().unwrap() - 0.06).abs() < 1e-9);
        assert!((at(&cross, MetricId::ReturnOnAssets, 1).value().unwrap() - 0.06).abs() < 1e-9);
        assert!((at(&cross, MetricId::ReturnOnEquity, 1).value().unwrap() - 0.11).abs() < 1e-9);
        assert!((at(&cross, MetricId::ReceivablesTurnover, 1).value().unwrap() - 9.0).abs() < 1e-9);
        assert!(
            (at(&cross, MetricId::ReceivableDays, 1).value().unwrap() - 365.0 / 9.0).abs() < 1e-9
        );
    }

    #[test]
    fn test_dupont_identity() {
        let (balance, income, cash) = reports();
        let cross = cross_statement(&balance, &income, &cash);

        let roe = at(&cross, MetricId::DupontRoe, 1).value().unwrap();
        let margin = at(&cross, MetricId::DupontNetMargin, 1).value().unwrap();
        let turnover = at(&cross, MetricId::DupontAssetTurnover, 1).value().unwrap();
        let multiplier = at(&cross, MetricId::DupontEquityMultiplier, 1).value().unwrap();
        assert!((roe - margin * turnover * multiplier).abs() < 1e-12);
        assert!((roe - at(&cross, MetricId::ReturnOnEquity, 1).value().unwrap()).abs() < 1e-9);
    }

    #[test]
    fn test_turnover_prefers_operating_revenue() {
        let (balance, income, cash) = reports();
        let cross = cross_statement(&balance, &income, &cash);

        let turnover = at(&cross, MetricId::AssetTurnover, 1).value().unwrap();
        assert!((turnover - 1080.0 / 1100.0).abs() < 1e-9);
        let margin = at(&cross, MetricId::DupontNetMargin, 1).value().unwrap();
        assert!((margin - 66.0 / 1080.0).abs() < 1e-9);

        let total_only = IncomeStatementAnalyzer
            .analyze(&table(
                StatementKind::Income,
                &[2022, 2023],
                &[
                    (Field::TotalRevenue, vec![Some(1000.0), Some(1100.0)]),
                    (Field::NetProfit, vec![Some(60.0), Some(66.0)]),
                ],
            ))
            .unwrap();
        let cross = cross_statement(&balance, &total_only, &cash);
        let turnover = at(&cross, MetricId::AssetTurnover, 1).value().unwrap();
        assert!((turnover - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_statement_period_is_a_join_mismatch() {
        let (balance, income, cash) = reports();
        let cross = cross_statement(&balance, &income, &cash);

        assert_eq!(
            at(&cross, MetricId::OperatingCashFlowToNetProfit, 0),
            MetricValue::Na(NaReason::JoinMismatch)
        );
        assert!(
            (at(&cross, MetricId::OperatingCashFlowToNetProfit, 1).value().unwrap() - 1.5).abs()
                < 1e-9
        );
        // Balance-only metrics are unaffected by the cash-flow gap.
        assert!(!at(&cross, MetricId::ReturnOnAssets, 0).is_na());
    }

    #[test]
    fn test_payload_manifest_and_notes() {
        let (balance, income, cash) = reports();
        let assembler = ReportAssembler::default();
        let (payload, requests) = assembler
            .assemble_with_charts(&balance, &income, &cash, "600519", Language::En)
            .unwrap();

        assert_eq!(payload.company_code(), "600519");
        assert_eq!(payload.periods().len(), 2);
        assert_eq!(payload.charts().len(), requests.len());
        assert!(payload
            .charts()
            .iter()
            .any(|chart| chart.file_name == "600519_revenue_trend.png"));
        assert!(payload
            .charts()
            .iter()
            .all(|chart| chart.chart != ChartId::NonCurrentAssets));
        assert!(payload.notes().iter().any(|note| note.contains("approximation")));

        let roa = payload
            .metric(Section::CrossStatement, MetricId::ReturnOnAssets)
            .unwrap();
        assert_eq!(roa.label, "Return on Assets");
        assert_eq!(roa.display.values().next().unwrap(), "6.00%");
    }

    #[test]
    fn test_depreciation_note() {
        let (balance, income, cash) = reports();
        let payload = ReportAssembler::default()
            .assemble(&balance, &income, &cash, "600519", Language::En)
            .unwrap();
        assert!(payload
            .notes()
            .iter()
            .any(|note| note.contains("Depreciation and amortization")));

        let with_depreciation = CashFlowAnalyzer
            .analyze(&table(
                StatementKind::CashFlow,
                &[2023],
                &[
                    (Field::NetOperatingCashFlow, vec![Some(99.0)]),
                    (Field::DepreciationAmortization, vec![Some(12.0)]),
                ],
            ))
            .unwrap();
        let payload = ReportAssembler::default()
            .assemble(&balance, &income, &with_depreciation, "600519", Language::Zh)
            .unwrap();
        assert!(!payload.notes().iter().any(|note| note.contains("折旧/摊销数据缺失")));
    }

    #[test]
    fn test_empty_cash_flow_keeps_payload_valid() {
        let (balance, income, _) = reports();
        let empty = CashFlowAnalyzer
            .analyze(&StatementTable::empty(StatementKind::CashFlow))
            .unwrap();

        let payload = ReportAssembler::default()
            .assemble(&balance, &income, &empty, "000001", Language::Zh)
            .unwrap();
        let section = payload.section(Section::CashFlow).unwrap();
        assert!(section.categories.is_empty());
        assert!(payload.notes().iter().any(|note| note.contains("现金流量表")));
        assert!(payload.to_json().is_ok());
    }

    #[test]
    fn test_reports_in_the_wrong_slot_are_rejected() {
        let (balance, income, cash) = reports();
        let err = ReportAssembler::default()
            .assemble(&income, &balance, &cash, "600519", Language::En)
            .unwrap_err();
        assert!(matches!(err, AnalysisError::StatementMismatch { .. }));
    }
}
