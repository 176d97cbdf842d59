use super::StatementAnalyzer;
use crate::fields::Field::*;
use crate::formula::MetricValue;
use crate::metric::{ChartId, MetricDef, MetricId, PeriodView};
use crate::schema::StatementKind;

/// Share of administrative expenses assumed to be depreciation and
/// amortization when approximating EBITDA.
pub const EBITDA_DA_PROXY_RATE: f64 = 0.10;

#[derive(Debug, Clone, Copy, Default)]
pub struct IncomeStatementAnalyzer;

impl StatementAnalyzer for IncomeStatementAnalyzer {
    fn statement(&self) -> StatementKind {
        StatementKind::Income
    }

    fn formulas(&self) -> &'static [MetricDef] {
        FORMULAS
    }
}

fn gross_profit(v: &PeriodView<'_>) -> MetricValue {
    v.get(OperatingRevenue) - v.get(OperatingCosts)
}

/// Parent-attributable net profit, or consolidated net profit for sources
/// that only report the latter.
fn attributable_net_profit(v: &PeriodView<'_>) -> MetricValue {
    v.get(NetProfitAttributableToParent).or(v.get(NetProfit))
}

const FORMULAS: &[MetricDef] = &[
    // Profitability
    MetricDef::point(MetricId::GrossMargin, |v| {
        gross_profit(v) / v.get(OperatingRevenue)
    }),
    MetricDef::point(MetricId::NetMargin, |v| {
        v.get(NetProfitAttributableToParent) / v.get(TotalRevenue)
    }),
    MetricDef::point(MetricId::OperatingMargin, |v| {
        v.get(OperatingProfit) / v.get(TotalRevenue)
    }),
    MetricDef::point(MetricId::EbitdaMargin, |v| {
        (v.get(OperatingProfit) + v.get(AdministrativeExpenses) * EBITDA_DA_PROXY_RATE)
            / v.get(TotalRevenue)
    }),
    // Cost and expense structure
    MetricDef::point(MetricId::CostRate, |v| {
        v.get(OperatingCosts) / v.get(OperatingRevenue)
    }),
    MetricDef::point(MetricId::SellingExpenseRatio, |v| {
        v.get(SellingExpenses) / v.get(TotalRevenue)
    }),
    MetricDef::point(MetricId::AdministrativeExpenseRatio, |v| {
        v.get(AdministrativeExpenses) / v.get(TotalRevenue)
    }),
    MetricDef::point(MetricId::RdExpenseRatio, |v| {
        v.get(RdExpenses) / v.get(TotalRevenue)
    }),
    MetricDef::point(MetricId::FinancialExpenseRatio, |v| {
        v.get(FinancialExpenses) / v.get(TotalRevenue)
    }),
    MetricDef::point(MetricId::PeriodExpenseRatio, |v| {
        v.sum(&[
            SellingExpenses,
            AdministrativeExpenses,
            RdExpenses,
            FinancialExpenses,
        ]) / v.get(TotalRevenue)
    }),
    MetricDef::point(MetricId::ThreeExpenseRatio, |v| {
        v.sum(&[SellingExpenses, AdministrativeExpenses, FinancialExpenses])
            / v.get(OperatingRevenue)
    }),
    // Solvency
    MetricDef::point(MetricId::InterestCoverage, |v| {
        v.sum(&[NetProfit, IncomeTax, FinancialExpenses]) / v.get(InterestExpenses)
    }),
    // Revenue quality
    MetricDef::point(MetricId::MainBusinessShare, |v| {
        v.get(OperatingRevenue) / v.get(TotalRevenue)
    }),
    MetricDef::point(MetricId::OtherBusinessShare, |v| {
        v.get(OtherBusinessRevenue) / v.get(TotalRevenue)
    }),
    MetricDef::point(MetricId::InvestmentIncomeToOperatingProfit, |v| {
        v.get(InvestmentIncome) / v.get(OperatingProfit)
    }),
    // Growth
    MetricDef::growth(MetricId::RevenueGrowth, ChartId::Revenue, |v| {
        v.get(TotalRevenue)
    }),
    MetricDef::growth(MetricId::OperatingProfitGrowth, ChartId::OperatingProfit, |v| {
        v.get(OperatingProfit)
    }),
    MetricDef::growth(MetricId::NetProfitGrowth, ChartId::NetProfit, attributable_net_profit),
    MetricDef::growth(MetricId::GrossProfitGrowth, ChartId::GrossProfit, gross_profit),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::test_support::table;
    use crate::fields::Field;
    use crate::formula::{NaReason, Unit};
    use crate::labels::Language;

    #[test]
    fn test_revenue_growth_with_missing_latest_period() {
        let income = table(
            StatementKind::Income,
            &[2021, 2022, 2023],
            &[(Field::TotalRevenue, vec![Some(100.0), Some(150.0), None])],
        );
        let report = IncomeStatementAnalyzer.analyze(&income).unwrap();
        let growth = &report.metric(MetricId::RevenueGrowth).unwrap().values;

        assert_eq!(growth[0], MetricValue::Na(NaReason::NoPriorPeriod));
        assert!((growth[1].value().unwrap() - 0.50).abs() < 1e-9);
        assert_eq!(growth[2], MetricValue::Na(NaReason::MissingOperand));

        let chart = report.charts.get(&ChartId::Revenue).unwrap();
        assert_eq!(chart.points.len(), 3);
        assert!(chart.points[2].value.is_na());
    }

    #[test]
    fn test_net_profit_growth_uses_parent_attributable_profit() {
        let income = table(
            StatementKind::Income,
            &[2022, 2023],
            &[(Field::NetProfitAttributableToParent, vec![Some(100.0), Some(150.0)])],
        );
        let report = IncomeStatementAnalyzer.analyze(&income).unwrap();
        let growth = &report.metric(MetricId::NetProfitGrowth).unwrap().values;

        assert_eq!(growth[0], MetricValue::Na(NaReason::NoPriorPeriod));
        assert!((growth[1].value().unwrap() - 0.50).abs() < 1e-9);
        assert!(report.charts.contains_key(&ChartId::NetProfit));
    }

    #[test]
    fn test_net_profit_growth_falls_back_to_consolidated_profit() {
        let income = table(
            StatementKind::Income,
            &[2022, 2023],
            &[
                (Field::NetProfit, vec![Some(200.0), Some(180.0)]),
                (Field::NetProfitAttributableToParent, vec![None, None]),
            ],
        );
        let report = IncomeStatementAnalyzer.analyze(&income).unwrap();
        let growth = &report.metric(MetricId::NetProfitGrowth).unwrap().values;
        assert!((growth[1].value().unwrap() + 0.10).abs() < 1e-9);
    }

    #[test]
    fn test_ebitda_margin_is_a_flagged_approximation() {
        let income = table(
            StatementKind::Income,
            &[2023],
            &[
                (Field::OperatingProfit, vec![Some(200.0)]),
                (Field::AdministrativeExpenses, vec![Some(50.0)]),
                (Field::TotalRevenue, vec![Some(1000.0)]),
            ],
        );
        let report = IncomeStatementAnalyzer.analyze(&income).unwrap();
        let ebitda = report.metric(MetricId::EbitdaMargin).unwrap();

        assert!(ebitda.approximation);
        assert_eq!(ebitda.unit, Unit::Percentage);
        assert!((ebitda.values[0].value().unwrap() - 0.205).abs() < 1e-9);
        assert_eq!(ebitda.values[0].display(ebitda.unit, Language::En), "20.50%");

        let operating = report.metric(MetricId::OperatingMargin).unwrap();
        assert!(!operating.approximation);
        assert!((operating.values[0].value().unwrap() - 0.20).abs() < 1e-9);
    }

    #[test]
    fn test_margins_and_expense_ratios() {
        let income = table(
            StatementKind::Income,
            &[2023],
            &[
                (Field::TotalRevenue, vec![Some(1000.0)]),
                (Field::OperatingRevenue, vec![Some(800.0)]),
                (Field::OperatingCosts, vec![Some(600.0)]),
                (Field::NetProfitAttributableToParent, vec![Some(90.0)]),
                (Field::SellingExpenses, vec![Some(40.0)]),
                (Field::AdministrativeExpenses, vec![Some(30.0)]),
                (Field::RdExpenses, vec![Some(20.0)]),
                (Field::FinancialExpenses, vec![Some(10.0)]),
            ],
        );
        let report = IncomeStatementAnalyzer.analyze(&income).unwrap();
        let at = |id| report.metric(id).unwrap().values[0];

        assert!((at(MetricId::GrossMargin).value().unwrap() - 0.25).abs() < 1e-9);
        assert!((at(MetricId::CostRate).value().unwrap() - 0.75).abs() < 1e-9);
        assert!((at(MetricId::NetMargin).value().unwrap() - 0.09).abs() < 1e-9);
        assert!((at(MetricId::PeriodExpenseRatio).value().unwrap() - 0.10).abs() < 1e-9);
        assert!((at(MetricId::ThreeExpenseRatio).value().unwrap() - 0.10).abs() < 1e-9);
        assert!((at(MetricId::MainBusinessShare).value().unwrap() - 0.80).abs() < 1e-9);
        assert_eq!(
            at(MetricId::InterestCoverage),
            MetricValue::Na(NaReason::MissingOperand)
        );
    }

    #[test]
    fn test_zero_revenue_never_produces_infinity() {
        let income = table(
            StatementKind::Income,
            &[2023],
            &[
                (Field::TotalRevenue, vec![Some(0.0)]),
                (Field::OperatingProfit, vec![Some(10.0)]),
            ],
        );
        let report = IncomeStatementAnalyzer.analyze(&income).unwrap();
        assert_eq!(
            report.metric(MetricId::OperatingMargin).unwrap().values[0],
            MetricValue::Na(NaReason::ZeroDenominator)
        );
    }
}
