use super::StatementAnalyzer;
use crate::fields::Field::*;
use crate::metric::{ChartId, MetricDef, MetricId};
use crate::schema::StatementKind;

#[derive(Debug, Clone, Copy, Default)]
pub struct CashFlowAnalyzer;

impl StatementAnalyzer for CashFlowAnalyzer {
    fn statement(&self) -> StatementKind {
        StatementKind::CashFlow
    }

    fn formulas(&self) -> &'static [MetricDef] {
        FORMULAS
    }
}

// Net flows are reported as-is; a negative value is an outflow.
const FORMULAS: &[MetricDef] = &[
    MetricDef::point(MetricId::NetOperatingCashFlow, |v| v.get(NetOperatingCashFlow)),
    MetricDef::point(MetricId::NetInvestingCashFlow, |v| v.get(NetInvestingCashFlow)),
    MetricDef::point(MetricId::NetFinancingCashFlow, |v| v.get(NetFinancingCashFlow)),
    MetricDef::point(MetricId::NetCashFlow, |v| {
        v.sum(&[NetOperatingCashFlow, NetInvestingCashFlow, NetFinancingCashFlow])
    }),
    MetricDef::point(MetricId::FreeCashFlow, |v| {
        v.get(NetOperatingCashFlow) - v.get(CapitalExpenditure)
    }),
    MetricDef::point(MetricId::CashReinvestmentRatio, |v| {
        (v.get(CapitalExpenditure) - v.get(DepreciationAmortization)) / v.get(NetOperatingCashFlow)
    }),
    MetricDef::growth(MetricId::OperatingCashFlowGrowth, ChartId::OperatingCashFlow, |v| {
        v.get(NetOperatingCashFlow)
    }),
];
