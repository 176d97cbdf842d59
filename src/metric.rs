//! Metric identifiers, their categories and units, and the formula table type
//! the statement analyzers are written against.

use crate::fields::Field;
use crate::formula::{MetricValue, Unit};
use crate::labels::Localized;
use crate::table::StatementTable;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    AssetStructure,
    LiabilityStructure,
    CapitalStructure,
    Solvency,
    Profitability,
    ExpenseStructure,
    RevenueQuality,
    Growth,
    CashFlowStructure,
    CashFlowQuality,
    Returns,
    Efficiency,
    Dupont,
}

impl Localized for Category {
    fn labels(&self) -> (&'static str, &'static str) {
        match self {
            Self::AssetStructure => ("资产结构", "Asset Structure"),
            Self::LiabilityStructure => ("负债结构", "Liability Structure"),
            Self::CapitalStructure => ("资本结构", "Capital Structure"),
            Self::Solvency => ("偿债能力", "Solvency"),
            Self::Profitability => ("盈利能力", "Profitability"),
            Self::ExpenseStructure => ("成本费用结构", "Cost and Expense Structure"),
            Self::RevenueQuality => ("收入质量", "Revenue Quality"),
            Self::Growth => ("增长表现", "Growth"),
            Self::CashFlowStructure => ("现金流结构", "Cash-Flow Structure"),
            Self::CashFlowQuality => ("现金流质量", "Cash-Flow Quality"),
            Self::Returns => ("回报能力", "Returns"),
            Self::Efficiency => ("营运效率", "Operating Efficiency"),
            Self::Dupont => ("杜邦分析", "DuPont Decomposition"),
        }
    }
}

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum MetricId {
    // Balance sheet
    CurrentAssetRatio,
    NonCurrentAssetRatio,
    CashToTotalAssets,
    ReceivablesToTotalAssets,
    InventoryToTotalAssets,
    OtherCurrentAssets,
    LongTermAssetRatio,
    CurrentLiabilityRatio,
    NonCurrentLiabilityRatio,
    ShortTermDebtShare,
    LongTermDebtShare,
    DebtToAssets,
    DebtToEquity,
    EquityMultiplier,
    EquityRatio,
    CurrentRatio,
    QuickRatio,
    LiquidityGap,
    TotalAssetsGrowth,
    CurrentAssetsGrowth,
    NonCurrentAssetsGrowth,
    TotalLiabilitiesGrowth,
    EquityGrowth,

    // Income statement
    GrossMargin,
    NetMargin,
    OperatingMargin,
    EbitdaMargin,
    CostRate,
    SellingExpenseRatio,
    AdministrativeExpenseRatio,
    RdExpenseRatio,
    FinancialExpenseRatio,
    PeriodExpenseRatio,
    ThreeExpenseRatio,
    InterestCoverage,
    MainBusinessShare,
    OtherBusinessShare,
    InvestmentIncomeToOperatingProfit,
    RevenueGrowth,
    OperatingProfitGrowth,
    NetProfitGrowth,
    GrossProfitGrowth,

    // Cash-flow statement
    NetOperatingCashFlow,
    NetInvestingCashFlow,
    NetFinancingCashFlow,
    NetCashFlow,
    FreeCashFlow,
    CashReinvestmentRatio,
    OperatingCashFlowGrowth,

    // Cross-statement
    ReturnOnAssets,
    ReturnOnEquity,
    ReceivablesTurnover,
    InventoryTurnover,
    AssetTurnover,
    ReceivableDays,
    InventoryDays,
    ReceivablesToRevenue,
    InventoryToRevenue,
    CapexIntensity,
    OperatingCashFlowToNetProfit,
    DupontNetMargin,
    DupontAssetTurnover,
    DupontEquityMultiplier,
    DupontRoe,
}

impl MetricId {
    pub const fn category(self) -> Category {
        use MetricId::*;
        match self {
            CurrentAssetRatio | NonCurrentAssetRatio | CashToTotalAssets
            | ReceivablesToTotalAssets | InventoryToTotalAssets | OtherCurrentAssets
            | LongTermAssetRatio => Category::AssetStructure,

            CurrentLiabilityRatio | NonCurrentLiabilityRatio | ShortTermDebtShare
            | LongTermDebtShare => Category::LiabilityStructure,

            DebtToAssets | DebtToEquity | EquityMultiplier | EquityRatio => {
                Category::CapitalStructure
            }

            CurrentRatio | QuickRatio | LiquidityGap | InterestCoverage => Category::Solvency,

            GrossMargin | NetMargin | OperatingMargin | EbitdaMargin => Category::Profitability,

            CostRate | SellingExpenseRatio | AdministrativeExpenseRatio | RdExpenseRatio
            | FinancialExpenseRatio | PeriodExpenseRatio | ThreeExpenseRatio => {
                Category::ExpenseStructure
            }

            MainBusinessShare | OtherBusinessShare | InvestmentIncomeToOperatingProfit => {
                Category::RevenueQuality
            }

            TotalAssetsGrowth | CurrentAssetsGrowth | NonCurrentAssetsGrowth
            | TotalLiabilitiesGrowth | EquityGrowth | RevenueGrowth | OperatingProfitGrowth
            | NetProfitGrowth | GrossProfitGrowth | OperatingCashFlowGrowth => Category::Growth,

            NetOperatingCashFlow | NetInvestingCashFlow | NetFinancingCashFlow | NetCashFlow => {
                Category::CashFlowStructure
            }

            FreeCashFlow | CashReinvestmentRatio | OperatingCashFlowToNetProfit
            | CapexIntensity => Category::CashFlowQuality,

            ReturnOnAssets | ReturnOnEquity => Category::Returns,

            ReceivablesTurnover | InventoryTurnover | AssetTurnover | ReceivableDays
            | InventoryDays | ReceivablesToRevenue | InventoryToRevenue => Category::Efficiency,

            DupontNetMargin | DupontAssetTurnover | DupontEquityMultiplier | DupontRoe => {
                Category::Dupont
            }
        }
    }

    pub const fn unit(self) -> Unit {
        use MetricId::*;
        match self {
            OtherCurrentAssets | LiquidityGap | NetOperatingCashFlow | NetInvestingCashFlow
            | NetFinancingCashFlow | NetCashFlow | FreeCashFlow => Unit::Currency,

            DebtToEquity | EquityMultiplier | CurrentRatio | QuickRatio | InterestCoverage
            | ReceivablesTurnover | InventoryTurnover | AssetTurnover | ReceivableDays
            | InventoryDays | OperatingCashFlowToNetProfit | DupontAssetTurnover
            | DupontEquityMultiplier => Unit::Ratio,

            _ => Unit::Percentage,
        }
    }

    /// Metrics computed from a proxy rather than the exact definition.
    pub const fn is_approximation(self) -> bool {
        matches!(self, Self::EbitdaMargin)
    }
}

impl Localized for MetricId {
    fn labels(&self) -> (&'static str, &'static str) {
        match self {
            Self::CurrentAssetRatio => ("流动资产占比", "Current Assets to Total Assets"),
            Self::NonCurrentAssetRatio => ("非流动资产占比", "Non-current Assets to Total Assets"),
            Self::CashToTotalAssets => ("货币资金占比", "Cash to Total Assets"),
            Self::ReceivablesToTotalAssets => ("应收账款占比", "Receivables to Total Assets"),
            Self::InventoryToTotalAssets => ("存货占比", "Inventory to Total Assets"),
            Self::OtherCurrentAssets => ("其他流动资产", "Other Current Assets"),
            Self::LongTermAssetRatio => ("长期资产占比", "Long-term Assets to Total Assets"),
            Self::CurrentLiabilityRatio => ("流动负债占总资产比", "Current Liabilities to Total Assets"),
            Self::NonCurrentLiabilityRatio => {
                ("非流动负债占总资产比", "Non-current Liabilities to Total Assets")
            }
            Self::ShortTermDebtShare => ("短债占比", "Short-term Debt Share"),
            Self::LongTermDebtShare => ("长期负债占比", "Long-term Liability Share"),
            Self::DebtToAssets => ("资产负债率", "Debt to Assets"),
            Self::DebtToEquity => ("产权比率", "Debt to Equity"),
            Self::EquityMultiplier => ("权益乘数", "Equity Multiplier"),
            Self::EquityRatio => ("股东权益比率", "Equity Ratio"),
            Self::CurrentRatio => ("流动比率", "Current Ratio"),
            Self::QuickRatio => ("速动比率", "Quick Ratio"),
            Self::LiquidityGap => ("流动性缺口", "Liquidity Gap"),
            Self::TotalAssetsGrowth => ("总资产增长率", "Total Assets Growth"),
            Self::CurrentAssetsGrowth => ("流动资产增长率", "Current Assets Growth"),
            Self::NonCurrentAssetsGrowth => ("非流动资产增长率", "Non-current Assets Growth"),
            Self::TotalLiabilitiesGrowth => ("负债增长率", "Total Liabilities Growth"),
            Self::EquityGrowth => ("股东权益增长率", "Equity Growth"),
            Self::GrossMargin => ("毛利率", "Gross Margin"),
            Self::NetMargin => ("净利率", "Net Margin"),
            Self::OperatingMargin => ("营业利润率", "Operating Margin"),
            Self::EbitdaMargin => ("EBITDA利润率（近似）", "EBITDA Margin (approx.)"),
            Self::CostRate => ("成本率", "Cost Rate"),
            Self::SellingExpenseRatio => ("销售费用率", "Selling Expense Ratio"),
            Self::AdministrativeExpenseRatio => ("管理费用率", "Administrative Expense Ratio"),
            Self::RdExpenseRatio => ("研发费用率", "R&D Expense Ratio"),
            Self::FinancialExpenseRatio => ("财务费用率", "Financial Expense Ratio"),
            Self::PeriodExpenseRatio => ("期间费用率", "Period Expense Ratio"),
            Self::ThreeExpenseRatio => ("三费率", "Three-Expense Ratio"),
            Self::InterestCoverage => ("利息保障倍数", "Interest Coverage"),
            Self::MainBusinessShare => ("主营业务收入占比", "Main Business Revenue Share"),
            Self::OtherBusinessShare => ("其他业务收入占比", "Other Business Revenue Share"),
            Self::InvestmentIncomeToOperatingProfit => {
                ("投资收益占营业利润比", "Investment Income to Operating Profit")
            }
            Self::RevenueGrowth => ("营收增长率", "Revenue Growth"),
            Self::OperatingProfitGrowth => ("营业利润增长率", "Operating Profit Growth"),
            Self::NetProfitGrowth => ("净利润增长率", "Net Profit Growth"),
            Self::GrossProfitGrowth => ("毛利增长率", "Gross Profit Growth"),
            Self::NetOperatingCashFlow => ("经营活动现金流量净额", "Net Operating Cash Flow"),
            Self::NetInvestingCashFlow => ("投资活动现金流量净额", "Net Investing Cash Flow"),
            Self::NetFinancingCashFlow => ("筹资活动现金流量净额", "Net Financing Cash Flow"),
            Self::NetCashFlow => ("现金净流量", "Net Cash Flow"),
            Self::FreeCashFlow => ("自由现金流", "Free Cash Flow"),
            Self::CashReinvestmentRatio => ("现金再投资比率", "Cash Reinvestment Ratio"),
            Self::OperatingCashFlowGrowth => ("经营现金流增长率", "Operating Cash Flow Growth"),
            Self::ReturnOnAssets => ("总资产收益率", "Return on Assets"),
            Self::ReturnOnEquity => ("净资产收益率", "Return on Equity"),
            Self::ReceivablesTurnover => ("应收账款周转率", "Receivables Turnover"),
            Self::InventoryTurnover => ("存货周转率", "Inventory Turnover"),
            Self::AssetTurnover => ("总资产周转率", "Total Asset Turnover"),
            Self::ReceivableDays => ("应收账款周转天数", "Receivable Days"),
            Self::InventoryDays => ("存货周转天数", "Inventory Days"),
            Self::ReceivablesToRevenue => ("应收/营收", "Receivables to Revenue"),
            Self::InventoryToRevenue => ("存货/营收", "Inventory to Revenue"),
            Self::CapexIntensity => ("资本开支率", "Capital Expenditure Intensity"),
            Self::OperatingCashFlowToNetProfit => {
                ("经营现金流/净利润比", "Operating Cash Flow to Net Profit")
            }
            Self::DupontNetMargin => ("销售净利率", "Net Profit Margin"),
            Self::DupontAssetTurnover => ("资产周转率", "Asset Turnover"),
            Self::DupontEquityMultiplier => ("平均权益乘数", "Average Equity Multiplier"),
            Self::DupontRoe => ("杜邦ROE", "DuPont ROE"),
        }
    }
}

/// Amount series that are charted as a trend alongside their growth rate.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum ChartId {
    TotalAssets,
    CurrentAssets,
    NonCurrentAssets,
    TotalLiabilities,
    Equity,
    Revenue,
    OperatingProfit,
    NetProfit,
    GrossProfit,
    OperatingCashFlow,
    DupontRoe,
}

impl ChartId {
    /// Language-independent file-name fragment.
    pub const fn slug(self) -> &'static str {
        match self {
            Self::TotalAssets => "total_assets_trend",
            Self::CurrentAssets => "current_assets_trend",
            Self::NonCurrentAssets => "non_current_assets_trend",
            Self::TotalLiabilities => "total_liabilities_trend",
            Self::Equity => "equity_trend",
            Self::Revenue => "revenue_trend",
            Self::OperatingProfit => "operating_profit_trend",
            Self::NetProfit => "net_profit_trend",
            Self::GrossProfit => "gross_profit_trend",
            Self::OperatingCashFlow => "operating_cash_flow_trend",
            Self::DupontRoe => "dupont_trend",
        }
    }
}

impl Localized for ChartId {
    fn labels(&self) -> (&'static str, &'static str) {
        match self {
            Self::TotalAssets => ("总资产变动趋势", "Total Assets Trend"),
            Self::CurrentAssets => ("流动资产变动趋势", "Current Assets Trend"),
            Self::NonCurrentAssets => ("非流动资产变动趋势", "Non-current Assets Trend"),
            Self::TotalLiabilities => ("负债总额变动趋势", "Total Liabilities Trend"),
            Self::Equity => ("股东权益变动趋势", "Equity Trend"),
            Self::Revenue => ("营业收入趋势", "Revenue Trend"),
            Self::OperatingProfit => ("营业利润趋势", "Operating Profit Trend"),
            Self::NetProfit => ("净利润趋势", "Net Profit Trend"),
            Self::GrossProfit => ("毛利趋势", "Gross Profit Trend"),
            Self::OperatingCashFlow => ("经营现金流趋势", "Operating Cash Flow Trend"),
            Self::DupontRoe => ("杜邦ROE趋势", "DuPont ROE Trend"),
        }
    }
}

/// Read access to one period of a statement table, lifting cells into
/// [`MetricValue`]s.
#[derive(Debug, Clone, Copy)]
pub struct PeriodView<'a> {
    table: &'a StatementTable,
    index: usize,
}

impl<'a> PeriodView<'a> {
    pub fn new(table: &'a StatementTable, index: usize) -> Self {
        Self { table, index }
    }

    pub fn get(&self, field: Field) -> MetricValue {
        MetricValue::operand(self.table.value(field, self.index))
    }

    /// Sum of the fields; NA if any of them is absent.
    pub fn sum(&self, fields: &[Field]) -> MetricValue {
        fields
            .iter()
            .fold(MetricValue::Value(0.0), |acc, field| acc + self.get(*field))
    }
}

pub type PointFormula = fn(&PeriodView<'_>) -> MetricValue;

#[derive(Clone, Copy)]
pub enum Formula {
    /// Evaluated independently for each period.
    Point(PointFormula),
    /// Period-over-period change of an amount that is also charted.
    Growth { chart: ChartId, amount: PointFormula },
}

#[derive(Clone, Copy)]
pub struct MetricDef {
    pub id: MetricId,
    pub formula: Formula,
}

impl MetricDef {
    pub const fn point(id: MetricId, formula: PointFormula) -> Self {
        Self {
            id,
            formula: Formula::Point(formula),
        }
    }

    pub const fn growth(id: MetricId, chart: ChartId, amount: PointFormula) -> Self {
        Self {
            id,
            formula: Formula::Growth { chart, amount },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labels::Language;
    use crate::period::Period;
    use crate::schema::StatementKind;
    use std::collections::BTreeMap;

    #[test]
    fn test_units_and_categories() {
        assert_eq!(MetricId::DebtToAssets.unit(), Unit::Percentage);
        assert_eq!(MetricId::EquityMultiplier.unit(), Unit::Ratio);
        assert_eq!(MetricId::FreeCashFlow.unit(), Unit::Currency);
        assert_eq!(MetricId::EbitdaMargin.category(), Category::Profitability);
        assert!(MetricId::EbitdaMargin.is_approximation());
        assert!(!MetricId::GrossMargin.is_approximation());
    }

    #[test]
    fn test_metric_serializes_as_snake_case_key() {
        assert_eq!(
            serde_json::to_string(&MetricId::DebtToEquity).unwrap(),
            "\"debt_to_equity\""
        );
        assert_eq!(MetricId::DebtToEquity.label(Language::Zh), "产权比率");
    }

    #[test]
    fn test_period_view_sum_requires_every_operand() {
        let mut fields = BTreeMap::new();
        fields.insert(Field::SellingExpenses, vec![Some(10.0)]);
        fields.insert(Field::AdministrativeExpenses, vec![Some(5.0)]);
        let table = StatementTable::new(
            StatementKind::Income,
            vec![Period::from_ymd(2023, 12, 31).unwrap()],
            fields,
        )
        .unwrap();

        let view = PeriodView::new(&table, 0);
        assert_eq!(
            view.sum(&[Field::SellingExpenses, Field::AdministrativeExpenses]),
            MetricValue::Value(15.0)
        );
        assert!(view
            .sum(&[Field::SellingExpenses, Field::RdExpenses])
            .is_na());
    }
}
