use super::StatementAnalyzer;
use crate::fields::Field::*;
use crate::formula::MetricValue;
use crate::metric::{ChartId, MetricDef, MetricId, PeriodView};
use crate::schema::StatementKind;

#[derive(Debug, Clone, Copy, Default)]
pub struct BalanceSheetAnalyzer;

impl StatementAnalyzer for BalanceSheetAnalyzer {
    fn statement(&self) -> StatementKind {
        StatementKind::Balance
    }

    fn formulas(&self) -> &'static [MetricDef] {
        FORMULAS
    }
}

fn short_term_debt(v: &PeriodView<'_>) -> MetricValue {
    v.sum(&[ShortTermBorrowings, NonCurrentLiabilitiesDueWithinOneYear])
}

fn long_term_assets(v: &PeriodView<'_>) -> MetricValue {
    v.sum(&[FixedAssets, ConstructionInProgress, InvestmentProperty])
}

const FORMULAS: &[MetricDef] = &[
    // Asset structure
    MetricDef::point(MetricId::CurrentAssetRatio, |v| {
        v.get(TotalCurrentAssets) / v.get(TotalAssets)
    }),
    MetricDef::point(MetricId::NonCurrentAssetRatio, |v| {
        v.get(TotalNonCurrentAssets) / v.get(TotalAssets)
    }),
    MetricDef::point(MetricId::CashToTotalAssets, |v| {
        v.get(CashAndEquivalents) / v.get(TotalAssets)
    }),
    MetricDef::point(MetricId::ReceivablesToTotalAssets, |v| {
        v.get(AccountsReceivable) / v.get(TotalAssets)
    }),
    MetricDef::point(MetricId::InventoryToTotalAssets, |v| {
        v.get(Inventories) / v.get(TotalAssets)
    }),
    MetricDef::point(MetricId::OtherCurrentAssets, |v| {
        v.get(TotalCurrentAssets) - v.sum(&[CashAndEquivalents, AccountsReceivable, Inventories])
    }),
    MetricDef::point(MetricId::LongTermAssetRatio, |v| {
        long_term_assets(v) / v.get(TotalAssets)
    }),
    // Liability structure
    MetricDef::point(MetricId::CurrentLiabilityRatio, |v| {
        v.get(TotalCurrentLiabilities) / v.get(TotalAssets)
    }),
    MetricDef::point(MetricId::NonCurrentLiabilityRatio, |v| {
        v.get(TotalNonCurrentLiabilities) / v.get(TotalAssets)
    }),
    MetricDef::point(MetricId::ShortTermDebtShare, |v| {
        short_term_debt(v) / v.get(TotalLiabilities)
    }),
    MetricDef::point(MetricId::LongTermDebtShare, |v| {
        v.get(TotalNonCurrentLiabilities) / v.get(TotalLiabilities)
    }),
    // Capital structure
    MetricDef::point(MetricId::DebtToAssets, |v| {
        v.get(TotalLiabilities) / v.get(TotalAssets)
    }),
    MetricDef::point(MetricId::DebtToEquity, |v| {
        v.get(TotalLiabilities) / v.get(ShareholdersEquity)
    }),
    MetricDef::point(MetricId::EquityMultiplier, |v| {
        v.get(TotalAssets) / v.get(ShareholdersEquity)
    }),
    MetricDef::point(MetricId::EquityRatio, |v| {
        v.get(ShareholdersEquity) / v.get(TotalAssets)
    }),
    // Solvency
    MetricDef::point(MetricId::CurrentRatio, |v| {
        v.get(TotalCurrentAssets) / v.get(TotalCurrentLiabilities)
    }),
    MetricDef::point(MetricId::QuickRatio, |v| {
        (v.get(TotalCurrentAssets) - v.get(Inventories)) / v.get(TotalCurrentLiabilities)
    }),
    MetricDef::point(MetricId::LiquidityGap, |v| {
        v.sum(&[CashAndEquivalents, TradingFinancialAssets]) - short_term_debt(v)
    }),
    // Growth
    MetricDef::growth(MetricId::TotalAssetsGrowth, ChartId::TotalAssets, |v| {
        v.get(TotalAssets)
    }),
    MetricDef::growth(MetricId::CurrentAssetsGrowth, ChartId::CurrentAssets, |v| {
        v.get(TotalCurrentAssets)
    }),
    MetricDef::growth(MetricId::NonCurrentAssetsGrowth, ChartId::NonCurrentAssets, |v| {
        v.get(TotalNonCurrentAssets)
    }),
    MetricDef::growth(MetricId::TotalLiabilitiesGrowth, ChartId::TotalLiabilities, |v| {
        v.get(TotalLiabilities)
    }),
    MetricDef::growth(MetricId::EquityGrowth, ChartId::Equity, |v| {
        v.get(ShareholdersEquity)
    }),
];
