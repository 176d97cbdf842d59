//! Canonical, language-neutral field vocabulary.
//!
//! Source systems deliver statement columns under English or Chinese labels.
//! Every label is resolved onto a [`Field`] once at ingestion; from there on the
//! engine only ever sees canonical identifiers.

use crate::labels::Localized;
use crate::schema::StatementKind;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, JsonSchema,
)]
pub enum Field {
    // Balance sheet
    TotalAssets,
    TotalCurrentAssets,
    TotalNonCurrentAssets,
    CashAndEquivalents,
    TradingFinancialAssets,
    AccountsReceivable,
    Inventories,
    FixedAssets,
    ConstructionInProgress,
    InvestmentProperty,
    TotalCurrentLiabilities,
    TotalNonCurrentLiabilities,
    TotalLiabilities,
    ShortTermBorrowings,
    NonCurrentLiabilitiesDueWithinOneYear,
    ShareholdersEquity,
    PaidInCapital,
    CapitalReserve,
    SurplusReserve,
    RetainedEarnings,

    // Income statement
    TotalRevenue,
    OperatingRevenue,
    OtherBusinessRevenue,
    OperatingCosts,
    SellingExpenses,
    AdministrativeExpenses,
    RdExpenses,
    FinancialExpenses,
    InterestExpenses,
    InvestmentIncome,
    OperatingProfit,
    IncomeTax,
    NetProfit,
    NetProfitAttributableToParent,

    // Cash-flow statement
    NetOperatingCashFlow,
    NetInvestingCashFlow,
    NetFinancingCashFlow,
    CapitalExpenditure,
    DepreciationAmortization,
}

impl Field {
    pub const ALL: [Field; 39] = [
        Self::TotalAssets,
        Self::TotalCurrentAssets,
        Self::TotalNonCurrentAssets,
        Self::CashAndEquivalents,
        Self::TradingFinancialAssets,
        Self::AccountsReceivable,
        Self::Inventories,
        Self::FixedAssets,
        Self::ConstructionInProgress,
        Self::InvestmentProperty,
        Self::TotalCurrentLiabilities,
        Self::TotalNonCurrentLiabilities,
        Self::TotalLiabilities,
        Self::ShortTermBorrowings,
        Self::NonCurrentLiabilitiesDueWithinOneYear,
        Self::ShareholdersEquity,
        Self::PaidInCapital,
        Self::CapitalReserve,
        Self::SurplusReserve,
        Self::RetainedEarnings,
        Self::TotalRevenue,
        Self::OperatingRevenue,
        Self::OtherBusinessRevenue,
        Self::OperatingCosts,
        Self::SellingExpenses,
        Self::AdministrativeExpenses,
        Self::RdExpenses,
        Self::FinancialExpenses,
        Self::InterestExpenses,
        Self::InvestmentIncome,
        Self::OperatingProfit,
        Self::IncomeTax,
        Self::NetProfit,
        Self::NetProfitAttributableToParent,
        Self::NetOperatingCashFlow,
        Self::NetInvestingCashFlow,
        Self::NetFinancingCashFlow,
        Self::CapitalExpenditure,
        Self::DepreciationAmortization,
    ];

    /// The statement this field is reported on.
    pub const fn statement(self) -> StatementKind {
        match self {
            Self::TotalAssets
            | Self::TotalCurrentAssets
            | Self::TotalNonCurrentAssets
            | Self::CashAndEquivalents
            | Self::TradingFinancialAssets
            | Self::AccountsReceivable
            | Self::Inventories
            | Self::FixedAssets
            | Self::ConstructionInProgress
            | Self::InvestmentProperty
            | Self::TotalCurrentLiabilities
            | Self::TotalNonCurrentLiabilities
            | Self::TotalLiabilities
            | Self::ShortTermBorrowings
            | Self::NonCurrentLiabilitiesDueWithinOneYear
            | Self::ShareholdersEquity
            | Self::PaidInCapital
            | Self::CapitalReserve
            | Self::SurplusReserve
            | Self::RetainedEarnings => StatementKind::Balance,

            Self::TotalRevenue
            | Self::OperatingRevenue
            | Self::OtherBusinessRevenue
            | Self::OperatingCosts
            | Self::SellingExpenses
            | Self::AdministrativeExpenses
            | Self::RdExpenses
            | Self::FinancialExpenses
            | Self::InterestExpenses
            | Self::InvestmentIncome
            | Self::OperatingProfit
            | Self::IncomeTax
            | Self::NetProfit
            | Self::NetProfitAttributableToParent => StatementKind::Income,

            Self::NetOperatingCashFlow
            | Self::NetInvestingCashFlow
            | Self::NetFinancingCashFlow
            | Self::CapitalExpenditure
            | Self::DepreciationAmortization => StatementKind::CashFlow,
        }
    }

    /// Additional source spellings beyond the two display labels.
    const fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::TotalCurrentAssets => &["Current Assets"],
            Self::AccountsReceivable => &["Notes and Accounts Receivable", "应收票据及应收账款"],
            Self::TotalCurrentLiabilities => &["Current Liabilities"],
            Self::ShareholdersEquity => &[
                "Total Owner's Equity (or Shareholders' Equity)",
                "Total Equity Attributable to Shareholders of the Parent Company",
                "归属于母公司股东权益合计",
            ],
            Self::PaidInCapital => &["Paid-in Capital (or Share Capital)"],
            Self::RdExpenses => &["Research and Development Expenses"],
            Self::IncomeTax => &["Income Tax Expenses"],
            Self::CapitalExpenditure => &[
                "Cash Paid for Acquisition of Fixed Assets, Intangible Assets, and Other Long-term Assets",
            ],
            _ => &[],
        }
    }

    /// Resolves a source-native label (either language, or one of the known
    /// aliases) onto the canonical vocabulary.
    pub fn from_label(label: &str) -> Option<Self> {
        let needle = label.trim();
        Self::ALL.into_iter().find(|field| {
            let (zh, en) = field.labels();
            needle == zh
                || needle.eq_ignore_ascii_case(en)
                || field
                    .aliases()
                    .iter()
                    .any(|alias| needle.eq_ignore_ascii_case(alias))
        })
    }
}

impl Localized for Field {
    fn labels(&self) -> (&'static str, &'static str) {
        match self {
            Self::TotalAssets => ("资产总计", "Total Assets"),
            Self::TotalCurrentAssets => ("流动资产合计", "Total Current Assets"),
            Self::TotalNonCurrentAssets => ("非流动资产合计", "Total Non-current Assets"),
            Self::CashAndEquivalents => ("货币资金", "Cash and Cash Equivalents"),
            Self::TradingFinancialAssets => ("交易性金融资产", "Trading Financial Assets"),
            Self::AccountsReceivable => ("应收账款", "Accounts Receivable"),
            Self::Inventories => ("存货", "Inventories"),
            Self::FixedAssets => ("固定资产", "Fixed Assets"),
            Self::ConstructionInProgress => ("在建工程", "Construction in Progress"),
            Self::InvestmentProperty => ("投资性房地产", "Investment Property"),
            Self::TotalCurrentLiabilities => ("流动负债合计", "Total Current Liabilities"),
            Self::TotalNonCurrentLiabilities => ("非流动负债合计", "Total Non-current Liabilities"),
            Self::TotalLiabilities => ("负债合计", "Total Liabilities"),
            Self::ShortTermBorrowings => ("短期借款", "Short-term Borrowings"),
            Self::NonCurrentLiabilitiesDueWithinOneYear => (
                "一年内到期的非流动负债",
                "Non-current Liabilities Due within One Year",
            ),
            Self::ShareholdersEquity => ("所有者权益(或股东权益)合计", "Shareholders' Equity"),
            Self::PaidInCapital => ("实收资本(或股本)", "Paid-in Capital"),
            Self::CapitalReserve => ("资本公积", "Capital Reserve"),
            Self::SurplusReserve => ("盈余公积", "Surplus Reserve"),
            Self::RetainedEarnings => ("未分配利润", "Retained Earnings"),
            Self::TotalRevenue => ("营业总收入", "Total Operating Revenue"),
            Self::OperatingRevenue => ("营业收入", "Operating Revenue"),
            Self::OtherBusinessRevenue => ("其他业务收入", "Other Business Revenue"),
            Self::OperatingCosts => ("营业成本", "Operating Costs"),
            Self::SellingExpenses => ("销售费用", "Selling Expenses"),
            Self::AdministrativeExpenses => ("管理费用", "Administrative Expenses"),
            Self::RdExpenses => ("研发费用", "R&D Expenses"),
            Self::FinancialExpenses => ("财务费用", "Financial Expenses"),
            Self::InterestExpenses => ("利息费用", "Interest Expenses"),
            Self::InvestmentIncome => ("投资收益", "Investment Income"),
            Self::OperatingProfit => ("营业利润", "Operating Profit"),
            Self::IncomeTax => ("所得税费用", "Income Tax"),
            Self::NetProfit => ("净利润", "Net Profit"),
            Self::NetProfitAttributableToParent => {
                ("归属于母公司所有者的净利润", "Net Profit Attributable to Parent")
            }
            Self::NetOperatingCashFlow => (
                "经营活动产生的现金流量净额",
                "Net Cash Flow from Operating Activities",
            ),
            Self::NetInvestingCashFlow => (
                "投资活动产生的现金流量净额",
                "Net Cash Flow from Investing Activities",
            ),
            Self::NetFinancingCashFlow => (
                "筹资活动产生的现金流量净额",
                "Net Cash Flow from Financing Activities",
            ),
            Self::CapitalExpenditure => (
                "购建固定资产、无形资产和其他长期资产支付的现金",
                "Capital Expenditure",
            ),
            Self::DepreciationAmortization => ("折旧与摊销", "Depreciation and Amortization"),
        }
    }
}
