//! Structural anomaly rules evaluated over statements joined by period.
//!
//! Every rule reads only present values: an NA input can never trigger a
//! finding.

use crate::error::{AnalysisError, Result};
use crate::formula::MetricValue;
use crate::labels::{Language, Localized};
use crate::period::Period;
use crate::trend::pct_change;
use crate::utils::{mean, median, quantile};
use schemars::JsonSchema;
use serde::Serialize;

const HIGH_GROWTH: f64 = 0.30;
const REVERSAL_LEG: f64 = 0.20;
const REVERSAL_AMPLITUDE: f64 = 0.40;
const RATIO_SHIFT: f64 = 0.15;
const RATIO_SHIFT_SEVERE: f64 = 0.25;
const IQR_FENCE: f64 = 1.5;
const WEAK_CASH_CONVERSION: f64 = 0.8;
const SHORT_DEBT_HEAVY: f64 = 0.70;
const LONG_ASSET_HEAVY: f64 = 0.50;
const TURNOVER_DAYS_JUMP: f64 = 30.0;
const SLOW_REVENUE_GROWTH: f64 = 0.10;
const CAPEX_HEAVY: f64 = 0.30;
const CAPEX_UPLIFT: f64 = 0.15;
const CAPITALIZATION_SHIFT: f64 = 0.10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyRule {
    ContinuousVolatility,
    CostExpenseShift,
    AssetLiabilityMismatch,
    CashProfitDivergence,
    ReceivablesInventory,
    CapexCapitalization,
}

impl Localized for AnomalyRule {
    fn labels(&self) -> (&'static str, &'static str) {
        match self {
            Self::ContinuousVolatility => ("连续波动异常", "Continuous Volatility"),
            Self::CostExpenseShift => ("成本/费用率反常", "Cost/Expense Ratio Shift"),
            Self::AssetLiabilityMismatch => ("资产负债错配", "Asset/Liability Mismatch"),
            Self::CashProfitDivergence => ("现金流与利润背离", "Cash/Profit Divergence"),
            Self::ReceivablesInventory => ("应收/存货异常", "Receivables/Inventory Anomaly"),
            Self::CapexCapitalization => {
                ("资本开支/费用资本化异常", "Capex/Capitalization Anomaly")
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AnomalySubject {
    Revenue,
    NetProfit,
    OperatingCashFlow,
    CostRate,
    ThreeExpenseRatio,
    RdExpenseRatio,
    Liquidity,
    MaturityMismatch,
    CashToProfit,
    ProfitQuality,
    ReceivableTurnover,
    InventoryTurnover,
    ReceivablesToRevenue,
    InventoryToRevenue,
    CapexIntensity,
    CapitalizationTendency,
}

impl Localized for AnomalySubject {
    fn labels(&self) -> (&'static str, &'static str) {
        match self {
            Self::Revenue => ("营业收入", "Revenue"),
            Self::NetProfit => ("净利润", "Net Profit"),
            Self::OperatingCashFlow => ("经营现金流", "Operating Cash Flow"),
            Self::CostRate => ("成本率", "Cost Rate"),
            Self::ThreeExpenseRatio => ("三费率", "Three-Expense Ratio"),
            Self::RdExpenseRatio => ("研发费用率", "R&D Expense Ratio"),
            Self::Liquidity => ("流动性", "Liquidity"),
            Self::MaturityMismatch => ("期限错配", "Maturity Mismatch"),
            Self::CashToProfit => ("现金流/净利润", "Cash Flow to Net Profit"),
            Self::ProfitQuality => ("利润质量", "Profit Quality"),
            Self::ReceivableTurnover => ("应收周转", "Receivable Turnover"),
            Self::InventoryTurnover => ("存货周转", "Inventory Turnover"),
            Self::ReceivablesToRevenue => ("应收/营收", "Receivables to Revenue"),
            Self::InventoryToRevenue => ("存货/营收", "Inventory to Revenue"),
            Self::CapexIntensity => ("资本开支率", "Capex Intensity"),
            Self::CapitalizationTendency => ("资本化倾向", "Capitalization Tendency"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct Anomaly {
    pub rule: AnomalyRule,
    pub rule_label: String,
    pub subject: AnomalySubject,
    pub subject_label: String,
    pub period: Period,
    /// 1 (mild) to 3 (severe).
    pub severity: u8,
    pub detail: String,
}

/// Series the rules read, aligned with `periods`.
#[derive(Debug, Clone, Default)]
pub struct JoinedSeries {
    pub periods: Vec<Period>,
    pub revenue: Vec<MetricValue>,
    pub net_profit: Vec<MetricValue>,
    pub operating_cash_flow: Vec<MetricValue>,
    pub cost_rate: Vec<MetricValue>,
    pub three_expense_ratio: Vec<MetricValue>,
    pub rd_expense_ratio: Vec<MetricValue>,
    pub current_ratio: Vec<MetricValue>,
    pub liquidity_gap: Vec<MetricValue>,
    pub short_term_debt_share: Vec<MetricValue>,
    pub long_term_asset_ratio: Vec<MetricValue>,
    pub ocf_to_net_profit: Vec<MetricValue>,
    pub receivable_days: Vec<MetricValue>,
    pub inventory_days: Vec<MetricValue>,
    pub receivables_to_revenue: Vec<MetricValue>,
    pub inventory_to_revenue: Vec<MetricValue>,
    pub capex_intensity: Vec<MetricValue>,
}

impl JoinedSeries {
    fn named(&self) -> [(&'static str, &[MetricValue]); 16] {
        [
            ("revenue", &self.revenue),
            ("net_profit", &self.net_profit),
            ("operating_cash_flow", &self.operating_cash_flow),
            ("cost_rate", &self.cost_rate),
            ("three_expense_ratio", &self.three_expense_ratio),
            ("rd_expense_ratio", &self.rd_expense_ratio),
            ("current_ratio", &self.current_ratio),
            ("liquidity_gap", &self.liquidity_gap),
            ("short_term_debt_share", &self.short_term_debt_share),
            ("long_term_asset_ratio", &self.long_term_asset_ratio),
            ("ocf_to_net_profit", &self.ocf_to_net_profit),
            ("receivable_days", &self.receivable_days),
            ("inventory_days", &self.inventory_days),
            ("receivables_to_revenue", &self.receivables_to_revenue),
            ("inventory_to_revenue", &self.inventory_to_revenue),
            ("capex_intensity", &self.capex_intensity),
        ]
    }

    /// Every series must be empty (not reported) or exactly as long as `periods`.
    pub fn validate(&self) -> Result<()> {
        for (name, series) in self.named() {
            if !series.is_empty() && series.len() != self.periods.len() {
                return Err(AnalysisError::SeriesLengthMismatch {
                    series: name.to_string(),
                    expected: self.periods.len(),
                    actual: series.len(),
                });
            }
        }
        Ok(())
    }
}

struct Findings {
    language: Language,
    found: Vec<Anomaly>,
}

impl Findings {
    fn push(
        &mut self,
        rule: AnomalyRule,
        subject: AnomalySubject,
        period: Period,
        severity: u8,
        detail: String,
    ) {
        self.found.push(Anomaly {
            rule,
            rule_label: rule.label(self.language).to_string(),
            subject,
            subject_label: subject.label(self.language).to_string(),
            period,
            severity,
            detail,
        });
    }

    fn zh(&self) -> bool {
        self.language == Language::Zh
    }
}

fn pct(value: f64) -> String {
    format!("{:.1}%", value * 100.0)
}

fn pct2(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}

/// Present values among the last `window` present entries.
fn recent(series: &[MetricValue], window: usize) -> Vec<f64> {
    let present: Vec<f64> = series.iter().filter_map(MetricValue::value).collect();
    let skip = present.len().saturating_sub(window);
    present[skip..].to_vec()
}

fn last_two(series: &[MetricValue]) -> Option<(f64, f64)> {
    match series {
        [.., prev, last] => Some((prev.value()?, last.value()?)),
        _ => None,
    }
}

/// Runs every rule; `window` bounds how many recent periods the
/// ratio-shift rules compare against.
///
/// Fails with [`AnalysisError::SeriesLengthMismatch`] when a series does not
/// line up with the joined periods.
pub fn evaluate(
    joined: &JoinedSeries,
    window: usize,
    language: Language,
) -> Result<Vec<Anomaly>> {
    joined.validate()?;

    let mut findings = Findings {
        language,
        found: Vec::new(),
    };
    let Some(latest) = joined.periods.last().copied() else {
        return Ok(findings.found);
    };

    continuous_volatility(joined, &mut findings);
    cost_expense_shift(joined, window, latest, &mut findings);
    asset_liability_mismatch(joined, latest, &mut findings);
    cash_profit_divergence(joined, latest, &mut findings);
    receivables_inventory(joined, window, latest, &mut findings);
    capex_capitalization(joined, window, latest, &mut findings);

    Ok(findings.found)
}

fn continuous_volatility(joined: &JoinedSeries, findings: &mut Findings) {
    let tracked = [
        (AnomalySubject::Revenue, &joined.revenue),
        (AnomalySubject::NetProfit, &joined.net_profit),
        (AnomalySubject::OperatingCashFlow, &joined.operating_cash_flow),
    ];

    for (subject, series) in tracked {
        let growth = pct_change(series);
        for idx in 2..growth.len() {
            let (Some(prev), Some(curr)) = (growth[idx - 1].value(), growth[idx].value()) else {
                continue;
            };
            let period = joined.periods[idx];

            if curr.abs() > HIGH_GROWTH
                && prev.abs() > HIGH_GROWTH
                && curr.signum() == prev.signum()
            {
                let detail = if findings.zh() {
                    format!("连续两期高增速：上一期{}，本期{}", pct(prev), pct(curr))
                } else {
                    format!(
                        "High growth two periods running: prior {}, current {}",
                        pct(prev),
                        pct(curr)
                    )
                };
                findings.push(AnomalyRule::ContinuousVolatility, subject, period, 2, detail);
            }

            let amplitude = (curr - prev).abs();
            if curr < -REVERSAL_LEG && prev > REVERSAL_LEG && amplitude > REVERSAL_AMPLITUDE {
                let detail = if findings.zh() {
                    format!(
                        "增速剧烈反转：上一期{}，本期{}，幅度{}",
                        pct(prev),
                        pct(curr),
                        pct(amplitude)
                    )
                } else {
                    format!(
                        "Sharp growth reversal: prior {}, current {}, swing {}",
                        pct(prev),
                        pct(curr),
                        pct(amplitude)
                    )
                };
                findings.push(AnomalyRule::ContinuousVolatility, subject, period, 3, detail);
            }
        }
    }
}

fn cost_expense_shift(
    joined: &JoinedSeries,
    window: usize,
    latest: Period,
    findings: &mut Findings,
) {
    let ratios = [
        (AnomalySubject::CostRate, &joined.cost_rate),
        (AnomalySubject::ThreeExpenseRatio, &joined.three_expense_ratio),
        (AnomalySubject::RdExpenseRatio, &joined.rd_expense_ratio),
    ];

    for (subject, series) in ratios {
        let recent = recent(series, window);
        let (Some(&current), Some(mid), Some(q1), Some(q3)) = (
            recent.last(),
            median(&recent),
            quantile(&recent, 0.25),
            quantile(&recent, 0.75),
        ) else {
            continue;
        };

        let iqr = q3 - q1;
        let deviation = current - mid;
        let outside_fence =
            iqr > 0.0 && (current < mid - IQR_FENCE * iqr || current > mid + IQR_FENCE * iqr);

        if deviation.abs() > RATIO_SHIFT || outside_fence {
            let severity = if deviation.abs() < RATIO_SHIFT_SEVERE { 2 } else { 3 };
            let detail = if findings.zh() {
                format!("现值{}，中位数{}，偏离{}", pct2(current), pct2(mid), pct2(deviation))
            } else {
                format!(
                    "Current {}, median {}, deviation {}",
                    pct2(current),
                    pct2(mid),
                    pct2(deviation)
                )
            };
            findings.push(AnomalyRule::CostExpenseShift, subject, latest, severity, detail);
        }
    }
}

fn asset_liability_mismatch(joined: &JoinedSeries, latest: Period, findings: &mut Findings) {
    let last = |series: &[MetricValue]| series.last().and_then(MetricValue::value);

    if let (Some(ratio), Some(gap)) = (last(&joined.current_ratio), last(&joined.liquidity_gap)) {
        if ratio < 1.0 && gap < 0.0 {
            let detail = if findings.zh() {
                format!("流动比率{:.2}且流动缺口{:.0}<0", ratio, gap)
            } else {
                format!("Current ratio {:.2} with a liquidity gap of {:.0}", ratio, gap)
            };
            findings.push(
                AnomalyRule::AssetLiabilityMismatch,
                AnomalySubject::Liquidity,
                latest,
                3,
                detail,
            );
        }
    }

    if let (Some(short_debt), Some(long_assets)) = (
        last(&joined.short_term_debt_share),
        last(&joined.long_term_asset_ratio),
    ) {
        if short_debt > SHORT_DEBT_HEAVY && long_assets > LONG_ASSET_HEAVY {
            let detail = if findings.zh() {
                format!(
                    "短债占比{}，长期资产占比{}，存在短贷长投风险",
                    pct(short_debt),
                    pct(long_assets)
                )
            } else {
                format!(
                    "Short-term debt share {} against long-term asset ratio {}: short-term funding of long-term assets",
                    pct(short_debt),
                    pct(long_assets)
                )
            };
            findings.push(
                AnomalyRule::AssetLiabilityMismatch,
                AnomalySubject::MaturityMismatch,
                latest,
                3,
                detail,
            );
        }
    }
}

fn cash_profit_divergence(joined: &JoinedSeries, latest: Period, findings: &mut Findings) {
    if let Some((prev, last)) = last_two(&joined.ocf_to_net_profit) {
        if prev < WEAK_CASH_CONVERSION && last < WEAK_CASH_CONVERSION {
            let detail = if findings.zh() {
                format!("近两期经营现金流/净利润均低于0.8：{:.2}, {:.2}", prev, last)
            } else {
                format!(
                    "Operating cash flow to net profit below 0.8 for two periods: {:.2}, {:.2}",
                    prev, last
                )
            };
            findings.push(
                AnomalyRule::CashProfitDivergence,
                AnomalySubject::CashToProfit,
                latest,
                2,
                detail,
            );
        }
    }

    if let (Some((ocf_prev, ocf_last)), Some((np_prev, np_last))) = (
        last_two(&joined.operating_cash_flow),
        last_two(&joined.net_profit),
    ) {
        if ocf_prev < 0.0 && ocf_last < 0.0 && np_prev > 0.0 && np_last > 0.0 {
            let detail = if findings.zh() {
                "近两期净利润为正但经营现金流为负，可能存在利润质量问题".to_string()
            } else {
                "Net profit positive but operating cash flow negative for two periods; earnings quality is questionable".to_string()
            };
            findings.push(
                AnomalyRule::CashProfitDivergence,
                AnomalySubject::ProfitQuality,
                latest,
                3,
                detail,
            );
        }
    }
}

fn receivables_inventory(
    joined: &JoinedSeries,
    window: usize,
    latest: Period,
    findings: &mut Findings,
) {
    if joined.periods.len() < 2 {
        return;
    }

    let revenue_growth = pct_change(&joined.revenue)
        .last()
        .and_then(MetricValue::value);
    let slow_growth = revenue_growth.map_or(true, |g| g < SLOW_REVENUE_GROWTH);
    let growth_text = revenue_growth.map_or_else(|| "NA".to_string(), pct);

    let turnovers = [
        (AnomalySubject::ReceivableTurnover, &joined.receivable_days),
        (AnomalySubject::InventoryTurnover, &joined.inventory_days),
    ];
    for (subject, days) in turnovers {
        let Some((prev, last)) = last_two(days) else {
            continue;
        };
        let increase = last - prev;
        if increase > TURNOVER_DAYS_JUMP && slow_growth {
            let detail = if findings.zh() {
                format!("周转天数较上期增加{:.1}天，营收增速{}", increase, growth_text)
            } else {
                format!(
                    "Turnover days up {:.1} on the prior period with revenue growth {}",
                    increase, growth_text
                )
            };
            findings.push(AnomalyRule::ReceivablesInventory, subject, latest, 2, detail);
        }
    }

    let occupancy = [
        (AnomalySubject::ReceivablesToRevenue, &joined.receivables_to_revenue),
        (AnomalySubject::InventoryToRevenue, &joined.inventory_to_revenue),
    ];
    for (subject, series) in occupancy {
        let recent = recent(series, window);
        let (Some(&current), Some(avg)) = (recent.last(), mean(&recent)) else {
            continue;
        };
        let deviation = current - avg;
        if deviation.abs() > RATIO_SHIFT {
            let severity = if deviation.abs() < RATIO_SHIFT_SEVERE { 2 } else { 3 };
            let detail = if findings.zh() {
                format!("占用率{}，较均值偏离{}", pct2(current), pct2(deviation))
            } else {
                format!(
                    "Occupancy {}, deviating {} from the recent mean",
                    pct2(current),
                    pct2(deviation)
                )
            };
            findings.push(AnomalyRule::ReceivablesInventory, subject, latest, severity, detail);
        }
    }
}

fn capex_capitalization(
    joined: &JoinedSeries,
    window: usize,
    latest: Period,
    findings: &mut Findings,
) {
    if joined.periods.len() < 2 {
        return;
    }

    let recent = recent(&joined.capex_intensity, window);
    if let Some((&current, history)) = recent.split_last() {
        if let Some(baseline) = mean(history) {
            let uplift = current - baseline;
            if current > CAPEX_HEAVY && uplift > CAPEX_UPLIFT {
                let detail = if findings.zh() {
                    format!(
                        "资本开支率{}，较近{}期均值抬升{}",
                        pct2(current),
                        history.len(),
                        pct2(uplift)
                    )
                } else {
                    format!(
                        "Capex intensity {}, up {} on the mean of the prior {} periods",
                        pct2(current),
                        pct2(uplift),
                        history.len()
                    )
                };
                findings.push(
                    AnomalyRule::CapexCapitalization,
                    AnomalySubject::CapexIntensity,
                    latest,
                    3,
                    detail,
                );
            }
        }
    }

    if let (Some((capex_prev, capex_last)), Some((rd_prev, rd_last))) = (
        last_two(&joined.capex_intensity),
        last_two(&joined.rd_expense_ratio),
    ) {
        let capex_rise = capex_last - capex_prev;
        let rd_drop = rd_prev - rd_last;
        if capex_rise > CAPITALIZATION_SHIFT && rd_drop > CAPITALIZATION_SHIFT {
            let detail = if findings.zh() {
                format!(
                    "资本开支率单期上升{}且研发费用率下降{}，可能存在费用资本化",
                    pct2(capex_rise),
                    pct2(rd_drop)
                )
            } else {
                format!(
                    "Capex intensity up {} while the R&D expense ratio fell {}; expenses may be capitalized",
                    pct2(capex_rise),
                    pct2(rd_drop)
                )
            };
            findings.push(
                AnomalyRule::CapexCapitalization,
                AnomalySubject::CapitalizationTendency,
                latest,
                2,
                detail,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn periods(n: usize) -> Vec<Period> {
        (0..n)
            .map(|i| Period::from_ymd(2018 + i as i32, 12, 31).unwrap())
            .collect()
    }

    fn series(raw: &[Option<f64>]) -> Vec<MetricValue> {
        raw.iter().copied().map(MetricValue::operand).collect()
    }

    fn joined(n: usize) -> JoinedSeries {
        JoinedSeries {
            periods: periods(n),
            ..Default::default()
        }
    }

    fn rules(found: &[Anomaly]) -> Vec<(AnomalyRule, AnomalySubject, u8)> {
        found.iter().map(|a| (a.rule, a.subject, a.severity)).collect()
    }

    #[test]
    fn test_same_direction_high_growth() {
        let mut data = joined(3);
        data.revenue = series(&[Some(100.0), Some(140.0), Some(200.0)]);

        let found = evaluate(&data, 4, Language::Zh).unwrap();
        assert_eq!(
            rules(&found),
            vec![(AnomalyRule::ContinuousVolatility, AnomalySubject::Revenue, 2)]
        );
        assert_eq!(found[0].period, periods(3)[2]);
        assert_eq!(found[0].rule_label, "连续波动异常");
    }

    #[test]
    fn test_growth_reversal() {
        let mut data = joined(3);
        data.net_profit = series(&[Some(100.0), Some(125.0), Some(90.0)]);

        let found = evaluate(&data, 4, Language::En).unwrap();
        assert_eq!(
            rules(&found),
            vec![(AnomalyRule::ContinuousVolatility, AnomalySubject::NetProfit, 3)]
        );
        assert!(found[0].detail.starts_with("Sharp growth reversal"));
    }

    #[test]
    fn test_cost_rate_shift_against_median() {
        let mut data = joined(4);
        data.cost_rate = series(&[Some(0.60), Some(0.61), Some(0.60), Some(0.90)]);

        let found = evaluate(&data, 4, Language::En).unwrap();
        assert_eq!(
            rules(&found),
            vec![(AnomalyRule::CostExpenseShift, AnomalySubject::CostRate, 3)]
        );
    }

    #[test]
    fn test_liquidity_and_maturity_mismatch() {
        let mut data = joined(1);
        data.current_ratio = series(&[Some(0.8)]);
        data.liquidity_gap = series(&[Some(-500.0)]);
        data.short_term_debt_share = series(&[Some(0.75)]);
        data.long_term_asset_ratio = series(&[Some(0.6)]);

        let found = evaluate(&data, 4, Language::En).unwrap();
        assert_eq!(
            rules(&found),
            vec![
                (AnomalyRule::AssetLiabilityMismatch, AnomalySubject::Liquidity, 3),
                (AnomalyRule::AssetLiabilityMismatch, AnomalySubject::MaturityMismatch, 3),
            ]
        );
    }

    #[test]
    fn test_cash_profit_divergence() {
        let mut data = joined(2);
        data.net_profit = series(&[Some(100.0), Some(100.0)]);
        data.operating_cash_flow = series(&[Some(-10.0), Some(-20.0)]);
        data.ocf_to_net_profit = series(&[Some(-0.1), Some(-0.2)]);

        let found = evaluate(&data, 4, Language::Zh).unwrap();
        assert_eq!(
            rules(&found),
            vec![
                (AnomalyRule::CashProfitDivergence, AnomalySubject::CashToProfit, 2),
                (AnomalyRule::CashProfitDivergence, AnomalySubject::ProfitQuality, 3),
            ]
        );
    }

    #[test]
    fn test_receivable_days_jump_with_unknown_growth() {
        let mut data = joined(2);
        data.receivable_days = series(&[Some(40.0), Some(80.0)]);

        let found = evaluate(&data, 4, Language::En).unwrap();
        assert_eq!(
            rules(&found),
            vec![(AnomalyRule::ReceivablesInventory, AnomalySubject::ReceivableTurnover, 2)]
        );
        assert!(found[0].detail.contains("NA"));
    }

    #[test]
    fn test_capex_uplift_and_capitalization() {
        let mut data = joined(3);
        data.capex_intensity = series(&[Some(0.05), Some(0.10), Some(0.40)]);
        data.rd_expense_ratio = series(&[Some(0.20), Some(0.25), Some(0.10)]);

        let found = evaluate(&data, 4, Language::En).unwrap();
        assert!(rules(&found).contains(&(
            AnomalyRule::CapexCapitalization,
            AnomalySubject::CapexIntensity,
            3
        )));
        assert!(rules(&found).contains(&(
            AnomalyRule::CapexCapitalization,
            AnomalySubject::CapitalizationTendency,
            2
        )));
    }

    #[test]
    fn test_na_inputs_never_trigger() {
        let mut data = joined(3);
        data.revenue = series(&[Some(100.0), None, Some(300.0)]);
        data.current_ratio = series(&[None, None, None]);
        data.liquidity_gap = series(&[None, None, Some(-1.0)]);
        data.ocf_to_net_profit = series(&[None, Some(0.1), None]);

        assert!(evaluate(&data, 4, Language::En).unwrap().is_empty());
        assert!(evaluate(&joined(0), 4, Language::En).unwrap().is_empty());
    }

    #[test]
    fn test_misaligned_series_is_rejected() {
        let mut data = joined(2);
        data.revenue = series(&[Some(100.0), Some(140.0), Some(200.0)]);

        let err = evaluate(&data, 4, Language::En).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::SeriesLengthMismatch {
                ref series,
                expected: 2,
                actual: 3,
            } if series == "revenue"
        ));
    }
}
