use crate::formula::{MetricValue, NaReason};
use crate::utils::{mean, std_dev};
use schemars::JsonSchema;
use serde::Serialize;

/// Period-over-period fractional change, in the order given.
///
/// `change[0]` is always NA; later entries are NA when either neighbour is NA
/// or the prior value is zero.
pub fn pct_change(series: &[MetricValue]) -> Vec<MetricValue> {
    let mut changes = Vec::with_capacity(series.len());
    for (i, current) in series.iter().enumerate() {
        let change = match i.checked_sub(1).map(|j| series[j]) {
            None => MetricValue::Na(NaReason::NoPriorPeriod),
            Some(prior) => (*current - prior) / prior,
        };
        changes.push(change);
    }
    changes
}

/// Average of each value and its predecessor. The first value, or one whose
/// predecessor is NA, averages with itself.
pub fn rolling_average(series: &[MetricValue]) -> Vec<MetricValue> {
    series
        .iter()
        .enumerate()
        .map(|(i, current)| {
            let prior = i
                .checked_sub(1)
                .map(|j| series[j].or(*current))
                .unwrap_or(*current);
            (*current + prior) * 0.5
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, JsonSchema)]
pub struct SeriesSummary {
    pub mean: MetricValue,
    pub latest: MetricValue,
    pub max: MetricValue,
    pub min: MetricValue,
    /// Population standard deviation.
    pub std_dev: MetricValue,
    /// `std_dev / mean`; NA for a zero mean.
    pub coefficient_of_variation: MetricValue,
}

impl SeriesSummary {
    /// Summarizes the present values, ignoring NA entries.
    pub fn of(series: &[MetricValue]) -> Self {
        let present: Vec<f64> = series.iter().filter_map(MetricValue::value).collect();
        let lift = |v: Option<f64>| MetricValue::operand(v);

        let mean = lift(mean(&present));
        let std_dev = lift(std_dev(&present));

        Self {
            mean,
            latest: series.last().copied().unwrap_or(MetricValue::MISSING),
            max: lift(present.iter().copied().reduce(f64::max)),
            min: lift(present.iter().copied().reduce(f64::min)),
            std_dev,
            coefficient_of_variation: std_dev / mean,
        }
    }
}
