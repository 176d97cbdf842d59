use crate::fields::Field;
use crate::formula::{MetricValue, NaReason, Unit};
use crate::metric::{Category, ChartId, MetricId};
use crate::period::Period;
use crate::schema::StatementKind;
use crate::trend::{pct_change, SeriesSummary};
use schemars::JsonSchema;
use serde::Serialize;
use std::collections::BTreeMap;

/// One metric's values across the report's periods.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct MetricSeries {
    pub unit: Unit,
    /// True when the metric is computed from a proxy.
    pub approximation: bool,
    pub values: Vec<MetricValue>,
    pub summary: SeriesSummary,
}

impl MetricSeries {
    pub fn new(id: MetricId, values: Vec<MetricValue>) -> Self {
        let summary = SeriesSummary::of(&values);
        Self {
            unit: id.unit(),
            approximation: id.is_approximation(),
            values,
            summary,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, JsonSchema)]
pub struct TrendPoint {
    pub period: Period,
    pub value: MetricValue,
    /// Fractional change against the previous point.
    pub change: MetricValue,
}

/// A chart-ready amount series with its period-over-period change.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct TrendSeries {
    pub points: Vec<TrendPoint>,
}

impl TrendSeries {
    pub fn new(periods: &[Period], values: &[MetricValue]) -> Self {
        let changes = pct_change(values);
        Self {
            points: periods
                .iter()
                .zip(values)
                .zip(changes)
                .map(|((period, value), change)| TrendPoint {
                    period: *period,
                    value: *value,
                    change,
                })
                .collect(),
        }
    }

    pub fn changes(&self) -> Vec<MetricValue> {
        self.points.iter().map(|p| p.change).collect()
    }
}

/// Everything one statement analyzer derived from one table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsReport {
    pub statement: StatementKind,
    pub periods: Vec<Period>,
    pub categories: BTreeMap<Category, BTreeMap<MetricId, MetricSeries>>,
    pub charts: BTreeMap<ChartId, TrendSeries>,
    /// The statement's raw line items, kept for late cross-statement joins.
    pub line_items: BTreeMap<Field, Vec<Option<f64>>>,
}

impl MetricsReport {
    pub fn empty(statement: StatementKind) -> Self {
        Self {
            statement,
            periods: Vec::new(),
            categories: BTreeMap::new(),
            charts: BTreeMap::new(),
            line_items: BTreeMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    pub fn insert(&mut self, id: MetricId, series: MetricSeries) {
        self.categories
            .entry(id.category())
            .or_default()
            .insert(id, series);
    }

    pub fn metric(&self, id: MetricId) -> Option<&MetricSeries> {
        self.categories.get(&id.category())?.get(&id)
    }

    pub fn metric_count(&self) -> usize {
        self.categories.values().map(BTreeMap::len).sum()
    }

    /// A metric's value at `period`; NA with [`NaReason::JoinMismatch`] when
    /// this report has no such period.
    pub fn metric_at(&self, id: MetricId, period: Period) -> MetricValue {
        match (self.metric(id), self.index_of(period)) {
            (Some(series), Some(index)) => series.values[index],
            (None, Some(_)) => MetricValue::MISSING,
            (_, None) => MetricValue::Na(NaReason::JoinMismatch),
        }
    }

    /// A line item at `period`; NA with [`NaReason::JoinMismatch`] when this
    /// report has no such period.
    pub fn line_item_at(&self, field: Field, period: Period) -> MetricValue {
        match self.index_of(period) {
            Some(index) => MetricValue::operand(
                self.line_items
                    .get(&field)
                    .and_then(|values| values.get(index).copied().flatten()),
            ),
            None => MetricValue::Na(NaReason::JoinMismatch),
        }
    }

    fn index_of(&self, period: Period) -> Option<usize> {
        self.periods.binary_search(&period).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn periods() -> Vec<Period> {
        vec![
            Period::from_ymd(2022, 12, 31).unwrap(),
            Period::from_ymd(2023, 12, 31).unwrap(),
        ]
    }

    #[test]
    fn test_trend_series_pairs_values_and_changes() {
        let values = vec![MetricValue::Value(100.0), MetricValue::Value(120.0)];
        let trend = TrendSeries::new(&periods(), &values);
        assert_eq!(trend.points.len(), 2);
        assert!(trend.points[0].change.is_na());
        assert!((trend.points[1].change.value().unwrap() - 0.2).abs() < 1e-12);
        assert_eq!(trend.points[1].value, values[1]);
    }

    #[test]
    fn test_join_lookups() {
        let mut report = MetricsReport::empty(StatementKind::Income);
        report.periods = periods();
        report
            .line_items
            .insert(Field::NetProfit, vec![Some(10.0), None]);
        report.insert(
            MetricId::NetMargin,
            MetricSeries::new(
                MetricId::NetMargin,
                vec![MetricValue::Value(0.1), MetricValue::MISSING],
            ),
        );

        let p2022 = periods()[0];
        let p2021 = Period::from_ymd(2021, 12, 31).unwrap();

        assert_eq!(report.line_item_at(Field::NetProfit, p2022), MetricValue::Value(10.0));
        assert_eq!(
            report.line_item_at(Field::NetProfit, periods()[1]),
            MetricValue::MISSING
        );
        assert_eq!(
            report.line_item_at(Field::NetProfit, p2021),
            MetricValue::Na(NaReason::JoinMismatch)
        );
        assert_eq!(report.metric_at(MetricId::NetMargin, p2022), MetricValue::Value(0.1));
        assert_eq!(
            report.metric_at(MetricId::GrossMargin, p2022),
            MetricValue::MISSING
        );
        assert_eq!(report.metric_count(), 1);
    }
}
