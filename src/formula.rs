//! The NA-propagating value type every metric formula is written in.
//!
//! Arithmetic on [`MetricValue`] propagates the first NA operand unchanged,
//! and division is the single place where a zero denominator is detected.

use crate::labels::{not_available, Language};
use crate::utils::format_thousands;
use schemars::gen::SchemaGenerator;
use schemars::schema::Schema;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize, Serializer};
use std::ops::{Add, Div, Mul, Neg, Sub};

/// Denominators with an absolute value at or below this are treated as zero.
pub const ZERO_TOLERANCE: f64 = 1e-10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum NaReason {
    /// A required line item was absent for the period.
    MissingOperand,
    /// The denominator was zero within [`ZERO_TOLERANCE`].
    ZeroDenominator,
    /// A period-over-period value was requested for the first period.
    NoPriorPeriod,
    /// A cross-statement metric needed a period another statement lacks.
    JoinMismatch,
    /// The arithmetic overflowed to a non-finite number.
    NonFinite,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetricValue {
    Value(f64),
    Na(NaReason),
}

impl MetricValue {
    pub const MISSING: Self = Self::Na(NaReason::MissingOperand);

    /// Lifts a line-item cell; an absent or non-finite cell is a missing operand.
    pub fn operand(cell: Option<f64>) -> Self {
        match cell {
            Some(value) if value.is_finite() => Self::Value(value),
            _ => Self::MISSING,
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Value(v) => Some(*v),
            Self::Na(_) => None,
        }
    }

    pub fn na_reason(&self) -> Option<NaReason> {
        match self {
            Self::Value(_) => None,
            Self::Na(reason) => Some(*reason),
        }
    }

    pub fn is_na(&self) -> bool {
        matches!(self, Self::Na(_))
    }

    /// Applies `f` to a present value, turning any non-finite result into NA.
    pub fn map(self, f: impl FnOnce(f64) -> f64) -> Self {
        match self {
            Self::Value(v) => Self::finite(f(v)),
            na => na,
        }
    }

    /// `self` when present, otherwise `fallback`.
    pub fn or(self, fallback: Self) -> Self {
        match self {
            Self::Value(_) => self,
            Self::Na(_) => fallback,
        }
    }

    fn finite(value: f64) -> Self {
        if value.is_finite() {
            Self::Value(value)
        } else {
            Self::Na(NaReason::NonFinite)
        }
    }

    fn combine(self, rhs: Self, op: impl FnOnce(f64, f64) -> f64) -> Self {
        match (self, rhs) {
            (Self::Value(a), Self::Value(b)) => Self::finite(op(a, b)),
            (Self::Na(reason), _) | (_, Self::Na(reason)) => Self::Na(reason),
        }
    }

    /// Presentation text: two decimals, percentages scaled by 100.
    pub fn display(&self, unit: Unit, language: Language) -> String {
        match self {
            Self::Value(v) => unit.format(*v),
            Self::Na(_) => not_available(language).to_string(),
        }
    }
}

impl From<f64> for MetricValue {
    fn from(value: f64) -> Self {
        Self::finite(value)
    }
}

impl Add for MetricValue {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        self.combine(rhs, |a, b| a + b)
    }
}

impl Sub for MetricValue {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        self.combine(rhs, |a, b| a - b)
    }
}

impl Mul for MetricValue {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        self.combine(rhs, |a, b| a * b)
    }
}

impl Mul<f64> for MetricValue {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        self.map(|a| a * rhs)
    }
}

impl Neg for MetricValue {
    type Output = Self;

    fn neg(self) -> Self {
        self.map(|a| -a)
    }
}

impl Div for MetricValue {
    type Output = Self;

    fn div(self, rhs: Self) -> Self {
        match (self, rhs) {
            (Self::Na(reason), _) | (_, Self::Na(reason)) => Self::Na(reason),
            (Self::Value(_), Self::Value(den)) if den.abs() <= ZERO_TOLERANCE => {
                Self::Na(NaReason::ZeroDenominator)
            }
            (Self::Value(num), Self::Value(den)) => Self::finite(num / den),
        }
    }
}

/// Serialized as a plain number, or `null` for NA.
impl Serialize for MetricValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value().serialize(serializer)
    }
}

impl JsonSchema for MetricValue {
    fn schema_name() -> String {
        "MetricValue".to_string()
    }

    fn json_schema(gen: &mut SchemaGenerator) -> Schema {
        <Option<f64>>::json_schema(gen)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    /// A plain multiple, shown as `1.67`.
    Ratio,
    /// A fraction, shown as `20.50%`.
    Percentage,
    /// An amount, shown as `1,234.00`.
    Currency,
}

impl Unit {
    pub fn format(&self, value: f64) -> String {
        match self {
            Self::Ratio => format!("{:.2}", value),
            Self::Percentage => format!("{:.2}%", value * 100.0),
            Self::Currency => format_thousands(value),
        }
    }
}
