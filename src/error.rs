use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::schema::StatementKind;

/// Contract violations. Data-quality problems never surface here; they become
/// NA values or [`Diagnostic`] entries instead.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Field {field} has {actual} values but the {statement:?} table has {expected} periods")]
    FieldLengthMismatch {
        statement: StatementKind,
        field: String,
        expected: usize,
        actual: usize,
    },

    #[error("Series {series} has {actual} values but {expected} periods were joined")]
    SeriesLengthMismatch {
        series: String,
        expected: usize,
        actual: usize,
    },

    #[error("Periods must be strictly ascending: {0}")]
    UnorderedPeriods(String),

    #[error("{analyzer:?} analyzer cannot process a {table:?} statement table")]
    StatementMismatch {
        analyzer: StatementKind,
        table: StatementKind,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Non-fatal degradations observed while turning source rows into tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// A row was dropped because its period could not be parsed.
    MalformedPeriod {
        statement: StatementKind,
        raw_period: String,
    },
    /// The statement ended up with no usable periods.
    EmptyStatement { statement: StatementKind },
    /// The statement source failed; the statement is treated as empty.
    SourceUnavailable {
        statement: StatementKind,
        reason: String,
    },
}
