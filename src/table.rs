use crate::error::{AnalysisError, Result};
use crate::fields::Field;
use crate::period::Period;
use crate::schema::StatementKind;
use serde::Serialize;
use std::collections::BTreeMap;

/// One statement type across N reporting periods.
///
/// Every field column is aligned index-for-index with `periods`, which are
/// strictly ascending. Absent source values stay `None`; they are never
/// replaced by zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatementTable {
    kind: StatementKind,
    periods: Vec<Period>,
    fields: BTreeMap<Field, Vec<Option<f64>>>,
}

impl StatementTable {
    pub fn new(
        kind: StatementKind,
        periods: Vec<Period>,
        fields: BTreeMap<Field, Vec<Option<f64>>>,
    ) -> Result<Self> {
        if let Some(pair) = periods.windows(2).find(|pair| pair[0] >= pair[1]) {
            return Err(AnalysisError::UnorderedPeriods(format!(
                "{} is not before {}",
                pair[0], pair[1]
            )));
        }

        for (field, values) in &fields {
            if values.len() != periods.len() {
                return Err(AnalysisError::FieldLengthMismatch {
                    statement: kind,
                    field: format!("{:?}", field),
                    expected: periods.len(),
                    actual: values.len(),
                });
            }
        }

        Ok(Self {
            kind,
            periods,
            fields,
        })
    }

    pub fn empty(kind: StatementKind) -> Self {
        Self {
            kind,
            periods: Vec::new(),
            fields: BTreeMap::new(),
        }
    }

    pub fn kind(&self) -> StatementKind {
        self.kind
    }

    pub fn periods(&self) -> &[Period] {
        &self.periods
    }

    pub fn len(&self) -> usize {
        self.periods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = (Field, &[Option<f64>])> {
        self.fields
            .iter()
            .map(|(field, values)| (*field, values.as_slice()))
    }

    /// Values for a field, or `None` when the source never reported it.
    pub fn column(&self, field: Field) -> Option<&[Option<f64>]> {
        self.fields.get(&field).map(Vec::as_slice)
    }

    pub fn value(&self, field: Field, index: usize) -> Option<f64> {
        self.fields
            .get(&field)
            .and_then(|values| values.get(index).copied().flatten())
    }

    /// Keeps only the latest `n` periods.
    pub fn latest(&self, n: usize) -> Self {
        let skip = self.periods.len().saturating_sub(n);
        Self {
            kind: self.kind,
            periods: self.periods[skip..].to_vec(),
            fields: self
                .fields
                .iter()
                .map(|(field, values)| (*field, values[skip..].to_vec()))
                .collect(),
        }
    }
}
