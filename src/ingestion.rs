use crate::error::{Diagnostic, Result};
use crate::fields::Field;
use crate::period::Period;
use crate::schema::{RawStatementRow, StatementKind};
use crate::table::StatementTable;
use crate::utils::parse_amount;
use log::{debug, warn};
use std::collections::{BTreeMap, BTreeSet};

/// A table built from source rows, plus whatever had to be dropped on the way.
#[derive(Debug, Clone)]
pub struct Ingested {
    pub table: StatementTable,
    pub diagnostics: Vec<Diagnostic>,
}

/// Builds a [`StatementTable`] from raw source rows.
///
/// Rows whose period does not parse are dropped and reported. When the same
/// period appears more than once the row seen last wins. Source row order is
/// irrelevant; the table is always ascending by period.
pub fn from_rows(kind: StatementKind, rows: &[RawStatementRow]) -> Result<Ingested> {
    let mut diagnostics = Vec::new();
    let mut by_period: BTreeMap<Period, &RawStatementRow> = BTreeMap::new();

    for row in rows {
        match Period::parse(&row.period) {
            Some(period) => {
                if by_period.insert(period, row).is_some() {
                    debug!("{:?}: duplicate period {}, keeping latest row", kind, period);
                }
            }
            None => {
                warn!(
                    "{:?}: dropping row with malformed period '{}'",
                    kind, row.period
                );
                diagnostics.push(Diagnostic::MalformedPeriod {
                    statement: kind,
                    raw_period: row.period.clone(),
                });
            }
        }
    }

    if by_period.is_empty() {
        warn!("{:?}: no usable periods", kind);
        diagnostics.push(Diagnostic::EmptyStatement { statement: kind });
        return Ok(Ingested {
            table: StatementTable::empty(kind),
            diagnostics,
        });
    }

    let reported: BTreeSet<Field> = by_period
        .values()
        .flat_map(|row| row.values.keys().copied())
        .collect();

    let mut fields: BTreeMap<Field, Vec<Option<f64>>> = BTreeMap::new();
    for field in reported {
        if field.statement() != kind {
            debug!("{:?}: ignoring {:?} reported on the wrong statement", kind, field);
            continue;
        }
        let column = by_period
            .values()
            .map(|row| row.values.get(&field).and_then(|raw| parse_amount(raw)))
            .collect();
        fields.insert(field, column);
    }

    let periods: Vec<Period> = by_period.into_keys().collect();
    debug!(
        "{:?}: ingested {} periods with {} fields",
        kind,
        periods.len(),
        fields.len()
    );

    Ok(Ingested {
        table: StatementTable::new(kind, periods, fields)?,
        diagnostics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_are_sorted_and_deduplicated() {
        let rows = vec![
            RawStatementRow::new("20231231").with(Field::TotalAssets, "1,300"),
            RawStatementRow::new("20211231").with(Field::TotalAssets, "1,000"),
            RawStatementRow::new("20221231").with(Field::TotalAssets, "1,100"),
            RawStatementRow::new("2022-12-31").with(Field::TotalAssets, "1,200"),
        ];

        let ingested = from_rows(StatementKind::Balance, &rows).unwrap();
        let table = ingested.table;
        assert_eq!(table.len(), 3);
        assert_eq!(table.periods()[0].to_string(), "2021-12-31");
        assert_eq!(
            table.column(Field::TotalAssets).unwrap(),
            &[Some(1000.0), Some(1200.0), Some(1300.0)]
        );
        assert!(ingested.diagnostics.is_empty());
    }

    #[test]
    fn test_malformed_periods_and_values() {
        let rows = vec![
            RawStatementRow::new("not a date").with(Field::TotalRevenue, "5"),
            RawStatementRow::new("20221231")
                .with(Field::TotalRevenue, "--")
                .with(Field::NetProfit, "(12)"),
            RawStatementRow::new("20231231").with(Field::TotalRevenue, "150"),
        ];

        let ingested = from_rows(StatementKind::Income, &rows).unwrap();
        assert_eq!(
            ingested.diagnostics,
            vec![Diagnostic::MalformedPeriod {
                statement: StatementKind::Income,
                raw_period: "not a date".to_string(),
            }]
        );

        let table = ingested.table;
        assert_eq!(table.len(), 2);
        assert_eq!(
            table.column(Field::TotalRevenue).unwrap(),
            &[None, Some(150.0)]
        );
        assert_eq!(table.column(Field::NetProfit).unwrap(), &[Some(-12.0), None]);
    }

    #[test]
    fn test_no_usable_rows_yields_empty_table() {
        let rows = vec![RawStatementRow::new("??")];
        let ingested = from_rows(StatementKind::CashFlow, &rows).unwrap();
        assert!(ingested.table.is_empty());
        assert!(ingested
            .diagnostics
            .contains(&Diagnostic::EmptyStatement {
                statement: StatementKind::CashFlow
            }));

        let ingested = from_rows(StatementKind::CashFlow, &[]).unwrap();
        assert!(ingested.table.is_empty());
    }

    #[test]
    fn test_fields_from_other_statements_are_ignored() {
        let rows = vec![RawStatementRow::new("2023")
            .with(Field::TotalAssets, "10")
            .with(Field::NetProfit, "3")];
        let table = from_rows(StatementKind::Balance, &rows).unwrap().table;
        assert!(table.column(Field::TotalAssets).is_some());
        assert!(table.column(Field::NetProfit).is_none());
    }
}
