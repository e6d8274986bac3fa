//! Conversion between positional rows and named records.

use crate::error::{TableError, TableResult};
use indexmap::IndexMap;
use liftsheet_storage::RawRow;

/// A row keyed by column name, in header order.
pub type Record = IndexMap<String, String>;

/// Zip `header` with `raw`.
///
/// Columns without a value decode to `""`. Values past the last header
/// column are dropped.
pub fn decode(header: &[String], raw: &[String]) -> Record {
    header
        .iter()
        .enumerate()
        .map(|(i, column)| (column.clone(), raw.get(i).cloned().unwrap_or_default()))
        .collect()
}

/// Lay `record` out in `header` order, filling absent columns with `""`.
///
/// Fails with [`TableError::SchemaMismatch`] if the record has a field that
/// is not a column of the table.
pub fn encode(table: &str, header: &[String], record: &Record) -> TableResult<RawRow> {
    if let Some(field) = record.keys().find(|k| !header.contains(k)) {
        return Err(TableError::SchemaMismatch {
            table: table.to_string(),
            field: field.clone(),
        });
    }
    Ok(header
        .iter()
        .map(|column| record.get(column).cloned().unwrap_or_default())
        .collect())
}
