//! Record-level CRUD over spreadsheet tables.
//!
//! Reads go through the [`TableCache`]. Writes always read fresh rows,
//! locate the target by its `id` column, mutate the backing store and then
//! invalidate the whole table. Invalidation runs whether or not the
//! mutation succeeded.
//!
//! There is no row locking: two concurrent updates of the same row both
//! succeed and the last write wins.

use crate::cache::{CachedRows, TableCache, derived_key};
use crate::codec::{Record, decode, encode};
use crate::error::{TableError, TableResult};
use crate::registry::{SheetRegistry, TableHandle};
use crate::schema::Catalog;
use liftsheet_core::timestamp::now_rfc3339;
use liftsheet_storage::{RawRow, SheetStore};
use std::sync::Arc;
use tracing::{debug, error, instrument};

/// Name of the identity column every table carries.
pub const ID_COLUMN: &str = "id";

#[derive(Clone)]
pub struct TableAdapter {
    registry: SheetRegistry,
    cache: TableCache,
    catalog: Catalog,
}

impl TableAdapter {
    pub fn new(store: Arc<dyn SheetStore>, cache: TableCache, catalog: Catalog) -> Self {
        Self {
            registry: SheetRegistry::new(store),
            cache,
            catalog,
        }
    }

    pub fn registry(&self) -> &SheetRegistry {
        &self.registry
    }

    pub fn cache(&self) -> &TableCache {
        &self.cache
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    fn store(&self) -> &Arc<dyn SheetStore> {
        self.registry.store()
    }

    /// Resolve `table` and decode all of its rows, bypassing the cache.
    async fn load(&self, table: &str) -> TableResult<(TableHandle, Vec<Record>)> {
        let handle = self.registry.resolve(table).await?;
        let rows = self
            .store()
            .rows(table)
            .await
            .map_err(|e| TableError::from_lookup(e, table))?;
        let records = rows.iter().map(|raw| decode(&handle.header, raw)).collect();
        Ok((handle, records))
    }

    /// Position of the row whose id is `id`.
    fn find_index(table: &str, records: &[Record], id: &str) -> TableResult<usize> {
        records
            .iter()
            .position(|r| r.get(ID_COLUMN).is_some_and(|v| v == id))
            .ok_or_else(|| TableError::NotFound(format!("{table} row {id}")))
    }

    /// All records of `table`. Fails with `NotFound` if the table is absent.
    pub async fn list(&self, table: &str) -> TableResult<CachedRows> {
        if let Some(rows) = self.cache.get(table) {
            return Ok(rows);
        }

        let generation = self.cache.generation(table);
        let (_, records) = self.load(table).await?;
        debug!(table, rows = records.len(), "Loaded table");

        let rows = Arc::new(records);
        self.cache.insert(table, table, rows.clone(), generation);
        Ok(rows)
    }

    /// Records of `table` whose `column` equals `value`, cached under a
    /// derived key.
    pub async fn list_by(&self, table: &str, column: &str, value: &str) -> TableResult<CachedRows> {
        let key = derived_key(table, column, value);
        if let Some(rows) = self.cache.get(&key) {
            return Ok(rows);
        }

        let generation = self.cache.generation(table);
        let (_, records) = self.load(table).await?;
        let matching: Vec<Record> = records
            .into_iter()
            .filter(|r| r.get(column).is_some_and(|v| v == value))
            .collect();
        debug!(table, column, rows = matching.len(), "Loaded filtered table");

        let rows = Arc::new(matching);
        self.cache.insert(table, &key, rows.clone(), generation);
        Ok(rows)
    }

    /// The record of `table` whose id is `id`.
    pub async fn get_by_id(&self, table: &str, id: &str) -> TableResult<Record> {
        let rows = self.list(table).await?;
        let index = Self::find_index(table, &rows, id)?;
        Ok(rows[index].clone())
    }

    /// Append `record`, creating the table from its catalog schema if needed.
    ///
    /// Returns the record as stored (decoded back through the table header).
    #[instrument(skip(self, record))]
    pub async fn append(&self, table: &str, mut record: Record) -> TableResult<Record> {
        let handle = match self.catalog.get(table) {
            Some(schema) => {
                // Checked before `ensure`: a rejected record must not create the sheet.
                if let Some(field) = record.keys().find(|k| !schema.columns.contains(&k.as_str())) {
                    return Err(TableError::SchemaMismatch {
                        table: table.to_string(),
                        field: field.clone(),
                    });
                }
                if let Some(column) = schema.timestamp_column
                    && record.get(column).is_none_or(|v| v.is_empty())
                {
                    record.insert(column.to_string(), now_rfc3339());
                }
                self.registry.ensure(table, &schema.header()).await?
            }
            None => self.registry.resolve(table).await?,
        };

        let raw = encode(table, &handle.header, &record)?;
        let stored = decode(&handle.header, &raw);

        let result = self.store().append_row(table, raw).await;
        self.cache.invalidate_table(table);
        result.map_err(|e| TableError::from_lookup(e, table))?;

        debug!(id = stored.get(ID_COLUMN).map(String::as_str), "Appended row");
        Ok(stored)
    }

    /// Merge `partial` into the row whose id is `id` and write it back.
    ///
    /// Returns the merged record.
    #[instrument(skip(self, partial))]
    pub async fn update(&self, table: &str, id: &str, partial: Record) -> TableResult<Record> {
        if let Some(new_id) = partial.get(ID_COLUMN)
            && new_id != id
        {
            return Err(TableError::Validation(format!(
                "cannot change id of {table} row {id}"
            )));
        }

        let (handle, records) = self.load(table).await?;
        let index = Self::find_index(table, &records, id)?;

        let mut merged = records[index].clone();
        for (column, value) in partial {
            merged.insert(column, value);
        }
        let raw: RawRow = encode(table, &handle.header, &merged)?;

        let result = self.store().update_row(table, index, raw).await;
        self.cache.invalidate_table(table);
        result.map_err(|e| TableError::from_lookup(e, table))?;

        debug!(id, "Updated row");
        Ok(merged)
    }

    /// Remove the row whose id is `id`.
    #[instrument(skip(self))]
    pub async fn delete(&self, table: &str, id: &str) -> TableResult<()> {
        let (_, records) = self.load(table).await?;
        let index = Self::find_index(table, &records, id)?;

        let result = self.store().delete_row(table, index).await;
        self.cache.invalidate_table(table);
        result.map_err(|e| TableError::from_lookup(e, table))?;

        debug!(id, "Deleted row");
        Ok(())
    }

    /// Remove every row whose `column` equals `value`. Returns how many were
    /// removed; an absent table removes nothing.
    #[instrument(skip(self))]
    pub async fn delete_by(&self, table: &str, column: &str, value: &str) -> TableResult<usize> {
        let records = match self.load(table).await {
            Ok((_, records)) => records,
            Err(TableError::NotFound(_)) => return Ok(0),
            Err(e) => return Err(e),
        };

        let indexes: Vec<usize> = records
            .iter()
            .enumerate()
            .filter(|(_, r)| r.get(column).is_some_and(|v| v == value))
            .map(|(i, _)| i)
            .collect();
        if indexes.is_empty() {
            return Ok(0);
        }

        // Highest index first so earlier positions stay valid.
        let mut deleted = 0;
        let mut failure = None;
        for index in indexes.into_iter().rev() {
            match self.store().delete_row(table, index).await {
                Ok(()) => deleted += 1,
                Err(e) => {
                    error!(column, value, deleted, error = %e, "Bulk delete stopped early");
                    failure = Some(e);
                    break;
                }
            }
        }
        self.cache.invalidate_table(table);

        match failure {
            Some(e) => Err(TableError::from_lookup(e, table)),
            None => {
                debug!(column, value, deleted, "Deleted matching rows");
                Ok(deleted)
            }
        }
    }

    /// Delete the whole table.
    #[instrument(skip(self))]
    pub async fn drop_table(&self, table: &str) -> TableResult<()> {
        let result = self.registry.delete(table).await;
        self.cache.invalidate_table(table);
        result
    }
}
