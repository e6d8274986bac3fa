//! Series: the flat legacy log of performed sets.

use crate::adapter::TableAdapter;
use crate::codec::Record;
use crate::error::TableResult;
use crate::models::TableRow;
use crate::schema::SERIES;
use crate::services::{absent_table_is_empty, not_found_as};
use liftsheet_core::numeric::{format_float, format_int};
use liftsheet_core::{NewSeries, Series, SeriesPatch, new_id};
use tracing::info;

#[derive(Clone)]
pub struct SeriesService {
    tables: TableAdapter,
}

impl SeriesService {
    pub fn new(tables: TableAdapter) -> Self {
        Self { tables }
    }

    pub async fn list(&self) -> TableResult<Vec<Series>> {
        let rows = absent_table_is_empty(self.tables.list(SERIES.name).await)?;
        Ok(rows.iter().map(Series::from_record).collect())
    }

    pub async fn get(&self, id: &str) -> TableResult<Series> {
        let record = self
            .tables
            .get_by_id(SERIES.name, id)
            .await
            .map_err(not_found_as("series", id))?;
        Ok(Series::from_record(&record))
    }

    pub async fn create(&self, new: NewSeries) -> TableResult<Series> {
        let series = new.into_series(new_id())?;
        let stored = self.tables.append(SERIES.name, series.to_record()).await?;
        info!(id = %series.id, exercise_id = %series.exercise_id, "Created series");
        Ok(Series::from_record(&stored))
    }

    pub async fn update(&self, id: &str, patch: SeriesPatch) -> TableResult<Series> {
        let patch = patch.validate()?;

        let mut partial = Record::new();
        if let Some(exercise_id) = patch.exercise_id {
            partial.insert("exerciseId".to_string(), exercise_id);
        }
        if let Some(repetitions) = patch.repetitions {
            partial.insert("repetitions".to_string(), format_int(Some(repetitions)));
        }
        if let Some(weight) = patch.weight {
            partial.insert("weight".to_string(), format_float(weight));
        }
        if let Some(date) = patch.date {
            partial.insert("date".to_string(), date);
        }

        let merged = self
            .tables
            .update(SERIES.name, id, partial)
            .await
            .map_err(not_found_as("series", id))?;
        Ok(Series::from_record(&merged))
    }

    pub async fn delete(&self, id: &str) -> TableResult<()> {
        self.tables
            .delete(SERIES.name, id)
            .await
            .map_err(not_found_as("series", id))?;
        info!(id, "Deleted series");
        Ok(())
    }
}
