//! Routines and their exercise membership.

use crate::adapter::TableAdapter;
use crate::codec::Record;
use crate::error::{TableError, TableResult};
use crate::models::TableRow;
use crate::schema::{EXERCISES, ROUTINES};
use crate::services::{absent_table_is_empty, not_found_as};
use liftsheet_core::routine::encode_exercise_list;
use liftsheet_core::{NewRoutine, Routine, RoutineExerciseRequest, RoutinePatch, new_id};
use tracing::{debug, info};

#[derive(Clone)]
pub struct RoutineService {
    tables: TableAdapter,
}

impl RoutineService {
    pub fn new(tables: TableAdapter) -> Self {
        Self { tables }
    }

    pub async fn list(&self) -> TableResult<Vec<Routine>> {
        let rows = absent_table_is_empty(self.tables.list(ROUTINES.name).await)?;
        Ok(rows.iter().map(Routine::from_record).collect())
    }

    pub async fn get(&self, id: &str) -> TableResult<Routine> {
        let record = self
            .tables
            .get_by_id(ROUTINES.name, id)
            .await
            .map_err(not_found_as("routine", id))?;
        Ok(Routine::from_record(&record))
    }

    async fn ensure_exercise_exists(&self, exercise_id: &str) -> TableResult<()> {
        self.tables
            .get_by_id(EXERCISES.name, exercise_id)
            .await
            .map_err(not_found_as("exercise", exercise_id))?;
        Ok(())
    }

    async fn ensure_exercises_exist(&self, exercise_ids: &[String]) -> TableResult<()> {
        for exercise_id in exercise_ids {
            self.ensure_exercise_exists(exercise_id).await?;
        }
        Ok(())
    }

    pub async fn create(&self, new: NewRoutine) -> TableResult<Routine> {
        let routine = new.into_routine(new_id())?;
        self.ensure_exercises_exist(&routine.exercises).await?;

        let stored = self
            .tables
            .append(ROUTINES.name, routine.to_record())
            .await?;
        info!(id = %routine.id, name = %routine.name, "Created routine");
        Ok(Routine::from_record(&stored))
    }

    pub async fn update(&self, id: &str, patch: RoutinePatch) -> TableResult<Routine> {
        patch.validate()?;
        if let Some(exercises) = &patch.exercises {
            self.ensure_exercises_exist(exercises).await?;
        }

        let mut partial = Record::new();
        if let Some(name) = patch.name {
            partial.insert("name".to_string(), name.trim().to_string());
        }
        if let Some(description) = patch.description {
            partial.insert("description".to_string(), description);
        }
        if let Some(exercises) = patch.exercises {
            partial.insert("exercises".to_string(), encode_exercise_list(&exercises));
        }

        let merged = self
            .tables
            .update(ROUTINES.name, id, partial)
            .await
            .map_err(not_found_as("routine", id))?;
        Ok(Routine::from_record(&merged))
    }

    pub async fn delete(&self, id: &str) -> TableResult<()> {
        self.tables
            .delete(ROUTINES.name, id)
            .await
            .map_err(not_found_as("routine", id))?;
        info!(id, "Deleted routine");
        Ok(())
    }

    /// Append an exercise to the routine. Adding a member twice is an error.
    pub async fn add_exercise(
        &self,
        routine_id: &str,
        request: RoutineExerciseRequest,
    ) -> TableResult<Routine> {
        let exercise_id = request.exercise_id()?;
        let mut routine = self.get(routine_id).await?;
        self.ensure_exercise_exists(&exercise_id).await?;

        if routine.contains(&exercise_id) {
            return Err(TableError::Duplicate(format!(
                "exercise {exercise_id} is already in routine {routine_id}"
            )));
        }

        routine.exercises.push(exercise_id);
        self.write_exercises(&routine).await?;
        info!(routine_id, exercises = routine.exercises.len(), "Added exercise to routine");
        Ok(routine)
    }

    pub async fn list_exercises(&self, routine_id: &str) -> TableResult<Vec<String>> {
        Ok(self.get(routine_id).await?.exercises)
    }

    /// Remove an exercise from the routine. Removing a non-member changes
    /// nothing and writes nothing.
    pub async fn remove_exercise(&self, routine_id: &str, exercise_id: &str) -> TableResult<Routine> {
        let mut routine = self.get(routine_id).await?;
        if !routine.contains(exercise_id) {
            debug!(routine_id, exercise_id, "Exercise not in routine; nothing to remove");
            return Ok(routine);
        }

        routine.exercises.retain(|id| id != exercise_id);
        self.write_exercises(&routine).await?;
        info!(routine_id, exercise_id, "Removed exercise from routine");
        Ok(routine)
    }

    async fn write_exercises(&self, routine: &Routine) -> TableResult<()> {
        let mut partial = Record::new();
        partial.insert(
            "exercises".to_string(),
            encode_exercise_list(&routine.exercises),
        );
        self.tables
            .update(ROUTINES.name, &routine.id, partial)
            .await
            .map_err(not_found_as("routine", &routine.id))?;
        Ok(())
    }
}
