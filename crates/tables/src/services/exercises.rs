//! Exercises and their workout sets.

use crate::adapter::TableAdapter;
use crate::codec::Record;
use crate::error::TableResult;
use crate::models::TableRow;
use crate::schema::{EXERCISES, SETS};
use crate::services::{absent_table_is_empty, not_found_as};
use liftsheet_core::{Exercise, ExercisePatch, NewExercise, NewSet, SetSummary, WorkoutSet, new_id};
use tracing::{error, info};

/// Foreign key column of the `Sets` table.
const SET_EXERCISE_COLUMN: &str = "exerciseId";

#[derive(Clone)]
pub struct ExerciseService {
    tables: TableAdapter,
}

impl ExerciseService {
    pub fn new(tables: TableAdapter) -> Self {
        Self { tables }
    }

    pub async fn list(&self) -> TableResult<Vec<Exercise>> {
        let rows = absent_table_is_empty(self.tables.list(EXERCISES.name).await)?;
        Ok(rows.iter().map(Exercise::from_record).collect())
    }

    pub async fn get(&self, id: &str) -> TableResult<Exercise> {
        let record = self
            .tables
            .get_by_id(EXERCISES.name, id)
            .await
            .map_err(not_found_as("exercise", id))?;
        Ok(Exercise::from_record(&record))
    }

    /// The exercise with `aggregateSetSummary` computed from its sets.
    pub async fn get_with_summary(&self, id: &str) -> TableResult<Exercise> {
        let mut exercise = self.get(id).await?;
        let sets = self.sets_of(id).await?;
        exercise.aggregate_set_summary = Some(SetSummary::from_sets(&sets));
        Ok(exercise)
    }

    pub async fn create(&self, new: NewExercise) -> TableResult<Exercise> {
        let exercise = new.into_exercise(new_id())?;
        let stored = self
            .tables
            .append(EXERCISES.name, exercise.to_record())
            .await?;
        info!(id = %exercise.id, name = %exercise.name, "Created exercise");
        Ok(Exercise::from_record(&stored))
    }

    pub async fn update(&self, id: &str, patch: ExercisePatch) -> TableResult<Exercise> {
        patch.validate()?;

        let mut partial = Record::new();
        if let Some(name) = patch.name {
            partial.insert("name".to_string(), name.trim().to_string());
        }
        if let Some(description) = patch.description {
            partial.insert("description".to_string(), description);
        }
        if let Some(muscle_group) = patch.muscle_group {
            partial.insert("muscleGroup".to_string(), muscle_group.trim().to_string());
        }

        let merged = self
            .tables
            .update(EXERCISES.name, id, partial)
            .await
            .map_err(not_found_as("exercise", id))?;
        Ok(Exercise::from_record(&merged))
    }

    /// Delete the exercise, then every set recorded for it.
    ///
    /// The two steps are not atomic: if the cascade fails the exercise is
    /// already gone and its sets remain. Returns the number of sets removed.
    pub async fn delete(&self, id: &str) -> TableResult<usize> {
        self.tables
            .delete(EXERCISES.name, id)
            .await
            .map_err(not_found_as("exercise", id))?;

        match self
            .tables
            .delete_by(SETS.name, SET_EXERCISE_COLUMN, id)
            .await
        {
            Ok(sets_deleted) => {
                info!(id, sets_deleted, "Deleted exercise");
                Ok(sets_deleted)
            }
            Err(e) => {
                error!(id, error = %e, "Exercise deleted but its sets could not be removed");
                Err(e)
            }
        }
    }

    /// Record a set for an existing exercise.
    pub async fn add_set(&self, exercise_id: &str, new: NewSet) -> TableResult<WorkoutSet> {
        let set = new.into_set(new_id(), exercise_id.to_string())?;
        self.get(exercise_id).await?;

        let stored = self.tables.append(SETS.name, set.to_record()).await?;
        info!(exercise_id, id = %set.id, "Added set");
        Ok(WorkoutSet::from_record(&stored))
    }

    /// Sets of an existing exercise, oldest first.
    pub async fn list_sets(&self, exercise_id: &str) -> TableResult<Vec<WorkoutSet>> {
        self.get(exercise_id).await?;
        self.sets_of(exercise_id).await
    }

    async fn sets_of(&self, exercise_id: &str) -> TableResult<Vec<WorkoutSet>> {
        let rows = absent_table_is_empty(
            self.tables
                .list_by(SETS.name, SET_EXERCISE_COLUMN, exercise_id)
                .await,
        )?;
        Ok(rows.iter().map(WorkoutSet::from_record).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TableError;
    use crate::services::tests::adapter;

    fn new_exercise(name: &str) -> NewExercise {
        NewExercise {
            name: Some(name.to_string()),
            description: Some(String::new()),
            muscle_group: Some("chest".to_string()),
        }
    }

    fn new_set(reps: f64, weight: f64) -> NewSet {
        NewSet {
            repetitions: Some(reps),
            weight: Some(weight),
            duration: None,
        }
    }

    #[tokio::test]
    async fn test_create_then_get_returns_equal_record() {
        let service = ExerciseService::new(adapter());
        let created = service.create(new_exercise("Bench Press")).await.unwrap();
        let fetched = service.get(&created.id).await.unwrap();
        assert_eq!(created, fetched);

        let other = service.create(new_exercise("Bench Press")).await.unwrap();
        assert_ne!(created.id, other.id);
        assert_eq!(service.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_create_requires_name() {
        let service = ExerciseService::new(adapter());
        let err = service.create(new_exercise("  ")).await.unwrap_err();
        assert!(matches!(err, TableError::Validation(_)));
    }

    #[tokio::test]
    async fn test_update_is_partial() {
        let service = ExerciseService::new(adapter());
        let created = service.create(new_exercise("Bench")).await.unwrap();

        let updated = service
            .update(
                &created.id,
                ExercisePatch {
                    description: Some("Flat bench".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "Bench");
        assert_eq!(updated.description, "Flat bench");
        assert_eq!(updated.muscle_group, "chest");

        assert!(matches!(
            service.update(&created.id, ExercisePatch::default()).await,
            Err(TableError::Validation(_))
        ));
        assert!(matches!(
            service
                .update(
                    "missing",
                    ExercisePatch {
                        name: Some("x".into()),
                        ..Default::default()
                    }
                )
                .await,
            Err(TableError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_sets_keep_numeric_types() {
        let service = ExerciseService::new(adapter());
        let exercise = service.create(new_exercise("Bench")).await.unwrap();

        let set = service
            .add_set(&exercise.id, new_set(10.0, 52.5))
            .await
            .unwrap();
        assert_eq!(set.exercise_id, exercise.id);
        assert!(!set.timestamp.is_empty());

        let sets = service.list_sets(&exercise.id).await.unwrap();
        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].repetitions, Some(10));
        assert_eq!(sets[0].weight, 52.5);
    }

    #[tokio::test]
    async fn test_add_set_validates_before_lookup() {
        let service = ExerciseService::new(adapter());
        let err = service
            .add_set(
                "missing",
                NewSet {
                    repetitions: Some(1.5),
                    weight: Some(10.0),
                    duration: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, TableError::Validation(_)));

        let err = service
            .add_set("missing", new_set(5.0, 10.0))
            .await
            .unwrap_err();
        assert!(matches!(err, TableError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_summary_aggregates_sets() {
        let service = ExerciseService::new(adapter());
        let exercise = service.create(new_exercise("Bench")).await.unwrap();

        let empty = service.get_with_summary(&exercise.id).await.unwrap();
        assert_eq!(empty.aggregate_set_summary.unwrap().set_count, 0);

        service.add_set(&exercise.id, new_set(8.0, 60.0)).await.unwrap();
        service.add_set(&exercise.id, new_set(5.0, 70.0)).await.unwrap();

        let summary = service
            .get_with_summary(&exercise.id)
            .await
            .unwrap()
            .aggregate_set_summary
            .unwrap();
        assert_eq!(summary.set_count, 2);
        assert_eq!(summary.total_repetitions, 13);
        assert_eq!(summary.total_volume, 830.0);
        assert_eq!(summary.max_weight, Some(70.0));
        assert!(summary.last_performed_at.is_some());
    }

    #[tokio::test]
    async fn test_delete_cascades_only_own_sets() {
        let service = ExerciseService::new(adapter());
        let bench = service.create(new_exercise("Bench")).await.unwrap();
        let squat = service.create(new_exercise("Squat")).await.unwrap();

        service.add_set(&bench.id, new_set(8.0, 60.0)).await.unwrap();
        service.add_set(&bench.id, new_set(8.0, 60.0)).await.unwrap();
        service.add_set(&squat.id, new_set(5.0, 100.0)).await.unwrap();

        assert_eq!(service.delete(&bench.id).await.unwrap(), 2);
        assert!(matches!(
            service.list_sets(&bench.id).await,
            Err(TableError::NotFound(_))
        ));
        assert_eq!(service.list_sets(&squat.id).await.unwrap().len(), 1);

        assert!(matches!(
            service.delete(&bench.id).await,
            Err(TableError::NotFound(_))
        ));
    }
}
