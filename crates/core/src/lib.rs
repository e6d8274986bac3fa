//! Core domain types and shared rules for liftsheet.
//!
//! This crate defines the data model used across all other crates:
//! - Exercises, workout sets, routines, and series
//! - Request payloads and their validation
//! - Lenient parsing of numbers stored as spreadsheet text
//! - Configuration for the server, the backing store, and the cache

pub mod config;
pub mod error;
pub mod exercise;
pub mod numeric;
pub mod routine;
pub mod series;
pub mod timestamp;
pub mod workout_set;

pub use error::{Error, Result};
pub use exercise::{Exercise, ExercisePatch, NewExercise, SetSummary};
pub use routine::{NewRoutine, Routine, RoutineExerciseRequest, RoutinePatch};
pub use series::{NewSeries, Series, SeriesPatch, ValidSeriesPatch};
pub use workout_set::{NewSet, WorkoutSet};

/// Generate a new row id.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
