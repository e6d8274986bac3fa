//! Workout sets: one row per performed set, keyed to an exercise.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// A set as stored in the `Sets` table.
///
/// `repetitions` is `None` and `weight` is NaN when the stored cell is not a
/// number; both serialize as JSON `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutSet {
    pub id: String,
    pub exercise_id: String,
    pub repetitions: Option<i64>,
    pub weight: f64,
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}

/// Body of `POST /api/exercises/{id}/sets`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSet {
    pub repetitions: Option<f64>,
    pub weight: Option<f64>,
    /// Duration in seconds.
    pub duration: Option<f64>,
}

impl NewSet {
    /// Validate the payload and build the set for `exercise_id`.
    ///
    /// The timestamp is left empty; the table layer stamps it on append.
    pub fn into_set(self, id: String, exercise_id: String) -> Result<WorkoutSet> {
        let repetitions = validate_repetitions(self.repetitions)?;
        let weight = validate_number("weight", self.weight)?;
        let duration = match self.duration {
            Some(d) if !d.is_finite() || d < 0.0 => {
                return Err(Error::Validation(
                    "duration must be a non-negative number".to_string(),
                ));
            }
            other => other,
        };

        Ok(WorkoutSet {
            id,
            exercise_id,
            repetitions: Some(repetitions),
            weight,
            timestamp: String::new(),
            duration,
        })
    }
}

/// Repetitions must be a whole, non-negative number.
pub(crate) fn validate_repetitions(value: Option<f64>) -> Result<i64> {
    let reps = validate_number("repetitions", value)?;
    if reps < 0.0 || reps.fract() != 0.0 || reps > i64::MAX as f64 {
        return Err(Error::Validation(
            "repetitions must be a non-negative integer".to_string(),
        ));
    }
    Ok(reps as i64)
}

pub(crate) fn validate_number(field: &str, value: Option<f64>) -> Result<f64> {
    match value {
        Some(v) if v.is_finite() => Ok(v),
        Some(_) => Err(Error::Validation(format!("{field} must be a finite number"))),
        None => Err(Error::Validation(format!("{field} is required"))),
    }
}
