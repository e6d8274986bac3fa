//! Exercise records and their request payloads.

use crate::error::{Error, Result};
use crate::workout_set::WorkoutSet;
use serde::{Deserialize, Serialize};

/// An exercise as stored in the `Exercises` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub id: String,
    pub name: String,
    pub description: String,
    pub muscle_group: String,
    /// Derived from the exercise's sets; never stored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregate_set_summary: Option<SetSummary>,
}

/// Aggregate view over all sets recorded for one exercise.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetSummary {
    pub set_count: usize,
    pub total_repetitions: i64,
    /// Sum of `repetitions * weight` over sets where both are numbers.
    pub total_volume: f64,
    pub max_weight: Option<f64>,
    pub last_performed_at: Option<String>,
}

impl SetSummary {
    /// Summarize a slice of sets. Unparseable numbers are skipped.
    pub fn from_sets(sets: &[WorkoutSet]) -> Self {
        let mut summary = SetSummary {
            set_count: sets.len(),
            ..Default::default()
        };

        for set in sets {
            if let Some(reps) = set.repetitions {
                summary.total_repetitions = summary.total_repetitions.saturating_add(reps);
                if set.weight.is_finite() {
                    summary.total_volume += reps as f64 * set.weight;
                }
            }
            if set.weight.is_finite() {
                summary.max_weight = Some(match summary.max_weight {
                    Some(max) => max.max(set.weight),
                    None => set.weight,
                });
            }
            // RFC 3339 UTC strings order lexicographically.
            if !set.timestamp.is_empty()
                && summary
                    .last_performed_at
                    .as_deref()
                    .is_none_or(|last| set.timestamp.as_str() > last)
            {
                summary.last_performed_at = Some(set.timestamp.clone());
            }
        }

        summary
    }
}

/// Body of `POST /api/exercises`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExercise {
    pub name: Option<String>,
    pub description: Option<String>,
    pub muscle_group: Option<String>,
}

impl NewExercise {
    /// Validate and build the exercise that will be stored under `id`.
    pub fn into_exercise(self, id: String) -> Result<Exercise> {
        let name = required_text("name", self.name.as_deref())?;
        Ok(Exercise {
            id,
            name,
            description: self.description.unwrap_or_default(),
            muscle_group: self.muscle_group.unwrap_or_default().trim().to_string(),
            aggregate_set_summary: None,
        })
    }
}

/// Body of `PUT /api/exercises/{id}`. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExercisePatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub muscle_group: Option<String>,
}

impl ExercisePatch {
    /// Reject empty patches and blank names.
    pub fn validate(&self) -> Result<()> {
        if self.name.is_none() && self.description.is_none() && self.muscle_group.is_none() {
            return Err(Error::Validation("no fields to update".to_string()));
        }
        if let Some(name) = &self.name {
            required_text("name", Some(name))?;
        }
        Ok(())
    }
}

/// Require a non-blank text field, returning it trimmed.
pub(crate) fn required_text(field: &str, value: Option<&str>) -> Result<String> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(Error::Validation(format!("{field} is required"))),
    }
}
