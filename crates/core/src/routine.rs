//! Routines: a named, ordered list of exercise ids.
//!
//! The list lives in a single cell. It is written as a JSON array; reading
//! also accepts the older comma-joined form and an empty cell.

use crate::error::{Error, Result};
use crate::exercise::required_text;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A routine as stored in the `Routines` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Routine {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub exercises: Vec<String>,
}

impl Routine {
    /// Whether `exercise_id` is already part of this routine.
    pub fn contains(&self, exercise_id: &str) -> bool {
        self.exercises.iter().any(|id| id == exercise_id)
    }
}

/// Body of `POST /api/routines`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRoutine {
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub exercises: Vec<String>,
}

impl NewRoutine {
    /// Validate and build the routine stored under `id`.
    ///
    /// Existence of the referenced exercises is checked by the caller, which
    /// has access to the `Exercises` table.
    pub fn into_routine(self, id: String) -> Result<Routine> {
        let name = required_text("name", self.name.as_deref())?;
        ensure_unique(&self.exercises)?;
        Ok(Routine {
            id,
            name,
            description: self.description.filter(|d| !d.is_empty()),
            exercises: self.exercises,
        })
    }
}

/// Body of `PUT /api/routines/{id}`. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutinePatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub exercises: Option<Vec<String>>,
}

impl RoutinePatch {
    pub fn validate(&self) -> Result<()> {
        if self.name.is_none() && self.description.is_none() && self.exercises.is_none() {
            return Err(Error::Validation("no fields to update".to_string()));
        }
        if let Some(name) = &self.name {
            required_text("name", Some(name))?;
        }
        if let Some(exercises) = &self.exercises {
            ensure_unique(exercises)?;
        }
        Ok(())
    }
}

/// Body of `POST /api/routines/{id}/exercises`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutineExerciseRequest {
    pub exercise_id: Option<String>,
}

impl RoutineExerciseRequest {
    pub fn exercise_id(&self) -> Result<String> {
        required_text("exerciseId", self.exercise_id.as_deref())
    }
}

/// Serialize an exercise list for storage in one cell.
pub fn encode_exercise_list(exercises: &[String]) -> String {
    serde_json::to_string(exercises).unwrap_or_else(|_| "[]".to_string())
}

/// Parse a stored exercise list cell.
pub fn decode_exercise_list(cell: &str) -> Vec<String> {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }
    if let Ok(list) = serde_json::from_str::<Vec<String>>(trimmed) {
        return list;
    }
    trimmed
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}

fn ensure_unique(exercises: &[String]) -> Result<()> {
    let mut seen = HashSet::new();
    for id in exercises {
        if !seen.insert(id.as_str()) {
            return Err(Error::Validation(format!(
                "exercise {id} is listed more than once"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_routine_without_exercises() {
        let routine = NewRoutine {
            name: Some("Push Day".to_string()),
            ..Default::default()
        }
        .into_routine("r1".to_string())
        .unwrap();

        assert_eq!(routine.name, "Push Day");
        assert!(routine.exercises.is_empty());
        assert!(routine.description.is_none());
    }

    #[test]
    fn new_routine_rejects_repeated_exercise() {
        let result = NewRoutine {
            name: Some("Legs".to_string()),
            description: None,
            exercises: vec!["a".to_string(), "a".to_string()],
        }
        .into_routine("r".to_string());
        assert!(result.is_err());
    }

    #[test]
    fn exercise_list_cell_formats() {
        let list = vec!["e1".to_string(), "e2".to_string()];
        let cell = encode_exercise_list(&list);
        assert_eq!(cell, r#"["e1","e2"]"#);
        assert_eq!(decode_exercise_list(&cell), list);

        assert_eq!(decode_exercise_list("e1, e2"), list);
        assert_eq!(decode_exercise_list(""), Vec::<String>::new());
        assert_eq!(decode_exercise_list("  "), Vec::<String>::new());
        assert_eq!(decode_exercise_list("[]"), Vec::<String>::new());
    }

    #[test]
    fn membership_request_requires_id() {
        assert!(RoutineExerciseRequest::default().exercise_id().is_err());
        let req = RoutineExerciseRequest {
            exercise_id: Some("e1".to_string()),
        };
        assert_eq!(req.exercise_id().unwrap(), "e1");
    }

    #[test]
    fn patch_validation() {
        assert!(RoutinePatch::default().validate().is_err());
        let patch = RoutinePatch {
            exercises: Some(vec!["x".to_string(), "x".to_string()]),
            ..Default::default()
        };
        assert!(patch.validate().is_err());
    }
}
