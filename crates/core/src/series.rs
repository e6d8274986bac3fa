//! Series: the older flat log of performed sets.
//!
//! Rows are addressed by the synthetic `id` column like every other table.

use crate::error::Result;
use crate::exercise::required_text;
use crate::workout_set::{validate_number, validate_repetitions};
use serde::{Deserialize, Serialize};

/// A series entry as stored in the `Series` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Series {
    pub id: String,
    pub exercise_id: String,
    pub repetitions: Option<i64>,
    pub weight: f64,
    pub date: String,
}

/// Body of `POST /api/series`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSeries {
    pub exercise_id: Option<String>,
    pub repetitions: Option<f64>,
    pub weight: Option<f64>,
    pub date: Option<String>,
}

impl NewSeries {
    pub fn into_series(self, id: String) -> Result<Series> {
        let exercise_id = required_text("exerciseId", self.exercise_id.as_deref())?;
        let repetitions = validate_repetitions(self.repetitions)?;
        let weight = validate_number("weight", self.weight)?;
        Ok(Series {
            id,
            exercise_id,
            repetitions: Some(repetitions),
            weight,
            date: self.date.unwrap_or_default(),
        })
    }
}

/// Body of `PUT /api/series/{id}`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesPatch {
    pub exercise_id: Option<String>,
    pub repetitions: Option<f64>,
    pub weight: Option<f64>,
    pub date: Option<String>,
}

/// A validated [`SeriesPatch`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidSeriesPatch {
    pub exercise_id: Option<String>,
    pub repetitions: Option<i64>,
    pub weight: Option<f64>,
    pub date: Option<String>,
}

impl SeriesPatch {
    pub fn validate(self) -> Result<ValidSeriesPatch> {
        if self.exercise_id.is_none()
            && self.repetitions.is_none()
            && self.weight.is_none()
            && self.date.is_none()
        {
            return Err(crate::Error::Validation("no fields to update".to_string()));
        }

        let exercise_id = match self.exercise_id {
            Some(id) => Some(required_text("exerciseId", Some(&id))?),
            None => None,
        };
        let repetitions = match self.repetitions {
            Some(r) => Some(validate_repetitions(Some(r))?),
            None => None,
        };
        let weight = match self.weight {
            Some(w) => Some(validate_number("weight", Some(w))?),
            None => None,
        };

        Ok(ValidSeriesPatch {
            exercise_id,
            repetitions,
            weight,
            date: self.date,
        })
    }
}
