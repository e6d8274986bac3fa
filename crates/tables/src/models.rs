//! Typed records and their mapping to table rows.

use crate::codec::Record;
use crate::schema::{EXERCISES, ROUTINES, SERIES, SETS, TableSchema};
use liftsheet_core::numeric::{format_float, format_int, parse_float, parse_int};
use liftsheet_core::routine::{decode_exercise_list, encode_exercise_list};
use liftsheet_core::{Exercise, Routine, Series, WorkoutSet};

/// A domain record stored as one row of a fixed table.
pub trait TableRow: Sized {
    const SCHEMA: TableSchema;

    fn to_record(&self) -> Record;

    /// Build from a decoded row. Never fails: unparseable cells become
    /// "not a number" values.
    fn from_record(record: &Record) -> Self;
}

fn cell(record: &Record, column: &str) -> String {
    record.get(column).cloned().unwrap_or_default()
}

fn record_of<const N: usize>(pairs: [(&str, String); N]) -> Record {
    pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
}

fn optional_float(text: &str) -> Option<f64> {
    if text.trim().is_empty() {
        None
    } else {
        Some(parse_float(text))
    }
}

impl TableRow for Exercise {
    const SCHEMA: TableSchema = EXERCISES;

    fn to_record(&self) -> Record {
        record_of([
            ("id", self.id.clone()),
            ("name", self.name.clone()),
            ("description", self.description.clone()),
            ("muscleGroup", self.muscle_group.clone()),
        ])
    }

    fn from_record(record: &Record) -> Self {
        Exercise {
            id: cell(record, "id"),
            name: cell(record, "name"),
            description: cell(record, "description"),
            muscle_group: cell(record, "muscleGroup"),
            aggregate_set_summary: None,
        }
    }
}

impl TableRow for WorkoutSet {
    const SCHEMA: TableSchema = SETS;

    fn to_record(&self) -> Record {
        record_of([
            ("id", self.id.clone()),
            ("exerciseId", self.exercise_id.clone()),
            ("repetitions", format_int(self.repetitions)),
            ("weight", format_float(self.weight)),
            ("timestamp", self.timestamp.clone()),
            ("duration", self.duration.map(format_float).unwrap_or_default()),
        ])
    }

    fn from_record(record: &Record) -> Self {
        WorkoutSet {
            id: cell(record, "id"),
            exercise_id: cell(record, "exerciseId"),
            repetitions: parse_int(&cell(record, "repetitions")),
            weight: parse_float(&cell(record, "weight")),
            timestamp: cell(record, "timestamp"),
            duration: optional_float(&cell(record, "duration")),
        }
    }
}

impl TableRow for Routine {
    const SCHEMA: TableSchema = ROUTINES;

    fn to_record(&self) -> Record {
        record_of([
            ("id", self.id.clone()),
            ("name", self.name.clone()),
            ("description", self.description.clone().unwrap_or_default()),
            ("exercises", encode_exercise_list(&self.exercises)),
        ])
    }

    fn from_record(record: &Record) -> Self {
        let description = cell(record, "description");
        Routine {
            id: cell(record, "id"),
            name: cell(record, "name"),
            description: (!description.is_empty()).then_some(description),
            exercises: decode_exercise_list(&cell(record, "exercises")),
        }
    }
}

impl TableRow for Series {
    const SCHEMA: TableSchema = SERIES;

    fn to_record(&self) -> Record {
        record_of([
            ("id", self.id.clone()),
            ("exerciseId", self.exercise_id.clone()),
            ("repetitions", format_int(self.repetitions)),
            ("weight", format_float(self.weight)),
            ("date", self.date.clone()),
        ])
    }

    fn from_record(record: &Record) -> Self {
        Series {
            id: cell(record, "id"),
            exercise_id: cell(record, "exerciseId"),
            repetitions: parse_int(&cell(record, "repetitions")),
            weight: parse_float(&cell(record, "weight")),
            date: cell(record, "date"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{decode, encode};

    #[test]
    fn test_records_match_schema_columns() {
        let exercise = Exercise {
            id: "e1".into(),
            name: "Squat".into(),
            description: String::new(),
            muscle_group: "Legs".into(),
            aggregate_set_summary: None,
        };
        let record = exercise.to_record();
        let columns: Vec<&str> = record.keys().map(String::as_str).collect();
        assert_eq!(columns, Exercise::SCHEMA.columns);

        let routine = Routine {
            id: "r1".into(),
            name: "Push".into(),
            description: None,
            exercises: vec!["e1".into()],
        };
        let record = routine.to_record();
        let columns: Vec<&str> = record.keys().map(String::as_str).collect();
        assert_eq!(columns, Routine::SCHEMA.columns);
    }

    #[test]
    fn test_set_numbers_survive_storage() {
        let set = WorkoutSet {
            id: "s1".into(),
            exercise_id: "e1".into(),
            repetitions: Some(10),
            weight: 52.5,
            timestamp: "2024-05-01T10:00:00Z".into(),
            duration: None,
        };
        let header = WorkoutSet::SCHEMA.header();
        let raw = encode("Sets", &header, &set.to_record()).unwrap();
        assert_eq!(raw[2], "10");
        assert_eq!(raw[3], "52.5");
        assert_eq!(raw[5], "");

        let back = WorkoutSet::from_record(&decode(&header, &raw));
        assert_eq!(back, set);
    }

    #[test]
    fn test_set_from_hand_edited_cells() {
        let header = WorkoutSet::SCHEMA.header();
        let raw: Vec<String> = ["s1", "e1", "8 reps", "heavy", "", "30s"]
            .iter()
            .map(|v| v.to_string())
            .collect();
        let set = WorkoutSet::from_record(&decode(&header, &raw));
        assert_eq!(set.repetitions, Some(8));
        assert!(set.weight.is_nan());
        assert_eq!(set.duration, Some(30.0));

        let json = serde_json::to_value(&set).unwrap();
        assert!(json["weight"].is_null());
    }

    #[test]
    fn test_routine_reads_legacy_cells() {
        let header = Routine::SCHEMA.header();
        let legacy: Vec<String> = ["r1", "Legs", "", "e1,e2"]
            .iter()
            .map(|v| v.to_string())
            .collect();
        let routine = Routine::from_record(&decode(&header, &legacy));
        assert_eq!(routine.exercises, vec!["e1", "e2"]);
        assert_eq!(routine.description, None);

        let empty: Vec<String> = ["r2", "Pull"].iter().map(|v| v.to_string()).collect();
        assert!(Routine::from_record(&decode(&header, &empty)).exercises.is_empty());
    }
}
