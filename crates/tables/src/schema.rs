//! Canonical table schemas.

/// Fixed header of one table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSchema {
    pub name: &'static str,
    pub columns: &'static [&'static str],
    /// Column stamped with the current time on append when left empty.
    pub timestamp_column: Option<&'static str>,
}

impl TableSchema {
    /// Header row as owned strings.
    pub fn header(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.to_string()).collect()
    }
}

pub const EXERCISES: TableSchema = TableSchema {
    name: "Exercises",
    columns: &["id", "name", "description", "muscleGroup"],
    timestamp_column: None,
};

pub const SETS: TableSchema = TableSchema {
    name: "Sets",
    columns: &["id", "exerciseId", "repetitions", "weight", "timestamp", "duration"],
    timestamp_column: Some("timestamp"),
};

pub const ROUTINES: TableSchema = TableSchema {
    name: "Routines",
    columns: &["id", "name", "description", "exercises"],
    timestamp_column: None,
};

pub const SERIES: TableSchema = TableSchema {
    name: "Series",
    columns: &["id", "exerciseId", "repetitions", "weight", "date"],
    timestamp_column: None,
};

/// The set of tables the application knows how to provision.
#[derive(Debug, Clone)]
pub struct Catalog {
    tables: Vec<TableSchema>,
}

impl Catalog {
    pub fn new(tables: Vec<TableSchema>) -> Self {
        Self { tables }
    }

    pub fn get(&self, name: &str) -> Option<&TableSchema> {
        self.tables.iter().find(|t| t.name == name)
    }

    pub fn tables(&self) -> &[TableSchema] {
        &self.tables
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new(vec![EXERCISES, SETS, ROUTINES, SERIES])
    }
}
