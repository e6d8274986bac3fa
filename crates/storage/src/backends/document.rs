//! In-process spreadsheet document shared by the memory and filesystem backends.

use crate::error::{StorageError, StorageResult};
use crate::traits::{RawRow, SheetInfo};
use serde::{Deserialize, Serialize};

/// A sheet with its header stored as the first row.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Sheet {
    pub sheet_id: i64,
    pub title: String,
    /// Header followed by data rows.
    #[serde(default)]
    pub rows: Vec<RawRow>,
}

impl Sheet {
    fn info(&self) -> SheetInfo {
        SheetInfo {
            sheet_id: self.sheet_id,
            title: self.title.clone(),
        }
    }

    fn data_len(&self) -> usize {
        self.rows.len().saturating_sub(1)
    }

    fn check_index(&self, index: usize) -> StorageResult<()> {
        let len = self.data_len();
        if index >= len {
            return Err(StorageError::RowOutOfRange {
                sheet: self.title.clone(),
                index,
                len,
            });
        }
        Ok(())
    }
}

/// A whole spreadsheet document.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Document {
    pub title: String,
    #[serde(default)]
    pub next_sheet_id: i64,
    #[serde(default)]
    pub sheets: Vec<Sheet>,
}

impl Document {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            next_sheet_id: 1,
            sheets: Vec::new(),
        }
    }

    pub fn list_sheets(&self) -> Vec<SheetInfo> {
        self.sheets.iter().map(Sheet::info).collect()
    }

    fn sheet(&self, title: &str) -> StorageResult<&Sheet> {
        self.sheets
            .iter()
            .find(|s| s.title == title)
            .ok_or_else(|| StorageError::NotFound(title.to_string()))
    }

    fn sheet_mut(&mut self, title: &str) -> StorageResult<&mut Sheet> {
        self.sheets
            .iter_mut()
            .find(|s| s.title == title)
            .ok_or_else(|| StorageError::NotFound(title.to_string()))
    }

    pub fn add_sheet(&mut self, title: &str, header: &[String]) -> StorageResult<SheetInfo> {
        if self.sheets.iter().any(|s| s.title == title) {
            return Err(StorageError::AlreadyExists(title.to_string()));
        }
        let sheet = Sheet {
            sheet_id: self.next_sheet_id,
            title: title.to_string(),
            rows: vec![header.to_vec()],
        };
        self.next_sheet_id += 1;
        let info = sheet.info();
        self.sheets.push(sheet);
        Ok(info)
    }

    pub fn delete_sheet(&mut self, title: &str) -> StorageResult<()> {
        let position = self
            .sheets
            .iter()
            .position(|s| s.title == title)
            .ok_or_else(|| StorageError::NotFound(title.to_string()))?;
        self.sheets.remove(position);
        Ok(())
    }

    pub fn header_row(&self, title: &str) -> StorageResult<RawRow> {
        Ok(self.sheet(title)?.rows.first().cloned().unwrap_or_default())
    }

    pub fn rows(&self, title: &str) -> StorageResult<Vec<RawRow>> {
        Ok(self.sheet(title)?.rows.iter().skip(1).cloned().collect())
    }

    pub fn append_row(&mut self, title: &str, row: RawRow) -> StorageResult<()> {
        let sheet = self.sheet_mut(title)?;
        if sheet.rows.is_empty() {
            // Keep row 0 reserved for the header.
            sheet.rows.push(Vec::new());
        }
        sheet.rows.push(row);
        Ok(())
    }

    pub fn update_row(&mut self, title: &str, index: usize, row: RawRow) -> StorageResult<()> {
        let sheet = self.sheet_mut(title)?;
        sheet.check_index(index)?;
        sheet.rows[index + 1] = row;
        Ok(())
    }

    pub fn delete_row(&mut self, title: &str, index: usize) -> StorageResult<()> {
        let sheet = self.sheet_mut(title)?;
        sheet.check_index(index)?;
        sheet.rows.remove(index + 1);
        Ok(())
    }
}
