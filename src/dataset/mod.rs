pub mod reader;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use thiserror::Error;

/// Columns are assigned by position; header names are ignored.
pub const REQUIRED_COLUMNS: usize = 3;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed delimited file: {0}")]
    Csv(#[from] csv::Error),

    #[error("cannot read spreadsheet: {0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("spreadsheet has no worksheets")]
    NoWorksheet,

    #[error("file needs at least 3 columns (id, english, korean), found {found}")]
    TooFewColumns { found: usize },

    #[error("file contains no sentences")]
    Empty,

    #[error("unsupported file type: {0:?}")]
    UnsupportedFormat(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry {
    pub id: String,
    pub english: String,
    pub korean: String,
}

/// Identity of a loaded file. Re-opening an unchanged file yields an equal id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DatasetId {
    pub path: PathBuf,
    pub len: u64,
    pub modified: Option<SystemTime>,
}

impl DatasetId {
    pub fn from_path(path: &Path) -> Result<Self, DatasetError> {
        let io_err = |source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        };
        let canonical = fs::canonicalize(path).map_err(io_err)?;
        let meta = fs::metadata(&canonical).map_err(io_err)?;
        Ok(Self {
            path: canonical,
            len: meta.len(),
            modified: meta.modified().ok(),
        })
    }

    /// Id for data that did not come from a file.
    #[cfg(test)]
    pub fn synthetic(name: &str) -> Self {
        Self {
            path: PathBuf::from(name),
            len: 0,
            modified: None,
        }
    }

    pub fn display_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.path.to_string_lossy().to_string())
    }
}

#[derive(Clone, Debug)]
pub struct Dataset {
    id: DatasetId,
    entries: Vec<Entry>,
}

impl Dataset {
    pub fn load(path: &Path) -> Result<Self, DatasetError> {
        let id = DatasetId::from_path(path)?;
        let table = reader::read_table(&id.path)?;
        let dataset = Self::from_table(id, table)?;
        tracing::info!(
            file = %dataset.id.display_name(),
            sentences = dataset.len(),
            "dataset loaded"
        );
        Ok(dataset)
    }

    /// Build from an already parsed table. Rows without an English sentence
    /// are dropped.
    pub fn from_table(id: DatasetId, table: reader::Table) -> Result<Self, DatasetError> {
        if table.column_count < REQUIRED_COLUMNS {
            return Err(DatasetError::TooFewColumns {
                found: table.column_count,
            });
        }

        let mut entries = Vec::with_capacity(table.rows.len());
        for (row_no, row) in table.rows.into_iter().enumerate() {
            let cell = |i: usize| row.get(i).map(|c| c.trim().to_string()).unwrap_or_default();
            let english = cell(1);
            if english.is_empty() {
                tracing::warn!(row = row_no + 2, "skipping row without an English sentence");
                continue;
            }
            entries.push(Entry {
                id: cell(0),
                english,
                korean: cell(2),
            });
        }

        if entries.is_empty() {
            return Err(DatasetError::Empty);
        }
        Ok(Self { id, entries })
    }

    #[cfg(test)]
    pub fn from_entries(id: DatasetId, entries: Vec<Entry>) -> Result<Self, DatasetError> {
        if entries.is_empty() {
            return Err(DatasetError::Empty);
        }
        Ok(Self { id, entries })
    }

    pub fn id(&self) -> &DatasetId {
        &self.id
    }

    pub fn get(&self, index: usize) -> Option<&Entry> {
        self.entries.get(index)
    }

    /// Never zero; construction rejects datasets without sentences.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
