// Raw tables and the sources that produce them.
//
// A source is the boundary of the system: it yields header names plus rows of
// cell text and nothing else. Fetching and markup parsing happen before this
// point; here a source is either a saved CSV dump or an in-memory table.

use async_trait::async_trait;
use std::io::Read;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("failed to read source {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in source {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("source {path} has no header row")]
    MissingHeader { path: String },

    #[error("source {path} timed out after {secs}s")]
    Timeout { path: String, secs: u64 },
}

// ---------------------------------------------------------------------------
// Raw tables
// ---------------------------------------------------------------------------

/// One row of a raw table: ordered (column, text) pairs.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawTableRow {
    fields: Vec<(String, String)>,
}

impl RawTableRow {
    /// Text of the first field named `column`.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }
}

/// A table as delivered by a source: header names and rows of cell text.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub cells: Vec<Vec<String>>,
}

impl RawTable {
    /// Read a table from CSV text. The first record is the header row; rows
    /// may be ragged, which is normal for cell dumps taken from markup.
    pub fn from_csv_reader<R: Read>(rdr: R) -> Result<Self, csv::Error> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(rdr);
        let headers = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();
        let mut cells = Vec::new();
        for record in reader.records() {
            let record = record?;
            cells.push(record.iter().map(str::to_string).collect());
        }
        Ok(Self { headers, cells })
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.headers.iter().any(|h| h == column)
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Zip each cell row with the headers. Cells beyond the header count are
    /// dropped; missing trailing cells are simply absent from the row.
    pub fn rows(&self) -> impl Iterator<Item = RawTableRow> + '_ {
        self.cells.iter().map(|cells| RawTableRow {
            fields: self
                .headers
                .iter()
                .cloned()
                .zip(cells.iter().cloned())
                .collect(),
        })
    }
}

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

/// Anything that can deliver a raw table.
#[async_trait]
pub trait TableSource: Send + Sync {
    /// Human-readable location, used in logs and errors.
    fn describe(&self) -> String;

    async fn fetch(&self) -> Result<RawTable, SourceError>;
}

/// A table saved as a CSV file on disk.
#[derive(Debug, Clone)]
pub struct CsvTableSource {
    path: PathBuf,
}

impl CsvTableSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl TableSource for CsvTableSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch(&self) -> Result<RawTable, SourceError> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|e| SourceError::Io {
                path: self.describe(),
                source: e,
            })?;
        let table = RawTable::from_csv_reader(bytes.as_slice()).map_err(|e| SourceError::Csv {
            path: self.describe(),
            source: e,
        })?;
        if table.headers.iter().all(|h| h.is_empty()) {
            return Err(SourceError::MissingHeader {
                path: self.describe(),
            });
        }
        Ok(table)
    }
}

/// A table that is already in memory.
#[derive(Debug, Clone)]
pub struct InMemorySource {
    label: String,
    table: RawTable,
}

impl InMemorySource {
    pub fn new(label: impl Into<String>, table: RawTable) -> Self {
        Self {
            label: label.into(),
            table,
        }
    }
}

#[async_trait]
impl TableSource for InMemorySource {
    fn describe(&self) -> String {
        self.label.clone()
    }

    async fn fetch(&self) -> Result<RawTable, SourceError> {
        Ok(self.table.clone())
    }
}
