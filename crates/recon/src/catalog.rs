//! NDJSON catalog loading.
//!
//! Each non-blank line is one JSON object carrying at least `id` (integer)
//! and `description` (string). A single bad line fails the whole load.

use std::collections::HashMap;
use std::path::Path;

use crate::error::CatalogError;
use crate::model::{CatalogRecord, RecordId};

/// An immutable, ordered catalog with an id index.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    label: String,
    records: Vec<CatalogRecord>,
    index: HashMap<RecordId, usize>,
}

impl Catalog {
    /// Build a catalog from already-parsed records, rejecting duplicate ids.
    /// Line numbers in errors are 1-based record positions.
    pub fn from_records(
        label: impl Into<String>,
        records: Vec<CatalogRecord>,
    ) -> Result<Self, CatalogError> {
        let lines: Vec<usize> = (1..=records.len()).collect();
        Self::build(label.into(), records, &lines)
    }

    /// Parse NDJSON text.
    pub fn parse(label: impl Into<String>, text: &str) -> Result<Self, CatalogError> {
        let label = label.into();
        let mut records = Vec::new();
        let mut lines = Vec::new();

        for (i, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let record: CatalogRecord =
                serde_json::from_str(line).map_err(|e| CatalogError::Parse {
                    catalog: label.clone(),
                    line: i + 1,
                    message: e.to_string(),
                })?;
            records.push(record);
            lines.push(i + 1);
        }

        Self::build(label, records, &lines)
    }

    /// Read and parse an NDJSON file.
    pub fn load(label: impl Into<String>, path: &Path) -> Result<Self, CatalogError> {
        let text = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::parse(label, &text)?;
        log::debug!(
            "loaded {} {} record(s) from {}",
            catalog.len(),
            catalog.label,
            path.display()
        );
        Ok(catalog)
    }

    fn build(
        label: String,
        records: Vec<CatalogRecord>,
        lines: &[usize],
    ) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(records.len());
        for (pos, record) in records.iter().enumerate() {
            if let Some(first) = index.insert(record.id, pos) {
                return Err(CatalogError::DuplicateId {
                    catalog: label,
                    id: record.id,
                    first_line: lines[first],
                    line: lines[pos],
                });
            }
        }
        Ok(Self {
            label,
            records,
            index,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn records(&self) -> &[CatalogRecord] {
        &self.records
    }

    pub fn get(&self, id: RecordId) -> Option<&CatalogRecord> {
        self.index.get(&id).map(|&pos| &self.records[pos])
    }

    pub fn contains(&self, id: RecordId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
