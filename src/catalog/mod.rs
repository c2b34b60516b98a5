use std::fs::File;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One row of the problem catalog. Identity is the row's position in the
/// catalog sequence, which is stable for the life of the process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemRecord {
    pub id: i64,
    pub title: String,
    pub difficulty: String,
    pub url: String,
    pub description: String,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to open problem catalog at {path}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed problem catalog: {0}")]
    Malformed(#[from] csv::Error),
    #[error("problem catalog at {0} contains no rows")]
    Empty(PathBuf),
}

/// The fixed, ordered problem corpus. Loaded once at startup and read-only
/// afterwards; both similarity indices keep their rows in this order.
#[derive(Debug, Clone)]
pub struct Catalog {
    records: Vec<ProblemRecord>,
}

impl Catalog {
    /// Load the catalog from a CSV file with columns
    /// `id,title,difficulty,url,description` (any column order).
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let file = File::open(path).map_err(|source| CatalogError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        let mut reader = csv::Reader::from_reader(file);
        let mut records = Vec::new();
        for row in reader.deserialize() {
            records.push(row?);
        }

        if records.is_empty() {
            return Err(CatalogError::Empty(path.to_path_buf()));
        }

        Ok(Self { records })
    }

    pub fn from_records(records: Vec<ProblemRecord>) -> Self {
        Self { records }
    }

    pub fn get(&self, index: usize) -> Option<&ProblemRecord> {
        self.records.get(index)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Description column for every record, in catalog order. This is the
    /// text both indices are built from.
    pub fn descriptions(&self) -> Vec<String> {
        self.records.iter().map(|r| r.description.clone()).collect()
    }
}
