//! JSON dataset loading
//!
//! Dataset rows carry separate `first_name` and `last_name` fields; the
//! loader joins them with a single space to form [`UserRecord::name`].
//! A document is either a bare array of rows or an object with a `rows`
//! array.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use super::UserSource;
use crate::models::UserRecord;

/// Failure while reading or decoding a dataset
#[derive(Debug, Error)]
pub enum DatasetError {
    /// The dataset file could not be read
    #[error("open {path}: {source}")]
    Io {
        /// Path that was being read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The dataset is not a valid row document
    #[error("{0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct DatasetRow {
    id: i64,
    first_name: String,
    last_name: String,
    age: i64,
    #[serde(default)]
    about: String,
    #[serde(default)]
    gender: String,
}

impl From<DatasetRow> for UserRecord {
    fn from(row: DatasetRow) -> Self {
        Self {
            id: row.id,
            name: format!("{} {}", row.first_name, row.last_name),
            age: row.age,
            about: row.about,
            gender: row.gender,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DatasetDocument {
    Rows(Vec<DatasetRow>),
    Wrapped { rows: Vec<DatasetRow> },
}

/// Parse a dataset document, preserving row order
///
/// # Example
///
/// ```rust
/// use user_search::store::parse_dataset;
///
/// let users = parse_dataset(r#"[
///     {"id": 0, "first_name": "Boyd", "last_name": "Wolf", "age": 22,
///      "about": "Nulla cillum", "gender": "male"}
/// ]"#).unwrap();
///
/// assert_eq!(users[0].name, "Boyd Wolf");
/// ```
pub fn parse_dataset(input: &str) -> Result<Vec<UserRecord>, DatasetError> {
    let rows = match serde_json::from_str::<DatasetDocument>(input)? {
        DatasetDocument::Rows(rows) | DatasetDocument::Wrapped { rows } => rows,
    };
    Ok(rows.into_iter().map(UserRecord::from).collect())
}

/// Read and parse a dataset file
pub async fn load_dataset(path: &Path) -> Result<Vec<UserRecord>, DatasetError> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    parse_dataset(&contents)
}

/// Source that re-reads its dataset file on every request
///
/// Edits to the file are visible to the next query, and a missing or
/// corrupt file turns into an HTTP 500 carrying the loader's message.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    /// Create a source reading from `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path the source reads from
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl UserSource for JsonFileSource {
    async fn users(&self) -> Result<Arc<[UserRecord]>, DatasetError> {
        let users = load_dataset(&self.path).await?;
        tracing::debug!(path = %self.path.display(), count = users.len(), "Dataset reloaded");
        Ok(users.into())
    }
}
