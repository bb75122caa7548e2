//! User record storage
//!
//! The dispatcher never owns records directly. It asks a [`UserSource`] for
//! the current ordered sequence on every request, which lets the same handler
//! serve from a preloaded [`UserStore`] or from a [`JsonFileSource`] that
//! re-reads its file each time.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

use crate::models::UserRecord;

pub mod dataset;

pub use dataset::{parse_dataset, DatasetError, JsonFileSource};

/// Provider of the ordered user sequence a query runs against
#[async_trait]
pub trait UserSource: Send + Sync {
    /// Return every user, in dataset order
    ///
    /// Errors are reported to HTTP callers verbatim, so their `Display`
    /// should be the loader's own message.
    async fn users(&self) -> Result<Arc<[UserRecord]>, DatasetError>;
}

/// Read-only, in-memory user collection
///
/// Built once and shared behind an `Arc`; cloning is cheap and never copies
/// records.
///
/// # Example
///
/// ```rust
/// use user_search::models::UserRecord;
/// use user_search::store::UserStore;
///
/// let store = UserStore::new(vec![UserRecord {
///     id: 0,
///     name: "Boyd Wolf".to_string(),
///     age: 22,
///     about: "Nulla cillum enim".to_string(),
///     gender: "male".to_string(),
/// }]);
///
/// assert_eq!(store.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct UserStore {
    users: Arc<[UserRecord]>,
}

impl UserStore {
    /// Wrap an already-loaded sequence
    pub fn new(users: Vec<UserRecord>) -> Self {
        Self {
            users: users.into(),
        }
    }

    /// Load a store from a JSON dataset file
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let users = dataset::load_dataset(path.as_ref()).await?;
        tracing::info!(
            path = %path.as_ref().display(),
            count = users.len(),
            "Loaded user dataset"
        );
        Ok(Self::new(users))
    }

    /// Number of records in the store
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Whether the store holds no records
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Borrow the records in dataset order
    pub fn as_slice(&self) -> &[UserRecord] {
        &self.users
    }
}

#[async_trait]
impl UserSource for UserStore {
    async fn users(&self) -> Result<Arc<[UserRecord]>, DatasetError> {
        Ok(Arc::clone(&self.users))
    }
}
