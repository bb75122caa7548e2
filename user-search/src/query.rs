//! Search pipeline: filter, then order, then window
//!
//! This module turns a user sequence and a [`SearchQuery`] into the page of
//! users the server returns. Each stage runs on a fresh copy of the matching
//! records, so the shared store is never reordered.
//!
//! # Example
//!
//! ```rust
//! use user_search::models::UserRecord;
//! use user_search::query::{execute, SearchQuery};
//!
//! let users = vec![
//!     UserRecord { id: 1, name: "Zed Moss".into(), age: 30, about: "".into(), gender: "male".into() },
//!     UserRecord { id: 2, name: "Amy Fox".into(), age: 25, about: "".into(), gender: "female".into() },
//! ];
//!
//! let query = SearchQuery::new()
//!     .with_order_field("Name")
//!     .with_order_by(1)
//!     .with_limit(10);
//!
//! let page = execute(&users, &query).unwrap();
//! assert_eq!(page[0].name, "Amy Fox");
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::models::UserRecord;

/// Error raised by the search pipeline
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// The requested order field is not one of `Id`, `Name`, `Age`
    #[error("unknown order field {0:?}")]
    BadOrderField(String),
}

/// Field a result page can be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderField {
    /// Numeric user id
    Id,
    /// Full name, compared byte-wise
    #[default]
    Name,
    /// Numeric age
    Age,
}

impl fmt::Display for OrderField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id => write!(f, "Id"),
            Self::Name => write!(f, "Name"),
            Self::Age => write!(f, "Age"),
        }
    }
}

impl FromStr for OrderField {
    type Err = QueryError;

    /// Parse a wire order field; the empty string means [`OrderField::Name`]
    ///
    /// # Example
    ///
    /// ```rust
    /// use user_search::query::OrderField;
    ///
    /// assert_eq!("".parse::<OrderField>().unwrap(), OrderField::Name);
    /// assert_eq!("Age".parse::<OrderField>().unwrap(), OrderField::Age);
    /// assert!("age".parse::<OrderField>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "Name" => Ok(Self::Name),
            "Id" => Ok(Self::Id),
            "Age" => Ok(Self::Age),
            other => Err(QueryError::BadOrderField(other.to_string())),
        }
    }
}

impl OrderField {
    fn comparator(self) -> fn(&UserRecord, &UserRecord) -> Ordering {
        match self {
            Self::Id => |a, b| a.id.cmp(&b.id),
            Self::Name => |a, b| a.name.cmp(&b.name),
            Self::Age => |a, b| a.age.cmp(&b.age),
        }
    }
}

/// Direction derived from the signed `order_by` parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Keep dataset order; no sort runs at all
    #[default]
    AsIs,
    /// Smallest first
    Asc,
    /// Largest first
    Desc,
}

impl SortOrder {
    /// Map the wire value: positive is ascending, negative descending, zero as-is
    ///
    /// # Example
    ///
    /// ```rust
    /// use user_search::query::SortOrder;
    ///
    /// assert_eq!(SortOrder::from_order_by(1), SortOrder::Asc);
    /// assert_eq!(SortOrder::from_order_by(-7), SortOrder::Desc);
    /// assert_eq!(SortOrder::from_order_by(0), SortOrder::AsIs);
    /// ```
    #[must_use]
    pub const fn from_order_by(order_by: i64) -> Self {
        if order_by > 0 {
            Self::Asc
        } else if order_by < 0 {
            Self::Desc
        } else {
            Self::AsIs
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AsIs => write!(f, "as-is"),
            Self::Asc => write!(f, "asc"),
            Self::Desc => write!(f, "desc"),
        }
    }
}

/// Server-side search parameters, already coerced to non-negative windows
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    /// Substring filter; empty matches everything
    pub query: String,
    /// Raw order field as received
    pub order_field: String,
    /// Raw order direction as received
    pub order_by: i64,
    /// Maximum number of users in the page
    pub limit: usize,
    /// Number of matching users to skip
    pub offset: usize,
}

impl SearchQuery {
    /// Create an empty query
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the substring filter
    #[must_use]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    /// Set the raw order field
    #[must_use]
    pub fn with_order_field(mut self, field: impl Into<String>) -> Self {
        self.order_field = field.into();
        self
    }

    /// Set the raw order direction
    #[must_use]
    pub fn with_order_by(mut self, order_by: i64) -> Self {
        self.order_by = order_by;
        self
    }

    /// Set the page size
    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Set the number of users to skip
    #[must_use]
    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }
}

/// Whether `query` occurs in the concatenation of `name` and `about`
///
/// Matching is a literal, case-sensitive substring test and may span the
/// boundary between the two fields.
#[must_use]
pub fn matches(user: &UserRecord, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let mut haystack = String::with_capacity(user.name.len() + user.about.len());
    haystack.push_str(&user.name);
    haystack.push_str(&user.about);
    haystack.contains(query)
}

/// Stable in-place sort; [`SortOrder::AsIs`] leaves the slice untouched
pub fn sort_users(users: &mut [UserRecord], field: OrderField, order: SortOrder) {
    let compare = field.comparator();
    match order {
        SortOrder::AsIs => {}
        SortOrder::Asc => users.sort_by(compare),
        SortOrder::Desc => users.sort_by(|a, b| compare(b, a)),
    }
}

/// Clamp `offset` and `limit` to the available records and cut the page
#[must_use]
pub fn window(mut users: Vec<UserRecord>, offset: usize, limit: usize) -> Vec<UserRecord> {
    let offset = offset.min(users.len());
    let limit = limit.min(users.len() - offset);
    users.truncate(offset + limit);
    users.drain(..offset);
    users
}

/// Run the full pipeline
///
/// The order field is validated even when `order_by` is zero.
pub fn execute(users: &[UserRecord], query: &SearchQuery) -> Result<Vec<UserRecord>, QueryError> {
    let mut results: Vec<UserRecord> = users
        .iter()
        .filter(|user| matches(user, &query.query))
        .cloned()
        .collect();

    let field: OrderField = query.order_field.parse()?;
    sort_users(&mut results, field, SortOrder::from_order_by(query.order_by));

    Ok(window(results, query.offset, query.limit))
}
