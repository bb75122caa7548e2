//! Wire and domain types shared by the search server and client
//!
//! Field names follow the wire protocol exactly: a user serializes as
//! `{"id", "name", "age", "about", "gender"}` and an error body as
//! `{"error"}`.

use serde::{Deserialize, Serialize};

/// Error message the server sends when the requested order field is unknown
pub const ERROR_BAD_ORDER_FIELD: &str = "ErrorBadOrderField";

/// Header carrying the shared access secret
pub const ACCESS_TOKEN_HEADER: &str = "AccessToken";

/// A single user in the directory
///
/// Records are immutable once they enter a store. `name` is already the
/// combined first and last name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Identifier, unique within a dataset
    pub id: i64,
    /// Full display name
    pub name: String,
    /// Age in years
    pub age: i64,
    /// Free-text biography
    pub about: String,
    /// Gender as written in the dataset
    pub gender: String,
}

/// Parameters of a single search call
///
/// `limit` and `offset` are signed so that callers can express (and the
/// client can reject) negative values.
///
/// # Example
///
/// ```rust
/// use user_search::models::SearchRequest;
///
/// let request = SearchRequest::new()
///     .with_limit(10)
///     .with_query("Hilda")
///     .with_order("Age", 1);
///
/// assert_eq!(request.limit, 10);
/// assert_eq!(request.offset, 0);
/// assert_eq!(request.order_field, "Age");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Maximum number of users to return
    pub limit: i64,
    /// Number of matching users to skip
    pub offset: i64,
    /// Substring to look for in `name + about`
    pub query: String,
    /// One of `""`, `"Id"`, `"Name"`, `"Age"`
    pub order_field: String,
    /// `-1` descending, `0` dataset order, `1` ascending
    pub order_by: i64,
}

impl SearchRequest {
    /// Create an empty request (limit 0, offset 0, no filter, dataset order)
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page size
    #[must_use]
    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = limit;
        self
    }

    /// Set the number of users to skip
    #[must_use]
    pub fn with_offset(mut self, offset: i64) -> Self {
        self.offset = offset;
        self
    }

    /// Set the substring filter
    #[must_use]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    /// Set the order field and direction
    #[must_use]
    pub fn with_order(mut self, field: impl Into<String>, order_by: i64) -> Self {
        self.order_field = field.into();
        self.order_by = order_by;
        self
    }
}

/// Outcome of a successful search
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchResponse {
    /// Users in the requested window
    pub users: Vec<UserRecord>,
    /// Whether at least one more matching user exists past this window
    pub next_page: bool,
}

/// Error body returned by the server for every non-200 response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchErrorResponse {
    /// Error message; `"ErrorBadOrderField"` or an opaque server message
    pub error: String,
}

impl SearchErrorResponse {
    /// Create a new error body
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_record_wire_names() {
        let user = UserRecord {
            id: 7,
            name: "Leann Travis".to_string(),
            age: 34,
            about: "Friendly".to_string(),
            gender: "female".to_string(),
        };

        let value = serde_json::to_value(&user).unwrap();
        assert_eq!(value["id"], 7);
        assert_eq!(value["name"], "Leann Travis");
        assert_eq!(value["age"], 34);
        assert_eq!(value["about"], "Friendly");
        assert_eq!(value["gender"], "female");
    }

    #[test]
    fn test_error_body_shape() {
        let body = serde_json::to_string(&SearchErrorResponse::new(ERROR_BAD_ORDER_FIELD)).unwrap();
        assert_eq!(body, r#"{"error":"ErrorBadOrderField"}"#);
    }

    #[test]
    fn test_request_builder() {
        let request = SearchRequest::new()
            .with_limit(5)
            .with_offset(3)
            .with_query("rien")
            .with_order("Id", -1);

        assert_eq!(request.limit, 5);
        assert_eq!(request.offset, 3);
        assert_eq!(request.query, "rien");
        assert_eq!(request.order_field, "Id");
        assert_eq!(request.order_by, -1);
    }
}
