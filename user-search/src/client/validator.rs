//! Local request checks, run before any network I/O

use super::error::ClientError;
use crate::models::SearchRequest;

/// Reject negative `limit` or `offset`; every other field is the server's concern
///
/// # Example
///
/// ```rust
/// use user_search::client::validate;
/// use user_search::models::SearchRequest;
///
/// assert!(validate(&SearchRequest::new().with_limit(1)).is_ok());
///
/// let err = validate(&SearchRequest::new().with_offset(-1)).unwrap_err();
/// assert_eq!(err.to_string(), "offset must be > 0");
/// ```
pub fn validate(request: &SearchRequest) -> Result<&SearchRequest, ClientError> {
    if request.limit < 0 {
        return Err(ClientError::InvalidArgument("limit must be > 0".to_string()));
    }
    if request.offset < 0 {
        return Err(ClientError::InvalidArgument("offset must be > 0".to_string()));
    }
    Ok(request)
}
