//! Response classification
//!
//! Maps the raw outcome of a search call onto [`ClientError`]. Precedence:
//!
//! 1. timeout
//! 2. any other transport failure
//! 3. `401`
//! 4. `400` (decode the error body, then inspect it)
//! 5. `500`
//! 6. `200` (decode the user array)
//! 7. any other status

use reqwest::StatusCode;

use super::error::ClientError;
use crate::models::{SearchErrorResponse, UserRecord, ERROR_BAD_ORDER_FIELD};

/// A call that never produced a complete response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportFailure {
    /// The client deadline expired
    Timeout,
    /// Connection, DNS, URL or protocol failure, with its detail
    Other(String),
}

impl From<&reqwest::Error> for TransportFailure {
    fn from(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Other(err.to_string())
        }
    }
}

impl From<reqwest::Error> for TransportFailure {
    fn from(err: reqwest::Error) -> Self {
        Self::from(&err)
    }
}

/// Classify a transport failure; `request` is the encoded query string
pub fn classify_transport(failure: TransportFailure, request: &str) -> ClientError {
    match failure {
        TransportFailure::Timeout => ClientError::Timeout(format!("timeout for {request}")),
        TransportFailure::Other(detail) => ClientError::Unknown(format!("unknown error {detail}")),
    }
}

/// Classify a complete response
///
/// `order_field` is the field the caller asked for, echoed in the
/// bad-order-field message.
pub fn classify_response(
    status: StatusCode,
    body: &[u8],
    order_field: &str,
) -> Result<Vec<UserRecord>, ClientError> {
    match status {
        StatusCode::UNAUTHORIZED => Err(ClientError::Unauthorized("Bad AccessToken".to_string())),
        StatusCode::BAD_REQUEST => {
            let response: SearchErrorResponse = serde_json::from_slice(body)
                .map_err(|e| ClientError::Decode(format!("cant unpack error json: {e}")))?;
            if response.error == ERROR_BAD_ORDER_FIELD {
                Err(ClientError::InvalidArgument(format!(
                    "OrderFeld {order_field} invalid"
                )))
            } else {
                Err(ClientError::Unknown(format!(
                    "unknown bad request error: {}",
                    response.error
                )))
            }
        }
        StatusCode::INTERNAL_SERVER_ERROR => {
            Err(ClientError::Fatal("SearchServer fatal error".to_string()))
        }
        StatusCode::OK => serde_json::from_slice(body)
            .map_err(|e| ClientError::Decode(format!("cant unpack result json: {e}"))),
        other => Err(ClientError::Unknown(format!("unknown error {other}"))),
    }
}
