//! Request tracking middleware
//!
//! Provides request ID generation and propagation, and keeps credentials out
//! of trace output.

use axum::http::HeaderName;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    sensitive_headers::SetSensitiveRequestHeadersLayer,
};

/// Sensitive headers that should be masked in logs
///
/// Names are lowercase; the search protocol's `AccessToken` header is the
/// one that matters most here.
pub const SENSITIVE_HEADERS: &[&str] = &["accesstoken", "authorization", "cookie"];

/// Create a request ID layer that stamps each request with a UUID `x-request-id`
pub fn request_id_layer() -> SetRequestIdLayer<MakeRequestUuid> {
    SetRequestIdLayer::x_request_id(MakeRequestUuid)
}

/// Create a request ID propagation layer
pub fn request_id_propagation_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::x_request_id()
}

/// Create a sensitive headers layer
pub fn sensitive_headers_layer() -> SetSensitiveRequestHeadersLayer {
    let headers = SENSITIVE_HEADERS
        .iter()
        .copied()
        .map(HeaderName::from_static)
        .collect::<Vec<_>>();

    SetSensitiveRequestHeadersLayer::new(headers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sensitive_headers_constant() {
        assert!(SENSITIVE_HEADERS.contains(&"accesstoken"));
        assert!(SENSITIVE_HEADERS.contains(&"authorization"));
    }

    #[test]
    fn test_access_token_header_is_masked() {
        let name = crate::models::ACCESS_TOKEN_HEADER.to_ascii_lowercase();
        assert!(SENSITIVE_HEADERS.contains(&name.as_str()));
    }

    #[test]
    fn test_sensitive_headers_layer_builds() {
        let _layer = sensitive_headers_layer();
    }
}
