//! HTTP request dispatcher for the search endpoint
//!
//! Authenticates the `AccessToken` header, coerces query parameters, runs the
//! search pipeline and encodes the page. Every failure leaves the handler as a
//! JSON `{"error": ...}` body with one of four statuses:
//!
//! | Outcome                | Status | Body `error`            |
//! |------------------------|--------|-------------------------|
//! | success                | 200    | (JSON array of users)   |
//! | wrong or missing token | 401    | `""`                    |
//! | unknown order field    | 400    | `"ErrorBadOrderField"`  |
//! | dataset/encoding error | 500    | the underlying message  |
//!
//! Parameter parsing is lenient: unparsable or negative
//! `limit`/`offset` and unparsable `order_by` become `0`.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use thiserror::Error;

use crate::{
    config::SearchConfig,
    error::Result,
    models::{SearchErrorResponse, ERROR_BAD_ORDER_FIELD},
    query::{self, QueryError, SearchQuery},
    store::{DatasetError, JsonFileSource, UserSource, UserStore},
};

const ACCESS_TOKEN: HeaderName = HeaderName::from_static("accesstoken");

/// Server-side failure of a single search request
#[derive(Debug, Error)]
pub enum ApiError {
    /// Access token missing or not equal to the configured secret
    #[error("unauthorized")]
    Unauthorized,

    /// Order field outside `Id`, `Name`, `Age`
    #[error("bad order field {0:?}")]
    BadOrderField(String),

    /// The user source failed
    #[error(transparent)]
    Dataset(#[from] DatasetError),

    /// Any other unexpected failure, such as encoding the result
    #[error("{0}")]
    Internal(String),
}

impl From<QueryError> for ApiError {
    fn from(err: QueryError) -> Self {
        match err {
            QueryError::BadOrderField(field) => Self::BadOrderField(field),
        }
    }
}

impl ApiError {
    /// HTTP status for this error
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::BadOrderField(_) => StatusCode::BAD_REQUEST,
            Self::Dataset(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message placed in the `error` field of the response body
    #[must_use]
    pub fn body_message(&self) -> String {
        match self {
            Self::Unauthorized => String::new(),
            Self::BadOrderField(_) => ERROR_BAD_ORDER_FIELD.to_string(),
            Self::Dataset(err) => err.to_string(),
            Self::Internal(msg) => msg.clone(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            Self::Unauthorized => tracing::debug!("Rejected search request with bad access token"),
            Self::BadOrderField(field) => tracing::warn!(order_field = %field, "Bad order field"),
            Self::Dataset(err) => tracing::error!(error = %err, "Dataset unavailable"),
            Self::Internal(msg) => tracing::error!(error = %msg, "Search failed"),
        }

        error_response(self.status_code(), &SearchErrorResponse::new(self.body_message()))
    }
}

/// Encode an error body, degrading to a 500 carrying the encoder's message
/// if the body itself cannot be serialized
pub fn error_response(status: StatusCode, body: &SearchErrorResponse) -> Response {
    match serde_json::to_vec(body) {
        Ok(bytes) => json_bytes(status, bytes),
        Err(err) => {
            tracing::error!(error = %err, "Failed to encode error body");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": err.to_string() })),
            )
                .into_response()
        }
    }
}

fn json_bytes(status: StatusCode, bytes: Vec<u8>) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, HeaderValue::from_static("application/json"))],
        bytes,
    )
        .into_response()
}

/// Shared state of the search router
///
/// Holds the server secret and the user source; both are read-only and
/// shared across concurrent requests.
#[derive(Clone)]
pub struct SearchState {
    access_token: Arc<str>,
    source: Arc<dyn UserSource>,
}

impl SearchState {
    /// Create state from a secret and a user source
    pub fn new(access_token: impl Into<String>, source: impl UserSource + 'static) -> Self {
        Self::from_shared(access_token, Arc::new(source))
    }

    /// Create state from an already shared source
    pub fn from_shared(access_token: impl Into<String>, source: Arc<dyn UserSource>) -> Self {
        Self {
            access_token: access_token.into().into(),
            source,
        }
    }

    /// Build state from configuration
    ///
    /// With `reload_per_request` the dataset file is read on every request;
    /// otherwise it is loaded once here and a load failure stops startup.
    pub async fn from_config(config: &SearchConfig) -> Result<Self> {
        if config.access_token.is_empty() {
            tracing::warn!("No access token configured; every request will be rejected");
        }

        let source: Arc<dyn UserSource> = if config.reload_per_request {
            tracing::info!(path = %config.dataset_path.display(), "Serving dataset per request");
            Arc::new(JsonFileSource::new(&config.dataset_path))
        } else {
            Arc::new(UserStore::from_path(&config.dataset_path).await?)
        };

        Ok(Self::from_shared(config.access_token.clone(), source))
    }

    fn authenticate(&self, headers: &HeaderMap) -> std::result::Result<(), ApiError> {
        let presented = headers
            .get(ACCESS_TOKEN)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();

        if !self.access_token.is_empty() && presented == &*self.access_token {
            Ok(())
        } else {
            Err(ApiError::Unauthorized)
        }
    }
}

/// Build the search router; the endpoint is `GET /`
pub fn routes(state: SearchState) -> Router {
    Router::new()
        .route("/", get(search_users))
        .with_state(state)
}

/// Coerce raw query parameters into a [`SearchQuery`]
///
/// # Example
///
/// ```rust
/// use std::collections::HashMap;
/// use user_search::dispatcher::parse_params;
///
/// let params = HashMap::from([
///     ("limit".to_string(), "-3".to_string()),
///     ("offset".to_string(), "abc".to_string()),
///     ("order_by".to_string(), "-1".to_string()),
///     ("order_field".to_string(), "Age".to_string()),
/// ]);
///
/// let query = parse_params(&params);
/// assert_eq!(query.limit, 0);
/// assert_eq!(query.offset, 0);
/// assert_eq!(query.order_by, -1);
/// assert_eq!(query.order_field, "Age");
/// ```
pub fn parse_params(params: &HashMap<String, String>) -> SearchQuery {
    let int = |key: &str| {
        params
            .get(key)
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(0)
    };
    let window = |key: &str| usize::try_from(int(key)).unwrap_or(0);
    let text = |key: &str| params.get(key).cloned().unwrap_or_default();

    SearchQuery {
        query: text("query"),
        order_field: text("order_field"),
        order_by: int("order_by"),
        limit: window("limit"),
        offset: window("offset"),
    }
}

async fn search_users(
    State(state): State<SearchState>,
    headers: HeaderMap,
    params: std::result::Result<Query<HashMap<String, String>>, QueryRejection>,
) -> std::result::Result<Response, ApiError> {
    state.authenticate(&headers)?;

    let params = params.map(|Query(p)| p).unwrap_or_default();
    let search = parse_params(&params);
    tracing::debug!(
        query = %search.query,
        order_field = %search.order_field,
        order_by = search.order_by,
        limit = search.limit,
        offset = search.offset,
        "Search request"
    );

    let users = state.source.users().await?;
    let page = query::execute(&users, &search)?;
    let bytes = serde_json::to_vec(&page).map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok(json_bytes(StatusCode::OK, bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserRecord;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    const SECRET: &str = "12345";

    fn users() -> Vec<UserRecord> {
        (0..5)
            .map(|id| UserRecord {
                id,
                name: format!("Person {}", 4 - id),
                age: 20 + (id % 2),
                about: if id == 2 { "Friend".into() } else { "Stranger".into() },
                gender: "male".into(),
            })
            .collect()
    }

    fn app() -> Router {
        routes(SearchState::new(SECRET, UserStore::new(users())))
    }

    async fn call(app: Router, uri: &str, token: Option<&str>) -> (StatusCode, serde_json::Value) {
        let mut request = Request::builder().uri(uri);
        if let Some(token) = token {
            request = request.header("AccessToken", token);
        }
        let response = app
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    struct BrokenSource;

    #[async_trait]
    impl UserSource for BrokenSource {
        async fn users(&self) -> std::result::Result<Arc<[UserRecord]>, DatasetError> {
            Err(DatasetError::Io {
                path: "dataset.json".into(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
            })
        }
    }

    #[test]
    fn test_parse_params_defaults() {
        let query = parse_params(&HashMap::new());
        assert_eq!(query, SearchQuery::default());
    }

    #[test]
    fn test_parse_params_passes_text_through() {
        let params = HashMap::from([
            ("query".to_string(), "  Friend ".to_string()),
            ("order_field".to_string(), "HAHAHA".to_string()),
            ("limit".to_string(), "7".to_string()),
            ("offset".to_string(), "+2".to_string()),
            ("order_by".to_string(), "1.5".to_string()),
        ]);
        let query = parse_params(&params);
        assert_eq!(query.query, "  Friend ");
        assert_eq!(query.order_field, "HAHAHA");
        assert_eq!(query.limit, 7);
        assert_eq!(query.offset, 2);
        assert_eq!(query.order_by, 0);
    }

    #[test]
    fn test_api_error_mapping() {
        assert_eq!(ApiError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::Unauthorized.body_message(), "");
        let bad = ApiError::from(QueryError::BadOrderField("x".into()));
        assert_eq!(bad.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(bad.body_message(), ERROR_BAD_ORDER_FIELD);
        let internal = ApiError::Internal("boom".into());
        assert_eq!(internal.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(internal.body_message(), "boom");
    }

    #[tokio::test]
    async fn test_success_returns_json_array() {
        let (status, body) = call(app(), "/?limit=2&offset=1", Some(SECRET)).await;
        assert_eq!(status, StatusCode::OK);
        let ids: Vec<i64> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|u| u["id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_bad_token_is_unauthorized() {
        let (status, body) = call(app(), "/?limit=1&order_field=HAHAHA", Some("nope")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, serde_json::json!({ "error": "" }));
    }

    #[tokio::test]
    async fn test_missing_token_is_unauthorized() {
        let (status, _) = call(app(), "/?limit=1", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_empty_secret_rejects_empty_token() {
        let app = routes(SearchState::new("", UserStore::new(users())));
        let (status, _) = call(app, "/?limit=1", Some("")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_bad_order_field() {
        let (status, body) = call(app(), "/?limit=1&order_field=HAHAHA", Some(SECRET)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], ERROR_BAD_ORDER_FIELD);
    }

    #[tokio::test]
    async fn test_lenient_parameters() {
        let (status, body) = call(app(), "/?limit=-5&offset=zz&order_by=up", Some(SECRET)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_query_and_order() {
        let (_, body) = call(
            app(),
            "/?limit=10&order_field=Name&order_by=1&query=Person",
            Some(SECRET),
        )
        .await;
        let names: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|u| u["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Person 0", "Person 1", "Person 2", "Person 3", "Person 4"]);

        let (_, body) = call(app(), "/?limit=10&query=rien", Some(SECRET)).await;
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["id"], 2);
    }

    #[tokio::test]
    async fn test_dataset_failure_is_500_with_loader_message() {
        let app = routes(SearchState::new(SECRET, BrokenSource));
        let (status, body) = call(app, "/?limit=1", Some(SECRET)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "open dataset.json: no such file");
    }

    #[tokio::test]
    async fn test_error_response_body() {
        let response = error_response(StatusCode::BAD_REQUEST, &SearchErrorResponse::new("x"));
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], br#"{"error":"x"}"#);
    }
}
