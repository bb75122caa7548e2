//! Search client
//!
//! [`SearchClient::find_users`] validates the request locally, asks the
//! server for one record more than the caller wants, classifies the outcome
//! and turns the extra record into [`SearchResponse::next_page`].
//!
//! # Example
//!
//! ```rust,no_run
//! use user_search::client::SearchClient;
//! use user_search::models::SearchRequest;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = SearchClient::new("http://127.0.0.1:8080/", "12345")?;
//! let page = client
//!     .find_users(&SearchRequest::new().with_limit(10).with_query("Friend"))
//!     .await?;
//!
//! for user in &page.users {
//!     println!("{} {}", user.id, user.name);
//! }
//! if page.next_page {
//!     println!("more results available");
//! }
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use reqwest::Url;

use crate::{
    config::ClientConfig,
    error::Result,
    models::{SearchRequest, SearchResponse, UserRecord, ACCESS_TOKEN_HEADER},
};

pub mod classifier;
pub mod error;
pub mod validator;

pub use classifier::{classify_response, classify_transport, TransportFailure};
pub use error::{ClientError, ErrorKind};
pub use validator::validate;

/// Largest page the client requests by default
pub const MAX_PAGE_SIZE: i64 = 25;

/// Default deadline for a single call
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

/// Client for the user search endpoint
#[derive(Debug, Clone)]
pub struct SearchClient {
    base_url: String,
    access_token: String,
    max_limit: i64,
    http: reqwest::Client,
}

impl SearchClient {
    /// Create a client with the default one-second deadline
    pub fn new(base_url: impl Into<String>, access_token: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(DEFAULT_TIMEOUT).build()?;
        Ok(Self::with_http_client(base_url, access_token, http))
    }

    /// Create a client from configuration
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;
        Ok(Self::with_http_client(&config.base_url, &config.access_token, http)
            .with_max_limit(config.max_limit))
    }

    /// Create a client around an existing `reqwest::Client`
    ///
    /// The deadline is whatever that client was built with.
    pub fn with_http_client(
        base_url: impl Into<String>,
        access_token: impl Into<String>,
        http: reqwest::Client,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            access_token: access_token.into(),
            max_limit: MAX_PAGE_SIZE,
            http,
        }
    }

    /// Override the page size cap
    #[must_use]
    pub fn with_max_limit(mut self, max_limit: i64) -> Self {
        self.max_limit = max_limit.max(0);
        self
    }

    /// Endpoint URL this client talks to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Run one search
    ///
    /// Fails with [`ClientError::InvalidArgument`] before touching the
    /// network when `limit` or `offset` is negative. `limit` is capped at
    /// the configured maximum.
    pub async fn find_users(
        &self,
        request: &SearchRequest,
    ) -> std::result::Result<SearchResponse, ClientError> {
        let request = validate(request)?;

        let limit = request.limit.min(self.max_limit);
        let url = self.search_url(request, limit.saturating_add(1))?;
        let encoded = url.query().unwrap_or_default().to_string();

        tracing::debug!(url = %self.base_url, request = %encoded, "Sending search request");

        let response = self
            .http
            .get(url)
            .header(ACCESS_TOKEN_HEADER, &self.access_token)
            .send()
            .await
            .map_err(|e| self.transport_error(e, &encoded))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(e, &encoded))?;

        let users = classify_response(status, &body, &request.order_field).inspect_err(|e| {
            tracing::debug!(status = %status, kind = %e.kind(), error = %e, "Search failed");
        })?;

        Ok(paginate(users, limit))
    }

    fn search_url(
        &self,
        request: &SearchRequest,
        probe_limit: i64,
    ) -> std::result::Result<Url, ClientError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| classify_transport(TransportFailure::Other(e.to_string()), ""))?;

        url.query_pairs_mut()
            .append_pair("limit", &probe_limit.to_string())
            .append_pair("offset", &request.offset.to_string())
            .append_pair("query", &request.query)
            .append_pair("order_field", &request.order_field)
            .append_pair("order_by", &request.order_by.to_string());

        Ok(url)
    }

    fn transport_error(&self, err: reqwest::Error, encoded: &str) -> ClientError {
        let failure = TransportFailure::from(&err);
        tracing::warn!(url = %self.base_url, error = %err, "Search transport failure");
        classify_transport(failure, encoded)
    }
}

/// Trim a probe page of `limit + 1` records down to `limit`
///
/// # Example
///
/// ```rust
/// use user_search::client::paginate;
///
/// let page = paginate(Vec::new(), 5);
/// assert!(page.users.is_empty());
/// assert!(!page.next_page);
/// ```
pub fn paginate(mut users: Vec<UserRecord>, limit: i64) -> SearchResponse {
    let limit = usize::try_from(limit).unwrap_or(0);
    let next_page = users.len() > limit;
    users.truncate(limit);
    SearchResponse { users, next_page }
}
