//! # user-search
//!
//! User directory search over HTTP: a lenient search server and a strict,
//! fully classified client.
//!
//! ## Features
//!
//! - **Search pipeline**: substring filter over name and about, stable ordering by
//!   `Id`, `Name` or `Age`, offset/limit window
//! - **Dispatcher**: `AccessToken` header authentication, forgiving parameter parsing,
//!   JSON error bodies
//! - **Client**: local argument validation, six error kinds, next-page detection with a
//!   one-record probe
//! - **Middleware stack**: request tracking, sensitive header masking, timeouts, panic recovery
//! - **Graceful shutdown**: Proper signal handling (SIGTERM, SIGINT)
//!
//! ## Example
//!
//! ```rust,no_run
//! use user_search::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     // Load configuration
//!     let config = Config::load()?;
//!
//!     // Initialize tracing
//!     init_tracing(&config)?;
//!
//!     // Load the dataset and build the router
//!     let state = SearchState::from_config(&config.search).await?;
//!     let app = routes(state);
//!
//!     // Run server
//!     Server::new(config)
//!         .serve(app)
//!         .await?;
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod middleware;
pub mod models;
pub mod observability;
pub mod query;
pub mod server;
pub mod store;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::client::{ClientError, ErrorKind, SearchClient, MAX_PAGE_SIZE};
    pub use crate::config::{ClientConfig, Config, SearchConfig, ServiceConfig};
    pub use crate::dispatcher::{routes, ApiError, SearchState};
    pub use crate::error::{Error, Result};
    pub use crate::middleware::{
        request_id_layer, request_id_propagation_layer, sensitive_headers_layer,
        SENSITIVE_HEADERS,
    };
    pub use crate::models::{SearchRequest, SearchResponse, UserRecord};
    pub use crate::observability::{init_tracing, shutdown_tracing};
    pub use crate::query::{OrderField, SearchQuery, SortOrder};
    pub use crate::server::Server;
    pub use crate::store::{JsonFileSource, UserSource, UserStore};

    pub use axum::Router;
}
