//! Shared helpers for end-to-end tests
//!
//! [`with_faults`] wraps a router so that a handful of reserved access tokens
//! short-circuit into canned misbehaviour, one per client classification
//! branch. Any other token reaches the real dispatcher.

#![allow(dead_code)]

use std::path::PathBuf;
use std::time::Duration;

use axum::{
    body::Body,
    extract::Request,
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    Json, Router,
};
use tokio::{net::TcpListener, sync::oneshot, task::JoinHandle};
use user_search::{
    client::SearchClient,
    config::Config,
    dispatcher::{routes, SearchState},
    server::Server,
    store::UserStore,
};

/// Secret the test servers accept
pub const ACCESS_TOKEN: &str = "12345";

/// Number of rows in the fixture dataset
pub const FIXTURE_LEN: usize = 35;

/// Path of the 35-row fixture dataset
pub fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("dataset.json")
}

/// Load the fixture into an in-memory store
pub async fn fixture_store() -> UserStore {
    UserStore::from_path(fixture_path())
        .await
        .expect("fixture dataset loads")
}

/// Router over the fixture, wrapped with the fault layer
pub async fn fixture_app() -> Router {
    with_faults(routes(SearchState::new(ACCESS_TOKEN, fixture_store().await)))
}

/// Wrap `router` with token-keyed fault injection
pub fn with_faults(router: Router) -> Router {
    router.layer(middleware::from_fn(inject_fault))
}

async fn inject_fault(request: Request, next: Next) -> Response {
    let token = request
        .headers()
        .get("AccessToken")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();

    match token.as_str() {
        "FatalError" => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        "CantUnpack" => (StatusCode::OK, "]").into_response(),
        "CantUnpackError" => (StatusCode::BAD_REQUEST, "]").into_response(),
        "unknownBRError" => (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": "Other error" })),
        )
            .into_response(),
        "Timeout" => {
            tokio::time::sleep(Duration::from_secs(2)).await;
            Response::new(Body::empty())
        }
        "Teapot" => StatusCode::IM_A_TEAPOT.into_response(),
        _ => next.run(request).await,
    }
}

/// A server running on an ephemeral local port
pub struct TestServer {
    pub url: String,
    shutdown: Option<oneshot::Sender<()>>,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Client for this server with the given token
    pub fn client(&self, token: &str) -> SearchClient {
        SearchClient::new(&self.url, token).expect("client builds")
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        self.handle.abort();
    }
}

/// Serve `app` on `127.0.0.1:0` through the full middleware stack
pub async fn spawn(app: Router) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    let (tx, rx) = oneshot::channel::<()>();

    let handle = tokio::spawn(async move {
        let _ = Server::new(Config::default())
            .serve_with_listener(listener, app, async move {
                let _ = rx.await;
            })
            .await;
    });

    TestServer {
        url: format!("http://{addr}/"),
        shutdown: Some(tx),
        handle,
    }
}
