//! HTTP surface: a JSON endpoint returning the final snapshot and an SSE
//! endpoint streaming one snapshot per stage.

pub mod render;
mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::query::Providers;

pub struct AppState {
    pub providers: Providers,
    /// Surface unexpected failures in full instead of the generic message.
    pub debug: bool,
}

pub fn make_app(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/search", get(routes::search))
        .route("/api/v1/search/stream", get(routes::search_stream))
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

pub async fn run_server(bind: SocketAddr, state: AppState) -> std::io::Result<()> {
    let listener = TcpListener::bind(bind).await?;
    info!(addr = %listener.local_addr()?, debug = state.debug, "listening");
    axum::serve(listener, make_app(state)).await
}
