//! Axum server setup and router construction.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::post;
use enigma_rs::{GeminiClient, service::RiddleService};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

use crate::api::{self, AppState};

/// JSON body ceiling — generous so requests with embedded base64 images fit.
pub const MAX_BODY_BYTES: usize = 50 * 1024 * 1024;

/// Build the full axum router.
///
/// The router serves:
/// - `POST /generate-enigmas` (prompt mode)
/// - `POST /generate-enigmas/raw` (pass-through mode)
/// - Optional static files for everything else
pub fn build_router(
    service: Arc<RiddleService<GeminiClient>>,
    static_dir: Option<PathBuf>,
) -> Router {
    let state = AppState { service };

    // CORS wide open: the study-companion page is served from anywhere.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut router = Router::new()
        .route("/generate-enigmas", post(api::post_generate))
        .route("/generate-enigmas/raw", post(api::post_generate_raw))
        .with_state(state)
        .layer(cors)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES));

    if let Some(dir) = static_dir {
        router = router.fallback_service(ServeDir::new(dir));
    }

    router
}

/// Start the axum server and return the bound address.
pub async fn start_server(router: Router, bind_addr: SocketAddr) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind(bind_addr).await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    addr
}
