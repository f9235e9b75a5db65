//! HTTP boundary for the enigma riddle generator.
//!
//! `enigma-web` exposes the generation pipeline over an axum server with
//! two endpoints for the two orchestration modes:
//!
//! - `POST /generate-enigmas` — prompt mode. Body
//!   `{"images": [base64...], "prompt": "...", "difficulty": 1-5}`;
//!   responds `{"enigmasText": "..."}`.
//! - `POST /generate-enigmas/raw` — pass-through mode. Body is a fully
//!   formed provider payload, forwarded verbatim; responds with the raw
//!   upstream envelope.
//!
//! Non-API requests fall back to an optional static directory. CORS is wide
//! open and the JSON body ceiling is 50 MB so embedded base64 images fit.
//!
//! # Quick start
//!
//! ```ignore
//! use enigma_rs::prelude::*;
//! use enigma_web::{WebConfig, spawn_web};
//! use std::sync::Arc;
//!
//! let client = GeminiClient::from_env()?;
//! let service = Arc::new(RiddleService::new(Arc::new(ExampleBank::builtin()), client));
//!
//! let addr = spawn_web(service, WebConfig::default()).await;
//! println!("riddle server: http://{addr}");
//! ```

mod api;
mod server;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use enigma_rs::{GeminiClient, service::RiddleService};

/// Configuration for the web server.
pub struct WebConfig {
    /// Address to bind to. Default: `127.0.0.1:3000`. Port 0 binds a random
    /// free port (used by the integration tests).
    pub bind_addr: SocketAddr,
    /// Directory served for non-API requests (the study-companion entry
    /// page). If `None`, only the API endpoints are served.
    pub static_dir: Option<PathBuf>,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            static_dir: None,
        }
    }
}

/// Spawn the web server on a Tokio task and return the bound address.
///
/// The server runs until the Tokio runtime shuts down. In-flight upstream
/// calls are dropped when the requesting client disconnects.
pub async fn spawn_web(
    service: Arc<RiddleService<GeminiClient>>,
    config: WebConfig,
) -> SocketAddr {
    let router = server::build_router(service, config.static_dir);
    server::start_server(router, config.bind_addr).await
}
