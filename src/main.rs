//! Hyakunin Isshu · Quiz Backend
//!
//! - Axum HTTP + WebSocket API
//! - In-memory per-session quiz state (no durable storage)
//! - Static SPA fallback (./static/index.html)
//!
//! Important env variables:
//!   PORT          : u16 (default 3000)
//!   DATA_PATH     : path to the poem dataset JSON (default: bundled data)
//!   QUIZ_CONFIG_PATH  : path to TOML config (default mode, choice count)
//!   LOG_LEVEL    : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT      : "pretty" (default) or "json"

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::{info, instrument};

use hyakunin_backend::config::load_quiz_config_from_env;
use hyakunin_backend::routes::build_router;
use hyakunin_backend::state::AppState;
use hyakunin_backend::telemetry;

#[instrument(level = "info", skip_all)]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  // Build shared application state. The dataset load is a startup
  // precondition: a missing or malformed file aborts here.
  let cfg = load_quiz_config_from_env().unwrap_or_default();
  let state = Arc::new(AppState::new(cfg)?);

  // Build the HTTP router with routes, CORS and tracing layers.
  let app = build_router(state.clone());

  // Read port from env or default to 3000.
  let addr: SocketAddr = std::env::var("PORT")
    .ok()
    .and_then(|p| p.parse::<u16>().ok())
    .map(|port| SocketAddr::from(([0, 0, 0, 0], port)))
    .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

  let listener = TcpListener::bind(addr).await?;
  info!(target: "hyakunin_backend", %addr, "HTTP server listening");
  axum::serve(listener, app).await?;
  Ok(())
}
