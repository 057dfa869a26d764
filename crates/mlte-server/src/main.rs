//! Binary entrypoint for the MLTE store server.
//!
//! Configuration comes from `MLTE_*` environment variables, see
//! [`Settings`]. `RUST_LOG` overrides `MLTE_LOG_LEVEL` when set.

use std::sync::Arc;

use mlte_server::config::Settings;
use mlte_server::router::{build_router, cors_layer};
use mlte_server::state::AppState;
use mlte_store::create_store;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::from_env()?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.log_level.as_filter()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let uri = settings.backend_uri.clone();
    let store = tokio::task::spawn_blocking(move || create_store(&uri)).await??;
    let state = AppState::new(Arc::from(store));

    let app = build_router(
        state,
        &settings.api_prefix,
        cors_layer(&settings.allowed_origins),
    );

    let addr = settings.bind_address();
    tracing::info!("mlte server starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
