//! Router assembly for the MLTE store API.
//!
//! [`build_router`] mounts every route under the API prefix (normally
//! `/api`) with CORS and tracing middleware layers.

use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

const VERSION_PATH: &str = "/namespace/{namespace_id}/model/{model_id}/version/{version_id}";

/// CORS for the configured origins; any origin when the list is empty.
pub fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    if allowed_origins.is_empty() {
        return CorsLayer::permissive();
    }
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "ignoring malformed CORS origin");
                None
            }
        })
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Builds the API router. Routes use axum 0.8 `/{param}` syntax.
pub fn build_router(state: AppState, prefix: &str, cors: CorsLayer) -> Router {
    let api = Router::new()
        .route("/health", get(handlers::health::health))
        .route(
            "/namespace",
            get(handlers::namespaces::list_namespaces)
                .post(handlers::namespaces::create_namespace),
        )
        .route(
            "/namespace/{namespace_id}",
            get(handlers::namespaces::read_namespace)
                .delete(handlers::namespaces::delete_namespace),
        )
        .route(
            "/namespace/{namespace_id}/model",
            get(handlers::models::list_models).post(handlers::models::create_model),
        )
        .route(
            "/namespace/{namespace_id}/model/{model_id}",
            get(handlers::models::read_model).delete(handlers::models::delete_model),
        )
        .route(
            "/namespace/{namespace_id}/model/{model_id}/version",
            get(handlers::versions::list_versions).post(handlers::versions::create_version),
        )
        .route(
            VERSION_PATH,
            get(handlers::versions::read_version).delete(handlers::versions::delete_version),
        )
        .route(
            &format!("{}/artifact", VERSION_PATH),
            get(handlers::artifacts::read_artifacts).post(handlers::artifacts::write_artifact),
        )
        .route(
            &format!("{}/artifact/{}", VERSION_PATH, handlers::artifacts::SEARCH_SEGMENT),
            post(handlers::artifacts::search_artifacts)
                .get(handlers::artifacts::read_search_artifact)
                .delete(handlers::artifacts::delete_search_artifact),
        )
        .route(
            &format!("{}/artifact/{{artifact_id}}", VERSION_PATH),
            get(handlers::artifacts::read_artifact).delete(handlers::artifacts::delete_artifact),
        );

    let app = if prefix.is_empty() || prefix == "/" {
        api
    } else {
        Router::new().nest(prefix, api)
    };

    app.layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
