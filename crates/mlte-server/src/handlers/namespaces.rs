//! Namespace handlers.

use axum::extract::{Path, State};
use axum::Json;
use mlte_core::{Namespace, NamespaceCreate};

use crate::error::ApiError;
use crate::state::AppState;

/// `POST /namespace`
pub async fn create_namespace(
    State(state): State<AppState>,
    Json(req): Json<NamespaceCreate>,
) -> Result<Json<Namespace>, ApiError> {
    let namespace = state
        .with_session(move |session| session.create_namespace(&req))
        .await?;
    Ok(Json(namespace))
}

/// `GET /namespace`
pub async fn list_namespaces(
    State(state): State<AppState>,
) -> Result<Json<Vec<String>>, ApiError> {
    let ids = state
        .with_session(|session| session.list_namespaces())
        .await?;
    Ok(Json(ids))
}

/// `GET /namespace/{namespace_id}`
pub async fn read_namespace(
    State(state): State<AppState>,
    Path(namespace_id): Path<String>,
) -> Result<Json<Namespace>, ApiError> {
    let namespace = state
        .with_session(move |session| session.read_namespace(&namespace_id))
        .await?;
    Ok(Json(namespace))
}

/// `DELETE /namespace/{namespace_id}`
pub async fn delete_namespace(
    State(state): State<AppState>,
    Path(namespace_id): Path<String>,
) -> Result<Json<Namespace>, ApiError> {
    let namespace = state
        .with_session(move |session| session.delete_namespace(&namespace_id))
        .await?;
    Ok(Json(namespace))
}
