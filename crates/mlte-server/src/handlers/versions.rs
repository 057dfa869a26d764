//! Version handlers, scoped by namespace and model.

use axum::extract::{Path, State};
use axum::Json;
use mlte_core::{Version, VersionCreate};

use crate::error::ApiError;
use crate::state::AppState;

/// `POST /namespace/{namespace_id}/model/{model_id}/version`
pub async fn create_version(
    State(state): State<AppState>,
    Path((namespace_id, model_id)): Path<(String, String)>,
    Json(req): Json<VersionCreate>,
) -> Result<Json<Version>, ApiError> {
    let version = state
        .with_session(move |session| session.create_version(&namespace_id, &model_id, &req))
        .await?;
    Ok(Json(version))
}

/// `GET /namespace/{namespace_id}/model/{model_id}/version`
pub async fn list_versions(
    State(state): State<AppState>,
    Path((namespace_id, model_id)): Path<(String, String)>,
) -> Result<Json<Vec<String>>, ApiError> {
    let ids = state
        .with_session(move |session| session.list_versions(&namespace_id, &model_id))
        .await?;
    Ok(Json(ids))
}

/// `GET /namespace/{namespace_id}/model/{model_id}/version/{version_id}`
pub async fn read_version(
    State(state): State<AppState>,
    Path((namespace_id, model_id, version_id)): Path<(String, String, String)>,
) -> Result<Json<Version>, ApiError> {
    let version = state
        .with_session(move |session| {
            session.read_version(&namespace_id, &model_id, &version_id)
        })
        .await?;
    Ok(Json(version))
}

/// `DELETE /namespace/{namespace_id}/model/{model_id}/version/{version_id}`
pub async fn delete_version(
    State(state): State<AppState>,
    Path((namespace_id, model_id, version_id)): Path<(String, String, String)>,
) -> Result<Json<Version>, ApiError> {
    let version = state
        .with_session(move |session| {
            session.delete_version(&namespace_id, &model_id, &version_id)
        })
        .await?;
    Ok(Json(version))
}
