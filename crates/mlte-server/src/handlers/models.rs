//! Model handlers, scoped by namespace.

use axum::extract::{Path, State};
use axum::Json;
use mlte_core::{Model, ModelCreate};

use crate::error::ApiError;
use crate::state::AppState;

/// `POST /namespace/{namespace_id}/model`
pub async fn create_model(
    State(state): State<AppState>,
    Path(namespace_id): Path<String>,
    Json(req): Json<ModelCreate>,
) -> Result<Json<Model>, ApiError> {
    let model = state
        .with_session(move |session| session.create_model(&namespace_id, &req))
        .await?;
    Ok(Json(model))
}

/// `GET /namespace/{namespace_id}/model`
pub async fn list_models(
    State(state): State<AppState>,
    Path(namespace_id): Path<String>,
) -> Result<Json<Vec<String>>, ApiError> {
    let ids = state
        .with_session(move |session| session.list_models(&namespace_id))
        .await?;
    Ok(Json(ids))
}

/// `GET /namespace/{namespace_id}/model/{model_id}`
pub async fn read_model(
    State(state): State<AppState>,
    Path((namespace_id, model_id)): Path<(String, String)>,
) -> Result<Json<Model>, ApiError> {
    let model = state
        .with_session(move |session| session.read_model(&namespace_id, &model_id))
        .await?;
    Ok(Json(model))
}

/// `DELETE /namespace/{namespace_id}/model/{model_id}`
pub async fn delete_model(
    State(state): State<AppState>,
    Path((namespace_id, model_id)): Path<(String, String)>,
) -> Result<Json<Model>, ApiError> {
    let model = state
        .with_session(move |session| session.delete_model(&namespace_id, &model_id))
        .await?;
    Ok(Json(model))
}
