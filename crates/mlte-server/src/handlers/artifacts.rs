//! Artifact handlers, scoped by a namespace/model/version context.

use axum::extract::{Path, Query as QueryParams, State};
use axum::Json;
use mlte_core::{Artifact, Context, Query, DEFAULT_LIMIT};
use serde::Deserialize;

use crate::error::ApiError;
use crate::state::AppState;

/// Path segment of the search endpoint, also a legal artifact identifier.
pub const SEARCH_SEGMENT: &str = "search";

type ContextPath = (String, String, String);
type ArtifactPath = (String, String, String, String);

fn context((namespace_id, model_id, version_id): ContextPath) -> Result<Context, ApiError> {
    Ok(Context::new(namespace_id, model_id, version_id)?)
}

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub offset: usize,
}

#[derive(Debug, Deserialize)]
pub struct ReadParams {
    pub version: Option<u64>,
}

/// `POST .../version/{version_id}/artifact`
pub async fn write_artifact(
    State(state): State<AppState>,
    Path(path): Path<ContextPath>,
    Json(artifact): Json<Artifact>,
) -> Result<Json<Artifact>, ApiError> {
    let ctx = context(path)?;
    let written = state
        .with_session(move |session| session.write_artifact(&ctx, &artifact))
        .await?;
    Ok(Json(written))
}

/// `GET .../version/{version_id}/artifact?limit=&offset=`
pub async fn read_artifacts(
    State(state): State<AppState>,
    Path(path): Path<ContextPath>,
    QueryParams(params): QueryParams<ListParams>,
) -> Result<Json<Vec<Artifact>>, ApiError> {
    let ctx = context(path)?;
    let artifacts = state
        .with_session(move |session| session.read_artifacts(&ctx, params.limit, params.offset))
        .await?;
    Ok(Json(artifacts))
}

async fn read_one(
    state: AppState,
    ctx: Context,
    artifact_id: String,
    version: Option<u64>,
) -> Result<Json<Artifact>, ApiError> {
    let artifact = state
        .with_session(move |session| session.read_artifact(&ctx, &artifact_id, version))
        .await?;
    Ok(Json(artifact))
}

async fn delete_one(
    state: AppState,
    ctx: Context,
    artifact_id: String,
) -> Result<Json<Artifact>, ApiError> {
    let artifact = state
        .with_session(move |session| session.delete_artifact(&ctx, &artifact_id))
        .await?;
    Ok(Json(artifact))
}

/// `GET .../artifact/{artifact_id}?version=`
pub async fn read_artifact(
    State(state): State<AppState>,
    Path((namespace_id, model_id, version_id, artifact_id)): Path<ArtifactPath>,
    QueryParams(params): QueryParams<ReadParams>,
) -> Result<Json<Artifact>, ApiError> {
    let ctx = context((namespace_id, model_id, version_id))?;
    read_one(state, ctx, artifact_id, params.version).await
}

/// `DELETE .../artifact/{artifact_id}`
pub async fn delete_artifact(
    State(state): State<AppState>,
    Path((namespace_id, model_id, version_id, artifact_id)): Path<ArtifactPath>,
) -> Result<Json<Artifact>, ApiError> {
    let ctx = context((namespace_id, model_id, version_id))?;
    delete_one(state, ctx, artifact_id).await
}

/// `GET .../artifact/search?version=`
///
/// The static search route takes precedence over `{artifact_id}`, so reads
/// of an artifact named `search` land here.
pub async fn read_search_artifact(
    State(state): State<AppState>,
    Path(path): Path<ContextPath>,
    QueryParams(params): QueryParams<ReadParams>,
) -> Result<Json<Artifact>, ApiError> {
    let ctx = context(path)?;
    read_one(state, ctx, SEARCH_SEGMENT.to_string(), params.version).await
}

/// `DELETE .../artifact/search`
pub async fn delete_search_artifact(
    State(state): State<AppState>,
    Path(path): Path<ContextPath>,
) -> Result<Json<Artifact>, ApiError> {
    let ctx = context(path)?;
    delete_one(state, ctx, SEARCH_SEGMENT.to_string()).await
}

/// `POST .../artifact/search`
pub async fn search_artifacts(
    State(state): State<AppState>,
    Path(path): Path<ContextPath>,
    Json(query): Json<Query>,
) -> Result<Json<Vec<Artifact>>, ApiError> {
    let ctx = context(path)?;
    let artifacts = state
        .with_session(move |session| session.search_artifacts(&ctx, &query))
        .await?;
    Ok(Json(artifacts))
}
