//! Remote HTTP backend: a client of the MLTE artifact store API.
//!
//! Every store operation maps to one request under `<base>/api/namespace`.
//! Response status is translated back into the store's error kinds: 404 is
//! `NotFound`, 409 is `AlreadyExists`, anything else but 200 is `Internal`.
//! When the server reports the entity and identifier in its error body the
//! rebuilt error carries them; otherwise the entity is
//! [`Entity::Resource`] and the identifier is the request path.
//!
//! Transport goes through the [`HttpClient`] trait so tests and in-process
//! servers can stand in for the network.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use mlte_core::context::{model_key, version_key};
use mlte_core::{
    validate_identifier, Artifact, Context, Model, ModelCreate, Namespace, NamespaceCreate,
    Query, Version, VersionCreate,
};
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::{Entity, StoreError, StoreResult};
use crate::traits::{Store, StoreSession};
use crate::uri::StoreUri;

/// Path segment all API routes live under.
pub const API_SEGMENT: &str = "api";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Delete,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
        })
    }
}

/// A request with an optional JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: Url,
    pub body: Option<Value>,
}

/// Status code and raw body text of a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        HttpResponse {
            status,
            body: body.into(),
        }
    }
}

/// Blocking HTTP transport.
///
/// Implementations return `Err` only when no response was received; any
/// status code, including errors, comes back as an [`HttpResponse`].
pub trait HttpClient: Send + Sync {
    fn send(&self, request: HttpRequest) -> StoreResult<HttpResponse>;
}

/// The default transport, on `reqwest`'s blocking client.
///
/// Must not be created or dropped from inside an async runtime.
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    client: reqwest::blocking::Client,
}

impl ReqwestClient {
    pub fn new() -> StoreResult<Self> {
        Ok(ReqwestClient {
            client: reqwest::blocking::Client::builder().build()?,
        })
    }

    pub fn with_timeout(timeout: Duration) -> StoreResult<Self> {
        Ok(ReqwestClient {
            client: reqwest::blocking::Client::builder()
                .timeout(timeout)
                .build()?,
        })
    }
}

impl HttpClient for ReqwestClient {
    fn send(&self, request: HttpRequest) -> StoreResult<HttpResponse> {
        let builder = match request.method {
            HttpMethod::Get => self.client.get(request.url),
            HttpMethod::Post => self.client.post(request.url),
            HttpMethod::Delete => self.client.delete(request.url),
        };
        let builder = match &request.body {
            Some(body) => builder.json(body),
            None => builder,
        };
        let response = builder.send()?;
        let status = response.status().as_u16();
        let body = response.text()?;
        Ok(HttpResponse { status, body })
    }
}

/// Error payload returned by the API server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    #[serde(default)]
    pub success: bool,
    pub error: ErrorBody,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<ErrorDetails>,
}

/// Which entity a not-found or conflict error refers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetails {
    pub entity: Entity,
    pub identifier: String,
}

/// Translates a response into the decoded body or a store error.
pub fn raise_for_response<T: DeserializeOwned>(
    url: &Url,
    response: HttpResponse,
) -> StoreResult<T> {
    match response.status {
        200 => serde_json::from_str(&response.body).map_err(|e| {
            StoreError::internal(format!("malformed response from {}: {}", url, e))
        }),
        404 | 409 => {
            let (entity, identifier) = serde_json::from_str::<ErrorEnvelope>(&response.body)
                .ok()
                .and_then(|envelope| envelope.error.details)
                .map(|d| (d.entity, d.identifier))
                .unwrap_or_else(|| (Entity::Resource, url.path().to_string()));
            if response.status == 404 {
                Err(StoreError::not_found(entity, identifier))
            } else {
                Err(StoreError::already_exists(entity, identifier))
            }
        }
        status => Err(StoreError::internal(format!(
            "HTTP {} from {}: {}",
            status, url, response.body
        ))),
    }
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// An artifact store reached over HTTP.
#[derive(Clone)]
pub struct RemoteHttpStore {
    uri: StoreUri,
    base: Url,
    client: Arc<dyn HttpClient>,
}

impl fmt::Debug for RemoteHttpStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteHttpStore")
            .field("uri", &self.uri)
            .finish_non_exhaustive()
    }
}

impl RemoteHttpStore {
    /// Connects through the default [`ReqwestClient`].
    pub fn new(uri: StoreUri) -> StoreResult<Self> {
        Self::with_client(uri, Arc::new(ReqwestClient::new()?))
    }

    /// Uses `client` for every request instead of the network.
    pub fn with_client(uri: StoreUri, client: Arc<dyn HttpClient>) -> StoreResult<Self> {
        let base = Url::parse(uri.as_str())
            .map_err(|e| StoreError::invalid_uri(uri.as_str(), e.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(StoreError::invalid_uri(uri.as_str(), "not a base URL"));
        }
        Ok(RemoteHttpStore { uri, base, client })
    }

    /// `<base>/api/<segments...>`, each segment percent-encoded.
    fn url(&self, segments: &[&str]) -> StoreResult<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| StoreError::internal(format!("{} is not a base URL", self.base)))?
            .pop_if_empty()
            .push(API_SEGMENT)
            .extend(segments);
        Ok(url)
    }

    fn call<T: DeserializeOwned>(
        &self,
        method: HttpMethod,
        url: Url,
        body: Option<Value>,
    ) -> StoreResult<T> {
        debug!(%method, %url, "remote store request");
        let request = HttpRequest {
            method,
            url: url.clone(),
            body,
        };
        let response = self.client.send(request)?;
        raise_for_response(&url, response)
    }
}

impl Store for RemoteHttpStore {
    fn uri(&self) -> &StoreUri {
        &self.uri
    }

    fn session(&self) -> StoreResult<Box<dyn StoreSession + '_>> {
        Ok(Box::new(RemoteHttpSession { store: self }))
    }
}

/// A session over a [`RemoteHttpStore`]. Holds no connection of its own.
pub struct RemoteHttpSession<'a> {
    store: &'a RemoteHttpStore,
}

fn version_segments<'a>(ns: &'a str, model: &'a str, version: &'a str) -> [&'a str; 6] {
    ["namespace", ns, "model", model, "version", version]
}

impl RemoteHttpSession<'_> {
    fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> StoreResult<T> {
        let url = self.store.url(segments)?;
        self.store.call(HttpMethod::Get, url, None)
    }

    fn post<T: DeserializeOwned>(&self, segments: &[&str], body: Value) -> StoreResult<T> {
        let url = self.store.url(segments)?;
        self.store.call(HttpMethod::Post, url, Some(body))
    }

    fn delete<T: DeserializeOwned>(&self, segments: &[&str]) -> StoreResult<T> {
        let url = self.store.url(segments)?;
        self.store.call(HttpMethod::Delete, url, None)
    }

    // URL path normalization drops `.` and `..` segments, so identifiers no
    // backend could hold never reach the wire. Parents are read first to
    // report the same missing entity as the other backends.
    fn check_namespace(&self, namespace_id: &str) -> StoreResult<()> {
        validate_identifier("namespace", namespace_id)
            .map_err(|_| StoreError::not_found(Entity::Namespace, namespace_id))
    }

    fn check_model(&self, namespace_id: &str, model_id: &str) -> StoreResult<()> {
        self.check_namespace(namespace_id)?;
        if validate_identifier("model", model_id).is_err() {
            self.read_namespace(namespace_id)?;
            return Err(StoreError::not_found(
                Entity::Model,
                model_key(namespace_id, model_id),
            ));
        }
        Ok(())
    }

    fn check_version(
        &self,
        namespace_id: &str,
        model_id: &str,
        version_id: &str,
    ) -> StoreResult<()> {
        self.check_model(namespace_id, model_id)?;
        if validate_identifier("version", version_id).is_err() {
            self.read_model(namespace_id, model_id)?;
            return Err(StoreError::not_found(
                Entity::Version,
                version_key(namespace_id, model_id, version_id),
            ));
        }
        Ok(())
    }

    fn check_artifact(&self, context: &Context, artifact_id: &str) -> StoreResult<()> {
        if validate_identifier("artifact", artifact_id).is_err() {
            self.read_version(context.namespace(), context.model(), context.version())?;
            return Err(StoreError::not_found(
                Entity::Artifact,
                context.artifact_key(artifact_id),
            ));
        }
        Ok(())
    }

    fn artifact_segments<'c>(context: &'c Context) -> Vec<&'c str> {
        let mut segments =
            version_segments(context.namespace(), context.model(), context.version()).to_vec();
        segments.push("artifact");
        segments
    }
}

impl StoreSession for RemoteHttpSession<'_> {
    fn create_namespace(&mut self, namespace: &NamespaceCreate) -> StoreResult<Namespace> {
        namespace.validate()?;
        self.post(&["namespace"], serde_json::to_value(namespace)?)
    }

    fn read_namespace(&self, namespace_id: &str) -> StoreResult<Namespace> {
        self.check_namespace(namespace_id)?;
        self.get(&["namespace", namespace_id])
    }

    fn list_namespaces(&self) -> StoreResult<Vec<String>> {
        self.get(&["namespace"])
    }

    fn delete_namespace(&mut self, namespace_id: &str) -> StoreResult<Namespace> {
        self.check_namespace(namespace_id)?;
        self.delete(&["namespace", namespace_id])
    }

    fn create_model(&mut self, namespace_id: &str, model: &ModelCreate) -> StoreResult<Model> {
        model.validate()?;
        self.check_namespace(namespace_id)?;
        self.post(
            &["namespace", namespace_id, "model"],
            serde_json::to_value(model)?,
        )
    }

    fn read_model(&self, namespace_id: &str, model_id: &str) -> StoreResult<Model> {
        self.check_model(namespace_id, model_id)?;
        self.get(&["namespace", namespace_id, "model", model_id])
    }

    fn list_models(&self, namespace_id: &str) -> StoreResult<Vec<String>> {
        self.check_namespace(namespace_id)?;
        self.get(&["namespace", namespace_id, "model"])
    }

    fn delete_model(&mut self, namespace_id: &str, model_id: &str) -> StoreResult<Model> {
        self.check_model(namespace_id, model_id)?;
        self.delete(&["namespace", namespace_id, "model", model_id])
    }

    fn create_version(
        &mut self,
        namespace_id: &str,
        model_id: &str,
        version: &VersionCreate,
    ) -> StoreResult<Version> {
        version.validate()?;
        self.check_model(namespace_id, model_id)?;
        self.post(
            &["namespace", namespace_id, "model", model_id, "version"],
            serde_json::to_value(version)?,
        )
    }

    fn read_version(
        &self,
        namespace_id: &str,
        model_id: &str,
        version_id: &str,
    ) -> StoreResult<Version> {
        self.check_version(namespace_id, model_id, version_id)?;
        self.get(&version_segments(namespace_id, model_id, version_id))
    }

    fn list_versions(&self, namespace_id: &str, model_id: &str) -> StoreResult<Vec<String>> {
        self.check_model(namespace_id, model_id)?;
        self.get(&["namespace", namespace_id, "model", model_id, "version"])
    }

    fn delete_version(
        &mut self,
        namespace_id: &str,
        model_id: &str,
        version_id: &str,
    ) -> StoreResult<Version> {
        self.check_version(namespace_id, model_id, version_id)?;
        self.delete(&version_segments(namespace_id, model_id, version_id))
    }

    fn write_artifact(&mut self, context: &Context, artifact: &Artifact) -> StoreResult<Artifact> {
        artifact.validate()?;
        self.post(
            &Self::artifact_segments(context),
            serde_json::to_value(artifact)?,
        )
    }

    fn read_artifact(
        &self,
        context: &Context,
        artifact_id: &str,
        version: Option<u64>,
    ) -> StoreResult<Artifact> {
        self.check_artifact(context, artifact_id)?;
        let mut segments = Self::artifact_segments(context);
        segments.push(artifact_id);
        let mut url = self.store.url(&segments)?;
        if let Some(version) = version {
            url.query_pairs_mut()
                .append_pair("version", &version.to_string());
        }
        self.store.call(HttpMethod::Get, url, None)
    }

    fn read_artifacts(
        &self,
        context: &Context,
        limit: usize,
        offset: usize,
    ) -> StoreResult<Vec<Artifact>> {
        let mut url = self.store.url(&Self::artifact_segments(context))?;
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string())
            .append_pair("offset", &offset.to_string());
        self.store.call(HttpMethod::Get, url, None)
    }

    fn search_artifacts(&self, context: &Context, query: &Query) -> StoreResult<Vec<Artifact>> {
        let mut segments = Self::artifact_segments(context);
        segments.push("search");
        self.post(&segments, serde_json::to_value(query)?)
    }

    fn delete_artifact(&mut self, context: &Context, artifact_id: &str) -> StoreResult<Artifact> {
        self.check_artifact(context, artifact_id)?;
        let mut segments = Self::artifact_segments(context);
        segments.push(artifact_id);
        self.delete(&segments)
    }
}
