//! An [`HttpClient`] that answers requests with an in-process router.
//!
//! Lets a [`RemoteHttpStore`](mlte_store::RemoteHttpStore) talk to a server
//! without binding a socket. The client owns a current-thread runtime and
//! blocks on each request, so it must be used from synchronous code.

use axum::body::Body;
use axum::http::{header, Method, Request};
use axum::Router;
use mlte_store::{HttpClient, HttpMethod, HttpRequest, HttpResponse, StoreError, StoreResult};
use tokio::runtime::{Builder, Runtime};
use tower::ServiceExt;

pub struct InProcessClient {
    router: Router,
    runtime: Runtime,
}

impl InProcessClient {
    pub fn new(router: Router) -> std::io::Result<Self> {
        let runtime = Builder::new_current_thread().enable_all().build()?;
        Ok(InProcessClient { router, runtime })
    }
}

impl HttpClient for InProcessClient {
    fn send(&self, request: HttpRequest) -> StoreResult<HttpResponse> {
        let method = match request.method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Delete => Method::DELETE,
        };
        let body = match &request.body {
            Some(json) => Body::from(serde_json::to_vec(json)?),
            None => Body::empty(),
        };
        let request = Request::builder()
            .method(method)
            .uri(request.url.as_str())
            .header(header::CONTENT_TYPE, "application/json")
            .body(body)
            .map_err(StoreError::internal)?;

        self.runtime.block_on(async {
            let response = self
                .router
                .clone()
                .oneshot(request)
                .await
                .map_err(StoreError::internal)?;
            let status = response.status().as_u16();
            let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
                .await
                .map_err(StoreError::internal)?;
            Ok(HttpResponse {
                status,
                body: String::from_utf8_lossy(&bytes).into_owned(),
            })
        })
    }
}
