//! HTTP client for the remote disambiguation service.
//!
//! One bounded-timeout POST to `/resolve`. Failures surface as
//! [`BackendError`]; the resolver service converts them into a chat intent
//! so the pipeline survives the service being completely unavailable.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use herald_application::ports::resolver_backend::{
    BackendError, ResolveRequest, ResolveResponse, ResolverBackend,
};

/// Remote resolver adapter.
pub struct HttpResolverClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpResolverClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl ResolverBackend for HttpResolverClient {
    async fn resolve(&self, request: &ResolveRequest) -> Result<ResolveResponse, BackendError> {
        let url = format!("{}/resolve", self.base_url);
        debug!(%url, trace_id = %request.trace_id, "calling remote resolver");

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|err| BackendError::Transport(err.to_string()))?;

        let response = response
            .error_for_status()
            .map_err(|err| BackendError::Transport(err.to_string()))?;

        response
            .json::<ResolveResponse>()
            .await
            .map_err(|err| BackendError::BadResponse(err.to_string()))
    }
}
