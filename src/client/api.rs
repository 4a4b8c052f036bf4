//! Remote Data Access
//!
//! Authenticated HTTP calls against the chat server. Every response is parsed into an
//! [`Envelope`]; failures are mapped to [`ApiError`]. Nothing here retries.

use reqwest::{Client, Method, RequestBuilder};
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;

use crate::client::config::Config;
use crate::client::session::SessionProvider;
use crate::shared::error::ApiError;
use crate::shared::messaging::Envelope;

/// Transport used by every higher layer
pub trait RemoteApi: Send + Sync + 'static {
    /// GET `path` with query `params`
    fn fetch(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> impl Future<Output = Result<Envelope, ApiError>> + Send;

    /// Send `body` as JSON with `method` to `path`
    fn mutate(
        &self,
        method: Method,
        path: &str,
        body: Value,
    ) -> impl Future<Output = Result<Envelope, ApiError>> + Send;
}

/// reqwest-backed [`RemoteApi`]
#[derive(Clone)]
pub struct HttpApi {
    config: Config,
    client: Client,
    session: Arc<dyn SessionProvider>,
}

impl HttpApi {
    pub fn new(config: Config, session: Arc<dyn SessionProvider>) -> Result<Self, ApiError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.app().request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ApiError::network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            config,
            client,
            session,
        })
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let token = self
            .session
            .token()
            .or_else(|| self.config.get_token().cloned());
        match token {
            Some(token) => request.header("Authorization", format!("Bearer {}", token)),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Envelope, ApiError> {
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| ApiError::network(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| ApiError::network(e.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_slice::<Envelope>(&body)
                .ok()
                .and_then(|envelope| envelope.message);
            tracing::warn!(
                status = status.as_u16(),
                message = message.as_deref().unwrap_or(""),
                "request failed"
            );
            return Err(ApiError::server(status.as_u16(), message));
        }

        if body.is_empty() {
            return Ok(Envelope {
                data: None,
                message: None,
            });
        }
        Ok(serde_json::from_slice(&body)?)
    }
}

impl RemoteApi for HttpApi {
    async fn fetch(&self, path: &str, params: &[(&str, &str)]) -> Result<Envelope, ApiError> {
        let url = self.config.api_url(path);
        tracing::debug!(%url, "GET");
        self.send(self.client.get(&url).query(params)).await
    }

    async fn mutate(&self, method: Method, path: &str, body: Value) -> Result<Envelope, ApiError> {
        let url = self.config.api_url(path);
        tracing::debug!(%url, %method, "mutate");
        self.send(self.client.request(method, &url).json(&body)).await
    }
}
