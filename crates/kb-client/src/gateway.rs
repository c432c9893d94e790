// Single choke point for every call to the knowledge base backend

use crate::config::{GatewayConfig, DEFAULT_BASE_URL};
use crate::error::{RequestError, RequestResult};
use anyhow::{Context, Result};
use chrono::Utc;
use kb_types::ApiStatusSink;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// Whether a call reports into the shared [`ApiStatusSink`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tracking {
    /// Mark loading, clear the previous error, record success time or failure.
    #[default]
    Global,
    /// Leave the shared status alone.
    Silent,
}

#[derive(Debug, Clone)]
pub struct RequestOptions {
    method: Method,
    headers: HeaderMap,
    body: Option<Value>,
    tracking: Tracking,
}

impl RequestOptions {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            headers: HeaderMap::new(),
            body: None,
            tracking: Tracking::Global,
        }
    }

    pub fn get() -> Self {
        Self::new(Method::GET)
    }

    pub fn post() -> Self {
        Self::new(Method::POST)
    }

    pub fn delete() -> Self {
        Self::new(Method::DELETE)
    }

    pub fn json(mut self, body: &impl Serialize) -> RequestResult<Self> {
        let value = serde_json::to_value(body)
            .map_err(|e| RequestError::Encode(format!("failed to encode request body: {e}")))?;
        self.body = Some(value);
        Ok(self)
    }

    /// Caller headers are merged over the default JSON content type.
    pub fn header(mut self, name: reqwest::header::HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn tracking(mut self, tracking: Tracking) -> Self {
        self.tracking = tracking;
        self
    }

    pub fn untracked(self) -> Self {
        self.tracking(Tracking::Silent)
    }
}

/// HTTP gateway to the knowledge base API.
///
/// Tracked calls share one loading flag and one error slot: when tracked calls
/// overlap, the last one to finish decides `is_loading` and the most recent
/// failure decides `error`. This is not a queue.
#[derive(Clone)]
pub struct Gateway {
    http_client: reqwest::Client,
    base_url: String,
    status: Option<Arc<dyn ApiStatusSink>>,
}

impl std::fmt::Debug for Gateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gateway")
            .field("base_url", &self.base_url)
            .field("tracks_status", &self.status.is_some())
            .finish()
    }
}

impl Gateway {
    pub fn builder() -> GatewayBuilder {
        GatewayBuilder::default()
    }

    pub fn from_config(
        config: &GatewayConfig,
        status: Option<Arc<dyn ApiStatusSink>>,
    ) -> Result<Self> {
        let mut builder = Self::builder().base_url(&config.base_url);
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        if let Some(status) = status {
            builder = builder.status(status);
        }
        builder.build()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issue one call and decode the JSON body into `T`.
    ///
    /// Failures are always returned to the caller, after the shared status has
    /// been updated for tracked calls.
    pub async fn request<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> RequestResult<T> {
        let sink = match options.tracking {
            Tracking::Global => self.status.clone(),
            Tracking::Silent => None,
        };

        let _loading = LoadingGuard::begin(sink.clone());
        let method = options.method.clone();

        let result = self.execute::<T>(endpoint, options).await;

        match &result {
            Ok(_) => {
                tracing::debug!(%method, endpoint, "request succeeded");
                if let Some(sink) = &sink {
                    sink.set_api_last_updated(Some(Utc::now()));
                }
            }
            Err(e) => {
                tracing::warn!(%method, endpoint, error = %e, "request failed");
                if let Some(sink) = &sink {
                    sink.set_api_error(Some(e.to_string()));
                }
            }
        }

        result
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> RequestResult<T> {
        let url = format!("{}{}", self.base_url, endpoint);

        let mut request = self
            .http_client
            .request(options.method, &url)
            .headers(options.headers);
        if let Some(body) = &options.body {
            request = request.body(body.to_string());
        }

        let response = request.send().await.map_err(RequestError::network)?;
        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(RequestError::from_status(status, &error_text));
        }

        let bytes = response.bytes().await.map_err(RequestError::network)?;
        serde_json::from_slice(&bytes)
            .map_err(|e| RequestError::Parse(format!("invalid JSON response: {e}")))
    }
}

/// Clears the loading flag when dropped, so it runs on success, failure and
/// when the request future is dropped mid-flight.
struct LoadingGuard {
    sink: Option<Arc<dyn ApiStatusSink>>,
}

impl LoadingGuard {
    fn begin(sink: Option<Arc<dyn ApiStatusSink>>) -> Self {
        if let Some(sink) = &sink {
            sink.set_api_loading(true);
            sink.clear_api_error();
        }
        Self { sink }
    }
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        if let Some(sink) = &self.sink {
            sink.set_api_loading(false);
        }
    }
}

#[derive(Default)]
pub struct GatewayBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
    status: Option<Arc<dyn ApiStatusSink>>,
}

impl GatewayBuilder {
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Where tracked calls report loading/error/last-updated.
    pub fn status(mut self, status: Arc<dyn ApiStatusSink>) -> Self {
        self.status = Some(status);
        self
    }

    pub fn build(self) -> Result<Gateway> {
        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let mut client = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = self.timeout {
            client = client.timeout(timeout);
        }
        let http_client = client.build().context("Failed to create HTTP client")?;

        Ok(Gateway {
            http_client,
            base_url,
            status: self.status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let gateway = Gateway::builder().build().unwrap();
        assert_eq!(gateway.base_url(), "http://localhost:8000");
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let gateway = Gateway::builder()
            .base_url("http://kb.local:8000/")
            .build()
            .unwrap();
        assert_eq!(gateway.base_url(), "http://kb.local:8000");
    }

    #[test]
    fn test_options_default_to_tracked() {
        let options = RequestOptions::get();
        assert_eq!(options.tracking, Tracking::Global);
        assert_eq!(options.untracked().tracking, Tracking::Silent);
    }

    #[test]
    fn test_json_body_encoded() {
        let options = RequestOptions::post()
            .json(&serde_json::json!({"query": "rust"}))
            .unwrap();
        assert_eq!(options.body.unwrap()["query"], "rust");
    }
}
