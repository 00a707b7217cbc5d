//! Request/response pipeline for the marketplace REST API.
//!
//! Every request picks up the bearer token from the session store. Every
//! response is decoded once into an explicit result; failures carry the
//! backend payload untouched. Nothing here retries.

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::storage::{SessionStore, StorageKey};
use marketplace_types::{ApiEnvelope, ApiErrorBody};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Called whenever a response comes back 401.
pub type UnauthorizedHook = Arc<dyn Fn() + Send + Sync>;

/// Configured HTTP client for the marketplace API.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    timeout_secs: u64,
    store: Arc<dyn SessionStore>,
    on_unauthorized: Option<UnauthorizedHook>,
}

impl ApiClient {
    pub fn new(config: &ClientConfig, store: Arc<dyn SessionStore>) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ClientError::Config(format!("HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            timeout_secs: config.timeout_secs,
            store,
            on_unauthorized: None,
        })
    }

    /// Install the 401 hook.
    pub fn with_unauthorized_hook(mut self, hook: UnauthorizedHook) -> Self {
        self.on_unauthorized = Some(hook);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Session store the bearer token is read from.
    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.send(self.request(Method::GET, path), Method::GET, path).await
    }

    pub async fn get_query<Q, T>(&self, path: &str, query: &Q) -> ClientResult<T>
    where
        Q: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(self.request(Method::GET, path).query(query), Method::GET, path).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(self.request(Method::POST, path).json(body), Method::POST, path).await
    }

    /// POST without a request body.
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.send(self.request(Method::POST, path), Method::POST, path).await
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(self.request(Method::PUT, path).json(body), Method::PUT, path).await
    }

    pub async fn patch<B, T>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(self.request(Method::PATCH, path).json(body), Method::PATCH, path).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.send(self.request(Method::DELETE, path), Method::DELETE, path).await
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.client.request(method, build_url(&self.base_url, path));
        match self.store.get::<String>(StorageKey::Token) {
            Some(token) if !token.is_empty() => builder.bearer_auth(token),
            _ => builder,
        }
    }

    async fn send<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        method: Method,
        path: &str,
    ) -> ClientResult<T> {
        let resp =
            builder.send().await.map_err(|e| ClientError::transport(e, self.timeout_secs))?;
        let status = resp.status();
        tracing::debug!("{} {} -> {}", method, path, status.as_u16());

        if status == StatusCode::UNAUTHORIZED {
            tracing::warn!("{} {} returned 401", method, path);
            if let Some(hook) = &self.on_unauthorized {
                hook();
            }
        }

        let text = resp.text().await.map_err(|e| ClientError::transport(e, self.timeout_secs))?;
        decode_response(status, &text)
    }
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish_non_exhaustive()
    }
}

pub(crate) fn build_url(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path.trim_start_matches('/'))
}

/// Turn a status + body into the payload or a typed error.
pub(crate) fn decode_response<T: DeserializeOwned>(
    status: StatusCode,
    text: &str,
) -> ClientResult<T> {
    if !status.is_success() {
        let body = serde_json::from_str::<ApiErrorBody>(text).unwrap_or_else(|_| {
            tracing::debug!("Non-JSON error body ({}): {}", status.as_u16(), truncate(text, 200));
            ApiErrorBody::default()
        });
        return Err(ClientError::Api { status: status.as_u16(), body });
    }

    let envelope: ApiEnvelope<T> = if text.trim().is_empty() {
        ApiEnvelope { success: true, message: None, data: None, errors: None }
    } else {
        serde_json::from_str(text)?
    };

    match envelope.into_result() {
        Ok(Some(data)) => Ok(data),
        Ok(None) => serde_json::from_value(serde_json::Value::Null)
            .map_err(|_| ClientError::Decode("response is missing 'data'".to_string())),
        Err(body) => Err(ClientError::Api { status: status.as_u16(), body }),
    }
}

fn truncate(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
