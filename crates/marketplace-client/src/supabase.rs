//! Minimal Supabase REST client: session restore, password update, and
//! object storage.

use crate::config::SupabaseConfig;
use crate::error::{ClientError, ClientResult};
use crate::http::build_url;
use parking_lot::RwLock;
use reqwest::{Client, RequestBuilder};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Tokens of a restored Supabase session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupabaseSession {
    pub access_token: String,
    pub refresh_token: String,
    /// Supabase user id, as reported by `/auth/v1/user`
    pub user_id: String,
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SupabaseUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct SupabaseErrorBody {
    #[serde(default, alias = "error_description", alias = "msg", alias = "error")]
    message: Option<String>,
}

#[derive(Debug, Serialize)]
struct SignRequest {
    #[serde(rename = "expiresIn")]
    expires_in: u64,
}

#[derive(Debug, Deserialize)]
struct SignResponse {
    #[serde(alias = "signedUrl", rename = "signedURL")]
    signed_url: String,
}

/// Supabase client bound to one project.
#[derive(Clone)]
pub struct SupabaseClient {
    client: Client,
    config: SupabaseConfig,
    timeout_secs: u64,
    session: Arc<RwLock<Option<SupabaseSession>>>,
}

impl SupabaseClient {
    pub fn new(config: SupabaseConfig, timeout_secs: u64) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ClientError::Config(format!("Supabase HTTP client: {}", e)))?;
        Ok(Self { client, config, timeout_secs, session: Arc::new(RwLock::new(None)) })
    }

    /// Restore a session from tokens (e.g. a recovery link) after checking
    /// the access token against Supabase.
    pub async fn set_session(
        &self,
        access_token: &str,
        refresh_token: &str,
    ) -> ClientResult<SupabaseSession> {
        let user: SupabaseUser =
            self.send(self.authed(self.client.get(self.url("auth/v1/user")), access_token)).await?;

        let session = SupabaseSession {
            access_token: access_token.to_string(),
            refresh_token: refresh_token.to_string(),
            user_id: user.id,
            email: user.email,
        };
        *self.session.write() = Some(session.clone());
        tracing::debug!("Supabase session restored for {}", session.user_id);
        Ok(session)
    }

    pub fn session(&self) -> Option<SupabaseSession> {
        self.session.read().clone()
    }

    pub fn clear_session(&self) {
        *self.session.write() = None;
    }

    /// Change the password of the user owning the current session.
    pub async fn update_password(&self, new_password: &str) -> ClientResult<()> {
        let token = self.require_session()?.access_token;
        let request = self
            .authed(self.client.put(self.url("auth/v1/user")), &token)
            .json(&serde_json::json!({ "password": new_password }));
        self.send::<serde_json::Value>(request).await.map(|_| ())
    }

    /// Upload `bytes` to `bucket/path`, replacing any existing object.
    pub async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> ClientResult<String> {
        let token = self.bearer();
        let url = self.url(&format!("storage/v1/object/{}/{}", bucket, path));
        let request = self
            .authed(self.client.post(url), &token)
            .header("content-type", content_type)
            .header("x-upsert", "true")
            .body(bytes);
        self.send::<serde_json::Value>(request).await?;
        Ok(format!("{}/{}", bucket, path))
    }

    /// Time-limited download URL for `bucket/path`.
    pub async fn signed_url(
        &self,
        bucket: &str,
        path: &str,
        expires_in: Duration,
    ) -> ClientResult<String> {
        let token = self.bearer();
        let url = self.url(&format!("storage/v1/object/sign/{}/{}", bucket, path));
        let request = self
            .authed(self.client.post(url), &token)
            .json(&SignRequest { expires_in: expires_in.as_secs() });
        let signed: SignResponse = self.send(request).await?;
        Ok(absolute_signed_url(&self.config.url, &signed.signed_url))
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> ClientResult<T> {
        let resp =
            request.send().await.map_err(|e| ClientError::transport(e, self.timeout_secs))?;
        let status = resp.status();
        let text = resp.text().await.map_err(|e| ClientError::transport(e, self.timeout_secs))?;
        if !status.is_success() {
            let body: SupabaseErrorBody = serde_json::from_str(&text).unwrap_or_default();
            return Err(ClientError::Supabase {
                status: status.as_u16(),
                message: body.message.unwrap_or_default(),
            });
        }
        let text = if text.trim().is_empty() { "null" } else { text.as_str() };
        Ok(serde_json::from_str(text)?)
    }

    fn url(&self, path: &str) -> String {
        build_url(&self.config.url, path)
    }

    fn authed(&self, builder: RequestBuilder, token: &str) -> RequestBuilder {
        builder.header("apikey", &self.config.anon_key).bearer_auth(token)
    }

    /// Session token when signed in, anon key otherwise.
    fn bearer(&self) -> String {
        self.session
            .read()
            .as_ref()
            .map(|s| s.access_token.clone())
            .unwrap_or_else(|| self.config.anon_key.clone())
    }

    fn require_session(&self) -> ClientResult<SupabaseSession> {
        self.session().ok_or_else(|| ClientError::Supabase {
            status: 401,
            message: "Auth session missing. Please open the link from your email again."
                .to_string(),
        })
    }
}


/// Supabase returns signed URLs relative to `/storage/v1`.
fn absolute_signed_url(base: &str, signed: &str) -> String {
    if signed.starts_with("http://") || signed.starts_with("https://") {
        return signed.to_string();
    }
    let base = base.trim_end_matches('/');
    if signed.starts_with("/storage/v1") {
        format!("{}{}", base, signed)
    } else {
        format!("{}/storage/v1/{}", base, signed.trim_start_matches('/'))
    }
}
