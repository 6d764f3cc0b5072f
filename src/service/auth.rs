//! Auth provider seam.
//!
//! Session resolution and credential operations live behind [`AuthClient`];
//! the user service composes them with table access for its auth-coupled
//! create and update flows. [`GoTrueClient`] talks to the hosted provider's
//! `/auth/v1` endpoints; tests supply an in-memory double.

use super::errors::ClientError;
use super::table::ClientResult;
use crate::config::BackendConfig;
use async_trait::async_trait;
use parking_lot::RwLock;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use std::time::Duration;

/// Authenticated identity as seen by the auth provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    /// Provider-side UUID, stored on rows as `id_authentication`
    pub id: String,
}

#[async_trait]
pub trait AuthClient: Send + Sync {
    /// Currently authenticated user, if any.
    async fn current_user(&self) -> ClientResult<Option<AuthUser>>;

    /// Register a new credential pair, returning the created identity.
    async fn sign_up(&self, email: &str, password: &str) -> ClientResult<AuthUser>;

    /// Verify a credential pair without replacing the active session.
    async fn sign_in_with_password(&self, email: &str, password: &str) -> ClientResult<()>;

    /// Change the password of the session's account.
    async fn update_password(&self, new_password: &str) -> ClientResult<()>;

    /// Change the email of the session's account.
    async fn update_email(&self, new_email: &str) -> ClientResult<()>;
}

/// GoTrue-style implementation over the hosted auth endpoints.
pub struct GoTrueClient {
    http: Client,
    base_url: String,
    api_key: String,
    access_token: RwLock<Option<String>>,
}

impl GoTrueClient {
    pub fn new(config: &BackendConfig) -> ClientResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| ClientError::message(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            access_token: RwLock::new(None),
        })
    }

    /// Install the session token obtained by the login flow (owned by the
    /// excluded routing/session collaborator).
    pub fn set_access_token(&self, token: Option<String>) {
        *self.access_token.write() = token;
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }

    fn bearer_token(&self) -> Option<String> {
        self.access_token.read().clone()
    }

    async fn decode_failure(response: reqwest::Response) -> ClientError {
        let status = response.status();
        match response.json::<Value>().await {
            Ok(body) => {
                let message = body
                    .get("msg")
                    .or_else(|| body.get("message"))
                    .or_else(|| body.get("error_description"))
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("HTTP {status}"));
                ClientError {
                    code: None,
                    message,
                }
            }
            Err(_) => ClientError::message(format!("HTTP {status}")),
        }
    }

    fn extract_user_id(body: &Value) -> Option<String> {
        body.get("id")
            .or_else(|| body.get("user").and_then(|user| user.get("id")))
            .and_then(Value::as_str)
            .map(str::to_string)
    }
}

#[async_trait]
impl AuthClient for GoTrueClient {
    async fn current_user(&self) -> ClientResult<Option<AuthUser>> {
        let Some(token) = self.bearer_token() else {
            return Ok(None);
        };

        let response = self
            .http
            .get(self.auth_url("user"))
            .header("apikey", &self.api_key)
            .bearer_auth(&token)
            .send()
            .await
            .map_err(|e| ClientError::message(e.to_string()))?;

        if response.status() == StatusCode::UNAUTHORIZED {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(Self::decode_failure(response).await);
        }

        let body = response
            .json::<Value>()
            .await
            .map_err(|e| ClientError::message(e.to_string()))?;
        Ok(Self::extract_user_id(&body).map(|id| AuthUser { id }))
    }

    async fn sign_up(&self, email: &str, password: &str) -> ClientResult<AuthUser> {
        let response = self
            .http
            .post(self.auth_url("signup"))
            .header("apikey", &self.api_key)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(|e| ClientError::message(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::decode_failure(response).await);
        }

        let body = response
            .json::<Value>()
            .await
            .map_err(|e| ClientError::message(e.to_string()))?;
        Self::extract_user_id(&body)
            .map(|id| AuthUser { id })
            .ok_or_else(|| ClientError::message("resposta de cadastro sem identidade"))
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> ClientResult<()> {
        let response = self
            .http
            .post(self.auth_url("token"))
            .query(&[("grant_type", "password")])
            .header("apikey", &self.api_key)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(|e| ClientError::message(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::decode_failure(response).await);
        }
        Ok(())
    }

    async fn update_password(&self, new_password: &str) -> ClientResult<()> {
        self.update_user(json!({ "password": new_password })).await
    }

    async fn update_email(&self, new_email: &str) -> ClientResult<()> {
        self.update_user(json!({ "email": new_email })).await
    }
}

impl GoTrueClient {
    async fn update_user(&self, patch: Value) -> ClientResult<()> {
        let token = self
            .bearer_token()
            .ok_or_else(|| ClientError::message("sessão de autenticação ausente"))?;

        let response = self
            .http
            .put(self.auth_url("user"))
            .header("apikey", &self.api_key)
            .bearer_auth(&token)
            .json(&patch)
            .send()
            .await
            .map_err(|e| ClientError::message(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::decode_failure(response).await);
        }
        Ok(())
    }
}
