//! HTTP client for the DocuVault backend.
//!
//! Owns the credential pair, attaches bearer auth, recovers from an
//! expired access token with a single refresh-and-retry, and reports
//! every expected outcome as a value. Constructed explicitly and handed
//! to callers; there is no global instance.

use crate::config::ApiSettings;
use crate::models::{
    AnalyzeAccepted, Document, DocumentStats, Page, PermissionGrant, Tag, User, Visibility,
};
use crate::permissions::PermissionCreate;
use crate::services::token_store::{TokenPair, TokenStore};
use anyhow::Context;
use client_core::{ApiError, ApiResult};
use reqwest::{multipart, Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};
use std::time::Duration;
use validator::Validate;

mod paths {
    pub const LOGIN: &str = "/api/auth/login/";
    pub const REGISTER: &str = "/api/auth/register/";
    pub const ME: &str = "/api/auth/me/";
    pub const REFRESH: &str = "/api/auth/refresh/";
    pub const USERS: &str = "/api/auth/users/";
    pub const DOCUMENTS: &str = "/api/documents/";
    pub const TAGS: &str = "/api/documents/tags/";
    pub const STATS: &str = "/api/documents/stats/";
    pub const PERMISSIONS: &str = "/api/permissions/";
}

pub struct ApiClient {
    http: Client,
    base_url: String,
    store: Arc<dyn TokenStore>,
    tokens: RwLock<TokenPair>,
}

/// Token pair as returned by the auth endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenEnvelope {
    pub access: String,
    pub refresh: String,
}

/// Successful login/registration payload. A 200 body missing `user` or
/// `tokens` fails deserialization and is surfaced as an error.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub user: User,
    pub tokens: TokenEnvelope,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct RefreshResponse {
    access: String,
}

#[derive(Debug, Clone, Serialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    #[validate(must_match(other = "password", message = "Passwords do not match"))]
    pub password_confirm: String,
}

/// Query parameters for the document list endpoint. `None` fields are
/// omitted from the query string.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DocumentQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<Visibility>,
    /// Comma-separated tag names.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analyzed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ordering: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

/// Multipart payload for a document upload.
#[derive(Debug, Clone)]
pub struct DocumentUpload {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
    pub title: String,
    pub description: Option<String>,
    pub visibility: Visibility,
    pub tags: Vec<String>,
}

impl DocumentUpload {
    /// Build a fresh form; multipart bodies are not reusable, so the
    /// refresh-retry path needs a new one per attempt.
    fn to_form(&self) -> multipart::Form {
        let part = multipart::Part::bytes(self.data.clone()).file_name(self.file_name.clone());
        let part = part
            .mime_str(&self.content_type)
            .unwrap_or_else(|_| {
                multipart::Part::bytes(self.data.clone()).file_name(self.file_name.clone())
            });

        let mut form = multipart::Form::new()
            .part("file", part)
            .text("title", self.title.clone());
        if let Some(description) = &self.description {
            form = form.text("description", description.clone());
        }
        form = form.text("visibility", self.visibility.as_str());
        if !self.tags.is_empty() {
            form = form.text("tags", self.tags.join(","));
        }
        form
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DocumentUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<Visibility>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UserQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PermissionQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl ApiClient {
    /// Build a client, restoring any persisted session from the store.
    pub fn new(settings: &ApiSettings, store: Arc<dyn TokenStore>) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .context("failed to build the HTTP client")?;
        let tokens = store.load();

        Ok(Self {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            store,
            tokens: RwLock::new(tokens),
        })
    }

    // ==================== Authentication ====================

    pub async fn login(&self, email: &str, password: &str) -> ApiResult<AuthResponse> {
        let body = serde_json::json!({ "email": email, "password": password });
        let response = self
            .send(false, |http| http.post(self.url(paths::LOGIN)).json(&body))
            .await?;
        let auth: AuthResponse = Self::parse(response).await?;

        self.set_tokens(auth.tokens.access.clone(), auth.tokens.refresh.clone());
        tracing::info!(user_id = %auth.user.id, "login succeeded");
        Ok(auth)
    }

    pub async fn register(&self, request: &RegisterRequest) -> ApiResult<AuthResponse> {
        let response = self
            .send(false, |http| {
                http.post(self.url(paths::REGISTER)).json(request)
            })
            .await?;
        let auth: AuthResponse = Self::parse(response).await?;

        self.set_tokens(auth.tokens.access.clone(), auth.tokens.refresh.clone());
        tracing::info!(user_id = %auth.user.id, "registration succeeded");
        Ok(auth)
    }

    /// The authenticated user's identity; also serves as a session probe.
    pub async fn current_user(&self) -> ApiResult<User> {
        let response = self.send(true, |http| http.get(self.url(paths::ME))).await?;
        Self::parse(response).await
    }

    /// Clear both tokens from memory and storage. Idempotent; never fails.
    pub fn logout(&self) {
        if let Ok(mut tokens) = self.tokens.write() {
            *tokens = TokenPair::default();
        }
        self.store.clear();
        tracing::debug!("credentials cleared");
    }

    /// True iff an access token is currently held in memory.
    pub fn is_authenticated(&self) -> bool {
        self.tokens
            .read()
            .map(|tokens| tokens.is_authenticated())
            .unwrap_or(false)
    }

    // ==================== Documents ====================

    pub async fn list_documents(&self, query: &DocumentQuery) -> ApiResult<Page<Document>> {
        let response = self
            .send(true, |http| {
                http.get(self.url(paths::DOCUMENTS)).query(query)
            })
            .await?;
        Self::parse(response).await
    }

    pub async fn get_document(&self, id: &str) -> ApiResult<Document> {
        let response = self
            .send(true, |http| http.get(self.detail_url(paths::DOCUMENTS, id)))
            .await?;
        Self::parse(response).await
    }

    pub async fn upload_document(&self, upload: &DocumentUpload) -> ApiResult<Document> {
        let response = self
            .send(true, |http| {
                http.post(self.url(paths::DOCUMENTS))
                    .multipart(upload.to_form())
            })
            .await?;
        Self::parse(response).await
    }

    pub async fn update_document(&self, id: &str, update: &DocumentUpdate) -> ApiResult<Document> {
        let response = self
            .send(true, |http| {
                http.patch(self.detail_url(paths::DOCUMENTS, id)).json(update)
            })
            .await?;
        Self::parse(response).await
    }

    pub async fn delete_document(&self, id: &str) -> ApiResult<()> {
        let response = self
            .send(true, |http| {
                http.delete(self.detail_url(paths::DOCUMENTS, id))
            })
            .await?;
        Self::parse_empty(response).await
    }

    /// Queue the asynchronous AI analysis job for a document.
    pub async fn analyze_document(&self, id: &str) -> ApiResult<AnalyzeAccepted> {
        let response = self
            .send(true, |http| {
                http.post(format!("{}analyze/", self.detail_url(paths::DOCUMENTS, id)))
            })
            .await?;
        Self::parse(response).await
    }

    pub async fn list_tags(&self) -> ApiResult<Vec<Tag>> {
        let response = self.send(true, |http| http.get(self.url(paths::TAGS))).await?;
        Self::parse(response).await
    }

    pub async fn document_stats(&self) -> ApiResult<DocumentStats> {
        let response = self
            .send(true, |http| http.get(self.url(paths::STATS)))
            .await?;
        Self::parse(response).await
    }

    // ==================== Users (admin) ====================

    pub async fn list_users(&self, query: &UserQuery) -> ApiResult<Vec<User>> {
        let response = self
            .send(true, |http| http.get(self.url(paths::USERS)).query(query))
            .await?;
        Self::parse(response).await
    }

    pub async fn get_user(&self, id: &str) -> ApiResult<User> {
        let response = self
            .send(true, |http| http.get(self.detail_url(paths::USERS, id)))
            .await?;
        Self::parse(response).await
    }

    pub async fn update_user(&self, id: &str, update: &UserUpdate) -> ApiResult<User> {
        let response = self
            .send(true, |http| {
                http.patch(self.detail_url(paths::USERS, id)).json(update)
            })
            .await?;
        Self::parse(response).await
    }

    // ==================== Permissions ====================

    pub async fn list_permissions(
        &self,
        query: &PermissionQuery,
    ) -> ApiResult<Vec<PermissionGrant>> {
        let response = self
            .send(true, |http| {
                http.get(self.url(paths::PERMISSIONS)).query(query)
            })
            .await?;
        Self::parse(response).await
    }

    /// Issue a grant. The payload type is only obtainable from a
    /// validated draft, so invalid windows never reach this call.
    pub async fn create_permission(
        &self,
        create: &PermissionCreate,
    ) -> ApiResult<PermissionGrant> {
        let response = self
            .send(true, |http| {
                http.post(self.url(paths::PERMISSIONS)).json(create)
            })
            .await?;
        Self::parse(response).await
    }

    /// Revoke a grant unconditionally; the record ceases to exist.
    pub async fn delete_permission(&self, id: &str) -> ApiResult<()> {
        let response = self
            .send(true, |http| {
                http.delete(self.detail_url(paths::PERMISSIONS, id))
            })
            .await?;
        Self::parse_empty(response).await
    }

    // ==================== Request protocol ====================

    /// Execute a request, refreshing the access token once on 401.
    ///
    /// The retried response is returned as-is; a second 401 is never
    /// retried again. When the refresh itself fails the credentials are
    /// cleared and the original 401 response is handed back.
    async fn send<F>(&self, authenticated: bool, build: F) -> ApiResult<Response>
    where
        F: Fn(&Client) -> RequestBuilder,
    {
        let request = self.authorize(build(&self.http), authenticated);
        let response = request.send().await?;

        if response.status() == StatusCode::UNAUTHORIZED && self.refresh_token().is_some() {
            if self.refresh_access_token().await {
                tracing::debug!("access token refreshed, retrying request");
                let retry = self.authorize(build(&self.http), authenticated);
                return Ok(retry.send().await?);
            }
        }

        Ok(response)
    }

    /// Attach the bearer header, except on login/register/refresh calls
    /// which must never carry a possibly-stale token.
    fn authorize(&self, request: RequestBuilder, authenticated: bool) -> RequestBuilder {
        if !authenticated {
            return request;
        }
        match self.access_token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// One refresh attempt. On success the access token is replaced and
    /// persisted (the refresh token is reused; the backend does not
    /// rotate it). On any failure the session is terminated.
    async fn refresh_access_token(&self) -> bool {
        let Some(refresh) = self.refresh_token() else {
            return false;
        };

        let result = self
            .http
            .post(self.url(paths::REFRESH))
            .json(&serde_json::json!({ "refresh": refresh }))
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => {
                match response.json::<RefreshResponse>().await {
                    Ok(body) => {
                        self.set_access_token(body.access);
                        true
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, "malformed refresh response, logging out");
                        self.logout();
                        false
                    }
                }
            }
            Ok(response) => {
                tracing::warn!(status = %response.status(), "token refresh rejected, logging out");
                self.logout();
                false
            }
            Err(err) => {
                tracing::warn!(error = %err, "token refresh failed, logging out");
                self.logout();
                false
            }
        }
    }

    // ==================== Response normalization ====================

    /// Normalize a response into the endpoint's typed payload.
    async fn parse<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
        let status = response.status();
        let json = is_json(&response);

        if !status.is_success() {
            let body = if json {
                response.text().await.unwrap_or_default()
            } else {
                String::new()
            };
            return Err(api_error(status.as_u16(), &body));
        }

        if !json {
            return Err(ApiError::InvalidResponse {
                status: status.as_u16(),
                message: "expected a JSON body".to_string(),
            });
        }

        let body = response.text().await.map_err(ApiError::from)?;
        serde_json::from_str(&body).map_err(|err| {
            tracing::debug!(status = status.as_u16(), error = %err, "response body failed schema");
            ApiError::InvalidResponse {
                status: status.as_u16(),
                message: err.to_string(),
            }
        })
    }

    /// Normalize a response whose success carries no meaningful body.
    async fn parse_empty(response: Response) -> ApiResult<()> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = if is_json(&response) {
            response.text().await.unwrap_or_default()
        } else {
            String::new()
        };
        Err(api_error(status.as_u16(), &body))
    }

    // ==================== Token state ====================

    fn access_token(&self) -> Option<String> {
        self.tokens.read().ok().and_then(|tokens| tokens.access.clone())
    }

    fn refresh_token(&self) -> Option<String> {
        self.tokens.read().ok().and_then(|tokens| tokens.refresh.clone())
    }

    /// Replace the whole pair (login, registration) and persist it before
    /// returning to the caller.
    fn set_tokens(&self, access: String, refresh: String) {
        let pair = TokenPair {
            access: Some(access),
            refresh: Some(refresh),
        };
        if let Ok(mut tokens) = self.tokens.write() {
            *tokens = pair.clone();
        }
        self.persist(&pair);
    }

    /// Replace only the access token (refresh) and persist the pair.
    fn set_access_token(&self, access: String) {
        let pair = match self.tokens.write() {
            Ok(mut tokens) => {
                tokens.access = Some(access);
                tokens.clone()
            }
            Err(_) => return,
        };
        self.persist(&pair);
    }

    fn persist(&self, pair: &TokenPair) {
        if let Err(err) = self.store.save(pair) {
            tracing::warn!(error = %err, "failed to persist tokens");
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn detail_url(&self, path: &str, id: &str) -> String {
        format!("{}{}{}/", self.base_url, path, id)
    }
}

/// Build an API error from a non-2xx status and its (possibly empty) body.
fn api_error(status: u16, body: &str) -> ApiError {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| extract_error_message(&value))
        .unwrap_or_else(|| format!("Error {status}"));
    ApiError::Api { status, message }
}

/// Server error bodies vary; check the known fields in a fixed order.
fn extract_error_message(body: &serde_json::Value) -> Option<String> {
    for field in ["detail", "message", "error"] {
        if let Some(message) = body.get(field).and_then(|value| value.as_str()) {
            return Some(message.to_string());
        }
    }
    None
}

fn is_json(response: &Response) -> bool {
    response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.contains("application/json"))
        .unwrap_or(false)
}
