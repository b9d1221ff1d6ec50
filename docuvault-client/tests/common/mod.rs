//! Shared setup for HTTP-level client tests.

#![allow(dead_code)]

use docuvault_client::config::ApiSettings;
use docuvault_client::services::token_store::{FsTokenStore, TokenPair, TokenStore};
use docuvault_client::ApiClient;
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;

/// A client wired to a mock server with its own token directory.
pub struct TestClient {
    pub client: ApiClient,
    pub store: Arc<FsTokenStore>,
    _token_dir: TempDir,
}

pub fn anonymous_client(base_url: &str) -> TestClient {
    build_client(base_url, TokenPair::default())
}

pub fn authenticated_client(base_url: &str, access: &str, refresh: &str) -> TestClient {
    build_client(
        base_url,
        TokenPair {
            access: Some(access.to_string()),
            refresh: Some(refresh.to_string()),
        },
    )
}

/// A session holding only an access token; a 401 is terminal for it.
pub fn access_only_client(base_url: &str, access: &str) -> TestClient {
    build_client(
        base_url,
        TokenPair {
            access: Some(access.to_string()),
            refresh: None,
        },
    )
}

fn build_client(base_url: &str, tokens: TokenPair) -> TestClient {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("warn")
        .try_init();

    let token_dir = TempDir::new().expect("failed to create temp token dir");
    let store = Arc::new(FsTokenStore::new(token_dir.path()));
    store.save(&tokens).expect("failed to seed tokens");

    let settings = ApiSettings {
        base_url: base_url.to_string(),
        timeout_secs: 5,
    };
    let client = ApiClient::new(&settings, store.clone()).expect("failed to build client");

    TestClient {
        client,
        store,
        _token_dir: token_dir,
    }
}

pub fn user_json(id: &str, email: &str) -> Value {
    json!({
        "id": id,
        "email": email,
        "username": email.split('@').next().unwrap_or("user"),
        "first_name": "Marie",
        "last_name": "Martin",
        "role": "USER",
        "is_active": true,
        "is_admin": false
    })
}

pub fn auth_json(access: &str, refresh: &str) -> Value {
    json!({
        "user": user_json("u1", "marie.martin@example.com"),
        "tokens": { "access": access, "refresh": refresh },
        "message": "Login successful"
    })
}

pub fn document_json(id: &str, analyzed: bool) -> Value {
    let mut doc = json!({
        "id": id,
        "title": "Annual report 2024",
        "owner": user_json("u1", "marie.martin@example.com"),
        "visibility": "PRIVATE",
        "analyzed": analyzed,
        "tags": [],
        "created_at": "2024-01-01T00:00:00Z"
    });
    if analyzed {
        doc["analysis"] = json!({
            "id": "a1",
            "summary": "A yearly summary.",
            "key_points": ["growth"],
            "model_used": "local-llm",
            "analyzed_at": "2024-01-02T00:00:00Z"
        });
    }
    doc
}
