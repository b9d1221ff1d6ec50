//! docuvault-client: typed Rust client for the DocuVault document
//! management API.
//!
//! Two cooperating pieces form the core: the authenticated [`ApiClient`]
//! (credential lifecycle, transparent access-token refresh, uniform
//! outcome reporting) and the permission window model
//! ([`permissions`]: validation, derived status, filtering for
//! time-bounded document grants).

pub mod config;
pub mod models;
pub mod permissions;
pub mod services;

pub use client_core::{ApiError, ApiResult, PollConfig, PollOutcome};
pub use services::api_client::ApiClient;
