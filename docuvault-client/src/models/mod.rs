pub mod document;
pub mod permission;
pub mod user;

pub use document::{Analysis, AnalyzeAccepted, Document, DocumentStats, Tag, Visibility};
pub use permission::{DocumentRef, Grantee, GranteeKind, GranteeUser, PermissionGrant};
pub use user::User;

use serde::Deserialize;

/// One page of a paginated list response.
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}
