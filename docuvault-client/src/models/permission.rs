use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Document fields embedded in a permission record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRef {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub owner: Option<String>,
}

/// User fields embedded in a user-scoped grant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GranteeUser {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    pub email: String,
}

/// The target of a grant: exactly one of a user or a role.
///
/// The wire `type` discriminator selects the case, so a record can never
/// carry both payloads or neither.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Grantee {
    User { user: GranteeUser },
    Role { role: String },
}

/// Discriminator of [`Grantee`], used by forms and filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GranteeKind {
    #[default]
    User,
    Role,
}

impl Grantee {
    pub fn kind(&self) -> GranteeKind {
        match self {
            Grantee::User { .. } => GranteeKind::User,
            Grantee::Role { .. } => GranteeKind::Role,
        }
    }

    /// Display label: the user's name, or the role name.
    pub fn label(&self) -> &str {
        match self {
            Grantee::User { user } => &user.name,
            Grantee::Role { role } => role,
        }
    }
}

/// A time-bounded access grant on a document.
///
/// Lifecycle status is always derived from the window against the current
/// time, never read from the record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermissionGrant {
    pub id: String,
    pub document: DocumentRef,
    #[serde(flatten)]
    pub grantee: Grantee,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}
