//! In-memory filtering for the permission administration views.

use super::status::{status_at, PermissionStatus};
use crate::models::{Grantee, GranteeKind, PermissionGrant};
use chrono::{DateTime, Utc};

/// Conjunctive filter over a fetched permission collection.
///
/// `None` disables a dimension; set dimensions are combined with AND.
#[derive(Debug, Clone, Default)]
pub struct PermissionFilter {
    /// Case-insensitive substring over the grantee name, and the email
    /// (user grants) or role name (role grants).
    pub text: Option<String>,
    pub status: Option<PermissionStatus>,
    pub grantee: Option<GranteeKind>,
}

impl PermissionFilter {
    pub fn matches(&self, grant: &PermissionGrant, now: DateTime<Utc>) -> bool {
        if let Some(text) = &self.text {
            let needle = text.trim().to_lowercase();
            if !needle.is_empty() && !grantee_matches(&grant.grantee, &needle) {
                return false;
            }
        }
        if let Some(status) = self.status {
            if status_at(grant.end_time, now) != status {
                return false;
            }
        }
        if let Some(kind) = self.grantee {
            if grant.grantee.kind() != kind {
                return false;
            }
        }
        true
    }
}

fn grantee_matches(grantee: &Grantee, needle: &str) -> bool {
    match grantee {
        Grantee::User { user } => {
            user.name.to_lowercase().contains(needle)
                || user.email.to_lowercase().contains(needle)
        }
        Grantee::Role { role } => role.to_lowercase().contains(needle),
    }
}

/// Apply `filter` to a collection, keeping the records matching every
/// supplied criterion.
pub fn filter_permissions(
    grants: &[PermissionGrant],
    filter: &PermissionFilter,
    now: DateTime<Utc>,
) -> Vec<PermissionGrant> {
    grants
        .iter()
        .filter(|grant| filter.matches(grant, now))
        .cloned()
        .collect()
}
