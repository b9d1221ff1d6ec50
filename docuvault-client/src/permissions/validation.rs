//! Creation-time validation for permission grants.
//!
//! A [`PermissionCreate`] payload can only be obtained from a validated
//! draft, so an invalid form can never reach the network. All field errors
//! are collected in one pass so a form can render every problem at once.

use crate::models::GranteeKind;
use chrono::{DateTime, Utc};
use serde::Serialize;
use validator::{ValidationError, ValidationErrors};

/// Form state for a new grant, before validation.
#[derive(Debug, Clone, Default)]
pub struct PermissionDraft {
    pub document: String,
    pub grantee_kind: GranteeKind,
    pub user: Option<String>,
    pub role: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

impl PermissionDraft {
    /// Validate the draft, collecting every field error at once.
    ///
    /// The grantee selector matching `grantee_kind` is required and the
    /// other one ignored; a window inversion is reported on `end_time`.
    pub fn validate(&self) -> Result<PermissionCreate, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.document.trim().is_empty() {
            errors.add("document", field_error("required", "select a document"));
        }

        let grantee = match self.grantee_kind {
            GranteeKind::User => match non_empty(self.user.as_deref()) {
                Some(user) => Some(GranteeSelector::User {
                    user: user.to_string(),
                }),
                None => {
                    errors.add("user", field_error("required", "select a user"));
                    None
                }
            },
            GranteeKind::Role => match non_empty(self.role.as_deref()) {
                Some(role) => Some(GranteeSelector::Role {
                    role: role.to_string(),
                }),
                None => {
                    errors.add("role", field_error("required", "select a role"));
                    None
                }
            },
        };

        if self.start_time.is_none() {
            errors.add("start_time", field_error("required", "start time is required"));
        }
        if self.end_time.is_none() {
            errors.add("end_time", field_error("required", "end time is required"));
        }
        if let (Some(start), Some(end)) = (self.start_time, self.end_time) {
            if start >= end {
                errors.add(
                    "end_time",
                    field_error("window", "end time must be after start time"),
                );
            }
        }

        match (grantee, self.start_time, self.end_time) {
            (Some(grantee), Some(start_time), Some(end_time)) if errors.is_empty() => {
                Ok(PermissionCreate {
                    document: self.document.trim().to_string(),
                    grantee,
                    start_time,
                    end_time,
                })
            }
            _ => Err(errors),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn field_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}

/// Wire payload for creating a grant.
///
/// Fields are private: the only way to build one is
/// [`PermissionDraft::validate`], which guarantees the window and grantee
/// invariants hold before a create call can be issued.
#[derive(Debug, Clone, Serialize)]
pub struct PermissionCreate {
    document: String,
    #[serde(flatten)]
    grantee: GranteeSelector,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
}

impl PermissionCreate {
    pub fn document(&self) -> &str {
        &self.document
    }

    pub fn grantee(&self) -> &GranteeSelector {
        &self.grantee
    }

    pub fn window(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        (self.start_time, self.end_time)
    }
}

/// Untagged on the wire: exactly one of `user` or `role` is emitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum GranteeSelector {
    User { user: String },
    Role { role: String },
}
