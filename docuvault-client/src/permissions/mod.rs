//! Time-bounded document access grants: derived lifecycle status,
//! creation validation with collected field errors, and in-memory
//! filtering for the administration views.

mod filter;
mod status;
mod validation;

pub use filter::{filter_permissions, PermissionFilter};
pub use status::{status_at, PermissionStats, PermissionStatus, EXPIRING_SOON_WINDOW_DAYS};
pub use validation::{GranteeSelector, PermissionCreate, PermissionDraft};
