//! client-core: Shared infrastructure for docuvault client crates.
pub mod error;
pub mod observability;
pub mod poll;

pub use error::{ApiError, ApiResult};
pub use observability::init_tracing;
pub use poll::{poll_until, PollConfig, PollOutcome};

pub use serde;
pub use tracing;
