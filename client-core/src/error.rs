use thiserror::Error;

/// Uniform outcome of every API call.
///
/// Expected HTTP and network failures are values, never panics; callers
/// translate them into user feedback.
pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// No response was obtained at all (DNS failure, refused connection,
    /// timeout). Never retried automatically.
    #[error("network error: {0}")]
    Network(String),

    /// The server answered with a non-2xx status. `message` is extracted
    /// from the error body where one exists.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// A 2xx response whose body does not match the endpoint's schema.
    /// Treated as a failure despite the successful transport status.
    #[error("invalid server response: {message}")]
    InvalidResponse { status: u16, message: String },
}

impl ApiError {
    /// HTTP status of the outcome; sentinel zero for transport failures.
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::Network(_) => 0,
            ApiError::Api { status, .. } => *status,
            ApiError::InvalidResponse { status, .. } => *status,
        }
    }

    pub fn is_network(&self) -> bool {
        matches!(self, ApiError::Network(_))
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Api { status: 401, .. })
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Network(err.to_string())
    }
}
