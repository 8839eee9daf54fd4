//! Error taxonomy for remote catalog operations.

use thiserror::Error;

/// Classification of a remote service failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteErrorKind {
    /// Network-level failure (DNS, refused connection, dropped socket).
    Connection,
    /// The request exceeded its configured timeout.
    Timeout,
    /// The service answered HTTP 429.
    RateLimited,
    /// The service answered a non-success status other than 404/429.
    Api { status: u16 },
    /// The response body could not be parsed into the expected shape.
    InvalidResponse,
}

impl RemoteErrorKind {
    /// Whether a failure of this kind is worth retrying.
    ///
    /// Transient transport problems and server-side errors are; client-side
    /// 4xx responses and malformed bodies are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            RemoteErrorKind::Connection
            | RemoteErrorKind::Timeout
            | RemoteErrorKind::RateLimited => true,
            RemoteErrorKind::Api { status } => *status >= 500,
            RemoteErrorKind::InvalidResponse => false,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RemoteErrorKind::Connection => "connection",
            RemoteErrorKind::Timeout => "timeout",
            RemoteErrorKind::RateLimited => "rate_limited",
            RemoteErrorKind::Api { .. } => "api",
            RemoteErrorKind::InvalidResponse => "invalid_response",
        }
    }
}

impl std::fmt::Display for RemoteErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RemoteErrorKind::Api { status } => write!(f, "api status {}", status),
            other => f.write_str(other.as_str()),
        }
    }
}

/// A normalized remote service failure.
///
/// Every transport or service error leaving the catalog client is wrapped in
/// one of these; raw reqwest errors never reach callers.
#[derive(Debug, Clone, Error)]
#[error("catalog operation '{operation}' failed ({kind}): {message}")]
pub struct RemoteServiceError {
    /// The client operation that failed, e.g. "get_top_tracks".
    pub operation: &'static str,
    pub kind: RemoteErrorKind,
    pub message: String,
}

impl RemoteServiceError {
    pub fn new(operation: &'static str, kind: RemoteErrorKind, message: impl Into<String>) -> Self {
        Self {
            operation,
            kind,
            message: message.into(),
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}

/// Errors surfaced by catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The caller supplied malformed input; no remote call was made.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The requested entity does not exist on the service.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// The service or the network failed.
    #[error(transparent)]
    Remote(#[from] RemoteServiceError),
}

impl CatalogError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        CatalogError::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// Whether retrying the same call could succeed. InvalidArgument and
    /// NotFound never will.
    pub fn is_retryable(&self) -> bool {
        match self {
            CatalogError::Remote(e) => e.is_retryable(),
            CatalogError::InvalidArgument(_) | CatalogError::NotFound { .. } => false,
        }
    }
}
