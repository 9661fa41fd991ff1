use thiserror::Error;

/// Failures surfaced by [`super::ProductiveClient`].
///
/// The client is the only place that classifies HTTP and transport outcomes;
/// every gateway operation returns one of these.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized: Invalid API token")]
    Unauthorized,

    #[error("Resource not found")]
    NotFound,

    #[error("{message}")]
    RateLimited { message: String, error_code: String },

    #[error("{message}")]
    Server {
        status: u16,
        message: String,
        error_code: String,
    },

    #[error("{message}")]
    Client {
        status: u16,
        message: String,
        error_code: String,
    },

    #[error("Request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Invalid JSON in response body: {0}")]
    InvalidBody(#[from] serde_json::Error),
}

impl ApiError {
    /// Build the error for a non-200 response that is not 401/404.
    pub(crate) fn from_status(status: u16, message: String, error_code: String) -> Self {
        match status {
            429 => Self::RateLimited {
                message,
                error_code,
            },
            s if s >= 500 => Self::Server {
                status,
                message,
                error_code,
            },
            _ => Self::Client {
                status,
                message,
                error_code,
            },
        }
    }

    pub fn message(&self) -> String {
        self.to_string()
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Unauthorized => Some(401),
            Self::NotFound => Some(404),
            Self::RateLimited { .. } => Some(429),
            Self::Server { status, .. } | Self::Client { status, .. } => Some(*status),
            Self::Transport(_) | Self::InvalidBody(_) => None,
        }
    }

    pub fn error_code(&self) -> Option<&str> {
        match self {
            Self::Unauthorized => Some("UNAUTHORIZED"),
            Self::NotFound => Some("NOT_FOUND"),
            Self::RateLimited { error_code, .. }
            | Self::Server { error_code, .. }
            | Self::Client { error_code, .. } => Some(error_code.as_str()),
            Self::Transport(_) | Self::InvalidBody(_) => None,
        }
    }

    /// Whether the failure class is retried by the client before it surfaces.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RateLimited { .. } | Self::Server { .. } | Self::Transport(_)
        )
    }
}
