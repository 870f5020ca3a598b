use thiserror::Error;

/// Errors talking to the scoring or catalog service.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Network-level failure (connect, timeout, body read)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Body did not match any known response shape
    #[error("malformed response: {0}")]
    Malformed(String),

    /// Client could not be constructed (bad base URL, TLS setup)
    #[error("configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// Transport problems, as opposed to a response we could not understand.
    pub fn is_transport(&self) -> bool {
        matches!(self, ClientError::Http(_) | ClientError::Api { .. })
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors from a signing provider.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SigningError {
    /// No signer reachable (wallet missing, provider down, timed out)
    #[error("signing provider unavailable: {0}")]
    Unavailable(String),

    /// The human declined to sign
    #[error("signature rejected: {0}")]
    Rejected(String),

    /// Key material could not be loaded
    #[error("invalid signing key: {0}")]
    InvalidKey(String),
}
