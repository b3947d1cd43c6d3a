//! Transport error types

use std::fmt;

/// Errors that can occur while fetching bytes from the tile host.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderError {
    /// HTTP request failed before a response was received
    HttpError(String),
    /// Host answered with a non-success status
    HttpStatus { status: u16, url: String },
    /// Response arrived but its body could not be read
    InvalidResponse(String),
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::HttpError(msg) => write!(f, "HTTP error: {}", msg),
            ProviderError::HttpStatus { status, url } => {
                write!(f, "HTTP {} from {}", status, url)
            }
            ProviderError::InvalidResponse(msg) => write!(f, "Invalid response: {}", msg),
        }
    }
}

impl std::error::Error for ProviderError {}

impl ProviderError {
    /// Whether repeating the request could succeed.
    ///
    /// Client errors other than timeouts and rate limiting are permanent.
    pub fn is_retryable(&self) -> bool {
        match self {
            ProviderError::HttpStatus { status, .. } => {
                !(400..500).contains(status) || *status == 408 || *status == 429
            }
            ProviderError::HttpError(_) | ProviderError::InvalidResponse(_) => true,
        }
    }
}
