//! Errors raised by the HTTP provider adapters.
//!
//! None of these reach UI callers through the resolver, search or
//! environment entry points; they are logged and turned into fallbacks
//! there. Adapters and `try_*` methods return them as-is.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    /// Network failure or timeout.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The directions provider found no path.
    #[error("no route ({code}): {message}")]
    NoRoute { code: String, message: String },

    /// The provider answered but had nothing for the request.
    #[error("provider has no data: {0}")]
    NoData(String),

    #[error("failed to parse provider response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("no API key configured for {0}")]
    MissingApiKey(&'static str),

    /// The configured base URL cannot carry a request path.
    #[error("invalid provider url: {0}")]
    InvalidUrl(String),
}

impl ProviderError {
    /// True for network-level failures, as opposed to answers from the
    /// provider that were negative or unreadable.
    pub fn is_transport(&self) -> bool {
        matches!(self, ProviderError::Transport(_))
    }
}
