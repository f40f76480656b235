//! Error types for the Modica API client.

use modica_core::ConfigError;

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors surfaced by [`crate::ApiClient`] operations.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The client was handed an unusable configuration. Raised by the
    /// constructor before any request is attempted.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The request never produced a usable response (connection, TLS, or
    /// protocol failure). Propagated from the transport unmodified.
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a non-2xx status. `body` carries the
    /// backend's error payload verbatim.
    #[error("Backend returned {status}: {body}")]
    Backend { status: u16, body: String },

    /// A 2xx response body did not match the expected shape.
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// The model payload is missing the identifier field needed to address
    /// the instance.
    #[error("Model data has no usable '{0}' field")]
    MissingId(String),

    /// An upload source could not be read.
    #[error("Failed to read upload source: {0}")]
    Io(#[from] std::io::Error),
}
