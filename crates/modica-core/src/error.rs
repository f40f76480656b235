//! Configuration error types.

/// Errors raised while validating the client configuration. These are fatal
/// at construction and never retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// The context carries no backend API location.
    #[error("No backend API location configured")]
    MissingApiLocation,
}
