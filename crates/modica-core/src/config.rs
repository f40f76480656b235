//! Backend location configuration.
//!
//! The client is handed an immutable [`ApiContext`] describing where the
//! backend lives. The context is resolved once, at client construction, with
//! a fixed precedence: an explicitly supplied value wins, otherwise the
//! compiled-in default applies. Validation happens at the same point, before
//! any request is issued.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// URL scheme of the backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    #[default]
    Http,
    Https,
}

impl std::fmt::Display for Scheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scheme::Http => f.write_str("http"),
            Scheme::Https => f.write_str("https"),
        }
    }
}

/// Where the backend API lives: `scheme://host[:port]/path`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiLocation {
    pub scheme: Scheme,
    pub host: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    /// Base path under which the API is mounted, e.g. `"api"`.
    pub path: String,
}

impl ApiLocation {
    pub fn new(scheme: Scheme, host: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            scheme,
            host: host.into(),
            port: None,
            path: path.into(),
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }
}

/// Immutable client configuration, created once at startup and read by every
/// URL-building call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiContext {
    /// The backend API location. `None` means the deployment never declared
    /// one, which is fatal at client construction.
    pub api: Option<ApiLocation>,
    /// When set, built URLs are left exactly as joined and no trailing slash
    /// is ever appended.
    #[serde(default)]
    pub manual_trailing_slash: bool,
}

impl Default for ApiContext {
    fn default() -> Self {
        Self {
            api: Some(ApiLocation::new(Scheme::Http, "localhost", "api")),
            manual_trailing_slash: false,
        }
    }
}

impl ApiContext {
    /// Resolve the effective context: an explicitly supplied value wins,
    /// otherwise the compiled-in default applies.
    pub fn resolve(explicit: Option<ApiContext>) -> ApiContext {
        explicit.unwrap_or_default()
    }

    /// Fail-fast gate for the required `api` location.
    pub fn validate(&self) -> Result<&ApiLocation, ConfigError> {
        self.api.as_ref().ok_or(ConfigError::MissingApiLocation)
    }
}
