//! Shared HTTP client for Modica-style model backends.
//!
//! Provides URL construction for model resources (collection, instance, and
//! the nested meta/action/permission endpoints), standard headers, generic
//! request helpers, model CRUD operations with pagination bookkeeping, and
//! multipart upload with a progress event stream.
//!
//! Every operation is a lazy future (or stream): a single request is issued
//! when the caller awaits it, and nothing is retried, cached, or timed out at
//! this layer.

pub mod error;
pub mod models;
pub mod upload;

use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE};
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::{ApiError, Result};

// Re-export domain types for convenience.
pub use modica_core::{
    ApiContext, ApiLocation, ConfigError, Filter, ModelId, PaginatedResponse, Scheme,
    UploadEvent, UploadProgress,
};

/// Locale used when the embedding application does not supply one.
const DEFAULT_LOCALE: &str = "en-US";

/// Overridable naming conventions of the backend.
///
/// Each field backs one accessor hook on [`ApiClient`]; the defaults match
/// the common backend layout.
#[derive(Debug, Clone)]
pub struct ModelConventions {
    /// Identifier field name on model payloads.
    pub id_field: String,
    /// First path segment of every model URL.
    pub model_prefix: String,
    /// Path segment of the meta sub-resource.
    pub meta_prefix: String,
    /// Path segment of the action sub-resource.
    pub action_prefix: String,
    /// Path segment of the permissions sub-resource.
    pub permission_prefix: String,
    /// Query parameter carrying the page number on list requests.
    pub page_param: String,
    /// API version path segment, omitted from URLs when `None` or empty.
    pub api_version: Option<String>,
}

impl Default for ModelConventions {
    fn default() -> Self {
        Self {
            id_field: "id".to_string(),
            model_prefix: "models".to_string(),
            meta_prefix: "meta".to_string(),
            action_prefix: "action".to_string(),
            permission_prefix: "permissions".to_string(),
            page_param: "page".to_string(),
            api_version: None,
        }
    }
}

/// HTTP client for a Modica-style model backend.
///
/// Holds the validated backend location, the active locale, and the naming
/// conventions. The configuration is immutable and read-only after
/// construction, so the client is safe to clone and share across concurrent
/// calls.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    api: ApiLocation,
    manual_trailing_slash: bool,
    locale: String,
    conventions: ModelConventions,
}

impl ApiClient {
    /// Build a client from an optionally supplied context.
    ///
    /// Resolution precedence is fixed: the explicit context wins, otherwise
    /// the compiled-in default applies. A context without an `api` location
    /// is rejected here, before any request is attempted.
    pub fn new(ctx: Option<ApiContext>, locale: Option<&str>) -> Result<Self> {
        Self::with_conventions(ctx, locale, ModelConventions::default())
    }

    /// Same as [`ApiClient::new`], with overridden naming conventions.
    pub fn with_conventions(
        ctx: Option<ApiContext>,
        locale: Option<&str>,
        conventions: ModelConventions,
    ) -> Result<Self> {
        let ctx = ApiContext::resolve(ctx);
        let api = ctx.validate()?.clone();

        Ok(Self {
            client: Client::new(),
            api,
            manual_trailing_slash: ctx.manual_trailing_slash,
            locale: locale.unwrap_or(DEFAULT_LOCALE).to_string(),
            conventions,
        })
    }

    // ------------------------------------------------------------------
    // Convention accessors
    // ------------------------------------------------------------------

    /// Identifier field name on model payloads.
    pub fn id_field(&self) -> &str {
        &self.conventions.id_field
    }

    pub fn model_prefix(&self) -> &str {
        &self.conventions.model_prefix
    }

    pub fn meta_prefix(&self) -> &str {
        &self.conventions.meta_prefix
    }

    pub fn action_prefix(&self) -> &str {
        &self.conventions.action_prefix
    }

    pub fn permission_prefix(&self) -> &str {
        &self.conventions.permission_prefix
    }

    pub fn page_param(&self) -> &str {
        &self.conventions.page_param
    }

    pub fn api_version(&self) -> Option<&str> {
        self.conventions.api_version.as_deref()
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Raw client for custom requests. Callers must build URLs and headers
    /// themselves.
    pub fn client(&self) -> &Client {
        &self.client
    }

    // ------------------------------------------------------------------
    // URL construction
    // ------------------------------------------------------------------

    /// Base URL of the API: `scheme://host[:port]/path/[version/]`.
    ///
    /// The port segment is omitted when absent, the version segment when the
    /// version hook is unset or empty. Always ends in `/`.
    pub fn base_url(&self) -> String {
        let port = match self.api.port {
            Some(port) => format!(":{port}"),
            None => String::new(),
        };
        let path = self.api.path.trim_matches('/');
        let mut url = if path.is_empty() {
            format!("{}://{}{}/", self.api.scheme, self.api.host, port)
        } else {
            format!("{}://{}{}/{}/", self.api.scheme, self.api.host, port, path)
        };
        if let Some(version) = self.api_version() {
            if !version.is_empty() {
                url.push_str(version);
                url.push('/');
            }
        }
        url
    }

    /// Join path segments onto the base URL.
    ///
    /// `None` and empty segments are dropped in order. A trailing slash is
    /// appended unless `manual_trailing_slash` is configured, the last
    /// surviving segment looks like a filename (contains a `.`), or it
    /// already ends in `/`. With no surviving segments the base URL is
    /// returned unchanged.
    pub fn build_url(&self, segments: &[Option<&str>]) -> String {
        let parts: Vec<&str> = segments
            .iter()
            .filter_map(|s| *s)
            .filter(|s| !s.is_empty())
            .collect();
        if parts.is_empty() {
            return self.base_url();
        }

        let last = parts[parts.len() - 1];
        let is_file = last.contains('.');
        let has_end_slash = last.ends_with('/');

        let mut url = format!("{}{}", self.base_url(), parts.join("/"));
        if !self.manual_trailing_slash && !is_file && !has_end_slash {
            url.push('/');
        }
        url
    }

    /// URL of a model collection (`model_id: None`) or instance:
    /// `[model_prefix]/[domain]/[name]/[id]/` under the base URL.
    pub fn instance_url(
        &self,
        model_name: &str,
        model_domain: Option<&str>,
        model_id: Option<&ModelId>,
    ) -> String {
        let id = model_id.map(ModelId::to_string);
        self.build_url(&[
            Some(self.model_prefix()),
            model_domain,
            Some(model_name),
            id.as_deref(),
        ])
    }

    /// URL of one meta entry nested under an instance.
    pub fn meta_url(
        &self,
        meta_key: &str,
        model_name: &str,
        model_id: &ModelId,
        model_domain: Option<&str>,
    ) -> String {
        let id = model_id.to_string();
        self.build_url(&[
            Some(self.model_prefix()),
            model_domain,
            Some(model_name),
            Some(id.as_str()),
            Some(self.meta_prefix()),
            Some(meta_key),
        ])
    }

    /// URL of one invokable action nested under an instance.
    pub fn action_url(
        &self,
        action_key: &str,
        model_name: &str,
        model_id: &ModelId,
        model_domain: Option<&str>,
    ) -> String {
        let id = model_id.to_string();
        self.build_url(&[
            Some(self.model_prefix()),
            model_domain,
            Some(model_name),
            Some(id.as_str()),
            Some(self.action_prefix()),
            Some(action_key),
        ])
    }

    /// URL of the permissions sub-resource of an instance.
    pub fn permissions_url(
        &self,
        model_name: &str,
        model_id: &ModelId,
        model_domain: Option<&str>,
    ) -> String {
        let id = model_id.to_string();
        self.build_url(&[
            Some(self.model_prefix()),
            model_domain,
            Some(model_name),
            Some(id.as_str()),
            Some(self.permission_prefix()),
        ])
    }

    // ------------------------------------------------------------------
    // Generic request helpers
    // ------------------------------------------------------------------

    fn request(&self, method: Method, url: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, url)
            .header(ACCEPT, "application/json")
            .header(ACCEPT_LANGUAGE, self.locale.as_str())
    }

    /// Map a non-2xx response to [`ApiError::Backend`], carrying the
    /// backend's error body verbatim.
    pub(crate) async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        warn!("backend returned {}: {}", status, body);
        Err(ApiError::Backend {
            status: status.as_u16(),
            body,
        })
    }

    /// GET `url` with query parameters, returning the raw body text.
    pub(crate) async fn get_text(&self, url: &str, query: &[(&str, String)]) -> Result<String> {
        debug!("GET {}", url);
        let mut request = self.request(Method::GET, url);
        if !query.is_empty() {
            request = request.query(query);
        }
        let response = request.send().await?;
        let response = Self::check(response).await?;
        Ok(response.text().await?)
    }

    /// GET request with optional query parameters. Decodes the JSON response.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let body = self.get_text(url, query).await?;
        serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// POST a JSON body and decode the JSON response.
    pub async fn post_json<T: DeserializeOwned, B: serde::Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<T> {
        debug!("POST {}", url);
        let response = self.request(Method::POST, url).json(body).send().await?;
        let response = Self::check(response).await?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// PATCH a JSON body and decode the JSON response.
    pub async fn patch_json<T: DeserializeOwned, B: serde::Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<T> {
        debug!("PATCH {}", url);
        let response = self.request(Method::PATCH, url).json(body).send().await?;
        let response = Self::check(response).await?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// DELETE with a JSON body. Returns `Ok(())` on success.
    pub async fn delete_json<B: serde::Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<()> {
        debug!("DELETE {}", url);
        let response = self.request(Method::DELETE, url).json(body).send().await?;
        Self::check(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modica_core::{ApiLocation, Scheme};

    fn context(scheme: Scheme, host: &str, port: Option<u16>, path: &str) -> ApiContext {
        let mut api = ApiLocation::new(scheme, host, path);
        api.port = port;
        ApiContext {
            api: Some(api),
            manual_trailing_slash: false,
        }
    }

    fn client() -> ApiClient {
        ApiClient::new(None, None).unwrap()
    }

    #[test]
    fn test_base_url_without_port_or_version() {
        assert_eq!(client().base_url(), "http://localhost/api/");
    }

    #[test]
    fn test_base_url_with_port() {
        let ctx = context(Scheme::Https, "backend.example.com", Some(8443), "api");
        let client = ApiClient::new(Some(ctx), None).unwrap();
        assert_eq!(client.base_url(), "https://backend.example.com:8443/api/");
    }

    #[test]
    fn test_base_url_with_version() {
        let conventions = ModelConventions {
            api_version: Some("v2".to_string()),
            ..ModelConventions::default()
        };
        let client = ApiClient::with_conventions(None, None, conventions).unwrap();
        assert_eq!(client.base_url(), "http://localhost/api/v2/");
    }

    #[test]
    fn test_base_url_with_empty_version_omits_segment() {
        let conventions = ModelConventions {
            api_version: Some(String::new()),
            ..ModelConventions::default()
        };
        let client = ApiClient::with_conventions(None, None, conventions).unwrap();
        assert_eq!(client.base_url(), "http://localhost/api/");
    }

    #[test]
    fn test_base_url_normalizes_path_slashes() {
        let ctx = context(Scheme::Http, "localhost", None, "/api/");
        let client = ApiClient::new(Some(ctx), None).unwrap();
        assert_eq!(client.base_url(), "http://localhost/api/");
    }

    #[test]
    fn test_build_url_with_no_segments_returns_base_url() {
        let client = client();
        assert_eq!(client.build_url(&[]), client.base_url());
    }

    #[test]
    fn test_build_url_with_only_empty_segments_returns_base_url() {
        let client = client();
        assert_eq!(client.build_url(&[None, Some(""), None]), client.base_url());
    }

    #[test]
    fn test_build_url_appends_trailing_slash() {
        assert_eq!(
            client().build_url(&[Some("models"), Some("tickets")]),
            "http://localhost/api/models/tickets/"
        );
    }

    #[test]
    fn test_build_url_skips_interior_empty_segments() {
        assert_eq!(
            client().build_url(&[Some("models"), None, Some("tickets"), Some("")]),
            "http://localhost/api/models/tickets/"
        );
    }

    #[test]
    fn test_build_url_filename_gets_no_trailing_slash() {
        assert_eq!(
            client().build_url(&[Some("media"), Some("export.csv")]),
            "http://localhost/api/media/export.csv"
        );
    }

    #[test]
    fn test_build_url_keeps_existing_end_slash() {
        assert_eq!(
            client().build_url(&[Some("models"), Some("tickets/")]),
            "http://localhost/api/models/tickets/"
        );
    }

    #[test]
    fn test_build_url_manual_trailing_slash_never_appends() {
        let ctx = ApiContext {
            manual_trailing_slash: true,
            ..ApiContext::default()
        };
        let client = ApiClient::new(Some(ctx), None).unwrap();
        assert_eq!(
            client.build_url(&[Some("models"), Some("tickets")]),
            "http://localhost/api/models/tickets"
        );
    }

    #[test]
    fn test_instance_url_coerces_numeric_id() {
        let id = ModelId::Int(42);
        assert_eq!(
            client().instance_url("tickets", Some("acme"), Some(&id)),
            "http://localhost/api/models/acme/tickets/42/"
        );
    }

    #[test]
    fn test_instance_url_without_domain_or_id_is_collection_url() {
        assert_eq!(
            client().instance_url("tickets", None, None),
            "http://localhost/api/models/tickets/"
        );
    }

    #[test]
    fn test_meta_url_nests_under_instance() {
        let id = ModelId::from("t-9");
        assert_eq!(
            client().meta_url("labels", "tickets", &id, None),
            "http://localhost/api/models/tickets/t-9/meta/labels/"
        );
    }

    #[test]
    fn test_action_url_nests_under_instance() {
        let id = ModelId::Int(9);
        assert_eq!(
            client().action_url("close", "tickets", &id, Some("acme")),
            "http://localhost/api/models/acme/tickets/9/action/close/"
        );
    }

    #[test]
    fn test_permissions_url_nests_under_instance() {
        let id = ModelId::Int(9);
        assert_eq!(
            client().permissions_url("tickets", &id, None),
            "http://localhost/api/models/tickets/9/permissions/"
        );
    }

    #[test]
    fn test_constructor_rejects_context_without_api_location() {
        let ctx = ApiContext {
            api: None,
            manual_trailing_slash: false,
        };

        let err = ApiClient::new(Some(ctx), None).unwrap_err();
        assert!(matches!(
            err,
            ApiError::Config(ConfigError::MissingApiLocation)
        ));
    }

    #[test]
    fn test_default_conventions() {
        let client = client();
        assert_eq!(client.id_field(), "id");
        assert_eq!(client.model_prefix(), "models");
        assert_eq!(client.meta_prefix(), "meta");
        assert_eq!(client.action_prefix(), "action");
        assert_eq!(client.permission_prefix(), "permissions");
        assert_eq!(client.page_param(), "page");
        assert_eq!(client.api_version(), None);
        assert_eq!(client.locale(), "en-US");
    }

    #[test]
    fn test_overridden_conventions_flow_into_urls() {
        let conventions = ModelConventions {
            model_prefix: "resources".to_string(),
            ..ModelConventions::default()
        };
        let client = ApiClient::with_conventions(None, None, conventions).unwrap();
        assert_eq!(
            client.instance_url("tickets", None, None),
            "http://localhost/api/resources/tickets/"
        );
    }
}
