//! Decoder configuration.

use url::form_urlencoded;
use url::Url;

use crate::core::query::TARGET_PARAM;
use crate::error::DecodeError;

/// Diagnostic page used when none is configured.
pub const DEFAULT_ERROR_PAGE: &str = "https://unwrapurl.invalid/error";

/// Domains of the link-rewriting service.
pub const DEFAULT_SERVICE_HOSTS: [&str; 2] = ["urldefense.com", "urldefense.proofpoint.com"];

/// Settings shared by every decode call.
#[derive(Debug, Clone, PartialEq)]
pub struct DecoderConfig {
    // serialized without query or fragment
    error_page: String,
    service_hosts: Vec<String>,
}

impl DecoderConfig {
    /// Configuration with the default error page and service hosts.
    pub fn new() -> Self {
        Self {
            error_page: DEFAULT_ERROR_PAGE.to_string(),
            service_hosts: DEFAULT_SERVICE_HOSTS.iter().map(|h| h.to_string()).collect(),
        }
    }

    /// Use `page` as the diagnostic page.
    ///
    /// Any query or fragment on `page` is dropped, since the diagnostic URL
    /// owns the query.
    ///
    /// # Examples
    ///
    /// ```
    /// use unwrapurl::DecoderConfig;
    ///
    /// let config = DecoderConfig::new()
    ///     .with_error_page("moz-extension://abc/error.html?old=1")
    ///     .unwrap();
    /// assert_eq!(config.error_page(), "moz-extension://abc/error.html");
    ///
    /// assert!(DecoderConfig::new().with_error_page("not a url").is_err());
    /// ```
    pub fn with_error_page(mut self, page: &str) -> Result<Self, DecodeError> {
        let mut parsed = Url::parse(page)
            .map_err(|e| DecodeError::InvalidConfig(format!("error page {:?}: {}", page, e)))?;
        parsed.set_query(None);
        parsed.set_fragment(None);
        self.error_page = parsed.into();
        Ok(self)
    }

    /// Replace the rewriting-service hosts.
    pub fn with_service_hosts<I, S>(mut self, hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.service_hosts = hosts.into_iter().map(Into::into).collect();
        self
    }

    pub fn error_page(&self) -> &str {
        &self.error_page
    }

    pub fn service_hosts(&self) -> &[String] {
        &self.service_hosts
    }

    /// Build the diagnostic URL for an input that failed to decode.
    ///
    /// Reading the `u` parameter back yields `original` verbatim.
    ///
    /// # Examples
    ///
    /// ```
    /// use unwrapurl::DecoderConfig;
    ///
    /// let config = DecoderConfig::new();
    /// assert_eq!(
    ///     config.diagnostic_url("https://a.b/v9/x y"),
    ///     "https://unwrapurl.invalid/error?u=https%3A%2F%2Fa.b%2Fv9%2Fx+y"
    /// );
    /// ```
    pub fn diagnostic_url(&self, original: &str) -> String {
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair(TARGET_PARAM, original)
            .finish();
        format!("{}?{}", self.error_page, query)
    }
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self::new()
    }
}
