//! The decoder facade.
//!
//! [`Decoder`] is the entry point for callers: it turns a [`DecodeRequest`]
//! into a [`DecodeResult`], folding every decoding failure into an
//! [`ErrorResult`] instead of returning an error.

use log::debug;
use url::Url;

use crate::config::DecoderConfig;
use crate::core::decoder::decode_url;
use crate::types::{DecodeRequest, DecodeResult, ErrorResult};
use crate::url::guard::{is_rewritten_link, is_service_host, origin_and_path};

/// Decodes rewritten URLs with a fixed configuration.
///
/// Holds no mutable state; one instance can serve any number of threads.
#[derive(Debug, Clone, Default)]
pub struct Decoder {
    config: DecoderConfig,
}

impl Decoder {
    pub fn new(config: DecoderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Decode one request.
    ///
    /// On failure the result carries the candidate URL, and a diagnostic page
    /// URL when `want_error_fallback` is set.
    ///
    /// # Examples
    ///
    /// ```
    /// use unwrapurl::{Decoder, DecodeRequest};
    ///
    /// let decoder = Decoder::default();
    /// let link = DecodeRequest::Link(
    ///     "https://urldefense.proofpoint.com/v2/url?u=https-3A__example.com_&d=x".to_string(),
    /// );
    /// assert_eq!(decoder.decode(&link, true).target(), "https://example.com/");
    ///
    /// let plain = DecodeRequest::Link("https://example.com/page".to_string());
    /// assert_eq!(decoder.decode(&plain, false).target(), "https://example.com/page");
    /// ```
    pub fn decode(&self, request: &DecodeRequest, want_error_fallback: bool) -> DecodeResult {
        let candidate = request.candidate_url();

        match decode_url(&candidate) {
            Ok(url) => DecodeResult::Decoded(url),
            Err(error) => {
                debug!("could not decode {}: {}", candidate, error);
                let diagnostic =
                    want_error_fallback.then(|| self.config.diagnostic_url(&candidate));
                DecodeResult::Failed(ErrorResult {
                    original: candidate,
                    error,
                    diagnostic,
                })
            }
        }
    }

    /// Decode a plain link string.
    pub fn decode_str(&self, input: &str, want_error_fallback: bool) -> DecodeResult {
        self.decode(&DecodeRequest::Link(input.to_string()), want_error_fallback)
    }

    /// Whether the request must be left alone.
    ///
    /// True when a navigation starts from the diagnostic page or from the
    /// rewriting service itself, or when the request already targets the
    /// diagnostic page.
    pub fn is_guarded(&self, request: &DecodeRequest) -> bool {
        let error_page = self.config.error_page();

        if let Some(origin) = request.origin_url() {
            if let Ok(parsed) = Url::parse(origin) {
                if origin_and_path(origin).as_deref() == Some(error_page)
                    || is_service_host(&parsed, self.config.service_hosts())
                {
                    return true;
                }
            }
        }

        origin_and_path(&request.candidate_url()).as_deref() == Some(error_page)
    }

    /// Effective destination for an intercepted navigation.
    ///
    /// Returns `None` when the request is guarded or is not a rewritten link
    /// on a service host; otherwise decodes with error fallback enabled.
    ///
    /// # Examples
    ///
    /// ```
    /// use unwrapurl::{Decoder, DecodeRequest};
    ///
    /// let decoder = Decoder::default();
    /// let request = DecodeRequest::navigation(
    ///     "https://urldefense.com/v3/__https://example.com/__;!!abc",
    /// );
    /// assert_eq!(decoder.intercept(&request).as_deref(), Some("https://example.com/"));
    ///
    /// let ordinary = DecodeRequest::navigation("https://example.com/");
    /// assert_eq!(decoder.intercept(&ordinary), None);
    /// ```
    pub fn intercept(&self, request: &DecodeRequest) -> Option<String> {
        if self.is_guarded(request) {
            debug!("guarded request left alone: {}", request.candidate_url());
            return None;
        }

        if !is_rewritten_link(&request.candidate_url(), self.config.service_hosts()) {
            return None;
        }

        Some(self.decode(request, true).into_target())
    }
}
