//! Core data structures for rewritten-URL decoding.

use std::fmt;

use crate::error::DecodeError;

/// Encoding scheme of a rewritten URL, taken from its first path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemeVersion {
    /// `u` parameter, percent- and HTML-entity-encoded
    V1,
    /// `u` parameter with `-`/`_` standing in for `%`/`/`
    V2,
    /// `__pattern__;payload!!` substitution cipher
    V3,
}

impl SchemeVersion {
    /// Map a path segment (`v1`, `v2`, `v3`) to its scheme.
    pub fn from_segment(segment: &str) -> Option<Self> {
        match segment {
            "v1" => Some(SchemeVersion::V1),
            "v2" => Some(SchemeVersion::V2),
            "v3" => Some(SchemeVersion::V3),
            _ => None,
        }
    }

    /// The path segment naming this scheme.
    pub fn segment(&self) -> &'static str {
        match self {
            SchemeVersion::V1 => "v1",
            SchemeVersion::V2 => "v2",
            SchemeVersion::V3 => "v3",
        }
    }
}

impl fmt::Display for SchemeVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.segment())
    }
}

/// One decode request, shaped by the caller that produced it.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodeRequest {
    /// An outgoing navigation, optionally with the page that started it.
    Navigation {
        /// Destination of the navigation
        url: String,
        /// Page the navigation originated from, if known
        origin_url: Option<String>,
    },
    /// The target of a link, used verbatim.
    Link(String),
    /// Selected text; may lack a scheme.
    Selection(String),
}

impl DecodeRequest {
    /// Build a navigation request without an origin.
    pub fn navigation(url: impl Into<String>) -> Self {
        DecodeRequest::Navigation {
            url: url.into(),
            origin_url: None,
        }
    }

    /// The URL string the decoder works on.
    ///
    /// Selected text is trimmed and gets `https://` prefixed when it carries
    /// no http(s) scheme. This string is the "original" reported on failure.
    pub fn candidate_url(&self) -> String {
        match self {
            DecodeRequest::Navigation { url, .. } => url.clone(),
            DecodeRequest::Link(url) => url.clone(),
            DecodeRequest::Selection(text) => {
                let text = text.trim();
                if text.starts_with("http://") || text.starts_with("https://") {
                    text.to_string()
                } else {
                    format!("https://{}", text)
                }
            }
        }
    }

    /// Originating page of a navigation request.
    pub fn origin_url(&self) -> Option<&str> {
        match self {
            DecodeRequest::Navigation { origin_url, .. } => origin_url.as_deref(),
            _ => None,
        }
    }
}

/// A failed decode, carrying the input that could not be decoded.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorResult {
    /// The candidate URL exactly as it entered version dispatch
    pub original: String,
    /// Why decoding failed
    pub error: DecodeError,
    /// Diagnostic page URL, present only when error fallback was requested
    pub diagnostic: Option<String>,
}

/// Outcome of a decode call.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodeResult {
    /// The recovered original URL; always a syntactically valid URL.
    Decoded(String),
    /// Decoding failed.
    Failed(ErrorResult),
}

impl DecodeResult {
    /// The effective destination for the caller.
    ///
    /// The decoded URL on success; on failure the diagnostic URL when one was
    /// requested, otherwise the original input unchanged.
    pub fn target(&self) -> &str {
        match self {
            DecodeResult::Decoded(url) => url,
            DecodeResult::Failed(failure) => failure
                .diagnostic
                .as_deref()
                .unwrap_or(&failure.original),
        }
    }

    /// Consume the result, returning [`target`](Self::target) as an owned string.
    pub fn into_target(self) -> String {
        match self {
            DecodeResult::Decoded(url) => url,
            DecodeResult::Failed(failure) => failure.diagnostic.unwrap_or(failure.original),
        }
    }

    pub fn is_decoded(&self) -> bool {
        matches!(self, DecodeResult::Decoded(_))
    }

    /// The failure reason, if any.
    pub fn error(&self) -> Option<&DecodeError> {
        match self {
            DecodeResult::Decoded(_) => None,
            DecodeResult::Failed(failure) => Some(&failure.error),
        }
    }
}
