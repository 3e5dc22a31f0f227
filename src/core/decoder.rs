//! Scheme detection and dispatch.
//!
//! This module recognizes which encoding scheme a rewritten URL uses and
//! hands it to the matching decoder.

use log::debug;

use crate::core::cipher::decode_v3;
use crate::core::query::{decode_v1, decode_v2};
use crate::error::DecodeError;
use crate::types::SchemeVersion;
use crate::url::utils::first_path_segment;

/// Detect the scheme from the first path segment after the host.
///
/// # Examples
///
/// ```
/// use unwrapurl::{detect_scheme, SchemeVersion};
///
/// let version = detect_scheme("https://urldefense.com/v3/__https://a.b__;!!x").unwrap();
/// assert_eq!(version, SchemeVersion::V3);
///
/// assert!(detect_scheme("https://example.com/v4/x").is_err());
/// ```
pub fn detect_scheme(url: &str) -> Result<SchemeVersion, DecodeError> {
    first_path_segment(url)
        .and_then(SchemeVersion::from_segment)
        .ok_or(DecodeError::UnrecognizedScheme)
}

/// Decode a rewritten URL back to its original destination.
///
/// Returns the recovered URL, which always parses as a URL, or the reason
/// decoding failed.
///
/// # Examples
///
/// ```
/// use unwrapurl::decode_url;
///
/// let original = decode_url("https://urldefense.com/v3/__https://example.com/a*b__;Lw!!x!y$").unwrap();
/// assert_eq!(original, "https://example.com/a/b");
/// ```
pub fn decode_url(url: &str) -> Result<String, DecodeError> {
    let version = detect_scheme(url)?;
    debug!("decoding {} link: {}", version, url);

    match version {
        SchemeVersion::V1 => decode_v1(url),
        SchemeVersion::V2 => decode_v2(url),
        SchemeVersion::V3 => decode_v3(url),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_each_scheme() {
        let cases = vec![
            ("https://urldefense.proofpoint.com/v1/url?u=x", SchemeVersion::V1),
            ("https://urldefense.proofpoint.com/v2/url?u=x", SchemeVersion::V2),
            ("https://urldefense.com/v3/__x__;!!y", SchemeVersion::V3),
            ("http://any.host:8080/v2/anything", SchemeVersion::V2),
        ];

        for (url, expected) in cases {
            assert_eq!(detect_scheme(url).unwrap(), expected, "Scheme mismatch for: {}", url);
        }
    }

    #[test]
    fn test_detect_requires_first_segment() {
        let unrecognized = vec![
            "https://example.com/",
            "https://example.com/path/v1/url?u=x",
            "https://example.com/v10/url",
            "https://example.com?v1",
            "example.com/v1/url?u=x",
            "",
        ];

        for url in unrecognized {
            assert_eq!(
                detect_scheme(url),
                Err(DecodeError::UnrecognizedScheme),
                "Should not recognize: {}",
                url
            );
        }
    }

    #[test]
    fn test_dispatch() {
        assert_eq!(
            decode_url("https://urldefense.proofpoint.com/v1/url?u=https%3A%2F%2Fa.b%2F").unwrap(),
            "https://a.b/"
        );
        assert_eq!(
            decode_url("https://urldefense.proofpoint.com/v2/url?u=https-3A__a.b_").unwrap(),
            "https://a.b/"
        );
        assert_eq!(
            decode_url("https://urldefense.com/v3/__https://a.b/__;!!x").unwrap(),
            "https://a.b/"
        );
        assert_eq!(
            decode_url("https://urldefense.com/v3/no-envelope"),
            Err(DecodeError::MalformedCipherEnvelope)
        );
    }
}
