//! v1 and v2 decoding: the original URL travels in the `u` query parameter.

use std::borrow::Cow;

use percent_encoding::percent_decode_str;
use url::Url;

use crate::error::DecodeError;
use crate::url::utils::raw_query_value;

/// Query parameter holding the wrapped URL.
pub const TARGET_PARAM: &str = "u";

/// Decode a v1 rewritten URL.
///
/// The `u` parameter is percent-decoded, then HTML entities are decoded.
///
/// # Examples
///
/// ```
/// use unwrapurl::decode_v1;
///
/// let url = "https://urldefense.proofpoint.com/v1/url?u=https%3A%2F%2Fa.b%2F%3Fx%3D1%26amp%3By%3D2&k=abc";
/// assert_eq!(decode_v1(url).unwrap(), "https://a.b/?x=1&y=2");
/// ```
pub fn decode_v1(url: &str) -> Result<String, DecodeError> {
    let raw = target_param(url)?;
    finish(raw)
}

/// Decode a v2 rewritten URL.
///
/// In the `u` parameter `-` stands for `%` and `_` for `/`; after undoing
/// that, decoding proceeds as for v1.
///
/// # Examples
///
/// ```
/// use unwrapurl::decode_v2;
///
/// let url = "https://urldefense.proofpoint.com/v2/url?u=https-3A__a.b_p-3Fx-3D1&d=DwMF";
/// assert_eq!(decode_v2(url).unwrap(), "https://a.b/p?x=1");
/// ```
pub fn decode_v2(url: &str) -> Result<String, DecodeError> {
    let raw = target_param(url)?;
    let substituted = unmask_v2(raw);
    finish(&substituted)
}

/// Undo the v2 character substitution: `-` to `%`, `_` to `/`.
pub fn unmask_v2(raw: &str) -> String {
    raw.chars()
        .map(|c| match c {
            '-' => '%',
            '_' => '/',
            c => c,
        })
        .collect()
}

/// The non-empty raw `u` value.
fn target_param(url: &str) -> Result<&str, DecodeError> {
    raw_query_value(url, TARGET_PARAM)
        .filter(|value| !value.is_empty())
        .ok_or(DecodeError::MissingParameter(TARGET_PARAM))
}

/// Percent-decode, HTML-entity-decode and validate.
fn finish(encoded: &str) -> Result<String, DecodeError> {
    let decoded = percent_decode_str(encoded)
        .decode_utf8()
        .map_err(|e| DecodeError::MalformedEncoding(format!("percent-encoded parameter: {}", e)))?;
    let unescaped: Cow<'_, str> = html_escape::decode_html_entities(&decoded);

    Url::parse(&unescaped)?;
    Ok(unescaped.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_v1_percent_and_entities() {
        let url = "https://urldefense.proofpoint.com/v1/url?u=http%3A%2F%2Fexample.com%2Fa%3Fb%3D1%26amp%3Bc%3D2&k=x";
        assert_eq!(decode_v1(url).unwrap(), "http://example.com/a?b=1&c=2");
    }

    #[test]
    fn test_v1_missing_parameter() {
        assert_eq!(
            decode_v1("https://urldefense.proofpoint.com/v1/url?k=x"),
            Err(DecodeError::MissingParameter("u"))
        );
        assert_eq!(
            decode_v1("https://urldefense.proofpoint.com/v1/url?u=&k=x"),
            Err(DecodeError::MissingParameter("u"))
        );
        assert_eq!(
            decode_v1("https://urldefense.proofpoint.com/v1/url"),
            Err(DecodeError::MissingParameter("u"))
        );
    }

    #[test]
    fn test_v1_rejects_non_url() {
        let url = "https://urldefense.proofpoint.com/v1/url?u=just%20some%20words";
        assert!(matches!(decode_v1(url), Err(DecodeError::InvalidResultUrl(_))));
    }

    #[test]
    fn test_v1_rejects_invalid_utf8() {
        let url = "https://urldefense.proofpoint.com/v1/url?u=http%3A%2F%2Fa.b%2F%FF";
        assert!(matches!(decode_v1(url), Err(DecodeError::MalformedEncoding(_))));
    }

    #[test]
    fn test_unmask_v2() {
        assert_eq!(unmask_v2("https-3A__a.b_c"), "https%3A//a.b/c");
        assert_eq!(unmask_v2("plain"), "plain");
    }

    #[test]
    fn test_v2_decode() {
        let url = "https://urldefense.proofpoint.com/v2/url?u=https-3A__www.example.com_docs_page-3Fid-3D7-26hl-3Den&d=DwMFaQ&c=abc";
        assert_eq!(
            decode_v2(url).unwrap(),
            "https://www.example.com/docs/page?id=7&hl=en"
        );
    }

    #[test]
    fn test_v2_escaped_dash_and_underscore() {
        // literal '-' and '_' travel as -2D and -5F
        let url = "https://urldefense.proofpoint.com/v2/url?u=https-3A__my-2Dsite.com_a-5Fb&d=x";
        assert_eq!(decode_v2(url).unwrap(), "https://my-site.com/a_b");
    }

    #[test]
    fn test_v2_missing_parameter() {
        assert_eq!(
            decode_v2("https://urldefense.proofpoint.com/v2/url?d=DwMF"),
            Err(DecodeError::MissingParameter("u"))
        );
    }
}
