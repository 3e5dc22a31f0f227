//! v3 substitution cipher.
//!
//! A v3 link splits the original URL between a literal skeleton (the pattern)
//! and a base64 payload. The pattern holds two kinds of markers:
//!
//! - `**X` (double marker): replaced by the next `n` payload characters, where
//!   `n` is the run length of symbol `X` in the [`ReplacementTable`](super::table::ReplacementTable)
//! - `*` (single marker): replaced by the next payload character
//!
//! Decoding is split into a tokenizer that resolves marker precedence once and
//! a consumer that walks the tokens against the payload.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine as _;
use log::trace;
use url::Url;

use crate::core::table::REPLACEMENT_TABLE;
use crate::error::DecodeError;

const LENIENT: GeneralPurposeConfig = GeneralPurposeConfig::new()
    .with_decode_padding_mode(DecodePaddingMode::Indifferent)
    .with_decode_allow_trailing_bits(true);

const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::URL_SAFE, LENIENT);
const STANDARD_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::STANDARD, LENIENT);

/// One piece of a tokenized pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CipherToken<'a> {
    /// Text copied to the output as-is
    Literal(&'a str),
    /// `**` plus an alphabet symbol; consumes `run` payload characters
    DoubleMarker { symbol: char, run: usize },
    /// `*`; consumes one payload character
    SingleMarker,
}

/// The two halves of a v3 envelope, still encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CipherEnvelope<'a> {
    /// Skeleton text between `__` and `__;`
    pub pattern: &'a str,
    /// Base64 text between `;` and `!!`
    pub payload: &'a str,
}

/// Locate the pattern and payload inside a v3 link.
///
/// The pattern runs from the first `__` to the next `__;`, the payload from
/// that `;` to the next `!!`. The pattern must not be empty; the payload may.
///
/// # Examples
///
/// ```
/// use unwrapurl::extract_envelope;
///
/// let envelope = extract_envelope("https://urldefense.com/v3/__https://a.b/*c__;Jg!!AB!cd$").unwrap();
/// assert_eq!(envelope.pattern, "https://a.b/*c");
/// assert_eq!(envelope.payload, "Jg");
/// ```
pub fn extract_envelope(url: &str) -> Result<CipherEnvelope<'_>, DecodeError> {
    let start = url.find("__").ok_or(DecodeError::MalformedCipherEnvelope)? + 2;
    let rest = &url[start..];

    let pattern_end = rest.find("__;").ok_or(DecodeError::MalformedCipherEnvelope)?;
    let pattern = &rest[..pattern_end];
    if pattern.is_empty() {
        return Err(DecodeError::MalformedCipherEnvelope);
    }

    let after = &rest[pattern_end + 3..];
    let payload_end = after.find("!!").ok_or(DecodeError::MalformedCipherEnvelope)?;

    Ok(CipherEnvelope {
        pattern,
        payload: &after[..payload_end],
    })
}

/// Decode a base64 payload, accepting either alphabet and optional padding.
pub fn decode_payload(encoded: &str) -> Result<Vec<u8>, DecodeError> {
    URL_SAFE_LENIENT
        .decode(encoded)
        .or_else(|_| STANDARD_LENIENT.decode(encoded))
        .map_err(|e| DecodeError::MalformedEncoding(format!("base64 payload: {}", e)))
}

/// Split a pattern into literals and markers.
///
/// A `*` followed by `*` and an alphabet symbol is always a double marker;
/// any other `*` is a single marker. Literals never contain `*`.
///
/// # Examples
///
/// ```
/// use unwrapurl::{tokenize, CipherToken};
///
/// let tokens = tokenize("foo**Abar*Xbaz");
/// assert_eq!(tokens, vec![
///     CipherToken::Literal("foo"),
///     CipherToken::DoubleMarker { symbol: 'A', run: 2 },
///     CipherToken::Literal("bar"),
///     CipherToken::SingleMarker,
///     CipherToken::Literal("Xbaz"),
/// ]);
/// ```
pub fn tokenize(pattern: &str) -> Vec<CipherToken<'_>> {
    let bytes = pattern.as_bytes();
    let mut tokens = Vec::new();
    let mut literal_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'*' {
            i += 1;
            continue;
        }

        if literal_start < i {
            tokens.push(CipherToken::Literal(&pattern[literal_start..i]));
        }

        let double = match (bytes.get(i + 1), bytes.get(i + 2)) {
            (Some(b'*'), Some(&symbol)) => REPLACEMENT_TABLE
                .run_length(symbol as char)
                .map(|run| (symbol as char, run)),
            _ => None,
        };

        match double {
            Some((symbol, run)) => {
                tokens.push(CipherToken::DoubleMarker { symbol, run });
                i += 3;
            }
            None => {
                tokens.push(CipherToken::SingleMarker);
                i += 1;
            }
        }
        literal_start = i;
    }

    if literal_start < bytes.len() {
        tokens.push(CipherToken::Literal(&pattern[literal_start..]));
    }

    tokens
}

/// Recombine a pattern with its decoded payload.
///
/// Each payload byte is one output character. Fails with
/// [`DecodeError::CipherConsumptionFailure`] when a marker remains after the
/// payload runs out, or payload remains after the last marker. An empty
/// payload returns the pattern unchanged.
///
/// # Examples
///
/// ```
/// use unwrapurl::decode_cipher;
///
/// assert_eq!(decode_cipher("foo**Bbar*Xbaz", b"1234").unwrap(), "foo123bar4Xbaz");
/// assert!(decode_cipher("foo**Bbar*Xbaz", b"12345").is_err());
/// ```
pub fn decode_cipher(pattern: &str, payload: &[u8]) -> Result<String, DecodeError> {
    if payload.is_empty() {
        return Ok(pattern.to_string());
    }

    let mut output = String::with_capacity(pattern.len() + payload.len());
    let mut cursor = 0usize;

    for token in tokenize(pattern) {
        match token {
            CipherToken::Literal(text) => output.push_str(text),
            CipherToken::DoubleMarker { symbol, run } => {
                if cursor >= payload.len() {
                    return Err(DecodeError::CipherConsumptionFailure);
                }
                let end = (cursor + run).min(payload.len());
                trace!("**{} consumes payload[{}..{}]", symbol, cursor, end);
                output.extend(payload[cursor..end].iter().map(|&b| b as char));
                cursor += run;
            }
            CipherToken::SingleMarker => {
                let Some(&byte) = payload.get(cursor) else {
                    return Err(DecodeError::CipherConsumptionFailure);
                };
                trace!("* consumes payload[{}]", cursor);
                output.push(byte as char);
                cursor += 1;
            }
        }
    }

    if cursor < payload.len() {
        return Err(DecodeError::CipherConsumptionFailure);
    }

    Ok(output)
}

/// Decode a v3 rewritten URL.
pub fn decode_v3(url: &str) -> Result<String, DecodeError> {
    let envelope = extract_envelope(url)?;

    let decoded = if envelope.payload.is_empty() {
        envelope.pattern.to_string()
    } else {
        let payload = decode_payload(envelope.payload)?;
        decode_cipher(envelope.pattern, &payload)?
    };

    Url::parse(&decoded)?;
    Ok(decoded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worked_example() {
        assert_eq!(REPLACEMENT_TABLE.run_length('B'), Some(3));
        assert_eq!(
            decode_cipher("foo**Bbar*Xbaz", b"1234").unwrap(),
            "foo123bar4Xbaz"
        );
        assert_eq!(
            decode_cipher("foo**Bbar*Xbaz", b"12345"),
            Err(DecodeError::CipherConsumptionFailure)
        );
    }

    #[test]
    fn test_double_marker_preferred_over_single() {
        let tokens = tokenize("a**Bb");
        assert_eq!(
            tokens,
            vec![
                CipherToken::Literal("a"),
                CipherToken::DoubleMarker { symbol: 'B', run: 3 },
                CipherToken::Literal("b"),
            ]
        );
    }

    #[test]
    fn test_star_pair_without_symbol() {
        // '.' is not in the alphabet: two single markers, then a literal
        assert_eq!(
            tokenize("x**.y"),
            vec![
                CipherToken::Literal("x"),
                CipherToken::SingleMarker,
                CipherToken::SingleMarker,
                CipherToken::Literal(".y"),
            ]
        );

        // trailing "**" has no symbol at all
        assert_eq!(
            tokenize("x**"),
            vec![
                CipherToken::Literal("x"),
                CipherToken::SingleMarker,
                CipherToken::SingleMarker,
            ]
        );
    }

    #[test]
    fn test_tokenize_pure_literal() {
        assert_eq!(tokenize("https://a.b/c"), vec![CipherToken::Literal("https://a.b/c")]);
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn test_marker_left_after_payload() {
        assert_eq!(
            decode_cipher("a*b*c", b"1"),
            Err(DecodeError::CipherConsumptionFailure)
        );
        assert_eq!(
            decode_cipher("a**Ab", b"1"),
            Ok("a1b".to_string()),
            "a short final run takes what is left"
        );
    }

    #[test]
    fn test_payload_left_without_marker() {
        assert_eq!(
            decode_cipher("no markers", b"x"),
            Err(DecodeError::CipherConsumptionFailure)
        );
    }

    #[test]
    fn test_empty_payload_returns_pattern() {
        assert_eq!(decode_cipher("a*b**Cc", b"").unwrap(), "a*b**Cc");
    }

    #[test]
    fn test_payload_bytes_are_single_characters() {
        assert_eq!(decode_cipher("*", &[0xE9]).unwrap(), "\u{e9}");
    }

    #[test]
    fn test_extract_envelope() {
        let env = extract_envelope("https://urldefense.com/v3/__https://a.b/c__;!!tok!sig$").unwrap();
        assert_eq!(env.pattern, "https://a.b/c");
        assert_eq!(env.payload, "");

        assert_eq!(
            extract_envelope("https://urldefense.com/v3/https://a.b/c"),
            Err(DecodeError::MalformedCipherEnvelope)
        );
        assert_eq!(
            extract_envelope("https://urldefense.com/v3/__https://a.b/c__;Jg"),
            Err(DecodeError::MalformedCipherEnvelope)
        );
        assert_eq!(
            extract_envelope("https://urldefense.com/v3/____;Jg!!x"),
            Err(DecodeError::MalformedCipherEnvelope)
        );
    }

    #[test]
    fn test_decode_payload_alphabets() {
        assert_eq!(decode_payload("Jg").unwrap(), b"&");
        assert_eq!(decode_payload("Jg==").unwrap(), b"&");
        assert_eq!(decode_payload("-_8").unwrap(), vec![0xfb, 0xff]);
        assert_eq!(decode_payload("+/8=").unwrap(), vec![0xfb, 0xff]);
        assert!(matches!(
            decode_payload("%%%"),
            Err(DecodeError::MalformedEncoding(_))
        ));
    }

    #[test]
    fn test_decode_v3() {
        let url = "https://urldefense.com/v3/__https://example.com/path?a=1*b=2__;Jg!!ABC!def$";
        assert_eq!(decode_v3(url).unwrap(), "https://example.com/path?a=1&b=2");

        let url = "https://urldefense.com/v3/__https://example.com/**Bx*y__;Zm9vJg!!A!b$";
        assert_eq!(decode_v3(url).unwrap(), "https://example.com/foox&y");
    }

    #[test]
    fn test_decode_v3_rejects_non_url() {
        let url = "https://urldefense.com/v3/__foo**Bbar*Xbaz__;MTIzNA!!x";
        assert!(matches!(decode_v3(url), Err(DecodeError::InvalidResultUrl(_))));
    }
}
