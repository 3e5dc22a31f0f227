//! Error types for rewritten-URL decoding.

use thiserror::Error;

/// Reasons a rewritten URL could not be decoded.
///
/// None of these escape the [`Decoder`](crate::Decoder) facade as faults; it
/// folds every variant into an [`ErrorResult`](crate::ErrorResult).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
    /// No `v1`, `v2` or `v3` segment follows the host.
    #[error("Unrecognized scheme: no version segment after the host")]
    UnrecognizedScheme,

    /// A v1/v2 link lacks its query parameter.
    #[error("Missing query parameter: {0}")]
    MissingParameter(&'static str),

    /// A v3 link has no `__pattern__;payload!!` envelope.
    #[error("Malformed v3 envelope: pattern or payload not found")]
    MalformedCipherEnvelope,

    /// The v3 payload and the pattern markers did not line up.
    #[error("Cipher payload does not match the pattern markers")]
    CipherConsumptionFailure,

    /// Percent-encoding or base64 that does not decode.
    #[error("Malformed encoding: {0}")]
    MalformedEncoding(String),

    /// The reconstructed text is not a URL.
    #[error("Decoded text is not a valid URL: {0}")]
    InvalidResultUrl(String),

    /// A configuration value was rejected.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<url::ParseError> for DecodeError {
    fn from(err: url::ParseError) -> Self {
        DecodeError::InvalidResultUrl(err.to_string())
    }
}
