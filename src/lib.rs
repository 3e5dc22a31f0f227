//! unwrapurl - recover the original destination of link-protection URLs
//!
//! Link-protection services rewrite every URL in a message so that clicks pass
//! through their own domain first. This crate reverses that rewriting offline:
//! given a rewritten link it returns the URL it wraps.
//!
//! # Features
//!
//! - **All three schemes**: `v1`, `v2` and `v3` rewritten links
//! - **Pure**: no I/O and no shared mutable state; safe to call from any thread
//! - **Never faults**: every input yields either a valid URL or an error value
//!   carrying the original input
//! - **Validated output**: a successful decode always parses as a URL
//!
//! # Quick Start
//!
//! ```
//! use unwrapurl::{decode_url, Decoder, DecodeRequest};
//!
//! // Decode a single link
//! let url = decode_url("https://urldefense.com/v3/__https://docs.rs/url*__;Lw!!AbC!dEf$")?;
//! assert_eq!(url, "https://docs.rs/url/");
//!
//! // Or go through the facade, which never fails
//! let decoder = Decoder::default();
//! let request = DecodeRequest::Selection("urldefense.proofpoint.com/v2/url?u=https-3A__docs.rs_&d=x".into());
//! assert_eq!(decoder.decode(&request, false).target(), "https://docs.rs/");
//! # Ok::<(), unwrapurl::DecodeError>(())
//! ```
//!
//! # Rewritten URL Shapes
//!
//! | Scheme | Shape |
//! |--------|-------|
//! | v1 | `scheme://host/v1/<opaque>?u=<percent- and HTML-entity-encoded URL>` |
//! | v2 | `scheme://host/v2/<opaque>?u=<percent-encoded URL, '%'->'-', '/'->'_'>` |
//! | v3 | `scheme://host/v3/<opaque>__<pattern>__;<base64 payload>!!<opaque>` |
//!
//! # Error Handling
//!
//! The low-level functions return `Result<T, DecodeError>`. [`Decoder`] folds
//! every error into [`DecodeResult::Failed`], which either points at a
//! diagnostic page or passes the input through unchanged.

// Re-export main decoding functions
pub use self::core::{decode_url, detect_scheme, decode_v1, decode_v2, decode_v3};

// Re-export the v3 cipher building blocks
pub use self::core::{decode_cipher, decode_payload, extract_envelope, tokenize, CipherEnvelope, CipherToken};
pub use self::core::{ReplacementTable, ALPHABET, REPLACEMENT_TABLE};

// Re-export essential URL utilities
pub use self::url::{
    first_path_segment, is_rewritten_link, is_valid_url, origin_and_path,
    raw_query_value, split_scheme_host
};

// Re-export public types
pub use config::{DecoderConfig, DEFAULT_ERROR_PAGE, DEFAULT_SERVICE_HOSTS};
pub use decoder::Decoder;
pub use error::DecodeError;
pub use types::{DecodeRequest, DecodeResult, ErrorResult, SchemeVersion};

// Module declarations
pub mod config;
pub mod core;
pub mod decoder;
pub mod error;
pub mod types;
pub mod url;
