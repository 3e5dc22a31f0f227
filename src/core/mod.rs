//! Core decoding functionality.
//!
//! This module contains the decoding algorithms:
//! - Scheme detection and dispatch
//! - v1/v2 query-parameter decoding
//! - The v3 substitution cipher and its run-length table

pub mod cipher;
pub mod decoder;
pub mod query;
pub mod table;

// Re-export main functionality
pub use cipher::{decode_cipher, decode_payload, decode_v3, extract_envelope, tokenize, CipherEnvelope, CipherToken};
pub use decoder::{decode_url, detect_scheme};
pub use query::{decode_v1, decode_v2, unmask_v2, TARGET_PARAM};
pub use table::{ReplacementTable, ALPHABET, REPLACEMENT_TABLE};
