//! URL inspection utilities.
//!
//! This module contains the URL-level helpers the decoders build on:
//! - Syntactic URL validation
//! - Raw query-parameter and path-segment extraction
//! - Recognition of rewritten links and of the guarded origins

pub mod guard;
pub mod utils;

// Re-export main functionality
pub use guard::{is_rewritten_link, origin_and_path};
pub use utils::{first_path_segment, is_valid_url, raw_query_value, split_scheme_host};
