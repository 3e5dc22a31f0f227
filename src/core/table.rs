//! Run-length table for v3 double markers.
//!
//! Every symbol of the 64-character alphabet `A-Z a-z 0-9 - _` maps to the
//! number of payload characters its double marker consumes: the symbol's
//! position in the alphabet plus two, so `A` is 2 and `_` is 65.

/// Marker alphabet in table order.
pub const ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

/// Smallest run a double marker can request.
pub const MIN_RUN: usize = 2;

/// Fixed symbol-to-run-length mapping, built at compile time.
#[derive(Debug)]
pub struct ReplacementTable {
    // indexed by ASCII code; 0 marks a non-alphabet byte
    runs: [u8; 128],
}

impl ReplacementTable {
    /// Build the table from [`ALPHABET`].
    pub const fn new() -> Self {
        let mut runs = [0u8; 128];
        let mut i = 0;
        while i < ALPHABET.len() {
            runs[ALPHABET[i] as usize] = (i + MIN_RUN) as u8;
            i += 1;
        }
        Self { runs }
    }

    /// Run length for `symbol`, or `None` if it is not in the alphabet.
    ///
    /// # Examples
    ///
    /// ```
    /// use unwrapurl::REPLACEMENT_TABLE;
    ///
    /// assert_eq!(REPLACEMENT_TABLE.run_length('A'), Some(2));
    /// assert_eq!(REPLACEMENT_TABLE.run_length('_'), Some(65));
    /// assert_eq!(REPLACEMENT_TABLE.run_length('*'), None);
    /// ```
    pub fn run_length(&self, symbol: char) -> Option<usize> {
        if !symbol.is_ascii() {
            return None;
        }
        match self.runs[symbol as usize] {
            0 => None,
            run => Some(run as usize),
        }
    }

    pub fn contains(&self, symbol: char) -> bool {
        self.run_length(symbol).is_some()
    }
}

impl Default for ReplacementTable {
    fn default() -> Self {
        Self::new()
    }
}

/// The shared, read-only table used by every v3 decode.
pub static REPLACEMENT_TABLE: ReplacementTable = ReplacementTable::new();
