//! Per-namespace string reference table (tags 25 / 256).

use std::collections::HashMap;

/// Text and byte strings share one index space but are distinct keys:
/// `"abc"` and `b"abc"` get separate entries.
#[derive(Debug, Clone, Default)]
pub(crate) struct StringRefTable {
    text: HashMap<String, u64>,
    bytes: HashMap<Vec<u8>, u64>,
}

/// Minimum literal length worth an entry once the table holds `next_index`
/// strings; shorter strings would not shrink when replaced by a reference.
fn min_length(next_index: u64) -> usize {
    match next_index {
        0..=23 => 3,
        24..=255 => 4,
        256..=65_535 => 5,
        65_536..=4_294_967_295 => 7,
        _ => 11,
    }
}

impl StringRefTable {
    pub fn len(&self) -> usize {
        self.text.len() + self.bytes.len()
    }

    /// Returns the reference index for `s`, or records it when it is long
    /// enough and returns `None` so the caller writes the literal.
    pub fn text_ref(&mut self, s: &str) -> Option<u64> {
        if let Some(index) = self.text.get(s) {
            return Some(*index);
        }
        let next_index = self.len() as u64;
        if s.chars().count() >= min_length(next_index) {
            self.text.insert(s.to_owned(), next_index);
        }
        None
    }

    pub fn bytes_ref(&mut self, b: &[u8]) -> Option<u64> {
        if let Some(index) = self.bytes.get(b) {
            return Some(*index);
        }
        let next_index = self.len() as u64;
        if b.len() >= min_length(next_index) {
            self.bytes.insert(b.to_vec(), next_index);
        }
        None
    }
}
