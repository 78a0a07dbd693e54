//! Text matching of string operands against a needle set.
//!
//! Decoding never fails: bytes that are neither UTF-16BE (with a byte-order
//! mark) nor UTF-8 fall back to Windows-1252. Decoded text is only used for
//! comparison; stream buffers are never re-encoded from it.

use encoding_rs::{UTF_16BE, WINDOWS_1252};
use pdfexcise_core::NeedleSet;

use crate::tokenizer::LexicalUnit;

/// Decode string bytes to text.
pub fn decode_bytes(bytes: &[u8]) -> String {
    if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let (text, _) = UTF_16BE.decode_without_bom_handling(rest);
        return text.into_owned();
    }
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => {
            let (text, _) = WINDOWS_1252.decode_without_bom_handling(bytes);
            text.into_owned()
        }
    }
}

/// Lowercase `text` and drop NUL characters.
pub fn normalize(text: &str) -> String {
    text.chars().filter(|&c| c != '\0').flat_map(char::to_lowercase).collect()
}

/// Normalized text of one unit.
///
/// Strings decode their bytes; arrays join their string elements with a
/// single space and ignore everything else. Other units yield an empty
/// string.
pub fn decode_text(unit: &LexicalUnit) -> String {
    join_strings(std::slice::from_ref(unit), " ")
}

/// Text of a text-showing invocation's operands in two forms.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvocationText {
    /// String pieces joined with a single space.
    pub spaced: String,
    /// String pieces concatenated directly.
    pub tight: String,
}

impl InvocationText {
    /// Collect the normalized text of `operands`.
    pub fn of(operands: &[LexicalUnit]) -> Self {
        Self {
            spaced: join_strings(operands, " "),
            tight: join_strings(operands, ""),
        }
    }

    /// Whether either form contains a needle.
    pub fn matches(&self, needles: &NeedleSet) -> bool {
        needles.matches(&self.tight) || needles.matches(&self.spaced)
    }
}

/// Whether the operands of one text-showing invocation contain any needle,
/// case-insensitively.
///
/// An empty needle set never matches.
pub fn matches(operands: &[LexicalUnit], needles: &NeedleSet) -> bool {
    !needles.is_empty() && InvocationText::of(operands).matches(needles)
}

fn join_strings(units: &[LexicalUnit], separator: &str) -> String {
    let mut pieces = Vec::new();
    collect_pieces(units, &mut pieces);
    normalize(&pieces.join(separator))
}

fn collect_pieces(units: &[LexicalUnit], pieces: &mut Vec<String>) {
    for unit in units {
        match unit {
            LexicalUnit::Array { elements, .. } => collect_pieces(elements, pieces),
            other => {
                if let Some(bytes) = other.string_bytes() {
                    pieces.push(decode_bytes(&bytes));
                }
            }
        }
    }
}
