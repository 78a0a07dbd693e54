//! Outcome of an excision run.

use std::fmt;

/// A needle still found in a page's rendered text after the document was
/// rewritten and saved.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResidualMatch {
    /// Page index (0-based).
    pub page_index: usize,
    /// The needle that still matches, as originally spelled.
    pub needle: String,
}

impl fmt::Display for ResidualMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "page {}: '{}'", self.page_index + 1, self.needle)
    }
}

/// Counters and verification results for one excision run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EditReport {
    /// Streams rewritten and written back.
    pub streams_edited: usize,
    /// Of `streams_edited`, those found only by the document-wide form scan.
    pub fallback_streams_edited: usize,
    /// Streams left untouched because their filter chain is unsupported.
    pub skipped_count: usize,
    /// Streams left untouched because they could not be decoded or tokenized.
    pub streams_malformed: usize,
    /// Edited streams stored unfiltered because re-encoding failed.
    pub uncompressed_fallbacks: usize,
    /// Text-showing invocations deleted across all streams.
    pub invocations_removed: usize,
    /// Whole `BT ... ET` text objects deleted because only state operators
    /// were left in them.
    pub text_objects_removed: usize,
    /// Decoded bytes deleted across all streams.
    pub bytes_removed: usize,
    /// Annotations removed because their contents or title matched.
    pub annotations_removed: usize,
    /// Needles still present after the post-save verification pass.
    pub residual: Vec<ResidualMatch>,
}

impl EditReport {
    /// Alias for [`streams_edited`](EditReport::streams_edited).
    pub fn edited_count(&self) -> usize {
        self.streams_edited
    }

    /// Whether verification found no residual matches.
    pub fn is_clean(&self) -> bool {
        self.residual.is_empty()
    }

    /// Whether the run changed anything in the document.
    pub fn modified(&self) -> bool {
        self.streams_edited > 0 || self.annotations_removed > 0
    }
}

impl fmt::Display for EditReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Streams edited: {}", self.streams_edited)?;
        if self.fallback_streams_edited > 0 {
            writeln!(
                f,
                "  (of which found by document-wide form scan: {})",
                self.fallback_streams_edited
            )?;
        }
        writeln!(f, "Streams skipped (unsupported filter): {}", self.skipped_count)?;
        writeln!(f, "Streams skipped (malformed): {}", self.streams_malformed)?;
        writeln!(f, "Text invocations removed: {}", self.invocations_removed)?;
        writeln!(f, "Text objects removed: {}", self.text_objects_removed)?;
        writeln!(f, "Bytes removed: {}", self.bytes_removed)?;
        write!(f, "Annotations removed: {}", self.annotations_removed)?;
        if self.uncompressed_fallbacks > 0 {
            write!(
                f,
                "\nStreams stored uncompressed: {}",
                self.uncompressed_fallbacks
            )?;
        }
        Ok(())
    }
}
