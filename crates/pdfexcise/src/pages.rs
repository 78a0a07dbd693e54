//! Page-range extraction.

use std::ops::RangeInclusive;

use pdfexcise_core::ExciseError;
use pdfexcise_parse::DocumentBackend;

/// Convert a 1-based inclusive page range to 0-based indices, checking it
/// against a document of `page_count` pages.
///
/// # Errors
///
/// Returns [`ExciseError::InvalidPageRange`] if `start` is zero, `start`
/// exceeds `end`, or `end` exceeds `page_count`.
pub fn page_indices(
    start: usize,
    end: usize,
    page_count: usize,
) -> Result<RangeInclusive<usize>, ExciseError> {
    if start == 0 {
        return Err(ExciseError::InvalidPageRange(
            "page numbers start at 1".to_string(),
        ));
    }
    if start > end {
        return Err(ExciseError::InvalidPageRange(format!(
            "start page {start} is after end page {end}"
        )));
    }
    if end > page_count {
        return Err(ExciseError::InvalidPageRange(format!(
            "end page {end} exceeds page count {page_count}"
        )));
    }
    Ok(start - 1..=end - 1)
}

/// Keep pages `start..=end` (1-based, inclusive) of `doc`, dropping the rest.
///
/// # Errors
///
/// Returns [`ExciseError::InvalidPageRange`] for a range that does not fit
/// the document, or the backend's error converted to [`ExciseError`].
pub fn extract_pages<B: DocumentBackend>(
    doc: &mut B::Document,
    start: usize,
    end: usize,
) -> Result<(), ExciseError> {
    let range = page_indices(start, end, B::page_count(doc))?;
    tracing::debug!(start, end, "extracting pages");
    B::retain_pages(doc, range).map_err(Into::into)
}
