//! Post-excision residual check against extracted page text.

use pdfexcise_core::needle::occurs;
use pdfexcise_core::{NeedleSet, ResidualMatch};
use pdfexcise_parse::DocumentBackend;

/// Every (page, needle) pair whose needle still occurs in the page's text.
///
/// Pages whose text cannot be extracted are logged and skipped; this check
/// never fails. Needles are reported in their original spelling and pages
/// are 0-based.
pub fn verify<B: DocumentBackend>(doc: &B::Document, needles: &NeedleSet) -> Vec<ResidualMatch> {
    let mut residual = Vec::new();
    if needles.is_empty() {
        return residual;
    }
    for page_index in 0..B::page_count(doc) {
        let text = match B::extract_text(doc, page_index) {
            Ok(text) => text.to_lowercase(),
            Err(e) => {
                tracing::warn!(page = page_index, "cannot extract text for verification: {e}");
                continue;
            }
        };
        for (original, needle) in needles.originals().iter().zip(needles.iter()) {
            if occurs(&text, needle) {
                tracing::warn!(
                    page = page_index,
                    needle = %original,
                    "watermark text still present"
                );
                residual.push(ResidualMatch {
                    page_index,
                    needle: original.clone(),
                });
            }
        }
    }
    residual
}
