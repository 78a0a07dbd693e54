//! Heuristic watermark detection by repeated lines.

use pdfexcise_core::DetectOptions;
use pdfexcise_parse::DocumentBackend;

/// Guess the watermark text of a document.
///
/// Extracts the text of the first `sample_pages` pages and counts every
/// trimmed line longer than `min_line_chars` characters. The most frequent
/// line wins if it occurs at least `threshold` times the number of sampled
/// pages; on a tie the line seen first wins. Returns `None` for an empty
/// document or when no line is frequent enough.
///
/// Pages whose text cannot be extracted still count towards the sample but
/// contribute no lines.
pub fn detect_watermark<B: DocumentBackend>(
    doc: &B::Document,
    options: &DetectOptions,
) -> Option<String> {
    let sampled = options.sample_pages.min(B::page_count(doc));
    if sampled == 0 {
        return None;
    }

    // (line, count) in first-seen order
    let mut counts: Vec<(String, usize)> = Vec::new();
    for page in 0..sampled {
        let text = match B::extract_text(doc, page) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(page, "cannot extract text for detection: {e}");
                continue;
            }
        };
        for line in text.lines().map(str::trim) {
            if line.chars().count() <= options.min_line_chars {
                continue;
            }
            match counts.iter_mut().find(|(seen, _)| seen == line) {
                Some((_, count)) => *count += 1,
                None => counts.push((line.to_string(), 1)),
            }
        }
    }

    let mut best: Option<(String, usize)> = None;
    for (line, count) in counts {
        if best.as_ref().is_none_or(|(_, top)| count > *top) {
            best = Some((line, count));
        }
    }
    let (line, count) = best?;

    let required = sampled as f64 * options.threshold;
    tracing::debug!(candidate = %line, count, required, "watermark candidate");
    (count as f64 >= required).then_some(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::ops::RangeInclusive;

    use pdfexcise_core::{ExciseError, Filter, StreamHandle};
    use pdfexcise_parse::{AnnotationInfo, BackendError};

    /// Backend whose documents are just page texts.
    struct TextOnly;

    impl DocumentBackend for TextOnly {
        type Document = Vec<Option<String>>;
        type Error = BackendError;

        fn open(_: &[u8]) -> Result<Self::Document, BackendError> {
            Err(BackendError::Core(ExciseError::Other("unsupported".into())))
        }
        fn page_count(doc: &Self::Document) -> usize {
            doc.len()
        }
        fn reachable_streams(
            _: &Self::Document,
            _: usize,
        ) -> Result<Vec<StreamHandle>, BackendError> {
            Ok(Vec::new())
        }
        fn form_objects(_: &Self::Document) -> Result<Vec<StreamHandle>, BackendError> {
            Ok(Vec::new())
        }
        fn read_stream(_: &Self::Document, _: &StreamHandle) -> Result<Vec<u8>, BackendError> {
            Ok(Vec::new())
        }
        fn write_stream(
            _: &mut Self::Document,
            _: &StreamHandle,
            _: Vec<u8>,
            _: &[Filter],
        ) -> Result<(), BackendError> {
            Ok(())
        }
        fn page_annotations(
            _: &Self::Document,
            _: usize,
        ) -> Result<Vec<AnnotationInfo>, BackendError> {
            Ok(Vec::new())
        }
        fn remove_annotation(
            _: &mut Self::Document,
            _: usize,
            _: &AnnotationInfo,
        ) -> Result<(), BackendError> {
            Ok(())
        }
        fn extract_text(doc: &Self::Document, page: usize) -> Result<String, BackendError> {
            doc[page]
                .clone()
                .ok_or_else(|| BackendError::Parse("no text".into()))
        }
        fn retain_pages(
            _: &mut Self::Document,
            _: RangeInclusive<usize>,
        ) -> Result<(), BackendError> {
            Ok(())
        }
        fn save_to<W: Write>(
            _: &mut Self::Document,
            _: &mut W,
            _: bool,
        ) -> Result<(), BackendError> {
            Ok(())
        }
    }

    fn pages(texts: &[&str]) -> Vec<Option<String>> {
        texts.iter().map(|t| Some(t.to_string())).collect()
    }

    fn detect(doc: &Vec<Option<String>>) -> Option<String> {
        detect_watermark::<TextOnly>(doc, &DetectOptions::default())
    }

    #[test]
    fn repeated_line_is_detected() {
        let doc = pages(&[
            "Quarterly report\nCONFIDENTIAL",
            "Revenue grew\nCONFIDENTIAL",
            "Outlook\nCONFIDENTIAL",
            "Appendix",
        ]);
        assert_eq!(detect(&doc).as_deref(), Some("CONFIDENTIAL"));
    }

    #[test]
    fn empty_document_has_no_watermark() {
        assert_eq!(detect(&Vec::new()), None);
    }

    #[test]
    fn infrequent_lines_are_rejected() {
        let doc = pages(&["alpha line", "beta line", "gamma line"]);
        assert_eq!(detect(&doc), None);
    }

    #[test]
    fn short_lines_are_ignored() {
        let doc = pages(&["abc\nBody one", "abc\nBody two", "abc\nBody three"]);
        assert_eq!(detect(&doc), None);
    }

    #[test]
    fn lines_are_trimmed_before_counting() {
        let doc = pages(&["  DRAFT copy ", "DRAFT copy", "\tDRAFT copy"]);
        assert_eq!(detect(&doc).as_deref(), Some("DRAFT copy"));
    }

    #[test]
    fn single_page_document_uses_one_sample() {
        let doc = pages(&["Only page\nWATERMARK"]);
        assert_eq!(detect(&doc).as_deref(), Some("Only page"));
    }

    #[test]
    fn repeats_within_a_page_count() {
        let opts = DetectOptions {
            sample_pages: 2,
            ..DetectOptions::default()
        };
        let doc = pages(&["SAMPLE\nSAMPLE", "body text"]);
        assert_eq!(
            detect_watermark::<TextOnly>(&doc, &opts).as_deref(),
            Some("SAMPLE")
        );
    }

    #[test]
    fn unreadable_pages_contribute_nothing() {
        let doc = vec![Some("DRAFT".to_string()), None, None];
        assert_eq!(detect(&doc), None);
    }
}
