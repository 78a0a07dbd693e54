//! Run configuration for excision and watermark detection.

/// Options controlling a watermark excision run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExciseOptions {
    /// Only judge a page's streams against needles that occur in the page's
    /// extracted text (default: true). When false every needle is relevant
    /// to every page.
    pub page_precheck: bool,
    /// Delete the smallest run of consecutive text-showing invocations inside
    /// a text object whose combined text contains a needle (default: true).
    pub match_across_runs: bool,
    /// Remove annotations whose `/Contents` or `/T` contain a needle
    /// (default: true).
    pub remove_annotations: bool,
    /// After the resource-graph walk, also scan every form object in the
    /// document that no page reaches (default: false).
    pub scan_unreferenced_forms: bool,
    /// Re-encode edited streams with their original filter chain
    /// (default: true). When false edited streams are stored unfiltered.
    pub recompress_streams: bool,
    /// Compress every unfiltered stream when saving (default: false).
    pub compress_output: bool,
}

impl Default for ExciseOptions {
    fn default() -> Self {
        Self {
            page_precheck: true,
            match_across_runs: true,
            remove_annotations: true,
            scan_unreferenced_forms: false,
            recompress_streams: true,
            compress_output: false,
        }
    }
}

/// Options for automatic watermark detection.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DetectOptions {
    /// Number of leading pages to sample (default: 3).
    pub sample_pages: usize,
    /// Lines must be strictly longer than this many characters (default: 3).
    pub min_line_chars: usize,
    /// Fraction of sampled pages the winning line must reach (default: 0.7).
    pub threshold: f64,
}

impl Default for DetectOptions {
    fn default() -> Self {
        Self {
            sample_pages: 3,
            min_line_chars: 3,
            threshold: 0.7,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn excise_defaults() {
        let opts = ExciseOptions::default();
        assert!(opts.page_precheck);
        assert!(opts.match_across_runs);
        assert!(opts.remove_annotations);
        assert!(!opts.scan_unreferenced_forms);
        assert!(opts.recompress_streams);
        assert!(!opts.compress_output);
    }

    #[test]
    fn detect_defaults() {
        let opts = DetectOptions::default();
        assert_eq!(opts.sample_pages, 3);
        assert_eq!(opts.min_line_chars, 3);
        assert!((opts.threshold - 0.7).abs() < f64::EPSILON);
    }

    #[test]
    fn struct_update_syntax() {
        let opts = ExciseOptions {
            scan_unreferenced_forms: true,
            ..ExciseOptions::default()
        };
        assert!(opts.scan_unreferenced_forms);
        assert!(opts.page_precheck);
    }
}
