//! Stream rewriting: turn matched text-showing invocations into an
//! [`EditPlan`] and apply it.
//!
//! Only invocation spans (and text objects left with nothing but state
//! operators) are deleted. Every other byte is copied through unchanged,
//! so an empty plan reproduces the input exactly.

use std::ops::Range;

use pdfexcise_core::{EditPlan, ExciseOptions, NeedleSet};

use crate::error::TokenizeError;
use crate::matcher::InvocationText;
use crate::tokenizer::{ContentScan, is_delimiter, is_whitespace, scan};

/// Options controlling which invocations are deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RewriteOptions {
    /// Also delete the smallest run of consecutive invocations inside one
    /// text object whose combined text contains a needle.
    pub match_across_runs: bool,
}

impl Default for RewriteOptions {
    fn default() -> Self {
        Self {
            match_across_runs: true,
        }
    }
}

impl From<&ExciseOptions> for RewriteOptions {
    fn from(options: &ExciseOptions) -> Self {
        Self {
            match_across_runs: options.match_across_runs,
        }
    }
}

/// Deletions planned for one stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rewrite {
    /// Byte ranges to delete.
    pub plan: EditPlan,
    /// Text-showing invocations deleted.
    pub invocations_removed: usize,
    /// Whole `BT ... ET` blocks deleted.
    pub text_objects_removed: usize,
}

impl Rewrite {
    /// Whether nothing is deleted.
    pub fn is_empty(&self) -> bool {
        self.plan.is_empty()
    }
}

/// Plan deletions for every invocation in `scan` whose text matches.
pub fn plan_edits(
    buffer: &[u8],
    scan: &ContentScan,
    needles: &NeedleSet,
    options: RewriteOptions,
) -> Rewrite {
    let mut rewrite = Rewrite::default();
    if needles.is_empty() || scan.invocations.is_empty() {
        return rewrite;
    }

    let texts: Vec<InvocationText> = scan
        .invocations
        .iter()
        .map(|inv| InvocationText::of(scan.invocation_operands(inv)))
        .collect();
    let mut deleted: Vec<bool> = texts.iter().map(|t| t.matches(needles)).collect();

    if options.match_across_runs {
        for object in &scan.text_objects {
            for window in matching_windows(&object.invocations, &texts, needles) {
                for &inv in &object.invocations[window] {
                    deleted[inv] = true;
                }
            }
        }
    }

    let mut handled = vec![false; scan.invocations.len()];
    for object in &scan.text_objects {
        let collapses = object.state_only
            && !object.invocations.is_empty()
            && object.invocations.iter().all(|&inv| deleted[inv]);
        if collapses {
            rewrite.plan.mark(deletion_range(buffer, object.span.clone()));
            rewrite.text_objects_removed += 1;
            rewrite.invocations_removed += object.invocations.len();
            for &inv in &object.invocations {
                handled[inv] = true;
            }
        }
    }

    for (index, inv) in scan.invocations.iter().enumerate() {
        if deleted[index] && !handled[index] {
            rewrite.plan.mark(deletion_range(buffer, inv.span.clone()));
            rewrite.invocations_removed += 1;
        }
    }

    rewrite
}

/// Scan `buffer`, plan deletions and apply them.
///
/// Returns the rewritten buffer together with the plan. An empty plan
/// returns a byte-identical copy.
///
/// # Errors
///
/// Returns the [`TokenizeError`] if the buffer cannot be scanned; nothing
/// is rewritten in that case.
pub fn rewrite_stream(
    buffer: &[u8],
    needles: &NeedleSet,
    options: RewriteOptions,
) -> Result<(Vec<u8>, Rewrite), TokenizeError> {
    let scan = scan(buffer)?;
    let rewrite = plan_edits(buffer, &scan, needles, options);
    Ok((rewrite.plan.apply(buffer), rewrite))
}

/// Smallest windows (positions into `members`) of consecutive invocations
/// whose combined text contains a needle. Windows never overlap.
///
/// A new match must touch the newest piece, so pieces are dropped from the
/// front once the text between them and the newest piece is at least as
/// long as the longest needle. This keeps each step bounded by the needle
/// length rather than the size of the text object.
fn matching_windows(
    members: &[usize],
    texts: &[InvocationText],
    needles: &NeedleSet,
) -> Vec<Range<usize>> {
    let window_matches = |range: Range<usize>| {
        let pieces = &members[range];
        let tight: String = pieces.iter().map(|&i| texts[i].tight.as_str()).collect();
        let spaced = pieces
            .iter()
            .map(|&i| texts[i].spaced.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        needles.matches(&tight) || needles.matches(&spaced)
    };
    let longest = needles.iter().map(|n| n.chars().count()).max().unwrap_or(0);
    let widths: Vec<usize> = members
        .iter()
        .map(|&i| texts[i].tight.chars().count())
        .collect();

    let mut windows = Vec::new();
    let mut start = 0;
    // Tight characters of members[start + 1..end].
    let mut between = 0;
    for end in 0..members.len() {
        if end > start + 1 {
            between += widths[end - 1];
        }
        while end > start + 1 && between >= longest {
            between -= widths[start + 1];
            start += 1;
        }
        if window_matches(start..end + 1) {
            let mut first = start;
            while first < end && window_matches(first + 1..end + 1) {
                first += 1;
            }
            windows.push(first..end + 1);
            start = end + 1;
            between = 0;
        }
    }
    windows
}

/// Extend `span` over the whitespace after it when the byte before it
/// already separates tokens.
fn deletion_range(buffer: &[u8], span: Range<usize>) -> Range<usize> {
    let separated = span.start == 0
        || buffer
            .get(span.start - 1)
            .is_some_and(|&b| is_whitespace(b) || is_delimiter(b));
    if !separated {
        return span;
    }
    let mut end = span.end;
    while end < buffer.len() && is_whitespace(buffer[end]) {
        end += 1;
    }
    span.start..end
}
