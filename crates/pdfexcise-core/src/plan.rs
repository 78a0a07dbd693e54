//! Byte-range deletion plans for a single stream buffer.

use std::ops::Range;

/// Ordered, disjoint byte ranges of one stream's buffer slated for deletion.
///
/// Ranges are kept sorted and non-overlapping: marking a range that touches
/// or overlaps existing ones merges them, so a byte is claimed at most once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditPlan {
    ranges: Vec<Range<usize>>,
}

impl EditPlan {
    /// An empty plan.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `range` for deletion. Empty ranges are ignored.
    pub fn mark(&mut self, range: Range<usize>) {
        if range.start >= range.end {
            return;
        }
        // First range whose end reaches the new start.
        let first = self.ranges.partition_point(|r| r.end < range.start);
        let mut merged = range;
        let mut last = first;
        while last < self.ranges.len() && self.ranges[last].start <= merged.end {
            merged.start = merged.start.min(self.ranges[last].start);
            merged.end = merged.end.max(self.ranges[last].end);
            last += 1;
        }
        self.ranges.splice(first..last, std::iter::once(merged));
    }

    /// The marked ranges, sorted and disjoint.
    pub fn ranges(&self) -> &[Range<usize>] {
        &self.ranges
    }

    /// Whether nothing is marked.
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Total number of bytes marked.
    pub fn deleted_len(&self) -> usize {
        self.ranges.iter().map(|r| r.end - r.start).sum()
    }

    /// Copy `buffer` without the marked bytes, preserving order.
    ///
    /// Ranges reaching past the end of `buffer` are clipped.
    pub fn apply(&self, buffer: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(buffer.len().saturating_sub(self.deleted_len()));
        let mut cursor = 0;
        for range in &self.ranges {
            let start = range.start.min(buffer.len());
            out.extend_from_slice(&buffer[cursor.min(start)..start]);
            cursor = range.end.min(buffer.len());
        }
        if cursor < buffer.len() {
            out.extend_from_slice(&buffer[cursor..]);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_plan_applies_identically() {
        let plan = EditPlan::new();
        let buf = b"BT (x) Tj ET\xff\x00";
        assert!(plan.is_empty());
        assert_eq!(plan.apply(buf), buf.to_vec());
    }

    #[test]
    fn marks_stay_sorted() {
        let mut plan = EditPlan::new();
        plan.mark(10..12);
        plan.mark(2..4);
        plan.mark(6..8);
        assert_eq!(plan.ranges(), &[2..4, 6..8, 10..12]);
    }

    #[test]
    fn overlapping_marks_merge() {
        let mut plan = EditPlan::new();
        plan.mark(2..6);
        plan.mark(4..9);
        assert_eq!(plan.ranges(), &[2..9]);
    }

    #[test]
    fn contained_marks_are_absorbed() {
        let mut plan = EditPlan::new();
        plan.mark(5..7);
        plan.mark(9..11);
        plan.mark(0..20);
        assert_eq!(plan.ranges(), &[0..20]);
        plan.mark(3..4);
        assert_eq!(plan.ranges(), &[0..20]);
    }

    #[test]
    fn adjacent_marks_merge() {
        let mut plan = EditPlan::new();
        plan.mark(0..3);
        plan.mark(3..5);
        assert_eq!(plan.ranges(), &[0..5]);
    }

    #[test]
    fn empty_range_is_ignored() {
        let mut plan = EditPlan::new();
        plan.mark(4..4);
        assert!(plan.is_empty());
    }

    #[test]
    fn apply_removes_marked_bytes() {
        let mut plan = EditPlan::new();
        plan.mark(1..3);
        plan.mark(5..6);
        let out = plan.apply(b"abcdefg");
        assert_eq!(out, b"adeg".to_vec());
    }

    #[test]
    fn output_length_is_input_minus_deleted() {
        let buf = b"0123456789abcdef";
        let mut plan = EditPlan::new();
        plan.mark(0..2);
        plan.mark(7..11);
        plan.mark(15..16);
        let out = plan.apply(buf);
        assert_eq!(plan.deleted_len(), 7);
        assert_eq!(out.len(), buf.len() - plan.deleted_len());
        assert_eq!(out, b"23456bcde".to_vec());
    }

    #[test]
    fn apply_clips_ranges_past_end() {
        let mut plan = EditPlan::new();
        plan.mark(3..100);
        assert_eq!(plan.apply(b"abcdef"), b"abc".to_vec());
    }
}
