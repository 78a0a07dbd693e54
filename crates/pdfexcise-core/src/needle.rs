//! Case-insensitive watermark needle sets.

/// An ordered set of watermark strings, compared case-insensitively.
///
/// Needles are stored lowercased alongside their original spelling.
/// Duplicates (ignoring case) and empty strings are dropped, first spelling
/// wins. An empty set is valid and makes every pass a no-op.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NeedleSet {
    originals: Vec<String>,
    lowered: Vec<String>,
}

impl NeedleSet {
    /// Build a set from any sequence of strings.
    pub fn new<I, S>(needles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::default();
        for needle in needles {
            set.insert(needle.as_ref());
        }
        set
    }

    /// Add a needle. Returns `false` if it was empty or already present.
    pub fn insert(&mut self, needle: &str) -> bool {
        if needle.is_empty() {
            return false;
        }
        let lower = needle.to_lowercase();
        if self.lowered.contains(&lower) {
            return false;
        }
        self.originals.push(needle.to_string());
        self.lowered.push(lower);
        true
    }

    /// Number of needles.
    pub fn len(&self) -> usize {
        self.lowered.len()
    }

    /// Whether the set holds no needles.
    pub fn is_empty(&self) -> bool {
        self.lowered.is_empty()
    }

    /// Lowercased needles, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.lowered.iter().map(String::as_str)
    }

    /// Needles as originally spelled, in insertion order.
    pub fn originals(&self) -> &[String] {
        &self.originals
    }

    /// First needle found in `haystack`, which must already be lowercased.
    pub fn find_in(&self, haystack: &str) -> Option<&str> {
        self.iter().find(|needle| haystack.contains(needle))
    }

    /// Whether any needle occurs in `haystack` (already lowercased).
    pub fn matches(&self, haystack: &str) -> bool {
        self.find_in(haystack).is_some()
    }

    /// The needles that [`occur`](occurs) in `haystack` (already
    /// lowercased), keeping their original spelling and order.
    pub fn relevant_to(&self, haystack: &str) -> NeedleSet {
        let mut subset = NeedleSet::default();
        for (original, lower) in self.originals.iter().zip(&self.lowered) {
            if occurs(haystack, lower) {
                subset.originals.push(original.clone());
                subset.lowered.push(lower.clone());
            }
        }
        subset
    }

    /// Add every needle of `other` that is not yet present.
    pub fn extend_from(&mut self, other: &NeedleSet) {
        for original in &other.originals {
            self.insert(original);
        }
    }
}

/// Whether `needle` occurs in `haystack`, both already lowercased.
///
/// Extracted page text often loses or invents inter-word spacing, so a
/// needle also occurs when it matches with all whitespace removed from both
/// sides. Content-stream matching uses [`NeedleSet::matches`] instead.
pub fn occurs(haystack: &str, needle: &str) -> bool {
    if haystack.contains(needle) {
        return true;
    }
    let tight_needle: String = needle.chars().filter(|c| !c.is_whitespace()).collect();
    if tight_needle.is_empty() {
        return false;
    }
    let tight_haystack: String = haystack.chars().filter(|c| !c.is_whitespace()).collect();
    tight_haystack.contains(&tight_needle)
}
