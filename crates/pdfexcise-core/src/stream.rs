//! Identifiers for the content streams an excision run visits.

use std::fmt;

/// An indirect object reference: object number and generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectRef {
    /// Object number.
    pub number: u32,
    /// Generation number.
    pub generation: u16,
}

impl ObjectRef {
    /// Create a reference from its object and generation numbers.
    pub fn new(number: u32, generation: u16) -> Self {
        Self { number, generation }
    }
}

impl From<(u32, u16)> for ObjectRef {
    fn from((number, generation): (u32, u16)) -> Self {
        Self { number, generation }
    }
}

impl From<ObjectRef> for (u32, u16) {
    fn from(r: ObjectRef) -> Self {
        (r.number, r.generation)
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} R", self.number, self.generation)
    }
}

/// One entry of a stream's declared filter chain.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Filter {
    /// `/FlateDecode` (zlib). `predictor` is the `/DecodeParms /Predictor`
    /// value, 1 when absent.
    Flate {
        /// PNG/TIFF predictor; anything above 1 cannot be edited.
        predictor: i64,
    },
    /// Any other filter, by name (e.g. `DCTDecode`, `LZWDecode`).
    Other(String),
}

impl Filter {
    /// Plain Flate without a predictor.
    pub const FLATE: Filter = Filter::Flate { predictor: 1 };

    /// Build a filter from its PDF name. `predictor` is only used for Flate.
    pub fn from_name(name: &str, predictor: i64) -> Self {
        match name {
            "FlateDecode" | "Fl" => Filter::Flate { predictor },
            other => Filter::Other(other.to_string()),
        }
    }

    /// The PDF name of this filter.
    pub fn name(&self) -> &str {
        match self {
            Filter::Flate { .. } => "FlateDecode",
            Filter::Other(name) => name,
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::Flate { predictor } if *predictor > 1 => {
                write!(f, "FlateDecode (predictor {predictor})")
            }
            other => f.write_str(other.name()),
        }
    }
}

/// Where a stream was found during the resource-graph walk.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StreamKind {
    /// One of a page's `/Contents` streams.
    PageContent,
    /// A form XObject, with the resource name it was reached through.
    Form {
        /// Resource name (without the leading `/`).
        name: String,
    },
}

/// Identifies one indirect object holding a content or form-object stream.
///
/// Deduplication across pages happens on [`id`](StreamHandle::id); the same
/// form can be reached from many pages and is still edited once.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StreamHandle {
    /// The stream's object reference.
    pub id: ObjectRef,
    /// Page content or form object.
    pub kind: StreamKind,
    /// Declared filter chain, in decode order. Empty means unfiltered.
    pub filters: Vec<Filter>,
}

impl StreamHandle {
    /// Whether the stream is a form XObject.
    pub fn is_form(&self) -> bool {
        matches!(self.kind, StreamKind::Form { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_ref_display() {
        assert_eq!(ObjectRef::new(12, 0).to_string(), "12 0 R");
    }

    #[test]
    fn object_ref_tuple_conversions() {
        let r: ObjectRef = (7, 1).into();
        assert_eq!(r, ObjectRef::new(7, 1));
        let t: (u32, u16) = r.into();
        assert_eq!(t, (7, 1));
    }

    #[test]
    fn object_ref_ordering_by_number_then_generation() {
        assert!(ObjectRef::new(1, 5) < ObjectRef::new(2, 0));
        assert!(ObjectRef::new(2, 0) < ObjectRef::new(2, 1));
    }

    #[test]
    fn filter_from_name_flate_and_alias() {
        assert_eq!(Filter::from_name("FlateDecode", 1), Filter::FLATE);
        assert_eq!(Filter::from_name("Fl", 12), Filter::Flate { predictor: 12 });
    }

    #[test]
    fn filter_from_name_other() {
        let f = Filter::from_name("LZWDecode", 1);
        assert_eq!(f, Filter::Other("LZWDecode".to_string()));
        assert_eq!(f.name(), "LZWDecode");
    }

    #[test]
    fn filter_display_mentions_predictor() {
        assert_eq!(Filter::FLATE.to_string(), "FlateDecode");
        assert_eq!(
            Filter::Flate { predictor: 12 }.to_string(),
            "FlateDecode (predictor 12)"
        );
    }

    #[test]
    fn handle_is_form() {
        let h = StreamHandle {
            id: ObjectRef::new(3, 0),
            kind: StreamKind::Form {
                name: "FM1".to_string(),
            },
            filters: Vec::new(),
        };
        assert!(h.is_form());
        let page = StreamHandle {
            kind: StreamKind::PageContent,
            ..h
        };
        assert!(!page.is_form());
    }
}
