//! Document backend trait.
//!
//! Defines the [`DocumentBackend`] trait through which the excision engine
//! reaches a PDF document: page enumeration, stream discovery, raw stream
//! read/write, annotation access, text extraction and saving. This keeps the
//! orchestration generic over the PDF library underneath.

use std::io::Write;
use std::ops::RangeInclusive;

use pdfexcise_core::{ExciseError, Filter, ObjectRef, StreamHandle};

/// Text-bearing fields of one page annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationInfo {
    /// Position in the page's `/Annots` array.
    pub index: usize,
    /// The annotation's object reference, if it is indirect.
    pub reference: Option<ObjectRef>,
    /// `/Subtype` name (e.g. `"Watermark"`, `"FreeText"`).
    pub subtype: Option<String>,
    /// `/Contents` text.
    pub contents: Option<String>,
    /// `/T` (title/author) text.
    pub title: Option<String>,
}

impl AnnotationInfo {
    /// Contents and title, lowercased and joined by a newline.
    pub fn searchable_text(&self) -> String {
        [self.contents.as_deref(), self.title.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join("\n")
            .to_lowercase()
    }
}

/// Trait abstracting the document operations the excision engine needs.
///
/// All functions are associated functions taking the document explicitly,
/// so a backend is a zero-sized marker type.
///
/// # Usage
///
/// ```ignore
/// let mut doc = MyBackend::open(pdf_bytes)?;
/// for page in 0..MyBackend::page_count(&doc) {
///     for handle in MyBackend::reachable_streams(&doc, page)? {
///         let raw = MyBackend::read_stream(&doc, &handle)?;
///         // decode, rewrite, encode ...
///         MyBackend::write_stream(&mut doc, &handle, raw, &handle.filters)?;
///     }
/// }
/// MyBackend::save_to(&mut doc, &mut out, false)?;
/// ```
pub trait DocumentBackend {
    /// The parsed document type.
    type Document;

    /// Backend-specific error type, convertible to [`ExciseError`].
    type Error: std::error::Error + Into<ExciseError>;

    /// Parse PDF bytes into a document.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not a readable PDF or the document
    /// is encrypted.
    fn open(bytes: &[u8]) -> Result<Self::Document, Self::Error>;

    /// Number of pages.
    fn page_count(doc: &Self::Document) -> usize;

    /// Content streams that contribute to page `page` (0-based): its own
    /// `/Contents` streams in order, then every form object reachable
    /// through its resources.
    ///
    /// # Errors
    ///
    /// Returns an error if the page index is out of range or the page tree
    /// is broken.
    fn reachable_streams(
        doc: &Self::Document,
        page: usize,
    ) -> Result<Vec<StreamHandle>, Self::Error>;

    /// Every form object in the document, reachable or not.
    ///
    /// # Errors
    ///
    /// Returns an error if the object table cannot be enumerated.
    fn form_objects(doc: &Self::Document) -> Result<Vec<StreamHandle>, Self::Error>;

    /// The raw (still filtered) payload of a stream.
    ///
    /// # Errors
    ///
    /// Returns an error if the handle does not resolve to a stream.
    fn read_stream(doc: &Self::Document, handle: &StreamHandle) -> Result<Vec<u8>, Self::Error>;

    /// Replace a stream's payload. `filters` is the chain `raw` is encoded
    /// with; an empty chain stores the stream unfiltered.
    ///
    /// # Errors
    ///
    /// Returns an error if the handle does not resolve to a stream.
    fn write_stream(
        doc: &mut Self::Document,
        handle: &StreamHandle,
        raw: Vec<u8>,
        filters: &[Filter],
    ) -> Result<(), Self::Error>;

    /// Annotations on page `page` (0-based), in `/Annots` order.
    ///
    /// # Errors
    ///
    /// Returns an error if the page cannot be loaded.
    fn page_annotations(
        doc: &Self::Document,
        page: usize,
    ) -> Result<Vec<AnnotationInfo>, Self::Error>;

    /// Remove one annotation from page `page`'s `/Annots`.
    ///
    /// Indices of later annotations shift down; remove in descending index
    /// order.
    ///
    /// # Errors
    ///
    /// Returns an error if the annotation is no longer at its index.
    fn remove_annotation(
        doc: &mut Self::Document,
        page: usize,
        annotation: &AnnotationInfo,
    ) -> Result<(), Self::Error>;

    /// Rendered text of page `page` (0-based), one line per text object.
    ///
    /// # Errors
    ///
    /// Returns an error if the page's content cannot be read.
    fn extract_text(doc: &Self::Document, page: usize) -> Result<String, Self::Error>;

    /// Keep only the pages in `pages` (0-based, inclusive) and drop objects
    /// no longer referenced.
    ///
    /// # Errors
    ///
    /// Returns an error if the range is outside the document.
    fn retain_pages(
        doc: &mut Self::Document,
        pages: RangeInclusive<usize>,
    ) -> Result<(), Self::Error>;

    /// Serialize the document. With `compress`, unfiltered streams are
    /// Flate-compressed first.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn save_to<W: Write>(
        doc: &mut Self::Document,
        writer: &mut W,
        compress: bool,
    ) -> Result<(), Self::Error>;
}
