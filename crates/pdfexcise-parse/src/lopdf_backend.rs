//! lopdf-based document backend.
//!
//! Implements [`DocumentBackend`] using the [lopdf](https://crates.io/crates/lopdf)
//! crate. This is the default backend for pdfexcise.

use std::io::Write;
use std::ops::RangeInclusive;

use lopdf::{Object, ObjectId};
use pdfexcise_core::{ExciseError, Filter, ObjectRef, StreamHandle};

use crate::backend::{AnnotationInfo, DocumentBackend};
use crate::error::BackendError;
use crate::matcher::decode_bytes;
use crate::page_text::extract_page_text;
use crate::walker::{all_form_objects, page_streams, resolve};

/// A parsed PDF document backed by lopdf.
pub struct LopdfDocument {
    /// The underlying lopdf document.
    inner: lopdf::Document,
    /// Cached ordered list of page ObjectIds (indexed by 0-based page number).
    page_ids: Vec<ObjectId>,
}

impl LopdfDocument {
    fn new(inner: lopdf::Document) -> Self {
        // get_pages returns BTreeMap<u32, ObjectId> with 1-based keys
        let page_ids = inner.get_pages().values().copied().collect();
        Self { inner, page_ids }
    }

    /// Access the underlying lopdf document.
    pub fn inner(&self) -> &lopdf::Document {
        &self.inner
    }

    /// Object id of page `index` (0-based).
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Parse`] if the index is out of range.
    pub fn page_id(&self, index: usize) -> Result<ObjectId, BackendError> {
        self.page_ids.get(index).copied().ok_or_else(|| {
            BackendError::Parse(format!(
                "page index {index} out of range (0..{})",
                self.page_ids.len()
            ))
        })
    }
}

impl std::fmt::Debug for LopdfDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LopdfDocument")
            .field("page_count", &self.page_ids.len())
            .finish_non_exhaustive()
    }
}

/// The lopdf-based document backend.
///
/// # Example
///
/// ```ignore
/// use pdfexcise_parse::{DocumentBackend, LopdfBackend};
///
/// let doc = LopdfBackend::open(pdf_bytes)?;
/// let streams = LopdfBackend::reachable_streams(&doc, 0)?;
/// ```
pub struct LopdfBackend;

fn id_of(handle: &StreamHandle) -> ObjectId {
    handle.id.into()
}

fn text_entry(doc: &lopdf::Document, dict: &lopdf::Dictionary, key: &[u8]) -> Option<String> {
    match resolve(doc, dict.get(key).ok()?) {
        Object::String(bytes, _) => Some(decode_bytes(bytes)),
        Object::Name(name) => Some(String::from_utf8_lossy(name).into_owned()),
        _ => None,
    }
}

/// The `/Annots` array of a page, and the id of the object holding it when
/// it is indirect.
fn annots_location(
    doc: &lopdf::Document,
    page_id: ObjectId,
) -> Result<Option<(ObjectId, bool)>, BackendError> {
    let page_dict = doc
        .get_object(page_id)
        .and_then(Object::as_dict)
        .map_err(|e| BackendError::Parse(format!("failed to get page dictionary: {e}")))?;
    Ok(match page_dict.get(b"Annots") {
        Ok(Object::Reference(id)) => Some((*id, true)),
        Ok(_) => Some((page_id, false)),
        Err(_) => None,
    })
}

impl DocumentBackend for LopdfBackend {
    type Document = LopdfDocument;
    type Error = BackendError;

    fn open(bytes: &[u8]) -> Result<Self::Document, Self::Error> {
        let inner = lopdf::Document::load_mem(bytes)
            .map_err(|e| BackendError::Parse(format!("failed to parse PDF: {e}")))?;

        if inner.is_encrypted() {
            return Err(BackendError::Core(ExciseError::PasswordRequired));
        }

        Ok(LopdfDocument::new(inner))
    }

    fn page_count(doc: &Self::Document) -> usize {
        doc.page_ids.len()
    }

    fn reachable_streams(
        doc: &Self::Document,
        page: usize,
    ) -> Result<Vec<StreamHandle>, Self::Error> {
        page_streams(&doc.inner, doc.page_id(page)?)
    }

    fn form_objects(doc: &Self::Document) -> Result<Vec<StreamHandle>, Self::Error> {
        Ok(all_form_objects(&doc.inner))
    }

    fn read_stream(doc: &Self::Document, handle: &StreamHandle) -> Result<Vec<u8>, Self::Error> {
        doc.inner
            .get_object(id_of(handle))
            .and_then(Object::as_stream)
            .map(|stream| stream.content.clone())
            .map_err(|e| BackendError::Parse(format!("failed to read stream {}: {e}", handle.id)))
    }

    fn write_stream(
        doc: &mut Self::Document,
        handle: &StreamHandle,
        raw: Vec<u8>,
        filters: &[Filter],
    ) -> Result<(), Self::Error> {
        let stream = doc
            .inner
            .get_object_mut(id_of(handle))
            .and_then(Object::as_stream_mut)
            .map_err(|e| {
                BackendError::Parse(format!("failed to write stream {}: {e}", handle.id))
            })?;

        stream.set_content(raw);
        match filters {
            [] => {
                stream.dict.remove(b"Filter");
                stream.dict.remove(b"DecodeParms");
            }
            [single] => stream.dict.set("Filter", Object::Name(single.name().as_bytes().to_vec())),
            chain => stream.dict.set(
                "Filter",
                Object::Array(
                    chain
                        .iter()
                        .map(|f| Object::Name(f.name().as_bytes().to_vec()))
                        .collect(),
                ),
            ),
        }
        Ok(())
    }

    fn page_annotations(
        doc: &Self::Document,
        page: usize,
    ) -> Result<Vec<AnnotationInfo>, Self::Error> {
        let page_id = doc.page_id(page)?;
        let inner = &doc.inner;
        let page_dict = inner
            .get_object(page_id)
            .and_then(Object::as_dict)
            .map_err(|e| BackendError::Parse(format!("failed to get page dictionary: {e}")))?;

        let annots = match page_dict.get(b"Annots") {
            Ok(obj) => resolve(inner, obj),
            Err(_) => return Ok(Vec::new()), // No annotations on this page
        };
        let Ok(entries) = annots.as_array() else {
            return Ok(Vec::new());
        };

        let mut annotations = Vec::new();
        for (index, entry) in entries.iter().enumerate() {
            let reference = entry.as_reference().ok().map(ObjectRef::from);
            // Skip unresolvable references and non-dictionary entries
            let Ok(dict) = resolve(inner, entry).as_dict() else {
                continue;
            };
            let subtype = match dict.get(b"Subtype") {
                Ok(Object::Name(name)) => Some(String::from_utf8_lossy(name).into_owned()),
                _ => None,
            };
            annotations.push(AnnotationInfo {
                index,
                reference,
                subtype,
                contents: text_entry(inner, dict, b"Contents"),
                title: text_entry(inner, dict, b"T"),
            });
        }
        Ok(annotations)
    }

    fn remove_annotation(
        doc: &mut Self::Document,
        page: usize,
        annotation: &AnnotationInfo,
    ) -> Result<(), Self::Error> {
        let page_id = doc.page_id(page)?;
        let Some((holder, indirect)) = annots_location(&doc.inner, page_id)? else {
            return Err(BackendError::Parse(format!(
                "page {page} has no /Annots array"
            )));
        };

        let holder_obj = doc
            .inner
            .get_object_mut(holder)
            .map_err(|e| BackendError::Parse(format!("failed to resolve /Annots: {e}")))?;
        let array = if indirect {
            holder_obj.as_array_mut()
        } else {
            holder_obj
                .as_dict_mut()
                .and_then(|dict| dict.get_mut(b"Annots"))
                .and_then(Object::as_array_mut)
        };
        let array =
            array.map_err(|e| BackendError::Parse(format!("/Annots is not an array: {e}")))?;

        let still_there = match array.get(annotation.index) {
            Some(entry) => match annotation.reference {
                Some(reference) => {
                    entry.as_reference().ok().map(ObjectRef::from) == Some(reference)
                }
                None => entry.as_reference().is_err(),
            },
            None => false,
        };
        if !still_there {
            return Err(BackendError::Parse(format!(
                "annotation {} on page {page} moved or was already removed",
                annotation.index
            )));
        }
        array.remove(annotation.index);
        Ok(())
    }

    fn extract_text(doc: &Self::Document, page: usize) -> Result<String, Self::Error> {
        extract_page_text(&doc.inner, doc.page_id(page)?)
    }

    fn retain_pages(
        doc: &mut Self::Document,
        pages: RangeInclusive<usize>,
    ) -> Result<(), Self::Error> {
        let count = doc.page_ids.len();
        if pages.is_empty() || *pages.end() >= count {
            return Err(BackendError::Core(ExciseError::InvalidPageRange(format!(
                "pages {}..={} outside document with {count} pages",
                pages.start(),
                pages.end()
            ))));
        }
        // lopdf page numbers are 1-based
        let drop: Vec<u32> = (0..count)
            .filter(|index| !pages.contains(index))
            .map(|index| index as u32 + 1)
            .collect();
        if !drop.is_empty() {
            doc.inner.delete_pages(&drop);
            doc.inner.prune_objects();
        }
        doc.page_ids = doc.inner.get_pages().values().copied().collect();
        Ok(())
    }

    fn save_to<W: Write>(
        doc: &mut Self::Document,
        writer: &mut W,
        compress: bool,
    ) -> Result<(), Self::Error> {
        if compress {
            doc.inner.compress();
        }
        doc.inner.save_to(writer).map_err(|e| {
            BackendError::Io(std::io::Error::other(format!("failed to save PDF: {e}")))
        })?;
        Ok(())
    }
}

/// Create a PDF with one page per entry of `contents`, each an unfiltered
/// content stream. Used for testing purposes.
#[cfg(test)]
fn create_test_pdf(contents: &[&[u8]]) -> Vec<u8> {
    use lopdf::{Document, Stream, dictionary};

    let mut doc = Document::with_version("1.5");
    let pages_id: ObjectId = doc.new_object_id();

    let mut kids: Vec<Object> = Vec::new();
    for content in contents {
        let content_id = doc.add_object(Stream::new(lopdf::Dictionary::new(), content.to_vec()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => contents.len() as i64,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).expect("failed to save test PDF");
    buf
}

/// Create a one-page PDF with two annotations: a watermark annotation
/// (indirect) and an unrelated note (direct).
#[cfg(test)]
fn create_test_pdf_with_annotations() -> Vec<u8> {
    use lopdf::{Document, Stream, StringFormat, dictionary};

    let mut doc = Document::with_version("1.5");
    let pages_id: ObjectId = doc.new_object_id();

    let watermark_id = doc.add_object(dictionary! {
        "Type" => "Annot",
        "Subtype" => "Watermark",
        "Rect" => vec![0.into(), 0.into(), 10.into(), 10.into()],
        "Contents" => Object::String(b"CONFIDENTIAL".to_vec(), StringFormat::Literal),
    });
    let note = dictionary! {
        "Type" => "Annot",
        "Subtype" => "Text",
        "Rect" => vec![0.into(), 0.into(), 10.into(), 10.into()],
        "Contents" => Object::String(b"Reviewed".to_vec(), StringFormat::Literal),
        "T" => Object::String(b"\xFE\xFF\x00A\x00n\x00n".to_vec(), StringFormat::Hexadecimal),
    };

    let content_id = doc.add_object(Stream::new(
        lopdf::Dictionary::new(),
        b"BT (Body) Tj ET".to_vec(),
    ));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        "Contents" => content_id,
        "Annots" => vec![Object::from(watermark_id), Object::Dictionary(note)],
    });

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![Object::from(page_id)],
            "Count" => 1i64,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).expect("failed to save test PDF");
    buf
}
