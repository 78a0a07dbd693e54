//! Best-effort rendered-text extraction.
//!
//! Walks a page's content in painting order, following `Do` into form
//! XObjects, and collects the decoded text of every text-showing operator.
//! Text within one text object is concatenated; `ET`, `T*`, `'` and `"`
//! end a line. Glyph-to-Unicode mapping through font encodings is not
//! attempted, so the result is what the string operands decode to, which
//! is what watermark needles are matched against.

use std::collections::HashSet;

use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

use crate::error::BackendError;
use crate::matcher::decode_bytes;
use crate::tokenizer::{LexicalUnit, scan};
use crate::walker::{content_stream_ids, dict_entry, page_resources};

/// Collects text into lines.
#[derive(Debug, Default)]
struct LineCollector {
    lines: Vec<String>,
    current: String,
}

impl LineCollector {
    fn push(&mut self, text: &str) {
        self.current.push_str(text);
    }

    fn break_line(&mut self) {
        let line = std::mem::take(&mut self.current);
        if !line.trim().is_empty() {
            self.lines.push(line);
        }
    }

    fn finish(mut self) -> String {
        self.break_line();
        self.lines.join("\n")
    }
}

/// Extract the text of one page, lines joined with `\n`.
///
/// Content streams that fail to decode or scan are skipped.
///
/// # Errors
///
/// Returns [`BackendError::Parse`] if the page dictionary, its `/Contents`
/// or its `/Resources` cannot be resolved.
pub fn extract_page_text(doc: &Document, page_id: ObjectId) -> Result<String, BackendError> {
    let mut content = Vec::new();
    for id in content_stream_ids(doc, page_id)? {
        let Ok(stream) = doc.get_object(id).and_then(Object::as_stream) else {
            continue;
        };
        if let Some(bytes) = stream_content(stream) {
            // Separate streams so tokens never fuse across the boundary.
            content.extend_from_slice(&bytes);
            content.push(b'\n');
        }
    }

    let resources = page_resources(doc, page_id)?;
    let mut collector = LineCollector::default();
    let mut visiting = HashSet::new();
    collect_text(doc, &content, resources, &mut collector, &mut visiting);
    Ok(collector.finish())
}

/// Decoded stream content. Uses lopdf's filters, which cover more than the
/// editable set.
fn stream_content(stream: &Stream) -> Option<Vec<u8>> {
    if stream.dict.get(b"Filter").is_ok() {
        match stream.decompressed_content() {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                tracing::debug!("cannot decompress stream for text extraction: {e}");
                None
            }
        }
    } else {
        Some(stream.content.clone())
    }
}

fn collect_text(
    doc: &Document,
    content: &[u8],
    resources: Option<&Dictionary>,
    collector: &mut LineCollector,
    visiting: &mut HashSet<ObjectId>,
) {
    let scan = match scan(content) {
        Ok(scan) => scan,
        Err(e) => {
            tracing::debug!("skipping unscannable content during text extraction: {e}");
            return;
        }
    };

    for operation in &scan.operations {
        let operands = scan.operands(operation);
        match operation.operator.as_str() {
            "Tj" | "TJ" => collector.push(&operand_text(operands)),
            "'" | "\"" => {
                collector.break_line();
                collector.push(&operand_text(operands));
            }
            "T*" | "ET" => collector.break_line(),
            "Do" => {
                let Some(LexicalUnit::Name { name, .. }) = operands.last() else {
                    continue;
                };
                if let Some((form_id, form)) = lookup_form(doc, resources, name) {
                    if !visiting.insert(form_id) {
                        continue;
                    }
                    if let Some(bytes) = stream_content(form) {
                        let form_resources =
                            dict_entry(doc, &form.dict, b"Resources").or(resources);
                        collect_text(doc, &bytes, form_resources, collector, visiting);
                    }
                    visiting.remove(&form_id);
                }
            }
            _ => {}
        }
    }
}

fn operand_text(operands: &[LexicalUnit]) -> String {
    let mut text = String::new();
    for unit in operands {
        match unit {
            LexicalUnit::Array { elements, .. } => text.push_str(&operand_text(elements)),
            other => {
                if let Some(bytes) = other.string_bytes() {
                    text.push_str(&decode_bytes(&bytes));
                }
            }
        }
    }
    text.retain(|c| c != '\0');
    text
}

fn lookup_form<'a>(
    doc: &'a Document,
    resources: Option<&'a Dictionary>,
    name: &str,
) -> Option<(ObjectId, &'a Stream)> {
    let xobjects = dict_entry(doc, resources?, b"XObject")?;
    let id = xobjects.get(name.as_bytes()).ok()?.as_reference().ok()?;
    let stream = doc.get_object(id).ok()?.as_stream().ok()?;
    matches!(stream.dict.get(b"Subtype"), Ok(Object::Name(n)) if n == b"Form")
        .then_some((id, stream))
}
