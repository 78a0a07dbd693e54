//! Resource-graph walk over a lopdf document.
//!
//! Finds every stream that paints a page: the page's `/Contents` streams,
//! then form XObjects reachable through `/Resources /XObject`, recursively.
//! A form already seen during one page's walk is not entered again.

use std::collections::HashSet;

use lopdf::{Dictionary, Document, Object, ObjectId};
use pdfexcise_core::{Filter, ObjectRef, StreamHandle, StreamKind};

use crate::error::BackendError;

/// Look up a key in the page dictionary, walking up the page tree
/// (via /Parent) if the key is not found on the page itself.
///
/// Returns `None` if the key is not found anywhere in the tree.
pub(crate) fn resolve_inherited<'a>(
    doc: &'a Document,
    page_id: ObjectId,
    key: &[u8],
) -> Result<Option<&'a Object>, BackendError> {
    let mut current_id = page_id;
    let mut seen = HashSet::new();
    loop {
        if !seen.insert(current_id) {
            return Err(BackendError::Parse("cycle in /Parent chain".to_string()));
        }
        let dict = doc
            .get_object(current_id)
            .and_then(Object::as_dict)
            .map_err(|e| BackendError::Parse(format!("failed to get page dictionary: {e}")))?;

        if let Ok(value) = dict.get(key) {
            return Ok(Some(value));
        }

        match dict.get(b"Parent") {
            Ok(parent_obj) => {
                current_id = parent_obj
                    .as_reference()
                    .map_err(|e| BackendError::Parse(format!("invalid /Parent reference: {e}")))?;
            }
            Err(_) => return Ok(None),
        }
    }
}

/// Follow one level of indirection.
pub(crate) fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> &'a Object {
    match obj {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(obj),
        _ => obj,
    }
}

/// Resolve `key` in `dict` to a dictionary, following a reference.
pub(crate) fn dict_entry<'a>(
    doc: &'a Document,
    dict: &'a Dictionary,
    key: &[u8],
) -> Option<&'a Dictionary> {
    dict.get(key)
        .ok()
        .and_then(|obj| resolve(doc, obj).as_dict().ok())
}

/// The resources dictionary of a page, handling inheritance.
pub(crate) fn page_resources(
    doc: &Document,
    page_id: ObjectId,
) -> Result<Option<&Dictionary>, BackendError> {
    match resolve_inherited(doc, page_id, b"Resources")? {
        Some(obj) => resolve(doc, obj)
            .as_dict()
            .map(Some)
            .map_err(|_| BackendError::Parse("/Resources is not a dictionary".to_string())),
        None => Ok(None),
    }
}

/// Object ids of a page's `/Contents` streams, in order.
pub(crate) fn content_stream_ids(
    doc: &Document,
    page_id: ObjectId,
) -> Result<Vec<ObjectId>, BackendError> {
    let page_dict = doc
        .get_object(page_id)
        .and_then(Object::as_dict)
        .map_err(|e| BackendError::Parse(format!("failed to get page dictionary: {e}")))?;

    let contents = match page_dict.get(b"Contents") {
        Ok(obj) => obj,
        Err(_) => return Ok(Vec::new()), // Page with no content
    };

    let items: Vec<&Object> = match contents {
        Object::Reference(id) => match doc.get_object(*id) {
            Ok(Object::Array(arr)) => arr.iter().collect(),
            Ok(_) => return Ok(vec![*id]),
            Err(e) => {
                return Err(BackendError::Parse(format!(
                    "failed to resolve /Contents: {e}"
                )));
            }
        },
        Object::Array(arr) => arr.iter().collect(),
        _ => {
            return Err(BackendError::Parse(
                "/Contents is not a reference or array".to_string(),
            ));
        }
    };

    let mut ids = Vec::with_capacity(items.len());
    for item in items {
        match item.as_reference() {
            Ok(id) => ids.push(id),
            Err(_) => tracing::debug!(?page_id, "skipping direct /Contents array item"),
        }
    }
    Ok(ids)
}

/// Read a stream's declared filter chain, in decode order.
///
/// `/DecodeParms` may be a dictionary (single filter) or an array parallel
/// to `/Filter`.
pub fn filter_chain(doc: &Document, dict: &Dictionary) -> Vec<Filter> {
    let names: Vec<Vec<u8>> = match dict.get(b"Filter").map(|f| resolve(doc, f)) {
        Ok(Object::Name(name)) => vec![name.clone()],
        Ok(Object::Array(arr)) => arr
            .iter()
            .filter_map(|item| match resolve(doc, item) {
                Object::Name(name) => Some(name.clone()),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    };

    let params: Vec<Option<&Dictionary>> = match dict.get(b"DecodeParms").map(|p| resolve(doc, p)) {
        Ok(Object::Dictionary(d)) => vec![Some(d)],
        Ok(Object::Array(arr)) => arr
            .iter()
            .map(|item| resolve(doc, item).as_dict().ok())
            .collect(),
        _ => Vec::new(),
    };

    names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let predictor = params
                .get(i)
                .copied()
                .flatten()
                .and_then(|p| p.get(b"Predictor").ok())
                .and_then(|p| p.as_i64().ok())
                .unwrap_or(1);
            Filter::from_name(&String::from_utf8_lossy(name), predictor)
        })
        .collect()
}

fn is_form(dict: &Dictionary) -> bool {
    matches!(dict.get(b"Subtype"), Ok(Object::Name(name)) if name == b"Form")
}

/// All streams painting `page_id`: `/Contents` first, then form objects in
/// depth-first order.
///
/// # Errors
///
/// Returns [`BackendError::Parse`] if the page dictionary or its
/// `/Contents` cannot be resolved.
pub fn page_streams(doc: &Document, page_id: ObjectId) -> Result<Vec<StreamHandle>, BackendError> {
    let mut handles = Vec::new();
    for id in content_stream_ids(doc, page_id)? {
        match doc.get_object(id).and_then(Object::as_stream) {
            Ok(stream) => handles.push(StreamHandle {
                id: ObjectRef::from(id),
                kind: StreamKind::PageContent,
                filters: filter_chain(doc, &stream.dict),
            }),
            Err(e) => tracing::warn!(?id, "skipping /Contents entry: {e}"),
        }
    }

    if let Some(resources) = page_resources(doc, page_id)? {
        let mut visited = HashSet::new();
        walk_forms(doc, resources, &mut visited, &mut handles);
    }
    Ok(handles)
}

fn walk_forms(
    doc: &Document,
    resources: &Dictionary,
    visited: &mut HashSet<ObjectId>,
    handles: &mut Vec<StreamHandle>,
) {
    let Some(xobjects) = dict_entry(doc, resources, b"XObject") else {
        return;
    };
    for (name, value) in xobjects.iter() {
        let Ok(id) = value.as_reference() else {
            continue;
        };
        let Ok(stream) = doc.get_object(id).and_then(Object::as_stream) else {
            continue;
        };
        if !is_form(&stream.dict) || !visited.insert(id) {
            continue;
        }
        handles.push(StreamHandle {
            id: ObjectRef::from(id),
            kind: StreamKind::Form {
                name: String::from_utf8_lossy(name).into_owned(),
            },
            filters: filter_chain(doc, &stream.dict),
        });
        if let Some(form_resources) = dict_entry(doc, &stream.dict, b"Resources") {
            walk_forms(doc, form_resources, visited, handles);
        }
    }
}

/// Every form XObject in the object table, in object-number order.
pub fn all_form_objects(doc: &Document) -> Vec<StreamHandle> {
    doc.objects
        .iter()
        .filter_map(|(&id, obj)| match obj {
            Object::Stream(stream) if is_form(&stream.dict) => Some(StreamHandle {
                id: ObjectRef::from(id),
                kind: StreamKind::Form {
                    name: format!("{} {}", id.0, id.1),
                },
                filters: filter_chain(doc, &stream.dict),
            }),
            _ => None,
        })
        .collect()
}
