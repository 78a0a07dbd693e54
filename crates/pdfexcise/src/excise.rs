//! Document-wide excision: discover streams, rewrite each once, write back.

use std::collections::{BTreeSet, HashMap};

use pdfexcise_core::{EditReport, ExciseOptions, NeedleSet, ObjectRef, StreamHandle};
use pdfexcise_parse::codec;
use pdfexcise_parse::tokenizer::scan;
use pdfexcise_parse::{DocumentBackend, RewriteOptions, plan_edits};

/// A stream queued for rewriting with the needles judged against it.
#[derive(Debug)]
struct WorkItem {
    handle: StreamHandle,
    needles: NeedleSet,
    fallback: bool,
}

/// Queue of distinct streams in discovery order.
#[derive(Debug, Default)]
struct WorkQueue {
    items: Vec<WorkItem>,
    index: HashMap<ObjectRef, usize>,
}

impl WorkQueue {
    /// Queue `handle`, or widen the needles of an already queued stream.
    fn add(&mut self, handle: StreamHandle, needles: &NeedleSet, fallback: bool) {
        match self.index.get(&handle.id) {
            Some(&i) => self.items[i].needles.extend_from(needles),
            None => {
                self.index.insert(handle.id, self.items.len());
                self.items.push(WorkItem {
                    handle,
                    needles: needles.clone(),
                    fallback,
                });
            }
        }
    }

    fn contains(&self, id: &ObjectRef) -> bool {
        self.index.contains_key(id)
    }
}

/// Remove every text-showing invocation matching `needles` from the
/// content streams and form objects of `doc`, and matching annotations.
///
/// Each distinct stream is rewritten at most once, judged against the union
/// of the needles relevant to every page that reaches it. Streams that
/// cannot be decoded or scanned are left untouched and counted. The
/// `residual` list of the returned report is left empty; see
/// [`verify`](crate::verify::verify).
///
/// # Errors
///
/// Returns the backend error if a discovered stream cannot be read or
/// written back.
pub fn excise_watermarks<B: DocumentBackend>(
    doc: &mut B::Document,
    needles: &NeedleSet,
    options: &ExciseOptions,
) -> Result<EditReport, B::Error> {
    let mut report = EditReport::default();
    if needles.is_empty() {
        tracing::info!("empty needle set, nothing to excise");
        return Ok(report);
    }

    let mut queue = WorkQueue::default();
    for page in 0..B::page_count(doc) {
        if options.remove_annotations {
            report.annotations_removed += remove_annotations::<B>(doc, page, needles);
        }

        let relevant = if options.page_precheck {
            match B::extract_text(doc, page) {
                Ok(text) => needles.relevant_to(&text.to_lowercase()),
                Err(e) => {
                    tracing::debug!(page, "text extraction failed, using all needles: {e}");
                    needles.clone()
                }
            }
        } else {
            needles.clone()
        };

        // Pages without relevant needles are still walked so that every
        // reachable stream gets its filter chain accounted for.
        match B::reachable_streams(doc, page) {
            Ok(handles) => {
                for handle in handles {
                    queue.add(handle, &relevant, false);
                }
            }
            Err(e) => tracing::warn!(page, "cannot walk page resources: {e}"),
        }
    }

    if options.scan_unreferenced_forms {
        for handle in B::form_objects(doc)? {
            if !queue.contains(&handle.id) {
                queue.add(handle, needles, true);
            }
        }
    }

    let mut visited = BTreeSet::new();
    for item in queue.items {
        if !visited.insert(item.handle.id) {
            continue;
        }
        process_stream::<B>(doc, &item, options, &mut report)?;
    }

    tracing::info!(
        edited = report.streams_edited,
        skipped = report.skipped_count,
        malformed = report.streams_malformed,
        annotations = report.annotations_removed,
        "excision finished"
    );
    Ok(report)
}

fn remove_annotations<B: DocumentBackend>(
    doc: &mut B::Document,
    page: usize,
    needles: &NeedleSet,
) -> usize {
    let annotations = match B::page_annotations(doc, page) {
        Ok(annotations) => annotations,
        Err(e) => {
            tracing::warn!(page, "cannot read annotations: {e}");
            return 0;
        }
    };

    let mut removed = 0;
    // Descending order keeps the remaining indices valid.
    for annotation in annotations
        .iter()
        .rev()
        .filter(|a| needles.matches(&a.searchable_text()))
    {
        match B::remove_annotation(doc, page, annotation) {
            Ok(()) => {
                tracing::debug!(page, index = annotation.index, "removed annotation");
                removed += 1;
            }
            Err(e) => {
                tracing::warn!(page, index = annotation.index, "cannot remove annotation: {e}");
            }
        }
    }
    removed
}

fn process_stream<B: DocumentBackend>(
    doc: &mut B::Document,
    item: &WorkItem,
    options: &ExciseOptions,
    report: &mut EditReport,
) -> Result<(), B::Error> {
    let handle = &item.handle;
    if let Err(e) = codec::check_supported(&handle.filters) {
        tracing::warn!(stream = %handle.id, "skipping stream: {e}");
        report.skipped_count += 1;
        return Ok(());
    }
    if item.needles.is_empty() {
        return Ok(());
    }

    let raw = B::read_stream(doc, handle)?;
    let decoded = match codec::decode(&raw, &handle.filters) {
        Ok(decoded) => decoded,
        Err(e) => {
            tracing::warn!(stream = %handle.id, "skipping undecodable stream: {e}");
            report.streams_malformed += 1;
            return Ok(());
        }
    };

    let content = match scan(&decoded) {
        Ok(content) => content,
        Err(e) => {
            tracing::warn!(stream = %handle.id, "skipping malformed content stream: {e}");
            report.streams_malformed += 1;
            return Ok(());
        }
    };

    let rewrite = plan_edits(&decoded, &content, &item.needles, RewriteOptions::from(options));
    if rewrite.is_empty() {
        return Ok(());
    }
    let edited = rewrite.plan.apply(&decoded);

    let (payload, filters) = if options.recompress_streams && !handle.filters.is_empty() {
        match codec::encode(&edited, &handle.filters) {
            Ok(encoded) => (encoded, handle.filters.clone()),
            Err(e) => {
                tracing::warn!(stream = %handle.id, "storing stream uncompressed: {e}");
                report.uncompressed_fallbacks += 1;
                (edited, Vec::new())
            }
        }
    } else {
        (edited, Vec::new())
    };

    B::write_stream(doc, handle, payload, &filters)?;

    report.streams_edited += 1;
    report.invocations_removed += rewrite.invocations_removed;
    report.text_objects_removed += rewrite.text_objects_removed;
    report.bytes_removed += rewrite.plan.deleted_len();
    if item.fallback {
        report.fallback_streams_edited += 1;
        tracing::warn!(stream = %handle.id, "edited form object found only by document-wide scan");
    } else {
        tracing::debug!(
            stream = %handle.id,
            invocations = rewrite.invocations_removed,
            bytes = rewrite.plan.deleted_len(),
            "rewrote stream"
        );
    }
    Ok(())
}
