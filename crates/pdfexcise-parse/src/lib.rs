//! pdfexcise-parse: content stream codec, tokenizer, matcher and rewriter,
//! plus the document backend they run against.
//!
//! The stream-level pipeline is backend-independent:
//! [`codec`] decodes a payload, [`tokenizer`] scans it into spanned lexical
//! units, [`matcher`] judges text-showing invocations against a needle set
//! and [`rewriter`] deletes the matches. The [`DocumentBackend`] trait and
//! its lopdf implementation supply streams, annotations and page text.

pub mod backend;
pub mod codec;
pub mod error;
pub mod lopdf_backend;
pub mod matcher;
pub mod page_text;
pub mod rewriter;
pub mod tokenizer;
pub mod walker;

pub use backend::{AnnotationInfo, DocumentBackend};
pub use error::{BackendError, CodecError, TokenizeError};
pub use lopdf_backend::{LopdfBackend, LopdfDocument};
pub use matcher::{InvocationText, decode_text, matches};
pub use pdfexcise_core;
pub use rewriter::{Rewrite, RewriteOptions, plan_edits, rewrite_stream};
pub use tokenizer::{ContentScan, LexicalUnit, TextObject, TextShowingInvocation, scan};
