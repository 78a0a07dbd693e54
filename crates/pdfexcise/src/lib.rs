//! pdfexcise: Remove watermark text from PDF content streams.
//!
//! This is the public API facade crate for pdfexcise-rs. It re-exports types
//! from pdfexcise-core and drives the stream pipeline of pdfexcise-parse
//! across a whole document.
//!
//! # Architecture
//!
//! - **pdfexcise-core**: Backend-independent data types
//! - **pdfexcise-parse**: Stream codec, tokenizer, matcher, rewriter and the
//!   lopdf document backend
//! - **pdfexcise** (this crate): Document-level excision, verification,
//!   detection and page extraction

pub mod detect;
pub mod excise;
pub mod pages;
mod pdf;
pub mod verify;

pub use detect::detect_watermark;
pub use excise::excise_watermarks;
pub use pages::extract_pages;
pub use pdf::{Pdf, remove_watermarks};
pub use pdfexcise_core;
pub use pdfexcise_core::{
    DetectOptions, EditReport, ExciseError, ExciseOptions, NeedleSet, ResidualMatch,
};
pub use pdfexcise_parse;
pub use verify::verify;
