//! pdfexcise-core: Backend-independent data types for watermark excision.
//!
//! This crate provides the types shared by the parsing layer and the public
//! facade: needle sets, byte-range edit plans, stream handles and filter
//! chains, run options, the edit report, and the fatal error type.
//! It has no mandatory dependencies.

pub mod error;
pub mod needle;
pub mod options;
pub mod plan;
pub mod report;
pub mod stream;

pub use error::ExciseError;
pub use needle::NeedleSet;
pub use options::{DetectOptions, ExciseOptions};
pub use plan::EditPlan;
pub use report::{EditReport, ResidualMatch};
pub use stream::{Filter, ObjectRef, StreamHandle, StreamKind};
