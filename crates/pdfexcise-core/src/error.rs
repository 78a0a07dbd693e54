//! Fatal error type for pdfexcise.
//!
//! Provides [`ExciseError`] for conditions that stop a whole run. Problems
//! scoped to a single content stream (unsupported filters, malformed
//! strings, compression round-trip failures) never surface here: the parse
//! layer records them in the [`EditReport`](crate::EditReport) and moves on.

use std::fmt;

/// Fatal error types for watermark excision.
///
/// These errors indicate conditions that prevent further processing of the
/// document, such as an unreadable file or a broken object graph.
#[derive(Debug, Clone, PartialEq)]
pub enum ExciseError {
    /// Error parsing PDF structure or syntax.
    ParseError(String),
    /// I/O error reading or writing PDF data.
    IoError(String),
    /// The PDF is encrypted; encrypted documents are not processed.
    PasswordRequired,
    /// A requested page range does not fit the document.
    InvalidPageRange(String),
    /// Any other error not covered by specific variants.
    Other(String),
}

impl fmt::Display for ExciseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExciseError::ParseError(msg) => write!(f, "parse error: {msg}"),
            ExciseError::IoError(msg) => write!(f, "I/O error: {msg}"),
            ExciseError::PasswordRequired => {
                write!(f, "PDF is encrypted; encrypted documents are not supported")
            }
            ExciseError::InvalidPageRange(msg) => write!(f, "invalid page range: {msg}"),
            ExciseError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for ExciseError {}

impl From<std::io::Error> for ExciseError {
    fn from(err: std::io::Error) -> Self {
        ExciseError::IoError(err.to_string())
    }
}
