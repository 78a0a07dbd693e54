//! Error types for the parsing and rewriting layers.
//!
//! Uses [`thiserror`] for ergonomic error derivation. [`CodecError`] and
//! [`TokenizeError`] are scoped to one stream: the orchestrator records them
//! and leaves that stream untouched. [`BackendError`] wraps document-level
//! failures and converts to [`ExciseError`] for the caller.

use pdfexcise_core::ExciseError;
use thiserror::Error;

/// Failure decoding or re-encoding a stream payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// The filter chain names a filter this codec cannot edit through.
    #[error("unsupported filter: {0}")]
    UnsupportedFilter(String),

    /// The payload is not valid data for its declared filter.
    #[error("corrupt {filter} data: {message}")]
    Corrupt {
        /// Filter name.
        filter: String,
        /// Decoder message.
        message: String,
    },

    /// Re-encoding did not reproduce the edited buffer.
    #[error("re-encoding with {0} did not round-trip")]
    EncodingRoundtrip(String),
}

/// Failure scanning a content stream; the stream is left unmodified.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenizeError {
    /// A `(` string runs to the end of the buffer.
    #[error("unterminated literal string starting at byte {offset}")]
    MalformedLiteralString {
        /// Offset of the opening parenthesis.
        offset: usize,
    },

    /// A `<...>` string is unterminated or holds a non-hex byte.
    #[error("malformed hex string starting at byte {offset}")]
    MalformedHexString {
        /// Offset of the opening angle bracket.
        offset: usize,
    },

    /// A `[` array runs to the end of the buffer.
    #[error("unterminated array starting at byte {offset}")]
    UnterminatedArray {
        /// Offset of the opening bracket.
        offset: usize,
    },

    /// A `<<` dictionary runs to the end of the buffer.
    #[error("unterminated dictionary starting at byte {offset}")]
    UnterminatedDictionary {
        /// Offset of the opening `<<`.
        offset: usize,
    },

    /// A `BI` inline image lacks its `ID` or `EI`.
    #[error("unterminated inline image starting at byte {offset}")]
    UnterminatedInlineImage {
        /// Offset of the `BI` keyword.
        offset: usize,
    },

    /// A closing delimiter with nothing to close.
    #[error("unexpected '{}' at byte {offset}", *byte as char)]
    UnexpectedDelimiter {
        /// The delimiter byte.
        byte: u8,
        /// Its offset.
        offset: usize,
    },
}

/// Error type for document backend operations.
///
/// Wraps backend-specific errors and provides conversion to [`ExciseError`]
/// for unified error handling across the library.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Error from PDF parsing (structure, syntax, object resolution).
    #[error("PDF parse error: {0}")]
    Parse(String),

    /// Error reading or writing PDF data.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A stream codec error that escaped per-stream handling.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// A content stream could not be scanned.
    #[error(transparent)]
    Tokenize(#[from] TokenizeError),

    /// A core library error.
    #[error(transparent)]
    Core(#[from] ExciseError),
}

impl From<BackendError> for ExciseError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Parse(msg) => ExciseError::ParseError(msg),
            BackendError::Io(e) => ExciseError::IoError(e.to_string()),
            BackendError::Codec(e) => ExciseError::Other(e.to_string()),
            BackendError::Tokenize(e) => ExciseError::ParseError(e.to_string()),
            BackendError::Core(e) => e,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codec_unsupported_filter_message() {
        let err = CodecError::UnsupportedFilter("DCTDecode".to_string());
        assert_eq!(err.to_string(), "unsupported filter: DCTDecode");
    }

    #[test]
    fn codec_corrupt_message() {
        let err = CodecError::Corrupt {
            filter: "FlateDecode".to_string(),
            message: "invalid stored block".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "corrupt FlateDecode data: invalid stored block"
        );
    }

    #[test]
    fn tokenize_unexpected_delimiter_message() {
        let err = TokenizeError::UnexpectedDelimiter {
            byte: b']',
            offset: 7,
        };
        assert_eq!(err.to_string(), "unexpected ']' at byte 7");
    }

    #[test]
    fn tokenize_literal_message() {
        let err = TokenizeError::MalformedLiteralString { offset: 3 };
        assert!(err.to_string().contains("byte 3"));
    }

    #[test]
    fn backend_error_parse() {
        let err = BackendError::Parse("invalid xref table".to_string());
        assert_eq!(err.to_string(), "PDF parse error: invalid xref table");
    }

    #[test]
    fn backend_error_io_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: BackendError = io_err.into();
        assert!(matches!(err, BackendError::Io(_)));
        assert!(err.to_string().contains("file missing"));
    }

    #[test]
    fn backend_error_from_codec_is_transparent() {
        let err: BackendError = CodecError::UnsupportedFilter("JBIG2Decode".to_string()).into();
        assert_eq!(err.to_string(), "unsupported filter: JBIG2Decode");
    }

    #[test]
    fn backend_error_to_excise_error_parse() {
        let backend = BackendError::Parse("bad syntax".to_string());
        let err: ExciseError = backend.into();
        assert_eq!(err, ExciseError::ParseError("bad syntax".to_string()));
    }

    #[test]
    fn backend_error_to_excise_error_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: ExciseError = BackendError::Io(io_err).into();
        assert!(matches!(err, ExciseError::IoError(_)));
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn backend_error_core_passthrough() {
        let backend = BackendError::Core(ExciseError::PasswordRequired);
        let err: ExciseError = backend.into();
        assert_eq!(err, ExciseError::PasswordRequired);
    }
}
