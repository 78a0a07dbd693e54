//! Top-level PDF document type for watermark excision.

use std::io::Write;
use std::path::Path;

use pdfexcise_core::{
    DetectOptions, EditReport, ExciseError, ExciseOptions, NeedleSet, ResidualMatch,
};
use pdfexcise_parse::{DocumentBackend, LopdfBackend, LopdfDocument};

use crate::{detect, excise, pages, verify};

/// A PDF document opened for watermark excision.
///
/// Wraps a parsed lopdf document and exposes the detection, excision,
/// verification and page-range operations over it.
///
/// # Example
///
/// ```ignore
/// let mut pdf = Pdf::open_file("report.pdf")?;
/// let needles = NeedleSet::new(["CONFIDENTIAL"]);
/// let report = pdf.excise(&needles, &ExciseOptions::default())?;
/// pdf.save_to_file("clean.pdf", false)?;
/// ```
#[derive(Debug)]
pub struct Pdf {
    doc: LopdfDocument,
}

impl Pdf {
    /// Open a PDF document from a file path.
    ///
    /// # Errors
    ///
    /// Returns [`ExciseError::IoError`] if the file cannot be read, or any
    /// error of [`Pdf::open`].
    pub fn open_file(path: impl AsRef<Path>) -> Result<Self, ExciseError> {
        let bytes =
            std::fs::read(path.as_ref()).map_err(|e| ExciseError::IoError(e.to_string()))?;
        Self::open(&bytes)
    }

    /// Open a PDF document from bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ExciseError::PasswordRequired`] if the PDF is encrypted and
    /// [`ExciseError::ParseError`] if the bytes are not a valid PDF.
    pub fn open(bytes: &[u8]) -> Result<Self, ExciseError> {
        let doc = LopdfBackend::open(bytes).map_err(ExciseError::from)?;
        Ok(Self { doc })
    }

    /// Return the number of pages in the document.
    pub fn page_count(&self) -> usize {
        LopdfBackend::page_count(&self.doc)
    }

    /// Extracted text of page `index` (0-based), one line per text object.
    ///
    /// # Errors
    ///
    /// Returns [`ExciseError`] if the index is out of range or the page
    /// cannot be read.
    pub fn page_text(&self, index: usize) -> Result<String, ExciseError> {
        LopdfBackend::extract_text(&self.doc, index).map_err(ExciseError::from)
    }

    /// Guess the watermark text from repeated lines on the leading pages.
    pub fn detect_watermark(&self, options: &DetectOptions) -> Option<String> {
        detect::detect_watermark::<LopdfBackend>(&self.doc, options)
    }

    /// Remove matching text from every reachable content stream and form
    /// object, and matching annotations. The report's `residual` list is
    /// left empty; call [`Pdf::verify`] after saving to fill it.
    ///
    /// # Errors
    ///
    /// Returns [`ExciseError`] if a discovered stream cannot be read or
    /// written back.
    pub fn excise(
        &mut self,
        needles: &NeedleSet,
        options: &ExciseOptions,
    ) -> Result<EditReport, ExciseError> {
        excise::excise_watermarks::<LopdfBackend>(&mut self.doc, needles, options)
            .map_err(ExciseError::from)
    }

    /// Pages whose extracted text still contains a needle.
    pub fn verify(&self, needles: &NeedleSet) -> Vec<ResidualMatch> {
        verify::verify::<LopdfBackend>(&self.doc, needles)
    }

    /// Keep pages `start..=end` (1-based, inclusive) and drop the rest.
    ///
    /// # Errors
    ///
    /// Returns [`ExciseError::InvalidPageRange`] if the range does not fit
    /// the document.
    pub fn extract_pages(&mut self, start: usize, end: usize) -> Result<(), ExciseError> {
        pages::extract_pages::<LopdfBackend>(&mut self.doc, start, end)
    }

    /// Serialize the document to `writer`.
    ///
    /// # Errors
    ///
    /// Returns [`ExciseError::IoError`] if writing fails.
    pub fn save_to<W: Write>(&mut self, writer: &mut W, compress: bool) -> Result<(), ExciseError> {
        LopdfBackend::save_to(&mut self.doc, writer, compress).map_err(ExciseError::from)
    }

    /// Serialize the document to a byte vector.
    ///
    /// # Errors
    ///
    /// Returns [`ExciseError::IoError`] if serialization fails.
    pub fn to_bytes(&mut self, compress: bool) -> Result<Vec<u8>, ExciseError> {
        let mut bytes = Vec::new();
        self.save_to(&mut bytes, compress)?;
        Ok(bytes)
    }

    /// Write the document to `path`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns [`ExciseError::IoError`] if the directories or the file cannot
    /// be created.
    pub fn save_to_file(
        &mut self,
        path: impl AsRef<Path>,
        compress: bool,
    ) -> Result<(), ExciseError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let bytes = self.to_bytes(compress)?;
        std::fs::write(path, bytes)?;
        tracing::debug!(path = %path.display(), "saved document");
        Ok(())
    }

    /// Access the underlying backend document.
    pub fn document(&self) -> &LopdfDocument {
        &self.doc
    }
}

/// One complete removal run: open `input`, excise `needles`, save to
/// `output`, then reopen the saved file and verify it.
///
/// The returned report's `residual` list holds every (page, needle) pair
/// still found in the saved document.
///
/// # Errors
///
/// Returns [`ExciseError`] if the input cannot be opened, an edit cannot be
/// written back, or the output cannot be saved or reopened.
pub fn remove_watermarks(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    needles: &NeedleSet,
    options: &ExciseOptions,
) -> Result<EditReport, ExciseError> {
    let output = output.as_ref();
    let mut pdf = Pdf::open_file(input)?;
    let mut report = pdf.excise(needles, options)?;
    pdf.save_to_file(output, options.compress_output)?;

    let saved = Pdf::open_file(output)?;
    report.residual = saved.verify(needles);
    if report.residual.is_empty() {
        tracing::info!(path = %output.display(), "watermark removal verified");
    }
    Ok(report)
}
