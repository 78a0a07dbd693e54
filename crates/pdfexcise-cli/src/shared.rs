use std::path::{Path, PathBuf};

use pdfexcise::{NeedleSet, Pdf};
use tracing_subscriber::EnvFilter;

/// Install the stderr log subscriber.
///
/// `RUST_LOG` wins when set; otherwise the level is `warn`, raised one step
/// per `-v`.
pub fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .try_init();
}

/// Check that `file` exists and has a `.pdf` extension.
///
/// Returns `Err(1)` with a message printed to stderr otherwise.
pub fn validate_input(file: &Path) -> Result<(), i32> {
    if !file.exists() {
        eprintln!("Error: Input file not found: {}", file.display());
        return Err(1);
    }
    let is_pdf = file
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
    if !is_pdf {
        eprintln!("Error: Input file must be a PDF: {}", file.display());
        return Err(1);
    }
    Ok(())
}

/// Validate and open a PDF file with user-friendly error messages.
pub fn open_pdf(file: &Path) -> Result<Pdf, i32> {
    validate_input(file)?;
    Pdf::open_file(file).map_err(|e| {
        eprintln!("Error: failed to open PDF: {e}");
        1
    })
}

/// Build a needle set, dropping blank entries.
pub fn needle_set(strings: &[String]) -> NeedleSet {
    NeedleSet::new(strings.iter().map(|s| s.trim()).filter(|s| !s.is_empty()))
}

/// File stem of `file`, or "output" when it has none.
fn stem(file: &Path) -> String {
    file.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string())
}

/// `<cwd>/<stem>_remove_watermark.pdf`.
pub fn default_remove_output(file: &Path, cwd: &Path) -> PathBuf {
    cwd.join(format!("{}_remove_watermark.pdf", stem(file)))
}

/// `<input dir>/<stem>_<start>-<end>.pdf`.
pub fn default_extract_output(file: &Path, start: usize, end: usize) -> PathBuf {
    let name = format!("{}_{start}-{end}.pdf", stem(file));
    match file.parent() {
        Some(parent) => parent.join(name),
        None => PathBuf::from(name),
    }
}

/// Print `value` as one line of JSON.
pub fn print_json(value: &serde_json::Value) -> Result<(), i32> {
    let line = serde_json::to_string(value).map_err(|e| {
        eprintln!("Error: failed to serialize output: {e}");
        1
    })?;
    println!("{line}");
    Ok(())
}
