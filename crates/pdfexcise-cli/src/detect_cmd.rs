use std::path::Path;

use pdfexcise::DetectOptions;

use crate::cli::OutputFormat;
use crate::shared::{open_pdf, print_json};

/// Print the detected watermark text. Exits with code 1 if none is found.
pub fn run(file: &Path, options: &DetectOptions, format: OutputFormat) -> Result<(), i32> {
    if !(0.0..=1.0).contains(&options.threshold) {
        eprintln!("Error: threshold must be between 0 and 1");
        return Err(1);
    }
    let pdf = open_pdf(file)?;
    let detected = pdf.detect_watermark(options);

    match format {
        OutputFormat::Text => match &detected {
            Some(text) => println!("{text}"),
            None => eprintln!("No watermark text detected"),
        },
        OutputFormat::Json => print_json(&serde_json::json!({
            "file": file.display().to_string(),
            "pages_sampled": options.sample_pages.min(pdf.page_count()),
            "watermark": detected,
        }))?,
    }

    if detected.is_none() {
        return Err(1);
    }
    Ok(())
}
