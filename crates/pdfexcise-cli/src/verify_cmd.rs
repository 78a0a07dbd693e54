use std::path::Path;

use crate::cli::OutputFormat;
use crate::shared::{needle_set, open_pdf, print_json};

/// Print residual watermark matches. Exits with code 2 if any remain.
pub fn run(file: &Path, remove_strings: &[String], format: OutputFormat) -> Result<(), i32> {
    let pdf = open_pdf(file)?;
    let needles = needle_set(remove_strings);
    if needles.is_empty() {
        eprintln!("Error: no non-blank watermark text given");
        return Err(1);
    }
    let residual = pdf.verify(&needles);

    match format {
        OutputFormat::Text => {
            if residual.is_empty() {
                println!("No watermark text found");
            }
            for found in &residual {
                println!("{found}");
            }
        }
        OutputFormat::Json => print_json(&serde_json::json!({
            "file": file.display().to_string(),
            "clean": residual.is_empty(),
            "residual": residual,
        }))?,
    }

    if !residual.is_empty() {
        return Err(2);
    }
    Ok(())
}
