use std::path::Path;

use pdfexcise::{DetectOptions, EditReport, ExciseOptions, NeedleSet, remove_watermarks};

use crate::cli::OutputFormat;
use crate::shared::{default_remove_output, needle_set, open_pdf, print_json, validate_input};

pub fn run(
    file: &Path,
    remove_strings: &[String],
    output: Option<&Path>,
    format: OutputFormat,
    options: &ExciseOptions,
    strict: bool,
) -> Result<(), i32> {
    validate_input(file)?;

    let mut needles = needle_set(remove_strings);
    let mut detected = None;
    if needles.is_empty() {
        let pdf = open_pdf(file)?;
        match pdf.detect_watermark(&DetectOptions::default()) {
            Some(text) => {
                eprintln!("Detected watermark text: {text}");
                needles = NeedleSet::new([text.as_str()]);
                detected = Some(text);
            }
            None => {
                eprintln!(
                    "Warning: no watermark text detected; writing the document without text edits"
                );
            }
        }
    }

    let output = match output {
        Some(path) => path.to_path_buf(),
        None => {
            let cwd = std::env::current_dir().map_err(|e| {
                eprintln!("Error: cannot determine current directory: {e}");
                1
            })?;
            default_remove_output(file, &cwd)
        }
    };

    tracing::info!(
        input = %file.display(),
        output = %output.display(),
        needles = needles.len(),
        "removing watermark text"
    );
    let report = remove_watermarks(file, &output, &needles, options).map_err(|e| {
        eprintln!("Error: {e}");
        1
    })?;

    match format {
        OutputFormat::Text => print_text(&report, &needles, &output),
        OutputFormat::Json => print_json(&serde_json::json!({
            "input": file.display().to_string(),
            "output": output.display().to_string(),
            "needles": needles.originals(),
            "detected": detected,
            "report": report,
        }))?,
    }

    if strict && !report.is_clean() {
        return Err(2);
    }
    Ok(())
}

fn print_text(report: &EditReport, needles: &NeedleSet, output: &Path) {
    if !needles.is_empty() {
        println!("Watermark text: {}", needles.originals().join(", "));
    }
    println!("{report}");
    if report.is_clean() {
        println!("Verification: no watermark text found");
    } else {
        println!("Verification: watermark text still present");
        for residual in &report.residual {
            println!("  {residual}");
        }
    }
    println!("Output saved to: {}", output.display());
}
