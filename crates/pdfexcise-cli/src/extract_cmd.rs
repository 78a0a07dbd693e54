use std::path::Path;

use crate::page_range::parse_page_range;
use crate::shared::{default_extract_output, open_pdf};

pub fn run(file: &Path, page_range: &str, output: Option<&Path>) -> Result<(), i32> {
    let mut pdf = open_pdf(file)?;
    let (start, end) = parse_page_range(page_range).map_err(|e| {
        eprintln!("Error: {e}");
        1
    })?;

    let page_count = pdf.page_count();
    tracing::info!(start, end, page_count, "extracting page range");
    if page_count == 0 {
        eprintln!("Error: Input PDF has no pages");
        return Err(1);
    }
    pdf.extract_pages(start, end).map_err(|e| {
        eprintln!("Error: {e} (PDF has {page_count} pages)");
        1
    })?;

    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_extract_output(file, start, end));
    pdf.save_to_file(&output, false).map_err(|e| {
        eprintln!("Error: {e}");
        1
    })?;

    eprintln!(
        "Extracted {} pages. Output saved to: {}",
        end - start + 1,
        output.display()
    );
    Ok(())
}
