//! Remove a watermark string from a PDF and report what changed.
//!
//! Usage: `cargo run --example remove_watermark -- <input.pdf> <output.pdf> <text>...`

use pdfexcise::{ExciseOptions, NeedleSet, remove_watermarks};

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() < 3 {
        eprintln!("Usage: remove_watermark <input.pdf> <output.pdf> <text>...");
        std::process::exit(1);
    }

    let needles = NeedleSet::new(&args[2..]);
    let report = remove_watermarks(&args[0], &args[1], &needles, &ExciseOptions::default())
        .unwrap_or_else(|e| {
            eprintln!("Error: {e}");
            std::process::exit(1);
        });

    println!("{report}");
    for residual in &report.residual {
        println!("still present on {residual}");
    }
}
