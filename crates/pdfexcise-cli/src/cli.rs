use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use pdfexcise::{DetectOptions, ExciseOptions};

/// Remove watermark text from PDF documents and extract page ranges.
#[derive(Debug, Parser)]
#[command(name = "pdfexcise", about, version)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Remove watermark text and annotations, then verify the result
    Remove {
        /// Path to the PDF file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Watermark text to remove (repeatable). Default: auto-detect
        #[arg(short = 's', long = "remove-string", value_name = "TEXT")]
        remove_strings: Vec<String>,

        /// Output path. Default: <cwd>/<stem>_remove_watermark.pdf
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,

        /// Output format for the report
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        #[command(flatten)]
        excise: ExciseArgs,

        /// Exit with code 2 if watermark text remains after removal
        #[arg(long)]
        strict: bool,
    },

    /// Guess the watermark text from lines repeated across leading pages
    Detect {
        /// Path to the PDF file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        #[command(flatten)]
        detect: DetectArgs,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Report pages whose text still contains watermark text
    Verify {
        /// Path to the PDF file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Watermark text to look for (repeatable)
        #[arg(short = 's', long = "remove-string", value_name = "TEXT", required = true)]
        remove_strings: Vec<String>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Copy a page range into a new PDF
    Extract {
        /// Path to the PDF file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Page range as 'start,end' or 'start-end' (1-indexed, inclusive)
        #[arg(short = 'r', long, value_name = "RANGE")]
        page_range: String,

        /// Output path. Default: <input dir>/<stem>_<start>-<end>.pdf
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

/// Flags controlling the excision pass.
#[derive(Debug, Clone, Args)]
pub struct ExciseArgs {
    /// Keep annotations even when their text matches
    #[arg(long)]
    pub keep_annotations: bool,

    /// Only remove single text-showing operators, never runs of them
    #[arg(long)]
    pub no_cross_run: bool,

    /// Judge every stream against every needle, skipping the page text check
    #[arg(long)]
    pub no_precheck: bool,

    /// Also scan form objects that no page references
    #[arg(long)]
    pub scan_all_forms: bool,

    /// Store edited streams uncompressed
    #[arg(long)]
    pub no_recompress: bool,

    /// Compress all unfiltered streams when saving
    #[arg(long)]
    pub compress: bool,
}

impl ExciseArgs {
    pub fn to_options(&self) -> ExciseOptions {
        ExciseOptions {
            page_precheck: !self.no_precheck,
            match_across_runs: !self.no_cross_run,
            remove_annotations: !self.keep_annotations,
            scan_unreferenced_forms: self.scan_all_forms,
            recompress_streams: !self.no_recompress,
            compress_output: self.compress,
        }
    }
}

/// Watermark detection settings.
#[derive(Debug, Clone, Args)]
pub struct DetectArgs {
    /// Number of leading pages to sample
    #[arg(long, default_value_t = 3)]
    pub sample_pages: usize,

    /// Fraction of sampled pages a line must appear on
    #[arg(long, default_value_t = 0.7)]
    pub threshold: f64,
}

impl DetectArgs {
    pub fn to_options(&self) -> DetectOptions {
        DetectOptions {
            sample_pages: self.sample_pages,
            threshold: self.threshold,
            ..DetectOptions::default()
        }
    }
}

/// Output format for reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
