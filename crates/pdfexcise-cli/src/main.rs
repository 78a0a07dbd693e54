mod cli;
mod detect_cmd;
mod extract_cmd;
mod page_range;
mod remove_cmd;
mod shared;
mod verify_cmd;

use clap::Parser;
use cli::Cli;

fn main() {
    let cli = Cli::parse();
    shared::init_logging(cli.verbose);

    let result = match cli.command {
        cli::Commands::Remove {
            ref file,
            ref remove_strings,
            ref output,
            format,
            ref excise,
            strict,
        } => remove_cmd::run(
            file,
            remove_strings,
            output.as_deref(),
            format,
            &excise.to_options(),
            strict,
        ),
        cli::Commands::Detect {
            ref file,
            ref detect,
            format,
        } => detect_cmd::run(file, &detect.to_options(), format),
        cli::Commands::Verify {
            ref file,
            ref remove_strings,
            format,
        } => verify_cmd::run(file, remove_strings, format),
        cli::Commands::Extract {
            ref file,
            ref page_range,
            ref output,
        } => extract_cmd::run(file, page_range, output.as_deref()),
    };

    if let Err(code) = result {
        std::process::exit(code);
    }
}
