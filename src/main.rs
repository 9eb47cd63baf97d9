use std::process::ExitCode;

use pdf_unmarker::pipeline::job_runner::{JobConfig, run_job};
use tracing_subscriber::EnvFilter;

fn print_usage() {
    eprintln!("Usage: pdf_unmarker <file.pdf>");
    eprintln!("  Remove yellow/orange marker highlights from a PDF.");
    eprintln!("  Example: pdf_unmarker example.pdf");
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        return ExitCode::SUCCESS;
    }

    if args.iter().any(|a| a == "--version" || a == "-V") {
        eprintln!("pdf_unmarker {}", env!("CARGO_PKG_VERSION"));
        return ExitCode::SUCCESS;
    }

    let [input] = args.as_slice() else {
        print_usage();
        return ExitCode::FAILURE;
    };

    init_logging();

    let job = match JobConfig::for_input(input) {
        Ok(j) => j,
        Err(e) => {
            eprintln!("ERROR: Failed to load settings for {input}: {e}");
            return ExitCode::FAILURE;
        }
    };

    match run_job(&job) {
        Ok(result) => {
            eprintln!(
                "OK: {} -> {} ({} pages)",
                result.input_path.display(),
                result.output_path.display(),
                result.pages_processed
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("ERROR: {}: {e}", job.input_path.display());
            ExitCode::FAILURE
        }
    }
}
