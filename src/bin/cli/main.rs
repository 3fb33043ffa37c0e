//! CLI tool for rewriting Subversion dump-file properties.

mod commands;
mod exit_codes;
mod progress;

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Rewrite property values in a Subversion dump stream
#[derive(Parser)]
#[command(name = "svndump-rewrite")]
#[command(author, version, long_about = None)]
#[command(about = "Rewrite property values in a Subversion dump stream")]
pub struct Cli {
    /// CSV file of `property,pattern,replacement` rows
    #[arg(short = 'f', long = "prop-map-file", value_name = "FILE", value_parser = existing_file)]
    prop_map: PathBuf,

    /// Dump file to read (default: standard input)
    input: Option<PathBuf>,

    /// File to write the rewritten dump to (default: standard output)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Print one line per record to standard error
    #[arg(long)]
    debug: bool,

    /// Suppress progress output
    #[arg(long, short = 'q')]
    quiet: bool,
}

/// Accepts only paths naming an existing regular file.
fn existing_file(value: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(value);
    if path.is_file() {
        Ok(path)
    } else {
        Err("Properties map doesn't exist.".to_string())
    }
}

fn main() {
    // Set up Ctrl+C handler
    ctrlc::set_handler(move || {
        eprintln!("\nInterrupted");
        std::process::exit(exit_codes::USER_INTERRUPT);
    })
    .ok();

    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let exit_code = commands::rewrite(&commands::RewriteConfig {
        prop_map: &cli.prop_map,
        input: cli.input.as_deref(),
        output: cli.output.as_deref(),
        debug: cli.debug,
        quiet: cli.quiet,
    });

    std::process::exit(exit_code.code());
}
