//! Command implementation for the CLI tool.

use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;

use svndump_rewrite::{Error, RuleSet, TranscodeOptions, transcode_with_observer};

use crate::exit_codes::{ExitCode, error_to_exit_code};
use crate::progress::CliProgress;

/// Configuration for a rewrite run.
pub struct RewriteConfig<'a> {
    pub prop_map: &'a Path,
    pub input: Option<&'a Path>,
    pub output: Option<&'a Path>,
    pub debug: bool,
    pub quiet: bool,
}

/// Rewrites one dump stream according to the rule file.
pub fn rewrite(config: &RewriteConfig<'_>) -> ExitCode {
    let rules = match RuleSet::from_csv_path(config.prop_map) {
        Ok(r) => r,
        Err(e) => return report(&e),
    };
    log::info!(
        "loaded {} rules from {}",
        rules.len(),
        config.prop_map.display()
    );

    let input: Box<dyn Read> = match config.input {
        Some(path) => match File::open(path) {
            Ok(f) => Box::new(f),
            Err(e) => {
                eprintln!("Error opening {}: {}", path.display(), e);
                return ExitCode::IoError;
            }
        },
        None => Box::new(io::stdin().lock()),
    };

    let output: Box<dyn Write> = match config.output {
        Some(path) => match File::create(path) {
            Ok(f) => Box::new(BufWriter::new(f)),
            Err(e) => {
                eprintln!("Error creating {}: {}", path.display(), e);
                return ExitCode::IoError;
            }
        },
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    let options = TranscodeOptions::new(rules);
    let mut progress = CliProgress::new(config.quiet, config.debug);

    match transcode_with_observer(input, output, &options, &mut progress) {
        Ok(stats) => {
            progress.finish();
            log::info!(
                "{} revisions, {} nodes, {} properties rewritten, {} bytes in, {} bytes out",
                stats.revisions,
                stats.nodes,
                stats.properties_rewritten,
                stats.bytes_read,
                stats.bytes_written
            );
            ExitCode::Success
        }
        Err(e) => {
            progress.abandon();
            report(&e)
        }
    }
}

fn report(error: &Error) -> ExitCode {
    eprintln!("Error: {}", error);
    error_to_exit_code(error)
}
