//! dupewalk - duplicate file finder
//!
//! Walks one or more directory trees, fingerprints every regular file with
//! a 128-bit content digest and reports the files that share a digest.
//!
//! The pipeline is [`scanner::ContentHasher`] (memoized digests),
//! [`scanner::TreeWalker`] (lazy per-root enumeration) and
//! [`duplicates::DuplicateGrouper`] (digest-keyed grouping across roots).

pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod scanner;

use std::io::Write;

use anyhow::{Context, Result};

use crate::cli::{Cli, OutputFormat};
use crate::config::LoggingConfig;
use crate::duplicates::{DuplicateGrouper, GrouperConfig};
use crate::error::ExitCode;
use crate::logging::FilterSource;
use crate::output::{render_summary, JsonOutput, TextOutput};
use crate::scanner::ContentHasher;

/// Run the application with parsed arguments.
///
/// # Errors
///
/// Returns an error if the scan aborts (strict mode) or the report cannot
/// be written.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    let discovered = LoggingConfig::discover(&cli.logging_conf);
    let logging_config = discovered.as_ref().ok().map(|(_, config)| config);
    let filter_source = logging::init_logging(cli.debug, cli.quiet, logging_config);

    match &discovered {
        Ok((Some(path), _)) => log::debug!("Loaded logging config from {}", path.display()),
        Ok((None, _)) => log::debug!(
            "No logging config at {}, using defaults",
            cli.logging_conf.display()
        ),
        Err(e) => log::warn!("{:#}; using command-line levels", e),
    }
    match &filter_source {
        FilterSource::Environment if logging_config.is_some_and(|c| c.level.is_some()) => {
            log::debug!("RUST_LOG takes precedence over the configured level")
        }
        source => log::debug!("Log filter from {:?}", source),
    }

    if cli.test {
        println!("{cli:#?}");
        return Ok(ExitCode::Success);
    }

    log::debug!("args={:?}", cli);

    let hasher = ContentHasher::new();
    let config = GrouperConfig::default().with_strict(cli.strict);
    let report = DuplicateGrouper::new(&hasher, config)
        .scan(&cli.dirs)
        .context("Scan failed")?;
    log::debug!(
        "Hashed {} file(s), {} digest cache hit(s)",
        hasher.files_read(),
        hasher.cache_hits()
    );

    let exit_code = ExitCode::for_scan(report.groups.len(), report.summary.has_errors());

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match cli.output {
        OutputFormat::Text => {
            TextOutput::new(&report.groups, !cli.no_color)
                .write_to(&mut out)
                .context("Failed to write report")?;
        }
        OutputFormat::Json => {
            JsonOutput::new(&report.groups, &report.summary, exit_code)
                .write_to(&mut out, true)
                .context("Failed to write JSON report")?;
        }
    }
    out.flush().context("Failed to flush report")?;

    if cli.summary {
        eprintln!("{}", render_summary(&report.summary));
    }

    Ok(exit_code)
}
