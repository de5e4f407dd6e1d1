//! Logging infrastructure for dupewalk.
//!
//! This module provides structured logging using the `log` facade and `env_logger` backend.
//! Log filters are determined by (in priority order):
//!
//! 1. `RUST_LOG` environment variable (if set)
//! 2. `level` from the logging config file (if one was found)
//! 3. CLI flags: `--quiet` (warnings and errors) or `--debug` (debug/trace)
//! 4. Default: info level
//!
//! The library itself only emits through `log`; installing a logger is
//! left to the binary.
//!
//! # Example
//!
//! ```rust,no_run
//! use dupewalk::logging::init_logging;
//!
//! // Initialize with default (info) level
//! init_logging(0, false, None);
//!
//! log::info!("Application started");
//! ```

use env_logger::Builder;
use log::LevelFilter;
use std::env;
use std::io::Write;

use crate::config::LoggingConfig;

/// Where the active filter came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterSource {
    /// `RUST_LOG` environment variable
    Environment,
    /// `level` from the logging config file
    ConfigFile(String),
    /// CLI flags
    Flags(LevelFilter),
}

/// Initialize the logging subsystem.
///
/// Should be called once at the start of the application. Later calls are
/// ignored.
///
/// # Arguments
///
/// * `debug` - Debug count from CLI (0=normal, 1=debug, 2+=trace)
/// * `quiet` - If true, only show warnings and errors
/// * `config` - Settings from the logging config file, if one was found
pub fn init_logging(debug: u8, quiet: bool, config: Option<&LoggingConfig>) -> FilterSource {
    let source = filter_source(
        env::var("RUST_LOG").is_ok(),
        config.and_then(|c| c.level.clone()),
        debug,
        quiet,
    );

    let mut builder = Builder::new();
    match &source {
        FilterSource::Environment => {
            builder.parse_default_env();
        }
        FilterSource::ConfigFile(filters) => {
            builder.parse_filters(filters);
        }
        FilterSource::Flags(level) => {
            builder.filter_level(*level);
        }
    }

    let defaults = LoggingConfig::default();
    let config = config.unwrap_or(&defaults);
    configure_format(&mut builder, config.timestamps, config.module_path || debug > 0);

    if builder.try_init().is_err() {
        log::debug!("Logger already initialized");
    }
    source
}

/// Decide which filter wins.
fn filter_source(
    env_set: bool,
    config_level: Option<String>,
    debug: u8,
    quiet: bool,
) -> FilterSource {
    if env_set {
        FilterSource::Environment
    } else if let Some(filters) = config_level.filter(|s| !s.trim().is_empty()) {
        FilterSource::ConfigFile(filters)
    } else {
        FilterSource::Flags(determine_level(debug, quiet))
    }
}

/// Determine the log level from CLI flags.
///
/// # Arguments
///
/// * `debug` - Debug count (0=info, 1=debug, 2+=trace)
/// * `quiet` - If true, use warn level
fn determine_level(debug: u8, quiet: bool) -> LevelFilter {
    if quiet {
        LevelFilter::Warn
    } else {
        match debug {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

fn configure_format(builder: &mut Builder, timestamps: bool, module_path: bool) {
    builder.format(move |buf, record| {
        let level = record.level();
        let level_style = buf.default_level_style(level);

        if timestamps {
            let timestamp = buf.timestamp_seconds();
            write!(buf, "{} ", timestamp)?;
        }
        write!(buf, "{level_style}{:<5}{level_style:#} ", level)?;
        if module_path {
            write!(buf, "[{}] ", record.module_path().unwrap_or("unknown"))?;
        }
        writeln!(buf, "{}", record.args())
    });
}
