//! Logging for the program, built on `fern`.
//!
//! Ordinary messages go to stdout and warnings and errors to stderr, coloured by level when the
//! stream is a terminal. When a map is rendered to an output folder, the same messages are also
//! written to two plain log files in that folder.
use anyhow::{Context, Result, bail};
use chrono::Local;
use fern::colors::{Color, ColoredLevelConfig};
use fern::{Dispatch, FormatCallback};
use log::{LevelFilter, Record};
use std::env;
use std::fmt::{Arguments, Display};
use std::fs::{File, OpenOptions};
use std::io::IsTerminal;
use std::path::Path;
use std::sync::OnceLock;

/// Set once the global logger has been installed
static LOGGER_INIT: OnceLock<()> = OnceLock::new();

/// The log level used when neither the environment nor `settings.toml` gives one
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Environment variable which takes precedence over the log level in `settings.toml`
const LOG_LEVEL_ENV_VAR: &str = "MIGRATION_MAP_LOG_LEVEL";

/// Log file for messages below warning level
const LOG_INFO_FILE_NAME: &str = "migration_map_info.log";

/// Log file for warnings and errors
const LOG_ERROR_FILE_NAME: &str = "migration_map_error.log";

/// Whether the program logger has been initialised
pub fn is_logger_initialised() -> bool {
    LOGGER_INIT.get().is_some()
}

/// Install the program logger.
///
/// The level comes from the `MIGRATION_MAP_LOG_LEVEL` environment variable if it is set, otherwise
/// from `settings.toml`. Valid levels are `off`, `error`, `warn`, `info`, `debug` and `trace`.
///
/// The logger can only be installed once per process; later calls fail.
///
/// # Arguments
///
/// * `log_level_from_settings`: The log level specified in `settings.toml`
/// * `log_dir`: Folder to create log files in, if any
pub fn init(log_level_from_settings: &str, log_dir: Option<&Path>) -> Result<()> {
    let log_level = match env::var(LOG_LEVEL_ENV_VAR) {
        Ok(level) => parse_log_level(&level)
            .with_context(|| format!("Invalid value for {LOG_LEVEL_ENV_VAR}"))?,
        Err(_) => parse_log_level(log_level_from_settings)?,
    };

    let colours = ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::Green)
        .debug(Color::Blue)
        .trace(Color::Magenta);

    let mut dispatch = Dispatch::new()
        .chain(stdout_dispatch(log_level, colours))
        .chain(stderr_dispatch(log_level, colours));

    if let Some(log_dir) = log_dir {
        dispatch = dispatch
            .chain(
                Dispatch::new()
                    .filter(|metadata| metadata.level() > LevelFilter::Warn)
                    .format(write_log_plain)
                    .level(log_level.max(LevelFilter::Info))
                    .chain(create_log_file(&log_dir.join(LOG_INFO_FILE_NAME))?),
            )
            .chain(
                Dispatch::new()
                    .format(write_log_plain)
                    .level(LevelFilter::Warn)
                    .chain(create_log_file(&log_dir.join(LOG_ERROR_FILE_NAME))?),
            );
    }

    dispatch.apply().context("Logger already initialised")?;
    LOGGER_INIT.get_or_init(|| ());

    Ok(())
}

/// Messages below warning level, written to stdout
fn stdout_dispatch(log_level: LevelFilter, colours: ColoredLevelConfig) -> Dispatch {
    let use_colour = std::io::stdout().is_terminal();
    Dispatch::new()
        .filter(|metadata| metadata.level() > LevelFilter::Warn)
        .format(move |out, message, record| {
            write_log_colour(out, message, record, use_colour, &colours);
        })
        .level(log_level)
        .chain(std::io::stdout())
}

/// Warnings and errors, written to stderr
fn stderr_dispatch(log_level: LevelFilter, colours: ColoredLevelConfig) -> Dispatch {
    let use_colour = std::io::stderr().is_terminal();
    Dispatch::new()
        .format(move |out, message, record| {
            write_log_colour(out, message, record, use_colour, &colours);
        })
        .level(log_level.min(LevelFilter::Warn))
        .chain(std::io::stderr())
}

/// Create (or truncate) a log file
fn create_log_file(path: &Path) -> Result<File> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .with_context(|| format!("Could not create log file {}", path.display()))
}

/// Convert a log level string (in any case) to a [`LevelFilter`]
fn parse_log_level(log_level: &str) -> Result<LevelFilter> {
    let level = match log_level.to_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        unknown => bail!("Unknown log level: {unknown}"),
    };

    Ok(level)
}

fn write_log<T: Display>(out: FormatCallback, level: T, target: &str, message: &Arguments) {
    let timestamp = Local::now().format("%H:%M:%S");

    out.finish(format_args!("[{timestamp} {level} {target}] {message}"));
}

fn write_log_plain(out: FormatCallback, message: &Arguments, record: &Record) {
    write_log(out, record.level(), record.target(), message);
}

fn write_log_colour(
    out: FormatCallback,
    message: &Arguments,
    record: &Record,
    use_colour: bool,
    colours: &ColoredLevelConfig,
) {
    if use_colour {
        write_log(out, colours.color(record.level()), record.target(), message);
    } else {
        write_log_plain(out, message, record);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::tempdir;

    #[rstest]
    #[case("off", LevelFilter::Off)]
    #[case("warn", LevelFilter::Warn)]
    #[case("INFO", LevelFilter::Info)]
    #[case("Debug", LevelFilter::Debug)]
    fn test_parse_log_level(#[case] input: &str, #[case] expected: LevelFilter) {
        assert_eq!(parse_log_level(input).unwrap(), expected);
    }

    #[test]
    fn test_parse_log_level_unknown() {
        assert_eq!(
            parse_log_level("loud").unwrap_err().to_string(),
            "Unknown log level: loud"
        );
    }

    #[test]
    fn test_create_log_file_truncates() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(LOG_INFO_FILE_NAME);
        std::fs::write(&path, "old contents").unwrap();
        create_log_file(&path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
    }
}
