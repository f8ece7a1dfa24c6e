use std::path::{Path, PathBuf};
use std::str::FromStr;

use log::{LevelFilter, info};
use simplelog::{ColorChoice, CombinedLogger, SharedLogger, TermLogger, TerminalMode, WriteLogger};

use crate::config::Settings;
use crate::error::Error;
use crate::request::RequestDescriptor;

/// Install the stderr logger and, when configured, the run log file.
///
/// Best-effort: an unwritable log file only drops the file logger.
pub fn init(settings: &Settings, verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::from_str(&settings.log_level).unwrap_or(LevelFilter::Warn)
    };

    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        simplelog::Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )];
    if let Some(file) = log_path(&settings.log_file).and_then(|p| open_log(&p)) {
        loggers.push(WriteLogger::new(
            LevelFilter::Info,
            simplelog::Config::default(),
            file,
        ));
    }
    let _ = CombinedLogger::init(loggers);
}

/// Expand `~` and environment variables in the configured log path.
fn log_path(raw: &str) -> Option<PathBuf> {
    if raw.is_empty() {
        return None;
    }
    let expanded = shellexpand::full(raw).ok()?;
    Some(PathBuf::from(expanded.as_ref()))
}

fn open_log(path: &Path) -> Option<std::fs::File> {
    if let Some(dir) = path.parent() {
        let _ = std::fs::create_dir_all(dir);
    }
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .ok()
}

/// Record one run as a single info line.
pub fn log_run(files: &[PathBuf], result: &Result<RequestDescriptor, Error>) {
    info!("{}", run_record(files, result));
}

/// `ok|error <TAB> files <TAB> url-or-reason`, newlines folded to "; ".
fn run_record(files: &[PathBuf], result: &Result<RequestDescriptor, Error>) -> String {
    let names: Vec<String> = files.iter().map(|f| f.display().to_string()).collect();
    let (status, detail) = match result {
        Ok(request) => ("ok", format!("{} {}", request.backend, request.url)),
        Err(e) => ("error", e.to_string()),
    };
    format!(
        "{status}\t{files}\t{detail}",
        files = names.join(","),
        detail = detail.replace('\n', "; "),
    )
}
