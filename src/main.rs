//! reqplate: resolve request templates into a JSON request description.
//!
//! Reads one or more template files (or file names from stdin), merges them
//! left to right, and prints the resolved request as JSON on stdout. The
//! body, if any, is written to a temporary file whose path is included.

use std::io::{BufRead, IsTerminal};
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use reqplate::config::Config;
use reqplate::{AssembleOptions, Error, ProcessEnv, RequestDescriptor, TemplateSource, assemble};

#[derive(Parser, Debug)]
#[command(name = "reqplate", version, about = "Resolve request templates into an HTTP request")]
struct Cli {
    /// Template files, merged left to right
    files: Vec<PathBuf>,

    /// Shared deadline for all `$(...)` substitutions, in seconds
    #[arg(long, value_name = "SECS")]
    exec_timeout: Option<u64>,

    /// Keep the body file after printing its path
    #[arg(long)]
    keep_body: bool,

    /// Debug output on stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    let config = Config::load();
    reqplate::logging::init(&config.settings, cli.verbose);

    let files = if cli.files.is_empty() && !std::io::stdin().is_terminal() {
        std::io::stdin()
            .lock()
            .lines()
            .map_while(Result::ok)
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
            .map(PathBuf::from)
            .collect()
    } else {
        cli.files
    };

    let options = AssembleOptions {
        exec_timeout: cli
            .exec_timeout
            .filter(|&s| s > 0)
            .map(Duration::from_secs)
            .unwrap_or_else(|| config.settings.exec_timeout()),
    };
    let keep = cli.keep_body || config.settings.keep_body_file;

    let result = read_all(&files).and_then(|sources| assemble(&sources, &ProcessEnv, &options));
    reqplate::logging::log_run(&files, &result);

    if let Err(e) = result.and_then(|request| print(&request, keep)) {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

fn read_all(files: &[PathBuf]) -> Result<Vec<TemplateSource>, Error> {
    files.iter().map(TemplateSource::read).collect()
}

fn print(request: &RequestDescriptor, keep: bool) -> Result<(), Error> {
    let body_file = request.write_body()?;
    let output = serde_json::json!({
        "request": request,
        "body_file": body_file.as_ref().map(|f| f.path().display().to_string()),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    if let Some(file) = body_file {
        file.release(keep);
    }
    Ok(())
}
