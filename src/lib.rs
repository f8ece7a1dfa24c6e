//! reqplate: turn sectioned request templates into an HTTP request description.
//!
//! A template is a plain text file split into `[Host]`, `[Method]`,
//! `[Headers]`, `[Query]`, `[Body]`, `[Backend]`, `[BackendOptions]` and
//! `[Config]` sections. Lines may carry `# comments`, `${VAR}` environment
//! variables and `$(command)` substitutions. Several templates given together
//! are merged left to right into one [`RequestDescriptor`].
//!
//! # Architecture
//!
//! - **[`parse`]**: Lexer for comments, variables and executables, and the per-line model.
//! - **[`subst`]**: Variable lookup with suggestions; concurrent execution of `$(...)`.
//! - **[`template`]**: One file through the pipeline, section capture, fatal rendering.
//! - **[`sections`]**: Per-section validation into [`request::RequestParts`].
//! - **[`request`]**: Merge, URL and query building, the body hand-off file.
//! - **[`config`]**: Runtime settings: embedded defaults + user overlay merge.
//! - **[`logging`]**: stderr diagnostics and a one-line-per-run log file.

/// Multi-file pipeline driver.
pub mod assemble;
/// Configuration types, loading, and overlay merge logic.
pub mod config;
/// Run-aborting error type.
pub mod error;
/// Logger setup and run records.
pub mod logging;
/// Template lexing: tokens, escapes, line model.
pub mod parse;
/// Request types, multi-file merge, query encoding.
pub mod request;
/// Section parsers and their registry.
pub mod sections;
/// Environment variable and command substitution.
pub mod subst;
/// Per-file pipeline state and section capture.
pub mod template;

pub use assemble::{AssembleOptions, assemble};
pub use error::Error;
pub use request::{Backend, RequestDescriptor};
pub use subst::{Environment, ProcessEnv, StaticEnv};
pub use template::TemplateSource;

/// Assemble templates against the process environment with default options.
///
/// For CLI usage with a configured deadline, call [`assemble`] directly.
pub fn assemble_files(sources: &[TemplateSource]) -> Result<RequestDescriptor, Error> {
    assemble(sources, &ProcessEnv, &AssembleOptions::default())
}
