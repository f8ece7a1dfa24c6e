//! Errors that abort a run instead of being collected as template fatals.

use std::io;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("cannot read template {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("no template files given")]
    NoTemplates,

    #[error("cannot start executable runtime: {0}")]
    Runtime(#[source] io::Error),

    #[error("cannot write body file: {0}")]
    BodyFile(#[source] io::Error),

    #[error("cannot serialize request: {0}")]
    Output(#[from] serde_json::Error),

    /// Every collected template fatal, already rendered.
    #[error("{0}")]
    Template(String),
}

impl Error {
    /// Whether this is an aggregate of template fatals rather than an I/O failure.
    pub fn is_template(&self) -> bool {
        matches!(self, Error::Template(_))
    }
}
