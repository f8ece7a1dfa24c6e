//! Request accumulator, the merged request descriptor, and its hand-off helpers.

/// Temporary file holding the request body.
pub mod body_file;
/// Cross-file merge and final validation.
pub mod merge;
/// Query string assembly and percent-encoding.
pub mod query;

pub use body_file::BodyFile;
pub use merge::merge;

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use url::Url;

use crate::error::Error;

/// The program that performs the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    Curl,
    Httpie,
    Wget,
}

impl Backend {
    pub fn as_str(self) -> &'static str {
        match self {
            Backend::Curl => "curl",
            Backend::Httpie => "httpie",
            Backend::Wget => "wget",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "curl" => Ok(Backend::Curl),
            "httpie" => Ok(Backend::Httpie),
            "wget" => Ok(Backend::Wget),
            other => Err(format!("Unknown backend: {other}")),
        }
    }
}

/// Values set by a `[Config]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateConfig {
    /// Request timeout in seconds for the backend.
    pub timeout: Option<u64>,
    pub query_delimiter: Option<String>,
}

/// What one template file contributes to the request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestParts {
    pub host: Option<String>,
    pub body: Option<Vec<String>>,
    pub method: Option<String>,
    pub headers: Vec<String>,
    pub query: Vec<String>,
    pub backend: Option<Backend>,
    /// One argument vector per `[BackendOptions]` line.
    pub backend_options: Vec<Vec<String>>,
    pub config: TemplateConfig,
}

/// The merged, validated request handed to a backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestDescriptor {
    /// `[Host]` with the assembled query string applied.
    pub url: Url,
    pub method: Option<String>,
    pub headers: Vec<String>,
    pub query: Vec<String>,
    pub body: Option<Vec<String>>,
    pub backend: Backend,
    pub backend_options: Vec<Vec<String>>,
    pub timeout: Option<u64>,
    pub query_delimiter: Option<String>,
}

impl RequestDescriptor {
    /// Body lines joined with `\n`.
    pub fn body_text(&self) -> Option<String> {
        self.body.as_ref().map(|lines| lines.join("\n"))
    }

    /// Write the body to a temporary file, if there is a body.
    pub fn write_body(&self) -> Result<Option<BodyFile>, Error> {
        self.body_text().as_deref().map(BodyFile::create).transpose()
    }

    /// Backend options flattened into one argument list, in order.
    pub fn backend_args(&self) -> impl Iterator<Item = &str> {
        self.backend_options.iter().flatten().map(String::as_str)
    }
}
