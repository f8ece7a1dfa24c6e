//! Per-file pipeline: lex, resolve variables, run executables, parse sections.
//!
//! Each stage only runs while the file has no fatals, so a file that failed
//! to resolve a variable never spawns a subprocess.

/// Section headers and capture regions.
pub mod capture;
/// Fatal markers and their rendering.
pub mod fatal;

pub use capture::{Capture, CapturedLine, Section, capture, request_regions};
pub use fatal::{Fatal, render_file, render_global};

use std::path::Path;

use log::debug;

use crate::error::Error;
use crate::parse::{Line, SourceLine, TokenKind, expand};
use crate::request::RequestParts;
use crate::sections::SectionRegistry;
use crate::subst::{Environment, ExecResult, Invocation, lookup_variable};

/// Raw text of one template and the name used in error output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSource {
    pub name: String,
    pub text: String,
}

impl TemplateSource {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }

    pub fn read(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let name = path.display().to_string();
        let text = std::fs::read_to_string(path).map_err(|source| Error::Read {
            path: name.clone(),
            source,
        })?;
        Ok(Self { name, text })
    }
}

/// One template file moving through the pipeline.
#[derive(Debug)]
pub struct SectionedTemplate {
    name: String,
    source: Vec<String>,
    lines: Vec<Line>,
    /// Request-relevant mask over `lines`, set by executable discovery.
    relevant: Vec<bool>,
    fatals: Vec<Fatal>,
}

impl SectionedTemplate {
    /// Lex every line of `source`, collecting all lexer fatals.
    pub fn lex(source: &TemplateSource) -> Self {
        let raw: Vec<String> = source.text.lines().map(String::from).collect();
        let mut lines = Vec::with_capacity(raw.len());
        let mut fatals = Vec::new();

        for (index, text) in raw.iter().enumerate() {
            let (line, fatal) = Line::lex(&SourceLine {
                index,
                text: text.clone(),
            });
            if let Some(message) = fatal {
                fatals.push(Fatal::at(index, message));
            }
            lines.push(line);
        }
        debug!("{}: lexed {} line(s)", source.name, lines.len());

        Self {
            name: source.name.clone(),
            source: raw,
            lines,
            relevant: Vec::new(),
            fatals,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn fatals(&self) -> &[Fatal] {
        &self.fatals
    }

    pub fn has_fatals(&self) -> bool {
        !self.fatals.is_empty()
    }

    /// All fatals of this file, rendered with their source context.
    pub fn render_fatals(&self) -> String {
        render_file(&self.name, &self.fatals, &self.source)
    }

    /// Replace every `${NAME}` from `env`. Failed lookups keep their literal
    /// text and add a fatal; every line is still visited.
    pub fn resolve_variables(&mut self, env: &dyn Environment) {
        if self.has_fatals() {
            return;
        }
        let lines = std::mem::take(&mut self.lines);
        let mut out = Vec::with_capacity(lines.len());

        for line in lines {
            let source = line.source;
            let fatals = &mut self.fatals;
            let expansion = expand(line, TokenKind::EnvVar, |token| {
                match lookup_variable(&token.value, env) {
                    Ok(value) => Some(value),
                    Err(message) => {
                        fatals.push(Fatal::at(source, message));
                        None
                    }
                }
            });
            out.extend(expansion.lines);
            self.fatals
                .extend(expansion.fatals.into_iter().map(|m| Fatal::at(source, m)));
        }

        self.lines = out;
        debug!("{}: variables resolved, {} fatal(s)", self.name, self.fatals.len());
    }

    /// Collect the `$(...)` expressions inside known sections, in source order.
    ///
    /// Returns nothing if the file already has fatals or an expression cannot
    /// be split into a command line.
    pub fn discover_executables(&mut self) -> Vec<Invocation> {
        if self.has_fatals() {
            return Vec::new();
        }
        self.relevant = request_regions(&self.lines);

        let mut found = Vec::new();
        for (line, relevant) in self.lines.iter().zip(&self.relevant) {
            if !relevant {
                continue;
            }
            for token in line.pending(TokenKind::Executable) {
                match Invocation::from_token(token) {
                    Ok(invocation) => found.push(invocation),
                    Err(message) => self.fatals.push(Fatal::at(line.source, message)),
                }
            }
        }

        if self.has_fatals() {
            return Vec::new();
        }
        found
    }

    /// Write executable results back in source order, one result per
    /// discovered expression, then flatten every line.
    pub fn apply_executables(&mut self, results: Vec<ExecResult>) {
        if self.has_fatals() {
            return;
        }
        let mut results = results.into_iter();
        let lines = std::mem::take(&mut self.lines);
        let relevant = std::mem::take(&mut self.relevant);
        let mut out = Vec::with_capacity(lines.len());

        for (i, line) in lines.into_iter().enumerate() {
            if !relevant.get(i).copied().unwrap_or(false) {
                out.push(line);
                continue;
            }
            let source = line.source;
            let fatals = &mut self.fatals;
            let expansion = expand(line, TokenKind::Executable, |_| {
                match results.next()?.outcome {
                    Ok(output) => Some(output),
                    Err(message) => {
                        fatals.push(Fatal::at(source, message));
                        None
                    }
                }
            });
            // Folded into a comment: their results are dropped unused.
            results.by_ref().take(expansion.swallowed).for_each(drop);
            out.extend(expansion.lines);
            self.fatals
                .extend(expansion.fatals.into_iter().map(|m| Fatal::at(source, m)));
        }

        self.lines = out.into_iter().map(Line::flatten).collect();
    }

    /// Run every section parser over the substituted lines.
    pub fn parse_sections(&mut self, registry: &SectionRegistry) -> Option<RequestParts> {
        if self.has_fatals() {
            return None;
        }
        match registry.parse(&self.lines) {
            Ok(parts) => Some(parts),
            Err(fatals) => {
                self.fatals.extend(fatals);
                None
            }
        }
    }
}
