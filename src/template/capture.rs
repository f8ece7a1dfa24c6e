//! `[Section]` headers and the lines they capture.

use std::fmt;

use super::fatal::Fatal;
use crate::parse::Line;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Config,
    Host,
    Query,
    Headers,
    Method,
    Body,
    Backend,
    BackendOptions,
}

impl Section {
    pub const ALL: [Section; 8] = [
        Section::Config,
        Section::Host,
        Section::Query,
        Section::Headers,
        Section::Method,
        Section::Body,
        Section::Backend,
        Section::BackendOptions,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Section::Config => "Config",
            Section::Host => "Host",
            Section::Query => "Query",
            Section::Headers => "Headers",
            Section::Method => "Method",
            Section::Body => "Body",
            Section::Backend => "Backend",
            Section::BackendOptions => "BackendOptions",
        }
    }

    /// The section whose header is exactly `text` (case-sensitive).
    pub fn from_header(text: &str) -> Option<Section> {
        let name = text.strip_prefix('[')?.strip_suffix(']')?;
        Section::ALL.into_iter().find(|s| s.name() == name)
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.name())
    }
}

/// One captured body line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedLine {
    pub text: String,
    pub source: usize,
}

/// A section's header line and its body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capture {
    pub section: Section,
    /// Source index of the header.
    pub header: usize,
    pub lines: Vec<CapturedLine>,
}

/// Find `section` in `lines` and collect its body.
///
/// Capture runs from the header to the next line starting with `[`, known
/// section or not. Comment-only lines are skipped. With `trim`, lines are
/// trimmed and blank ones dropped; without it, lines are kept as written
/// and only trailing blank lines are dropped. A second header for the same
/// section is a fatal.
pub fn capture(section: Section, lines: &[Line], trim: bool) -> Result<Option<Capture>, Fatal> {
    let header = section.to_string();
    let mut found: Option<Capture> = None;
    let mut capturing = false;

    for line in lines {
        let content = line.content();
        let trimmed = content.trim();

        if trimmed.starts_with('[') {
            capturing = trimmed == header;
            if !capturing {
                continue;
            }
            if let Some(first) = &found {
                return Err(Fatal::at(
                    line.source,
                    format!(
                        "Found duplicate {header} section on lines {} and {}",
                        first.header + 1,
                        line.source + 1
                    ),
                ));
            }
            found = Some(Capture {
                section,
                header: line.source,
                lines: Vec::new(),
            });
            continue;
        }

        if !capturing {
            continue;
        }
        if trimmed.is_empty() && (trim || line.has_comment()) {
            continue;
        }
        if let Some(capture) = found.as_mut() {
            let text = if trim { trimmed.to_string() } else { content.clone() };
            capture.lines.push(CapturedLine {
                text,
                source: line.source,
            });
        }
    }

    if !trim && let Some(capture) = found.as_mut() {
        while capture
            .lines
            .last()
            .is_some_and(|l| l.text.trim().is_empty())
        {
            capture.lines.pop();
        }
    }

    Ok(found)
}

/// For each line, whether it sits in the body of a known section.
///
/// Header lines, lines before the first header, and lines under unknown
/// headers are not request-relevant.
pub fn request_regions(lines: &[Line]) -> Vec<bool> {
    let mut current: Option<Section> = None;
    lines
        .iter()
        .map(|line| {
            let content = line.content();
            let trimmed = content.trim();
            if trimmed.starts_with('[') {
                current = Section::from_header(trimmed);
                false
            } else {
                current.is_some()
            }
        })
        .collect()
}
