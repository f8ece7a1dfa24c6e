//! Section parsers: per-section validation writing into [`RequestParts`].
//!
//! Each section has its own `SectionParser` implementation. The registry
//! captures every section from a file's lines and hands each non-empty
//! capture to its parser.

/// `[Backend]`: exactly one known backend name.
pub mod backend;
/// `[BackendOptions]`: shell-split argument lines.
pub mod backend_options;
/// `[Body]`: untrimmed payload lines.
pub mod body;
/// `[Config]`: `key=value` settings.
pub mod config;
/// `[Host]`: host string, concatenated across lines.
pub mod host;
/// `[Headers]` and `[Query]`: ordered verbatim lines.
pub mod lists;
/// `[Method]`: at most one line.
pub mod method;

use crate::parse::Line;
use crate::request::RequestParts;
use crate::template::{Capture, Fatal, Section, capture};

/// Trait for section parsers.
///
/// A parser only sees a capture with at least one line unless
/// `allows_empty` is true.
pub trait SectionParser: Send + Sync {
    fn section(&self) -> Section;

    /// Whether captured lines are trimmed (and blank ones dropped).
    fn trim(&self) -> bool {
        true
    }

    /// Whether a header with no lines under it is acceptable.
    fn allows_empty(&self) -> bool {
        false
    }

    fn parse(&self, capture: &Capture, parts: &mut RequestParts) -> Result<(), Fatal>;
}

/// Every section parser, run in a fixed order.
pub struct SectionRegistry {
    parsers: Vec<Box<dyn SectionParser>>,
}

impl Default for SectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SectionRegistry {
    pub fn new() -> Self {
        Self {
            parsers: vec![
                Box::new(config::ConfigSection),
                Box::new(host::HostSection),
                Box::new(lists::ListSection::new(Section::Query)),
                Box::new(lists::ListSection::new(Section::Headers)),
                Box::new(method::MethodSection),
                Box::new(body::BodySection),
                Box::new(backend::BackendSection),
                Box::new(backend_options::BackendOptionsSection),
            ],
        }
    }

    /// Parse all sections of one file, collecting every section's fatal.
    pub fn parse(&self, lines: &[Line]) -> Result<RequestParts, Vec<Fatal>> {
        let mut parts = RequestParts::default();
        let mut fatals = Vec::new();

        for parser in &self.parsers {
            let section = parser.section();
            let captured = match capture(section, lines, parser.trim()) {
                Ok(Some(captured)) => captured,
                Ok(None) => continue,
                Err(fatal) => {
                    fatals.push(fatal);
                    continue;
                }
            };
            if captured.lines.is_empty() {
                if !parser.allows_empty() {
                    fatals.push(Fatal::at(captured.header, format!("Empty {section} line")));
                }
                continue;
            }
            if let Err(fatal) = parser.parse(&captured, &mut parts) {
                fatals.push(fatal);
            }
        }

        if fatals.is_empty() {
            Ok(parts)
        } else {
            Err(fatals)
        }
    }
}

/// Fatal for a single-value section with more than one line.
fn several_lines(capture: &Capture) -> Option<Fatal> {
    let extra = capture.lines.get(1)?;
    Some(Fatal::at(
        extra.source,
        format!("Found several lines under {}", capture.section),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::SourceLine;
    use crate::request::Backend;

    pub(crate) fn lines(text: &str) -> Vec<Line> {
        text.lines()
            .enumerate()
            .map(|(index, text)| {
                let source = SourceLine {
                    index,
                    text: text.to_string(),
                };
                Line::lex(&source).0.flatten()
            })
            .collect()
    }

    #[test]
    fn full_template() {
        let parts = SectionRegistry::new()
            .parse(&lines(
                "[Host]\nhttps://example.com\n[Method]\nPOST\n[Headers]\nA: 1\nB: 2\n\
                 [Query]\nq=1\n[Body]\n{}\n[Backend]\ncurl\n[BackendOptions]\n-s --compressed\n\
                 [Config]\ntimeout=3",
            ))
            .unwrap();
        assert_eq!(parts.host.as_deref(), Some("https://example.com"));
        assert_eq!(parts.method.as_deref(), Some("POST"));
        assert_eq!(parts.headers, vec!["A: 1", "B: 2"]);
        assert_eq!(parts.query, vec!["q=1"]);
        assert_eq!(parts.body, Some(vec!["{}".to_string()]));
        assert_eq!(parts.backend, Some(Backend::Curl));
        assert_eq!(parts.backend_options, vec![vec!["-s", "--compressed"]]);
        assert_eq!(parts.config.timeout, Some(3));
    }

    #[test]
    fn missing_sections_are_not_fatal_per_file() {
        let parts = SectionRegistry::new().parse(&lines("[Headers]\nA: 1")).unwrap();
        assert_eq!(parts.host, None);
        assert_eq!(parts.backend, None);
    }

    #[test]
    fn empty_required_sections() {
        let fatals = SectionRegistry::new()
            .parse(&lines("[Host]\n[Method]\n# nothing\n[Backend]"))
            .unwrap_err();
        let messages: Vec<&str> = fatals.iter().map(|f| f.message.as_str()).collect();
        assert_eq!(
            messages,
            vec!["Empty [Host] line", "Empty [Method] line", "Empty [Backend] line"]
        );
        assert_eq!(fatals[0].line, Some(0));
    }

    #[test]
    fn empty_optional_sections_are_fine() {
        let parts = SectionRegistry::new()
            .parse(&lines("[Headers]\n[Query]\n[Body]\n[BackendOptions]\n[Config]"))
            .unwrap();
        assert_eq!(parts, RequestParts::default());
    }

    #[test]
    fn fatals_from_several_sections_are_collected() {
        let fatals = SectionRegistry::new()
            .parse(&lines("[Host]\na\n[Host]\nb\n[Backend]\nlynx"))
            .unwrap_err();
        let messages: Vec<&str> = fatals.iter().map(|f| f.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "Found duplicate [Host] section on lines 1 and 3",
                "Unknown backend: lynx"
            ]
        );
    }
}
