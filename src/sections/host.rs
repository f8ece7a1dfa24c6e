use super::SectionParser;
use crate::request::RequestParts;
use crate::template::{Capture, Fatal, Section};

/// `[Host]` lines are concatenated; the result is checked as a URL after merge.
pub struct HostSection;

impl SectionParser for HostSection {
    fn section(&self) -> Section {
        Section::Host
    }

    fn parse(&self, capture: &Capture, parts: &mut RequestParts) -> Result<(), Fatal> {
        let host: String = capture.lines.iter().map(|l| l.text.as_str()).collect();
        parts.host = Some(host);
        Ok(())
    }
}
