use super::SectionParser;
use crate::request::RequestParts;
use crate::template::{Capture, Fatal, Section};

/// `[Headers]` or `[Query]`: every line kept in order, no dedup.
pub struct ListSection {
    section: Section,
}

impl ListSection {
    pub fn new(section: Section) -> Self {
        Self { section }
    }
}

impl SectionParser for ListSection {
    fn section(&self) -> Section {
        self.section
    }

    fn allows_empty(&self) -> bool {
        true
    }

    fn parse(&self, capture: &Capture, parts: &mut RequestParts) -> Result<(), Fatal> {
        let target = match self.section {
            Section::Query => &mut parts.query,
            _ => &mut parts.headers,
        };
        target.extend(capture.lines.iter().map(|l| l.text.clone()));
        Ok(())
    }
}
