use super::{SectionParser, several_lines};
use crate::request::RequestParts;
use crate::template::{Capture, Fatal, Section};

pub struct MethodSection;

impl SectionParser for MethodSection {
    fn section(&self) -> Section {
        Section::Method
    }

    fn parse(&self, capture: &Capture, parts: &mut RequestParts) -> Result<(), Fatal> {
        if let Some(fatal) = several_lines(capture) {
            return Err(fatal);
        }
        parts.method = capture.lines.first().map(|l| l.text.clone());
        Ok(())
    }
}
