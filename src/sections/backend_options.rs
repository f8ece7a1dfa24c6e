use super::SectionParser;
use crate::request::RequestParts;
use crate::template::{Capture, Fatal, Section};

/// Split one option line into arguments using POSIX shell word rules.
pub fn split_args(line: &str) -> Option<Vec<String>> {
    shlex::split(line)
}

/// `[BackendOptions]`: each line becomes one argument vector.
pub struct BackendOptionsSection;

impl SectionParser for BackendOptionsSection {
    fn section(&self) -> Section {
        Section::BackendOptions
    }

    fn allows_empty(&self) -> bool {
        true
    }

    fn parse(&self, capture: &Capture, parts: &mut RequestParts) -> Result<(), Fatal> {
        for line in &capture.lines {
            let args = split_args(&line.text).ok_or_else(|| {
                Fatal::at(
                    line.source,
                    format!("Cannot split {} line into arguments: {}", capture.section, line.text),
                )
            })?;
            parts.backend_options.push(args);
        }
        Ok(())
    }
}
