use super::{SectionParser, several_lines};
use crate::request::{Backend, RequestParts};
use crate::template::{Capture, Fatal, Section};

pub struct BackendSection;

impl SectionParser for BackendSection {
    fn section(&self) -> Section {
        Section::Backend
    }

    fn parse(&self, capture: &Capture, parts: &mut RequestParts) -> Result<(), Fatal> {
        if let Some(fatal) = several_lines(capture) {
            return Err(fatal);
        }
        let Some(line) = capture.lines.first() else {
            return Ok(());
        };
        let backend = line
            .text
            .parse::<Backend>()
            .map_err(|message| Fatal::at(line.source, message))?;
        parts.backend = Some(backend);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::request::Backend;
    use crate::sections::SectionRegistry;
    use crate::sections::tests::lines;

    #[test]
    fn known_backend() {
        let parts = SectionRegistry::new()
            .parse(&lines("[Backend]\nhttpie"))
            .unwrap();
        assert_eq!(parts.backend, Some(Backend::Httpie));
    }

    #[test]
    fn unknown_backend() {
        let fatals = SectionRegistry::new()
            .parse(&lines("[Backend]\naria2c"))
            .unwrap_err();
        assert_eq!(fatals[0].message, "Unknown backend: aria2c");
        assert_eq!(fatals[0].line, Some(1));
    }

    #[test]
    fn several_backends() {
        let fatals = SectionRegistry::new()
            .parse(&lines("[Backend]\ncurl\nwget"))
            .unwrap_err();
        assert_eq!(fatals[0].message, "Found several lines under [Backend]");
    }
}
