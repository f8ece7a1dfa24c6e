use super::SectionParser;
use crate::request::RequestParts;
use crate::template::{Capture, Fatal, Section};

/// `[Body]` keeps its lines as written; whitespace is part of the payload.
pub struct BodySection;

impl SectionParser for BodySection {
    fn section(&self) -> Section {
        Section::Body
    }

    fn trim(&self) -> bool {
        false
    }

    fn allows_empty(&self) -> bool {
        true
    }

    fn parse(&self, capture: &Capture, parts: &mut RequestParts) -> Result<(), Fatal> {
        parts.body = Some(capture.lines.iter().map(|l| l.text.clone()).collect());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::sections::SectionRegistry;
    use crate::sections::tests::lines;

    #[test]
    fn body_keeps_indentation() {
        let parts = SectionRegistry::new()
            .parse(&lines("[Body]\n{\n  \"name\": \"x\"\n}\n\n[Backend]\ncurl"))
            .unwrap();
        assert_eq!(
            parts.body,
            Some(vec!["{".into(), "  \"name\": \"x\"".into(), "}".into()])
        );
    }

    #[test]
    fn empty_body_is_unset() {
        let parts = SectionRegistry::new().parse(&lines("[Body]\n\n")).unwrap();
        assert_eq!(parts.body, None);
    }
}
