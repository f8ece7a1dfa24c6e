use super::SectionParser;
use crate::request::RequestParts;
use crate::template::{Capture, Fatal, Section};

/// `[Config]`: `timeout=<seconds>` and `querydelim=<string>`, each at most once.
pub struct ConfigSection;

impl SectionParser for ConfigSection {
    fn section(&self) -> Section {
        Section::Config
    }

    fn allows_empty(&self) -> bool {
        true
    }

    fn parse(&self, capture: &Capture, parts: &mut RequestParts) -> Result<(), Fatal> {
        let config = &mut parts.config;

        for line in &capture.lines {
            let at = |message: String| Fatal::at(line.source, message);
            let (key, value) = line.text.split_once('=').ok_or_else(|| {
                at(format!("Malformed {} line, expected key=value: {}", capture.section, line.text))
            })?;
            let (key, value) = (key.trim(), value.trim());

            match key {
                "timeout" => {
                    if config.timeout.is_some() {
                        return Err(at("Found duplicate timeout in [Config]".into()));
                    }
                    let seconds = value
                        .parse::<u64>()
                        .ok()
                        .filter(|&s| s > 0)
                        .ok_or_else(|| at(format!("Invalid timeout value: {value}")))?;
                    config.timeout = Some(seconds);
                }
                "querydelim" => {
                    if config.query_delimiter.is_some() {
                        return Err(at("Found duplicate querydelim in [Config]".into()));
                    }
                    config.query_delimiter = Some(value.to_string());
                }
                other => return Err(at(format!("Unknown [Config] option: {other}"))),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::request::TemplateConfig;
    use crate::sections::SectionRegistry;
    use crate::sections::tests::lines;

    fn parse(text: &str) -> Result<TemplateConfig, String> {
        SectionRegistry::new()
            .parse(&lines(text))
            .map(|parts| parts.config)
            .map_err(|fatals| fatals[0].message.clone())
    }

    #[test]
    fn timeout_and_delimiter() {
        let config = parse("[Config]\ntimeout = 30\nquerydelim=;").unwrap();
        assert_eq!(config.timeout, Some(30));
        assert_eq!(config.query_delimiter.as_deref(), Some(";"));
    }

    #[test]
    fn empty_delimiter_is_allowed() {
        let config = parse("[Config]\nquerydelim=").unwrap();
        assert_eq!(config.query_delimiter.as_deref(), Some(""));
    }

    #[test]
    fn bad_timeouts() {
        assert_eq!(parse("[Config]\ntimeout=0"), Err("Invalid timeout value: 0".into()));
        assert_eq!(parse("[Config]\ntimeout=-2"), Err("Invalid timeout value: -2".into()));
        assert_eq!(parse("[Config]\ntimeout=ten"), Err("Invalid timeout value: ten".into()));
    }

    #[test]
    fn timeout_set_twice() {
        assert_eq!(
            parse("[Config]\ntimeout=1\ntimeout=2"),
            Err("Found duplicate timeout in [Config]".into())
        );
    }

    #[test]
    fn unknown_key_and_malformed_line() {
        assert_eq!(
            parse("[Config]\nretries=3"),
            Err("Unknown [Config] option: retries".into())
        );
        assert_eq!(
            parse("[Config]\ntimeout"),
            Err("Malformed [Config] line, expected key=value: timeout".into())
        );
    }
}
