//! Multi-file driver: run every template through the pipeline and merge.

use std::time::Duration;

use log::{debug, info};

use crate::error::Error;
use crate::request::{RequestDescriptor, merge};
use crate::sections::SectionRegistry;
use crate::subst::{Environment, Invocation, run_all};
use crate::template::{SectionedTemplate, TemplateSource, render_global};

/// Default shared deadline for `$(...)` substitutions.
pub const DEFAULT_EXEC_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembleOptions {
    /// One deadline shared by every `$(...)` of the run.
    pub exec_timeout: Duration,
}

impl Default for AssembleOptions {
    fn default() -> Self {
        Self {
            exec_timeout: DEFAULT_EXEC_TIMEOUT,
        }
    }
}

/// Resolve `sources`, left to right, into one request.
///
/// Template fatals from all files come back together as
/// [`Error::Template`]: per-file groups separated by blank lines, or the
/// post-merge fatals one per line. Merge only runs once every file is clean.
pub fn assemble(
    sources: &[TemplateSource],
    env: &dyn Environment,
    options: &AssembleOptions,
) -> Result<RequestDescriptor, Error> {
    if sources.is_empty() {
        return Err(Error::NoTemplates);
    }

    let mut templates: Vec<SectionedTemplate> =
        sources.iter().map(SectionedTemplate::lex).collect();

    for template in &mut templates {
        template.resolve_variables(env);
    }

    let discovered: Vec<Vec<Invocation>> = templates
        .iter_mut()
        .map(SectionedTemplate::discover_executables)
        .collect();
    let all: Vec<Invocation> = discovered.iter().flatten().cloned().collect();
    let mut results = run_all(&all, options.exec_timeout)?.into_iter();
    for (template, found) in templates.iter_mut().zip(&discovered) {
        let mine = results.by_ref().take(found.len()).collect();
        template.apply_executables(mine);
    }

    let registry = SectionRegistry::new();
    let mut parts = Vec::with_capacity(templates.len());
    for template in &mut templates {
        if let Some(p) = template.parse_sections(&registry) {
            parts.push(p);
        }
    }

    let failed: Vec<String> = templates
        .iter()
        .filter(|t| t.has_fatals())
        .map(SectionedTemplate::render_fatals)
        .collect();
    if !failed.is_empty() {
        info!("{} of {} template(s) failed", failed.len(), templates.len());
        return Err(Error::Template(failed.join("\n\n")));
    }

    let request = merge(&parts).map_err(|fatals| Error::Template(render_global(&fatals)))?;
    debug!("assembled request for {}", request.url);
    Ok(request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::Backend;
    use crate::subst::StaticEnv;

    fn source(name: &str, text: &str) -> TemplateSource {
        TemplateSource::new(name, text)
    }

    fn run(sources: &[TemplateSource], env: &StaticEnv) -> Result<RequestDescriptor, Error> {
        assemble(sources, env, &AssembleOptions::default())
    }

    #[test]
    fn no_sources() {
        assert!(matches!(
            run(&[], &StaticEnv::default()),
            Err(Error::NoTemplates)
        ));
    }

    #[test]
    fn single_file() {
        let request = run(
            &[source(
                "a.req",
                "[Host]\nhttps://${API}/users\n[Method]\nGET\n[Backend]\ncurl",
            )],
            &StaticEnv::new([("API", "api.example.com")]),
        )
        .unwrap();
        assert_eq!(request.url.as_str(), "https://api.example.com/users");
        assert_eq!(request.method.as_deref(), Some("GET"));
        assert_eq!(request.backend, Backend::Curl);
    }

    #[test]
    fn per_file_fatals_are_grouped() {
        let err = run(
            &[
                source("a.req", "[Host]\n${MISSING}"),
                source("b.req", "[Backend]\nlynx"),
            ],
            &StaticEnv::default(),
        )
        .unwrap_err();
        let Error::Template(text) = err else {
            panic!("expected template error");
        };
        assert_eq!(
            text,
            "Fatal errors in a.req:\nCannot find value for variable MISSING on line 2:\n  1 | [Host]\n> 2 | ${MISSING}\n\n\
             Fatal errors in b.req:\nUnknown backend: lynx on line 2:\n  1 | [Backend]\n> 2 | lynx"
        );
    }

    #[test]
    fn merge_fatals_are_position_less() {
        let err = run(&[source("a.req", "[Method]\nGET")], &StaticEnv::default()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Fatal error No mandatory [Host] section found\nFatal error No mandatory [Backend] section found"
        );
    }

    #[test]
    fn variable_fatal_prevents_execution() {
        let err = run(
            &[source(
                "a.req",
                "[Host]\n${MISSING}\n[Headers]\nX: $(reqplate-no-such-program-here)",
            )],
            &StaticEnv::default(),
        )
        .unwrap_err();
        let text = err.to_string();
        assert!(text.contains("MISSING"), "{text}");
        assert!(!text.contains("Error executing"), "{text}");
    }
}
