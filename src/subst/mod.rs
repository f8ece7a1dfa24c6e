//! Substitution passes: `${VAR}` from the environment, then `$(cmd)` output.

/// Environment variable resolution and name suggestions.
pub mod env;
/// Discovery and concurrent execution of `$(...)` expressions.
pub mod exec;

pub use env::{lookup_variable, suggestions};
pub use exec::{ExecResult, Invocation, run_all};

/// Read-only view of the variables substitution may use.
pub trait Environment {
    /// Value of `name`, if set.
    fn lookup(&self, name: &str) -> Option<String>;
    /// Every variable, in iteration order.
    fn entries(&self) -> Vec<(String, String)>;
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl Environment for ProcessEnv {
    fn lookup(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }

    fn entries(&self) -> Vec<(String, String)> {
        std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect()
    }
}

/// A fixed set of variables, iterated in insertion order.
#[derive(Debug, Clone, Default)]
pub struct StaticEnv {
    vars: Vec<(String, String)>,
}

impl StaticEnv {
    pub fn new<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: vars
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl Environment for StaticEnv {
    fn lookup(&self, name: &str) -> Option<String> {
        self.vars
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.clone())
    }

    fn entries(&self) -> Vec<(String, String)> {
        self.vars.clone()
    }
}
