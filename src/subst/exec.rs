use std::process::Output;
use std::time::Duration;

use futures::future::join_all;
use log::debug;
use tokio::process::Command;
use tokio::time::Instant;

use crate::error::Error;
use crate::parse::Token;

/// One `$(...)` occurrence, ready to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// The literal `$(...)` text.
    pub expression: String,
    pub command: String,
    pub args: Vec<String>,
}

impl Invocation {
    /// Split an executable token's command text into program and arguments.
    pub fn from_token(token: &Token) -> Result<Self, String> {
        let words = shlex::split(&token.value)
            .ok_or_else(|| format!("Cannot split command line of {}", token.literal))?;
        let mut words = words.into_iter();
        let command = words
            .next()
            .ok_or_else(|| format!("Empty command in {}", token.literal))?;
        Ok(Self {
            expression: token.literal.clone(),
            command,
            args: words.collect(),
        })
    }
}

/// Outcome of one invocation: raw stdout, or the fatal message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecResult {
    pub expression: String,
    pub outcome: Result<String, String>,
}

/// Run every invocation concurrently under one shared deadline.
///
/// Results come back in the order of `invocations`; each task fills exactly
/// one slot. Only failure to start the runtime itself is an `Err`.
pub fn run_all(invocations: &[Invocation], timeout: Duration) -> Result<Vec<ExecResult>, Error> {
    if invocations.is_empty() {
        return Ok(Vec::new());
    }
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(Error::Runtime)?;

    debug!(
        "running {} executable expression(s), deadline {:?}",
        invocations.len(),
        timeout
    );
    Ok(runtime.block_on(async {
        let deadline = Instant::now() + timeout;
        join_all(
            invocations
                .iter()
                .map(|invocation| run_one(invocation, deadline, timeout)),
        )
        .await
    }))
}

async fn run_one(invocation: &Invocation, deadline: Instant, timeout: Duration) -> ExecResult {
    let mut command = Command::new(&invocation.command);
    command.args(&invocation.args).kill_on_drop(true);

    let outcome = match tokio::time::timeout_at(deadline, command.output()).await {
        Err(_) => Err(format!(
            "{} timed out after {} seconds",
            invocation.expression,
            timeout.as_secs_f64()
        )),
        Ok(Err(e)) => Err(format!("Error executing {}: {e}", invocation.expression)),
        Ok(Ok(output)) => judge(invocation, output),
    };
    debug!("{} -> {}", invocation.expression, if outcome.is_ok() { "ok" } else { "failed" });

    ExecResult {
        expression: invocation.expression.clone(),
        outcome,
    }
}

/// Stdout is used verbatim, so it must be non-empty UTF-8. Captured output
/// in a failure message is only diagnostic and converted lossily.
fn judge(invocation: &Invocation, output: Output) -> Result<String, String> {
    if !output.status.success() {
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        let captured: Vec<&str> = [stdout.trim(), stderr.trim()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect();
        let mut message = format!(
            "Error executing {}: {}",
            invocation.expression, output.status
        );
        if !captured.is_empty() {
            message.push_str(":\n");
            message.push_str(&captured.join("\n"));
        }
        return Err(message);
    }

    if output.stdout.is_empty() {
        return Err(format!("{} produced no stdout output", invocation.expression));
    }
    String::from_utf8(output.stdout)
        .map_err(|_| format!("{} produced non-UTF-8 output", invocation.expression))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::TokenKind;

    fn invocation(command: &str) -> Invocation {
        let token = Token::new(TokenKind::Executable, command, format!("$({command})"));
        Invocation::from_token(&token).unwrap()
    }

    #[test]
    fn from_token_splits_words() {
        let inv = invocation("printf '%s x' \"a b\"");
        assert_eq!(inv.command, "printf");
        assert_eq!(inv.args, vec!["%s x", "a b"]);
        assert_eq!(inv.expression, "$(printf '%s x' \"a b\")");
    }

    #[test]
    fn from_token_rejects_empty_command() {
        let token = Token::new(TokenKind::Executable, "  ", "$(  )");
        assert_eq!(
            Invocation::from_token(&token),
            Err("Empty command in $(  )".into())
        );
    }

    #[test]
    fn no_invocations_needs_no_runtime() {
        assert!(run_all(&[], Duration::from_secs(1)).unwrap().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn stdout_is_kept_raw() {
        let results = run_all(&[invocation("echo hello")], Duration::from_secs(5)).unwrap();
        assert_eq!(results[0].outcome, Ok("hello\n".into()));
        assert_eq!(results[0].expression, "$(echo hello)");
    }

    #[cfg(unix)]
    #[test]
    fn results_keep_invocation_order() {
        let results = run_all(
            &[
                invocation("sh -c 'sleep 0.3; printf first'"),
                invocation("printf second"),
            ],
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(results[0].outcome, Ok("first".into()));
        assert_eq!(results[1].outcome, Ok("second".into()));
    }

    #[cfg(unix)]
    #[test]
    fn non_zero_exit_includes_output() {
        let results = run_all(
            &[invocation("sh -c 'echo out; echo err >&2; exit 3'")],
            Duration::from_secs(5),
        )
        .unwrap();
        let message = results[0].outcome.clone().unwrap_err();
        assert!(message.starts_with("Error executing $(sh -c"), "{message}");
        assert!(message.contains("3"), "{message}");
        assert!(message.ends_with(":\nout\nerr"), "{message}");
    }

    #[cfg(unix)]
    #[test]
    fn empty_stdout_is_fatal() {
        let results = run_all(&[invocation("true")], Duration::from_secs(5)).unwrap();
        assert_eq!(
            results[0].outcome,
            Err("$(true) produced no stdout output".into())
        );
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_stdout_is_fatal() {
        let results = run_all(&[invocation(r"printf '\377ok'")], Duration::from_secs(5)).unwrap();
        assert_eq!(
            results[0].outcome,
            Err(r"$(printf '\377ok') produced non-UTF-8 output".into())
        );
    }

    #[test]
    fn missing_program_is_fatal() {
        let results = run_all(
            &[invocation("reqplate-no-such-program-here")],
            Duration::from_secs(5),
        )
        .unwrap();
        let message = results[0].outcome.clone().unwrap_err();
        assert!(
            message.starts_with("Error executing $(reqplate-no-such-program-here)"),
            "{message}"
        );
    }

    #[cfg(unix)]
    #[test]
    fn slow_invocation_times_out() {
        let results = run_all(
            &[invocation("sleep 5"), invocation("echo fast")],
            Duration::from_millis(500),
        )
        .unwrap();
        let message = results[0].outcome.clone().unwrap_err();
        assert!(message.contains("timed out"), "{message}");
        assert_eq!(results[1].outcome, Ok("fast\n".into()));
    }
}
