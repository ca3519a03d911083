use crate::ast::{SimpleCommand, Word};
use crate::config::{CdFailurePolicy, Config};
use crate::env::Environment;
use crate::error::{Result, ShellError};
use crate::redirect::{SavedStdio, apply_redirections};
use crate::status::ExecutionStatus;
use crate::word::{build_argv, resolve_fragments, resolve_word};
use std::path::PathBuf;

/// Commands executed inside the interpreter process, without forking.
///
/// A builtin receives the resolved argv as is, verb first. Parameters are never
/// interpreted as options.
pub(crate) trait BuiltinCommand {
    /// Names the command answers to.
    fn names() -> &'static [&'static str];

    /// Whether the command's redirections are applied (and undone) around it.
    fn redirects() -> bool {
        true
    }

    fn execute(argv: &[String], env: &mut Environment, config: &Config) -> Result<ExecutionStatus>;
}

/// Run `cmd` as a builtin if it is one; `None` means it is an external command.
pub fn dispatch(
    cmd: &SimpleCommand,
    env: &mut Environment,
    config: &Config,
) -> Option<Result<ExecutionStatus>> {
    let verb = resolve_word(&cmd.verb, env);
    if Exit::names().contains(&verb.as_str()) {
        return Some(run::<Exit>(cmd, env, config));
    }
    if Cd::names().contains(&verb.as_str()) {
        return Some(run::<Cd>(cmd, env, config));
    }
    if is_assignment(&cmd.verb) {
        return Some(Ok(assign(&cmd.verb, env)));
    }
    None
}

fn run<T: BuiltinCommand>(
    cmd: &SimpleCommand,
    env: &mut Environment,
    config: &Config,
) -> Result<ExecutionStatus> {
    // Restores the interpreter's stdio when dropped, on every path out of here.
    let _saved = if T::redirects() {
        let saved = SavedStdio::save()?;
        apply_redirections(cmd, env)?;
        Some(saved)
    } else {
        None
    };

    let argv = build_argv(cmd, env);
    T::execute(&argv, env, config)
}

/// `exit` / `quit`: leave the interpreter, whatever the parameters.
pub struct Exit;

impl BuiltinCommand for Exit {
    fn names() -> &'static [&'static str] {
        &["exit", "quit"]
    }

    fn redirects() -> bool {
        false
    }

    fn execute(_argv: &[String], _env: &mut Environment, _config: &Config) -> Result<ExecutionStatus> {
        Ok(ExecutionStatus::ShellExit)
    }
}

/// `cd [dir]`: change the working directory of the interpreter.
///
/// Only the first parameter counts; without one the target is `$HOME`.
pub struct Cd;

impl BuiltinCommand for Cd {
    fn names() -> &'static [&'static str] {
        &["cd"]
    }

    fn execute(argv: &[String], env: &mut Environment, config: &Config) -> Result<ExecutionStatus> {
        let target = match argv.get(1) {
            Some(dir) => PathBuf::from(dir),
            None => PathBuf::from(env.get_var("HOME").unwrap_or_default()),
        };

        match std::env::set_current_dir(&target) {
            Ok(()) => {
                tracing::debug!(dir = %target.display(), "changed directory");
                Ok(ExecutionStatus::Builtin(0))
            }
            Err(source) => match config.cd_failure {
                CdFailurePolicy::Abort => Err(ShellError::Cd {
                    path: target,
                    source,
                }),
                CdFailurePolicy::Report => {
                    eprintln!("cd: {}: {source}", target.display());
                    Ok(ExecutionStatus::Builtin(1))
                }
            },
        }
    }
}

/// `NAME=value`: the verb's second fragment is a literal `=`.
///
/// This is the only place that decides whether a leaf is an assignment.
pub fn is_assignment(verb: &Word) -> bool {
    matches!(verb.fragments().get(1), Some(f) if !f.expand && f.text == "=")
}

/// Store the value after the `=` under the name held by the verb's first fragment.
fn assign(verb: &Word, env: &mut Environment) -> ExecutionStatus {
    let fragments = verb.fragments();
    let name = &fragments[0].text;
    let value = resolve_fragments(&fragments[2..], env);

    if name.is_empty() || name.contains(['=', '\0']) || value.contains('\0') {
        eprintln!("error setenv({name}, {value})");
        return ExecutionStatus::Builtin(1);
    }

    tracing::debug!(%name, %value, "assignment");
    env.set_var(name.as_str(), value);
    ExecutionStatus::Builtin(0)
}
