use crate::config::Config;
use crate::env::Environment;
use crate::error::{Result, ShellError};
use crate::parser;
use crate::status::{ExecutionStatus, ExitCode};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

/// A minimal shell-like interpreter that evaluates command trees.
///
/// The interpreter owns the [`Environment`] seen by word expansion and by every
/// program it starts, plus the [`Config`] it was created with. Evaluation itself
/// lives in [`Interpreter::evaluate`].
///
/// Example
/// ```no_run
/// use minishell::{Config, Interpreter};
/// let mut sh = Interpreter::new(Config::default());
/// let status = sh.run_line("true && echo ok").unwrap();
/// assert!(status.unwrap().is_success());
/// ```
pub struct Interpreter {
    pub(crate) env: Environment,
    pub(crate) config: Config,
}

impl Interpreter {
    /// Create an interpreter seeded with the current process environment.
    pub fn new(config: Config) -> Self {
        Self::with_environment(Environment::new(), config)
    }

    pub fn with_environment(env: Environment, config: Config) -> Self {
        Self { env, config }
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    pub fn env_mut(&mut self) -> &mut Environment {
        &mut self.env
    }

    /// Parse and evaluate one line. Blank lines yield `Ok(None)`.
    ///
    /// The command tree is dropped before returning.
    pub fn run_line(&mut self, line: &str) -> Result<Option<ExecutionStatus>> {
        let Some(tree) = parser::parse_line(line)? else {
            return Ok(None);
        };
        tracing::debug!(?tree, "parsed line");
        self.evaluate(&tree).map(Some)
    }

    /// Read-evaluate loop.
    ///
    /// Stops on `exit`/`quit` or end of input and returns the exit code of the last
    /// command. Parse errors are reported and the loop goes on; any other error is
    /// fatal and returned to the caller.
    pub fn repl(&mut self) -> anyhow::Result<ExitCode> {
        let mut rl = DefaultEditor::new()?;
        let mut last = ExecutionStatus::Builtin(0);

        loop {
            match rl.readline(&self.config.prompt) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        rl.add_history_entry(line.as_str())?;
                    }
                    match self.run_line(&line) {
                        Ok(Some(ExecutionStatus::ShellExit)) => break,
                        Ok(Some(status)) => last = status,
                        Ok(None) => {}
                        Err(err @ ShellError::Parse(_)) => eprintln!("{err}"),
                        Err(err) => return Err(err.into()),
                    }
                }
                Err(ReadlineError::Interrupted) => continue,
                Err(ReadlineError::Eof) => break,
                Err(err) => return Err(err.into()),
            }
        }

        Ok(last.exit_code())
    }
}
