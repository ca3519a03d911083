//! Error types for the execution engine.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, ShellError>;

/// Which standard stream a redirection targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Input,
    Output,
    Error,
}

impl std::fmt::Display for Stream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Stream::Input => "input",
            Stream::Output => "out",
            Stream::Error => "err",
        })
    }
}

/// Failures raised while evaluating a command tree.
///
/// Every variant except [`ShellError::NulByte`] and [`ShellError::Parse`] is fatal to the
/// process that raised it: a forked child exits with status 1, the interpreter process
/// hands the error to its driver loop, which ends the session.
#[derive(Error, Debug)]
pub enum ShellError {
    /// A redirection target could not be opened.
    #[error("could not open {stream} file {path}: {source}")]
    Redirect {
        stream: Stream,
        path: String,
        source: std::io::Error,
    },

    /// Duplicating or restoring a standard descriptor failed.
    #[error("could not dup2 onto descriptor {fd}: {source}")]
    Dup { fd: i32, source: nix::Error },

    #[error("error forking: {0}")]
    Fork(nix::Error),

    #[error("could not create pipe: {0}")]
    Pipe(nix::Error),

    #[error("waitpid failed: {0}")]
    Wait(nix::Error),

    /// The `cd` builtin could not change the working directory.
    #[error("error cd {}: {source}", .path.display())]
    Cd {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A resolved string cannot be handed to `execve`.
    #[error("argument contains a NUL byte: {0:?}")]
    NulByte(String),

    #[error("Parse error: {0}")]
    Parse(#[from] crate::parser::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
