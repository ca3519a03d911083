//! Redirection of the standard descriptors of the current process.
//!
//! [`apply_redirections`] rewires descriptors 0, 1 and 2 in place. It is meant to run
//! inside a freshly forked child before `execve`, or inside the interpreter process
//! under a [`SavedStdio`] guard.

use crate::ast::{IoFlags, SimpleCommand};
use crate::env::Environment;
use crate::error::{Result, ShellError, Stream};
use crate::word::resolve_word;
use nix::unistd::dup2;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::os::fd::{AsFd, AsRawFd, OwnedFd, RawFd};
use std::os::unix::fs::OpenOptionsExt;

/// Permission bits for files created by output redirection.
const IO_MODE: u32 = 0o664;

pub(crate) const STDIN_FD: RawFd = 0;
pub(crate) const STDOUT_FD: RawFd = 1;
pub(crate) const STDERR_FD: RawFd = 2;

/// Apply the input, output and error targets of `cmd`, in that order.
///
/// The error target reuses the output descriptor when both resolve to the same name
/// under [`IoFlags::Regular`], so the file is truncated once and both streams share
/// one file offset.
pub fn apply_redirections(cmd: &SimpleCommand, env: &Environment) -> Result<()> {
    if let Some(word) = &cmd.input {
        let path = resolve_word(word, env);
        let file = File::open(&path).map_err(|source| ShellError::Redirect {
            stream: Stream::Input,
            path: path.clone(),
            source,
        })?;
        tracing::debug!(path = %path, "redirecting stdin");
        replace_fd(&file, STDIN_FD)?;
    }

    let mut output: Option<(String, File)> = None;
    if let Some(word) = &cmd.output {
        let path = resolve_word(word, env);
        let append = cmd.io_flags == IoFlags::OutAppend;
        let file = open_for_write(&path, append, Stream::Output)?;
        tracing::debug!(path = %path, append, "redirecting stdout");
        replace_fd(&file, STDOUT_FD)?;
        output = Some((path, file));
    }

    if let Some(word) = &cmd.error {
        let path = resolve_word(word, env);
        match &output {
            Some((out_path, out_file))
                if cmd.io_flags == IoFlags::Regular && *out_path == path =>
            {
                tracing::debug!(path = %path, "stderr shares the stdout descriptor");
                replace_fd(out_file, STDERR_FD)?;
            }
            _ => {
                let append = cmd.io_flags != IoFlags::Regular;
                let file = open_for_write(&path, append, Stream::Error)?;
                tracing::debug!(path = %path, append, "redirecting stderr");
                replace_fd(&file, STDERR_FD)?;
            }
        }
    }

    Ok(())
}

fn open_for_write(path: &str, append: bool, stream: Stream) -> Result<File> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).mode(IO_MODE);
    if append {
        options.append(true);
    } else {
        options.truncate(true);
    }
    options.open(path).map_err(|source| ShellError::Redirect {
        stream,
        path: path.to_string(),
        source,
    })
}

/// Make `target` refer to the same open file as `source`.
pub(crate) fn replace_fd(source: &impl AsRawFd, target: RawFd) -> Result<()> {
    dup2(source.as_raw_fd(), target)
        .map(drop)
        .map_err(|source| ShellError::Dup { fd: target, source })
}

/// Copies of descriptors 0, 1 and 2, put back in place on drop.
///
/// Builtins that honour redirections run inside the interpreter process; holding a
/// `SavedStdio` across the call keeps the interpreter's terminal intact afterwards,
/// whether the builtin succeeded or not.
pub struct SavedStdio {
    saved: [OwnedFd; 3],
}

impl SavedStdio {
    pub fn save() -> Result<Self> {
        let saved = [
            io::stdin().as_fd().try_clone_to_owned()?,
            io::stdout().as_fd().try_clone_to_owned()?,
            io::stderr().as_fd().try_clone_to_owned()?,
        ];
        Ok(Self { saved })
    }
}

impl Drop for SavedStdio {
    fn drop(&mut self) {
        // Anything buffered while redirected belongs to the redirected file.
        let _ = io::stdout().flush();
        for (target, saved) in [STDIN_FD, STDOUT_FD, STDERR_FD].into_iter().zip(&self.saved) {
            if let Err(err) = replace_fd(saved, target) {
                tracing::error!(%err, "failed to restore standard descriptor");
            }
        }
    }
}
