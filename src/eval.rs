//! Recursive evaluation of a command tree.
//!
//! `;`, `&&` and `||` run their operands one after the other inside the interpreter
//! process. `&` and `|` fork one child per operand; each child evaluates its subtree
//! (forking again as needed) and exits with the subtree's exit code.

use crate::ast::{CommandNode, Operator, SimpleCommand};
use crate::builtin;
use crate::error::{Result, ShellError};
use crate::external;
use crate::interpreter::Interpreter;
use crate::process::{spawn_child, wait_for};
use crate::redirect::{STDIN_FD, STDOUT_FD, replace_fd};
use crate::status::ExecutionStatus;
use nix::fcntl::OFlag;
use nix::unistd::{close, pipe2};
use std::os::fd::AsRawFd;

impl Interpreter {
    /// Evaluate `node` and return its status.
    ///
    /// `Err` means a failure in the interpreter process itself (fork, pipe, a fatal
    /// `cd`); the caller is expected to end the session.
    pub fn evaluate(&mut self, node: &CommandNode) -> Result<ExecutionStatus> {
        match node {
            CommandNode::Simple(cmd) => self.run_simple(cmd),
            CommandNode::Binary { op, left, right } => match op {
                Operator::Sequential => {
                    let status = self.evaluate(left)?;
                    if status.is_shell_exit() {
                        return Ok(status);
                    }
                    self.evaluate(right)
                }
                Operator::ConditionalZero => {
                    let status = self.evaluate(left)?;
                    if status.raw() == 0 {
                        self.evaluate(right)
                    } else {
                        Ok(status)
                    }
                }
                Operator::ConditionalNonZero => {
                    let status = self.evaluate(left)?;
                    if status.raw() != 0 && !status.is_shell_exit() {
                        self.evaluate(right)
                    } else {
                        Ok(status)
                    }
                }
                Operator::Parallel => self.run_parallel(left, right),
                Operator::Pipe => self.run_pipe(left, right),
            },
        }
    }

    fn run_simple(&mut self, cmd: &SimpleCommand) -> Result<ExecutionStatus> {
        if let Some(status) = builtin::dispatch(cmd, &mut self.env, &self.config) {
            return status;
        }
        external::launch(cmd, &self.env)
    }

    /// Run both subtrees in their own processes. Only the second status is kept.
    fn run_parallel(&mut self, left: &CommandNode, right: &CommandNode) -> Result<ExecutionStatus> {
        let first = spawn_child(|| Ok(self.evaluate(left)?.exit_code()))?;
        let second = spawn_child(|| Ok(self.evaluate(right)?.exit_code()))?;

        wait_for(first)?;
        wait_for(second)
    }

    /// Connect the stdout of `left` to the stdin of `right` through one pipe.
    fn run_pipe(&mut self, left: &CommandNode, right: &CommandNode) -> Result<ExecutionStatus> {
        let (reader, writer) = pipe2(OFlag::O_CLOEXEC).map_err(ShellError::Pipe)?;
        tracing::debug!(read = reader.as_raw_fd(), write = writer.as_raw_fd(), "pipe");

        // Children close the raw descriptors; they exit without unwinding, so the
        // parent's `OwnedFd`s are never dropped on their side.
        let first = spawn_child(|| {
            let _ = close(reader.as_raw_fd());
            replace_fd(&writer, STDOUT_FD)?;
            let _ = close(writer.as_raw_fd());
            Ok(self.evaluate(left)?.exit_code())
        })?;
        let second = spawn_child(|| {
            let _ = close(writer.as_raw_fd());
            replace_fd(&reader, STDIN_FD)?;
            let _ = close(reader.as_raw_fd());
            Ok(self.evaluate(right)?.exit_code())
        })?;

        drop(reader);
        drop(writer);

        wait_for(first)?;
        wait_for(second)
    }
}
