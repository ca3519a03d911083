use crate::error::{Result, ShellError};
use crate::status::{ExecutionStatus, ExitCode};
use nix::errno::Errno;
use nix::sys::wait::{WaitStatus, waitpid};
use nix::unistd::{ForkResult, Pid, fork};
use std::io::{self, Write};

/// Fork a child that runs `body` and exits with the code it returns.
///
/// The child never returns to the caller. An error from `body` is reported on the
/// child's stderr and turns into exit status 1.
pub(crate) fn spawn_child<F>(body: F) -> Result<Pid>
where
    F: FnOnce() -> Result<ExitCode>,
{
    // Pending output would otherwise be written once by each process.
    let _ = io::stdout().flush();
    // SAFETY: the child branch runs `body` and terminates through `exit_child`; no
    // code after the fork returns into the caller's frames.
    match unsafe { fork() }.map_err(ShellError::Fork)? {
        ForkResult::Parent { child } => {
            tracing::debug!(pid = %child, "forked child");
            Ok(child)
        }
        ForkResult::Child => {
            let code = match body() {
                Ok(code) => code,
                Err(err) => {
                    eprintln!("minishell: {err}");
                    1
                }
            };
            exit_child(code)
        }
    }
}

pub(crate) fn exit_child(code: ExitCode) -> ! {
    let _ = io::stdout().flush();
    std::process::exit(code)
}

/// Block until `pid` terminates and return its raw wait status.
pub(crate) fn wait_for(pid: Pid) -> Result<ExecutionStatus> {
    loop {
        match waitpid(pid, None) {
            Ok(status) => {
                if !matches!(status, WaitStatus::Exited(..)) {
                    tracing::warn!(pid = %pid, ?status, "child terminated abnormally");
                } else {
                    tracing::debug!(pid = %pid, ?status, "child exited");
                }
                return Ok(ExecutionStatus::from_wait_status(status));
            }
            Err(Errno::EINTR) => continue,
            Err(err) => return Err(ShellError::Wait(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn child_exit_code_is_reported_through_wait_status() {
        let pid = spawn_child(|| Ok(7)).expect("fork");
        let status = wait_for(pid).expect("wait");
        assert_eq!(status, ExecutionStatus::Wait(7 << 8));
        assert_eq!(status.exit_code(), 7);
    }

    #[test]
    fn child_error_exits_with_one() {
        let pid = spawn_child(|| Err(ShellError::NulByte("x".into()))).expect("fork");
        assert_eq!(wait_for(pid).expect("wait").exit_code(), 1);
    }
}
