use nix::sys::wait::WaitStatus;
use std::os::unix::process::ExitStatusExt;
use std::process::ExitStatus;

/// Conventional process exit code: 0 for success, anything else for failure.
pub type ExitCode = i32;

/// Raw value reported by [`ExecutionStatus::ShellExit`].
pub const SHELL_EXIT: i32 = -100;

/// Result of evaluating any node of a command tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionStatus {
    /// Status of a builtin run inside the interpreter process.
    Builtin(ExitCode),
    /// Raw wait status of a child process, as reported by `waitpid`.
    Wait(i32),
    /// The interpreter must terminate.
    ShellExit,
}

impl ExecutionStatus {
    /// The integer the conditional operators compare against zero.
    pub fn raw(self) -> i32 {
        match self {
            ExecutionStatus::Builtin(code) => code,
            ExecutionStatus::Wait(raw) => raw,
            ExecutionStatus::ShellExit => SHELL_EXIT,
        }
    }

    pub fn is_success(self) -> bool {
        self.raw() == 0
    }

    pub fn is_shell_exit(self) -> bool {
        self == ExecutionStatus::ShellExit
    }

    /// Decode a normalized exit code suitable for `exit(2)`.
    ///
    /// A child killed by a signal maps to `128 + signal`, like POSIX shells report it.
    pub fn exit_code(self) -> ExitCode {
        match self {
            ExecutionStatus::Builtin(code) => code,
            ExecutionStatus::ShellExit => 0,
            ExecutionStatus::Wait(raw) => {
                let status = ExitStatus::from_raw(raw);
                match status.code() {
                    Some(code) => code,
                    None => terminated_by_signal(status),
                }
            }
        }
    }

    /// Re-encode a decoded [`WaitStatus`] as the raw integer `waitpid(2)` produced.
    pub(crate) fn from_wait_status(status: WaitStatus) -> Self {
        let raw = match status {
            WaitStatus::Exited(_, code) => (code & 0xff) << 8,
            WaitStatus::Signaled(_, signal, core_dumped) => {
                (signal as i32) | if core_dumped { 0x80 } else { 0 }
            }
            WaitStatus::Stopped(_, signal) => ((signal as i32) << 8) | 0x7f,
            WaitStatus::Continued(_) => 0xffff,
            // Not produced without WNOHANG or ptrace.
            _ => 0,
        };
        ExecutionStatus::Wait(raw)
    }
}

fn terminated_by_signal(exit_status: ExitStatus) -> ExitCode {
    if let Some(signal) = exit_status.signal() {
        128 + signal
    } else if exit_status.core_dumped() {
        255
    } else {
        -1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nix::sys::signal::Signal;
    use nix::unistd::Pid;

    #[test]
    fn exited_status_round_trips_to_exit_code() {
        let status = ExecutionStatus::from_wait_status(WaitStatus::Exited(Pid::from_raw(1), 3));
        assert_eq!(status, ExecutionStatus::Wait(3 << 8));
        assert_eq!(status.exit_code(), 3);
        assert!(!status.is_success());
    }

    #[test]
    fn clean_exit_is_zero_raw_status() {
        let status = ExecutionStatus::from_wait_status(WaitStatus::Exited(Pid::from_raw(1), 0));
        assert_eq!(status.raw(), 0);
        assert!(status.is_success());
    }

    #[test]
    fn signal_termination_maps_above_128() {
        let status = ExecutionStatus::from_wait_status(WaitStatus::Signaled(
            Pid::from_raw(1),
            Signal::SIGKILL,
            false,
        ));
        assert_eq!(status.raw(), 9);
        assert_eq!(status.exit_code(), 137);
    }

    #[test]
    fn shell_exit_has_fixed_raw_value() {
        assert_eq!(ExecutionStatus::ShellExit.raw(), SHELL_EXIT);
        assert_eq!(ExecutionStatus::ShellExit.exit_code(), 0);
        assert!(ExecutionStatus::ShellExit.is_shell_exit());
    }

    #[test]
    fn builtin_status_is_used_as_is() {
        assert_eq!(ExecutionStatus::Builtin(1).raw(), 1);
        assert_eq!(ExecutionStatus::Builtin(1).exit_code(), 1);
    }
}
