use crate::ast::SimpleCommand;
use crate::env::Environment;
use crate::error::{Result, ShellError};
use crate::process::{spawn_child, wait_for};
use crate::redirect::apply_redirections;
use crate::status::{ExecutionStatus, ExitCode};
use crate::word::{build_argv, to_cstring};
use nix::unistd::execve;
use std::borrow::Cow;
use std::ffi::{CString, OsStr};
use std::os::unix::ffi::OsStrExt;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

/// Exit status of a child whose program could not be started.
const EXEC_FAILURE: ExitCode = 1;

/// Search path used when the environment has no `PATH`.
const DEFAULT_PATH: &str = "/usr/local/bin:/usr/bin:/bin";

/// Run `cmd` as a child process and wait for it.
///
/// Returns the child's raw wait status unmodified.
pub fn launch(cmd: &SimpleCommand, env: &Environment) -> Result<ExecutionStatus> {
    let pid = spawn_child(|| {
        apply_redirections(cmd, env)?;
        let argv = build_argv(cmd, env);
        exec(&argv, env)
    })?;
    wait_for(pid)
}

/// Replace the current program image. Only returns on failure.
fn exec(argv: &[String], env: &Environment) -> Result<ExitCode> {
    let verb = &argv[0];
    let args = argv
        .iter()
        .map(|arg| to_cstring(arg))
        .collect::<Result<Vec<CString>>>()?;
    let envp = env.to_exec_env()?;

    let search_paths = env.get_var("PATH").unwrap_or(DEFAULT_PATH);
    if let Some(program) = find_command_path(OsStr::new(search_paths), Path::new(verb)) {
        tracing::debug!(program = %program.display(), ?argv, "exec");
        let program = CString::new(program.as_os_str().as_bytes())
            .map_err(|_| ShellError::NulByte(verb.clone()))?;
        let Err(err) = execve(&program, &args, &envp);
        tracing::debug!(%err, "execve failed");
    }

    eprintln!("Execution failed for '{verb}'");
    Ok(EXEC_FAILURE)
}

/// Locate the program named by a command's verb.
///
/// Only a bare name (one component, no `/`) is looked up in `search_paths`, taking
/// the first directory holding an executable regular file of that name. Anything containing a
/// separator is taken as a path, absolute or relative to the working directory, and
/// accepted if it exists. An empty name finds nothing.
pub fn find_command_path<'a>(search_paths: &OsStr, path: &'a Path) -> Option<Cow<'a, Path>> {
    if path.is_absolute() || path.starts_with("./") {
        return path.exists().then_some(Cow::Borrowed(path));
    }

    let mut components = path.components();
    match (components.next(), components.next()) {
        (None, _) => None,
        (Some(name), None) => find_in_path(search_paths, name.as_os_str()).map(Cow::Owned),
        _ => path.exists().then_some(Cow::Borrowed(path)),
    }
}

fn find_in_path(search_paths: &OsStr, cmd: &OsStr) -> Option<PathBuf> {
    std::env::split_paths(search_paths)
        .map(|dir| dir.join(cmd))
        .find(|candidate| is_executable(candidate))
}

fn is_executable(path: &Path) -> bool {
    path.metadata()
        .is_ok_and(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
}
