//! Runs a command line as a subprocess.
//!
//! Builds run one at a time, so the child shares our stdin/stdout/stderr and
//! its output reaches the console as it is produced.  Ctrl-C goes to the whole
//! process group; the child sees it and we report it as interrupted.

use std::process::{Command, ExitStatus};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Termination {
    Success,
    Interrupted,
    Failure,
}

#[cfg(unix)]
fn shell(cmdline: &str) -> Command {
    let mut cmd = Command::new("/bin/sh");
    cmd.arg("-c").arg(cmdline);
    cmd
}

#[cfg(windows)]
fn shell(cmdline: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.arg("/c").arg(cmdline);
    cmd
}

#[cfg(unix)]
fn termination(status: ExitStatus) -> Termination {
    use std::os::unix::process::ExitStatusExt;
    if status.success() {
        Termination::Success
    } else if status.signal() == Some(libc::SIGINT) {
        Termination::Interrupted
    } else {
        Termination::Failure
    }
}

#[cfg(not(unix))]
fn termination(status: ExitStatus) -> Termination {
    if status.success() {
        Termination::Success
    } else {
        Termination::Failure
    }
}

/// Run cmdline through the shell, blocking until it exits.
/// Returns an Err() only if the process could not be started at all.
pub fn run_command(cmdline: &str) -> anyhow::Result<Termination> {
    let status = shell(cmdline)
        .status()
        .map_err(|err| anyhow::anyhow!("spawn {:?}: {}", cmdline, err))?;
    Ok(termination(status))
}
