//! Executes a single build: runs its command, then refreshes what we know
//! about its outputs.

use crate::dirty::DirtyState;
use crate::fs::FileSystem;
use crate::graph::{BuildId, FileState, Graph};
use crate::process::{self, Termination};

/// Runs command lines.  The real implementation spawns a shell; tests
/// substitute one that edits an in-memory file system.
pub trait Runner {
    /// Run cmdline to completion.
    /// Returns an Err() if we failed outside of the process itself.
    fn run(&mut self, cmdline: &str) -> anyhow::Result<Termination>;
}

/// Runs commands with the system shell.
#[derive(Default)]
pub struct ShellRunner {}

impl Runner for ShellRunner {
    fn run(&mut self, cmdline: &str) -> anyhow::Result<Termination> {
        process::run_command(cmdline)
    }
}

/// Run the build's command.  On success its outputs become ready, and
/// their mtimes are re-read so dependents compare against the fresh files.
/// On failure nothing is updated.
pub fn execute(
    graph: &Graph,
    file_state: &mut FileState,
    fs: &dyn FileSystem,
    state: &mut DirtyState,
    runner: &mut dyn Runner,
    id: BuildId,
) -> anyhow::Result<Termination> {
    let build = graph.build(id);
    let termination = runner.run(&build.cmdline)?;
    if termination != Termination::Success {
        return Ok(termination);
    }
    state.set_outputs_ready(id);
    for &out in build.outs() {
        file_state.invalidate(out);
        file_state.stat(fs, graph, out);
    }
    Ok(termination)
}
