//! Build progress tracking and reporting, for the purpose of display to the
//! user.

use crate::graph::{Build, BuildId};
use crate::process::Termination;

/// Counts of builds through one run, for "[3/10]"-style display.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Counts {
    /// Builds that finished running.
    pub done: usize,
    /// Builds planned to run.
    pub total: usize,
}

/// Trait for build progress notifications.
pub trait Progress {
    /// Called when the set of planned builds or completed builds changes.
    fn update(&mut self, counts: &Counts);

    /// Called when a task starts.
    fn task_started(&mut self, id: BuildId, build: &Build);

    /// Called when a task completes.
    fn task_finished(&mut self, id: BuildId, build: &Build, termination: Termination);

    /// Whether explanations of dirty files are wanted.  Computing them
    /// costs string formatting, so the scanner asks first.
    fn explaining(&self) -> bool {
        false
    }

    /// Log a line of output.
    fn log(&mut self, msg: &str);
}

/// Progress implementation for a plain console, printing a line per task.
#[derive(Default)]
pub struct ConsoleProgress {
    /// Whether to print explanations of why builds are dirty.
    verbose: bool,
    counts: Counts,
}

impl ConsoleProgress {
    pub fn new(verbose: bool) -> Self {
        ConsoleProgress {
            verbose,
            counts: Counts::default(),
        }
    }
}

impl Progress for ConsoleProgress {
    fn update(&mut self, counts: &Counts) {
        self.counts = *counts;
    }

    fn task_started(&mut self, _id: BuildId, build: &Build) {
        let msg = format!(
            "[{}/{}] {}",
            self.counts.done + 1,
            self.counts.total,
            build.cmdline
        );
        self.log(&msg);
    }

    fn task_finished(&mut self, _id: BuildId, build: &Build, termination: Termination) {
        match termination {
            Termination::Success => {}
            Termination::Interrupted => self.log(&format!("interrupted: {}", build.cmdline)),
            Termination::Failure => self.log(&format!("failed: {}", build.cmdline)),
        }
    }

    fn explaining(&self) -> bool {
        self.verbose
    }

    fn log(&mut self, msg: &str) {
        println!("{}", msg);
    }
}
