//! Build runner: scans the wanted targets, plans the dirty builds, and runs
//! them one at a time until nothing is left.

use crate::dirty::DirtyState;
use crate::fs::{FileSystem, MTime};
use crate::graph::{FileId, FileState, Graph};
use crate::plan::Plan;
use crate::process::Termination;
use crate::progress::{Counts, Progress};
use crate::task::{self, Runner};
use crate::trace;

/// How a build that got as far as running commands ended.
#[derive(Debug, PartialEq)]
pub enum BuildResult {
    /// All wanted targets are up to date; the number is the count of
    /// executed tasks, zero if nothing needed doing.
    Success(usize),
    /// A task failed, after `built` other tasks had succeeded.
    Failed { built: usize },
}

pub struct Work<'a> {
    graph: &'a Graph,
    fs: &'a dyn FileSystem,
    runner: &'a mut dyn Runner,
    progress: &'a mut dyn Progress,
    file_state: FileState,
    dirty: DirtyState,
    /// Targets requested so far, in request order.
    wanted: Vec<FileId>,
}

impl<'a> Work<'a> {
    pub fn new(
        graph: &'a Graph,
        fs: &'a dyn FileSystem,
        runner: &'a mut dyn Runner,
        progress: &'a mut dyn Progress,
    ) -> Self {
        Work {
            graph,
            fs,
            runner,
            progress,
            file_state: FileState::new(graph),
            dirty: DirtyState::new(graph),
            wanted: Vec::new(),
        }
    }

    /// Request a target by name.
    pub fn want_file(&mut self, name: &str) -> anyhow::Result<()> {
        let id = match self.graph.get_file_id(name) {
            None => anyhow::bail!("unknown path requested: {:?}", name),
            Some(id) => id,
        };
        self.want_fileid(id);
        Ok(())
    }

    pub fn want_fileid(&mut self, id: FileId) {
        self.wanted.push(id);
    }

    /// Bring every wanted target up to date.
    /// Returns an Err() if the graph could not be built at all, e.g. due to
    /// a dependency cycle.
    pub fn run(&mut self) -> anyhow::Result<BuildResult> {
        if !trace::scope("dirty::scan", || self.scan())? {
            return Ok(BuildResult::Success(0));
        }
        let mut plan = trace::scope("plan", || self.plan());
        self.execute(&mut plan)
    }

    /// Scan all wanted targets, returning whether any of them is dirty.
    /// A wanted source file that doesn't exist can never be brought up to
    /// date, so it is an error.
    fn scan(&mut self) -> anyhow::Result<bool> {
        let mut any_dirty = false;
        for &id in &self.wanted {
            self.dirty.scan(
                self.graph,
                &mut self.file_state,
                self.fs,
                &mut *self.progress,
                id,
            )?;
            let file = self.graph.file(id);
            if file.input.is_none()
                && self.file_state.stat(self.fs, self.graph, id) == MTime::Missing
            {
                anyhow::bail!("{}: missing and no rule generates it", file.name);
            }
            any_dirty |= self.dirty.is_dirty(id);
        }
        Ok(any_dirty)
    }

    /// Plan the builds reached by the scan, in graph order.
    fn plan(&mut self) -> Plan {
        let mut plan = Plan::new();
        let reached: Vec<_> = self.dirty.reached_builds(self.graph).collect();
        for id in reached {
            plan.add_build(self.graph, &mut self.dirty, id);
        }
        plan
    }

    /// Run ready builds until none are left, stopping at the first failure.
    fn execute(&mut self, plan: &mut Plan) -> anyhow::Result<BuildResult> {
        let mut counts = Counts {
            done: 0,
            total: plan.len(),
        };
        self.progress.update(&counts);
        let graph = self.graph;
        while let Some(id) = plan.pop() {
            let build = graph.build(id);
            self.progress.task_started(id, build);
            let termination = trace::scope("task::execute", || {
                task::execute(
                    graph,
                    &mut self.file_state,
                    self.fs,
                    &mut self.dirty,
                    &mut *self.runner,
                    id,
                )
            })?;
            self.progress.task_finished(id, build, termination);
            if termination != Termination::Success {
                return Ok(BuildResult::Failed { built: counts.done });
            }
            counts.done += 1;
            self.progress.update(&counts);
            plan.advance(graph, &self.dirty);
        }

        if !plan.pending().is_empty() {
            let stuck: Vec<&str> = plan
                .pending()
                .iter()
                .map(|&id| graph.build_name(id))
                .collect();
            anyhow::bail!(
                "{} builds still pending (dependency cycle?): {}",
                stuck.len(),
                stuck.join(", ")
            );
        }
        Ok(BuildResult::Success(counts.done))
    }
}
