//! Dirty scanning: walks from a target down to its sources, deciding which
//! files are out of date relative to their inputs.
//!
//! A generated file is dirty if it is missing, if any of its build's inputs is
//! newer than it, or if any of those inputs is itself dirty.  A source file
//! (no generating build) is dirty only if it is missing.

use crate::densemap::DenseMap;
use crate::fs::{FileSystem, MTime};
use crate::graph::{BuildId, FileId, FileState, Graph};
use crate::progress::Progress;

/// Where the scan is with respect to a file.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Visit {
    Unvisited,
    /// On the current path from the target; reaching it again is a cycle.
    InProgress,
    Done,
}

/// Per-file and per-build flags computed by scanning, and later updated as
/// builds run.
pub struct DirtyState {
    visit: DenseMap<FileId, Visit>,
    dirty: DenseMap<FileId, bool>,
    /// Whether a build's outputs are usable by downstream builds: either they
    /// were found clean, or the build ran successfully.
    outputs_ready: DenseMap<BuildId, bool>,
    /// Whether a build was reached from some scanned target.
    reached: DenseMap<BuildId, bool>,
}

/// Why an output was found dirty, for -v explanations.
enum Reason {
    Missing,
    Older(FileId),
    DirtyInput(FileId),
}

impl DirtyState {
    pub fn new(graph: &Graph) -> Self {
        DirtyState {
            visit: DenseMap::filled(graph.files.len(), Visit::Unvisited),
            dirty: DenseMap::filled(graph.files.len(), false),
            outputs_ready: DenseMap::filled(graph.builds.len(), false),
            reached: DenseMap::filled(graph.builds.len(), false),
        }
    }

    /// Only meaningful once a scan has visited the file.
    pub fn is_dirty(&self, id: FileId) -> bool {
        self.dirty[id]
    }

    pub fn outputs_ready(&self, id: BuildId) -> bool {
        self.outputs_ready[id]
    }

    pub fn set_outputs_ready(&mut self, id: BuildId) {
        self.outputs_ready[id] = true;
    }

    /// Builds reached by scans so far, in graph order.
    pub fn reached_builds<'a>(&'a self, graph: &Graph) -> impl Iterator<Item = BuildId> + 'a {
        graph.builds.ids().filter(move |&id| self.reached[id])
    }

    /// Scan target and everything it depends on.  Files already scanned
    /// (by an earlier target, or through another path) are not revisited.
    pub fn scan(
        &mut self,
        graph: &Graph,
        file_state: &mut FileState,
        fs: &dyn FileSystem,
        progress: &mut dyn Progress,
        target: FileId,
    ) -> anyhow::Result<()> {
        let mut scanner = Scanner {
            graph,
            file_state,
            fs,
            progress,
            stack: Vec::new(),
            state: self,
        };
        scanner.scan_file(target)
    }
}

/// Borrowed context for one scan.
struct Scanner<'a> {
    graph: &'a Graph,
    file_state: &'a mut FileState,
    fs: &'a dyn FileSystem,
    progress: &'a mut dyn Progress,
    /// Files on the path from the target to the file being scanned.
    stack: Vec<FileId>,
    state: &'a mut DirtyState,
}

impl<'a> Scanner<'a> {
    fn stat(&mut self, id: FileId) -> MTime {
        self.file_state.stat(self.fs, self.graph, id)
    }

    fn scan_file(&mut self, id: FileId) -> anyhow::Result<()> {
        match self.state.visit[id] {
            Visit::Done => return Ok(()),
            Visit::InProgress => anyhow::bail!(self.cycle_message(id)),
            Visit::Unvisited => {}
        }
        let bid = match self.graph.file(id).input {
            None => {
                let mtime = self.stat(id);
                self.state.dirty[id] = mtime == MTime::Missing;
                self.state.visit[id] = Visit::Done;
                return Ok(());
            }
            Some(bid) => bid,
        };
        self.stack.push(id);
        self.scan_build(bid)?;
        self.stack.pop();
        Ok(())
    }

    fn scan_build(&mut self, bid: BuildId) -> anyhow::Result<()> {
        let graph = self.graph;
        let build = graph.build(bid);
        for &out in build.outs() {
            self.state.visit[out] = Visit::InProgress;
        }

        let mut newest: Option<(MTime, FileId)> = None;
        let mut dirty_input = None;
        for &inf in build.ins() {
            self.scan_file(inf)?;
            let mtime = self.stat(inf);
            if newest.map_or(true, |(t, _)| mtime > t) {
                newest = Some((mtime, inf));
            }
            if dirty_input.is_none() && self.state.dirty[inf] {
                dirty_input = Some(inf);
            }
        }

        let mut any_dirty = false;
        for &out in build.outs() {
            let mtime = self.stat(out);
            let reason = if mtime == MTime::Missing {
                Some(Reason::Missing)
            } else if let Some((_, inf)) = newest.filter(|&(t, _)| t > mtime) {
                Some(Reason::Older(inf))
            } else {
                dirty_input.map(Reason::DirtyInput)
            };
            self.state.dirty[out] = reason.is_some();
            self.state.visit[out] = Visit::Done;
            if let Some(reason) = reason {
                any_dirty = true;
                if self.progress.explaining() {
                    self.explain(out, reason);
                }
            }
        }
        self.state.outputs_ready[bid] = !any_dirty;
        self.state.reached[bid] = true;
        Ok(())
    }

    fn explain(&mut self, out: FileId, reason: Reason) {
        let name = &self.graph.file(out).name;
        let msg = match reason {
            Reason::Missing => format!("explain: {}: output missing", name),
            Reason::Older(inf) => format!(
                "explain: {}: older than input {}",
                name,
                self.graph.file(inf).name
            ),
            Reason::DirtyInput(inf) => format!(
                "explain: {}: input {} is dirty",
                name,
                self.graph.file(inf).name
            ),
        };
        self.progress.log(&msg);
    }

    /// Describe the cycle closed by reaching id again.
    fn cycle_message(&self, id: FileId) -> String {
        // id may be a sibling output of a build on the stack rather than a
        // stack entry itself, so match on the generating build.
        let input = self.graph.file(id).input;
        let start = self
            .stack
            .iter()
            .position(|&sid| sid == id || self.graph.file(sid).input == input)
            .unwrap_or(0);
        let mut msg = "dependency cycle: ".to_string();
        for &sid in &self.stack[start..] {
            msg.push_str(&self.graph.file(sid).name);
            msg.push_str(" -> ");
        }
        msg.push_str(&self.graph.file(id).name);
        msg
    }
}
