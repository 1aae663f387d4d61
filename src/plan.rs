//! Scheduling: partitions dirty builds into those runnable now and those
//! waiting on inputs, and advances that frontier as builds complete.

use crate::dirty::DirtyState;
use crate::graph::{BuildId, Graph};

/// The ready/pending split of the dirty builds of one run.
#[derive(Default, Debug)]
pub struct Plan {
    /// Builds whose inputs are all available.  Used as a stack: the most
    /// recently readied build runs first.
    ready: Vec<BuildId>,
    /// Dirty builds still waiting on at least one input.
    pending: Vec<BuildId>,
}

/// A build can run once every generated input's build has its outputs ready.
fn inputs_ready(graph: &Graph, state: &DirtyState, id: BuildId) -> bool {
    graph.build(id).ins().iter().all(|&inf| match graph.file(inf).input {
        None => true,
        Some(bid) => state.outputs_ready(bid),
    })
}

impl Plan {
    pub fn new() -> Self {
        Plan::default()
    }

    /// Consider a build for this run.  Builds with no dirty outputs don't
    /// need to run; they are marked ready for their dependents and dropped.
    pub fn add_build(&mut self, graph: &Graph, state: &mut DirtyState, id: BuildId) {
        let dirty = graph
            .build(id)
            .outs()
            .iter()
            .any(|&out| state.is_dirty(out));
        if !dirty {
            state.set_outputs_ready(id);
            return;
        }
        if inputs_ready(graph, state, id) {
            self.ready.push(id);
        } else {
            self.pending.push(id);
        }
    }

    /// Move any pending builds whose inputs have become ready onto the ready
    /// stack, keeping their relative order.
    pub fn advance(&mut self, graph: &Graph, state: &DirtyState) {
        let ready = &mut self.ready;
        self.pending.retain(|&id| {
            if inputs_ready(graph, state, id) {
                ready.push(id);
                false
            } else {
                true
            }
        });
    }

    /// Take the next build to run.
    pub fn pop(&mut self) -> Option<BuildId> {
        self.ready.pop()
    }

    pub fn pending(&self) -> &[BuildId] {
        &self.pending
    }

    /// Number of builds still to run, ready or not.
    pub fn len(&self) -> usize {
        self.ready.len() + self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ready.is_empty() && self.pending.is_empty()
    }
}
