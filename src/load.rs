//! Graph loading: reads a build file and constructs the build graph from it.

use crate::fs::FileSystem;
use crate::graph::{Build, FileId, FileLoc, Graph};
use crate::{parse, trace};
use anyhow::{anyhow, bail};
use std::rc::Rc;

/// State loaded by read().
pub struct State {
    pub graph: Graph,
    /// The output of the last rule in the file.
    pub default: FileId,
}

/// Build a graph from the text of a build file.
pub fn parse(filename: &str, text: &str) -> anyhow::Result<State> {
    let filename = Rc::new(filename.to_owned());
    let mut graph = Graph::new();
    let mut default = None;
    for rule in parse::parse(text) {
        let out = graph.file_id(rule.output);
        let ins = rule
            .inputs
            .iter()
            .map(|name| graph.file_id(name))
            .collect();
        let location = FileLoc {
            filename: filename.clone(),
            line: rule.line,
        };
        graph.add_build(Build::new(location, rule.command.to_owned(), ins, vec![out]))?;
        default = Some(out);
    }
    let default = match default {
        Some(id) => id,
        None => bail!("no targets in {}", filename),
    };
    Ok(State { graph, default })
}

/// Load a build file through the given file system.
pub fn read(fs: &dyn FileSystem, filename: &str) -> anyhow::Result<State> {
    let bytes = trace::scope("fs::read", || fs.read(filename))
        .map_err(|err| anyhow!("read {}: {}", filename, err))?;
    let text =
        std::str::from_utf8(&bytes).map_err(|err| anyhow!("read {}: {}", filename, err))?;
    trace::scope("load::parse", || parse(filename, text))
}
