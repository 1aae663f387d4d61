//! The build graph, a graph between files and commands.

use crate::densemap::{self, DenseMap};
use crate::fs::{FileSystem, MTime};
use rustc_hash::FxHashMap;

/// Id for File nodes in the Graph.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct FileId(u32);
impl densemap::Index for FileId {
    fn index(&self) -> usize {
        self.0 as usize
    }
}
impl From<usize> for FileId {
    fn from(u: usize) -> FileId {
        FileId(u as u32)
    }
}

/// Id for Build nodes in the Graph.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct BuildId(u32);
impl densemap::Index for BuildId {
    fn index(&self) -> usize {
        self.0 as usize
    }
}
impl From<usize> for BuildId {
    fn from(u: usize) -> BuildId {
        BuildId(u as u32)
    }
}

/// A single file referenced as part of a build.
#[derive(Debug)]
pub struct File {
    /// Path as written in the build file.
    pub name: String,
    /// The Build that generates this file, if any.
    pub input: Option<BuildId>,
    /// The Builds that depend on this file as an input.
    pub dependents: Vec<BuildId>,
}

/// A textual location within a build file, used in error messages.
#[derive(Debug, Clone)]
pub struct FileLoc {
    pub filename: std::rc::Rc<String>,
    pub line: usize,
}
impl std::fmt::Display for FileLoc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "{}:{}", self.filename, self.line)
    }
}

/// A single build action, generating File outputs from File inputs with a command.
#[derive(Debug)]
pub struct Build {
    /// Source location this Build was declared.
    pub location: FileLoc,
    /// Shell command line, run verbatim.
    pub cmdline: String,
    ins: Vec<FileId>,
    outs: Vec<FileId>,
}
impl Build {
    pub fn new(location: FileLoc, cmdline: String, ins: Vec<FileId>, outs: Vec<FileId>) -> Self {
        Build {
            location,
            cmdline,
            ins,
            outs,
        }
    }

    /// Input paths, in declaration order.  May contain duplicates.
    pub fn ins(&self) -> &[FileId] {
        &self.ins
    }

    /// Output paths that are updated when the build runs.
    pub fn outs(&self) -> &[FileId] {
        &self.outs
    }
}

/// The build graph: owns Files and Builds.
#[derive(Default)]
pub struct Graph {
    pub files: DenseMap<FileId, File>,
    pub builds: DenseMap<BuildId, Build>,
    by_name: FxHashMap<String, FileId>,
}

impl Graph {
    pub fn new() -> Self {
        Graph::default()
    }

    /// Look up a file by name, creating it if not yet known.
    pub fn file_id(&mut self, name: &str) -> FileId {
        if let Some(&id) = self.by_name.get(name) {
            return id;
        }
        let id = self.files.push(File {
            name: name.to_owned(),
            input: None,
            dependents: Vec::new(),
        });
        self.by_name.insert(name.to_owned(), id);
        id
    }

    /// Look up a file by name without creating it.
    pub fn get_file_id(&self, name: &str) -> Option<FileId> {
        self.by_name.get(name).copied()
    }

    pub fn file(&self, id: FileId) -> &File {
        &self.files[id]
    }

    /// Add a new Build, wiring up its ins and outs.
    /// Each file may be generated by only one Build.
    pub fn add_build(&mut self, build: Build) -> anyhow::Result<BuildId> {
        let id = self.builds.next_id();
        for &out in build.outs() {
            if let Some(prev) = self.files[out].input {
                anyhow::bail!(
                    "{}: multiple rules generate {} (first at {})",
                    build.location,
                    self.files[out].name,
                    self.builds[prev].location
                );
            }
        }
        for &out in build.outs() {
            self.files[out].input = Some(id);
        }
        for &inf in build.ins() {
            self.files[inf].dependents.push(id);
        }
        Ok(self.builds.push(build))
    }

    pub fn build(&self, id: BuildId) -> &Build {
        &self.builds[id]
    }

    /// A human-readable name for a build: its first output.
    pub fn build_name(&self, id: BuildId) -> &str {
        match self.builds[id].outs().first() {
            Some(&out) => &self.files[out].name,
            None => &self.builds[id].cmdline,
        }
    }
}

/// Cached mtimes of files, gathered lazily.  A None entry means the file has
/// not been stat()ed yet (or its cached value was discarded).
pub struct FileState(DenseMap<FileId, Option<MTime>>);

impl FileState {
    pub fn new(graph: &Graph) -> Self {
        FileState(DenseMap::filled(graph.files.len(), None))
    }

    /// The cached mtime, if the file has been stat()ed.
    pub fn get(&self, id: FileId) -> Option<MTime> {
        self.0[id]
    }

    /// Return the file's mtime, consulting the file system only the first time.
    pub fn stat(&mut self, fs: &dyn FileSystem, graph: &Graph, id: FileId) -> MTime {
        match self.0[id] {
            Some(mtime) => mtime,
            None => {
                let mtime = fs.stat(&graph.file(id).name);
                self.0[id] = Some(mtime);
                mtime
            }
        }
    }

    /// Forget a cached mtime, e.g. after a command rewrote the file.
    pub fn invalidate(&mut self, id: FileId) {
        self.0[id] = None;
    }
}
