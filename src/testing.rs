//! In-memory stand-ins for the file system, command runner and progress
//! display, used by unit tests.

use crate::fs::{FileSystem, MTime};
use crate::graph::{Build, BuildId};
use crate::process::Termination;
use crate::progress::{Counts, Progress};
use crate::task::Runner;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

/// A file system of names and mtimes.  Every write advances a clock, so a
/// file written later is always newer.
#[derive(Default)]
pub struct MemFs {
    files: RefCell<HashMap<String, (u64, Vec<u8>)>>,
    clock: Cell<u64>,
    stats: RefCell<HashMap<String, usize>>,
}

impl MemFs {
    pub fn new() -> Self {
        MemFs::default()
    }

    pub fn write(&self, name: &str, content: &str) {
        self.clock.set(self.clock.get() + 1);
        self.files
            .borrow_mut()
            .insert(name.to_owned(), (self.clock.get(), content.as_bytes().to_vec()));
    }

    pub fn touch(&self, name: &str) {
        self.write(name, "");
    }

    /// Set a file's mtime directly, creating it if needed.
    pub fn set(&self, name: &str, mtime: u64) {
        self.clock.set(self.clock.get().max(mtime));
        self.files
            .borrow_mut()
            .entry(name.to_owned())
            .or_default()
            .0 = mtime;
    }

    pub fn mtime(&self, name: &str) -> MTime {
        match self.files.borrow().get(name) {
            Some(&(t, _)) => MTime::Stamp(t),
            None => MTime::Missing,
        }
    }

    /// How many times stat() was called for name.
    pub fn stat_count(&self, name: &str) -> usize {
        self.stats.borrow().get(name).copied().unwrap_or(0)
    }
}

impl FileSystem for MemFs {
    fn read(&self, path: &str) -> std::io::Result<Vec<u8>> {
        match self.files.borrow().get(path) {
            Some((_, content)) => Ok(content.clone()),
            None => Err(std::io::ErrorKind::NotFound.into()),
        }
    }

    fn stat(&self, path: &str) -> MTime {
        *self.stats.borrow_mut().entry(path.to_owned()).or_default() += 1;
        self.mtime(path)
    }
}

/// Interprets a tiny command language against a MemFs:
/// `touch a b` writes files, `fail` fails, `interrupt` is interrupted,
/// anything else succeeds without side effects.
pub struct FakeRunner<'a> {
    fs: &'a MemFs,
    pub commands: Vec<String>,
}

impl<'a> FakeRunner<'a> {
    pub fn new(fs: &'a MemFs) -> Self {
        FakeRunner {
            fs,
            commands: Vec::new(),
        }
    }
}

impl<'a> Runner for FakeRunner<'a> {
    fn run(&mut self, cmdline: &str) -> anyhow::Result<Termination> {
        self.commands.push(cmdline.to_owned());
        let mut words = cmdline.split_whitespace();
        Ok(match words.next() {
            Some("touch") => {
                for name in words {
                    self.fs.touch(name);
                }
                Termination::Success
            }
            Some("fail") => Termination::Failure,
            Some("interrupt") => Termination::Interrupted,
            _ => Termination::Success,
        })
    }
}

pub struct NoProgress;

impl Progress for NoProgress {
    fn update(&mut self, _counts: &Counts) {}
    fn task_started(&mut self, _id: BuildId, _build: &Build) {}
    fn task_finished(&mut self, _id: BuildId, _build: &Build, _termination: Termination) {}
    fn log(&mut self, _msg: &str) {}
}

/// Records logged lines, with explanations turned on.
#[derive(Default)]
pub struct LogProgress {
    pub lines: Vec<String>,
}

impl Progress for LogProgress {
    fn update(&mut self, _counts: &Counts) {}
    fn task_started(&mut self, _id: BuildId, _build: &Build) {}
    fn task_finished(&mut self, _id: BuildId, _build: &Build, _termination: Termination) {}
    fn explaining(&self) -> bool {
        true
    }
    fn log(&mut self, msg: &str) {
        self.lines.push(msg.to_owned());
    }
}
