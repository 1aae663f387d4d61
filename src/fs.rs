//! File system access, behind a trait so builds can run against memory in tests.

use std::time::UNIX_EPOCH;

/// MTime info gathered for a file.  This also models "file is absent".
/// Derived ordering puts Missing before every Stamp, so an absent file is
/// older than anything.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum MTime {
    Missing,
    /// Modification time in nanoseconds since the Unix epoch.
    Stamp(u64),
}

pub trait FileSystem {
    fn read(&self, path: &str) -> std::io::Result<Vec<u8>>;
    /// stat() an on-disk path, producing its MTime.  Any failure to stat,
    /// not only absence, reads as Missing.
    fn stat(&self, path: &str) -> MTime;
}

#[derive(Default)]
pub struct RealFileSystem {}

impl RealFileSystem {
    pub fn new() -> Self {
        RealFileSystem {}
    }
}

impl FileSystem for RealFileSystem {
    fn read(&self, path: &str) -> std::io::Result<Vec<u8>> {
        std::fs::read(path)
    }

    fn stat(&self, path: &str) -> MTime {
        let modified = match std::fs::metadata(path).and_then(|meta| meta.modified()) {
            Ok(t) => t,
            Err(_) => return MTime::Missing,
        };
        // Files stamped before 1970 still exist; clamp them rather than call them missing.
        let nanos = modified
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0);
        MTime::Stamp(nanos)
    }
}
