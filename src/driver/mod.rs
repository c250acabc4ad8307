//! Defines the service provider interface for file system back-ends.
//!
//! A [`Driver`] receives virtual absolute paths that have already been
//! normalized by the engine's path sandbox. The engine guarantees only
//! syntactic containment below `/`; a driver that maps paths onto a host
//! file system must still anchor them below its own root.

mod filesystem;
mod memory;

pub use filesystem::Filesystem;
pub use memory::Memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::{
    fmt::{Debug, Write as _},
    io,
    time::SystemTime,
};
use tokio::io::AsyncRead;

use crate::context::Context;

/// Metadata of one entry as reported by a [`Driver`].
pub trait FileInfo: Send + Sync {
    /// The base name of the entry.
    fn name(&self) -> &str;
    /// The size of the entry in bytes.
    fn size(&self) -> u64;
    /// True when the entry is a directory.
    fn is_dir(&self) -> bool;
    /// The last modification time of the entry.
    fn modified(&self) -> SystemTime;
}

/// Callback invoked by [`Driver::list_dir`] once per directory entry.
pub type ListDirCallback<'a> = &'a mut (dyn FnMut(&dyn FileInfo) -> io::Result<()> + Send);

/// A byte stream delivering file contents.
pub type FileStream = Box<dyn AsyncRead + Send + Sync + Unpin>;

/// The pluggable file system consumed by the command handlers.
///
/// Implementations must be safe for concurrent calls from many sessions;
/// the engine performs no serialization across sessions.
#[async_trait]
pub trait Driver: Send + Sync + Debug {
    /// Returns the metadata of the entry at `path`.
    async fn stat(&self, ctx: &Context, path: &str) -> io::Result<Box<dyn FileInfo>>;

    /// Invokes `cb` for every entry directly inside the directory at `path`.
    async fn list_dir(&self, ctx: &Context, path: &str, cb: ListDirCallback<'_>) -> io::Result<()>;

    /// Removes the directory at `path`.
    async fn delete_dir(&self, ctx: &Context, path: &str) -> io::Result<()>;

    /// Removes the file at `path`.
    async fn delete_file(&self, ctx: &Context, path: &str) -> io::Result<()>;

    /// Moves the entry at `from` to `to`.
    async fn rename(&self, ctx: &Context, from: &str, to: &str) -> io::Result<()>;

    /// Creates the directory at `path`.
    async fn make_dir(&self, ctx: &Context, path: &str) -> io::Result<()>;

    /// Opens the file at `path` for reading, positioned at `offset`.
    /// Returns the number of bytes remaining from that position and the
    /// stream delivering them.
    async fn get_file(&self, ctx: &Context, path: &str, offset: i64) -> io::Result<(i64, FileStream)>;

    /// Writes `data` to the file at `path` and returns the number of bytes
    /// written. An `offset` of `-1` truncates the file first; an offset of
    /// zero or more seeks to that position and writes from there.
    async fn put_file(&self, ctx: &Context, path: &str, data: &mut (dyn AsyncRead + Send + Unpin), offset: i64) -> io::Result<i64>;
}

/// Renders unix mode bits the way `ls -l` does, e.g. `rwxr-xr-x`.
pub(crate) fn format_mode(mode: u32) -> String {
    let mut out = String::with_capacity(9);
    for shift in [6u32, 3, 0] {
        let bits = (mode >> shift) & 0o7;
        out.push(if bits & 0o4 != 0 { 'r' } else { '-' });
        out.push(if bits & 0o2 != 0 { 'w' } else { '-' });
        out.push(if bits & 0o1 != 0 { 'x' } else { '-' });
    }
    out
}

/// Formats one LIST line for an entry, in the classic long-listing shape.
pub(crate) fn format_list_line(info: &dyn FileInfo, owner: &str, group: &str, mode: u32) -> String {
    let modified: DateTime<Utc> = info.modified().into();
    let mut line = String::new();
    // The write cannot fail on a String.
    let _ = write!(
        line,
        "{}{} 1 {} {} {:>12} {} {}",
        if info.is_dir() { "d" } else { "-" },
        format_mode(mode),
        owner,
        group,
        info.size(),
        modified.format("%b %d %H:%M"),
        info.name(),
    );
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct Entry {
        name: &'static str,
        size: u64,
        dir: bool,
    }

    impl FileInfo for Entry {
        fn name(&self) -> &str {
            self.name
        }

        fn size(&self) -> u64 {
            self.size
        }

        fn is_dir(&self) -> bool {
            self.dir
        }

        fn modified(&self) -> SystemTime {
            SystemTime::UNIX_EPOCH
        }
    }

    #[test]
    fn mode_renders_like_ls() {
        assert_eq!(format_mode(0o755), "rwxr-xr-x");
        assert_eq!(format_mode(0o644), "rw-r--r--");
        assert_eq!(format_mode(0o000), "---------");
    }

    #[test]
    fn list_line_shape() {
        let entry = Entry {
            name: "hello.txt",
            size: 42,
            dir: false,
        };
        let line = format_list_line(&entry, "ftp", "ftp", 0o644);
        assert_eq!(line, "-rw-r--r-- 1 ftp ftp           42 Jan 01 00:00 hello.txt");

        let dir = Entry {
            name: "src",
            size: 0,
            dir: true,
        };
        let line = format_list_line(&dir, "root", "wheel", 0o755);
        assert!(line.starts_with("drwxr-xr-x 1 root wheel"));
        assert!(line.ends_with(" src"));
    }
}
