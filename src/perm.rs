//! Ownership and mode information for directory listings and SITE CHMOD.

use std::{fmt::Debug, io};

/// A `Perm` supplies the owner, group and mode bits shown in LIST and MLSD
/// output and applies SITE CHMOD requests.
///
/// Paths handed to a `Perm` are the same sandboxed virtual paths the
/// [`Driver`](crate::driver::Driver) sees.
pub trait Perm: Send + Sync + Debug {
    /// Returns the owner shown for the path.
    fn get_owner(&self, path: &str) -> io::Result<String>;
    /// Returns the group shown for the path.
    fn get_group(&self, path: &str) -> io::Result<String>;
    /// Returns the unix mode bits shown for the path.
    fn get_mode(&self, path: &str) -> io::Result<u32>;
    /// Changes the owner of the path.
    fn ch_owner(&self, path: &str, owner: &str) -> io::Result<()>;
    /// Changes the group of the path.
    fn ch_group(&self, path: &str, group: &str) -> io::Result<()>;
    /// Changes the mode bits of the path.
    fn ch_mode(&self, path: &str, mode: u32) -> io::Result<()>;
}

/// A `Perm` that reports the same owner, group and mode for every path and
/// accepts (but ignores) changes.
#[derive(Debug, Clone)]
pub struct SimplePerm {
    owner: String,
    group: String,
}

impl SimplePerm {
    /// Creates a provider reporting the given owner and group everywhere.
    pub fn new(owner: impl Into<String>, group: impl Into<String>) -> Self {
        SimplePerm {
            owner: owner.into(),
            group: group.into(),
        }
    }
}

impl Perm for SimplePerm {
    fn get_owner(&self, _path: &str) -> io::Result<String> {
        Ok(self.owner.clone())
    }

    fn get_group(&self, _path: &str) -> io::Result<String> {
        Ok(self.group.clone())
    }

    fn get_mode(&self, _path: &str) -> io::Result<u32> {
        Ok(0o755)
    }

    fn ch_owner(&self, _path: &str, _owner: &str) -> io::Result<()> {
        Ok(())
    }

    fn ch_group(&self, _path: &str, _group: &str) -> io::Result<()> {
        Ok(())
    }

    fn ch_mode(&self, _path: &str, _mode: u32) -> io::Result<()> {
        Ok(())
    }
}
