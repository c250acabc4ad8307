//! A [`Driver`] that keeps the whole tree in memory. Mostly useful for
//! tests and ephemeral servers.

use async_trait::async_trait;
use std::{
    collections::HashMap,
    io,
    sync::{Mutex, PoisonError},
    time::SystemTime,
};
use tokio::io::{AsyncRead, AsyncReadExt};

use super::{Driver, FileInfo, FileStream, ListDirCallback};
use crate::context::Context;

#[derive(Debug, Clone)]
enum Node {
    Dir { modified: SystemTime },
    File { data: Vec<u8>, modified: SystemTime },
}

/// In-memory file system driver. The tree starts out with an empty root
/// directory.
#[derive(Debug, Default)]
pub struct Memory {
    nodes: Mutex<HashMap<String, Node>>,
}

fn parent_of(path: &str) -> &str {
    match path.rfind('/') {
        Some(0) => "/",
        Some(idx) => &path[..idx],
        None => "/",
    }
}

fn base_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

fn not_found(path: &str) -> io::Error {
    io::Error::new(io::ErrorKind::NotFound, format!("no such file or directory: {}", path))
}

impl Memory {
    /// Creates an empty in-memory tree.
    pub fn new() -> Self {
        Memory::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Node>> {
        self.nodes.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn require_dir(nodes: &HashMap<String, Node>, path: &str) -> io::Result<()> {
        if path == "/" {
            return Ok(());
        }
        match nodes.get(path) {
            Some(Node::Dir { .. }) => Ok(()),
            Some(Node::File { .. }) => Err(io::Error::new(io::ErrorKind::InvalidInput, format!("not a directory: {}", path))),
            None => Err(not_found(path)),
        }
    }
}

struct MemFileInfo {
    name: String,
    size: u64,
    dir: bool,
    modified: SystemTime,
}

impl MemFileInfo {
    fn new(path: &str, node: &Node) -> Self {
        match node {
            Node::Dir { modified } => MemFileInfo {
                name: base_name(path).to_string(),
                size: 0,
                dir: true,
                modified: *modified,
            },
            Node::File { data, modified } => MemFileInfo {
                name: base_name(path).to_string(),
                size: data.len() as u64,
                dir: false,
                modified: *modified,
            },
        }
    }
}

impl FileInfo for MemFileInfo {
    fn name(&self) -> &str {
        &self.name
    }

    fn size(&self) -> u64 {
        self.size
    }

    fn is_dir(&self) -> bool {
        self.dir
    }

    fn modified(&self) -> SystemTime {
        self.modified
    }
}

#[async_trait]
impl Driver for Memory {
    async fn stat(&self, _ctx: &Context, path: &str) -> io::Result<Box<dyn FileInfo>> {
        let nodes = self.lock();
        if path == "/" {
            return Ok(Box::new(MemFileInfo {
                name: "/".to_string(),
                size: 0,
                dir: true,
                modified: SystemTime::UNIX_EPOCH,
            }));
        }
        let node = nodes.get(path).ok_or_else(|| not_found(path))?;
        Ok(Box::new(MemFileInfo::new(path, node)))
    }

    async fn list_dir(&self, _ctx: &Context, path: &str, cb: ListDirCallback<'_>) -> io::Result<()> {
        let entries: Vec<MemFileInfo> = {
            let nodes = self.lock();
            Self::require_dir(&nodes, path)?;
            let mut entries: Vec<(&String, &Node)> = nodes.iter().filter(|(p, _)| parent_of(p) == path && p.as_str() != "/").collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            entries.into_iter().map(|(p, n)| MemFileInfo::new(p, n)).collect()
        };
        for entry in &entries {
            cb(entry)?;
        }
        Ok(())
    }

    async fn delete_dir(&self, _ctx: &Context, path: &str) -> io::Result<()> {
        let mut nodes = self.lock();
        Self::require_dir(&nodes, path)?;
        if path == "/" {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "cannot remove the root directory"));
        }
        let prefix = format!("{}/", path);
        nodes.retain(|p, _| p.as_str() != path && !p.starts_with(&prefix));
        Ok(())
    }

    async fn delete_file(&self, _ctx: &Context, path: &str) -> io::Result<()> {
        let mut nodes = self.lock();
        match nodes.get(path) {
            Some(Node::File { .. }) => {
                nodes.remove(path);
                Ok(())
            }
            Some(Node::Dir { .. }) => Err(io::Error::new(io::ErrorKind::InvalidInput, format!("is a directory: {}", path))),
            None => Err(not_found(path)),
        }
    }

    async fn rename(&self, _ctx: &Context, from: &str, to: &str) -> io::Result<()> {
        let mut nodes = self.lock();
        let node = nodes.remove(from).ok_or_else(|| not_found(from))?;
        if matches!(node, Node::Dir { .. }) {
            let prefix = format!("{}/", from);
            let children: Vec<String> = nodes.keys().filter(|p| p.starts_with(&prefix)).cloned().collect();
            for child in children {
                if let Some(n) = nodes.remove(&child) {
                    let renamed = format!("{}{}", to, &child[from.len()..]);
                    nodes.insert(renamed, n);
                }
            }
        }
        nodes.insert(to.to_string(), node);
        Ok(())
    }

    async fn make_dir(&self, _ctx: &Context, path: &str) -> io::Result<()> {
        let mut nodes = self.lock();
        if path == "/" {
            return Ok(());
        }
        // Create missing intermediate directories as well, mirroring the
        // on-disk driver.
        let mut partial = String::new();
        for segment in path.trim_matches('/').split('/') {
            partial.push('/');
            partial.push_str(segment);
            match nodes.get(&partial) {
                Some(Node::Dir { .. }) => {}
                Some(Node::File { .. }) => {
                    return Err(io::Error::new(io::ErrorKind::AlreadyExists, format!("not a directory: {}", partial)));
                }
                None => {
                    nodes.insert(partial.clone(), Node::Dir { modified: SystemTime::now() });
                }
            }
        }
        Ok(())
    }

    async fn get_file(&self, _ctx: &Context, path: &str, offset: i64) -> io::Result<(i64, FileStream)> {
        let offset = offset.max(0) as usize;
        let nodes = self.lock();
        match nodes.get(path) {
            Some(Node::File { data, .. }) => {
                if offset > data.len() {
                    return Err(io::Error::new(io::ErrorKind::InvalidInput, format!("offset {} beyond end of file", offset)));
                }
                let tail = data[offset..].to_vec();
                let remaining = tail.len() as i64;
                Ok((remaining, Box::new(std::io::Cursor::new(tail))))
            }
            Some(Node::Dir { .. }) => Err(io::Error::new(io::ErrorKind::InvalidInput, format!("is a directory: {}", path))),
            None => Err(not_found(path)),
        }
    }

    async fn put_file(&self, _ctx: &Context, path: &str, data: &mut (dyn AsyncRead + Send + Unpin), offset: i64) -> io::Result<i64> {
        let mut incoming = Vec::new();
        data.read_to_end(&mut incoming).await?;
        let written = incoming.len() as i64;

        let mut nodes = self.lock();
        Self::require_dir(&nodes, parent_of(path))?;
        let existing_len = match nodes.get(path) {
            Some(Node::Dir { .. }) => {
                return Err(io::Error::new(io::ErrorKind::AlreadyExists, format!("is a directory: {}", path)));
            }
            Some(Node::File { data, .. }) => Some(data.len()),
            None => None,
        };

        match (existing_len, offset) {
            // A restart offset against a file that does not exist yet means
            // a plain store.
            (None, _) | (Some(_), -1) => {
                nodes.insert(
                    path.to_string(),
                    Node::File {
                        data: incoming,
                        modified: SystemTime::now(),
                    },
                );
            }
            (Some(len), offset) => {
                let offset = offset as usize;
                if offset > len {
                    return Err(io::Error::new(io::ErrorKind::InvalidInput, format!("offset {} beyond end of file", offset)));
                }
                if let Some(Node::File { data, modified }) = nodes.get_mut(path) {
                    data.truncate(offset);
                    data.extend_from_slice(&incoming);
                    *modified = SystemTime::now();
                }
            }
        }
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::test_context;
    use pretty_assertions::assert_eq;

    async fn read_all(driver: &Memory, path: &str, offset: i64) -> Vec<u8> {
        let ctx = test_context("RETR", path);
        let (_, mut stream) = driver.get_file(&ctx, path, offset).await.unwrap();
        let mut out = Vec::new();
        tokio::io::copy(&mut stream, &mut out).await.unwrap();
        out
    }

    #[tokio::test]
    async fn store_retrieve_and_restart() {
        let driver = Memory::new();
        let ctx = test_context("STOR", "");

        let mut payload: &[u8] = b"test";
        assert_eq!(driver.put_file(&ctx, "/server_test.go", &mut payload, -1).await.unwrap(), 4);
        assert_eq!(read_all(&driver, "/server_test.go", 0).await, b"test");
        assert_eq!(read_all(&driver, "/server_test.go", 2).await, b"st");

        // Rewrite from offset 2.
        let mut patch: &[u8] = b"xty";
        driver.put_file(&ctx, "/server_test.go", &mut patch, 2).await.unwrap();
        assert_eq!(read_all(&driver, "/server_test.go", 0).await, b"texty");
    }

    #[tokio::test]
    async fn directories_nest_and_rename() {
        let driver = Memory::new();
        let ctx = test_context("MKD", "");

        driver.make_dir(&ctx, "/a/b").await.unwrap();
        let mut payload: &[u8] = b"1";
        driver.put_file(&ctx, "/a/b/f.txt", &mut payload, -1).await.unwrap();

        driver.rename(&ctx, "/a/b", "/a/c").await.unwrap();
        assert!(driver.stat(&ctx, "/a/c/f.txt").await.is_ok());
        assert!(driver.stat(&ctx, "/a/b/f.txt").await.is_err());

        let mut names = Vec::new();
        driver
            .list_dir(&ctx, "/a", &mut |info| {
                names.push((info.name().to_string(), info.is_dir()));
                Ok(())
            })
            .await
            .unwrap();
        assert_eq!(names, [("c".to_string(), true)]);

        driver.delete_dir(&ctx, "/a").await.unwrap();
        assert!(driver.stat(&ctx, "/a/c").await.is_err());
    }

    #[tokio::test]
    async fn delete_file_rejects_directories() {
        let driver = Memory::new();
        let ctx = test_context("DELE", "");
        driver.make_dir(&ctx, "/dir").await.unwrap();
        assert!(driver.delete_file(&ctx, "/dir").await.is_err());
        assert!(driver.delete_file(&ctx, "/missing").await.is_err());
    }
}
