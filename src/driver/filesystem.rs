//! A [`Driver`] that keeps its files inside a root directory on local disk,
//! like a traditional FTP server.

use async_trait::async_trait;
use std::{io, path::PathBuf, time::SystemTime};
use tokio::io::{AsyncRead, AsyncSeekExt, SeekFrom};

use super::{Driver, FileInfo, FileStream, ListDirCallback};
use crate::context::Context;

/// On-disk file system driver rooted at a directory.
///
/// The virtual path `/hello.txt` maps to `<root>/hello.txt`. Because the
/// engine hands the driver normalized absolute paths only, the mapping
/// cannot escape the root.
#[derive(Debug)]
pub struct Filesystem {
    root: PathBuf,
}

impl Filesystem {
    /// Creates a driver storing everything below `root`. The directory must
    /// already exist.
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Filesystem { root: root.into() }
    }

    fn full_path(&self, path: &str) -> PathBuf {
        self.root.join(path.trim_start_matches('/'))
    }
}

struct DiskFileInfo {
    name: String,
    meta: std::fs::Metadata,
}

impl FileInfo for DiskFileInfo {
    fn name(&self) -> &str {
        &self.name
    }

    fn size(&self) -> u64 {
        self.meta.len()
    }

    fn is_dir(&self) -> bool {
        self.meta.is_dir()
    }

    fn modified(&self) -> SystemTime {
        self.meta.modified().unwrap_or(SystemTime::UNIX_EPOCH)
    }
}

fn base_name(path: &str) -> String {
    match path.rsplit('/').next() {
        Some("") | None => "/".to_string(),
        Some(name) => name.to_string(),
    }
}

#[async_trait]
impl Driver for Filesystem {
    async fn stat(&self, _ctx: &Context, path: &str) -> io::Result<Box<dyn FileInfo>> {
        let meta = tokio::fs::metadata(self.full_path(path)).await?;
        Ok(Box::new(DiskFileInfo {
            name: base_name(path),
            meta,
        }))
    }

    async fn list_dir(&self, _ctx: &Context, path: &str, cb: ListDirCallback<'_>) -> io::Result<()> {
        let mut rd = tokio::fs::read_dir(self.full_path(path)).await?;
        let mut entries: Vec<DiskFileInfo> = Vec::new();
        while let Some(entry) = rd.next_entry().await? {
            let meta = entry.metadata().await?;
            entries.push(DiskFileInfo {
                name: entry.file_name().to_string_lossy().into_owned(),
                meta,
            });
        }
        // Directory read order is platform dependent; listings are sorted so
        // clients see a stable view.
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        for entry in &entries {
            cb(entry)?;
        }
        Ok(())
    }

    async fn delete_dir(&self, _ctx: &Context, path: &str) -> io::Result<()> {
        tokio::fs::remove_dir_all(self.full_path(path)).await
    }

    async fn delete_file(&self, _ctx: &Context, path: &str) -> io::Result<()> {
        tokio::fs::remove_file(self.full_path(path)).await
    }

    async fn rename(&self, _ctx: &Context, from: &str, to: &str) -> io::Result<()> {
        tokio::fs::rename(self.full_path(from), self.full_path(to)).await
    }

    async fn make_dir(&self, _ctx: &Context, path: &str) -> io::Result<()> {
        tokio::fs::create_dir_all(self.full_path(path)).await
    }

    async fn get_file(&self, _ctx: &Context, path: &str, offset: i64) -> io::Result<(i64, FileStream)> {
        let offset = offset.max(0) as u64;
        let mut file = tokio::fs::File::open(self.full_path(path)).await?;
        let len = file.metadata().await?.len();
        if offset > len {
            return Err(io::Error::new(io::ErrorKind::InvalidInput, format!("offset {} beyond end of file", offset)));
        }
        file.seek(SeekFrom::Start(offset)).await?;
        Ok(((len - offset) as i64, Box::new(file)))
    }

    async fn put_file(&self, _ctx: &Context, path: &str, data: &mut (dyn AsyncRead + Send + Unpin), offset: i64) -> io::Result<i64> {
        let full_path = self.full_path(path);
        if let Ok(meta) = tokio::fs::metadata(&full_path).await {
            if meta.is_dir() {
                return Err(io::Error::new(io::ErrorKind::AlreadyExists, format!("{} is a directory", path)));
            }
        }

        let mut file = if offset < 0 {
            tokio::fs::File::create(&full_path).await?
        } else {
            let mut file = tokio::fs::OpenOptions::new().write(true).create(true).open(&full_path).await?;
            let len = file.metadata().await?.len();
            if offset as u64 > len {
                return Err(io::Error::new(io::ErrorKind::InvalidInput, format!("offset {} beyond end of file", offset)));
            }
            file.seek(SeekFrom::Start(offset as u64)).await?;
            file
        };

        let written = tokio::io::copy(data, &mut file).await?;
        Ok(written as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::test_context;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn put_get_roundtrip_with_offset() {
        let dir = tempfile::tempdir().unwrap();
        let driver = Filesystem::new(dir.path());
        let ctx = test_context("STOR", "file.bin");

        let mut payload: &[u8] = b"0123456789";
        let written = driver.put_file(&ctx, "/file.bin", &mut payload, -1).await.unwrap();
        assert_eq!(written, 10);

        let (remaining, mut stream) = driver.get_file(&ctx, "/file.bin", 4).await.unwrap();
        assert_eq!(remaining, 6);
        let mut out = Vec::new();
        tokio::io::copy(&mut stream, &mut out).await.unwrap();
        assert_eq!(out, b"456789");

        // Overwrite in the middle.
        let mut patch: &[u8] = b"xx";
        driver.put_file(&ctx, "/file.bin", &mut patch, 2).await.unwrap();
        let (_, mut stream) = driver.get_file(&ctx, "/file.bin", 0).await.unwrap();
        let mut out = Vec::new();
        tokio::io::copy(&mut stream, &mut out).await.unwrap();
        assert_eq!(out, b"01xx456789");
    }

    #[tokio::test]
    async fn listings_are_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let driver = Filesystem::new(dir.path());
        let ctx = test_context("LIST", "");

        for name in ["b.txt", "a.txt", "c.txt"] {
            let mut data: &[u8] = b"x";
            driver.put_file(&ctx, &format!("/{}", name), &mut data, -1).await.unwrap();
        }
        driver.make_dir(&ctx, "/sub").await.unwrap();

        let mut names = Vec::new();
        driver
            .list_dir(&ctx, "/", &mut |info| {
                names.push(info.name().to_string());
                Ok(())
            })
            .await
            .unwrap();
        assert_eq!(names, ["a.txt", "b.txt", "c.txt", "sub"]);
    }
}
