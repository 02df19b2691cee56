// /////////////////////////////////////////////////////////////////////////////
// Archive Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Local filesystem StorageBackend
//!
//! The default, fully-implemented `StorageBackend` (§4.10): archive parts are
//! plain files in a target directory, named per the `base.<NNN>.bar`
//! convention PartNumber already renders. This is the backend exercised by
//! the end-to-end tests of §8.

use archive_core_domain::repositories::{ReadStream, StorageBackend, WriteStream};
use archive_core_domain::ArchiveError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt};

fn io_err(e: std::io::Error) -> ArchiveError {
    ArchiveError::backend_fail(e.to_string())
}

/// Translates the same `*`/`?` dialect `compress_exclude_patterns` and the
/// SQL `IndexStore` use, against plain filenames rather than a LIKE query.
fn glob_match(pattern: &str, text: &str) -> bool {
    fn matches(p: &[char], t: &[char]) -> bool {
        match (p.first(), t.first()) {
            (None, None) => true,
            (Some('*'), _) => matches(&p[1..], t) || (!t.is_empty() && matches(p, &t[1..])),
            (Some('?'), Some(_)) => matches(&p[1..], &t[1..]),
            (Some(pc), Some(tc)) if pc == tc => matches(&p[1..], &t[1..]),
            _ => false,
        }
    }
    let p: Vec<char> = pattern.chars().collect();
    let t: Vec<char> = text.chars().collect();
    matches(&p, &t)
}

pub struct LocalFileBackend {
    base_dir: PathBuf,
}

impl LocalFileBackend {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self { base_dir: base_dir.into() }
    }

    fn path_for(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }
}

struct LocalWriteStream {
    file: File,
    position: u64,
}

#[async_trait]
impl WriteStream for LocalWriteStream {
    async fn write_all(&mut self, buf: &[u8]) -> Result<(), ArchiveError> {
        self.file.write_all(buf).await.map_err(io_err)?;
        self.position += buf.len() as u64;
        Ok(())
    }

    async fn tell(&mut self) -> Result<u64, ArchiveError> {
        Ok(self.position)
    }

    fn is_seekable(&self) -> bool {
        true
    }

    async fn flush(&mut self) -> Result<(), ArchiveError> {
        self.file.flush().await.map_err(io_err)
    }

    async fn close(mut self: Box<Self>) -> Result<(), ArchiveError> {
        self.file.flush().await.map_err(io_err)?;
        self.file.sync_all().await.map_err(io_err)
    }
}

struct LocalReadStream {
    file: File,
    len: u64,
}

#[async_trait]
impl ReadStream for LocalReadStream {
    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, ArchiveError> {
        self.file.read(buf).await.map_err(io_err)
    }

    async fn seek(&mut self, offset: u64) -> Result<(), ArchiveError> {
        self.file.seek(std::io::SeekFrom::Start(offset)).await.map_err(io_err)?;
        Ok(())
    }

    async fn tell(&mut self) -> Result<u64, ArchiveError> {
        self.file.stream_position().await.map_err(io_err)
    }

    async fn len(&mut self) -> Result<u64, ArchiveError> {
        Ok(self.len)
    }
}

#[async_trait]
impl StorageBackend for LocalFileBackend {
    async fn create(&self, name: &str) -> Result<Box<dyn WriteStream>, ArchiveError> {
        if let Some(parent) = self.path_for(name).parent() {
            tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
        }
        let file = File::create(self.path_for(name)).await.map_err(io_err)?;
        Ok(Box::new(LocalWriteStream { file, position: 0 }))
    }

    async fn open(&self, name: &str) -> Result<Box<dyn ReadStream>, ArchiveError> {
        let file = File::open(self.path_for(name)).await.map_err(io_err)?;
        let len = file.metadata().await.map_err(io_err)?.len();
        Ok(Box::new(LocalReadStream { file, len }))
    }

    async fn exists(&self, name: &str) -> Result<bool, ArchiveError> {
        Ok(tokio::fs::metadata(self.path_for(name)).await.is_ok())
    }

    async fn delete(&self, name: &str) -> Result<(), ArchiveError> {
        tokio::fs::remove_file(self.path_for(name)).await.map_err(io_err)
    }

    async fn rename(&self, from: &str, to: &str) -> Result<(), ArchiveError> {
        tokio::fs::rename(self.path_for(from), self.path_for(to)).await.map_err(io_err)
    }

    async fn list(&self, pattern: &str) -> Result<Vec<String>, ArchiveError> {
        let mut out = Vec::new();
        let mut dir = match tokio::fs::read_dir(&self.base_dir).await {
            Ok(d) => d,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(out),
            Err(e) => return Err(io_err(e)),
        };
        while let Some(entry) = dir.next_entry().await.map_err(io_err)? {
            if let Some(name) = entry.file_name().to_str() {
                if glob_match(pattern, name) {
                    out.push(name.to_string());
                }
            }
        }
        out.sort();
        Ok(out)
    }
}

/// Ensures `base_dir` exists before wrapping it in a backend — convenience
/// for CLI wiring where the target directory may not exist yet.
pub async fn local_backend(base_dir: impl AsRef<Path>) -> Result<LocalFileBackend, ArchiveError> {
    tokio::fs::create_dir_all(&base_dir).await.map_err(io_err)?;
    Ok(LocalFileBackend::new(base_dir.as_ref().to_path_buf()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glob_match_handles_star_and_question_mark() {
        assert!(glob_match("base.*.bar", "base.001.bar"));
        assert!(glob_match("base.00?.bar", "base.007.bar"));
        assert!(!glob_match("base.*.bar", "other.bar"));
    }

    #[tokio::test]
    async fn writes_then_reads_back_a_part() {
        let dir = tempfile::tempdir().unwrap();
        let backend = local_backend(dir.path()).await.unwrap();

        let mut w = backend.create("base.bar").await.unwrap();
        w.write_all(b"hello").await.unwrap();
        assert_eq!(w.tell().await.unwrap(), 5);
        w.close().await.unwrap();

        assert!(backend.exists("base.bar").await.unwrap());

        let mut r = backend.open("base.bar").await.unwrap();
        assert_eq!(r.len().await.unwrap(), 5);
        let mut buf = vec![0u8; 5];
        let n = r.read(&mut buf).await.unwrap();
        assert_eq!(&buf[..n], b"hello");
    }

    #[tokio::test]
    async fn list_matches_glob_and_rename_and_delete_work() {
        let dir = tempfile::tempdir().unwrap();
        let backend = local_backend(dir.path()).await.unwrap();

        backend.create("base.001.bar").await.unwrap().close().await.unwrap();
        backend.create("base.002.bar").await.unwrap().close().await.unwrap();
        backend.create("other.bar").await.unwrap().close().await.unwrap();

        let mut parts = backend.list("base.*.bar").await.unwrap();
        parts.sort();
        assert_eq!(parts, vec!["base.001.bar", "base.002.bar"]);

        backend.rename("base.002.bar", "base.003.bar").await.unwrap();
        assert!(backend.exists("base.003.bar").await.unwrap());
        assert!(!backend.exists("base.002.bar").await.unwrap());

        backend.delete("base.003.bar").await.unwrap();
        assert!(!backend.exists("base.003.bar").await.unwrap());
    }
}
