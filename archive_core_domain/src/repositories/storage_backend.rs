// /////////////////////////////////////////////////////////////////////////////
// Archive Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # StorageBackend port
//!
//! The core never interprets a part `name` beyond the `base.<NNN>.bar`
//! convention (§6). Streams are half-duplex: a `WriteStream` only writes, a
//! `ReadStream` only reads and may `seek` — PartScheduler opens exactly one
//! stream at a time per part.

use crate::ArchiveError;
use async_trait::async_trait;

/// A write-only, append-positional byte sink for one part.
#[async_trait]
pub trait WriteStream: Send + Sync {
    async fn write_all(&mut self, buf: &[u8]) -> Result<(), ArchiveError>;

    /// Current write offset, used by ChunkIO to back-patch chunk sizes on
    /// seekable sinks.
    async fn tell(&mut self) -> Result<u64, ArchiveError>;

    /// Whether this stream supports `seek`-based back-patching. Non-seekable
    /// sinks (a pipe to an optical burner) require ChunkIO to buffer a
    /// chunk's payload before streaming it, per §4.1.
    fn is_seekable(&self) -> bool;

    async fn flush(&mut self) -> Result<(), ArchiveError>;

    /// Consumes and durably closes the stream.
    async fn close(self: Box<Self>) -> Result<(), ArchiveError>;
}

/// A read-only, seekable byte source for one part.
#[async_trait]
pub trait ReadStream: Send + Sync {
    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, ArchiveError>;

    async fn seek(&mut self, offset: u64) -> Result<(), ArchiveError>;

    async fn tell(&mut self) -> Result<u64, ArchiveError>;

    async fn len(&mut self) -> Result<u64, ArchiveError>;
}

/// The storage abstraction consumed by PartScheduler and ArchiveReader.
///
/// Implementations: a fully-functional local-filesystem backend (the default,
/// exercised by the §8 end-to-end tests), and documented stubs for
/// FTP/SCP/SFTP/WebDAV/optical media (§4.10) that return
/// `ArchiveError::backend_fail` for everything beyond construction.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    async fn create(&self, name: &str) -> Result<Box<dyn WriteStream>, ArchiveError>;

    async fn open(&self, name: &str) -> Result<Box<dyn ReadStream>, ArchiveError>;

    async fn exists(&self, name: &str) -> Result<bool, ArchiveError>;

    async fn delete(&self, name: &str) -> Result<(), ArchiveError>;

    async fn rename(&self, from: &str, to: &str) -> Result<(), ArchiveError>;

    /// Lists part names matching a glob-style pattern.
    async fn list(&self, pattern: &str) -> Result<Vec<String>, ArchiveError>;
}
