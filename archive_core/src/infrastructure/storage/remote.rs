// /////////////////////////////////////////////////////////////////////////////
// Archive Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Remote/removable-media StorageBackend stubs (§4.10)
//!
//! Concrete network and optical-media integrations are out of scope as
//! production code (§1) — these document the handshake each transport would
//! need, in the original's own division of labor (`storage_scp.c`,
//! `storage_sftp.c`, `storage_device.c`, `storage_optical.c`), and fail every
//! operation beyond construction the same way the teacher's compression
//! adapter reports `"LZ4 not yet implemented"` for an algorithm it declares
//! but never wired up.

use archive_core_domain::repositories::{ReadStream, StorageBackend, WriteStream};
use archive_core_domain::ArchiveError;
use async_trait::async_trait;

fn unimplemented(transport: &str) -> ArchiveError {
    ArchiveError::backend_fail(format!("{transport} backend: not yet implemented"))
}

/// SCP transport: the original opens an SSH session, authenticates
/// (password or key), and streams file contents over an `SCP_SEND`/
/// `SCP_RECV` channel via `libssh2`. A part name becomes a remote path
/// under `remote_root`.
pub struct ScpBackend {
    #[allow(dead_code)]
    host: String,
    #[allow(dead_code)]
    remote_root: String,
}

impl ScpBackend {
    pub fn new(host: impl Into<String>, remote_root: impl Into<String>) -> Self {
        Self { host: host.into(), remote_root: remote_root.into() }
    }
}

#[async_trait]
impl StorageBackend for ScpBackend {
    async fn create(&self, _name: &str) -> Result<Box<dyn WriteStream>, ArchiveError> {
        Err(unimplemented("scp"))
    }
    async fn open(&self, _name: &str) -> Result<Box<dyn ReadStream>, ArchiveError> {
        Err(unimplemented("scp"))
    }
    async fn exists(&self, _name: &str) -> Result<bool, ArchiveError> {
        Err(unimplemented("scp"))
    }
    async fn delete(&self, _name: &str) -> Result<(), ArchiveError> {
        Err(unimplemented("scp"))
    }
    async fn rename(&self, _from: &str, _to: &str) -> Result<(), ArchiveError> {
        Err(unimplemented("scp"))
    }
    async fn list(&self, _pattern: &str) -> Result<Vec<String>, ArchiveError> {
        Err(unimplemented("scp"))
    }
}

/// SFTP transport: like SCP but over the `libssh2_sftp` subsystem, which
/// gives directory listing and rename for free instead of needing a shell
/// round-trip — the reason the original keeps it a separate source file
/// from plain SCP.
pub struct SftpBackend {
    #[allow(dead_code)]
    host: String,
    #[allow(dead_code)]
    remote_root: String,
}

impl SftpBackend {
    pub fn new(host: impl Into<String>, remote_root: impl Into<String>) -> Self {
        Self { host: host.into(), remote_root: remote_root.into() }
    }
}

#[async_trait]
impl StorageBackend for SftpBackend {
    async fn create(&self, _name: &str) -> Result<Box<dyn WriteStream>, ArchiveError> {
        Err(unimplemented("sftp"))
    }
    async fn open(&self, _name: &str) -> Result<Box<dyn ReadStream>, ArchiveError> {
        Err(unimplemented("sftp"))
    }
    async fn exists(&self, _name: &str) -> Result<bool, ArchiveError> {
        Err(unimplemented("sftp"))
    }
    async fn delete(&self, _name: &str) -> Result<(), ArchiveError> {
        Err(unimplemented("sftp"))
    }
    async fn rename(&self, _from: &str, _to: &str) -> Result<(), ArchiveError> {
        Err(unimplemented("sftp"))
    }
    async fn list(&self, _pattern: &str) -> Result<Vec<String>, ArchiveError> {
        Err(unimplemented("sftp"))
    }
}

/// FTP/WebDAV transport: a `libcurl`-style request per operation (`STOR`/
/// `RETR` for FTP, `PUT`/`GET`/`PROPFIND` for WebDAV) rather than one
/// persistent session — grouped together since both would share the same
/// request-per-call client in this crate's design.
pub struct HttpLikeBackend {
    #[allow(dead_code)]
    base_url: String,
}

impl HttpLikeBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into() }
    }
}

#[async_trait]
impl StorageBackend for HttpLikeBackend {
    async fn create(&self, _name: &str) -> Result<Box<dyn WriteStream>, ArchiveError> {
        Err(unimplemented("ftp/webdav"))
    }
    async fn open(&self, _name: &str) -> Result<Box<dyn ReadStream>, ArchiveError> {
        Err(unimplemented("ftp/webdav"))
    }
    async fn exists(&self, _name: &str) -> Result<bool, ArchiveError> {
        Err(unimplemented("ftp/webdav"))
    }
    async fn delete(&self, _name: &str) -> Result<(), ArchiveError> {
        Err(unimplemented("ftp/webdav"))
    }
    async fn rename(&self, _from: &str, _to: &str) -> Result<(), ArchiveError> {
        Err(unimplemented("ftp/webdav"))
    }
    async fn list(&self, _pattern: &str) -> Result<Vec<String>, ArchiveError> {
        Err(unimplemented("ftp/webdav"))
    }
}

/// Optical-drive/device transport: the original burns an ISO9660 image built
/// from staged part files rather than streaming parts individually — a
/// `create`/`open` per part name doesn't map onto "burn one image", so this
/// device backend only documents the mismatch and fails (VolumeManager, not
/// StorageBackend, is where the image-build/burn command sequence of §4.6
/// actually lives).
pub struct OpticalDeviceBackend {
    #[allow(dead_code)]
    device_path: String,
}

impl OpticalDeviceBackend {
    pub fn new(device_path: impl Into<String>) -> Self {
        Self { device_path: device_path.into() }
    }
}

#[async_trait]
impl StorageBackend for OpticalDeviceBackend {
    async fn create(&self, _name: &str) -> Result<Box<dyn WriteStream>, ArchiveError> {
        Err(unimplemented("optical"))
    }
    async fn open(&self, _name: &str) -> Result<Box<dyn ReadStream>, ArchiveError> {
        Err(unimplemented("optical"))
    }
    async fn exists(&self, _name: &str) -> Result<bool, ArchiveError> {
        Err(unimplemented("optical"))
    }
    async fn delete(&self, _name: &str) -> Result<(), ArchiveError> {
        Err(unimplemented("optical"))
    }
    async fn rename(&self, _from: &str, _to: &str) -> Result<(), ArchiveError> {
        Err(unimplemented("optical"))
    }
    async fn list(&self, _pattern: &str) -> Result<Vec<String>, ArchiveError> {
        Err(unimplemented("optical"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stubs_fail_every_operation_beyond_construction() {
        let scp = ScpBackend::new("example.org", "/backups");
        assert!(scp.exists("base.bar").await.is_err());

        let sftp = SftpBackend::new("example.org", "/backups");
        assert!(sftp.list("*.bar").await.is_err());

        let http = HttpLikeBackend::new("https://example.org/dav");
        assert!(http.create("base.bar").await.is_err());

        let optical = OpticalDeviceBackend::new("/dev/sr0");
        assert!(optical.open("base.bar").await.is_err());
    }
}
