// /////////////////////////////////////////////////////////////////////////////
// Archive Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # ArchiveReader
//!
//! Implements §4.8: opens a part, iterates entries with `next_entry`, pulls
//! entry bytes with `read_data`, transparently following `PartScheduler`'s
//! part rotation and rejoining an entry split mid-write across parts.
//!
//! Like `ArchiveWriter`, this buffers a whole part into memory (`Cursor<Vec<u8>>`)
//! rather than streaming chunk-by-chunk off the backend `ReadStream`: parts are
//! bounded by `JobOptions::part_size`/`volume_size`, and `ChunkIO`'s reader side
//! needs `AsyncSeek` for the password-retry rewind described below, which a
//! `Cursor` gives for free.

use std::sync::Arc;
use std::io::Cursor;

use zeroize::Zeroize;

use archive_core_domain::entities::{archive_header, ArchiveHeader, EntryHeader};
use archive_core_domain::repositories::{ReadStream, StorageBackend};
use archive_core_domain::services::password_provider::{PasswordKind, PasswordProvider};
use archive_core_domain::value_objects::{ArchiveSalt, PartNumber};
use archive_core_domain::{ArchiveError, CompressionService, CryptAlgorithm, EncryptionService, EntryKind};

use super::archive_writer::derive_key;
use super::entry_pipeline::{CryptoMaterial, EntryPipelineReader, ReaderCheckpoint};
use crate::infrastructure::chunk_io::PendingChunk;
use crate::infrastructure::metrics::MetricsService;

/// Number of passphrase callback refusals tolerated before giving up
/// (§4.8 "Password pool").
pub const MAX_PASSWORD_REQUESTS: u32 = 3;

type EntryCursor = Cursor<Vec<u8>>;

struct CurrentEntry {
    header: EntryHeader,
    outer: PendingChunk,
    read_size: u64,
}

/// Drives the read side of one archive (§4.8).
pub struct ArchiveReader {
    backend: Arc<dyn StorageBackend>,
    compression: Arc<dyn CompressionService>,
    encryption: Arc<dyn EncryptionService>,
    passwords: Option<Arc<dyn PasswordProvider>>,
    archive_name: String,
    single_part: bool,
    part_number: PartNumber,
    part_len: u64,
    header: ArchiveHeader,
    entries: EntryPipelineReader<EntryCursor>,
    password_pool: Vec<Vec<u8>>,
    crypto: Option<CryptoMaterial>,
    current: Option<CurrentEntry>,
    metrics: Arc<MetricsService>,
}

impl ArchiveReader {
    /// `ArchiveReader::open` (§4.8). `initial_passphrase` seeds the
    /// password pool with the one supplied in the caller's options;
    /// `passwords` is consulted only after the pool (plus any passphrases
    /// already accepted this session) is exhausted. Both may be omitted
    /// for an unencrypted archive or a listing-only, no-key open.
    pub async fn open(
        backend: Arc<dyn StorageBackend>,
        compression: Arc<dyn CompressionService>,
        encryption: Arc<dyn EncryptionService>,
        passwords: Option<Arc<dyn PasswordProvider>>,
        archive_name: impl Into<String>,
        initial_passphrase: Option<Vec<u8>>,
    ) -> Result<Self, ArchiveError> {
        let archive_name = archive_name.into();
        let single_name = PartNumber::FIRST.part_file_name(&archive_name, true);
        let single_part = backend.exists(&single_name).await?;

        let (header, bytes) = Self::load_part(backend.as_ref(), &archive_name, PartNumber::FIRST, single_part).await?;
        header.check_readable()?;

        let part_len = bytes.len() as u64;
        let entries = EntryPipelineReader::new(Cursor::new(bytes), 0, compression.clone(), encryption.clone());

        let mut password_pool = Vec::new();
        if let Some(passphrase) = initial_passphrase {
            password_pool.push(passphrase);
        }

        Ok(Self {
            backend,
            compression,
            encryption,
            passwords,
            archive_name,
            single_part,
            part_number: PartNumber::FIRST,
            part_len,
            header,
            entries,
            password_pool,
            crypto: None,
            current: None,
            metrics: Arc::new(MetricsService::new()?),
        })
    }

    /// The `prometheus` counters for this reader (§10 Ambient Stack):
    /// currently tracks decrypt failures, since reads don't rotate parts or
    /// frame chunks on this side.
    pub fn metrics(&self) -> &MetricsService {
        &self.metrics
    }

    async fn load_part(
        backend: &dyn StorageBackend,
        archive_name: &str,
        part_number: PartNumber,
        single_part: bool,
    ) -> Result<(ArchiveHeader, Vec<u8>), ArchiveError> {
        let name = part_number.part_file_name(archive_name, single_part);
        let mut stream = backend.open(&name).await?;

        let mut bytes = Vec::new();
        let mut buf = [0u8; 64 * 1024];
        loop {
            let n = stream.read(&mut buf).await?;
            if n == 0 {
                break;
            }
            bytes.extend_from_slice(&buf[..n]);
        }

        if bytes.len() < 28 {
            return Err(ArchiveError::chunk_truncated(format!("part '{name}' is shorter than the fixed archive header preamble")));
        }
        if bytes[0..4] != archive_header::MAGIC {
            return Err(ArchiveError::bad_magic(format!("part '{name}' does not start with the archive magic")));
        }
        let version_major = u32::from_be_bytes(bytes[4..8].try_into().expect("checked len"));
        let version_minor = u32::from_be_bytes(bytes[8..12].try_into().expect("checked len"));
        let mut salt_bytes = [0u8; 16];
        salt_bytes.copy_from_slice(&bytes[12..28]);
        let header = ArchiveHeader::from_wire(version_major, version_minor, ArchiveSalt::from_bytes(salt_bytes));

        Ok((header, bytes[28..].to_vec()))
    }

    /// `nextEntry` — §4.8. Advances past whatever entry is current (reading
    /// and discarding the rest of its data if the caller didn't), then reads
    /// the next one. `Ok(None)` at the end of the archive.
    pub async fn next_entry(&mut self) -> Result<Option<&EntryHeader>, ArchiveError> {
        if self.current.is_some() {
            self.skip_entry().await?;
        }

        let checkpoint = self.entries.checkpoint();
        let probe = self.probe_next_entry().await?;
        let (probe_header, probe_outer) = match probe {
            None => {
                self.current = None;
                return Ok(None);
            }
            Some(pair) => pair,
        };

        let needs_key = probe_header.common().crypt_algorithm != CryptAlgorithm::None;
        if !needs_key {
            self.current = Some(CurrentEntry { header: probe_header, outer: probe_outer, read_size: 0 });
            return Ok(self.current.as_ref().map(|c| &c.header));
        }

        if self.crypto.is_none() {
            self.resolve_crypto(checkpoint, probe_header.common().crypt_algorithm).await?;
        }

        let (header, outer) = match self.crypto.clone() {
            Some(crypto) => {
                self.entries.restore(checkpoint).await?;
                self.probe_next_entry_with(Some(&crypto))
                    .await?
                    .ok_or_else(|| ArchiveError::bad_state("entry vanished on password retry"))?
            }
            // No working key resolved at all: fall back to the sentinel-named
            // probe so listing can still proceed (§4.8 "Listing without key").
            None => (probe_header, probe_outer),
        };

        self.current = Some(CurrentEntry { header, outer, read_size: 0 });
        Ok(self.current.as_ref().map(|c| &c.header))
    }

    async fn probe_next_entry(&mut self) -> Result<Option<(EntryHeader, PendingChunk)>, ArchiveError> {
        self.probe_next_entry_with(None).await
    }

    async fn probe_next_entry_with(&mut self, crypto: Option<&CryptoMaterial>) -> Result<Option<(EntryHeader, PendingChunk)>, ArchiveError> {
        let parent_remaining = self.part_len - self.entries.position();
        self.entries.next_entry(parent_remaining, crypto).await
    }

    /// Tries the password pool in order against the entry at `checkpoint`,
    /// promoting the first one that decrypts its name cleanly. Falls back
    /// to `passwords.get_password` up to `MAX_PASSWORD_REQUESTS` times once
    /// the pool is exhausted (§4.8 "Password pool").
    async fn resolve_crypto(&mut self, checkpoint: ReaderCheckpoint, algorithm: CryptAlgorithm) -> Result<(), ArchiveError> {
        let mut refusals = 0u32;
        loop {
            let mut i = 0;
            while i < self.password_pool.len() {
                let passphrase = self.password_pool[i].clone();
                self.entries.restore(checkpoint).await?;
                let key = derive_key(&passphrase, self.header.salt(), algorithm.key_len())?;
                let candidate = CryptoMaterial { algorithm, key, salt: *self.header.salt() };

                match self.probe_next_entry_with(Some(&candidate)).await {
                    Ok(Some(_)) => {
                        if i != 0 {
                            let found = self.password_pool.remove(i);
                            self.password_pool.insert(0, found);
                        }
                        self.crypto = Some(candidate);
                        return Ok(());
                    }
                    Ok(None) => return Ok(()),
                    Err(e) if e.is_crypto_error() => {
                        i += 1;
                        continue;
                    }
                    Err(e) => return Err(e),
                }
            }

            let Some(passwords) = self.passwords.clone() else {
                return Ok(());
            };
            if refusals >= MAX_PASSWORD_REQUESTS {
                return Err(ArchiveError::no_crypt_password(format!("no working passphrase after {refusals} callback attempts")));
            }
            refusals += 1;
            let mut passphrase = passwords.get_password(PasswordKind::ExistingArchive, false, false)?;
            self.password_pool.insert(0, passphrase.clone());
            passphrase.zeroize();
        }
    }

    /// `readData(buf) -> n` — §4.8. Returns `0` once the entry's declared
    /// size has been fully delivered. Follows the entry into the next part
    /// if its data was split mid-write (§4.5/§4.8 "Cross-part reads").
    pub async fn read_data(&mut self, out: &mut Vec<u8>) -> Result<usize, ArchiveError> {
        let (declared_size, compression_algorithm, crypt_algorithm) = {
            let current = self.current.as_ref().ok_or_else(|| ArchiveError::bad_state("read_data with no active entry"))?;
            (current.header.declared_size(), current.header.common().compress_algorithm.clone(), current.header.common().crypt_algorithm)
        };
        if crypt_algorithm != CryptAlgorithm::None && self.crypto.is_none() {
            return Err(ArchiveError::decrypt_fail("no password available to decrypt this entry's data"));
        }
        let crypto = self.crypto.clone();

        let n = {
            let current = self.current.as_mut().expect("checked above");
            read_data_fragment(&mut self.entries, &self.metrics, current, &compression_algorithm, crypto.as_ref(), out).await?
        };
        if n > 0 {
            self.current.as_mut().expect("checked above").read_size += n as u64;
            return Ok(n);
        }

        let still_incomplete = match declared_size {
            Some(declared) => self.current.as_ref().expect("checked above").read_size < declared,
            None => false,
        };
        if !still_incomplete {
            return Ok(0);
        }

        self.continue_into_next_part().await?;
        let n = {
            let current = self.current.as_mut().expect("continue_into_next_part set this");
            read_data_fragment(&mut self.entries, &self.metrics, current, &compression_algorithm, crypto.as_ref(), out).await?
        };
        self.current.as_mut().expect("checked above").read_size += n as u64;
        Ok(n)
    }

    /// Opens the next part in sequence and re-reads the continuation of the
    /// current entry (§4.8 "Cross-part reads"). `ENTRY_INCOMPLETE` if the
    /// next part is missing or doesn't continue the expected entry.
    async fn continue_into_next_part(&mut self) -> Result<(), ArchiveError> {
        let expected_name = self.current.as_ref().expect("caller checked").header.name().to_string();
        let next_number = self.part_number.next();
        let next_name = next_number.part_file_name(&self.archive_name, self.single_part);

        if !self.backend.exists(&next_name).await? {
            return Err(ArchiveError::entry_incomplete(format!(
                "entry '{expected_name}' continues past the last available part ('{next_name}' is missing)"
            )));
        }

        let (header, bytes) = Self::load_part(self.backend.as_ref(), &self.archive_name, next_number, self.single_part).await?;
        if header.salt() != self.header.salt() {
            return Err(ArchiveError::bad_state(format!("part '{next_name}' carries a different archive salt")));
        }

        self.part_number = next_number;
        self.part_len = bytes.len() as u64;
        self.entries = EntryPipelineReader::new(Cursor::new(bytes), 0, self.compression.clone(), self.encryption.clone());

        let crypto = self.crypto.clone();
        let (continuation, outer) = self
            .probe_next_entry_with(crypto.as_ref())
            .await?
            .ok_or_else(|| ArchiveError::entry_incomplete(format!("part '{next_name}' has no continuation entry for '{expected_name}'")))?;

        if continuation.name() != expected_name && continuation.name() != "<encrypted>" {
            return Err(ArchiveError::entry_incomplete(format!(
                "part '{next_name}' continues a different entry ('{}' != '{expected_name}')",
                continuation.name()
            )));
        }

        let current = self.current.as_mut().expect("caller checked");
        current.header = continuation;
        current.outer = outer;
        Ok(())
    }

    /// `skipEntry` — §4.8. Discards whatever is left of the current entry.
    /// When a key is available the remainder is read and discarded through
    /// the normal decrypt/decompress path (correctly following a mid-entry
    /// split, per `read_data`); with no key (§4.8 "Listing without key") the
    /// current part's raw remaining bytes are dropped without attempting to
    /// make sense of them, which does not chase a split entry's continuation
    /// into the next part (documented limitation, DESIGN.md).
    pub async fn skip_entry(&mut self) -> Result<(), ArchiveError> {
        let Some(current) = self.current.as_ref() else {
            return Ok(());
        };
        let needs_key = current.header.common().crypt_algorithm != CryptAlgorithm::None;
        if needs_key && self.crypto.is_none() {
            let current = self.current.as_mut().expect("checked above");
            self.entries.skip_remaining(&mut current.outer).await?;
            self.current = None;
            return Ok(());
        }

        let mut scratch = Vec::new();
        loop {
            scratch.clear();
            if self.read_data(&mut scratch).await? == 0 {
                break;
            }
        }
        self.current = None;
        Ok(())
    }

    pub fn current_header(&self) -> Option<&EntryHeader> {
        self.current.as_ref().map(|c| &c.header)
    }

    pub fn current_kind(&self) -> Option<EntryKind> {
        self.current.as_ref().map(|c| kind_of(&c.header))
    }

    /// `close` — §4.8. Parts are fully buffered in memory and their
    /// `ReadStream`s already released after `load_part`, so there is
    /// nothing left to flush; kept as an explicit op to mirror
    /// `ArchiveWriter::close` and give callers a clear end-of-session point.
    pub fn close(self) {}
}

/// Reads one fragment, counting a crypto-category failure as a decrypt
/// failure (§10 Ambient Stack) before propagating it.
async fn read_data_fragment(
    entries: &mut EntryPipelineReader<EntryCursor>,
    metrics: &MetricsService,
    current: &mut CurrentEntry,
    compression_algorithm: &archive_core_domain::value_objects::CompressionAlgorithm,
    crypto: Option<&CryptoMaterial>,
    out: &mut Vec<u8>,
) -> Result<usize, ArchiveError> {
    match entries.read_data(&mut current.outer, compression_algorithm, crypto, out).await {
        Ok(n) => Ok(n),
        Err(e) => {
            if e.is_crypto_error() {
                metrics.record_decrypt_failure();
            }
            Err(e)
        }
    }
}

fn kind_of(header: &EntryHeader) -> EntryKind {
    match header {
        EntryHeader::File { .. } => EntryKind::File,
        EntryHeader::Image { .. } => EntryKind::Image,
        EntryHeader::Directory { .. } => EntryKind::Directory,
        EntryHeader::Link { .. } => EntryKind::Link,
        EntryHeader::HardLink { .. } => EntryKind::HardLink,
        EntryHeader::Special { .. } => EntryKind::Special,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::pipeline::archive_writer::ArchiveWriter;
    use crate::application::pipeline::part_scheduler::NoVolumeCoordination;
    use crate::infrastructure::compress_frame::MultiCodecCompressFrame;
    use crate::infrastructure::crypt_frame::AeadCryptFrame;
    use archive_core_domain::entities::{GlobalOptions, JobOptions, PosixAttributes};
    use archive_core_domain::repositories::{EntryTableKind, IndexEntryRow, IndexStore, StorageRow, StorageState, WriteStream};
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

    struct MemReadStream {
        bytes: Vec<u8>,
        position: usize,
    }

    #[async_trait]
    impl ReadStream for MemReadStream {
        async fn read(&mut self, buf: &mut [u8]) -> Result<usize, ArchiveError> {
            let remaining = &self.bytes[self.position..];
            let n = remaining.len().min(buf.len());
            buf[..n].copy_from_slice(&remaining[..n]);
            self.position += n;
            Ok(n)
        }
        async fn seek(&mut self, offset: u64) -> Result<(), ArchiveError> {
            self.position = offset as usize;
            Ok(())
        }
        async fn tell(&mut self) -> Result<u64, ArchiveError> {
            Ok(self.position as u64)
        }
        async fn len(&mut self) -> Result<u64, ArchiveError> {
            Ok(self.bytes.len() as u64)
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
        async fn open(&self, name: &str) -> Result<Box<dyn ReadStream>, ArchiveError> {
            let bytes = self.files.lock().unwrap().get(name).cloned().ok_or_else(|| ArchiveError::not_found(name.to_string()))?;
            Ok(Box::new(MemReadStream { bytes, position: 0 }))
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

    struct SequencedPasswords {
        attempts: StdMutex<std::vec::IntoIter<&'static str>>,
    }

    impl PasswordProvider for SequencedPasswords {
        fn get_password(&self, _kind: PasswordKind, _validate: bool, _weak_check: bool) -> Result<Vec<u8>, ArchiveError> {
            Ok(self.attempts.lock().unwrap().next().unwrap_or("").as_bytes().to_vec())
        }
    }

    fn posix() -> PosixAttributes {
        let now = Utc::now();
        PosixAttributes { atime: now, mtime: now, ctime: now, uid: 1000, gid: 1000, permission: 0o644 }
    }

    fn services() -> (Arc<dyn CompressionService>, Arc<dyn EncryptionService>) {
        (Arc::new(MultiCodecCompressFrame::new()), Arc::new(AeadCryptFrame::new()))
    }

    #[tokio::test]
    async fn reads_back_a_single_plain_file() {
        let files = Arc::new(StdMutex::new(HashMap::new()));
        let backend: Arc<dyn StorageBackend> = Arc::new(MemBackend { files: files.clone() });
        let (compression, encryption) = services();

        let mut writer = ArchiveWriter::create_with_volumes(
            backend.clone(),
            Arc::new(MemIndex),
            Arc::new(NoVolumeCoordination),
            compression.clone(),
            encryption.clone(),
            Arc::new(StaticPassword("unused")),
            "base",
            &GlobalOptions::default(),
            JobOptions { crypt_algorithm: CryptAlgorithm::None, ..JobOptions::default() },
        )
        .await
        .unwrap();
        writer.new_file_entry("greet.txt", posix(), 5).await.unwrap();
        writer.write_data(b"Hello").await.unwrap();
        writer.close_entry().await.unwrap();
        writer.close().await.unwrap();

        let mut reader = ArchiveReader::open(backend, compression, encryption, None, "base", None).await.unwrap();
        let header = reader.next_entry().await.unwrap().unwrap();
        assert_eq!(header.name(), "greet.txt");
        let mut out = Vec::new();
        while reader.read_data(&mut out).await.unwrap() > 0 {}
        assert_eq!(out, b"Hello");
        assert!(reader.next_entry().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn wrong_password_then_correct_one_succeeds() {
        let files = Arc::new(StdMutex::new(HashMap::new()));
        let backend: Arc<dyn StorageBackend> = Arc::new(MemBackend { files: files.clone() });
        let (compression, encryption) = services();

        let mut writer = ArchiveWriter::create_with_volumes(
            backend.clone(),
            Arc::new(MemIndex),
            Arc::new(NoVolumeCoordination),
            compression.clone(),
            encryption.clone(),
            Arc::new(StaticPassword("correct horse")),
            "base",
            &GlobalOptions::default(),
            JobOptions { crypt_algorithm: CryptAlgorithm::Aes256Gcm, ..JobOptions::default() },
        )
        .await
        .unwrap();
        writer.new_file_entry("secret.txt", posix(), 4).await.unwrap();
        writer.write_data(b"root").await.unwrap();
        writer.close_entry().await.unwrap();
        writer.close().await.unwrap();

        let provider: Arc<dyn PasswordProvider> = Arc::new(SequencedPasswords {
            attempts: StdMutex::new(vec!["correct horse"].into_iter()),
        });
        let mut reader = ArchiveReader::open(
            backend,
            compression,
            encryption,
            Some(provider),
            "base",
            Some(b"staple".to_vec()),
        )
        .await
        .unwrap();

        let header = reader.next_entry().await.unwrap().unwrap();
        assert_eq!(header.name(), "secret.txt");
        let mut out = Vec::new();
        while reader.read_data(&mut out).await.unwrap() > 0 {}
        assert_eq!(out, b"root");
    }

    #[tokio::test]
    async fn reconstructs_a_file_split_across_parts() {
        let files = Arc::new(StdMutex::new(HashMap::new()));
        let backend: Arc<dyn StorageBackend> = Arc::new(MemBackend { files: files.clone() });
        let (compression, encryption) = services();

        let mut writer = ArchiveWriter::create_with_volumes(
            backend.clone(),
            Arc::new(MemIndex),
            Arc::new(NoVolumeCoordination),
            compression.clone(),
            encryption.clone(),
            Arc::new(StaticPassword("unused")),
            "base",
            &GlobalOptions::default(),
            JobOptions { part_size: Some(80), crypt_algorithm: CryptAlgorithm::None, ..JobOptions::default() },
        )
        .await
        .unwrap();
        writer.new_file_entry("big.bin", posix(), 40).await.unwrap();
        writer.write_data(&vec![1u8; 20]).await.unwrap();
        writer.write_data(&vec![2u8; 20]).await.unwrap();
        writer.close_entry().await.unwrap();
        writer.close().await.unwrap();
        assert!(files.lock().unwrap().contains_key("base.001.bar"));

        let mut reader = ArchiveReader::open(backend, compression, encryption, None, "base", None).await.unwrap();
        let header = reader.next_entry().await.unwrap().unwrap();
        assert_eq!(header.name(), "big.bin");
        let mut out = Vec::new();
        while reader.read_data(&mut out).await.unwrap() > 0 {}
        assert_eq!(out.len(), 40);
        assert_eq!(out[..20], vec![1u8; 20][..]);
        assert_eq!(out[20..], vec![2u8; 20][..]);
    }
}
