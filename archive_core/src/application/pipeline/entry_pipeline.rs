// /////////////////////////////////////////////////////////////////////////////
// Archive Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # EntryPipeline
//!
//! Implements §4.4's write/read contract on top of `ChunkIO` (§4.1),
//! `CompressionService` (§4.3), and `EncryptionService` (§4.2): one entry's
//! outer chunk, header sub-chunk, and data fragments at a time.
//!
//! Each `write_data` call becomes exactly one self-contained fragment: the
//! call's whole buffer is compressed and encrypted independently of every
//! other call, then framed as a single data chunk of
//! `offset:u64 size:u64 payload` (§6). `read_data` mirrors this with a fresh
//! decoder per chunk, so the two sides agree on where one fragment ends and
//! the next begins — which trivially satisfies the "no element straddles two
//! fragments" guarantee of §4.4 provided callers pass whole `elementSize`
//! units per call.

use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncSeek, AsyncWrite};

use archive_core_domain::entities::{
    EntryHeader, EntryHeaderCommon, FileLikeAttributes, PosixAttributes,
};
use archive_core_domain::services::encryption_service::{DecryptionContext, EncryptionContext};
use archive_core_domain::value_objects::SpecialType;
use archive_core_domain::{
    ArchiveError, ArchiveSalt, CompressionAlgorithm, CompressionService, CryptAlgorithm, CryptType, EncryptionService,
    EntryIndex, EntryKind, FragmentIndex,
};

use crate::infrastructure::chunk_io::{ChunkHandle, ChunkReader, ChunkWriter, PendingChunk, CHUNK_HEADER_LEN};

/// Per-entry encryption material, supplied by `ArchiveWriter`/`ArchiveReader`
/// once a passphrase or session key has been resolved.
#[derive(Clone)]
pub struct CryptoMaterial {
    pub algorithm: CryptAlgorithm,
    pub key: Vec<u8>,
    pub salt: ArchiveSalt,
}

pub struct EntryPipelineWriter<W> {
    chunks: ChunkWriter<W>,
    compression: Arc<dyn CompressionService>,
    encryption: Arc<dyn EncryptionService>,
    entry_index: EntryIndex,
    active: Option<ActiveWrite>,
}

struct ActiveWrite {
    kind: EntryKind,
    header: EntryHeader,
    outer: ChunkHandle,
    data_offset: u64,
    fragment_index: FragmentIndex,
    crypto: Option<CryptoMaterial>,
    compression_algorithm: CompressionAlgorithm,
    declared_size: Option<u64>,
    written_size: u64,
}

/// State needed to resume a File/Image/HardLink entry's data stream in a
/// fresh part after a mid-entry split (§4.5): the outer chunk and header
/// sub-chunk are re-emitted verbatim, data continues from `data_offset`.
pub struct SplitResume {
    kind: EntryKind,
    header: EntryHeader,
    data_offset: u64,
    fragment_index: FragmentIndex,
    crypto: Option<CryptoMaterial>,
    compression_algorithm: CompressionAlgorithm,
    declared_size: Option<u64>,
    written_size: u64,
}

impl<W: AsyncWrite + AsyncSeek + Unpin> EntryPipelineWriter<W> {
    pub fn new(sink: W, position: u64, compression: Arc<dyn CompressionService>, encryption: Arc<dyn EncryptionService>) -> Self {
        Self {
            chunks: ChunkWriter::new(sink, position),
            compression,
            encryption,
            entry_index: EntryIndex(0),
            active: None,
        }
    }

    pub fn into_inner(self) -> W {
        self.chunks.into_inner()
    }

    pub fn position(&self) -> u64 {
        self.chunks.position()
    }

    pub fn entry_index(&self) -> EntryIndex {
        self.entry_index
    }

    /// Replaces the underlying sink with `new_sink` at `new_position`,
    /// returning the old one. Used by `ArchiveWriter` to flush one entry's
    /// buffered chunk bytes to the backend and keep writing the next entry
    /// (or the continuation of a split entry) into a fresh buffer, without
    /// losing `entry_index`/in-progress `ActiveWrite` state.
    pub fn swap_sink(&mut self, new_sink: W, new_position: u64) -> W {
        self.chunks.swap_sink(new_sink, new_position)
    }

    /// `beginEntry(kind, header)` — §4.4 step 1.
    pub async fn begin_entry(&mut self, header: &EntryHeader, crypto: Option<CryptoMaterial>) -> Result<(), ArchiveError> {
        if self.active.is_some() {
            return Err(ArchiveError::bad_state("begin_entry called while an entry is already active"));
        }

        let kind = kind_of(header);
        let outer = self.chunks.open_chunk(kind.outer_chunk_id()).await?;
        self.write_header(header, crypto.as_ref()).await?;

        let declared_size = header.declared_size();
        self.active = Some(ActiveWrite {
            kind,
            header: header.clone(),
            outer,
            data_offset: 0,
            fragment_index: FragmentIndex(0),
            compression_algorithm: header.common().compress_algorithm.clone(),
            crypto,
            declared_size,
            written_size: 0,
        });

        if declared_size.is_none() {
            // Directory/Link/Special: close immediately, no data chunks.
            self.end_entry().await?;
        }
        Ok(())
    }

    async fn write_header(&mut self, header: &EntryHeader, crypto: Option<&CryptoMaterial>) -> Result<(), ArchiveError> {
        let kind = kind_of(header);
        let mut sub = self.chunks.open_chunk(kind.header_chunk_id()).await?;

        let common = header.common();
        let name_plain = common.name.clone();
        let name_bytes = if crypto.is_some() && common.crypt_algorithm != CryptAlgorithm::None {
            self.encrypt_name(&name_plain, crypto.unwrap())?
        } else {
            name_plain.into_bytes()
        };
        self.chunks.write_u32(&mut sub, name_bytes.len() as u32).await?;
        self.chunks.write_raw(&mut sub, &name_bytes).await?;
        self.chunks.write_u8(&mut sub, common.compress_algorithm.wire_code()).await?;
        self.chunks.write_u8(&mut sub, common.crypt_algorithm.wire_code()).await?;
        self.chunks.write_u8(&mut sub, common.crypt_type.wire_code()).await?;
        self.chunks.write_u16(&mut sub, common.cipher_block_size.bytes()).await?;

        match header {
            EntryHeader::File { attrs, .. } | EntryHeader::HardLink { attrs, .. } => {
                self.write_posix(&mut sub, &attrs.posix).await?;
                self.chunks.write_u64(&mut sub, attrs.size).await?;
            }
            EntryHeader::Image { attrs, device_block_size, block_count, .. } => {
                self.write_posix(&mut sub, &attrs.posix).await?;
                self.chunks.write_u64(&mut sub, attrs.size).await?;
                self.chunks.write_u32(&mut sub, *device_block_size).await?;
                self.chunks.write_u64(&mut sub, *block_count).await?;
            }
            EntryHeader::Directory { posix, .. } | EntryHeader::Special { posix, .. } | EntryHeader::Link { posix, .. } => {
                self.write_posix(&mut sub, posix).await?;
                if let EntryHeader::Link { destination, .. } = header {
                    self.chunks.write_string(&mut sub, destination).await?;
                }
                if let EntryHeader::Special { special_type, major, minor, .. } = header {
                    self.chunks.write_u8(&mut sub, special_type.wire_code()).await?;
                    self.chunks.write_u32(&mut sub, *major).await?;
                    self.chunks.write_u32(&mut sub, *minor).await?;
                }
            }
        }

        if let EntryHeader::HardLink { additional_names, .. } = header {
            self.chunks.write_u32(&mut sub, additional_names.len() as u32).await?;
            for name in additional_names {
                self.chunks.write_string(&mut sub, name).await?;
            }
        }

        self.chunks.close_chunk(sub).await?;
        Ok(())
    }

    async fn write_posix(&mut self, chunk: &mut ChunkHandle, posix: &PosixAttributes) -> Result<(), ArchiveError> {
        self.chunks.write_u64(chunk, posix.atime.timestamp() as u64).await?;
        self.chunks.write_u64(chunk, posix.mtime.timestamp() as u64).await?;
        self.chunks.write_u64(chunk, posix.ctime.timestamp() as u64).await?;
        self.chunks.write_u32(chunk, posix.uid).await?;
        self.chunks.write_u32(chunk, posix.gid).await?;
        self.chunks.write_u32(chunk, posix.permission).await?;
        Ok(())
    }

    fn encrypt_name(&self, name: &str, crypto: &CryptoMaterial) -> Result<Vec<u8>, ArchiveError> {
        let ctx = EncryptionContext {
            algorithm: crypto.algorithm,
            key: crypto.key.clone(),
            salt: crypto.salt,
            entry_index: self.entry_index,
            fragment_index: FragmentIndex(u64::MAX),
        };
        self.encryption.encrypt_fragment(&ctx, name.as_bytes())
    }

    /// `writeData(buf, elementSize)` — §4.4 step 2. One call, one fragment:
    /// `buf` is compressed and encrypted as a single self-contained unit
    /// with a fresh codec instance, never carried over into the next call.
    pub async fn write_data(&mut self, buf: &[u8]) -> Result<(), ArchiveError> {
        let active = self.active.as_mut().ok_or_else(|| ArchiveError::bad_state("write_data with no active entry"))?;
        let data_id = active
            .kind
            .data_chunk_id()
            .ok_or_else(|| ArchiveError::bad_state("write_data on an entry kind that carries no data"))?;

        let mut compressor = self.compression.encoder(&active.compression_algorithm)?;
        let mut payload = compressor.push(buf)?;
        payload.extend_from_slice(&compressor.flush_final()?);

        let fragment_index = active.fragment_index;
        if let Some(crypto) = &active.crypto {
            let ctx = EncryptionContext {
                algorithm: crypto.algorithm,
                key: crypto.key.clone(),
                salt: crypto.salt,
                entry_index: self.entry_index,
                fragment_index,
            };
            payload = self.encryption.encrypt_fragment(&ctx, &payload)?;
        }

        let offset = active.data_offset;
        let mut data_chunk = self.chunks.open_chunk(data_id).await?;
        self.chunks.write_u64(&mut data_chunk, offset).await?;
        self.chunks.write_u64(&mut data_chunk, buf.len() as u64).await?;
        self.chunks.write_raw(&mut data_chunk, &payload).await?;
        self.chunks.close_chunk(data_chunk).await?;

        active.data_offset += buf.len() as u64;
        active.written_size += buf.len() as u64;
        active.fragment_index = FragmentIndex(fragment_index.value() + 1);
        Ok(())
    }

    /// `endEntry` — §4.4 step 3. Every `write_data` call already flushed a
    /// complete fragment, so the only thing left to do is check the
    /// declared size was actually honored and close the outer chunk.
    pub async fn end_entry(&mut self) -> Result<(), ArchiveError> {
        let active = self.active.take().ok_or_else(|| ArchiveError::bad_state("end_entry with no active entry"))?;

        if let Some(declared) = active.declared_size {
            if active.written_size != declared {
                return Err(ArchiveError::entry_size_mismatch(format!(
                    "entry declared {declared} bytes but {} were written",
                    active.written_size
                )));
            }
        }

        self.entry_index = EntryIndex(self.entry_index.value() + 1);
        self.chunks.close_chunk(active.outer).await
    }

    /// Closes the active entry's outer chunk in the current sink without
    /// ending the entry (§4.5: "EntryPipeline closes its current data chunk
    /// and outer entry chunk cleanly, PartScheduler rotates, and
    /// EntryPipeline re-emits a new outer entry chunk in the new part with
    /// the same header"). Does not touch `entry_index` — this is still the
    /// same entry, continued by `resume_entry_after_split` after the
    /// caller swaps in the next part's sink.
    pub async fn suspend_entry_for_split(&mut self) -> Result<SplitResume, ArchiveError> {
        let active = self.active.take().ok_or_else(|| ArchiveError::bad_state("suspend_entry_for_split with no active entry"))?;
        self.chunks.close_chunk(active.outer).await?;
        Ok(SplitResume {
            kind: active.kind,
            header: active.header,
            data_offset: active.data_offset,
            fragment_index: active.fragment_index,
            crypto: active.crypto,
            compression_algorithm: active.compression_algorithm,
            declared_size: active.declared_size,
            written_size: active.written_size,
        })
    }

    /// Re-opens a new outer chunk in the (already swapped-in) current sink
    /// for an entry suspended by `suspend_entry_for_split`, re-emitting its
    /// header and continuing its data offset/fragment index.
    pub async fn resume_entry_after_split(&mut self, resume: SplitResume) -> Result<(), ArchiveError> {
        if self.active.is_some() {
            return Err(ArchiveError::bad_state("resume_entry_after_split called while an entry is already active"));
        }
        let outer = self.chunks.open_chunk(resume.kind.outer_chunk_id()).await?;
        self.write_header(&resume.header, resume.crypto.as_ref()).await?;
        self.active = Some(ActiveWrite {
            kind: resume.kind,
            header: resume.header,
            outer,
            data_offset: resume.data_offset,
            fragment_index: resume.fragment_index,
            crypto: resume.crypto,
            compression_algorithm: resume.compression_algorithm,
            declared_size: resume.declared_size,
            written_size: resume.written_size,
        });
        Ok(())
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

/// Read-side counterpart. `next_entry` is provided by `ArchiveReader` (§4.8),
/// which owns cross-part continuation; this type reads one entry already
/// known to start at the current chunk reader position.
pub struct EntryPipelineReader<R> {
    chunks: ChunkReader<R>,
    compression: Arc<dyn CompressionService>,
    encryption: Arc<dyn EncryptionService>,
    entry_index: EntryIndex,
    fragment_index: FragmentIndex,
    data_offset: u64,
    entered_first_entry: bool,
}

/// Reader position snapshot for retrying `next_entry` with a different
/// password candidate (§4.8 "Password pool") without re-opening the part.
#[derive(Clone, Copy)]
pub struct ReaderCheckpoint {
    position: u64,
    entry_index: EntryIndex,
    fragment_index: FragmentIndex,
    data_offset: u64,
    entered_first_entry: bool,
}

impl<R: AsyncRead + AsyncSeek + Unpin> EntryPipelineReader<R> {
    pub fn new(source: R, position: u64, compression: Arc<dyn CompressionService>, encryption: Arc<dyn EncryptionService>) -> Self {
        Self {
            chunks: ChunkReader::new(source, position),
            compression,
            encryption,
            entry_index: EntryIndex(0),
            fragment_index: FragmentIndex(0),
            data_offset: 0,
            entered_first_entry: false,
        }
    }

    pub fn into_inner(self) -> R {
        self.chunks.into_inner()
    }

    pub fn position(&self) -> u64 {
        self.chunks.position()
    }

    pub fn checkpoint(&self) -> ReaderCheckpoint {
        ReaderCheckpoint {
            position: self.chunks.position(),
            entry_index: self.entry_index,
            fragment_index: self.fragment_index,
            data_offset: self.data_offset,
            entered_first_entry: self.entered_first_entry,
        }
    }

    /// Rewinds the underlying source and entry/fragment-index bookkeeping
    /// to a prior checkpoint, so a failed password candidate's partial read
    /// of an entry's header doesn't leave the stream or nonce derivation
    /// state corrupted for the next candidate's attempt.
    pub async fn restore(&mut self, checkpoint: ReaderCheckpoint) -> Result<(), ArchiveError> {
        self.chunks.seek_to(checkpoint.position).await?;
        self.entry_index = checkpoint.entry_index;
        self.fragment_index = checkpoint.fragment_index;
        self.data_offset = checkpoint.data_offset;
        self.entered_first_entry = checkpoint.entered_first_entry;
        Ok(())
    }

    /// Reads the outer entry chunk at the cursor, its header sub-chunk, and
    /// returns the decoded `EntryHeader` plus a `PendingChunk` positioned at
    /// the outer chunk's remaining (data) payload. `crypto` is used to
    /// decrypt the entry name when the header was written with
    /// `crypt_algorithm != None` (§4.4's `encrypt_name` counterpart).
    ///
    /// Advances the entry index used by `read_data`'s nonce derivation and
    /// resets the per-entry fragment index, mirroring the writer's
    /// `begin_entry`/`end_entry` bookkeeping.
    pub async fn next_entry(
        &mut self,
        parent_remaining: u64,
        crypto: Option<&CryptoMaterial>,
    ) -> Result<Option<(EntryHeader, PendingChunk)>, ArchiveError> {
        let outer = match self.chunks.next_chunk(parent_remaining).await? {
            Some(c) => c,
            None => return Ok(None),
        };
        if outer.id == archive_core_domain::value_objects::ChunkId::FOOTER {
            return Ok(None);
        }
        let kind = entry_kind_for_chunk(outer.id)?;
        let mut outer = outer;

        if self.entered_first_entry {
            self.entry_index = EntryIndex(self.entry_index.value() + 1);
        }
        self.entered_first_entry = true;
        self.fragment_index = FragmentIndex(0);
        self.data_offset = 0;

        let mut header_chunk = self
            .chunks
            .next_chunk(outer.remaining())
            .await?
            .ok_or_else(|| ArchiveError::chunk_truncated("missing entry header sub-chunk"))?;
        let header_size = header_chunk.size;
        let header = self.read_header(kind, &mut header_chunk, crypto).await?;
        self.chunks.skip(&mut header_chunk).await?;
        outer.consume(CHUNK_HEADER_LEN + header_size);

        Ok(Some((header, outer)))
    }

    async fn read_header(
        &mut self,
        kind: EntryKind,
        chunk: &mut PendingChunk,
        crypto: Option<&CryptoMaterial>,
    ) -> Result<EntryHeader, ArchiveError> {
        let name_len = self.chunks.read_u32(chunk).await?;
        let mut name_bytes = vec![0u8; name_len as usize];
        self.chunks.read_raw(chunk, &mut name_bytes).await?;

        let compress_code = self.chunks.read_u8(chunk).await?;
        let crypt_code = self.chunks.read_u8(chunk).await?;
        let _crypt_type = self.chunks.read_u8(chunk).await?;
        let block_bytes = self.chunks.read_u16(chunk).await?;

        let compress_algorithm = CompressionAlgorithm::from_wire_code(compress_code, None)?;
        let crypt_algorithm = CryptAlgorithm::from_wire_code(crypt_code)?;

        let name = if crypt_algorithm != CryptAlgorithm::None {
            match crypto {
                Some(crypto) => {
                    String::from_utf8(self.decrypt_name(&name_bytes, crypto)?).map_err(|e| ArchiveError::chunk_framing(e.to_string()))?
                }
                // §4.8 "Listing without key": no passphrase available yet, so the
                // name can't be decrypted — cleartext header fields still come
                // through, the name comes back as this sentinel.
                None => "<encrypted>".to_string(),
            }
        } else {
            String::from_utf8(name_bytes).map_err(|e| ArchiveError::chunk_framing(e.to_string()))?
        };

        let common = EntryHeaderCommon {
            compress_algorithm,
            crypt_algorithm,
            crypt_type: CryptType::None,
            cipher_block_size: archive_core_domain::value_objects::BlockSize::new(block_bytes)?,
            name,
            extended_attributes: Vec::new(),
        };

        let header = match kind {
            EntryKind::File | EntryKind::HardLink => {
                let posix = self.read_posix(chunk).await?;
                let size = self.chunks.read_u64(chunk).await?;
                let attrs = FileLikeAttributes { posix, size };
                if kind == EntryKind::File {
                    EntryHeader::File { common, attrs }
                } else {
                    let alias_count = self.chunks.read_u32(chunk).await?;
                    let mut additional_names = Vec::with_capacity(alias_count as usize);
                    for _ in 0..alias_count {
                        additional_names.push(self.chunks.read_string(chunk).await?);
                    }
                    EntryHeader::HardLink { common, attrs, additional_names }
                }
            }
            EntryKind::Image => {
                let posix = self.read_posix(chunk).await?;
                let size = self.chunks.read_u64(chunk).await?;
                let device_block_size = self.chunks.read_u32(chunk).await?;
                let block_count = self.chunks.read_u64(chunk).await?;
                EntryHeader::Image {
                    common,
                    attrs: FileLikeAttributes { posix, size },
                    device_block_size,
                    block_count,
                }
            }
            EntryKind::Directory => {
                let posix = self.read_posix(chunk).await?;
                EntryHeader::Directory { common, posix }
            }
            EntryKind::Link => {
                let posix = self.read_posix(chunk).await?;
                let destination = self.chunks.read_string(chunk).await?;
                EntryHeader::Link { common, posix, destination }
            }
            EntryKind::Special => {
                let posix = self.read_posix(chunk).await?;
                let special_type_code = self.chunks.read_u8(chunk).await?;
                let major = self.chunks.read_u32(chunk).await?;
                let minor = self.chunks.read_u32(chunk).await?;
                EntryHeader::Special {
                    common,
                    posix,
                    special_type: SpecialType::from_wire_code(special_type_code)?,
                    major,
                    minor,
                }
            }
        };
        Ok(header)
    }

    fn decrypt_name(&self, name_bytes: &[u8], crypto: &CryptoMaterial) -> Result<Vec<u8>, ArchiveError> {
        let ctx = DecryptionContext {
            algorithm: crypto.algorithm,
            key: crypto.key.clone(),
            salt: crypto.salt,
            entry_index: self.entry_index,
            fragment_index: FragmentIndex(u64::MAX),
        };
        self.encryption.decrypt_fragment(&ctx, name_bytes)
    }

    async fn read_posix(&mut self, chunk: &mut PendingChunk) -> Result<PosixAttributes, ArchiveError> {
        use chrono::{TimeZone, Utc};
        let atime = self.chunks.read_u64(chunk).await? as i64;
        let mtime = self.chunks.read_u64(chunk).await? as i64;
        let ctime = self.chunks.read_u64(chunk).await? as i64;
        let uid = self.chunks.read_u32(chunk).await?;
        let gid = self.chunks.read_u32(chunk).await?;
        let permission = self.chunks.read_u32(chunk).await?;
        Ok(PosixAttributes {
            atime: Utc.timestamp_opt(atime, 0).single().unwrap_or_else(Utc::now),
            mtime: Utc.timestamp_opt(mtime, 0).single().unwrap_or_else(Utc::now),
            ctime: Utc.timestamp_opt(ctime, 0).single().unwrap_or_else(Utc::now),
            uid,
            gid,
            permission,
        })
    }

    /// `readData(buf) -> n`: reads the next data fragment, decrypts and
    /// decompresses it in full, appends to `out`, returns bytes appended.
    /// Each fragment is a self-contained `offset:u64 size:u64 payload`
    /// chunk (§6) — `offset` is checked against the running total of bytes
    /// read so far for this entry, and `size` against the decompressed
    /// length, to catch a misordered or corrupted stream.
    pub async fn read_data(
        &mut self,
        outer: &mut PendingChunk,
        compression_algorithm: &CompressionAlgorithm,
        crypto: Option<&CryptoMaterial>,
        out: &mut Vec<u8>,
    ) -> Result<usize, ArchiveError> {
        if outer.remaining() == 0 {
            return Ok(0);
        }
        let data_chunk = self
            .chunks
            .next_chunk(outer.remaining())
            .await?
            .ok_or_else(|| ArchiveError::chunk_truncated("expected a data chunk"))?;
        let mut data_chunk = data_chunk;
        let consumed = CHUNK_HEADER_LEN + data_chunk.size;
        let offset = self.chunks.read_u64(&mut data_chunk).await?;
        let size = self.chunks.read_u64(&mut data_chunk).await?;
        let mut payload = self.chunks.read_raw_all(&mut data_chunk).await?;
        outer.consume(consumed);

        if offset != self.data_offset {
            return Err(ArchiveError::chunk_framing(format!(
                "data fragment offset {offset} does not match expected {}",
                self.data_offset
            )));
        }

        let fragment_index = self.fragment_index;
        if let Some(crypto) = crypto {
            let ctx = DecryptionContext {
                algorithm: crypto.algorithm,
                key: crypto.key.clone(),
                salt: crypto.salt,
                entry_index: self.entry_index,
                fragment_index,
            };
            payload = self.encryption.decrypt_fragment(&ctx, &payload)?;
        }

        let decompressed = {
            let mut decoder = self.compression.decoder(compression_algorithm)?;
            decoder.pull(&payload)?;
            decoder.flush_final()?
        };

        if decompressed.len() as u64 != size {
            return Err(ArchiveError::chunk_framing(format!(
                "data fragment declared size {size} but decompressed to {} bytes",
                decompressed.len()
            )));
        }

        out.extend_from_slice(&decompressed);
        self.data_offset += decompressed.len() as u64;
        self.fragment_index = FragmentIndex(fragment_index.value() + 1);
        Ok(decompressed.len())
    }

    /// Discards an outer entry chunk's remaining bytes without decrypting
    /// or decompressing them — used when listing an archive with no
    /// passphrase available (§4.8 "Listing without key"), where the data
    /// can't be made sense of anyway.
    pub async fn skip_remaining(&mut self, outer: &mut PendingChunk) -> Result<(), ArchiveError> {
        self.chunks.skip(outer).await
    }
}

fn entry_kind_for_chunk(id: archive_core_domain::value_objects::ChunkId) -> Result<EntryKind, ArchiveError> {
    use archive_core_domain::value_objects::ChunkId;
    match id {
        ChunkId::FILE_ENTRY => Ok(EntryKind::File),
        ChunkId::IMAGE_ENTRY => Ok(EntryKind::Image),
        ChunkId::DIR_ENTRY => Ok(EntryKind::Directory),
        ChunkId::LINK_ENTRY => Ok(EntryKind::Link),
        ChunkId::HARDLINK_ENTRY => Ok(EntryKind::HardLink),
        ChunkId::SPECIAL_ENTRY => Ok(EntryKind::Special),
        other => Err(ArchiveError::chunk_framing(format!("unexpected outer entry chunk id {other}"))),
    }
}
