// /////////////////////////////////////////////////////////////////////////////
// Archive Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # ChunkIO
//!
//! Framing layer for the `{id[4], size:u64, payload[size]}` chunk format
//! (§4.1, §6). Grounded on the streaming, position-tracking writer/reader
//! pair in `infrastructure::services::binary_format`'s
//! `StreamingBinaryWriter`/`StreamingBinaryReader`, generalized from a
//! single-footer `.adapipe` layout to the archiver's nested chunk tree.
//!
//! All multibyte integers are big-endian; strings are `{u16 length, utf8
//! bytes}` with no terminator; booleans are a single `0`/`1` byte.

use archive_core_domain::{ArchiveError, ChunkId};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncSeek, AsyncSeekExt, AsyncWrite, AsyncWriteExt};

/// Size in bytes of a chunk header: 4-byte id + 8-byte big-endian size.
pub const CHUNK_HEADER_LEN: u64 = 12;

/// A handle returned by `open_chunk`, tracking the file offset of the
/// chunk's size field so `close_chunk` can back-patch it.
pub struct ChunkHandle {
    id: ChunkId,
    size_field_offset: u64,
    bytes_written: u64,
}

impl ChunkHandle {
    pub fn id(&self) -> ChunkId {
        self.id
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }
}

/// Writes chunk framing onto a seekable, `AsyncWrite` sink.
///
/// Non-seekable sinks (a pipe to an optical burner) are out of scope for
/// this writer per §4.1's "writer MUST declare seekability at open time" -
/// a non-seekable target is handled upstream by `VolumeManager` staging the
/// part to a temp file first and streaming it afterward, so `ChunkIo`
/// itself only ever sees seekable destinations.
pub struct ChunkWriter<W> {
    sink: W,
    position: u64,
}

impl<W: AsyncWrite + AsyncSeek + Unpin> ChunkWriter<W> {
    pub fn new(sink: W, position: u64) -> Self {
        Self { sink, position }
    }

    pub fn position(&self) -> u64 {
        self.position
    }

    pub fn into_inner(self) -> W {
        self.sink
    }

    /// Replaces the sink with `new_sink` at `new_position`, returning the
    /// old one. Lets a caller flush the bytes written so far to some other
    /// destination and keep writing subsequent chunks into a fresh sink
    /// without losing position tracking.
    pub fn swap_sink(&mut self, new_sink: W, new_position: u64) -> W {
        self.position = new_position;
        std::mem::replace(&mut self.sink, new_sink)
    }

    /// Opens a new chunk, writing its id and a placeholder size of 0.
    pub async fn open_chunk(&mut self, id: ChunkId) -> Result<ChunkHandle, ArchiveError> {
        self.sink.write_all(&id.as_bytes()).await.map_err(io_err)?;
        let size_field_offset = self.position + 4;
        self.sink.write_all(&0u64.to_be_bytes()).await.map_err(io_err)?;
        self.position += CHUNK_HEADER_LEN;
        Ok(ChunkHandle {
            id,
            size_field_offset,
            bytes_written: 0,
        })
    }

    /// Writes raw payload bytes into the currently open chunk.
    pub async fn write_raw(&mut self, handle: &mut ChunkHandle, bytes: &[u8]) -> Result<(), ArchiveError> {
        self.sink.write_all(bytes).await.map_err(io_err)?;
        self.position += bytes.len() as u64;
        handle.bytes_written += bytes.len() as u64;
        Ok(())
    }

    /// Closes the chunk, seeking back to back-patch its size field.
    ///
    /// The payload size is derived from the writer's current position
    /// against the chunk's size-field offset, not from `bytes_written`:
    /// chunks nested inside this one (a header or data sub-chunk opened via
    /// its own `ChunkHandle`, per §4.4's entry/header/data tree) advance the
    /// shared writer position without ever touching this handle's
    /// `write_raw`, so `bytes_written` alone would under-report a chunk
    /// that contains nested chunks.
    pub async fn close_chunk(&mut self, handle: ChunkHandle) -> Result<(), ArchiveError> {
        let end_position = self.position;
        let payload_size = end_position - (handle.size_field_offset + 8);
        self.sink
            .seek(std::io::SeekFrom::Start(handle.size_field_offset))
            .await
            .map_err(io_err)?;
        self.sink.write_all(&payload_size.to_be_bytes()).await.map_err(io_err)?;
        self.sink.seek(std::io::SeekFrom::Start(end_position)).await.map_err(io_err)?;
        self.position = end_position;
        Ok(())
    }

    pub async fn write_u8(&mut self, handle: &mut ChunkHandle, v: u8) -> Result<(), ArchiveError> {
        self.write_raw(handle, &[v]).await
    }

    pub async fn write_u16(&mut self, handle: &mut ChunkHandle, v: u16) -> Result<(), ArchiveError> {
        self.write_raw(handle, &v.to_be_bytes()).await
    }

    pub async fn write_u32(&mut self, handle: &mut ChunkHandle, v: u32) -> Result<(), ArchiveError> {
        self.write_raw(handle, &v.to_be_bytes()).await
    }

    pub async fn write_u64(&mut self, handle: &mut ChunkHandle, v: u64) -> Result<(), ArchiveError> {
        self.write_raw(handle, &v.to_be_bytes()).await
    }

    pub async fn write_bool(&mut self, handle: &mut ChunkHandle, v: bool) -> Result<(), ArchiveError> {
        self.write_raw(handle, &[v as u8]).await
    }

    pub async fn write_string(&mut self, handle: &mut ChunkHandle, s: &str) -> Result<(), ArchiveError> {
        let bytes = s.as_bytes();
        if bytes.len() > u16::MAX as usize {
            return Err(ArchiveError::chunk_framing(format!("string '{s}' exceeds u16 length limit")));
        }
        self.write_u16(handle, bytes.len() as u16).await?;
        self.write_raw(handle, bytes).await
    }
}

/// A chunk header read by `next_chunk`, not yet consumed.
pub struct PendingChunk {
    pub id: ChunkId,
    pub size: u64,
    remaining: u64,
}

impl PendingChunk {
    /// Bytes of this chunk's payload not yet consumed by `read_raw`/`skip`.
    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    /// Accounts for `n` bytes consumed from this chunk's payload by reading
    /// a nested chunk through a separate `PendingChunk` (header/data
    /// sub-chunks nested inside an outer entry chunk, §4.4): the nested
    /// `next_chunk` call advances the stream but has no handle on the
    /// parent's byte count, so the caller reports it explicitly.
    pub(crate) fn consume(&mut self, n: u64) {
        self.remaining = self.remaining.saturating_sub(n);
    }
}

/// Reads chunk framing from a seekable, `AsyncRead` source, bounded to a
/// parent chunk's declared payload size.
pub struct ChunkReader<R> {
    source: R,
    position: u64,
}

fn io_err(e: std::io::Error) -> ArchiveError {
    ArchiveError::backend_fail(e.to_string())
}

impl<R: AsyncRead + AsyncSeek + Unpin> ChunkReader<R> {
    pub fn new(source: R, position: u64) -> Self {
        Self { source, position }
    }

    pub fn position(&self) -> u64 {
        self.position
    }

    /// Seeks the underlying source back to an earlier position, for
    /// retrying a read that turned out to need a different password
    /// candidate (§4.8 "Password pool") rather than re-opening the part
    /// from scratch.
    pub async fn seek_to(&mut self, position: u64) -> Result<(), ArchiveError> {
        self.source.seek(std::io::SeekFrom::Start(position)).await.map_err(io_err)?;
        self.position = position;
        Ok(())
    }

    pub fn into_inner(self) -> R {
        self.source
    }

    /// Reads the next chunk header `{id, size}`, bounded by
    /// `parent_remaining` bytes left in the enclosing chunk (or part, for
    /// top-level chunks). Returns `None` at a clean end of parent.
    pub async fn next_chunk(&mut self, parent_remaining: u64) -> Result<Option<PendingChunk>, ArchiveError> {
        if parent_remaining == 0 {
            return Ok(None);
        }
        if parent_remaining < CHUNK_HEADER_LEN {
            return Err(ArchiveError::chunk_truncated("not enough bytes left for a chunk header"));
        }

        let mut id_bytes = [0u8; 4];
        match self.source.read_exact(&mut id_bytes).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                return Err(ArchiveError::chunk_truncated("eof while reading chunk id"))
            }
            Err(e) => return Err(io_err(e)),
        }

        let mut size_bytes = [0u8; 8];
        self.source.read_exact(&mut size_bytes).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::UnexpectedEof {
                ArchiveError::chunk_truncated("eof while reading chunk size")
            } else {
                io_err(e)
            }
        })?;
        let size = u64::from_be_bytes(size_bytes);

        if size > parent_remaining - CHUNK_HEADER_LEN {
            return Err(ArchiveError::chunk_framing(format!(
                "chunk size {size} exceeds remaining parent payload {}",
                parent_remaining - CHUNK_HEADER_LEN
            )));
        }

        self.position += CHUNK_HEADER_LEN;
        Ok(Some(PendingChunk {
            id: ChunkId::new(id_bytes),
            size,
            remaining: size,
        }))
    }

    /// Reads up to `buf.len()` raw bytes from the pending chunk's payload.
    pub async fn read_raw(&mut self, chunk: &mut PendingChunk, buf: &mut [u8]) -> Result<usize, ArchiveError> {
        let want = buf.len().min(chunk.remaining as usize);
        if want == 0 {
            return Ok(0);
        }
        self.source.read_exact(&mut buf[..want]).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::UnexpectedEof {
                ArchiveError::chunk_truncated("eof mid-chunk payload")
            } else {
                io_err(e)
            }
        })?;
        chunk.remaining -= want as u64;
        self.position += want as u64;
        Ok(want)
    }

    /// Reads the pending chunk's payload to the end into a `Vec`.
    pub async fn read_raw_all(&mut self, chunk: &mut PendingChunk) -> Result<Vec<u8>, ArchiveError> {
        let mut out = vec![0u8; chunk.remaining as usize];
        let mut filled = 0;
        while filled < out.len() {
            let n = self.read_raw(chunk, &mut out[filled..]).await?;
            if n == 0 {
                break;
            }
            filled += n;
        }
        Ok(out)
    }

    /// Skips the remainder of an unrecognised chunk's payload (§4.1 read
    /// tolerance for unknown ids).
    pub async fn skip(&mut self, chunk: &mut PendingChunk) -> Result<(), ArchiveError> {
        if chunk.remaining == 0 {
            return Ok(());
        }
        self.source.seek(std::io::SeekFrom::Current(chunk.remaining as i64)).await.map_err(io_err)?;
        self.position += chunk.remaining;
        chunk.remaining = 0;
        Ok(())
    }

    pub async fn read_u8(&mut self, chunk: &mut PendingChunk) -> Result<u8, ArchiveError> {
        let mut buf = [0u8; 1];
        self.read_exact_into(chunk, &mut buf).await?;
        Ok(buf[0])
    }

    pub async fn read_u16(&mut self, chunk: &mut PendingChunk) -> Result<u16, ArchiveError> {
        let mut buf = [0u8; 2];
        self.read_exact_into(chunk, &mut buf).await?;
        Ok(u16::from_be_bytes(buf))
    }

    pub async fn read_u32(&mut self, chunk: &mut PendingChunk) -> Result<u32, ArchiveError> {
        let mut buf = [0u8; 4];
        self.read_exact_into(chunk, &mut buf).await?;
        Ok(u32::from_be_bytes(buf))
    }

    pub async fn read_u64(&mut self, chunk: &mut PendingChunk) -> Result<u64, ArchiveError> {
        let mut buf = [0u8; 8];
        self.read_exact_into(chunk, &mut buf).await?;
        Ok(u64::from_be_bytes(buf))
    }

    pub async fn read_bool(&mut self, chunk: &mut PendingChunk) -> Result<bool, ArchiveError> {
        match self.read_u8(chunk).await? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(ArchiveError::chunk_framing(format!("invalid boolean byte {other}"))),
        }
    }

    pub async fn read_string(&mut self, chunk: &mut PendingChunk) -> Result<String, ArchiveError> {
        let len = self.read_u16(chunk).await? as usize;
        let mut buf = vec![0u8; len];
        self.read_exact_into(chunk, &mut buf).await?;
        String::from_utf8(buf).map_err(|e| ArchiveError::chunk_framing(format!("non-utf8 string: {e}")))
    }

    async fn read_exact_into(&mut self, chunk: &mut PendingChunk, buf: &mut [u8]) -> Result<(), ArchiveError> {
        let n = self.read_raw(chunk, buf).await?;
        if n != buf.len() {
            return Err(ArchiveError::chunk_truncated("eof before expected field was fully read"));
        }
        Ok(())
    }
}
