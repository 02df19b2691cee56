// /////////////////////////////////////////////////////////////////////////////
// Archive Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # CompressFrame port
//!
//! Domain-level contract for CompressFrame (§4.3): `initEncoder`/`initDecoder`
//! become the `encoder`/`decoder` constructors below; `push`/`pull` are
//! streaming one-shot-per-call transforms so a caller can feed arbitrarily
//! sized buffers without the port needing to own the whole plaintext at once;
//! `flushFinal` drains any buffered state the underlying codec holds back
//! until end-of-stream (bzip2/lzma/zstd all block-buffer internally).
//!
//! Concrete encoders/decoders (flate2 `Compress`/`Decompress`, zstd streaming
//! encoder, brotli writer) live in the infrastructure crate; this trait is
//! sync because compression is CPU-bound, not I/O-bound.

use crate::value_objects::CompressionAlgorithm;
use crate::ArchiveError;

pub trait Compressor: Send {
    fn push(&mut self, plain: &[u8]) -> Result<Vec<u8>, ArchiveError>;

    /// Drains remaining buffered output. Called exactly once, at `endEntry`.
    fn flush_final(&mut self) -> Result<Vec<u8>, ArchiveError>;
}

pub trait Decompressor: Send {
    fn pull(&mut self, compressed: &[u8]) -> Result<Vec<u8>, ArchiveError>;

    fn flush_final(&mut self) -> Result<Vec<u8>, ArchiveError>;
}

/// Factory for per-entry encoder/decoder instances, selected by
/// `CompressionAlgorithm`. One instance is created per `EntryPipeline`
/// (§4.4) and dropped at `endEntry`.
pub trait CompressionService: Send + Sync {
    fn encoder(&self, algorithm: &CompressionAlgorithm) -> Result<Box<dyn Compressor>, ArchiveError>;

    fn decoder(&self, algorithm: &CompressionAlgorithm) -> Result<Box<dyn Decompressor>, ArchiveError>;
}
