// /////////////////////////////////////////////////////////////////////////////
// Archive Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # CompressFrame
//!
//! Infrastructure implementation of `archive_core_domain::CompressionService`
//! (§4.3), grounded on `infrastructure::adapters::compression`'s per-algorithm
//! dispatch (`MultiAlgoCompression`) and the buffering style of `brotli`
//! usage there, but reshaped to the port's `push`/`flush_final` streaming
//! contract: every codec here buffers pushed plaintext and only runs the
//! underlying (one-shot) codec at `flush_final`, which is a faithful
//! implementation of the contract since none of the wired codecs expose a
//! cheaper incremental API worth the complexity at archiver's throughput.
//!
//! Crate mapping (SPEC_FULL.md §4.3): `deflate` -> `flate2`, `zstd` -> `zstd`,
//! `brotli` -> `brotli` (bonus algorithms beyond the spec minimum), `none` ->
//! passthrough. `bzip2`/`lzma` have no available codec crate in this stack
//! and return `ArchiveError::unsupported_algorithm`, matching the teacher's
//! own "not yet implemented" treatment of `Lz4`/custom algorithms.
//!
//! `Delta` is not a streaming codec: it diffs against a named prior entry's
//! bytes via `DeltaSourceArena` (§4.13), which needs random access to the
//! source, not a `push`/`pull` byte stream. Callers route delta-mode entries
//! through the arena directly; `encoder`/`decoder` here reject it.

use std::io::{Read, Write};

use archive_core_domain::services::compression_service::{CompressionService, Compressor, Decompressor};
use archive_core_domain::{ArchiveError, CompressionAlgorithm};

/// Buffers pushed plaintext and runs the underlying one-shot codec once, at
/// `flush_final`.
struct BufferingCompressor {
    algorithm: CompressionAlgorithm,
    buffered: Vec<u8>,
}

impl Compressor for BufferingCompressor {
    fn push(&mut self, plain: &[u8]) -> Result<Vec<u8>, ArchiveError> {
        self.buffered.extend_from_slice(plain);
        Ok(Vec::new())
    }

    fn flush_final(&mut self) -> Result<Vec<u8>, ArchiveError> {
        compress_all(&self.algorithm, &self.buffered)
    }
}

struct BufferingDecompressor {
    algorithm: CompressionAlgorithm,
    buffered: Vec<u8>,
}

impl Decompressor for BufferingDecompressor {
    fn pull(&mut self, compressed: &[u8]) -> Result<Vec<u8>, ArchiveError> {
        self.buffered.extend_from_slice(compressed);
        Ok(Vec::new())
    }

    fn flush_final(&mut self) -> Result<Vec<u8>, ArchiveError> {
        decompress_all(&self.algorithm, &self.buffered)
    }
}

fn compress_all(algorithm: &CompressionAlgorithm, data: &[u8]) -> Result<Vec<u8>, ArchiveError> {
    match algorithm {
        CompressionAlgorithm::None => Ok(data.to_vec()),
        CompressionAlgorithm::Deflate => {
            let mut encoder = flate2::write::DeflateEncoder::new(Vec::new(), flate2::Compression::default());
            encoder
                .write_all(data)
                .map_err(|e| ArchiveError::compress_fail(format!("deflate: {e}")))?;
            encoder
                .finish()
                .map_err(|e| ArchiveError::compress_fail(format!("deflate: {e}")))
        }
        CompressionAlgorithm::Zstd => {
            zstd::stream::encode_all(data, 0).map_err(|e| ArchiveError::compress_fail(format!("zstd: {e}")))
        }
        CompressionAlgorithm::Brotli => {
            let mut output = Vec::new();
            {
                let mut writer = brotli::CompressorWriter::new(&mut output, 4096, 6, 22);
                writer
                    .write_all(data)
                    .map_err(|e| ArchiveError::compress_fail(format!("brotli: {e}")))?;
                writer
                    .flush()
                    .map_err(|e| ArchiveError::compress_fail(format!("brotli: {e}")))?;
            }
            Ok(output)
        }
        CompressionAlgorithm::Bzip2 => Err(ArchiveError::unsupported_algorithm("bzip2")),
        CompressionAlgorithm::Lzma => Err(ArchiveError::unsupported_algorithm("lzma")),
        CompressionAlgorithm::Delta(source) => {
            Err(ArchiveError::unsupported_algorithm(format!("delta({source}) via CompressFrame; use DeltaSourceArena")))
        }
    }
}

fn decompress_all(algorithm: &CompressionAlgorithm, data: &[u8]) -> Result<Vec<u8>, ArchiveError> {
    match algorithm {
        CompressionAlgorithm::None => Ok(data.to_vec()),
        CompressionAlgorithm::Deflate => {
            let mut decoder = flate2::read::DeflateDecoder::new(data);
            let mut out = Vec::new();
            decoder
                .read_to_end(&mut out)
                .map_err(|e| ArchiveError::compress_fail(format!("deflate: {e}")))?;
            Ok(out)
        }
        CompressionAlgorithm::Zstd => {
            zstd::stream::decode_all(data).map_err(|e| ArchiveError::compress_fail(format!("zstd: {e}")))
        }
        CompressionAlgorithm::Brotli => {
            let mut decompressor = brotli::Decompressor::new(data, 4096);
            let mut out = Vec::new();
            decompressor
                .read_to_end(&mut out)
                .map_err(|e| ArchiveError::compress_fail(format!("brotli: {e}")))?;
            Ok(out)
        }
        CompressionAlgorithm::Bzip2 => Err(ArchiveError::unsupported_algorithm("bzip2")),
        CompressionAlgorithm::Lzma => Err(ArchiveError::unsupported_algorithm("lzma")),
        CompressionAlgorithm::Delta(source) => {
            Err(ArchiveError::unsupported_algorithm(format!("delta({source}) via CompressFrame; use DeltaSourceArena")))
        }
    }
}

/// `CompressionService` factory wiring `flate2`/`zstd`/`brotli`.
#[derive(Debug, Default, Clone, Copy)]
pub struct MultiCodecCompressFrame;

impl MultiCodecCompressFrame {
    pub fn new() -> Self {
        Self
    }
}

impl CompressionService for MultiCodecCompressFrame {
    fn encoder(&self, algorithm: &CompressionAlgorithm) -> Result<Box<dyn Compressor>, ArchiveError> {
        if !algorithm.is_implemented() {
            return Err(ArchiveError::unsupported_algorithm(algorithm.to_string()));
        }
        Ok(Box::new(BufferingCompressor {
            algorithm: algorithm.clone(),
            buffered: Vec::new(),
        }))
    }

    fn decoder(&self, algorithm: &CompressionAlgorithm) -> Result<Box<dyn Decompressor>, ArchiveError> {
        if !algorithm.is_implemented() {
            return Err(ArchiveError::unsupported_algorithm(algorithm.to_string()));
        }
        Ok(Box::new(BufferingDecompressor {
            algorithm: algorithm.clone(),
            buffered: Vec::new(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(algorithm: CompressionAlgorithm, data: &[u8]) {
        let service = MultiCodecCompressFrame::new();
        let mut encoder = service.encoder(&algorithm).unwrap();
        encoder.push(data).unwrap();
        let compressed = encoder.flush_final().unwrap();

        let mut decoder = service.decoder(&algorithm).unwrap();
        decoder.pull(&compressed).unwrap();
        let plain = decoder.flush_final().unwrap();
        assert_eq!(plain, data);
    }

    #[test]
    fn none_round_trips() {
        round_trip(CompressionAlgorithm::None, b"identity payload");
    }

    #[test]
    fn deflate_round_trips() {
        round_trip(CompressionAlgorithm::Deflate, b"the quick brown fox jumps over the lazy dog, repeatedly, repeatedly");
    }

    #[test]
    fn zstd_round_trips() {
        round_trip(CompressionAlgorithm::Zstd, &[7u8; 4096]);
    }

    #[test]
    fn brotli_round_trips() {
        round_trip(CompressionAlgorithm::Brotli, b"brotli test payload brotli test payload");
    }

    #[test]
    fn bzip2_and_lzma_are_unsupported() {
        let service = MultiCodecCompressFrame::new();
        assert!(service.encoder(&CompressionAlgorithm::Bzip2).is_err());
        assert!(service.encoder(&CompressionAlgorithm::Lzma).is_err());
    }

    #[test]
    fn delta_is_rejected_at_flush_not_at_encoder_construction() {
        let service = MultiCodecCompressFrame::new();
        let mut encoder = service.encoder(&CompressionAlgorithm::Delta("a:1".into())).unwrap();
        encoder.push(b"data").unwrap();
        let err = encoder.flush_final().unwrap_err();
        assert_eq!(err.category(), "compression");
    }
}
