// /////////////////////////////////////////////////////////////////////////////
// Archive Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Compression Algorithm
//!
//! The `compressAlgorithm` field of an entry header (§6). `None`/`Deflate`
//! map directly onto crates in the dependency stack; `Bzip2`/`Lzma` are
//! complete wire/type-system citizens with no available codec crate, so
//! their encoders return `ArchiveError::unsupported_algorithm` (see
//! `CompressFrame`'s crate-mapping note in SPEC_FULL.md §4.3 — the same
//! pattern the teacher uses for its own unimplemented algorithm variants).
//! `Zstd`/`Brotli` are bonus algorithms beyond the spec's minimum menu.

use crate::ArchiveError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompressionAlgorithm {
    None,
    Deflate,
    Bzip2,
    Lzma,
    Zstd,
    Brotli,
    /// Delta-encode against the named prior archive entry (`archive:entry`).
    Delta(String),
}

impl CompressionAlgorithm {
    pub fn wire_code(&self) -> u8 {
        match self {
            CompressionAlgorithm::None => 0,
            CompressionAlgorithm::Deflate => 1,
            CompressionAlgorithm::Bzip2 => 2,
            CompressionAlgorithm::Lzma => 3,
            CompressionAlgorithm::Zstd => 4,
            CompressionAlgorithm::Brotli => 5,
            CompressionAlgorithm::Delta(_) => 6,
        }
    }

    pub fn from_wire_code(code: u8, delta_source: Option<String>) -> Result<Self, ArchiveError> {
        match code {
            0 => Ok(CompressionAlgorithm::None),
            1 => Ok(CompressionAlgorithm::Deflate),
            2 => Ok(CompressionAlgorithm::Bzip2),
            3 => Ok(CompressionAlgorithm::Lzma),
            4 => Ok(CompressionAlgorithm::Zstd),
            5 => Ok(CompressionAlgorithm::Brotli),
            6 => Ok(CompressionAlgorithm::Delta(delta_source.ok_or_else(|| {
                ArchiveError::chunk_framing("delta compression algorithm missing source name")
            })?)),
            other => Err(ArchiveError::unsupported_algorithm(format!("compression code {other}"))),
        }
    }

    /// Whether an encoder/decoder is actually wired up in this codebase.
    pub fn is_implemented(&self) -> bool {
        !matches!(self, CompressionAlgorithm::Bzip2 | CompressionAlgorithm::Lzma)
    }
}

impl std::fmt::Display for CompressionAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompressionAlgorithm::None => write!(f, "none"),
            CompressionAlgorithm::Deflate => write!(f, "deflate"),
            CompressionAlgorithm::Bzip2 => write!(f, "bzip2"),
            CompressionAlgorithm::Lzma => write!(f, "lzma"),
            CompressionAlgorithm::Zstd => write!(f, "zstd"),
            CompressionAlgorithm::Brotli => write!(f, "brotli"),
            CompressionAlgorithm::Delta(source) => write!(f, "delta({source})"),
        }
    }
}

impl std::str::FromStr for CompressionAlgorithm {
    type Err = ArchiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        if let Some(inner) = lower.strip_prefix("delta(").and_then(|rest| rest.strip_suffix(')')) {
            if inner.is_empty() {
                return Err(ArchiveError::unsupported_algorithm("delta() missing source name"));
            }
            return Ok(CompressionAlgorithm::Delta(inner.to_string()));
        }
        match lower.as_str() {
            "none" => Ok(CompressionAlgorithm::None),
            "deflate" => Ok(CompressionAlgorithm::Deflate),
            "bzip2" => Ok(CompressionAlgorithm::Bzip2),
            "lzma" => Ok(CompressionAlgorithm::Lzma),
            "zstd" => Ok(CompressionAlgorithm::Zstd),
            "brotli" => Ok(CompressionAlgorithm::Brotli),
            other => Err(ArchiveError::unsupported_algorithm(format!("compression algorithm name '{other}'"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_code_round_trips() {
        for (alg, code) in [
            (CompressionAlgorithm::None, 0),
            (CompressionAlgorithm::Deflate, 1),
            (CompressionAlgorithm::Zstd, 4),
            (CompressionAlgorithm::Brotli, 5),
        ] {
            assert_eq!(alg.wire_code(), code);
            assert_eq!(CompressionAlgorithm::from_wire_code(code, None).unwrap(), alg);
        }
    }

    #[test]
    fn bzip2_and_lzma_are_not_implemented() {
        assert!(!CompressionAlgorithm::Bzip2.is_implemented());
        assert!(!CompressionAlgorithm::Lzma.is_implemented());
        assert!(CompressionAlgorithm::Deflate.is_implemented());
    }

    #[test]
    fn delta_requires_a_source_name() {
        assert!(CompressionAlgorithm::from_wire_code(6, None).is_err());
        assert!(CompressionAlgorithm::from_wire_code(6, Some("a:v1".into())).is_ok());
    }

    #[test]
    fn from_str_round_trips_through_display() {
        use std::str::FromStr;
        for alg in [
            CompressionAlgorithm::None,
            CompressionAlgorithm::Deflate,
            CompressionAlgorithm::Zstd,
            CompressionAlgorithm::Brotli,
            CompressionAlgorithm::Delta("archiveA:V1".to_string()),
        ] {
            assert_eq!(CompressionAlgorithm::from_str(&alg.to_string()).unwrap(), alg);
        }
    }

    #[test]
    fn from_str_rejects_unknown_names() {
        use std::str::FromStr;
        assert!(CompressionAlgorithm::from_str("lz4").is_err());
    }
}
