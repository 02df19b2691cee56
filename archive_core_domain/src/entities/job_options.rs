// /////////////////////////////////////////////////////////////////////////////
// Archive Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # JobOptions entity
//!
//! Per-archive overrides merged on top of `GlobalOptions` at
//! `ArchiveWriter::create` time (§4.12, §9 Design Notes).

use crate::entities::GlobalOptions;
use crate::value_objects::{CompressionAlgorithm, CryptAlgorithm};
use serde::{Deserialize, Serialize};

/// Resolved from an Open Question (§9): the source's `differential` and
/// `continuous` archive types are observed to behave identically to
/// `incremental` in the write path. Exposed as three variants for
/// forward-compatibility with downstream tooling, but `JobOptions`
/// attaches no behavior difference between them (DESIGN.md).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArchiveType {
    Full,
    Incremental,
    Differential,
    Continuous,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JobOptions {
    pub archive_type: ArchiveType,
    pub compression_algorithm: CompressionAlgorithm,
    pub crypt_algorithm: CryptAlgorithm,
    /// `None` disables splitting: the archive is a single part (§4.5).
    pub part_size: Option<u64>,
    /// `None` means one volume holds every part (§4.6).
    pub volume_size: Option<u64>,
    /// Glob patterns exempted from compression regardless of algorithm
    /// (§4.3 "Compression-skip policy"), together with a minimum entry
    /// size below which compression is skipped outright.
    pub compress_exclude_patterns: Vec<String>,
    pub compress_minimum_size: u64,
    pub error_correction_enabled: bool,
    /// Environment variable to read the passphrase from, when set;
    /// otherwise the configured `PasswordProvider` is consulted
    /// interactively (§4.11).
    pub password_env_var: Option<String>,
    pub weak_password_ok: bool,
}

impl Default for JobOptions {
    fn default() -> Self {
        Self {
            archive_type: ArchiveType::Full,
            compression_algorithm: CompressionAlgorithm::None,
            crypt_algorithm: CryptAlgorithm::None,
            part_size: None,
            volume_size: None,
            compress_exclude_patterns: Vec::new(),
            compress_minimum_size: 0,
            error_correction_enabled: false,
            password_env_var: None,
            weak_password_ok: false,
        }
    }
}

impl JobOptions {
    /// Merges this job's overrides onto a process-wide default. Any field
    /// this `JobOptions` leaves at its own default falls back to the
    /// corresponding `GlobalOptions` value where one exists.
    pub fn merged_with(mut self, globals: &GlobalOptions) -> Self {
        if matches!(self.compression_algorithm, CompressionAlgorithm::None) {
            self.compression_algorithm = globals.default_compression_algorithm.clone();
        }
        if matches!(self.crypt_algorithm, CryptAlgorithm::None) {
            self.crypt_algorithm = globals.default_crypt_algorithm;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_fills_in_global_defaults() {
        let globals = GlobalOptions {
            default_compression_algorithm: CompressionAlgorithm::Deflate,
            ..GlobalOptions::default()
        };
        let merged = JobOptions::default().merged_with(&globals);
        assert_eq!(merged.compression_algorithm, CompressionAlgorithm::Deflate);
    }

    #[test]
    fn merge_keeps_explicit_job_override() {
        let globals = GlobalOptions {
            default_compression_algorithm: CompressionAlgorithm::Deflate,
            ..GlobalOptions::default()
        };
        let job = JobOptions {
            compression_algorithm: CompressionAlgorithm::Zstd,
            ..JobOptions::default()
        };
        let merged = job.merged_with(&globals);
        assert_eq!(merged.compression_algorithm, CompressionAlgorithm::Zstd);
    }
}
