// /////////////////////////////////////////////////////////////////////////////
// Archive Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Domain Error System
//!
//! A single hierarchical error type for the archive core domain. Every
//! failure mode named in the error taxonomy (format, crypto, compression,
//! pipeline, scheduling, backend, control) is a distinct variant so that
//! retry and propagation decisions can match on `kind()` rather than on a
//! string or an error source chain.
//!
//! ## Design Principles
//!
//! - **Specific**: one variant per failure mode, not a generic "it broke"
//! - **Actionable**: every variant carries enough context to log or retry
//! - **Categorized**: `category()` groups variants the way the taxonomy does
//! - **Recoverable**: `is_recoverable()` flags retryable conditions
//!
//! ## Integration
//!
//! - **Standard Library**: automatic conversion from `std::io::Error`
//! - **Serialization**: automatic conversion from `serde_json::Error`
//! - **Logging**: `category()` is a stable, low-cardinality label suitable
//!   for log fields and metrics

use thiserror::Error;

/// Domain-specific errors for the archive core.
///
/// Each variant corresponds to one kind from the error taxonomy. Variants
/// that map 1:1 onto a taxonomy kind are named after it; a handful of
/// variants (`Io`, `Serialization`, `Internal`) exist for interop with the
/// standard library and are not part of the taxonomy itself.
#[derive(Error, Debug, Clone)]
pub enum ArchiveError {
    // --- Format ---
    #[error("chunk framing error: {0}")]
    ChunkFraming(String),
    #[error("chunk truncated: {0}")]
    ChunkTruncated(String),
    #[error("bad magic: {0}")]
    BadMagic(String),
    #[error("unsupported format version: {0}")]
    UnsupportedVersion(String),

    // --- Crypto ---
    #[error("no password available for encryption: {0}")]
    NoCryptPassword(String),
    #[error("wrong password")]
    WrongPassword,
    #[error("decryption failed: {0}")]
    DecryptFail(String),
    #[error("key unavailable: {0}")]
    KeyUnavailable(String),
    #[error("asymmetric key mismatch: {0}")]
    AsymmetricKeyMismatch(String),

    // --- Compression ---
    #[error("compression failed: {0}")]
    CompressFail(String),
    #[error("decompression failed: {0}")]
    DecompressFail(String),
    #[error("delta source not found: {0}")]
    DeltaSourceNotFound(String),
    #[error("delta source size mismatch: {0}")]
    DeltaSourceSizeMismatch(String),

    // --- Pipeline ---
    #[error("entry size mismatch: {0}")]
    EntrySizeMismatch(String),
    #[error("entry incomplete: {0}")]
    EntryIncomplete(String),
    #[error("bad state: {0}")]
    BadState(String),
    #[error("invalid chunk: {0}")]
    InvalidChunk(String),
    #[error("validation error: {0}")]
    ValidationError(String),
    #[error("integrity error: {0}")]
    IntegrityError(String),

    // --- Scheduling ---
    #[error("part rotate failed: {0}")]
    PartRotateFail(String),
    #[error("volume load failed: {0}")]
    VolumeLoadFail(String),
    #[error("invalid command template: {0}")]
    TemplateInvalid(String),

    // --- Backend ---
    #[error("transient backend error: {0}")]
    BackendTransient(String),
    #[error("backend error: {0}")]
    BackendFail(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("already exists: {0}")]
    Exists(String),

    // --- Control ---
    #[error("aborted: {0}")]
    Aborted(String),
    #[error("timeout: {0}")]
    Timeout(String),

    // --- Interop / internal ---
    #[error("io error: {0}")]
    Io(String),
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("database error: {0}")]
    Database(String),
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ArchiveError {
    pub fn chunk_framing(msg: impl Into<String>) -> Self {
        Self::ChunkFraming(msg.into())
    }

    pub fn chunk_truncated(msg: impl Into<String>) -> Self {
        Self::ChunkTruncated(msg.into())
    }

    pub fn bad_magic(msg: impl Into<String>) -> Self {
        Self::BadMagic(msg.into())
    }

    pub fn unsupported_version(msg: impl Into<String>) -> Self {
        Self::UnsupportedVersion(msg.into())
    }

    pub fn no_crypt_password(msg: impl Into<String>) -> Self {
        Self::NoCryptPassword(msg.into())
    }

    pub fn key_unavailable(msg: impl Into<String>) -> Self {
        Self::KeyUnavailable(msg.into())
    }

    pub fn asymmetric_key_mismatch(msg: impl Into<String>) -> Self {
        Self::AsymmetricKeyMismatch(msg.into())
    }

    pub fn entry_incomplete(msg: impl Into<String>) -> Self {
        Self::EntryIncomplete(msg.into())
    }

    pub fn part_rotate_fail(msg: impl Into<String>) -> Self {
        Self::PartRotateFail(msg.into())
    }

    pub fn volume_load_fail(msg: impl Into<String>) -> Self {
        Self::VolumeLoadFail(msg.into())
    }

    pub fn template_invalid(msg: impl Into<String>) -> Self {
        Self::TemplateInvalid(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn exists(msg: impl Into<String>) -> Self {
        Self::Exists(msg.into())
    }

    pub fn aborted(msg: impl Into<String>) -> Self {
        Self::Aborted(msg.into())
    }

    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::Timeout(msg.into())
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    pub fn decrypt_fail(msg: impl Into<String>) -> Self {
        Self::DecryptFail(msg.into())
    }

    pub fn compress_fail(msg: impl Into<String>) -> Self {
        Self::CompressFail(msg.into())
    }

    pub fn unsupported_algorithm(msg: impl Into<String>) -> Self {
        Self::CompressFail(format!("unsupported algorithm: {}", msg.into()))
    }

    pub fn delta_source_not_found(msg: impl Into<String>) -> Self {
        Self::DeltaSourceNotFound(msg.into())
    }

    pub fn delta_source_size_mismatch(msg: impl Into<String>) -> Self {
        Self::DeltaSourceSizeMismatch(msg.into())
    }

    pub fn entry_size_mismatch(msg: impl Into<String>) -> Self {
        Self::EntrySizeMismatch(msg.into())
    }

    pub fn bad_state(msg: impl Into<String>) -> Self {
        Self::BadState(msg.into())
    }

    pub fn backend_fail(msg: impl Into<String>) -> Self {
        Self::BackendFail(msg.into())
    }

    pub fn backend_transient(msg: impl Into<String>) -> Self {
        Self::BackendTransient(msg.into())
    }

    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether an automatic retry is appropriate for this failure.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ArchiveError::BackendTransient(_) | ArchiveError::Timeout(_))
    }

    /// Whether the error originates in the cryptographic path.
    pub fn is_crypto_error(&self) -> bool {
        matches!(
            self,
            ArchiveError::NoCryptPassword(_)
                | ArchiveError::WrongPassword
                | ArchiveError::DecryptFail(_)
                | ArchiveError::KeyUnavailable(_)
                | ArchiveError::AsymmetricKeyMismatch(_)
        )
    }

    /// Stable, low-cardinality category label, matching the taxonomy's
    /// top-level groups (Format, Crypto, Compression, Pipeline, Scheduling,
    /// Backend, Control).
    pub fn category(&self) -> &'static str {
        match self {
            ArchiveError::ChunkFraming(_)
            | ArchiveError::ChunkTruncated(_)
            | ArchiveError::BadMagic(_)
            | ArchiveError::UnsupportedVersion(_) => "format",
            ArchiveError::NoCryptPassword(_)
            | ArchiveError::WrongPassword
            | ArchiveError::DecryptFail(_)
            | ArchiveError::KeyUnavailable(_)
            | ArchiveError::AsymmetricKeyMismatch(_) => "crypto",
            ArchiveError::CompressFail(_)
            | ArchiveError::DecompressFail(_)
            | ArchiveError::DeltaSourceNotFound(_)
            | ArchiveError::DeltaSourceSizeMismatch(_) => "compression",
            ArchiveError::EntrySizeMismatch(_)
            | ArchiveError::EntryIncomplete(_)
            | ArchiveError::BadState(_)
            | ArchiveError::InvalidChunk(_)
            | ArchiveError::ValidationError(_)
            | ArchiveError::IntegrityError(_) => "pipeline",
            ArchiveError::PartRotateFail(_) | ArchiveError::VolumeLoadFail(_) | ArchiveError::TemplateInvalid(_) => {
                "scheduling"
            }
            ArchiveError::BackendTransient(_)
            | ArchiveError::BackendFail(_)
            | ArchiveError::NotFound(_)
            | ArchiveError::Exists(_) => "backend",
            ArchiveError::Aborted(_) | ArchiveError::Timeout(_) => "control",
            ArchiveError::Io(_) => "io",
            ArchiveError::Serialization(_) => "serialization",
            ArchiveError::Database(_) => "database",
            ArchiveError::InvalidConfiguration(_) => "configuration",
            ArchiveError::Internal(_) => "internal",
        }
    }
}

impl From<std::io::Error> for ArchiveError {
    fn from(err: std::io::Error) -> Self {
        ArchiveError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for ArchiveError {
    fn from(err: serde_json::Error) -> Self {
        ArchiveError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_groups_match_taxonomy() {
        assert_eq!(ArchiveError::chunk_framing("x").category(), "format");
        assert_eq!(ArchiveError::WrongPassword.category(), "crypto");
        assert_eq!(ArchiveError::compress_fail("x").category(), "compression");
        assert_eq!(ArchiveError::bad_state("x").category(), "pipeline");
        assert_eq!(ArchiveError::backend_fail("x").category(), "backend");
        assert_eq!(ArchiveError::Aborted("x".into()).category(), "control");
    }

    #[test]
    fn backend_transient_is_recoverable() {
        assert!(ArchiveError::backend_transient("retry me").is_recoverable());
        assert!(!ArchiveError::backend_fail("no retry").is_recoverable());
    }

    #[test]
    fn crypto_errors_are_flagged() {
        assert!(ArchiveError::decrypt_fail("bad tag").is_crypto_error());
        assert!(!ArchiveError::compress_fail("x").is_crypto_error());
    }

    #[test]
    fn io_error_converts() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: ArchiveError = io_err.into();
        assert_eq!(err.category(), "io");
    }
}
