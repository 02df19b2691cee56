// /////////////////////////////////////////////////////////////////////////////
// Archive Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # DeltaSourceLoader port
//!
//! `delta(sourceName)` compression (§4.3) needs random access to a named
//! prior archive's entry bytes, not a streaming push/pull interface. This
//! port is the pluggable capability `DeltaSourceArena` (§4.13) calls to
//! materialize those bytes; the concrete implementation knows how to open
//! a named archive through a `StorageBackend` and run it through
//! `ArchiveReader` to recover one entry's plaintext.

use async_trait::async_trait;

use crate::ArchiveError;

/// Materializes the bytes of one entry from a previously-stored archive,
/// identified by archive name and entry path.
#[async_trait]
pub trait DeltaSourceLoader: Send + Sync {
    async fn load_source_bytes(&self, archive_name: &str, entry_path: &str) -> Result<Vec<u8>, ArchiveError>;
}
