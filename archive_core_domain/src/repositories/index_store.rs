// /////////////////////////////////////////////////////////////////////////////
// Archive Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # IndexStore port
//!
//! The index database interface of §6 / §4.9: one `storage` row per archive
//! part, plus per-kind child rows for each entry it contains. Index writes
//! are best-effort — a failure here is logged and surfaced but never aborts
//! the archive (§4.9 "Idempotence").

use crate::ArchiveError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Lifecycle state of a `storage` row (§4.9 "State machine").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageState {
    Create,
    Ok,
    UpdateRequested,
    Update,
    Error,
}

impl StorageState {
    pub fn as_str(self) -> &'static str {
        match self {
            StorageState::Create => "CREATE",
            StorageState::Ok => "OK",
            StorageState::UpdateRequested => "UPDATE_REQUESTED",
            StorageState::Update => "UPDATE",
            StorageState::Error => "ERROR",
        }
    }

    pub fn from_str(s: &str) -> Result<Self, ArchiveError> {
        match s {
            "CREATE" => Ok(StorageState::Create),
            "OK" => Ok(StorageState::Ok),
            "UPDATE_REQUESTED" => Ok(StorageState::UpdateRequested),
            "UPDATE" => Ok(StorageState::Update),
            "ERROR" => Ok(StorageState::Error),
            other => Err(ArchiveError::bad_state(format!("unknown storage state {other}"))),
        }
    }
}

/// One row of the `storage` table.
#[derive(Debug, Clone)]
pub struct StorageRow {
    pub id: i64,
    pub name: String,
    pub size: u64,
    pub state: StorageState,
    pub last_checked: Option<DateTime<Utc>>,
    pub error_message: Option<String>,
}

/// One row of a per-kind entry child table, carrying the union of columns
/// named in §4.9 ("fragmentOffset/fragmentSize for file-like kinds,
/// blockOffset/blockCount for images, destination for links,
/// specialType/major/minor for specials"). Kept as one shape rather than six
/// near-identical structs; adapters populate only the fields their kind uses.
#[derive(Debug, Clone, Default)]
pub struct IndexEntryRow {
    pub path: String,
    pub size: Option<u64>,
    pub mtime: Option<DateTime<Utc>>,
    pub uid: Option<u32>,
    pub gid: Option<u32>,
    pub fragment_offset: Option<u64>,
    pub fragment_size: Option<u64>,
    pub block_offset: Option<u64>,
    pub block_count: Option<u64>,
    pub destination: Option<String>,
    pub special_type: Option<u8>,
    pub major: Option<u32>,
    pub minor: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryTableKind {
    File,
    Image,
    Dir,
    Link,
    HardLink,
    Special,
}

/// The index database interface consumed by IndexSink (§6, §4.9).
#[async_trait]
pub trait IndexStore: Send + Sync {
    async fn add_storage(&self, name: &str, size: u64) -> Result<i64, ArchiveError>;

    async fn update_storage(&self, id: i64, name: &str, size: u64) -> Result<(), ArchiveError>;

    async fn set_storage_state(
        &self,
        id: i64,
        state: StorageState,
        checked_at: DateTime<Utc>,
        error_message: Option<&str>,
    ) -> Result<(), ArchiveError>;

    async fn delete_storage(&self, id: i64) -> Result<(), ArchiveError>;

    /// Deletes all child rows for a storage row, keeping the row itself —
    /// used before re-indexing the same archive (§4.9 "Idempotence").
    async fn clear_storage(&self, id: i64) -> Result<(), ArchiveError>;

    async fn add_entry(&self, storage_id: i64, kind: EntryTableKind, row: IndexEntryRow) -> Result<(), ArchiveError>;

    async fn find_storage_by_name(&self, name: &str) -> Result<Option<StorageRow>, ArchiveError>;

    async fn list_storage_by_name_glob(&self, pattern: &str) -> Result<Vec<StorageRow>, ArchiveError>;

    async fn list_storage_by_state(&self, state: StorageState) -> Result<Vec<StorageRow>, ArchiveError>;
}
