// /////////////////////////////////////////////////////////////////////////////
// Archive Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # PartScheduler
//!
//! Implements §4.5: tracks the current part's byte offset against
//! `JobOptions::part_size`, decides when a split must occur, and drives the
//! rotate sequence (footer, backend close, IndexSink, volume notification,
//! new stream, header re-emission). Grounded on the teacher's
//! `infrastructure::runtime::stage_executor` for the "own exactly one
//! resource, hand control back to the orchestrator between steps" shape,
//! adapted from stage pipelining to part rotation.
//!
//! PartScheduler owns naming and the `StorageBackend`/`IndexStore` ports; it
//! never touches chunk framing. The header/footer bytes it writes during
//! `rotate` are opaque buffers supplied by the caller (`ArchiveWriter`, which
//! owns `ArchiveHeader`/`EntryPipeline`), keeping this type ignorant of the
//! wire format.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use archive_core_domain::repositories::{EntryTableKind, IndexEntryRow, IndexStore, StorageBackend, StorageState, WriteStream};
use archive_core_domain::value_objects::PartNumber;
use archive_core_domain::ArchiveError;

/// Notified by `PartScheduler::rotate` after a part is durably closed and
/// indexed (§4.5 rotate step 4, §4.6). A plain-directory job never needs
/// anything here; optical/removable-media jobs implement it via
/// `VolumeManager`.
#[async_trait]
pub trait VolumeCoordinator: Send + Sync {
    async fn on_part_closed(&self, part_number: PartNumber, part_name: &str, size: u64) -> Result<(), ArchiveError>;
}

/// Does nothing. The default for jobs that write directly to a directory or
/// a non-removable remote target.
pub struct NoVolumeCoordination;

#[async_trait]
impl VolumeCoordinator for NoVolumeCoordination {
    async fn on_part_closed(&self, _part_number: PartNumber, _part_name: &str, _size: u64) -> Result<(), ArchiveError> {
        Ok(())
    }
}

pub struct PartScheduler {
    backend: Arc<dyn StorageBackend>,
    index: Arc<dyn IndexStore>,
    volumes: Arc<dyn VolumeCoordinator>,
    archive_name: String,
    part_size: Option<u64>,
    /// Set once `part_size` is configured: the source always numbers parts
    /// from the first one in that mode, even if a split never actually
    /// fires, rather than renaming a fitted-in-one-part archive after the
    /// fact (DESIGN.md Open Question).
    numbered: bool,
    part_number: PartNumber,
    current_offset: u64,
    pending_entries: Vec<(EntryTableKind, IndexEntryRow)>,
}

impl PartScheduler {
    pub fn new(
        backend: Arc<dyn StorageBackend>,
        index: Arc<dyn IndexStore>,
        volumes: Arc<dyn VolumeCoordinator>,
        archive_name: impl Into<String>,
        part_size: Option<u64>,
    ) -> Self {
        Self {
            backend,
            index,
            volumes,
            archive_name: archive_name.into(),
            numbered: part_size.is_some(),
            part_size,
            part_number: PartNumber::FIRST,
            current_offset: 0,
            pending_entries: Vec::new(),
        }
    }

    pub fn part_number(&self) -> PartNumber {
        self.part_number
    }

    pub fn current_offset(&self) -> u64 {
        self.current_offset
    }

    pub fn current_part_name(&self) -> String {
        self.part_number.part_file_name(&self.archive_name, !self.numbered)
    }

    /// Opens the backend stream for the archive's first part. Subsequent
    /// parts are opened by `rotate`.
    pub async fn open_first_part(&self) -> Result<Box<dyn WriteStream>, ArchiveError> {
        self.backend.create(&self.current_part_name()).await
    }

    /// `writeBytes(n)` — advances the current part's offset.
    pub fn write_bytes(&mut self, n: u64) {
        self.current_offset += n;
    }

    /// `checkSplit()` — true when writing `pending` more bytes without
    /// splitting would cross `part_size`. Always false when splitting is
    /// disabled.
    pub fn check_split(&self, pending: u64) -> bool {
        match self.part_size {
            None => false,
            Some(limit) => self.current_offset + pending >= limit,
        }
    }

    /// Queues one entry's index row to be written once the part closes
    /// (§4.9: index writes happen per-part, not per-entry).
    pub fn queue_index_row(&mut self, kind: EntryTableKind, row: IndexEntryRow) {
        self.pending_entries.push((kind, row));
    }

    /// `rotate()` — §4.5 rotate sequence steps 2-6. The caller is
    /// responsible for step 1 (EntryPipeline finalizing its current chunks)
    /// before calling this, and step 7 (re-beginning the in-progress entry)
    /// after it returns.
    ///
    /// `footer` is the already-framed footer chunk to append to the closing
    /// part; `header` is the already-framed BAR magic + optional KEY chunk
    /// to prepend to the new part.
    pub async fn rotate(&mut self, mut stream: Box<dyn WriteStream>, footer: &[u8], header: &[u8]) -> Result<Box<dyn WriteStream>, ArchiveError> {
        stream.write_all(footer).await?;
        stream.flush().await?;
        let size = stream.tell().await?;
        stream.close().await?;

        let closing_name = self.current_part_name();
        self.index_closed_part(&closing_name, size).await?;
        self.volumes.on_part_closed(self.part_number, &closing_name, size).await?;

        self.part_number = self.part_number.next();
        self.current_offset = 0;

        let new_name = self.current_part_name();
        let mut new_stream = self.backend.create(&new_name).await?;
        new_stream.write_all(header).await?;
        self.current_offset += header.len() as u64;
        Ok(new_stream)
    }

    /// Durably closes the final part without rotating into a new one:
    /// writes the footer, closes the backend stream, indexes it.
    pub async fn finish(&mut self, mut stream: Box<dyn WriteStream>, footer: &[u8]) -> Result<(), ArchiveError> {
        stream.write_all(footer).await?;
        stream.flush().await?;
        let size = stream.tell().await?;
        stream.close().await?;

        let name = self.current_part_name();
        self.index_closed_part(&name, size).await
    }

    async fn index_closed_part(&mut self, name: &str, size: u64) -> Result<(), ArchiveError> {
        let storage_id = self.index.add_storage(name, size).await?;
        for (kind, row) in self.pending_entries.drain(..) {
            self.index.add_entry(storage_id, kind, row).await?;
        }
        self.index
            .set_storage_state(storage_id, StorageState::Ok, Utc::now(), None)
            .await?;
        Ok(())
    }
}
