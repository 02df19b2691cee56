// /////////////////////////////////////////////////////////////////////////////
// Archive Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Archive Metrics entity
//!
//! Cumulative counters for one archive job, mirroring the teacher's
//! `ProcessingMetrics` shape but scoped to the archiver's own operations
//! (§10 Ambient Stack: "bytes written, chunks framed, parts rotated,
//! volumes changed, decrypt failures"). The infrastructure layer exposes
//! these as `prometheus` counters/gauges; this entity is the
//! runtime-agnostic accumulator they read from.

use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters updated by ChunkIO, PartScheduler, VolumeManager,
/// and CryptFrame as an archive job runs. `Ordering::Relaxed` is sufficient
/// everywhere: these are independent counters with no cross-field
/// invariant that a reader depends on observing atomically.
#[derive(Debug, Default)]
pub struct ArchiveMetrics {
    bytes_written: AtomicU64,
    chunks_framed: AtomicU64,
    parts_rotated: AtomicU64,
    volumes_changed: AtomicU64,
    decrypt_failures: AtomicU64,
}

impl ArchiveMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_bytes_written(&self, n: u64) {
        self.bytes_written.fetch_add(n, Ordering::Relaxed);
    }

    pub fn record_chunk_framed(&self) {
        self.chunks_framed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_part_rotated(&self) {
        self.parts_rotated.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_volume_changed(&self) {
        self.volumes_changed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_decrypt_failure(&self) {
        self.decrypt_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written.load(Ordering::Relaxed)
    }

    pub fn chunks_framed(&self) -> u64 {
        self.chunks_framed.load(Ordering::Relaxed)
    }

    pub fn parts_rotated(&self) -> u64 {
        self.parts_rotated.load(Ordering::Relaxed)
    }

    pub fn volumes_changed(&self) -> u64 {
        self.volumes_changed.load(Ordering::Relaxed)
    }

    pub fn decrypt_failures(&self) -> u64 {
        self.decrypt_failures.load(Ordering::Relaxed)
    }
}
