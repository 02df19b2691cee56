// /////////////////////////////////////////////////////////////////////////////
// Archive Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Prometheus metrics (§10 Ambient Stack)
//!
//! Grounded on the teacher's `infrastructure::metrics::MetricsService`:
//! named `prometheus` counters registered once against an owned `Registry`,
//! with `record_*` methods the application layer calls as it works and a
//! `get_metrics()` text-exposition accessor for a `/metrics` endpoint or a
//! CLI summary.
//!
//! Each counter mirrors a field on `archive_core_domain::entities::ArchiveMetrics`
//! — `record_*` updates both the `prometheus::IntCounter` (for exposition)
//! and the domain accumulator (for a runtime-agnostic read, e.g. the CLI's
//! end-of-job summary) together, so the two never drift apart.

use std::sync::Arc;

use archive_core_domain::entities::ArchiveMetrics;
use archive_core_domain::ArchiveError;
use prometheus::{IntCounter, Opts, Registry, TextEncoder};

const NAMESPACE: &str = "archive_core";

/// Owns the `prometheus::Registry` and the counters archive jobs update as
/// they run.
pub struct MetricsService {
    registry: Registry,
    accumulator: Arc<ArchiveMetrics>,
    bytes_written: IntCounter,
    chunks_framed: IntCounter,
    parts_rotated: IntCounter,
    volumes_changed: IntCounter,
    decrypt_failures: IntCounter,
}

impl MetricsService {
    pub fn new() -> Result<Self, ArchiveError> {
        let registry = Registry::new();

        let bytes_written = Self::register_counter(&registry, "bytes_written_total", "Bytes of entry payload written across all fragments")?;
        let chunks_framed = Self::register_counter(&registry, "chunks_framed_total", "Data chunks framed by EntryPipelineWriter")?;
        let parts_rotated = Self::register_counter(&registry, "parts_rotated_total", "Part splits performed by PartScheduler")?;
        let volumes_changed = Self::register_counter(&registry, "volumes_changed_total", "Removable-medium changes accepted by VolumeManager")?;
        let decrypt_failures = Self::register_counter(&registry, "decrypt_failures_total", "AEAD fragment decryptions that failed")?;

        Ok(Self {
            registry,
            accumulator: Arc::new(ArchiveMetrics::new()),
            bytes_written,
            chunks_framed,
            parts_rotated,
            volumes_changed,
            decrypt_failures,
        })
    }

    fn register_counter(registry: &Registry, name: &str, help: &str) -> Result<IntCounter, ArchiveError> {
        let counter = IntCounter::with_opts(Opts::new(name, help).namespace(NAMESPACE))
            .map_err(|e| ArchiveError::bad_state(format!("building metric '{name}': {e}")))?;
        registry
            .register(Box::new(counter.clone()))
            .map_err(|e| ArchiveError::bad_state(format!("registering metric '{name}': {e}")))?;
        Ok(counter)
    }

    pub fn record_bytes_written(&self, n: u64) {
        self.bytes_written.inc_by(n);
        self.accumulator.record_bytes_written(n);
    }

    pub fn record_chunk_framed(&self) {
        self.chunks_framed.inc();
        self.accumulator.record_chunk_framed();
    }

    pub fn record_part_rotated(&self) {
        self.parts_rotated.inc();
        self.accumulator.record_part_rotated();
    }

    pub fn record_volume_changed(&self) {
        self.volumes_changed.inc();
        self.accumulator.record_volume_changed();
    }

    pub fn record_decrypt_failure(&self) {
        self.decrypt_failures.inc();
        self.accumulator.record_decrypt_failure();
    }

    /// The runtime-agnostic accumulator backing these counters, for callers
    /// that want plain numbers (the CLI's end-of-job summary) without
    /// depending on `prometheus`.
    pub fn accumulator(&self) -> &ArchiveMetrics {
        &self.accumulator
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Renders every registered metric in Prometheus text exposition format.
    pub fn get_metrics(&self) -> Result<String, ArchiveError> {
        let families = self.registry.gather();
        TextEncoder::new()
            .encode_to_string(&families)
            .map_err(|e| ArchiveError::bad_state(format!("encoding metrics: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recorded_counters_show_up_in_text_exposition() {
        let metrics = MetricsService::new().unwrap();
        metrics.record_bytes_written(42);
        metrics.record_chunk_framed();
        metrics.record_decrypt_failure();

        assert_eq!(metrics.accumulator().bytes_written(), 42);
        let text = metrics.get_metrics().unwrap();
        assert!(text.contains("archive_core_bytes_written_total 42"));
        assert!(text.contains("archive_core_chunks_framed_total 1"));
        assert!(text.contains("archive_core_decrypt_failures_total 1"));
    }
}
