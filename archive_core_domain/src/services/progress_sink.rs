// /////////////////////////////////////////////////////////////////////////////
// Archive Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # ProgressSink capability
//!
//! Replaces the teacher's callback-pointer-with-void-context pattern (§9
//! Design Notes) for the progress callback named in §6. Implementations
//! range from a no-op (library use) to a terminal bar (CLI use) to an
//! `mpsc` channel forwarding to a UI.

/// A point-in-time snapshot handed to `ProgressSink::on_progress` (§6
/// "progress(ctx, status)"). Counts are cumulative across the whole job,
/// not per-entry.
#[derive(Debug, Clone)]
pub struct ProgressStatus {
    pub current_entry: String,
    pub entries_done: u64,
    pub entries_total: Option<u64>,
    pub bytes_done: u64,
    pub bytes_total: Option<u64>,
}

pub trait ProgressSink: Send + Sync {
    fn on_progress(&self, status: &ProgressStatus);
}

/// Discards every on_progress. Used when the caller has no UI to drive.
pub struct NullProgressSink;

impl ProgressSink for NullProgressSink {
    fn on_progress(&self, _status: &ProgressStatus) {}
}
