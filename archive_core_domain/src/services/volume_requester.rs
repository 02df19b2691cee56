// /////////////////////////////////////////////////////////////////////////////
// Archive Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # VolumeRequester capability
//!
//! Replaces the teacher's callback-pointer-with-void-context pattern (§9
//! Design Notes) for VolumeManager's medium-change protocol (§4.6): when a
//! part fills and the backend can't hold another (removable media, a
//! single-file-per-call remote target), PartScheduler asks the operator
//! (CLI prompt, or an automated policy) what to do next.

use crate::value_objects::VolumeNumber;
use crate::ArchiveError;

/// What kind of medium swap is being requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeKind {
    /// The next volume of a multi-volume set (removable media).
    NextVolume,
    /// The same volume is being reloaded, e.g. after an I/O error.
    Reload,
}

/// The operator's answer to a volume-change request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeDecision {
    /// The requested volume is mounted; proceed.
    Ok,
    /// Skip this volume's remaining content and carry on.
    Unload,
    /// Abandon the job entirely.
    Aborted,
}

pub trait VolumeRequester: Send + Sync {
    /// `message` is operator-facing text describing what to insert/eject
    /// (§4.6 "Medium-change protocol"). Returns `Err` only for transport
    /// failures talking to the operator channel itself — the operator's
    /// actual choice, including giving up, comes back as `VolumeDecision`.
    fn request_volume(
        &self,
        kind: VolumeKind,
        volume_number: VolumeNumber,
        message: &str,
    ) -> Result<VolumeDecision, ArchiveError>;
}
