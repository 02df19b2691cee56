// /////////////////////////////////////////////////////////////////////////////
// Archive Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # PasswordProvider capability
//!
//! Replaces the teacher's callback-pointer-with-void-context pattern (§9
//! Design Notes) with a trait object the bootstrap crate implements once —
//! interactively (terminal prompt) or non-interactively (env var, key file) —
//! and injects into whichever component needs a passphrase (§4.11, §4.2).

use crate::ArchiveError;

/// What the passphrase is for, so a terminal implementation can word its
/// prompt ("Enter password:" vs "Enter password again to confirm:").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordKind {
    /// First entry when creating an encrypted archive.
    NewArchive,
    /// Confirmation re-entry, compared against the first for a match.
    Confirm,
    /// Entry when opening an existing encrypted archive for read.
    ExistingArchive,
}

pub trait PasswordProvider: Send + Sync {
    /// Returns the passphrase as owned bytes. The caller zeroizes the
    /// buffer once the derived key has been computed.
    ///
    /// `validate` asks the provider to re-prompt until two entries match
    /// (relevant only for `PasswordKind::NewArchive`/`Confirm` pairs);
    /// `weak_check` asks it to warn — never reject — when the passphrase
    /// scores below `GlobalOptions::weak_password_threshold` (§9).
    fn get_password(&self, kind: PasswordKind, validate: bool, weak_check: bool) -> Result<Vec<u8>, ArchiveError>;
}
