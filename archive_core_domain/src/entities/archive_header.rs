// /////////////////////////////////////////////////////////////////////////////
// Archive Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Archive Header entity
//!
//! The `BAR0` chunk payload (§6): format version plus the archive-wide salt
//! used both for passphrase key derivation and per-fragment IV derivation
//! (§4.2). One header is written at the start of every part; parts after
//! the first repeat it verbatim so a reader can open any part standalone.

use crate::value_objects::ArchiveSalt;
use crate::ArchiveError;

/// Four-byte magic that opens every part, matching the `"BAR\0"` literal of
/// §6's `PART` grammar.
pub const MAGIC: [u8; 4] = *b"BAR\0";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveHeader {
    version_major: u32,
    version_minor: u32,
    salt: ArchiveSalt,
}

impl ArchiveHeader {
    /// Current on-disk format version written by this implementation.
    pub const CURRENT_VERSION_MAJOR: u32 = 1;
    pub const CURRENT_VERSION_MINOR: u32 = 0;

    pub fn new(salt: ArchiveSalt) -> Self {
        Self {
            version_major: Self::CURRENT_VERSION_MAJOR,
            version_minor: Self::CURRENT_VERSION_MINOR,
            salt,
        }
    }

    /// Reconstructs a header read off the wire, where the version fields may
    /// not be `CURRENT_VERSION_MAJOR`/`MINOR` — use `check_readable` to
    /// validate before trusting the rest of the part.
    pub fn from_wire(version_major: u32, version_minor: u32, salt: ArchiveSalt) -> Self {
        Self { version_major, version_minor, salt }
    }

    pub fn version_major(&self) -> u32 {
        self.version_major
    }

    pub fn version_minor(&self) -> u32 {
        self.version_minor
    }

    pub fn salt(&self) -> &ArchiveSalt {
        &self.salt
    }

    /// Validates a header read off the wire (§6 "Versioning"): the major
    /// version must match exactly, a newer minor version is accepted since
    /// unknown chunks it introduces are skippable.
    pub fn check_readable(&self) -> Result<(), ArchiveError> {
        if self.version_major != Self::CURRENT_VERSION_MAJOR {
            return Err(ArchiveError::unsupported_version(format!(
                "archive major version {} is not readable by this build (expects {})",
                self.version_major,
                Self::CURRENT_VERSION_MAJOR
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_header_uses_current_version() {
        let header = ArchiveHeader::new(ArchiveSalt::generate());
        assert_eq!(header.version_major(), ArchiveHeader::CURRENT_VERSION_MAJOR);
        assert_eq!(header.version_minor(), ArchiveHeader::CURRENT_VERSION_MINOR);
    }

    #[test]
    fn future_minor_version_is_readable() {
        let mut header = ArchiveHeader::new(ArchiveSalt::generate());
        header.version_minor = 99;
        assert!(header.check_readable().is_ok());
    }

    #[test]
    fn mismatched_major_version_is_rejected() {
        let mut header = ArchiveHeader::new(ArchiveSalt::generate());
        header.version_major = 2;
        assert!(header.check_readable().is_err());
    }
}
