// /////////////////////////////////////////////////////////////////////////////
// Archive Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Chunk Identifier
//!
//! The 4-byte ASCII tag at the front of every framing chunk. The type is
//! deliberately open (any 4 bytes round-trip) so unrecognised IDs remain
//! skippable for forward compatibility — only the IDs in [`KNOWN_IDS`] are
//! interpreted by this implementation, per the Open Question resolved in
//! DESIGN.md.

use std::fmt;

/// A 4-byte chunk tag, e.g. `ChunkId(*b"FILE")`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkId(pub [u8; 4]);

impl ChunkId {
    pub const BAR_HEADER: ChunkId = ChunkId(*b"BAR0");
    pub const KEY: ChunkId = ChunkId(*b"KEY0");
    pub const FILE_ENTRY: ChunkId = ChunkId(*b"FILE");
    pub const IMAGE_ENTRY: ChunkId = ChunkId(*b"IMAG");
    pub const DIR_ENTRY: ChunkId = ChunkId(*b"DIR0");
    pub const LINK_ENTRY: ChunkId = ChunkId(*b"LINK");
    pub const HARDLINK_ENTRY: ChunkId = ChunkId(*b"HLNK");
    pub const SPECIAL_ENTRY: ChunkId = ChunkId(*b"SPEC");
    pub const FILE_HEADER: ChunkId = ChunkId(*b"FENT");
    pub const IMAGE_HEADER: ChunkId = ChunkId(*b"IENT");
    pub const DIR_HEADER: ChunkId = ChunkId(*b"DENT");
    pub const LINK_HEADER: ChunkId = ChunkId(*b"LENT");
    pub const HARDLINK_HEADER: ChunkId = ChunkId(*b"HENT");
    pub const SPECIAL_HEADER: ChunkId = ChunkId(*b"SENT");
    pub const FILE_DATA: ChunkId = ChunkId(*b"FDAT");
    pub const IMAGE_DATA: ChunkId = ChunkId(*b"IDAT");
    pub const HARDLINK_DATA: ChunkId = ChunkId(*b"HDAT");
    pub const XATTR: ChunkId = ChunkId(*b"XATR");
    pub const FOOTER: ChunkId = ChunkId(*b"FOOT");

    pub fn new(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    pub fn from_str(s: &str) -> Self {
        let mut bytes = [b' '; 4];
        for (i, b) in s.as_bytes().iter().take(4).enumerate() {
            bytes[i] = *b;
        }
        Self(bytes)
    }

    pub fn as_bytes(&self) -> [u8; 4] {
        self.0
    }

    /// Whether this ID is one this implementation interprets (§6).
    pub fn is_known(&self) -> bool {
        matches!(
            *self,
            ChunkId::BAR_HEADER
                | ChunkId::KEY
                | ChunkId::FILE_ENTRY
                | ChunkId::IMAGE_ENTRY
                | ChunkId::DIR_ENTRY
                | ChunkId::LINK_ENTRY
                | ChunkId::HARDLINK_ENTRY
                | ChunkId::SPECIAL_ENTRY
                | ChunkId::FILE_HEADER
                | ChunkId::IMAGE_HEADER
                | ChunkId::DIR_HEADER
                | ChunkId::LINK_HEADER
                | ChunkId::HARDLINK_HEADER
                | ChunkId::SPECIAL_HEADER
                | ChunkId::FILE_DATA
                | ChunkId::IMAGE_DATA
                | ChunkId::HARDLINK_DATA
                | ChunkId::XATTR
                | ChunkId::FOOTER
        )
    }
}

impl fmt::Display for ChunkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match std::str::from_utf8(&self.0) {
            Ok(s) => write!(f, "{}", s),
            Err(_) => write!(f, "{:?}", self.0),
        }
    }
}
