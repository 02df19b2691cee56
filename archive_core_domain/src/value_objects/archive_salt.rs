// /////////////////////////////////////////////////////////////////////////////
// Archive Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! The 16-byte salt stored in the `BAR0` header chunk. Feeds the passphrase
//! KDF and, together with entry/fragment index, the deterministic per-fragment
//! IV derivation described in §4.2.

use rand::RngCore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArchiveSalt(pub [u8; 16]);

impl ArchiveSalt {
    pub fn generate() -> Self {
        let mut bytes = [0u8; 16];
        rand::rng().fill_bytes(&mut bytes);
        Self(bytes)
    }

    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_salts_differ() {
        assert_ne!(ArchiveSalt::generate(), ArchiveSalt::generate());
    }
}
