// /////////////////////////////////////////////////////////////////////////////
// Archive Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! The cipher block size recorded in an entry header (§4.2), so a reader can
//! compute padded fragment lengths without guessing. Not to be confused with
//! [`crate::value_objects::ChunkSize`] (the I/O read/write chunk size) or the
//! Image entry's `blockSize` (the device block granularity).

use crate::ArchiveError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockSize(u16);

impl BlockSize {
    /// AES and ChaCha20 both operate on 16-byte blocks in this implementation
    /// (ChaCha20 is a stream cipher; 16 is kept as the nominal padding unit
    /// so framing stays uniform across algorithms).
    pub const STANDARD: BlockSize = BlockSize(16);

    pub fn new(bytes: u16) -> Result<Self, ArchiveError> {
        if bytes == 0 || !bytes.is_power_of_two() {
            return Err(ArchiveError::invalid_config(format!(
                "block size must be a non-zero power of two, got {}",
                bytes
            )));
        }
        Ok(Self(bytes))
    }

    pub fn bytes(self) -> u16 {
        self.0
    }

    /// Padded length of `len` bytes under PKCS7-style padding to this block
    /// size (always adds at least one byte, per PKCS7).
    pub fn padded_len(self, len: usize) -> usize {
        let block = self.0 as usize;
        let remainder = len % block;
        len + (block - remainder)
    }
}

impl Default for BlockSize {
    fn default() -> Self {
        Self::STANDARD
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_power_of_two() {
        assert!(BlockSize::new(15).is_err());
    }

    #[test]
    fn padded_len_always_adds_at_least_one_byte() {
        let bs = BlockSize::STANDARD;
        assert_eq!(bs.padded_len(16), 32);
        assert_eq!(bs.padded_len(5), 16);
    }
}
