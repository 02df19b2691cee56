// /////////////////////////////////////////////////////////////////////////////
// Archive Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Whether an archive's data key is the passphrase-derived key directly
//! (`Symmetric`) or a random per-archive session key wrapped under a
//! recipient public key in the `KEY0` chunk (`Asymmetric`), per §3.

use crate::ArchiveError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CryptType {
    None,
    Symmetric,
    Asymmetric,
}

impl CryptType {
    pub fn wire_code(self) -> u8 {
        match self {
            CryptType::None => 0,
            CryptType::Symmetric => 1,
            CryptType::Asymmetric => 2,
        }
    }

    pub fn from_wire_code(code: u8) -> Result<Self, ArchiveError> {
        match code {
            0 => Ok(CryptType::None),
            1 => Ok(CryptType::Symmetric),
            2 => Ok(CryptType::Asymmetric),
            other => Err(ArchiveError::chunk_framing(format!("unknown crypt type {other}"))),
        }
    }

    pub fn has_key_chunk(self) -> bool {
        matches!(self, CryptType::Asymmetric)
    }
}
