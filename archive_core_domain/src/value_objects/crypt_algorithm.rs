// /////////////////////////////////////////////////////////////////////////////
// Archive Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! The `cryptAlgorithm` field of an entry header (§6). Backed by the AEAD
//! constructions in the dependency stack (`aes-gcm`, `chacha20poly1305`);
//! see CryptFrame's implementation note in SPEC_FULL.md §4.2 for how the
//! spec's CBC-style framing contract is satisfied on top of them.

use crate::value_objects::BlockSize;
use crate::ArchiveError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CryptAlgorithm {
    None,
    Aes128Gcm,
    Aes256Gcm,
    ChaCha20Poly1305,
}

impl CryptAlgorithm {
    pub fn wire_code(self) -> u8 {
        match self {
            CryptAlgorithm::None => 0,
            CryptAlgorithm::Aes128Gcm => 1,
            CryptAlgorithm::Aes256Gcm => 2,
            CryptAlgorithm::ChaCha20Poly1305 => 3,
        }
    }

    pub fn from_wire_code(code: u8) -> Result<Self, ArchiveError> {
        match code {
            0 => Ok(CryptAlgorithm::None),
            1 => Ok(CryptAlgorithm::Aes128Gcm),
            2 => Ok(CryptAlgorithm::Aes256Gcm),
            3 => Ok(CryptAlgorithm::ChaCha20Poly1305),
            other => Err(ArchiveError::unsupported_algorithm(format!("crypt code {other}"))),
        }
    }

    pub fn block_size(self) -> BlockSize {
        BlockSize::STANDARD
    }

    pub fn key_len(self) -> usize {
        match self {
            CryptAlgorithm::None => 0,
            CryptAlgorithm::Aes128Gcm => 16,
            CryptAlgorithm::Aes256Gcm | CryptAlgorithm::ChaCha20Poly1305 => 32,
        }
    }

    pub fn is_encrypted(self) -> bool {
        !matches!(self, CryptAlgorithm::None)
    }
}

impl std::fmt::Display for CryptAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CryptAlgorithm::None => write!(f, "none"),
            CryptAlgorithm::Aes128Gcm => write!(f, "aes128-gcm"),
            CryptAlgorithm::Aes256Gcm => write!(f, "aes256-gcm"),
            CryptAlgorithm::ChaCha20Poly1305 => write!(f, "chacha20-poly1305"),
        }
    }
}

impl std::str::FromStr for CryptAlgorithm {
    type Err = ArchiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(CryptAlgorithm::None),
            "aes128-gcm" => Ok(CryptAlgorithm::Aes128Gcm),
            "aes256-gcm" => Ok(CryptAlgorithm::Aes256Gcm),
            "chacha20-poly1305" => Ok(CryptAlgorithm::ChaCha20Poly1305),
            other => Err(ArchiveError::unsupported_algorithm(format!("crypt algorithm name '{other}'"))),
        }
    }
}
