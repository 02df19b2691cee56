// /////////////////////////////////////////////////////////////////////////////
// Archive Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # CryptFrame port
//!
//! Domain-level contract for CryptFrame (§4.2). `initSymmetric`/
//! `initAsymmetric` become the `EncryptionContext`/`DecryptionContext` value
//! objects built by the caller (EntryPipeline); `encrypt`/`decrypt` become
//! `encrypt_fragment`/`decrypt_fragment`, one call per fragment, each
//! PKCS7-padding plaintext to the algorithm's block size before the AEAD
//! primitive runs and deriving (never sampling) its nonce from
//! `{archive-salt, entry-index, fragment-index}` — see the implementation
//! note in SPEC_FULL.md §4.2.

use crate::value_objects::{ArchiveSalt, CryptAlgorithm, EntryIndex, FragmentIndex};
use crate::ArchiveError;

/// Per-fragment encryption inputs. `key` is the session key (asymmetric
/// mode) or the passphrase-derived key (symmetric mode) — the caller is
/// responsible for zeroizing it on drop.
pub struct EncryptionContext {
    pub algorithm: CryptAlgorithm,
    pub key: Vec<u8>,
    pub salt: ArchiveSalt,
    pub entry_index: EntryIndex,
    pub fragment_index: FragmentIndex,
}

pub struct DecryptionContext {
    pub algorithm: CryptAlgorithm,
    pub key: Vec<u8>,
    pub salt: ArchiveSalt,
    pub entry_index: EntryIndex,
    pub fragment_index: FragmentIndex,
}

/// Synchronous (CPU-bound) per-fragment AEAD encryption service.
pub trait EncryptionService: Send + Sync {
    /// Pads `plain` to the algorithm's block size and encrypts it, returning
    /// `padded_ciphertext || aead_tag` — both are "the encrypted, padded
    /// payload" for framing purposes (§4.2's implementation note).
    fn encrypt_fragment(&self, ctx: &EncryptionContext, plain: &[u8]) -> Result<Vec<u8>, ArchiveError>;

    /// Verifies the AEAD tag, decrypts, and strips PKCS7 padding. Both a
    /// padding-check failure and an AEAD-tag failure surface as
    /// `ArchiveError::DecryptFail`, per §4.2's single-failure-mode contract.
    fn decrypt_fragment(&self, ctx: &DecryptionContext, cipher: &[u8]) -> Result<Vec<u8>, ArchiveError>;

    /// Deterministically derives a 12-byte AEAD nonce from
    /// `{archive-salt, entry-index, fragment-index}`, satisfying invariant 5
    /// (no two fragments of an archive share `(key, IV)`) without a CSPRNG.
    fn derive_nonce(&self, salt: &ArchiveSalt, entry_index: EntryIndex, fragment_index: FragmentIndex) -> [u8; 12];
}
