// /////////////////////////////////////////////////////////////////////////////
// Archive Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # CryptFrame
//!
//! Infrastructure implementation of `archive_core_domain::EncryptionService`
//! (§4.2), grounded on the AEAD adapters in the teacher's
//! `infrastructure::adapters::encryption` module, narrowed to the
//! fragment-at-a-time shape EntryPipeline needs: PKCS7-pad to the cipher's
//! nominal block size, encrypt with an AEAD primitive, append the tag, and
//! treat `padded_ciphertext || tag` as one opaque "encrypted, padded"
//! payload (see the implementation note in SPEC_FULL.md §4.2).

use aes_gcm::aead::{Aead, KeyInit, Payload};
use aes_gcm::{Aes128Gcm, Aes256Gcm, Nonce};
use chacha20poly1305::ChaCha20Poly1305;
use sha2::{Digest, Sha256};

use archive_core_domain::services::encryption_service::{DecryptionContext, EncryptionContext};
use archive_core_domain::{ArchiveError, ArchiveSalt, CryptAlgorithm, EncryptionService, EntryIndex, FragmentIndex};

/// AEAD-backed `EncryptionService`. Stateless: every fragment carries its
/// own key, salt, entry index, and fragment index in its `*Context`.
#[derive(Debug, Default, Clone, Copy)]
pub struct AeadCryptFrame;

impl AeadCryptFrame {
    pub fn new() -> Self {
        Self
    }

    fn pkcs7_pad(plain: &[u8], block_size: usize) -> Vec<u8> {
        let pad_len = block_size - (plain.len() % block_size);
        let mut out = Vec::with_capacity(plain.len() + pad_len);
        out.extend_from_slice(plain);
        out.extend(std::iter::repeat(pad_len as u8).take(pad_len));
        out
    }

    fn pkcs7_unpad(padded: &[u8]) -> Result<Vec<u8>, ArchiveError> {
        let pad_len = *padded.last().ok_or_else(|| ArchiveError::decrypt_fail("empty padded plaintext"))? as usize;
        if pad_len == 0 || pad_len > padded.len() {
            return Err(ArchiveError::decrypt_fail("invalid PKCS7 padding length"));
        }
        let (data, pad) = padded.split_at(padded.len() - pad_len);
        if pad.iter().any(|&b| b as usize != pad_len) {
            return Err(ArchiveError::decrypt_fail("invalid PKCS7 padding bytes"));
        }
        Ok(data.to_vec())
    }
}

impl EncryptionService for AeadCryptFrame {
    fn encrypt_fragment(&self, ctx: &EncryptionContext, plain: &[u8]) -> Result<Vec<u8>, ArchiveError> {
        let block_size = ctx.algorithm.block_size().bytes() as usize;
        let padded = Self::pkcs7_pad(plain, block_size);
        let nonce = self.derive_nonce(&ctx.salt, ctx.entry_index, ctx.fragment_index);

        match ctx.algorithm {
            CryptAlgorithm::None => Ok(padded),
            CryptAlgorithm::Aes128Gcm => {
                let cipher = Aes128Gcm::new_from_slice(&ctx.key)
                    .map_err(|e| ArchiveError::decrypt_fail(e.to_string()))?;
                cipher
                    .encrypt(Nonce::from_slice(&nonce), Payload::from(padded.as_slice()))
                    .map_err(|e| ArchiveError::decrypt_fail(e.to_string()))
            }
            CryptAlgorithm::Aes256Gcm => {
                let cipher = Aes256Gcm::new_from_slice(&ctx.key)
                    .map_err(|e| ArchiveError::decrypt_fail(e.to_string()))?;
                cipher
                    .encrypt(Nonce::from_slice(&nonce), Payload::from(padded.as_slice()))
                    .map_err(|e| ArchiveError::decrypt_fail(e.to_string()))
            }
            CryptAlgorithm::ChaCha20Poly1305 => {
                use chacha20poly1305::{aead::Aead as _, KeyInit as _};
                let cipher = ChaCha20Poly1305::new_from_slice(&ctx.key)
                    .map_err(|e| ArchiveError::decrypt_fail(e.to_string()))?;
                cipher
                    .encrypt(chacha20poly1305::Nonce::from_slice(&nonce), padded.as_slice())
                    .map_err(|e| ArchiveError::decrypt_fail(e.to_string()))
            }
        }
    }

    fn decrypt_fragment(&self, ctx: &DecryptionContext, cipher_bytes: &[u8]) -> Result<Vec<u8>, ArchiveError> {
        let nonce = self.derive_nonce(&ctx.salt, ctx.entry_index, ctx.fragment_index);

        let padded = match ctx.algorithm {
            CryptAlgorithm::None => cipher_bytes.to_vec(),
            CryptAlgorithm::Aes128Gcm => {
                let cipher =
                    Aes128Gcm::new_from_slice(&ctx.key).map_err(|_| ArchiveError::decrypt_fail("invalid key length"))?;
                cipher
                    .decrypt(Nonce::from_slice(&nonce), Payload::from(cipher_bytes))
                    .map_err(|_| ArchiveError::decrypt_fail("AEAD tag verification failed"))?
            }
            CryptAlgorithm::Aes256Gcm => {
                let cipher =
                    Aes256Gcm::new_from_slice(&ctx.key).map_err(|_| ArchiveError::decrypt_fail("invalid key length"))?;
                cipher
                    .decrypt(Nonce::from_slice(&nonce), Payload::from(cipher_bytes))
                    .map_err(|_| ArchiveError::decrypt_fail("AEAD tag verification failed"))?
            }
            CryptAlgorithm::ChaCha20Poly1305 => {
                use chacha20poly1305::{aead::Aead as _, KeyInit as _};
                let cipher = ChaCha20Poly1305::new_from_slice(&ctx.key)
                    .map_err(|_| ArchiveError::decrypt_fail("invalid key length"))?;
                cipher
                    .decrypt(chacha20poly1305::Nonce::from_slice(&nonce), cipher_bytes)
                    .map_err(|_| ArchiveError::decrypt_fail("AEAD tag verification failed"))?
            }
        };

        if matches!(ctx.algorithm, CryptAlgorithm::None) {
            Ok(padded)
        } else {
            Self::pkcs7_unpad(&padded)
        }
    }

    fn derive_nonce(&self, salt: &ArchiveSalt, entry_index: EntryIndex, fragment_index: FragmentIndex) -> [u8; 12] {
        let mut hasher = Sha256::new();
        hasher.update(salt.as_bytes());
        hasher.update(entry_index.value().to_be_bytes());
        hasher.update(fragment_index.value().to_be_bytes());
        let digest = hasher.finalize();
        let mut nonce = [0u8; 12];
        nonce.copy_from_slice(&digest[..12]);
        nonce
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(algorithm: CryptAlgorithm, key: Vec<u8>) -> EncryptionContext {
        EncryptionContext {
            algorithm,
            key,
            salt: ArchiveSalt::generate(),
            entry_index: EntryIndex(0),
            fragment_index: FragmentIndex(0),
        }
    }

    #[test]
    fn aes256_gcm_round_trips() {
        let service = AeadCryptFrame::new();
        let key = vec![7u8; 32];
        let enc_ctx = ctx(CryptAlgorithm::Aes256Gcm, key.clone());
        let plain = b"the quick brown fox jumps over the lazy dog";

        let cipher = service.encrypt_fragment(&enc_ctx, plain).unwrap();
        assert_ne!(cipher, plain);

        let dec_ctx = DecryptionContext {
            algorithm: CryptAlgorithm::Aes256Gcm,
            key,
            salt: enc_ctx.salt,
            entry_index: enc_ctx.entry_index,
            fragment_index: enc_ctx.fragment_index,
        };
        let round_tripped = service.decrypt_fragment(&dec_ctx, &cipher).unwrap();
        assert_eq!(round_tripped, plain);
    }

    #[test]
    fn tampered_ciphertext_fails_as_decrypt_fail() {
        let service = AeadCryptFrame::new();
        let key = vec![3u8; 32];
        let enc_ctx = ctx(CryptAlgorithm::ChaCha20Poly1305, key.clone());
        let mut cipher = service.encrypt_fragment(&enc_ctx, b"secret payload").unwrap();
        *cipher.last_mut().unwrap() ^= 0xFF;

        let dec_ctx = DecryptionContext {
            algorithm: CryptAlgorithm::ChaCha20Poly1305,
            key,
            salt: enc_ctx.salt,
            entry_index: enc_ctx.entry_index,
            fragment_index: enc_ctx.fragment_index,
        };
        let err = service.decrypt_fragment(&dec_ctx, &cipher).unwrap_err();
        assert_eq!(err.category(), "crypto");
    }

    #[test]
    fn same_salt_entry_and_fragment_derive_the_same_nonce() {
        let service = AeadCryptFrame::new();
        let salt = ArchiveSalt::generate();
        let a = service.derive_nonce(&salt, EntryIndex(2), FragmentIndex(5));
        let b = service.derive_nonce(&salt, EntryIndex(2), FragmentIndex(5));
        let c = service.derive_nonce(&salt, EntryIndex(2), FragmentIndex(6));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
