// /////////////////////////////////////////////////////////////////////////////
// Archive Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Default capability providers
//!
//! Concrete implementations of the domain's capability traits (§4.11),
//! following the same pairing `logger.rs` uses for `BootstrapLogger`: one
//! real implementation the composition root wires up by default, living in
//! bootstrap because that's where dependency injection happens, not in
//! `archive_core` itself.

use archive_core_domain::services::password_provider::{PasswordKind, PasswordProvider};
use archive_core_domain::services::volume_requester::{VolumeDecision, VolumeKind, VolumeRequester};
use archive_core_domain::value_objects::VolumeNumber;
use archive_core_domain::ArchiveError;
use std::sync::atomic::{AtomicBool, Ordering};

/// A fixed passphrase supplied once (CLI flag, env var, key file) rather
/// than prompted for interactively. `weak_check` (§4.7 "Key acquisition")
/// emits a `tracing::warn!`, never rejects — callers that want to enforce
/// strength do so before constructing this.
pub struct StaticPasswordProvider {
    passphrase: Vec<u8>,
    weak_password_threshold: f64,
}

impl StaticPasswordProvider {
    pub fn new(passphrase: impl Into<Vec<u8>>, weak_password_threshold: f64) -> Self {
        Self { passphrase: passphrase.into(), weak_password_threshold }
    }
}

impl PasswordProvider for StaticPasswordProvider {
    fn get_password(&self, _kind: PasswordKind, _validate: bool, weak_check: bool) -> Result<Vec<u8>, ArchiveError> {
        if weak_check {
            let score = password_strength_score(&self.passphrase);
            if score < self.weak_password_threshold {
                tracing::warn!(score, threshold = self.weak_password_threshold, "passphrase looks weak");
            }
        }
        Ok(self.passphrase.clone())
    }
}

/// Crude strength heuristic: Shannon entropy per byte, blended with a
/// length bonus, normalized to `[0, 1]`. Good enough to flag "password123"
/// without needing a dictionary.
fn password_strength_score(passphrase: &[u8]) -> f64 {
    if passphrase.is_empty() {
        return 0.0;
    }
    let len = passphrase.len() as f64;
    let mut counts = std::collections::HashMap::new();
    for &b in passphrase {
        *counts.entry(b).or_insert(0u32) += 1;
    }
    let entropy: f64 = counts.values().map(|&c| {
        let p = c as f64 / len;
        -p * p.log2()
    }).sum();
    let max_entropy = (passphrase.len().min(94) as f64).log2().max(1.0);
    let length_factor = (len / 12.0).min(1.0);
    ((entropy / max_entropy) * 0.6 + length_factor * 0.4).min(1.0)
}

/// Grants exactly one volume request, then aborts — the "count-of-one"
/// requester for plain single-volume jobs (§4.11), where VolumeManager
/// should never really need a second medium.
pub struct SingleVolumeRequester {
    granted: AtomicBool,
}

impl SingleVolumeRequester {
    pub fn new() -> Self {
        Self { granted: AtomicBool::new(false) }
    }
}

impl Default for SingleVolumeRequester {
    fn default() -> Self {
        Self::new()
    }
}

impl VolumeRequester for SingleVolumeRequester {
    fn request_volume(
        &self,
        _kind: VolumeKind,
        _volume_number: VolumeNumber,
        _message: &str,
    ) -> Result<VolumeDecision, ArchiveError> {
        if self.granted.swap(true, Ordering::SeqCst) {
            Ok(VolumeDecision::Aborted)
        } else {
            Ok(VolumeDecision::Ok)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_password_provider_returns_the_configured_passphrase() {
        let provider = StaticPasswordProvider::new(b"correct horse battery staple".to_vec(), 0.6);
        let pw = provider.get_password(PasswordKind::NewArchive, true, true).unwrap();
        assert_eq!(pw, b"correct horse battery staple");
    }

    #[test]
    fn weak_password_is_not_rejected_only_warned_about() {
        let provider = StaticPasswordProvider::new(b"aaaa".to_vec(), 0.9);
        assert!(provider.get_password(PasswordKind::NewArchive, true, true).is_ok());
    }

    #[test]
    fn single_volume_requester_grants_once_then_aborts() {
        let requester = SingleVolumeRequester::new();
        let first = requester.request_volume(VolumeKind::NextVolume, VolumeNumber::FIRST, "insert volume 2").unwrap();
        assert_eq!(first, VolumeDecision::Ok);

        let second = requester.request_volume(VolumeKind::NextVolume, VolumeNumber::FIRST, "insert volume 3").unwrap();
        assert_eq!(second, VolumeDecision::Aborted);
    }
}
