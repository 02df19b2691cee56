// /////////////////////////////////////////////////////////////////////////////
// Archive Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # DeltaSourceArena (§4.13)
//!
//! Delta sources may reference one another, so resolution is modeled as an
//! arena of nodes keyed by archive name rather than a pointer graph, the
//! way `deltasources.c`'s `DeltaSourceList` tracks a `locked` bit per node
//! to stop a restore from re-entering a storage archive it is already
//! reading. `resolve` sets the node's in-progress flag before calling out
//! to the injected `DeltaSourceLoader`, clears it on return, and rejects
//! re-entrant resolution of the same archive name as a cycle rather than
//! recursing forever.
//!
//! Resolved bytes are cached per archive name for the lifetime of the
//! arena: a source entry referenced by several delta-compressed entries in
//! the same job is only loaded once.

use std::collections::HashMap;
use std::sync::Arc;

use archive_core_domain::services::delta_source::DeltaSourceLoader;
use archive_core_domain::ArchiveError;
use tokio::sync::Mutex;

/// A parsed `delta(sourceName)` reference: `archiveName:entryPath`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeltaSourceSpec {
    pub archive_name: String,
    pub entry_path: String,
}

impl DeltaSourceSpec {
    pub fn parse(raw: &str) -> Result<Self, ArchiveError> {
        let (archive_name, entry_path) = raw.split_once(':').ok_or_else(|| {
            ArchiveError::delta_source_not_found(format!(
                "malformed delta source '{raw}': expected 'archiveName:entryPath'"
            ))
        })?;
        if archive_name.is_empty() || entry_path.is_empty() {
            return Err(ArchiveError::delta_source_not_found(format!(
                "malformed delta source '{raw}': archive name and entry path must both be non-empty"
            )));
        }
        Ok(Self { archive_name: archive_name.to_string(), entry_path: entry_path.to_string() })
    }
}

struct DeltaSourceNode {
    in_progress: bool,
    bytes: Option<Arc<Vec<u8>>>,
}

impl DeltaSourceNode {
    fn new() -> Self {
        Self { in_progress: false, bytes: None }
    }
}

/// Resolves `delta(sourceName)` references to the materialized bytes of
/// the named source entry, with cycle prevention and per-archive caching.
pub struct DeltaSourceArena<L: DeltaSourceLoader> {
    loader: L,
    nodes: Mutex<HashMap<String, DeltaSourceNode>>,
}

impl<L: DeltaSourceLoader> DeltaSourceArena<L> {
    pub fn new(loader: L) -> Self {
        Self { loader, nodes: Mutex::new(HashMap::new()) }
    }

    /// Resolves `spec` to its source bytes. `expected_size`, when given,
    /// is checked against the resolved length and surfaced as
    /// `ArchiveError::delta_source_size_mismatch` on mismatch rather than
    /// silently truncating or padding.
    pub async fn resolve(&self, spec: &DeltaSourceSpec, expected_size: Option<u64>) -> Result<Arc<Vec<u8>>, ArchiveError> {
        {
            let mut nodes = self.nodes.lock().await;
            let node = nodes.entry(spec.archive_name.clone()).or_insert_with(DeltaSourceNode::new);
            if node.in_progress {
                return Err(ArchiveError::delta_source_not_found(format!(
                    "cycle detected resolving delta source archive '{}'",
                    spec.archive_name
                )));
            }
            if let Some(bytes) = node.bytes.clone() {
                return Self::check_size(bytes, expected_size);
            }
            node.in_progress = true;
        }

        let result = self.loader.load_source_bytes(&spec.archive_name, &spec.entry_path).await;

        let mut nodes = self.nodes.lock().await;
        let node = nodes.get_mut(&spec.archive_name).expect("node inserted above resolve's await point");
        node.in_progress = false;

        match result {
            Ok(bytes) => {
                let bytes = Arc::new(bytes);
                node.bytes = Some(bytes.clone());
                Self::check_size(bytes, expected_size)
            }
            Err(e) => Err(e),
        }
    }

    fn check_size(bytes: Arc<Vec<u8>>, expected_size: Option<u64>) -> Result<Arc<Vec<u8>>, ArchiveError> {
        if let Some(expected) = expected_size {
            if bytes.len() as u64 != expected {
                return Err(ArchiveError::delta_source_size_mismatch(format!(
                    "expected {} bytes, resolved source has {}",
                    expected,
                    bytes.len()
                )));
            }
        }
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::OnceLock;

    struct CountingLoader {
        calls: AtomicUsize,
        payload: Vec<u8>,
    }

    #[async_trait::async_trait]
    impl DeltaSourceLoader for CountingLoader {
        async fn load_source_bytes(&self, _archive_name: &str, _entry_path: &str) -> Result<Vec<u8>, ArchiveError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.payload.clone())
        }
    }

    #[tokio::test]
    async fn resolve_returns_the_loaded_bytes() {
        let arena = DeltaSourceArena::new(CountingLoader { calls: AtomicUsize::new(0), payload: b"hello world".to_vec() });
        let spec = DeltaSourceSpec::parse("archiveA:V1").unwrap();
        let bytes = arena.resolve(&spec, None).await.unwrap();
        assert_eq!(*bytes, b"hello world".to_vec());
    }

    #[tokio::test]
    async fn resolve_caches_per_archive_name() {
        let arena = DeltaSourceArena::new(CountingLoader { calls: AtomicUsize::new(0), payload: b"abc".to_vec() });
        let spec = DeltaSourceSpec::parse("archiveA:V1").unwrap();
        arena.resolve(&spec, None).await.unwrap();
        arena.resolve(&spec, None).await.unwrap();
        assert_eq!(arena.loader.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn size_mismatch_is_rejected() {
        let arena = DeltaSourceArena::new(CountingLoader { calls: AtomicUsize::new(0), payload: b"abc".to_vec() });
        let spec = DeltaSourceSpec::parse("archiveA:V1").unwrap();
        let err = arena.resolve(&spec, Some(99)).await.unwrap_err();
        assert!(matches!(err, ArchiveError::DeltaSourceSizeMismatch(_)));
    }

    #[test]
    fn parse_rejects_specs_without_a_colon() {
        assert!(DeltaSourceSpec::parse("archiveA").is_err());
    }

    #[test]
    fn parse_splits_archive_name_and_entry_path() {
        let spec = DeltaSourceSpec::parse("archiveA:dir/V1.txt").unwrap();
        assert_eq!(spec.archive_name, "archiveA");
        assert_eq!(spec.entry_path, "dir/V1.txt");
    }

    struct SelfReferencingLoader {
        arena: OnceLock<Arc<DeltaSourceArena<SelfReferencingLoader>>>,
    }

    #[async_trait::async_trait]
    impl DeltaSourceLoader for SelfReferencingLoader {
        async fn load_source_bytes(&self, archive_name: &str, _entry_path: &str) -> Result<Vec<u8>, ArchiveError> {
            if archive_name == "b" {
                let arena = self.arena.get().expect("arena wired before first resolve");
                let spec = DeltaSourceSpec { archive_name: "b".to_string(), entry_path: "self".to_string() };
                return arena.resolve(&spec, None).await.map(|bytes| (*bytes).clone());
            }
            Ok(b"a's bytes".to_vec())
        }
    }

    #[tokio::test]
    async fn self_referencing_chain_is_rejected_as_a_cycle_not_infinite_recursion() {
        let arena = Arc::new(DeltaSourceArena::new(SelfReferencingLoader { arena: OnceLock::new() }));
        arena.loader.arena.set(arena.clone()).ok().expect("set once");

        let spec = DeltaSourceSpec { archive_name: "b".to_string(), entry_path: "self".to_string() };
        let err = arena.resolve(&spec, None).await.unwrap_err();
        assert!(matches!(err, ArchiveError::DeltaSourceNotFound(_)));
    }
}
