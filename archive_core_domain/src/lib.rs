// /////////////////////////////////////////////////////////////////////////////
// Archive Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Archive Core Domain
//!
//! Pure, reusable business logic for the archive container format: value
//! objects for the chunk/entry/fragment model, entities describing archive
//! and entry headers, the `ArchiveSession` aggregate that drives the writer
//! state machine, and the domain service ports (`StorageBackend`,
//! `IndexStore`, `PasswordProvider`, `VolumeRequester`, `ProgressSink`,
//! `CompressionService`, `EncryptionService`) that infrastructure adapters
//! implement.
//!
//! ## Layering
//!
//! This crate follows Domain-Driven Design: it depends on `serde`, `chrono`,
//! `serde_json`, `rand` and similar business-logic-adjacent crates, but
//! never on `tokio`, `tracing`, `sqlx`, or `ring` — those are infrastructure
//! concerns owned by the `archive-core` crate. Domain service traits that
//! model I/O (`StorageBackend`, `IndexStore`) are declared `async_trait`
//! here because the *shape* of I/O is a domain concept (the archive format
//! requires positional, half-duplex streams); the *runtime* that drives
//! them is not.

pub mod aggregates;
pub mod entities;
pub mod error;
pub mod repositories;
pub mod services;
pub mod value_objects;

pub use error::ArchiveError;

pub use aggregates::{ArchiveSession, ArchiveSessionState};
pub use entities::{
    ArchiveHeader, ArchiveMetrics, ArchiveType, EntryHeader, FragmentDescriptor, GlobalOptions, JobOptions,
};
pub use value_objects::{
    ArchiveSalt, BlockSize, ChunkId, ChunkMetadata, ChunkSize, CompressionAlgorithm, CryptAlgorithm, CryptType,
    EntryIndex, EntryKind, FragmentIndex, PartNumber, SpecialType, VolumeNumber, WorkerCount,
};

pub use repositories::{IndexStore, StorageBackend};
pub use services::{CompressionService, EncryptionService, PasswordProvider, ProgressSink, VolumeRequester};
