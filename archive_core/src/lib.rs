// /////////////////////////////////////////////////////////////////////////////
// Archive Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

// Production code safety enforced via CI and `make lint-strict`
// (lib/bins checked separately from tests - tests may use unwrap/expect)

//! # Archive Core
//!
//! A multi-volume, optionally encrypted and compressed archive format,
//! and the writer/reader machinery that drives it end to end. This crate
//! provides the infrastructure and application layers on top of
//! `archive-core-domain`'s pure business logic.
//!
//! ## Architecture Overview
//!
//! The crate follows Clean Architecture and Domain-Driven Design
//! principles:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Interface Layer                          │
//! │  (CLI, Configuration Management)                             │
//! └─────────────────────────────────────────────────────────────┘
//!                                │
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  Application Layer                          │
//! │  (ArchiveWriter/ArchiveReader, EntryPipeline, PartScheduler) │
//! └─────────────────────────────────────────────────────────────┘
//!                                │
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Domain Layer                              │
//! │  (archive-core-domain: entities, value objects, ports)       │
//! └─────────────────────────────────────────────────────────────┘
//!                                │
//! ┌─────────────────────────────────────────────────────────────┐
//! │                Infrastructure Layer                          │
//! │  (ChunkIO, CryptFrame, CompressFrame, VolumeManager,         │
//! │   storage backends, SQL index store)                        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Archive Format
//!
//! An archive is a sequence of self-describing, nested chunks (§4.3/4.4
//! of the design notes): a file-level header chunk, then one outer chunk
//! per entry containing a header sub-chunk and zero or more data
//! sub-chunks, and a closing footer chunk. Chunk payloads may be
//! compressed and then encrypted per-fragment; entry names are encrypted
//! independently using a reserved fragment index.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 Archive File Header                         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Entry Chunk  (Header sub-chunk + Data sub-chunk(s))         │
//! │  Entry Chunk  (Header sub-chunk + Data sub-chunk(s))         │
//! │  ...                                                         │
//! ├─────────────────────────────────────────────────────────────┤
//! │                      Archive Footer                         │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! A single logical archive may span several numbered parts
//! (`PartScheduler`) and several removable volumes (`VolumeManager`),
//! independently of each other.
//!
//! ## Error Handling
//!
//! All fallible operations return `archive_core_domain::ArchiveError`,
//! whose `category()` groups failures (encoding, crypto, scheduling,
//! storage, ...) for CLI exit codes and structured logging.

pub mod application;
pub mod infrastructure;

// Tests are organized as #[cfg(test)] modules within each source file.

pub use archive_core_domain::{
    ArchiveError, ArchiveHeader, ArchiveSession, ArchiveSessionState, ArchiveType, CompressionAlgorithm,
    CryptAlgorithm, EntryHeader, EntryKind, GlobalOptions, JobOptions,
};
