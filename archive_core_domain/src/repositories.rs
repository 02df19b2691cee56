// /////////////////////////////////////////////////////////////////////////////
// Archive Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Domain Repositories
//!
//! I/O-shaped ports the core depends on but never implements: `StorageBackend`
//! (§6, "StorageBackend interface") and `IndexStore` (§6, "Index database
//! interface"). Both are declared here, in the domain crate, because the
//! *shape* of the I/O (half-duplex positional streams, per-kind entry rows)
//! is part of the archive format's contract — the *runtime* backing them
//! (filesystem, sqlx/sqlite) is an infrastructure concern owned by
//! `archive_core`.

pub mod index_store;
pub mod storage_backend;

pub use index_store::{EntryTableKind, IndexEntryRow, IndexStore, StorageRow, StorageState};
pub use storage_backend::{ReadStream, StorageBackend, WriteStream};
