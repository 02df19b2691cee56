// /////////////////////////////////////////////////////////////////////////////
// Archive Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Domain Aggregates
//!
//! `ArchiveSession` is the consistency boundary for one archive-writing job:
//! it owns the `ArchiveWriter` state machine (§4.7) that every public write
//! operation must respect.

pub mod archive_session;

pub use archive_session::{ArchiveSession, ArchiveSessionState};
