// /////////////////////////////////////////////////////////////////////////////
// Archive Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Application Layer
//!
//! Orchestrates the domain layer into the use cases the CLI exposes:
//! creating an archive, appending entries, extracting, listing, and
//! verifying. `pipeline` holds the entry/volume framing machinery
//! (`EntryPipeline`, `PartScheduler`) that `ArchiveWriter`/`ArchiveReader`
//! drive.

pub mod pipeline;
