// /////////////////////////////////////////////////////////////////////////////
// Archive Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Domain Entities
//!
//! Structures with identity or lifecycle that the aggregate and services
//! operate on: the archive-wide header, the tagged entry-header union, the
//! fragment descriptor, job metrics, and the layered configuration values
//! (§4.12, §9 Design Notes).

pub mod archive_header;
pub mod archive_metrics;
pub mod entry_header;
pub mod fragment_descriptor;
pub mod global_options;
pub mod job_options;

pub use archive_header::{ArchiveHeader, MAGIC};
pub use archive_metrics::ArchiveMetrics;
pub use entry_header::{EntryHeader, EntryHeaderCommon, FileLikeAttributes, PosixAttributes};
pub use fragment_descriptor::{validate_coverage, FragmentDescriptor};
pub use global_options::GlobalOptions;
pub use job_options::{ArchiveType, JobOptions};
