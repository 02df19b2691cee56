// /////////////////////////////////////////////////////////////////////////////
// Archive Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Infrastructure Layer
//!
//! Everything that touches bytes outside the process boundary: the chunk
//! wire format (`chunk_io`), the per-fragment crypto and compression
//! codecs (`crypt_frame`, `compress_frame`), the removable-medium /
//! command-template protocol (`volume_manager`), storage backends, the
//! index store, config loading, and `prometheus` metrics.

pub mod chunk_io;
pub mod compress_frame;
pub mod config;
pub mod crypt_frame;
pub mod delta_source_arena;
pub mod metrics;
pub mod repositories;
pub mod storage;
pub mod volume_manager;
