// /////////////////////////////////////////////////////////////////////////////
// Archive Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Domain Services
//!
//! CPU-bound business logic (`CompressionService`, `EncryptionService`) is
//! synchronous; the capability traits (`PasswordProvider`, `VolumeRequester`,
//! `ProgressSink`) replace the teacher's callback-pointer-with-void-context
//! pattern per the Design Notes (§9).

pub mod compression_service;
pub mod delta_source;
pub mod encryption_service;
pub mod password_provider;
pub mod progress_sink;
pub mod volume_requester;

pub use compression_service::{CompressionService, Compressor, Decompressor};
pub use delta_source::DeltaSourceLoader;
pub use encryption_service::{DecryptionContext, EncryptionContext, EncryptionService};
pub use password_provider::{PasswordKind, PasswordProvider};
pub use progress_sink::{ProgressSink, ProgressStatus};
pub use volume_requester::{VolumeDecision, VolumeKind, VolumeRequester};
