// /////////////////////////////////////////////////////////////////////////////
// Archive Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Domain Value Objects
//!
//! The archive format's wire-level vocabulary — chunk identifiers, entry
//! kinds, algorithm selectors, indices into fragment/entry/volume/part
//! sequences.

pub mod archive_salt;
pub mod block_size;
pub mod chunk_id;
pub mod chunk_metadata;
pub mod chunk_size;
pub mod compression_algorithm;
pub mod crypt_algorithm;
pub mod crypt_type;
pub mod entry_index;
pub mod entry_kind;
pub mod fragment_index;
pub mod part_number;
pub mod special_type;
pub mod volume_number;
pub mod worker_count;

pub use archive_salt::ArchiveSalt;
pub use block_size::BlockSize;
pub use chunk_id::ChunkId;
pub use chunk_metadata::ChunkMetadata;
pub use chunk_size::ChunkSize;
pub use compression_algorithm::CompressionAlgorithm;
pub use crypt_algorithm::CryptAlgorithm;
pub use crypt_type::CryptType;
pub use entry_index::EntryIndex;
pub use entry_kind::EntryKind;
pub use fragment_index::FragmentIndex;
pub use part_number::PartNumber;
pub use special_type::SpecialType;
pub use volume_number::VolumeNumber;
pub use worker_count::WorkerCount;
