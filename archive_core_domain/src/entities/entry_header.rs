// /////////////////////////////////////////////////////////////////////////////
// Archive Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Entry Header entity
//!
//! Per §9 Design Notes ("Anonymous unions over entry variants"), the source
//! discriminates entry kinds with a tag plus a union of per-kind state; this
//! is re-architected as a tagged `enum` where each variant owns its own
//! header sub-struct. `EntryPipeline` (§4.4) dispatches on this enum rather
//! than reading through a pointer into a union.
//!
//! `PosixAttributes` is shared by every variant (§3: "mtime; atime; ctime;
//! uid; gid; mode bits" are common to all entries); File/Image/HardLink
//! additionally carry `size` per §6's wire-level note, folded in as
//! `FileLikeAttributes`.

use crate::value_objects::{BlockSize, CompressionAlgorithm, CryptAlgorithm, CryptType, SpecialType};
use chrono::{DateTime, Utc};

/// Fields common to every entry kind (§3, §6).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryHeaderCommon {
    pub compress_algorithm: CompressionAlgorithm,
    pub crypt_algorithm: CryptAlgorithm,
    pub crypt_type: CryptType,
    pub cipher_block_size: BlockSize,
    pub name: String,
    /// Extended attributes as a sub-chunk list (`XATR`), optional.
    pub extended_attributes: Vec<(String, Vec<u8>)>,
}

/// POSIX metadata common to every entry kind (§3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PosixAttributes {
    pub atime: DateTime<Utc>,
    pub mtime: DateTime<Utc>,
    pub ctime: DateTime<Utc>,
    pub uid: u32,
    pub gid: u32,
    pub permission: u32,
}

/// Additional fields File/Image/HardLink entries carry beyond
/// `PosixAttributes` (§6: "additionally carry size").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileLikeAttributes {
    pub posix: PosixAttributes,
    pub size: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryHeader {
    File {
        common: EntryHeaderCommon,
        attrs: FileLikeAttributes,
    },
    Image {
        common: EntryHeaderCommon,
        attrs: FileLikeAttributes,
        device_block_size: u32,
        block_count: u64,
    },
    Directory {
        common: EntryHeaderCommon,
        posix: PosixAttributes,
    },
    Link {
        common: EntryHeaderCommon,
        posix: PosixAttributes,
        destination: String,
    },
    HardLink {
        common: EntryHeaderCommon,
        attrs: FileLikeAttributes,
        /// Aliases beyond `common.name`, all sharing the same fragments
        /// (§3: "a list of ≥2 path names").
        additional_names: Vec<String>,
    },
    Special {
        common: EntryHeaderCommon,
        posix: PosixAttributes,
        special_type: SpecialType,
        major: u32,
        minor: u32,
    },
}

impl EntryHeader {
    pub fn common(&self) -> &EntryHeaderCommon {
        match self {
            EntryHeader::File { common, .. }
            | EntryHeader::Image { common, .. }
            | EntryHeader::Directory { common, .. }
            | EntryHeader::Link { common, .. }
            | EntryHeader::HardLink { common, .. }
            | EntryHeader::Special { common, .. } => common,
        }
    }

    pub fn name(&self) -> &str {
        &self.common().name
    }

    /// Declared total logical size for File/Image/HardLink entries; `None`
    /// for Directory/Link/Special, which carry no data fragments.
    pub fn declared_size(&self) -> Option<u64> {
        match self {
            EntryHeader::File { attrs, .. } | EntryHeader::HardLink { attrs, .. } => Some(attrs.size),
            EntryHeader::Image { attrs, .. } => Some(attrs.size),
            EntryHeader::Directory { .. } | EntryHeader::Link { .. } | EntryHeader::Special { .. } => None,
        }
    }

    /// All path names an entry is known by: a single name for most kinds,
    /// `name` plus every alias for HardLink.
    pub fn all_names(&self) -> Vec<&str> {
        match self {
            EntryHeader::HardLink {
                common, additional_names, ..
            } => {
                let mut names = vec![common.name.as_str()];
                names.extend(additional_names.iter().map(String::as_str));
                names
            }
            other => vec![other.name()],
        }
    }
}
