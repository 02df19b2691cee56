// /////////////////////////////////////////////////////////////////////////////
// Archive Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # GlobalOptions entity
//!
//! Per §9 Design Notes ("Singleton configuration"): the source keeps
//! process-wide settings (server lists, command templates, verbosity) as
//! globals. This re-architects them as an explicit value, constructed once
//! at bootstrap and threaded through constructors rather than read from a
//! global. `JobOptions` (in the sibling module) is merged on top of this
//! per archive job.

use crate::value_objects::{BlockSize, CompressionAlgorithm, CryptAlgorithm, WorkerCount};
use serde::{Deserialize, Serialize};

/// Process-wide defaults, loaded once from the layered config file
/// (TOML/YAML/JSON, §10 Ambient Stack) and shared read-only across every
/// job the process runs in its lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalOptions {
    pub default_compression_algorithm: CompressionAlgorithm,
    pub default_crypt_algorithm: CryptAlgorithm,
    pub default_block_size: BlockSize,
    pub staging_directory: String,
    pub worker_count: WorkerCount,
    /// Scores below this threshold trigger a non-fatal weak-password
    /// warning (§9 Open Questions: "no cited basis ... make it
    /// configurable, not hard-code"). Resolved in DESIGN.md at `0.6`,
    /// matching the source's observed constant.
    pub weak_password_threshold: f64,
    /// Command templates for VolumeManager's volume-fill and medium-change
    /// protocols (§4.6): `%device`/`%directory`/`%image`/`%file`/`%number`/
    /// `%sectors` placeholders, substituted at load time.
    pub image_pre_process_command: Option<String>,
    pub image_command: Option<String>,
    pub image_post_process_command: Option<String>,
    pub ecc_pre_process_command: Option<String>,
    pub ecc_command: Option<String>,
    pub ecc_post_process_command: Option<String>,
    pub blank_command: Option<String>,
    pub unload_volume_command: Option<String>,
    pub load_volume_command: Option<String>,
    pub request_volume_command: Option<String>,
    pub write_pre_process_command: Option<String>,
    pub write_image_command: Option<String>,
    pub write_command: Option<String>,
    pub write_post_process_command: Option<String>,
    /// Upper bound on a staged ISO image, used by the staging-space check
    /// (§4.6): required free space is `volumeSize + maxImageSize * (2 if
    /// ECC else 1)`.
    pub max_image_size: u64,
}

impl Default for GlobalOptions {
    fn default() -> Self {
        Self {
            default_compression_algorithm: CompressionAlgorithm::Deflate,
            default_crypt_algorithm: CryptAlgorithm::None,
            default_block_size: BlockSize::default(),
            staging_directory: std::env::temp_dir().to_string_lossy().into_owned(),
            worker_count: WorkerCount::default(),
            weak_password_threshold: 0.6,
            image_pre_process_command: None,
            image_command: None,
            image_post_process_command: None,
            ecc_pre_process_command: None,
            ecc_command: None,
            ecc_post_process_command: None,
            blank_command: None,
            unload_volume_command: None,
            load_volume_command: None,
            request_volume_command: None,
            write_pre_process_command: None,
            write_image_command: None,
            write_command: None,
            write_post_process_command: None,
            max_image_size: 4 * 1024 * 1024 * 1024,
        }
    }
}
