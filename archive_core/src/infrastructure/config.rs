// /////////////////////////////////////////////////////////////////////////////
// Archive Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Configuration loading (§4.12)
//!
//! `GlobalOptions` (process-wide defaults) and `JobOptions` (per-archive
//! overrides) are both `serde`-deserializable. This module layers a config
//! file on top of compiled-in defaults, with environment variables taking
//! final precedence, using the `config` crate the way the source layers
//! its own config file and environment overrides (§9 Design Notes,
//! "Singleton configuration").
//!
//! Layering order, lowest to highest precedence:
//! 1. `GlobalOptions::default()` / `JobOptions::default()`
//! 2. The config file at the given path, if it exists (TOML, YAML, or JSON
//!    by extension)
//! 3. Environment variables prefixed `ARCHIVE_` (double-underscore
//!    separated for nested keys, e.g. `ARCHIVE_WORKER_COUNT`)

use archive_core_domain::entities::{GlobalOptions, JobOptions};
use archive_core_domain::error::ArchiveError;
use config::{Config, Environment, File};
use std::path::Path;

fn config_err(e: config::ConfigError) -> ArchiveError {
    ArchiveError::invalid_config(e.to_string())
}

/// Loads `GlobalOptions`, layering a config file (if present) and
/// `ARCHIVE_`-prefixed environment variables over the compiled-in
/// defaults.
pub fn load_global_options(config_path: Option<&Path>) -> Result<GlobalOptions, ArchiveError> {
    let defaults = GlobalOptions::default();
    let mut builder = Config::builder().add_source(Config::try_from(&defaults).map_err(config_err)?);

    if let Some(path) = config_path {
        if path.exists() {
            builder = builder.add_source(File::from(path));
        }
    }

    builder = builder.add_source(Environment::with_prefix("ARCHIVE").separator("__"));

    let merged = builder.build().map_err(config_err)?;
    merged.try_deserialize().map_err(config_err)
}

/// Loads `JobOptions` the same way, reading from the same config file so
/// one file can carry both global and per-job settings (§4.12).
pub fn load_job_options(config_path: Option<&Path>) -> Result<JobOptions, ArchiveError> {
    let defaults = JobOptions::default();
    let mut builder = Config::builder().add_source(Config::try_from(&defaults).map_err(config_err)?);

    if let Some(path) = config_path {
        if path.exists() {
            builder = builder.add_source(File::from(path).required(false));
        }
    }

    builder = builder.add_source(Environment::with_prefix("ARCHIVE_JOB").separator("__"));

    let merged = builder.build().map_err(config_err)?;
    merged.try_deserialize().map_err(config_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn missing_config_file_falls_back_to_defaults() {
        let options = load_global_options(Some(Path::new("/nonexistent/archive.toml"))).unwrap();
        assert_eq!(options.weak_password_threshold, GlobalOptions::default().weak_password_threshold);
    }

    #[test]
    fn no_config_path_falls_back_to_defaults() {
        let options = load_global_options(None).unwrap();
        assert_eq!(options.max_image_size, GlobalOptions::default().max_image_size);
    }

    #[test]
    fn config_file_overrides_defaults() {
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(file, "weak_password_threshold = 0.9").unwrap();
        writeln!(file, "staging_directory = \"/tmp/archive-staging\"").unwrap();
        let options = load_global_options(Some(file.path())).unwrap();
        assert_eq!(options.weak_password_threshold, 0.9);
        assert_eq!(options.staging_directory, "/tmp/archive-staging");
    }

    #[test]
    fn job_options_config_file_overrides_defaults() {
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(file, "compress_minimum_size = 4096").unwrap();
        let options = load_job_options(Some(file.path())).unwrap();
        assert_eq!(options.compress_minimum_size, 4096);
    }
}
