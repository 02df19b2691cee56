// /////////////////////////////////////////////////////////////////////////////
// Archive Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Bootstrap-Phase Application Configuration
//!
//! `AppConfig` holds the job-scoped settings derived from one CLI
//! invocation, after argument parsing and `SecureArgParser` validation but
//! before `archive_core::infrastructure::config` layers in `GlobalOptions`/
//! `JobOptions` from a config file (§10, §4.12). It is deliberately a
//! smaller, CLI-shaped structure — the richer layered configuration lives
//! in the `archive-core` crate, which this crate does not depend on.
//!
//! ## Immutability
//!
//! `AppConfig` is immutable after construction: no synchronization is
//! needed to share it across the worker tasks a job spawns.

use std::path::PathBuf;

/// Log level configuration, independent of `tracing`'s own `Level` so this
/// crate's public API doesn't leak a specific logging backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl Default for LogLevel {
    fn default() -> Self {
        LogLevel::Info
    }
}

impl LogLevel {
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

/// Job-scoped application configuration, validated and immutable.
#[derive(Debug, Clone)]
pub struct AppConfig {
    app_name: String,
    log_level: LogLevel,
    inputs: Vec<PathBuf>,
    archive_path: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    worker_threads: Option<usize>,
    verbose: bool,
    dry_run: bool,
}

impl AppConfig {
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    pub fn log_level(&self) -> LogLevel {
        self.log_level
    }

    pub fn inputs(&self) -> &[PathBuf] {
        &self.inputs
    }

    pub fn archive_path(&self) -> Option<&PathBuf> {
        self.archive_path.as_ref()
    }

    pub fn output_dir(&self) -> Option<&PathBuf> {
        self.output_dir.as_ref()
    }

    pub fn worker_threads(&self) -> Option<usize> {
        self.worker_threads
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }
}

/// Builder for `AppConfig`.
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    app_name: Option<String>,
    log_level: Option<LogLevel>,
    inputs: Vec<PathBuf>,
    archive_path: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    worker_threads: Option<usize>,
    verbose: bool,
    dry_run: bool,
}

impl AppConfigBuilder {
    pub fn app_name(mut self, name: impl Into<String>) -> Self {
        self.app_name = Some(name.into());
        self
    }

    pub fn log_level(mut self, level: LogLevel) -> Self {
        self.log_level = Some(level);
        self
    }

    pub fn inputs(mut self, paths: Vec<PathBuf>) -> Self {
        self.inputs = paths;
        self
    }

    pub fn archive_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.archive_path = Some(path.into());
        self
    }

    pub fn output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(path.into());
        self
    }

    pub fn worker_threads(mut self, count: usize) -> Self {
        self.worker_threads = Some(count);
        self
    }

    pub fn verbose(mut self, enabled: bool) -> Self {
        self.verbose = enabled;
        self
    }

    pub fn dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = enabled;
        self
    }

    /// Build the configuration.
    ///
    /// # Panics
    ///
    /// Panics if `app_name` was not set.
    pub fn build(self) -> AppConfig {
        self.try_build().expect("app_name is required")
    }

    /// Try to build the configuration, returning `Err` if required fields
    /// are missing.
    pub fn try_build(self) -> Result<AppConfig, String> {
        Ok(AppConfig {
            app_name: self.app_name.ok_or("app_name is required")?,
            log_level: self.log_level.unwrap_or_default(),
            inputs: self.inputs,
            archive_path: self.archive_path,
            output_dir: self.output_dir,
            worker_threads: self.worker_threads,
            verbose: self.verbose,
            dry_run: self.dry_run,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder_minimal() {
        let config = AppConfig::builder().app_name("archive").build();

        assert_eq!(config.app_name(), "archive");
        assert_eq!(config.log_level(), LogLevel::Info);
        assert!(config.inputs().is_empty());
        assert!(config.archive_path().is_none());
        assert!(config.output_dir().is_none());
        assert!(!config.is_verbose());
        assert!(!config.is_dry_run());
    }

    #[test]
    fn test_config_builder_full() {
        let config = AppConfig::builder()
            .app_name("archive")
            .log_level(LogLevel::Debug)
            .inputs(vec![PathBuf::from("/a"), PathBuf::from("/b")])
            .archive_path("/out/base")
            .output_dir("/restore")
            .worker_threads(8)
            .verbose(true)
            .dry_run(true)
            .build();

        assert_eq!(config.log_level(), LogLevel::Debug);
        assert_eq!(config.inputs().len(), 2);
        assert_eq!(config.archive_path(), Some(&PathBuf::from("/out/base")));
        assert_eq!(config.output_dir(), Some(&PathBuf::from("/restore")));
        assert_eq!(config.worker_threads(), Some(8));
        assert!(config.is_verbose());
        assert!(config.is_dry_run());
    }

    #[test]
    #[should_panic(expected = "app_name is required")]
    fn test_config_builder_missing_app_name() {
        AppConfig::builder().build();
    }

    #[test]
    fn test_config_try_build_failure() {
        let result = AppConfig::builder().try_build();
        assert!(result.is_err());
    }

    #[test]
    fn test_log_level_to_tracing() {
        assert_eq!(LogLevel::Error.to_tracing_level(), tracing::Level::ERROR);
        assert_eq!(LogLevel::Trace.to_tracing_level(), tracing::Level::TRACE);
    }
}
