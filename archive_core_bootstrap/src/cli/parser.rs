// /////////////////////////////////////////////////////////////////////////////
// Archive Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # CLI Parser
//!
//! Command-line structure for the `archive` binary (§11), parsed with
//! clap. Security validation happens afterward in `validator`.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// `archive` - a multi-part, optionally compressed and encrypted backup
/// archiver.
#[derive(Parser, Debug, Clone)]
#[command(name = "archive")]
#[command(about = concat!("archive v", env!("CARGO_PKG_VERSION")))]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file path (TOML, YAML, or JSON - see §10)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override worker thread count used for chunk compression/encryption
    #[arg(long)]
    pub workers: Option<usize>,
}

/// `archive` subcommands (§11 CLI surface)
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Create a new archive from one or more input paths
    Create {
        /// Input files or directories to add
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Base name for the archive (parts are written as
        /// `<base>.<NNN>.bar`)
        #[arg(short, long)]
        output: PathBuf,

        /// Split the archive into parts of at most this many bytes
        #[arg(long)]
        part_size: Option<u64>,

        /// Split the archive across volumes of at most this many bytes
        #[arg(long)]
        volume_size: Option<u64>,

        /// Compression algorithm to use for entry fragments
        #[arg(long, value_parser = parse_compression_algorithm)]
        compress: Option<String>,

        /// Encryption algorithm to use for entry fragments
        #[arg(long, value_parser = parse_crypt_algorithm)]
        encrypt: Option<String>,

        /// Name of the environment variable holding the archive password
        #[arg(long)]
        password_env: Option<String>,
    },

    /// Extract an archive to a directory
    Extract {
        /// Path to the first part of the archive (or its only part)
        archive: PathBuf,

        /// Directory to extract into (defaults to the current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Name of the environment variable holding the archive password
        #[arg(long)]
        password_env: Option<String>,
    },

    /// List the entries contained in an archive
    List {
        /// Path to the first part of the archive
        archive: PathBuf,
    },

    /// Walk every chunk and fragment in an archive without materializing
    /// file contents, reporting truncated chunks or incomplete entries
    Validate {
        /// Path to the first part of the archive
        archive: PathBuf,
    },
}

/// Validate a compression algorithm name from the CLI.
fn parse_compression_algorithm(s: &str) -> Result<String, String> {
    match s.to_lowercase().as_str() {
        "none" | "deflate" | "bzip2" | "lzma" | "zstd" | "brotli" => Ok(s.to_lowercase()),
        _ => Err(format!(
            "invalid compression algorithm '{}'. valid options: none, deflate, bzip2, lzma, zstd, brotli",
            s
        )),
    }
}

/// Validate a crypt algorithm name from the CLI. Options mirror
/// `archive_core_domain::CryptAlgorithm` exactly — no AES-CBC variant
/// exists domain-side (AEAD only), so it isn't offered here either.
fn parse_crypt_algorithm(s: &str) -> Result<String, String> {
    match s.to_lowercase().as_str() {
        "none" | "aes128-gcm" | "aes256-gcm" | "chacha20-poly1305" => Ok(s.to_lowercase()),
        _ => Err(format!(
            "invalid encryption algorithm '{}'. valid options: none, aes128-gcm, aes256-gcm, chacha20-poly1305",
            s
        )),
    }
}

/// Parse CLI arguments. Clap exits the process with a usage message if
/// parsing fails.
pub fn parse_cli() -> Cli {
    Cli::parse()
}
