// /////////////////////////////////////////////////////////////////////////////
// Archive Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Command-Line Interface Module
//!
//! Bootstrap-layer CLI handling with security-first design (§11).
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │  1. parser::parse_cli()             │  Parse CLI with clap
//! └─────────────────┬───────────────────┘
//!                   ↓
//! ┌─────────────────────────────────────┐
//! │  2. validate_cli()                  │  Security validation
//! └─────────────────┬───────────────────┘
//!                   ↓
//! ┌─────────────────────────────────────┐
//! │  3. ValidatedCli                    │  Safe, validated config
//! └─────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `parser` - CLI structure and clap parsing
//! - `validator` - Security validation layer

pub mod parser;
pub mod validator;

pub use parser::{parse_cli, Cli, Commands};
pub use validator::{ParseError, SecureArgParser};

use std::path::PathBuf;

/// Validated CLI configuration.
///
/// Holds all CLI arguments after security validation: paths are
/// canonicalized (where they must already exist) and numeric values are
/// range-checked.
#[derive(Debug, Clone)]
pub struct ValidatedCli {
    pub command: ValidatedCommand,
    pub verbose: bool,
    pub config: Option<PathBuf>,
    pub workers: Option<usize>,
}

/// Validated command variants, one per `archive` subcommand (§11).
#[derive(Debug, Clone)]
pub enum ValidatedCommand {
    Create {
        inputs: Vec<PathBuf>,
        output: PathBuf,
        part_size: Option<u64>,
        volume_size: Option<u64>,
        compress: Option<String>,
        encrypt: Option<String>,
        password_env: Option<String>,
    },
    Extract {
        archive: PathBuf,
        output: Option<PathBuf>,
        password_env: Option<String>,
    },
    List {
        archive: PathBuf,
    },
    Validate {
        archive: PathBuf,
    },
}

/// Parse and validate CLI arguments: parse with clap, then apply
/// `SecureArgParser` path/value validation to every argument.
///
/// # Errors
///
/// Returns `ParseError` if any validation fails.
pub fn parse_and_validate() -> Result<ValidatedCli, ParseError> {
    let cli = parse_cli();
    validate_cli(cli)
}

fn validate_cli(cli: Cli) -> Result<ValidatedCli, ParseError> {
    let config = if let Some(ref path) = cli.config {
        SecureArgParser::validate_path(&path.to_string_lossy())?;
        Some(path.clone())
    } else {
        None
    };

    if let Some(workers) = cli.workers {
        if workers == 0 || workers > 128 {
            return Err(ParseError::InvalidValue {
                arg: "workers".to_string(),
                reason: "must be between 1 and 128".to_string(),
            });
        }
    }

    let command = match cli.command {
        Commands::Create {
            inputs,
            output,
            part_size,
            volume_size,
            compress,
            encrypt,
            password_env,
        } => {
            let mut validated_inputs = Vec::with_capacity(inputs.len());
            for input in &inputs {
                validated_inputs.push(SecureArgParser::validate_path(&input.to_string_lossy())?);
            }

            // The archive base name doesn't exist yet (parts get created
            // under it), so only the string is validated, not the path.
            SecureArgParser::validate_argument(&output.to_string_lossy())?;

            if let Some(size) = part_size {
                if size == 0 {
                    return Err(ParseError::InvalidValue {
                        arg: "part-size".to_string(),
                        reason: "must be greater than 0".to_string(),
                    });
                }
            }

            if let Some(size) = volume_size {
                if size == 0 {
                    return Err(ParseError::InvalidValue {
                        arg: "volume-size".to_string(),
                        reason: "must be greater than 0".to_string(),
                    });
                }
            }

            if let Some(ref env) = password_env {
                SecureArgParser::validate_argument(env)?;
            }

            ValidatedCommand::Create {
                inputs: validated_inputs,
                output,
                part_size,
                volume_size,
                compress,
                encrypt,
                password_env,
            }
        }
        Commands::Extract {
            archive,
            output,
            password_env,
        } => {
            let validated_archive = SecureArgParser::validate_path(&archive.to_string_lossy())?;

            let validated_output = if let Some(ref path) = output {
                SecureArgParser::validate_argument(&path.to_string_lossy())?;
                Some(path.clone())
            } else {
                None
            };

            if let Some(ref env) = password_env {
                SecureArgParser::validate_argument(env)?;
            }

            ValidatedCommand::Extract {
                archive: validated_archive,
                output: validated_output,
                password_env,
            }
        }
        Commands::List { archive } => {
            let validated_archive = SecureArgParser::validate_path(&archive.to_string_lossy())?;
            ValidatedCommand::List {
                archive: validated_archive,
            }
        }
        Commands::Validate { archive } => {
            let validated_archive = SecureArgParser::validate_path(&archive.to_string_lossy())?;
            ValidatedCommand::Validate {
                archive: validated_archive,
            }
        }
    };

    Ok(ValidatedCli {
        command,
        verbose: cli.verbose,
        config,
        workers: cli.workers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_workers() {
        let cli = Cli {
            command: Commands::List {
                archive: PathBuf::from("/tmp/does-not-exist.bar"),
            },
            verbose: false,
            config: None,
            workers: Some(0),
        };
        assert!(matches!(validate_cli(cli), Err(ParseError::InvalidValue { .. })));
    }

    #[test]
    fn rejects_nonexistent_archive_for_list() {
        let cli = Cli {
            command: Commands::List {
                archive: PathBuf::from("/tmp/definitely-does-not-exist-12345.bar"),
            },
            verbose: false,
            config: None,
            workers: None,
        };
        assert!(validate_cli(cli).is_err());
    }
}
