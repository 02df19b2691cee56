// /////////////////////////////////////////////////////////////////////////////
// Archive Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Exit Code Management
//!
//! Standardized Unix exit codes following BSD `sysexits.h` conventions, plus
//! a mapping from `ArchiveError` categories (§7) to the codes a shell script
//! driving `archive` can branch on.
//!
//! ## Exit Code Conventions
//!
//! - **0**: Success
//! - **1**: General error
//! - **64-78**: Specific error conditions (BSD sysexits.h)
//! - **128+N**: Fatal signal N (e.g., 130 = SIGINT)

use std::fmt;

/// Exit codes following Unix conventions (BSD sysexits.h)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(i32)]
pub enum ExitCode {
    /// Successful termination (0)
    #[default]
    Success = 0,

    /// General error (1)
    Error = 1,

    /// Command line usage error (64)
    UsageError = 64,

    /// Data format error (65) - bad magic, unsupported version, truncated chunk
    DataError = 65,

    /// Cannot open input (66) - missing input file, no such archive
    NoInput = 66,

    /// Service unavailable (69) - volume/storage backend unreachable
    Unavailable = 69,

    /// Internal software error (70) - invariant violation, bad state
    Software = 70,

    /// System error (71) - OS call failed
    OsError = 71,

    /// Cannot create output file (73) - destination not writable, disk full
    CantCreate = 73,

    /// I/O error (74)
    IoError = 74,

    /// Temporary failure, retry (75)
    TempFail = 75,

    /// Permission denied (77)
    NoPerm = 77,

    /// Configuration error (78) - bad password, missing key, bad config file
    Config = 78,

    /// Interrupted by signal (SIGINT - Ctrl+C) (130)
    Interrupted = 130,

    /// Terminated by signal (SIGTERM) (143)
    Terminated = 143,
}

impl ExitCode {
    /// Convert to i32 for use with std::process::exit
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Map an `ArchiveError` category (see `ArchiveError::category`) to an
    /// exit code. Categories are matched by name rather than by importing
    /// `archive-core-domain` here, keeping this crate free of a dependency
    /// on the domain/application crates (§2A layering).
    pub fn from_error_category(category: &str) -> Self {
        match category {
            "format" => ExitCode::DataError,
            "crypto" => ExitCode::Config,
            "compression" => ExitCode::DataError,
            "pipeline" => ExitCode::Software,
            "scheduling" => ExitCode::Unavailable,
            "backend" => ExitCode::IoError,
            "control" => ExitCode::TempFail,
            "interop" => ExitCode::DataError,
            _ => ExitCode::Error,
        }
    }

    /// Fall back to pattern-matching an arbitrary error's `Display` text,
    /// for errors that never reached `ArchiveError` (clap parse failures,
    /// std::io::Error at the CLI boundary).
    pub fn from_error(error: &dyn std::error::Error) -> Self {
        let error_string = error.to_string().to_lowercase();

        if error_string.contains("permission") || error_string.contains("access denied") {
            ExitCode::NoPerm
        } else if error_string.contains("not found") || error_string.contains("no such") {
            ExitCode::NoInput
        } else if error_string.contains("invalid") || error_string.contains("argument") {
            ExitCode::UsageError
        } else if error_string.contains("password") || error_string.contains("config") || error_string.contains("key")
        {
            ExitCode::Config
        } else if error_string.contains("parse") || error_string.contains("format") {
            ExitCode::DataError
        } else if error_string.contains("io") || error_string.contains("read") || error_string.contains("write") {
            ExitCode::IoError
        } else if error_string.contains("unavailable") || error_string.contains("not available") {
            ExitCode::Unavailable
        } else {
            ExitCode::Error
        }
    }

    /// Human-readable description of the exit code
    pub fn description(self) -> &'static str {
        match self {
            ExitCode::Success => "Success",
            ExitCode::Error => "General error",
            ExitCode::UsageError => "Command line usage error",
            ExitCode::DataError => "Data format error",
            ExitCode::NoInput => "Cannot open input",
            ExitCode::Unavailable => "Service unavailable",
            ExitCode::Software => "Internal software error",
            ExitCode::OsError => "System error",
            ExitCode::CantCreate => "Cannot create output file",
            ExitCode::IoError => "I/O error",
            ExitCode::TempFail => "Temporary failure, retry",
            ExitCode::NoPerm => "Permission denied",
            ExitCode::Config => "Configuration error",
            ExitCode::Interrupted => "Interrupted by signal (SIGINT)",
            ExitCode::Terminated => "Terminated by signal (SIGTERM)",
        }
    }

    pub fn is_success(self) -> bool {
        matches!(self, ExitCode::Success)
    }

    pub fn is_error(self) -> bool {
        !self.is_success()
    }

    pub fn is_signal(self) -> bool {
        matches!(self, ExitCode::Interrupted | ExitCode::Terminated)
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.description(), self.as_i32())
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code.as_i32()
    }
}

/// Map any boxed error to an exit code, preferring `from_error` pattern
/// matching since this crate has no direct dependency on `ArchiveError`.
pub fn map_error_to_exit_code(error: &(dyn std::error::Error + 'static)) -> ExitCode {
    ExitCode::from_error(error)
}

/// Convert a top-level `main` result into a `std::process::ExitCode`.
pub fn result_to_exit_code<E: std::error::Error>(result: Result<(), E>) -> std::process::ExitCode {
    match result {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => std::process::ExitCode::from(map_error_to_exit_code(&e).as_i32() as u8),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_exit_code_values() {
        assert_eq!(ExitCode::Success.as_i32(), 0);
        assert_eq!(ExitCode::Error.as_i32(), 1);
        assert_eq!(ExitCode::UsageError.as_i32(), 64);
        assert_eq!(ExitCode::Config.as_i32(), 78);
        assert_eq!(ExitCode::Interrupted.as_i32(), 130);
        assert_eq!(ExitCode::Terminated.as_i32(), 143);
    }

    #[test]
    fn test_is_success() {
        assert!(ExitCode::Success.is_success());
        assert!(!ExitCode::Error.is_success());
    }

    #[test]
    fn test_is_signal() {
        assert!(ExitCode::Interrupted.is_signal());
        assert!(ExitCode::Terminated.is_signal());
        assert!(!ExitCode::Success.is_signal());
    }

    #[test]
    fn test_from_error_category() {
        assert_eq!(ExitCode::from_error_category("crypto"), ExitCode::Config);
        assert_eq!(ExitCode::from_error_category("backend"), ExitCode::IoError);
        assert_eq!(ExitCode::from_error_category("unknown-category"), ExitCode::Error);
    }

    #[test]
    fn test_from_error() {
        let err = io::Error::new(io::ErrorKind::PermissionDenied, "permission denied");
        assert_eq!(ExitCode::from_error(&err), ExitCode::NoPerm);

        let err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        assert_eq!(ExitCode::from_error(&err), ExitCode::NoInput);
    }

    #[test]
    fn test_result_to_exit_code_success() {
        let result: Result<(), io::Error> = Ok(());
        assert_eq!(result_to_exit_code(result), std::process::ExitCode::SUCCESS);
    }
}
