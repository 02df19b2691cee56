// /////////////////////////////////////////////////////////////////////////////
// Archive Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Storage Backends
//!
//! `StorageBackend` implementations (§4.10): a local filesystem backend
//! plus stub adapters for the remote transports the source supports
//! (FTP, SCP, SFTP, WebDAV) and optical media.

pub mod local;
pub mod remote;

pub use local::{local_backend, LocalFileBackend};
pub use remote::{HttpLikeBackend, OpticalDeviceBackend, ScpBackend, SftpBackend};
