// /////////////////////////////////////////////////////////////////////////////
// Archive Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # `archive` CLI binary
//!
//! Composition root (§11): parses and validates CLI arguments via
//! `archive_core_bootstrap`, loads layered config (§4.12), wires the
//! default `LocalFileBackend`/`SqliteIndexStore`/`AeadCryptFrame`/
//! `MultiCodecCompressFrame` stack, and drives `ArchiveWriter`/
//! `ArchiveReader` for the four subcommands.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use archive_core_bootstrap::capability_providers::StaticPasswordProvider;
use archive_core_bootstrap::{result_to_exit_code, ValidatedCommand};
use archive_core_domain::entities::{GlobalOptions, JobOptions, PosixAttributes};
use archive_core_domain::services::progress_sink::{NullProgressSink, ProgressStatus};
use archive_core_domain::{ArchiveError, CompressionService, EncryptionService, EntryKind, IndexStore, ProgressSink, StorageBackend};

use archive_core::application::pipeline::archive_reader::ArchiveReader;
use archive_core::application::pipeline::archive_writer::ArchiveWriter;
use archive_core::infrastructure::compress_frame::MultiCodecCompressFrame;
use archive_core::infrastructure::config::{load_global_options, load_job_options};
use archive_core::infrastructure::crypt_frame::AeadCryptFrame;
use archive_core::infrastructure::repositories::sqlite_index_store::SqliteIndexStore;
use archive_core::infrastructure::storage::local_backend;

#[tokio::main]
async fn main() -> std::process::ExitCode {
    let cli = match archive_core_bootstrap::bootstrap_cli() {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("{e}");
            return std::process::ExitCode::from(64);
        }
    };

    init_tracing(cli.verbose);

    result_to_exit_code(run(cli).await)
}

fn init_tracing(verbose: bool) {
    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };
    let _ = tracing_subscriber::fmt().with_max_level(level).try_init();
}

async fn run(cli: archive_core_bootstrap::ValidatedCli) -> Result<(), ArchiveError> {
    let globals = load_global_options(cli.config.as_deref())?;

    match cli.command {
        ValidatedCommand::Create {
            inputs,
            output,
            part_size,
            volume_size,
            compress,
            encrypt,
            password_env,
        } => {
            create_archive(&globals, cli.config.as_deref(), inputs, output, part_size, volume_size, compress, encrypt, password_env).await
        }
        ValidatedCommand::Extract { archive, output, password_env } => extract_archive(&globals, archive, output, password_env).await,
        ValidatedCommand::List { archive } => list_archive(&globals, archive).await,
        ValidatedCommand::Validate { archive } => validate_archive(&globals, archive).await,
    }
}

fn split_archive_path(path: &Path) -> Result<(PathBuf, String), ArchiveError> {
    let parent = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or_else(|| Path::new("."));
    let name = path
        .file_name()
        .ok_or_else(|| ArchiveError::invalid_config(format!("'{}' has no file name component", path.display())))?
        .to_string_lossy()
        .into_owned();
    Ok((parent.to_path_buf(), name))
}

fn codecs() -> (Arc<dyn CompressionService>, Arc<dyn EncryptionService>) {
    (Arc::new(MultiCodecCompressFrame::new()), Arc::new(AeadCryptFrame::new()))
}

async fn password_provider(
    globals: &GlobalOptions,
    password_env: Option<&str>,
) -> Result<Option<Arc<StaticPasswordProvider>>, ArchiveError> {
    let Some(var) = password_env else { return Ok(None) };
    let passphrase = std::env::var(var)
        .map_err(|_| ArchiveError::invalid_config(format!("environment variable '{var}' is not set")))?;
    Ok(Some(Arc::new(StaticPasswordProvider::new(passphrase.into_bytes(), globals.weak_password_threshold))))
}

#[allow(clippy::too_many_arguments)]
async fn create_archive(
    globals: &GlobalOptions,
    config_path: Option<&Path>,
    inputs: Vec<PathBuf>,
    output: PathBuf,
    part_size: Option<u64>,
    volume_size: Option<u64>,
    compress: Option<String>,
    encrypt: Option<String>,
    password_env: Option<String>,
) -> Result<(), ArchiveError> {
    let job_defaults = load_job_options(config_path)?;
    let job_options = JobOptions {
        part_size: part_size.or(job_defaults.part_size),
        volume_size: volume_size.or(job_defaults.volume_size),
        compression_algorithm: compress
            .map(|s| s.parse::<archive_core_domain::CompressionAlgorithm>())
            .transpose()?
            .unwrap_or(job_defaults.compression_algorithm),
        crypt_algorithm: encrypt
            .map(|s| s.parse::<archive_core_domain::CryptAlgorithm>())
            .transpose()?
            .unwrap_or(job_defaults.crypt_algorithm),
        password_env_var: password_env.clone(),
        ..job_defaults
    };

    let passwords = password_provider(globals, job_options.password_env_var.as_deref()).await?;
    if job_options.crypt_algorithm.is_encrypted() && passwords.is_none() {
        return Err(ArchiveError::invalid_config(
            "--encrypt requires --password-env naming an environment variable holding the passphrase",
        ));
    }
    let passwords: Arc<dyn archive_core_domain::PasswordProvider> = match passwords {
        Some(p) => p,
        None => Arc::new(StaticPasswordProvider::new(Vec::new(), globals.weak_password_threshold)),
    };

    let (parent, archive_name) = split_archive_path(&output)?;
    let backend: Arc<dyn StorageBackend> = Arc::new(local_backend(&parent).await?);
    let index: Arc<dyn IndexStore> = Arc::new(SqliteIndexStore::connect(&index_db_url(&parent)).await?);
    let (compression, encryption) = codecs();

    let mut writer = ArchiveWriter::create(backend, index, compression, encryption, passwords, archive_name, globals, job_options).await?;

    let progress: Arc<dyn ProgressSink> = Arc::new(NullProgressSink);
    let mut entries_done = 0u64;
    let mut bytes_done = 0u64;

    for input in &inputs {
        let base_name = input.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_else(|| input.to_string_lossy().into_owned());
        let mut pending = vec![(input.clone(), base_name)];
        write_tree(&mut writer, &mut pending, &progress, &mut entries_done, &mut bytes_done).await?;
    }

    let metrics = writer.metrics().accumulator();
    tracing::info!(
        bytes_written = metrics.bytes_written(),
        chunks_framed = metrics.chunks_framed(),
        parts_rotated = metrics.parts_rotated(),
        "archive job finished"
    );

    writer.close().await
}

/// Walks one root path (and everything under it) breadth-first via an
/// explicit work queue, writing one entry per file/directory/symlink found
/// (§4.7). Hardlinks, device/special files, and disk images are not
/// produced by a plain filesystem walk and are left to direct library use
/// (`ArchiveWriter::new_hardlink_entry`/`new_special_entry`/`new_image_entry`).
async fn write_tree(
    writer: &mut ArchiveWriter,
    pending: &mut Vec<(PathBuf, String)>,
    progress: &Arc<dyn ProgressSink>,
    entries_done: &mut u64,
    bytes_done: &mut u64,
) -> Result<(), ArchiveError> {
    while let Some((path, entry_name)) = pending.pop() {
        let metadata = tokio::fs::symlink_metadata(&path).await.map_err(|e| ArchiveError::backend_fail(e.to_string()))?;
        let posix = posix_attributes(&metadata);

        if metadata.is_symlink() {
            let target = tokio::fs::read_link(&path).await.map_err(|e| ArchiveError::backend_fail(e.to_string()))?;
            writer.new_link_entry(&entry_name, posix, target.to_string_lossy().into_owned()).await?;
        } else if metadata.is_dir() {
            writer.new_directory_entry(&entry_name, posix).await?;
            let mut read_dir = tokio::fs::read_dir(&path).await.map_err(|e| ArchiveError::backend_fail(e.to_string()))?;
            let mut children = Vec::new();
            while let Some(child) = read_dir.next_entry().await.map_err(|e| ArchiveError::backend_fail(e.to_string()))? {
                children.push(child.file_name());
            }
            children.sort();
            for child_name in children.into_iter().rev() {
                let child_path = path.join(&child_name);
                let child_entry_name = format!("{}/{}", entry_name, child_name.to_string_lossy());
                pending.push((child_path, child_entry_name));
            }
        } else {
            let size = metadata.len();
            writer.new_file_entry(&entry_name, posix, size).await?;
            let mut file = tokio::fs::File::open(&path).await.map_err(|e| ArchiveError::backend_fail(e.to_string()))?;
            let mut buf = vec![0u8; 256 * 1024];
            loop {
                use tokio::io::AsyncReadExt;
                let n = file.read(&mut buf).await.map_err(|e| ArchiveError::backend_fail(e.to_string()))?;
                if n == 0 {
                    break;
                }
                writer.write_data(&buf[..n]).await?;
                *bytes_done += n as u64;
            }
            writer.close_entry().await?;
        }

        *entries_done += 1;
        progress.on_progress(&ProgressStatus {
            current_entry: entry_name,
            entries_done: *entries_done,
            entries_total: None,
            bytes_done: *bytes_done,
            bytes_total: None,
        });
    }
    Ok(())
}

#[cfg(unix)]
fn posix_attributes(metadata: &std::fs::Metadata) -> PosixAttributes {
    use std::os::unix::fs::MetadataExt;
    let to_datetime = |secs: i64, nanos: u32| {
        chrono::DateTime::<chrono::Utc>::from_timestamp(secs, nanos).unwrap_or_else(|| chrono::DateTime::<chrono::Utc>::from_timestamp(0, 0).expect("epoch is valid"))
    };
    PosixAttributes {
        atime: to_datetime(metadata.atime(), metadata.atime_nsec() as u32),
        mtime: to_datetime(metadata.mtime(), metadata.mtime_nsec() as u32),
        ctime: to_datetime(metadata.ctime(), metadata.ctime_nsec() as u32),
        uid: metadata.uid(),
        gid: metadata.gid(),
        permission: metadata.mode() & 0o7777,
    }
}

#[cfg(not(unix))]
fn posix_attributes(metadata: &std::fs::Metadata) -> PosixAttributes {
    let now = chrono::Utc::now();
    let mtime = metadata.modified().map(chrono::DateTime::<chrono::Utc>::from).unwrap_or(now);
    PosixAttributes { atime: mtime, mtime, ctime: mtime, uid: 0, gid: 0, permission: if metadata.is_dir() { 0o755 } else { 0o644 } }
}

fn index_db_url(archive_dir: &Path) -> String {
    format!("sqlite://{}/.archive-index.db?mode=rwc", archive_dir.display())
}

async fn extract_archive(
    globals: &GlobalOptions,
    archive: PathBuf,
    output: Option<PathBuf>,
    password_env: Option<String>,
) -> Result<(), ArchiveError> {
    let (parent, archive_name) = split_archive_path(&archive)?;
    let backend: Arc<dyn StorageBackend> = Arc::new(local_backend(&parent).await?);
    let (compression, encryption) = codecs();
    let passwords = password_provider(globals, password_env.as_deref()).await?;
    let passwords: Option<Arc<dyn archive_core_domain::PasswordProvider>> =
        passwords.map(|p| p as Arc<dyn archive_core_domain::PasswordProvider>);

    let output_dir = output.unwrap_or_else(|| PathBuf::from("."));
    tokio::fs::create_dir_all(&output_dir).await.map_err(|e| ArchiveError::backend_fail(e.to_string()))?;

    let mut reader = ArchiveReader::open(backend, compression, encryption, passwords, archive_name, None).await?;
    let progress: Arc<dyn ProgressSink> = Arc::new(NullProgressSink);
    let mut entries_done = 0u64;
    let mut bytes_done = 0u64;

    while let Some(header) = reader.next_entry().await? {
        // `header` borrows `reader` exclusively for its whole lifetime
        // (§4.8 `nextEntry` signature), so every field this iteration needs
        // is copied out here, before any further call on `reader`.
        let name = header.name().to_string();
        let kind = entry_kind(header);
        let link_destination =
            if let archive_core_domain::EntryHeader::Link { destination, .. } = header { Some(destination.clone()) } else { None };
        let target = output_dir.join(&name);

        match kind {
            EntryKind::Directory => {
                tokio::fs::create_dir_all(&target).await.map_err(|e| ArchiveError::backend_fail(e.to_string()))?;
            }
            EntryKind::Link => {
                if let Some(destination) = link_destination {
                    if let Some(dir) = target.parent() {
                        tokio::fs::create_dir_all(dir).await.map_err(|e| ArchiveError::backend_fail(e.to_string()))?;
                    }
                    let _ = tokio::fs::remove_file(&target).await;
                    create_symlink(&destination, &target)?;
                }
            }
            EntryKind::File | EntryKind::Image | EntryKind::HardLink => {
                if let Some(dir) = target.parent() {
                    tokio::fs::create_dir_all(dir).await.map_err(|e| ArchiveError::backend_fail(e.to_string()))?;
                }
                let mut file = tokio::fs::File::create(&target).await.map_err(|e| ArchiveError::backend_fail(e.to_string()))?;
                let mut buf = Vec::new();
                loop {
                    use tokio::io::AsyncWriteExt;
                    buf.clear();
                    let n = reader.read_data(&mut buf).await?;
                    if n == 0 {
                        break;
                    }
                    file.write_all(&buf).await.map_err(|e| ArchiveError::backend_fail(e.to_string()))?;
                    bytes_done += n as u64;
                }
            }
            EntryKind::Special => {
                tracing::warn!(entry = %name, "special device entries are not recreated on this platform, skipping");
            }
        }

        entries_done += 1;
        progress.on_progress(&ProgressStatus {
            current_entry: name,
            entries_done,
            entries_total: None,
            bytes_done,
            bytes_total: None,
        });
    }

    reader.close();
    Ok(())
}

#[cfg(unix)]
fn create_symlink(destination: &str, target: &Path) -> Result<(), ArchiveError> {
    std::os::unix::fs::symlink(destination, target).map_err(|e| ArchiveError::backend_fail(e.to_string()))
}

#[cfg(not(unix))]
fn create_symlink(destination: &str, target: &Path) -> Result<(), ArchiveError> {
    std::os::windows::fs::symlink_file(destination, target).map_err(|e| ArchiveError::backend_fail(e.to_string()))
}

async fn list_archive(_globals: &GlobalOptions, archive: PathBuf) -> Result<(), ArchiveError> {
    let (parent, archive_name) = split_archive_path(&archive)?;
    let backend: Arc<dyn StorageBackend> = Arc::new(local_backend(&parent).await?);
    let (compression, encryption) = codecs();

    let mut reader = ArchiveReader::open(backend, compression, encryption, None, archive_name, None).await?;
    while let Some(header) = reader.next_entry().await? {
        let kind = entry_kind(header);
        let size = header.declared_size().map(|s| s.to_string()).unwrap_or_else(|| "-".to_string());
        println!("{:>10}  {:9?}  {}", size, kind, header.name());
    }
    reader.close();
    Ok(())
}

/// Maps an entry header to its kind without re-borrowing `reader` (§4.8
/// `nextEntry`'s returned reference keeps `reader` exclusively borrowed for
/// as long as it's alive, so `ArchiveReader::current_kind` can't be called
/// in the same breath as other field reads off the same header).
fn entry_kind(header: &archive_core_domain::EntryHeader) -> EntryKind {
    match header {
        archive_core_domain::EntryHeader::File { .. } => EntryKind::File,
        archive_core_domain::EntryHeader::Image { .. } => EntryKind::Image,
        archive_core_domain::EntryHeader::Directory { .. } => EntryKind::Directory,
        archive_core_domain::EntryHeader::Link { .. } => EntryKind::Link,
        archive_core_domain::EntryHeader::HardLink { .. } => EntryKind::HardLink,
        archive_core_domain::EntryHeader::Special { .. } => EntryKind::Special,
    }
}

async fn validate_archive(_globals: &GlobalOptions, archive: PathBuf) -> Result<(), ArchiveError> {
    let (parent, archive_name) = split_archive_path(&archive)?;
    let backend: Arc<dyn StorageBackend> = Arc::new(local_backend(&parent).await?);
    let (compression, encryption) = codecs();

    let mut reader = ArchiveReader::open(backend, compression, encryption, None, archive_name, None).await?;
    let mut entries = 0u64;
    while let Some(header) = reader.next_entry().await? {
        let name = header.name().to_string();
        reader.skip_entry().await.map_err(|e| ArchiveError::chunk_truncated(format!("entry '{name}' is incomplete: {e}")))?;
        entries += 1;
    }
    reader.close();
    println!("ok: {entries} entries validated");
    Ok(())
}
