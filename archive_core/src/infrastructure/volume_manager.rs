// /////////////////////////////////////////////////////////////////////////////
// Archive Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # VolumeManager
//!
//! Implements §4.6: groups parts onto physical volumes, runs the image/ECC
//! command pipeline when a volume fills, and drives the three-channel
//! medium-change protocol. Grounded on the teacher's
//! `infrastructure::runtime::stage_executor` for sequencing external
//! side-effecting steps, with `tokio::process::Command` in place of the
//! teacher's in-process stage closures since these steps are real
//! subprocesses (`mkisofs`, `dvdisaster`, burner CLIs).

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use archive_core_domain::entities::GlobalOptions;
use archive_core_domain::services::volume_requester::{VolumeDecision, VolumeKind, VolumeRequester};
use archive_core_domain::value_objects::VolumeNumber;
use archive_core_domain::ArchiveError;

use crate::application::pipeline::part_scheduler::VolumeCoordinator;
use crate::infrastructure::metrics::MetricsService;

/// Executes a templated external command (§4.6 "Implementation scope").
#[async_trait]
pub trait VolumeCommandRunner: Send + Sync {
    /// `command_line` is already template-substituted. Returns the process
    /// exit status; a non-zero status is the caller's business to
    /// interpret (e.g. "zero exit signals insertion" for
    /// `requestVolumeCommand`).
    async fn run(&self, command_line: &str) -> Result<i32, ArchiveError>;
}

/// Runs nothing, reports success. Used for plain multi-part-to-directory
/// jobs that never configure burn/image commands, and for tests.
pub struct NoOpVolumeCommandRunner;

#[async_trait]
impl VolumeCommandRunner for NoOpVolumeCommandRunner {
    async fn run(&self, _command_line: &str) -> Result<i32, ArchiveError> {
        Ok(0)
    }
}

/// Runs a command line through `/bin/sh -c` via `tokio::process::Command`.
pub struct ProcessVolumeCommandRunner;

#[async_trait]
impl VolumeCommandRunner for ProcessVolumeCommandRunner {
    async fn run(&self, command_line: &str) -> Result<i32, ArchiveError> {
        let status = tokio::process::Command::new("/bin/sh")
            .arg("-c")
            .arg(command_line)
            .status()
            .await
            .map_err(|e| ArchiveError::backend_fail(format!("spawning volume command: {e}")))?;
        Ok(status.code().unwrap_or(-1))
    }
}

/// Substitutes `%device`/`%directory`/`%image`/`%file`/`%number`/`%sectors`
/// placeholders in a command template. Unknown `%x` sequences are left
/// intact (§4.6 "Template substitution").
pub fn substitute_template(template: &str, vars: &HashMap<&str, String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        let mut name = String::new();
        while let Some(&next) = chars.peek() {
            if next.is_ascii_alphabetic() {
                name.push(next);
                chars.next();
            } else {
                break;
            }
        }
        match vars.get(name.as_str()) {
            Some(value) => out.push_str(value),
            None => {
                out.push('%');
                out.push_str(&name);
            }
        }
    }
    out
}

/// Validates that required placeholders are present in their templates at
/// load time, not at run time (§4.6): `imageCommand` must reference
/// `%image` whenever it is configured.
pub fn validate_templates(options: &GlobalOptions) -> Result<(), ArchiveError> {
    if let Some(cmd) = &options.image_command {
        if !cmd.contains("%image") {
            return Err(ArchiveError::template_invalid("imageCommand must reference %image"));
        }
    }
    Ok(())
}

/// Before accepting a job producing optical media: required free space is
/// `volumeSize + maxImageSize * (2 if ecc else 1)` (§4.6). Insufficient
/// space is a warning, never a hard failure, so this returns a bool rather
/// than a `Result`.
pub fn has_sufficient_staging_space(free_bytes: u64, volume_size: u64, max_image_size: u64, ecc_enabled: bool) -> bool {
    let multiplier = if ecc_enabled { 2 } else { 1 };
    free_bytes >= volume_size + max_image_size * multiplier
}

/// Mutable counters tracked across `on_part_closed` calls (§4.6
/// "VolumeManager tracks `partsWrittenToCurrentVolume` and cumulative byte
/// count"). `VolumeCoordinator::on_part_closed` takes `&self` — it is
/// invoked through `Arc<dyn VolumeCoordinator>` from `PartScheduler` — so
/// this state lives behind a `tokio::sync::Mutex` rather than requiring
/// `&mut self` up the call chain.
struct VolumeState {
    volume_number: VolumeNumber,
    parts_written_to_current_volume: u32,
    bytes_in_current_volume: u64,
}

pub struct VolumeManager {
    options: GlobalOptions,
    runner: Box<dyn VolumeCommandRunner>,
    requester: Option<Box<dyn VolumeRequester>>,
    volume_size: Option<u64>,
    error_correction: bool,
    state: tokio::sync::Mutex<VolumeState>,
    metrics: Arc<MetricsService>,
}

impl VolumeManager {
    pub fn new(
        options: GlobalOptions,
        runner: Box<dyn VolumeCommandRunner>,
        requester: Option<Box<dyn VolumeRequester>>,
        volume_size: Option<u64>,
        error_correction: bool,
        metrics: Arc<MetricsService>,
    ) -> Self {
        Self {
            options,
            runner,
            requester,
            volume_size,
            error_correction,
            state: tokio::sync::Mutex::new(VolumeState {
                volume_number: VolumeNumber::FIRST,
                parts_written_to_current_volume: 0,
                bytes_in_current_volume: 0,
            }),
            metrics,
        }
    }

    pub async fn volume_number(&self) -> VolumeNumber {
        self.state.lock().await.volume_number
    }

    async fn template_vars(&self, part_name: &str) -> HashMap<&'static str, String> {
        let volume_number = self.state.lock().await.volume_number;
        let mut vars = HashMap::new();
        vars.insert("directory", self.options.staging_directory.clone());
        vars.insert("file", part_name.to_string());
        vars.insert("number", volume_number.value().to_string());
        vars
    }

    async fn run_if_configured(&self, template: &Option<String>, vars: &HashMap<&str, String>) -> Result<(), ArchiveError> {
        if let Some(template) = template {
            let command_line = substitute_template(template, vars);
            self.runner.run(&command_line).await?;
        }
        Ok(())
    }

    /// Runs the volume-fill sequence (§4.6 steps 1-3, 5-7); step 4 (medium
    /// request) is `request_new_medium`, called separately so the caller can
    /// surface `ABORTED` distinctly from a command failure.
    async fn run_volume_fill_commands(&self, part_name: &str) -> Result<(), ArchiveError> {
        let vars = self.template_vars(part_name).await;
        self.run_if_configured(&self.options.image_pre_process_command, &vars).await?;
        self.run_if_configured(&self.options.image_command, &vars).await?;
        self.run_if_configured(&self.options.image_post_process_command, &vars).await?;

        if self.error_correction {
            self.run_if_configured(&self.options.ecc_pre_process_command, &vars).await?;
            self.run_if_configured(&self.options.ecc_command, &vars).await?;
            self.run_if_configured(&self.options.ecc_post_process_command, &vars).await?;
        }
        Ok(())
    }

    async fn run_write_commands(&self, part_name: &str) -> Result<(), ArchiveError> {
        let vars = self.template_vars(part_name).await;
        self.run_if_configured(&self.options.write_pre_process_command, &vars).await?;
        if self.options.write_image_command.is_some() {
            self.run_if_configured(&self.options.write_image_command, &vars).await?;
        } else {
            self.run_if_configured(&self.options.write_command, &vars).await?;
        }
        self.run_if_configured(&self.options.write_post_process_command, &vars).await
    }

    /// §4.6 "Medium-change protocol": unload, request a new medium via the
    /// three channels in priority order, load, advance the volume number.
    async fn request_new_medium(&self) -> Result<(), ArchiveError> {
        let vars = self.template_vars("").await;
        self.run_if_configured(&self.options.unload_volume_command, &vars).await?;

        let requested = self.state.lock().await.volume_number.next();
        let decision = self.request_medium_via_channels(requested).await?;
        match decision {
            VolumeDecision::Ok => {
                self.run_if_configured(&self.options.load_volume_command, &vars).await?;
                let mut state = self.state.lock().await;
                state.volume_number = requested;
                state.parts_written_to_current_volume = 0;
                state.bytes_in_current_volume = 0;
                drop(state);
                self.metrics.record_volume_changed();
                Ok(())
            }
            VolumeDecision::Aborted => Err(ArchiveError::bad_state("volume change aborted by operator")),
            VolumeDecision::Unload => Err(ArchiveError::bad_state("volume change loop exceeded unload retries")),
        }
    }

    async fn request_medium_via_channels(&self, requested: VolumeNumber) -> Result<VolumeDecision, ArchiveError> {
        let message = format!("insert volume {} to continue the archive", requested.value());

        // Channel (a): callback to the job controller, looping on UNLOAD.
        if let Some(requester) = &self.requester {
            loop {
                match requester.request_volume(VolumeKind::NextVolume, requested, &message)? {
                    VolumeDecision::Unload => continue,
                    decision => return Ok(decision),
                }
            }
        }

        // Channel (b): external command, zero exit signals insertion.
        if let Some(template) = &self.options.request_volume_command {
            let vars = self.template_vars("").await;
            let command_line = substitute_template(template, &vars);
            let code = self.runner.run(&command_line).await?;
            return Ok(if code == 0 { VolumeDecision::Ok } else { VolumeDecision::Aborted });
        }

        // Channel (c): no interactive console available from this layer;
        // bootstrap's CLI-backed `VolumeRequester` covers the interactive
        // case. Without either channel configured, batch mode cannot
        // proceed without operator input.
        Err(ArchiveError::bad_state(
            "no volume request channel configured: supply a VolumeRequester or requestVolumeCommand",
        ))
    }
}

#[async_trait]
impl VolumeCoordinator for VolumeManager {
    async fn on_part_closed(&self, part_number: archive_core_domain::value_objects::PartNumber, part_name: &str, size: u64) -> Result<(), ArchiveError> {
        let _ = part_number;
        let Some(volume_size) = self.volume_size else {
            return Ok(());
        };

        let is_full = {
            let mut state = self.state.lock().await;
            state.bytes_in_current_volume += size;
            state.parts_written_to_current_volume += 1;
            state.bytes_in_current_volume >= volume_size
        };

        if is_full {
            self.run_volume_fill_commands(part_name).await?;
            self.request_new_medium().await?;
            self.run_write_commands(part_name).await?;
        }
        Ok(())
    }
}
