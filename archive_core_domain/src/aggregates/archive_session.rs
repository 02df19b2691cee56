// /////////////////////////////////////////////////////////////////////////////
// Archive Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # ArchiveSession aggregate
//!
//! Drives the `ArchiveWriter` state machine of §4.7:
//!
//! ```text
//! INIT ──create──▶ OPEN ──begin_entry──▶ ENTRY_ACTIVE
//!                   ▲                        │
//!                   └──────close_entry────────┘
//! OPEN ──close──▶ CLOSED        ENTRY_ACTIVE ──close (implicit close_entry)──▶ CLOSED
//! ```
//!
//! Any operation attempted in the wrong state is `BAD_STATE`; per §4.7, a
//! session that has returned `BAD_STATE` remains usable for `close` only —
//! this aggregate enforces that by leaving `state` unchanged on a rejected
//! transition rather than moving to some recovery state.

use crate::entities::{ArchiveHeader, JobOptions};
use crate::ArchiveError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveSessionState {
    Init,
    Open,
    EntryActive,
    Closed,
}

#[derive(Debug, Clone)]
pub struct ArchiveSession {
    state: ArchiveSessionState,
    header: Option<ArchiveHeader>,
    job_options: JobOptions,
    current_entry_name: Option<String>,
}

impl ArchiveSession {
    pub fn new(job_options: JobOptions) -> Self {
        Self {
            state: ArchiveSessionState::Init,
            header: None,
            job_options,
            current_entry_name: None,
        }
    }

    pub fn state(&self) -> ArchiveSessionState {
        self.state
    }

    pub fn job_options(&self) -> &JobOptions {
        &self.job_options
    }

    pub fn header(&self) -> Option<&ArchiveHeader> {
        self.header.as_ref()
    }

    pub fn current_entry_name(&self) -> Option<&str> {
        self.current_entry_name.as_deref()
    }

    /// `ArchiveWriter::create` — `INIT -> OPEN`.
    pub fn create(&mut self, header: ArchiveHeader) -> Result<(), ArchiveError> {
        self.require_state(ArchiveSessionState::Init, "create")?;
        self.header = Some(header);
        self.state = ArchiveSessionState::Open;
        Ok(())
    }

    /// Any `newXxxEntry` operation — `OPEN -> ENTRY_ACTIVE`.
    pub fn begin_entry(&mut self, name: impl Into<String>) -> Result<(), ArchiveError> {
        self.require_state(ArchiveSessionState::Open, "begin_entry")?;
        self.current_entry_name = Some(name.into());
        self.state = ArchiveSessionState::EntryActive;
        Ok(())
    }

    /// `closeEntry` — `ENTRY_ACTIVE -> OPEN`.
    pub fn close_entry(&mut self) -> Result<(), ArchiveError> {
        self.require_state(ArchiveSessionState::EntryActive, "close_entry")?;
        self.current_entry_name = None;
        self.state = ArchiveSessionState::Open;
        Ok(())
    }

    /// `close` — `OPEN -> CLOSED`, or `ENTRY_ACTIVE -> CLOSED` with an
    /// implicit `close_entry` first (§4.7's state diagram).
    pub fn close(&mut self) -> Result<(), ArchiveError> {
        match self.state {
            ArchiveSessionState::Open | ArchiveSessionState::EntryActive => {
                self.current_entry_name = None;
                self.state = ArchiveSessionState::Closed;
                Ok(())
            }
            ArchiveSessionState::Init | ArchiveSessionState::Closed => {
                Err(ArchiveError::bad_state(format!("close is invalid from state {:?}", self.state)))
            }
        }
    }

    fn require_state(&self, expected: ArchiveSessionState, operation: &str) -> Result<(), ArchiveError> {
        if self.state != expected {
            return Err(ArchiveError::bad_state(format!(
                "{operation} requires state {expected:?}, session is in {:?}",
                self.state
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::ArchiveSalt;

    fn header() -> ArchiveHeader {
        ArchiveHeader::new(ArchiveSalt::generate())
    }

    #[test]
    fn happy_path_walks_through_every_state() {
        let mut session = ArchiveSession::new(JobOptions::default());
        assert_eq!(session.state(), ArchiveSessionState::Init);

        session.create(header()).unwrap();
        assert_eq!(session.state(), ArchiveSessionState::Open);

        session.begin_entry("greet.txt").unwrap();
        assert_eq!(session.state(), ArchiveSessionState::EntryActive);
        assert_eq!(session.current_entry_name(), Some("greet.txt"));

        session.close_entry().unwrap();
        assert_eq!(session.state(), ArchiveSessionState::Open);

        session.close().unwrap();
        assert_eq!(session.state(), ArchiveSessionState::Closed);
    }

    #[test]
    fn close_from_entry_active_implicitly_closes_the_entry() {
        let mut session = ArchiveSession::new(JobOptions::default());
        session.create(header()).unwrap();
        session.begin_entry("a.txt").unwrap();

        session.close().unwrap();
        assert_eq!(session.state(), ArchiveSessionState::Closed);
        assert_eq!(session.current_entry_name(), None);
    }

    #[test]
    fn second_begin_entry_before_close_entry_is_bad_state() {
        let mut session = ArchiveSession::new(JobOptions::default());
        session.create(header()).unwrap();
        session.begin_entry("a.txt").unwrap();

        let err = session.begin_entry("b.txt").unwrap_err();
        assert_eq!(err.category(), "pipeline");
    }

    #[test]
    fn create_twice_is_bad_state() {
        let mut session = ArchiveSession::new(JobOptions::default());
        session.create(header()).unwrap();
        assert!(session.create(header()).is_err());
    }

    #[test]
    fn close_after_close_is_bad_state() {
        let mut session = ArchiveSession::new(JobOptions::default());
        session.create(header()).unwrap();
        session.close().unwrap();
        assert!(session.close().is_err());
    }
}
