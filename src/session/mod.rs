//! # Session Module
//!
//! Rotation of CSV output files in lockstep with the firmware's in-band
//! log markers.
//!
//! This module handles:
//! - The `OK LOG 1` / `OK LOG 0` marker literals
//! - The Idle/Logging state machine (at most one open session)
//! - Date-based directory layout and sequence-numbered file names
//! - Header emission and close-time sync
//!
//! Submodules:
//! - [`naming`]: pure path and file-name construction

pub mod naming;

use std::fs;
use std::path::Path;

use chrono::Local;
use tracing::{debug, info};

use crate::config::LoggingConfig;
use crate::error::Result;
use crate::record::schema::header_row;
use crate::transcript::TranscriptStream;
use crate::writer::DurableWriter;

/// Console line that opens a logging session, after stripping and trimming.
pub const LOG_START_MARKER: &str = "OK LOG 1";

/// Console line that closes a logging session, after stripping and trimming.
pub const LOG_STOP_MARKER: &str = "OK LOG 0";

/// One open logging session: a durable writer on the session's CSV file.
#[derive(Debug)]
struct Session {
    writer: DurableWriter,
}

/// State machine that opens and closes session files on log markers.
///
/// `Idle` is represented by `session` being `None`, `Logging` by `Some`.
/// The sequence number never resets while the process lives, so file names
/// stay unique even when several sessions start within one second.
#[derive(Debug)]
pub struct SessionRotator {
    logging: LoggingConfig,
    session_count: u32,
    session: Option<Session>,
}

impl SessionRotator {
    /// Create an idle rotator using the given logging configuration.
    #[must_use]
    pub fn new(logging: LoggingConfig) -> Self {
        Self {
            logging,
            session_count: 0,
            session: None,
        }
    }

    /// Whether a session file is currently open
    #[must_use]
    pub fn is_logging(&self) -> bool {
        self.session.is_some()
    }

    /// Number of sessions started since the process began
    #[must_use]
    pub fn sessions_started(&self) -> u32 {
        self.session_count
    }

    /// Path of the currently open CSV file, if any
    #[must_use]
    pub fn current_csv_path(&self) -> Option<&Path> {
        self.session.as_ref().map(|session| session.writer.path())
    }

    /// Open a new session, rotating out any session already open.
    ///
    /// A session that is still open is first closed with reason `rotate`,
    /// so at most one file is ever open. The new file lands in the current
    /// day directory, which is created if missing. When header emission is
    /// enabled the header row is written and synced before any record.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory, file, header, or transcript
    /// annotation cannot be written.
    pub fn start(
        &mut self,
        reason: &str,
        transcript: &mut Option<TranscriptStream>,
    ) -> Result<()> {
        if self.is_logging() {
            self.stop("rotate", transcript)?;
        }

        let now = Local::now();
        let day = naming::day_dir(Path::new(&self.logging.log_root), now.date_naive());
        fs::create_dir_all(&day)?;

        self.session_count += 1;
        let file_name =
            naming::session_file_name(now.time(), &self.logging.tag, self.session_count);
        let path = day.join(file_name);

        let mut writer = DurableWriter::create(&path, self.logging.sync_every)?;
        if self.logging.write_header {
            writer.write_header(&header_row(
                &self.logging.delimiter,
                self.logging.field_count,
            ))?;
        }

        if let Some(transcript) = transcript.as_mut() {
            transcript.annotate_start(now, reason, &path)?;
        }

        info!("Started CSV session {}: {}", self.session_count, path.display());
        self.session = Some(Session { writer });
        Ok(())
    }

    /// Close the open session, if any.
    ///
    /// The stop annotation is written even when no session is open;
    /// stopping while idle is not an error. The file is synced best-effort
    /// and closed.
    ///
    /// # Errors
    ///
    /// Returns an error if the transcript annotation cannot be written.
    pub fn stop(
        &mut self,
        reason: &str,
        transcript: &mut Option<TranscriptStream>,
    ) -> Result<()> {
        if let Some(transcript) = transcript.as_mut() {
            transcript.annotate_stop(Local::now(), reason)?;
        }

        if let Some(mut session) = self.session.take() {
            if let Err(error) = session.writer.sync() {
                debug!("Sync on session close failed: {}", error);
            }
            info!(
                "Closed CSV session after {} records: {}",
                session.writer.records_written(),
                session.writer.path().display()
            );
        }
        Ok(())
    }

    /// Append a validated record to the open session.
    ///
    /// Silently does nothing while idle; records arriving before a start
    /// marker are an operator or firmware error, not a fault here.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn write_record(&mut self, record: &str) -> Result<()> {
        match self.session.as_mut() {
            Some(session) => session.writer.write_record(record),
            None => Ok(()),
        }
    }
}
