//! # Stream Processor Module
//!
//! Composition root tying the pipeline together: raw fragments in, durable
//! CSV records and a raw transcript out, the original bytes echoed back.
//!
//! This module handles:
//! - Mirroring every fragment to the transcript before any interpretation
//! - Driving the line reassembler
//! - Dispatching marker lines to the session rotator
//! - Validating candidate records and writing accepted ones
//! - The [`StreamSink`] capability trait hosts drive the core through

use std::fs;
use std::path::Path;

use chrono::Local;
use tracing::{debug, info};

use crate::config::LoggingConfig;
use crate::error::Result;
use crate::framing::{strip_line_noise, LineReassembler};
use crate::record::validate::is_valid_record;
use crate::session::naming;
use crate::session::{SessionRotator, LOG_START_MARKER, LOG_STOP_MARKER};
use crate::transcript::TranscriptStream;

/// Capability surface a transport host needs from the logging core.
///
/// `on_data` hands over one received fragment and gets the same bytes back
/// for echoing; all logging happens as a side effect. `shutdown` closes any
/// open session and the transcript. Hosts must serialize calls; the core
/// holds no locks.
pub trait StreamSink {
    /// Process one raw fragment, returning it unchanged for the live echo.
    ///
    /// # Errors
    ///
    /// Returns an error when session file I/O fails.
    fn on_data<'a>(&mut self, fragment: &'a [u8]) -> Result<&'a [u8]>;

    /// Flush and close all outputs; the sink stays usable but idle.
    ///
    /// # Errors
    ///
    /// Returns an error when closing writes fail.
    fn shutdown(&mut self) -> Result<()>;
}

/// The logging core: reassembler, rotator, and optional transcript.
#[derive(Debug)]
pub struct StreamProcessor {
    logging: LoggingConfig,
    reassembler: LineReassembler,
    rotator: SessionRotator,
    transcript: Option<TranscriptStream>,
}

impl StreamProcessor {
    /// Build the core from resolved logging configuration.
    ///
    /// When the raw mirror is enabled this creates the day directory and
    /// opens the transcript file immediately, so even pre-session chatter
    /// is captured.
    ///
    /// # Errors
    ///
    /// Returns an error if the transcript directory or file cannot be
    /// created.
    pub fn new(logging: LoggingConfig) -> Result<Self> {
        let transcript = if logging.write_raw {
            let now = Local::now();
            let day = naming::day_dir(Path::new(&logging.log_root), now.date_naive());
            fs::create_dir_all(&day)?;
            let path = day.join(naming::transcript_file_name(now.time()));
            let transcript = TranscriptStream::open(&path)?;
            info!("Mirroring raw stream to {}", path.display());
            Some(transcript)
        } else {
            None
        };

        Ok(Self {
            reassembler: LineReassembler::new(logging.max_line_bytes),
            rotator: SessionRotator::new(logging.clone()),
            logging,
            transcript,
        })
    }

    /// Whether a CSV session is currently open
    #[must_use]
    pub fn is_logging(&self) -> bool {
        self.rotator.is_logging()
    }

    /// Number of CSV sessions opened so far
    #[must_use]
    pub fn sessions_started(&self) -> u32 {
        self.rotator.sessions_started()
    }

    /// Path of the open CSV file, if any
    #[must_use]
    pub fn current_csv_path(&self) -> Option<&Path> {
        self.rotator.current_csv_path()
    }

    /// Path of the transcript file, if the raw mirror is enabled
    #[must_use]
    pub fn transcript_path(&self) -> Option<&Path> {
        self.transcript.as_ref().map(TranscriptStream::path)
    }

    /// Route one complete logical line.
    fn handle_line(&mut self, line: &str) -> Result<()> {
        let stripped = strip_line_noise(line).trim();

        if stripped == LOG_START_MARKER {
            return self.rotator.start("rx:OK LOG 1", &mut self.transcript);
        }
        if stripped == LOG_STOP_MARKER {
            return self.rotator.stop("rx:OK LOG 0", &mut self.transcript);
        }

        if is_valid_record(line, &self.logging.delimiter, self.logging.field_count) {
            self.rotator.write_record(stripped)
        } else {
            if !stripped.is_empty() {
                debug!("Dropped non-record line: {}", stripped);
            }
            Ok(())
        }
    }
}

impl StreamSink for StreamProcessor {
    fn on_data<'a>(&mut self, fragment: &'a [u8]) -> Result<&'a [u8]> {
        if let Some(transcript) = self.transcript.as_mut() {
            transcript.mirror(fragment)?;
        }

        self.reassembler.push(fragment);
        while let Some(line) = self.reassembler.next_line() {
            self.handle_line(&line)?;
        }

        Ok(fragment)
    }

    fn shutdown(&mut self) -> Result<()> {
        if self.rotator.is_logging() {
            self.rotator.stop("shutdown", &mut self.transcript)?;
        }
        if let Some(mut transcript) = self.transcript.take() {
            let _ = transcript.sync();
        }
        info!("Stream processor shut down");
        Ok(())
    }
}
