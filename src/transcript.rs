//! # Transcript Module
//!
//! Unfiltered mirror of everything received from the rig.
//!
//! The transcript is a single append-only text file opened at startup and
//! held for the process lifetime, independent of CSV session rotation. It
//! receives:
//! - Every raw fragment, byte for byte, before any line processing
//! - `### START_CSV` / `### STOP_CSV` annotations marking session changes
//!
//! Fragment writes propagate errors; flush and sync after each write are
//! best-effort so a slow or failing disk cannot stall the live stream.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::error::Result;

/// Timestamp format used in session annotations, local time to the second.
const ANNOTATION_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Append-only raw mirror of the serial stream.
#[derive(Debug)]
pub struct TranscriptStream {
    file: File,
    path: PathBuf,
}

impl TranscriptStream {
    /// Open (or reopen for append) the transcript file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or opened.
    pub fn open(path: &Path) -> Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }

    /// Mirror one raw fragment exactly as received.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails. The follow-up flush and sync
    /// are ignored.
    pub fn mirror(&mut self, fragment: &[u8]) -> Result<()> {
        self.file.write_all(fragment)?;
        let _ = self.sync();
        Ok(())
    }

    /// Annotate the start of a CSV session.
    ///
    /// The annotation opens with a blank line so it stands clear of any
    /// unterminated fragment above it.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn annotate_start(
        &mut self,
        now: DateTime<Local>,
        reason: &str,
        csv_path: &Path,
    ) -> Result<()> {
        let line = format!(
            "\n### START_CSV {} reason={} file={}\n",
            now.format(ANNOTATION_TIME_FORMAT),
            reason,
            csv_path.display()
        );
        self.file.write_all(line.as_bytes())?;
        let _ = self.sync();
        Ok(())
    }

    /// Annotate the end of a CSV session.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn annotate_stop(&mut self, now: DateTime<Local>, reason: &str) -> Result<()> {
        let line = format!(
            "### STOP_CSV  {} reason={}\n",
            now.format(ANNOTATION_TIME_FORMAT),
            reason
        );
        self.file.write_all(line.as_bytes())?;
        let _ = self.sync();
        Ok(())
    }

    /// Flush buffered bytes and force persistence to storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the flush or sync fails. Fragment and annotation
    /// paths discard it.
    pub fn sync(&mut self) -> Result<()> {
        self.file.flush()?;
        self.file.sync_all()?;
        Ok(())
    }

    /// Path of the transcript file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::fs;
    use tempfile::tempdir;

    fn local_time(h: u32, m: u32, s: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 7, h, m, s).unwrap()
    }

    #[test]
    fn test_mirror_preserves_bytes_exactly() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("raw.txt");

        let mut transcript = TranscriptStream::open(&path).unwrap();
        transcript.mirror(b"partial,frag").unwrap();
        transcript.mirror(b"ment\r\nwith\xffnoise\n").unwrap();

        let written = fs::read(&path).unwrap();
        assert_eq!(written, b"partial,fragment\r\nwith\xffnoise\n");
    }

    #[test]
    fn test_start_annotation_shape() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("raw.txt");

        let mut transcript = TranscriptStream::open(&path).unwrap();
        transcript
            .annotate_start(
                local_time(17, 18, 12),
                "rx:OK LOG 1",
                Path::new("/logs/2024-03-07/171812_s001.csv"),
            )
            .unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "\n### START_CSV 2024-03-07T17:18:12 reason=rx:OK LOG 1 \
             file=/logs/2024-03-07/171812_s001.csv\n"
        );
    }

    #[test]
    fn test_stop_annotation_shape() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("raw.txt");

        let mut transcript = TranscriptStream::open(&path).unwrap();
        transcript
            .annotate_stop(local_time(17, 20, 0), "rx:OK LOG 0")
            .unwrap();

        // Double space after STOP_CSV keeps the timestamp column aligned
        // with START_CSV entries.
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "### STOP_CSV  2024-03-07T17:20:00 reason=rx:OK LOG 0\n"
        );
    }

    #[test]
    fn test_annotations_interleave_with_fragments() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("raw.txt");

        let mut transcript = TranscriptStream::open(&path).unwrap();
        transcript.mirror(b"chatter\n").unwrap();
        transcript
            .annotate_start(local_time(9, 0, 0), "rx:OK LOG 1", Path::new("a.csv"))
            .unwrap();
        transcript.mirror(b"1,2,3\n").unwrap();
        transcript
            .annotate_stop(local_time(9, 1, 0), "rx:OK LOG 0")
            .unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(
            written,
            "chatter\n\
             \n### START_CSV 2024-03-07T09:00:00 reason=rx:OK LOG 1 file=a.csv\n\
             1,2,3\n\
             ### STOP_CSV  2024-03-07T09:01:00 reason=rx:OK LOG 0\n"
        );
    }

    #[test]
    fn test_open_appends_to_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("raw.txt");
        fs::write(&path, "earlier\n").unwrap();

        let mut transcript = TranscriptStream::open(&path).unwrap();
        transcript.mirror(b"later\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "earlier\nlater\n");
    }
}
