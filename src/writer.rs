//! # Durable Writer Module
//!
//! Append-only CSV file writer with an explicit durability policy.
//!
//! This module handles:
//! - Appending one record per line to the session file
//! - Flushing every write to the OS
//! - Forcing a storage sync on a configurable record cadence
//! - Immediate sync after the header row
//!
//! Write and flush failures propagate to the caller; sync failures are
//! surfaced as a `Result` that call sites deliberately discard, keeping the
//! best-effort policy visible where it applies.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Decide whether a forced sync is due after `records` accepted records.
///
/// With cadence `n`, syncs land on the nth accepted record, the 2nth, and
/// so on. Cadence 0 behaves as 1.
#[must_use]
pub fn sync_due(records: u64, cadence: u64) -> bool {
    records % cadence.max(1) == 0
}

/// Append-only writer for one session's CSV file.
///
/// Every record is written followed by a line terminator and flushed to the
/// OS. Every `sync_every`th record additionally forces persistence to
/// storage. The file handle closes when the writer is dropped.
#[derive(Debug)]
pub struct DurableWriter {
    file: File,
    path: PathBuf,
    sync_every: u64,
    records_written: u64,
}

impl DurableWriter {
    /// Create (or reopen for append) the file at `path`.
    ///
    /// A `sync_every` of 0 is treated as 1.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or opened.
    pub fn create(path: &Path, sync_every: u64) -> Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file,
            path: path.to_path_buf(),
            sync_every: sync_every.max(1),
            records_written: 0,
        })
    }

    /// Write the header row, flush, and sync immediately.
    ///
    /// The header does not count toward the record cadence.
    ///
    /// # Errors
    ///
    /// Returns an error if the write or flush fails. A failed sync is
    /// ignored.
    pub fn write_header(&mut self, header: &str) -> Result<()> {
        self.file.write_all(header.as_bytes())?;
        self.file.write_all(b"\n")?;
        self.file.flush()?;
        let _ = self.sync();
        Ok(())
    }

    /// Append one record line, flush, and sync if the cadence is due.
    ///
    /// # Errors
    ///
    /// Returns an error if the write or flush fails. A failed sync is
    /// ignored.
    pub fn write_record(&mut self, record: &str) -> Result<()> {
        self.file.write_all(record.as_bytes())?;
        self.file.write_all(b"\n")?;
        self.file.flush()?;

        self.records_written += 1;
        if sync_due(self.records_written, self.sync_every) {
            let _ = self.sync();
        }
        Ok(())
    }

    /// Force persistence of file contents and metadata to storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying sync fails. Callers on the record
    /// path discard it; shutdown paths may inspect it.
    pub fn sync(&mut self) -> Result<()> {
        self.file.sync_all()?;
        Ok(())
    }

    /// Path of the file being written
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of records appended so far (header excluded)
    #[must_use]
    pub fn records_written(&self) -> u64 {
        self.records_written
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_sync_due_cadence_one() {
        assert!(sync_due(1, 1));
        assert!(sync_due(2, 1));
        assert!(sync_due(3, 1));
    }

    #[test]
    fn test_sync_due_cadence_five() {
        assert!(!sync_due(1, 5));
        assert!(!sync_due(4, 5));
        assert!(sync_due(5, 5));
        assert!(!sync_due(6, 5));
        assert!(sync_due(10, 5));
    }

    #[test]
    fn test_sync_due_zero_cadence_treated_as_one() {
        assert!(sync_due(1, 0));
        assert!(sync_due(7, 0));
    }

    #[test]
    fn test_create_writes_new_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.csv");

        let mut writer = DurableWriter::create(&path, 1).unwrap();
        writer.write_record("1,2,3").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "1,2,3\n");
        assert_eq!(writer.path(), path.as_path());
    }

    #[test]
    fn test_header_then_records() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.csv");

        let mut writer = DurableWriter::create(&path, 1).unwrap();
        writer.write_header("a,b,c").unwrap();
        writer.write_record("1,2,3").unwrap();
        writer.write_record("4,5,6").unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "a,b,c\n1,2,3\n4,5,6\n"
        );
    }

    #[test]
    fn test_header_not_counted_as_record() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.csv");

        let mut writer = DurableWriter::create(&path, 3).unwrap();
        writer.write_header("a,b,c").unwrap();
        assert_eq!(writer.records_written(), 0);

        writer.write_record("1,2,3").unwrap();
        assert_eq!(writer.records_written(), 1);
    }

    #[test]
    fn test_create_appends_to_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.csv");
        fs::write(&path, "existing\n").unwrap();

        let mut writer = DurableWriter::create(&path, 1).unwrap();
        writer.write_record("new").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "existing\nnew\n");
    }

    #[test]
    fn test_create_fails_for_missing_directory() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent").join("session.csv");

        assert!(DurableWriter::create(&path, 1).is_err());
    }

    #[test]
    fn test_contents_visible_after_drop() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.csv");

        {
            let mut writer = DurableWriter::create(&path, 10).unwrap();
            writer.write_record("only").unwrap();
        }

        assert_eq!(fs::read_to_string(&path).unwrap(), "only\n");
    }
}
