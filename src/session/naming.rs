//! # Session Naming Module
//!
//! Pure helpers that map a wall-clock instant, an optional operator tag,
//! and a session sequence number onto the on-disk layout:
//!
//! ```text
//! <log_root>/<YYYY-MM-DD>/<HHMMSS>[_<tag>]_s<NNN>.csv
//! <log_root>/<YYYY-MM-DD>/<HHMMSS>_raw.txt
//! ```

use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveTime, Timelike};

/// Directory holding all sessions started on `date`.
#[must_use]
pub fn day_dir(log_root: &Path, date: NaiveDate) -> PathBuf {
    log_root.join(date.format("%Y-%m-%d").to_string())
}

/// File name for the CSV of session number `seq` started at `time`.
///
/// The sequence number is zero-padded to three digits so names sort in
/// start order. An empty tag is omitted along with its separator.
///
/// # Examples
///
/// ```
/// use chrono::NaiveTime;
/// use rotorrig_logger::session::naming::session_file_name;
///
/// let time = NaiveTime::from_hms_opt(17, 18, 12).unwrap();
/// assert_eq!(session_file_name(time, "", 1), "171812_s001.csv");
/// assert_eq!(session_file_name(time, "kv2300", 2), "171812_kv2300_s002.csv");
/// ```
#[must_use]
pub fn session_file_name(time: NaiveTime, tag: &str, seq: u32) -> String {
    let stamp = clock_stamp(time);
    if tag.is_empty() {
        format!("{}_s{:03}.csv", stamp, seq)
    } else {
        format!("{}_{}_s{:03}.csv", stamp, tag, seq)
    }
}

/// File name for the raw transcript opened at `time`.
#[must_use]
pub fn transcript_file_name(time: NaiveTime) -> String {
    format!("{}_raw.txt", clock_stamp(time))
}

fn clock_stamp(time: NaiveTime) -> String {
    format!(
        "{:02}{:02}{:02}",
        time.hour(),
        time.minute(),
        time.second()
    )
}
