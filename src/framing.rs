//! # Line Framing Module
//!
//! Turns the rig console's arbitrary byte fragments into logical lines and
//! strips the serial-monitor decoration that precedes them.
//!
//! This module handles:
//! - Reassembling fragments into `\n`-terminated lines (partial tails
//!   persist across calls, trailing `\r` is removed)
//! - Stripping the `HH:MM:SS.mmm > ` monitor timestamp prefix
//! - Stripping an echoed `> ` prompt
//! - Guarding the buffer against terminator-free input floods

use bytes::BytesMut;
use tracing::warn;

/// Reassembles an unbounded stream of raw fragments into logical lines.
///
/// Fragments arrive with no guaranteed alignment to line boundaries: a line
/// may span several fragments and one fragment may carry several lines.
/// `push` ingests a fragment; `next_line` drains complete lines in arrival
/// order, leaving the unterminated remainder buffered for the next fragment.
///
/// # Examples
///
/// ```
/// use rotorrig_logger::framing::LineReassembler;
///
/// let mut reassembler = LineReassembler::new(65536);
/// reassembler.push(b"12,run");
/// assert_eq!(reassembler.next_line(), None);
///
/// reassembler.push(b"1,m1\n");
/// assert_eq!(reassembler.next_line(), Some("12,run1,m1".to_string()));
/// assert_eq!(reassembler.next_line(), None);
/// ```
#[derive(Debug)]
pub struct LineReassembler {
    buf: BytesMut,
    max_line_bytes: usize,
    discarding: bool,
}

impl LineReassembler {
    /// Create a reassembler whose unterminated remainder may grow to at most
    /// `max_line_bytes` before being discarded.
    #[must_use]
    pub fn new(max_line_bytes: usize) -> Self {
        Self {
            buf: BytesMut::new(),
            max_line_bytes: max_line_bytes.max(1),
            discarding: false,
        }
    }

    /// Append a raw fragment to the buffer.
    ///
    /// Zero-length fragments are accepted and have no effect.
    pub fn push(&mut self, fragment: &[u8]) {
        self.buf.extend_from_slice(fragment);
    }

    /// Extract the next complete logical line, if one is buffered.
    ///
    /// The returned line excludes its `\n` terminator and any trailing `\r`.
    /// Bytes that are not valid UTF-8 are replaced rather than dropped, so a
    /// burst of serial corruption cannot shift later line boundaries.
    ///
    /// Returns `None` once only an unterminated remainder is left; that
    /// remainder is kept for subsequent `push` calls. If the remainder
    /// outgrows the configured maximum it is discarded and input is skipped
    /// until the next terminator, so one terminator-free flood cannot pin
    /// unbounded memory.
    pub fn next_line(&mut self) -> Option<String> {
        loop {
            match self.buf.iter().position(|&b| b == b'\n') {
                Some(pos) => {
                    let mut line = self.buf.split_to(pos + 1);
                    line.truncate(pos);

                    if self.discarding {
                        // Tail of an oversized pseudo-line; drop it and resume.
                        self.discarding = false;
                        continue;
                    }

                    while line.last() == Some(&b'\r') {
                        line.truncate(line.len() - 1);
                    }

                    return Some(String::from_utf8_lossy(&line).into_owned());
                }
                None => {
                    if self.discarding {
                        self.buf.clear();
                    } else if self.buf.len() > self.max_line_bytes {
                        warn!(
                            "Discarding {} buffered bytes without a line terminator (cap {})",
                            self.buf.len(),
                            self.max_line_bytes
                        );
                        self.buf.clear();
                        self.discarding = true;
                    }
                    return None;
                }
            }
        }
    }

    /// Number of buffered bytes still waiting for a terminator
    #[must_use]
    pub fn pending_bytes(&self) -> usize {
        self.buf.len()
    }
}

/// Strip recognized line-noise prefixes from a console line.
///
/// Two decorations are removed, in order:
///
/// 1. A serial-monitor time prefix of the exact shape `HH:MM:SS.mmm`
///    followed by optional whitespace, `>`, and optional whitespace.
/// 2. A single leading `>` prompt echo with any whitespace after it.
///
/// A line carrying neither form is returned unchanged, so stripping an
/// already-stripped line is a no-op.
///
/// # Examples
///
/// ```
/// use rotorrig_logger::framing::strip_line_noise;
///
/// assert_eq!(strip_line_noise("17:18:12.035 > 1000,run1"), "1000,run1");
/// assert_eq!(strip_line_noise("> OK LOG 1"), "OK LOG 1");
/// assert_eq!(strip_line_noise("1000,run1"), "1000,run1");
/// ```
#[must_use]
pub fn strip_line_noise(line: &str) -> &str {
    let rest = strip_timestamp_prefix(line);
    match rest.strip_prefix('>') {
        Some(after_prompt) => after_prompt.trim_start(),
        None => rest,
    }
}

/// Strip the `HH:MM:SS.mmm > ` monitor time prefix, if present.
///
/// The clock field must match exactly (two digits, `:`, two digits, `:`,
/// two digits, `.`, three digits) and must be followed by a `>` for the
/// prefix to be recognized; a bare clock reading is left alone.
fn strip_timestamp_prefix(line: &str) -> &str {
    let bytes = line.as_bytes();
    if bytes.len() < 12 {
        return line;
    }

    let digit = |i: usize| bytes[i].is_ascii_digit();
    let clock_shape = digit(0)
        && digit(1)
        && bytes[2] == b':'
        && digit(3)
        && digit(4)
        && bytes[5] == b':'
        && digit(6)
        && digit(7)
        && bytes[8] == b'.'
        && digit(9)
        && digit(10)
        && digit(11);
    if !clock_shape {
        return line;
    }

    let mut i = 12;
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    if i >= bytes.len() || bytes[i] != b'>' {
        return line;
    }
    i += 1;
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }

    &line[i..]
}
