//! # Record Validation Module
//!
//! Token-by-token validation of candidate CSV lines against the rig schema.
//!
//! This module handles:
//! - Integer token checks (optional sign, decimal digits)
//! - Float token checks (decimal and scientific forms, `nan`/`inf` family)
//! - The `NA` placeholder accepted in measurement columns
//! - Whole-record acceptance: field count plus per-position token checks

use crate::framing::strip_line_noise;
use crate::record::schema::{column_kind, ColumnKind};

/// Check whether a token is a well-formed integer.
///
/// The token is trimmed first. An optional single leading `+` or `-` is
/// allowed; everything after it must be one or more ASCII digits.
#[must_use]
pub fn is_int_token(token: &str) -> bool {
    let trimmed = token.trim();
    let digits = trimmed
        .strip_prefix(['+', '-'])
        .unwrap_or(trimmed);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Check whether a token is a well-formed float or one of the special
/// floating-point words.
///
/// Accepted forms, after trimming and an optional single leading sign:
/// - Decimal: digits, `digits.`, `digits.digits`, `.digits`
/// - Scientific: any decimal form followed by `e`/`E`, an optional sign,
///   and one or more digits
/// - Special words: `nan`, `inf`, `infinity` in any letter case
///
/// A lone `.` or a bare sign is not a number, and neither is a valid
/// number followed by trailing junk.
#[must_use]
pub fn is_float_token(token: &str) -> bool {
    let trimmed = token.trim();
    is_decimal_form(trimmed) || is_special_float(trimmed)
}

fn is_special_float(token: &str) -> bool {
    let body = token.strip_prefix(['+', '-']).unwrap_or(token);
    body.eq_ignore_ascii_case("nan")
        || body.eq_ignore_ascii_case("inf")
        || body.eq_ignore_ascii_case("infinity")
}

/// Scan a trimmed token against the decimal/scientific float grammar.
///
/// The whole token must be consumed; any leftover byte rejects it.
fn is_decimal_form(token: &str) -> bool {
    let bytes = token.as_bytes();
    let mut i = 0;

    if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
        i += 1;
    }

    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let int_digits = i - int_start;

    let mut frac_digits = 0;
    let mut saw_dot = false;
    if i < bytes.len() && bytes[i] == b'.' {
        saw_dot = true;
        i += 1;
        let frac_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        frac_digits = i - frac_start;
    }

    // The mantissa needs digits on at least one side of the dot.
    let mantissa_ok = int_digits > 0 || (saw_dot && frac_digits > 0);
    if !mantissa_ok {
        return false;
    }

    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        i += 1;
        if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
            i += 1;
        }
        let exp_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == exp_start {
            return false;
        }
    }

    i == bytes.len()
}

/// Check one trimmed token against the rules for a column kind.
fn token_matches(kind: ColumnKind, token: &str) -> bool {
    match kind {
        ColumnKind::Integer => is_int_token(token),
        ColumnKind::FloatOrSpecial => {
            token.eq_ignore_ascii_case("na") || is_float_token(token)
        }
        ColumnKind::NonEmptyString => !token.is_empty(),
    }
}

/// Decide whether a logical line is a valid data record.
///
/// The line is first freed of monitor decoration (see
/// [`strip_line_noise`](crate::framing::strip_line_noise)) and trimmed, so
/// callers may pass either a raw console line or one already stripped. It
/// is then split on `delimiter`, each field trimmed, and every field
/// checked against the column rules for its position.
///
/// A line is a record only when all hold:
/// - It is non-empty after stripping and trimming
/// - Splitting yields exactly `field_count` fields
/// - Every field satisfies its positional rule
///
/// # Examples
///
/// ```
/// use rotorrig_logger::record::validate::is_valid_record;
///
/// let line = "1000,run1,m1,2300,5x4,3,blheli32,7,0,50.0,2.0,1,\
///             11000,1571,15.9,12.3,195.6,4.41,449.7,2.30,0.0225,36.6,0.0,ok";
/// assert!(is_valid_record(line, ",", 24));
/// assert!(!is_valid_record("OK LOG 1", ",", 24));
/// ```
#[must_use]
pub fn is_valid_record(line: &str, delimiter: &str, field_count: usize) -> bool {
    let candidate = strip_line_noise(line).trim();
    if candidate.is_empty() {
        return false;
    }

    let fields: Vec<&str> = candidate.split(delimiter).map(str::trim).collect();
    if fields.len() != field_count {
        return false;
    }

    fields
        .iter()
        .enumerate()
        .all(|(index, field)| token_matches(column_kind(index), field))
}
