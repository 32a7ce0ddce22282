//! # Column Schema
//!
//! The fixed column contract of RotorRig telemetry frames.
//!
//! The firmware prints one 24-column CSV frame per sample. The schema is an
//! ordered, immutable (name, kind) table known at compile time; validation
//! and header emission both derive from it.

/// Token kind a column must satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Optional sign followed by one or more ASCII digits, nothing else
    Integer,

    /// Signed decimal (optional fraction/exponent), or a signed
    /// `nan`/`inf`/`infinity` literal, or `NA` (all case-insensitive)
    FloatOrSpecial,

    /// Any content except the empty string after trimming
    NonEmptyString,
}

/// One column of the telemetry schema
#[derive(Debug, Clone, Copy)]
pub struct Column {
    /// Header name as printed by the firmware
    pub name: &'static str,
    /// Token kind the column must satisfy
    pub kind: ColumnKind,
}

/// The RotorRig frame schema: 24 columns, fixed order.
pub const SCHEMA_COLUMNS: [Column; 24] = [
    Column { name: "t_ms", kind: ColumnKind::Integer },
    Column { name: "test_id", kind: ColumnKind::NonEmptyString },
    Column { name: "motor_id", kind: ColumnKind::NonEmptyString },
    Column { name: "kv", kind: ColumnKind::Integer },
    Column { name: "prop", kind: ColumnKind::NonEmptyString },
    Column { name: "battery_s", kind: ColumnKind::Integer },
    Column { name: "esc_fw", kind: ColumnKind::NonEmptyString },
    Column { name: "pole_pairs", kind: ColumnKind::Integer },
    Column { name: "step_id", kind: ColumnKind::Integer },
    Column { name: "throttle_pct", kind: ColumnKind::FloatOrSpecial },
    Column { name: "step_time_s", kind: ColumnKind::FloatOrSpecial },
    Column { name: "is_steady", kind: ColumnKind::Integer },
    Column { name: "eRPM", kind: ColumnKind::Integer },
    Column { name: "RPM", kind: ColumnKind::Integer },
    Column { name: "V_bus_V", kind: ColumnKind::FloatOrSpecial },
    Column { name: "I_A", kind: ColumnKind::FloatOrSpecial },
    Column { name: "P_in_W", kind: ColumnKind::FloatOrSpecial },
    Column { name: "thrust_N", kind: ColumnKind::FloatOrSpecial },
    Column { name: "thrust_g", kind: ColumnKind::FloatOrSpecial },
    Column { name: "eff_g_per_W", kind: ColumnKind::FloatOrSpecial },
    Column { name: "eff_N_per_W", kind: ColumnKind::FloatOrSpecial },
    Column { name: "eff_g_per_A", kind: ColumnKind::FloatOrSpecial },
    Column { name: "bdshot_err_pct", kind: ColumnKind::FloatOrSpecial },
    Column { name: "notes", kind: ColumnKind::NonEmptyString },
];

/// Number of columns in the schema (and the default expected field count)
pub const SCHEMA_COLUMN_COUNT: usize = SCHEMA_COLUMNS.len();

/// Kind rule for a column position.
///
/// Positions beyond the schema (possible only when the configured field
/// count exceeds the schema length) fall back to [`ColumnKind::NonEmptyString`].
#[must_use]
pub fn column_kind(index: usize) -> ColumnKind {
    SCHEMA_COLUMNS
        .get(index)
        .map(|column| column.kind)
        .unwrap_or(ColumnKind::NonEmptyString)
}

/// Build the header row for a session file.
///
/// When `field_count` matches the schema length this joins the declared
/// column names with `delimiter`; otherwise it emits synthetic `col0..colN-1`
/// placeholders so the file still starts with a well-formed header.
///
/// # Examples
///
/// ```
/// use rotorrig_logger::record::schema::header_row;
///
/// let header = header_row(",", 24);
/// assert!(header.starts_with("t_ms,test_id,motor_id,"));
/// assert!(header.ends_with(",bdshot_err_pct,notes"));
///
/// assert_eq!(header_row(",", 3), "col0,col1,col2");
/// ```
#[must_use]
pub fn header_row(delimiter: &str, field_count: usize) -> String {
    if field_count == SCHEMA_COLUMN_COUNT {
        SCHEMA_COLUMNS
            .iter()
            .map(|column| column.name)
            .collect::<Vec<_>>()
            .join(delimiter)
    } else {
        (0..field_count)
            .map(|i| format!("col{}", i))
            .collect::<Vec<_>>()
            .join(delimiter)
    }
}
