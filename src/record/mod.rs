//! # Telemetry Record Module
//!
//! The fixed column contract of the RotorRig console and the validator that
//! decides whether a logical line is a genuine telemetry record.
//!
//! This module handles:
//! - The 24-column schema (names and per-column token kinds)
//! - Header row construction (schema names, or synthetic placeholders)
//! - Token-by-token record validation with explicit scanners

pub mod schema;
pub mod validate;
