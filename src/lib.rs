//! # RotorRig Logger Library
//!
//! Durable CSV capture of motor test-rig telemetry from a serial console.
//!
//! This library turns the rig firmware's live, noisy text stream into
//! schema-validated CSV records on disk: logical lines are reassembled from
//! arbitrary fragments, `OK LOG 1` / `OK LOG 0` markers rotate session
//! files, accepted records are flushed and synced, and a raw transcript
//! mirrors everything for debugging.

pub mod config;
pub mod error;
pub mod framing;
pub mod processor;
pub mod record;
pub mod serial;
pub mod session;
pub mod transcript;
pub mod writer;
