//! # RotorRig Logger
//!
//! Capture motor test-rig telemetry from a serial console into durable,
//! session-rotated CSV files.
//!
//! The firmware brackets each test with `OK LOG 1` / `OK LOG 0` markers;
//! this application follows those markers, validating every candidate line
//! against the rig's 24-column schema and mirroring the raw stream to a
//! transcript, while echoing everything to stdout so the operator keeps a
//! live console.

use anyhow::Result;
use tracing::info;
use tracing_subscriber;

use rotorrig_logger::config::Config;
use rotorrig_logger::processor::{StreamProcessor, StreamSink};
use rotorrig_logger::serial::{pump, RigSerial};

/// Main entry point for the RotorRig logger
///
/// # Control Flow
///
/// 1. **Initialization**
///    - Set up logging with tracing subscriber
///    - Load configuration from the first CLI argument, or use defaults
///    - Open the rig's serial console
///    - Build the stream processor (opens the raw transcript)
///
/// 2. **Main Loop**
///    - Pump serial fragments into the processor
///    - Echo every fragment to stdout, validated or not
///    - Rotate CSV session files as markers arrive
///
/// 3. **Graceful Shutdown**
///    - Ctrl+C (or serial EOF) stops the pump
///    - Any open session is closed with reason `shutdown`
///    - The transcript is flushed and closed
///
/// # Errors
///
/// Returns error if:
/// - Configuration cannot be loaded or fails validation
/// - The serial port cannot be opened
/// - Session file I/O fails mid-stream
#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into())
        )
        .init();

    info!("RotorRig logger v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = match std::env::args().nth(1) {
        Some(path) => {
            info!("Loading configuration from {}", path);
            Config::load(&path)?
        }
        None => Config::default(),
    };

    let serial = RigSerial::open(&config.serial.port, config.serial.baud_rate)?;
    info!("Rig console opened at: {}", serial.device_path());

    let mut processor = StreamProcessor::new(config.logging)?;
    let mut stream = serial.into_stream();
    let mut stdout = tokio::io::stdout();

    info!("Press Ctrl+C to exit");

    tokio::select! {
        result = pump(&mut stream, &mut processor, &mut stdout) => {
            result?;
            info!("Serial stream ended");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down...");
        }
    }

    processor.shutdown()?;
    info!("Sessions recorded: {}", processor.sessions_started());

    Ok(())
}
