//! # Serial Communication Module
//!
//! Host adapter between the rig's serial console and the logging core.
//!
//! This module handles:
//! - Opening the configured serial port with 8N1 settings
//! - Pumping received fragments into a [`StreamSink`]
//! - Echoing the returned bytes so the operator keeps the live console
//!
//! The pump is generic over `AsyncRead`, so tests drive it with scripted
//! streams instead of hardware.

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio_serial::SerialPortBuilderExt;
use tracing::{debug, info, warn};

use crate::error::{RigLoggerError, Result};
use crate::processor::StreamSink;

/// Size of each serial read in bytes
const READ_BUFFER_SIZE: usize = 4096;

/// Test-rig serial console
///
/// Holds the open port plus the path it was opened from.
pub struct RigSerial {
    /// Serial port handle
    port: tokio_serial::SerialStream,
    /// Device path (e.g., /dev/ttyACM0)
    device_path: String,
}

impl std::fmt::Debug for RigSerial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RigSerial")
            .field("device_path", &self.device_path)
            .finish_non_exhaustive()
    }
}

impl RigSerial {
    /// Open the rig console with standard 8N1 framing.
    ///
    /// # Arguments
    ///
    /// * `path` - Device path (e.g., "/dev/ttyACM0")
    /// * `baud_rate` - Line speed, matching the firmware's setting
    ///
    /// # Returns
    ///
    /// * `Result<RigSerial>` - Opened serial port or error
    ///
    /// # Errors
    ///
    /// Returns error if the device cannot be opened
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use rotorrig_logger::serial::RigSerial;
    ///
    /// fn main() -> anyhow::Result<()> {
    ///     let serial = RigSerial::open("/dev/ttyACM0", 115200)?;
    ///     println!("Connected to: {}", serial.device_path());
    ///     Ok(())
    /// }
    /// ```
    pub fn open(path: &str, baud_rate: u32) -> Result<Self> {
        debug!("Trying to open serial port: {}", path);

        let port = tokio_serial::new(path, baud_rate)
            .data_bits(tokio_serial::DataBits::Eight)
            .parity(tokio_serial::Parity::None)
            .stop_bits(tokio_serial::StopBits::One)
            .flow_control(tokio_serial::FlowControl::None)
            .open_native_async()
            .map_err(|e| RigLoggerError::Serial(format!("Failed to open {}: {}", path, e)))?;

        info!("Opened rig console at {} ({} baud)", path, baud_rate);
        Ok(Self {
            port,
            device_path: path.to_string(),
        })
    }

    /// Get the device path of the opened serial port
    pub fn device_path(&self) -> &str {
        &self.device_path
    }

    /// Consume the handle, yielding the underlying async stream
    #[must_use]
    pub fn into_stream(self) -> tokio_serial::SerialStream {
        self.port
    }
}

/// Pump fragments from `reader` into `sink`, echoing to `echo`.
///
/// Runs until the reader reports EOF. Each fragment is handed to the sink
/// exactly as read; whatever the sink returns is echoed. Echo failures are
/// logged and skipped so a blocked console never stalls logging; read and
/// sink failures end the pump.
///
/// # Errors
///
/// Returns an error if reading fails or the sink reports one.
pub async fn pump<R, S, W>(reader: &mut R, sink: &mut S, echo: &mut W) -> Result<()>
where
    R: AsyncRead + Unpin,
    S: StreamSink,
    W: AsyncWrite + Unpin,
{
    let mut buf = [0u8; READ_BUFFER_SIZE];

    loop {
        let n = reader.read(&mut buf).await?;
        if n == 0 {
            debug!("Serial stream reached EOF");
            return Ok(());
        }

        let echoed = sink.on_data(&buf[..n])?;
        if let Err(error) = echo.write_all(echoed).await {
            warn!("Echo write failed: {}", error);
        } else if let Err(error) = echo.flush().await {
            warn!("Echo flush failed: {}", error);
        }
    }
}
