//! Pull the CSV log out of a roast meter over its serial console.
//!
//! The device answers `LOG DUMP` with a block of CSV lines framed by
//! [`BEGIN_MARKER`] and [`END_MARKER`]. [`capture_log`] opens the port,
//! sends the command, collects everything between the markers and saves
//! it to a file.

pub mod capture;
pub mod config;
pub mod error;
pub mod reader;
pub mod recorder;

use std::time::Duration;

pub use capture::{capture, capture_log, open_port, write_output, CaptureOutcome, Connection};
pub use config::CaptureConfig;
pub use error::{CaptureError, Result};
pub use reader::{decode_lossy, SerialLineReader};
pub use recorder::{CsvRecorder, RecorderState};

pub const BAUD_RATE: u32 = 115200;
pub const TIMEOUT: Duration = Duration::from_secs(1);
/// Boards that reset when the port opens need this long before they listen.
pub const SETTLE_DELAY: Duration = Duration::from_secs(2);
pub const DEADLINE: Duration = Duration::from_secs(300);

pub const COMMAND: &[u8] = b"LOG DUMP\n";
pub const BEGIN_MARKER: &str = "--- BEGIN CSV ---";
pub const END_MARKER: &str = "--- END CSV ---";

pub const DEFAULT_OUTPUT: &str = "roast_log.csv";
#[cfg(windows)]
pub const DEFAULT_PORT: &str = "COM3";
#[cfg(not(windows))]
pub const DEFAULT_PORT: &str = "/dev/ttyUSB0";

/// Log a progress line every this many collected rows.
pub const PROGRESS_INTERVAL: usize = 1000;
