use std::{path::PathBuf, time::Duration};

use crate::{
    CaptureError, Result, BAUD_RATE, DEADLINE, DEFAULT_OUTPUT, DEFAULT_PORT, SETTLE_DELAY, TIMEOUT,
};

/// Everything one capture session needs to know.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureConfig {
    /// Serial device path (e.g. /dev/ttyUSB0, COM3)
    pub port: String,
    /// CSV file to (over)write
    pub output: PathBuf,
    pub baud_rate: u32,
    /// Upper bound on a single blocking read
    pub read_timeout: Duration,
    /// Pause between opening the port and talking to the device
    pub settle_delay: Duration,
    /// Wall-clock limit for the whole read loop
    pub deadline: Duration,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT.to_string(),
            output: PathBuf::from(DEFAULT_OUTPUT),
            baud_rate: BAUD_RATE,
            read_timeout: TIMEOUT,
            settle_delay: SETTLE_DELAY,
            deadline: DEADLINE,
        }
    }
}

impl CaptureConfig {
    pub fn new(port: &str, output: impl Into<PathBuf>) -> Self {
        Self {
            port: port.to_string(),
            output: output.into(),
            ..Default::default()
        }
    }

    pub fn with_baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }

    pub fn with_read_timeout(mut self, read_timeout: Duration) -> Self {
        self.read_timeout = read_timeout;
        self
    }

    pub fn with_settle_delay(mut self, settle_delay: Duration) -> Self {
        self.settle_delay = settle_delay;
        self
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.baud_rate == 0 {
            return Err(CaptureError::InvalidBaudRate);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CaptureConfig::default();
        assert_eq!(config.baud_rate, 115200);
        assert_eq!(config.output, PathBuf::from("roast_log.csv"));
        assert_eq!(config.read_timeout, Duration::from_secs(1));
        assert_eq!(config.settle_delay, Duration::from_secs(2));
        assert_eq!(config.deadline, Duration::from_secs(300));
    }

    #[test]
    fn test_config_builder() {
        let config = CaptureConfig::new("/dev/ttyACM0", "out.csv")
            .with_baud_rate(9600)
            .with_settle_delay(Duration::ZERO)
            .with_deadline(Duration::from_secs(10));

        assert_eq!(config.port, "/dev/ttyACM0");
        assert_eq!(config.output, PathBuf::from("out.csv"));
        assert_eq!(config.baud_rate, 9600);
        assert_eq!(config.settle_delay, Duration::ZERO);
        assert_eq!(config.deadline, Duration::from_secs(10));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_baud_rejected() {
        let config = CaptureConfig::default().with_baud_rate(0);
        assert!(matches!(
            config.validate(),
            Err(CaptureError::InvalidBaudRate)
        ));
    }
}
