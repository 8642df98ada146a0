//! One capture session: connect, ask for the log, collect, save.

use std::{
    fmt, fs,
    io::{self, Read, Write},
    path::{Path, PathBuf},
    thread,
    time::Instant,
};

use log::{info, warn};
use serialport::{ClearBuffer, SerialPort};

use crate::{
    CaptureConfig, CaptureError, CsvRecorder, Result, SerialLineReader, COMMAND, END_MARKER,
    PROGRESS_INTERVAL,
};

/// A duplex byte channel to the device.
pub trait Connection: Read + Write {
    /// Throw away anything the device sent before we asked.
    fn clear_input(&mut self) -> io::Result<()>;
}

impl Connection for Box<dyn SerialPort> {
    fn clear_input(&mut self) -> io::Result<()> {
        self.clear(ClearBuffer::Input).map_err(io::Error::from)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureOutcome {
    /// `lines` rows were written; the first is taken to be the CSV header,
    /// so `entries` is one less.
    Saved {
        path: PathBuf,
        lines: usize,
        entries: usize,
    },
    NoData,
}

impl fmt::Display for CaptureOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureOutcome::Saved { path, entries, .. } => {
                write!(f, "Saved {} entries to {}", entries, path.display())
            }
            CaptureOutcome::NoData => write!(f, "No data received"),
        }
    }
}

pub fn open_port(config: &CaptureConfig) -> Result<Box<dyn SerialPort>> {
    config.validate()?;
    serialport::new(&config.port, config.baud_rate)
        .timeout(config.read_timeout)
        .open()
        .map_err(|source| CaptureError::Open {
            port: config.port.clone(),
            source,
        })
}

/// Run a full session against the serial device named in `config`.
pub fn capture_log(config: &CaptureConfig) -> Result<CaptureOutcome> {
    info!("Connecting to {}...", config.port);
    let port = open_port(config)?;
    thread::sleep(config.settle_delay);
    capture(port, config)
}

/// Run a session over an already open connection.
///
/// The connection is consumed and dropped as soon as reading stops,
/// before anything is written to disk.
pub fn capture<C: Connection>(connection: C, config: &CaptureConfig) -> Result<CaptureOutcome> {
    let lines = collect(connection, config)?;

    if lines.is_empty() {
        return Ok(CaptureOutcome::NoData);
    }

    write_output(&config.output, &lines)?;
    Ok(CaptureOutcome::Saved {
        path: config.output.clone(),
        lines: lines.len(),
        entries: lines.len() - 1,
    })
}

fn collect<C: Connection>(mut connection: C, config: &CaptureConfig) -> Result<Vec<String>> {
    connection.clear_input()?;

    info!("Sending LOG DUMP command...");
    connection.write_all(COMMAND)?;
    connection.flush()?;

    info!("Receiving data...");
    let mut reader = SerialLineReader::new(connection, config.read_timeout);
    let mut recorder = CsvRecorder::new();
    let started = Instant::now();

    while !recorder.is_done() && started.elapsed() < config.deadline {
        let Some(line) = reader.read_line()? else {
            continue;
        };
        if let Some(count) = recorder.push(&line) {
            if count % PROGRESS_INTERVAL == 0 {
                info!("  {} entries...", count);
            }
        }
    }

    if !recorder.is_done() {
        warn!(
            "gave up waiting for {:?} after {:?} ({:?})",
            END_MARKER,
            config.deadline,
            recorder.state()
        );
    }
    Ok(recorder.into_lines())
}

/// Overwrite `path` with one line per entry and a trailing newline.
pub fn write_output(path: &Path, lines: &[String]) -> Result<()> {
    let mut contents = lines.join("\n");
    contents.push('\n');
    fs::write(path, contents).map_err(|source| CaptureError::Output {
        path: path.to_path_buf(),
        source,
    })
}
