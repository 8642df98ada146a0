use std::{
    io::{self, ErrorKind, Read},
    time::{Duration, Instant},
};

use bytes::BytesMut;

const CHUNK_SIZE: usize = 256;

/// Splits the byte stream coming off a serial port into text lines.
pub struct SerialLineReader<P> {
    port: P,
    buffer: BytesMut,
    line_timeout: Duration,
}

impl<P: Read> SerialLineReader<P> {
    /// `line_timeout` bounds a whole `read_line` call, not just one read.
    pub fn new(port: P, line_timeout: Duration) -> Self {
        SerialLineReader {
            port,
            buffer: BytesMut::with_capacity(CHUNK_SIZE),
            line_timeout,
        }
    }

    /// Read the next line, without its `\n` or `\r\n` terminator.
    ///
    /// Returns whatever is buffered once the port times out or the line
    /// timeout passes without a newline; with nothing buffered the result
    /// is `Ok(None)`.
    pub fn read_line(&mut self) -> io::Result<Option<String>> {
        let started = Instant::now();
        loop {
            if let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
                let mut line = self.buffer.split_to(pos + 1);
                line.truncate(pos);
                if line.last() == Some(&b'\r') {
                    line.truncate(pos - 1);
                }
                return Ok(Some(decode_lossy(&line)));
            }

            let mut chunk = [0u8; CHUNK_SIZE];
            match self.port.read(&mut chunk) {
                Ok(0) => return Ok(self.take_partial()),
                Ok(n) => {
                    self.buffer.extend_from_slice(&chunk[..n]);
                    if started.elapsed() >= self.line_timeout && !self.buffer.contains(&b'\n') {
                        return Ok(self.take_partial());
                    }
                }
                Err(ref e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(ref e) if matches!(e.kind(), ErrorKind::TimedOut | ErrorKind::WouldBlock) => {
                    return Ok(self.take_partial())
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn take_partial(&mut self) -> Option<String> {
        if self.buffer.is_empty() {
            None
        } else {
            let rest = self.buffer.split();
            Some(decode_lossy(&rest))
        }
    }
}

/// UTF-8 decode that silently drops invalid byte sequences.
pub fn decode_lossy(bytes: &[u8]) -> String {
    bytes.utf8_chunks().map(|chunk| chunk.valid()).collect()
}
