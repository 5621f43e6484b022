use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str;

use errors::*;
use record::{ParseError, ParseResult};

/// `LineReader` reads a stream one line at a time, reusing a single buffer.
///
/// A read failure is fatal and returned as an `errors::Error`. A line that is not valid UTF-8 is
/// only a bad record and is handed back as a `ParseError` so the caller can skip it.
pub struct LineReader<R: BufRead> {
    source: R,
    buffer: Vec<u8>,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(source: R) -> Self {
        LineReader {
            source,
            buffer: Vec::new(),
        }
    }

    /// Returns the next line without its terminator, or `None` at end of input.
    pub fn next_line(&mut self) -> Result<Option<ParseResult<&str>>> {
        self.buffer.clear();
        let bytes_read = self.source
            .read_until(b'\n', &mut self.buffer)
            .chain_err(|| "Error reading from source.")?;
        if bytes_read == 0 {
            return Ok(None);
        }

        if self.buffer.last() == Some(&b'\n') {
            self.buffer.pop();
        }

        Ok(Some(
            str::from_utf8(&self.buffer).map_err(|_| ParseError::InvalidUtf8),
        ))
    }
}

/// Opens one input shard for reading.
pub fn open_shard<P: AsRef<Path>>(path: P) -> Result<BufReader<File>> {
    let file = File::open(&path).chain_err(|| {
        format!("unable to open file {}", path.as_ref().to_string_lossy())
    })?;
    Ok(BufReader::new(file))
}
