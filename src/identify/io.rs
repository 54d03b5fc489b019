//! Bounded I/O utilities for classifier file access.
//!
//! Every classifier opens the target itself through [`SafeFileReader`]; the
//! handle is dropped before the classifier returns, on every path.

use crate::error::{IdentifyError, Result};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;
use tracing::trace;

/// A bounded reader that limits the amount of data read.
pub struct BoundedReader<R> {
    inner: R,
    bytes_read: u64,
    limit: u64,
}

impl<R: Read> BoundedReader<R> {
    pub fn new(reader: R, limit: u64) -> Self {
        Self {
            inner: reader,
            bytes_read: 0,
            limit,
        }
    }

    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    pub fn is_exhausted(&self) -> bool {
        self.bytes_read >= self.limit
    }
}

impl<R: Read> Read for BoundedReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.is_exhausted() {
            return Ok(0); // EOF
        }

        let remaining = self.limit - self.bytes_read;
        let max_to_read = std::cmp::min(buf.len() as u64, remaining) as usize;
        let n = self.inner.read(&mut buf[..max_to_read])?;
        self.bytes_read += n as u64;
        Ok(n)
    }
}

/// A readable regular file. Directories are rejected at open time so that
/// every platform reports them as an I/O failure.
pub struct SafeFileReader {
    file: File,
    size: u64,
}

impl SafeFileReader {
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let metadata = file.metadata()?;
        if metadata.is_dir() {
            return Err(io::Error::other(format!("{} is a directory", path.display())));
        }
        trace!(path = %path.display(), size = metadata.len(), "opened file");
        Ok(Self {
            file,
            size: metadata.len(),
        })
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    /// Read up to `size` bytes from the start of the file.
    pub fn read_prefix(self, size: usize) -> io::Result<Vec<u8>> {
        let mut reader = BoundedReader::new(self.file, size as u64);
        let mut data = Vec::with_capacity(size.min(self.size as usize));
        reader.read_to_end(&mut data)?;
        Ok(data)
    }

    /// Read the first line, without its terminator, capped at `max_len` bytes.
    ///
    /// An empty file has no first line and yields [`IdentifyError::EmptyFile`].
    pub fn first_line(self, max_len: usize) -> Result<String> {
        let mut reader = BufReader::new(BoundedReader::new(self.file, max_len as u64));
        let mut line = Vec::new();
        let n = reader.read_until(b'\n', &mut line)?;
        if n == 0 {
            return Err(IdentifyError::EmptyFile);
        }
        while matches!(line.last(), Some(b'\n' | b'\r')) {
            line.pop();
        }
        Ok(String::from_utf8_lossy(&line).into_owned())
    }

    /// Buffered reader over at most `limit` bytes of the file.
    pub fn into_bounded_lines(self, limit: u64) -> BufReader<BoundedReader<File>> {
        BufReader::new(BoundedReader::new(self.file, limit))
    }
}
