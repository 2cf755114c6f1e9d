mod boundary;

pub use boundary::{Scan, scan};

use std::io::{ErrorKind, Read};

use crate::error::{Error, Result};

/// Bytes requested from the source per refill, at minimum
const CHUNK_SIZE: usize = 4096;

/// Splits a byte stream into separator-terminated records
pub struct Tokenizer<R> {
    source: R,
    /// `buf[start..end]` holds bytes read but not yet returned
    buf: Vec<u8>,
    start: usize,
    end: usize,
    at_eof: bool,
    max_record_len: Option<usize>,
}

impl<R: Read> Tokenizer<R> {
    pub fn new(source: R) -> Self {
        Self {
            source,
            buf: Vec::new(),
            start: 0,
            end: 0,
            at_eof: false,
            max_record_len: None,
        }
    }

    /// Limit how long an unterminated record may grow before failing
    pub fn set_max_record_len(&mut self, limit: Option<usize>) {
        self.max_record_len = limit;
    }

    /// Return the next record, including its trailing separator if it has one.
    ///
    /// `Ok(None)` once the source is exhausted. The slice borrows the internal
    /// buffer and is valid until the next call.
    pub fn next_record(&mut self, separator: u8) -> Result<Option<&[u8]>> {
        // Leading bytes of the pending input already known to hold no separator
        let mut scanned = 0;
        loop {
            let pending = &self.buf[self.start..self.end];
            let len = match scan(&pending[scanned..], separator, self.at_eof) {
                Scan::Terminated(len) | Scan::Tail(len) => scanned + len,
                Scan::Exhausted if scanned > 0 => scanned,
                Scan::Exhausted => return Ok(None),
                Scan::NeedMore => {
                    if let Some(limit) = self.max_record_len
                        && pending.len() > limit
                    {
                        return Err(Error::RecordTooLong { limit });
                    }
                    scanned = pending.len();
                    self.fill()?;
                    continue;
                }
            };

            if let Some(limit) = self.max_record_len
                && len > limit
            {
                return Err(Error::RecordTooLong { limit });
            }
            let begin = self.start;
            self.start += len;
            return Ok(Some(&self.buf[begin..self.start]));
        }
    }

    /// Read more input, moving the pending bytes to the front first.
    fn fill(&mut self) -> Result<()> {
        if self.start > 0 {
            self.buf.copy_within(self.start..self.end, 0);
            self.end -= self.start;
            self.start = 0;
        }
        if self.buf.len() - self.end < CHUNK_SIZE {
            // Double so a long record costs amortized linear copying
            let grow = self.buf.len().max(CHUNK_SIZE);
            self.buf.resize(self.buf.len() + grow, 0);
        }

        loop {
            match self.source.read(&mut self.buf[self.end..]) {
                Ok(0) => {
                    self.at_eof = true;
                    return Ok(());
                }
                Ok(n) => {
                    self.end += n;
                    return Ok(());
                }
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(Error::Io(err)),
            }
        }
    }

    pub fn get_ref(&self) -> &R {
        &self.source
    }

    pub fn get_mut(&mut self) -> &mut R {
        &mut self.source
    }

    /// Unwrap the source. Buffered but unread bytes are lost.
    pub fn into_inner(self) -> R {
        self.source
    }
}
