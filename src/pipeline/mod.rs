mod collect;

pub use collect::Records;

use std::io::{self, BufRead, Read};

use regex::Regex;
use tracing::{debug, trace};

use crate::error::{Result, Signal};
use crate::filter::{AwkVars, Filter, FilterChain};
use crate::tokenizer::Tokenizer;

/// Line-by-line reader that runs every record through a chain of filters.
///
/// The output is available through [`Read`] and [`BufRead`], through
/// [`Pipeline::records`], or all at once through the `collect_*` helpers.
pub struct Pipeline<'a, R> {
    tokenizer: Tokenizer<R>,
    chain: FilterChain<'a>,
    vars: AwkVars,
    /// Output record being handed out through `Read`
    pending: Vec<u8>,
    pos: usize,
    done: bool,
}

impl<'a, R: Read> Pipeline<'a, R> {
    /// Wrap `source` with a newline record separator and a `\s+` field pattern
    pub fn new(source: R) -> Self {
        Self {
            tokenizer: Tokenizer::new(source),
            chain: FilterChain::new(),
            vars: AwkVars::default(),
            pending: Vec::new(),
            pos: 0,
            done: false,
        }
    }

    /// Set the record separator (RS)
    pub fn record_separator(mut self, rs: u8) -> Self {
        self.set_record_separator(rs);
        self
    }

    /// Set the field separator pattern (FS) used by [`Pipeline::awk`]
    pub fn field_pattern(mut self, fs: Regex) -> Self {
        self.set_field_pattern(fs);
        self
    }

    /// Fail with [`Error::RecordTooLong`](crate::Error::RecordTooLong) on
    /// records longer than `limit` bytes
    pub fn max_record_len(mut self, limit: usize) -> Self {
        self.tokenizer.set_max_record_len(Some(limit));
        self
    }

    pub fn set_record_separator(&mut self, rs: u8) {
        self.vars.rs = rs;
    }

    pub fn set_field_pattern(&mut self, fs: Regex) {
        self.vars.fs = fs;
    }

    /// Append a filter to the chain
    pub fn with_filter(mut self, filter: Filter<'a>) -> Self {
        self.chain.push(filter);
        self
    }

    /// Transform each record's bytes
    pub fn map(self, f: impl FnMut(Vec<u8>) -> Vec<u8> + 'a) -> Self {
        self.with_filter(Filter::Map(Box::new(f)))
    }

    /// Transform each record's bytes; the closure may omit the record,
    /// stop the stream or fail it
    pub fn try_map(
        self,
        f: impl FnMut(Vec<u8>) -> std::result::Result<Vec<u8>, Signal> + 'a,
    ) -> Self {
        self.with_filter(Filter::TryMap(Box::new(f)))
    }

    /// Transform each record as a string.
    ///
    /// A record that is not valid UTF-8 fails the stream with
    /// [`Error::Utf8`](crate::Error::Utf8); use [`Pipeline::map`] for
    /// arbitrary bytes.
    pub fn map_string(self, f: impl FnMut(String) -> String + 'a) -> Self {
        self.with_filter(Filter::MapString(Box::new(f)))
    }

    /// Transform each record as a string; the closure may omit the record,
    /// stop the stream or fail it. Invalid UTF-8 fails the stream as in
    /// [`Pipeline::map_string`].
    pub fn try_map_string(
        self,
        f: impl FnMut(String) -> std::result::Result<String, Signal> + 'a,
    ) -> Self {
        self.with_filter(Filter::TryMapString(Box::new(f)))
    }

    /// Keep only records for which `f` returns true
    pub fn grep(self, f: impl FnMut(&[u8]) -> bool + 'a) -> Self {
        self.with_filter(Filter::Grep(Box::new(f)))
    }

    /// Keep only records whose text satisfies `f`. Invalid UTF-8 fails the
    /// stream; [`Pipeline::grep`] sees raw bytes.
    pub fn grep_string(self, f: impl FnMut(&str) -> bool + 'a) -> Self {
        self.with_filter(Filter::GrepString(Box::new(f)))
    }

    /// Keep only records matching `re`
    pub fn grep_regex(self, re: regex::bytes::Regex) -> Self {
        self.with_filter(Filter::GrepRegex(re))
    }

    /// Process records AWK style.
    ///
    /// The callback receives the record without its separator, the fields
    /// split by the field pattern, and the current [`AwkVars`]. Its result
    /// replaces the record; the separator is re-appended when the input had
    /// one and the result does not already end with it.
    ///
    /// Records must be valid UTF-8. Anything else, Latin-1 input included,
    /// fails the stream with [`Error::Utf8`](crate::Error::Utf8) naming the
    /// record number.
    pub fn awk(
        self,
        f: impl FnMut(&str, &[&str], &AwkVars) -> std::result::Result<String, Signal> + 'a,
    ) -> Self {
        self.with_filter(Filter::Awk(Box::new(f)))
    }

    /// Current AWK state: record number, field count and separators
    pub fn vars(&self) -> &AwkVars {
        &self.vars
    }

    pub fn get_ref(&self) -> &R {
        self.tokenizer.get_ref()
    }

    pub fn get_mut(&mut self) -> &mut R {
        self.tokenizer.get_mut()
    }

    /// Unwrap the source. Input that was read ahead but not yet processed is lost.
    pub fn into_inner(self) -> R {
        self.tokenizer.into_inner()
    }

    /// Pull records through the chain until one survives.
    ///
    /// Returns `Ok(None)` at end of stream. After an error or a stop request
    /// every later call returns `Ok(None)`.
    pub(crate) fn next_output(&mut self) -> Result<Option<Vec<u8>>> {
        while !self.done {
            let record = match self.tokenizer.next_record(self.vars.rs) {
                Ok(Some(record)) => record.to_vec(),
                Ok(None) => {
                    debug!(records = self.vars.nr, "end of input");
                    self.done = true;
                    break;
                }
                Err(err) => {
                    debug!(record = self.vars.nr + 1, error = %err, "failed to read record");
                    self.done = true;
                    return Err(err);
                }
            };
            self.vars.nr += 1;

            match self.chain.apply(record, &mut self.vars) {
                Ok(output) => return Ok(Some(output)),
                Err(Signal::Omit) => trace!(record = self.vars.nr, "record omitted"),
                Err(Signal::Stop) => {
                    debug!(record = self.vars.nr, "filter stopped the stream");
                    self.done = true;
                }
                Err(Signal::Fail(err)) => {
                    debug!(record = self.vars.nr, error = %err, "filter failed");
                    self.done = true;
                    return Err(err);
                }
            }
        }
        Ok(None)
    }

    /// Bytes of the current output record not yet handed out through `Read`
    pub(crate) fn take_pending(&mut self) -> Option<Vec<u8>> {
        if self.pos >= self.pending.len() {
            return None;
        }
        let rest = self.pending.split_off(self.pos);
        self.pending.clear();
        self.pos = 0;
        Some(rest)
    }
}

impl<R> std::fmt::Debug for Pipeline<'_, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("vars", &self.vars)
            .field("chain", &self.chain)
            .field("done", &self.done)
            .finish_non_exhaustive()
    }
}

impl<R: Read> BufRead for Pipeline<'_, R> {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        // Omitted and empty records produce no bytes, so keep pulling
        while self.pos >= self.pending.len() {
            match self.next_output().map_err(|err| err.into_io())? {
                Some(output) => {
                    self.pending = output;
                    self.pos = 0;
                }
                None => {
                    self.pending.clear();
                    self.pos = 0;
                    break;
                }
            }
        }
        Ok(&self.pending[self.pos..])
    }

    fn consume(&mut self, amt: usize) {
        self.pos = (self.pos + amt).min(self.pending.len());
    }
}

impl<R: Read> Read for Pipeline<'_, R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let available = self.fill_buf()?;
        let n = available.len().min(buf.len());
        buf[..n].copy_from_slice(&available[..n]);
        self.consume(n);
        Ok(n)
    }
}
