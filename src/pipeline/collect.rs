//! Draining a pipeline record by record or all at once.
//!
//! Every helper here pulls from the same record stream that backs the
//! `Read` implementation, so omitted records never show up and a stop
//! request simply ends the collection.

use std::io::Read;

use super::Pipeline;
use crate::error::{Error, Result};

/// Iterator over the records that survive a pipeline's filters
pub struct Records<'p, 'a, R> {
    pipeline: &'p mut Pipeline<'a, R>,
}

impl<R: Read> Iterator for Records<'_, '_, R> {
    type Item = Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.pipeline.next_chunk().transpose()
    }
}

impl<'a, R: Read> Pipeline<'a, R> {
    /// Iterate over output records, one `Vec<u8>` each.
    ///
    /// Records that filters mapped to nothing are yielded as empty vectors.
    /// If `Read` or `BufRead` already handed out part of a record, the first
    /// item is the remainder of that record.
    pub fn records(&mut self) -> Records<'_, 'a, R> {
        Records { pipeline: self }
    }

    /// Run the pipeline to the end for the side effects of its filters
    pub fn discard(&mut self) -> Result<()> {
        while self.next_chunk()?.is_some() {}
        Ok(())
    }

    /// Collect every output record
    pub fn collect_records(&mut self) -> Result<Vec<Vec<u8>>> {
        self.records().collect()
    }

    /// Collect all output into one buffer
    pub fn collect_bytes(&mut self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        for record in self.records() {
            out.extend_from_slice(&record?);
        }
        Ok(out)
    }

    /// Collect every output record as a string
    pub fn collect_strings(&mut self) -> Result<Vec<String>> {
        let mut strings = Vec::new();
        while let Some(record) = self.next_chunk()? {
            strings.push(self.to_text(record)?);
        }
        Ok(strings)
    }

    /// Collect all output into one string
    pub fn collect_string(&mut self) -> Result<String> {
        Ok(self.collect_strings()?.concat())
    }

    /// The unread rest of the current record, then whatever comes next
    fn next_chunk(&mut self) -> Result<Option<Vec<u8>>> {
        match self.take_pending() {
            Some(rest) => Ok(Some(rest)),
            None => self.next_output(),
        }
    }

    fn to_text(&self, record: Vec<u8>) -> Result<String> {
        String::from_utf8(record).map_err(|err| Error::Utf8 {
            record: self.vars.nr,
            source: err.utf8_error(),
        })
    }
}
