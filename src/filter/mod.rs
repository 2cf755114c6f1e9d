pub mod awk;

pub use awk::{AwkFn, AwkVars};

use crate::error::{Error, Signal};

/// One step of a filter chain.
///
/// Every variant is applied through [`Filter::apply`], which takes the record
/// and returns either the replacement record or a [`Signal`]. The text
/// variants and [`Filter::Awk`] fail with [`Error::Utf8`] on records that are
/// not valid UTF-8; the byte variants accept anything.
pub enum Filter<'a> {
    /// Transform the raw bytes
    Map(Box<dyn FnMut(Vec<u8>) -> Vec<u8> + 'a>),
    /// Transform the raw bytes, possibly signalling
    TryMap(Box<dyn FnMut(Vec<u8>) -> Result<Vec<u8>, Signal> + 'a>),
    /// Transform the record as text
    MapString(Box<dyn FnMut(String) -> String + 'a>),
    /// Transform the record as text, possibly signalling
    TryMapString(Box<dyn FnMut(String) -> Result<String, Signal> + 'a>),
    /// Keep records for which the predicate holds
    Grep(Box<dyn FnMut(&[u8]) -> bool + 'a>),
    /// Keep records whose text satisfies the predicate
    GrepString(Box<dyn FnMut(&str) -> bool + 'a>),
    /// Keep records matching the pattern
    GrepRegex(regex::bytes::Regex),
    /// Split into fields and hand them to a callback
    Awk(Box<AwkFn<'a>>),
}

impl Filter<'_> {
    pub fn apply(&mut self, record: Vec<u8>, vars: &mut AwkVars) -> Result<Vec<u8>, Signal> {
        match self {
            Filter::Map(f) => Ok(f(record)),
            Filter::TryMap(f) => f(record),
            Filter::MapString(f) => Ok(f(into_string(record, vars)?).into_bytes()),
            Filter::TryMapString(f) => Ok(f(into_string(record, vars)?)?.into_bytes()),
            Filter::Grep(f) => keep_if(f(&record), record),
            Filter::GrepString(f) => {
                let keep = match std::str::from_utf8(&record) {
                    Ok(text) => f(text),
                    Err(source) => {
                        return Err(Error::Utf8 {
                            record: vars.nr,
                            source,
                        }
                        .into());
                    }
                };
                keep_if(keep, record)
            }
            Filter::GrepRegex(re) => keep_if(re.is_match(&record), record),
            Filter::Awk(f) => awk::apply(f.as_mut(), record, vars),
        }
    }

    /// Short name for log output
    pub fn kind(&self) -> &'static str {
        match self {
            Filter::Map(_) => "map",
            Filter::TryMap(_) => "try_map",
            Filter::MapString(_) => "map_string",
            Filter::TryMapString(_) => "try_map_string",
            Filter::Grep(_) => "grep",
            Filter::GrepString(_) => "grep_string",
            Filter::GrepRegex(_) => "grep_regex",
            Filter::Awk(_) => "awk",
        }
    }
}

impl std::fmt::Debug for Filter<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Filter::GrepRegex(re) => f.debug_tuple("GrepRegex").field(&re.as_str()).finish(),
            other => f.write_str(other.kind()),
        }
    }
}

fn into_string(record: Vec<u8>, vars: &AwkVars) -> Result<String, Error> {
    String::from_utf8(record).map_err(|err| Error::Utf8 {
        record: vars.nr,
        source: err.utf8_error(),
    })
}

#[inline]
fn keep_if(keep: bool, record: Vec<u8>) -> Result<Vec<u8>, Signal> {
    if keep { Ok(record) } else { Err(Signal::Omit) }
}

/// Ordered list of filters applied to every record
#[derive(Debug, Default)]
pub struct FilterChain<'a> {
    filters: Vec<Filter<'a>>,
}

impl<'a> FilterChain<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a filter; it runs after every filter already in the chain
    pub fn push(&mut self, filter: Filter<'a>) {
        self.filters.push(filter);
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Run `record` through every filter in order.
    ///
    /// Stops at the first filter that signals; its signal is returned and the
    /// remaining filters never see the record.
    pub fn apply(&mut self, record: Vec<u8>, vars: &mut AwkVars) -> Result<Vec<u8>, Signal> {
        self.filters
            .iter_mut()
            .try_fold(record, |record, filter| filter.apply(record, vars))
    }
}
