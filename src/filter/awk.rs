use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Signal};

/// Default record separator
pub const DEFAULT_RS: u8 = b'\n';

static DEFAULT_FS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("default field pattern compiles"));

/// Per-pipeline AWK state
#[derive(Debug, Clone)]
pub struct AwkVars {
    /// Record number (NR), counted from 1
    pub nr: usize,
    /// Field count of the most recently split record (NF)
    pub nf: usize,
    /// Record separator (RS)
    pub rs: u8,
    /// Field separator pattern (FS)
    pub fs: Regex,
}

impl Default for AwkVars {
    fn default() -> Self {
        Self {
            nr: 0,
            nf: 0,
            rs: DEFAULT_RS,
            fs: DEFAULT_FS.clone(),
        }
    }
}

/// Callback invoked per record in AWK mode with the line (separator
/// stripped), its fields and the current state.
pub type AwkFn<'a> = dyn FnMut(&str, &[&str], &AwkVars) -> Result<String, Signal> + 'a;

/// Split `record` into fields, hand it to `callback` and rebuild the output.
///
/// A trailing separator on the input is stripped before splitting and put
/// back on the output unless the callback already ended its result with one.
pub(crate) fn apply(
    callback: &mut AwkFn<'_>,
    record: Vec<u8>,
    vars: &mut AwkVars,
) -> Result<Vec<u8>, Signal> {
    let rs = vars.rs;
    let had_rs = record.last() == Some(&rs);
    let content = if had_rs {
        &record[..record.len() - 1]
    } else {
        &record[..]
    };
    let line = std::str::from_utf8(content).map_err(|source| Error::Utf8 {
        record: vars.nr,
        source,
    })?;

    let fields: Vec<&str> = vars.fs.split(line).collect();
    vars.nf = fields.len();

    let mut out = callback(line, &fields, vars)?.into_bytes();
    if had_rs && out.last() != Some(&rs) {
        out.push(rs);
    }
    Ok(out)
}
