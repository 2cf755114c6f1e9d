/// Outcome of scanning a buffer for the next record boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scan {
    /// A record of this many bytes, the last of which is the separator
    Terminated(usize),
    /// The final record of an exhausted source, with no trailing separator
    Tail(usize),
    /// No separator yet and the source may still produce more
    NeedMore,
    /// The source is exhausted and nothing is left
    Exhausted,
}

/// Find the next record boundary in `data`.
///
/// A record runs up to and including the first `separator` byte. When the
/// source is exhausted the remaining bytes form one last record, unless
/// there are none. Never reports a record before it is complete.
pub fn scan(data: &[u8], separator: u8, at_eof: bool) -> Scan {
    if let Some(i) = data.iter().position(|&b| b == separator) {
        return Scan::Terminated(i + 1);
    }
    match (at_eof, data.is_empty()) {
        (true, true) => Scan::Exhausted,
        (true, false) => Scan::Tail(data.len()),
        (false, _) => Scan::NeedMore,
    }
}
