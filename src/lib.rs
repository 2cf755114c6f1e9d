//! byline - Line-by-line streaming reader with chainable filters
//!
//! A [`Pipeline`] wraps any [`std::io::Read`] source, splits it into records
//! on a single separator byte, and runs every record through a chain of map,
//! grep and AWK-style filters. The result is itself a `Read` (and `BufRead`),
//! so it can be copied to a writer, wrapped again, or drained in bulk.
//!
//! # Example
//!
//! ```
//! use byline::Pipeline;
//!
//! let input = "foo\nbar\nbaz";
//! let lines = Pipeline::new(input.as_bytes()).collect_strings().unwrap();
//!
//! assert_eq!(lines, vec!["foo\n", "bar\n", "baz"]);
//! ```
//!
//! # Filter Chain Example
//!
//! ```
//! use byline::{Pipeline, Signal};
//! use std::io::Read;
//!
//! let input = "# header\nalpha\nbeta\nSTOP\ngamma\n";
//! let mut output = String::new();
//! Pipeline::new(input.as_bytes())
//!     .grep_string(|line| !line.starts_with('#'))
//!     .try_map_string(|line| {
//!         if line == "STOP\n" {
//!             return Err(Signal::Stop);
//!         }
//!         Ok(line.to_uppercase())
//!     })
//!     .read_to_string(&mut output)
//!     .unwrap();
//!
//! assert_eq!(output, "ALPHA\nBETA\n");
//! ```
//!
//! # AWK Mode Example
//!
//! ```
//! use byline::Pipeline;
//! use regex::Regex;
//!
//! let input = "root:x:0:0\ndaemon:x:1:1\n";
//! let output = Pipeline::new(input.as_bytes())
//!     .field_pattern(Regex::new(":").unwrap())
//!     .awk(|_line, fields, vars| Ok(format!("{} {}", vars.nr, fields[0])))
//!     .collect_string()
//!     .unwrap();
//!
//! assert_eq!(output, "1 root\n2 daemon\n");
//! ```

pub mod error;
pub mod filter;
pub mod pipeline;
pub mod tokenizer;

pub use error::{BoxError, Error, Result, Signal};
pub use filter::{AwkVars, Filter, FilterChain};
pub use pipeline::{Pipeline, Records};
pub use tokenizer::{Scan, Tokenizer, scan};
