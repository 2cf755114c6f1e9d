use std::env;
use std::fs::File;
use std::io::{self, Read, Write};
use std::process;

use byline::Pipeline;
use regex::Regex;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    init_logging();

    let args: Vec<String> = env::args().collect();

    match run(&args[1..]) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("byline: {}", e);
            process::exit(2);
        }
    }
}

fn init_logging() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

#[derive(Debug)]
struct Options {
    record_separator: u8,
    field_pattern: Option<String>,
    keep: Vec<String>,
    drop: Vec<String>,
    fields: Vec<usize>,
    output_separator: String,
    number: bool,
    count: bool,
    max_record_len: Option<usize>,
    input_files: Vec<String>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            record_separator: b'\n',
            field_pattern: None,
            keep: Vec::new(),
            drop: Vec::new(),
            fields: Vec::new(),
            output_separator: " ".to_string(),
            number: false,
            count: false,
            max_record_len: None,
            input_files: Vec::new(),
        }
    }
}

fn run(args: &[String]) -> Result<i32, Box<dyn std::error::Error>> {
    let mut opts = Options::default();

    let mut i = 0;
    while i < args.len() {
        let arg = &args[i];

        if arg == "--help" || arg == "-h" {
            print_help();
            return Ok(0);
        }

        if arg == "--version" {
            println!("byline {}", env!("CARGO_PKG_VERSION"));
            return Ok(0);
        }

        if let Some((flag, value)) = split_attached(arg) {
            apply_option(&mut opts, flag, value)?;
            i += 1;
            continue;
        }

        match arg.as_str() {
            "-R" | "-F" | "-g" | "-v" | "-f" | "-O" | "--max-record" => {
                i += 1;
                let value = args
                    .get(i)
                    .ok_or_else(|| format!("option {} requires an argument", arg))?;
                apply_option(&mut opts, arg, value)?;
            }
            "-n" => opts.number = true,
            "-c" => opts.count = true,
            "--" => {
                // End of options
                i += 1;
                opts.input_files.extend(args[i..].iter().cloned());
                break;
            }
            _ if arg.starts_with('-') && arg != "-" => {
                return Err(format!("unknown option: {}", arg).into());
            }
            _ => opts.input_files.push(arg.clone()),
        }

        i += 1;
    }

    tracing::debug!(?opts, "parsed options");

    let input = open_inputs(&opts.input_files)?;
    let mut pipeline = build_pipeline(&opts, input)?;

    let stdout = io::stdout();
    let mut output = stdout.lock();

    if opts.count {
        let mut count = 0usize;
        for record in pipeline.records() {
            record?;
            count += 1;
        }
        writeln!(output, "{}", count)?;
    } else {
        io::copy(&mut pipeline, &mut output)?;
    }
    output.flush()?;

    Ok(0)
}

/// Split an option written with its value attached, such as `-F:`,
/// `-gerror` or `--max-record=4096`
fn split_attached(arg: &str) -> Option<(&str, &str)> {
    if let Some(value) = arg.strip_prefix("--max-record=") {
        return Some(("--max-record", value));
    }
    ["-R", "-F", "-g", "-v", "-f", "-O"].into_iter().find_map(|flag| {
        arg.strip_prefix(flag)
            .filter(|value| !value.is_empty())
            .map(|value| (flag, value))
    })
}

fn apply_option(opts: &mut Options, flag: &str, value: &str) -> Result<(), String> {
    match flag {
        "-R" => opts.record_separator = parse_separator(value)?,
        "-F" => opts.field_pattern = Some(value.to_string()),
        "-g" => opts.keep.push(value.to_string()),
        "-v" => opts.drop.push(value.to_string()),
        "-f" => opts.fields = parse_field_list(value)?,
        "-O" => opts.output_separator = value.to_string(),
        "--max-record" => {
            let limit = value
                .parse()
                .map_err(|_| format!("invalid record length: {}", value))?;
            opts.max_record_len = Some(limit);
        }
        _ => return Err(format!("unknown option: {}", flag)),
    }
    Ok(())
}

/// Parse a record separator: one ASCII character, an escape such as `\n`,
/// or a hex byte such as `0x1e`
fn parse_separator(value: &str) -> Result<u8, String> {
    match value {
        "\\n" => return Ok(b'\n'),
        "\\t" => return Ok(b'\t'),
        "\\r" => return Ok(b'\r'),
        "\\0" => return Ok(0),
        _ => {}
    }
    if let Some(hex) = value.strip_prefix("0x") {
        return u8::from_str_radix(hex, 16).map_err(|_| format!("invalid separator: {}", value));
    }
    match value.as_bytes() {
        [b] if b.is_ascii() => Ok(*b),
        _ => Err(format!("separator must be a single byte: {}", value)),
    }
}

/// Parse a comma separated list of field numbers; 0 is the whole record
fn parse_field_list(value: &str) -> Result<Vec<usize>, String> {
    value
        .split(',')
        .map(|field| {
            field
                .trim()
                .parse()
                .map_err(|_| format!("invalid field number: {}", field))
        })
        .collect()
}

/// Concatenate all inputs into one stream; `-` or no files means stdin
fn open_inputs(files: &[String]) -> io::Result<Box<dyn Read>> {
    if files.is_empty() {
        return Ok(Box::new(io::stdin()));
    }

    let mut input: Box<dyn Read> = Box::new(io::empty());
    for filename in files {
        let next: Box<dyn Read> = if filename == "-" {
            Box::new(io::stdin())
        } else {
            Box::new(File::open(filename)?)
        };
        input = Box::new(input.chain(next));
    }
    Ok(input)
}

fn build_pipeline<R: Read>(
    opts: &Options,
    input: R,
) -> Result<Pipeline<'static, R>, Box<dyn std::error::Error>> {
    let mut pipeline = Pipeline::new(input).record_separator(opts.record_separator);

    if let Some(limit) = opts.max_record_len {
        pipeline = pipeline.max_record_len(limit);
    }
    if let Some(pattern) = &opts.field_pattern {
        pipeline = pipeline.field_pattern(Regex::new(pattern)?);
    }

    for pattern in &opts.keep {
        pipeline = pipeline.grep_regex(regex::bytes::Regex::new(pattern)?);
    }
    for pattern in &opts.drop {
        let re = regex::bytes::Regex::new(pattern)?;
        pipeline = pipeline.grep(move |record| !re.is_match(record));
    }

    if !opts.fields.is_empty() || opts.number {
        let selected = opts.fields.clone();
        let ofs = opts.output_separator.clone();
        let number = opts.number;
        pipeline = pipeline.awk(move |line, fields, vars| {
            let body = if selected.is_empty() {
                line.to_string()
            } else {
                selected
                    .iter()
                    .map(|&i| match i {
                        0 => line,
                        i => fields.get(i - 1).copied().unwrap_or(""),
                    })
                    .collect::<Vec<_>>()
                    .join(&ofs)
            };
            if number {
                Ok(format!("{:>6}\t{}", vars.nr, body))
            } else {
                Ok(body)
            }
        });
    }

    Ok(pipeline)
}

fn print_help() {
    println!(
        r#"Usage: byline [OPTIONS] [file ...]

Stream records through grep, field selection and numbering filters.

Options:
  -R sep           Record separator: one character, \n, \t, \r, \0 or 0xNN
  -F regex         Field separator pattern (default: \s+)
  -g regex         Keep only records matching regex (repeatable)
  -v regex         Drop records matching regex (repeatable)
  -f list          Print the given fields, e.g. 1,3 (0 is the whole record)
  -O sep           Output field separator for -f (default: space)
  -n               Prefix each record with its record number
  -c               Print only the number of records that pass the filters
  --max-record N   Fail on records longer than N bytes

Options that take a value also accept it attached, as in -F: or -gerror.
  --version        Print version information
  --help           Print this help message

Logging is controlled with RUST_LOG, e.g. RUST_LOG=byline=debug.

Examples:
  byline -g error app.log
  byline -F: -f 1,7 /etc/passwd
  byline -R '\0' -c
"#
    );
}
