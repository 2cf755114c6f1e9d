use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use std::io::{self, Read};

use byline::{Pipeline, scan};
use regex::Regex;

fn sample_input(lines: usize) -> String {
    (0..lines)
        .map(|i| format!("user{} {} GET /index/{}.html 200\n", i, i * 7 % 1000, i))
        .collect()
}

// ============ Tokenizer Benchmarks ============

fn bench_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("scan");

    let short = b"a short line\nand the rest";
    group.bench_function("short_record", |b| {
        b.iter(|| scan(black_box(short), b'\n', false))
    });

    let long = vec![b'x'; 64 * 1024];
    group.bench_function("no_separator_64k", |b| {
        b.iter(|| scan(black_box(&long), b'\n', false))
    });

    group.finish();
}

fn bench_passthrough(c: &mut Criterion) {
    let mut group = c.benchmark_group("passthrough");

    for lines in [100, 1_000, 10_000] {
        let input = sample_input(lines);
        group.throughput(Throughput::Bytes(input.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(lines), &input, |b, input| {
            b.iter(|| {
                let mut p = Pipeline::new(black_box(input.as_bytes()));
                io::copy(&mut p, &mut io::sink()).unwrap()
            })
        });
    }

    group.finish();
}

// ============ Filter Chain Benchmarks ============

fn bench_filters(c: &mut Criterion) {
    let mut group = c.benchmark_group("filters");
    let input = sample_input(10_000);
    group.throughput(Throughput::Bytes(input.len() as u64));

    group.bench_function("map_uppercase", |b| {
        b.iter(|| {
            Pipeline::new(black_box(input.as_bytes()))
                .map(|r| r.to_ascii_uppercase())
                .collect_bytes()
                .unwrap()
        })
    });

    group.bench_function("grep_regex", |b| {
        let re = regex::bytes::Regex::new(r"/index/\d*7\.html").unwrap();
        b.iter(|| {
            Pipeline::new(black_box(input.as_bytes()))
                .grep_regex(re.clone())
                .collect_records()
                .unwrap()
        })
    });

    group.bench_function("map_string_chain", |b| {
        b.iter(|| {
            let mut out = String::new();
            Pipeline::new(black_box(input.as_bytes()))
                .map_string(|s| s.replace("GET", "POST"))
                .grep_string(|s| s.ends_with("200\n"))
                .map_string(|s| s.trim_start().to_string())
                .read_to_string(&mut out)
                .unwrap();
            out
        })
    });

    group.finish();
}

// ============ AWK Mode Benchmarks ============

fn bench_awk(c: &mut Criterion) {
    let mut group = c.benchmark_group("awk");
    let input = sample_input(10_000);
    group.throughput(Throughput::Bytes(input.len() as u64));

    group.bench_function("print_field", |b| {
        b.iter(|| {
            Pipeline::new(black_box(input.as_bytes()))
                .awk(|_, fields, _| Ok(fields[0].to_string()))
                .collect_string()
                .unwrap()
        })
    });

    group.bench_function("sum_column", |b| {
        b.iter(|| {
            let mut sum = 0u64;
            Pipeline::new(black_box(input.as_bytes()))
                .awk(|line, fields, _| {
                    sum += fields[1].parse::<u64>().unwrap_or(0);
                    Ok(line.to_string())
                })
                .discard()
                .unwrap();
            sum
        })
    });

    let csv: String = (0..10_000).map(|i| format!("{},{},{}\n", i, i * 2, i * 3)).collect();
    group.bench_function("custom_field_pattern", |b| {
        let fs = Regex::new(",").unwrap();
        b.iter(|| {
            Pipeline::new(black_box(csv.as_bytes()))
                .field_pattern(fs.clone())
                .awk(|_, fields, vars| Ok(format!("{} {}", vars.nf, fields[2])))
                .collect_bytes()
                .unwrap()
        })
    });

    group.finish();
}

criterion_group!(benches, bench_scan, bench_passthrough, bench_filters, bench_awk);
criterion_main!(benches);
