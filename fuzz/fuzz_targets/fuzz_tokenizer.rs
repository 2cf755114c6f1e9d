#![no_main]

use arbitrary::Arbitrary;
use byline::Pipeline;
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input {
    separator: u8,
    data: Vec<u8>,
}

fuzz_target!(|input: Input| {
    let records = Pipeline::new(&input.data[..])
        .record_separator(input.separator)
        .collect_records()
        .expect("in-memory input cannot fail");

    // Records concatenate back to the input
    assert_eq!(records.concat(), input.data);

    // Every record but the last ends with the separator
    let separators = input.data.iter().filter(|&&b| b == input.separator).count();
    let tail = input.data.last().is_some_and(|&b| b != input.separator);
    assert_eq!(records.len(), separators + usize::from(tail));
    for record in records.iter().rev().skip(1) {
        assert_eq!(record.last(), Some(&input.separator));
    }
});
