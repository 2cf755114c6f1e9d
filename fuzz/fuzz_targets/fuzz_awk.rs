#![no_main]

use byline::Pipeline;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Limit input sizes to keep iterations fast
    if data.len() > 100_000 {
        return;
    }

    // An identity callback must reproduce its input exactly
    let output = Pipeline::new(data.as_bytes())
        .awk(|line, fields, vars| {
            assert_eq!(fields.len(), vars.nf);
            Ok(line.to_string())
        })
        .collect_string()
        .expect("valid UTF-8 input cannot fail");
    assert_eq!(output, data);
});
