#![no_main]

use libfuzzer_sys::fuzz_target;
use zentinel_transforms::{transformations, TransformationPipeline};

fuzz_target!(|data: &[u8]| {
    // The first bytes pick the chain, the rest is the value.
    let Some((&count, rest)) = data.split_first() else {
        return;
    };
    let count = usize::from(count % 8).min(rest.len());
    let (selectors, value) = rest.split_at(count);

    let names = transformations::global().names();
    let chain: Vec<&str> = selectors
        .iter()
        .map(|&s| names[usize::from(s) % names.len()])
        .collect();

    let pipeline = TransformationPipeline::from_names(chain.as_slice()).expect("registered names");
    let out = pipeline.apply(value);
    let each = pipeline.apply_each(value);

    assert_eq!(each.first().map(Vec::as_slice), Some(value));
    if let Some(last) = each.last() {
        assert_eq!(last.as_slice(), out.value());
    }
});
