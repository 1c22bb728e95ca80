//! Fuzz target for the diff engine.
//!
//! The input is split in two and each half parsed as JSON. Diffing must not
//! panic, and a value diffed against itself must produce no operations.

#![no_main]

use libfuzzer_sys::fuzz_target;
use serde_json::Value;
use storyline::diff;

fuzz_target!(|data: &[u8]| {
    if data.len() > 100_000 {
        return;
    }

    let mid = data.len() / 2;
    let before = serde_json::from_slice::<Value>(&data[..mid]).unwrap_or(Value::Null);
    let after = serde_json::from_slice::<Value>(&data[mid..]).unwrap_or(Value::Null);

    let ops = diff(&before, &after);
    assert_eq!(ops.is_empty(), before == after);
    assert!(diff(&after, &after).is_empty());
});
