//! Fuzz target for the evaluator and estimator.
//!
//! Any JSON document must yield a report and an estimate without panicking.

#![no_main]

use libfuzzer_sys::fuzz_target;
use storyline::{Estimator, Evaluator};

fuzz_target!(|data: &[u8]| {
    if data.len() > 100_000 {
        return;
    }

    if let Ok(record) = serde_json::from_slice::<serde_json::Value>(data) {
        let report = Evaluator::new().evaluate(&record);
        assert!(report.score <= 100);
        let _ = Estimator::new().estimate_record(&report.proposed_fix);
    }
});
