//! Property-based invariant tests for vote-result shares.
//!
//! 1. With at least one vote, shares sum to 100 within rounding slack
//! 2. Options with no votes show exactly 0 and the `0%` label
//! 3. Rows follow the server's option order
//! 4. Every share lies in [0, 100] with at most two decimals
//! 5. Counts near `f64::MAX` keep 1 and 4, or are rejected up front

use agora_proposal::{ResultsError, VoteResults, VoteResultsResponse};
use proptest::prelude::*;

fn tallies() -> impl Strategy<Value = Vec<u32>> {
    prop::collection::vec(0u32..10_000, 1..12)
}

fn results_from(counts: &[u32]) -> VoteResults {
    VoteResults::from_entries(
        counts
            .iter()
            .enumerate()
            .map(|(i, &c)| (format!("option-{i}"), f64::from(c))),
    )
    .unwrap()
}

/// Counts spread across the top of the `f64` range.
fn huge_tallies() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec((0.0f64..=1.0).prop_map(|scale| scale * f64::MAX / 4.0), 1..8)
}

proptest! {
    #[test]
    fn shares_sum_to_hundred(counts in tallies()) {
        prop_assume!(counts.iter().any(|&c| c > 0));
        let shares = results_from(&counts).shares();
        let sum: f64 = shares.iter().map(|s| s.percentage).sum();
        let slack = shares.len() as f64 * 0.005 + 1e-9;
        prop_assert!((sum - 100.0).abs() <= slack, "sum {sum} outside slack {slack}");
    }

    #[test]
    fn zero_counts_show_zero(counts in tallies()) {
        for share in results_from(&counts).shares() {
            if share.count == 0.0 {
                prop_assert_eq!(share.percentage, 0.0);
                prop_assert_eq!(share.percent_label(), "0%");
            }
        }
    }

    #[test]
    fn rows_keep_server_order(counts in tallies()) {
        let body = format!(
            "{{\"results\": {{{}}}}}",
            counts
                .iter()
                .enumerate()
                .rev()
                .map(|(i, c)| format!("\"option-{i}\": {c}"))
                .collect::<Vec<_>>()
                .join(", ")
        );
        let response = VoteResultsResponse::from_json(&body).unwrap();
        let labels: Vec<String> = response.results.shares().into_iter().map(|s| s.label).collect();
        let expected: Vec<String> = (0..counts.len()).rev().map(|i| format!("option-{i}")).collect();
        prop_assert_eq!(labels, expected);
    }

    #[test]
    fn shares_bounded_and_rounded(counts in tallies()) {
        for share in results_from(&counts).shares() {
            prop_assert!((0.0..=100.0).contains(&share.percentage));
            let cents = share.percentage * 100.0;
            prop_assert!((cents - cents.round()).abs() < 1e-6);
        }
    }

    #[test]
    fn huge_counts_stay_finite(counts in huge_tallies()) {
        let entries = counts.iter().enumerate().map(|(i, &c)| (format!("option-{i}"), c));
        match VoteResults::from_entries(entries) {
            Ok(results) => {
                prop_assert!(results.total().is_finite());
                let shares = results.shares();
                for share in &shares {
                    prop_assert!((0.0..=100.0).contains(&share.percentage));
                    prop_assert!(!share.percent_label().contains("inf"));
                }
                if results.total() > 0.0 {
                    let sum: f64 = shares.iter().map(|s| s.percentage).sum();
                    let slack = shares.len() as f64 * 0.005 + 1e-9;
                    prop_assert!((sum - 100.0).abs() <= slack, "sum {sum} outside slack {slack}");
                }
            }
            Err(err) => prop_assert!(matches!(err, ResultsError::TotalOverflow { .. }), "unexpected error: {:?}", err),
        }
    }
}
