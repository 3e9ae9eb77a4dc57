//! Baseline-vs-candidate suite comparison.
//!
//! The external CI gate diffs a frozen baseline report against the candidate
//! run and exits non-zero on any detected regression. A regression is a test
//! that moves away from `Pass`, or an increase in the suite's breach count.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::report::{SuiteReport, TestOutcome};

/// One detected regression between baseline and candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Regression {
    /// A test outcome moved away from PASS.
    OutcomeFlip {
        test_name: String,
        baseline: TestOutcome,
        candidate: TestOutcome,
    },
    /// The suite breach count increased.
    BreachCountIncrease { baseline: usize, candidate: usize },
}

/// Compare two suite reports and list every regression.
///
/// Tests are matched by stable name; a test missing from the candidate is a
/// regression of its baseline outcome (treated as a flip to inconclusive).
pub fn compare_suites(baseline: &SuiteReport, candidate: &SuiteReport) -> Vec<Regression> {
    let mut regressions = Vec::new();

    for base_test in &baseline.tests {
        if base_test.outcome != TestOutcome::Pass {
            continue;
        }
        let cand_outcome = candidate
            .test(&base_test.test_name)
            .map_or(TestOutcome::Inconclusive, |t| t.outcome);

        if cand_outcome != TestOutcome::Pass {
            warn!(
                test = %base_test.test_name,
                baseline = %base_test.outcome,
                candidate = %cand_outcome,
                "validation regression detected"
            );
            regressions.push(Regression::OutcomeFlip {
                test_name: base_test.test_name.clone(),
                baseline: base_test.outcome,
                candidate: cand_outcome,
            });
        }
    }

    if candidate.breach_count > baseline.breach_count {
        regressions.push(Regression::BreachCountIncrease {
            baseline: baseline.breach_count,
            candidate: candidate.breach_count,
        });
    }

    regressions
}
