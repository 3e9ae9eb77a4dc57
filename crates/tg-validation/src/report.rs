//! Versioned validation report records.
//!
//! The JSON form is consumed by the CI regression-gate comparator; the
//! Markdown form is for humans. Both are rendered from the same records.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Report schema version. Bump only on breaking field changes.
pub const REPORT_VERSION: u32 = 1;

/// Three-valued test outcome.
///
/// `Inconclusive` covers degenerate inputs (zero breaches, single-state
/// transition tables) that must never silently default to a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TestOutcome {
    Pass,
    Fail,
    Inconclusive,
}

impl fmt::Display for TestOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pass => write!(f, "PASS"),
            Self::Fail => write!(f, "FAIL"),
            Self::Inconclusive => write!(f, "INCONCLUSIVE"),
        }
    }
}

/// Result record for a single statistical test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestReport {
    pub report_version: u32,
    /// Stable test identifier ("kupiec_pof", "christoffersen_ind", ...).
    pub test_name: String,
    /// Likelihood-ratio statistic; NaN-free (0.0 when inconclusive).
    pub statistic: f64,
    /// Chi-square tail probability of the statistic (1.0 when inconclusive).
    pub p_value: f64,
    pub outcome: TestOutcome,
    pub breach_count: usize,
    pub sample_size: usize,
}

impl TestReport {
    /// An inconclusive report for a degenerate input.
    #[must_use]
    pub fn inconclusive(test_name: &str, breach_count: usize, sample_size: usize) -> Self {
        Self {
            report_version: REPORT_VERSION,
            test_name: test_name.to_string(),
            statistic: 0.0,
            p_value: 1.0,
            outcome: TestOutcome::Inconclusive,
            breach_count,
            sample_size,
        }
    }
}

/// Aggregated suite report over one series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuiteReport {
    pub report_version: u32,
    pub confidence: f64,
    pub breach_count: usize,
    pub sample_size: usize,
    pub tests: Vec<TestReport>,
}

impl SuiteReport {
    #[must_use]
    pub fn new(
        confidence: f64,
        breach_count: usize,
        sample_size: usize,
        tests: Vec<TestReport>,
    ) -> Self {
        Self {
            report_version: REPORT_VERSION,
            confidence,
            breach_count,
            sample_size,
            tests,
        }
    }

    /// Look up a test report by its stable name.
    pub fn test(&self, name: &str) -> Option<&TestReport> {
        self.tests.iter().find(|t| t.test_name == name)
    }

    /// True when every test passed (inconclusive does not count as passing).
    pub fn all_pass(&self) -> bool {
        self.tests.iter().all(|t| t.outcome == TestOutcome::Pass)
    }

    /// Render the suite as JSON for the CI comparator.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Render the suite as a Markdown table for human review.
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "# VaR Validation Suite\n\nConfidence: {:.2}% | Observations: {} | Breaches: {}\n\n",
            self.confidence * 100.0,
            self.sample_size,
            self.breach_count
        ));
        out.push_str("| Test | Statistic | p-value | Result |\n");
        out.push_str("|------|-----------|---------|--------|\n");
        for t in &self.tests {
            out.push_str(&format!(
                "| {} | {:.6} | {:.6} | {} |\n",
                t.test_name, t.statistic, t.p_value, t.outcome
            ));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_suite() -> SuiteReport {
        SuiteReport::new(
            0.99,
            5,
            250,
            vec![TestReport {
                report_version: REPORT_VERSION,
                test_name: "kupiec_pof".to_string(),
                statistic: 1.956810,
                p_value: 0.161776,
                outcome: TestOutcome::Pass,
                breach_count: 5,
                sample_size: 250,
            }],
        )
    }

    #[test]
    fn test_json_round_trip() {
        let suite = sample_suite();
        let json = suite.to_json().unwrap();
        let back: SuiteReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, suite);
    }

    #[test]
    fn test_markdown_contains_rows() {
        let md = sample_suite().to_markdown();
        assert!(md.contains("| kupiec_pof |"));
        assert!(md.contains("PASS"));
    }

    #[test]
    fn test_inconclusive_is_not_pass() {
        let mut suite = sample_suite();
        suite.tests[0].outcome = TestOutcome::Inconclusive;
        assert!(!suite.all_pass());
    }
}
