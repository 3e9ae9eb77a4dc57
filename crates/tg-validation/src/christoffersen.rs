//! Christoffersen independence and conditional coverage tests.
//!
//! The independence test (LR-IND) builds a first-order Markov transition
//! count table over the breach indicator sequence and tests whether the
//! breach probability depends on the prior day's state (clustering). The
//! conditional coverage test combines it with Kupiec POF:
//! `LR_cc = LR_uc + LR_ind ~ chi2(2)`.

use crate::error::{ValidationError, ValidationResult};
use crate::kupiec::kupiec_pof;
use crate::mathx::{chi_square_sf, xlny};
use crate::report::{TestOutcome, TestReport, REPORT_VERSION};
use crate::series::VarSeries;

pub const IND_TEST_NAME: &str = "christoffersen_ind";
pub const CC_TEST_NAME: &str = "christoffersen_cc";

/// First-order Markov transition counts over the breach indicator sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
struct TransitionTable {
    n00: f64,
    n01: f64,
    n10: f64,
    n11: f64,
}

impl TransitionTable {
    fn from_indicators(indicators: &[bool]) -> Self {
        let mut t = Self {
            n00: 0.0,
            n01: 0.0,
            n10: 0.0,
            n11: 0.0,
        };
        for w in indicators.windows(2) {
            match (w[0], w[1]) {
                (false, false) => t.n00 += 1.0,
                (false, true) => t.n01 += 1.0,
                (true, false) => t.n10 += 1.0,
                (true, true) => t.n11 += 1.0,
            }
        }
        t
    }

    fn total(&self) -> f64 {
        self.n00 + self.n01 + self.n10 + self.n11
    }
}

/// Run the Christoffersen independence test.
///
/// Degenerate tables (no breaches, all breaches, or fewer than two
/// observations) are `Inconclusive`: there is no clustering structure to
/// test.
pub fn christoffersen_ind(series: &VarSeries, significance: f64) -> ValidationResult<TestReport> {
    if !(significance > 0.0 && significance < 1.0) {
        return Err(ValidationError::InvalidSignificance(significance));
    }

    let n = series.len();
    let x = series.breach_count();

    if n < 2 || x == 0 || x == n {
        return Ok(TestReport::inconclusive(IND_TEST_NAME, x, n));
    }

    let indicators = series.breach_indicators();
    let t = TransitionTable::from_indicators(&indicators);
    let total = t.total();

    // Unconditional breach probability over transitions.
    let pi = (t.n01 + t.n11) / total;
    // State-conditional breach probabilities.
    let from_zero = t.n00 + t.n01;
    let from_one = t.n10 + t.n11;

    if from_zero == 0.0 || from_one == 0.0 || pi == 0.0 || pi == 1.0 {
        // All transitions start from one state: the conditional model is not
        // identified.
        return Ok(TestReport::inconclusive(IND_TEST_NAME, x, n));
    }

    let pi01 = t.n01 / from_zero;
    let pi11 = t.n11 / from_one;

    // Null: breach probability independent of prior state.
    let ll_null = xlny(t.n00 + t.n10, 1.0 - pi) + xlny(t.n01 + t.n11, pi);
    // Alternative: first-order Markov with state-dependent probabilities.
    let ll_alt = xlny(t.n00, 1.0 - pi01)
        + xlny(t.n01, pi01)
        + xlny(t.n10, 1.0 - pi11)
        + xlny(t.n11, pi11);

    // The ratio is non-negative by construction; rounding can leave a tiny
    // negative residue when the conditional rates coincide.
    let lr_ind = (-2.0 * (ll_null - ll_alt)).max(0.0);
    let p_value = chi_square_sf(lr_ind, 1);

    let outcome = if p_value < significance {
        TestOutcome::Fail
    } else {
        TestOutcome::Pass
    };

    Ok(TestReport {
        report_version: REPORT_VERSION,
        test_name: IND_TEST_NAME.to_string(),
        statistic: lr_ind,
        p_value,
        outcome,
        breach_count: x,
        sample_size: n,
    })
}

/// Run the conditional coverage test: joint correctness of the breach rate
/// and absence of clustering.
pub fn christoffersen_cc(series: &VarSeries, significance: f64) -> ValidationResult<TestReport> {
    let pof = kupiec_pof(series, significance)?;
    let ind = christoffersen_ind(series, significance)?;

    let x = series.breach_count();
    let n = series.len();

    if pof.outcome == TestOutcome::Inconclusive || ind.outcome == TestOutcome::Inconclusive {
        return Ok(TestReport::inconclusive(CC_TEST_NAME, x, n));
    }

    let lr_cc = pof.statistic + ind.statistic;
    let p_value = chi_square_sf(lr_cc, 2);

    let outcome = if p_value < significance {
        TestOutcome::Fail
    } else {
        TestOutcome::Pass
    };

    Ok(TestReport {
        report_version: REPORT_VERSION,
        test_name: CC_TEST_NAME.to_string(),
        statistic: lr_cc,
        p_value,
        outcome,
        breach_count: x,
        sample_size: n,
    })
}
