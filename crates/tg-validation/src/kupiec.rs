//! Kupiec proportion-of-failures (POF) test.
//!
//! Tests whether the observed breach rate x/n is consistent with the model's
//! expected rate p = 1 - confidence:
//!
//! `LR_uc = -2 ln[ (1-p)^(n-x) p^x / (1-x/n)^(n-x) (x/n)^x ]`
//!
//! `LR_uc ~ chi2(1)` under the null of correct unconditional coverage.

use crate::error::{ValidationError, ValidationResult};
use crate::mathx::{chi_square_sf, xlny};
use crate::report::{TestOutcome, TestReport, REPORT_VERSION};
use crate::series::VarSeries;

pub const TEST_NAME: &str = "kupiec_pof";

/// Run the Kupiec POF test at the given significance level.
///
/// Zero breaches and all-breach series are degenerate (the likelihood ratio
/// is undefined or the test has no power) and yield `Inconclusive`.
pub fn kupiec_pof(series: &VarSeries, significance: f64) -> ValidationResult<TestReport> {
    if !(significance > 0.0 && significance < 1.0) {
        return Err(ValidationError::InvalidSignificance(significance));
    }

    let n = series.len();
    let x = series.breach_count();

    if n == 0 || x == 0 || x == n {
        return Ok(TestReport::inconclusive(TEST_NAME, x, n));
    }

    let p = series.expected_breach_rate();
    let nf = n as f64;
    let xf = x as f64;
    let observed = xf / nf;

    // Log-likelihood under the null (rate p) and the alternative (rate x/n).
    let ll_null = xlny(nf - xf, 1.0 - p) + xlny(xf, p);
    let ll_alt = xlny(nf - xf, 1.0 - observed) + xlny(xf, observed);

    let lr_uc = (-2.0 * (ll_null - ll_alt)).max(0.0);
    let p_value = chi_square_sf(lr_uc, 1);

    let outcome = if p_value < significance {
        TestOutcome::Fail
    } else {
        TestOutcome::Pass
    };

    Ok(TestReport {
        report_version: REPORT_VERSION,
        test_name: TEST_NAME.to_string(),
        statistic: lr_uc,
        p_value,
        outcome,
        breach_count: x,
        sample_size: n,
    })
}
