//! VaR backtest validation suite.
//!
//! Statistical backtests over a series of `(actual_return, var_estimate)`
//! pairs at a chosen confidence level:
//! - Kupiec proportion-of-failures (POF) likelihood-ratio test
//! - Christoffersen independence test (IND)
//! - Christoffersen conditional coverage test (CC = POF + IND)
//!
//! The chi-square tail probability is implemented locally (ln-gamma plus the
//! regularized incomplete gamma function) so results are bit-for-bit
//! comparable across toolchains without pulling in a numerics dependency.
//!
//! Degenerate inputs (zero breaches, all-breach series, single-state
//! transition tables) are reported as `Inconclusive`, never defaulted to a
//! pass.

pub mod christoffersen;
pub mod error;
pub mod kupiec;
pub mod mathx;
pub mod regression;
pub mod report;
pub mod series;

pub use christoffersen::{christoffersen_cc, christoffersen_ind};
pub use error::{ValidationError, ValidationResult};
pub use kupiec::kupiec_pof;
pub use regression::{compare_suites, Regression};
pub use report::{SuiteReport, TestOutcome, TestReport, REPORT_VERSION};
pub use series::{VarObservation, VarSeries};

/// Default significance level for all three tests (5%).
///
/// chi2(1) critical value at this level is ~3.841, chi2(2) ~5.991.
pub const DEFAULT_SIGNIFICANCE: f64 = 0.05;

/// Run the full suite over one series and aggregate into a report.
pub fn run_suite(series: &VarSeries, significance: f64) -> ValidationResult<SuiteReport> {
    if series.is_empty() {
        return Err(ValidationError::EmptySeries);
    }

    let pof = kupiec_pof(series, significance)?;
    let ind = christoffersen_ind(series, significance)?;
    let cc = christoffersen_cc(series, significance)?;

    tracing::debug!(
        breaches = series.breach_count(),
        n = series.len(),
        pof = ?pof.outcome,
        ind = ?ind.outcome,
        cc = ?cc.outcome,
        "validation suite complete"
    );

    Ok(SuiteReport::new(
        series.confidence(),
        series.breach_count(),
        series.len(),
        vec![pof, ind, cc],
    ))
}
