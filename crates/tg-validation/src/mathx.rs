//! Local math primitives for the likelihood-ratio tests.
//!
//! Only three primitives are needed beyond `f64::ln`/`exp`: ln-gamma, the
//! regularized incomplete gamma function, and the chi-square survival
//! function built on them. Implemented here so every target produces the
//! same bits without a numerics dependency.

/// Lanczos approximation coefficients (g = 7, n = 9).
const LANCZOS_G: f64 = 7.0;
const LANCZOS_COEFFS: [f64; 9] = [
    0.999_999_999_999_809_93,
    676.520_368_121_885_1,
    -1_259.139_216_722_402_8,
    771.323_428_777_653_13,
    -176.615_029_162_140_6,
    12.507_343_278_686_905,
    -0.138_571_095_265_720_12,
    9.984_369_578_019_571_6e-6,
    1.505_632_735_149_311_6e-7,
];

const EPS: f64 = 1e-15;
const MAX_ITER: usize = 500;

/// Natural log of the gamma function for x > 0.
pub fn ln_gamma(x: f64) -> f64 {
    if x < 0.5 {
        // Reflection formula.
        let pi = std::f64::consts::PI;
        return (pi / (pi * x).sin()).ln() - ln_gamma(1.0 - x);
    }

    let x = x - 1.0;
    let mut acc = LANCZOS_COEFFS[0];
    for (i, &c) in LANCZOS_COEFFS.iter().enumerate().skip(1) {
        acc += c / (x + i as f64);
    }
    let t = x + LANCZOS_G + 0.5;
    0.5 * (2.0 * std::f64::consts::PI).ln() + (x + 0.5) * t.ln() - t + acc.ln()
}

/// Regularized lower incomplete gamma P(s, x) by series expansion.
///
/// Converges fastest for x < s + 1.
fn gamma_p_series(s: f64, x: f64) -> f64 {
    let mut term = 1.0 / s;
    let mut sum = term;
    let mut a = s;
    for _ in 0..MAX_ITER {
        a += 1.0;
        term *= x / a;
        sum += term;
        if term.abs() < sum.abs() * EPS {
            break;
        }
    }
    sum * (-x + s * x.ln() - ln_gamma(s)).exp()
}

/// Regularized upper incomplete gamma Q(s, x) by continued fraction
/// (modified Lentz), for x >= s + 1.
fn gamma_q_cf(s: f64, x: f64) -> f64 {
    let tiny = 1e-300;
    let mut b = x + 1.0 - s;
    let mut c = 1.0 / tiny;
    let mut d = 1.0 / b;
    let mut h = d;
    for i in 1..=MAX_ITER {
        let an = -(i as f64) * (i as f64 - s);
        b += 2.0;
        d = an * d + b;
        if d.abs() < tiny {
            d = tiny;
        }
        c = b + an / c;
        if c.abs() < tiny {
            c = tiny;
        }
        d = 1.0 / d;
        let delta = d * c;
        h *= delta;
        if (delta - 1.0).abs() < EPS {
            break;
        }
    }
    h * (-x + s * x.ln() - ln_gamma(s)).exp()
}

/// Regularized upper incomplete gamma Q(s, x) for s > 0, x >= 0.
pub fn gamma_q(s: f64, x: f64) -> f64 {
    if x <= 0.0 {
        return 1.0;
    }
    if x < s + 1.0 {
        1.0 - gamma_p_series(s, x)
    } else {
        gamma_q_cf(s, x)
    }
}

/// Chi-square survival function: P(X > x) for X ~ chi2(k).
pub fn chi_square_sf(x: f64, k: u32) -> f64 {
    if x <= 0.0 {
        return 1.0;
    }
    gamma_q(f64::from(k) / 2.0, x / 2.0)
}

/// Chi-square critical values at 5% significance, for reference in reports.
/// Only df 1 and 2 are tabulated; anything else is `None`.
pub fn chi_square_critical_5pct(k: u32) -> Option<f64> {
    match k {
        1 => Some(3.841_458_820_694_124),
        2 => Some(5.991_464_547_107_979),
        _ => None,
    }
}

/// x * ln(y) with the 0 * ln(0) := 0 convention used throughout the
/// likelihood-ratio statistics.
pub fn xlny(x: f64, y: f64) -> f64 {
    if x == 0.0 {
        0.0
    } else {
        x * y.ln()
    }
}
