//! Tolerant snapshot parsing.
//!
//! Feed tooling upstream is not schema-stable: snapshots arrive flat
//! (`{"bid": ..., "ask": ...}`) or nested under `book`/`quote`, with numbers
//! sometimes encoded as strings. Every accessor here degrades to `None`
//! instead of failing, so one malformed field never poisons the whole record.

use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;
use tracing::trace;

use tg_core::Money;

use crate::metrics::MicroMetrics;

/// Extract normalized metrics from a raw snapshot for one order attempt.
///
/// `order_notional` is the notional of the order under evaluation; it is
/// carried into the record so depth and ADV checks can be computed against it.
#[must_use]
pub fn extract(raw: &Value, order_notional: Money) -> MicroMetrics {
    let bid = decimal_field(raw, &["bid", "best_bid", "bid_price"]);
    let ask = decimal_field(raw, &["ask", "best_ask", "ask_price"]);

    let (mid, spread_pct) = match (bid, ask) {
        (Some(b), Some(a)) if b > Decimal::ZERO && a > b => {
            let mid = (b + a) / Decimal::TWO;
            (Some(mid), Some((a - b) / mid))
        }
        (Some(_), Some(_)) => {
            // Crossed or non-positive book: prices are reported as seen but
            // no derived metric is trustworthy.
            trace!(?bid, ?ask, "crossed or degenerate book in snapshot");
            (None, None)
        }
        _ => (None, None),
    };

    let slippage_estimate_pct = decimal_field(raw, &["slippage_estimate_pct", "slippage_pct"])
        .or_else(|| spread_pct.map(|s| s / Decimal::TWO));

    let available_depth = money_field(raw, &["available_depth", "depth_notional"]);
    let adv_notional = money_field(raw, &["adv_notional", "adv"]);

    MicroMetrics {
        bid,
        ask,
        mid,
        spread_pct,
        slippage_estimate_pct,
        available_depth,
        order_notional,
        adv_notional,
    }
}

/// Look up the first readable decimal under any of `keys`, checking the top
/// level and then the `book` and `quote` sub-objects.
fn decimal_field(raw: &Value, keys: &[&str]) -> Option<Decimal> {
    for scope in [Some(raw), raw.get("book"), raw.get("quote")] {
        let Some(obj) = scope else { continue };
        for key in keys {
            if let Some(d) = obj.get(*key).and_then(as_decimal) {
                return Some(d);
            }
        }
    }
    None
}

/// Same lookup discipline for integer minor-unit fields.
///
/// Fractional values are treated as unreadable rather than rounded; the gate
/// layer handles the gap via its fail-open rules.
fn money_field(raw: &Value, keys: &[&str]) -> Option<Money> {
    for scope in [Some(raw), raw.get("book"), raw.get("quote")] {
        let Some(obj) = scope else { continue };
        for key in keys {
            if let Some(m) = obj.get(*key).and_then(as_money) {
                return Some(m);
            }
        }
    }
    None
}

fn as_decimal(v: &Value) -> Option<Decimal> {
    match v {
        Value::Number(n) => Decimal::from_str(&n.to_string()).ok(),
        Value::String(s) => Decimal::from_str(s.trim()).ok(),
        _ => None,
    }
}

fn as_money(v: &Value) -> Option<Money> {
    match v {
        Value::Number(n) => n.as_i64().map(Money::from_minor),
        Value::String(s) => s.trim().parse::<i64>().ok().map(Money::from_minor),
        _ => None,
    }
}
