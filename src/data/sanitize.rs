//! Quote sanitization
//!
//! Upstream chain fields arrive as loosely formatted text (`"$12.50"`,
//! `"1.5%"`, `"--"`, `"N/A"`). Everything here is total: bad input becomes
//! `0.0`, never an error.

use std::sync::LazyLock;

use regex::Regex;

/// Placeholders that mean "no value"
const EMPTY_MARKERS: [&str; 3] = ["", "--", "N/A"];

/// Leading decimal float; an exponent only counts with at least one digit
static LEADING_FLOAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?").expect("valid float pattern")
});

/// Text after the first `$`, up to whitespace or `(`
static LAST_TRADE_PRICE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$([^\s(]*)").expect("valid price pattern"));

/// Parse a numeric quote field.
///
/// Strips every `$` and `%`, trims whitespace, maps the empty markers to `0`,
/// then parses the leading floating-point token. Trailing text is ignored.
pub fn parse_numeric(s: &str) -> f64 {
    let cleaned = s.replace(['$', '%'], "");
    let cleaned = cleaned.trim();

    if EMPTY_MARKERS.contains(&cleaned) {
        return 0.0;
    }

    leading_float(cleaned).unwrap_or(0.0)
}

/// Parse the dollar price out of an exchange last-trade banner.
///
/// `"LAST TRADE: $663.32 (AS OF OCT 16, 2025 1:39 PM ET)"` → `663.32`.
/// Returns `0` when there is no `$` or nothing numeric follows it.
pub fn parse_last_trade_price(s: &str) -> f64 {
    LAST_TRADE_PRICE
        .captures(s)
        .and_then(|caps| caps.get(1))
        .and_then(|m| leading_float(m.as_str()))
        .unwrap_or(0.0)
}

fn leading_float(s: &str) -> Option<f64> {
    LEADING_FLOAT
        .find(s)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|v| v.is_finite())
}
