//! Chain filtering
//!
//! Turns raw rows into the sorted, strike-unique contract list and provides
//! the liquidity predicate shared by the IV stage and the diagnostics.

use crate::core::{Contract, OptionType, RawQuoteRow, RiskError, RiskResult};

use super::sanitize::parse_numeric;

/// Sanitize and filter raw rows into contracts sorted ascending by strike.
///
/// A row is dropped when its strike is empty, `"null"` or not positive, or
/// when all four of call bid/ask and put bid/ask are zero. If two rows share a
/// strike the first one wins. An empty result is fatal.
pub fn build_contracts(rows: &[RawQuoteRow]) -> RiskResult<Vec<Contract>> {
    let mut contracts: Vec<Contract> = rows.iter().filter_map(contract_from_row).collect();

    if contracts.is_empty() {
        return Err(RiskError::NoValidOptionsData);
    }

    // Stable sort keeps upstream order among duplicates
    contracts.sort_by(|a, b| a.strike.total_cmp(&b.strike));
    contracts.dedup_by(|later, earlier| later.strike == earlier.strike);

    tracing::debug!(
        "Kept {} of {} chain rows as contracts",
        contracts.len(),
        rows.len()
    );

    Ok(contracts)
}

fn contract_from_row(row: &RawQuoteRow) -> Option<Contract> {
    let strike_text = row.strike.trim();
    if strike_text.is_empty() || strike_text == "null" {
        return None;
    }

    let strike = parse_numeric(strike_text);
    if strike <= 0.0 {
        return None;
    }

    let call_bid = parse_numeric(&row.call_bid);
    let call_ask = parse_numeric(&row.call_ask);
    let put_bid = parse_numeric(&row.put_bid);
    let put_ask = parse_numeric(&row.put_ask);

    if call_bid == 0.0 && call_ask == 0.0 && put_bid == 0.0 && put_ask == 0.0 {
        return None;
    }

    let mut contract = Contract::from_quotes(strike, call_bid, call_ask, put_bid, put_ask);
    contract.call_volume = parse_numeric(&row.call_volume);
    contract.put_volume = parse_numeric(&row.put_volume);
    contract.call_open_interest = parse_numeric(&row.call_open_interest);
    contract.put_open_interest = parse_numeric(&row.put_open_interest);

    Some(contract)
}

/// Liquidity predicate on the out-of-the-money side.
///
/// Uses the put for `strike <= spot`, the call otherwise. Liquid iff
/// `mid >= min_price` and `(ask - bid) / mid <= max_spread_ratio`.
pub fn is_liquid(contract: &Contract, spot: f64, min_price: f64, max_spread_ratio: f64) -> bool {
    let (bid, ask, mid) = contract.side(OptionType::otm_side(contract.strike, spot));

    mid >= min_price && (ask - bid) / mid <= max_spread_ratio
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(strike: &str, cb: &str, ca: &str, pb: &str, pa: &str) -> RawQuoteRow {
        RawQuoteRow::quoted(strike, cb, ca, pb, pa)
    }

    #[test]
    fn test_skips_bad_strikes_and_empty_quotes() {
        let rows = vec![
            row("", "1", "2", "1", "2"),
            row("null", "1", "2", "1", "2"),
            row("abc", "1", "2", "1", "2"),
            row("100", "--", "N/A", "", "0"),
            row("105", "1.00", "1.20", "--", "--"),
        ];

        let contracts = build_contracts(&rows).unwrap();
        assert_eq!(contracts.len(), 1);
        assert_eq!(contracts[0].strike, 105.0);
        assert!((contracts[0].call_mid - 1.1).abs() < 1e-12);
        assert_eq!(contracts[0].put_mid, 0.0);
    }

    #[test]
    fn test_sorted_and_unique() {
        let rows = vec![
            row("110", "1", "2", "5", "6"),
            row("$90.00", "11", "12", "1", "2"),
            row("100", "4", "5", "3", "4"),
            row("100", "9", "9", "9", "9"),
        ];

        let contracts = build_contracts(&rows).unwrap();
        let strikes: Vec<f64> = contracts.iter().map(|c| c.strike).collect();
        assert_eq!(strikes, vec![90.0, 100.0, 110.0]);

        // First row for a duplicated strike wins
        assert_eq!(contracts[1].call_bid, 4.0);
    }

    #[test]
    fn test_volume_and_open_interest() {
        let rows = vec![row("100", "1", "2", "1", "2")
            .with_volume("150", "--")
            .with_open_interest("1200", "$800")];

        let contracts = build_contracts(&rows).unwrap();
        assert_eq!(contracts[0].call_volume, 150.0);
        assert_eq!(contracts[0].put_volume, 0.0);
        assert_eq!(contracts[0].call_open_interest, 1200.0);
        assert_eq!(contracts[0].put_open_interest, 800.0);
    }

    #[test]
    fn test_no_valid_rows_is_fatal() {
        let rows = vec![row("", "1", "2", "3", "4"), row("100", "", "", "", "")];

        assert!(matches!(
            build_contracts(&rows),
            Err(RiskError::NoValidOptionsData)
        ));
        assert!(matches!(
            build_contracts(&[]),
            Err(RiskError::NoValidOptionsData)
        ));
    }

    #[test]
    fn test_liquidity_side_selection() {
        // Tight put, wide call
        let c = Contract::from_quotes(100.0, 0.5, 1.5, 2.0, 2.1);

        // strike == spot uses the put
        assert!(is_liquid(&c, 100.0, 0.05, 0.35));
        // strike above spot uses the call: spread 1.0 / mid 1.0
        assert!(!is_liquid(&c, 99.0, 0.05, 0.35));
    }

    #[test]
    fn test_liquidity_thresholds() {
        let cheap = Contract::from_quotes(120.0, 0.01, 0.03, 0.0, 0.0);
        assert!(!is_liquid(&cheap, 100.0, 0.05, 0.35));

        let empty = Contract::from_quotes(120.0, 0.0, 0.0, 1.0, 1.0);
        assert!(!is_liquid(&empty, 100.0, 0.0, 0.35));

        let edge = Contract::from_quotes(120.0, 0.85, 1.15, 0.0, 0.0);
        // spread 0.30 / mid 1.0
        assert!(is_liquid(&edge, 100.0, 0.05, 0.30 + 1e-12));
    }
}
