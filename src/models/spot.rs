//! Spot price estimation
//!
//! Prefers the exchange last-trade banner. Without one, the spot is backed out
//! of the chain itself via simplified put-call parity: `S ≈ K + C - P`.

use serde::{Deserialize, Serialize};

use crate::core::{Contract, SpotSource};
use crate::data::parse_last_trade_price;

/// Estimated underlying price and how it was obtained
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpotEstimate {
    pub spot: f64,
    pub source: SpotSource,
    /// Call/put mid pairs behind a parity estimate
    pub pairs: usize,
}

/// Determine spot from the last-trade banner, falling back to parity.
///
/// A banner that does not yield a positive price is treated as absent.
pub fn estimate_spot(last_trade: Option<&str>, contracts: &[Contract]) -> SpotEstimate {
    if let Some(banner) = last_trade {
        let price = parse_last_trade_price(banner);
        if price > 0.0 {
            return SpotEstimate {
                spot: price,
                source: SpotSource::LastTrade,
                pairs: 0,
            };
        }
        tracing::debug!("Last trade banner {:?} has no price, using parity", banner);
    }

    let (spot, pairs) = estimate_spot_from_put_call_parity(contracts);
    let source = if pairs > 0 {
        SpotSource::PutCallParity
    } else if contracts.is_empty() {
        SpotSource::Unavailable
    } else {
        SpotSource::MiddleStrike
    };

    SpotEstimate { spot, source, pairs }
}

/// Spot implied by put-call parity, with the number of pairs used.
///
/// Every contract with both mids positive gives `strike + call_mid - put_mid`;
/// positive values are sorted and the element at `len / 2` is returned (the
/// upper-middle one for even counts). With no pairs the strike of the
/// contract at `len / 2` is used instead, and an empty chain yields `(0, 0)`.
pub fn estimate_spot_from_put_call_parity(contracts: &[Contract]) -> (f64, usize) {
    let mut implied: Vec<f64> = contracts
        .iter()
        .filter(|c| c.call_mid > 0.0 && c.put_mid > 0.0)
        .map(|c| c.strike + c.call_mid - c.put_mid)
        .filter(|s| *s > 0.0)
        .collect();

    if implied.is_empty() {
        let fallback = contracts
            .get(contracts.len() / 2)
            .map(|c| c.strike)
            .unwrap_or(0.0);
        return (fallback, 0);
    }

    implied.sort_by(|a, b| a.total_cmp(b));
    let pairs = implied.len();

    (middle_by_index(&implied), pairs)
}

/// `sorted[len / 2]`; not an average of the two middles for even lengths
fn middle_by_index(sorted: &[f64]) -> f64 {
    sorted[sorted.len() / 2]
}
