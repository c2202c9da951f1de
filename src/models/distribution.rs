//! Risk-neutral distribution of the terminal price
//!
//! Under Black-Scholes, `P(S_T < K) = N(-d2)`. Two constructions are kept
//! side by side because they answer different questions:
//!
//! - [`build_cdf_from_ivs`] uses each strike's own OTM implied vol, so the
//!   distribution carries the smile. It feeds tail and skew diagnostics. With
//!   a steep smile neighbouring points are not guaranteed to be ordered.
//! - [`build_constant_atm_cdf`] applies the single ATM implied vol to every
//!   strike. This throws away the smile on purpose: directional gain/loss
//!   probabilities then carry no skew bias, and the CDF is monotone by
//!   construction because `d2` falls as the strike rises.

use crate::core::{CDFPoint, Contract};

use super::black_scholes::{d2, norm_cdf};

/// Smile-aware CDF: one point per contract with a usable OTM-side IV.
pub fn build_cdf_from_ivs(
    contracts: &[Contract],
    spot: f64,
    rate: f64,
    div: f64,
    time: f64,
) -> Vec<CDFPoint> {
    if time <= 0.0 || spot <= 0.0 {
        return Vec::new();
    }

    contracts
        .iter()
        .filter_map(|c| {
            let iv = c.otm_iv(spot);
            if iv <= 0.0 {
                return None;
            }
            let d2 = d2(spot, c.strike, rate, div, iv, time);
            Some(CDFPoint::new(c.strike, norm_cdf(-d2)))
        })
        .collect()
}

/// IV of the contract nearest to spot, using the put at or below spot and the
/// call above it.
///
/// Contracts without a usable OTM-side IV are skipped; ties go to the lower
/// strike. Returns `0.0` when no contract qualifies.
pub fn find_atm_iv(contracts: &[Contract], spot: f64) -> f64 {
    contracts
        .iter()
        .filter(|c| c.otm_iv(spot) > 0.0)
        .min_by(|a, b| (a.strike - spot).abs().total_cmp(&(b.strike - spot).abs()))
        .map(|c| c.otm_iv(spot))
        .unwrap_or(0.0)
}

/// Constant-ATM-IV CDF over every contract strike.
///
/// Empty when no ATM IV is available.
pub fn build_constant_atm_cdf(
    contracts: &[Contract],
    spot: f64,
    rate: f64,
    div: f64,
    time: f64,
) -> Vec<CDFPoint> {
    let atm_iv = find_atm_iv(contracts, spot);
    if atm_iv <= 0.0 {
        tracing::warn!("No ATM implied vol near spot {:.2}; distribution is empty", spot);
        return Vec::new();
    }

    let strikes: Vec<f64> = contracts.iter().map(|c| c.strike).collect();
    build_cdf_with_constant_iv(&strikes, spot, rate, div, atm_iv, time)
}

/// CDF over the given strikes with one volatility for all of them.
pub fn build_cdf_with_constant_iv(
    strikes: &[f64],
    spot: f64,
    rate: f64,
    div: f64,
    vol: f64,
    time: f64,
) -> Vec<CDFPoint> {
    if vol <= 0.0 || time <= 0.0 || spot <= 0.0 {
        return Vec::new();
    }

    strikes
        .iter()
        .map(|&k| CDFPoint::new(k, norm_cdf(-d2(spot, k, rate, div, vol, time))))
        .collect()
}

/// Evaluate a CDF at `target` by linear interpolation.
///
/// - no points: `0.5`
/// - one point: `0.0` below it, `1.0` at or above it
/// - otherwise `0.0` below the first strike, `1.0` above the last, linear in
///   between
pub fn interpolate_cdf(points: &[CDFPoint], target: f64) -> f64 {
    match points {
        [] => 0.5,
        [only] => {
            if target < only.strike {
                0.0
            } else {
                1.0
            }
        }
        [first, .., last] => {
            if target < first.strike {
                return 0.0;
            }
            if target > last.strike {
                return 1.0;
            }

            // Last point with strike <= target
            let i = points.partition_point(|p| p.strike <= target) - 1;
            if i + 1 == points.len() {
                return points[i].cdf;
            }

            let (lo, hi) = (points[i], points[i + 1]);
            let width = hi.strike - lo.strike;
            if width <= 0.0 {
                return lo.cdf;
            }

            let frac = (target - lo.strike) / width;
            lo.cdf + frac * (hi.cdf - lo.cdf)
        }
    }
}
