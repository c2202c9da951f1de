//! Probability, volatility, tail and skew metrics
//!
//! All functions are pure reads over contracts (with IVs already solved) and
//! CDF points. Missing inputs degrade to zero rather than erroring.

use crate::core::{
    CDFPoint, Contract, IvMetrics, ProbabilityBlock, SkewMetrics, TailRisk,
};
use crate::models::interpolate_cdf;

/// Move thresholds for the gain/loss probabilities
const THRESHOLDS: [f64; 3] = [0.05, 0.10, 0.15];

/// Directional probabilities from the constant-ATM-IV CDF.
///
/// `gain_x = 1 - CDF(S * (1 + x))`, `loss_x = CDF(S * (1 - x))`, and at the
/// spot itself `gain_0 + loss_0 == 1`.
pub fn probability_block(cdf: &[CDFPoint], spot: f64, rate: f64, div: f64) -> ProbabilityBlock {
    let at_spot = interpolate_cdf(cdf, spot);
    let gain = |x: f64| 1.0 - interpolate_cdf(cdf, spot * (1.0 + x));
    let loss = |x: f64| interpolate_cdf(cdf, spot * (1.0 - x));
    let [t5, t10, t15] = THRESHOLDS;

    ProbabilityBlock {
        gain_0: 1.0 - at_spot,
        gain_5: gain(t5),
        gain_10: gain(t10),
        gain_15: gain(t15),
        loss_0: at_spot,
        loss_5: loss(t5),
        loss_10: loss(t10),
        loss_15: loss(t15),
        expected_return_pct: expected_return_pct(&[], rate, div),
    }
}

/// Zeroed probabilities for chains too thin to analyze.
///
/// The risk-neutral drift does not depend on the chain and is still reported.
pub fn degraded_probability_block(rate: f64, div: f64) -> ProbabilityBlock {
    ProbabilityBlock {
        expected_return_pct: expected_return_pct(&[], rate, div),
        ..Default::default()
    }
}

/// Expected return in percent: always `(r - q) * 100`.
///
/// The chain is accepted but not read. Deriving the drift from the CDF would
/// import smile bias, so the theoretical risk-neutral return is used instead.
pub fn expected_return_pct(_contracts: &[Contract], rate: f64, div: f64) -> f64 {
    (rate - div) * 100.0
}

fn nearest_to<'a, I>(contracts: I, target: f64) -> Option<&'a Contract>
where
    I: Iterator<Item = &'a Contract>,
{
    contracts.min_by(|a, b| (a.strike - target).abs().total_cmp(&(b.strike - target).abs()))
}

/// ATM IV in percent: mean of the positive call/put IVs of the contract
/// nearest to spot.
///
/// Contracts with no IV on either side are skipped, so an illiquid strike at
/// the money falls through to the same contract the constant-IV CDF uses.
pub fn atm_iv_pct(contracts: &[Contract], spot: f64) -> f64 {
    let solved = contracts.iter().filter(|c| c.call_iv > 0.0 || c.put_iv > 0.0);
    let Some(atm) = nearest_to(solved, spot) else {
        return 0.0;
    };

    let ivs: Vec<f64> = [atm.call_iv, atm.put_iv]
        .into_iter()
        .filter(|iv| *iv > 0.0)
        .collect();

    if ivs.is_empty() {
        0.0
    } else {
        ivs.iter().sum::<f64>() / ivs.len() as f64 * 100.0
    }
}

/// `(put IV near 90% of spot - call IV near 110% of spot) * 100`.
///
/// Each side uses the nearest strike that has an IV on that side; `0` if
/// either side has none.
pub fn iv_skew(contracts: &[Contract], spot: f64) -> f64 {
    let put = nearest_to(contracts.iter().filter(|c| c.put_iv > 0.0), spot * 0.9);
    let call = nearest_to(contracts.iter().filter(|c| c.call_iv > 0.0), spot * 1.1);

    match (put, call) {
        (Some(p), Some(c)) => (p.put_iv - c.call_iv) * 100.0,
        _ => 0.0,
    }
}

/// Expiry bucket label
pub fn term_label(days_to_expiry: f64) -> &'static str {
    if days_to_expiry <= 7.0 {
        "Weekly"
    } else if days_to_expiry <= 45.0 {
        "Monthly"
    } else if days_to_expiry <= 120.0 {
        "Quarterly"
    } else {
        "Long-dated"
    }
}

pub fn iv_metrics(contracts: &[Contract], spot: f64, days_to_expiry: f64) -> IvMetrics {
    let atm = atm_iv_pct(contracts, spot);

    IvMetrics {
        atm_iv_pct: atm,
        iv_skew: iv_skew(contracts, spot),
        vix_equivalent: atm,
        term_label: term_label(days_to_expiry).to_string(),
    }
}

/// Tail statistics taken by index over the distribution's strikes.
///
/// The 5th/95th percentile strikes sit at `len / 20` and `len * 19 / 20`; the
/// expected shortfall averages the first `max(len / 20, 1)` strikes. All are
/// reported as percent deviation from spot.
pub fn tail_risk(points: &[CDFPoint], spot: f64) -> TailRisk {
    let n = points.len();
    if n == 0 || spot <= 0.0 {
        return TailRisk::default();
    }

    let deviation = |strike: f64| (strike - spot) / spot * 100.0;

    let p5 = n / 20;
    let p95 = (n * 19 / 20).min(n - 1);
    let left_tail_pct = deviation(points[p5].strike);
    let right_tail_pct = deviation(points[p95].strike);

    let bottom = &points[..(n / 20).max(1)];
    let shortfall = bottom.iter().map(|p| p.strike).sum::<f64>() / bottom.len() as f64;

    let kurtosis_proxy = if right_tail_pct > 0.0 {
        left_tail_pct.abs() / right_tail_pct
    } else {
        0.0
    };

    TailRisk {
        left_tail_pct,
        right_tail_pct,
        expected_shortfall_pct: deviation(shortfall),
        kurtosis_proxy,
    }
}

/// Risk reversal and butterfly.
///
/// The risk reversal scans ascending for the first put below 90% of spot and
/// the first call above 110% of spot that carry an IV. The butterfly needs a
/// contract on each side of the middle one.
pub fn skew_metrics(contracts: &[Contract], spot: f64) -> SkewMetrics {
    let put = contracts.iter().find(|c| c.strike < spot * 0.9 && c.put_iv > 0.0);
    let call = contracts.iter().find(|c| c.strike > spot * 1.1 && c.call_iv > 0.0);

    let risk_reversal = match (put, call) {
        (Some(p), Some(c)) => (p.put_iv - c.call_iv) * 100.0,
        _ => 0.0,
    };

    let mid = contracts.len() / 2;
    let butterfly = if mid >= 1 && mid + 1 < contracts.len() {
        contracts[mid - 1].call_mid - 2.0 * contracts[mid].call_mid + contracts[mid + 1].call_mid
    } else {
        0.0
    };

    SkewMetrics {
        risk_reversal,
        butterfly,
    }
}

/// Total put open interest over total call open interest, `0` without call OI
pub fn put_call_ratio(contracts: &[Contract]) -> f64 {
    let call_oi: f64 = contracts.iter().map(|c| c.call_open_interest).sum();
    let put_oi: f64 = contracts.iter().map(|c| c.put_open_interest).sum();

    if call_oi > 0.0 {
        put_oi / call_oi
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{build_cdf_with_constant_iv, find_atm_iv};

    const R: f64 = 0.04;
    const Q: f64 = 0.012;

    fn with_ivs(strike: f64, call_iv: f64, put_iv: f64) -> Contract {
        Contract {
            strike,
            call_iv,
            put_iv,
            ..Default::default()
        }
    }

    #[test]
    fn test_probability_block() {
        let strikes: Vec<f64> = (0..41).map(|i| 60.0 + i as f64 * 2.0).collect();
        let cdf = build_cdf_with_constant_iv(&strikes, 100.0, R, Q, 0.2, 1.0);

        let block = probability_block(&cdf, 100.0, R, Q);

        assert_eq!(block.gain_0 + block.loss_0, 1.0);
        let gains = [block.gain_15, block.gain_10, block.gain_5, block.gain_0];
        let losses = [block.loss_15, block.loss_10, block.loss_5, block.loss_0];
        assert!(gains.windows(2).all(|w| w[0] < w[1]));
        assert!(losses.windows(2).all(|w| w[0] < w[1]));
        for p in gains.iter().chain(losses.iter()) {
            assert!((0.0..=1.0).contains(p));
        }
        assert!((block.expected_return_pct - 2.8).abs() < 1e-12);
    }

    #[test]
    fn test_probability_block_empty_cdf() {
        let block = probability_block(&[], 100.0, R, Q);
        assert_eq!(block.gain_0, 0.5);
        assert_eq!(block.loss_0, 0.5);
    }

    #[test]
    fn test_degraded_block() {
        let block = degraded_probability_block(R, Q);
        assert_eq!(block.gain_0, 0.0);
        assert_eq!(block.loss_15, 0.0);
        assert!((block.expected_return_pct - 2.8).abs() < 1e-12);
    }

    #[test]
    fn test_expected_return_ignores_chain() {
        let expected = (R - Q) * 100.0;
        let adversarial = vec![
            Contract {
                strike: 1e9,
                call_mid: f64::MAX,
                put_mid: -1.0,
                call_iv: 99.0,
                ..Default::default()
            };
            10
        ];

        assert_eq!(expected_return_pct(&[], R, Q), expected);
        assert_eq!(expected_return_pct(&adversarial, R, Q), expected);
        assert_eq!(expected_return_pct(&[with_ivs(100.0, 0.2, 0.2)], R, Q), expected);
    }

    #[test]
    fn test_atm_iv_pct() {
        let contracts = vec![
            with_ivs(95.0, 0.0, 0.25),
            with_ivs(100.0, 0.22, 0.20),
            with_ivs(105.0, 0.18, 0.0),
        ];

        assert!((atm_iv_pct(&contracts, 100.4) - 21.0).abs() < 1e-9);
        assert!((atm_iv_pct(&contracts, 96.0) - 25.0).abs() < 1e-9);
        assert_eq!(atm_iv_pct(&[with_ivs(100.0, 0.0, 0.0)], 100.0), 0.0);
        assert_eq!(atm_iv_pct(&[], 100.0), 0.0);
    }

    #[test]
    fn test_atm_iv_skips_unsolved_strike() {
        // The at-the-money strike failed the liquidity gate; its neighbours solved
        let contracts = vec![
            with_ivs(95.0, 0.0, 0.24),
            with_ivs(100.0, 0.0, 0.0),
            with_ivs(105.0, 0.19, 0.0),
        ];

        let reported = atm_iv_pct(&contracts, 100.0);
        assert!((reported - 24.0).abs() < 1e-9);
        assert!((reported - find_atm_iv(&contracts, 100.0) * 100.0).abs() < 1e-9);

        let metrics = iv_metrics(&contracts, 100.0, 30.0);
        assert_eq!(metrics.vix_equivalent, metrics.atm_iv_pct);
    }

    #[test]
    fn test_iv_skew() {
        let contracts = vec![
            with_ivs(85.0, 0.0, 0.32),
            with_ivs(90.0, 0.0, 0.28),
            with_ivs(100.0, 0.0, 0.20),
            with_ivs(110.0, 0.17, 0.0),
            with_ivs(115.0, 0.16, 0.0),
        ];

        assert!((iv_skew(&contracts, 100.0) - 11.0).abs() < 1e-9);
        assert_eq!(iv_skew(&contracts[..3], 100.0), 0.0);
    }

    #[test]
    fn test_term_label() {
        assert_eq!(term_label(0.0), "Weekly");
        assert_eq!(term_label(7.0), "Weekly");
        assert_eq!(term_label(30.0), "Monthly");
        assert_eq!(term_label(90.0), "Quarterly");
        assert_eq!(term_label(400.0), "Long-dated");
    }

    #[test]
    fn test_tail_risk_by_index() {
        // 40 strikes 80..119 around spot 100
        let points: Vec<CDFPoint> = (0..40)
            .map(|i| CDFPoint::new(80.0 + i as f64, i as f64 / 40.0))
            .collect();

        let tail = tail_risk(&points, 100.0);

        // index 2 -> 82, index 38 -> 118
        assert!((tail.left_tail_pct + 18.0).abs() < 1e-9);
        assert!((tail.right_tail_pct - 18.0).abs() < 1e-9);
        // mean of 80, 81
        assert!((tail.expected_shortfall_pct + 19.5).abs() < 1e-9);
        assert!((tail.kurtosis_proxy - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_tail_risk_small_and_empty() {
        assert_eq!(tail_risk(&[], 100.0), TailRisk::default());

        let points = vec![CDFPoint::new(90.0, 0.2), CDFPoint::new(95.0, 0.4)];
        let tail = tail_risk(&points, 100.0);

        assert!((tail.left_tail_pct + 10.0).abs() < 1e-9);
        assert!((tail.right_tail_pct + 5.0).abs() < 1e-9);
        assert!((tail.expected_shortfall_pct + 10.0).abs() < 1e-9);
        // right tail below spot
        assert_eq!(tail.kurtosis_proxy, 0.0);
    }

    #[test]
    fn test_risk_reversal_first_match() {
        let contracts = vec![
            with_ivs(80.0, 0.0, 0.35),
            with_ivs(85.0, 0.0, 0.30),
            with_ivs(100.0, 0.0, 0.20),
            with_ivs(112.0, 0.16, 0.0),
            with_ivs(120.0, 0.15, 0.0),
        ];

        let skew = skew_metrics(&contracts, 100.0);
        // 80-strike put (first below 90) minus 112-strike call (first above 110)
        assert!((skew.risk_reversal - 19.0).abs() < 1e-9);
    }

    #[test]
    fn test_butterfly() {
        let contracts: Vec<Contract> = [(90.0, 12.0), (100.0, 5.0), (110.0, 1.0)]
            .iter()
            .map(|&(strike, mid)| Contract {
                strike,
                call_mid: mid,
                ..Default::default()
            })
            .collect();

        let skew = skew_metrics(&contracts, 100.0);
        assert_eq!(skew.butterfly, 3.0);
        assert_eq!(skew.risk_reversal, 0.0);

        assert_eq!(skew_metrics(&contracts[..2], 100.0).butterfly, 0.0);
    }

    #[test]
    fn test_put_call_ratio() {
        let contracts = vec![
            Contract {
                call_open_interest: 100.0,
                put_open_interest: 150.0,
                ..Default::default()
            },
            Contract {
                call_open_interest: 300.0,
                put_open_interest: 50.0,
                ..Default::default()
            },
        ];

        assert!((put_call_ratio(&contracts) - 0.5).abs() < 1e-12);

        let no_calls = vec![Contract {
            put_open_interest: 10.0,
            ..Default::default()
        }];
        assert_eq!(put_call_ratio(&no_calls), 0.0);
    }
}
