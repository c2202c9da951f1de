//! Per-contract implied volatility stage
//!
//! Each contract is solved on its out-of-the-money side only, and only when
//! that side passes the liquidity gate. Contracts are independent, so with
//! the `parallel` feature the solve runs on rayon; output order and values
//! are the same either way.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::core::{Contract, OptionType};
use crate::data::is_liquid;
use crate::models::implied_volatility;

use super::RiskConfig;

/// Return a copy of `contracts` with the OTM-side IV filled in.
///
/// The other side's IV, and the OTM side of illiquid contracts, stay `0.0`.
pub fn compute_implied_vols(
    contracts: &[Contract],
    spot: f64,
    time: f64,
    config: &RiskConfig,
) -> Vec<Contract> {
    let solve = |contract: &Contract| solve_contract(contract, spot, time, config);

    #[cfg(feature = "parallel")]
    let solved: Vec<Contract> = contracts.par_iter().map(solve).collect();
    #[cfg(not(feature = "parallel"))]
    let solved: Vec<Contract> = contracts.iter().map(solve).collect();

    tracing::debug!(
        "Solved IV for {} of {} contracts",
        solved.iter().filter(|c| c.otm_iv(spot) > 0.0).count(),
        solved.len()
    );

    solved
}

fn solve_contract(contract: &Contract, spot: f64, time: f64, config: &RiskConfig) -> Contract {
    let mut out = Contract {
        call_iv: 0.0,
        put_iv: 0.0,
        ..*contract
    };

    let liquidity = &config.liquidity;
    if !is_liquid(contract, spot, liquidity.min_mid_price, liquidity.max_spread_ratio) {
        return out;
    }

    let side = OptionType::otm_side(contract.strike, spot);
    let (_, _, mid) = contract.side(side);
    let iv = implied_volatility(
        mid,
        spot,
        contract.strike,
        config.risk_free_rate,
        config.dividend_yield,
        time,
        side,
        &config.solver,
    );

    match side {
        OptionType::Call => out.call_iv = iv,
        OptionType::Put => out.put_iv = iv,
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{bs_call, bs_put};

    fn priced(strike: f64, spot: f64, vol: f64, time: f64, config: &RiskConfig) -> Contract {
        let (r, q) = (config.risk_free_rate, config.dividend_yield);
        let call = bs_call(spot, strike, r, q, vol, time);
        let put = bs_put(spot, strike, r, q, vol, time);
        // 2% wide markets around model prices
        Contract::from_quotes(strike, call * 0.99, call * 1.01, put * 0.99, put * 1.01)
    }

    #[test]
    fn test_otm_side_only() {
        let config = RiskConfig::default();
        let contracts = vec![
            priced(95.0, 100.0, 0.2, 0.5, &config),
            priced(100.0, 100.0, 0.2, 0.5, &config),
            priced(105.0, 100.0, 0.2, 0.5, &config),
        ];

        let solved = compute_implied_vols(&contracts, 100.0, 0.5, &config);

        assert_eq!(solved.len(), 3);
        assert!((solved[0].put_iv - 0.2).abs() < 0.005);
        assert_eq!(solved[0].call_iv, 0.0);
        // strike == spot uses the put
        assert!((solved[1].put_iv - 0.2).abs() < 0.005);
        assert_eq!(solved[1].call_iv, 0.0);
        assert!((solved[2].call_iv - 0.2).abs() < 0.005);
        assert_eq!(solved[2].put_iv, 0.0);
    }

    #[test]
    fn test_illiquid_contracts_skipped() {
        let config = RiskConfig::default();
        // Call side (strike above spot) is 0.10 x 0.90
        let wide = Contract::from_quotes(110.0, 0.10, 0.90, 9.0, 11.0);

        let solved = compute_implied_vols(&[wide], 100.0, 0.5, &config);
        assert_eq!(solved[0].call_iv, 0.0);
        assert_eq!(solved[0].put_iv, 0.0);

        // The same quote clears a looser gate
        let relaxed = RiskConfig {
            liquidity: crate::analysis::LiquidityConfig {
                min_mid_price: 0.05,
                max_spread_ratio: 2.0,
            },
            ..Default::default()
        };
        let solved = compute_implied_vols(&[wide], 100.0, 0.5, &relaxed);
        assert!(solved[0].call_iv > 0.0);
    }

    #[test]
    fn test_input_untouched() {
        let config = RiskConfig::default();
        let mut contract = priced(95.0, 100.0, 0.2, 0.5, &config);
        contract.call_iv = 0.9;
        let original = vec![contract];

        let solved = compute_implied_vols(&original, 100.0, 0.5, &config);

        assert_eq!(original[0].call_iv, 0.9);
        assert_eq!(solved[0].call_iv, 0.0);
        assert_eq!(solved[0].strike, original[0].strike);
        assert_eq!(solved[0].put_mid, original[0].put_mid);
    }

    /// 40 strikes around 100 with a put-side smile
    fn smile_chain(config: &RiskConfig) -> Vec<Contract> {
        (0..40)
            .map(|i| {
                let strike = 70.0 + i as f64 * 1.5;
                let vol = 0.18 + 0.3 * ((100.0 - strike) / 100.0).max(0.0);
                priced(strike, 100.0, vol, 0.25, config)
            })
            .collect()
    }

    #[test]
    fn test_matches_contract_by_contract() {
        let config = RiskConfig::default();
        let contracts = smile_chain(&config);

        let solved = compute_implied_vols(&contracts, 100.0, 0.25, &config);
        let one_by_one: Vec<Contract> = contracts
            .iter()
            .map(|c| solve_contract(c, 100.0, 0.25, &config))
            .collect();

        assert_eq!(solved, one_by_one);
        assert!(solved.iter().filter(|c| c.otm_iv(100.0) > 0.0).count() > 20);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_matches_sequential() {
        let config = RiskConfig::default();
        let contracts = smile_chain(&config);

        let sequential: Vec<Contract> = contracts
            .iter()
            .map(|c| solve_contract(c, 100.0, 0.25, &config))
            .collect();

        // Repeated runs land on different worker interleavings
        for _ in 0..5 {
            let parallel = compute_implied_vols(&contracts, 100.0, 0.25, &config);
            assert_eq!(parallel.len(), sequential.len());
            for (p, s) in parallel.iter().zip(&sequential) {
                assert_eq!(p.strike, s.strike);
                assert_eq!(p.call_iv.to_bits(), s.call_iv.to_bits());
                assert_eq!(p.put_iv.to_bits(), s.put_iv.to_bits());
            }
        }
    }
}
