//! Black-Scholes Model
//!
//! Provides:
//! - European pricing with continuous dividend yield
//! - Vega (the Newton-Raphson derivative)
//! - Moneyness-aware implied volatility solvers for calls and puts
//! - `IvSolverConfig`, the solver's tolerances, bounds and deep-ITM defaults
//!
//! The solvers return `0.0` as the "unreliable" sentinel instead of an error:
//! a contract whose IV cannot be trusted is simply left out downstream.

use std::f64::consts::{PI, SQRT_2};

use serde::{Deserialize, Serialize};
use statrs::function::erf::erfc;

use crate::core::{OptionType, RiskError, RiskResult};

/// Newton-Raphson implied volatility solver configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IvSolverConfig {
    /// Absolute price tolerance for convergence
    /// Default: 1e-4
    pub tolerance: f64,

    /// Iteration cap per contract
    /// Default: 50
    pub max_iterations: usize,

    /// Lower vol bound; each step is floored here
    /// Default: 0.05
    pub min_vol: f64,

    /// Upper vol bound; crossing it returns the deep-ITM default
    /// Default: 0.5
    pub max_vol: f64,

    /// Vega below this aborts the solve
    /// Default: 1e-3
    pub min_vega: f64,

    /// Calls with S/K above this skip the solve
    /// Default: 1.2
    pub call_deep_itm_moneyness: f64,

    /// Puts with S/K below this skip the solve
    /// Default: 0.8
    pub put_deep_itm_moneyness: f64,

    /// Vol assigned to deep-ITM calls
    /// Default: 0.18
    pub call_deep_itm_vol: f64,

    /// Vol assigned to deep-ITM puts
    /// Default: 0.20
    pub put_deep_itm_vol: f64,
}

impl Default for IvSolverConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-4,
            max_iterations: 50,
            min_vol: 0.05,
            max_vol: 0.5,
            min_vega: 1e-3,
            call_deep_itm_moneyness: 1.2,
            put_deep_itm_moneyness: 0.8,
            call_deep_itm_vol: 0.18,
            put_deep_itm_vol: 0.20,
        }
    }
}

impl IvSolverConfig {
    pub fn validate(&self) -> RiskResult<()> {
        if !(self.tolerance > 0.0) {
            return Err(RiskError::invalid_input("solver tolerance must be positive"));
        }
        if self.max_iterations == 0 {
            return Err(RiskError::invalid_input("solver needs at least one iteration"));
        }
        if !(self.min_vol > 0.0 && self.min_vol < self.max_vol) {
            return Err(RiskError::invalid_input(format!(
                "vol bounds must satisfy 0 < min < max, got [{}, {}]",
                self.min_vol, self.max_vol
            )));
        }
        Ok(())
    }
}

/// Standard normal CDF
pub fn norm_cdf(x: f64) -> f64 {
    0.5 * erfc(-x / SQRT_2)
}

/// Standard normal PDF
pub fn norm_pdf(x: f64) -> f64 {
    (-0.5 * x * x).exp() / (2.0 * PI).sqrt()
}

/// Black-Scholes d1 parameter
pub fn d1(spot: f64, strike: f64, rate: f64, div: f64, vol: f64, time: f64) -> f64 {
    ((spot / strike).ln() + (rate - div + 0.5 * vol * vol) * time) / (vol * time.sqrt())
}

/// Black-Scholes d2 parameter
pub fn d2(spot: f64, strike: f64, rate: f64, div: f64, vol: f64, time: f64) -> f64 {
    d1(spot, strike, rate, div, vol, time) - vol * time.sqrt()
}

/// Black-Scholes European option price.
///
/// With `vol <= 0` or `time <= 0` this is the undiscounted intrinsic value.
pub fn price(
    spot: f64,
    strike: f64,
    rate: f64,
    div: f64,
    vol: f64,
    time: f64,
    option_type: OptionType,
) -> f64 {
    if vol <= 0.0 || time <= 0.0 {
        return option_type.intrinsic(spot, strike);
    }

    let d1 = d1(spot, strike, rate, div, vol, time);
    let d2 = d1 - vol * time.sqrt();
    let spot_df = spot * (-div * time).exp();
    let strike_df = strike * (-rate * time).exp();

    match option_type {
        OptionType::Call => spot_df * norm_cdf(d1) - strike_df * norm_cdf(d2),
        OptionType::Put => strike_df * norm_cdf(-d2) - spot_df * norm_cdf(-d1),
    }
}

pub fn bs_call(spot: f64, strike: f64, rate: f64, div: f64, vol: f64, time: f64) -> f64 {
    price(spot, strike, rate, div, vol, time, OptionType::Call)
}

pub fn bs_put(spot: f64, strike: f64, rate: f64, div: f64, vol: f64, time: f64) -> f64 {
    price(spot, strike, rate, div, vol, time, OptionType::Put)
}

/// Vega per unit of vol: `S e^{-qT} φ(d1) √T`
pub fn vega(spot: f64, strike: f64, rate: f64, div: f64, vol: f64, time: f64) -> f64 {
    let d1 = d1(spot, strike, rate, div, vol, time);
    spot * (-div * time).exp() * norm_pdf(d1) * time.sqrt()
}

/// Implied volatility of a call.
///
/// Deep in-the-money calls (`S/K` above the configured cutoff) get the fixed
/// call default without iterating. Returns `0.0` when no reliable solution
/// exists.
pub fn implied_volatility_call(
    market_price: f64,
    spot: f64,
    strike: f64,
    rate: f64,
    div: f64,
    time: f64,
    config: &IvSolverConfig,
) -> f64 {
    if market_price <= 0.0 || time <= 0.0 || spot <= 0.0 || strike <= 0.0 {
        return 0.0;
    }

    let moneyness = spot / strike;
    if moneyness > config.call_deep_itm_moneyness {
        return config.call_deep_itm_vol;
    }

    let initial = if moneyness > 1.1 {
        0.17
    } else if moneyness < 0.9 {
        0.22
    } else {
        0.19
    };

    newton_raphson(
        market_price,
        spot,
        strike,
        rate,
        div,
        time,
        OptionType::Call,
        initial,
        config.call_deep_itm_vol,
        config,
    )
}

/// Implied volatility of a put.
///
/// Mirrors [`implied_volatility_call`] with put-side moneyness buckets: deep
/// in-the-money puts are `S/K` below the configured cutoff.
pub fn implied_volatility_put(
    market_price: f64,
    spot: f64,
    strike: f64,
    rate: f64,
    div: f64,
    time: f64,
    config: &IvSolverConfig,
) -> f64 {
    if market_price <= 0.0 || time <= 0.0 || spot <= 0.0 || strike <= 0.0 {
        return 0.0;
    }

    let moneyness = spot / strike;
    if moneyness < config.put_deep_itm_moneyness {
        return config.put_deep_itm_vol;
    }

    let initial = if moneyness < 0.9 {
        0.22
    } else if moneyness > 1.1 {
        0.25
    } else {
        0.21
    };

    newton_raphson(
        market_price,
        spot,
        strike,
        rate,
        div,
        time,
        OptionType::Put,
        initial,
        config.put_deep_itm_vol,
        config,
    )
}

/// Implied volatility for either side
#[allow(clippy::too_many_arguments)]
pub fn implied_volatility(
    market_price: f64,
    spot: f64,
    strike: f64,
    rate: f64,
    div: f64,
    time: f64,
    option_type: OptionType,
    config: &IvSolverConfig,
) -> f64 {
    match option_type {
        OptionType::Call => {
            implied_volatility_call(market_price, spot, strike, rate, div, time, config)
        }
        OptionType::Put => {
            implied_volatility_put(market_price, spot, strike, rate, div, time, config)
        }
    }
}

/// Bounded Newton-Raphson on price.
///
/// Each step floors vol at `min_vol`; stepping above `max_vol` is read as a
/// deep in-the-money contract and returns `ceiling_default`.
#[allow(clippy::too_many_arguments)]
fn newton_raphson(
    market_price: f64,
    spot: f64,
    strike: f64,
    rate: f64,
    div: f64,
    time: f64,
    option_type: OptionType,
    initial: f64,
    ceiling_default: f64,
    config: &IvSolverConfig,
) -> f64 {
    let mut vol = initial;

    for _ in 0..config.max_iterations {
        let diff = price(spot, strike, rate, div, vol, time, option_type) - market_price;

        if diff.abs() < config.tolerance {
            return if vol > config.min_vol && vol < config.max_vol {
                vol
            } else {
                0.0
            };
        }

        let vega = vega(spot, strike, rate, div, vol, time);
        if vega < config.min_vega {
            break;
        }

        vol = (vol - diff / vega).max(config.min_vol);
        if vol > config.max_vol {
            return ceiling_default;
        }
    }

    0.0
}
