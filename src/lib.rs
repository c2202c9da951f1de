//! # Chain Risk - Options-Chain Risk Analytics
//!
//! Infers the market's risk-neutral view of an underlying from one option
//! chain snapshot and condenses it into risk metrics.
//!
//! ## Overview
//!
//! Given the textual per-strike quotes of a single expiry, the pipeline:
//! - Sanitizes and filters rows into strike-sorted contracts
//! - Estimates spot from the exchange last trade or put-call parity
//! - Solves Black-Scholes implied volatility per contract (Newton-Raphson)
//! - Builds a risk-neutral CDF of the terminal price
//! - Derives gain/loss probabilities, IV skew, tail risk and put/call ratio
//!
//! ## Usage
//!
//! ```rust,no_run
//! use chain_risk::prelude::*;
//!
//! let json = std::fs::read_to_string("chain.json").unwrap();
//! let snapshot = ChainSnapshot::from_json(&json).unwrap();
//!
//! let result = RiskAnalyzer::new().analyze(&snapshot, 30.0).unwrap();
//! println!("P(up) = {:.1}%", result.probabilities.gain_0 * 100.0);
//! ```
//!
//! ## What This Crate Does NOT Do
//!
//! - Fetch chains over the network or persist results
//! - Model American exercise or a volatility term structure
//! - Keep state between calls: every analysis is a pure function of its input

pub mod analysis;
pub mod core;
pub mod data;
pub mod models;

/// Prelude with commonly used types
pub mod prelude {
    // Core types
    pub use crate::core::{
        CDFPoint, ChainSnapshot, Contract, DataQuality, IvMetrics, OptionType, ProbabilityBlock,
        RawQuoteRow, RiskAnalysisResult, RiskError, RiskResult, SkewMetrics, SpotSource, TailRisk,
    };

    // Data preparation
    pub use crate::data::{build_contracts, is_liquid, parse_last_trade_price, parse_numeric};

    // Models
    pub use crate::models::{
        bs_call,
        bs_put,
        build_cdf_from_ivs,
        build_cdf_with_constant_iv,
        build_constant_atm_cdf,
        estimate_spot,
        estimate_spot_from_put_call_parity,
        find_atm_iv,
        implied_volatility_call,
        implied_volatility_put,
        interpolate_cdf,
        norm_cdf,
        SpotEstimate,
    };

    // Pipeline
    pub use crate::analysis::{
        analyze_chain, analyze_chain_with_config, compute_implied_vols, expected_return_pct,
        IvSolverConfig, LiquidityConfig, QualityConfig, RiskAnalyzer, RiskConfig,
    };
}

// Re-export main types at crate root
pub use crate::analysis::{RiskAnalyzer, RiskConfig};
pub use crate::core::{RiskAnalysisResult, RiskError, RiskResult};
