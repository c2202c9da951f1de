//! Configuration for the risk analysis pipeline
//!
//! Every policy constant the pipeline relies on lives here with its default,
//! so rates, solver bounds and liquidity gates can be tuned without touching
//! the numerical code.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::{RiskError, RiskResult};

pub use crate::models::IvSolverConfig;

/// Top-level analysis configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskConfig {
    /// Continuously compounded risk-free rate
    /// Default: 0.04
    pub risk_free_rate: f64,
    /// Continuous dividend yield
    /// Default: 0.012
    pub dividend_yield: f64,
    /// Implied volatility solver
    pub solver: IvSolverConfig,
    /// Liquidity gate for IV eligibility
    pub liquidity: LiquidityConfig,
    /// Data-quality thresholds
    pub quality: QualityConfig,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            risk_free_rate: 0.04,
            dividend_yield: 0.012,
            solver: IvSolverConfig::default(),
            liquidity: LiquidityConfig::default(),
            quality: QualityConfig::default(),
        }
    }
}

impl RiskConfig {
    /// Tighter liquidity gate: fewer but cleaner IVs
    pub fn conservative() -> Self {
        Self {
            liquidity: LiquidityConfig {
                min_mid_price: 0.10,
                max_spread_ratio: 0.20,
            },
            ..Default::default()
        }
    }

    /// Looser liquidity gate for thin chains
    pub fn relaxed() -> Self {
        Self {
            liquidity: LiquidityConfig {
                min_mid_price: 0.01,
                max_spread_ratio: 0.60,
            },
            ..Default::default()
        }
    }

    /// Override the rate/dividend pair
    pub fn with_rates(mut self, risk_free_rate: f64, dividend_yield: f64) -> Self {
        self.risk_free_rate = risk_free_rate;
        self.dividend_yield = dividend_yield;
        self
    }

    /// Reject configurations the pipeline cannot run with
    pub fn validate(&self) -> RiskResult<()> {
        if !self.risk_free_rate.is_finite() || !self.dividend_yield.is_finite() {
            return Err(RiskError::invalid_input("rates must be finite"));
        }
        self.solver.validate()?;
        self.liquidity.validate()?;
        Ok(())
    }

    /// Parse from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> RiskResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a JSON config file
    pub fn from_path(path: impl AsRef<Path>) -> RiskResult<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

/// Liquidity gate applied to the out-of-the-money side
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LiquidityConfig {
    /// Minimum mid price
    /// Default: 0.05
    pub min_mid_price: f64,

    /// Maximum (ask - bid) / mid
    /// Default: 0.35
    pub max_spread_ratio: f64,
}

impl Default for LiquidityConfig {
    fn default() -> Self {
        Self {
            min_mid_price: 0.05,
            max_spread_ratio: 0.35,
        }
    }
}

impl LiquidityConfig {
    pub fn validate(&self) -> RiskResult<()> {
        if !(self.min_mid_price >= 0.0) || !(self.max_spread_ratio >= 0.0) {
            return Err(RiskError::invalid_input(
                "liquidity thresholds must be non-negative",
            ));
        }
        Ok(())
    }
}

/// Data-quality thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityConfig {
    /// Below this many contracts with usable IV, probabilities are zeroed
    /// Default: 3
    pub min_contracts_for_metrics: usize,

    /// Fewer analyzed contracts than this raises a "limited data" warning
    /// Default: 20
    pub limited_data_threshold: usize,

    /// Average call spread (%) above this raises a "wide spreads" warning
    /// Default: 5.0
    pub wide_spread_pct: f64,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            min_contracts_for_metrics: 3,
            limited_data_threshold: 20,
            wide_spread_pct: 5.0,
        }
    }
}
