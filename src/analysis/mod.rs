//! Risk analysis pipeline
//!
//! Stages, in order:
//! 1. **Implied volatility**: liquidity-gated OTM-side solve per contract
//! 2. **Distribution**: constant-ATM-IV CDF for direction, smile-aware CDF for tails
//! 3. **Metrics**: gain/loss probabilities, IV/skew, tail risk, put/call ratio
//! 4. **Report**: result record plus data-quality diagnostics

mod analyzer;
mod config;
mod metrics;
mod volatility;

pub use analyzer::*;
pub use config::*;
pub use metrics::*;
pub use volatility::*;
