//! Pricing and distribution models
//!
//! Implements:
//! - Black-Scholes (pricing, vega, implied vol solvers)
//! - Spot estimation from last trade or put-call parity
//! - Risk-neutral CDF construction and interpolation

pub mod black_scholes;
pub mod spot;
pub mod distribution;

pub use black_scholes::*;
pub use spot::*;
pub use distribution::*;
