//! Core data types for chain risk analysis
//!
//! Defines fundamental types:
//! - RawQuoteRow / ChainSnapshot: textual chain data as received
//! - Contract: sanitized per-strike call/put quotes and IVs
//! - CDFPoint: one point of a terminal-price distribution
//! - RiskAnalysisResult: the final report

pub mod chain;
pub mod contract;
pub mod report;
pub mod error;

pub use chain::*;
pub use contract::*;
pub use report::*;
pub use error::*;
