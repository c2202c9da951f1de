//! Chain data preparation
//!
//! Handles:
//! - Sanitizing textual quote fields into numbers
//! - Filtering rows into sorted, strike-unique contracts
//! - The shared liquidity predicate

pub mod sanitize;
pub mod filter;

pub use sanitize::*;
pub use filter::*;
