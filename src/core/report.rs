//! Analysis report
//!
//! The single record returned by one analysis run. Built once at the end of
//! the pipeline; callers serialize it however they like.

use serde::{Deserialize, Serialize};

use super::contract::CDFPoint;

/// Where the spot price came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpotSource {
    /// Parsed from the exchange last-trade banner
    LastTrade,
    /// Middle implied spot over call/put mid pairs
    PutCallParity,
    /// Strike of the middle contract (no usable pairs)
    MiddleStrike,
    /// No contracts at all
    Unavailable,
}

impl SpotSource {
    pub fn label(&self) -> &'static str {
        match self {
            SpotSource::LastTrade => "last trade",
            SpotSource::PutCallParity => "put-call parity",
            SpotSource::MiddleStrike => "middle strike",
            SpotSource::Unavailable => "unavailable",
        }
    }
}

/// Directional probabilities from the constant-ATM-IV distribution
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ProbabilityBlock {
    pub gain_0: f64,
    pub gain_5: f64,
    pub gain_10: f64,
    pub gain_15: f64,
    pub loss_0: f64,
    pub loss_5: f64,
    pub loss_10: f64,
    pub loss_15: f64,
    /// Risk-neutral drift `(r - q) * 100`
    pub expected_return_pct: f64,
}

/// Implied volatility summary
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IvMetrics {
    /// ATM implied vol in percent
    pub atm_iv_pct: f64,
    /// (90% put IV - 110% call IV) * 100
    pub iv_skew: f64,
    /// Annualized ATM IV in percent, comparable to the VIX index
    pub vix_equivalent: f64,
    pub term_label: String,
}

/// Tail statistics over the smile-aware distribution strikes
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TailRisk {
    /// 5th percentile strike as % deviation from spot
    pub left_tail_pct: f64,
    /// 95th percentile strike as % deviation from spot
    pub right_tail_pct: f64,
    /// Mean of the bottom 5% of strikes as % deviation from spot
    pub expected_shortfall_pct: f64,
    /// |left| / right
    pub kurtosis_proxy: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SkewMetrics {
    /// OTM put IV minus OTM call IV, in percent
    pub risk_reversal: f64,
    /// `c[i-1] - 2c[i] + c[i+1]` on call mids around the middle contract
    pub butterfly: f64,
}

/// Data-quality diagnostics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataQuality {
    pub contracts_analyzed: usize,
    /// Contracts passing the liquidity predicate on their OTM side
    pub liquid_contracts: usize,
    /// Contracts with a usable OTM-side implied vol
    pub iv_contracts: usize,
    pub strike_range: String,
    pub avg_spread_pct: f64,
    pub warnings: Vec<String>,
}

/// Final output of one analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAnalysisResult {
    pub symbol: String,
    pub spot: f64,
    pub spot_source: SpotSource,
    /// Call/put pairs used when spot came from parity
    pub parity_pairs: usize,
    pub days_to_expiry: f64,
    pub probabilities: ProbabilityBlock,
    pub iv_metrics: IvMetrics,
    pub tail_risk: TailRisk,
    pub skew: SkewMetrics,
    pub put_call_ratio: f64,
    /// Constant-ATM-IV distribution
    pub cdf: Vec<CDFPoint>,
    /// Per-strike (smile-aware) distribution
    pub smile_cdf: Vec<CDFPoint>,
    pub data_quality: DataQuality,
}
