//! RiskAnalyzer - Main facade for the chain risk pipeline
//!
//! Runs every stage in order over one snapshot:
//! filter → spot → implied vols → CDFs → metrics → data quality.

use crate::core::{
    ChainSnapshot, Contract, DataQuality, RiskAnalysisResult, RiskError, RiskResult, SpotSource,
};
use crate::data::{build_contracts, is_liquid};
use crate::models::{build_cdf_from_ivs, build_constant_atm_cdf, estimate_spot, SpotEstimate};

use super::{
    compute_implied_vols, degraded_probability_block, iv_metrics, probability_block,
    put_call_ratio, skew_metrics, tail_risk, RiskConfig,
};

/// Days per year for converting days-to-expiry into a year fraction
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Stateless analyzer; one call per snapshot
pub struct RiskAnalyzer {
    config: RiskConfig,
}

impl RiskAnalyzer {
    /// Create an analyzer with default configuration
    pub fn new() -> Self {
        Self {
            config: RiskConfig::default(),
        }
    }

    /// Create with custom configuration
    pub fn with_config(config: RiskConfig) -> Self {
        Self { config }
    }

    /// Get current configuration
    pub fn config(&self) -> &RiskConfig {
        &self.config
    }

    /// Run the full pipeline on a chain snapshot
    ///
    /// # Arguments
    /// * `snapshot` - Raw chain rows plus optional last-trade banner
    /// * `days_to_expiry` - Calendar days until expiry, computed by the caller
    ///
    /// # Errors
    /// `NoValidOptionsData` when no row survives filtering; `InvalidInput`
    /// for a bad configuration or a negative/non-finite day count.
    pub fn analyze(
        &self,
        snapshot: &ChainSnapshot,
        days_to_expiry: f64,
    ) -> RiskResult<RiskAnalysisResult> {
        self.config.validate()?;
        if !days_to_expiry.is_finite() || days_to_expiry < 0.0 {
            return Err(RiskError::invalid_input(format!(
                "days to expiry must be a non-negative number, got {}",
                days_to_expiry
            )));
        }

        let config = &self.config;
        let (rate, div) = (config.risk_free_rate, config.dividend_yield);
        let time = days_to_expiry / DAYS_PER_YEAR;

        let contracts = build_contracts(&snapshot.rows)?;

        let estimate = estimate_spot(snapshot.last_trade.as_deref(), &contracts);
        let spot = estimate.spot;
        tracing::debug!(
            "Spot {:.2} from {} ({} parity pairs)",
            spot,
            estimate.source.label(),
            estimate.pairs
        );

        let contracts = compute_implied_vols(&contracts, spot, time, config);

        let cdf = build_constant_atm_cdf(&contracts, spot, rate, div, time);
        let smile_cdf = build_cdf_from_ivs(&contracts, spot, rate, div, time);

        let iv_contracts = contracts.iter().filter(|c| c.otm_iv(spot) > 0.0).count();
        let usable = iv_contracts >= config.quality.min_contracts_for_metrics && !cdf.is_empty();

        let probabilities = if usable {
            probability_block(&cdf, spot, rate, div)
        } else {
            tracing::warn!(
                "Only {} contracts with usable IV for {}; probabilities zeroed",
                iv_contracts,
                snapshot.symbol
            );
            degraded_probability_block(rate, div)
        };

        let data_quality = self.data_quality(&contracts, spot, &estimate, iv_contracts, usable);

        let result = RiskAnalysisResult {
            symbol: snapshot.symbol.clone(),
            spot,
            spot_source: estimate.source,
            parity_pairs: estimate.pairs,
            days_to_expiry,
            probabilities,
            iv_metrics: iv_metrics(&contracts, spot, days_to_expiry),
            tail_risk: tail_risk(&smile_cdf, spot),
            skew: skew_metrics(&contracts, spot),
            put_call_ratio: put_call_ratio(&contracts),
            cdf,
            smile_cdf,
            data_quality,
        };

        tracing::info!(
            "Analyzed {} {} contracts: spot {:.2}, ATM IV {:.1}%, P(up) {:.3}, {} warnings",
            result.data_quality.contracts_analyzed,
            result.symbol,
            result.spot,
            result.iv_metrics.atm_iv_pct,
            result.probabilities.gain_0,
            result.data_quality.warnings.len()
        );

        Ok(result)
    }

    fn data_quality(
        &self,
        contracts: &[Contract],
        spot: f64,
        estimate: &SpotEstimate,
        iv_contracts: usize,
        usable: bool,
    ) -> DataQuality {
        let quality = &self.config.quality;
        let liquidity = &self.config.liquidity;

        let strike_range = match (contracts.first(), contracts.last()) {
            (Some(lo), Some(hi)) => format!("${:.2} - ${:.2}", lo.strike, hi.strike),
            _ => String::new(),
        };

        let avg_spread_pct = average_call_spread_pct(contracts);

        let liquid_contracts = contracts
            .iter()
            .filter(|c| is_liquid(c, spot, liquidity.min_mid_price, liquidity.max_spread_ratio))
            .count();

        let mut warnings = Vec::new();

        if contracts.len() < quality.limited_data_threshold {
            warnings.push(format!(
                "Limited options data: only {} contracts analyzed",
                contracts.len()
            ));
        }
        if avg_spread_pct > quality.wide_spread_pct {
            warnings.push(format!(
                "Wide bid-ask spreads: average {:.1}% may reduce accuracy",
                avg_spread_pct
            ));
        }
        if !usable {
            warnings.push(format!(
                "Insufficient implied volatility data: {} usable contracts, \
                 probability metrics zeroed",
                iv_contracts
            ));
        }
        match estimate.source {
            SpotSource::PutCallParity => warnings.push(format!(
                "Spot price estimated from put-call parity ({} pairs)",
                estimate.pairs
            )),
            SpotSource::MiddleStrike => warnings.push(
                "Spot price taken from the middle strike; no call/put pairs available".to_string(),
            ),
            SpotSource::LastTrade | SpotSource::Unavailable => {}
        }

        DataQuality {
            contracts_analyzed: contracts.len(),
            liquid_contracts,
            iv_contracts,
            strike_range,
            avg_spread_pct,
            warnings,
        }
    }
}

impl Default for RiskAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// Mean `(ask - bid) / mid * 100` over contracts with both call quotes
pub fn average_call_spread_pct(contracts: &[Contract]) -> f64 {
    let spreads: Vec<f64> = contracts
        .iter()
        .filter(|c| c.has_call_quotes())
        .map(|c| (c.call_ask - c.call_bid) / c.call_mid * 100.0)
        .collect();

    if spreads.is_empty() {
        0.0
    } else {
        spreads.iter().sum::<f64>() / spreads.len() as f64
    }
}

/// Convenience function: analyze with default configuration
pub fn analyze_chain(
    snapshot: &ChainSnapshot,
    days_to_expiry: f64,
) -> RiskResult<RiskAnalysisResult> {
    RiskAnalyzer::new().analyze(snapshot, days_to_expiry)
}

/// Convenience function with custom config
pub fn analyze_chain_with_config(
    snapshot: &ChainSnapshot,
    days_to_expiry: f64,
    config: RiskConfig,
) -> RiskResult<RiskAnalysisResult> {
    RiskAnalyzer::with_config(config).analyze(snapshot, days_to_expiry)
}
