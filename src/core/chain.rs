//! Raw option chain snapshot
//!
//! The textual per-strike rows exactly as an upstream fetcher hands them over,
//! plus the optional exchange "last trade" banner.

use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::error::RiskResult;

/// Option type (Call or Put)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionType {
    Call,
    Put,
}

impl OptionType {
    /// Intrinsic value at given spot
    pub fn intrinsic(&self, spot: f64, strike: f64) -> f64 {
        match self {
            OptionType::Call => (spot - strike).max(0.0),
            OptionType::Put => (strike - spot).max(0.0),
        }
    }

    /// Out-of-the-money side for a strike: puts at or below spot, calls above.
    pub fn otm_side(strike: f64, spot: f64) -> Self {
        if strike <= spot {
            OptionType::Put
        } else {
            OptionType::Call
        }
    }
}

/// One strike's quote data as received (all fields textual)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawQuoteRow {
    pub strike: String,
    #[serde(alias = "callBid", alias = "c_Bid")]
    pub call_bid: String,
    #[serde(alias = "callAsk", alias = "c_Ask")]
    pub call_ask: String,
    #[serde(alias = "callVolume", alias = "c_Volume")]
    pub call_volume: String,
    #[serde(alias = "callOpenInterest", alias = "c_Openinterest")]
    pub call_open_interest: String,
    #[serde(alias = "putBid", alias = "p_Bid")]
    pub put_bid: String,
    #[serde(alias = "putAsk", alias = "p_Ask")]
    pub put_ask: String,
    #[serde(alias = "putVolume", alias = "p_Volume")]
    pub put_volume: String,
    #[serde(alias = "putOpenInterest", alias = "p_Openinterest")]
    pub put_open_interest: String,
}

impl RawQuoteRow {
    /// Row with only strike and bid/ask populated
    pub fn quoted(
        strike: impl Into<String>,
        call_bid: impl Into<String>,
        call_ask: impl Into<String>,
        put_bid: impl Into<String>,
        put_ask: impl Into<String>,
    ) -> Self {
        Self {
            strike: strike.into(),
            call_bid: call_bid.into(),
            call_ask: call_ask.into(),
            put_bid: put_bid.into(),
            put_ask: put_ask.into(),
            ..Default::default()
        }
    }

    /// Set call/put open interest
    pub fn with_open_interest(
        mut self,
        call_oi: impl Into<String>,
        put_oi: impl Into<String>,
    ) -> Self {
        self.call_open_interest = call_oi.into();
        self.put_open_interest = put_oi.into();
        self
    }

    /// Set call/put volume
    pub fn with_volume(
        mut self,
        call_volume: impl Into<String>,
        put_volume: impl Into<String>,
    ) -> Self {
        self.call_volume = call_volume.into();
        self.put_volume = put_volume.into();
        self
    }
}

/// A full chain snapshot for one underlying and one expiry
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChainSnapshot {
    /// Underlying symbol
    #[serde(default)]
    pub symbol: String,
    /// Exchange "last trade" banner, e.g. `LAST TRADE: $663.32 (AS OF ...)`
    #[serde(default, alias = "lastTrade")]
    pub last_trade: Option<String>,
    /// Contract expiry date
    #[serde(default)]
    pub expiry: Option<NaiveDate>,
    /// Per-strike rows in upstream order
    #[serde(default)]
    pub rows: Vec<RawQuoteRow>,
}

impl ChainSnapshot {
    pub fn new(symbol: impl Into<String>, rows: Vec<RawQuoteRow>) -> Self {
        Self {
            symbol: symbol.into(),
            last_trade: None,
            expiry: None,
            rows,
        }
    }

    /// Attach the exchange last-trade banner
    pub fn with_last_trade(mut self, last_trade: impl Into<String>) -> Self {
        self.last_trade = Some(last_trade.into());
        self
    }

    /// Attach the expiry date
    pub fn with_expiry(mut self, expiry: NaiveDate) -> Self {
        self.expiry = Some(expiry);
        self
    }

    /// Calendar days from `as_of` to expiry, floored at zero.
    ///
    /// `None` when the snapshot carries no expiry.
    pub fn days_to_expiry(&self, as_of: NaiveDate) -> Option<f64> {
        self.expiry
            .map(|expiry| (expiry - as_of).num_days().max(0) as f64)
    }

    /// Parse a snapshot from JSON
    pub fn from_json(json: &str) -> RiskResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a snapshot file
    pub fn from_path(path: impl AsRef<Path>) -> RiskResult<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}
