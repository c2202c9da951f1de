//! Sanitized per-strike contracts and CDF points

use serde::{Deserialize, Serialize};

use super::chain::OptionType;

/// Canonical per-strike unit after sanitization.
///
/// Both legs live on one record. An IV of `0.0` means "not computed or
/// unreliable" and excludes that leg from anything that needs volatility.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Contract {
    pub strike: f64,
    pub call_bid: f64,
    pub call_ask: f64,
    pub call_mid: f64,
    pub put_bid: f64,
    pub put_ask: f64,
    pub put_mid: f64,
    pub call_volume: f64,
    pub put_volume: f64,
    pub call_open_interest: f64,
    pub put_open_interest: f64,
    pub call_iv: f64,
    pub put_iv: f64,
}

impl Contract {
    /// Build from sanitized bid/ask, computing both mids.
    ///
    /// The mid is `(bid + ask) / 2` even when one leg is zero, so a one-sided
    /// quote still yields a non-zero mid.
    pub fn from_quotes(
        strike: f64,
        call_bid: f64,
        call_ask: f64,
        put_bid: f64,
        put_ask: f64,
    ) -> Self {
        Self {
            strike,
            call_bid,
            call_ask,
            call_mid: (call_bid + call_ask) / 2.0,
            put_bid,
            put_ask,
            put_mid: (put_bid + put_ask) / 2.0,
            ..Default::default()
        }
    }

    /// (bid, ask, mid) for one side
    pub fn side(&self, option_type: OptionType) -> (f64, f64, f64) {
        match option_type {
            OptionType::Call => (self.call_bid, self.call_ask, self.call_mid),
            OptionType::Put => (self.put_bid, self.put_ask, self.put_mid),
        }
    }

    /// Implied volatility for one side
    pub fn iv(&self, option_type: OptionType) -> f64 {
        match option_type {
            OptionType::Call => self.call_iv,
            OptionType::Put => self.put_iv,
        }
    }

    /// IV of the out-of-the-money side relative to spot
    pub fn otm_iv(&self, spot: f64) -> f64 {
        self.iv(OptionType::otm_side(self.strike, spot))
    }

    /// Relative spread `(ask - bid) / mid` for one side, `None` when mid is not positive
    pub fn spread_ratio(&self, option_type: OptionType) -> Option<f64> {
        let (bid, ask, mid) = self.side(option_type);
        if mid > 0.0 {
            Some((ask - bid) / mid)
        } else {
            None
        }
    }

    /// Both call quotes present
    pub fn has_call_quotes(&self) -> bool {
        self.call_bid > 0.0 && self.call_ask > 0.0
    }
}

/// One point of a cumulative distribution over terminal price
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CDFPoint {
    pub strike: f64,
    /// P(S_T < strike), in [0, 1]
    pub cdf: f64,
}

impl CDFPoint {
    pub fn new(strike: f64, cdf: f64) -> Self {
        Self { strike, cdf }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mid_with_one_leg() {
        let c = Contract::from_quotes(100.0, 0.0, 2.0, 1.0, 1.2);

        // One-sided call quote still produces a mid
        assert_eq!(c.call_mid, 1.0);
        assert!((c.put_mid - 1.1).abs() < 1e-12);
        assert!(!c.has_call_quotes());
    }

    #[test]
    fn test_spread_ratio() {
        let c = Contract::from_quotes(100.0, 1.9, 2.1, 0.0, 0.0);

        assert!((c.spread_ratio(OptionType::Call).unwrap() - 0.1).abs() < 1e-12);
        assert_eq!(c.spread_ratio(OptionType::Put), None);
    }

    #[test]
    fn test_otm_iv() {
        let c = Contract {
            strike: 95.0,
            call_iv: 0.3,
            put_iv: 0.2,
            ..Default::default()
        };

        assert_eq!(c.otm_iv(100.0), 0.2);
        assert_eq!(c.otm_iv(90.0), 0.3);
    }
}
