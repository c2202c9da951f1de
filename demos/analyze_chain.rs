//! Example: Analyze a synthetic option chain
//!
//! Run with: cargo run --example analyze_chain

use chain_risk::prelude::*;

fn main() {
    let spot = 500.0;
    let days = 30.0;
    let time = days / 365.0;
    let config = RiskConfig::default();
    let (rate, div) = (config.risk_free_rate, config.dividend_yield);

    // Smile: vol rises for lower strikes
    let rows: Vec<RawQuoteRow> = (0..41)
        .map(|i| {
            let strike = 400.0 + i as f64 * 5.0;
            let vol = 0.18 + 0.25 * ((spot - strike) / spot).max(0.0);
            let call = bs_call(spot, strike, rate, div, vol, time);
            let put = bs_put(spot, strike, rate, div, vol, time);

            RawQuoteRow::quoted(
                format!("{:.2}", strike),
                format!("{:.2}", call * 0.98),
                format!("{:.2}", call * 1.02),
                format!("{:.2}", put * 0.98),
                format!("{:.2}", put * 1.02),
            )
            .with_open_interest((1000 + i * 10).to_string(), (1500 - i * 10).to_string())
        })
        .collect();

    let snapshot = ChainSnapshot::new("DEMO", rows)
        .with_last_trade(format!("LAST TRADE: ${:.2} (AS OF CLOSE)", spot));

    let result = match RiskAnalyzer::with_config(config).analyze(&snapshot, days) {
        Ok(result) => result,
        Err(e) => {
            println!("Analysis failed: {}", e);
            return;
        }
    };

    println!("=== {} ({:.0} days) ===\n", result.symbol, result.days_to_expiry);
    println!("Spot:      ${:.2} ({})", result.spot, result.spot_source.label());
    println!(
        "ATM IV:    {:.2}% [{}]",
        result.iv_metrics.atm_iv_pct, result.iv_metrics.term_label
    );
    println!("IV skew:   {:.2}", result.iv_metrics.iv_skew);
    println!("P/C ratio: {:.2}", result.put_call_ratio);

    let p = &result.probabilities;
    println!("\n=== Probabilities ===\n");
    println!(
        "Up:    {:.1}%  (>5%: {:.1}%, >10%: {:.1}%, >15%: {:.1}%)",
        p.gain_0 * 100.0,
        p.gain_5 * 100.0,
        p.gain_10 * 100.0,
        p.gain_15 * 100.0
    );
    println!(
        "Down:  {:.1}%  (>5%: {:.1}%, >10%: {:.1}%, >15%: {:.1}%)",
        p.loss_0 * 100.0,
        p.loss_5 * 100.0,
        p.loss_10 * 100.0,
        p.loss_15 * 100.0
    );
    println!("Expected return: {:.2}%", p.expected_return_pct);

    let t = &result.tail_risk;
    println!("\n=== Tails ===\n");
    println!("5th pct:  {:+.2}%", t.left_tail_pct);
    println!("95th pct: {:+.2}%", t.right_tail_pct);
    println!("ES:       {:+.2}%", t.expected_shortfall_pct);
    println!(
        "Risk reversal: {:.2}, butterfly: {:.4}",
        result.skew.risk_reversal, result.skew.butterfly
    );

    println!("\n=== Data Quality ===\n");
    let q = &result.data_quality;
    println!(
        "{} contracts ({} liquid, {} with IV), strikes {}",
        q.contracts_analyzed, q.liquid_contracts, q.iv_contracts, q.strike_range
    );
    println!("Average call spread: {:.2}%", q.avg_spread_pct);
    for w in &q.warnings {
        println!("  ! {}", w);
    }
}
