//! Kelly criterion stake sizing.
//!
//! Sizes a bet at an American-odds payout price given a fair win probability,
//! a bankroll, and a fractional-Kelly multiplier.

use tracing::debug;

use crate::pricing::{decimal_multiplier, implied_probability};
use crate::types::{EngineError, KellyResult};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Kelly sizing configuration.
#[derive(Debug, Clone)]
pub struct KellyConfig {
    /// Fractional Kelly multiplier used when a request doesn't supply one
    /// (0.5 = half-Kelly).
    pub default_fraction: f64,
}

impl Default for KellyConfig {
    fn default() -> Self {
        Self {
            default_fraction: 0.5, // Half-Kelly
        }
    }
}

// ---------------------------------------------------------------------------
// Kelly sizer
// ---------------------------------------------------------------------------

pub struct KellySizer {
    config: KellyConfig,
}

impl KellySizer {
    pub fn new(config: KellyConfig) -> Self {
        Self { config }
    }

    /// Access the Kelly configuration.
    pub fn config(&self) -> &KellyConfig {
        &self.config
    }

    /// Size a bet, falling back to the configured fraction when `kelly_fraction`
    /// is `None`.
    pub fn size(
        &self,
        fair_probability: f64,
        payout_price: f64,
        bankroll: f64,
        kelly_fraction: Option<f64>,
    ) -> Result<KellyResult, EngineError> {
        let fraction = kelly_fraction.unwrap_or(self.config.default_fraction);
        size_bet(fair_probability, payout_price, bankroll, fraction)
    }
}

/// Size a bet using the Kelly criterion.
///
/// Kelly formula: f* = (bp - q) / b
/// where:
///   b = net odds (winnings per unit staked at `payout_price`)
///   p = fair win probability
///   q = 1 - p
///
/// Percentages are reported even when negative; the recommended wager is
/// zero unless f* > 0.
pub fn size_bet(
    fair_probability: f64,
    payout_price: f64,
    bankroll: f64,
    kelly_fraction: f64,
) -> Result<KellyResult, EngineError> {
    if !bankroll.is_finite() || bankroll < 0.0 {
        return Err(EngineError::InvalidStake(format!(
            "bankroll must be a non-negative amount, got {bankroll}"
        )));
    }
    if !kelly_fraction.is_finite() || kelly_fraction <= 0.0 {
        return Err(EngineError::InvalidStake(format!(
            "kelly fraction must be positive, got {kelly_fraction}"
        )));
    }

    let payout_probability = implied_probability(payout_price).map_err(EngineError::Payout)?;
    let b = decimal_multiplier(payout_price).map_err(EngineError::Payout)?;

    let p = fair_probability;
    let q = 1.0 - p;

    let edge_percent = (p - payout_probability) / payout_probability * 100.0;
    let kelly = (b * p - q) / b;
    let is_profitable = kelly > 0.0;

    let recommended_wager_amount = if is_profitable {
        bankroll * kelly_fraction * kelly
    } else {
        0.0
    };

    debug!(
        fair = p,
        payout_price,
        edge = format!("{:.2}%", edge_percent),
        raw_kelly = format!("{:.2}%", kelly * 100.0),
        wager = format!("${:.2}", recommended_wager_amount),
        "Bet sized"
    );

    Ok(KellyResult {
        payout_probability,
        edge_percent,
        kelly_percentage: kelly * 100.0,
        full_kelly_units: kelly * 100.0,
        half_kelly_units: kelly * 100.0 / 2.0,
        quarter_kelly_units: kelly * 100.0 / 4.0,
        recommended_wager_amount,
        is_profitable,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
