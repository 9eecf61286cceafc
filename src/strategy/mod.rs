//! Bet evaluation — per-leg fair values, parlay combination, Kelly sizing.

pub mod kelly;

use tracing::{debug, info};

use crate::parser::{collect_legs, parse_legs};
use crate::pricing::{devig, implied_probability, market_juice_percent, probability_to_american_odds};
use crate::strategy::kelly::KellySizer;
use crate::types::{
    BetEvaluation, DevigMethod, EngineError, InvalidOdds, KellyResult, Leg, LegValuation,
};

// ---------------------------------------------------------------------------
// Per-leg valuation
// ---------------------------------------------------------------------------

/// Fair value of a single leg.
///
/// Odds pairs are devigged with `method`; raw percentages are taken as
/// already fair and must lie strictly between 0 and 100.
pub fn value_leg(leg: &Leg, method: DevigMethod) -> Result<LegValuation, InvalidOdds> {
    let valuation = match *leg {
        Leg::OddsPair { price_a, price_b } => {
            let result = devig(price_a, price_b, method)?;
            let implied = implied_probability(price_a)?;
            LegValuation {
                leg: *leg,
                fair_probability: result.fair_probability,
                method_used: Some(result.method_used),
                market_juice_percent: Some(market_juice_percent(implied, result.fair_probability)),
                fair_odds: probability_to_american_odds(result.fair_probability)?,
            }
        }
        Leg::RawProbability { percent } => {
            if !(percent > 0.0 && percent < 100.0) {
                return Err(InvalidOdds::PercentOutOfRange(percent));
            }
            let fair_probability = percent / 100.0;
            LegValuation {
                leg: *leg,
                fair_probability,
                method_used: None,
                market_juice_percent: None,
                fair_odds: probability_to_american_odds(fair_probability)?,
            }
        }
    };
    Ok(valuation)
}

/// Combined probability of independent legs all winning.
pub fn combine(values: &[LegValuation]) -> f64 {
    values.iter().map(|v| v.fair_probability).product()
}

// ---------------------------------------------------------------------------
// Full evaluation
// ---------------------------------------------------------------------------

/// Devig every leg, combine them, and size a bet at `payout_price`.
pub fn evaluate_bet(
    legs: &[Leg],
    payout_price: f64,
    bankroll: f64,
    kelly_fraction: f64,
    method: DevigMethod,
) -> Result<BetEvaluation, EngineError> {
    evaluate_with(legs, payout_price, method, |p| {
        kelly::size_bet(p, payout_price, bankroll, kelly_fraction)
    })
}

/// Parse `input` with the leg grammar, then [`evaluate_bet`].
pub fn evaluate_input(
    input: &str,
    payout_price: f64,
    bankroll: f64,
    kelly_fraction: f64,
    method: DevigMethod,
) -> Result<BetEvaluation, EngineError> {
    let legs = collect_legs(parse_legs(input))?;
    evaluate_bet(&legs, payout_price, bankroll, kelly_fraction, method)
}

/// Like [`evaluate_input`], but sized by `sizer`, which supplies its
/// configured fraction when `kelly_fraction` is `None`.
pub fn evaluate_input_sized(
    sizer: &KellySizer,
    input: &str,
    payout_price: f64,
    bankroll: f64,
    kelly_fraction: Option<f64>,
    method: DevigMethod,
) -> Result<BetEvaluation, EngineError> {
    let legs = collect_legs(parse_legs(input))?;
    evaluate_with(&legs, payout_price, method, |p| {
        sizer.size(p, payout_price, bankroll, kelly_fraction)
    })
}

fn evaluate_with(
    legs: &[Leg],
    payout_price: f64,
    method: DevigMethod,
    size: impl FnOnce(f64) -> Result<KellyResult, EngineError>,
) -> Result<BetEvaluation, EngineError> {
    if legs.is_empty() {
        return Err(EngineError::NoLegs);
    }

    let per_leg = legs
        .iter()
        .enumerate()
        .map(|(index, leg)| {
            value_leg(leg, method).map_err(|source| EngineError::InvalidOdds { index, source })
        })
        .collect::<Result<Vec<_>, _>>()?;

    for (index, v) in per_leg.iter().enumerate() {
        debug!(
            leg = index + 1,
            input = %v.leg,
            fair = v.fair_probability,
            method = ?v.method_used,
            "Leg valued"
        );
    }

    let combined_fair_probability = combine(&per_leg);
    // None only if a long parlay underflows to 0.
    let combined_fair_odds = probability_to_american_odds(combined_fair_probability).ok();

    let kelly = size(combined_fair_probability)?;

    info!(
        legs = legs.len(),
        method = method.as_str(),
        combined = format!("{:.4}", combined_fair_probability),
        payout_price,
        edge = format!("{:.2}%", kelly.edge_percent),
        wager = format!("${:.2}", kelly.recommended_wager_amount),
        "Bet evaluated"
    );

    Ok(BetEvaluation {
        method,
        per_leg,
        combined_fair_probability,
        combined_fair_odds,
        payout_price,
        kelly,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
