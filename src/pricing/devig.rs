//! Margin removal for two-way markets.
//!
//! Every strategy works on the implied probabilities `q1`, `q2` of the two
//! sides and returns the fair probability of side 1. `devig` is the entry
//! point that takes raw American odds and a [`DevigMethod`].

use tracing::debug;

use super::odds::{check_probability, implied_probability};
use crate::types::{AppliedMethod, DevigMethod, DevigResult, InvalidOdds};

// ---------------------------------------------------------------------------
// Power-method solver settings
// ---------------------------------------------------------------------------

const POWER_MAX_ITERATIONS: usize = 20;
const POWER_TOLERANCE: f64 = 1e-8;
const POWER_MIN_DERIVATIVE: f64 = 1e-10;
const POWER_MIN_ALPHA: f64 = 0.01;

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

/// Scale both sides by the same factor so they sum to 1.
pub fn multiplicative(q1: f64, q2: f64) -> f64 {
    q1 / (q1 + q2)
}

/// Subtract half the overround from each side.
pub fn additive(q1: f64, q2: f64) -> f64 {
    let overround = q1 + q2 - 1.0;
    q1 - overround / 2.0
}

/// Raise both sides to the exponent `α` that makes them sum to 1.
///
/// `α` is found by Newton–Raphson starting from 1. The loop stops after
/// [`POWER_MAX_ITERATIONS`] steps, when the residual drops under
/// [`POWER_TOLERANCE`], or when the derivative is too flat to divide by; in
/// every case the current estimate is used.
pub fn power(q1: f64, q2: f64) -> Result<f64, InvalidOdds> {
    check_probability(q1)?;
    check_probability(q2)?;

    let (ln_q1, ln_q2) = (q1.ln(), q2.ln());
    let mut alpha = 1.0_f64;
    let mut iterations = 0;

    while iterations < POWER_MAX_ITERATIONS {
        let q1_alpha = q1.powf(alpha);
        let q2_alpha = q2.powf(alpha);
        let residual = q1_alpha + q2_alpha - 1.0;

        if residual.abs() < POWER_TOLERANCE {
            break;
        }

        let derivative = q1_alpha * ln_q1 + q2_alpha * ln_q2;
        if derivative.abs() < POWER_MIN_DERIVATIVE {
            break;
        }

        alpha = (alpha - residual / derivative).max(POWER_MIN_ALPHA);
        iterations += 1;
    }

    let q1_alpha = q1.powf(alpha);
    let q2_alpha = q2.powf(alpha);

    debug!(q1, q2, alpha, iterations, "Power devig solved");

    Ok(q1_alpha / (q1_alpha + q2_alpha))
}

/// The smallest fair probability across multiplicative, additive and power.
///
/// Ties resolve in that order.
pub fn worst_case(q1: f64, q2: f64) -> Result<DevigResult, InvalidOdds> {
    let candidates = [
        (AppliedMethod::Multiplicative, multiplicative(q1, q2)),
        (AppliedMethod::Additive, additive(q1, q2)),
        (AppliedMethod::Power, power(q1, q2)?),
    ];

    let mut best = DevigResult {
        fair_probability: candidates[0].1,
        method_used: candidates[0].0,
    };
    for &(method, fair_probability) in &candidates[1..] {
        if fair_probability < best.fair_probability {
            best = DevigResult { fair_probability, method_used: method };
        }
    }

    debug!(
        multiplicative = candidates[0].1,
        additive = candidates[1].1,
        power = candidates[2].1,
        chosen = %best.method_used,
        "Worst-case devig"
    );

    Ok(best)
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Fair probability of `price_a` given the two-way market `price_a / price_b`.
pub fn devig(price_a: f64, price_b: f64, method: DevigMethod) -> Result<DevigResult, InvalidOdds> {
    let q1 = implied_probability(price_a)?;
    let q2 = implied_probability(price_b)?;
    devig_probabilities(q1, q2, method)
}

/// Same as [`devig`], starting from implied probabilities.
pub fn devig_probabilities(q1: f64, q2: f64, method: DevigMethod) -> Result<DevigResult, InvalidOdds> {
    check_probability(q1)?;
    check_probability(q2)?;

    let result = match method {
        DevigMethod::Multiplicative => DevigResult {
            fair_probability: multiplicative(q1, q2),
            method_used: AppliedMethod::Multiplicative,
        },
        DevigMethod::Additive => DevigResult {
            fair_probability: additive(q1, q2),
            method_used: AppliedMethod::Additive,
        },
        DevigMethod::Power => DevigResult {
            fair_probability: power(q1, q2)?,
            method_used: AppliedMethod::Power,
        },
        DevigMethod::WorstCase => worst_case(q1, q2)?,
    };

    Ok(result)
}

/// Percentage of side 1's implied probability removed as margin.
pub fn market_juice_percent(implied: f64, fair: f64) -> f64 {
    (implied - fair) / implied * 100.0
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
