//! Shared types for the devig engine.
//!
//! These types form the data model passed between the parser, the pricing
//! functions, the Kelly sizer, and the HTTP layer. Everything here is a
//! request-scoped value: built once, read, then dropped.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Legs
// ---------------------------------------------------------------------------

/// One component of a (possibly multi-leg) bet.
///
/// Serialises with a `type` tag so the web front-end sees
/// `{"type": "odds", "odds1": -150, "odds2": 130}` or
/// `{"type": "probability", "value": 60}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Leg {
    /// Two-way market: the side being priced and its opposing side, both in
    /// American odds.
    #[serde(rename = "odds")]
    OddsPair {
        #[serde(rename = "odds1")]
        price_a: f64,
        #[serde(rename = "odds2")]
        price_b: f64,
    },
    /// A probability already believed to be fair, on a 0–100 scale.
    #[serde(rename = "probability")]
    RawProbability {
        #[serde(rename = "value")]
        percent: f64,
    },
}

impl fmt::Display for Leg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Leg::OddsPair { price_a, price_b } => write!(f, "{price_a}/{price_b}"),
            Leg::RawProbability { percent } => write!(f, "{percent}%"),
        }
    }
}

// ---------------------------------------------------------------------------
// Devig methods
// ---------------------------------------------------------------------------

/// Strategy requested for removing the bookmaker margin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DevigMethod {
    Multiplicative,
    Additive,
    Power,
    /// Run the other three and keep the smallest fair probability.
    #[default]
    WorstCase,
}

impl DevigMethod {
    pub const ALL: &'static [DevigMethod] = &[
        DevigMethod::Multiplicative,
        DevigMethod::Additive,
        DevigMethod::Power,
        DevigMethod::WorstCase,
    ];

    /// Wire name, as accepted by `FromStr` and the HTTP API.
    pub fn as_str(&self) -> &'static str {
        match self {
            DevigMethod::Multiplicative => "multiplicative",
            DevigMethod::Additive => "additive",
            DevigMethod::Power => "power",
            DevigMethod::WorstCase => "worst_case",
        }
    }
}

impl fmt::Display for DevigMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DevigMethod::Multiplicative => write!(f, "Multiplicative"),
            DevigMethod::Additive => write!(f, "Additive"),
            DevigMethod::Power => write!(f, "Power"),
            DevigMethod::WorstCase => write!(f, "Worst-case"),
        }
    }
}

/// Parse a wire name (case-insensitive, `-` and `_` interchangeable).
impl std::str::FromStr for DevigMethod {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "multiplicative" => Ok(DevigMethod::Multiplicative),
            "additive" => Ok(DevigMethod::Additive),
            "power" => Ok(DevigMethod::Power),
            "worst_case" | "worstcase" => Ok(DevigMethod::WorstCase),
            other => Err(anyhow::anyhow!("Unknown devig method: {other}")),
        }
    }
}

/// The concrete margin model that produced a fair probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppliedMethod {
    Multiplicative,
    Additive,
    Power,
}

impl fmt::Display for AppliedMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppliedMethod::Multiplicative => write!(f, "Multiplicative"),
            AppliedMethod::Additive => write!(f, "Additive"),
            AppliedMethod::Power => write!(f, "Power"),
        }
    }
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// Fair probability of the first side of an odds pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DevigResult {
    pub fair_probability: f64,
    pub method_used: AppliedMethod,
}

/// Fair value of a single leg, as it enters the combined probability.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LegValuation {
    pub leg: Leg,
    pub fair_probability: f64,
    /// `None` for raw probability legs (no devig applied).
    pub method_used: Option<AppliedMethod>,
    /// Share of the first side's implied probability that was margin.
    pub market_juice_percent: Option<f64>,
    pub fair_odds: i64,
}

/// Kelly sizing for the bet actually being placed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct KellyResult {
    /// Implied probability of the payout price.
    pub payout_probability: f64,
    /// Expected value relative to the payout price, in percent.
    pub edge_percent: f64,
    /// Full-Kelly fraction of bankroll, in percent.
    pub kelly_percentage: f64,
    pub full_kelly_units: f64,
    pub half_kelly_units: f64,
    pub quarter_kelly_units: f64,
    /// Zero whenever the bet is not profitable.
    pub recommended_wager_amount: f64,
    pub is_profitable: bool,
}

impl fmt::Display for KellyResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "EV {:+.1}% | Kelly {:.2}% | wager ${:.2}{}",
            self.edge_percent,
            self.kelly_percentage,
            self.recommended_wager_amount,
            if self.is_profitable { "" } else { " (no bet)" },
        )
    }
}

/// Full evaluation of a multi-leg bet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BetEvaluation {
    pub method: DevigMethod,
    pub per_leg: Vec<LegValuation>,
    pub combined_fair_probability: f64,
    pub combined_fair_odds: Option<i64>,
    pub payout_price: f64,
    pub kelly: KellyResult,
}

impl BetEvaluation {
    /// Per-leg fair probabilities in input order.
    pub fn per_leg_fair_values(&self) -> Vec<f64> {
        self.per_leg.iter().map(|v| v.fair_probability).collect()
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// A token that does not match the odds grammar.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("Empty leg")]
    Empty,

    #[error("Expected exactly one '/' in {0:?}")]
    TooManySeparators(String),

    #[error("Not a number: {0:?}")]
    NotANumber(String),
}

/// Prices or probabilities outside the domain the pricing maths accepts.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvalidOdds {
    #[error("American odds cannot be zero")]
    ZeroPrice,

    #[error("American odds must be finite, got {0}")]
    NonFinitePrice(f64),

    #[error("Probability {0} is outside (0, 1)")]
    ProbabilityOutOfRange(f64),

    #[error("Percentage {0} is outside (0, 100)")]
    PercentOutOfRange(f64),
}

/// Failure of a full bet evaluation. `index` is 0-based; messages show the
/// 1-based leg number.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    #[error("Invalid leg data for leg {}: {source}", .index + 1)]
    Parse { index: usize, source: ParseError },

    #[error("Invalid odds for leg {}: {source}", .index + 1)]
    InvalidOdds { index: usize, source: InvalidOdds },

    #[error("Invalid payout odds: {0}")]
    Payout(InvalidOdds),

    #[error("Invalid stake input: {0}")]
    InvalidStake(String),

    #[error("No legs supplied")]
    NoLegs,
}

impl EngineError {
    /// Index of the offending leg, if the failure is leg-specific.
    pub fn leg_index(&self) -> Option<usize> {
        match self {
            EngineError::Parse { index, .. } | EngineError::InvalidOdds { index, .. } => {
                Some(*index)
            }
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
