//! Pricing maths — odds conversion and vig removal.

pub mod devig;
pub mod odds;

pub use devig::{devig, devig_probabilities, market_juice_percent};
pub use odds::{decimal_multiplier, implied_probability, probability_to_american_odds};
