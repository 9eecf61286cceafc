//! American odds ↔ probability conversion.

use crate::types::InvalidOdds;

/// Implied probability of an American-odds price.
///
/// `+130` → `100 / 230`, `-150` → `150 / 250`. Zero and non-finite prices are
/// rejected, as is any price so extreme that the result rounds to 0 or 1.
pub fn implied_probability(price: f64) -> Result<f64, InvalidOdds> {
    check_price(price)?;

    let prob = if price > 0.0 {
        100.0 / (price + 100.0)
    } else {
        let abs = price.abs();
        abs / (abs + 100.0)
    };

    check_probability(prob)?;
    Ok(prob)
}

/// Slack absorbed before truncating, so 0.6 prices at -150 rather than -149
/// (0.6 / 0.4 * 100 evaluates to 149.99999999999997).
const TRUNCATION_SLACK: f64 = 1e-9;

/// American odds for a probability, truncated toward zero.
///
/// Exactly 0.5 is treated as a favourite and maps to `-100`.
pub fn probability_to_american_odds(prob: f64) -> Result<i64, InvalidOdds> {
    check_probability(prob)?;

    let odds = if prob >= 0.5 {
        -((prob / (1.0 - prob)) * 100.0 + TRUNCATION_SLACK).trunc()
    } else {
        (((1.0 - prob) / prob) * 100.0 + TRUNCATION_SLACK).trunc()
    };

    Ok(odds as i64)
}

/// Net winnings per unit staked (`b` in the Kelly formula).
pub fn decimal_multiplier(price: f64) -> Result<f64, InvalidOdds> {
    check_price(price)?;
    Ok(if price > 0.0 { price / 100.0 } else { 100.0 / price.abs() })
}

pub(crate) fn check_price(price: f64) -> Result<(), InvalidOdds> {
    if !price.is_finite() {
        return Err(InvalidOdds::NonFinitePrice(price));
    }
    if price == 0.0 {
        return Err(InvalidOdds::ZeroPrice);
    }
    Ok(())
}

/// Open interval (0, 1); NaN fails too.
pub(crate) fn check_probability(prob: f64) -> Result<(), InvalidOdds> {
    if prob > 0.0 && prob < 1.0 {
        Ok(())
    } else {
        Err(InvalidOdds::ProbabilityOutOfRange(prob))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_implied_probability_favourite_and_underdog() {
        assert!((implied_probability(-150.0).unwrap() - 0.6).abs() < 1e-12);
        assert!((implied_probability(130.0).unwrap() - 100.0 / 230.0).abs() < 1e-12);
        assert!((implied_probability(-110.0).unwrap() - 110.0 / 210.0).abs() < 1e-12);
    }

    #[test]
    fn test_even_money_is_exactly_half() {
        assert_eq!(implied_probability(100.0).unwrap(), 0.5);
        assert_eq!(implied_probability(-100.0).unwrap(), 0.5);
    }

    #[test]
    fn test_implied_probability_monotonic() {
        let favourites = [-105.0, -150.0, -300.0, -1000.0, -5000.0];
        for w in favourites.windows(2) {
            let a = implied_probability(w[0]).unwrap();
            let b = implied_probability(w[1]).unwrap();
            assert!(b > a, "{} should be more likely than {}", w[1], w[0]);
        }

        let underdogs = [105.0, 150.0, 300.0, 1000.0, 5000.0];
        for w in underdogs.windows(2) {
            let a = implied_probability(w[0]).unwrap();
            let b = implied_probability(w[1]).unwrap();
            assert!(b < a, "{} should be less likely than {}", w[1], w[0]);
        }
    }

    #[test]
    fn test_zero_price_rejected() {
        assert_eq!(implied_probability(0.0), Err(InvalidOdds::ZeroPrice));
        assert_eq!(decimal_multiplier(0.0), Err(InvalidOdds::ZeroPrice));
    }

    #[test]
    fn test_non_finite_price_rejected() {
        assert!(matches!(implied_probability(f64::NAN), Err(InvalidOdds::NonFinitePrice(_))));
        assert!(matches!(
            implied_probability(f64::INFINITY),
            Err(InvalidOdds::NonFinitePrice(_))
        ));
    }

    #[test]
    fn test_saturated_price_rejected() {
        // 1e20 / (1e20 + 100) rounds to exactly 1.0
        assert!(matches!(
            implied_probability(-1e20),
            Err(InvalidOdds::ProbabilityOutOfRange(_))
        ));
    }

    #[test]
    fn test_probability_to_american_odds() {
        assert_eq!(probability_to_american_odds(0.6).unwrap(), -150);
        assert_eq!(probability_to_american_odds(0.4).unwrap(), 150);
        assert_eq!(probability_to_american_odds(0.75).unwrap(), -300);
        assert_eq!(probability_to_american_odds(0.2).unwrap(), 400);
    }

    #[test]
    fn test_half_maps_to_favourite_branch() {
        assert_eq!(probability_to_american_odds(0.5).unwrap(), -100);
    }

    #[test]
    fn test_probability_to_american_odds_truncates() {
        // 0.3 → 233.33… → 233
        assert_eq!(probability_to_american_odds(0.3).unwrap(), 233);
        // 0.7 → -233.33… → -233
        assert_eq!(probability_to_american_odds(0.7).unwrap(), -233);
    }

    #[test]
    fn test_probability_to_american_odds_rejects_out_of_range() {
        for p in [0.0, 1.0, -0.2, 1.5, f64::NAN] {
            assert!(probability_to_american_odds(p).is_err(), "{p} should be rejected");
        }
    }

    #[test]
    fn test_round_trip_within_one_point() {
        let mut p = 0.02;
        while p < 0.99 {
            let odds = probability_to_american_odds(p).unwrap();
            let back = implied_probability(odds as f64).unwrap();
            assert!((back - p).abs() <= 0.01, "p={p} odds={odds} back={back}");
            p += 0.01;
        }
    }

    #[test]
    fn test_decimal_multiplier() {
        assert!((decimal_multiplier(150.0).unwrap() - 1.5).abs() < 1e-12);
        assert!((decimal_multiplier(-110.0).unwrap() - 100.0 / 110.0).abs() < 1e-12);
        assert_eq!(decimal_multiplier(100.0).unwrap(), 1.0);
    }
}
