//! Leg parser for the compact odds grammar.
//!
//! Input is a comma-separated list of legs. A leg containing a single `/` is
//! a two-way price (`-150/130`); anything else is a fair probability in
//! percent (`60`). Every token keeps its position so failures can be reported
//! against the right leg number.

use tracing::debug;

use crate::types::{EngineError, Leg, ParseError};

/// Parse a single token into a [`Leg`].
pub fn parse_odds_token(token: &str) -> Result<Leg, ParseError> {
    let token = token.trim();
    if token.is_empty() {
        return Err(ParseError::Empty);
    }

    if token.contains('/') {
        let mut parts = token.split('/');
        let (Some(a), Some(b), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(ParseError::TooManySeparators(token.to_string()));
        };
        return Ok(Leg::OddsPair {
            price_a: parse_number(a)?,
            price_b: parse_number(b)?,
        });
    }

    Ok(Leg::RawProbability { percent: parse_number(token)? })
}

/// Parse every comma-separated token, one entry per position.
pub fn parse_legs(input: &str) -> Vec<Result<Leg, ParseError>> {
    let legs: Vec<_> = input.split(',').map(parse_odds_token).collect();
    debug!(
        input,
        legs = legs.len(),
        invalid = legs.iter().filter(|l| l.is_err()).count(),
        "Parsed legs"
    );
    legs
}

/// Unwrap parsed legs, failing on the first invalid position.
pub fn collect_legs(parsed: Vec<Result<Leg, ParseError>>) -> Result<Vec<Leg>, EngineError> {
    parsed
        .into_iter()
        .enumerate()
        .map(|(index, leg)| leg.map_err(|source| EngineError::Parse { index, source }))
        .collect()
}

fn parse_number(s: &str) -> Result<f64, ParseError> {
    let s = s.trim();
    s.parse::<f64>()
        .map_err(|_| ParseError::NotANumber(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_odds_pair() {
        assert_eq!(
            parse_odds_token("-150/130").unwrap(),
            Leg::OddsPair { price_a: -150.0, price_b: 130.0 }
        );
        assert_eq!(
            parse_odds_token("  +120 / -140 ").unwrap(),
            Leg::OddsPair { price_a: 120.0, price_b: -140.0 }
        );
    }

    #[test]
    fn test_parse_raw_probability() {
        assert_eq!(parse_odds_token("60").unwrap(), Leg::RawProbability { percent: 60.0 });
        assert_eq!(parse_odds_token(" 42.5 ").unwrap(), Leg::RawProbability { percent: 42.5 });
    }

    #[test]
    fn test_non_numeric_half_rejected() {
        assert_eq!(
            parse_odds_token("abc/50"),
            Err(ParseError::NotANumber("abc".into()))
        );
        assert_eq!(
            parse_odds_token("-110/"),
            Err(ParseError::NotANumber(String::new()))
        );
        assert_eq!(parse_odds_token("sixty"), Err(ParseError::NotANumber("sixty".into())));
    }

    #[test]
    fn test_too_many_separators_rejected() {
        assert_eq!(
            parse_odds_token("-110/-110/200"),
            Err(ParseError::TooManySeparators("-110/-110/200".into()))
        );
    }

    #[test]
    fn test_empty_token_rejected() {
        assert_eq!(parse_odds_token("   "), Err(ParseError::Empty));
    }

    #[test]
    fn test_parse_legs_example() {
        let legs = parse_legs("-150/130, 60");
        assert_eq!(legs.len(), 2);
        assert_eq!(legs[0], Ok(Leg::OddsPair { price_a: -150.0, price_b: 130.0 }));
        assert_eq!(legs[1], Ok(Leg::RawProbability { percent: 60.0 }));
    }

    #[test]
    fn test_invalid_leg_keeps_position() {
        let legs = parse_legs("-110/-110, abc/50, 55");
        assert_eq!(legs.len(), 3);
        assert!(legs[0].is_ok());
        assert!(legs[1].is_err());
        assert_eq!(legs[2], Ok(Leg::RawProbability { percent: 55.0 }));
    }

    #[test]
    fn test_empty_input_is_one_empty_leg() {
        assert_eq!(parse_legs(""), vec![Err(ParseError::Empty)]);
    }

    #[test]
    fn test_collect_legs_reports_index() {
        let err = collect_legs(parse_legs("-110/-110, abc/50, 55")).unwrap_err();
        assert_eq!(err.leg_index(), Some(1));
        assert!(matches!(err, EngineError::Parse { source: ParseError::NotANumber(_), .. }));

        let ok = collect_legs(parse_legs("-110/-110, 55")).unwrap();
        assert_eq!(ok.len(), 2);
    }
}
