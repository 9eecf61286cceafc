//! Text rendering of a bet evaluation.
//!
//! Produces the line-per-item summary shown by the web front-end:
//!
//! ```text
//! Worst-case (Multiplicative)
//! Leg#1 (-150); Market Juice = 3.4%; Fair Value = -138 (58.0%)
//! Leg#2 (60%); Fair Value = -150 (60.0%)
//! Final Odds: 200; Fair Value = 187 (34.8%)
//! Summary: EV% = 4.4%, Kelly Wager = $10.92 (Full=2.18u, 1/2=1.09u, 1/4=0.55u)
//! ```

use crate::types::{BetEvaluation, DevigMethod, Leg, LegValuation};

/// Render every line of the report, header first.
pub fn render(eval: &BetEvaluation) -> Vec<String> {
    let mut lines = Vec::with_capacity(eval.per_leg.len() + 3);

    let (header, uniform) = method_header(eval);
    lines.push(header);

    // Mixed worst-case picks are tagged per leg instead of in the header.
    let tag_legs = eval.method == DevigMethod::WorstCase && !uniform;
    for (i, valuation) in eval.per_leg.iter().enumerate() {
        lines.push(leg_line(i + 1, valuation, tag_legs));
    }

    let combined_odds = eval
        .combined_fair_odds
        .map(|o| o.to_string())
        .unwrap_or_else(|| "n/a".to_string());
    lines.push(format!(
        "Final Odds: {}; Fair Value = {} ({:.1}%)",
        eval.payout_price,
        combined_odds,
        eval.combined_fair_probability * 100.0,
    ));

    lines.push(summary_line(eval));
    lines
}

/// Header line, and whether every odds leg used the same concrete method.
fn method_header(eval: &BetEvaluation) -> (String, bool) {
    let mut applied = eval.per_leg.iter().filter_map(|v| v.method_used);
    let Some(first) = applied.next() else {
        return (eval.method.to_string(), true);
    };
    let uniform = applied.all(|m| m == first);

    if eval.method == DevigMethod::WorstCase && uniform {
        (format!("{} ({})", eval.method, first), true)
    } else {
        (eval.method.to_string(), uniform)
    }
}

fn leg_line(number: usize, valuation: &LegValuation, tag_method: bool) -> String {
    let fair_pct = valuation.fair_probability * 100.0;
    match valuation.leg {
        Leg::OddsPair { price_a, .. } => {
            let mut line = format!(
                "Leg#{number} ({price_a}); Market Juice = {:.1}%; Fair Value = {:+} ({fair_pct:.1}%)",
                valuation.market_juice_percent.unwrap_or(0.0),
                valuation.fair_odds,
            );
            if let (true, Some(method)) = (tag_method, valuation.method_used) {
                line.push_str(&format!(" [{method}]"));
            }
            line
        }
        Leg::RawProbability { percent } => format!(
            "Leg#{number} ({percent}%); Fair Value = {:+} ({fair_pct:.1}%)",
            valuation.fair_odds,
        ),
    }
}

fn summary_line(eval: &BetEvaluation) -> String {
    let k = &eval.kelly;
    if k.is_profitable {
        format!(
            "Summary: EV% = {:.1}%, Kelly Wager = ${:.2} (Full={:.2}u, 1/2={:.2}u, 1/4={:.2}u)",
            k.edge_percent,
            k.recommended_wager_amount,
            k.full_kelly_units,
            k.half_kelly_units,
            k.quarter_kelly_units,
        )
    } else {
        format!(
            "Summary: EV% = {:.1}% - No profitable Kelly wager (negative edge)",
            k.edge_percent
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::evaluate_input;

    #[test]
    fn test_render_worst_case_example() {
        let eval = evaluate_input("-150/130, 60", 200.0, 1000.0, 0.5, DevigMethod::WorstCase).unwrap();
        let lines = render(&eval);
        assert_eq!(
            lines,
            vec![
                "Worst-case (Multiplicative)".to_string(),
                "Leg#1 (-150); Market Juice = 3.4%; Fair Value = -138 (58.0%)".to_string(),
                "Leg#2 (60%); Fair Value = -150 (60.0%)".to_string(),
                "Final Odds: 200; Fair Value = 187 (34.8%)".to_string(),
                "Summary: EV% = 4.4%, Kelly Wager = $10.92 (Full=2.18u, 1/2=1.09u, 1/4=0.55u)"
                    .to_string(),
            ]
        );
    }

    #[test]
    fn test_render_fixed_method_header() {
        let eval = evaluate_input("-110/-110", 100.0, 1000.0, 0.5, DevigMethod::Additive).unwrap();
        assert_eq!(render(&eval)[0], "Additive");
    }

    #[test]
    fn test_render_mixed_worst_case_tags_legs() {
        // favourite → multiplicative, longshot → power
        let eval =
            evaluate_input("-300/240, 240/-300", 1000.0, 100.0, 0.5, DevigMethod::WorstCase).unwrap();
        let lines = render(&eval);
        assert_eq!(lines[0], "Worst-case");
        assert!(lines[1].ends_with("[Multiplicative]"), "{}", lines[1]);
        assert!(lines[2].ends_with("[Power]"), "{}", lines[2]);
    }

    #[test]
    fn test_render_raw_only_worst_case() {
        let eval = evaluate_input("55", -110.0, 1000.0, 0.5, DevigMethod::WorstCase).unwrap();
        assert_eq!(render(&eval)[0], "Worst-case");
    }

    #[test]
    fn test_render_unprofitable_summary() {
        let eval = evaluate_input("45", -110.0, 1000.0, 0.5, DevigMethod::Power).unwrap();
        let lines = render(&eval);
        let summary = lines.last().unwrap();
        assert!(summary.contains("No profitable Kelly wager"), "{summary}");
        assert!(summary.starts_with("Summary: EV% = -"));
    }
}
