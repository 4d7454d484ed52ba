//! Plain-text report rendering for terminal output.

use std::fmt::Write;

use crate::types::{AggregateNewsAnalysis, Alignment, Prediction, TradeScoreResult};

const RULE: &str =
    "======================================================================";

/// Render a composite score result as a terminal report.
pub fn score_report(ticker: &str, result: &TradeScoreResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "TRADE QUALITY SCORE: {ticker}");
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "SCORE: {:.0}/100 ({})  [base {:.0}]",
        result.final_score, result.category, result.base_score
    );
    let _ = writeln!(out, "   {}", result.category.interpretation());
    let _ = writeln!(out);
    let _ = writeln!(out, "COMPONENTS:");
    for (name, component) in &result.components {
        let _ = writeln!(
            out,
            "   {name:<10} {:>5.1}/100  (weight {:.2})",
            component.score, component.weight
        );
    }

    if !result.adjustments.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "ADJUSTMENTS:");
        for adjustment in &result.adjustments {
            let _ = writeln!(out, "   - {adjustment}");
        }
    }
    if !result.quality_flags.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "QUALITY FLAGS:");
        for flag in &result.quality_flags {
            let _ = writeln!(out, "   ! {flag}");
        }
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "{RULE}");
    out
}

/// Render the aggregate news analysis and prediction as a terminal report.
pub fn signal_report(
    ticker: &str,
    analysis: &AggregateNewsAnalysis,
    prediction: &Prediction,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "NEWS SIGNAL ANALYSIS: {ticker}");
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "AGGREGATE ANALYSIS ({} articles):",
        analysis.breakdown.total
    );
    let _ = writeln!(
        out,
        "   Direction: {} ({:.0}% confidence)",
        analysis.direction,
        analysis.confidence * 100.0
    );
    let _ = writeln!(out, "   Impact Score: {:.0}/100", analysis.avg_impact);
    let _ = writeln!(out, "   Dominant Catalyst: {}", analysis.dominant_catalyst);
    let _ = writeln!(
        out,
        "   Signal Consistency: {:.0}%",
        analysis.consistency * 100.0
    );
    let _ = writeln!(out, "   Recent Trend: {}", analysis.recent_trend);
    let _ = writeln!(out);
    let _ = writeln!(out, "MARKET PREDICTION:");
    let _ = writeln!(
        out,
        "   Prediction: {} ({})",
        prediction.direction, prediction.strength
    );
    let _ = writeln!(out, "   Confidence: {:.0}%", prediction.confidence_score);
    let _ = writeln!(out, "   Expected Move: {}", prediction.expected_move);
    let _ = writeln!(out, "   {}", prediction.confidence_level);

    if !analysis.top_signals.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "KEY SIGNALS:");
        for (i, signal) in analysis.top_signals.iter().enumerate() {
            let _ = writeln!(
                out,
                "   {}. Impact: {:.0}/100 | {} | {}",
                i + 1,
                signal.impact_score,
                signal.direction,
                signal.catalyst
            );
            if !signal.bullish_matches.is_empty() {
                let _ = writeln!(out, "      Bullish: {}", join_matches(&signal.bullish_matches));
            }
            if !signal.bearish_matches.is_empty() {
                let _ = writeln!(out, "      Bearish: {}", join_matches(&signal.bearish_matches));
            }
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "REASONING:");
    for reason in &prediction.reasoning {
        let _ = writeln!(out, "   - {reason}");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "{RULE}");
    out
}

/// One-line alignment verdict, with the warning when there is one.
pub fn alignment_line(alignment: &Alignment) -> String {
    match &alignment.warning {
        Some(warning) => format!(
            "ALIGNMENT: {} ({}/10) - {}",
            alignment.status, alignment.score, warning
        ),
        None => format!("ALIGNMENT: {} ({}/10)", alignment.status, alignment.score),
    }
}

fn join_matches(matches: &std::collections::BTreeMap<String, Vec<String>>) -> String {
    matches
        .values()
        .flat_map(|phrases| phrases.iter())
        .cloned()
        .collect::<Vec<_>>()
        .join(", ")
}
