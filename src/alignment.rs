//! Reconciliation of the technical score against the news prediction.
//!
//! A bullish news story on an overbought chart is a very different trade
//! from the same story on an oversold one. This check ranks the agreement
//! between the two engines on a 0-10 scale and attaches a warning when
//! they disagree.

use tracing::debug;

use crate::config::Thresholds;
use crate::types::{
    Alignment, AlignmentStatus, Direction, Prediction, TechnicalSnapshot, TradeScoreResult, Trend,
};

/// Confidence (0-100) the news prediction needs before full-score
/// agreement counts as strong confluence.
const CONFLUENCE_MIN_CONFIDENCE: f64 = 70.0;

/// RSI above which a bullish-news setup is too early to chase.
const TOO_EARLY_RSI: f64 = 50.0;

pub fn check_alignment(
    result: &TradeScoreResult,
    prediction: &Prediction,
    technicals: Option<&TechnicalSnapshot>,
    thresholds: &Thresholds,
) -> Alignment {
    let tech_bullish = result.final_score >= thresholds.buy;

    let alignment = match (prediction.direction, tech_bullish) {
        (Direction::Bullish, true) => {
            if result.final_score >= thresholds.strong_buy
                && prediction.confidence_score >= CONFLUENCE_MIN_CONFIDENCE
            {
                Alignment {
                    status: AlignmentStatus::StrongConfluence,
                    score: 10,
                    warning: None,
                }
            } else {
                Alignment {
                    status: AlignmentStatus::BullishAlignment,
                    score: 8,
                    warning: None,
                }
            }
        }
        (Direction::Bearish, false) => Alignment {
            status: AlignmentStatus::BearishAlignment,
            score: 2,
            warning: Some("Both technicals and news are bearish - AVOID".to_string()),
        },
        (Direction::Bearish, true) => Alignment {
            status: AlignmentStatus::Divergence,
            score: 4,
            warning: Some("Technical buy signal BUT bearish news - HIGH RISK".to_string()),
        },
        (Direction::Bullish, false) => bullish_news_weak_chart(technicals),
        (Direction::Neutral, _) => Alignment {
            status: AlignmentStatus::Unclear,
            score: 5,
            warning: Some("Mixed signals - wait for clarity".to_string()),
        },
    };

    debug!(
        status = %alignment.status,
        score = alignment.score,
        final_score = result.final_score,
        news = %prediction.direction,
        "Alignment checked"
    );

    alignment
}

/// Bullish news on a chart that has not earned a buy score yet: explain
/// what the chart is missing.
fn bullish_news_weak_chart(technicals: Option<&TechnicalSnapshot>) -> Alignment {
    if let Some(snapshot) = technicals {
        if let Some(rsi) = snapshot.rsi {
            if rsi > TOO_EARLY_RSI {
                return Alignment {
                    status: AlignmentStatus::TooEarly,
                    score: 6,
                    warning: Some(format!(
                        "Bullish news BUT not oversold (RSI {rsi:.0}) - WAIT for dip"
                    )),
                };
            }
        }
        if snapshot.trend == Trend::Downtrend {
            return Alignment {
                status: AlignmentStatus::Premature,
                score: 5,
                warning: Some("Bullish news BUT downtrend - WAIT for reversal".to_string()),
            };
        }
    }
    Alignment {
        status: AlignmentStatus::WeakSetup,
        score: 5,
        warning: Some("Bullish news but technical score too low".to_string()),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
