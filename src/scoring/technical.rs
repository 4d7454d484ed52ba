//! Technical setup scoring.
//!
//! Scores the indicator snapshot 0–100 from three independent sub-scores:
//! RSI position (oversold is bullish, max 40), Bollinger Band position
//! (max 35), and MACD histogram (max 25). Tuned strictly for long entries.

use serde::Deserialize;
use serde_json::json;

use super::round1;
use crate::types::{BbStatus, Details, TechnicalSnapshot};

// ---------------------------------------------------------------------------
// Configuration (defaults — overridden by config.toml at runtime)
// ---------------------------------------------------------------------------

/// Bollinger position lookup table, on a 0–100 scale before the 0.35
/// component weight is applied. Lower positions score higher for longs.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BbWeights {
    pub below_lower: f64,
    pub lower_half: f64,
    pub middle: f64,
    pub upper_half: f64,
    pub above_upper: f64,
}

impl Default for BbWeights {
    fn default() -> Self {
        Self {
            below_lower: 100.0,
            lower_half: 70.0,
            middle: 40.0,
            upper_half: 30.0,
            above_upper: 20.0,
        }
    }
}

impl BbWeights {
    /// Raw table weight for a band position. Unmapped statuses score 0.
    pub fn weight_for(&self, status: BbStatus) -> f64 {
        match status {
            BbStatus::BelowLower => self.below_lower,
            BbStatus::LowerHalf => self.lower_half,
            BbStatus::Middle => self.middle,
            BbStatus::UpperHalf => self.upper_half,
            BbStatus::AboveUpper => self.above_upper,
            BbStatus::InsufficientData | BbStatus::Unknown => 0.0,
        }
    }
}

/// Technical component thresholds.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TechnicalConfig {
    /// RSI at or below this scores the full 40 points.
    pub rsi_perfect_oversold: f64,
    /// RSI at or below this is still a good oversold entry.
    pub rsi_good_oversold: f64,
    pub bb_weights: BbWeights,
    /// MACD histogram above this counts as positive momentum.
    pub macd_bullish: f64,
    /// MACD histogram above this counts as strong momentum (full 25 points).
    pub macd_strong_bullish: f64,
}

impl Default for TechnicalConfig {
    fn default() -> Self {
        Self {
            rsi_perfect_oversold: 15.0,
            rsi_good_oversold: 25.0,
            bb_weights: BbWeights::default(),
            macd_bullish: 0.001,
            macd_strong_bullish: 0.01,
        }
    }
}

// ---------------------------------------------------------------------------
// Scorer
// ---------------------------------------------------------------------------

pub struct TechnicalScorer {
    config: TechnicalConfig,
}

impl TechnicalScorer {
    pub fn new(config: TechnicalConfig) -> Self {
        Self { config }
    }

    /// Score the technical setup (0–100).
    ///
    /// An absent snapshot or an `INSUFFICIENT_DATA` band status short-circuits
    /// to 0 — there is no setup to evaluate.
    pub fn score(&self, technicals: Option<&TechnicalSnapshot>) -> (f64, Details) {
        let mut details = Details::new();

        let snapshot = match technicals {
            Some(t) if t.bb_status != BbStatus::InsufficientData => t,
            _ => {
                details.insert("reason".to_string(), json!("insufficient_data"));
                return (0.0, details);
            }
        };

        let mut score = 0.0;

        // RSI component (40 points max), strict for long entries
        if let Some(rsi) = snapshot.rsi {
            let rsi_score = self.rsi_score(rsi);
            score += rsi_score;
            details.insert("rsi_score".to_string(), json!(round1(rsi_score)));
            details.insert("rsi_value".to_string(), json!(round1(rsi)));
        }

        // Bollinger Band component (35 points max)
        let bb_score = self.config.bb_weights.weight_for(snapshot.bb_status) * 0.35;
        score += bb_score;
        details.insert("bb_score".to_string(), json!(round1(bb_score)));

        // MACD component (25 points max)
        if let Some(macd_hist) = snapshot.macd_hist {
            let macd_score = self.macd_score(macd_hist);
            score += macd_score;
            details.insert("macd_score".to_string(), json!(round1(macd_score)));
        }

        (score.min(100.0), details)
    }

    /// Piecewise-linear RSI curve, decreasing as RSI rises.
    fn rsi_score(&self, rsi: f64) -> f64 {
        let perfect = self.config.rsi_perfect_oversold;
        let good = self.config.rsi_good_oversold;

        if rsi <= perfect {
            40.0
        } else if rsi <= good {
            30.0 + (good - rsi) / (good - perfect) * 10.0
        } else if rsi <= 35.0 {
            // Slightly oversold, acceptable
            20.0 + (35.0 - rsi) / (35.0 - good) * 10.0
        } else if rsi <= 40.0 {
            // Borderline
            10.0
        } else if rsi <= 50.0 {
            // Neutral, not a buy
            5.0
        } else {
            // Above 50 is terrible for longs
            0.0
        }
    }

    fn macd_score(&self, macd_hist: f64) -> f64 {
        let strong = self.config.macd_strong_bullish;

        if macd_hist >= strong {
            25.0
        } else if macd_hist >= self.config.macd_bullish {
            15.0 + (macd_hist / strong) * 10.0
        } else if macd_hist >= 0.0 {
            10.0
        } else {
            // Negative histogram = bearish momentum, decays toward 0
            (10.0 + (macd_hist / strong) * 10.0).max(0.0)
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
