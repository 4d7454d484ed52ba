//! Momentum and trend quality scoring.
//!
//! Trend direction contributes up to 60 points via a lookup table;
//! volatility (ATR as % of price) contributes up to 40 with a sweet-spot
//! curve that penalizes both dead and violent tape.

use serde::Deserialize;
use serde_json::json;

use super::round1;
use crate::types::{Details, TechnicalSnapshot, Trend};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Trend lookup table on a 0–100 scale before the 0.6 component weight.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TrendWeights {
    pub uptrend: f64,
    pub sideways: f64,
    pub downtrend: f64,
    pub unknown: f64,
    pub insufficient_data: f64,
}

impl Default for TrendWeights {
    fn default() -> Self {
        Self {
            uptrend: 100.0,
            sideways: 60.0,
            downtrend: 20.0,
            unknown: 40.0,
            insufficient_data: 0.0,
        }
    }
}

impl TrendWeights {
    pub fn weight_for(&self, trend: Trend) -> f64 {
        match trend {
            Trend::Uptrend => self.uptrend,
            Trend::Sideways => self.sideways,
            Trend::Downtrend => self.downtrend,
            Trend::Unknown => self.unknown,
            Trend::InsufficientData => self.insufficient_data,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MomentumConfig {
    pub trend_weights: TrendWeights,
    /// ATR% at or below this is the volatility sweet spot (full 40 points).
    pub volatility_optimal: f64,
    /// Still acceptable.
    pub volatility_max_good: f64,
    /// Above this the stop distance makes the trade too risky.
    pub volatility_too_high: f64,
}

impl Default for MomentumConfig {
    fn default() -> Self {
        Self {
            trend_weights: TrendWeights::default(),
            volatility_optimal: 3.0,
            volatility_max_good: 5.0,
            volatility_too_high: 8.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Scorer
// ---------------------------------------------------------------------------

pub struct MomentumScorer {
    config: MomentumConfig,
}

impl MomentumScorer {
    pub fn new(config: MomentumConfig) -> Self {
        Self { config }
    }

    /// Score momentum quality (0–100). Missing ATR skips the volatility
    /// term; a missing snapshot scores 0.
    pub fn score(&self, technicals: Option<&TechnicalSnapshot>) -> (f64, Details) {
        let mut details = Details::new();

        let snapshot = match technicals {
            Some(t) => t,
            None => {
                details.insert("reason".to_string(), json!("no_data"));
                return (0.0, details);
            }
        };

        // Trend component (60 points max)
        let trend_score = self.config.trend_weights.weight_for(snapshot.trend) * 0.6;
        let mut score = trend_score;
        details.insert("trend_score".to_string(), json!(round1(trend_score)));

        // Volatility component (40 points max)
        if let Some(atr_pct) = snapshot.atr_pct {
            let vol_score = self.volatility_score(atr_pct);
            score += vol_score;
            details.insert("volatility_score".to_string(), json!(round1(vol_score)));
            details.insert("atr_pct".to_string(), json!((atr_pct * 100.0).round() / 100.0));
        }

        (score.min(100.0), details)
    }

    fn volatility_score(&self, atr_pct: f64) -> f64 {
        let optimal = self.config.volatility_optimal;
        let max_good = self.config.volatility_max_good;
        let too_high = self.config.volatility_too_high;

        if atr_pct <= optimal {
            40.0
        } else if atr_pct <= max_good {
            30.0 + (max_good - atr_pct) / (max_good - optimal) * 10.0
        } else if atr_pct <= too_high {
            // Getting risky
            15.0 + (too_high - atr_pct) / (too_high - max_good) * 15.0
        } else {
            // Too volatile
            (15.0 - (atr_pct - too_high) * 2.0).max(0.0)
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
