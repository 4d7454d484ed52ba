//! Multi-article aggregation and directional prediction.
//!
//! Runs the extractor over every headline in a batch, aggregates the
//! per-article signals (direction counts, impact, catalyst frequency,
//! consistency, recent trend), and turns the aggregate into a directional
//! prediction with strength, expected move size, and reasoning.

use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::debug;

use super::extractor::SignalExtractor;
use crate::types::{
    AggregateDirection, AggregateNewsAnalysis, ArticleSignal, ConfidenceLevel, Direction,
    ExpectedMove, Headline, NewsBreakdown, Prediction, PredictionStrength,
};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PredictorConfig {
    /// Aggregate confidence needed before the aggregate direction is used.
    pub min_confidence: f64,
    /// Confidence at or above this makes a STRONG prediction.
    pub strong_confidence: f64,
    /// Average impact needed for an EMERGING call off the recent trend.
    pub emerging_min_impact: f64,
    /// Consistency share worth noting in the reasoning.
    pub consistency_note: f64,
    /// Average impact worth noting the catalyst in the reasoning.
    pub impact_note: f64,
    /// `impact × confidence` breakpoints for the expected-move buckets.
    pub move_large: f64,
    pub move_moderate: f64,
    pub move_small: f64,
    /// Number of most-recent articles the recent-trend read uses.
    pub recent_window: usize,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            min_confidence: 0.6,
            strong_confidence: 0.75,
            emerging_min_impact: 50.0,
            consistency_note: 0.7,
            impact_note: 60.0,
            move_large: 70.0,
            move_moderate: 50.0,
            move_small: 30.0,
            recent_window: 3,
        }
    }
}

// ---------------------------------------------------------------------------
// Predictor
// ---------------------------------------------------------------------------

/// Aggregates per-headline signals into a market prediction.
/// Input batches are expected most-recent-first.
pub struct NewsPredictor {
    extractor: SignalExtractor,
    config: PredictorConfig,
}

impl Default for NewsPredictor {
    fn default() -> Self {
        Self::new(SignalExtractor::default(), PredictorConfig::default())
    }
}

impl NewsPredictor {
    pub fn new(extractor: SignalExtractor, config: PredictorConfig) -> Self {
        Self { extractor, config }
    }

    /// Analyze a headline batch into an aggregate signal picture.
    /// An empty batch yields the all-neutral zero-confidence aggregate.
    pub fn analyze(&self, headlines: &[Headline]) -> AggregateNewsAnalysis {
        if headlines.is_empty() {
            return AggregateNewsAnalysis {
                direction: AggregateDirection::Neutral,
                confidence: 0.0,
                avg_impact: 0.0,
                dominant_catalyst: "NONE".to_string(),
                consistency: 0.0,
                recent_trend: Direction::Neutral,
                breakdown: NewsBreakdown::default(),
                top_signals: Vec::new(),
            };
        }

        let signals: Vec<ArticleSignal> = headlines
            .iter()
            .map(|h| self.extractor.extract(&h.text))
            .collect();
        let total = signals.len();

        let bullish = signals
            .iter()
            .filter(|s| s.direction == Direction::Bullish)
            .count();
        let bearish = signals
            .iter()
            .filter(|s| s.direction == Direction::Bearish)
            .count();
        let neutral = total - bullish - bearish;

        // Decisive direction requires a lead of more than one article
        let (direction, confidence) = if bullish > bearish + 1 {
            (AggregateDirection::Bullish, bullish as f64 / total as f64)
        } else if bearish > bullish + 1 {
            (AggregateDirection::Bearish, bearish as f64 / total as f64)
        } else {
            (
                AggregateDirection::Mixed,
                bullish.max(bearish) as f64 / total as f64,
            )
        };

        let avg_impact =
            signals.iter().map(|s| s.impact_score).sum::<f64>() / total as f64;

        let dominant_catalyst = dominant_catalyst(&signals);

        let consistency = bullish.max(bearish).max(neutral) as f64 / total as f64;

        let recent_trend = recent_trend(&signals, self.config.recent_window);

        let mut top_signals = signals;
        top_signals.sort_by(|a, b| {
            b.impact_score
                .partial_cmp(&a.impact_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        top_signals.truncate(3);

        debug!(
            total,
            bullish,
            bearish,
            %direction,
            avg_impact = format!("{avg_impact:.1}"),
            catalyst = %dominant_catalyst,
            "Headline batch analyzed"
        );

        AggregateNewsAnalysis {
            direction,
            confidence: round2(confidence),
            avg_impact: round1(avg_impact),
            dominant_catalyst,
            consistency: round2(consistency),
            recent_trend,
            breakdown: NewsBreakdown {
                total,
                bullish,
                bearish,
                neutral,
            },
            top_signals,
        }
    }

    /// Turn an aggregate analysis into a directional prediction.
    pub fn predict(&self, analysis: &AggregateNewsAnalysis) -> Prediction {
        let c = &self.config;

        let (direction, strength) = if matches!(
            analysis.direction,
            AggregateDirection::Bullish | AggregateDirection::Bearish
        ) && analysis.confidence >= c.min_confidence
        {
            let strength = if analysis.confidence >= c.strong_confidence {
                PredictionStrength::Strong
            } else {
                PredictionStrength::Moderate
            };
            (analysis.direction.as_direction(), strength)
        } else if analysis.recent_trend != Direction::Neutral
            && analysis.avg_impact >= c.emerging_min_impact
        {
            // Aggregate is mixed but the latest articles lean one way
            (analysis.recent_trend, PredictionStrength::Emerging)
        } else {
            (Direction::Neutral, PredictionStrength::Unclear)
        };

        let mut reasoning = Vec::new();
        if analysis.consistency >= c.consistency_note {
            reasoning.push(format!(
                "{:.0}% of articles aligned",
                analysis.consistency * 100.0
            ));
        }
        if analysis.avg_impact >= c.impact_note {
            reasoning.push(format!(
                "High impact catalyst: {}",
                analysis.dominant_catalyst
            ));
        }
        if analysis.recent_trend != Direction::Neutral
            && analysis.recent_trend != analysis.direction.as_direction()
        {
            reasoning.push(format!("Recent trend shifting {}", analysis.recent_trend));
        }
        if reasoning.is_empty() {
            reasoning.push("Insufficient signal strength".to_string());
        }

        Prediction {
            direction,
            strength,
            confidence_score: (analysis.confidence * 100.0).round(),
            expected_move: self.expected_move(analysis.avg_impact, analysis.confidence),
            catalyst: analysis.dominant_catalyst.clone(),
            reasoning,
            confidence_level: self.confidence_level(analysis),
        }
    }

    /// Convenience: analyze and predict in one call.
    pub fn predict_from_news(&self, headlines: &[Headline]) -> Prediction {
        self.predict(&self.analyze(headlines))
    }

    fn expected_move(&self, impact: f64, confidence: f64) -> ExpectedMove {
        let combined = impact * confidence;
        if combined >= self.config.move_large {
            ExpectedMove::Large
        } else if combined >= self.config.move_moderate {
            ExpectedMove::Moderate
        } else if combined >= self.config.move_small {
            ExpectedMove::Small
        } else {
            ExpectedMove::Minimal
        }
    }

    fn confidence_level(&self, analysis: &AggregateNewsAnalysis) -> ConfidenceLevel {
        let conf = analysis.confidence;
        let cons = analysis.consistency;
        let impact = analysis.avg_impact;

        if conf >= 0.7 && cons >= 0.7 && impact >= 60.0 {
            ConfidenceLevel::High
        } else if conf >= 0.6 && cons >= 0.6 && impact >= 40.0 {
            ConfidenceLevel::Moderate
        } else if conf >= 0.5 {
            ConfidenceLevel::Low
        } else {
            ConfidenceLevel::VeryLow
        }
    }
}

/// Most frequent non-NONE per-article catalyst. Ties resolve to the
/// alphabetically first category so results stay deterministic.
fn dominant_catalyst(signals: &[ArticleSignal]) -> String {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for signal in signals {
        if signal.catalyst != "NONE" {
            *counts.entry(signal.catalyst.as_str()).or_insert(0) += 1;
        }
    }
    counts
        .iter()
        .max_by_key(|(_, count)| **count)
        .map_or_else(|| "NONE".to_string(), |(name, _)| name.to_string())
}

/// Simple majority over the most recent articles; ties are neutral.
fn recent_trend(signals: &[ArticleSignal], window: usize) -> Direction {
    let recent = &signals[..signals.len().min(window)];
    let bullish = recent
        .iter()
        .filter(|s| s.direction == Direction::Bullish)
        .count();
    let bearish = recent
        .iter()
        .filter(|s| s.direction == Direction::Bearish)
        .count();

    if bullish > bearish {
        Direction::Bullish
    } else if bearish > bullish {
        Direction::Bearish
    } else {
        Direction::Neutral
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
