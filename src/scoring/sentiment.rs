//! Sentiment quality scoring.
//!
//! Combines the upstream sentiment float with news volume as a confidence
//! proxy. The sentiment input comes from an external keyword-sentiment
//! module and is clamped defensively at this boundary.

use serde::Deserialize;
use serde_json::json;

use super::round1;
use crate::types::Details;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SentimentConfig {
    /// Sentiment at or above this scores the full 70-point base.
    pub perfect_positive: f64,
    /// Good positive sentiment breakpoint.
    pub good_positive: f64,
    /// Divisor applied to the base when sentiment is negative.
    pub negative_penalty: f64,
    /// Article counts for the volume component.
    pub min_news_count: u32,
    pub optimal_news_count: u32,
    /// Above this, coverage is treated as noise.
    pub max_news_count: u32,
}

impl Default for SentimentConfig {
    fn default() -> Self {
        Self {
            perfect_positive: 0.8,
            good_positive: 0.5,
            negative_penalty: 2.0,
            min_news_count: 3,
            optimal_news_count: 8,
            max_news_count: 20,
        }
    }
}

// ---------------------------------------------------------------------------
// Scorer
// ---------------------------------------------------------------------------

pub struct SentimentScorer {
    config: SentimentConfig,
}

impl SentimentScorer {
    pub fn new(config: SentimentConfig) -> Self {
        Self { config }
    }

    /// Score sentiment quality (0–100) from the sentiment float and the
    /// number of articles behind it. Out-of-range sentiment is clamped.
    pub fn score(&self, sentiment: f64, news_count: u32) -> (f64, Details) {
        let sentiment = sentiment.clamp(-1.0, 1.0);
        let mut details = Details::new();

        // Base sentiment score (70 points max)
        let mut base = self.base_score(sentiment);
        if sentiment < 0.0 {
            // Negative news penalty
            base /= self.config.negative_penalty;
        }
        details.insert("sentiment_base".to_string(), json!(round1(base)));

        // News volume confidence (30 points max)
        let volume = self.volume_score(news_count);
        details.insert("news_volume_score".to_string(), json!(round1(volume)));

        ((base + volume).min(100.0), details)
    }

    /// Five-segment piecewise-linear curve peaking at 70, declining to 0
    /// at sentiment -1.0.
    fn base_score(&self, sentiment: f64) -> f64 {
        let perfect = self.config.perfect_positive;
        let good = self.config.good_positive;

        if sentiment >= perfect {
            70.0
        } else if sentiment >= good {
            50.0 + (sentiment - good) / (perfect - good) * 20.0
        } else if sentiment >= 0.0 {
            30.0 + (sentiment / good) * 20.0
        } else if sentiment >= -good {
            // Slightly negative
            20.0 + (sentiment + good) / good * 10.0
        } else {
            // Very negative: linear down to 0 at -1.0
            (20.0 * (sentiment + 1.0) / (1.0 - good)).max(0.0)
        }
    }

    fn volume_score(&self, news_count: u32) -> f64 {
        let min = self.config.min_news_count;
        let optimal = self.config.optimal_news_count;

        let mut score = if news_count >= optimal {
            30.0
        } else if news_count >= min {
            15.0 + (news_count - min) as f64 / (optimal - min) as f64 * 15.0
        } else if news_count > 0 {
            // Some news is better than none
            news_count as f64 / min as f64 * 15.0
        } else {
            0.0
        };

        // Too much coverage = noise
        if news_count > self.config.max_news_count {
            score *= 0.8;
        }
        score
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn scorer() -> SentimentScorer {
        SentimentScorer::new(SentimentConfig::default())
    }

    #[test]
    fn test_perfect_sentiment_with_optimal_volume() {
        let (score, details) = scorer().score(0.9, 8);
        assert_eq!(score, 100.0);
        assert_eq!(details["sentiment_base"], 70.0);
        assert_eq!(details["news_volume_score"], 30.0);
    }

    #[test]
    fn test_base_curve_segments() {
        let s = scorer();
        assert_eq!(s.base_score(0.8), 70.0);
        assert_eq!(s.base_score(0.65), 60.0); // midway 0.5→0.8
        assert_eq!(s.base_score(0.5), 50.0);
        assert_eq!(s.base_score(0.25), 40.0);
        assert_eq!(s.base_score(0.0), 30.0);
        assert_eq!(s.base_score(-0.25), 25.0);
        assert_eq!(s.base_score(-0.5), 20.0);
        assert_eq!(s.base_score(-1.0), 0.0);
    }

    #[test]
    fn test_base_curve_is_monotonic() {
        let s = scorer();
        let mut prev = f64::NEG_INFINITY;
        let mut x = -1.0;
        while x <= 1.0 {
            let v = s.base_score(x);
            assert!(v >= prev, "curve decreased at sentiment {x}");
            prev = v;
            x += 0.01;
        }
    }

    #[test]
    fn test_negative_sentiment_halves_base() {
        let (score, details) = scorer().score(-0.25, 0);
        assert_eq!(details["sentiment_base"], 12.5); // 25 / 2
        assert_eq!(score, 12.5);
    }

    #[test]
    fn test_volume_tiers() {
        let s = scorer();
        assert_eq!(s.volume_score(0), 0.0);
        assert_eq!(s.volume_score(1), 5.0);
        assert_eq!(s.volume_score(3), 15.0);
        assert_eq!(s.volume_score(8), 30.0);
        assert_eq!(s.volume_score(12), 30.0);
        assert_eq!(s.volume_score(25), 24.0); // noise haircut
    }

    #[test]
    fn test_out_of_range_sentiment_clamped() {
        let (high, _) = scorer().score(3.5, 8);
        let (max, _) = scorer().score(1.0, 8);
        assert_eq!(high, max);

        let (low, _) = scorer().score(-7.0, 0);
        assert_eq!(low, 0.0);
    }
}
