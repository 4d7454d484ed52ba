//! News catalyst scoring.
//!
//! A trade without a catalyst is a coin flip. Recency of the oldest
//! article contributes up to 60 points; article volume up to 40.

use serde::Deserialize;
use serde_json::json;

use super::round1;
use crate::types::Details;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CatalystConfig {
    /// News younger than this (hours) is fresh — full recency score.
    pub news_fresh_hours: f64,
    pub news_recent_hours: f64,
    pub news_stale_hours: f64,
    pub min_news_count: u32,
    pub optimal_news_count: u32,
}

impl Default for CatalystConfig {
    fn default() -> Self {
        Self {
            news_fresh_hours: 6.0,
            news_recent_hours: 12.0,
            news_stale_hours: 24.0,
            min_news_count: 3,
            optimal_news_count: 8,
        }
    }
}

// ---------------------------------------------------------------------------
// Scorer
// ---------------------------------------------------------------------------

pub struct CatalystScorer {
    config: CatalystConfig,
}

impl CatalystScorer {
    pub fn new(config: CatalystConfig) -> Self {
        Self { config }
    }

    /// Score catalyst quality (0–100) from the article count and the age
    /// of the oldest article in hours.
    pub fn score(&self, news_count: u32, news_age_hours: f64) -> (f64, Details) {
        let mut details = Details::new();

        let recency = self.recency_score(news_age_hours);
        details.insert("recency_score".to_string(), json!(round1(recency)));
        details.insert("news_age_hours".to_string(), json!(round1(news_age_hours)));

        let volume = self.volume_score(news_count);
        details.insert("catalyst_score".to_string(), json!(round1(volume)));

        ((recency + volume).min(100.0), details)
    }

    fn recency_score(&self, age_hours: f64) -> f64 {
        let fresh = self.config.news_fresh_hours;
        let recent = self.config.news_recent_hours;
        let stale = self.config.news_stale_hours;

        if age_hours <= fresh {
            60.0
        } else if age_hours <= recent {
            45.0 + (recent - age_hours) / (recent - fresh) * 15.0
        } else if age_hours <= stale {
            20.0 + (stale - age_hours) / (stale - recent) * 25.0
        } else {
            // Stale news decays by 10 points per day
            (20.0 - (age_hours - stale) / 24.0 * 10.0).max(0.0)
        }
    }

    fn volume_score(&self, news_count: u32) -> f64 {
        let min = self.config.min_news_count;
        let optimal = self.config.optimal_news_count;

        if news_count >= optimal {
            40.0
        } else if news_count >= min {
            25.0 + (news_count - min) as f64 / (optimal - min) as f64 * 15.0
        } else if news_count > 0 {
            news_count as f64 / min as f64 * 25.0
        } else {
            0.0
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
