//! Configuration loading from TOML with full-default fallback.
//!
//! Every knob ships with a production default, so an empty file (or no
//! file at all) yields a working configuration. A loaded configuration is
//! validated once at scorer construction; a bad one aborts with a typed
//! error rather than silently skewing scores.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::news::{ExtractorConfig, PredictorConfig};
use crate::scoring::adjust::{GateConfig, MultiplierConfig};
use crate::scoring::catalyst::CatalystConfig;
use crate::scoring::momentum::MomentumConfig;
use crate::scoring::sentiment::SentimentConfig;
use crate::scoring::technical::TechnicalConfig;
use crate::scoring::timing::TimingConfig;
use crate::types::ScoreCategory;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("component weights must sum to 1.0 (got {sum})")]
    WeightSum { sum: f64 },
    #[error("thresholds out of order: {0}")]
    ThresholdOrder(String),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

// ---------------------------------------------------------------------------
// Composite weights and category thresholds
// ---------------------------------------------------------------------------

/// Component weights for the composite. Must sum to 1.0.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Weights {
    pub technical: f64,
    pub sentiment: f64,
    pub momentum: f64,
    pub catalyst: f64,
    pub timing: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            technical: 0.30,
            sentiment: 0.25,
            momentum: 0.20,
            catalyst: 0.15,
            timing: 0.10,
        }
    }
}

impl Weights {
    pub fn sum(&self) -> f64 {
        self.technical + self.sentiment + self.momentum + self.catalyst + self.timing
    }
}

/// Category cut lines on the final score. Half-open bands, strictly
/// descending: `[strong_buy, 100]`, `[buy, strong_buy)`, and so on.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub strong_buy: f64,
    pub buy: f64,
    pub caution: f64,
    pub avoid: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            strong_buy: 75.0,
            buy: 65.0,
            caution: 50.0,
            avoid: 35.0,
        }
    }
}

impl Thresholds {
    pub fn categorize(&self, score: f64) -> ScoreCategory {
        if score >= self.strong_buy {
            ScoreCategory::StrongBuy
        } else if score >= self.buy {
            ScoreCategory::Buy
        } else if score >= self.caution {
            ScoreCategory::Caution
        } else if score >= self.avoid {
            ScoreCategory::Avoid
        } else {
            ScoreCategory::StrongAvoid
        }
    }
}

// ---------------------------------------------------------------------------
// Quality limits
// ---------------------------------------------------------------------------

/// Hard quality limits applied after all adjustments.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct QualityConfig {
    /// ATR% above this caps the final score to the tradeable floor.
    pub max_atr_pct_absolute: f64,
    /// Score ceiling for setups past the volatility limit.
    pub tradeable_floor: f64,
    /// Below this article count the result is flagged INSUFFICIENT_NEWS.
    pub min_news_articles: u32,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            max_atr_pct_absolute: 12.0,
            tradeable_floor: 20.0,
            min_news_articles: 1,
        }
    }
}

// ---------------------------------------------------------------------------
// Scoring configuration
// ---------------------------------------------------------------------------

/// Everything the scorer pipeline needs, one sub-struct per stage.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub weights: Weights,
    pub thresholds: Thresholds,
    pub quality: QualityConfig,
    pub technical: TechnicalConfig,
    pub sentiment: SentimentConfig,
    pub momentum: MomentumConfig,
    pub catalyst: CatalystConfig,
    pub timing: TimingConfig,
    pub gates: GateConfig,
    pub multipliers: MultiplierConfig,
}

impl ScoringConfig {
    /// Validate cross-field invariants. Called once at scorer construction.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        let sum = self.weights.sum();
        if (sum - 1.0).abs() > 1e-6 {
            return Err(ConfigError::WeightSum { sum });
        }

        let t = &self.thresholds;
        if !(t.strong_buy > t.buy && t.buy > t.caution && t.caution > t.avoid) {
            return Err(ConfigError::ThresholdOrder(format!(
                "{} / {} / {} / {} must be strictly descending",
                t.strong_buy, t.buy, t.caution, t.avoid
            )));
        }

        let g = &self.gates;
        if !(g.max_rsi_strong_buy <= g.max_rsi_buy && g.max_rsi_buy <= g.max_rsi_any_long) {
            return Err(ConfigError::Invalid(
                "gate RSI limits must satisfy strong_buy <= buy <= any_long".to_string(),
            ));
        }

        let m = &self.momentum;
        if !(m.volatility_optimal < m.volatility_max_good
            && m.volatility_max_good < m.volatility_too_high)
        {
            return Err(ConfigError::Invalid(
                "volatility breakpoints must be strictly ascending".to_string(),
            ));
        }

        let c = &self.catalyst;
        if !(c.news_fresh_hours < c.news_recent_hours && c.news_recent_hours < c.news_stale_hours) {
            return Err(ConfigError::Invalid(
                "news recency breakpoints must be strictly ascending".to_string(),
            ));
        }
        if c.min_news_count >= c.optimal_news_count {
            return Err(ConfigError::Invalid(
                "catalyst min_news_count must be below optimal_news_count".to_string(),
            ));
        }

        let s = &self.sentiment;
        if !(s.min_news_count < s.optimal_news_count && s.optimal_news_count < s.max_news_count) {
            return Err(ConfigError::Invalid(
                "sentiment news counts must be strictly ascending".to_string(),
            ));
        }

        let w = &self.timing;
        if !(w.optimal_start < w.optimal_end
            && w.optimal_end <= w.good_end
            && w.good_end < w.avoid_start
            && w.avoid_start < w.avoid_end)
        {
            return Err(ConfigError::Invalid(
                "session windows must be in market order".to_string(),
            ));
        }

        let mult = &self.multipliers;
        for (name, value) in [
            ("penalty_falling_knife", mult.penalty_falling_knife),
            ("penalty_earnings_soon", mult.penalty_earnings_soon),
            ("penalty_wide_stops", mult.penalty_wide_stops),
            ("penalty_news_risk", mult.penalty_news_risk),
            ("penalty_insufficient_data", mult.penalty_insufficient_data),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be in (0, 1], got {value}"
                )));
            }
        }
        for (name, value) in [
            ("bonus_strong_confluence", mult.bonus_strong_confluence),
            ("bonus_fresh_catalyst", mult.bonus_fresh_catalyst),
            ("bonus_oversold_uptrend", mult.bonus_oversold_uptrend),
        ] {
            if value < 1.0 {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be at least 1.0, got {value}"
                )));
            }
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Application configuration
// ---------------------------------------------------------------------------

/// News-engine configuration: the extractor taxonomies plus the
/// predictor's aggregation knobs.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NewsConfig {
    pub extractor: ExtractorConfig,
    pub predictor: PredictorConfig,
}

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub scoring: ScoringConfig,
    pub news: NewsConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file. A missing file yields the
    /// built-in defaults.
    pub fn load(path: &str) -> Result<Self> {
        if !Path::new(path).exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        let config: AppConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {path}"))?;
        Ok(config)
    }
}
