//! Shared types for the SENTINEL engine.
//!
//! These types form the data model used across all modules.
//! The scoring and news modules both depend on them, so they carry
//! no logic beyond small accessors and display formatting.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Per-component diagnostic details, keyed by metric name.
/// Values are numbers or short strings (e.g. `reason`, `session`).
pub type Details = BTreeMap<String, serde_json::Value>;

// ---------------------------------------------------------------------------
// Technical snapshot
// ---------------------------------------------------------------------------

/// Price position relative to the Bollinger envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BbStatus {
    BelowLower,
    LowerHalf,
    Middle,
    UpperHalf,
    AboveUpper,
    InsufficientData,
    Unknown,
}

impl BbStatus {
    /// Lower-band area: the only acceptable zone for long entries.
    pub fn is_lower_area(self) -> bool {
        matches!(self, BbStatus::BelowLower | BbStatus::LowerHalf)
    }
}

impl fmt::Display for BbStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BbStatus::BelowLower => "BELOW_LOWER",
            BbStatus::LowerHalf => "LOWER_HALF",
            BbStatus::Middle => "MIDDLE",
            BbStatus::UpperHalf => "UPPER_HALF",
            BbStatus::AboveUpper => "ABOVE_UPPER",
            BbStatus::InsufficientData => "INSUFFICIENT_DATA",
            BbStatus::Unknown => "UNKNOWN",
        };
        write!(f, "{s}")
    }
}

/// Price trend classification from the indicator pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Trend {
    Uptrend,
    Downtrend,
    Sideways,
    Unknown,
    InsufficientData,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Trend::Uptrend => "UPTREND",
            Trend::Downtrend => "DOWNTREND",
            Trend::Sideways => "SIDEWAYS",
            Trend::Unknown => "UNKNOWN",
            Trend::InsufficientData => "INSUFFICIENT_DATA",
        };
        write!(f, "{s}")
    }
}

/// Snapshot of technical indicators for one ticker, produced fresh per
/// analysis by the external market-data pipeline. Never mutated here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechnicalSnapshot {
    pub price: f64,
    /// RSI(14), absent when price history is too sparse.
    pub rsi: Option<f64>,
    pub bb_status: BbStatus,
    pub trend: Trend,
    /// MACD histogram (MACD line minus signal line).
    pub macd_hist: Option<f64>,
    /// ATR as a percentage of price — volatility proxy.
    pub atr_pct: Option<f64>,
}

impl fmt::Display for TechnicalSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "${:.2} | RSI {} | BB {} | {}",
            self.price,
            self.rsi.map_or("n/a".to_string(), |r| format!("{r:.0}")),
            self.bb_status,
            self.trend,
        )
    }
}

// ---------------------------------------------------------------------------
// Trade score
// ---------------------------------------------------------------------------

/// Conviction category derived from the final score.
/// Thresholds are half-open and strictly descending (75 / 65 / 50 / 35).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScoreCategory {
    StrongBuy,
    Buy,
    Caution,
    Avoid,
    StrongAvoid,
}

impl ScoreCategory {
    pub fn is_buy(self) -> bool {
        matches!(self, ScoreCategory::StrongBuy | ScoreCategory::Buy)
    }

    /// One-line human reading of the conviction level.
    pub fn interpretation(self) -> &'static str {
        match self {
            ScoreCategory::StrongBuy => {
                "Very high conviction - strong entry signal with multiple confirmations"
            }
            ScoreCategory::Buy => "High conviction - good setup with favorable risk/reward",
            ScoreCategory::Caution => "Moderate conviction - mixed signals, proceed with caution",
            ScoreCategory::Avoid => "Low conviction - weak setup, better to wait",
            ScoreCategory::StrongAvoid => "Very low conviction - avoid trading this setup",
        }
    }
}

impl fmt::Display for ScoreCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ScoreCategory::StrongBuy => "STRONG_BUY",
            ScoreCategory::Buy => "BUY",
            ScoreCategory::Caution => "CAUTION",
            ScoreCategory::Avoid => "AVOID",
            ScoreCategory::StrongAvoid => "STRONG_AVOID",
        };
        write!(f, "{s}")
    }
}

/// One weighted factor of the composite score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreComponent {
    /// Component score on the 0–100 scale.
    pub score: f64,
    /// Weight applied in the composite (all weights sum to 1.0).
    pub weight: f64,
    pub details: Details,
}

/// Full result of scoring one ticker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeScoreResult {
    /// Score after gates, penalties, and bonuses, clamped to [0, 100].
    pub final_score: f64,
    /// Pre-gate weighted sum of the five components.
    pub base_score: f64,
    pub category: ScoreCategory,
    /// Component breakdown keyed by component name
    /// (`technical`, `sentiment`, `momentum`, `catalyst`, `timing`).
    pub components: BTreeMap<String, ScoreComponent>,
    /// Human-readable log of every gate, penalty, and bonus that fired,
    /// in evaluation order. Diagnostic only — never feeds back into the score.
    pub adjustments: Vec<String>,
    pub quality_flags: BTreeSet<String>,
}

impl fmt::Display for TradeScoreResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.0}/100 ({})", self.final_score, self.category)
    }
}

// ---------------------------------------------------------------------------
// News signals
// ---------------------------------------------------------------------------

/// Directional read of a headline or aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    Bullish,
    Bearish,
    Neutral,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Direction::Bullish => "BULLISH",
            Direction::Bearish => "BEARISH",
            Direction::Neutral => "NEUTRAL",
        };
        write!(f, "{s}")
    }
}

/// Aggregate direction across a headline batch. `Mixed` means neither
/// side led by more than one article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AggregateDirection {
    Bullish,
    Bearish,
    Mixed,
    Neutral,
}

impl AggregateDirection {
    /// The plain direction this aggregate corresponds to, if decisive.
    pub fn as_direction(self) -> Direction {
        match self {
            AggregateDirection::Bullish => Direction::Bullish,
            AggregateDirection::Bearish => Direction::Bearish,
            AggregateDirection::Mixed | AggregateDirection::Neutral => Direction::Neutral,
        }
    }
}

impl fmt::Display for AggregateDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AggregateDirection::Bullish => "BULLISH",
            AggregateDirection::Bearish => "BEARISH",
            AggregateDirection::Mixed => "MIXED",
            AggregateDirection::Neutral => "NEUTRAL",
        };
        write!(f, "{s}")
    }
}

/// A news headline with its publication time. Batches are ordered
/// most-recent-first by the upstream news fetcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Headline {
    pub text: String,
    pub published_at: DateTime<Utc>,
}

/// Directional signal extracted from a single headline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleSignal {
    pub direction: Direction,
    /// Confidence in the direction, [0, 1].
    pub confidence: f64,
    /// Estimated market impact, [0, 100].
    pub impact_score: f64,
    /// Magnitude multiplier from adjective strength, [1.0, 2.0].
    pub magnitude: f64,
    /// Urgency multiplier from time-reference phrases, [1.0, 1.5].
    pub urgency: f64,
    /// Dominant catalyst category name, or `NONE`.
    pub catalyst: String,
    /// Matched bullish phrases keyed by taxonomy category.
    pub bullish_matches: BTreeMap<String, Vec<String>>,
    /// Matched bearish phrases keyed by taxonomy category.
    pub bearish_matches: BTreeMap<String, Vec<String>>,
}

impl ArticleSignal {
    pub fn bullish_count(&self) -> usize {
        self.bullish_matches.values().map(Vec::len).sum()
    }

    pub fn bearish_count(&self) -> usize {
        self.bearish_matches.values().map(Vec::len).sum()
    }
}

/// Direction counts across a headline batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsBreakdown {
    pub total: usize,
    pub bullish: usize,
    pub bearish: usize,
    pub neutral: usize,
}

/// Aggregated signal analysis for a headline batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregateNewsAnalysis {
    pub direction: AggregateDirection,
    /// Share of articles agreeing with the winning side, [0, 1].
    pub confidence: f64,
    /// Mean impact score across all articles, [0, 100].
    pub avg_impact: f64,
    /// Most frequent non-NONE catalyst category, or `NONE`.
    pub dominant_catalyst: String,
    /// Largest direction bucket as a share of all articles, [0, 1].
    pub consistency: f64,
    /// Majority direction of the three most recent articles.
    pub recent_trend: Direction,
    pub breakdown: NewsBreakdown,
    /// Top three signals by impact score, descending.
    pub top_signals: Vec<ArticleSignal>,
}

// ---------------------------------------------------------------------------
// Prediction
// ---------------------------------------------------------------------------

/// How firmly the prediction is held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PredictionStrength {
    Strong,
    Moderate,
    Emerging,
    Unclear,
}

impl fmt::Display for PredictionStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PredictionStrength::Strong => "STRONG",
            PredictionStrength::Moderate => "MODERATE",
            PredictionStrength::Emerging => "EMERGING",
            PredictionStrength::Unclear => "UNCLEAR",
        };
        write!(f, "{s}")
    }
}

/// Bucketed estimate of price-move size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExpectedMove {
    Minimal,
    Small,
    Moderate,
    Large,
}

impl fmt::Display for ExpectedMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ExpectedMove::Large => "LARGE (>5%)",
            ExpectedMove::Moderate => "MODERATE (2-5%)",
            ExpectedMove::Small => "SMALL (1-2%)",
            ExpectedMove::Minimal => "MINIMAL (<1%)",
        };
        write!(f, "{s}")
    }
}

/// Tiered read of how predictive the aggregate signal is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConfidenceLevel {
    High,
    Moderate,
    Low,
    VeryLow,
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConfidenceLevel::High => "HIGH - Strong predictive signal",
            ConfidenceLevel::Moderate => "MODERATE - Decent predictive signal",
            ConfidenceLevel::Low => "LOW - Weak predictive signal",
            ConfidenceLevel::VeryLow => "VERY LOW - Noise, not predictive",
        };
        write!(f, "{s}")
    }
}

/// Directional market prediction derived from a headline batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    pub direction: Direction,
    pub strength: PredictionStrength,
    /// Confidence on the 0–100 scale (rounded to whole points).
    pub confidence_score: f64,
    pub expected_move: ExpectedMove,
    pub catalyst: String,
    /// Conditionally assembled explanation lines, in evaluation order.
    pub reasoning: Vec<String>,
    pub confidence_level: ConfidenceLevel,
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) {:.0}% | {}",
            self.direction, self.strength, self.confidence_score, self.expected_move
        )
    }
}

// ---------------------------------------------------------------------------
// Alignment
// ---------------------------------------------------------------------------

/// Agreement between the technical score and the news prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlignmentStatus {
    StrongConfluence,
    BullishAlignment,
    BearishAlignment,
    Divergence,
    TooEarly,
    Premature,
    WeakSetup,
    Unclear,
}

impl fmt::Display for AlignmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AlignmentStatus::StrongConfluence => "STRONG CONFLUENCE",
            AlignmentStatus::BullishAlignment => "BULLISH ALIGNMENT",
            AlignmentStatus::BearishAlignment => "BEARISH ALIGNMENT",
            AlignmentStatus::Divergence => "DIVERGENCE",
            AlignmentStatus::TooEarly => "TOO EARLY",
            AlignmentStatus::Premature => "PREMATURE",
            AlignmentStatus::WeakSetup => "WEAK SETUP",
            AlignmentStatus::Unclear => "NEUTRAL/UNCLEAR",
        };
        write!(f, "{s}")
    }
}

/// Reconciliation of technicals against the news prediction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alignment {
    pub status: AlignmentStatus,
    /// Ranking score 0–10: higher = better setup agreement.
    pub score: u8,
    pub warning: Option<String>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
