//! Composite trade-quality scoring.
//!
//! Five weighted component scorers feed a 0–100 composite, which then
//! passes through hard quality gates and multiplicative penalty/bonus
//! adjustments before the conviction category is derived.

pub mod adjust;
pub mod catalyst;
pub mod momentum;
pub mod sentiment;
pub mod technical;
pub mod timing;

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, info};

use crate::config::{ConfigError, ScoringConfig};
use crate::types::{ScoreComponent, TechnicalSnapshot, TradeScoreResult, Trend};
use adjust::{AdjustContext, Adjuster};
use catalyst::CatalystScorer;
use momentum::MomentumScorer;
use sentiment::SentimentScorer;
use technical::TechnicalScorer;
use timing::{MarketClock, TimingScorer};

/// Round to one decimal place, matching the precision the result types carry.
pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

/// Pipelines the five component scorers → weighted composite → quality
/// gates → penalty/bonus multipliers → category derivation.
///
/// Construction validates the configuration once; an invalid configuration
/// (weights off 1.0, thresholds out of order) aborts construction.
pub struct TradeScorer {
    config: ScoringConfig,
    technical: TechnicalScorer,
    sentiment: SentimentScorer,
    momentum: MomentumScorer,
    catalyst: CatalystScorer,
    timing: TimingScorer,
    adjuster: Adjuster,
}

impl TradeScorer {
    pub fn new(config: ScoringConfig, clock: Box<dyn MarketClock>) -> Result<Self, ConfigError> {
        config.validate()?;
        let technical = TechnicalScorer::new(config.technical.clone());
        let sentiment = SentimentScorer::new(config.sentiment.clone());
        let momentum = MomentumScorer::new(config.momentum.clone());
        let catalyst = CatalystScorer::new(config.catalyst.clone());
        let timing = TimingScorer::new(config.timing.clone(), clock);
        let adjuster = Adjuster::new(config.gates.clone(), config.multipliers.clone());
        Ok(Self {
            config,
            technical,
            sentiment,
            momentum,
            catalyst,
            timing,
            adjuster,
        })
    }

    /// Score one trade setup (0–100) and categorize it.
    ///
    /// Missing optional data never errors: absent indicators skip their
    /// sub-terms and surface through `details` and `quality_flags`.
    pub fn score(
        &self,
        technicals: Option<&TechnicalSnapshot>,
        sentiment: f64,
        news_count: u32,
        news_age_hours: f64,
        earnings_soon: bool,
    ) -> TradeScoreResult {
        let (tech_score, tech_details) = self.technical.score(technicals);
        let (sent_score, sent_details) = self.sentiment.score(sentiment, news_count);
        let (mom_score, mom_details) = self.momentum.score(technicals);
        let (cat_score, cat_details) = self.catalyst.score(news_count, news_age_hours);
        let (time_score, time_details) = self.timing.score();

        let w = &self.config.weights;
        let base_score = tech_score * w.technical
            + sent_score * w.sentiment
            + mom_score * w.momentum
            + cat_score * w.catalyst
            + time_score * w.timing;

        let ctx = AdjustContext {
            technicals,
            sentiment,
            news_age_hours,
            earnings_soon,
        };
        let (gated, mut adjustments) = self.adjuster.apply_gates(base_score, &ctx);
        let (adjusted, multiplier_adjustments) = self.adjuster.apply_multipliers(gated, &ctx);
        adjustments.extend(multiplier_adjustments);

        let mut final_score = adjusted.clamp(0.0, 100.0);
        let mut quality_flags = BTreeSet::new();

        // Absolute volatility ceiling: cap to the tradeable floor
        let quality = &self.config.quality;
        if let Some(atr_pct) = technicals.and_then(|t| t.atr_pct) {
            if atr_pct > quality.max_atr_pct_absolute {
                quality_flags.insert("VOLATILITY_TOO_HIGH".to_string());
                final_score = final_score.min(quality.tradeable_floor);
            }
        }
        if news_count < quality.min_news_articles {
            quality_flags.insert("INSUFFICIENT_NEWS".to_string());
        }

        let category = self.config.thresholds.categorize(final_score);

        // Transparency flags for BUY-band results that lack textbook entry
        // conditions. Advisory only — no further score change.
        if category.is_buy() {
            if let Some(snapshot) = technicals {
                if let Some(rsi) = snapshot.rsi {
                    if rsi > self.config.gates.max_rsi_buy {
                        quality_flags.insert(format!("WARNING_NOT_OVERSOLD_RSI_{}", rsi as i64));
                    }
                }
                if !snapshot.bb_status.is_lower_area() {
                    quality_flags
                        .insert(format!("WARNING_NOT_IN_LOWER_BB_{}", snapshot.bb_status));
                }
                if !matches!(snapshot.trend, Trend::Uptrend | Trend::Unknown) {
                    quality_flags.insert(format!("WARNING_TREND_{}_NOT_BULLISH", snapshot.trend));
                }
            }
        }

        let mut components = BTreeMap::new();
        for (name, score, weight, details) in [
            ("technical", tech_score, w.technical, tech_details),
            ("sentiment", sent_score, w.sentiment, sent_details),
            ("momentum", mom_score, w.momentum, mom_details),
            ("catalyst", cat_score, w.catalyst, cat_details),
            ("timing", time_score, w.timing, time_details),
        ] {
            components.insert(
                name.to_string(),
                ScoreComponent {
                    score: round1(score),
                    weight,
                    details,
                },
            );
        }

        debug!(
            base = round1(base_score),
            gated = round1(gated),
            final_score = round1(final_score),
            %category,
            adjustments = adjustments.len(),
            "Trade scored"
        );
        if category.is_buy() {
            info!(
                final_score = round1(final_score),
                %category,
                "Buy-band setup"
            );
        }

        TradeScoreResult {
            final_score: round1(final_score),
            base_score: round1(base_score),
            category,
            components,
            adjustments,
            quality_flags,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BbStatus;
    use chrono::NaiveDate;
    use timing::FixedClock;

    /// Monday 2026-01-05 10:00 ET — inside the optimal window.
    fn opening_clock() -> Box<dyn MarketClock> {
        let naive = NaiveDate::from_ymd_opt(2026, 1, 5)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        Box::new(FixedClock(naive))
    }

    fn scorer() -> TradeScorer {
        TradeScorer::new(ScoringConfig::default(), opening_clock()).unwrap()
    }

    fn make_snapshot() -> TechnicalSnapshot {
        TechnicalSnapshot {
            price: 42.0,
            rsi: Some(15.0),
            bb_status: BbStatus::BelowLower,
            trend: Trend::Uptrend,
            macd_hist: Some(0.02),
            atr_pct: Some(2.5),
        }
    }

    #[test]
    fn test_strong_confluence_setup_is_strong_buy() {
        let snap = make_snapshot();
        let result = scorer().score(Some(&snap), 0.6, 8, 2.0, false);

        assert!(result.components["technical"].score >= 90.0);
        assert_eq!(result.category, crate::types::ScoreCategory::StrongBuy);
        assert!(result
            .adjustments
            .iter()
            .any(|a| a.starts_with("STRONG_CONFLUENCE")));
    }

    #[test]
    fn test_overbought_downtrend_lands_in_avoid_band() {
        let snap = TechnicalSnapshot {
            price: 42.0,
            rsi: Some(55.0),
            bb_status: BbStatus::UpperHalf,
            trend: Trend::Downtrend,
            macd_hist: None,
            atr_pct: None,
        };
        let result = scorer().score(Some(&snap), -0.2, 3, 20.0, false);

        assert!(result
            .adjustments
            .iter()
            .any(|a| a.starts_with("NOT_OVERSOLD")));
        assert!(result.final_score <= 40.0);
        assert!(matches!(
            result.category,
            crate::types::ScoreCategory::Avoid | crate::types::ScoreCategory::StrongAvoid
        ));
    }

    #[test]
    fn test_no_snapshot_still_scores() {
        let result = scorer().score(None, 0.4, 5, 4.0, false);
        // Technical and momentum contribute zero; the rest still count.
        assert_eq!(result.components["technical"].score, 0.0);
        assert_eq!(result.components["momentum"].score, 0.0);
        assert!(result.final_score > 0.0);
        assert!(result.final_score <= 100.0);
    }

    #[test]
    fn test_extreme_volatility_forces_floor() {
        let mut snap = make_snapshot();
        snap.atr_pct = Some(14.0);
        let result = scorer().score(Some(&snap), 0.6, 8, 2.0, false);
        assert!(result.quality_flags.contains("VOLATILITY_TOO_HIGH"));
        assert!(result.final_score <= 20.0);
    }

    #[test]
    fn test_no_news_flagged() {
        let snap = make_snapshot();
        let result = scorer().score(Some(&snap), 0.0, 0, 0.0, false);
        assert!(result.quality_flags.contains("INSUFFICIENT_NEWS"));
    }

    #[test]
    fn test_idempotent() {
        let snap = make_snapshot();
        let a = scorer().score(Some(&snap), 0.6, 8, 2.0, false);
        let b = scorer().score(Some(&snap), 0.6, 8, 2.0, false);
        assert_eq!(a.final_score, b.final_score);
        assert_eq!(a.base_score, b.base_score);
        assert_eq!(a.category, b.category);
        assert_eq!(a.adjustments, b.adjustments);
        assert_eq!(a.quality_flags, b.quality_flags);
    }

    #[test]
    fn test_score_bounds_across_inputs() {
        let snapshots = [
            None,
            Some(make_snapshot()),
            Some(TechnicalSnapshot {
                price: 10.0,
                rsi: None,
                bb_status: BbStatus::InsufficientData,
                trend: Trend::InsufficientData,
                macd_hist: None,
                atr_pct: Some(25.0),
            }),
        ];
        for snap in &snapshots {
            for sentiment in [-1.0, -0.3, 0.0, 0.5, 1.0] {
                let result =
                    scorer().score(snap.as_ref(), sentiment, 5, 12.0, sentiment < 0.0);
                assert!(result.final_score >= 0.0 && result.final_score <= 100.0);
                assert_eq!(
                    result.category,
                    scorer().config.thresholds.categorize(result.final_score)
                );
            }
        }
    }

    #[test]
    fn test_invalid_weights_abort_construction() {
        let mut config = ScoringConfig::default();
        config.weights.technical = 0.5; // sum now 1.2
        assert!(TradeScorer::new(config, opening_clock()).is_err());
    }
}
