//! End-to-end scenarios through the full scoring and prediction pipeline.
//!
//! Each scenario wires real inputs through scorer, predictor, and
//! alignment check with a fixed clock, and asserts on the externally
//! visible result rather than on internals.

use chrono::{Duration, NaiveDate, NaiveDateTime, Utc};

use sentinel::alignment::check_alignment;
use sentinel::config::{ScoringConfig, Thresholds};
use sentinel::news::NewsPredictor;
use sentinel::scoring::timing::{FixedClock, MarketClock};
use sentinel::scoring::TradeScorer;
use sentinel::types::{
    AlignmentStatus, BbStatus, Direction, Headline, PredictionStrength, ScoreCategory,
    TechnicalSnapshot, TradeScoreResult, Trend,
};

/// Monday 2026-01-05 10:00 ET, inside the optimal entry window.
fn monday_open() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 1, 5)
        .unwrap()
        .and_hms_opt(10, 0, 0)
        .unwrap()
}

fn make_scorer(clock: NaiveDateTime) -> TradeScorer {
    let boxed: Box<dyn MarketClock> = Box::new(FixedClock(clock));
    TradeScorer::new(ScoringConfig::default(), boxed).unwrap()
}

fn make_headlines(texts: &[&str]) -> Vec<Headline> {
    texts
        .iter()
        .enumerate()
        .map(|(i, text)| Headline {
            text: text.to_string(),
            published_at: Utc::now() - Duration::hours(i as i64 + 1),
        })
        .collect()
}

fn oversold_uptrend_snapshot() -> TechnicalSnapshot {
    TechnicalSnapshot {
        price: 42.0,
        rsi: Some(15.0),
        bb_status: BbStatus::BelowLower,
        trend: Trend::Uptrend,
        macd_hist: Some(0.02),
        atr_pct: Some(2.5),
    }
}

// ---------------------------------------------------------------------------
// Scenario: textbook oversold pullback with fresh bullish news
// ---------------------------------------------------------------------------

#[test]
fn textbook_setup_scores_strong_buy_with_confluence() {
    let scorer = make_scorer(monday_open());
    let snapshot = oversold_uptrend_snapshot();
    let result = scorer.score(Some(&snapshot), 0.6, 8, 2.0, false);

    assert_eq!(result.category, ScoreCategory::StrongBuy);
    assert_eq!(result.final_score, 100.0);
    assert!(result.base_score > 90.0);
    for name in ["STRONG_CONFLUENCE", "FRESH_CATALYST", "OVERSOLD_UPTREND"] {
        assert!(
            result.adjustments.iter().any(|a| a.starts_with(name)),
            "missing adjustment {name}: {:?}",
            result.adjustments
        );
    }
    assert!(result.quality_flags.is_empty());

    let headlines = make_headlines(&[
        "Acme beat earnings again",
        "Blowout earnings at Acme",
        "Acme topped estimates",
        "Surprise profit reported by Acme",
        "Acme guidance raised",
    ]);
    let predictor = NewsPredictor::default();
    let analysis = predictor.analyze(&headlines);
    let prediction = predictor.predict(&analysis);

    assert_eq!(prediction.direction, Direction::Bullish);
    assert_eq!(prediction.strength, PredictionStrength::Strong);
    assert_eq!(prediction.catalyst, "EARNINGS");

    let alignment = check_alignment(
        &result,
        &prediction,
        Some(&snapshot),
        &Thresholds::default(),
    );
    assert_eq!(alignment.status, AlignmentStatus::StrongConfluence);
    assert_eq!(alignment.score, 10);
    assert!(alignment.warning.is_none());
}

// ---------------------------------------------------------------------------
// Scenario: overbought chart, bearish tape
// ---------------------------------------------------------------------------

#[test]
fn overbought_downtrend_is_gated_into_avoid() {
    let scorer = make_scorer(monday_open());
    let snapshot = TechnicalSnapshot {
        price: 42.0,
        rsi: Some(55.0),
        bb_status: BbStatus::UpperHalf,
        trend: Trend::Downtrend,
        macd_hist: Some(-0.01),
        atr_pct: Some(4.0),
    };
    let result = scorer.score(Some(&snapshot), -0.3, 4, 18.0, false);

    assert!(result.final_score <= 40.0);
    assert!(result
        .adjustments
        .iter()
        .any(|a| a.starts_with("NOT_OVERSOLD")));
    assert!(matches!(
        result.category,
        ScoreCategory::Avoid | ScoreCategory::StrongAvoid
    ));

    let headlines = make_headlines(&[
        "Acme downgrade after weak outlook",
        "Lawsuit filed against Acme",
        "Acme profit warning issued",
        "Acme investigation widens",
    ]);
    let predictor = NewsPredictor::default();
    let prediction = predictor.predict_from_news(&headlines);
    assert_eq!(prediction.direction, Direction::Bearish);

    let alignment = check_alignment(
        &result,
        &prediction,
        Some(&snapshot),
        &Thresholds::default(),
    );
    assert_eq!(alignment.status, AlignmentStatus::BearishAlignment);
}

// ---------------------------------------------------------------------------
// Scenario: bullish news before the chart is ready
// ---------------------------------------------------------------------------

#[test]
fn bullish_news_on_overbought_chart_says_wait() {
    let scorer = make_scorer(monday_open());
    let snapshot = TechnicalSnapshot {
        price: 42.0,
        rsi: Some(62.0),
        bb_status: BbStatus::UpperHalf,
        trend: Trend::Uptrend,
        macd_hist: Some(0.005),
        atr_pct: Some(3.5),
    };
    let result = scorer.score(Some(&snapshot), 0.5, 6, 3.0, false);
    // The any-long RSI gate caps this below the buy band
    assert!(result.final_score < 65.0);

    let headlines = make_headlines(&[
        "Acme beat earnings again",
        "Blowout earnings at Acme",
        "Acme topped estimates",
        "Surprise profit reported by Acme",
    ]);
    let predictor = NewsPredictor::default();
    let prediction = predictor.predict_from_news(&headlines);
    assert_eq!(prediction.direction, Direction::Bullish);

    let alignment = check_alignment(
        &result,
        &prediction,
        Some(&snapshot),
        &Thresholds::default(),
    );
    assert_eq!(alignment.status, AlignmentStatus::TooEarly);
    assert_eq!(
        alignment.warning.as_deref(),
        Some("Bullish news BUT not oversold (RSI 62) - WAIT for dip")
    );
}

// ---------------------------------------------------------------------------
// Scenario: no data at all
// ---------------------------------------------------------------------------

#[test]
fn no_data_still_produces_a_bounded_result() {
    let scorer = make_scorer(monday_open());
    let result = scorer.score(None, 0.0, 0, f64::MAX, false);

    assert!((0.0..=100.0).contains(&result.final_score));
    assert!(result.quality_flags.contains("INSUFFICIENT_NEWS"));
    assert_eq!(result.components.len(), 5);
    assert_eq!(result.components["technical"].score, 0.0);

    let predictor = NewsPredictor::default();
    let prediction = predictor.predict_from_news(&[]);
    assert_eq!(prediction.direction, Direction::Neutral);
    assert_eq!(prediction.strength, PredictionStrength::Unclear);
    assert_eq!(prediction.reasoning, vec!["Insufficient signal strength"]);
}

// ---------------------------------------------------------------------------
// Scenario: extreme volatility floor
// ---------------------------------------------------------------------------

#[test]
fn extreme_volatility_caps_the_score() {
    let scorer = make_scorer(monday_open());
    let mut snapshot = oversold_uptrend_snapshot();
    snapshot.atr_pct = Some(15.0);
    let result = scorer.score(Some(&snapshot), 0.6, 8, 2.0, false);

    assert!(result.quality_flags.contains("VOLATILITY_TOO_HIGH"));
    assert!(result.final_score <= 20.0);
    assert_eq!(result.category, ScoreCategory::StrongAvoid);
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

#[test]
fn scoring_is_deterministic_for_fixed_inputs() {
    let snapshot = oversold_uptrend_snapshot();
    let a = make_scorer(monday_open()).score(Some(&snapshot), 0.6, 8, 2.0, false);
    let b = make_scorer(monday_open()).score(Some(&snapshot), 0.6, 8, 2.0, false);
    assert_eq!(a.final_score, b.final_score);
    assert_eq!(a.adjustments, b.adjustments);
    assert_eq!(a.quality_flags, b.quality_flags);
}

#[test]
fn category_always_matches_final_score_band() {
    let scorer = make_scorer(monday_open());
    let thresholds = Thresholds::default();
    let trends = [Trend::Uptrend, Trend::Downtrend, Trend::Sideways];
    let bbs = [BbStatus::BelowLower, BbStatus::Middle, BbStatus::AboveUpper];

    for rsi in [10.0, 25.0, 33.0, 45.0, 60.0, 80.0] {
        for (trend, bb) in trends.iter().zip(bbs.iter()) {
            let snapshot = TechnicalSnapshot {
                price: 42.0,
                rsi: Some(rsi),
                bb_status: *bb,
                trend: *trend,
                macd_hist: Some(0.0),
                atr_pct: Some(4.0),
            };
            for sentiment in [-0.8, 0.0, 0.7] {
                let result = scorer.score(Some(&snapshot), sentiment, 5, 8.0, false);
                assert!((0.0..=100.0).contains(&result.final_score));
                assert_eq!(result.category, thresholds.categorize(result.final_score));
            }
        }
    }
}

#[test]
fn earnings_risk_never_raises_the_score() {
    let scorer = make_scorer(monday_open());
    let snapshot = oversold_uptrend_snapshot();
    let safe = scorer.score(Some(&snapshot), 0.4, 5, 8.0, false);
    let risky = scorer.score(Some(&snapshot), 0.4, 5, 8.0, true);
    assert!(risky.final_score <= safe.final_score);
    assert!(risky
        .adjustments
        .iter()
        .any(|a| a.starts_with("EARNINGS_SOON")));
}

// ---------------------------------------------------------------------------
// Wire format
// ---------------------------------------------------------------------------

#[test]
fn score_result_round_trips_through_json() {
    let scorer = make_scorer(monday_open());
    let snapshot = oversold_uptrend_snapshot();
    let result = scorer.score(Some(&snapshot), 0.6, 8, 2.0, false);

    let json = serde_json::to_string(&result).unwrap();
    assert!(json.contains("\"STRONG_BUY\""));
    let back: TradeScoreResult = serde_json::from_str(&json).unwrap();
    assert_eq!(back.final_score, result.final_score);
    assert_eq!(back.category, result.category);
    assert_eq!(back.adjustments, result.adjustments);
}

#[test]
fn prediction_serializes_with_wire_names() {
    let predictor = NewsPredictor::default();
    let headlines = make_headlines(&[
        "Acme beat earnings again",
        "Blowout earnings at Acme",
        "Acme topped estimates",
    ]);
    let prediction = predictor.predict_from_news(&headlines);
    let json = serde_json::to_value(&prediction).unwrap();

    assert_eq!(json["direction"], "BULLISH");
    assert_eq!(json["catalyst"], "EARNINGS");
    assert!(json["strength"].is_string());
    assert!(json["expected_move"].is_string());
}
