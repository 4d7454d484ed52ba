//! Time-of-day scoring.
//!
//! Scores the current wall-clock time against the intraday session
//! schedule (US equities, Eastern time). The clock is the only non-pure
//! input in the engine, so it is injected behind the `MarketClock` trait
//! and pinned in tests.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Timelike, Utc, Weekday};
use serde::Deserialize;
use serde_json::json;

use super::round1;
use crate::types::Details;

// ---------------------------------------------------------------------------
// Market clock
// ---------------------------------------------------------------------------

/// Source of current US-Eastern wall time.
pub trait MarketClock: Send + Sync {
    /// Current Eastern wall-clock time, timezone-naive.
    fn now_eastern(&self) -> NaiveDateTime;
}

/// Real clock: converts `Utc::now()` to Eastern using the US DST rule.
pub struct SystemClock;

impl MarketClock for SystemClock {
    fn now_eastern(&self) -> NaiveDateTime {
        to_eastern(Utc::now())
    }
}

/// Clock pinned to a fixed instant, for tests and replay analysis.
pub struct FixedClock(pub NaiveDateTime);

impl MarketClock for FixedClock {
    fn now_eastern(&self) -> NaiveDateTime {
        self.0
    }
}

/// Convert a UTC instant to naive Eastern wall time.
///
/// DST runs from the second Sunday of March (07:00 UTC) to the first
/// Sunday of November (06:00 UTC): UTC-4 inside the window, UTC-5 outside.
pub fn to_eastern(utc: DateTime<Utc>) -> NaiveDateTime {
    let year = utc.year();
    let in_dst = match (nth_sunday(year, 3, 2), nth_sunday(year, 11, 1)) {
        (Some(start), Some(end)) => {
            let start = start.and_hms_opt(7, 0, 0).unwrap_or_default().and_utc();
            let end = end.and_hms_opt(6, 0, 0).unwrap_or_default().and_utc();
            utc >= start && utc < end
        }
        _ => false,
    };
    let offset_hours = if in_dst { -4 } else { -5 };
    (utc + chrono::Duration::hours(offset_hours)).naive_utc()
}

fn nth_sunday(year: i32, month: u32, n: u8) -> Option<NaiveDate> {
    NaiveDate::from_weekday_of_month_opt(year, month, Weekday::Sun, n)
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Session boundaries as Eastern hours (9.5 = 9:30 AM).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Market open — start of the high-volume opening window.
    pub optimal_start: f64,
    /// End of the opening window; start of the mid-session window.
    pub optimal_end: f64,
    /// End of the good mid-session window.
    pub good_end: f64,
    /// Power hour — too volatile for fresh entries.
    pub avoid_start: f64,
    /// Market close.
    pub avoid_end: f64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            optimal_start: 9.5,
            optimal_end: 10.5,
            good_end: 15.0,
            avoid_start: 15.5,
            avoid_end: 16.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Scorer
// ---------------------------------------------------------------------------

pub struct TimingScorer {
    config: TimingConfig,
    clock: Box<dyn MarketClock>,
}

impl TimingScorer {
    pub fn new(config: TimingConfig, clock: Box<dyn MarketClock>) -> Self {
        Self { config, clock }
    }

    /// Score the current time of day (0–100). Pure given the clock.
    pub fn score(&self) -> (f64, Details) {
        let now = self.clock.now_eastern();
        let current_hour = now.hour() as f64 + now.minute() as f64 / 60.0;

        let mut details = Details::new();
        details.insert("current_hour_et".to_string(), json!((current_hour * 100.0).round() / 100.0));

        // Weekend: nothing trades, score reflects stale setups only
        if matches!(now.weekday(), Weekday::Sat | Weekday::Sun) {
            details.insert("reason".to_string(), json!("weekend"));
            return (30.0, details);
        }

        let c = &self.config;
        let (score, session) = if current_hour < c.optimal_start {
            (50.0, "premarket")
        } else if current_hour <= c.optimal_end {
            // First hour: best liquidity and follow-through
            (100.0, "optimal")
        } else if current_hour <= c.good_end {
            (80.0, "good")
        } else if current_hour >= c.avoid_start && current_hour <= c.avoid_end {
            (40.0, "power_hour")
        } else if current_hour > c.avoid_end {
            (30.0, "afterhours")
        } else {
            // Gap between good window and power hour
            (60.0, "midday")
        };

        details.insert("session".to_string(), json!(session));
        (score, details)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
