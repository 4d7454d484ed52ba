//! Quality gates, penalties, and bonuses.
//!
//! Gates run first, in a fixed order, and only ever cap the running score —
//! they exist to stop favorable-looking weighted averages from recommending
//! structurally unsound entries (buying extended, buying downtrends).
//! Penalties and bonuses are independent multiplicative adjustments; the
//! numeric result is order-free, but they are evaluated as a fixed ordered
//! rule list so the diagnostic log is reproducible.

use serde::Deserialize;
use tracing::debug;

use crate::types::{BbStatus, TechnicalSnapshot, Trend};

// Confluence predicate thresholds shared by several rules.
const RSI_OVERSOLD: f64 = 30.0;
const RSI_PULLBACK: f64 = 35.0;
const SENTIMENT_CONFLUENCE_MIN: f64 = 0.3;
const SENTIMENT_RISK_MAX: f64 = -0.5;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Entry requirements enforced on high scores.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Never long above this RSI, whatever the composite says.
    pub max_rsi_any_long: f64,
    /// STRONG_BUY rating requires RSI at or below this.
    pub max_rsi_strong_buy: f64,
    /// BUY rating requires RSI at or below this.
    pub max_rsi_buy: f64,
    pub require_oversold_for_buy: bool,
    pub require_uptrend_for_strong_buy: bool,
    pub require_trend_for_buy: bool,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            max_rsi_any_long: 50.0,
            max_rsi_strong_buy: 30.0,
            max_rsi_buy: 35.0,
            require_oversold_for_buy: true,
            require_uptrend_for_strong_buy: true,
            require_trend_for_buy: true,
        }
    }
}

/// Multiplicative penalty and bonus factors.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MultiplierConfig {
    /// Oversold into a confirmed downtrend with bearish momentum.
    pub penalty_falling_knife: f64,
    /// Earnings within the risk window.
    pub penalty_earnings_soon: f64,
    /// ATR% beyond the too-high threshold — stops would be too wide.
    pub penalty_wide_stops: f64,
    /// Technically attractive dip driven by strongly negative news.
    pub penalty_news_risk: f64,
    /// Bollinger status could not be computed.
    pub penalty_insufficient_data: f64,
    /// Full bullish confluence across all signals.
    pub bonus_strong_confluence: f64,
    /// News younger than the fresh threshold.
    pub bonus_fresh_catalyst: f64,
    /// Oversold pullback inside an uptrend.
    pub bonus_oversold_uptrend: f64,
    /// ATR% threshold the wide-stops penalty keys on.
    pub volatility_too_high: f64,
    /// News age (hours) the fresh-catalyst bonus keys on.
    pub news_fresh_hours: f64,
}

impl Default for MultiplierConfig {
    fn default() -> Self {
        Self {
            penalty_falling_knife: 0.5,
            penalty_earnings_soon: 0.8,
            penalty_wide_stops: 0.85,
            penalty_news_risk: 0.6,
            penalty_insufficient_data: 0.3,
            bonus_strong_confluence: 1.15,
            bonus_fresh_catalyst: 1.10,
            bonus_oversold_uptrend: 1.12,
            volatility_too_high: 8.0,
            news_fresh_hours: 6.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Adjuster
// ---------------------------------------------------------------------------

/// Non-component inputs the gate and multiplier predicates read.
#[derive(Debug, Clone, Copy)]
pub struct AdjustContext<'a> {
    pub technicals: Option<&'a TechnicalSnapshot>,
    pub sentiment: f64,
    pub news_age_hours: f64,
    pub earnings_soon: bool,
}

pub struct Adjuster {
    gates: GateConfig,
    multipliers: MultiplierConfig,
}

impl Adjuster {
    pub fn new(gates: GateConfig, multipliers: MultiplierConfig) -> Self {
        Self { gates, multipliers }
    }

    /// Apply the hard quality gates in fixed order. Each gate can only cap
    /// the running score; every triggered gate appends a diagnostic line.
    pub fn apply_gates(&self, base_score: f64, ctx: &AdjustContext) -> (f64, Vec<String>) {
        let mut score = base_score;
        let mut adjustments = Vec::new();

        let snapshot = match ctx.technicals {
            Some(t) => t,
            None => return (score, adjustments),
        };
        let g = &self.gates;

        // Gate 1: never score high when RSI says the entry is expensive
        if let Some(rsi) = snapshot.rsi {
            if rsi > g.max_rsi_any_long {
                score = score.min(40.0);
                adjustments.push(format!("NOT_OVERSOLD: RSI {rsi:.0} > {:.0}", g.max_rsi_any_long));
            }
        }

        // Gate 2: oversold requirement for BUY-band scores
        if g.require_oversold_for_buy {
            if let Some(rsi) = snapshot.rsi {
                if score >= 75.0 && rsi > g.max_rsi_strong_buy {
                    score = score.min(64.0);
                    adjustments.push(format!("MISSED_ENTRY: RSI {rsi:.0} too high for STRONG_BUY"));
                } else if score >= 65.0 && rsi > g.max_rsi_buy {
                    score = score.min(49.0);
                    adjustments.push(format!("MISSED_ENTRY: RSI {rsi:.0} too high for BUY"));
                }
            }
        }

        // Gate 3: band position must be in the lower area for a BUY
        if score >= 65.0 && !snapshot.bb_status.is_lower_area() {
            score = score.min(49.0);
            adjustments.push(format!(
                "WRONG_BB_POSITION: {} not in lower area",
                snapshot.bb_status
            ));
        }

        // Gate 4: trend requirements
        if g.require_uptrend_for_strong_buy && score >= 75.0 && snapshot.trend != Trend::Uptrend {
            score = score.min(49.0);
            adjustments.push(format!(
                "WRONG_TREND: {} - need UPTREND for STRONG_BUY",
                snapshot.trend
            ));
        }
        if g.require_trend_for_buy
            && score >= 65.0
            && !matches!(snapshot.trend, Trend::Uptrend | Trend::Unknown)
        {
            score = score.min(49.0);
            adjustments.push(format!(
                "UNFAVORABLE_TREND: {} - waiting for uptrend",
                snapshot.trend
            ));
        }
        if matches!(snapshot.trend, Trend::Sideways | Trend::Downtrend) && score >= 50.0 {
            score = score.min(45.0);
            adjustments.push(format!("AVOID_TREND_{}: Wait for direction", snapshot.trend));
        }

        if score < base_score {
            debug!(base_score, gated = score, "Quality gates capped score");
        }
        (score, adjustments)
    }

    /// Apply all penalty and bonus multipliers as an ordered rule list.
    /// Every predicate is evaluated unconditionally; multiplication
    /// commutes, so order only fixes the diagnostic message sequence.
    pub fn apply_multipliers(&self, gated_score: f64, ctx: &AdjustContext) -> (f64, Vec<String>) {
        let mut score = gated_score;
        let mut adjustments = Vec::new();

        let snapshot = match ctx.technicals {
            Some(t) => t,
            None => return (score, adjustments),
        };

        let m = &self.multipliers;
        let rsi = snapshot.rsi;
        let bb = snapshot.bb_status;
        let macd = snapshot.macd_hist;

        let oversold = rsi.is_some_and(|r| r < RSI_OVERSOLD);
        let in_lower_band = bb.is_lower_area();

        let falling_knife = oversold
            && in_lower_band
            && snapshot.trend == Trend::Downtrend
            && macd.map_or(true, |h| h < 0.0);
        let wide_stops = snapshot.atr_pct.is_some_and(|a| a > m.volatility_too_high);
        let news_risk = oversold && in_lower_band && ctx.sentiment < SENTIMENT_RISK_MAX;
        let strong_confluence = oversold
            && bb == BbStatus::BelowLower
            && ctx.sentiment > SENTIMENT_CONFLUENCE_MIN
            && snapshot.trend == Trend::Uptrend
            && macd.is_some_and(|h| h > 0.0);
        let fresh_catalyst = ctx.news_age_hours < m.news_fresh_hours;
        let oversold_uptrend = rsi.is_some_and(|r| r < RSI_PULLBACK)
            && snapshot.trend == Trend::Uptrend
            && in_lower_band;

        let rules: [(&str, bool, f64); 8] = [
            ("FALLING_KNIFE", falling_knife, m.penalty_falling_knife),
            ("EARNINGS_SOON", ctx.earnings_soon, m.penalty_earnings_soon),
            ("WIDE_STOPS", wide_stops, m.penalty_wide_stops),
            ("NEWS_RISK", news_risk, m.penalty_news_risk),
            (
                "INSUFFICIENT_DATA",
                bb == BbStatus::InsufficientData,
                m.penalty_insufficient_data,
            ),
            ("STRONG_CONFLUENCE", strong_confluence, m.bonus_strong_confluence),
            ("FRESH_CATALYST", fresh_catalyst, m.bonus_fresh_catalyst),
            ("OVERSOLD_UPTREND", oversold_uptrend, m.bonus_oversold_uptrend),
        ];

        for (name, fired, multiplier) in rules {
            if fired {
                score *= multiplier;
                adjustments.push(format!("{name}: {}", pct(multiplier)));
                debug!(rule = name, multiplier, score, "Adjustment applied");
            }
        }

        (score.min(100.0), adjustments)
    }
}

/// Render a multiplier as a signed percentage, e.g. 1.15 → "+15%".
fn pct(multiplier: f64) -> String {
    format!("{:+.0}%", (multiplier - 1.0) * 100.0)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn make_snapshot() -> TechnicalSnapshot {
        TechnicalSnapshot {
            price: 100.0,
            rsi: Some(25.0),
            bb_status: BbStatus::BelowLower,
            trend: Trend::Uptrend,
            macd_hist: Some(0.01),
            atr_pct: Some(3.0),
        }
    }

    fn adjuster() -> Adjuster {
        Adjuster::new(GateConfig::default(), MultiplierConfig::default())
    }

    fn ctx(snapshot: &TechnicalSnapshot) -> AdjustContext<'_> {
        AdjustContext {
            technicals: Some(snapshot),
            sentiment: 0.5,
            news_age_hours: 10.0,
            earnings_soon: false,
        }
    }

    #[test]
    fn test_no_technicals_passes_through() {
        let ctx = AdjustContext {
            technicals: None,
            sentiment: 0.0,
            news_age_hours: 0.0,
            earnings_soon: true,
        };
        let (score, adj) = adjuster().apply_gates(80.0, &ctx);
        assert_eq!(score, 80.0);
        assert!(adj.is_empty());
        let (score, adj) = adjuster().apply_multipliers(80.0, &ctx);
        assert_eq!(score, 80.0);
        assert!(adj.is_empty());
    }

    #[test]
    fn test_gate_rsi_any_long_caps_at_40() {
        let mut snap = make_snapshot();
        snap.rsi = Some(55.0);
        snap.trend = Trend::Uptrend;
        let (score, adj) = adjuster().apply_gates(90.0, &ctx(&snap));
        assert!(score <= 40.0);
        assert!(adj.iter().any(|a| a.starts_with("NOT_OVERSOLD")));
    }

    #[test]
    fn test_gate_strong_buy_needs_oversold() {
        let mut snap = make_snapshot();
        snap.rsi = Some(32.0); // fine for BUY, too high for STRONG_BUY
        let (score, adj) = adjuster().apply_gates(80.0, &ctx(&snap));
        assert_eq!(score, 64.0);
        assert!(adj.iter().any(|a| a.contains("STRONG_BUY")));
    }

    #[test]
    fn test_gate_buy_needs_oversold() {
        let mut snap = make_snapshot();
        snap.rsi = Some(40.0);
        let (score, adj) = adjuster().apply_gates(70.0, &ctx(&snap));
        assert_eq!(score, 49.0);
        assert!(adj.iter().any(|a| a.contains("too high for BUY")));
    }

    #[test]
    fn test_gate_bb_position() {
        let mut snap = make_snapshot();
        snap.bb_status = BbStatus::UpperHalf;
        snap.rsi = Some(25.0);
        let (score, adj) = adjuster().apply_gates(70.0, &ctx(&snap));
        assert_eq!(score, 49.0);
        assert!(adj.iter().any(|a| a.starts_with("WRONG_BB_POSITION")));
    }

    #[test]
    fn test_gate_trend_for_strong_buy() {
        let mut snap = make_snapshot();
        snap.trend = Trend::Sideways;
        let (score, adj) = adjuster().apply_gates(80.0, &ctx(&snap));
        // Capped to 49 by the strong-buy trend gate; at 49 the avoid-trend
        // gate (score >= 50) no longer fires.
        assert_eq!(score, 49.0);
        assert!(adj.iter().any(|a| a.starts_with("WRONG_TREND")));
    }

    #[test]
    fn test_gate_avoid_trend_caps_moderate_scores() {
        let mut snap = make_snapshot();
        snap.trend = Trend::Downtrend;
        let (score, adj) = adjuster().apply_gates(55.0, &ctx(&snap));
        assert_eq!(score, 45.0);
        assert!(adj.iter().any(|a| a.starts_with("AVOID_TREND_DOWNTREND")));
    }

    #[test]
    fn test_gates_never_raise() {
        let snap = make_snapshot();
        for base in [0.0, 20.0, 45.0, 64.9, 65.0, 74.9, 75.0, 100.0] {
            let (score, _) = adjuster().apply_gates(base, &ctx(&snap));
            assert!(score <= base, "gate raised {base} to {score}");
        }
    }

    #[test]
    fn test_falling_knife_penalty() {
        let mut snap = make_snapshot();
        snap.trend = Trend::Downtrend;
        snap.macd_hist = Some(-0.01);
        let (score, adj) = adjuster().apply_multipliers(60.0, &ctx(&snap));
        assert_eq!(score, 30.0);
        assert_eq!(adj, vec!["FALLING_KNIFE: -50%"]);
    }

    #[test]
    fn test_falling_knife_with_missing_macd() {
        let mut snap = make_snapshot();
        snap.trend = Trend::Downtrend;
        snap.macd_hist = None; // missing histogram counts as non-positive
        let (_, adj) = adjuster().apply_multipliers(60.0, &ctx(&snap));
        assert!(adj.iter().any(|a| a.starts_with("FALLING_KNIFE")));
    }

    #[test]
    fn test_earnings_penalty() {
        let snap = make_snapshot();
        let mut c = ctx(&snap);
        c.earnings_soon = true;
        c.sentiment = 0.0; // defeat the confluence bonus
        let (_, adj) = adjuster().apply_multipliers(50.0, &c);
        assert!(adj.iter().any(|a| a == "EARNINGS_SOON: -20%"));
    }

    #[test]
    fn test_news_risk_penalty() {
        let mut snap = make_snapshot();
        snap.macd_hist = Some(-0.001);
        let mut c = ctx(&snap);
        c.sentiment = -0.7;
        let (score, adj) = adjuster().apply_multipliers(50.0, &c);
        assert!(adj.iter().any(|a| a.starts_with("NEWS_RISK")));
        // news risk ×0.6, oversold-uptrend ×1.12
        assert!((score - 50.0 * 0.6 * 1.12).abs() < 1e-9);
    }

    #[test]
    fn test_full_confluence_bonus_stack() {
        let snap = make_snapshot();
        let mut c = ctx(&snap);
        c.news_age_hours = 2.0;
        let (score, adj) = adjuster().apply_multipliers(70.0, &c);
        // confluence ×1.15, fresh ×1.10, oversold-uptrend ×1.12
        assert!((score - 70.0 * 1.15 * 1.10 * 1.12).abs() < 1e-9);
        assert_eq!(
            adj,
            vec![
                "STRONG_CONFLUENCE: +15%",
                "FRESH_CATALYST: +10%",
                "OVERSOLD_UPTREND: +12%"
            ]
        );
    }

    #[test]
    fn test_multiplier_result_capped_at_100() {
        let snap = make_snapshot();
        let mut c = ctx(&snap);
        c.news_age_hours = 1.0;
        let (score, _) = adjuster().apply_multipliers(95.0, &c);
        assert_eq!(score, 100.0);
    }
}
