//! Per-headline signal extraction.
//!
//! Classifies a headline into a directional signal by matching it against
//! bullish and bearish keyword taxonomies, then scales the raw match count
//! by magnitude (adjective strength) and urgency (time references) to
//! estimate market impact.

use serde::Deserialize;
use std::collections::BTreeMap;

use crate::types::{ArticleSignal, Direction};

// ---------------------------------------------------------------------------
// Keyword taxonomies (defaults — substitutable via configuration)
// ---------------------------------------------------------------------------

/// One catalyst category and the phrases that indicate it.
#[derive(Debug, Clone, Deserialize)]
pub struct KeywordCategory {
    pub name: String,
    pub phrases: Vec<String>,
}

impl KeywordCategory {
    fn new(name: &str, phrases: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            phrases: phrases.iter().map(|p| p.to_string()).collect(),
        }
    }
}

/// Ordered list of keyword categories for one direction. Order is
/// significant: it breaks ties when picking the dominant catalyst.
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct Taxonomy {
    pub categories: Vec<KeywordCategory>,
}

impl Taxonomy {
    /// All phrases found in `text`, keyed by category name.
    /// Categories with no matches are omitted.
    fn find_matches(&self, text: &str) -> BTreeMap<String, Vec<String>> {
        let mut found = BTreeMap::new();
        for category in &self.categories {
            let matches: Vec<String> = category
                .phrases
                .iter()
                .filter(|p| text.contains(p.as_str()))
                .cloned()
                .collect();
            if !matches.is_empty() {
                found.insert(category.name.clone(), matches);
            }
        }
        found
    }
}

/// Full extraction configuration: both taxonomies plus the magnitude and
/// urgency word lists.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    pub bullish: Taxonomy,
    pub bearish: Taxonomy,
    /// Adjectives indicating a dramatic move.
    pub magnitude_high: Vec<String>,
    /// Adjectives indicating a notable but ordinary move.
    pub magnitude_medium: Vec<String>,
    /// Phrases indicating the event is happening right now.
    pub urgency_immediate: Vec<String>,
    /// Phrases indicating a near-term event.
    pub urgency_near: Vec<String>,
}

fn strings(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            bullish: Taxonomy {
                categories: vec![
                    KeywordCategory::new(
                        "earnings",
                        &[
                            "beat earnings",
                            "exceeded expectations",
                            "surprise profit",
                            "strong earnings",
                            "record profit",
                            "earnings beat",
                            "topped estimates",
                            "better than expected",
                            "blowout earnings",
                            "guidance raised",
                        ],
                    ),
                    KeywordCategory::new(
                        "growth",
                        &[
                            "revenue surge",
                            "sales growth",
                            "record revenue",
                            "expanding market",
                            "market share gain",
                            "user growth",
                            "customer growth",
                            "accelerating growth",
                        ],
                    ),
                    KeywordCategory::new(
                        "products",
                        &[
                            "new product",
                            "product launch",
                            "innovation",
                            "breakthrough",
                            "partnership",
                            "major deal",
                            "contract win",
                            "acquisition",
                        ],
                    ),
                    KeywordCategory::new(
                        "analyst",
                        &[
                            "upgrade",
                            "price target raised",
                            "buy rating",
                            "outperform",
                            "bullish",
                            "analyst optimistic",
                            "increased target",
                        ],
                    ),
                    KeywordCategory::new(
                        "guidance",
                        &[
                            "raised guidance",
                            "increased forecast",
                            "optimistic outlook",
                            "strong outlook",
                            "upbeat forecast",
                            "raised estimates",
                        ],
                    ),
                ],
            },
            bearish: Taxonomy {
                categories: vec![
                    KeywordCategory::new(
                        "earnings",
                        &[
                            "missed earnings",
                            "below expectations",
                            "earnings miss",
                            "profit warning",
                            "disappointing results",
                            "weak earnings",
                            "missed estimates",
                        ],
                    ),
                    KeywordCategory::new(
                        "problems",
                        &[
                            "lawsuit",
                            "investigation",
                            "regulatory",
                            "fine",
                            "scandal",
                            "layoffs",
                            "job cuts",
                            "restructuring",
                            "bankruptcy",
                            "debt",
                        ],
                    ),
                    KeywordCategory::new(
                        "weakness",
                        &[
                            "sales decline",
                            "revenue drop",
                            "losing market share",
                            "slowing growth",
                            "demand weakness",
                            "margin pressure",
                            "competition",
                        ],
                    ),
                    KeywordCategory::new(
                        "analyst",
                        &[
                            "downgrade",
                            "price target cut",
                            "sell rating",
                            "underperform",
                            "bearish",
                            "analyst concerned",
                            "lowered target",
                        ],
                    ),
                    KeywordCategory::new(
                        "guidance",
                        &[
                            "lowered guidance",
                            "cut forecast",
                            "weak outlook",
                            "cautious outlook",
                            "reduced estimates",
                            "disappointing guidance",
                        ],
                    ),
                ],
            },
            magnitude_high: strings(&[
                "massive",
                "huge",
                "major",
                "significant",
                "substantial",
                "dramatic",
                "record",
                "unprecedented",
                "historic",
                "surge",
                "plunge",
                "soar",
            ]),
            magnitude_medium: strings(&["strong", "solid", "notable", "considerable", "meaningful"]),
            urgency_immediate: strings(&[
                "today",
                "breaking",
                "just announced",
                "now",
                "this morning",
                "moments ago",
                "alert",
            ]),
            urgency_near: strings(&["tomorrow", "this week", "upcoming", "soon", "next week"]),
        }
    }
}

// ---------------------------------------------------------------------------
// Extractor
// ---------------------------------------------------------------------------

/// Extracts an actionable market signal from a single headline.
/// Referentially transparent: the same text always yields the same signal.
pub struct SignalExtractor {
    config: ExtractorConfig,
}

impl Default for SignalExtractor {
    fn default() -> Self {
        Self::new(ExtractorConfig::default())
    }
}

impl SignalExtractor {
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    pub fn extract(&self, headline: &str) -> ArticleSignal {
        let text = headline.to_lowercase();

        let bullish_matches = self.config.bullish.find_matches(&text);
        let bearish_matches = self.config.bearish.find_matches(&text);

        let bullish_count: usize = bullish_matches.values().map(Vec::len).sum();
        let bearish_count: usize = bearish_matches.values().map(Vec::len).sum();
        let total = bullish_count + bearish_count;

        let (direction, confidence) = if total == 0 {
            (Direction::Neutral, 0.0)
        } else if bullish_count > bearish_count {
            (
                Direction::Bullish,
                (bullish_count as f64 / (total + 1) as f64).min(1.0),
            )
        } else {
            // Ties read bearish: ambiguity is risk
            (
                Direction::Bearish,
                (bearish_count as f64 / (total + 1) as f64).min(1.0),
            )
        };

        let magnitude = self.magnitude(&text);
        let urgency = self.urgency(&text);
        let impact_score = ((total as f64 * 10.0) * magnitude * urgency).min(100.0);

        let catalyst = self.dominant_category(&bullish_matches, &bearish_matches);

        ArticleSignal {
            direction,
            confidence: (confidence * 100.0).round() / 100.0,
            impact_score: (impact_score * 10.0).round() / 10.0,
            magnitude,
            urgency,
            catalyst,
            bullish_matches,
            bearish_matches,
        }
    }

    /// Magnitude multiplier (1.0–2.0) from adjective strength.
    fn magnitude(&self, text: &str) -> f64 {
        let high = self
            .config
            .magnitude_high
            .iter()
            .filter(|w| text.contains(w.as_str()))
            .count();
        let medium = self
            .config
            .magnitude_medium
            .iter()
            .filter(|w| text.contains(w.as_str()))
            .count();

        if high >= 2 {
            2.0
        } else if high == 1 {
            1.5
        } else if medium >= 1 {
            1.2
        } else {
            1.0
        }
    }

    /// Urgency multiplier (1.0–1.5) from time-reference phrases.
    fn urgency(&self, text: &str) -> f64 {
        if self
            .config
            .urgency_immediate
            .iter()
            .any(|w| text.contains(w.as_str()))
        {
            1.5
        } else if self
            .config
            .urgency_near
            .iter()
            .any(|w| text.contains(w.as_str()))
        {
            1.2
        } else {
            1.0
        }
    }

    /// Category with the most matched phrases across both taxonomies,
    /// uppercased, or NONE. Counts for same-named categories are summed;
    /// taxonomy order (bullish first) breaks ties.
    fn dominant_category(
        &self,
        bullish: &BTreeMap<String, Vec<String>>,
        bearish: &BTreeMap<String, Vec<String>>,
    ) -> String {
        let mut best: Option<(&str, usize)> = None;
        let mut seen: Vec<&str> = Vec::new();

        let ordered = self
            .config
            .bullish
            .categories
            .iter()
            .chain(self.config.bearish.categories.iter());
        for category in ordered {
            let name = category.name.as_str();
            if seen.contains(&name) {
                continue;
            }
            seen.push(name);

            let count = bullish.get(name).map_or(0, Vec::len) + bearish.get(name).map_or(0, Vec::len);
            if count > 0 && best.map_or(true, |(_, c)| count > c) {
                best = Some((name, count));
            }
        }

        best.map_or_else(|| "NONE".to_string(), |(name, _)| name.to_uppercase())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> SignalExtractor {
        SignalExtractor::default()
    }

    #[test]
    fn test_neutral_headline() {
        let signal = extractor().extract("Company holds annual shareholder meeting");
        assert_eq!(signal.direction, Direction::Neutral);
        assert_eq!(signal.confidence, 0.0);
        assert_eq!(signal.impact_score, 0.0);
        assert_eq!(signal.catalyst, "NONE");
    }

    #[test]
    fn test_bullish_earnings_headline() {
        let signal = extractor().extract("Acme beat earnings and topped estimates");
        assert_eq!(signal.direction, Direction::Bullish);
        assert_eq!(signal.catalyst, "EARNINGS");
        assert_eq!(signal.bullish_count(), 2);
        assert_eq!(signal.bearish_count(), 0);
        // 2 / (2 + 0 + 1)
        assert_eq!(signal.confidence, 0.67);
        assert_eq!(signal.impact_score, 20.0);
    }

    #[test]
    fn test_bearish_headline() {
        let signal = extractor().extract("Regulators open investigation into Acme lawsuit");
        assert_eq!(signal.direction, Direction::Bearish);
        assert_eq!(signal.catalyst, "PROBLEMS");
        assert!(signal.bearish_count() >= 2);
    }

    #[test]
    fn test_case_folding() {
        let lower = extractor().extract("acme beat earnings");
        let upper = extractor().extract("ACME BEAT EARNINGS");
        assert_eq!(lower.direction, upper.direction);
        assert_eq!(lower.impact_score, upper.impact_score);
    }

    #[test]
    fn test_magnitude_multipliers() {
        let e = extractor();
        // Two high-magnitude words
        let s = e.extract("Massive record revenue surge at Acme");
        assert_eq!(s.magnitude, 2.0);
        // One high-magnitude word
        let s = e.extract("Major contract win for Acme");
        assert_eq!(s.magnitude, 1.5);
        // Medium only
        let s = e.extract("Solid sales growth at Acme");
        assert_eq!(s.magnitude, 1.2);
        // None
        let s = e.extract("Acme beat earnings");
        assert_eq!(s.magnitude, 1.0);
    }

    #[test]
    fn test_urgency_multipliers() {
        let e = extractor();
        let s = e.extract("Breaking: Acme beat earnings");
        assert_eq!(s.urgency, 1.5);
        let s = e.extract("Acme earnings beat expected this week");
        assert_eq!(s.urgency, 1.2);
        let s = e.extract("Acme beat earnings");
        assert_eq!(s.urgency, 1.0);
    }

    #[test]
    fn test_impact_capped_at_100() {
        let s = extractor().extract(
            "Breaking: massive historic blowout earnings beat, record profit surge, \
             guidance raised, upgrade, buy rating, partnership, acquisition today",
        );
        assert_eq!(s.impact_score, 100.0);
    }

    #[test]
    fn test_tie_reads_bearish() {
        // One bullish (upgrade) and one bearish (downgrade) match
        let s = extractor().extract("Analysts split: upgrade at one firm, downgrade at another");
        assert_eq!(s.direction, Direction::Bearish);
    }

    #[test]
    fn test_same_category_counts_summed() {
        // 1 bullish earnings + 2 bearish analyst phrases → ANALYST dominates
        let s = extractor()
            .extract("Despite beat earnings, downgrade and sell rating weigh on shares");
        assert_eq!(s.catalyst, "ANALYST");
    }

    #[test]
    fn test_referential_transparency() {
        let e = extractor();
        let a = e.extract("Acme announces major deal and raised guidance");
        let b = e.extract("Acme announces major deal and raised guidance");
        assert_eq!(a.direction, b.direction);
        assert_eq!(a.confidence, b.confidence);
        assert_eq!(a.impact_score, b.impact_score);
        assert_eq!(a.catalyst, b.catalyst);
        assert_eq!(a.bullish_matches, b.bullish_matches);
    }
}
