//! SENTINEL — Premarket Trade-Quality Scoring & News Signal Engine
//!
//! Entry point. Loads configuration, initialises structured logging,
//! reads a batch of ticker inputs from a JSON file, and prints the score,
//! news prediction, and alignment verdict for each.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{info, warn};

use sentinel::alignment::check_alignment;
use sentinel::config::AppConfig;
use sentinel::news::{NewsPredictor, SignalExtractor};
use sentinel::report;
use sentinel::scoring::timing::SystemClock;
use sentinel::scoring::TradeScorer;
use sentinel::types::{Headline, TechnicalSnapshot};

const BANNER: &str = r#"
 ____  _____ _   _ _____ ___ _   _ _____ _
/ ___|| ____| \ | |_   _|_ _| \ | | ____| |
\___ \|  _| |  \| | | |  | ||  \| |  _| | |
 ___) | |___| |\  | | |  | || |\  | |___| |___
|____/|_____|_| \_| |_| |___|_| \_|_____|_____|

  Premarket Trade-Quality Scoring & News Signal Engine
  v0.1.0
"#;

/// One ticker's inputs as supplied by the upstream data fetcher.
#[derive(Debug, Deserialize)]
struct TickerInput {
    ticker: String,
    technicals: Option<TechnicalSnapshot>,
    /// Aggregate sentiment in [-1, 1].
    #[serde(default)]
    sentiment: f64,
    #[serde(default)]
    earnings_soon: bool,
    /// Headlines, most recent first.
    #[serde(default)]
    headlines: Vec<Headline>,
}

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let input_path = args
        .next()
        .context("usage: sentinel <input.json> [config.toml]")?;
    let config_path = args.next().unwrap_or_else(|| "config.toml".to_string());

    let cfg = AppConfig::load(&config_path)?;

    init_logging();

    println!("{BANNER}");

    let contents = std::fs::read_to_string(&input_path)
        .with_context(|| format!("Failed to read input file: {input_path}"))?;
    let inputs: Vec<TickerInput> = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse input file: {input_path}"))?;

    let thresholds = cfg.scoring.thresholds.clone();
    let scorer = TradeScorer::new(cfg.scoring, Box::new(SystemClock))
        .context("Invalid scoring configuration")?;
    let predictor = NewsPredictor::new(
        SignalExtractor::new(cfg.news.extractor),
        cfg.news.predictor,
    );

    info!(tickers = inputs.len(), input = %input_path, "Batch loaded");

    let now = Utc::now();
    for input in &inputs {
        if input.headlines.is_empty() {
            warn!(ticker = %input.ticker, "No headlines for ticker");
        }

        let result = scorer.score(
            input.technicals.as_ref(),
            input.sentiment,
            input.headlines.len() as u32,
            oldest_headline_age_hours(&input.headlines, now),
            input.earnings_soon,
        );
        let analysis = predictor.analyze(&input.headlines);
        let prediction = predictor.predict(&analysis);
        let alignment = check_alignment(
            &result,
            &prediction,
            input.technicals.as_ref(),
            &thresholds,
        );

        print!("{}", report::score_report(&input.ticker, &result));
        print!(
            "{}",
            report::signal_report(&input.ticker, &analysis, &prediction)
        );
        println!("{}", report::alignment_line(&alignment));
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "ticker": input.ticker,
                "score": result,
                "prediction": prediction,
                "alignment": alignment,
            }))?
        );
        println!();
    }

    Ok(())
}

/// Hours since the oldest headline in the batch, or a stale default when
/// there are none.
fn oldest_headline_age_hours(headlines: &[Headline], now: DateTime<Utc>) -> f64 {
    headlines
        .iter()
        .map(|h| h.published_at)
        .min()
        .map_or(f64::MAX, |oldest| {
            (now - oldest).num_minutes() as f64 / 60.0
        })
}

fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("sentinel=info"));

    let json_logging = std::env::var("SENTINEL_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    }
}
