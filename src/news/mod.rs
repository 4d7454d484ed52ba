//! News signal extraction and prediction.
//!
//! Two layers: the extractor turns a single headline into a directional
//! [`ArticleSignal`](crate::types::ArticleSignal), and the predictor
//! aggregates a batch of signals into a market
//! [`Prediction`](crate::types::Prediction).

pub mod extractor;
pub mod predictor;

pub use extractor::{ExtractorConfig, SignalExtractor};
pub use predictor::{NewsPredictor, PredictorConfig};
