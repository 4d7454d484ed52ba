//! SENTINEL — Premarket Trade-Quality Scoring & News Signal Engine
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod config;
pub mod types;
pub mod scoring;
pub mod news;
pub mod alignment;
pub mod report;
