//! # Match Insights
//!
//! Local performance analytics over an auto-battler match history.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (match records, aggregate stats, insights)
//! - **storage**: Match file loading (JSON, JSONL), caching and the built-in sample
//! - **calculate**: Statistics engine, insights and takeaways
//! - **report**: Display names, icons and the text dashboard
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod api;
pub mod calculate;
pub mod config;
pub mod models;
pub mod report;
pub mod storage;

pub use models::*;
