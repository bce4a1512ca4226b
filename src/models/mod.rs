//! Core data models for match insights.

mod insight;
mod match_record;
mod stats;

pub use insight::*;
pub use match_record::*;
pub use stats::*;
