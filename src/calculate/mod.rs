//! Statistics calculation engine.
//!
//! Computes derived metrics from a match history:
//! - Equipment performance (average placement, top-half and win rates)
//! - Synergy-group performance from normalized synergy tokens
//! - Whole-collection summary with a by-level breakdown
//! - Insights and takeaways from fixed policy thresholds
//!
//! Every entry point is a pure function of its inputs. Nothing is cached here.

pub mod equipment;
pub mod insights;
pub mod ranking;
pub mod summary;
pub mod synergy;

use std::collections::HashMap;

use crate::models::{
    AggregateStat, EmptyReason, GameModeFilter, Insight, MatchRecord, MatchSummary, Outcome,
    Takeaways, DEFAULT_FIELD_SIZE,
};

pub use equipment::{aggregate_equipment, normalize_equipment_id};
pub use insights::{generate_insights, generate_takeaways, InsightPolicy};
pub use ranking::TrendPoint;
pub use summary::summarize;
pub use synergy::{aggregate_synergies, SynergyParser, SynergyScope};

/// Parameters shared by all engine entry points.
#[derive(Debug, Clone)]
pub struct StatsParams {
    /// Game mode filter
    pub mode: GameModeFilter,

    /// Keep only the first N matches after mode filtering (input is newest first)
    pub max_matches: Option<usize>,

    /// Minimum samples for an equipment id to be shown
    pub min_equipment_games: u32,

    /// Minimum samples for a synergy group to be reported
    pub min_synergy_games: Option<u32>,

    /// Players per lobby
    pub field_size: u32,

    /// Which synergy tokens of a match are counted
    pub synergy_scope: SynergyScope,

    /// Synergy token normalization rules
    pub synergy_parser: SynergyParser,
}

impl Default for StatsParams {
    fn default() -> Self {
        Self {
            mode: GameModeFilter::All,
            max_matches: None,
            min_equipment_games: 3,
            min_synergy_games: Some(2),
            field_size: DEFAULT_FIELD_SIZE,
            synergy_scope: SynergyScope::All,
            synergy_parser: SynergyParser::default(),
        }
    }
}

/// Percentage of `hits` in `total`, 0 when `total` is 0.
pub fn percentage(hits: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        hits as f64 / total as f64 * 100.0
    }
}

/// Apply the mode filter and the recent-match window.
pub fn filter_matches<'a>(
    matches: &'a [MatchRecord],
    params: &StatsParams,
) -> Outcome<Vec<&'a MatchRecord>> {
    let limit = params.max_matches.unwrap_or(usize::MAX);
    let filtered: Vec<&MatchRecord> = matches
        .iter()
        .filter(|m| params.mode.matches(m.game_mode))
        .take(limit)
        .collect();

    if filtered.is_empty() {
        Outcome::Empty(EmptyReason::NoMatchesForFilter)
    } else {
        Outcome::Ready(filtered)
    }
}

/// Keep only entries with at least `min_samples` samples.
pub fn apply_min_samples(
    stats: &HashMap<String, AggregateStat>,
    min_samples: u32,
) -> HashMap<String, AggregateStat> {
    stats
        .iter()
        .filter(|(_, s)| s.sample_count >= min_samples)
        .map(|(k, s)| (k.clone(), s.clone()))
        .collect()
}

/// Everything the dashboard shows for one filter selection.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub summary: MatchSummary,

    /// Equipment stats before the minimum-games threshold
    pub equipment: HashMap<String, AggregateStat>,

    /// Equipment stats meeting `min_equipment_games`
    pub shown_equipment: HashMap<String, AggregateStat>,

    pub synergies: Outcome<HashMap<String, AggregateStat>>,
    pub insights: Vec<Insight>,
    pub takeaways: Takeaways,
    pub trend: Vec<TrendPoint>,
}

/// Run the full pipeline for one filter selection.
pub fn analyze(
    matches: &[MatchRecord],
    params: &StatsParams,
    policy: &InsightPolicy,
) -> Outcome<Analysis> {
    let filtered = match filter_matches(matches, params) {
        Outcome::Ready(filtered) => filtered,
        Outcome::Empty(reason) => return Outcome::Empty(reason),
    };

    let summary = match summarize(filtered.iter().copied(), params) {
        Outcome::Ready(summary) => summary,
        Outcome::Empty(reason) => return Outcome::Empty(reason),
    };

    let equipment = aggregate_equipment(filtered.iter().copied(), params);
    let shown_equipment = apply_min_samples(&equipment, params.min_equipment_games);
    let synergies = aggregate_synergies(filtered.iter().copied(), params);
    let insights = generate_insights(&summary, &equipment, policy);
    let takeaways = generate_takeaways(&summary, &shown_equipment, policy);
    let trend = ranking::placement_trend(filtered.iter().copied());

    Outcome::Ready(Analysis {
        summary,
        equipment,
        shown_equipment,
        synergies,
        insights,
        takeaways,
        trend,
    })
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::models::{GameMode, MatchRecord};

    pub fn record(placement: u32, level: u32, items: &[&str], traits: &[&str]) -> MatchRecord {
        MatchRecord::new(placement, level)
            .with_equipment(items.iter().copied())
            .with_synergies(traits.iter().copied())
    }

    pub fn duo(placement: u32) -> MatchRecord {
        MatchRecord::new(placement, 8).with_mode(GameMode::DoubleUp)
    }
}
