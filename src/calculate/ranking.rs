//! Orderings over aggregated stats for display.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::{AggregateStat, MatchRecord};

/// Average placement below which an item is a best performer.
pub const BEST_PERFORMER_MAX_AVERAGE: f64 = 4.0;
/// Top-half rate above which an item is a best performer.
pub const BEST_PERFORMER_MIN_TOP_HALF: f64 = 60.0;
/// Average placement above which an item is a problem.
pub const PROBLEM_MIN_AVERAGE: f64 = 4.2;
/// Top-half rate below which an item is a problem.
pub const PROBLEM_MAX_TOP_HALF: f64 = 50.0;

/// A named stat borrowed from an aggregate map.
pub type Ranked<'a> = (&'a str, &'a AggregateStat);

/// Sort key for ranking tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    /// Best average placement first
    #[default]
    Average,
    /// Most samples first
    Games,
}

impl std::str::FromStr for SortBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "avg" | "average" | "placement" => Ok(SortBy::Average),
            "games" | "usage" | "count" => Ok(SortBy::Games),
            other => Err(format!("unknown sort key '{}' (expected avg or games)", other)),
        }
    }
}

fn cmp_average(a: &Ranked<'_>, b: &Ranked<'_>) -> Ordering {
    a.1.average_placement
        .partial_cmp(&b.1.average_placement)
        .unwrap_or(Ordering::Equal)
}

fn cmp_games_desc(a: &Ranked<'_>, b: &Ranked<'_>) -> Ordering {
    b.1.sample_count.cmp(&a.1.sample_count)
}

fn entries(stats: &HashMap<String, AggregateStat>) -> Vec<Ranked<'_>> {
    stats.iter().map(|(k, v)| (k.as_str(), v)).collect()
}

/// All entries in the given order. Ties fall back to name.
pub fn sorted(stats: &HashMap<String, AggregateStat>, sort: SortBy) -> Vec<Ranked<'_>> {
    let mut all = entries(stats);
    match sort {
        SortBy::Average => all.sort_by(|a, b| cmp_average(a, b).then_with(|| a.0.cmp(b.0))),
        SortBy::Games => all.sort_by(|a, b| {
            cmp_games_desc(a, b)
                .then_with(|| cmp_average(a, b))
                .then_with(|| a.0.cmp(b.0))
        }),
    }
    all
}

/// The `n` entries with the lowest average placement.
pub fn best_by_average(stats: &HashMap<String, AggregateStat>, n: usize) -> Vec<Ranked<'_>> {
    let mut best = sorted(stats, SortBy::Average);
    best.truncate(n);
    best
}

/// The `n` most used entries.
pub fn most_used(stats: &HashMap<String, AggregateStat>, n: usize) -> Vec<Ranked<'_>> {
    let mut used = sorted(stats, SortBy::Games);
    used.truncate(n);
    used
}

/// Items worth prioritizing, best average first.
pub fn best_performers(stats: &HashMap<String, AggregateStat>) -> Vec<Ranked<'_>> {
    sorted(stats, SortBy::Average)
        .into_iter()
        .filter(|(_, s)| {
            s.average_placement < BEST_PERFORMER_MAX_AVERAGE
                && s.top_half_rate > BEST_PERFORMER_MIN_TOP_HALF
        })
        .collect()
}

/// Items hurting results, worst average first.
pub fn problem_equipment(stats: &HashMap<String, AggregateStat>) -> Vec<Ranked<'_>> {
    let mut problems: Vec<Ranked<'_>> = entries(stats)
        .into_iter()
        .filter(|(_, s)| {
            s.average_placement > PROBLEM_MIN_AVERAGE || s.top_half_rate < PROBLEM_MAX_TOP_HALF
        })
        .collect();
    problems.sort_by(|a, b| cmp_average(b, a).then_with(|| a.0.cmp(b.0)));
    problems
}

/// One point of the placement-over-time series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendPoint {
    /// Position in the filtered collection (0 = most recent)
    pub game: usize,
    pub placement: u32,
}

pub fn placement_trend<'a, I>(matches: I) -> Vec<TrendPoint>
where
    I: IntoIterator<Item = &'a MatchRecord>,
{
    matches
        .into_iter()
        .enumerate()
        .map(|(game, m)| TrendPoint {
            game,
            placement: m.placement,
        })
        .collect()
}
