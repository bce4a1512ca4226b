//! Derived statistics models.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Why an engine entry point produced no data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyReason {
    /// The mode/window filter left no matches.
    NoMatchesForFilter,
    /// No match carried a usable synergy token.
    NoSynergyData,
}

impl fmt::Display for EmptyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmptyReason::NoMatchesForFilter => write!(f, "no matches for the selected filter"),
            EmptyReason::NoSynergyData => write!(f, "no usable synergy data"),
        }
    }
}

/// Result of an engine computation that may legitimately have nothing to report.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Ready(T),
    Empty(EmptyReason),
}

impl<T> Outcome<T> {
    pub fn is_empty(&self) -> bool {
        matches!(self, Outcome::Empty(_))
    }

    /// Borrow the data, if any.
    pub fn as_ready(&self) -> Option<&T> {
        match self {
            Outcome::Ready(data) => Some(data),
            Outcome::Empty(_) => None,
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Outcome::Ready(data) => Some(data),
            Outcome::Empty(_) => None,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Outcome<U> {
        match self {
            Outcome::Ready(data) => Outcome::Ready(f(data)),
            Outcome::Empty(reason) => Outcome::Empty(reason),
        }
    }

    pub fn and_then<U, F: FnOnce(T) -> Outcome<U>>(self, f: F) -> Outcome<U> {
        match self {
            Outcome::Ready(data) => f(data),
            Outcome::Empty(reason) => Outcome::Empty(reason),
        }
    }
}

/// Per-identifier performance over the matches that carried it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateStat {
    /// Number of (match, identifier) occurrences
    pub sample_count: u32,

    /// Placements of every contributing occurrence, in input order
    pub placements: Vec<u32>,

    /// Mean of `placements`
    pub average_placement: f64,

    /// Percentage of occurrences finishing in the top half (0-100)
    pub top_half_rate: f64,

    /// Percentage of occurrences finishing first (0-100)
    pub win_rate: f64,
}

impl AggregateStat {
    /// Percentage of occurrences at or better than `cutoff`.
    pub fn rate_at_or_better(&self, cutoff: u32) -> f64 {
        if self.sample_count == 0 {
            return 0.0;
        }
        let hits = self.placements.iter().filter(|&&p| p <= cutoff).count();
        hits as f64 / self.sample_count as f64 * 100.0
    }

    /// Top-2 style rate for a field of `field_size`.
    pub fn top_quarter_rate(&self, field_size: u32) -> f64 {
        self.rate_at_or_better(super::top_quarter_cutoff(field_size))
    }

    pub fn best_placement(&self) -> Option<u32> {
        self.placements.iter().copied().min()
    }

    pub fn worst_placement(&self) -> Option<u32> {
        self.placements.iter().copied().max()
    }
}

/// Running counters for one identifier during a single pass.
#[derive(Debug, Clone, Default)]
pub struct StatAccumulator {
    placements: Vec<u32>,
    top_half: u32,
    wins: u32,
}

impl StatAccumulator {
    pub fn record(&mut self, placement: u32, top_half_cutoff: u32) {
        self.placements.push(placement);
        if placement <= top_half_cutoff {
            self.top_half += 1;
        }
        if placement == 1 {
            self.wins += 1;
        }
    }

    pub fn sample_count(&self) -> u32 {
        self.placements.len() as u32
    }

    /// Finish the pass. Returns `None` when nothing was recorded.
    pub fn finish(self) -> Option<AggregateStat> {
        let sample_count = self.sample_count();
        if sample_count == 0 {
            return None;
        }

        let total: u64 = self.placements.iter().map(|&p| p as u64).sum();
        let n = sample_count as f64;

        Some(AggregateStat {
            sample_count,
            average_placement: total as f64 / n,
            top_half_rate: self.top_half as f64 / n * 100.0,
            win_rate: self.wins as f64 / n * 100.0,
            placements: self.placements,
        })
    }
}

/// Placement breakdown for one level value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelStat {
    pub sample_count: u32,
    pub average_placement: f64,
}

/// Whole-collection metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSummary {
    /// Matches summarized
    pub matches: u32,

    pub average_placement: f64,

    /// Top-half finish percentage (0-100)
    pub top_half_rate: f64,

    /// Top-quarter finish percentage (0-100)
    pub top_quarter_rate: f64,

    /// First-place percentage (0-100)
    pub win_rate: f64,

    pub average_level: f64,
    pub average_damage: f64,
    pub average_gold_left: f64,

    /// Breakdown keyed by level reached
    pub by_level: BTreeMap<u32, LevelStat>,
}

impl MatchSummary {
    pub fn level(&self, level: u32) -> Option<&LevelStat> {
        self.by_level.get(&level)
    }
}

/// How a raw synergy token was encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenEncoding {
    /// `<namespace>_<group>_<tier>`
    NamespacedWithTier,
    /// `<namespace>_<group>`
    NamespacedBare,
    /// `<group>_<tier>`
    PlainWithTier,
    /// `<group>`
    Bare,
}

/// A normalized synergy token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynergyToken {
    pub name: String,
    pub tier: u32,
    pub encoding: TokenEncoding,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn accumulate(placements: &[u32]) -> Option<AggregateStat> {
        let mut acc = StatAccumulator::default();
        for &p in placements {
            acc.record(p, 4);
        }
        acc.finish()
    }

    #[test]
    fn test_accumulator_rates() {
        let stat = accumulate(&[1, 3, 5]).unwrap();
        assert_eq!(stat.sample_count, 3);
        assert_eq!(stat.average_placement, 3.0);
        assert!((stat.win_rate - 100.0 / 3.0).abs() < 1e-9);
        assert!((stat.top_half_rate - 200.0 / 3.0).abs() < 1e-9);
        assert_eq!(stat.placements, vec![1, 3, 5]);
    }

    #[test]
    fn test_accumulator_empty_yields_nothing() {
        assert!(accumulate(&[]).is_none());
    }

    #[test]
    fn test_top_quarter_rate() {
        let stat = accumulate(&[1, 2, 3, 8]).unwrap();
        assert_eq!(stat.top_quarter_rate(8), 50.0);
        assert_eq!(stat.rate_at_or_better(3), 75.0);
        assert_eq!(stat.best_placement(), Some(1));
        assert_eq!(stat.worst_placement(), Some(8));
    }

    #[test]
    fn test_outcome_helpers() {
        let ready: Outcome<u32> = Outcome::Ready(3);
        assert!(!ready.is_empty());
        assert_eq!(ready.clone().map(|v| v * 2), Outcome::Ready(6));
        assert_eq!(ready.as_ready(), Some(&3));
        assert_eq!(
            ready.clone().and_then(|_| Outcome::<u32>::Empty(EmptyReason::NoSynergyData)),
            Outcome::Empty(EmptyReason::NoSynergyData)
        );

        let empty: Outcome<u32> = Outcome::Empty(EmptyReason::NoSynergyData);
        assert!(empty.is_empty());
        assert_eq!(empty.into_option(), None);
    }

    #[test]
    fn test_empty_reason_serialization() {
        let json = serde_json::to_string(&EmptyReason::NoMatchesForFilter).unwrap();
        assert_eq!(json, "\"no_matches_for_filter\"");
    }
}
