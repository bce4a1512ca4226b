//! Whole-collection summary and by-level breakdown.

use std::collections::BTreeMap;

use super::{percentage, StatsParams};
use crate::models::{EmptyReason, LevelStat, MatchRecord, MatchSummary, Outcome};

#[derive(Default)]
struct LevelTotals {
    matches: u32,
    placement_sum: u64,
}

/// Summarize a filtered match collection.
///
/// Rates are percentages at full precision; rounding is left to the caller.
pub fn summarize<'a, I>(matches: I, params: &StatsParams) -> Outcome<MatchSummary>
where
    I: IntoIterator<Item = &'a MatchRecord>,
{
    let mut count = 0usize;
    let mut placement_sum = 0u64;
    let mut level_sum = 0u64;
    let mut damage_sum = 0u64;
    let mut gold_sum = 0u64;
    let mut top_half = 0usize;
    let mut top_quarter = 0usize;
    let mut wins = 0usize;
    let mut levels: BTreeMap<u32, LevelTotals> = BTreeMap::new();

    for record in matches {
        count += 1;
        placement_sum += record.placement as u64;
        level_sum += record.level as u64;
        damage_sum += record.damage as u64;
        gold_sum += record.gold_left as u64;

        if record.is_top_half(params.field_size) {
            top_half += 1;
        }
        if record.is_top_quarter(params.field_size) {
            top_quarter += 1;
        }
        if record.is_win() {
            wins += 1;
        }

        let totals = levels.entry(record.level).or_default();
        totals.matches += 1;
        totals.placement_sum += record.placement as u64;
    }

    if count == 0 {
        return Outcome::Empty(EmptyReason::NoMatchesForFilter);
    }

    let n = count as f64;
    let by_level = levels
        .into_iter()
        .map(|(level, totals)| {
            (
                level,
                LevelStat {
                    sample_count: totals.matches,
                    average_placement: totals.placement_sum as f64 / totals.matches as f64,
                },
            )
        })
        .collect();

    Outcome::Ready(MatchSummary {
        matches: count as u32,
        average_placement: placement_sum as f64 / n,
        top_half_rate: percentage(top_half, count),
        top_quarter_rate: percentage(top_quarter, count),
        win_rate: percentage(wins, count),
        average_level: level_sum as f64 / n,
        average_damage: damage_sum as f64 / n,
        average_gold_left: gold_sum as f64 / n,
        by_level,
    })
}
