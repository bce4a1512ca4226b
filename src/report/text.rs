//! Plain-text dashboard.

use std::collections::HashMap;
use std::fmt::{self, Write};

use crate::calculate::ranking::{self, Ranked};
use crate::calculate::Analysis;
use crate::models::{
    top_half_cutoff, top_quarter_cutoff, AggregateStat, EmptyReason, GameModeFilter, Improvement,
    Insight, InsightDetail, MatchSummary, Outcome, Strength,
};
use crate::storage::DataSource;

use super::icons::{equipment_emoji, placement_emoji};
use super::names::{display_equipment_name, display_synergy_name};

// Metric deltas are shown against these reference values.
const BASELINE_TOP_HALF_RATE: f64 = 60.0;
const BASELINE_AVERAGE_PLACEMENT: f64 = 4.5;
const BASELINE_AVERAGE_LEVEL: f64 = 7.5;
const BASELINE_AVERAGE_DAMAGE: f64 = 100.0;

const FALLBACK_STRENGTHS: [&str; 3] = [
    "Building a solid foundation",
    "Learning from each game",
    "Tracking performance data",
];
const FALLBACK_IMPROVEMENTS: [&str; 3] = [
    "Continue current strategy",
    "Fine-tune positioning",
    "Master meta comps",
];

const RESULTS_PER_ROW: usize = 5;
const BEST_CHART_SIZE: usize = 8;
const MOST_USED_SIZE: usize = 10;

/// What the report is about, for the header.
pub struct ReportContext<'a> {
    pub source: &'a DataSource,
    pub mode: GameModeFilter,
    pub field_size: u32,
}

/// Message shown instead of a report when there is nothing to analyze.
pub fn render_empty(reason: EmptyReason, mode: GameModeFilter) -> String {
    match (reason, mode) {
        (EmptyReason::NoMatchesForFilter, GameModeFilter::Only(m)) => {
            format!("No {} games found in your data!", m)
        }
        (EmptyReason::NoMatchesForFilter, GameModeFilter::All) => {
            "No games found in your data!".to_string()
        }
        (EmptyReason::NoSynergyData, _) => "No synergy data available.".to_string(),
    }
}

pub fn render_strength(strength: &Strength, field_size: u32) -> String {
    match strength {
        Strength::SolidTopHalfRate(rate) => format!(
            "{:.0}% Top {} rate is solid for climbing",
            rate,
            top_half_cutoff(field_size)
        ),
        Strength::GoodLevelManagement(level) => {
            format!("Good level management ({:.1} average)", level)
        }
        Strength::StrongTopQuarterRate(rate) => format!(
            "Strong top {} rate ({:.0}%)",
            top_quarter_cutoff(field_size),
            rate
        ),
    }
}

pub fn render_improvement(improvement: &Improvement, field_size: u32) -> String {
    match improvement {
        Improvement::ReduceEquipment { name } => {
            format!("Reduce {} usage", display_equipment_name(name))
        }
        Improvement::EarlyGameEconomy => "Focus on early game economy".to_string(),
        Improvement::TopHalfConsistency => format!(
            "Work on consistent top {} finishes",
            top_half_cutoff(field_size)
        ),
        Improvement::LevelTiming => "Improve leveling timing".to_string(),
        Improvement::PushHigherLevel { level } => {
            format!("Push for level {} more often", level + 1)
        }
    }
}

/// One insight as a single line, prefixed `[!]` for warnings and `[+]` for successes.
pub fn render_insight(insight: &Insight, field_size: u32) -> String {
    let top = top_half_cutoff(field_size);
    match &insight.detail {
        InsightDetail::UnderperformingEquipment {
            equipment,
            alternative,
        } => {
            let worst = display_equipment_name(&equipment.name);
            let mut line = format!(
                "[!] Stop forcing {}! {} has poor performance ({:.2} avg placement, {:.0}% top {}).",
                worst, worst, equipment.average_placement, equipment.top_half_rate, top
            );
            if let Some(best) = alternative {
                line.push_str(&format!(
                    " Focus on {} instead ({:.2} avg placement, {:.0}% top {})!",
                    display_equipment_name(&best.name),
                    best.average_placement,
                    best.top_half_rate,
                    top
                ));
            }
            line
        }
        InsightDetail::StrongPerformance {
            average_placement,
            top_half_rate,
        } => format!(
            "[+] Strong performance! Excellent {:.2} average placement with {:.0}% top {} rate. Keep up the consistency!",
            average_placement, top_half_rate, top
        ),
        InsightDetail::TopHalfConsistency { top_half_rate } => format!(
            "[+] Great top {} consistency! Strong {:.0}% top {} rate. Focus on converting more {}ths to wins.",
            top, top_half_rate, top, top
        ),
        InsightDetail::FocusOnFundamentals { average_placement } => format!(
            "[!] Focus on fundamentals. Average placement of {:.2} suggests room for improvement. Focus on economy and positioning.",
            average_placement
        ),
    }
}

/// Placement emojis, newest first, five per row.
pub fn render_recent_grid(trend: &[ranking::TrendPoint], field_size: u32) -> String {
    trend
        .chunks(RESULTS_PER_ROW)
        .map(|row| {
            row.iter()
                .map(|p| placement_emoji(p.placement, field_size))
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn name_width<'a>(names: impl Iterator<Item = &'a str>) -> usize {
    names.map(|n| n.chars().count()).max().unwrap_or(0).max(4)
}

/// Equipment rows with games, average, top-half, top-quarter and win rates.
pub fn render_equipment_table(rows: &[Ranked<'_>], field_size: u32) -> String {
    let names: Vec<String> = rows.iter().map(|(n, _)| display_equipment_name(n)).collect();
    let width = name_width(names.iter().map(String::as_str));
    let mut out = String::new();

    let _ = writeln!(
        out,
        "   {:<width$}  {:>5}  {:>5}  {:>6}  {:>6}  {:>5}",
        "Item",
        "Games",
        "Avg",
        format!("Top {}", top_half_cutoff(field_size)),
        format!("Top {}", top_quarter_cutoff(field_size)),
        "Win",
        width = width
    );
    for ((id, stat), name) in rows.iter().zip(&names) {
        let _ = writeln!(
            out,
            "{} {:<width$}  {:>5}  {:>5.2}  {:>5.0}%  {:>5.0}%  {:>4.0}%",
            equipment_emoji(id),
            name,
            stat.sample_count,
            stat.average_placement,
            stat.top_half_rate,
            stat.top_quarter_rate(field_size),
            stat.win_rate,
            width = width
        );
    }
    out
}

/// Synergy rows, best average first.
pub fn render_synergy_table(stats: &HashMap<String, AggregateStat>, field_size: u32) -> String {
    let rows = ranking::sorted(stats, ranking::SortBy::Average);
    let names: Vec<String> = rows.iter().map(|(n, _)| display_synergy_name(n)).collect();
    let width = name_width(names.iter().map(String::as_str));
    let mut out = String::new();

    let _ = writeln!(
        out,
        "{:<width$}  {:>5}  {:>5}  {:>6}",
        "Synergy",
        "Games",
        "Avg",
        format!("Top {}", top_half_cutoff(field_size)),
        width = width
    );
    for ((_, stat), name) in rows.iter().zip(&names) {
        let _ = writeln!(
            out,
            "{:<width$}  {:>5}  {:>5.2}  {:>5.0}%",
            name,
            stat.sample_count,
            stat.average_placement,
            stat.top_half_rate,
            width = width
        );
    }
    out
}

fn write_metrics(out: &mut String, summary: &MatchSummary, field_size: u32) -> fmt::Result {
    writeln!(out, "--- Key Metrics ---")?;
    writeln!(
        out,
        "Top {} Rate      {:>6.1}%  ({:+.1}%)",
        top_half_cutoff(field_size),
        summary.top_half_rate,
        summary.top_half_rate - BASELINE_TOP_HALF_RATE
    )?;
    writeln!(
        out,
        "Avg Placement   {:>7.2}  ({:+.2})",
        summary.average_placement,
        BASELINE_AVERAGE_PLACEMENT - summary.average_placement
    )?;
    writeln!(
        out,
        "Avg Level       {:>7.1}  ({:+.1})",
        summary.average_level,
        summary.average_level - BASELINE_AVERAGE_LEVEL
    )?;
    writeln!(
        out,
        "Avg Damage      {:>7.0}  ({:+.0})",
        summary.average_damage,
        summary.average_damage - BASELINE_AVERAGE_DAMAGE
    )?;
    writeln!(
        out,
        "Win Rate        {:>6.1}%   Top {} Rate {:.1}%   Avg Gold Left {:.1}",
        summary.win_rate,
        top_quarter_cutoff(field_size),
        summary.top_quarter_rate,
        summary.average_gold_left
    )
}

fn write_takeaways(out: &mut String, analysis: &Analysis, field_size: u32) -> fmt::Result {
    writeln!(out, "--- Key Takeaways ---")?;
    writeln!(out, "Strengths:")?;
    if analysis.takeaways.strengths.is_empty() {
        for line in FALLBACK_STRENGTHS {
            writeln!(out, "  - {}", line)?;
        }
    } else {
        for strength in &analysis.takeaways.strengths {
            writeln!(out, "  - {}", render_strength(strength, field_size))?;
        }
    }

    writeln!(out, "Areas to Improve:")?;
    if analysis.takeaways.improvements.is_empty() {
        for line in FALLBACK_IMPROVEMENTS {
            writeln!(out, "  - {}", line)?;
        }
    } else {
        for improvement in &analysis.takeaways.improvements {
            writeln!(out, "  - {}", render_improvement(improvement, field_size))?;
        }
    }
    Ok(())
}

fn write_equipment_sections(out: &mut String, analysis: &Analysis, field_size: u32) -> fmt::Result {
    let shown = &analysis.shown_equipment;
    if shown.is_empty() {
        writeln!(out, "--- Item Performance ---")?;
        return writeln!(out, "Not enough games per item yet.");
    }

    writeln!(out, "--- Best Items by Average Placement ---")?;
    write!(
        out,
        "{}",
        render_equipment_table(&ranking::best_by_average(shown, BEST_CHART_SIZE), field_size)
    )?;
    writeln!(out)?;

    writeln!(out, "--- Best Performers ---")?;
    let best = ranking::best_performers(shown);
    if best.is_empty() {
        writeln!(out, "None yet.")?;
    } else {
        write!(out, "{}", render_equipment_table(&best, field_size))?;
    }
    writeln!(out)?;

    writeln!(out, "--- Needs Work ---")?;
    let problems = ranking::problem_equipment(shown);
    if problems.is_empty() {
        writeln!(out, "Nothing stands out.")?;
    } else {
        write!(out, "{}", render_equipment_table(&problems, field_size))?;
    }
    writeln!(out)?;

    writeln!(out, "--- Most Used ---")?;
    write!(
        out,
        "{}",
        render_equipment_table(&ranking::most_used(shown, MOST_USED_SIZE), field_size)
    )
}

fn write_report(out: &mut String, analysis: &Analysis, ctx: &ReportContext<'_>) -> fmt::Result {
    let field_size = ctx.field_size;
    let summary = &analysis.summary;

    writeln!(out, "=== Match Insights ===")?;
    writeln!(
        out,
        "Source: {} | Mode: {} | Matches: {}",
        ctx.source, ctx.mode, summary.matches
    )?;
    writeln!(out)?;

    write_metrics(out, summary, field_size)?;
    writeln!(out)?;

    write_takeaways(out, analysis, field_size)?;
    writeln!(out)?;

    if !analysis.insights.is_empty() {
        writeln!(out, "--- Insights ---")?;
        for insight in &analysis.insights {
            writeln!(out, "{}", render_insight(insight, field_size))?;
        }
        writeln!(out)?;
    }

    writeln!(out, "--- Recent Results ---")?;
    writeln!(out, "{}", render_recent_grid(&analysis.trend, field_size))?;
    writeln!(out, "{}", results_legend(field_size))?;
    writeln!(out)?;

    writeln!(out, "--- By Level ---")?;
    for (level, stat) in &summary.by_level {
        writeln!(
            out,
            "Level {:>2}: {:>3} games, {:.2} avg placement",
            level, stat.sample_count, stat.average_placement
        )?;
    }
    writeln!(out)?;

    write_equipment_sections(out, analysis, field_size)?;
    writeln!(out)?;

    writeln!(out, "--- Synergies ---")?;
    match &analysis.synergies {
        Outcome::Ready(stats) => write!(out, "{}", render_synergy_table(stats, field_size)),
        Outcome::Empty(reason) => writeln!(out, "{}", render_empty(*reason, ctx.mode)),
    }
}

/// Key for the recent-results grid.
fn results_legend(field_size: u32) -> String {
    let top = top_half_cutoff(field_size);
    format!(
        "🥇🥈🥉🔵 = Top {} • 🔴 = Bottom {}",
        top,
        field_size.saturating_sub(top)
    )
}

/// Render the full dashboard.
pub fn render_report(analysis: &Analysis, ctx: &ReportContext<'_>) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_report(&mut out, analysis, ctx);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculate::{analyze, InsightPolicy, StatsParams};
    use crate::models::{EquipmentRef, GameMode};
    use crate::storage::sample_matches;

    #[test]
    fn test_render_empty_messages() {
        assert_eq!(
            render_empty(
                EmptyReason::NoMatchesForFilter,
                GameModeFilter::Only(GameMode::DoubleUp)
            ),
            "No Double Up games found in your data!"
        );
        assert_eq!(
            render_empty(EmptyReason::NoMatchesForFilter, GameModeFilter::All),
            "No games found in your data!"
        );
    }

    #[test]
    fn test_render_underperforming_insight() {
        let insight = Insight::warning(InsightDetail::UnderperformingEquipment {
            equipment: EquipmentRef {
                name: "GuinsoosRageblade".to_string(),
                sample_count: 13,
                average_placement: 4.384,
                top_half_rate: 46.15,
            },
            alternative: Some(EquipmentRef {
                name: "SpearOfShojin".to_string(),
                sample_count: 10,
                average_placement: 3.0,
                top_half_rate: 90.0,
            }),
        });

        assert_eq!(
            render_insight(&insight, 8),
            "[!] Stop forcing Guinsoos Rageblade! Guinsoos Rageblade has poor performance (4.38 avg placement, 46% top 4). Focus on Spear Of Shojin instead (3.00 avg placement, 90% top 4)!"
        );
    }

    #[test]
    fn test_render_takeaway_lines() {
        assert_eq!(
            render_strength(&Strength::SolidTopHalfRate(66.6), 8),
            "67% Top 4 rate is solid for climbing"
        );
        assert_eq!(
            render_improvement(&Improvement::PushHigherLevel { level: 7 }, 8),
            "Push for level 8 more often"
        );
        assert_eq!(
            render_improvement(
                &Improvement::ReduceEquipment {
                    name: "BlueBuff".to_string()
                },
                8
            ),
            "Reduce Blue Buff usage"
        );
    }

    #[test]
    fn test_recent_grid_rows_of_five() {
        let trend: Vec<ranking::TrendPoint> = [1, 2, 3, 4, 5, 6, 7]
            .iter()
            .enumerate()
            .map(|(game, &placement)| ranking::TrendPoint { game, placement })
            .collect();

        assert_eq!(
            render_recent_grid(&trend, 8),
            "🥇 🥈 🥉 🔵 🔴\n🔴 🔴"
        );
    }

    #[test]
    fn test_results_legend() {
        assert_eq!(results_legend(8), "🥇🥈🥉🔵 = Top 4 • 🔴 = Bottom 4");
        assert_eq!(results_legend(7), "🥇🥈🥉🔵 = Top 4 • 🔴 = Bottom 3");
        assert_eq!(results_legend(1), "🥇🥈🥉🔵 = Top 1 • 🔴 = Bottom 0");
        assert_eq!(results_legend(0), "🥇🥈🥉🔵 = Top 1 • 🔴 = Bottom 0");
    }

    #[test]
    fn test_render_report_with_zero_field_size() {
        let matches = sample_matches();
        let analysis = analyze(&matches, &StatsParams::default(), &InsightPolicy::default())
            .into_option()
            .unwrap();
        let source = DataSource::Sample;
        let ctx = ReportContext {
            source: &source,
            mode: GameModeFilter::All,
            field_size: 0,
        };

        let report = render_report(&analysis, &ctx);
        assert!(report.contains("🔴 = Bottom 0"));
    }

    #[test]
    fn test_render_full_report_from_sample() {
        let matches = sample_matches();
        let analysis = analyze(&matches, &StatsParams::default(), &InsightPolicy::default())
            .into_option()
            .unwrap();
        let source = DataSource::Sample;
        let ctx = ReportContext {
            source: &source,
            mode: GameModeFilter::All,
            field_size: 8,
        };

        let report = render_report(&analysis, &ctx);
        assert!(report.starts_with("=== Match Insights ==="));
        assert!(report.contains("Source: built-in sample | Mode: All | Matches: 20"));
        assert!(report.contains("--- Key Takeaways ---"));
        assert!(report.contains("--- Most Used ---"));
        assert!(report.contains("Infinity Edge"));
        assert!(report.contains("--- Synergies ---"));
    }

    #[test]
    fn test_equipment_table_columns() {
        let matches = sample_matches();
        let analysis = analyze(&matches, &StatsParams::default(), &InsightPolicy::default())
            .into_option()
            .unwrap();

        let table = render_equipment_table(&ranking::most_used(&analysis.equipment, 1), 8);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("Top 4"));
        assert!(lines[0].contains("Top 2"));
        assert!(lines[1].contains("Infinity Edge"));
    }
}
