//! Insight and takeaway generation.
//!
//! Both are ordered threshold checks over already computed stats. Each
//! category yields at most one insight; the first matching rule wins.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::models::{
    AggregateStat, EquipmentRef, Improvement, Insight, InsightDetail, MatchSummary, Strength,
    Takeaways,
};

/// Thresholds used by the insight and takeaway rules.
#[derive(Debug, Clone, PartialEq)]
pub struct InsightPolicy {
    /// Samples needed before an item counts as frequently used
    pub frequent_equipment_games: u32,
    /// Average placement above which a frequent item is flagged
    pub underperforming_average: f64,

    /// Overall insights need at least this many matches
    pub min_matches_for_overall: u32,
    pub strong_average: f64,
    pub consistent_top_half_rate: f64,
    pub fundamentals_average: f64,

    pub solid_top_half_rate: f64,
    pub good_average_level: f64,
    pub strong_top_quarter_rate: f64,

    pub economy_average: f64,
    pub top_half_floor: f64,
    pub level_floor: f64,
    pub struggle_level: u32,
    /// A struggle level is reported when it has more games than this
    pub struggle_min_games: u32,
    pub struggle_average: f64,

    pub max_takeaways: usize,
}

impl Default for InsightPolicy {
    fn default() -> Self {
        Self {
            frequent_equipment_games: 5,
            underperforming_average: 4.2,
            min_matches_for_overall: 11,
            strong_average: 3.5,
            consistent_top_half_rate: 70.0,
            fundamentals_average: 4.5,
            solid_top_half_rate: 65.0,
            good_average_level: 8.0,
            strong_top_quarter_rate: 20.0,
            economy_average: 4.5,
            top_half_floor: 60.0,
            level_floor: 8.0,
            struggle_level: 7,
            struggle_min_games: 3,
            struggle_average: 5.0,
            max_takeaways: 4,
        }
    }
}

fn by_average_then_name(a: &(&String, &AggregateStat), b: &(&String, &AggregateStat)) -> Ordering {
    a.1.average_placement
        .partial_cmp(&b.1.average_placement)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.0.cmp(b.0))
}

/// Best and worst frequently used items, in that order.
fn frequent_extremes<'a>(
    equipment: &'a HashMap<String, AggregateStat>,
    min_games: u32,
) -> Option<((&'a String, &'a AggregateStat), (&'a String, &'a AggregateStat))> {
    let mut frequent: Vec<(&String, &AggregateStat)> = equipment
        .iter()
        .filter(|(_, s)| s.sample_count >= min_games)
        .collect();
    if frequent.is_empty() {
        return None;
    }

    frequent.sort_by(by_average_then_name);
    let best = frequent[0];
    // Highest average; ties go to the alphabetically first name.
    let worst_avg = frequent[frequent.len() - 1].1.average_placement;
    let worst = frequent
        .iter()
        .copied()
        .find(|(_, s)| s.average_placement == worst_avg)
        .unwrap_or(frequent[frequent.len() - 1]);

    Some((best, worst))
}

fn equipment_ref(name: &str, stat: &AggregateStat) -> EquipmentRef {
    EquipmentRef {
        name: name.to_string(),
        sample_count: stat.sample_count,
        average_placement: stat.average_placement,
        top_half_rate: stat.top_half_rate,
    }
}

/// Evaluate the insight rules.
pub fn generate_insights(
    summary: &MatchSummary,
    equipment: &HashMap<String, AggregateStat>,
    policy: &InsightPolicy,
) -> Vec<Insight> {
    let mut insights = Vec::new();

    if let Some(((best_name, best), (worst_name, worst))) =
        frequent_extremes(equipment, policy.frequent_equipment_games)
    {
        if worst.average_placement > policy.underperforming_average {
            let alternative = (best_name != worst_name).then(|| equipment_ref(best_name, best));
            insights.push(Insight::warning(InsightDetail::UnderperformingEquipment {
                equipment: equipment_ref(worst_name, worst),
                alternative,
            }));
        }
    }

    if summary.matches >= policy.min_matches_for_overall {
        let overall = if summary.average_placement <= policy.strong_average {
            Some(Insight::success(InsightDetail::StrongPerformance {
                average_placement: summary.average_placement,
                top_half_rate: summary.top_half_rate,
            }))
        } else if summary.top_half_rate >= policy.consistent_top_half_rate {
            Some(Insight::success(InsightDetail::TopHalfConsistency {
                top_half_rate: summary.top_half_rate,
            }))
        } else if summary.average_placement > policy.fundamentals_average {
            Some(Insight::warning(InsightDetail::FocusOnFundamentals {
                average_placement: summary.average_placement,
            }))
        } else {
            None
        };
        insights.extend(overall);
    }

    insights
}

/// Evaluate the strengths and improvements rules.
///
/// `equipment` should already be restricted to the items the player wants
/// shown (minimum-games threshold applied).
pub fn generate_takeaways(
    summary: &MatchSummary,
    equipment: &HashMap<String, AggregateStat>,
    policy: &InsightPolicy,
) -> Takeaways {
    let mut strengths = Vec::new();
    if summary.top_half_rate >= policy.solid_top_half_rate {
        strengths.push(Strength::SolidTopHalfRate(summary.top_half_rate));
    }
    if summary.average_level >= policy.good_average_level {
        strengths.push(Strength::GoodLevelManagement(summary.average_level));
    }
    if summary.top_quarter_rate >= policy.strong_top_quarter_rate {
        strengths.push(Strength::StrongTopQuarterRate(summary.top_quarter_rate));
    }

    let mut improvements = Vec::new();
    let flagged: HashMap<String, AggregateStat> = equipment
        .iter()
        .filter(|(_, s)| s.average_placement > policy.underperforming_average)
        .map(|(k, s)| (k.clone(), s.clone()))
        .collect();
    if let Some((_, (worst_name, _))) = frequent_extremes(&flagged, policy.frequent_equipment_games) {
        improvements.push(Improvement::ReduceEquipment {
            name: worst_name.clone(),
        });
    }
    if summary.average_placement > policy.economy_average {
        improvements.push(Improvement::EarlyGameEconomy);
    }
    if summary.top_half_rate < policy.top_half_floor {
        improvements.push(Improvement::TopHalfConsistency);
    }
    if summary.average_level < policy.level_floor {
        improvements.push(Improvement::LevelTiming);
    }
    if let Some(level) = summary.level(policy.struggle_level) {
        if level.sample_count > policy.struggle_min_games
            && level.average_placement > policy.struggle_average
        {
            improvements.push(Improvement::PushHigherLevel {
                level: policy.struggle_level,
            });
        }
    }

    strengths.truncate(policy.max_takeaways);
    improvements.truncate(policy.max_takeaways);

    Takeaways {
        strengths,
        improvements,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{InsightKind, LevelStat, StatAccumulator};
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    fn stat(placements: &[u32]) -> AggregateStat {
        let mut acc = StatAccumulator::default();
        for &p in placements {
            acc.record(p, 4);
        }
        acc.finish().unwrap()
    }

    fn summary(matches: u32, average_placement: f64, top_half_rate: f64) -> MatchSummary {
        MatchSummary {
            matches,
            average_placement,
            top_half_rate,
            top_quarter_rate: 10.0,
            win_rate: 5.0,
            average_level: 8.0,
            average_damage: 90.0,
            average_gold_left: 2.0,
            by_level: BTreeMap::new(),
        }
    }

    fn equipment(entries: &[(&str, &[u32])]) -> HashMap<String, AggregateStat> {
        entries
            .iter()
            .map(|(name, placements)| (name.to_string(), stat(placements)))
            .collect()
    }

    #[test]
    fn test_underperforming_equipment_names_best_alternative() {
        let items = equipment(&[
            ("GuinsoosRageblade", &[6, 7, 6, 1, 7]),
            ("SpearOfShojin", &[3, 4, 2, 3, 3]),
            ("RedBuff", &[8]),
        ]);

        let insights = generate_insights(&summary(5, 4.0, 50.0), &items, &InsightPolicy::default());
        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].kind, InsightKind::Warning);

        match &insights[0].detail {
            InsightDetail::UnderperformingEquipment {
                equipment,
                alternative,
            } => {
                assert_eq!(equipment.name, "GuinsoosRageblade");
                assert_eq!(equipment.average_placement, 5.4);
                assert_eq!(alternative.as_ref().unwrap().name, "SpearOfShojin");
            }
            other => panic!("unexpected insight {:?}", other),
        }
    }

    #[test]
    fn test_no_equipment_warning_when_worst_is_fine() {
        let items = equipment(&[("SpearOfShojin", &[3, 4, 2, 3, 3])]);
        let insights = generate_insights(&summary(5, 4.0, 50.0), &items, &InsightPolicy::default());
        assert!(insights.is_empty());
    }

    #[test]
    fn test_single_frequent_item_has_no_alternative() {
        let items = equipment(&[("BlueBuff", &[6, 6, 6, 6, 6])]);
        let insights = generate_insights(&summary(5, 6.0, 0.0), &items, &InsightPolicy::default());

        assert_eq!(
            insights[0].detail,
            InsightDetail::UnderperformingEquipment {
                equipment: EquipmentRef {
                    name: "BlueBuff".to_string(),
                    sample_count: 5,
                    average_placement: 6.0,
                    top_half_rate: 0.0,
                },
                alternative: None,
            }
        );
    }

    #[test]
    fn test_overall_rules_first_match_wins() {
        let policy = InsightPolicy::default();
        let none = HashMap::new();

        let strong = generate_insights(&summary(12, 3.2, 80.0), &none, &policy);
        assert_eq!(strong.len(), 1);
        assert!(matches!(
            strong[0].detail,
            InsightDetail::StrongPerformance { .. }
        ));

        let consistent = generate_insights(&summary(12, 3.9, 75.0), &none, &policy);
        assert!(matches!(
            consistent[0].detail,
            InsightDetail::TopHalfConsistency { .. }
        ));
        assert_eq!(consistent[0].kind, InsightKind::Success);

        let weak = generate_insights(&summary(12, 4.8, 40.0), &none, &policy);
        assert_eq!(weak[0].kind, InsightKind::Warning);

        let middling = generate_insights(&summary(12, 4.2, 55.0), &none, &policy);
        assert!(middling.is_empty());
    }

    #[test]
    fn test_overall_rules_need_enough_matches() {
        let insights = generate_insights(&summary(10, 2.0, 90.0), &HashMap::new(), &InsightPolicy::default());
        assert!(insights.is_empty());
    }

    #[test]
    fn test_takeaways_strengths() {
        let mut s = summary(20, 3.8, 70.0);
        s.top_quarter_rate = 25.0;
        s.average_level = 8.2;

        let takeaways = generate_takeaways(&s, &HashMap::new(), &InsightPolicy::default());
        assert_eq!(
            takeaways.strengths,
            vec![
                Strength::SolidTopHalfRate(70.0),
                Strength::GoodLevelManagement(8.2),
                Strength::StrongTopQuarterRate(25.0),
            ]
        );
        assert!(takeaways.improvements.is_empty());
    }

    #[test]
    fn test_takeaways_improvements_are_capped() {
        let mut s = summary(20, 5.1, 40.0);
        s.average_level = 7.4;
        s.by_level.insert(
            7,
            LevelStat {
                sample_count: 5,
                average_placement: 6.2,
            },
        );
        let items = equipment(&[("ArchangelsStaff", &[7, 7, 6, 5, 8])]);

        let takeaways = generate_takeaways(&s, &items, &InsightPolicy::default());
        assert!(takeaways.strengths.is_empty());
        assert_eq!(
            takeaways.improvements,
            vec![
                Improvement::ReduceEquipment {
                    name: "ArchangelsStaff".to_string()
                },
                Improvement::EarlyGameEconomy,
                Improvement::TopHalfConsistency,
                Improvement::LevelTiming,
            ]
        );
    }

    #[test]
    fn test_level_struggle_needs_more_than_three_games() {
        let mut s = summary(20, 4.0, 60.0);
        s.by_level.insert(
            7,
            LevelStat {
                sample_count: 3,
                average_placement: 7.0,
            },
        );
        let takeaways = generate_takeaways(&s, &HashMap::new(), &InsightPolicy::default());
        assert!(!takeaways
            .improvements
            .contains(&Improvement::PushHigherLevel { level: 7 }));

        s.by_level.get_mut(&7).unwrap().sample_count = 4;
        let takeaways = generate_takeaways(&s, &HashMap::new(), &InsightPolicy::default());
        assert_eq!(
            takeaways.improvements,
            vec![Improvement::PushHigherLevel { level: 7 }]
        );
    }
}
