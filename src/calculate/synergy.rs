//! Synergy token normalization and synergy-group aggregation.
//!
//! Exported synergy tokens come in four shapes:
//!
//! | Shape                         | Example           | Group      | Tier |
//! |-------------------------------|-------------------|------------|------|
//! | `<namespace>_<group>_<tier>`  | `TFT14_Vanguard_3`| `Vanguard` | 3    |
//! | `<namespace>_<group>`         | `TFT14_Vanguard`  | `Vanguard` | 1    |
//! | `<group>_<tier>`              | `Vanguard_2`      | `Vanguard` | 2    |
//! | `<group>`                     | `Vanguard`        | `Vanguard` | 1    |
//!
//! Non-numeric tiers fall back to 1. Tokens that resolve to a namespace
//! marker or to a name shorter than three characters are dropped.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::trace;

use super::StatsParams;
use crate::models::{
    top_half_cutoff, AggregateStat, EmptyReason, MatchRecord, Outcome, StatAccumulator,
    SynergyToken, TokenEncoding,
};

const SEPARATOR: char = '_';
const DEFAULT_TIER: u32 = 1;
const MIN_NAME_LEN: usize = 3;

fn default_marker_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(?:TFT\d*|Set\d+)$").expect("valid marker pattern"))
}

/// Which synergy tokens of a match are counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SynergyScope {
    /// Every valid token in the match
    #[default]
    All,
    /// Only the first valid token (the match's main synergy)
    Primary,
}

impl std::str::FromStr for SynergyScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(SynergyScope::All),
            "primary" | "main" => Ok(SynergyScope::Primary),
            other => Err(format!("unknown synergy scope '{}'", other)),
        }
    }
}

/// Normalizes raw synergy tokens.
#[derive(Debug, Clone)]
pub struct SynergyParser {
    markers: Vec<String>,
    use_default_pattern: bool,
}

impl Default for SynergyParser {
    /// Recognizes `TFT`, `TFT<n>` and `Set<n>` namespaces.
    fn default() -> Self {
        Self {
            markers: Vec::new(),
            use_default_pattern: true,
        }
    }
}

impl SynergyParser {
    /// Parser recognizing exactly the given namespace markers.
    pub fn with_markers<I, S>(markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            markers: markers.into_iter().map(Into::into).collect(),
            use_default_pattern: false,
        }
    }

    /// Add markers on top of the current rules.
    pub fn extend_markers<I, S>(mut self, markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.markers.extend(markers.into_iter().map(Into::into));
        self
    }

    pub fn is_marker(&self, segment: &str) -> bool {
        self.markers.iter().any(|m| m == segment)
            || (self.use_default_pattern && default_marker_pattern().is_match(segment))
    }

    /// Normalize one raw token. `None` means the token is unusable.
    pub fn parse(&self, raw: &str) -> Option<SynergyToken> {
        let token = raw.trim();
        if token.is_empty() {
            return None;
        }

        let segments: Vec<&str> = token.split(SEPARATOR).collect();

        let (name, tier, encoding) = if segments.len() >= 3 && self.is_marker(segments[0]) {
            (segments[1], Some(segments[2]), TokenEncoding::NamespacedWithTier)
        } else if segments.len() == 2 && self.is_marker(segments[0]) {
            (segments[1], None, TokenEncoding::NamespacedBare)
        } else if segments.len() >= 2 {
            (segments[0], Some(segments[1]), TokenEncoding::PlainWithTier)
        } else {
            (token, None, TokenEncoding::Bare)
        };

        let name = name.trim();
        if self.is_marker(name) || name.chars().count() < MIN_NAME_LEN {
            return None;
        }

        let tier = tier
            .and_then(|t| t.trim().parse::<u32>().ok())
            .unwrap_or(DEFAULT_TIER);

        Some(SynergyToken {
            name: name.to_string(),
            tier,
            encoding,
        })
    }

    /// Normalize every token of a match, dropping unusable ones.
    pub fn parse_all<'a>(&'a self, raw: &'a [String]) -> impl Iterator<Item = SynergyToken> + 'a {
        raw.iter().filter_map(move |t| {
            let parsed = self.parse(t);
            if parsed.is_none() {
                trace!("Dropping unrecognized synergy token {:?}", t);
            }
            parsed
        })
    }
}

/// Aggregate placements per synergy group.
///
/// Groups below `params.min_synergy_games` are left out. When nothing usable
/// remains the result is `Outcome::Empty(EmptyReason::NoSynergyData)`.
pub fn aggregate_synergies<'a, I>(
    matches: I,
    params: &StatsParams,
) -> Outcome<HashMap<String, AggregateStat>>
where
    I: IntoIterator<Item = &'a MatchRecord>,
{
    let cutoff = top_half_cutoff(params.field_size);
    let parser = &params.synergy_parser;
    let mut accumulators: HashMap<String, StatAccumulator> = HashMap::new();

    for record in matches {
        let tokens = parser.parse_all(&record.synergies);
        let counted: Vec<SynergyToken> = match params.synergy_scope {
            SynergyScope::All => tokens.collect(),
            SynergyScope::Primary => tokens.take(1).collect(),
        };

        for token in counted {
            accumulators
                .entry(token.name)
                .or_default()
                .record(record.placement, cutoff);
        }
    }

    let min_games = params.min_synergy_games.unwrap_or(0);
    let stats: HashMap<String, AggregateStat> = accumulators
        .into_iter()
        .filter(|(_, acc)| acc.sample_count() >= min_games)
        .filter_map(|(name, acc)| acc.finish().map(|stat| (name, stat)))
        .collect();

    if stats.is_empty() {
        Outcome::Empty(EmptyReason::NoSynergyData)
    } else {
        Outcome::Ready(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculate::test_support::record;
    use crate::storage::sample_matches;

    fn ns_parser() -> SynergyParser {
        SynergyParser::with_markers(["NS"])
    }

    #[test]
    fn test_parse_namespaced_with_tier() {
        let token = ns_parser().parse("NS_Vanguard_3").unwrap();
        assert_eq!(token.name, "Vanguard");
        assert_eq!(token.tier, 3);
        assert_eq!(token.encoding, TokenEncoding::NamespacedWithTier);
    }

    #[test]
    fn test_parse_bare() {
        let token = ns_parser().parse("Vanguard").unwrap();
        assert_eq!(token.name, "Vanguard");
        assert_eq!(token.tier, 1);
        assert_eq!(token.encoding, TokenEncoding::Bare);
    }

    #[test]
    fn test_bare_marker_is_discarded() {
        assert_eq!(ns_parser().parse("NS"), None);
        assert_eq!(SynergyParser::default().parse("TFT14"), None);
    }

    #[test]
    fn test_parse_plain_with_tier() {
        let token = ns_parser().parse("Bastion_2").unwrap();
        assert_eq!(token.name, "Bastion");
        assert_eq!(token.tier, 2);
        assert_eq!(token.encoding, TokenEncoding::PlainWithTier);
    }

    #[test]
    fn test_non_numeric_tier_defaults_to_one() {
        let token = ns_parser().parse("NS_Vanguard_gold").unwrap();
        assert_eq!(token.name, "Vanguard");
        assert_eq!(token.tier, 1);

        let token = ns_parser().parse("Cypher_x").unwrap();
        assert_eq!(token.tier, 1);
    }

    #[test]
    fn test_three_segments_without_marker_use_first_segment() {
        let token = ns_parser().parse("Anima_Squad_2").unwrap();
        assert_eq!(token.name, "Anima");
        assert_eq!(token.tier, 1);
        assert_eq!(token.encoding, TokenEncoding::PlainWithTier);
    }

    #[test]
    fn test_short_names_are_discarded() {
        assert_eq!(ns_parser().parse("AB"), None);
        assert_eq!(ns_parser().parse("NS_AB_2"), None);
        assert_eq!(ns_parser().parse("_2"), None);
        assert_eq!(ns_parser().parse(""), None);
    }

    #[test]
    fn test_parse_namespaced_bare() {
        let token = ns_parser().parse("NS_Vanguard").unwrap();
        assert_eq!(token.name, "Vanguard");
        assert_eq!(token.tier, 1);
        assert_eq!(token.encoding, TokenEncoding::NamespacedBare);

        let token = SynergyParser::default().parse("TFT14_StreetDemon").unwrap();
        assert_eq!(token.name, "StreetDemon");
        assert_eq!(token.encoding, TokenEncoding::NamespacedBare);
    }

    #[test]
    fn test_namespaced_bare_still_drops_markers_and_short_names() {
        assert_eq!(SynergyParser::default().parse("TFT_TFT14"), None);
        assert_eq!(ns_parser().parse("NS_AB"), None);
        assert_eq!(ns_parser().parse("NS_"), None);
    }

    #[test]
    fn test_default_markers() {
        let parser = SynergyParser::default();
        assert!(parser.is_marker("TFT"));
        assert!(parser.is_marker("TFT14"));
        assert!(parser.is_marker("Set13"));
        assert!(!parser.is_marker("Vanguard"));

        let token = parser.parse("TFT14_StreetDemon_5").unwrap();
        assert_eq!(token.name, "StreetDemon");
        assert_eq!(token.tier, 5);
    }

    #[test]
    fn test_extend_markers_keeps_default_pattern() {
        let parser = SynergyParser::default().extend_markers(["Event"]);
        assert!(parser.is_marker("TFT9"));
        assert!(parser.is_marker("Event"));
        assert_eq!(parser.parse("Event_Bruiser_2").unwrap().name, "Bruiser");
    }

    #[test]
    fn test_aggregate_all_tokens() {
        let matches = vec![
            record(1, 8, &[], &["TFT14_Vanguard_2", "Bastion"]),
            record(5, 8, &[], &["Vanguard_4"]),
            record(3, 8, &[], &["TFT14"]),
        ];

        let params = StatsParams {
            min_synergy_games: None,
            ..Default::default()
        };
        let stats = aggregate_synergies(&matches, &params).into_option().unwrap();

        assert_eq!(stats.len(), 2);
        assert_eq!(stats["Vanguard"].sample_count, 2);
        assert_eq!(stats["Vanguard"].average_placement, 3.0);
        assert_eq!(stats["Vanguard"].top_half_rate, 50.0);
        assert_eq!(stats["Bastion"].sample_count, 1);
    }

    #[test]
    fn test_aggregate_namespaced_bare_tokens() {
        let matches = vec![
            record(2, 8, &[], &["TFT14_Vanguard", "TFT14_StreetDemon"]),
            record(4, 8, &[], &["TFT14_Vanguard_2"]),
        ];

        let params = StatsParams {
            min_synergy_games: None,
            ..Default::default()
        };
        let stats = aggregate_synergies(&matches, &params).into_option().unwrap();

        assert_eq!(stats.len(), 2);
        assert_eq!(stats["Vanguard"].sample_count, 2);
        assert_eq!(stats["Vanguard"].average_placement, 3.0);
        assert_eq!(stats["StreetDemon"].placements, vec![2]);
    }

    #[test]
    fn test_aggregate_primary_scope() {
        let matches = vec![
            record(2, 8, &[], &["TFT", "Slayer_2", "Syndicate_3"]),
            record(6, 8, &[], &["Syndicate_1"]),
        ];

        let params = StatsParams {
            min_synergy_games: None,
            synergy_scope: SynergyScope::Primary,
            ..Default::default()
        };
        let stats = aggregate_synergies(&matches, &params).into_option().unwrap();

        assert_eq!(stats["Slayer"].sample_count, 1);
        assert_eq!(stats["Syndicate"].sample_count, 1);
        assert_eq!(stats["Syndicate"].placements, vec![6]);
    }

    #[test]
    fn test_aggregate_threshold() {
        let matches = vec![
            record(1, 8, &[], &["Vanguard"]),
            record(2, 8, &[], &["Vanguard", "Cypher"]),
        ];

        let params = StatsParams {
            min_synergy_games: Some(2),
            ..Default::default()
        };
        let stats = aggregate_synergies(&matches, &params).into_option().unwrap();
        assert!(stats.contains_key("Vanguard"));
        assert!(!stats.contains_key("Cypher"));
    }

    #[test]
    fn test_synergy_threshold_is_monotonic() {
        let matches = sample_matches();
        let groups_at = |min: u32| -> HashMap<String, AggregateStat> {
            let params = StatsParams {
                min_synergy_games: Some(min),
                ..Default::default()
            };
            aggregate_synergies(&matches, &params)
                .into_option()
                .unwrap_or_default()
        };

        let mut previous = groups_at(0);
        assert!(!previous.is_empty());
        for min in 1..=8 {
            let current = groups_at(min);
            for (name, stat) in &current {
                assert!(stat.sample_count >= min, "{} below threshold {}", name, min);
                assert_eq!(previous.get(name), Some(stat), "{} appeared at {}", name, min);
            }
            previous = current;
        }
        assert!(groups_at(u32::MAX).is_empty());
    }

    #[test]
    fn test_aggregate_without_valid_tokens_is_empty() {
        let matches = vec![
            record(1, 8, &["Edge"], &[]),
            record(2, 8, &[], &["NS", "AB"]),
        ];

        let params = StatsParams {
            min_synergy_games: None,
            synergy_parser: ns_parser(),
            ..Default::default()
        };
        assert_eq!(
            aggregate_synergies(&matches, &params),
            Outcome::Empty(EmptyReason::NoSynergyData)
        );
    }

    #[test]
    fn test_threshold_removing_everything_is_empty() {
        let matches = vec![record(1, 8, &[], &["Vanguard"])];
        let params = StatsParams {
            min_synergy_games: Some(5),
            ..Default::default()
        };
        assert!(aggregate_synergies(&matches, &params).is_empty());
    }

    #[test]
    fn test_scope_parse() {
        assert_eq!("primary".parse::<SynergyScope>(), Ok(SynergyScope::Primary));
        assert_eq!("ALL".parse::<SynergyScope>(), Ok(SynergyScope::All));
        assert!("some".parse::<SynergyScope>().is_err());
    }
}
