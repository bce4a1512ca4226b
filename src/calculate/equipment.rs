//! Equipment performance aggregation.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;
use tracing::trace;

use super::StatsParams;
use crate::models::{top_half_cutoff, AggregateStat, MatchRecord, StatAccumulator};

fn vendor_prefix() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // TFT_Item_X, TFT4_Item_OrnnX, TFT14_X
    RE.get_or_init(|| Regex::new(r"^TFT\d*_(?:Item_)?(?:Ornn)?").expect("valid prefix pattern"))
}

/// Strip exporter prefixes from an equipment id.
///
/// Returns `None` when nothing usable remains.
pub fn normalize_equipment_id(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let stripped = vendor_prefix().replace(trimmed, "");
    let name = stripped.trim();

    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

/// Aggregate placements per equipment id.
///
/// Every occurrence counts: a match carrying the same item twice contributes
/// two samples. Ids that never appear are absent from the result.
pub fn aggregate_equipment<'a, I>(matches: I, params: &StatsParams) -> HashMap<String, AggregateStat>
where
    I: IntoIterator<Item = &'a MatchRecord>,
{
    let cutoff = top_half_cutoff(params.field_size);
    let mut accumulators: HashMap<String, StatAccumulator> = HashMap::new();

    for record in matches {
        for raw in &record.equipment {
            let Some(name) = normalize_equipment_id(raw) else {
                trace!("Dropping unrecognized equipment id {:?}", raw);
                continue;
            };
            accumulators
                .entry(name)
                .or_default()
                .record(record.placement, cutoff);
        }
    }

    accumulators
        .into_iter()
        .filter_map(|(name, acc)| acc.finish().map(|stat| (name, stat)))
        .collect()
}
