//! Human-readable names for equipment and synergy identifiers.

use std::sync::OnceLock;

use regex::Regex;

use crate::calculate::normalize_equipment_id;

fn camel_boundary() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"([a-z0-9])([A-Z])").expect("valid camel pattern"))
}

fn namespace_word() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(?:TFT\d*|Set\d+)\s+").expect("valid namespace pattern"))
}

fn split_camel(s: &str) -> String {
    camel_boundary().replace_all(s, "$1 $2").into_owned()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `TFT_Item_InfinityEdge` -> `Infinity Edge`.
pub fn display_equipment_name(id: &str) -> String {
    let name = normalize_equipment_id(id).unwrap_or_else(|| id.trim().to_string());
    split_camel(&name)
}

/// `TFT14_AnimaSquad` -> `Anima Squad`, `street_demon` -> `Street Demon`.
pub fn display_synergy_name(name: &str) -> String {
    let spaced = name.replace('_', " ");
    let stripped = namespace_word().replace(spaced.trim(), "");
    split_camel(&stripped)
        .split_whitespace()
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_equipment_name() {
        assert_eq!(display_equipment_name("TFT_Item_InfinityEdge"), "Infinity Edge");
        assert_eq!(display_equipment_name("SpearOfShojin"), "Spear Of Shojin");
        assert_eq!(display_equipment_name("BlueBuff"), "Blue Buff");
        assert_eq!(display_equipment_name("Bloodthirster"), "Bloodthirster");
    }

    #[test]
    fn test_display_equipment_name_keeps_unusable_ids() {
        assert_eq!(display_equipment_name("TFT_Item_"), "TFT_Item_");
    }

    #[test]
    fn test_display_synergy_name() {
        assert_eq!(display_synergy_name("TFT14_AnimaSquad"), "Anima Squad");
        assert_eq!(display_synergy_name("street_demon"), "Street Demon");
        assert_eq!(display_synergy_name("Vanguard"), "Vanguard");
        assert_eq!(display_synergy_name("Set13 Sniper"), "Sniper");
    }
}
