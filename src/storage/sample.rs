//! Built-in sample history.
//!
//! Used whenever the configured match file is missing or unreadable, so the
//! report always has something to show.

use crate::models::{GameMode, MatchRecord};

fn sample(
    placement: u32,
    level: u32,
    gold_left: u32,
    damage: u32,
    items: [&str; 2],
    traits: [&str; 2],
) -> MatchRecord {
    MatchRecord::new(placement, level)
        .with_economy(gold_left, damage)
        .with_equipment(items)
        .with_synergies(traits)
}

/// Twenty matches, newest first. The last one is a Double Up game.
pub fn sample_matches() -> Vec<MatchRecord> {
    vec![
        sample(6, 8, 7, 47, ["InfinityEdge", "GuinsoosRageblade"], ["Vanguard", "BoomBots"]),
        sample(3, 7, 0, 122, ["SpearOfShojin", "Morellonomicon"], ["Syndicate", "Slayer"]),
        sample(7, 7, 0, 63, ["BlueBuff", "GuinsoosRageblade"], ["Cypher", "Bastion"]),
        sample(6, 7, 5, 89, ["GargoyleStoneplate", "GuinsoosRageblade"], ["Vanguard", "Bruiser"]),
        sample(4, 8, 1, 119, ["InfinityEdge", "RedBuff"], ["Exotech", "Bastion"]),
        sample(4, 8, 1, 61, ["BrambleVest", "SpearOfShojin"], ["Nitro", "Dynamo"]),
        sample(4, 9, 0, 60, ["WarmogsArmor", "HextechGunblade"], ["AnimaSquad", "Vanguard"]),
        sample(1, 8, 15, 170, ["ThiefsGloves", "GuinsoosRageblade"], ["GodoftheNet", "AnimaSquad"]),
        sample(7, 7, 4, 29, ["WarmogsArmor", "ArchangelsStaff"], ["StreetDemon", "Techie"]),
        sample(1, 8, 2, 141, ["InfinityEdge", "GargoyleStoneplate"], ["GodoftheNet", "BoomBots"]),
        sample(4, 9, 0, 80, ["InfinityEdge", "Bloodthirster"], ["Syndicate", "Vanguard"]),
        sample(7, 7, 1, 0, ["ArchangelsStaff", "GuinsoosRageblade"], ["Cypher", "Bastion"]),
        sample(2, 8, 10, 177, ["Morellonomicon", "ThiefsGloves"], ["Exotech", "Bastion"]),
        sample(6, 8, 6, 80, ["BlueBuff", "WarmogsArmor"], ["Exotech", "Bastion"]),
        sample(3, 9, 0, 112, ["DragonsClaw", "GargoyleStoneplate"], ["AnimaSquad", "Vanguard"]),
        sample(4, 8, 1, 32, ["ZekesHerald", "InfinityEdge"], ["GodoftheNet", "Cypher"]),
        sample(6, 8, 0, 95, ["BrambleVest", "RunaansHurricane"], ["AnimaSquad", "Exotech"]),
        sample(3, 9, 1, 152, ["WarmogsArmor", "InfinityEdge"], ["SoulKiller", "GoldenOx"]),
        sample(3, 8, 0, 137, ["WarmogsArmor", "GargoyleStoneplate"], ["GodoftheNet", "StreetDemon"]),
        sample(1, 9, 7, 201, ["ThiefsGloves", "LastWhisper"], ["GodoftheNet", "StreetDemon"])
            .with_mode(GameMode::DoubleUp),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DEFAULT_FIELD_SIZE;

    #[test]
    fn test_sample_shape() {
        let matches = sample_matches();
        assert_eq!(matches.len(), 20);
        assert!(matches
            .iter()
            .all(|m| m.has_valid_placement(DEFAULT_FIELD_SIZE)));
        assert_eq!(
            matches
                .iter()
                .filter(|m| m.game_mode == GameMode::DoubleUp)
                .count(),
            1
        );
    }

    #[test]
    fn test_sample_is_deterministic() {
        assert_eq!(sample_matches(), sample_matches());
    }
}
