//! Icon and emoji lookup for the report.

use crate::models::top_half_cutoff;

/// Item icon CDN root.
pub const ITEM_ICON_BASE_URL: &str = "https://ddragon.leagueoflegends.com/cdn/14.24.1/img/tft-item/";

/// Known items keyed by lowercase name without spaces or punctuation.
const ITEM_ICONS: &[(&str, &str)] = &[
    ("infinityedge", "TFT_Item_InfinityEdge.png"),
    ("guinsoosrageblade", "TFT_Item_GuinsoosRageblade.png"),
    ("spearofshojin", "TFT_Item_SpearOfShojin.png"),
    ("warmogsarmor", "TFT_Item_WarmogsArmor.png"),
    ("gargoylestoneplate", "TFT_Item_GargoyleStoneplate.png"),
    ("thiefsgloves", "TFT_Item_ThiefsGloves.png"),
    ("redbuff", "TFT_Item_RedBuff.png"),
    ("bluebuff", "TFT_Item_BlueBuff.png"),
    ("runaanshurricane", "TFT_Item_RunaansHurricane.png"),
    ("jeweledgauntlet", "TFT_Item_JeweledGauntlet.png"),
    ("morellonomicon", "TFT_Item_Morellonomicon.png"),
    ("dragonsclaw", "TFT_Item_DragonsClaw.png"),
    ("bramblevest", "TFT_Item_BrambleVest.png"),
    ("archangelsstaff", "TFT_Item_ArchangelsStaff.png"),
    ("hextechgunblade", "TFT_Item_HextechGunblade.png"),
    ("bloodthirster", "TFT_Item_Bloodthirster.png"),
    ("lastwhisper", "TFT_Item_LastWhisper.png"),
    ("ionicspark", "TFT_Item_IonicSpark.png"),
    ("quicksilver", "TFT_Item_Quicksilver.png"),
    ("zekesherald", "TFT_Item_ZekesHerald.png"),
    ("titansresolve", "TFT_Item_TitansResolve.png"),
    ("adaptivehelm", "TFT_Item_AdaptiveHelm.png"),
    ("statikkshiv", "TFT_Item_StatikkShiv.png"),
    ("rapidfirecannon", "TFT_Item_RapidFirecannon.png"),
    ("giantslayer", "TFT_Item_GiantSlayer.png"),
    ("deathblade", "TFT_Item_Deathblade.png"),
    ("rabadonsdeathcap", "TFT_Item_RabadonsDeathcap.png"),
    ("ludensecho", "TFT_Item_LudensEcho.png"),
    ("sunfirecape", "TFT_Item_SunfireCape.png"),
    ("thornmail", "TFT_Item_Thornmail.png"),
    ("frozenheart", "TFT_Item_FrozenHeart.png"),
    ("spiritvisage", "TFT_Item_SpiritVisage.png"),
    ("bansheesveil", "TFT_Item_BansheesVeil.png"),
    ("handofjustice", "TFT_Item_HandOfJustice.png"),
    ("forceofnature", "TFT_Item_ForceOfNature.png"),
    ("locketoftheironsolari", "TFT_Item_LocketOfTheIronSolari.png"),
    ("redemption", "TFT_Item_Redemption.png"),
    ("crownguard", "TFT_Item_Crownguard.png"),
    ("sterakskage", "TFT_Item_SteraksGage.png"),
    ("edgeofnight", "TFT_Item_EdgeOfNight.png"),
    ("spectralcutlass", "TFT_Item_SpectralCutlass.png"),
    ("unstableconcoction", "TFT_Item_UnstableConcoction.png"),
    ("nightharvester", "TFT_Item_NightHarvester.png"),
    ("leviathan", "TFT_Item_Leviathan.png"),
    ("spectralgauntlet", "TFT_Item_SpectralGauntlet.png"),
    ("powergauntlet", "TFT_Item_PowerGauntlet.png"),
    ("emptybag", "TFT_Item_EmptyBag.png"),
];

/// Keyword categories, checked in order.
const ITEM_CATEGORIES: &[(&[&str], &str)] = &[
    (&["buff"], "✨"),
    (&["glove", "gauntlet"], "🧤"),
    (&["staff", "shojin", "morello", "deathcap", "echo", "tome"], "🔮"),
    (
        &["armor", "vest", "plate", "mail", "cape", "heart", "visage", "veil", "helm", "guard"],
        "🛡️",
    ),
    (&["bow", "hurricane", "cannon", "shiv", "spark"], "🏹"),
];

const DEFAULT_ITEM_EMOJI: &str = "⚔️";

fn lookup_key(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, ' ' | '\'' | '-' | '_'))
        .collect::<String>()
        .to_lowercase()
}

/// Icon URL for an item, guessing the file name for unknown items.
pub fn equipment_icon_url(name: &str) -> String {
    let key = lookup_key(name);
    let filename = ITEM_ICONS
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, file)| (*file).to_string())
        .unwrap_or_else(|| format!("TFT_Item_{}.png", name.replace(' ', "")));

    format!("{}{}", ITEM_ICON_BASE_URL, filename)
}

/// Emoji for an item, by keyword category.
pub fn equipment_emoji(name: &str) -> &'static str {
    let key = lookup_key(name);
    ITEM_CATEGORIES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| key.contains(k)))
        .map(|(_, emoji)| *emoji)
        .unwrap_or(DEFAULT_ITEM_EMOJI)
}

/// Medal for podium finishes, blue for other top-half finishes, red otherwise.
pub fn placement_emoji(placement: u32, field_size: u32) -> &'static str {
    match placement {
        p if p > top_half_cutoff(field_size) => "🔴",
        1 => "🥇",
        2 => "🥈",
        3 => "🥉",
        _ => "🔵",
    }
}
