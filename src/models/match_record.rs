//! Completed match record model.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default number of players in a lobby.
pub const DEFAULT_FIELD_SIZE: u32 = 8;

/// Queue a match was played in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum GameMode {
    #[default]
    Solo,
    DoubleUp,
}

impl GameMode {
    /// All selectable modes, in display order.
    pub const ALL: [GameMode; 2] = [GameMode::Solo, GameMode::DoubleUp];

    pub fn label(&self) -> &'static str {
        match self {
            GameMode::Solo => "Solo",
            GameMode::DoubleUp => "Double Up",
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Lowercase alphanumerics only, so "Double Up", "double-up" and "DoubleUp" agree.
fn mode_key(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase()
}

impl FromStr for GameMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match mode_key(s).as_str() {
            "solo" | "ranked" => Ok(GameMode::Solo),
            "doubleup" | "duo" | "teamoftwo" => Ok(GameMode::DoubleUp),
            _ => Err(format!(
                "unknown game mode '{}' (expected solo or double-up)",
                s
            )),
        }
    }
}

impl TryFrom<String> for GameMode {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<GameMode> for String {
    fn from(mode: GameMode) -> Self {
        mode.label().to_string()
    }
}

/// Game mode filter applied before aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum GameModeFilter {
    #[default]
    All,
    Only(GameMode),
}

impl GameModeFilter {
    /// Check whether a mode passes this filter.
    pub fn matches(&self, mode: GameMode) -> bool {
        match self {
            GameModeFilter::All => true,
            GameModeFilter::Only(m) => *m == mode,
        }
    }
}

impl fmt::Display for GameModeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameModeFilter::All => write!(f, "All"),
            GameModeFilter::Only(mode) => write!(f, "{}", mode),
        }
    }
}

impl FromStr for GameModeFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match mode_key(s).as_str() {
            "all" | "" => Ok(GameModeFilter::All),
            _ => s.parse::<GameMode>().map(GameModeFilter::Only).map_err(|_| {
                format!(
                    "unknown game mode '{}' (expected all, solo or double-up)",
                    s
                )
            }),
        }
    }
}

impl TryFrom<String> for GameModeFilter {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<GameModeFilter> for String {
    fn from(filter: GameModeFilter) -> Self {
        filter.to_string()
    }
}

/// One completed match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    /// Final placement (1 = winner)
    pub placement: u32,

    /// Player level reached by the end of the match
    #[serde(default)]
    pub level: u32,

    /// Unspent gold at the end of the match
    #[serde(default)]
    pub gold_left: u32,

    /// Damage dealt to other players
    #[serde(default)]
    pub damage: u32,

    /// Equipped item identifiers, one entry per equipped copy
    #[serde(default, rename = "items", alias = "equipment_ids")]
    pub equipment: Vec<String>,

    /// Active synergy tokens, raw as exported
    #[serde(default, rename = "traits", alias = "synergy_groups")]
    pub synergies: Vec<String>,

    /// Queue the match was played in
    #[serde(default)]
    pub game_mode: GameMode,
}

impl MatchRecord {
    /// Create a record with no equipment or synergies.
    pub fn new(placement: u32, level: u32) -> Self {
        Self {
            placement,
            level,
            gold_left: 0,
            damage: 0,
            equipment: Vec::new(),
            synergies: Vec::new(),
            game_mode: GameMode::Solo,
        }
    }

    /// Builder method to set gold left and damage.
    pub fn with_economy(mut self, gold_left: u32, damage: u32) -> Self {
        self.gold_left = gold_left;
        self.damage = damage;
        self
    }

    /// Builder method to set equipment.
    pub fn with_equipment<I, S>(mut self, equipment: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.equipment = equipment.into_iter().map(Into::into).collect();
        self
    }

    /// Builder method to set synergies.
    pub fn with_synergies<I, S>(mut self, synergies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.synergies = synergies.into_iter().map(Into::into).collect();
        self
    }

    /// Builder method to set game mode.
    pub fn with_mode(mut self, mode: GameMode) -> Self {
        self.game_mode = mode;
        self
    }

    /// Check if this is a win (1st place).
    pub fn is_win(&self) -> bool {
        self.placement == 1
    }

    /// Check if this finished in the top half of a field of `field_size`.
    pub fn is_top_half(&self, field_size: u32) -> bool {
        self.placement <= top_half_cutoff(field_size)
    }

    /// Check if this finished in the top quarter of a field of `field_size`.
    pub fn is_top_quarter(&self, field_size: u32) -> bool {
        self.placement <= top_quarter_cutoff(field_size)
    }

    /// A placement is valid when it lies within 1..=field_size.
    pub fn has_valid_placement(&self, field_size: u32) -> bool {
        self.placement >= 1 && self.placement <= field_size
    }
}

/// Worst placement still counted as a top-half finish.
pub fn top_half_cutoff(field_size: u32) -> u32 {
    field_size.div_ceil(2).max(1)
}

/// Worst placement still counted as a top-quarter finish.
pub fn top_quarter_cutoff(field_size: u32) -> u32 {
    field_size.div_ceil(4).max(1)
}
