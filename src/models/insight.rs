//! Insight and takeaway models.
//!
//! These carry identifiers and numbers only. Turning them into sentences is
//! left to whoever renders them.

use serde::{Deserialize, Serialize};

/// Tone of an insight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    Warning,
    Success,
}

/// An equipment identifier with the numbers an insight quotes for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentRef {
    pub name: String,
    pub sample_count: u32,
    pub average_placement: f64,
    pub top_half_rate: f64,
}

/// What an insight is about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InsightDetail {
    /// A frequently used item with a poor average, and the best frequent alternative.
    UnderperformingEquipment {
        equipment: EquipmentRef,
        alternative: Option<EquipmentRef>,
    },
    StrongPerformance {
        average_placement: f64,
        top_half_rate: f64,
    },
    TopHalfConsistency {
        top_half_rate: f64,
    },
    FocusOnFundamentals {
        average_placement: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub detail: InsightDetail,
}

impl Insight {
    pub fn warning(detail: InsightDetail) -> Self {
        Self {
            kind: InsightKind::Warning,
            detail,
        }
    }

    pub fn success(detail: InsightDetail) -> Self {
        Self {
            kind: InsightKind::Success,
            detail,
        }
    }
}

/// Something the player is already doing well.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Strength {
    SolidTopHalfRate(f64),
    GoodLevelManagement(f64),
    StrongTopQuarterRate(f64),
}

/// Something worth working on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Improvement {
    ReduceEquipment { name: String },
    EarlyGameEconomy,
    TopHalfConsistency,
    LevelTiming,
    PushHigherLevel { level: u32 },
}

/// Strengths and improvements panel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Takeaways {
    pub strengths: Vec<Strength>,
    pub improvements: Vec<Improvement>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insight_serialization_is_structured() {
        let insight = Insight::warning(InsightDetail::FocusOnFundamentals {
            average_placement: 4.8,
        });

        let json = serde_json::to_value(&insight).unwrap();
        assert_eq!(json["kind"], "warning");
        assert_eq!(json["detail"]["type"], "focus_on_fundamentals");
        assert_eq!(json["detail"]["average_placement"], 4.8);
    }

    #[test]
    fn test_takeaway_serialization() {
        let takeaways = Takeaways {
            strengths: vec![Strength::GoodLevelManagement(8.2)],
            improvements: vec![Improvement::PushHigherLevel { level: 7 }],
        };

        let json = serde_json::to_value(&takeaways).unwrap();
        assert_eq!(json["strengths"][0]["type"], "good_level_management");
        assert_eq!(json["strengths"][0]["value"], 8.2);
        assert_eq!(json["improvements"][0]["level"], 7);
    }
}
