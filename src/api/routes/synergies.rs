use std::collections::HashMap;

use axum::extract::{Query, State};
use axum::Json;
use serde::Serialize;

use crate::api::state::AppState;
use crate::api::{AnalysisQuery, ApiError, OutcomeBody};
use crate::calculate::ranking::{self, SortBy};
use crate::calculate::{aggregate_synergies, filter_matches};
use crate::models::AggregateStat;
use crate::report::display_synergy_name;

use super::load;

#[derive(Debug, Serialize)]
pub struct SynergyRow {
    pub name: String,
    pub display_name: String,
    #[serde(flatten)]
    pub stats: AggregateStat,
}

/// Rows for a synergy map, best average first.
pub fn synergy_rows(stats: &HashMap<String, AggregateStat>) -> Vec<SynergyRow> {
    ranking::sorted(stats, SortBy::Average)
        .into_iter()
        .map(|(name, stats)| SynergyRow {
            name: name.to_string(),
            display_name: display_synergy_name(name),
            stats: stats.clone(),
        })
        .collect()
}

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<AnalysisQuery>,
) -> Result<Json<OutcomeBody<Vec<SynergyRow>>>, ApiError> {
    let (set, params) = load(&state, &query).await?;

    let outcome = filter_matches(&set.matches, &params)
        .and_then(|filtered| aggregate_synergies(filtered.iter().copied(), &params))
        .map(|stats| synergy_rows(&stats));

    Ok(Json(outcome.into()))
}

#[cfg(test)]
mod tests {
    use crate::api::build_router;
    use crate::api::test_support::{get_json, state_with_matches};
    use crate::models::MatchRecord;
    use axum::http::StatusCode;
    use pretty_assertions::assert_eq;

    fn history() -> Vec<MatchRecord> {
        vec![
            MatchRecord::new(2, 8).with_synergies(["TFT14_Vanguard_2", "TFT14_Slayer_1"]),
            MatchRecord::new(4, 8).with_synergies(["TFT14_Vanguard_3"]),
            MatchRecord::new(7, 7).with_synergies(["Slayer"]),
            MatchRecord::new(6, 7).with_synergies(["StreetDemon"]),
        ]
    }

    #[tokio::test]
    async fn test_synergies_threshold_and_order() {
        let dir = tempfile::tempdir().unwrap();
        let app = build_router(state_with_matches(dir.path(), &history()));

        let (status, json) = get_json(app, "/api/synergies").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ready");

        let rows = json["data"].as_array().unwrap();
        let names: Vec<&str> = rows.iter().map(|r| r["name"].as_str().unwrap()).collect();
        assert_eq!(names, vec!["Vanguard", "Slayer"]);
        assert_eq!(rows[0]["average_placement"], 3.0);
        assert_eq!(rows[1]["sample_count"], 2);
    }

    #[tokio::test]
    async fn test_synergies_min_games_override() {
        let dir = tempfile::tempdir().unwrap();
        let app = build_router(state_with_matches(dir.path(), &history()));

        let (_, json) = get_json(app, "/api/synergies?min_synergy_games=1").await;
        let rows = json["data"].as_array().unwrap();
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().any(|r| r["display_name"] == "Street Demon"));
    }

    #[tokio::test]
    async fn test_synergies_empty_when_nothing_meets_threshold() {
        let dir = tempfile::tempdir().unwrap();
        let app = build_router(state_with_matches(dir.path(), &history()));

        let (status, json) = get_json(app, "/api/synergies?min_synergy_games=10").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "empty");
        assert_eq!(json["reason"], "no_synergy_data");
    }
}
