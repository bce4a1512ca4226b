use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::{AnalysisQuery, ApiError, OutcomeBody};
use crate::calculate::ranking::{self, SortBy};
use crate::calculate::{
    aggregate_equipment, apply_min_samples, filter_matches, normalize_equipment_id,
};
use crate::models::{AggregateStat, Outcome};
use crate::report::{display_equipment_name, equipment_emoji, equipment_icon_url};

use super::load;

#[derive(Debug, Serialize)]
pub struct EquipmentRow {
    pub name: String,
    pub display_name: String,
    pub icon_url: String,
    pub emoji: &'static str,
    #[serde(flatten)]
    pub stats: AggregateStat,
    pub top_quarter_rate: f64,
}

impl EquipmentRow {
    pub fn new(name: &str, stats: &AggregateStat, field_size: u32) -> Self {
        let display_name = display_equipment_name(name);
        Self {
            name: name.to_string(),
            icon_url: equipment_icon_url(&display_name),
            emoji: equipment_emoji(name),
            display_name,
            stats: stats.clone(),
            top_quarter_rate: stats.top_quarter_rate(field_size),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub sort: Option<String>,
    pub limit: Option<usize>,
}

/// Equipment meeting the minimum-games threshold.
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<AnalysisQuery>,
    Query(list): Query<ListParams>,
) -> Result<Json<OutcomeBody<Vec<EquipmentRow>>>, ApiError> {
    let sort: SortBy = match list.sort.as_deref() {
        Some(s) => s.parse().map_err(ApiError::BadRequest)?,
        None => SortBy::default(),
    };
    let (set, params) = load(&state, &query).await?;

    let outcome = filter_matches(&set.matches, &params).map(|filtered| {
        let all = aggregate_equipment(filtered.iter().copied(), &params);
        let shown = apply_min_samples(&all, params.min_equipment_games);
        let mut rows = ranking::sorted(&shown, sort);
        if let Some(limit) = list.limit {
            rows.truncate(limit);
        }
        rows.into_iter()
            .map(|(name, stats)| EquipmentRow::new(name, stats, params.field_size))
            .collect::<Vec<_>>()
    });

    Ok(Json(outcome.into()))
}

/// One equipment id, regardless of the minimum-games threshold.
pub async fn detail(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(query): Query<AnalysisQuery>,
) -> Result<Json<OutcomeBody<EquipmentRow>>, ApiError> {
    let key = normalize_equipment_id(&name)
        .ok_or_else(|| ApiError::NotFound(format!("Equipment '{}'", name)))?;
    let (set, params) = load(&state, &query).await?;

    let outcome = match filter_matches(&set.matches, &params) {
        Outcome::Ready(filtered) => {
            let all = aggregate_equipment(filtered.iter().copied(), &params);
            let stats = all
                .get(&key)
                .ok_or_else(|| ApiError::NotFound(format!("Equipment '{}'", name)))?;
            Outcome::Ready(EquipmentRow::new(&key, stats, params.field_size))
        }
        Outcome::Empty(reason) => Outcome::Empty(reason),
    };

    Ok(Json(outcome.into()))
}
