use axum::extract::{Query, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::api::state::AppState;
use crate::api::{AnalysisQuery, ApiError, OutcomeBody};
use crate::calculate::ranking::{self, SortBy};
use crate::calculate::{analyze, filter_matches, summarize, Analysis, TrendPoint};
use crate::models::{Insight, LevelStat, MatchSummary, Takeaways};
use crate::report::text::{render_improvement, render_insight, render_strength};
use crate::storage::{DataSource, MatchSet};

use super::equipment::EquipmentRow;
use super::load;
use super::synergies::{synergy_rows, SynergyRow};

// ── Health ──────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub source: DataSource,
    pub matches: usize,
    pub skipped: usize,
    pub loaded_at: DateTime<Utc>,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let set = state.matches().await;
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        source: set.source.clone(),
        matches: set.matches.len(),
        skipped: set.skipped,
        loaded_at: set.loaded_at,
    })
}

// ── Insights ────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct InsightRow {
    #[serde(flatten)]
    pub insight: Insight,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct TakeawayMessages {
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct InsightsResponse {
    pub insights: Vec<InsightRow>,
    pub takeaways: Takeaways,
    pub messages: TakeawayMessages,
}

fn insight_rows(insights: Vec<Insight>, field_size: u32) -> Vec<InsightRow> {
    insights
        .into_iter()
        .map(|insight| InsightRow {
            message: render_insight(&insight, field_size),
            insight,
        })
        .collect()
}

fn takeaway_messages(takeaways: &Takeaways, field_size: u32) -> TakeawayMessages {
    TakeawayMessages {
        strengths: takeaways
            .strengths
            .iter()
            .map(|s| render_strength(s, field_size))
            .collect(),
        improvements: takeaways
            .improvements
            .iter()
            .map(|i| render_improvement(i, field_size))
            .collect(),
    }
}

pub async fn insights(
    State(state): State<AppState>,
    Query(query): Query<AnalysisQuery>,
) -> Result<Json<OutcomeBody<InsightsResponse>>, ApiError> {
    let (set, params) = load(&state, &query).await?;
    let field_size = params.field_size;

    let outcome = analyze(&set.matches, &params, &state.policy).map(|analysis| InsightsResponse {
        messages: takeaway_messages(&analysis.takeaways, field_size),
        insights: insight_rows(analysis.insights, field_size),
        takeaways: analysis.takeaways,
    });

    Ok(Json(outcome.into()))
}

// ── Full analysis ───────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    pub source: DataSource,
    pub loaded_at: DateTime<Utc>,
    pub generated_at: DateTime<Utc>,
    pub summary: MatchSummary,
    pub equipment: Vec<EquipmentRow>,
    pub synergies: OutcomeBody<Vec<SynergyRow>>,
    pub insights: Vec<InsightRow>,
    pub takeaways: Takeaways,
    pub messages: TakeawayMessages,
    pub trend: Vec<TrendPoint>,
}

impl AnalysisResponse {
    pub fn new(set: &MatchSet, analysis: Analysis, field_size: u32) -> Self {
        let equipment = ranking::sorted(&analysis.shown_equipment, SortBy::Average)
            .into_iter()
            .map(|(name, stats)| EquipmentRow::new(name, stats, field_size))
            .collect();

        Self {
            source: set.source.clone(),
            loaded_at: set.loaded_at,
            generated_at: Utc::now(),
            equipment,
            synergies: analysis.synergies.map(|s| synergy_rows(&s)).into(),
            messages: takeaway_messages(&analysis.takeaways, field_size),
            insights: insight_rows(analysis.insights, field_size),
            takeaways: analysis.takeaways,
            summary: analysis.summary,
            trend: analysis.trend,
        }
    }
}

pub async fn analysis(
    State(state): State<AppState>,
    Query(query): Query<AnalysisQuery>,
) -> Result<Json<OutcomeBody<AnalysisResponse>>, ApiError> {
    let (set, params) = load(&state, &query).await?;

    let outcome = analyze(&set.matches, &params, &state.policy)
        .map(|analysis| AnalysisResponse::new(&set, analysis, params.field_size));

    Ok(Json(outcome.into()))
}

// ── Summary, levels, trend ──────────────────────────────────────

pub async fn summary(
    State(state): State<AppState>,
    Query(query): Query<AnalysisQuery>,
) -> Result<Json<OutcomeBody<MatchSummary>>, ApiError> {
    let (set, params) = load(&state, &query).await?;

    let outcome = filter_matches(&set.matches, &params)
        .and_then(|filtered| summarize(filtered.iter().copied(), &params));

    Ok(Json(outcome.into()))
}

#[derive(Debug, Serialize)]
pub struct LevelRow {
    pub level: u32,
    #[serde(flatten)]
    pub stats: LevelStat,
}

pub async fn levels(
    State(state): State<AppState>,
    Query(query): Query<AnalysisQuery>,
) -> Result<Json<OutcomeBody<Vec<LevelRow>>>, ApiError> {
    let (set, params) = load(&state, &query).await?;

    let outcome = filter_matches(&set.matches, &params)
        .and_then(|filtered| summarize(filtered.iter().copied(), &params))
        .map(|summary| {
            summary
                .by_level
                .into_iter()
                .map(|(level, stats)| LevelRow { level, stats })
                .collect::<Vec<_>>()
        });

    Ok(Json(outcome.into()))
}

pub async fn trend(
    State(state): State<AppState>,
    Query(query): Query<AnalysisQuery>,
) -> Result<Json<OutcomeBody<Vec<TrendPoint>>>, ApiError> {
    let (set, params) = load(&state, &query).await?;

    let outcome = filter_matches(&set.matches, &params)
        .map(|filtered| ranking::placement_trend(filtered.iter().copied()));

    Ok(Json(outcome.into()))
}
