pub mod equipment;
pub mod overview;
pub mod synergies;

use std::sync::Arc;

use crate::api::state::AppState;
use crate::api::{AnalysisQuery, ApiError};
use crate::calculate::StatsParams;
use crate::storage::MatchSet;

/// Resolve the query against the config defaults, then load the history.
pub(crate) async fn load(
    state: &AppState,
    query: &AnalysisQuery,
) -> Result<(Arc<MatchSet>, StatsParams), ApiError> {
    let params = query.to_params(&state.config.analysis)?;
    Ok((state.matches().await, params))
}
