//! Leaderboard and match reporting endpoints

use axum::{extract::State, Json};
use codenames_arena::{MatchDraft, MatchRecord, ModelStat};
use serde::Serialize;
use std::sync::Arc;

use crate::error::ApiError;
use crate::state::ServerState;

#[derive(Serialize)]
pub struct StatsResponse {
    pub leaderboard: Vec<ModelStat>,
}

#[derive(Serialize)]
pub struct RecordResponse {
    pub success: bool,
    #[serde(rename = "match")]
    pub record: MatchRecord,
}

/// Current standings across every stored match
pub async fn get_stats(
    State(state): State<Arc<ServerState>>,
) -> Result<Json<StatsResponse>, ApiError> {
    let leaderboard = state.leaderboard.leaderboard()?;
    Ok(Json(StatsResponse { leaderboard }))
}

/// Store a match played elsewhere
pub async fn post_match(
    State(state): State<Arc<ServerState>>,
    Json(draft): Json<MatchDraft>,
) -> Result<Json<RecordResponse>, ApiError> {
    if draft.red_model_id.trim().is_empty() || draft.blue_model_id.trim().is_empty() {
        return Err(ApiError::bad_request("redModelId and blueModelId are required"));
    }

    let record = state.leaderboard.record(draft)?;
    Ok(Json(RecordResponse {
        success: true,
        record,
    }))
}
