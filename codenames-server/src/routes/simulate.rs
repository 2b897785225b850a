//! Batch simulation endpoint

use axum::{extract::State, Json};
use codenames_arena::BatchReport;
use codenames_core::Team;
use serde::Deserialize;
use std::sync::Arc;

use super::game::model_or_default;
use crate::error::ApiError;
use crate::state::ServerState;

/// Upper bound on games per request
pub const MAX_GAMES_PER_REQUEST: usize = 1000;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulateRequest {
    pub games: usize,
    pub red_model: Option<String>,
    pub blue_model: Option<String>,
    pub starting_team: Option<Team>,
}

/// Play a batch of games and record every finished one
pub async fn simulate(
    State(state): State<Arc<ServerState>>,
    Json(req): Json<SimulateRequest>,
) -> Result<Json<BatchReport>, ApiError> {
    if req.games == 0 || req.games > MAX_GAMES_PER_REQUEST {
        return Err(ApiError::bad_request(format!(
            "games must be between 1 and {}",
            MAX_GAMES_PER_REQUEST
        )));
    }
    let red = model_or_default(req.red_model)?;
    let blue = model_or_default(req.blue_model)?;

    let report = tokio::task::spawn_blocking(move || {
        state.simulate(req.games, req.starting_team, &red, &blue)
    })
    .await
    .map_err(|e| ApiError::internal(format!("simulation task failed: {}", e)))??;

    Ok(Json(report))
}
