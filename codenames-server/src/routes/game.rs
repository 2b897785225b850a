//! Live game endpoints
//!
//! One game at a time, advanced a single clue or guess per request.

use axum::{extract::State, Json};
use codenames_arena::{MatchRecord, StepOutcome};
use codenames_core::{GameState, Team};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::ApiError;
use crate::state::{ServerState, DEFAULT_MODEL};

#[derive(Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartGameRequest {
    pub starting_team: Option<Team>,
    pub red_model: Option<String>,
    pub blue_model: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameResponse {
    pub red_model: String,
    pub blue_model: String,
    pub state: GameState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<MatchRecord>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepResponse {
    pub outcome: StepOutcome,
    pub state: GameState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<MatchRecord>,
}

/// Start a new game, replacing any game in progress
pub async fn start_game(
    State(state): State<Arc<ServerState>>,
    body: Option<Json<StartGameRequest>>,
) -> Result<Json<GameState>, ApiError> {
    let req = body.map(|Json(r)| r).unwrap_or_default();
    let red = model_or_default(req.red_model)?;
    let blue = model_or_default(req.blue_model)?;

    let game = state.start_game(req.starting_team, &red, &blue)?;
    Ok(Json(game))
}

/// Advance the live game by one step
pub async fn step_game(State(state): State<Arc<ServerState>>) -> Result<Json<StepResponse>, ApiError> {
    let response = tokio::task::spawn_blocking(move || {
        let mut session = state.lock_session()?;
        let game = session
            .as_mut()
            .ok_or_else(|| ApiError::not_found("no game in progress"))?;

        let outcome = game.step(&state.leaderboard)?;
        Ok::<_, ApiError>(StepResponse {
            outcome,
            state: game.state().clone(),
            record: game.record().cloned(),
        })
    })
    .await
    .map_err(|e| ApiError::internal(format!("step task failed: {}", e)))??;

    Ok(Json(response))
}

/// Snapshot of the live game
pub async fn get_game(State(state): State<Arc<ServerState>>) -> Result<Json<GameResponse>, ApiError> {
    let session = state.try_lock_session()?;
    let game = session
        .as_ref()
        .ok_or_else(|| ApiError::not_found("no game in progress"))?;

    Ok(Json(GameResponse {
        red_model: game.model_id(Team::Red).to_string(),
        blue_model: game.model_id(Team::Blue).to_string(),
        state: game.state().clone(),
        record: game.record().cloned(),
    }))
}

pub(crate) fn model_or_default(model: Option<String>) -> Result<String, ApiError> {
    match model {
        None => Ok(DEFAULT_MODEL.to_string()),
        Some(m) if m.trim().is_empty() => Err(ApiError::bad_request("model id must not be empty")),
        Some(m) => Ok(m.trim().to_string()),
    }
}
