use crate::api::AppState;
use crate::domain::{RoundId, RoundState};
use crate::error::AppError;
use crate::ops::PoolView;
use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct RoundQuery {
    /// Omitted = the current round.
    pub round: Option<u64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolDto {
    pub round: u64,
    pub state: RoundState,
    pub reward_per_second: String,
    pub reward_index: String,
    pub start_timestamp: u64,
    pub end_timestamp: u64,
    pub total_principal: String,
    pub reward_reserve: String,
}

impl From<PoolView> for PoolDto {
    fn from(view: PoolView) -> Self {
        PoolDto {
            round: view.round.as_u64(),
            state: view.state,
            reward_per_second: view.reward_per_second.to_string(),
            reward_index: view.reward_index.to_string(),
            start_timestamp: view.start_timestamp.as_secs(),
            end_timestamp: view.end_timestamp.as_secs(),
            total_principal: view.total_principal.to_string(),
            reward_reserve: view.reward_reserve.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentRoundDto {
    pub round: Option<u64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardIndexDto {
    pub round: u64,
    pub reward_index: String,
}

pub async fn get_pool_data(
    Query(params): Query<RoundQuery>,
    State(state): State<AppState>,
) -> Result<Json<PoolDto>, AppError> {
    let facade = state.facade()?;
    let view = facade.get_pool_data(params.round.map(RoundId::new))?;
    Ok(Json(view.into()))
}

pub async fn get_reward_index(
    Query(params): Query<RoundQuery>,
    State(state): State<AppState>,
) -> Result<Json<RewardIndexDto>, AppError> {
    let facade = state.facade()?;
    let round = params.round.map(RoundId::new);
    let view = facade.get_pool_data(round)?;
    let index = facade.get_reward_index(round)?;
    Ok(Json(RewardIndexDto {
        round: view.round.as_u64(),
        reward_index: index.to_string(),
    }))
}

pub async fn get_current_round(
    State(state): State<AppState>,
) -> Result<Json<CurrentRoundDto>, AppError> {
    let facade = state.facade()?;
    Ok(Json(CurrentRoundDto {
        round: facade.current_round().map(|r| r.as_u64()),
    }))
}
