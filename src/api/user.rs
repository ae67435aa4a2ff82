use crate::api::AppState;
use crate::domain::{Account, RoundId};
use crate::error::AppError;
use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserQuery {
    pub account: String,
    pub round: Option<u64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub round: u64,
    pub account: String,
    pub principal: String,
    pub index: String,
    pub pending_reward: String,
}

pub async fn get_user_data(
    Query(params): Query<UserQuery>,
    State(state): State<AppState>,
) -> Result<Json<UserDto>, AppError> {
    if params.account.trim().is_empty() {
        return Err(AppError::BadRequest("account must not be empty".into()));
    }
    let facade = state.facade()?;
    let view = facade.get_user_data(
        &Account::new(params.account),
        params.round.map(RoundId::new),
    )?;
    Ok(Json(UserDto {
        round: view.round.as_u64(),
        account: view.account.to_string(),
        principal: view.principal.to_string(),
        index: view.index.to_string(),
        pending_reward: view.pending_reward.to_string(),
    }))
}
