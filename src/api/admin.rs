use crate::api::AppState;
use crate::domain::{Account, Timestamp, Wad};
use crate::error::AppError;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::str::FromStr;

fn parse_wad(field: &str, raw: &str) -> Result<Wad, AppError> {
    Wad::from_str(raw).map_err(|_| AppError::BadRequest(format!("invalid {field}: {raw}")))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitRoundRequest {
    pub caller: String,
    /// Raw reward-asset units per second.
    pub reward_per_second: String,
    /// Unix seconds.
    pub start_timestamp: u64,
    /// Seconds.
    pub duration: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitRoundDto {
    pub round: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtendPoolRequest {
    pub caller: String,
    pub reward_per_second: String,
    pub duration: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallerRequest {
    pub caller: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmergencyRequest {
    pub caller: String,
    pub enabled: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagerRequest {
    pub caller: String,
    pub manager: String,
}

pub async fn init_round(
    State(state): State<AppState>,
    Json(req): Json<InitRoundRequest>,
) -> Result<Json<InitRoundDto>, AppError> {
    let rate = parse_wad("rewardPerSecond", &req.reward_per_second)?;
    let mut facade = state.facade()?;
    let round = facade.init_round(
        &Account::new(req.caller),
        rate,
        Timestamp::new(req.start_timestamp),
        req.duration,
    )?;
    Ok(Json(InitRoundDto {
        round: round.as_u64(),
    }))
}

pub async fn extend_pool(
    State(state): State<AppState>,
    Json(req): Json<ExtendPoolRequest>,
) -> Result<Json<Value>, AppError> {
    let rate = parse_wad("rewardPerSecond", &req.reward_per_second)?;
    let mut facade = state.facade()?;
    facade.extend_pool(&Account::new(req.caller), rate, req.duration)?;
    Ok(Json(json!({ "status": "extended" })))
}

pub async fn close_pool(
    State(state): State<AppState>,
    Json(req): Json<CallerRequest>,
) -> Result<Json<Value>, AppError> {
    let mut facade = state.facade()?;
    facade.close_pool(&Account::new(req.caller))?;
    Ok(Json(json!({ "status": "closed" })))
}

pub async fn set_emergency(
    State(state): State<AppState>,
    Json(req): Json<EmergencyRequest>,
) -> Result<Json<Value>, AppError> {
    let mut facade = state.facade()?;
    facade.set_emergency(&Account::new(req.caller), req.enabled)?;
    Ok(Json(json!({ "emergency": req.enabled })))
}

pub async fn retrieve_residue(
    State(state): State<AppState>,
    Json(req): Json<CallerRequest>,
) -> Result<Json<Value>, AppError> {
    let mut facade = state.facade()?;
    let swept = facade.retrieve_residue(&Account::new(req.caller))?;
    Ok(Json(json!({ "residue": swept.to_string() })))
}

pub async fn set_manager(
    State(state): State<AppState>,
    Json(req): Json<ManagerRequest>,
) -> Result<Json<Value>, AppError> {
    let mut facade = state.facade()?;
    facade.set_manager(&Account::new(req.caller), Account::new(req.manager))?;
    Ok(Json(json!({ "status": "granted" })))
}

pub async fn revoke_manager(
    State(state): State<AppState>,
    Json(req): Json<ManagerRequest>,
) -> Result<Json<Value>, AppError> {
    let mut facade = state.facade()?;
    facade.revoke_manager(&Account::new(req.caller), &Account::new(req.manager))?;
    Ok(Json(json!({ "status": "revoked" })))
}
