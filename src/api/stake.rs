use crate::api::AppState;
use crate::domain::{Account, RoundId, Wad};
use crate::error::AppError;
use crate::ops::Amount;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Parse a raw WAD amount string; `"all"` maps to the sentinel.
fn parse_amount(raw: &str) -> Result<Amount, AppError> {
    if raw.eq_ignore_ascii_case("all") {
        return Ok(Amount::All);
    }
    Wad::from_str(raw)
        .map(Amount::Exact)
        .map_err(|_| AppError::BadRequest(format!("invalid amount: {raw}")))
}

fn parse_exact(raw: &str) -> Result<Wad, AppError> {
    Wad::from_str(raw).map_err(|_| AppError::BadRequest(format!("invalid amount: {raw}")))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StakeRequest {
    pub caller: String,
    /// Raw smallest units.
    pub amount: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawRequest {
    pub caller: String,
    /// Raw smallest units, or `"all"`.
    pub amount: String,
    pub round: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimRequest {
    pub caller: String,
    pub round: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrateRequest {
    pub caller: String,
    pub amount: String,
    pub from_round: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AmountDto {
    pub amount: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrateDto {
    pub moved: String,
    pub reward_paid: String,
}

pub async fn stake(
    State(state): State<AppState>,
    Json(req): Json<StakeRequest>,
) -> Result<Json<AmountDto>, AppError> {
    let amount = parse_exact(&req.amount)?;
    let mut facade = state.facade()?;
    facade.stake(&Account::new(req.caller), amount)?;
    Ok(Json(AmountDto {
        amount: amount.to_string(),
    }))
}

pub async fn withdraw(
    State(state): State<AppState>,
    Json(req): Json<WithdrawRequest>,
) -> Result<Json<AmountDto>, AppError> {
    let amount = parse_amount(&req.amount)?;
    let mut facade = state.facade()?;
    let withdrawn = facade.withdraw(
        &Account::new(req.caller),
        amount,
        req.round.map(RoundId::new),
    )?;
    Ok(Json(AmountDto {
        amount: withdrawn.to_string(),
    }))
}

pub async fn claim(
    State(state): State<AppState>,
    Json(req): Json<ClaimRequest>,
) -> Result<Json<AmountDto>, AppError> {
    let mut facade = state.facade()?;
    let paid = facade.claim(&Account::new(req.caller), req.round.map(RoundId::new))?;
    Ok(Json(AmountDto {
        amount: paid.to_string(),
    }))
}

pub async fn migrate(
    State(state): State<AppState>,
    Json(req): Json<MigrateRequest>,
) -> Result<Json<MigrateDto>, AppError> {
    let amount = parse_amount(&req.amount)?;
    let mut facade = state.facade()?;
    let receipt = facade.migrate(
        &Account::new(req.caller),
        amount,
        RoundId::new(req.from_round),
    )?;
    Ok(Json(MigrateDto {
        moved: receipt.moved.to_string(),
        reward_paid: receipt.reward_paid.to_string(),
    }))
}
