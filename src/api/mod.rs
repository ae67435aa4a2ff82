pub mod admin;
pub mod health;
pub mod pool;
pub mod stake;
pub mod user;

use crate::custody::InMemoryCustody;
use crate::error::AppError;
use crate::ops::StakingFacade;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::{Arc, Mutex, MutexGuard};
use tower_http::cors::{Any, CorsLayer};

#[derive(Clone)]
pub struct AppState {
    pub facade: Arc<Mutex<StakingFacade<InMemoryCustody>>>,
}

impl AppState {
    pub fn new(facade: StakingFacade<InMemoryCustody>) -> Self {
        Self {
            facade: Arc::new(Mutex::new(facade)),
        }
    }

    pub fn facade(&self) -> Result<MutexGuard<'_, StakingFacade<InMemoryCustody>>, AppError> {
        self.facade
            .lock()
            .map_err(|_| AppError::Internal("ledger lock poisoned".to_string()))
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health))
        .route("/v1/round", get(pool::get_current_round))
        .route("/v1/pool", get(pool::get_pool_data))
        .route("/v1/pool/index", get(pool::get_reward_index))
        .route("/v1/user", get(user::get_user_data))
        .route("/v1/rounds", post(admin::init_round))
        .route("/v1/pool/extend", post(admin::extend_pool))
        .route("/v1/pool/close", post(admin::close_pool))
        .route("/v1/stake", post(stake::stake))
        .route("/v1/withdraw", post(stake::withdraw))
        .route("/v1/claim", post(stake::claim))
        .route("/v1/migrate", post(stake::migrate))
        .route("/v1/admin/emergency", post(admin::set_emergency))
        .route("/v1/admin/residue", post(admin::retrieve_residue))
        .route("/v1/admin/managers", post(admin::set_manager))
        .route("/v1/admin/managers/revoke", post(admin::revoke_manager))
        .layer(cors)
        .with_state(state)
}
