use anyhow::Context;
use roundstake::api::{self, AppState};
use roundstake::clock::SystemClock;
use roundstake::config::Config;
use roundstake::custody::InMemoryCustody;
use roundstake::domain::{Account, Asset};
use roundstake::{RoleBook, StakingFacade};
use std::net::SocketAddr;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into()),
        )
        .init();

    // Load configuration
    let config = Config::from_env().context("failed to load configuration")?;
    let port = config.port;

    // Wire the ledger facade
    let custody = InMemoryCustody::new(Account::new("vault"));
    let roles = RoleBook::new(
        Account::new(config.admin_account.clone()),
        config.manager_accounts.iter().cloned().map(Account::new),
    );
    let facade = StakingFacade::new(
        custody,
        roles,
        Arc::new(SystemClock),
        Asset::new(config.stake_asset.clone()),
        Asset::new(config.reward_asset.clone()),
        config.reward_index_baseline,
    );

    // Create router
    let app = api::create_router(AppState::new(facade));

    // Bind to address
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;

    tracing::info!("Server listening on {}", addr);

    // Run server
    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
