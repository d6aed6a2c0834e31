use std::sync::Arc;

use league_app::build_application;
use league_http_api::AppState;
use league_persistence_sqlite::{
    SqliteMatchRepository, SqlitePlayerRepository, SqliteSeasonRepository,
    SqliteStandingsRepository, create_db_pool, ensure_schema,
};
use log::info;

use crate::config::ServerConfig;

mod config;
mod logs;

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received. Preparing graceful exit...");
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    logs::init_logger();

    let config = ServerConfig::from_env().expect("Invalid configuration");

    let pool = create_db_pool(&config.db_path)
        .await
        .expect("Failed to open league database");
    ensure_schema(&pool)
        .await
        .expect("Failed to create league tables");

    let player_repo = Arc::new(SqlitePlayerRepository::new(pool.clone()));
    let season_repo = Arc::new(SqliteSeasonRepository::new(pool.clone()));
    let match_repo = Arc::new(SqliteMatchRepository::new(pool.clone()));
    let standings_repo = Arc::new(SqliteStandingsRepository::new(pool.clone()));

    let app = Arc::new(build_application(
        player_repo,
        season_repo,
        match_repo,
        standings_repo,
        config.league_settings(),
    ));
    let state = AppState::new(app, &config.league_name);

    info!(
        "Starting {} league with database {}",
        config.league_name, config.db_path
    );

    if let Err(e) = league_http_api::run(state, config.addr(), shutdown_signal()).await {
        log::error!("HTTP server failed: {}", e);
    }

    pool.close().await;
}
