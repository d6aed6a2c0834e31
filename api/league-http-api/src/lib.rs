use std::{net::SocketAddr, sync::Arc};

use axum::{
    Router,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use league_app::Application;
use log::info;

mod flash;
mod home;
mod matches;
mod players;
mod render;
mod season;
mod standings;
mod week;

#[derive(Clone)]
pub struct AppState {
    pub app: Arc<Application>,
    pub league_name: Arc<str>,
}

impl AppState {
    pub fn new(app: Arc<Application>, league_name: &str) -> Self {
        Self {
            app,
            league_name: Arc::from(league_name),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home::index))
        .route(
            "/manage_players",
            get(players::manage_players).post(players::add_player),
        )
        .route("/toggle_player/{player_id}", get(players::toggle_player))
        .route("/update_player_names", get(players::update_player_names))
        .route("/generate_week", get(week::generate_week))
        .route("/week/{week_number}", get(week::view_week))
        .route("/next_week", get(week::next_week))
        .route("/update_match/{match_id}", post(matches::update_match))
        .route("/standings", get(standings::view_standings))
        .route("/new_season", get(season::new_season))
        .route("/season_history", get(season::season_history))
        .with_state(state)
}

pub async fn run(
    state: AppState,
    addr: SocketAddr,
    shutdown_signal: impl std::future::Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("League server listening on http://{}", addr);
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("HTTP server shut down gracefully");
    Ok(())
}

/// A failure no redirect can recover from; rendered as a 500 page.
pub struct PageError(String);

impl PageError {
    pub fn internal(msg: impl std::fmt::Display) -> Self {
        PageError(msg.to_string())
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let body = format!(
            "<!DOCTYPE html><html><head><title>Server error</title></head><body><h1>Something went wrong</h1><p>{}</p><p><a href=\"/\">Back to the league</a></p></body></html>",
            render::escape(&self.0)
        );
        (StatusCode::INTERNAL_SERVER_ERROR, Html(body)).into_response()
    }
}
