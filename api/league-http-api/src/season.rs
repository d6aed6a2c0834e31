use axum::{
    extract::State,
    response::{Html, Redirect},
};
use axum_extra::extract::cookie::CookieJar;
use league_app::{domain::season::Season, workflow::season::active::GetActiveSeasonError};

use crate::{
    AppState, PageError,
    flash::{Flash, set_flash, take_flash},
    render::{escape, page},
};

/// The active season, or the flash to show when there is none.
pub(crate) async fn require_active_season(state: &AppState) -> Result<Season, Flash> {
    state
        .app
        .season_active_use_case
        .get_active_season()
        .await
        .map_err(|e| match e {
            GetActiveSeasonError::NoActiveSeason => {
                Flash::warning("No active season yet, one has been opened on the home page")
            }
            GetActiveSeasonError::Internal => Flash::error(e.to_string()),
        })
}

pub async fn new_season(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Redirect) {
    let flash = match state.app.season_new_use_case.start_new_season().await {
        Ok(season) => Flash::success(format!("{} started", season.name)),
        Err(e) => Flash::error(e.to_string()),
    };
    (set_flash(jar, flash), Redirect::to("/"))
}

pub async fn season_history(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Html<String>), PageError> {
    let (jar, flash) = take_flash(jar);
    let history = state
        .app
        .season_history_use_case
        .season_history()
        .await
        .map_err(PageError::internal)?;

    let mut body = String::new();
    if let Some(active) = &history.active {
        body.push_str(&format!(
            "<p>Current season: <strong>{}</strong>, week {}</p>",
            escape(&active.name),
            active.current_week
        ));
    }
    if history.seasons.is_empty() {
        body.push_str("<p>No seasons yet.</p>");
    } else {
        body.push_str("<table><tr><th>Season</th><th>Started</th><th>Week</th><th>Status</th></tr>");
        for season in &history.seasons {
            body.push_str(&format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                escape(&season.name),
                season.start_date.format("%Y-%m-%d"),
                season.current_week,
                season.status
            ));
        }
        body.push_str("</table>");
    }

    Ok((jar, page(&state.league_name, "Season history", flash, &body)))
}
