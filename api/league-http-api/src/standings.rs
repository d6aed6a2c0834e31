use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use league_app::domain::standings::StandingsScope;

use crate::{
    AppState, PageError,
    flash::{set_flash, take_flash},
    render::{escape, page, standings_table},
    season::require_active_season,
};

pub async fn view_standings(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Response, PageError> {
    let season = match require_active_season(&state).await {
        Ok(season) => season,
        Err(flash) => return Ok((set_flash(jar, flash), Redirect::to("/")).into_response()),
    };
    let (jar, flash) = take_flash(jar);

    let standings = &state.app.standings_get_use_case;
    let weekly = standings
        .get_standings(season.id, StandingsScope::Week(season.current_week))
        .await
        .map_err(PageError::internal)?;
    let cumulative = standings
        .get_standings(season.id, StandingsScope::Season)
        .await
        .map_err(PageError::internal)?;

    let body = format!(
        "<h2>{}</h2>{}{}",
        escape(&season.name),
        standings_table(&format!("Week {}", season.current_week), &weekly),
        standings_table("Season", &cumulative),
    );
    Ok((jar, page(&state.league_name, "Standings", flash, &body)).into_response())
}
