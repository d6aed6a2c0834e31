use axum::{extract::State, response::Html};
use axum_extra::extract::cookie::CookieJar;
use league_app::domain::standings::StandingsScope;

use crate::{
    AppState, PageError,
    flash::take_flash,
    render::{escape, matches_table, page, standings_table},
};

pub async fn index(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Html<String>), PageError> {
    let (jar, flash) = take_flash(jar);
    let app = &state.app;

    let season = app
        .season_ensure_use_case
        .ensure_season()
        .await
        .map_err(PageError::internal)?;
    let roster = app
        .player_list_use_case
        .list_players()
        .await
        .map_err(PageError::internal)?;
    let week = app
        .week_get_use_case
        .get_week(season.id, season.current_week)
        .await
        .map_err(PageError::internal)?;
    let cumulative = app
        .standings_get_use_case
        .get_standings(season.id, StandingsScope::Season)
        .await
        .map_err(PageError::internal)?;

    let players = roster
        .active
        .iter()
        .map(|p| format!("<li>{}</li>", escape(&p.name)))
        .collect::<String>();

    let body = format!(
        "<h2>{season} &middot; Week {week}</h2>\
<p><a href=\"/generate_week\">Generate week {week}</a> | <a href=\"/next_week\">Next week</a> | <a href=\"/new_season\">New season</a></p>\
<h3>Active players ({count})</h3><ul>{players}</ul>\
<h3>Matches</h3>{matches}{weekly}{cumulative}",
        season = escape(&season.name),
        week = season.current_week,
        count = roster.active.len(),
        matches = matches_table(&week.matches),
        weekly = standings_table(&format!("Week {}", season.current_week), &week.standings),
        cumulative = standings_table("Season", &cumulative),
    );

    Ok((jar, page(&state.league_name, &state.league_name, flash, &body)))
}
