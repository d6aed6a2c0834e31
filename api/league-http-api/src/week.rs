use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use league_app::workflow::week::{
    advance::AdvanceWeekError, generate::GenerateWeekError,
};

use crate::{
    AppState, PageError,
    flash::{Flash, set_flash, take_flash},
    render::{escape, matches_table, page, standings_table},
    season::require_active_season,
};

pub async fn generate_week(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Redirect) {
    let season = match require_active_season(&state).await {
        Ok(season) => season,
        Err(flash) => return (set_flash(jar, flash), Redirect::to("/")),
    };

    match state.app.week_generate_use_case.generate_week(season.id).await {
        Ok(week) => (
            set_flash(
                jar,
                Flash::success(format!("Week {} fixtures generated", week.week_number)),
            ),
            Redirect::to(&format!("/week/{}", week.week_number)),
        ),
        Err(
            e @ (GenerateWeekError::WrongRosterSize { .. } | GenerateWeekError::AlreadyScheduled(_)),
        ) => (set_flash(jar, Flash::warning(e.to_string())), Redirect::to("/")),
        Err(e) => (set_flash(jar, Flash::error(e.to_string())), Redirect::to("/")),
    }
}

pub async fn view_week(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(week_number): Path<u32>,
) -> Result<Response, PageError> {
    let season = match require_active_season(&state).await {
        Ok(season) => season,
        Err(flash) => return Ok((set_flash(jar, flash), Redirect::to("/")).into_response()),
    };
    let (jar, flash) = take_flash(jar);

    let week = state
        .app
        .week_get_use_case
        .get_week(season.id, week_number)
        .await
        .map_err(PageError::internal)?;

    let mut nav = String::new();
    if week_number > 1 {
        nav.push_str(&format!(
            "<a href=\"/week/{}\">&larr; Week {}</a> ",
            week_number - 1,
            week_number - 1
        ));
    }
    if week_number < season.current_week {
        nav.push_str(&format!(
            "<a href=\"/week/{}\">Week {} &rarr;</a>",
            week_number + 1,
            week_number + 1
        ));
    }

    let completed = week.matches.iter().filter(|m| m.is_completed).count();
    let body = format!(
        "<h2>{season}</h2><p>{nav}</p><p>{completed} of {total} matches played</p>{matches}{standings}",
        season = escape(&season.name),
        total = week.matches.len(),
        matches = matches_table(&week.matches),
        standings = standings_table(&format!("Week {} standings", week_number), &week.standings),
    );
    let title = format!("Week {}", week_number);
    Ok((jar, page(&state.league_name, &title, flash, &body)).into_response())
}

pub async fn next_week(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Redirect) {
    let season = match require_active_season(&state).await {
        Ok(season) => season,
        Err(flash) => return (set_flash(jar, flash), Redirect::to("/")),
    };

    let flash = match state.app.week_advance_use_case.advance_week(season.id).await {
        Ok(week) => Flash::success(format!("Moved on to week {}", week)),
        Err(e @ AdvanceWeekError::IncompleteWeek { .. }) => Flash::warning(e.to_string()),
        Err(e) => Flash::error(e.to_string()),
    };
    (set_flash(jar, flash), Redirect::to("/"))
}
