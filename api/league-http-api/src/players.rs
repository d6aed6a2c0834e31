use axum::{
    Form,
    extract::{Path, State},
    response::{Html, Redirect},
};
use axum_extra::extract::cookie::CookieJar;
use league_app::{
    domain::PlayerId,
    workflow::player::{
        add::{AddPlayerError, AddPlayerOutcome},
        toggle::TogglePlayerError,
    },
};
use serde::Deserialize;

use crate::{
    AppState, PageError,
    flash::{Flash, set_flash, take_flash},
    render::{escape, page},
};

const PLAYERS_PAGE: &str = "/manage_players";

pub async fn manage_players(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Html<String>), PageError> {
    let (jar, flash) = take_flash(jar);
    let roster = state
        .app
        .player_list_use_case
        .list_players()
        .await
        .map_err(PageError::internal)?;

    let list = |players: &[league_app::domain::player::Player], action: &str| {
        players
            .iter()
            .map(|p| {
                format!(
                    "<li>{} <a href=\"/toggle_player/{}\">{}</a></li>",
                    escape(&p.name),
                    p.id,
                    action
                )
            })
            .collect::<String>()
    };

    let body = format!(
        "<form method=\"post\" action=\"{page}\"><input name=\"player_name\" placeholder=\"Player name\"> <button type=\"submit\">Add player</button></form>\
<h3>Active ({active_count})</h3><ul>{active}</ul>\
<h3>Inactive</h3><ul>{inactive}</ul>\
<p><a href=\"/update_player_names\">Update placeholder names</a></p>",
        page = PLAYERS_PAGE,
        active_count = roster.active.len(),
        active = list(&roster.active, "Deactivate"),
        inactive = list(&roster.inactive, "Activate"),
    );

    Ok((jar, page(&state.league_name, "Manage players", flash, &body)))
}

#[derive(Deserialize)]
pub struct AddPlayerForm {
    #[serde(default)]
    player_name: String,
}

pub async fn add_player(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<AddPlayerForm>,
) -> (CookieJar, Redirect) {
    let flash = match state.app.player_add_use_case.add_player(&form.player_name).await {
        Ok(AddPlayerOutcome::Created(player)) => {
            Flash::success(format!("{} added to the roster", player.name))
        }
        Ok(AddPlayerOutcome::Reactivated(player)) => {
            Flash::success(format!("{} reactivated", player.name))
        }
        Err(e @ (AddPlayerError::NameRequired | AddPlayerError::AlreadyActive(_))) => {
            Flash::warning(e.to_string())
        }
        Err(e) => Flash::error(e.to_string()),
    };
    (set_flash(jar, flash), Redirect::to(PLAYERS_PAGE))
}

pub async fn toggle_player(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(player_id): Path<i64>,
) -> (CookieJar, Redirect) {
    let flash = match state
        .app
        .player_toggle_use_case
        .toggle_player(PlayerId(player_id))
        .await
    {
        Ok(player) if player.is_active => Flash::success(format!("{} is active", player.name)),
        Ok(player) => Flash::success(format!("{} is inactive", player.name)),
        Err(e @ TogglePlayerError::NotFound) => Flash::warning(e.to_string()),
        Err(e) => Flash::error(e.to_string()),
    };
    (set_flash(jar, flash), Redirect::to(PLAYERS_PAGE))
}

pub async fn update_player_names(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Redirect) {
    let flash = match state
        .app
        .player_migrate_names_use_case
        .migrate_player_names()
        .await
    {
        Ok(0) => Flash::success("Player names are already up to date"),
        Ok(changed) => Flash::success(format!("{} players updated", changed)),
        Err(e) => Flash::error(e.to_string()),
    };
    (set_flash(jar, flash), Redirect::to(PLAYERS_PAGE))
}
