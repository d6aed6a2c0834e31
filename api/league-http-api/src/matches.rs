use axum::{
    Form,
    extract::{Path, State},
    response::Redirect,
};
use axum_extra::extract::cookie::CookieJar;
use league_app::{domain::MatchId, workflow::result::record::RecordResultError};
use serde::Deserialize;

use crate::{
    AppState,
    flash::{Flash, set_flash},
};

#[derive(Deserialize)]
pub struct ScoreForm {
    #[serde(default)]
    score1: String,
    #[serde(default)]
    score2: String,
}

fn parse_scores(form: &ScoreForm) -> Option<(i64, i64)> {
    let score1 = form.score1.trim().parse().ok()?;
    let score2 = form.score2.trim().parse().ok()?;
    Some((score1, score2))
}

pub async fn update_match(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(match_id): Path<i64>,
    Form(form): Form<ScoreForm>,
) -> (CookieJar, Redirect) {
    let Some((score1, score2)) = parse_scores(&form) else {
        return (
            set_flash(jar, Flash::warning("scores must be whole numbers")),
            Redirect::to("/"),
        );
    };

    match state
        .app
        .result_record_use_case
        .record_result(MatchId(match_id), score1, score2)
        .await
    {
        Ok(m) => (
            set_flash(
                jar,
                Flash::success(format!("Match {} saved: {}-{}", m.match_number, score1, score2)),
            ),
            Redirect::to(&format!("/week/{}", m.week_number)),
        ),
        Err(e @ RecordResultError::MatchNotFound) => {
            (set_flash(jar, Flash::warning(e.to_string())), Redirect::to("/"))
        }
        Err(e) => (set_flash(jar, Flash::error(e.to_string())), Redirect::to("/")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(score1: &str, score2: &str) -> ScoreForm {
        ScoreForm {
            score1: score1.to_string(),
            score2: score2.to_string(),
        }
    }

    #[test]
    fn test_parse_scores() {
        assert_eq!(parse_scores(&form("3", " 1 ")), Some((3, 1)));
        assert_eq!(parse_scores(&form("-2", "0")), Some((-2, 0)));
        assert_eq!(parse_scores(&form("2.5", "1")), None);
        assert_eq!(parse_scores(&form("", "1")), None);
        assert_eq!(parse_scores(&form("x", "1")), None);
    }
}
