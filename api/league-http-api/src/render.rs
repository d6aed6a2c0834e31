use std::fmt::Write;

use axum::response::Html;
use league_app::{domain::standings::StandingRow, workflow::week::MatchView};

use crate::flash::Flash;

const STYLE: &str = "body{font-family:sans-serif;margin:2rem auto;max-width:60rem}\
table{border-collapse:collapse;margin-bottom:1.5rem}\
th,td{border:1px solid #ccc;padding:.3rem .6rem;text-align:center}\
.flash{padding:.6rem;margin-bottom:1rem;border-radius:4px}\
.success{background:#d4edda}.warning{background:#fff3cd}.error{background:#f8d7da}\
nav a{margin-right:1rem}input[type=number]{width:3.5rem}";

pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn page(league_name: &str, title: &str, flash: Option<Flash>, body: &str) -> Html<String> {
    let flash = flash
        .map(|f| {
            format!(
                "<div class=\"flash {}\">{}</div>",
                f.css_class(),
                escape(&f.message)
            )
        })
        .unwrap_or_default();
    Html(format!(
        "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><title>{title} - {league}</title><style>{STYLE}</style></head>\
<body><nav><a href=\"/\">Home</a><a href=\"/manage_players\">Players</a><a href=\"/standings\">Standings</a><a href=\"/season_history\">Seasons</a></nav>\
<h1>{title}</h1>{flash}{body}</body></html>",
        title = escape(title),
        league = escape(league_name),
    ))
}

pub fn standings_table(caption: &str, rows: &[StandingRow]) -> String {
    let mut html = format!(
        "<table><caption>{}</caption><tr><th>#</th><th>Player</th><th>MP</th><th>W</th><th>D</th><th>L</th><th>GF</th><th>GA</th><th>GD</th><th>Avg</th><th>Pts</th></tr>",
        escape(caption)
    );
    for (rank, row) in rows.iter().enumerate() {
        let _ = write!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{:+}</td><td>{:.2}</td><td><strong>{}</strong></td></tr>",
            rank + 1,
            escape(&row.player_name),
            row.matches_played,
            row.wins,
            row.draws,
            row.losses,
            row.goals_for,
            row.goals_against,
            row.goal_difference,
            row.goal_average,
            row.points
        );
    }
    html.push_str("</table>");
    html
}

/// Match list with one score form per match.
pub fn matches_table(matches: &[MatchView]) -> String {
    if matches.is_empty() {
        return "<p>No matches scheduled for this week yet.</p>".to_string();
    }
    let mut html = String::from(
        "<table><tr><th>#</th><th>Home</th><th>Score</th><th>Away</th><th>Winner</th></tr>",
    );
    for m in matches {
        let score = |s: Option<i64>| s.map(|v| v.to_string()).unwrap_or_default();
        let winner = if !m.is_completed {
            String::new()
        } else {
            m.winner_name
                .as_deref()
                .map(escape)
                .unwrap_or_else(|| "Draw".to_string())
        };
        let _ = write!(
            html,
            "<tr><td>{num}</td><td>{p1}</td><td><form method=\"post\" action=\"/update_match/{id}\">\
<input type=\"number\" name=\"score1\" value=\"{s1}\" required> - \
<input type=\"number\" name=\"score2\" value=\"{s2}\" required> \
<button type=\"submit\">Save</button></form></td><td>{p2}</td><td>{winner}</td></tr>",
            num = m.match_number,
            p1 = escape(&m.player1_name),
            p2 = escape(&m.player2_name),
            id = m.id,
            s1 = score(m.player1_score),
            s2 = score(m.player2_score),
        );
    }
    html.push_str("</table>");
    html
}
