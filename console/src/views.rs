//! Plain-text rendering of service results.

use itertools::Itertools;
use standings::{Column, SortDirection};
use types::{Match, Team};

use crate::{
    forms::FormErrors,
    service::{
        AuditReport, Dashboard, MatchDetail, MatchSummary, PlayerDetail, PlayerSummary, SavedMatch,
        StandingsTable, TeamDetail,
    },
    session::Session,
};

/// Left-aligned text columns padded to the widest cell.
struct TextTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl TextTable {
    fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    fn with_labels(labels: &[&str]) -> Self {
        Self::new(labels.iter().map(|label| label.to_string()).collect())
    }

    fn row(&mut self, cells: Vec<String>) {
        self.rows.push(cells);
    }

    fn render(&self) -> String {
        let widths: Vec<usize> = (0..self.headers.len())
            .map(|col| {
                std::iter::once(&self.headers)
                    .chain(&self.rows)
                    .filter_map(|row| row.get(col))
                    .map(|cell| cell.chars().count())
                    .max()
                    .unwrap_or(0)
            })
            .collect();
        let line = |cells: &Vec<String>| {
            cells
                .iter()
                .zip(&widths)
                .map(|(cell, &width)| format!("{cell:<width$}"))
                .join("  ")
                .trim_end()
                .to_string()
        };
        std::iter::once(line(&self.headers))
            .chain(self.rows.iter().map(line))
            .join("\n")
    }
}

/// Goal difference with an explicit sign when positive.
pub fn signed(value: i64) -> String {
    if value > 0 {
        format!("+{value}")
    } else {
        value.to_string()
    }
}

fn score(m: &Match) -> String {
    m.result
        .as_ref()
        .map_or_else(|| "vs".to_string(), |result| result.to_string())
}

fn fixture_line(summary: &MatchSummary) -> String {
    let m = &summary.fixture;
    format!(
        "{} {}  {} {} {}  @ {} [{}]",
        m.date,
        m.time.format("%H:%M"),
        summary.home_team_name,
        score(m),
        summary.away_team_name,
        m.venue,
        m.status.label()
    )
}

pub fn render_session(session: &Session) -> String {
    let user = session.user();
    format!("{} <{}> ({})", user.name, user.email, user.role)
}

pub fn render_teams(teams: &[Team]) -> String {
    if teams.is_empty() {
        return "No teams found.".to_string();
    }
    let mut table = TextTable::with_labels(&["ID", "Team", "Coach"]);
    for team in teams {
        table.row(vec![team.id.to_string(), team.name.clone(), team.coach.clone()]);
    }
    table.render()
}

pub fn render_team_detail(detail: &TeamDetail) -> String {
    let team = &detail.team;
    let mut out = vec![
        format!("{} ({})", team.name, team.id),
        format!("Coach: {}", team.coach),
        format!("Logo: {}", team.logo),
        team.description.clone(),
    ];
    if let Some(row) = &detail.standing {
        let s = &row.standing;
        out.push(format!(
            "Position {}: P{} W{} D{} L{}  GD {}  {} pts",
            row.position,
            s.played,
            s.won,
            s.drawn,
            s.lost,
            signed(row.goal_difference),
            row.points
        ));
    }
    out.push(String::new());
    out.push(format!("Players ({})", detail.players.len()));
    out.extend(
        detail
            .players
            .iter()
            .map(|p| format!("  {} - {} ({} goals)", p.name, p.position, p.stats.goals)),
    );
    out.push(String::new());
    out.push(format!("Matches ({})", detail.matches.len()));
    out.extend(detail.matches.iter().map(|m| format!("  {}", fixture_line(m))));
    out.join("\n")
}

pub fn render_players(players: &[PlayerSummary]) -> String {
    if players.is_empty() {
        return "No players found.".to_string();
    }
    let mut table = TextTable::with_labels(&["ID", "Player", "Team", "Position", "G", "A", "F"]);
    for summary in players {
        let p = &summary.player;
        table.row(vec![
            p.id.to_string(),
            p.name.clone(),
            summary.team_name.clone(),
            p.position.to_string(),
            p.stats.goals.to_string(),
            p.stats.assists.to_string(),
            p.stats.fouls.to_string(),
        ]);
    }
    table.render()
}

fn average(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.2}"))
}

pub fn render_player_detail(detail: &PlayerDetail) -> String {
    let p = &detail.summary.player;
    let mut out = vec![
        format!("{} ({})", p.name, p.id),
        format!("{} for {}", p.position, detail.summary.team_name),
        format!(
            "Goals {}  Assists {}  Fouls {}  Contributions {}",
            p.stats.goals, p.stats.assists, p.stats.fouls, detail.goal_contributions
        ),
        format!("Share of team goals: {}%", detail.goal_share),
        format!(
            "Per match: {} goals, {} assists",
            average(detail.goals_per_match),
            average(detail.assists_per_match)
        ),
        String::new(),
    ];
    if detail.matches.is_empty() {
        out.push("No matches for this team yet.".to_string());
        return out.join("\n");
    }
    let mut table = TextTable::with_labels(&["Date", "Opponent", "Side", "Score", "Goals"]);
    for m in &detail.matches {
        table.row(vec![
            m.line.date.to_string(),
            m.opponent_name.clone(),
            m.line.side.to_string(),
            m.line
                .score
                .map_or_else(|| m.line.status.label().to_string(), |(f, a)| format!("{f} - {a}")),
            m.line.goals.to_string(),
        ]);
    }
    out.push(table.render());
    out.join("\n")
}

pub fn render_matches(matches: &[MatchSummary]) -> String {
    if matches.is_empty() {
        return "No matches found.".to_string();
    }
    let mut table = TextTable::with_labels(&["ID", "Date", "Time", "Home", "Score", "Away", "Venue", "Status"]);
    for summary in matches {
        let m = &summary.fixture;
        table.row(vec![
            m.id.to_string(),
            m.date.to_string(),
            m.time.format("%H:%M").to_string(),
            summary.home_team_name.clone(),
            score(m),
            summary.away_team_name.clone(),
            m.venue.clone(),
            m.status.label().to_string(),
        ]);
    }
    table.render()
}

pub fn render_match_detail(detail: &MatchDetail) -> String {
    let mut out = vec![fixture_line(&detail.summary)];
    if !detail.scorers.is_empty() {
        out.push("Scorers:".to_string());
        for scorer in &detail.scorers {
            let side = scorer
                .side
                .map_or_else(|| "?".to_string(), |side| side.to_string());
            out.push(format!("  {} ({side}) x{}", scorer.player_name, scorer.goals));
        }
    }
    for issue in &detail.issues {
        out.push(format!("! {issue}"));
    }
    out.join("\n")
}

pub fn render_saved_match(saved: &SavedMatch) -> String {
    let m = &saved.fixture;
    let mut out = vec![format!("Saved {} ({}, {})", m.id, m.status.label(), score(m))];
    out.extend(saved.issues.iter().map(|issue| format!("! {issue}")));
    out.join("\n")
}

fn header(label: &str, column: Column, table: &StandingsTable) -> String {
    if table.order.key != column {
        return label.to_string();
    }
    match table.order.direction {
        SortDirection::Ascending => format!("{label}^"),
        SortDirection::Descending => format!("{label}v"),
    }
}

/// League table. Rows inside the highlight band are starred; rows level with
/// the row above under the active order are marked `=`.
pub fn render_standings(table: &StandingsTable) -> String {
    if table.rows.is_empty() {
        return "No completed matches yet.".to_string();
    }
    let mut text = TextTable::new(vec![
        String::new(),
        "Pos".to_string(),
        "Team".to_string(),
        header("P", Column::Played, table),
        header("W", Column::Won, table),
        header("D", Column::Drawn, table),
        header("L", Column::Lost, table),
        header("GF", Column::GoalsFor, table),
        header("GA", Column::GoalsAgainst, table),
        header("GD", Column::GoalDifference, table),
        header("Pts", Column::Points, table),
    ]);
    for row in &table.rows {
        let s = &row.standing;
        let marker = if row.position <= table.highlight_top { "*" } else { "" };
        let position = if row.tied {
            format!("{}=", row.position)
        } else {
            row.position.to_string()
        };
        text.row(vec![
            marker.to_string(),
            position,
            s.team_name.clone(),
            s.played.to_string(),
            s.won.to_string(),
            s.drawn.to_string(),
            s.lost.to_string(),
            s.goals_for.to_string(),
            s.goals_against.to_string(),
            signed(row.goal_difference),
            row.points.to_string(),
        ]);
    }
    text.render()
}

pub fn render_dashboard(dashboard: &Dashboard) -> String {
    let counts = &dashboard.counts;
    let mut out = vec![
        format!("Welcome, {} ({})", dashboard.user_name, dashboard.role),
        format!(
            "Teams {}  Players {}  Matches {}  Teams in league {}",
            counts.teams, counts.players, counts.matches, counts.teams_in_league
        ),
    ];

    if let Some(form) = &dashboard.my_form {
        out.push(String::new());
        out.push(format!("Your recent matches ({})", form.player.player.name));
        if form.recent.is_empty() {
            out.push("  No completed matches yet.".to_string());
        }
        for recent in &form.recent {
            let goals = match recent.goals {
                0 => String::new(),
                1 => "  1 goal".to_string(),
                n => format!("  {n} goals"),
            };
            out.push(format!(
                "  {} ({}){goals}",
                fixture_line(&recent.summary),
                recent.side
            ));
        }
    }

    out.push(String::new());
    out.push("Upcoming matches".to_string());
    if dashboard.upcoming.is_empty() {
        out.push("  No upcoming matches scheduled.".to_string());
    }
    out.extend(dashboard.upcoming.iter().map(|m| format!("  {}", fixture_line(m))));

    out.push(String::new());
    out.push("Top teams".to_string());
    out.extend(dashboard.top_teams.iter().map(|row| {
        format!(
            "  {}. {}  {} pts  GD {}",
            row.position,
            row.standing.team_name,
            row.points,
            signed(row.goal_difference)
        )
    }));

    out.push(String::new());
    out.push("Top scorers".to_string());
    out.extend(dashboard.top_scorers.iter().enumerate().map(|(idx, s)| {
        format!(
            "  {}. {} ({}, {})  {} goals",
            idx + 1,
            s.player.name,
            s.team_name,
            s.player.position,
            s.player.stats.goals
        )
    }));
    out.join("\n")
}

pub fn render_audit(report: &AuditReport) -> String {
    if report.is_clean() {
        return "No inconsistencies found.".to_string();
    }
    let mut out = Vec::new();
    let sections = [
        ("Match results", report.match_issues.iter().map(ToString::to_string).collect_vec()),
        ("Published table", report.table_issues.iter().map(ToString::to_string).collect_vec()),
        (
            "Published vs derived",
            report.discrepancies.iter().map(ToString::to_string).collect_vec(),
        ),
    ];
    for (title, lines) in sections {
        if lines.is_empty() {
            continue;
        }
        out.push(format!("{title} ({})", lines.len()));
        out.extend(lines.into_iter().map(|line| format!("  {line}")));
    }
    out.join("\n")
}

pub fn render_form_errors(errors: &FormErrors) -> String {
    errors
        .iter()
        .map(|error| format!("  {}: {}", error.field, error.message))
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use standings::{rank, StandingsOrder};
    use types::{TeamId, TeamStanding};

    fn standing(id: &str, won: u32, drawn: u32, lost: u32, gf: u32, ga: u32) -> TeamStanding {
        let mut row = TeamStanding::new(TeamId::new(id), id.to_string());
        for _ in 0..won {
            row.record(1, 0);
        }
        for _ in 0..drawn {
            row.record(0, 0);
        }
        for _ in 0..lost {
            row.record(0, 1);
        }
        row.goals_for = gf;
        row.goals_against = ga;
        row
    }

    #[test]
    fn goal_difference_is_signed() {
        assert_eq!(signed(5), "+5");
        assert_eq!(signed(0), "0");
        assert_eq!(signed(-3), "-3");
    }

    #[test]
    fn standings_mark_highlights_and_ties() {
        let table = StandingsTable {
            order: StandingsOrder::default(),
            highlight_top: 1,
            rows: rank(vec![
                standing("Alpha", 2, 0, 0, 5, 1),
                standing("Beta", 0, 1, 1, 1, 2),
                standing("Gamma", 0, 1, 1, 1, 2),
            ]),
        };
        let text = render_standings(&table);
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].contains("Ptsv"));
        assert!(lines[1].starts_with('*'));
        assert!(lines[1].contains("+4"));
        assert!(!lines[2].starts_with('*'));
        assert!(lines[3].contains("3="));
    }

    #[test]
    fn columns_are_aligned() {
        let mut table = TextTable::with_labels(&["A", "B"]);
        table.row(vec!["long cell".to_string(), "x".to_string()]);
        assert_eq!(table.render(), "A          B\nlong cell  x");
    }
}
