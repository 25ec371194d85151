use types::{Match, Team, TeamId, TeamStanding, UNKNOWN_TEAM};

use crate::ranking::{rank, RankedStanding};

/// Build one standing row per team that appears in at least one completed
/// match with a result. Rows come out in order of first appearance; use
/// [`rank`] or [`crate::rank_by`] to order them.
///
/// Goals for and against are taken from the score fields only. The scorer
/// list plays no part here.
pub fn compute_standings(teams: &[Team], matches: &[Match]) -> Vec<TeamStanding> {
    let mut rows: Vec<TeamStanding> = Vec::new();
    let mut counted = 0;
    for m in matches {
        let Some(result) = m.counted_result() else {
            continue;
        };
        counted += 1;
        standing_for(&mut rows, teams, &m.home_team_id)
            .record(result.home_score, result.away_score);
        standing_for(&mut rows, teams, &m.away_team_id)
            .record(result.away_score, result.home_score);
    }
    log::debug!(
        "Computed {} standing rows from {counted} of {} matches",
        rows.len(),
        matches.len()
    );
    rows
}

/// Standings computed and ranked by the league order.
pub fn league_table(teams: &[Team], matches: &[Match]) -> Vec<RankedStanding> {
    rank(compute_standings(teams, matches))
}

/// The first `n` rows of an already ranked table.
pub fn top_teams(table: &[RankedStanding], n: usize) -> &[RankedStanding] {
    &table[..n.min(table.len())]
}

pub fn team_name<'t>(teams: &'t [Team], team_id: &TeamId) -> &'t str {
    teams
        .iter()
        .find(|team| &team.id == team_id)
        .map(|team| team.name.as_str())
        .unwrap_or(UNKNOWN_TEAM)
}

fn standing_for<'r>(
    rows: &'r mut Vec<TeamStanding>,
    teams: &[Team],
    team_id: &TeamId,
) -> &'r mut TeamStanding {
    let idx = match rows.iter().position(|row| &row.team_id == team_id) {
        Some(idx) => idx,
        None => {
            let name = team_name(teams, team_id);
            if name == UNKNOWN_TEAM {
                log::warn!("Match references unknown team {team_id}");
            }
            rows.push(TeamStanding::new(team_id.clone(), name.to_string()));
            rows.len() - 1
        }
    };
    &mut rows[idx]
}
