//! Consistency checks over authored data. Nothing here rejects a record:
//! the checks report what they find and leave the decision to the caller.

use std::fmt::Display;

use serde::Serialize;
use types::{
    Match, MatchId, MatchStatus, Player, PlayerId, PublishedStanding, Side, TeamId, TeamStanding,
    POINTS_FOR_DRAW, POINTS_FOR_WIN,
};

use crate::{ranking::Column, scorers::attribute_goals};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResultIssue {
    SameTeams {
        match_id: MatchId,
    },
    CompletedWithoutResult {
        match_id: MatchId,
    },
    ResultOnOpenMatch {
        match_id: MatchId,
        status: MatchStatus,
    },
    /// Scorer entries attributed to a side do not add up to its score.
    ScoreMismatch {
        match_id: MatchId,
        side: Side,
        recorded: u32,
        attributed: usize,
    },
    UnknownScorer {
        match_id: MatchId,
        player_id: PlayerId,
    },
    /// Scorer exists but plays for neither team in the match.
    ScorerNotInMatch {
        match_id: MatchId,
        player_id: PlayerId,
        team_id: TeamId,
    },
}

impl Display for ResultIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResultIssue::SameTeams { match_id } => {
                write!(f, "{match_id}: home and away team are the same")
            }
            ResultIssue::CompletedWithoutResult { match_id } => {
                write!(f, "{match_id}: completed but has no result")
            }
            ResultIssue::ResultOnOpenMatch { match_id, status } => {
                write!(f, "{match_id}: has a result but status is {status}")
            }
            ResultIssue::ScoreMismatch {
                match_id,
                side,
                recorded,
                attributed,
            } => write!(
                f,
                "{match_id}: {side} score is {recorded} but scorers account for {attributed}"
            ),
            ResultIssue::UnknownScorer {
                match_id,
                player_id,
            } => write!(f, "{match_id}: scorer {player_id} is not a known player"),
            ResultIssue::ScorerNotInMatch {
                match_id,
                player_id,
                team_id,
            } => write!(
                f,
                "{match_id}: scorer {player_id} plays for {team_id}, which is not in this match"
            ),
        }
    }
}

/// Check one match for status/result and score/scorer agreement.
pub fn check_match(m: &Match, players: &[Player]) -> Vec<ResultIssue> {
    let mut issues = Vec::new();
    let match_id = || m.id.clone();

    if m.home_team_id == m.away_team_id {
        issues.push(ResultIssue::SameTeams {
            match_id: match_id(),
        });
    }
    match (m.status, &m.result) {
        (MatchStatus::Completed, None) => issues.push(ResultIssue::CompletedWithoutResult {
            match_id: match_id(),
        }),
        (status, Some(_)) if status != MatchStatus::Completed => {
            issues.push(ResultIssue::ResultOnOpenMatch {
                match_id: match_id(),
                status,
            })
        }
        _ => {}
    }

    let Some(result) = &m.result else {
        return issues;
    };
    for scorer in &result.scorers {
        match players.iter().find(|player| &player.id == scorer) {
            None => issues.push(ResultIssue::UnknownScorer {
                match_id: match_id(),
                player_id: scorer.clone(),
            }),
            Some(player) if !m.involves(&player.team_id) => {
                issues.push(ResultIssue::ScorerNotInMatch {
                    match_id: match_id(),
                    player_id: scorer.clone(),
                    team_id: player.team_id.clone(),
                })
            }
            Some(_) => {}
        }
    }
    // An empty scorer list means scorers were not recorded.
    if result.scorers.is_empty() {
        return issues;
    }
    if let Some(goals) = attribute_goals(m, players) {
        for side in [Side::Home, Side::Away] {
            let recorded = result.score_for(side);
            let attributed = goals.for_side(side);
            if attributed != recorded as usize {
                issues.push(ResultIssue::ScoreMismatch {
                    match_id: match_id(),
                    side,
                    recorded,
                    attributed,
                });
            }
        }
    }
    issues
}

/// [`check_match`] over a set of matches, logging each finding.
pub fn check_matches(matches: &[Match], players: &[Player]) -> Vec<ResultIssue> {
    let issues: Vec<_> = matches
        .iter()
        .flat_map(|m| check_match(m, players))
        .collect();
    for issue in &issues {
        log::warn!("Inconsistent match data: {issue}");
    }
    issues
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TableIssue {
    GoalDifferenceColumn {
        team_id: TeamId,
        published: i64,
        computed: i64,
    },
    PointsColumn {
        team_id: TeamId,
        published: u32,
        computed: u64,
    },
    PlayedColumn {
        team_id: TeamId,
        published: u32,
        computed: u64,
    },
    /// Every decisive match produces exactly one win and one loss.
    WinsLossesMismatch { wins: u64, losses: u64 },
    /// Every drawn match produces two draws.
    OddDrawCount { draws: u64 },
    /// Every goal scored is a goal conceded by someone.
    GoalTotalsMismatch { goals_for: u64, goals_against: u64 },
}

impl Display for TableIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TableIssue::GoalDifferenceColumn {
                team_id,
                published,
                computed,
            } => write!(
                f,
                "{team_id}: goal difference column is {published}, goals give {computed}"
            ),
            TableIssue::PointsColumn {
                team_id,
                published,
                computed,
            } => write!(
                f,
                "{team_id}: points column is {published}, results give {computed}"
            ),
            TableIssue::PlayedColumn {
                team_id,
                published,
                computed,
            } => write!(
                f,
                "{team_id}: played column is {published}, results give {computed}"
            ),
            TableIssue::WinsLossesMismatch { wins, losses } => {
                write!(f, "table records {wins} wins but {losses} losses")
            }
            TableIssue::OddDrawCount { draws } => {
                write!(f, "table records an odd number of draws ({draws})")
            }
            TableIssue::GoalTotalsMismatch {
                goals_for,
                goals_against,
            } => write!(
                f,
                "table records {goals_for} goals scored but {goals_against} conceded"
            ),
        }
    }
}

/// Internal consistency of a published table: per-row derived columns and
/// league-wide balances that any real set of matches satisfies.
pub fn check_table(rows: &[PublishedStanding]) -> Vec<TableIssue> {
    let mut issues = Vec::new();
    for row in rows {
        let goal_difference = i64::from(row.goals_for) - i64::from(row.goals_against);
        if row.goal_difference != goal_difference {
            issues.push(TableIssue::GoalDifferenceColumn {
                team_id: row.team_id.clone(),
                published: row.goal_difference,
                computed: goal_difference,
            });
        }
        let points = u64::from(row.won) * u64::from(POINTS_FOR_WIN)
            + u64::from(row.drawn) * u64::from(POINTS_FOR_DRAW);
        if u64::from(row.points) != points {
            issues.push(TableIssue::PointsColumn {
                team_id: row.team_id.clone(),
                published: row.points,
                computed: points,
            });
        }
        let played = u64::from(row.won) + u64::from(row.drawn) + u64::from(row.lost);
        if u64::from(row.played) != played {
            issues.push(TableIssue::PlayedColumn {
                team_id: row.team_id.clone(),
                published: row.played,
                computed: played,
            });
        }
    }

    // Totals are summed in u64.
    let total = |column: fn(&PublishedStanding) -> u32| -> u64 {
        rows.iter().map(|row| u64::from(column(row))).sum()
    };
    let wins = total(|row| row.won);
    let losses = total(|row| row.lost);
    if wins != losses {
        issues.push(TableIssue::WinsLossesMismatch { wins, losses });
    }
    let draws = total(|row| row.drawn);
    if draws % 2 != 0 {
        issues.push(TableIssue::OddDrawCount { draws });
    }
    let goals_for = total(|row| row.goals_for);
    let goals_against = total(|row| row.goals_against);
    if goals_for != goals_against {
        issues.push(TableIssue::GoalTotalsMismatch {
            goals_for,
            goals_against,
        });
    }

    for issue in &issues {
        log::warn!("Inconsistent published table: {issue}");
    }
    issues
}

/// One column where a published row and the derived row disagree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Discrepancy {
    pub team_id: TeamId,
    pub column: Column,
    pub published: i64,
    pub derived: i64,
}

impl Display for Discrepancy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} published {}, derived {}",
            self.team_id, self.column, self.published, self.derived
        )
    }
}

/// Compare a published table to standings derived from matches. A team
/// missing on either side is compared against an empty row.
pub fn reconcile(published: &[PublishedStanding], derived: &[TeamStanding]) -> Vec<Discrepancy> {
    let mut team_ids: Vec<&TeamId> = published.iter().map(|row| &row.team_id).collect();
    for row in derived {
        if !team_ids.contains(&&row.team_id) {
            team_ids.push(&row.team_id);
        }
    }

    let mut discrepancies = Vec::new();
    for team_id in team_ids {
        let published_row = published.iter().find(|row| &row.team_id == team_id);
        let derived_row = derived
            .iter()
            .find(|row| &row.team_id == team_id)
            .cloned()
            .unwrap_or_else(|| TeamStanding::new(team_id.clone(), String::new()));
        for column in Column::ALL {
            let published_value = published_row.map_or(0, |row| published_value(column, row));
            let derived_value = column.value(&derived_row);
            if published_value != derived_value {
                discrepancies.push(Discrepancy {
                    team_id: team_id.clone(),
                    column,
                    published: published_value,
                    derived: derived_value,
                });
            }
        }
    }
    discrepancies
}

fn published_value(column: Column, row: &PublishedStanding) -> i64 {
    match column {
        Column::Points => i64::from(row.points),
        Column::Played => i64::from(row.played),
        Column::Won => i64::from(row.won),
        Column::Drawn => i64::from(row.drawn),
        Column::Lost => i64::from(row.lost),
        Column::GoalsFor => i64::from(row.goals_for),
        Column::GoalsAgainst => i64::from(row.goals_against),
        Column::GoalDifference => row.goal_difference,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[allow(clippy::too_many_arguments)]
    fn published(id: &str, w: u32, d: u32, l: u32, gf: u32, ga: u32, gd: i64, pts: u32) -> PublishedStanding {
        PublishedStanding {
            team_id: TeamId::new(id),
            team_name: id.to_string(),
            played: w.saturating_add(d).saturating_add(l),
            won: w,
            drawn: d,
            lost: l,
            goals_for: gf,
            goals_against: ga,
            goal_difference: gd,
            points: pts,
        }
    }

    #[test]
    fn consistent_table_has_no_issues() {
        let rows = vec![
            published("a", 1, 1, 0, 3, 1, 2, 4),
            published("b", 0, 1, 1, 1, 3, -2, 1),
        ];
        assert!(check_table(&rows).is_empty());
    }

    #[test]
    fn stored_columns_are_checked_against_their_inputs() {
        let rows = vec![
            published("a", 1, 0, 0, 2, 0, 3, 2),
            published("b", 0, 0, 1, 0, 2, -2, 0),
        ];
        let issues = check_table(&rows);
        assert_eq!(
            issues,
            vec![
                TableIssue::GoalDifferenceColumn {
                    team_id: TeamId::new("a"),
                    published: 3,
                    computed: 2,
                },
                TableIssue::PointsColumn {
                    team_id: TeamId::new("a"),
                    published: 2,
                    computed: 3,
                },
            ]
        );
    }

    #[test]
    fn league_totals_beyond_u32_are_still_compared() {
        let rows = vec![
            published("a", 3_000_000_000, 0, 0, 4_000_000_000, 0, 4_000_000_000, u32::MAX),
            published("b", 3_000_000_000, 0, 0, 4_000_000_000, 0, 4_000_000_000, u32::MAX),
            published("c", 0, 0, 3_000_000_000, 0, 4_000_000_000, -4_000_000_000, 0),
            published("d", 0, 0, 3_000_000_000, 0, 4_000_000_000, -4_000_000_000, 0),
        ];
        let issues = check_table(&rows);
        assert_eq!(
            issues,
            vec![
                TableIssue::PointsColumn {
                    team_id: TeamId::new("a"),
                    published: u32::MAX,
                    computed: 9_000_000_000,
                },
                TableIssue::PointsColumn {
                    team_id: TeamId::new("b"),
                    published: u32::MAX,
                    computed: 9_000_000_000,
                },
            ]
        );
    }

    #[test]
    fn reconcile_reports_only_differing_columns() {
        let published_rows = vec![published("a", 1, 0, 0, 2, 0, 2, 3)];
        let mut derived = TeamStanding::new(TeamId::new("a"), "a".to_string());
        derived.record(2, 1);

        let discrepancies = reconcile(&published_rows, &[derived]);
        let columns: Vec<Column> = discrepancies.iter().map(|d| d.column).collect();
        assert_eq!(columns, vec![Column::GoalsAgainst, Column::GoalDifference]);
        assert_eq!(discrepancies[1].published, 2);
        assert_eq!(discrepancies[1].derived, 1);
    }
}
