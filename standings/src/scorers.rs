use std::cmp::Reverse;

use chrono::NaiveDate;
use itertools::Itertools;
use serde::Serialize;
use types::{Match, MatchId, MatchResult, MatchStatus, Player, PlayerId, Side, Team, TeamId};

/// Goals credited to a player by one result: the number of times the
/// player's id appears in the scorer list.
pub fn goals_in_match(result: &MatchResult, player_id: &PlayerId) -> usize {
    result.goals_by(player_id)
}

/// Scorer list folded into `(player, goals)` pairs, in order of each
/// player's first goal.
pub fn scorer_tally(result: &MatchResult) -> Vec<(PlayerId, usize)> {
    result
        .scorers
        .iter()
        .unique()
        .map(|player_id| (player_id.clone(), result.goals_by(player_id)))
        .collect()
}

/// Goals a player is credited with across the counted matches in `matches`.
pub fn goals_across(player_id: &PlayerId, matches: &[Match]) -> usize {
    matches
        .iter()
        .filter_map(Match::counted_result)
        .map(|result| result.goals_by(player_id))
        .sum()
}

/// Scorer list split by the side each scorer plays for.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SideGoals {
    pub home: usize,
    pub away: usize,
    /// Scorers that are unknown or play for neither team, one entry per goal.
    pub unattributed: Vec<PlayerId>,
}

impl SideGoals {
    pub fn for_side(&self, side: Side) -> usize {
        match side {
            Side::Home => self.home,
            Side::Away => self.away,
        }
    }
}

/// Attribute each scorer entry to a side through the scorer's current team.
/// `None` when the match carries no result.
pub fn attribute_goals(m: &Match, players: &[Player]) -> Option<SideGoals> {
    let result = m.result.as_ref()?;
    let mut goals = SideGoals::default();
    for scorer in &result.scorers {
        let side = players
            .iter()
            .find(|player| &player.id == scorer)
            .and_then(|player| m.side_of(&player.team_id));
        match side {
            Some(Side::Home) => goals.home += 1,
            Some(Side::Away) => goals.away += 1,
            None => goals.unattributed.push(scorer.clone()),
        }
    }
    Some(goals)
}

/// Share of the team's season goals scored by `player`, as a whole
/// percentage rounded half up. Zero when the player's team is unknown or the
/// team has no goals.
pub fn team_goal_share(player: &Player, teams: &[Team], players: &[Player]) -> u32 {
    if !teams.iter().any(|team| team.id == player.team_id) {
        return 0;
    }
    let team_total: u64 = players
        .iter()
        .filter(|p| p.plays_for(&player.team_id))
        .map(|p| u64::from(p.stats.goals))
        .sum();
    if team_total == 0 {
        return 0;
    }
    (f64::from(player.stats.goals) / team_total as f64 * 100.0).round() as u32
}

/// One line of a player's match history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PlayerMatchLine {
    pub match_id: MatchId,
    pub date: NaiveDate,
    pub side: Side,
    pub opponent_id: TeamId,
    pub status: MatchStatus,
    /// `(for, against)` from the player's side, for counted results only.
    pub score: Option<(u32, u32)>,
    pub goals: usize,
}

/// Every match involving the player's team, oldest first.
pub fn player_match_log(player: &Player, matches: &[Match]) -> Vec<PlayerMatchLine> {
    matches
        .iter()
        .filter_map(|m| {
            let side = m.side_of(&player.team_id)?;
            let opponent_id = m.opponent_of(&player.team_id)?.clone();
            let result = m.counted_result();
            let score = result.map(|r| {
                let against = match side {
                    Side::Home => Side::Away,
                    Side::Away => Side::Home,
                };
                (r.score_for(side), r.score_for(against))
            });
            Some(PlayerMatchLine {
                match_id: m.id.clone(),
                date: m.date,
                side,
                opponent_id,
                status: m.status,
                score,
                goals: result.map_or(0, |r| r.goals_by(&player.id)),
            })
        })
        .sorted_by_key(|line| line.date)
        .collect()
}

/// `total / matches`, or `None` when no matches were played.
pub fn per_match_average(total: u32, matches: usize) -> Option<f64> {
    if matches == 0 {
        None
    } else {
        Some(f64::from(total) / matches as f64)
    }
}

/// Players ordered by season goals, most first; equal tallies keep input order.
pub fn top_scorers(players: &[Player], n: usize) -> Vec<&Player> {
    players
        .iter()
        .sorted_by_key(|player| Reverse(player.stats.goals))
        .take(n)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveTime, Utc};
    use types::{PlayerStats, Position};

    fn player(id: &str, team: &str, goals: u32) -> Player {
        Player {
            id: PlayerId::new(id),
            name: id.to_string(),
            team_id: TeamId::new(team),
            position: Position::Forward,
            stats: PlayerStats {
                goals,
                assists: 0,
                fouls: 0,
            },
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn team(id: &str) -> Team {
        Team {
            id: TeamId::new(id),
            name: id.to_string(),
            logo: String::new(),
            coach: String::new(),
            description: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn ids(raw: &[&str]) -> Vec<PlayerId> {
        raw.iter().map(|id| PlayerId::new(*id)).collect()
    }

    fn completed(id: &str, home: &str, away: &str, day: u32, h: u32, a: u32, scorers: &[&str]) -> Match {
        Match {
            id: MatchId::new(id),
            home_team_id: TeamId::new(home),
            away_team_id: TeamId::new(away),
            date: NaiveDate::from_ymd_opt(2023, 10, day).unwrap(),
            time: NaiveTime::from_hms_opt(20, 0, 0).unwrap(),
            venue: "Ground".to_string(),
            status: MatchStatus::Completed,
            result: Some(MatchResult::new(h, a, ids(scorers))),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn tally_keeps_first_goal_order() {
        let result = MatchResult::new(3, 1, ids(&["p2", "p1", "p2", "p3"]));
        assert_eq!(
            scorer_tally(&result),
            vec![
                (PlayerId::new("p2"), 2),
                (PlayerId::new("p1"), 1),
                (PlayerId::new("p3"), 1),
            ]
        );
        assert_eq!(goals_in_match(&result, &PlayerId::new("p2")), 2);
    }

    #[test]
    fn goal_share_rounds_and_handles_empty_teams() {
        let players = vec![player("a", "t1", 35), player("b", "t1", 2), player("c", "t2", 0)];
        let teams = vec![team("t1"), team("t2")];
        assert_eq!(team_goal_share(&players[0], &teams, &players), 95);
        assert_eq!(team_goal_share(&players[1], &teams, &players), 5);
        assert_eq!(team_goal_share(&players[2], &teams, &players), 0);

        let orphan = player("d", "gone", 10);
        assert_eq!(team_goal_share(&orphan, &teams, &players), 0);
    }

    #[test]
    fn goal_share_survives_huge_team_totals() {
        let players = vec![player("a", "t1", 3_000_000_000), player("b", "t1", 3_000_000_000)];
        let teams = vec![team("t1")];
        assert_eq!(team_goal_share(&players[0], &teams, &players), 50);
    }

    #[test]
    fn match_log_follows_the_players_team() {
        let p = player("p1", "t1", 0);
        let mut scheduled = completed("m3", "t3", "t1", 20, 0, 0, &[]);
        scheduled.status = MatchStatus::Scheduled;
        scheduled.result = None;
        let matches = vec![
            scheduled,
            completed("m1", "t1", "t2", 1, 3, 2, &["p1", "p1", "x"]),
            completed("m2", "t2", "t3", 5, 1, 0, &["y"]),
        ];

        let log = player_match_log(&p, &matches);
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].match_id, MatchId::new("m1"));
        assert_eq!(log[0].score, Some((3, 2)));
        assert_eq!(log[0].goals, 2);
        assert_eq!(log[1].side, Side::Away);
        assert_eq!(log[1].score, None);
        assert_eq!(goals_across(&p.id, &matches), 2);
    }

    #[test]
    fn averages_and_top_scorers() {
        assert_eq!(per_match_average(7, 2), Some(3.5));
        assert_eq!(per_match_average(7, 0), None);

        let players = vec![player("a", "t", 3), player("b", "t", 9), player("c", "t", 3)];
        let top: Vec<_> = top_scorers(&players, 2).iter().map(|p| p.id.as_str()).collect();
        assert_eq!(top, vec!["b", "a"]);
    }
}
