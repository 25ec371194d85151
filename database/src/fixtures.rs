//! The built-in league data set: four clubs, eight players, six fixtures,
//! three accounts and the published table that ships with them.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use types::{
    Match, MatchId, MatchResult, MatchStatus, Player, PlayerId, PlayerStats, Position,
    PublishedStanding, Team, TeamId, User, UserId, UserRole,
};

/// Everything a store holds, in insertion order.
#[derive(Clone, Debug, Default)]
pub struct LeagueData {
    pub teams: Vec<Team>,
    pub players: Vec<Player>,
    pub matches: Vec<Match>,
    pub users: Vec<User>,
    pub published_standings: Vec<PublishedStanding>,
}

impl LeagueData {
    pub fn fixtures() -> Self {
        Self {
            teams: teams(),
            players: players(),
            matches: matches(),
            users: users(),
            published_standings: published_standings(),
        }
    }
}

fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

fn team(id: &str, name: &str, logo: &str, coach: &str, description: &str, created: DateTime<Utc>, updated: DateTime<Utc>) -> Team {
    Team {
        id: TeamId::new(id),
        name: name.to_string(),
        logo: format!("https://images.pexels.com/photos/{logo}?auto=compress&cs=tinysrgb&w=1260&h=750&dpr=2"),
        coach: coach.to_string(),
        description: description.to_string(),
        created_at: created,
        updated_at: updated,
    }
}

fn teams() -> Vec<Team> {
    vec![
        team(
            "team-1",
            "Barcelona FC",
            "3621104/pexels-photo-3621104.jpeg",
            "John Smith",
            "One of the most successful teams in European football history.",
            at(2023, 1, 15),
            at(2023, 6, 20),
        ),
        team(
            "team-2",
            "Real Madrid",
            "274422/pexels-photo-274422.jpeg",
            "Carlos Ancelotti",
            "The most successful team in UEFA Champions League history.",
            at(2023, 1, 10),
            at(2023, 7, 5),
        ),
        team(
            "team-3",
            "Manchester United",
            "47730/the-ball-stadion-football-the-pitch-47730.jpeg",
            "Erik ten Hag",
            "One of the most popular football clubs in the world.",
            at(2023, 2, 5),
            at(2023, 8, 12),
        ),
        team(
            "team-4",
            "Liverpool FC",
            "46798/the-ball-stadion-football-the-pitch-46798.jpeg",
            "Jürgen Klopp",
            "Known for their passionate fans and rich history.",
            at(2023, 3, 20),
            at(2023, 9, 30),
        ),
    ]
}

fn player(
    id: &str,
    name: &str,
    team_id: &str,
    position: Position,
    (goals, assists, fouls): (u32, u32, u32),
    created: DateTime<Utc>,
    updated: DateTime<Utc>,
) -> Player {
    Player {
        id: PlayerId::new(id),
        name: name.to_string(),
        team_id: TeamId::new(team_id),
        position,
        stats: PlayerStats {
            goals,
            assists,
            fouls,
        },
        created_at: created,
        updated_at: updated,
    }
}

fn players() -> Vec<Player> {
    use Position::*;
    vec![
        player("player-1", "Lionel Messi", "team-1", Forward, (35, 14, 8), at(2023, 1, 20), at(2023, 10, 15)),
        player("player-2", "Sergio Busquets", "team-1", Midfielder, (2, 10, 15), at(2023, 1, 25), at(2023, 10, 20)),
        player("player-3", "Karim Benzema", "team-2", Forward, (22, 9, 12), at(2023, 2, 10), at(2023, 11, 5)),
        player("player-4", "Toni Kroos", "team-2", Midfielder, (3, 15, 10), at(2023, 2, 15), at(2023, 11, 10)),
        player("player-5", "Bruno Fernandes", "team-3", Midfielder, (18, 12, 14), at(2023, 3, 5), at(2023, 12, 1)),
        player("player-6", "Marcus Rashford", "team-3", Forward, (16, 7, 9), at(2023, 3, 10), at(2023, 12, 5)),
        player("player-7", "Mohamed Salah", "team-4", Forward, (28, 10, 7), at(2023, 4, 15), at(2023, 12, 15)),
        player("player-8", "Virgil van Dijk", "team-4", Defender, (4, 2, 18), at(2023, 4, 20), at(2023, 12, 20)),
    ]
}

#[allow(clippy::too_many_arguments)]
fn fixture(
    id: &str,
    home: &str,
    away: &str,
    (year, month, day): (i32, u32, u32),
    (hour, minute): (u32, u32),
    venue: &str,
    result: Option<(u32, u32, &[&str])>,
    created: DateTime<Utc>,
    updated: DateTime<Utc>,
) -> Match {
    Match {
        id: MatchId::new(id),
        home_team_id: TeamId::new(home),
        away_team_id: TeamId::new(away),
        date: NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default(),
        time: NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or_default(),
        venue: venue.to_string(),
        status: if result.is_some() {
            MatchStatus::Completed
        } else {
            MatchStatus::Scheduled
        },
        result: result.map(|(home_score, away_score, scorers)| {
            MatchResult::new(
                home_score,
                away_score,
                scorers.iter().copied().map(PlayerId::new).collect(),
            )
        }),
        created_at: created,
        updated_at: updated,
    }
}

fn matches() -> Vec<Match> {
    vec![
        fixture(
            "match-1",
            "team-1",
            "team-2",
            (2023, 9, 15),
            (20, 0),
            "Camp Nou",
            Some((3, 2, &["player-1", "player-1", "player-2", "player-3", "player-4"])),
            at(2023, 8, 10),
            at(2023, 9, 16),
        ),
        fixture(
            "match-2",
            "team-3",
            "team-4",
            (2023, 9, 20),
            (19, 30),
            "Old Trafford",
            Some((1, 2, &["player-5", "player-7", "player-7"])),
            at(2023, 8, 15),
            at(2023, 9, 21),
        ),
        fixture(
            "match-3",
            "team-1",
            "team-3",
            (2023, 10, 5),
            (20, 45),
            "Camp Nou",
            Some((4, 0, &["player-1", "player-1", "player-1", "player-2"])),
            at(2023, 9, 1),
            at(2023, 10, 6),
        ),
        fixture(
            "match-4",
            "team-2",
            "team-4",
            (2023, 10, 12),
            (21, 0),
            "Santiago Bernabeu",
            Some((2, 2, &["player-3", "player-4", "player-7", "player-8"])),
            at(2023, 9, 5),
            at(2023, 10, 13),
        ),
        fixture(
            "match-5",
            "team-4",
            "team-1",
            (2023, 11, 15),
            (19, 45),
            "Anfield",
            None,
            at(2023, 10, 1),
            at(2023, 10, 1),
        ),
        fixture(
            "match-6",
            "team-3",
            "team-2",
            (2023, 11, 22),
            (20, 0),
            "Old Trafford",
            None,
            at(2023, 10, 5),
            at(2023, 10, 5),
        ),
    ]
}

fn users() -> Vec<User> {
    vec![
        User {
            id: UserId::new("user-1"),
            name: "Admin User".to_string(),
            email: "admin@example.com".to_string(),
            role: UserRole::Admin,
            team_id: None,
            player_id: None,
        },
        User {
            id: UserId::new("user-2"),
            name: "Team Manager 1".to_string(),
            email: "manager1@example.com".to_string(),
            role: UserRole::Manager,
            team_id: Some(TeamId::new("team-1")),
            player_id: None,
        },
        User {
            id: UserId::new("user-3"),
            name: "Player 1".to_string(),
            email: "player1@example.com".to_string(),
            role: UserRole::Player,
            team_id: Some(TeamId::new("team-1")),
            player_id: Some(PlayerId::new("player-1")),
        },
    ]
}

fn published(id: &str, name: &str, (won, drawn, lost): (u32, u32, u32), (goals_for, goals_against): (u32, u32), goal_difference: i64, points: u32) -> PublishedStanding {
    PublishedStanding {
        team_id: TeamId::new(id),
        team_name: name.to_string(),
        played: won + drawn + lost,
        won,
        drawn,
        lost,
        goals_for,
        goals_against,
        goal_difference,
        points,
    }
}

/// The table as published alongside the fixtures. It does not balance and
/// cannot be reproduced from any set of results.
fn published_standings() -> Vec<PublishedStanding> {
    vec![
        published("team-1", "Barcelona FC", (2, 0, 1), (9, 5), 4, 6),
        published("team-2", "Real Madrid", (1, 1, 1), (6, 7), -1, 4),
        published("team-4", "Liverpool FC", (1, 1, 1), (6, 5), 1, 4),
        published("team-3", "Manchester United", (0, 0, 3), (1, 9), -8, 0),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixture_references_resolve() {
        let data = LeagueData::fixtures();
        for player in &data.players {
            assert!(data.teams.iter().any(|team| team.id == player.team_id));
        }
        for m in &data.matches {
            assert!(data.teams.iter().any(|team| team.id == m.home_team_id));
            assert!(data.teams.iter().any(|team| team.id == m.away_team_id));
            if let Some(result) = &m.result {
                let goals = (result.home_score + result.away_score) as usize;
                assert_eq!(result.scorers.len(), goals, "{}", m.id);
            }
        }
    }

    #[test]
    fn months_are_calendar_months() {
        let data = LeagueData::fixtures();
        assert_eq!(data.teams[0].created_at.to_rfc3339(), "2023-01-15T00:00:00+00:00");
        assert_eq!(data.matches[4].date.to_string(), "2023-11-15");
        assert_eq!(data.matches[4].status, MatchStatus::Scheduled);
    }
}
