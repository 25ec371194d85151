//! Row shapes as stored in SQLite and their conversion into domain records.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sqlx::FromRow;
use types::{
    Match, MatchId, MatchResult, Player, PlayerId, PlayerStats, PublishedStanding, Team, TeamId,
    User, UserId,
};

use crate::DatabaseError;

#[derive(Debug, Clone, FromRow)]
pub struct TeamRow {
    pub id: String,
    pub name: String,
    pub logo: String,
    pub coach: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<TeamRow> for Team {
    fn from(row: TeamRow) -> Self {
        Team {
            id: TeamId::new(row.id),
            name: row.name,
            logo: row.logo,
            coach: row.coach,
            description: row.description,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct PlayerRow {
    pub id: String,
    pub name: String,
    pub team_id: String,
    pub position: String,
    pub goals: i64,
    pub assists: i64,
    pub fouls: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<PlayerRow> for Player {
    type Error = DatabaseError;

    fn try_from(row: PlayerRow) -> Result<Self, Self::Error> {
        let position = row
            .position
            .parse()
            .map_err(|reason: String| DatabaseError::invalid("players", &row.id, reason))?;
        let stats = PlayerStats {
            goals: count("players", &row.id, "goals", row.goals)?,
            assists: count("players", &row.id, "assists", row.assists)?,
            fouls: count("players", &row.id, "fouls", row.fouls)?,
        };
        Ok(Player {
            id: PlayerId::new(row.id),
            name: row.name,
            team_id: TeamId::new(row.team_id),
            position,
            stats,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct MatchRow {
    pub id: String,
    pub home_team_id: String,
    pub away_team_id: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub venue: String,
    pub status: String,
    pub home_score: Option<i64>,
    pub away_score: Option<i64>,
    /// JSON array of player ids.
    pub scorers: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<MatchRow> for Match {
    type Error = DatabaseError;

    fn try_from(row: MatchRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse()
            .map_err(|reason: String| DatabaseError::invalid("matches", &row.id, reason))?;
        let result = match (row.home_score, row.away_score) {
            (Some(home), Some(away)) => {
                let scorers: Vec<PlayerId> = match &row.scorers {
                    Some(json) => serde_json::from_str(json).map_err(|e| {
                        DatabaseError::invalid("matches", &row.id, format!("scorers: {e}"))
                    })?,
                    None => Vec::new(),
                };
                Some(MatchResult::new(
                    count("matches", &row.id, "home_score", home)?,
                    count("matches", &row.id, "away_score", away)?,
                    scorers,
                ))
            }
            (None, None) => None,
            _ => {
                return Err(DatabaseError::invalid(
                    "matches",
                    &row.id,
                    "only one side has a score",
                ))
            }
        };
        Ok(Match {
            id: MatchId::new(row.id),
            home_team_id: TeamId::new(row.home_team_id),
            away_team_id: TeamId::new(row.away_team_id),
            date: row.date,
            time: row.time,
            venue: row.venue,
            status,
            result,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub team_id: Option<String>,
    pub player_id: Option<String>,
}

impl TryFrom<UserRow> for User {
    type Error = DatabaseError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role = row
            .role
            .parse()
            .map_err(|reason: String| DatabaseError::invalid("users", &row.id, reason))?;
        Ok(User {
            id: UserId::new(row.id),
            name: row.name,
            email: row.email,
            role,
            team_id: row.team_id.map(TeamId::new),
            player_id: row.player_id.map(PlayerId::new),
        })
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct PublishedStandingRow {
    pub team_id: String,
    pub team_name: String,
    pub played: i64,
    pub won: i64,
    pub drawn: i64,
    pub lost: i64,
    pub goals_for: i64,
    pub goals_against: i64,
    pub goal_difference: i64,
    pub points: i64,
}

impl TryFrom<PublishedStandingRow> for PublishedStanding {
    type Error = DatabaseError;

    fn try_from(row: PublishedStandingRow) -> Result<Self, Self::Error> {
        let table = "published_standings";
        let id = row.team_id.as_str();
        Ok(PublishedStanding {
            played: count(table, id, "played", row.played)?,
            won: count(table, id, "won", row.won)?,
            drawn: count(table, id, "drawn", row.drawn)?,
            lost: count(table, id, "lost", row.lost)?,
            goals_for: count(table, id, "goals_for", row.goals_for)?,
            goals_against: count(table, id, "goals_against", row.goals_against)?,
            goal_difference: row.goal_difference,
            points: count(table, id, "points", row.points)?,
            team_id: TeamId::new(row.team_id.clone()),
            team_name: row.team_name,
        })
    }
}

fn count(table: &'static str, id: &str, column: &str, value: i64) -> Result<u32, DatabaseError> {
    u32::try_from(value)
        .map_err(|_| DatabaseError::invalid(table, id, format!("{column} is {value}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::{MatchStatus, Position};

    fn match_row() -> MatchRow {
        MatchRow {
            id: "match-1".to_string(),
            home_team_id: "team-1".to_string(),
            away_team_id: "team-2".to_string(),
            date: NaiveDate::from_ymd_opt(2023, 9, 15).unwrap(),
            time: NaiveTime::from_hms_opt(20, 0, 0).unwrap(),
            venue: "Camp Nou".to_string(),
            status: "completed".to_string(),
            home_score: Some(2),
            away_score: Some(1),
            scorers: Some(r#"["player-1","player-1","player-3"]"#.to_string()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn match_rows_decode_scores_and_scorers() {
        let m = Match::try_from(match_row()).unwrap();
        assert_eq!(m.status, MatchStatus::Completed);
        let result = m.result.unwrap();
        assert_eq!((result.home_score, result.away_score), (2, 1));
        assert_eq!(result.goals_by(&PlayerId::new("player-1")), 2);
    }

    #[test]
    fn malformed_match_rows_are_reported() {
        let mut half_scored = match_row();
        half_scored.away_score = None;
        assert!(matches!(
            Match::try_from(half_scored),
            Err(DatabaseError::InvalidRecord { table: "matches", .. })
        ));

        let mut negative = match_row();
        negative.home_score = Some(-1);
        let err = Match::try_from(negative).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid matches record match-1: home_score is -1"
        );

        let mut bad_status = match_row();
        bad_status.status = "postponed".to_string();
        assert!(Match::try_from(bad_status).is_err());
    }

    #[test]
    fn player_rows_parse_position() {
        let row = PlayerRow {
            id: "player-9".to_string(),
            name: "Keeper".to_string(),
            team_id: "team-1".to_string(),
            position: "Goalkeeper".to_string(),
            goals: 0,
            assists: 1,
            fouls: 2,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let player = Player::try_from(row).unwrap();
        assert_eq!(player.position, Position::Goalkeeper);
        assert_eq!(player.stats.fouls, 2);
    }
}
