use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{MatchId, PlayerId, TeamId};

/// Lifecycle of a match. Transitions are operator driven and not enforced:
/// `Scheduled -> InProgress -> Completed`, or `Cancelled` from anywhere.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

impl MatchStatus {
    pub const ALL: [MatchStatus; 4] = [
        MatchStatus::Scheduled,
        MatchStatus::InProgress,
        MatchStatus::Completed,
        MatchStatus::Cancelled,
    ];

    pub fn is_terminal(&self) -> bool {
        matches!(self, MatchStatus::Completed | MatchStatus::Cancelled)
    }

    pub fn label(&self) -> &'static str {
        match self {
            MatchStatus::Scheduled => "Scheduled",
            MatchStatus::InProgress => "In Progress",
            MatchStatus::Completed => "Completed",
            MatchStatus::Cancelled => "Cancelled",
        }
    }
}

impl Display for MatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchStatus::Scheduled => write!(f, "scheduled"),
            MatchStatus::InProgress => write!(f, "in_progress"),
            MatchStatus::Completed => write!(f, "completed"),
            MatchStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl FromStr for MatchStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MatchStatus::ALL
            .into_iter()
            .find(|status| status.to_string() == s.to_lowercase().replace('-', "_"))
            .ok_or_else(|| format!("Unknown match status: {s}"))
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Home,
    Away,
}

impl Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Home => write!(f, "home"),
            Side::Away => write!(f, "away"),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    HomeWin,
    AwayWin,
    Draw,
}

/// Final score plus the scorer list. A player appearing `n` times in
/// `scorers` scored `n` goals. The list is authored independently of the
/// score fields and may disagree with them.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub home_score: u32,
    pub away_score: u32,
    pub scorers: Vec<PlayerId>,
}

impl MatchResult {
    pub fn new(home_score: u32, away_score: u32, scorers: Vec<PlayerId>) -> Self {
        Self {
            home_score,
            away_score,
            scorers,
        }
    }

    pub fn outcome(&self) -> Outcome {
        match self.home_score.cmp(&self.away_score) {
            std::cmp::Ordering::Greater => Outcome::HomeWin,
            std::cmp::Ordering::Less => Outcome::AwayWin,
            std::cmp::Ordering::Equal => Outcome::Draw,
        }
    }

    pub fn score_for(&self, side: Side) -> u32 {
        match side {
            Side::Home => self.home_score,
            Side::Away => self.away_score,
        }
    }

    pub fn goals_by(&self, player_id: &PlayerId) -> usize {
        self.scorers.iter().filter(|id| *id == player_id).count()
    }
}

impl Display for MatchResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.home_score, self.away_score)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub home_team_id: TeamId,
    pub away_team_id: TeamId,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub venue: String,
    pub status: MatchStatus,
    pub result: Option<MatchResult>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Match {
    /// The result, but only for a completed match. This is the sole input the
    /// standings table accepts.
    pub fn counted_result(&self) -> Option<&MatchResult> {
        match self.status {
            MatchStatus::Completed => self.result.as_ref(),
            _ => None,
        }
    }

    pub fn involves(&self, team_id: &TeamId) -> bool {
        &self.home_team_id == team_id || &self.away_team_id == team_id
    }

    pub fn side_of(&self, team_id: &TeamId) -> Option<Side> {
        if &self.home_team_id == team_id {
            Some(Side::Home)
        } else if &self.away_team_id == team_id {
            Some(Side::Away)
        } else {
            None
        }
    }

    pub fn team_on(&self, side: Side) -> &TeamId {
        match side {
            Side::Home => &self.home_team_id,
            Side::Away => &self.away_team_id,
        }
    }

    pub fn opponent_of(&self, team_id: &TeamId) -> Option<&TeamId> {
        match self.side_of(team_id)? {
            Side::Home => Some(&self.away_team_id),
            Side::Away => Some(&self.home_team_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture(status: MatchStatus, result: Option<MatchResult>) -> Match {
        Match {
            id: MatchId::new("match-1"),
            home_team_id: TeamId::new("team-1"),
            away_team_id: TeamId::new("team-2"),
            date: NaiveDate::from_ymd_opt(2023, 9, 15).unwrap(),
            time: NaiveTime::from_hms_opt(20, 0, 0).unwrap(),
            venue: "Camp Nou".to_string(),
            status,
            result,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn only_completed_matches_have_a_counted_result() {
        let result = MatchResult::new(3, 2, vec![]);
        assert!(fixture(MatchStatus::Completed, Some(result.clone()))
            .counted_result()
            .is_some());
        assert!(fixture(MatchStatus::InProgress, Some(result)).counted_result().is_none());
        assert!(fixture(MatchStatus::Completed, None).counted_result().is_none());
    }

    #[test]
    fn status_round_trips_through_its_wire_spelling() {
        for status in MatchStatus::ALL {
            assert_eq!(status.to_string().parse::<MatchStatus>(), Ok(status));
        }
        assert_eq!("in-progress".parse::<MatchStatus>(), Ok(MatchStatus::InProgress));
        assert_eq!(
            serde_json_status(MatchStatus::InProgress),
            "\"in_progress\"".to_string()
        );
    }

    fn serde_json_status(status: MatchStatus) -> String {
        serde_json::to_string(&status).unwrap()
    }

    #[test]
    fn goals_by_counts_repeated_scorers() {
        let result = MatchResult::new(
            2,
            1,
            vec![PlayerId::new("p1"), PlayerId::new("p1"), PlayerId::new("p2")],
        );
        assert_eq!(result.goals_by(&PlayerId::new("p1")), 2);
        assert_eq!(result.goals_by(&PlayerId::new("p2")), 1);
        assert_eq!(result.goals_by(&PlayerId::new("p3")), 0);
        assert_eq!(result.outcome(), Outcome::HomeWin);
    }

    #[test]
    fn sides_and_opponents() {
        let m = fixture(MatchStatus::Scheduled, None);
        let home = TeamId::new("team-1");
        let away = TeamId::new("team-2");
        assert_eq!(m.side_of(&home), Some(Side::Home));
        assert_eq!(m.side_of(&away), Some(Side::Away));
        assert_eq!(m.opponent_of(&home), Some(&away));
        assert_eq!(m.side_of(&TeamId::new("team-9")), None);
    }
}
