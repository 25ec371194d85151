use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{PlayerId, TeamId};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Position {
    Goalkeeper,
    Defender,
    Midfielder,
    Forward,
}

impl Position {
    pub const ALL: [Position; 4] = [
        Position::Goalkeeper,
        Position::Defender,
        Position::Midfielder,
        Position::Forward,
    ];
}

impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Position::Goalkeeper => write!(f, "Goalkeeper"),
            Position::Defender => write!(f, "Defender"),
            Position::Midfielder => write!(f, "Midfielder"),
            Position::Forward => write!(f, "Forward"),
        }
    }
}

impl FromStr for Position {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Position::ALL
            .into_iter()
            .find(|position| position.to_string().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown position: {s}"))
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub goals: u32,
    pub assists: u32,
    pub fouls: u32,
}

impl PlayerStats {
    pub fn goal_contributions(&self) -> u32 {
        self.goals.saturating_add(self.assists)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub team_id: TeamId,
    pub position: Position,
    pub stats: PlayerStats,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.position)
    }
}

impl Player {
    pub fn plays_for(&self, team_id: &TeamId) -> bool {
        &self.team_id == team_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_parses_case_insensitively() {
        assert_eq!("forward".parse::<Position>(), Ok(Position::Forward));
        assert_eq!("Goalkeeper".parse::<Position>(), Ok(Position::Goalkeeper));
        assert!("Striker".parse::<Position>().is_err());
    }

    #[test]
    fn goal_contributions_add_goals_and_assists() {
        let stats = PlayerStats {
            goals: 35,
            assists: 14,
            fouls: 8,
        };
        assert_eq!(stats.goal_contributions(), 49);
    }
}
