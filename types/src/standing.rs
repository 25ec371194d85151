use serde::{Deserialize, Serialize};

use crate::TeamId;

pub const POINTS_FOR_WIN: u32 = 3;
pub const POINTS_FOR_DRAW: u32 = 1;

/// Derived league-table row. Points and goal difference are always computed
/// from the counters, never stored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamStanding {
    pub team_id: TeamId,
    pub team_name: String,
    pub played: u32,
    pub won: u32,
    pub drawn: u32,
    pub lost: u32,
    pub goals_for: u32,
    pub goals_against: u32,
}

impl TeamStanding {
    pub fn new(team_id: TeamId, team_name: String) -> Self {
        Self {
            team_id,
            team_name,
            played: 0,
            won: 0,
            drawn: 0,
            lost: 0,
            goals_for: 0,
            goals_against: 0,
        }
    }

    /// Account for one finished match from this team's point of view.
    /// Counters saturate at `u32::MAX` rather than wrapping.
    pub fn record(&mut self, scored: u32, conceded: u32) {
        self.played = self.played.saturating_add(1);
        self.goals_for = self.goals_for.saturating_add(scored);
        self.goals_against = self.goals_against.saturating_add(conceded);
        let counter = match scored.cmp(&conceded) {
            std::cmp::Ordering::Greater => &mut self.won,
            std::cmp::Ordering::Less => &mut self.lost,
            std::cmp::Ordering::Equal => &mut self.drawn,
        };
        *counter = counter.saturating_add(1);
    }

    pub fn goal_difference(&self) -> i64 {
        i64::from(self.goals_for) - i64::from(self.goals_against)
    }

    pub fn points(&self) -> u32 {
        self.won
            .saturating_mul(POINTS_FOR_WIN)
            .saturating_add(self.drawn.saturating_mul(POINTS_FOR_DRAW))
    }
}

/// A standings row as authored outside the aggregator (e.g. a published
/// table). Unlike [`TeamStanding`] it carries its own points and goal
/// difference columns, which may not agree with the counters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishedStanding {
    pub team_id: TeamId,
    pub team_name: String,
    pub played: u32,
    pub won: u32,
    pub drawn: u32,
    pub lost: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub goal_difference: i64,
    pub points: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_tracks_results_and_derives_points() {
        let mut standing = TeamStanding::new(TeamId::new("team-1"), "Barcelona FC".to_string());
        standing.record(3, 2);
        standing.record(4, 0);
        standing.record(1, 1);
        standing.record(0, 2);

        assert_eq!(standing.played, 4);
        assert_eq!((standing.won, standing.drawn, standing.lost), (2, 1, 1));
        assert_eq!(standing.goals_for, 8);
        assert_eq!(standing.goals_against, 5);
        assert_eq!(standing.goal_difference(), 3);
        assert_eq!(standing.points(), 7);
    }

    #[test]
    fn huge_scores_saturate_instead_of_overflowing() {
        let mut standing = TeamStanding::new(TeamId::new("team-1"), "Barcelona FC".to_string());
        standing.record(3_000_000_000, 0);
        standing.record(3_000_000_000, 0);
        assert_eq!(standing.goals_for, u32::MAX);
        assert_eq!(standing.won, 2);
        assert_eq!(standing.goal_difference(), i64::from(u32::MAX));
        assert_eq!(standing.points(), 6);
    }

    #[test]
    fn goal_difference_can_be_negative() {
        let mut standing = TeamStanding::new(TeamId::new("team-3"), "Manchester United".to_string());
        standing.record(1, 2);
        standing.record(0, 4);
        assert_eq!(standing.goal_difference(), -5);
        assert_eq!(standing.points(), 0);
    }
}
