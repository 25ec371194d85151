use std::{cmp::Ordering, fmt::Display, str::FromStr};

use serde::Serialize;
use types::TeamStanding;

/// Sortable standings column.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    Points,
    Played,
    Won,
    Drawn,
    Lost,
    GoalsFor,
    GoalsAgainst,
    GoalDifference,
}

impl Column {
    pub const ALL: [Column; 8] = [
        Column::Points,
        Column::Played,
        Column::Won,
        Column::Drawn,
        Column::Lost,
        Column::GoalsFor,
        Column::GoalsAgainst,
        Column::GoalDifference,
    ];

    pub fn value(&self, row: &TeamStanding) -> i64 {
        match self {
            Column::Points => i64::from(row.points()),
            Column::Played => i64::from(row.played),
            Column::Won => i64::from(row.won),
            Column::Drawn => i64::from(row.drawn),
            Column::Lost => i64::from(row.lost),
            Column::GoalsFor => i64::from(row.goals_for),
            Column::GoalsAgainst => i64::from(row.goals_against),
            Column::GoalDifference => row.goal_difference(),
        }
    }
}

impl Display for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Column::Points => "points",
            Column::Played => "played",
            Column::Won => "won",
            Column::Drawn => "drawn",
            Column::Lost => "lost",
            Column::GoalsFor => "goals_for",
            Column::GoalsAgainst => "goals_against",
            Column::GoalDifference => "goal_difference",
        };
        write!(f, "{name}")
    }
}

impl FromStr for Column {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.to_lowercase().replace('-', "_");
        let column = match normalized.as_str() {
            "pts" => Column::Points,
            "p" => Column::Played,
            "w" => Column::Won,
            "d" => Column::Drawn,
            "l" => Column::Lost,
            "gf" => Column::GoalsFor,
            "ga" => Column::GoalsAgainst,
            "gd" => Column::GoalDifference,
            other => Column::ALL
                .into_iter()
                .find(|column| column.to_string() == other)
                .ok_or_else(|| format!("Unknown standings column: {s}"))?,
        };
        Ok(column)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// How a standings table is ordered for display.
///
/// The default is the league order: points, then goal difference, then goals
/// scored, all descending. Sorting by any other column compares that column
/// only and keeps equal rows in their previous order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StandingsOrder {
    pub key: Column,
    pub direction: SortDirection,
}

impl Default for StandingsOrder {
    fn default() -> Self {
        Self {
            key: Column::Points,
            direction: SortDirection::Descending,
        }
    }
}

impl StandingsOrder {
    pub fn new(key: Column, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    /// Column-header click: a new column sorts ascending, clicking the
    /// ascending column again flips it to descending.
    pub fn request(self, key: Column) -> Self {
        let direction = if self.key == key && self.direction == SortDirection::Ascending {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        };
        Self { key, direction }
    }

    pub fn compare(&self, a: &TeamStanding, b: &TeamStanding) -> Ordering {
        let mut ordering = self.key.value(a).cmp(&self.key.value(b));
        if self.key == Column::Points {
            ordering = ordering
                .then_with(|| a.goal_difference().cmp(&b.goal_difference()))
                .then_with(|| a.goals_for.cmp(&b.goals_for));
        }
        match self.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }

    /// Stable sort; rows equal under this order keep their relative order.
    pub fn sort(&self, rows: &mut [TeamStanding]) {
        rows.sort_by(|a, b| self.compare(a, b));
    }
}

/// Points, goal difference, goals scored, all descending.
pub fn league_order(a: &TeamStanding, b: &TeamStanding) -> Ordering {
    StandingsOrder::default().compare(a, b)
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RankedStanding {
    pub position: usize,
    /// Equal to the row above under every key of the active order. The
    /// relative order of tied rows is the input order, not a decision.
    pub tied: bool,
    #[serde(flatten)]
    pub standing: TeamStanding,
    pub goal_difference: i64,
    pub points: u32,
}

pub fn rank(rows: Vec<TeamStanding>) -> Vec<RankedStanding> {
    rank_by(rows, StandingsOrder::default())
}

pub fn rank_by(mut rows: Vec<TeamStanding>, order: StandingsOrder) -> Vec<RankedStanding> {
    order.sort(&mut rows);
    let mut ranked: Vec<RankedStanding> = Vec::with_capacity(rows.len());
    for (idx, standing) in rows.into_iter().enumerate() {
        let tied = ranked
            .last()
            .is_some_and(|prev| order.compare(&prev.standing, &standing) == Ordering::Equal);
        if tied && order == StandingsOrder::default() {
            log::warn!(
                "{} and {} are level on points, goal difference and goals scored",
                ranked[idx - 1].standing.team_name,
                standing.team_name
            );
        }
        ranked.push(RankedStanding {
            position: idx + 1,
            tied,
            goal_difference: standing.goal_difference(),
            points: standing.points(),
            standing,
        });
    }
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::TeamId;

    fn row(name: &str, won: u32, drawn: u32, lost: u32, gf: u32, ga: u32) -> TeamStanding {
        TeamStanding {
            team_id: TeamId::new(name),
            team_name: name.to_string(),
            played: won + drawn + lost,
            won,
            drawn,
            lost,
            goals_for: gf,
            goals_against: ga,
        }
    }

    fn names(ranked: &[RankedStanding]) -> Vec<&str> {
        ranked.iter().map(|r| r.standing.team_name.as_str()).collect()
    }

    #[test]
    fn league_order_uses_points_then_goal_difference_then_goals_for() {
        let rows = vec![
            row("low", 0, 0, 2, 1, 5),
            row("gd", 1, 1, 0, 3, 1),
            row("gf", 1, 1, 0, 5, 3),
            row("top", 2, 0, 0, 4, 0),
        ];
        let ranked = rank(rows);
        assert_eq!(names(&ranked), vec!["top", "gf", "gd", "low"]);
        assert_eq!(ranked[1].position, 2);
        assert!(ranked.iter().all(|r| !r.tied));
    }

    #[test]
    fn rows_level_on_every_key_are_flagged_and_keep_input_order() {
        let rows = vec![
            row("first", 1, 0, 1, 2, 2),
            row("second", 1, 0, 1, 2, 2),
        ];
        let ranked = rank(rows);
        assert_eq!(names(&ranked), vec!["first", "second"]);
        assert!(!ranked[0].tied);
        assert!(ranked[1].tied);
        assert_eq!(ranked[1].position, 2);
    }

    #[test]
    fn column_sort_compares_only_that_column() {
        let rows = vec![
            row("a", 2, 0, 0, 6, 1),
            row("b", 0, 0, 2, 1, 6),
            row("c", 1, 0, 1, 6, 3),
        ];
        let order = StandingsOrder::new(Column::GoalsFor, SortDirection::Ascending);
        let ranked = rank_by(rows, order);
        assert_eq!(names(&ranked), vec!["b", "a", "c"]);
        assert!(ranked[2].tied);
    }

    #[test]
    fn points_sort_ascending_reverses_tie_breaks_too() {
        let rows = vec![row("big", 1, 0, 0, 5, 0), row("small", 1, 0, 0, 1, 0)];
        let order = StandingsOrder::new(Column::Points, SortDirection::Ascending);
        assert_eq!(names(&rank_by(rows, order)), vec!["small", "big"]);
    }

    #[test]
    fn request_toggles_like_a_column_header() {
        let order = StandingsOrder::default();
        let order = order.request(Column::Won);
        assert_eq!(order, StandingsOrder::new(Column::Won, SortDirection::Ascending));
        let order = order.request(Column::Won);
        assert_eq!(order, StandingsOrder::new(Column::Won, SortDirection::Descending));
        let order = order.request(Column::Won);
        assert_eq!(order.direction, SortDirection::Ascending);
        let order = order.request(Column::Points);
        assert_eq!(order, StandingsOrder::new(Column::Points, SortDirection::Ascending));
    }

    #[test]
    fn column_names_parse() {
        assert_eq!("gd".parse::<Column>(), Ok(Column::GoalDifference));
        assert_eq!("goals-for".parse::<Column>(), Ok(Column::GoalsFor));
        assert_eq!("Points".parse::<Column>(), Ok(Column::Points));
        assert!("shots".parse::<Column>().is_err());
    }

    #[test]
    fn ranked_rows_serialize_with_derived_columns() {
        let ranked = rank(vec![row("solo", 1, 0, 0, 3, 1)]);
        let json = serde_json::to_value(&ranked[0]).unwrap();
        assert_eq!(json["position"], 1);
        assert_eq!(json["team_name"], "solo");
        assert_eq!(json["goal_difference"], 2);
        assert_eq!(json["points"], 3);
    }
}
