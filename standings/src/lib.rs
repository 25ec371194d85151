//! League table and statistics derived from match results.
//!
//! Everything here is a pure function over borrowed records: no I/O, no
//! shared state, safe to call from any thread or task. Dangling team or
//! player references degrade to placeholders instead of errors.

pub mod ranking;
pub mod scorers;
pub mod table;
pub mod validation;

pub use ranking::{league_order, rank, rank_by, Column, RankedStanding, SortDirection, StandingsOrder};
pub use scorers::{
    attribute_goals, goals_across, goals_in_match, per_match_average, player_match_log,
    scorer_tally, team_goal_share, top_scorers, PlayerMatchLine, SideGoals,
};
pub use table::{compute_standings, league_table, team_name, top_teams};
pub use validation::{
    check_match, check_matches, check_table, reconcile, Discrepancy, ResultIssue, TableIssue,
};
