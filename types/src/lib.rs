pub mod ids;
pub mod matches;
pub mod player;
pub mod standing;
pub mod team;
pub mod user;

pub use ids::{MatchId, PlayerId, TeamId, UserId};
pub use matches::{Match, MatchResult, MatchStatus, Outcome, Side};
pub use player::{Player, PlayerStats, Position};
pub use standing::{PublishedStanding, TeamStanding, POINTS_FOR_DRAW, POINTS_FOR_WIN};
pub use team::Team;
pub use user::{User, UserRole};

/// Shown wherever a team id does not resolve to a known team.
pub const UNKNOWN_TEAM: &str = "Unknown Team";
/// Shown wherever a player id does not resolve to a known player.
pub const UNKNOWN_PLAYER: &str = "Unknown Player";
