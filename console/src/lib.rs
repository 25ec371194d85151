//! League administration console: sign-in, forms, the league service that
//! ties storage to the standings engine, and text views of its results.

pub mod config;
pub mod error;
pub mod forms;
pub mod service;
pub mod session;
pub mod views;

pub use config::ConsoleConfig;
pub use error::ConsoleError;
pub use forms::{
    FieldError, FormErrors, MatchForm, MatchInput, PlayerForm, PlayerInput, RegisterForm, TeamForm,
    MAX_SCORE, MAX_SEASON_STAT,
};
pub use service::{
    AuditReport, Dashboard, LeagueService, MatchDetail, MatchFilter, MatchSummary, PlayerDetail,
    PlayerFilter, PlayerSummary, SavedMatch, StandingsTable, TeamDetail,
};
pub use session::{login, register, Session, MANAGERS};
