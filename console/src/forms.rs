//! Form state as plain data, each with a validation function that checks
//! every field instead of stopping at the first bad one. Each field reports
//! at most one error: the first rule it fails.

use std::{fmt::Display, sync::OnceLock};

use chrono::{NaiveDate, NaiveTime};
use itertools::Itertools;
use regex::Regex;
use serde::Serialize;
use types::{
    Match, MatchResult, MatchStatus, Player, PlayerId, PlayerStats, Position, Team, TeamId,
    UserRole,
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Field errors in form order, at most one per field.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormErrors(Vec<FieldError>);

impl FormErrors {
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        if self.get(field).is_none() {
            self.0.push(FieldError {
                field,
                message: message.into(),
            });
        }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|error| error.field == field)
            .map(|error| error.message.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, FormErrors> {
        if self.is_empty() {
            Ok(value())
        } else {
            Err(self)
        }
    }
}

impl Display for FormErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let joined = self
            .0
            .iter()
            .map(|error| format!("{}: {}", error.field, error.message))
            .join("; ");
        write!(f, "{joined}")
    }
}

fn email_pattern() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Valid email regex"))
}

// Query strings and fragments are allowed after the image extension.
fn image_url_pattern() -> &'static Regex {
    static IMAGE_URL: OnceLock<Regex> = OnceLock::new();
    IMAGE_URL.get_or_init(|| {
        Regex::new(r"(?i)^https?://[^\s?#]+\.(jpg|jpeg|png|webp|avif|gif)(\?[^\s#]*)?(#\S*)?$")
            .expect("Valid image URL regex")
    })
}

fn required<'a>(errors: &mut FormErrors, field: &'static str, value: &'a str, message: &str) -> Option<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        errors.add(field, message);
        None
    } else {
        Some(value)
    }
}

fn min_chars(errors: &mut FormErrors, field: &'static str, value: Option<&str>, min: usize, label: &str) {
    if let Some(value) = value {
        if value.chars().count() < min {
            errors.add(field, format!("{label} must be at least {min} characters"));
        }
    }
}

/// Highest score a match form accepts for either side.
pub const MAX_SCORE: u32 = 999;
/// Highest season goals, assists or fouls a player form accepts.
pub const MAX_SEASON_STAT: u32 = 9_999;

fn count(errors: &mut FormErrors, field: &'static str, value: &str, label: &str, max: u32) -> u32 {
    let Some(value) = required(errors, field, value, &format!("{label} is required")) else {
        return 0;
    };
    match value.parse::<i64>() {
        Ok(n) if n < 0 => {
            errors.add(field, format!("{label} cannot be negative"));
            0
        }
        Ok(n) if n > i64::from(max) => {
            errors.add(field, format!("{label} cannot be more than {max}"));
            0
        }
        Ok(n) => u32::try_from(n).unwrap_or_default(),
        Err(_) => {
            errors.add(field, format!("{label} must be a whole number"));
            0
        }
    }
}

fn known_team(errors: &mut FormErrors, field: &'static str, value: Option<&str>, teams: &[Team]) -> Option<TeamId> {
    let id = TeamId::new(value?);
    if teams.iter().any(|team| team.id == id) {
        Some(id)
    } else {
        errors.add(field, format!("No team with id {id}"));
        None
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TeamForm {
    pub name: String,
    pub coach: String,
    pub logo: String,
    pub description: String,
}

impl TeamForm {
    pub fn from_team(team: &Team) -> Self {
        Self {
            name: team.name.clone(),
            coach: team.coach.clone(),
            logo: team.logo.clone(),
            description: team.description.clone(),
        }
    }

    pub fn validate(&self) -> Result<(), FormErrors> {
        let mut errors = FormErrors::default();
        let name = required(&mut errors, "name", &self.name, "Team name is required");
        min_chars(&mut errors, "name", name, 2, "Name");
        required(&mut errors, "coach", &self.coach, "Coach name is required");
        if let Some(logo) = required(&mut errors, "logo", &self.logo, "Logo URL is required") {
            if !image_url_pattern().is_match(logo) {
                errors.add("logo", "Please enter a valid image URL");
            }
        }
        let description = required(&mut errors, "description", &self.description, "Description is required");
        min_chars(&mut errors, "description", description, 10, "Description");
        errors.into_result(|| ())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PlayerForm {
    pub name: String,
    pub team_id: String,
    pub position: String,
    pub goals: String,
    pub assists: String,
    pub fouls: String,
}

/// A player form that passed validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayerInput {
    pub name: String,
    pub team_id: TeamId,
    pub position: Position,
    pub stats: PlayerStats,
}

impl PlayerForm {
    pub fn from_player(player: &Player) -> Self {
        Self {
            name: player.name.clone(),
            team_id: player.team_id.to_string(),
            position: player.position.to_string(),
            goals: player.stats.goals.to_string(),
            assists: player.stats.assists.to_string(),
            fouls: player.stats.fouls.to_string(),
        }
    }

    pub fn validate(&self, teams: &[Team]) -> Result<PlayerInput, FormErrors> {
        let mut errors = FormErrors::default();
        let name = required(&mut errors, "name", &self.name, "Player name is required");
        min_chars(&mut errors, "name", name, 2, "Name");
        let team = required(&mut errors, "team_id", &self.team_id, "Team is required");
        let team_id = known_team(&mut errors, "team_id", team, teams);
        let position = required(&mut errors, "position", &self.position, "Position is required")
            .and_then(|value| match value.parse::<Position>() {
                Ok(position) => Some(position),
                Err(message) => {
                    errors.add("position", message);
                    None
                }
            });
        let stats = PlayerStats {
            goals: count(&mut errors, "goals", &self.goals, "Goals", MAX_SEASON_STAT),
            assists: count(&mut errors, "assists", &self.assists, "Assists", MAX_SEASON_STAT),
            fouls: count(&mut errors, "fouls", &self.fouls, "Fouls", MAX_SEASON_STAT),
        };

        match (name, team_id, position) {
            (Some(name), Some(team_id), Some(position)) if errors.is_empty() => Ok(PlayerInput {
                name: name.to_string(),
                team_id,
                position,
                stats,
            }),
            _ => Err(errors),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MatchForm {
    pub home_team_id: String,
    pub away_team_id: String,
    pub date: String,
    pub time: String,
    pub venue: String,
    pub status: String,
    pub home_score: String,
    pub away_score: String,
    /// One entry per goal, as player ids.
    pub scorers: Vec<String>,
}

/// A match form that passed validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchInput {
    pub home_team_id: TeamId,
    pub away_team_id: TeamId,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub venue: String,
    pub status: MatchStatus,
    pub result: Option<MatchResult>,
}

impl MatchForm {
    pub fn from_match(m: &Match) -> Self {
        let result = m.result.as_ref();
        Self {
            home_team_id: m.home_team_id.to_string(),
            away_team_id: m.away_team_id.to_string(),
            date: m.date.format("%Y-%m-%d").to_string(),
            time: m.time.format("%H:%M").to_string(),
            venue: m.venue.clone(),
            status: m.status.to_string(),
            home_score: result.map(|r| r.home_score.to_string()).unwrap_or_default(),
            away_score: result.map(|r| r.away_score.to_string()).unwrap_or_default(),
            scorers: result
                .map(|r| r.scorers.iter().map(ToString::to_string).collect())
                .unwrap_or_default(),
        }
    }

    /// Players a scorer may be picked from: the squads of the two teams.
    pub fn scorer_choices<'p>(&self, players: &'p [Player]) -> Vec<&'p Player> {
        let home = TeamId::new(self.home_team_id.trim());
        let away = TeamId::new(self.away_team_id.trim());
        players
            .iter()
            .filter(|player| player.plays_for(&home) || player.plays_for(&away))
            .collect()
    }

    pub fn validate(&self, teams: &[Team]) -> Result<MatchInput, FormErrors> {
        let mut errors = FormErrors::default();
        let home = required(&mut errors, "home_team_id", &self.home_team_id, "Home team is required");
        let away = required(&mut errors, "away_team_id", &self.away_team_id, "Away team is required");
        if home.is_some() && home == away {
            errors.add("away_team_id", "Home and away teams must be different");
        }
        let home_team_id = known_team(&mut errors, "home_team_id", home, teams);
        let away_team_id = known_team(&mut errors, "away_team_id", away, teams);

        let date = required(&mut errors, "date", &self.date, "Date is required").and_then(|value| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .map_err(|_| errors.add("date", "Date must be YYYY-MM-DD"))
                .ok()
        });
        let time = required(&mut errors, "time", &self.time, "Time is required").and_then(|value| {
            NaiveTime::parse_from_str(value, "%H:%M")
                .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
                .map_err(|_| errors.add("time", "Time must be HH:MM"))
                .ok()
        });
        let venue = required(&mut errors, "venue", &self.venue, "Venue is required");
        let status = required(&mut errors, "status", &self.status, "Status is required").and_then(|value| {
            value
                .parse::<MatchStatus>()
                .map_err(|message| errors.add("status", message))
                .ok()
        });

        let result = if status == Some(MatchStatus::Completed) {
            let home_score = count(&mut errors, "home_score", &self.home_score, "Home score", MAX_SCORE);
            let away_score = count(&mut errors, "away_score", &self.away_score, "Away score", MAX_SCORE);
            let scorers = self
                .scorers
                .iter()
                .map(|id| id.trim())
                .filter(|id| !id.is_empty())
                .map(PlayerId::new)
                .collect();
            Some(MatchResult::new(home_score, away_score, scorers))
        } else {
            None
        };

        match (home_team_id, away_team_id, date, time, venue, status) {
            (Some(home_team_id), Some(away_team_id), Some(date), Some(time), Some(venue), Some(status))
                if errors.is_empty() =>
            {
                Ok(MatchInput {
                    home_team_id,
                    away_team_id,
                    date,
                    time,
                    venue: venue.to_string(),
                    status,
                    result,
                })
            }
            _ => Err(errors),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    #[serde(skip)]
    pub password: String,
    #[serde(skip)]
    pub confirm_password: String,
    pub role: String,
}

impl Default for RegisterForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            password: String::new(),
            confirm_password: String::new(),
            role: UserRole::Player.to_string(),
        }
    }
}

impl RegisterForm {
    pub fn validate(&self) -> Result<UserRole, FormErrors> {
        let mut errors = FormErrors::default();
        required(&mut errors, "name", &self.name, "Name is required");
        if let Some(email) = required(&mut errors, "email", &self.email, "Email is required") {
            if !email_pattern().is_match(email) {
                errors.add("email", "Please enter a valid email address");
            }
        }
        if self.password.is_empty() {
            errors.add("password", "Password is required");
        } else if self.password != self.confirm_password {
            errors.add("confirm_password", "Passwords do not match");
        }
        let role = self
            .role
            .parse::<UserRole>()
            .map_err(|message| errors.add("role", message))
            .ok();
        match role {
            Some(role) if errors.is_empty() => Ok(role),
            _ => Err(errors),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn teams() -> Vec<Team> {
        ["team-1", "team-2"]
            .into_iter()
            .map(|id| Team {
                id: TeamId::new(id),
                name: id.to_string(),
                logo: String::new(),
                coach: String::new(),
                description: String::new(),
                created_at: Utc::now(),
                updated_at: Utc::now(),
            })
            .collect()
    }

    fn valid_team() -> TeamForm {
        TeamForm {
            name: "Ajax".to_string(),
            coach: "Someone".to_string(),
            logo: "https://example.com/crest.png".to_string(),
            description: "Founded in 1900 in Amsterdam.".to_string(),
        }
    }

    #[test]
    fn team_form_checks_every_field() {
        assert_eq!(valid_team().validate(), Ok(()));

        let errors = TeamForm::default().validate().unwrap_err();
        assert_eq!(errors.len(), 4);
        assert_eq!(errors.get("name"), Some("Team name is required"));

        let short = TeamForm {
            name: "A".to_string(),
            description: "Too short".to_string(),
            ..valid_team()
        };
        let errors = short.validate().unwrap_err();
        assert_eq!(errors.get("name"), Some("Name must be at least 2 characters"));
        assert_eq!(
            errors.get("description"),
            Some("Description must be at least 10 characters")
        );
    }

    #[test]
    fn logo_must_be_an_image_url() {
        for logo in [
            "ftp://example.com/a.png",
            "https://example.com/a.svg",
            "example.com/a.png",
        ] {
            let form = TeamForm {
                logo: logo.to_string(),
                ..valid_team()
            };
            assert_eq!(
                form.validate().unwrap_err().get("logo"),
                Some("Please enter a valid image URL"),
                "{logo}"
            );
        }
        let with_query = TeamForm {
            logo: "https://images.example.com/photo.jpeg?auto=compress&w=1260".to_string(),
            ..valid_team()
        };
        assert!(with_query.validate().is_ok());
    }

    #[test]
    fn player_form_parses_stats_and_team() {
        let form = PlayerForm {
            name: "Pedri".to_string(),
            team_id: "team-1".to_string(),
            position: "midfielder".to_string(),
            goals: "4".to_string(),
            assists: "7".to_string(),
            fouls: "0".to_string(),
        };
        let input = form.validate(&teams()).unwrap();
        assert_eq!(input.position, Position::Midfielder);
        assert_eq!(input.stats.assists, 7);

        let bad = PlayerForm {
            team_id: "team-9".to_string(),
            goals: "-1".to_string(),
            fouls: "two".to_string(),
            ..form
        };
        let errors = bad.validate(&teams()).unwrap_err();
        assert_eq!(errors.get("team_id"), Some("No team with id team-9"));
        assert_eq!(errors.get("goals"), Some("Goals cannot be negative"));
        assert_eq!(errors.get("fouls"), Some("Fouls must be a whole number"));
        assert_eq!(errors.get("assists"), None);
    }

    fn match_form() -> MatchForm {
        MatchForm {
            home_team_id: "team-1".to_string(),
            away_team_id: "team-2".to_string(),
            date: "2023-12-01".to_string(),
            time: "20:00".to_string(),
            venue: "Camp Nou".to_string(),
            status: "completed".to_string(),
            home_score: "1".to_string(),
            away_score: "0".to_string(),
            scorers: vec!["player-1".to_string()],
        }
    }

    #[test]
    fn completed_matches_need_scores() {
        let input = match_form().validate(&teams()).unwrap();
        let result = input.result.unwrap();
        assert_eq!((result.home_score, result.away_score), (1, 0));
        assert_eq!(result.scorers, vec![PlayerId::new("player-1")]);

        let missing = MatchForm {
            home_score: String::new(),
            ..match_form()
        };
        assert_eq!(
            missing.validate(&teams()).unwrap_err().get("home_score"),
            Some("Home score is required")
        );
    }

    #[test]
    fn scores_and_stats_are_capped() {
        let form = MatchForm {
            home_score: "3000000000".to_string(),
            away_score: "999".to_string(),
            ..match_form()
        };
        let errors = form.validate(&teams()).unwrap_err();
        assert_eq!(errors.get("home_score"), Some("Home score cannot be more than 999"));
        assert_eq!(errors.get("away_score"), None);

        let player = PlayerForm {
            name: "Pedri".to_string(),
            team_id: "team-1".to_string(),
            position: "Midfielder".to_string(),
            goals: "10000".to_string(),
            assists: "99999999999999999999".to_string(),
            fouls: "9999".to_string(),
        };
        let errors = player.validate(&teams()).unwrap_err();
        assert_eq!(errors.get("goals"), Some("Goals cannot be more than 9999"));
        assert_eq!(errors.get("assists"), Some("Assists must be a whole number"));
        assert_eq!(errors.get("fouls"), None);
    }

    #[test]
    fn open_matches_drop_any_result() {
        let form = MatchForm {
            status: "scheduled".to_string(),
            home_score: "nonsense".to_string(),
            ..match_form()
        };
        let input = form.validate(&teams()).unwrap();
        assert_eq!(input.status, MatchStatus::Scheduled);
        assert!(input.result.is_none());
    }

    #[test]
    fn match_sides_must_differ() {
        let form = MatchForm {
            away_team_id: "team-1".to_string(),
            date: "01/12/2023".to_string(),
            ..match_form()
        };
        let errors = form.validate(&teams()).unwrap_err();
        assert_eq!(
            errors.get("away_team_id"),
            Some("Home and away teams must be different")
        );
        assert_eq!(errors.get("date"), Some("Date must be YYYY-MM-DD"));
    }

    #[test]
    fn register_form_requires_matching_passwords() {
        let form = RegisterForm {
            name: "New Fan".to_string(),
            email: "fan@example.com".to_string(),
            password: "secret".to_string(),
            confirm_password: "secret".to_string(),
            ..RegisterForm::default()
        };
        assert_eq!(form.validate(), Ok(UserRole::Player));

        let mismatched = RegisterForm {
            email: "not-an-email".to_string(),
            confirm_password: "other".to_string(),
            ..form
        };
        let errors = mismatched.validate().unwrap_err();
        assert_eq!(errors.get("email"), Some("Please enter a valid email address"));
        assert_eq!(errors.get("confirm_password"), Some("Passwords do not match"));
    }

    #[test]
    fn each_field_keeps_only_its_first_error() {
        let errors = TeamForm {
            name: " ".to_string(),
            ..valid_team()
        }
        .validate()
        .unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("name"), Some("Team name is required"));
    }

    #[test]
    fn errors_render_in_field_order() {
        let mut errors = FormErrors::default();
        errors.add("name", "Name is required");
        errors.add("name", "ignored");
        errors.add("email", "Email is required");
        assert_eq!(
            errors.to_string(),
            "name: Name is required; email: Email is required"
        );
    }
}
