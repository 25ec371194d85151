use chrono::Utc;
use database::LeagueStore;
use itertools::Itertools;
use serde::Serialize;
use standings::{
    check_match, check_matches, check_table, compute_standings, league_table, per_match_average,
    player_match_log, rank_by, reconcile, scorer_tally, team_goal_share, team_name, top_scorers,
    top_teams, Discrepancy, PlayerMatchLine, RankedStanding, ResultIssue, StandingsOrder,
    TableIssue,
};
use types::{
    Match, MatchId, MatchStatus, Player, PlayerId, Position, Side, Team, TeamId, UserRole,
    UNKNOWN_PLAYER,
};

use crate::{
    config::ConsoleConfig,
    forms::{MatchForm, PlayerForm, TeamForm},
    session::{Session, MANAGERS},
    ConsoleError,
};

/// A match with its team names resolved.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MatchSummary {
    #[serde(flatten)]
    pub fixture: Match,
    pub home_team_name: String,
    pub away_team_name: String,
}

impl MatchSummary {
    fn new(fixture: Match, teams: &[Team]) -> Self {
        Self {
            home_team_name: team_name(teams, &fixture.home_team_id).to_string(),
            away_team_name: team_name(teams, &fixture.away_team_id).to_string(),
            fixture,
        }
    }

    fn mentions(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        [&self.home_team_name, &self.away_team_name, &self.fixture.venue]
            .iter()
            .any(|text| text.to_lowercase().contains(&term))
    }
}

/// A player with their team name resolved.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PlayerSummary {
    #[serde(flatten)]
    pub player: Player,
    pub team_name: String,
}

impl PlayerSummary {
    fn new(player: Player, teams: &[Team]) -> Self {
        Self {
            team_name: team_name(teams, &player.team_id).to_string(),
            player,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct PlayerFilter {
    pub search: Option<String>,
    pub team_id: Option<TeamId>,
    pub position: Option<Position>,
}

#[derive(Clone, Debug, Default)]
pub struct MatchFilter {
    pub search: Option<String>,
    pub team_id: Option<TeamId>,
    pub status: Option<MatchStatus>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TeamDetail {
    pub team: Team,
    pub players: Vec<Player>,
    pub matches: Vec<MatchSummary>,
    pub standing: Option<RankedStanding>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PlayerMatch {
    #[serde(flatten)]
    pub line: PlayerMatchLine,
    pub opponent_name: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PlayerDetail {
    #[serde(flatten)]
    pub summary: PlayerSummary,
    pub matches: Vec<PlayerMatch>,
    /// Percentage of the team's season goals.
    pub goal_share: u32,
    pub goal_contributions: u32,
    /// Season goals over the team's completed matches with a result.
    /// Scheduled, in-progress and cancelled fixtures in `matches` are not
    /// part of the divisor. `None` before the first completed match.
    pub goals_per_match: Option<f64>,
    /// Season assists over the same completed matches as `goals_per_match`.
    pub assists_per_match: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ScorerLine {
    pub player_id: PlayerId,
    pub player_name: String,
    /// `None` when the scorer plays for neither team.
    pub side: Option<Side>,
    pub goals: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MatchDetail {
    #[serde(flatten)]
    pub summary: MatchSummary,
    pub scorers: Vec<ScorerLine>,
    pub issues: Vec<ResultIssue>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StandingsTable {
    pub order: StandingsOrder,
    pub highlight_top: usize,
    pub rows: Vec<RankedStanding>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Counts {
    pub teams: usize,
    pub players: usize,
    pub matches: usize,
    pub teams_in_league: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RecentMatch {
    #[serde(flatten)]
    pub summary: MatchSummary,
    pub side: Side,
    pub goals: usize,
}

/// The linked player's latest completed matches, for a player account.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RecentForm {
    pub player: PlayerSummary,
    pub recent: Vec<RecentMatch>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Dashboard {
    pub user_name: String,
    pub role: UserRole,
    pub counts: Counts,
    pub upcoming: Vec<MatchSummary>,
    pub top_teams: Vec<RankedStanding>,
    pub top_scorers: Vec<PlayerSummary>,
    pub my_form: Option<RecentForm>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AuditReport {
    pub match_issues: Vec<ResultIssue>,
    pub table_issues: Vec<TableIssue>,
    pub discrepancies: Vec<Discrepancy>,
}

impl AuditReport {
    pub fn is_clean(&self) -> bool {
        self.match_issues.is_empty() && self.table_issues.is_empty() && self.discrepancies.is_empty()
    }
}

/// A saved match and whatever the consistency checks found in it.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SavedMatch {
    #[serde(flatten)]
    pub fixture: Match,
    pub issues: Vec<ResultIssue>,
}

fn newest_first(a: &Match, b: &Match) -> std::cmp::Ordering {
    (b.date, b.time).cmp(&(a.date, a.time))
}

pub struct LeagueService<S> {
    store: S,
    config: ConsoleConfig,
}

impl<S: LeagueStore> LeagueService<S> {
    pub fn new(store: S, config: ConsoleConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    pub async fn teams(&self, _session: &Session, search: Option<&str>) -> Result<Vec<Team>, ConsoleError> {
        let teams = self.store.teams().await?;
        Ok(match search.map(str::trim).filter(|term| !term.is_empty()) {
            Some(term) => teams.into_iter().filter(|team| team.matches_search(term)).collect(),
            None => teams,
        })
    }

    pub async fn team_detail(&self, _session: &Session, id: &TeamId) -> Result<TeamDetail, ConsoleError> {
        let team = self
            .store
            .team(id)
            .await?
            .ok_or_else(|| ConsoleError::not_found("Team", id))?;
        let teams = self.store.teams().await?;
        let all_matches = self.store.matches().await?;
        let players = self
            .store
            .players()
            .await?
            .into_iter()
            .filter(|player| player.plays_for(id))
            .collect();
        let standing = league_table(&teams, &all_matches)
            .into_iter()
            .find(|row| &row.standing.team_id == id);
        let matches = all_matches
            .into_iter()
            .filter(|m| m.involves(id))
            .sorted_by(newest_first)
            .map(|m| MatchSummary::new(m, &teams))
            .collect();
        Ok(TeamDetail {
            team,
            players,
            matches,
            standing,
        })
    }

    pub async fn players(&self, _session: &Session, filter: &PlayerFilter) -> Result<Vec<PlayerSummary>, ConsoleError> {
        let teams = self.store.teams().await?;
        let search = filter
            .search
            .as_deref()
            .map(|term| term.trim().to_lowercase())
            .filter(|term| !term.is_empty());
        Ok(self
            .store
            .players()
            .await?
            .into_iter()
            .filter(|player| {
                search
                    .as_ref()
                    .map_or(true, |term| player.name.to_lowercase().contains(term))
            })
            .filter(|player| filter.team_id.as_ref().map_or(true, |id| player.plays_for(id)))
            .filter(|player| filter.position.map_or(true, |position| player.position == position))
            .map(|player| PlayerSummary::new(player, &teams))
            .collect())
    }

    pub async fn player_detail(&self, _session: &Session, id: &PlayerId) -> Result<PlayerDetail, ConsoleError> {
        let player = self
            .store
            .player(id)
            .await?
            .ok_or_else(|| ConsoleError::not_found("Player", id))?;
        let teams = self.store.teams().await?;
        let players = self.store.players().await?;
        let matches = self.store.matches().await?;

        let lines = player_match_log(&player, &matches);
        let counted = lines.iter().filter(|line| line.score.is_some()).count();
        let goal_share = team_goal_share(&player, &teams, &players);
        let matches = lines
            .into_iter()
            .map(|line| PlayerMatch {
                opponent_name: team_name(&teams, &line.opponent_id).to_string(),
                line,
            })
            .collect();
        Ok(PlayerDetail {
            goal_share,
            goal_contributions: player.stats.goal_contributions(),
            goals_per_match: per_match_average(player.stats.goals, counted),
            assists_per_match: per_match_average(player.stats.assists, counted),
            matches,
            summary: PlayerSummary::new(player, &teams),
        })
    }

    pub async fn matches(&self, _session: &Session, filter: &MatchFilter) -> Result<Vec<MatchSummary>, ConsoleError> {
        let teams = self.store.teams().await?;
        let search = filter
            .search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty());
        Ok(self
            .store
            .matches()
            .await?
            .into_iter()
            .filter(|m| filter.team_id.as_ref().map_or(true, |id| m.involves(id)))
            .filter(|m| filter.status.map_or(true, |status| m.status == status))
            .sorted_by(newest_first)
            .map(|m| MatchSummary::new(m, &teams))
            .filter(|summary| search.map_or(true, |term| summary.mentions(term)))
            .collect())
    }

    pub async fn match_detail(&self, _session: &Session, id: &MatchId) -> Result<MatchDetail, ConsoleError> {
        let fixture = self
            .store
            .get_match(id)
            .await?
            .ok_or_else(|| ConsoleError::not_found("Match", id))?;
        let teams = self.store.teams().await?;
        let players = self.store.players().await?;

        let scorers = fixture
            .result
            .as_ref()
            .map(scorer_tally)
            .unwrap_or_default()
            .into_iter()
            .map(|(player_id, goals)| {
                let player = players.iter().find(|player| player.id == player_id);
                ScorerLine {
                    player_name: player.map_or(UNKNOWN_PLAYER, |p| p.name.as_str()).to_string(),
                    side: player.and_then(|p| fixture.side_of(&p.team_id)),
                    player_id,
                    goals,
                }
            })
            .collect();
        let issues = check_match(&fixture, &players);
        Ok(MatchDetail {
            summary: MatchSummary::new(fixture, &teams),
            scorers,
            issues,
        })
    }

    pub async fn standings(&self, _session: &Session, order: StandingsOrder) -> Result<StandingsTable, ConsoleError> {
        let teams = self.store.teams().await?;
        let matches = self.store.matches().await?;
        Ok(StandingsTable {
            order,
            highlight_top: self.config.highlight_top,
            rows: rank_by(compute_standings(&teams, &matches), order),
        })
    }

    pub async fn dashboard(&self, session: &Session) -> Result<Dashboard, ConsoleError> {
        let teams = self.store.teams().await?;
        let players = self.store.players().await?;
        let matches = self.store.matches().await?;
        let table = league_table(&teams, &matches);

        let counts = Counts {
            teams: teams.len(),
            players: players.len(),
            matches: matches.len(),
            teams_in_league: table.len(),
        };
        let upcoming = matches
            .iter()
            .filter(|m| m.status == MatchStatus::Scheduled)
            .sorted_by_key(|m| (m.date, m.time))
            .map(|m| MatchSummary::new(m.clone(), &teams))
            .collect();
        let top_scorers = top_scorers(&players, self.config.top_scorers)
            .into_iter()
            .map(|player| PlayerSummary::new(player.clone(), &teams))
            .collect();

        let user = session.user();
        let linked_player = match (&user.role, &user.player_id) {
            (UserRole::Player, Some(player_id)) => players.iter().find(|p| &p.id == player_id),
            _ => None,
        };
        let my_form = linked_player.map(|player| {
            let recent = matches
                .iter()
                .filter(|m| m.status == MatchStatus::Completed)
                .filter_map(|m| Some((m, m.side_of(&player.team_id)?)))
                .sorted_by(|(a, _), (b, _)| newest_first(a, b))
                .take(self.config.recent_matches)
                .map(|(m, side)| RecentMatch {
                    goals: m.result.as_ref().map_or(0, |r| r.goals_by(&player.id)),
                    side,
                    summary: MatchSummary::new(m.clone(), &teams),
                })
                .collect();
            RecentForm {
                player: PlayerSummary::new(player.clone(), &teams),
                recent,
            }
        });

        Ok(Dashboard {
            user_name: user.name.clone(),
            role: user.role,
            counts,
            upcoming,
            top_teams: top_teams(&table, self.config.top_teams).to_vec(),
            top_scorers,
            my_form,
        })
    }

    /// Consistency report over stored matches and the published table.
    pub async fn audit(&self, session: &Session) -> Result<AuditReport, ConsoleError> {
        session.require(&MANAGERS, "run the data audit")?;
        let teams = self.store.teams().await?;
        let players = self.store.players().await?;
        let matches = self.store.matches().await?;
        let published = self.store.published_standings().await?;

        let derived = compute_standings(&teams, &matches);
        let report = AuditReport {
            match_issues: check_matches(&matches, &players),
            table_issues: check_table(&published),
            discrepancies: reconcile(&published, &derived),
        };
        log::info!(
            "Audit found {} match issues, {} table issues, {} discrepancies",
            report.match_issues.len(),
            report.table_issues.len(),
            report.discrepancies.len()
        );
        Ok(report)
    }

    pub async fn create_team(&self, session: &Session, form: &TeamForm) -> Result<Team, ConsoleError> {
        session.require(&MANAGERS, "create teams")?;
        form.validate()?;
        let now = Utc::now();
        let team = Team {
            id: TeamId::generate(),
            name: form.name.trim().to_string(),
            logo: form.logo.trim().to_string(),
            coach: form.coach.trim().to_string(),
            description: form.description.trim().to_string(),
            created_at: now,
            updated_at: now,
        };
        self.store.save_team(&team).await?;
        log::info!("Created team {} ({})", team.name, team.id);
        Ok(team)
    }

    pub async fn update_team(&self, session: &Session, id: &TeamId, form: &TeamForm) -> Result<Team, ConsoleError> {
        session.require(&MANAGERS, "edit teams")?;
        let existing = self
            .store
            .team(id)
            .await?
            .ok_or_else(|| ConsoleError::not_found("Team", id))?;
        form.validate()?;
        let team = Team {
            name: form.name.trim().to_string(),
            logo: form.logo.trim().to_string(),
            coach: form.coach.trim().to_string(),
            description: form.description.trim().to_string(),
            updated_at: Utc::now(),
            ..existing
        };
        self.store.save_team(&team).await?;
        log::info!("Updated team {} ({})", team.name, team.id);
        Ok(team)
    }

    pub async fn create_player(&self, session: &Session, form: &PlayerForm) -> Result<Player, ConsoleError> {
        session.require(&MANAGERS, "create players")?;
        let input = form.validate(&self.store.teams().await?)?;
        let now = Utc::now();
        let player = Player {
            id: PlayerId::generate(),
            name: input.name,
            team_id: input.team_id,
            position: input.position,
            stats: input.stats,
            created_at: now,
            updated_at: now,
        };
        self.store.save_player(&player).await?;
        log::info!("Created player {} ({})", player.name, player.id);
        Ok(player)
    }

    pub async fn update_player(&self, session: &Session, id: &PlayerId, form: &PlayerForm) -> Result<Player, ConsoleError> {
        session.require(&MANAGERS, "edit players")?;
        let existing = self
            .store
            .player(id)
            .await?
            .ok_or_else(|| ConsoleError::not_found("Player", id))?;
        let input = form.validate(&self.store.teams().await?)?;
        let player = Player {
            name: input.name,
            team_id: input.team_id,
            position: input.position,
            stats: input.stats,
            updated_at: Utc::now(),
            ..existing
        };
        self.store.save_player(&player).await?;
        log::info!("Updated player {} ({})", player.name, player.id);
        Ok(player)
    }

    pub async fn create_match(&self, session: &Session, form: &MatchForm) -> Result<SavedMatch, ConsoleError> {
        session.require(&MANAGERS, "create matches")?;
        let input = form.validate(&self.store.teams().await?)?;
        let now = Utc::now();
        let fixture = Match {
            id: MatchId::generate(),
            home_team_id: input.home_team_id,
            away_team_id: input.away_team_id,
            date: input.date,
            time: input.time,
            venue: input.venue,
            status: input.status,
            result: input.result,
            created_at: now,
            updated_at: now,
        };
        self.save_match(fixture).await
    }

    pub async fn update_match(&self, session: &Session, id: &MatchId, form: &MatchForm) -> Result<SavedMatch, ConsoleError> {
        session.require(&MANAGERS, "edit matches")?;
        let existing = self
            .store
            .get_match(id)
            .await?
            .ok_or_else(|| ConsoleError::not_found("Match", id))?;
        let input = form.validate(&self.store.teams().await?)?;
        if existing.status != input.status {
            log::info!("{id}: status {} -> {}", existing.status, input.status);
        }
        let fixture = Match {
            home_team_id: input.home_team_id,
            away_team_id: input.away_team_id,
            date: input.date,
            time: input.time,
            venue: input.venue,
            status: input.status,
            result: input.result,
            updated_at: Utc::now(),
            ..existing
        };
        self.save_match(fixture).await
    }

    // Scorer problems are reported with the saved match, never rejected.
    async fn save_match(&self, fixture: Match) -> Result<SavedMatch, ConsoleError> {
        self.store.save_match(&fixture).await?;
        let players = self.store.players().await?;
        let issues = check_matches(std::slice::from_ref(&fixture), &players);
        log::info!("Saved match {} ({})", fixture.id, fixture.status);
        Ok(SavedMatch { fixture, issues })
    }
}
