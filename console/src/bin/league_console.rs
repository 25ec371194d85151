//! League administration console.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::{
    login, register, views, ConsoleConfig, ConsoleError, LeagueService, MatchFilter, MatchForm,
    PlayerFilter, PlayerForm, RegisterForm, Session, TeamForm,
};
use database::{open_store, DatabaseConfig, LeagueStore, SqliteStore};
use serde::Serialize;
use standings::{Column, SortDirection, StandingsOrder};
use types::{MatchId, MatchStatus, PlayerId, Position, TeamId};

#[derive(Parser)]
#[command(name = "league-console")]
#[command(about = "Manage teams, players, matches and the league table", long_about = None)]
struct Cli {
    /// Email of the account to act as
    #[arg(long = "as", global = true)]
    as_email: Option<String>,

    /// Password for the account
    #[arg(long, global = true)]
    password: Option<String>,

    /// SQLite URL or path, or "fixtures" for the built-in data
    #[arg(long, global = true)]
    database: Option<String>,

    /// YAML config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Counts, upcoming matches, top teams and scorers
    Dashboard,
    /// League table derived from completed matches
    Standings {
        /// Column to sort by (points, played, won, drawn, lost, gf, ga, gd)
        #[arg(long, default_value = "points")]
        sort: Column,
        /// Sort ascending instead of descending
        #[arg(long)]
        asc: bool,
    },
    Teams {
        #[command(subcommand)]
        action: TeamCommands,
    },
    Players {
        #[command(subcommand)]
        action: PlayerCommands,
    },
    Matches {
        #[command(subcommand)]
        action: MatchCommands,
    },
    /// Create an account (uses --password)
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        /// Password confirmation
        #[arg(long)]
        confirm: String,
        #[arg(long, default_value = "player")]
        role: String,
    },
    /// Show the signed-in account
    Whoami,
    /// Check match results and the published table for inconsistencies
    Audit,
    /// Load the built-in data into an empty SQLite database
    Seed,
}

#[derive(Subcommand, Debug)]
enum TeamCommands {
    List {
        /// Match against team name or coach
        #[arg(long)]
        search: Option<String>,
    },
    Show {
        id: String,
    },
    Create {
        #[command(flatten)]
        fields: TeamFields,
    },
    Edit {
        id: String,
        #[command(flatten)]
        fields: TeamFields,
    },
}

#[derive(clap::Args, Debug)]
struct TeamFields {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    coach: Option<String>,
    #[arg(long)]
    logo: Option<String>,
    #[arg(long)]
    description: Option<String>,
}

impl TeamFields {
    fn apply(self, mut form: TeamForm) -> TeamForm {
        set(&mut form.name, self.name);
        set(&mut form.coach, self.coach);
        set(&mut form.logo, self.logo);
        set(&mut form.description, self.description);
        form
    }
}

#[derive(Subcommand, Debug)]
enum PlayerCommands {
    List {
        /// Match against player name
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        team: Option<String>,
        #[arg(long)]
        position: Option<Position>,
    },
    Show {
        id: String,
    },
    Create {
        #[command(flatten)]
        fields: PlayerFields,
    },
    Edit {
        id: String,
        #[command(flatten)]
        fields: PlayerFields,
    },
}

#[derive(clap::Args, Debug)]
struct PlayerFields {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    team: Option<String>,
    #[arg(long)]
    position: Option<String>,
    #[arg(long)]
    goals: Option<String>,
    #[arg(long)]
    assists: Option<String>,
    #[arg(long)]
    fouls: Option<String>,
}

impl PlayerFields {
    fn apply(self, mut form: PlayerForm) -> PlayerForm {
        set(&mut form.name, self.name);
        set(&mut form.team_id, self.team);
        set(&mut form.position, self.position);
        set(&mut form.goals, self.goals);
        set(&mut form.assists, self.assists);
        set(&mut form.fouls, self.fouls);
        form
    }
}

#[derive(Subcommand, Debug)]
enum MatchCommands {
    List {
        /// Match against team names or venue
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        team: Option<String>,
        #[arg(long)]
        status: Option<MatchStatus>,
    },
    Show {
        id: String,
    },
    Create {
        #[command(flatten)]
        fields: MatchFields,
    },
    Edit {
        id: String,
        #[command(flatten)]
        fields: MatchFields,
    },
}

#[derive(clap::Args, Debug)]
struct MatchFields {
    #[arg(long)]
    home: Option<String>,
    #[arg(long)]
    away: Option<String>,
    /// YYYY-MM-DD
    #[arg(long)]
    date: Option<String>,
    /// HH:MM
    #[arg(long)]
    time: Option<String>,
    #[arg(long)]
    venue: Option<String>,
    #[arg(long)]
    status: Option<String>,
    #[arg(long)]
    home_score: Option<String>,
    #[arg(long)]
    away_score: Option<String>,
    /// Player id of a goal scorer, once per goal; replaces the stored list
    #[arg(long = "scorer")]
    scorers: Vec<String>,
}

impl MatchFields {
    fn apply(self, mut form: MatchForm) -> MatchForm {
        set(&mut form.home_team_id, self.home);
        set(&mut form.away_team_id, self.away);
        set(&mut form.date, self.date);
        set(&mut form.time, self.time);
        set(&mut form.venue, self.venue);
        set(&mut form.status, self.status);
        set(&mut form.home_score, self.home_score);
        set(&mut form.away_score, self.away_score);
        if !self.scorers.is_empty() {
            form.scorers = self.scorers;
        }
        form
    }
}

fn set(field: &mut String, value: Option<String>) {
    if let Some(value) = value {
        *field = value;
    }
}

fn emit<T: Serialize>(json: bool, value: &T, text: impl FnOnce(&T) -> String) -> Result<(), ConsoleError> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        println!("{}", text(value));
    }
    Ok(())
}

async fn sign_in<S: LeagueStore>(service: &LeagueService<S>, cli: &Cli) -> Result<Session, ConsoleError> {
    let email = cli.as_email.as_deref().ok_or(ConsoleError::NotAuthenticated)?;
    login(service.store(), email, cli.password.as_deref().unwrap_or_default()).await
}

async fn seed(config: &DatabaseConfig) -> Result<(), ConsoleError> {
    if config.is_fixtures() {
        return Err(ConsoleError::Config(
            "seed needs a SQLite database (--database or DATABASE_URL)".to_string(),
        ));
    }
    let store = SqliteStore::connect(config).await?;
    if store.seed_fixtures().await? {
        println!("Seeded {}", config.url);
    } else {
        println!("{} already holds league data, nothing to do", config.url);
    }
    Ok(())
}

async fn run(cli: Cli) -> Result<(), ConsoleError> {
    let config = ConsoleConfig::load(cli.config.as_deref())?;
    let db_config = DatabaseConfig::from_cli_or_env_or_yaml(cli.database.clone(), cli.config.as_deref())?;
    if matches!(cli.command, Commands::Seed) {
        return seed(&db_config).await;
    }
    let service = LeagueService::new(open_store(&db_config).await?, config);
    let json = cli.json;

    if let Commands::Register {
        name,
        email,
        confirm,
        role,
    } = &cli.command
    {
        let form = RegisterForm {
            name: name.clone(),
            email: email.clone(),
            password: cli.password.clone().unwrap_or_default(),
            confirm_password: confirm.clone(),
            role: role.clone(),
        };
        let session = register(service.store(), &form).await?;
        return emit(json, &session, views::render_session);
    }

    let session = sign_in(&service, &cli).await?;
    match cli.command {
        Commands::Dashboard => emit(json, &service.dashboard(&session).await?, views::render_dashboard),
        Commands::Standings { sort, asc } => {
            let direction = if asc {
                SortDirection::Ascending
            } else {
                SortDirection::Descending
            };
            let table = service
                .standings(&session, StandingsOrder::new(sort, direction))
                .await?;
            emit(json, &table, views::render_standings)
        }
        Commands::Teams { action } => match action {
            TeamCommands::List { search } => {
                let teams = service.teams(&session, search.as_deref()).await?;
                emit(json, &teams, |teams| views::render_teams(teams))
            }
            TeamCommands::Show { id } => {
                let detail = service.team_detail(&session, &TeamId::new(id)).await?;
                emit(json, &detail, views::render_team_detail)
            }
            TeamCommands::Create { fields } => {
                let team = service
                    .create_team(&session, &fields.apply(TeamForm::default()))
                    .await?;
                emit(json, &team, |team| format!("Created {} ({})", team.name, team.id))
            }
            TeamCommands::Edit { id, fields } => {
                let id = TeamId::new(id);
                let existing = service.team_detail(&session, &id).await?.team;
                let form = fields.apply(TeamForm::from_team(&existing));
                let team = service.update_team(&session, &id, &form).await?;
                emit(json, &team, |team| format!("Updated {} ({})", team.name, team.id))
            }
        },
        Commands::Players { action } => match action {
            PlayerCommands::List {
                search,
                team,
                position,
            } => {
                let filter = PlayerFilter {
                    search,
                    team_id: team.map(TeamId::new),
                    position,
                };
                let players = service.players(&session, &filter).await?;
                emit(json, &players, |players| views::render_players(players))
            }
            PlayerCommands::Show { id } => {
                let detail = service.player_detail(&session, &PlayerId::new(id)).await?;
                emit(json, &detail, views::render_player_detail)
            }
            PlayerCommands::Create { fields } => {
                let form = fields.apply(PlayerForm {
                    goals: "0".to_string(),
                    assists: "0".to_string(),
                    fouls: "0".to_string(),
                    ..PlayerForm::default()
                });
                let player = service.create_player(&session, &form).await?;
                emit(json, &player, |p| format!("Created {} ({})", p.name, p.id))
            }
            PlayerCommands::Edit { id, fields } => {
                let id = PlayerId::new(id);
                let existing = service.player_detail(&session, &id).await?.summary.player;
                let form = fields.apply(PlayerForm::from_player(&existing));
                let player = service.update_player(&session, &id, &form).await?;
                emit(json, &player, |p| format!("Updated {} ({})", p.name, p.id))
            }
        },
        Commands::Matches { action } => match action {
            MatchCommands::List {
                search,
                team,
                status,
            } => {
                let filter = MatchFilter {
                    search,
                    team_id: team.map(TeamId::new),
                    status,
                };
                let matches = service.matches(&session, &filter).await?;
                emit(json, &matches, |matches| views::render_matches(matches))
            }
            MatchCommands::Show { id } => {
                let detail = service.match_detail(&session, &MatchId::new(id)).await?;
                emit(json, &detail, views::render_match_detail)
            }
            MatchCommands::Create { fields } => {
                let form = fields.apply(MatchForm {
                    status: MatchStatus::Scheduled.to_string(),
                    ..MatchForm::default()
                });
                let saved = service.create_match(&session, &form).await?;
                emit(json, &saved, views::render_saved_match)
            }
            MatchCommands::Edit { id, fields } => {
                let id = MatchId::new(id);
                let existing = service.match_detail(&session, &id).await?.summary.fixture;
                let form = fields.apply(MatchForm::from_match(&existing));
                let saved = service.update_match(&session, &id, &form).await?;
                emit(json, &saved, views::render_saved_match)
            }
        },
        Commands::Whoami => emit(json, &session, views::render_session),
        Commands::Audit => emit(json, &service.audit(&session).await?, views::render_audit),
        Commands::Register { .. } | Commands::Seed => Ok(()),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();
    log::debug!("command: {:?}", cli.command);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        if let ConsoleError::Validation(errors) = &e {
            eprintln!("{}", views::render_form_errors(errors));
        }
        std::process::exit(1);
    }
}
