use std::time::Duration;

use async_trait::async_trait;
use sqlx::{Sqlite, SqlitePool};
use types::{Match, MatchId, Player, PlayerId, PublishedStanding, Team, TeamId, User};

use crate::{
    fixtures::LeagueData,
    models::{MatchRow, PlayerRow, PublishedStandingRow, TeamRow, UserRow},
    retry::RetryFuture,
    retry_with_backoff, DatabaseConfig, DatabaseError, LeagueStore,
};

const CONNECT_RETRIES: usize = 3;

pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open the pool, retrying transient failures, and bring the schema up
    /// to date.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        let pool = retry_with_backoff(
            || -> RetryFuture<SqlitePool, DatabaseError> {
                let config = config.clone();
                Box::pin(async move { config.create_pool().await })
            },
            CONNECT_RETRIES,
            Duration::from_millis(100),
        )
        .await
        .map_err(|e| DatabaseError::RetryExhausted(e.to_string()))?;
        let store = Self::new(pool);
        store.run_migrations().await?;
        Ok(store)
    }

    pub async fn run_migrations(&self) -> Result<(), DatabaseError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| DatabaseError::Migration(e.to_string()))
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Load the built-in data set in one transaction. Does nothing and
    /// returns `false` when the database already holds teams.
    pub async fn seed_fixtures(&self) -> Result<bool, DatabaseError> {
        let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM teams")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DatabaseError::Query(e.to_string()))?;
        if existing > 0 {
            tracing::info!(existing, "Database already holds teams, skipping seed");
            return Ok(false);
        }

        let data = LeagueData::fixtures();
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DatabaseError::Transaction(e.to_string()))?;
        for team in &data.teams {
            upsert_team(&mut *tx, team).await?;
        }
        for player in &data.players {
            upsert_player(&mut *tx, player).await?;
        }
        for m in &data.matches {
            upsert_match(&mut *tx, m).await?;
        }
        for user in &data.users {
            upsert_user(&mut *tx, user).await?;
        }
        for (idx, row) in data.published_standings.iter().enumerate() {
            insert_published_standing(&mut *tx, idx as i64 + 1, row).await?;
        }
        tx.commit()
            .await
            .map_err(|e| DatabaseError::Transaction(e.to_string()))?;

        tracing::info!(
            teams = data.teams.len(),
            players = data.players.len(),
            matches = data.matches.len(),
            users = data.users.len(),
            "Seeded fixture data"
        );
        Ok(true)
    }
}

async fn upsert_team<'e, E>(executor: E, team: &Team) -> Result<(), DatabaseError>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        "INSERT INTO teams (id, name, logo, coach, description, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?)
         ON CONFLICT(id) DO UPDATE SET name = excluded.name, logo = excluded.logo, coach = excluded.coach,
         description = excluded.description, updated_at = excluded.updated_at",
    )
    .bind(team.id.as_str())
    .bind(&team.name)
    .bind(&team.logo)
    .bind(&team.coach)
    .bind(&team.description)
    .bind(team.created_at)
    .bind(team.updated_at)
    .execute(executor)
    .await
    .map_err(|e| DatabaseError::Query(e.to_string()))?;
    Ok(())
}

async fn upsert_player<'e, E>(executor: E, player: &Player) -> Result<(), DatabaseError>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        "INSERT INTO players (id, name, team_id, position, goals, assists, fouls, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
         ON CONFLICT(id) DO UPDATE SET name = excluded.name, team_id = excluded.team_id, position = excluded.position,
         goals = excluded.goals, assists = excluded.assists, fouls = excluded.fouls, updated_at = excluded.updated_at",
    )
    .bind(player.id.as_str())
    .bind(&player.name)
    .bind(player.team_id.as_str())
    .bind(player.position.to_string())
    .bind(i64::from(player.stats.goals))
    .bind(i64::from(player.stats.assists))
    .bind(i64::from(player.stats.fouls))
    .bind(player.created_at)
    .bind(player.updated_at)
    .execute(executor)
    .await
    .map_err(|e| DatabaseError::Query(e.to_string()))?;
    Ok(())
}

async fn upsert_match<'e, E>(executor: E, m: &Match) -> Result<(), DatabaseError>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let scorers_json = m
        .result
        .as_ref()
        .map(|result| serde_json::to_string(&result.scorers))
        .transpose()
        .map_err(DatabaseError::Serialization)?;
    sqlx::query(
        "INSERT INTO matches (id, home_team_id, away_team_id, date, time, venue, status, home_score, away_score, scorers, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
         ON CONFLICT(id) DO UPDATE SET home_team_id = excluded.home_team_id, away_team_id = excluded.away_team_id,
         date = excluded.date, time = excluded.time, venue = excluded.venue, status = excluded.status,
         home_score = excluded.home_score, away_score = excluded.away_score, scorers = excluded.scorers,
         updated_at = excluded.updated_at",
    )
    .bind(m.id.as_str())
    .bind(m.home_team_id.as_str())
    .bind(m.away_team_id.as_str())
    .bind(m.date)
    .bind(m.time)
    .bind(&m.venue)
    .bind(m.status.to_string())
    .bind(m.result.as_ref().map(|r| i64::from(r.home_score)))
    .bind(m.result.as_ref().map(|r| i64::from(r.away_score)))
    .bind(scorers_json)
    .bind(m.created_at)
    .bind(m.updated_at)
    .execute(executor)
    .await
    .map_err(|e| DatabaseError::Query(e.to_string()))?;
    Ok(())
}

async fn upsert_user<'e, E>(executor: E, user: &User) -> Result<(), DatabaseError>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        "INSERT INTO users (id, name, email, role, team_id, player_id) VALUES (?, ?, ?, ?, ?, ?)
         ON CONFLICT(id) DO UPDATE SET name = excluded.name, email = excluded.email, role = excluded.role,
         team_id = excluded.team_id, player_id = excluded.player_id",
    )
    .bind(user.id.as_str())
    .bind(&user.name)
    .bind(&user.email)
    .bind(user.role.to_string())
    .bind(user.team_id.as_ref().map(|id| id.as_str()))
    .bind(user.player_id.as_ref().map(|id| id.as_str()))
    .execute(executor)
    .await
    .map_err(|e| DatabaseError::Query(e.to_string()))?;
    Ok(())
}

async fn insert_published_standing<'e, E>(
    executor: E,
    position: i64,
    row: &PublishedStanding,
) -> Result<(), DatabaseError>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        "INSERT INTO published_standings (position, team_id, team_name, played, won, drawn, lost, goals_for, goals_against, goal_difference, points)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(position)
    .bind(row.team_id.as_str())
    .bind(&row.team_name)
    .bind(i64::from(row.played))
    .bind(i64::from(row.won))
    .bind(i64::from(row.drawn))
    .bind(i64::from(row.lost))
    .bind(i64::from(row.goals_for))
    .bind(i64::from(row.goals_against))
    .bind(row.goal_difference)
    .bind(i64::from(row.points))
    .execute(executor)
    .await
    .map_err(|e| DatabaseError::Query(e.to_string()))?;
    Ok(())
}

#[async_trait]
impl LeagueStore for SqliteStore {
    async fn teams(&self) -> Result<Vec<Team>, DatabaseError> {
        let rows: Vec<TeamRow> = sqlx::query_as("SELECT * FROM teams ORDER BY rowid")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DatabaseError::Query(e.to_string()))?;
        Ok(rows.into_iter().map(Team::from).collect())
    }

    async fn team(&self, id: &TeamId) -> Result<Option<Team>, DatabaseError> {
        let row: Option<TeamRow> = sqlx::query_as("SELECT * FROM teams WHERE id = ?")
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DatabaseError::Query(e.to_string()))?;
        Ok(row.map(Team::from))
    }

    async fn save_team(&self, team: &Team) -> Result<(), DatabaseError> {
        upsert_team(&self.pool, team).await?;
        tracing::info!(team_id = %team.id, "Saved team {}", team.name);
        Ok(())
    }

    async fn players(&self) -> Result<Vec<Player>, DatabaseError> {
        let rows: Vec<PlayerRow> = sqlx::query_as("SELECT * FROM players ORDER BY rowid")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DatabaseError::Query(e.to_string()))?;
        rows.into_iter().map(Player::try_from).collect()
    }

    async fn player(&self, id: &PlayerId) -> Result<Option<Player>, DatabaseError> {
        let row: Option<PlayerRow> = sqlx::query_as("SELECT * FROM players WHERE id = ?")
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DatabaseError::Query(e.to_string()))?;
        row.map(Player::try_from).transpose()
    }

    async fn save_player(&self, player: &Player) -> Result<(), DatabaseError> {
        upsert_player(&self.pool, player).await?;
        tracing::info!(player_id = %player.id, "Saved player {}", player.name);
        Ok(())
    }

    async fn matches(&self) -> Result<Vec<Match>, DatabaseError> {
        let rows: Vec<MatchRow> = sqlx::query_as("SELECT * FROM matches ORDER BY rowid")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DatabaseError::Query(e.to_string()))?;
        rows.into_iter().map(Match::try_from).collect()
    }

    async fn get_match(&self, id: &MatchId) -> Result<Option<Match>, DatabaseError> {
        let row: Option<MatchRow> = sqlx::query_as("SELECT * FROM matches WHERE id = ?")
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DatabaseError::Query(e.to_string()))?;
        row.map(Match::try_from).transpose()
    }

    async fn save_match(&self, m: &Match) -> Result<(), DatabaseError> {
        upsert_match(&self.pool, m).await?;
        tracing::info!(match_id = %m.id, status = %m.status, "Saved match");
        Ok(())
    }

    async fn users(&self) -> Result<Vec<User>, DatabaseError> {
        let rows: Vec<UserRow> = sqlx::query_as("SELECT * FROM users ORDER BY rowid")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DatabaseError::Query(e.to_string()))?;
        rows.into_iter().map(User::try_from).collect()
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let row: Option<UserRow> = sqlx::query_as("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DatabaseError::Query(e.to_string()))?;
        row.map(User::try_from).transpose()
    }

    async fn save_user(&self, user: &User) -> Result<(), DatabaseError> {
        upsert_user(&self.pool, user).await?;
        tracing::info!(user_id = %user.id, role = %user.role, "Saved user");
        Ok(())
    }

    async fn published_standings(&self) -> Result<Vec<PublishedStanding>, DatabaseError> {
        let rows: Vec<PublishedStandingRow> =
            sqlx::query_as("SELECT * FROM published_standings ORDER BY position")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| DatabaseError::Query(e.to_string()))?;
        rows.into_iter().map(PublishedStanding::try_from).collect()
    }
}
