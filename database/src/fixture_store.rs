use async_trait::async_trait;
use tokio::sync::RwLock;
use types::{Match, MatchId, Player, PlayerId, PublishedStanding, Team, TeamId, User};

use crate::{fixtures::LeagueData, DatabaseError, LeagueStore};

/// In-memory store. Edits live as long as the process does.
pub struct FixtureStore {
    data: RwLock<LeagueData>,
}

impl FixtureStore {
    pub fn new(data: LeagueData) -> Self {
        Self {
            data: RwLock::new(data),
        }
    }

    /// Store preloaded with the built-in league data set.
    pub fn seeded() -> Self {
        Self::new(LeagueData::fixtures())
    }

    pub async fn snapshot(&self) -> LeagueData {
        self.data.read().await.clone()
    }
}

impl Default for FixtureStore {
    fn default() -> Self {
        Self::new(LeagueData::default())
    }
}

fn upsert<T: Clone>(records: &mut Vec<T>, record: &T, same: impl Fn(&T) -> bool) -> bool {
    match records.iter_mut().find(|existing| same(existing)) {
        Some(existing) => {
            *existing = record.clone();
            false
        }
        None => {
            records.push(record.clone());
            true
        }
    }
}

#[async_trait]
impl LeagueStore for FixtureStore {
    async fn teams(&self) -> Result<Vec<Team>, DatabaseError> {
        Ok(self.data.read().await.teams.clone())
    }

    async fn team(&self, id: &TeamId) -> Result<Option<Team>, DatabaseError> {
        let data = self.data.read().await;
        Ok(data.teams.iter().find(|team| &team.id == id).cloned())
    }

    async fn save_team(&self, team: &Team) -> Result<(), DatabaseError> {
        let mut data = self.data.write().await;
        let inserted = upsert(&mut data.teams, team, |t| t.id == team.id);
        tracing::info!(team_id = %team.id, inserted, "Saved team {}", team.name);
        Ok(())
    }

    async fn players(&self) -> Result<Vec<Player>, DatabaseError> {
        Ok(self.data.read().await.players.clone())
    }

    async fn player(&self, id: &PlayerId) -> Result<Option<Player>, DatabaseError> {
        let data = self.data.read().await;
        Ok(data.players.iter().find(|player| &player.id == id).cloned())
    }

    async fn save_player(&self, player: &Player) -> Result<(), DatabaseError> {
        let mut data = self.data.write().await;
        let inserted = upsert(&mut data.players, player, |p| p.id == player.id);
        tracing::info!(player_id = %player.id, inserted, "Saved player {}", player.name);
        Ok(())
    }

    async fn matches(&self) -> Result<Vec<Match>, DatabaseError> {
        Ok(self.data.read().await.matches.clone())
    }

    async fn get_match(&self, id: &MatchId) -> Result<Option<Match>, DatabaseError> {
        let data = self.data.read().await;
        Ok(data.matches.iter().find(|m| &m.id == id).cloned())
    }

    async fn save_match(&self, m: &Match) -> Result<(), DatabaseError> {
        let mut data = self.data.write().await;
        let inserted = upsert(&mut data.matches, m, |existing| existing.id == m.id);
        tracing::info!(match_id = %m.id, inserted, status = %m.status, "Saved match");
        Ok(())
    }

    async fn users(&self) -> Result<Vec<User>, DatabaseError> {
        Ok(self.data.read().await.users.clone())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let data = self.data.read().await;
        Ok(data.users.iter().find(|user| user.email == email).cloned())
    }

    async fn save_user(&self, user: &User) -> Result<(), DatabaseError> {
        let mut data = self.data.write().await;
        let inserted = upsert(&mut data.users, user, |u| u.id == user.id);
        tracing::info!(user_id = %user.id, inserted, role = %user.role, "Saved user");
        Ok(())
    }

    async fn published_standings(&self) -> Result<Vec<PublishedStanding>, DatabaseError> {
        Ok(self.data.read().await.published_standings.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn saves_replace_by_id_and_keep_order() {
        let store = FixtureStore::seeded();
        let mut team = store.team(&TeamId::new("team-2")).await.unwrap().unwrap();
        team.coach = "Someone Else".to_string();
        store.save_team(&team).await.unwrap();

        let teams = store.teams().await.unwrap();
        assert_eq!(teams.len(), 4);
        assert_eq!(teams[1].coach, "Someone Else");
    }

    #[tokio::test]
    async fn new_records_are_appended() {
        let store = FixtureStore::default();
        let mut data = LeagueData::fixtures();
        let user = data.users.remove(0);
        store.save_user(&user).await.unwrap();

        let found = store.find_user_by_email("admin@example.com").await.unwrap();
        assert_eq!(found, Some(user));
        assert!(store.find_user_by_email("nobody@example.com").await.unwrap().is_none());
    }
}
