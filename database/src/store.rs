use async_trait::async_trait;
use types::{Match, MatchId, Player, PlayerId, PublishedStanding, Team, TeamId, User};

use crate::DatabaseError;

/// Read and write access to league records. Lists come back in insertion
/// order; saves insert or replace by id.
#[async_trait]
pub trait LeagueStore: Send + Sync {
    async fn teams(&self) -> Result<Vec<Team>, DatabaseError>;
    async fn team(&self, id: &TeamId) -> Result<Option<Team>, DatabaseError>;
    async fn save_team(&self, team: &Team) -> Result<(), DatabaseError>;

    async fn players(&self) -> Result<Vec<Player>, DatabaseError>;
    async fn player(&self, id: &PlayerId) -> Result<Option<Player>, DatabaseError>;
    async fn save_player(&self, player: &Player) -> Result<(), DatabaseError>;

    async fn matches(&self) -> Result<Vec<Match>, DatabaseError>;
    async fn get_match(&self, id: &MatchId) -> Result<Option<Match>, DatabaseError>;
    async fn save_match(&self, m: &Match) -> Result<(), DatabaseError>;

    async fn users(&self) -> Result<Vec<User>, DatabaseError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError>;
    async fn save_user(&self, user: &User) -> Result<(), DatabaseError>;

    async fn published_standings(&self) -> Result<Vec<PublishedStanding>, DatabaseError>;
}

#[async_trait]
impl<S: LeagueStore + ?Sized> LeagueStore for Box<S> {
    async fn teams(&self) -> Result<Vec<Team>, DatabaseError> {
        (**self).teams().await
    }

    async fn team(&self, id: &TeamId) -> Result<Option<Team>, DatabaseError> {
        (**self).team(id).await
    }

    async fn save_team(&self, team: &Team) -> Result<(), DatabaseError> {
        (**self).save_team(team).await
    }

    async fn players(&self) -> Result<Vec<Player>, DatabaseError> {
        (**self).players().await
    }

    async fn player(&self, id: &PlayerId) -> Result<Option<Player>, DatabaseError> {
        (**self).player(id).await
    }

    async fn save_player(&self, player: &Player) -> Result<(), DatabaseError> {
        (**self).save_player(player).await
    }

    async fn matches(&self) -> Result<Vec<Match>, DatabaseError> {
        (**self).matches().await
    }

    async fn get_match(&self, id: &MatchId) -> Result<Option<Match>, DatabaseError> {
        (**self).get_match(id).await
    }

    async fn save_match(&self, m: &Match) -> Result<(), DatabaseError> {
        (**self).save_match(m).await
    }

    async fn users(&self) -> Result<Vec<User>, DatabaseError> {
        (**self).users().await
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        (**self).find_user_by_email(email).await
    }

    async fn save_user(&self, user: &User) -> Result<(), DatabaseError> {
        (**self).save_user(user).await
    }

    async fn published_standings(&self) -> Result<Vec<PublishedStanding>, DatabaseError> {
        (**self).published_standings().await
    }
}
