use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{PlayerId, TeamId, UserId};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Manager,
    Player,
}

impl UserRole {
    pub const ALL: [UserRole; 3] = [UserRole::Admin, UserRole::Manager, UserRole::Player];

    pub fn is_one_of(&self, roles: &[UserRole]) -> bool {
        roles.contains(self)
    }
}

impl Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Admin => write!(f, "admin"),
            UserRole::Manager => write!(f, "manager"),
            UserRole::Player => write!(f, "player"),
        }
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UserRole::ALL
            .into_iter()
            .find(|role| role.to_string().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown role: {s}"))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    /// Owning team for managers and players.
    pub team_id: Option<TeamId>,
    /// Player record behind a player-role account, if linked.
    pub player_id: Option<PlayerId>,
}

impl User {
    pub fn has_role(&self, roles: &[UserRole]) -> bool {
        self.role.is_one_of(roles)
    }
}

impl Display for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} <{}> ({})", self.name, self.email, self.role)
    }
}
