use database::LeagueStore;
use serde::Serialize;
use types::{User, UserId, UserRole};

use crate::{forms::RegisterForm, ConsoleError};

/// Roles allowed to create and edit league records.
pub const MANAGERS: [UserRole; 2] = [UserRole::Admin, UserRole::Manager];

/// The signed-in user. Every service call takes one explicitly.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Session {
    user: User,
}

impl Session {
    pub fn new(user: User) -> Self {
        Self { user }
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn role(&self) -> UserRole {
        self.user.role
    }

    pub fn has_role(&self, roles: &[UserRole]) -> bool {
        self.user.has_role(roles)
    }

    pub fn can_manage(&self) -> bool {
        self.has_role(&MANAGERS)
    }

    pub fn require(&self, roles: &[UserRole], action: &str) -> Result<(), ConsoleError> {
        if self.has_role(roles) {
            return Ok(());
        }
        log::warn!("{} ({}) may not {action}", self.user.email, self.user.role);
        Err(ConsoleError::Forbidden {
            role: self.user.role,
            action: action.to_string(),
        })
    }
}

/// Look the account up by email. Passwords are not stored, so any
/// non-empty password is accepted.
pub async fn login<S>(store: &S, email: &str, password: &str) -> Result<Session, ConsoleError>
where
    S: LeagueStore + ?Sized,
{
    if password.is_empty() {
        return Err(ConsoleError::InvalidCredentials);
    }
    match store.find_user_by_email(email.trim()).await? {
        Some(user) => {
            log::info!("Signed in as {} ({})", user.email, user.role);
            Ok(Session::new(user))
        }
        None => {
            log::info!("Sign-in failed for {email}");
            Err(ConsoleError::InvalidCredentials)
        }
    }
}

/// Create an account from a validated form and sign it in.
pub async fn register<S>(store: &S, form: &RegisterForm) -> Result<Session, ConsoleError>
where
    S: LeagueStore + ?Sized,
{
    let role = form.validate()?;
    let email = form.email.trim();
    if store.find_user_by_email(email).await?.is_some() {
        return Err(ConsoleError::EmailTaken(email.to_string()));
    }
    let user = User {
        id: UserId::generate(),
        name: form.name.trim().to_string(),
        email: email.to_string(),
        role,
        team_id: None,
        player_id: None,
    };
    store.save_user(&user).await?;
    log::info!("Registered {} as {}", user.email, user.role);
    Ok(Session::new(user))
}

#[cfg(test)]
mod tests {
    use super::*;
    use database::FixtureStore;

    #[tokio::test]
    async fn login_needs_a_known_email_and_a_password() {
        let store = FixtureStore::seeded();
        let session = login(&store, "manager1@example.com", "pw").await.unwrap();
        assert_eq!(session.role(), UserRole::Manager);
        assert!(session.can_manage());

        assert!(matches!(
            login(&store, "manager1@example.com", "").await,
            Err(ConsoleError::InvalidCredentials)
        ));
        assert!(matches!(
            login(&store, "nobody@example.com", "pw").await,
            Err(ConsoleError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn players_cannot_manage() {
        let store = FixtureStore::seeded();
        let session = login(&store, "player1@example.com", "pw").await.unwrap();
        let err = session.require(&MANAGERS, "create teams").unwrap_err();
        assert_eq!(err.to_string(), "A player account may not create teams");
    }

    #[tokio::test]
    async fn register_rejects_taken_emails() {
        let store = FixtureStore::seeded();
        let mut form = RegisterForm {
            name: "Fan".to_string(),
            email: "admin@example.com".to_string(),
            password: "pw".to_string(),
            confirm_password: "pw".to_string(),
            ..RegisterForm::default()
        };
        assert!(matches!(
            register(&store, &form).await,
            Err(ConsoleError::EmailTaken(_))
        ));

        form.email = "fan@example.com".to_string();
        let session = register(&store, &form).await.unwrap();
        assert!(session.user().id.as_str().starts_with("user-"));
        assert_eq!(session.role(), UserRole::Player);
        assert!(login(&store, "fan@example.com", "pw").await.is_ok());
    }
}
