use std::sync::Arc;

use tracing::{info, instrument};
use uuid::Uuid;

use crate::data::user_repository::UserRepository;
use crate::domain::{error::DomainError, user::User};
use crate::infrastructure::security::{JwtKeys, PasswordHashing};

const INVALID_CREDENTIALS: &str = "invalid credentials";

/// A freshly issued token together with the user it was issued for.
#[derive(Debug)]
pub struct AuthSession {
    pub token: String,
    pub user: User,
}

#[derive(Clone)]
pub struct AuthService {
    repo: Arc<dyn UserRepository>,
    keys: JwtKeys,
    passwords: PasswordHashing,
}

impl AuthService {
    pub fn new(repo: Arc<dyn UserRepository>, keys: JwtKeys, passwords: PasswordHashing) -> Self {
        Self {
            repo,
            keys,
            passwords,
        }
    }

    pub fn keys(&self) -> &JwtKeys {
        &self.keys
    }

    pub async fn get_user(&self, id: Uuid) -> Result<User, DomainError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(DomainError::UserNotFound(id))
    }

    #[instrument(skip(self, password))]
    pub async fn register(
        &self,
        name: String,
        email: String,
        password: String,
    ) -> Result<AuthSession, DomainError> {
        let email = email.to_lowercase();
        if self.repo.find_by_email(&email).await?.is_some() {
            return Err(DomainError::UserAlreadyExists(email));
        }

        let hash = self.passwords.hash(&password).map_err(DomainError::internal)?;
        let user = self.repo.create(User::new(name, email, hash)).await?;
        info!(user_id = %user.id, "user registered");

        self.session(user)
    }

    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthSession, DomainError> {
        let user = self
            .repo
            .find_by_email(&email.to_lowercase())
            .await?
            .ok_or_else(|| DomainError::Unauthorized(INVALID_CREDENTIALS.into()))?;

        let valid = self
            .passwords
            .verify(password, &user.password_hash)
            .map_err(DomainError::internal)?;
        if !valid {
            return Err(DomainError::Unauthorized(INVALID_CREDENTIALS.into()));
        }

        self.session(user)
    }

    fn session(&self, user: User) -> Result<AuthSession, DomainError> {
        let token = self
            .keys
            .generate_token(user.id)
            .map_err(DomainError::internal)?;
        Ok(AuthSession { token, user })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::memory::InMemoryStore;

    fn service() -> AuthService {
        AuthService::new(
            Arc::new(InMemoryStore::new()),
            JwtKeys::new("test-secret".into(), 24),
            PasswordHashing::new(1),
        )
    }

    #[tokio::test]
    async fn register_lowercases_email_and_issues_token() {
        let auth = service();
        let session = auth
            .register("Maria".into(), "Maria@Example.COM".into(), "Secret123".into())
            .await
            .unwrap();

        assert_eq!(session.user.email, "maria@example.com");
        assert_ne!(session.user.password_hash, "Secret123");
        let claims = auth.keys().verify_token(&session.token).unwrap();
        assert_eq!(claims.sub, session.user.id.to_string());
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected_and_first_user_kept() {
        let auth = service();
        let first = auth
            .register("Maria".into(), "maria@example.com".into(), "Secret123".into())
            .await
            .unwrap();

        let err = auth
            .register("Other".into(), "MARIA@example.com".into(), "Other123".into())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::UserAlreadyExists(_)));

        let kept = auth.get_user(first.user.id).await.unwrap();
        assert_eq!(kept.name, "Maria");
        assert!(auth.login("maria@example.com", "Secret123").await.is_ok());
    }

    #[tokio::test]
    async fn login_uses_one_message_for_unknown_email_and_wrong_password() {
        let auth = service();
        auth.register("Maria".into(), "maria@example.com".into(), "Secret123".into())
            .await
            .unwrap();

        let unknown = auth.login("nobody@example.com", "Secret123").await.unwrap_err();
        let wrong = auth.login("maria@example.com", "Wrong1234").await.unwrap_err();
        assert_eq!(unknown.to_string(), INVALID_CREDENTIALS);
        assert_eq!(wrong.to_string(), INVALID_CREDENTIALS);
    }

    #[tokio::test]
    async fn login_is_case_insensitive_on_email() {
        let auth = service();
        let registered = auth
            .register("Maria".into(), "maria@example.com".into(), "Secret123".into())
            .await
            .unwrap();
        let session = auth.login("MARIA@EXAMPLE.com", "Secret123").await.unwrap();
        assert_eq!(session.user.id, registered.user.id);
    }

    #[tokio::test]
    async fn corrupt_stored_hash_is_an_internal_error() {
        let store = Arc::new(InMemoryStore::new());
        store
            .create(User::new("Maria".into(), "maria@example.com".into(), "plaintext".into()))
            .await
            .unwrap();
        let auth = AuthService::new(
            store,
            JwtKeys::new("test-secret".into(), 24),
            PasswordHashing::new(1),
        );

        let err = auth.login("maria@example.com", "plaintext").await.unwrap_err();
        assert!(matches!(err, DomainError::Internal(_)));
    }

    #[tokio::test]
    async fn zero_work_factor_fails_registration() {
        let auth = AuthService::new(
            Arc::new(InMemoryStore::new()),
            JwtKeys::new("test-secret".into(), 24),
            PasswordHashing::new(0),
        );
        let err = auth
            .register("Maria".into(), "maria@example.com".into(), "Secret123".into())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Internal(_)));
    }

    #[tokio::test]
    async fn unknown_user_id_is_not_found() {
        let err = service().get_user(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, DomainError::UserNotFound(_)));
    }
}
