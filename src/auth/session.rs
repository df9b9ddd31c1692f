use chrono::Duration;

use crate::auth::password;
use crate::auth::store::{StoredUser, UserStore};
use crate::auth::token::{TokenCodec, TokenUse};
use crate::core::error::Error;
use crate::types::response::TokenPair;

#[derive(Clone, Debug)]
pub(crate) struct SessionConfig {
    pub(crate) access_lifetime: Duration,
    pub(crate) refresh_lifetime: Duration,
    pub(crate) bcrypt_cost: u32,
}

/// Issues, renews, and resolves sessions against a [`UserStore`].
#[derive(Clone)]
pub(crate) struct SessionController<S> {
    store: S,
    codec: TokenCodec,
    config: SessionConfig,
}

impl<S> std::fmt::Debug for SessionController<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionController")
            .field("config", &self.config)
            .finish()
    }
}

/// Result of a successful login. The refresh token travels on a side
/// channel, never inside the token pair itself.
#[derive(Debug)]
pub(crate) struct IssuedSession {
    pub(crate) tokens: TokenPair,
    pub(crate) refresh_token: String,
    pub(crate) refresh_max_age: Duration,
}

impl<S: UserStore> SessionController<S> {
    pub(crate) fn new(store: S, secret: &str, config: SessionConfig) -> Self {
        Self {
            store,
            codec: TokenCodec::new(secret),
            config,
        }
    }

    /// Verifies the credential pair and mints an access + refresh token.
    ///
    /// An unknown subject and a wrong password both collapse to
    /// [`Error::AuthenticationFailed`].
    pub(crate) async fn issue(&self, subject: &str, password: &str) -> Result<IssuedSession, Error> {
        let user = self
            .store
            .find_by_subject(subject)
            .await?
            .ok_or(Error::AuthenticationFailed)?;

        if !password::verify(password, &user.password_digest) {
            return Err(Error::AuthenticationFailed);
        }

        let access =
            self.codec
                .encode(&user.subject, self.config.access_lifetime, TokenUse::Access)?;
        let refresh =
            self.codec
                .encode(&user.subject, self.config.refresh_lifetime, TokenUse::Refresh)?;

        Ok(IssuedSession {
            tokens: TokenPair::new(access, &user.subject),
            refresh_token: refresh,
            refresh_max_age: self.config.refresh_lifetime,
        })
    }

    /// Exchanges a valid refresh token for a new short-lived access token.
    /// The refresh token itself is not rotated.
    pub(crate) fn renew(&self, refresh_token: &str) -> Result<TokenPair, Error> {
        let claims = self
            .codec
            .decode(refresh_token, TokenUse::Refresh)
            .map_err(|_| Error::RefreshTokenInvalid)?;

        let access = self
            .codec
            .encode(&claims.sub, self.config.access_lifetime, TokenUse::Access)?;

        Ok(TokenPair::new(access, &claims.sub))
    }

    /// Resolves a bearer access token to the stored user. Any decode
    /// failure, and a subject with no backing record, are both
    /// [`Error::Unauthorized`].
    pub(crate) async fn resolve(&self, access_token: &str) -> Result<StoredUser, Error> {
        let claims = self
            .codec
            .decode(access_token, TokenUse::Access)
            .map_err(|_| Error::Unauthorized)?;

        self.store
            .find_by_subject(&claims.sub)
            .await?
            .ok_or(Error::Unauthorized)
    }

    pub(crate) fn hash_password(&self, plaintext: &str) -> Result<String, Error> {
        password::hash(plaintext, self.config.bcrypt_cost)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use async_trait::async_trait;
    use tokio::sync::RwLock;

    use super::*;

    #[derive(Clone, Default)]
    struct MemoryStore {
        users: Arc<RwLock<HashMap<String, StoredUser>>>,
    }

    #[async_trait]
    impl UserStore for MemoryStore {
        async fn find_by_subject(&self, subject: &str) -> Result<Option<StoredUser>, Error> {
            Ok(self.users.read().await.get(subject).cloned())
        }

        async fn save(&self, subject: &str, password_digest: &str) -> Result<i32, Error> {
            let mut users = self.users.write().await;

            if users.contains_key(subject) {
                return Err(Error::UserAlreadyExists);
            }

            let id = users.len() as i32 + 1;
            users.insert(
                subject.to_string(),
                StoredUser {
                    id,
                    subject: subject.to_string(),
                    password_digest: password_digest.to_string(),
                },
            );

            Ok(id)
        }
    }

    fn controller() -> SessionController<MemoryStore> {
        SessionController::new(
            MemoryStore::default(),
            "test-secret",
            SessionConfig {
                access_lifetime: Duration::minutes(15),
                refresh_lifetime: Duration::days(30),
                bcrypt_cost: 4,
            },
        )
    }

    async fn register(sessions: &SessionController<MemoryStore>, subject: &str, password: &str) {
        let digest = sessions.hash_password(password).unwrap();
        sessions.store.save(subject, &digest).await.unwrap();
    }

    #[tokio::test]
    async fn test_issue_rejects_unknown_subject() {
        let sessions = controller();

        assert!(matches!(
            sessions.issue("nobody@x.com", "password1").await,
            Err(Error::AuthenticationFailed)
        ));
    }

    #[tokio::test]
    async fn test_issue_rejects_wrong_password() {
        let sessions = controller();
        register(&sessions, "a@x.com", "password1").await;

        assert!(matches!(
            sessions.issue("a@x.com", "password2").await,
            Err(Error::AuthenticationFailed)
        ));
    }

    #[tokio::test]
    async fn test_session_lifecycle() {
        let sessions = controller();
        register(&sessions, "a@x.com", "password1").await;

        let session = sessions.issue("a@x.com", "password1").await.unwrap();
        assert_eq!(session.tokens.sub, "a@x.com");
        assert_eq!(session.tokens.token_type, "Bearer");

        let user = sessions.resolve(&session.tokens.access_token).await.unwrap();
        assert_eq!(user.subject, "a@x.com");

        let renewed = sessions.renew(&session.refresh_token).unwrap();
        let user = sessions.resolve(&renewed.access_token).await.unwrap();
        assert_eq!(user.subject, "a@x.com");
    }

    #[tokio::test]
    async fn test_renew_rejects_garbage() {
        let sessions = controller();

        assert!(matches!(
            sessions.renew("not-a-token"),
            Err(Error::RefreshTokenInvalid)
        ));
    }

    #[tokio::test]
    async fn test_refresh_token_is_not_a_bearer_credential() {
        let sessions = controller();
        register(&sessions, "a@x.com", "password1").await;

        let session = sessions.issue("a@x.com", "password1").await.unwrap();

        assert!(matches!(
            sessions.resolve(&session.refresh_token).await,
            Err(Error::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn test_access_token_cannot_renew() {
        let sessions = controller();
        register(&sessions, "a@x.com", "password1").await;

        let session = sessions.issue("a@x.com", "password1").await.unwrap();

        assert!(matches!(
            sessions.renew(&session.tokens.access_token),
            Err(Error::RefreshTokenInvalid)
        ));
    }

    #[tokio::test]
    async fn test_resolve_rejects_deleted_subject() {
        let sessions = controller();
        register(&sessions, "a@x.com", "password1").await;

        let session = sessions.issue("a@x.com", "password1").await.unwrap();

        sessions.store.users.write().await.remove("a@x.com");

        assert!(matches!(
            sessions.resolve(&session.tokens.access_token).await,
            Err(Error::Unauthorized)
        ));
    }
}
