//! Auth service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use sqlx::PgPool;
use tracing::warn;

use crate::auth::{
    AuthServiceError, IssuedSessionToken, NewSession, SessionTokenVersion, SessionUuid, UserUuid,
    format_session_token, generate_session_token_secret, parse_session_token,
    repository::PgAuthRepository, session_token_verifier, verifiers_match,
};

#[derive(Debug, Clone)]
pub struct PgAuthService {
    repository: PgAuthRepository,
}

impl PgAuthService {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: PgAuthRepository::new(pool),
        }
    }

    /// Issue a new session token for `user`.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be stored.
    pub async fn issue_session_token(
        &self,
        user: UserUuid,
        expires_at: Option<Timestamp>,
    ) -> Result<IssuedSessionToken, AuthServiceError> {
        let session_uuid = SessionUuid::new();
        let version = SessionTokenVersion::V1;
        let secret = generate_session_token_secret();
        let token = format_session_token(session_uuid.into_uuid(), version, &secret);

        let token_hash = session_token_verifier(&session_uuid.into_uuid(), version, user, &secret);

        let metadata = self
            .repository
            .create_session(&NewSession {
                uuid: session_uuid,
                user_uuid: user,
                version,
                token_hash,
                expires_at,
            })
            .await?;

        Ok(IssuedSessionToken { token, metadata })
    }
}

#[async_trait]
impl AuthService for PgAuthService {
    async fn authenticate_bearer(&self, bearer_token: &str) -> Result<UserUuid, AuthServiceError> {
        let parsed = parse_session_token(bearer_token).map_err(|_ignored| AuthServiceError::NotFound)?;

        let session = self
            .repository
            .find_active_session(parsed.session_uuid, parsed.version)
            .await?
            .ok_or(AuthServiceError::NotFound)?;

        let verifier = session_token_verifier(
            &parsed.session_uuid,
            parsed.version,
            session.user_uuid,
            &parsed.secret,
        );

        if session.version != parsed.version || !verifiers_match(&session.token_hash, &verifier) {
            return Err(AuthServiceError::NotFound);
        }

        if let Err(source) = self.repository.touch_session(parsed.session_uuid).await {
            warn!("failed to record session use: {source}");
        }

        Ok(session.user_uuid)
    }
}

#[automock]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Resolve a bearer token to the user it was issued for.
    async fn authenticate_bearer(&self, bearer_token: &str) -> Result<UserUuid, AuthServiceError>;
}

#[cfg(test)]
mod tests {
    use jiff::ToSpan;
    use testresult::TestResult;

    use crate::test::TestContext;

    use super::*;

    #[tokio::test]
    async fn issued_token_authenticates_its_user() -> TestResult {
        let ctx = TestContext::new().await;
        let service = PgAuthService::new(ctx.db.pool().clone());
        let user = UserUuid::new();

        let issued = service.issue_session_token(user, None).await?;
        let authenticated = service.authenticate_bearer(&issued.token).await?;

        assert_eq!(authenticated, user);
        assert_eq!(issued.metadata.user_uuid, user);

        Ok(())
    }

    #[tokio::test]
    async fn tampered_secret_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;
        let service = PgAuthService::new(ctx.db.pool().clone());

        let issued = service.issue_session_token(UserUuid::new(), None).await?;
        let (id, secret) = issued.token.split_once('.').ok_or("token has no secret")?;
        let flipped = if secret.starts_with('0') { "1" } else { "0" };
        let tampered = format!("{id}.{flipped}{}", &secret[1..]);

        let result = service.authenticate_bearer(&tampered).await;

        assert!(matches!(result, Err(AuthServiceError::NotFound)));

        Ok(())
    }

    #[tokio::test]
    async fn revoked_session_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;
        let repository = PgAuthRepository::new(ctx.db.pool().clone());
        let service = PgAuthService::new(ctx.db.pool().clone());

        let issued = service.issue_session_token(UserUuid::new(), None).await?;
        let revoked = repository.revoke_session(issued.metadata.uuid).await?;

        let result = service.authenticate_bearer(&issued.token).await;

        assert!(revoked.is_some());
        assert!(matches!(result, Err(AuthServiceError::NotFound)));

        Ok(())
    }

    #[tokio::test]
    async fn expired_session_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;
        let service = PgAuthService::new(ctx.db.pool().clone());
        let expired = Timestamp::now().checked_sub(1.hour())?;

        let issued = service
            .issue_session_token(UserUuid::new(), Some(expired))
            .await?;

        let result = service.authenticate_bearer(&issued.token).await;

        assert!(matches!(result, Err(AuthServiceError::NotFound)));

        Ok(())
    }

    #[tokio::test]
    async fn garbage_token_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;
        let service = PgAuthService::new(ctx.db.pool().clone());

        let result = service.authenticate_bearer("not-a-token").await;

        assert!(matches!(result, Err(AuthServiceError::NotFound)));

        Ok(())
    }
}
