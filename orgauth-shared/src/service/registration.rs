/// Registration and login.
///
/// Registration creates the user, a default organization and the membership
/// between them in one storage write, then issues a token. Login verifies
/// credentials and issues a token. Both return the same [`AuthSession`]
/// shape.

use std::sync::Arc;

use serde::Serialize;

use super::credentials::{CredentialStore, NewCredentials};
use crate::auth::jwt::TokenIssuer;
use crate::clock::Clock;
use crate::error::ServiceError;
use crate::models::organization::NewOrganization;
use crate::models::user::{PublicUser, User};

/// Token plus the public user it belongs to
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    pub access_token: String,
    pub user: PublicUser,
}

/// Registration and authentication service
#[derive(Clone)]
pub struct AuthService {
    credentials: CredentialStore,
    tokens: TokenIssuer,
    clock: Arc<dyn Clock>,
}

impl AuthService {
    pub fn new(credentials: CredentialStore, tokens: TokenIssuer, clock: Arc<dyn Clock>) -> Self {
        Self {
            credentials,
            tokens,
            clock,
        }
    }

    /// Registers a user and signs them in
    ///
    /// The default organization is named `"<firstName>'s Organization"`.
    ///
    /// # Errors
    ///
    /// - `ServiceError::DuplicateEmail` if the email is already registered;
    ///   nothing is written in that case
    /// - `ServiceError::Storage` / `ServiceError::Internal` otherwise
    pub async fn register(&self, credentials: NewCredentials) -> Result<AuthSession, ServiceError> {
        let organization = NewOrganization::default_for(&credentials.first_name);

        let (user, organization) = self.credentials.create_user(credentials, organization).await?;

        tracing::info!(
            user_id = %user.user_id,
            org_id = %organization.org_id,
            "User registered"
        );

        self.session_for(user)
    }

    /// Authenticates by email and password
    ///
    /// # Errors
    ///
    /// `ServiceError::InvalidCredentials` for an unknown email or a wrong
    /// password; the two cases are indistinguishable to the caller
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthSession, ServiceError> {
        let user = self
            .credentials
            .authenticate(email, password)
            .await?
            .ok_or(ServiceError::InvalidCredentials)?;

        tracing::info!(user_id = %user.user_id, "User logged in");

        self.session_for(user)
    }

    fn session_for(&self, user: User) -> Result<AuthSession, ServiceError> {
        let token = self.tokens.issue(user.id, self.clock.now())?;

        Ok(AuthSession {
            access_token: token.token,
            user: PublicUser::from(user),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::store::{InMemoryStore, MembershipStore};
    use chrono::Duration;
    use std::time::Instant;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    struct Harness {
        store: InMemoryStore,
        clock: Arc<ManualClock>,
        tokens: TokenIssuer,
        auth: AuthService,
    }

    fn harness() -> Harness {
        let store = InMemoryStore::new();
        let clock = Arc::new(ManualClock::starting_now());
        let tokens = TokenIssuer::new(SECRET, Duration::minutes(60));
        let auth = AuthService::new(
            CredentialStore::new(Arc::new(store.clone())),
            tokens.clone(),
            clock.clone(),
        );

        Harness {
            store,
            clock,
            tokens,
            auth,
        }
    }

    fn alice() -> NewCredentials {
        NewCredentials {
            first_name: "Alice".to_string(),
            last_name: "Smith".to_string(),
            email: "alice@example.com".to_string(),
            password: "secret1".to_string(),
            phone: None,
        }
    }

    #[tokio::test]
    async fn test_register_creates_default_organization() {
        let h = harness();

        let session = h.auth.register(alice()).await.unwrap();
        assert!(!session.access_token.is_empty());
        assert_eq!(session.user.first_name, "Alice");

        let claims = h.tokens.verify(&session.access_token, h.clock.now()).unwrap();
        let orgs = h.store.organizations_for(claims.sub).await.unwrap();

        assert_eq!(orgs.len(), 1);
        assert_eq!(orgs[0].name, "Alice's Organization");
        assert_eq!(orgs[0].description.as_deref(), Some("Default organization for Alice"));
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let h = harness();
        h.auth.register(alice()).await.unwrap();

        let result = h.auth.register(alice()).await;

        assert!(matches!(result, Err(ServiceError::DuplicateEmail)));
        assert_eq!(h.store.user_count(), 1);
    }

    #[tokio::test]
    async fn test_login_matches_registration_shape() {
        let h = harness();
        let registered = h.auth.register(alice()).await.unwrap();

        let session = h.auth.login("alice@example.com", "secret1").await.unwrap();

        assert_eq!(session.user, registered.user);
        assert!(!session.access_token.is_empty());
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let h = harness();
        h.auth.register(alice()).await.unwrap();

        let wrong_password = h.auth.login("alice@example.com", "nope").await;
        let unknown_email = h.auth.login("nobody@example.com", "secret1").await;

        assert!(matches!(wrong_password, Err(ServiceError::InvalidCredentials)));
        assert!(matches!(unknown_email, Err(ServiceError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_unknown_email_costs_a_password_check() {
        let h = harness();
        h.auth.register(alice()).await.unwrap();
        crate::auth::password::dummy_hash();

        let started = Instant::now();
        let _ = h.auth.login("alice@example.com", "nope").await;
        let wrong_password = started.elapsed();

        let started = Instant::now();
        let _ = h.auth.login("nobody@example.com", "nope").await;
        let unknown_email = started.elapsed();

        assert!(
            unknown_email * 4 >= wrong_password,
            "unknown email took {:?}, wrong password {:?}",
            unknown_email,
            wrong_password
        );
    }

    #[tokio::test]
    async fn test_issued_token_uses_service_clock() {
        let h = harness();
        let session = h.auth.register(alice()).await.unwrap();

        h.clock.advance(Duration::minutes(61));

        let result = h.tokens.verify(&session.access_token, h.clock.now());
        assert!(matches!(result, Err(crate::auth::jwt::JwtError::Expired)));
    }
}
