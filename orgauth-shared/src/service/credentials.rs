/// Credential store: user creation, lookup and password checks.

use std::sync::Arc;

use uuid::Uuid;

use crate::auth::password;
use crate::error::ServiceError;
use crate::ids;
use crate::models::organization::{NewOrganization, Organization};
use crate::models::user::{NewUser, User};
use crate::store::IdentityStore;

/// Validated registration input
#[derive(Debug, Clone)]
pub struct NewCredentials {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
}

/// User records and their passwords
#[derive(Clone)]
pub struct CredentialStore {
    store: Arc<dyn IdentityStore>,
}

impl CredentialStore {
    pub fn new(store: Arc<dyn IdentityStore>) -> Self {
        Self { store }
    }

    /// Creates a user together with `organization`, attached as its first member
    ///
    /// The email check runs before anything is hashed or written. A
    /// registration racing past it is caught by the store's unique constraint
    /// and reported the same way.
    ///
    /// # Errors
    ///
    /// - `ServiceError::DuplicateEmail` if the email is taken
    /// - `ServiceError::Internal` if hashing fails
    /// - `ServiceError::Storage` on storage failure
    pub async fn create_user(
        &self,
        credentials: NewCredentials,
        organization: NewOrganization,
    ) -> Result<(User, Organization), ServiceError> {
        if self.find_by_email(&credentials.email).await?.is_some() {
            tracing::debug!("Registration rejected: email already taken");
            return Err(ServiceError::DuplicateEmail);
        }

        let password_hash = password::hash_password(&credentials.password)
            .map_err(|e| ServiceError::Internal(e.to_string()))?;

        let new_user = NewUser {
            id: ids::new_internal_id(),
            user_id: ids::new_user_id(),
            first_name: credentials.first_name,
            last_name: credentials.last_name,
            email: credentials.email,
            password_hash,
            phone: credentials.phone,
        };

        Ok(self.store.register(new_user, organization).await?)
    }

    /// Checks `raw_password` against the user's stored hash
    ///
    /// A stored hash that cannot be parsed counts as a mismatch.
    pub fn verify_password(&self, user: &User, raw_password: &str) -> bool {
        match password::verify_password(raw_password, &user.password_hash) {
            Ok(matches) => matches,
            Err(e) => {
                tracing::error!(user_id = %user.user_id, error = %e, "Stored password hash is unusable");
                false
            }
        }
    }

    /// Finds the user for `email` and checks `raw_password` against their hash
    ///
    /// An unknown email still pays for a full password check, so it takes as
    /// long as a wrong password.
    ///
    /// # Returns
    ///
    /// The user if the email exists and the password matches
    pub async fn authenticate(
        &self,
        email: &str,
        raw_password: &str,
    ) -> Result<Option<User>, ServiceError> {
        let Some(user) = self.find_by_email(email).await? else {
            match password::dummy_hash() {
                Some(hash) => {
                    let _ = password::verify_password(raw_password, hash);
                }
                None => tracing::error!("Placeholder password hash unavailable"),
            }
            tracing::warn!("Login failed: unknown email");
            return Ok(None);
        };

        if !self.verify_password(&user, raw_password) {
            tracing::warn!(user_id = %user.user_id, "Login failed: wrong password");
            return Ok(None);
        }

        Ok(Some(user))
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, ServiceError> {
        Ok(self.store.find_user_by_email(email).await?)
    }

    pub async fn find_by_user_id(&self, user_id: &str) -> Result<Option<User>, ServiceError> {
        Ok(self.store.find_user_by_user_id(user_id).await?)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, ServiceError> {
        Ok(self.store.find_user_by_id(id).await?)
    }
}
