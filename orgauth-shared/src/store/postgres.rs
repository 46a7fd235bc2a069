/// Postgres-backed store
///
/// Thin adapter from the store traits onto the model queries. Composite
/// writes run in a single transaction; dropping the transaction on an early
/// return rolls it back.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{IdentityStore, MembershipStore, StoreError, UserStore};
use crate::models::membership::Membership;
use crate::models::organization::{NewOrganization, Organization};
use crate::models::user::{NewUser, User};

/// Unique index on `LOWER(users.email)`
const EMAIL_CONSTRAINT: &str = "users_email_key";

/// Store over a Postgres connection pool
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Maps unique violations onto store errors, leaving everything else as-is
fn map_insert_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return match db_err.constraint() {
                Some(EMAIL_CONSTRAINT) => StoreError::DuplicateEmail,
                Some(other) => StoreError::Conflict(other.to_string()),
                None => StoreError::Conflict("unique constraint".to_string()),
            };
        }
    }
    StoreError::Database(err)
}

#[async_trait]
impl UserStore for PgStore {
    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(User::find_by_id(&self.pool, id).await?)
    }

    async fn find_user_by_user_id(&self, user_id: &str) -> Result<Option<User>, StoreError> {
        Ok(User::find_by_user_id(&self.pool, user_id).await?)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(User::find_by_email(&self.pool, email).await?)
    }
}

#[async_trait]
impl MembershipStore for PgStore {
    async fn attach(&self, user_id: Uuid, organization_id: Uuid) -> Result<bool, StoreError> {
        Ok(Membership::attach(&self.pool, user_id, organization_id).await?)
    }

    async fn is_member(&self, user_id: Uuid, organization_id: Uuid) -> Result<bool, StoreError> {
        Ok(Membership::is_member(&self.pool, user_id, organization_id).await?)
    }

    async fn organizations_for(&self, user_id: Uuid) -> Result<Vec<Organization>, StoreError> {
        Ok(Membership::organizations_for(&self.pool, user_id).await?)
    }

    async fn find_organization_for_member(
        &self,
        member_id: Uuid,
        org_id: &str,
    ) -> Result<Option<Organization>, StoreError> {
        Ok(Membership::find_organization_for_member(&self.pool, member_id, org_id).await?)
    }

    async fn members_of(&self, organization_id: Uuid) -> Result<Vec<User>, StoreError> {
        Ok(Membership::members_of(&self.pool, organization_id).await?)
    }

    async fn share_organization(&self, user_a: Uuid, user_b: Uuid) -> Result<bool, StoreError> {
        Ok(Membership::share_organization(&self.pool, user_a, user_b).await?)
    }
}

#[async_trait]
impl IdentityStore for PgStore {
    async fn register(
        &self,
        user: NewUser,
        organization: NewOrganization,
    ) -> Result<(User, Organization), StoreError> {
        let mut tx = self.pool.begin().await?;

        let user = User::create(&mut *tx, user)
            .await
            .map_err(map_insert_error)?;
        let organization = Organization::create(&mut *tx, organization)
            .await
            .map_err(map_insert_error)?;
        Membership::attach(&mut *tx, user.id, organization.id).await?;

        tx.commit().await?;

        tracing::debug!(
            user_id = %user.user_id,
            org_id = %organization.org_id,
            "Registered user with default organization"
        );

        Ok((user, organization))
    }

    async fn create_organization(
        &self,
        creator_id: Uuid,
        organization: NewOrganization,
    ) -> Result<Organization, StoreError> {
        let mut tx = self.pool.begin().await?;

        let organization = Organization::create(&mut *tx, organization)
            .await
            .map_err(map_insert_error)?;
        Membership::attach(&mut *tx, creator_id, organization.id).await?;

        tx.commit().await?;

        Ok(organization)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        crate::db::pool::health_check(&self.pool).await?;
        Ok(())
    }
}
