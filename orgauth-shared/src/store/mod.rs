/// Storage abstraction for users, organizations and memberships
///
/// Services depend on these traits, never on a concrete backend:
///
/// - [`postgres::PgStore`]: production backend over a `sqlx` pool
/// - [`memory::InMemoryStore`]: single-lock in-memory backend for tests
///
/// Composite writes (registration, organization creation) live on
/// [`IdentityStore`] so each backend can make them atomic in its own way.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::organization::{NewOrganization, Organization};
use crate::models::user::{NewUser, User};

pub use memory::InMemoryStore;
pub use postgres::PgStore;

/// Errors returned by store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A user with this email already exists
    #[error("Email already registered")]
    DuplicateEmail,

    /// Some other uniqueness constraint was violated
    #[error("Conflict on {0}")]
    Conflict(String),

    /// Database failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Read access to user records
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Finds a user by internal ID
    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    /// Finds a user by external ID
    async fn find_user_by_user_id(&self, user_id: &str) -> Result<Option<User>, StoreError>;

    /// Finds a user by email, ignoring case
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
}

/// The user-organization membership graph
#[async_trait]
pub trait MembershipStore: Send + Sync {
    /// Attaches a user to an organization; `false` if already attached
    async fn attach(&self, user_id: Uuid, organization_id: Uuid) -> Result<bool, StoreError>;

    /// Checks whether a user belongs to an organization
    async fn is_member(&self, user_id: Uuid, organization_id: Uuid) -> Result<bool, StoreError>;

    /// Organizations of a user, oldest membership first
    async fn organizations_for(&self, user_id: Uuid) -> Result<Vec<Organization>, StoreError>;

    /// Resolves an organization by external id if `member_id` belongs to it
    async fn find_organization_for_member(
        &self,
        member_id: Uuid,
        org_id: &str,
    ) -> Result<Option<Organization>, StoreError>;

    /// Members of an organization, earliest first
    async fn members_of(&self, organization_id: Uuid) -> Result<Vec<User>, StoreError>;

    /// Checks whether two users share at least one organization
    async fn share_organization(&self, user_a: Uuid, user_b: Uuid) -> Result<bool, StoreError>;
}

/// Full store used by the services
#[async_trait]
pub trait IdentityStore: UserStore + MembershipStore {
    /// Inserts a user, their default organization and the membership between
    /// them as one unit
    ///
    /// Either all three records exist afterwards or none does.
    ///
    /// # Errors
    ///
    /// `StoreError::DuplicateEmail` if the email is taken (case-insensitive)
    async fn register(
        &self,
        user: NewUser,
        organization: NewOrganization,
    ) -> Result<(User, Organization), StoreError>;

    /// Inserts an organization and attaches `creator_id` to it as one unit
    async fn create_organization(
        &self,
        creator_id: Uuid,
        organization: NewOrganization,
    ) -> Result<Organization, StoreError>;

    /// Probes the backend
    async fn health_check(&self) -> Result<(), StoreError>;
}
