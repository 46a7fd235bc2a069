/// Membership model and database operations
///
/// A membership links one user to one organization. The pair is the primary
/// key, so a user is attached to an organization at most once. Memberships are
/// never removed.
///
/// Membership is also the visibility boundary: every query that resolves an
/// organization by its external id is scoped to a member, and users are only
/// visible to users they share an organization with.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE user_organizations (
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     organization_id UUID NOT NULL REFERENCES organizations(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     PRIMARY KEY (user_id, organization_id)
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use orgauth_shared::models::membership::Membership;
/// use sqlx::PgPool;
/// use uuid::Uuid;
///
/// # async fn example(pool: PgPool, user_id: Uuid, organization_id: Uuid) -> Result<(), sqlx::Error> {
/// // Attaching twice is a no-op
/// assert!(Membership::attach(&pool, user_id, organization_id).await?);
/// assert!(!Membership::attach(&pool, user_id, organization_id).await?);
///
/// assert!(Membership::is_member(&pool, user_id, organization_id).await?);
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use sqlx::postgres::PgExecutor;
use uuid::Uuid;

use super::organization::Organization;
use super::user::User;

/// Membership row linking a user to an organization
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Membership {
    /// Internal user ID
    pub user_id: Uuid,

    /// Internal organization ID
    pub organization_id: Uuid,

    /// When the user was attached
    pub created_at: DateTime<Utc>,
}

impl Membership {
    /// Attaches a user to an organization
    ///
    /// # Returns
    ///
    /// `true` if a new membership was created, `false` if the user was already
    /// a member
    ///
    /// # Errors
    ///
    /// Returns an error if either side doesn't exist (foreign key violation)
    /// or the database fails
    pub async fn attach<'e, E>(
        executor: E,
        user_id: Uuid,
        organization_id: Uuid,
    ) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query(
            r#"
            INSERT INTO user_organizations (user_id, organization_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, organization_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(organization_id)
        .execute(executor)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Checks whether a user belongs to an organization
    pub async fn is_member<'e, E>(
        executor: E,
        user_id: Uuid,
        organization_id: Uuid,
    ) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM user_organizations
                WHERE user_id = $1 AND organization_id = $2
            )
            "#,
        )
        .bind(user_id)
        .bind(organization_id)
        .fetch_one(executor)
        .await
    }

    /// Lists the organizations a user belongs to, oldest membership first
    pub async fn organizations_for<'e, E>(
        executor: E,
        user_id: Uuid,
    ) -> Result<Vec<Organization>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Organization>(
            r#"
            SELECT o.id, o.org_id, o.name, o.description, o.created_at, o.updated_at
            FROM organizations o
            INNER JOIN user_organizations uo ON uo.organization_id = o.id
            WHERE uo.user_id = $1
            ORDER BY uo.created_at ASC, o.created_at ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(executor)
        .await
    }

    /// Resolves an organization by external id, only if `member_id` belongs to it
    ///
    /// Returns `None` both when the organization doesn't exist and when the
    /// user is not a member; callers cannot tell the two apart.
    pub async fn find_organization_for_member<'e, E>(
        executor: E,
        member_id: Uuid,
        org_id: &str,
    ) -> Result<Option<Organization>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Organization>(
            r#"
            SELECT o.id, o.org_id, o.name, o.description, o.created_at, o.updated_at
            FROM organizations o
            INNER JOIN user_organizations uo ON uo.organization_id = o.id
            WHERE o.org_id = $1 AND uo.user_id = $2
            "#,
        )
        .bind(org_id)
        .bind(member_id)
        .fetch_optional(executor)
        .await
    }

    /// Lists the members of an organization, earliest first
    pub async fn members_of<'e, E>(
        executor: E,
        organization_id: Uuid,
    ) -> Result<Vec<User>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, User>(
            r#"
            SELECT u.id, u.user_id, u.first_name, u.last_name, u.email, u.password_hash,
                   u.phone, u.created_at, u.updated_at
            FROM users u
            INNER JOIN user_organizations uo ON uo.user_id = u.id
            WHERE uo.organization_id = $1
            ORDER BY uo.created_at ASC, u.created_at ASC
            "#,
        )
        .bind(organization_id)
        .fetch_all(executor)
        .await
    }

    /// Checks whether two users share at least one organization
    pub async fn share_organization<'e, E>(
        executor: E,
        user_a: Uuid,
        user_b: Uuid,
    ) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1
                FROM user_organizations a
                INNER JOIN user_organizations b ON a.organization_id = b.organization_id
                WHERE a.user_id = $1 AND b.user_id = $2
            )
            "#,
        )
        .bind(user_a)
        .bind(user_b)
        .fetch_one(executor)
        .await
    }
}
