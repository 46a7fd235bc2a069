/// User model and database operations
///
/// Users are the credential records of the service. Each user has an internal
/// `id` used as the storage key and for token subjects, and an external
/// `user_id` that is the only identifier ever returned to clients.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id UUID PRIMARY KEY,
///     user_id VARCHAR(64) NOT NULL UNIQUE,
///     first_name VARCHAR(255) NOT NULL,
///     last_name VARCHAR(255) NOT NULL,
///     email VARCHAR(255) NOT NULL,          -- unique on LOWER(email)
///     password_hash VARCHAR(255) NOT NULL,
///     phone VARCHAR(15),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgExecutor;
use uuid::Uuid;

/// User model representing a registered account
///
/// Deliberately not `Serialize`: responses go through [`PublicUser`], which
/// omits the password hash and the internal key.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct User {
    /// Internal storage key
    pub id: Uuid,

    /// External identifier
    pub user_id: String,

    /// Given name
    pub first_name: String,

    /// Family name
    pub last_name: String,

    /// Email address, unique case-insensitively
    pub email: String,

    /// Argon2id PHC string
    pub password_hash: String,

    /// Optional phone number
    pub phone: Option<String>,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// When the account was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for inserting a user
///
/// Both identifiers are generated before the insert, so the caller knows them
/// even if the surrounding transaction is rolled back.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Internal storage key
    pub id: Uuid,

    /// External identifier
    pub user_id: String,

    /// Given name
    pub first_name: String,

    /// Family name
    pub last_name: String,

    /// Email address
    pub email: String,

    /// Argon2id hash (NOT the plaintext password)
    pub password_hash: String,

    /// Optional phone number
    pub phone: Option<String>,
}

/// Fields of a user that may leave the service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub user_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.user_id.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
        }
    }
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            user_id: user.user_id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            phone: user.phone,
        }
    }
}

impl User {
    /// Builds the in-memory record a `NewUser` becomes once stored
    pub fn from_new(data: NewUser, now: DateTime<Utc>) -> Self {
        Self {
            id: data.id,
            user_id: data.user_id,
            first_name: data.first_name,
            last_name: data.last_name,
            email: data.email,
            password_hash: data.password_hash,
            phone: data.phone,
            created_at: now,
            updated_at: now,
        }
    }

    /// Inserts a new user
    ///
    /// Accepts any executor so it can run inside a registration transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the email or external id is already taken
    /// (`users_email_key` / `users_user_id_key`) or the database fails
    pub async fn create<'e, E>(executor: E, data: NewUser) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, user_id, first_name, last_name, email, password_hash, phone)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, user_id, first_name, last_name, email, password_hash, phone,
                      created_at, updated_at
            "#,
        )
        .bind(data.id)
        .bind(data.user_id)
        .bind(data.first_name)
        .bind(data.last_name)
        .bind(data.email)
        .bind(data.password_hash)
        .bind(data.phone)
        .fetch_one(executor)
        .await
    }

    /// Finds a user by internal ID
    pub async fn find_by_id<'e, E>(executor: E, id: Uuid) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, user_id, first_name, last_name, email, password_hash, phone,
                   created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await
    }

    /// Finds a user by external ID
    pub async fn find_by_user_id<'e, E>(
        executor: E,
        user_id: &str,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, user_id, first_name, last_name, email, password_hash, phone,
                   created_at, updated_at
            FROM users
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(executor)
        .await
    }

    /// Finds a user by email address, ignoring case
    pub async fn find_by_email<'e, E>(executor: E, email: &str) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, user_id, first_name, last_name, email, password_hash, phone,
                   created_at, updated_at
            FROM users
            WHERE LOWER(email) = LOWER($1)
            "#,
        )
        .bind(email)
        .fetch_optional(executor)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> User {
        User::from_new(
            NewUser {
                id: Uuid::new_v4(),
                user_id: "5f1c0d7e2b8a4c6d9e0f1a2b3c4d5e6f".to_string(),
                first_name: "Ada".to_string(),
                last_name: "Lovelace".to_string(),
                email: "ada@example.com".to_string(),
                password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string(),
                phone: None,
            },
            Utc::now(),
        )
    }

    #[test]
    fn test_public_user_omits_private_fields() {
        let user = sample();
        let json = serde_json::to_value(PublicUser::from(&user)).unwrap();

        assert_eq!(json["userId"], user.user_id);
        assert_eq!(json["firstName"], "Ada");
        assert_eq!(json["lastName"], "Lovelace");
        assert_eq!(json["email"], "ada@example.com");
        assert!(json["phone"].is_null());
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("password_hash").is_none());
        assert!(json.get("id").is_none());
    }

    #[test]
    fn test_from_new_sets_timestamps() {
        let user = sample();
        assert_eq!(user.created_at, user.updated_at);
    }
}
