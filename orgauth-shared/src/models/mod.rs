/// Database models for orgauth
///
/// Each model owns its SQL. Query functions take any Postgres executor so the
/// same calls work against the pool or inside a transaction.
///
/// # Models
///
/// - `user`: User accounts and credentials
/// - `organization`: Organizations users are grouped into
/// - `membership`: User-organization links, the visibility boundary
///
/// # Example
///
/// ```no_run
/// use orgauth_shared::models::user::{NewUser, User};
/// use orgauth_shared::ids;
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// let user = User::create(&pool, NewUser {
///     id: ids::new_internal_id(),
///     user_id: ids::new_user_id(),
///     first_name: "Ada".to_string(),
///     last_name: "Lovelace".to_string(),
///     email: "ada@example.com".to_string(),
///     password_hash: "$argon2id$...".to_string(),
///     phone: None,
/// }).await?;
/// # Ok(())
/// # }
/// ```

pub mod membership;
pub mod organization;
pub mod user;
