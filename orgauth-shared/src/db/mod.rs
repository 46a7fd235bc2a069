/// Database layer
///
/// - `pool`: Postgres connection pool and health check
/// - `migrations`: embedded schema migrations
///
/// Queries themselves live on the models in [`crate::models`].

pub mod migrations;
pub mod pool;
