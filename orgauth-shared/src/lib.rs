//! # orgauth shared library
//!
//! Domain types, storage and business logic for the orgauth identity
//! service. The HTTP server in `orgauth-api` is a thin layer over this crate.
//!
//! ## Module Organization
//!
//! - `models`: Users, organizations and memberships, with their SQL
//! - `store`: Storage traits plus Postgres and in-memory backends
//! - `auth`: Password hashing, bearer tokens, identity and access checks
//! - `service`: Registration, login and membership-gated operations
//! - `db`: Connection pool and migrations
//! - `clock`: Injectable time source
//! - `ids`: External identifier generation
//! - `error`: Service error taxonomy

pub mod auth;
pub mod clock;
pub mod db;
pub mod error;
pub mod ids;
pub mod models;
pub mod service;
pub mod store;

/// Current version of the orgauth shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
