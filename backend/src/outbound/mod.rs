//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **media**: uploaded images stored below a media root directory
//! - **security**: Argon2 password hashing
//! - **fixtures**: JSON seed files for ingredients and user accounts
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod fixtures;
pub mod media;
pub mod persistence;
pub mod security;
