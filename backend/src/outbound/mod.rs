//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: document stores for users and projects (MongoDB and
//!   in-memory).
//! - **security**: Argon2 password hashing and JWT bearer tokens.
//!
//! Adapters translate between domain types and infrastructure
//! representations. They contain no business logic.

pub mod persistence;
pub mod security;
