//! Showcase backend: users, contacts and the projects they author.
//!
//! The crate follows a hexagonal layout. [`domain`] holds entities, ports and
//! the services that keep users and projects consistent; [`inbound`] exposes
//! them over HTTP; [`outbound`] implements the driven ports against MongoDB,
//! an in-memory store, Argon2 and JWT.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

pub use doc::ApiDoc;
pub use middleware::Trace;
