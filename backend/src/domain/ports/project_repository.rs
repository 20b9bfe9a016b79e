//! Port abstraction for project persistence adapters.
//!
//! Every method is an independent atomic operation; nothing here spans more
//! than one document, so cross-entity consistency is the caller's job.

use async_trait::async_trait;
use pagination::PageRequest;

use crate::domain::query::Predicate;
use crate::domain::{Project, ProjectDraft, ProjectId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by project repository adapters.
    pub enum ProjectPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "project repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "project repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Insert a project; the store assigns the identifier.
    async fn insert(&self, draft: &ProjectDraft) -> Result<Project, ProjectPersistenceError>;

    /// Fetch a project by identifier.
    async fn find_by_id(&self, id: &ProjectId) -> Result<Option<Project>, ProjectPersistenceError>;

    /// Filter with `predicate`, then skip and take according to `page`.
    async fn find(
        &self,
        predicate: &Predicate,
        page: PageRequest,
    ) -> Result<Vec<Project>, ProjectPersistenceError>;

    /// Replace the whole stored document. Returns `false` when no document
    /// with that id exists.
    async fn replace(&self, project: &Project) -> Result<bool, ProjectPersistenceError>;

    /// Delete by identifier, returning the removed document if there was one.
    async fn delete(&self, id: &ProjectId) -> Result<Option<Project>, ProjectPersistenceError>;
}
