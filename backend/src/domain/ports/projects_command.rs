//! Driving port for project mutations.
//!
//! Each operation touches a project document and, where needed, its author's
//! user document. Implementations keep the two consistent without
//! multi-document transactions.

use async_trait::async_trait;

use crate::domain::{Error, Identity, Project, ProjectDraft, ProjectId};

/// Options for [`ProjectsCommand::delete_project`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProjectDeletion {
    /// Also remove the id from the author's `projects` list.
    pub unlink_author: bool,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProjectsCommand: Send + Sync {
    /// Insert the project and link it to its author.
    async fn create_project(&self, actor: &Identity, draft: ProjectDraft)
    -> Result<Project, Error>;

    /// Replace an existing project's contents.
    async fn update_project(
        &self,
        actor: &Identity,
        id: &ProjectId,
        draft: ProjectDraft,
    ) -> Result<Project, Error>;

    /// Delete a project and optionally unlink it from its author.
    async fn delete_project(
        &self,
        actor: &Identity,
        id: &ProjectId,
        deletion: ProjectDeletion,
    ) -> Result<ProjectId, Error>;
}
