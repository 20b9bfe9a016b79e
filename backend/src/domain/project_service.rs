//! Project domain service: reads plus the project/author consistency sagas.
//!
//! The store offers no multi-document transactions, so every mutation that
//! touches both a project and its author is a short saga. Each step runs only
//! after the previous one has resolved, and a failed step undoes exactly the
//! steps before it:
//!
//! | operation | steps | compensation |
//! |---|---|---|
//! | create | insert project → load author → link id on author | delete the project |
//! | update | load project → replace project | none (single write) |
//! | delete | delete project → (optional) unlink id from author | none |
//!
//! When a compensation itself fails the store is left inconsistent; that is
//! surfaced as an internal error and logged with both identifiers.

use std::sync::Arc;

use async_trait::async_trait;
use pagination::{Page, PageRequest};
use tracing::{debug, error, warn};

use crate::domain::ports::{
    AuthorProjects, ProjectDeletion, ProjectRepository, ProjectsCommand, ProjectsQuery,
    UserPersistenceError, UserRepository,
};
use crate::domain::query::{Field, Listing, Predicate};
use crate::domain::user_directory_service::revision_conflict;
use crate::domain::{Error, Identity, Project, ProjectDraft, ProjectId, UserId};

const NO_PROJECTS: &str = "No projects found";
const AUTHOR_PROJECTS_UNAVAILABLE: &str = "Unable to get the requested projects";
const CREATE_FAILED: &str = "Unable to create the project";
const AUTHOR_MISSING: &str = "Couldn't assign an author to the project";
const UPDATE_FAILED: &str = "Couldn't update any project";
const DELETE_FAILED: &str = "Couldn't delete any project";
const INCONSISTENT: &str = "project creation left an inconsistent state";

/// Project service implementing the project driving ports.
#[derive(Clone)]
pub struct ProjectService<P, U> {
    projects: Arc<P>,
    users: Arc<U>,
}

impl<P, U> ProjectService<P, U> {
    /// Create a new service over the project and user repositories.
    pub fn new(projects: Arc<P>, users: Arc<U>) -> Self {
        Self { projects, users }
    }
}

fn update_failure(cause: impl std::fmt::Display) -> Error {
    Error::invalid_request(UPDATE_FAILED)
        .with_diagnostic(format!("Error while updating the project: {cause}"))
}

fn delete_failure(cause: impl std::fmt::Display) -> Error {
    Error::not_found(DELETE_FAILED)
        .with_diagnostic(format!("Error while deleting the project: {cause}"))
}

impl<P, U> ProjectService<P, U>
where
    P: ProjectRepository,
    U: UserRepository,
{
    /// Undo the insert of a project whose author link failed, then return
    /// `failure`, or an internal error when the undo itself fails.
    async fn compensate_create(&self, project: &ProjectId, author: &UserId, failure: Error) -> Error {
        match self.projects.delete(project).await {
            Ok(_) => {
                warn!(
                    project_id = %project,
                    author_id = %author,
                    reason = failure.diagnostic().unwrap_or(failure.message()),
                    "project creation rolled back"
                );
                failure
            }
            Err(err) => {
                error!(
                    project_id = %project,
                    author_id = %author,
                    error = %err,
                    "rolling back project creation failed; project is orphaned"
                );
                Error::internal(INCONSISTENT).with_diagnostic(format!(
                    "orphaned project {project} for author {author}: {err}"
                ))
            }
        }
    }

    async fn unlink_from_author(&self, removed: &Project) -> Result<(), Error> {
        let author_id = removed.author_id();
        let mut author = match self.users.find_by_id(author_id).await {
            Ok(Some(author)) => author,
            Ok(None) => return Err(delete_failure(format!("author {author_id} does not exist"))),
            Err(err) => return Err(delete_failure(err)),
        };

        if author.unlink_project(removed.id()) == 0 {
            debug!(project_id = %removed.id(), author_id = %author_id, "project was not linked");
            return Ok(());
        }

        match self.users.save(&author).await {
            Ok(_) => Ok(()),
            Err(UserPersistenceError::RevisionMismatch { expected, actual }) => {
                Err(revision_conflict(expected, actual))
            }
            Err(err) => Err(delete_failure(err)),
        }
    }
}

#[async_trait]
impl<P, U> ProjectsQuery for ProjectService<P, U>
where
    P: ProjectRepository,
    U: UserRepository,
{
    async fn list_projects(
        &self,
        predicate: &Predicate,
        page: PageRequest,
    ) -> Result<Listing<Page<Project>>, Error> {
        let found = self.projects.find(predicate, page).await.map_err(|err| {
            Error::not_found(NO_PROJECTS)
                .with_diagnostic(format!("Error while getting projects: {err}"))
        })?;
        if found.is_empty() {
            return Ok(Listing::NoneFound);
        }
        Ok(Listing::Found(Page::new(page, found)))
    }

    async fn get_project(&self, id: &ProjectId) -> Result<Option<Project>, Error> {
        self.projects.find_by_id(id).await.map_err(|err| {
            Error::not_found(NO_PROJECTS)
                .with_diagnostic(format!("Error while finding the project requested: {err}"))
        })
    }

    async fn projects_by_author(
        &self,
        author: &UserId,
        predicate: &Predicate,
        page: PageRequest,
    ) -> Result<Listing<AuthorProjects>, Error> {
        let user = match self.users.find_by_id(author).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                return Err(Error::not_found(AUTHOR_PROJECTS_UNAVAILABLE)
                    .with_diagnostic("Requesting user doesn't exist"));
            }
            Err(err) => {
                return Err(Error::not_found(AUTHOR_PROJECTS_UNAVAILABLE)
                    .with_diagnostic(format!("Requesting user doesn't exist: {err}")));
            }
        };

        let total = user.projects().len();
        if total == 0 {
            return Ok(Listing::NoneFound);
        }

        let scoped = predicate
            .clone()
            .and_any_of(Field::Id, user.projects().iter().map(ProjectId::to_string));
        let found = self.projects.find(&scoped, page).await.map_err(|err| {
            Error::not_found(AUTHOR_PROJECTS_UNAVAILABLE)
                .with_diagnostic(format!("Couldn't get any project: {err}"))
        })?;

        Ok(Listing::Found(AuthorProjects {
            author: author.clone(),
            total,
            projects: Page::new(page, found),
        }))
    }
}

#[async_trait]
impl<P, U> ProjectsCommand for ProjectService<P, U>
where
    P: ProjectRepository,
    U: UserRepository,
{
    async fn create_project(
        &self,
        actor: &Identity,
        draft: ProjectDraft,
    ) -> Result<Project, Error> {
        let project = self.projects.insert(&draft).await.map_err(|err| {
            Error::invalid_request(CREATE_FAILED)
                .with_diagnostic(format!("Unable to create the project: {err}"))
        })?;
        let project_id = project.id();
        let author_id = project.author_id();

        let mut author = match self.users.find_by_id(author_id).await {
            Ok(Some(author)) => author,
            Ok(None) => {
                let failure = Error::not_found(AUTHOR_MISSING).with_diagnostic("The author doesn't exist");
                return Err(self.compensate_create(project_id, author_id, failure).await);
            }
            Err(err) => {
                let failure = Error::not_found(AUTHOR_MISSING)
                    .with_diagnostic(format!("The author doesn't exist: {err}"));
                return Err(self.compensate_create(project_id, author_id, failure).await);
            }
        };

        author.link_project(project_id.clone());
        if let Err(err) = self.users.save(&author).await {
            let failure = match err {
                UserPersistenceError::RevisionMismatch { expected, actual } => {
                    revision_conflict(expected, actual)
                }
                other => Error::invalid_request(CREATE_FAILED)
                    .with_diagnostic(format!("Unable to link the project to its author: {other}")),
            };
            return Err(self.compensate_create(project_id, author_id, failure).await);
        }

        debug!(
            project_id = %project_id,
            author_id = %author_id,
            actor = %actor.user_id(),
            "project created"
        );
        Ok(project)
    }

    async fn update_project(
        &self,
        actor: &Identity,
        id: &ProjectId,
        draft: ProjectDraft,
    ) -> Result<Project, Error> {
        let existing = match self.projects.find_by_id(id).await {
            Ok(Some(existing)) => existing,
            Ok(None) => return Err(update_failure(format!("project {id} does not exist"))),
            Err(err) => return Err(update_failure(err)),
        };

        if draft.author_id() != existing.author_id() {
            return Err(update_failure(format!(
                "authorId cannot change from {} to {}",
                existing.author_id(),
                draft.author_id()
            )));
        }

        let replacement = Project::new(id.clone(), draft);
        match self.projects.replace(&replacement).await {
            Ok(true) => {
                debug!(project_id = %id, actor = %actor.user_id(), "project updated");
                Ok(replacement)
            }
            Ok(false) => Err(update_failure(format!("project {id} vanished before replace"))),
            Err(err) => Err(update_failure(err)),
        }
    }

    async fn delete_project(
        &self,
        actor: &Identity,
        id: &ProjectId,
        deletion: ProjectDeletion,
    ) -> Result<ProjectId, Error> {
        let removed = match self.projects.delete(id).await {
            Ok(Some(removed)) => removed,
            Ok(None) => return Err(delete_failure(format!("project {id} does not exist"))),
            Err(err) => return Err(delete_failure(err)),
        };

        if deletion.unlink_author {
            self.unlink_from_author(&removed).await?;
        }

        debug!(
            project_id = %id,
            actor = %actor.user_id(),
            unlinked = deletion.unlink_author,
            "project deleted"
        );
        Ok(removed.id().clone())
    }
}

#[cfg(test)]
#[path = "project_service_tests.rs"]
mod tests;
