//! Driving port for project reads.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::query::{Listing, Predicate};
use crate::domain::{Error, Project, ProjectId, UserId};

/// Projects of one author together with the author's own project count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorProjects {
    pub author: UserId,
    /// Length of the author's `projects` list, not a count of documents.
    pub total: usize,
    pub projects: Page<Project>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProjectsQuery: Send + Sync {
    /// Filter, then paginate. An empty window is [`Listing::NoneFound`].
    async fn list_projects(
        &self,
        predicate: &Predicate,
        page: PageRequest,
    ) -> Result<Listing<Page<Project>>, Error>;

    /// A single project; `None` when absent.
    async fn get_project(&self, id: &ProjectId) -> Result<Option<Project>, Error>;

    /// Projects referencing `author`, filtered then paginated.
    ///
    /// An author with no linked projects is [`Listing::NoneFound`].
    async fn projects_by_author(
        &self,
        author: &UserId,
        predicate: &Predicate,
        page: PageRequest,
    ) -> Result<Listing<AuthorProjects>, Error>;
}
