//! In-process document store used for local runs and tests.
//!
//! Holds users and projects in insertion order behind async locks and
//! enforces the same constraints as the MongoDB adapter: unique user names,
//! revision compare-and-swap on user saves, and store-assigned identifiers.

use async_trait::async_trait;
use pagination::PageRequest;
use tokio::sync::RwLock;

use crate::domain::ports::{
    ProjectPersistenceError, ProjectRepository, UserPersistenceError, UserRepository,
};
use crate::domain::query::Predicate;
use crate::domain::{NewUser, Project, ProjectDraft, ProjectId, User, UserId};

use super::documents::new_document_id;

/// Users and projects kept in memory for the lifetime of the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: RwLock<Vec<User>>,
    projects: RwLock<Vec<Project>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn insert(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        let mut users = self.users.write().await;
        if users.iter().any(|known| known.name() == &user.name) {
            return Err(UserPersistenceError::duplicate(user.name.as_str()));
        }
        let id = UserId::new(new_document_id())
            .map_err(|err| UserPersistenceError::query(err.to_string()))?;
        let stored = User::new(id, user.clone());
        users.push(stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|user| user.id() == id).cloned())
    }

    async fn find(&self, predicate: &Predicate) -> Result<Vec<User>, UserPersistenceError> {
        let users = self.users.read().await;
        Ok(users
            .iter()
            .filter(|user| predicate.matches(*user))
            .cloned()
            .collect())
    }

    async fn save(&self, user: &User) -> Result<User, UserPersistenceError> {
        let mut users = self.users.write().await;
        let slot = users
            .iter_mut()
            .find(|stored| stored.id() == user.id())
            .ok_or_else(|| UserPersistenceError::missing(user.id().as_str()))?;
        if slot.revision() != user.revision() {
            return Err(UserPersistenceError::revision_mismatch(
                user.revision(),
                slot.revision(),
            ));
        }
        *slot = user.clone().with_revision(user.revision() + 1);
        Ok(slot.clone())
    }
}

#[async_trait]
impl ProjectRepository for MemoryStore {
    async fn insert(&self, draft: &ProjectDraft) -> Result<Project, ProjectPersistenceError> {
        let id = ProjectId::new(new_document_id())
            .map_err(|err| ProjectPersistenceError::query(err.to_string()))?;
        let project = Project::new(id, draft.clone());
        self.projects.write().await.push(project.clone());
        Ok(project)
    }

    async fn find_by_id(&self, id: &ProjectId) -> Result<Option<Project>, ProjectPersistenceError> {
        let projects = self.projects.read().await;
        Ok(projects.iter().find(|project| project.id() == id).cloned())
    }

    async fn find(
        &self,
        predicate: &Predicate,
        page: PageRequest,
    ) -> Result<Vec<Project>, ProjectPersistenceError> {
        let projects = self.projects.read().await;
        Ok(page.apply(
            projects
                .iter()
                .filter(|project| predicate.matches(*project))
                .cloned(),
        ))
    }

    async fn replace(&self, project: &Project) -> Result<bool, ProjectPersistenceError> {
        let mut projects = self.projects.write().await;
        match projects.iter_mut().find(|stored| stored.id() == project.id()) {
            Some(slot) => {
                *slot = project.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: &ProjectId) -> Result<Option<Project>, ProjectPersistenceError> {
        let mut projects = self.projects.write().await;
        Ok(projects
            .iter()
            .position(|project| project.id() == id)
            .map(|index| projects.remove(index)))
    }
}

#[cfg(test)]
mod tests {
    //! Behavioural coverage for the in-memory store.
    use super::*;
    use crate::domain::query::Field;
    use crate::domain::test_fixtures::{draft, user};
    use crate::domain::{EmailAddress, PasswordHash, Username};
    use rstest::{fixture, rstest};

    fn new_user(name: &str) -> NewUser {
        NewUser {
            name: Username::new(name).expect("valid username"),
            email: EmailAddress::new(format!("{name}@example.com")).expect("valid email"),
            password_hash: PasswordHash::new("hash"),
        }
    }

    #[fixture]
    fn store() -> MemoryStore {
        MemoryStore::new()
    }

    #[rstest]
    #[tokio::test]
    async fn insert_assigns_hex_ids_and_revision_zero(store: MemoryStore) {
        let alice = UserRepository::insert(&store, &new_user("alice"))
            .await
            .expect("insert");
        assert_eq!(alice.id().as_str().len(), 24);
        assert_eq!(alice.revision(), 0);
    }

    #[rstest]
    #[tokio::test]
    async fn duplicate_names_are_rejected(store: MemoryStore) {
        UserRepository::insert(&store, &new_user("alice"))
            .await
            .expect("first insert");
        let err = UserRepository::insert(&store, &new_user("alice"))
            .await
            .expect_err("duplicate");
        assert_eq!(err, UserPersistenceError::duplicate("alice"));
    }

    #[rstest]
    #[tokio::test]
    async fn save_bumps_revision_and_rejects_stale_copies(store: MemoryStore) {
        let alice = UserRepository::insert(&store, &new_user("alice"))
            .await
            .expect("insert");
        let stale = alice.clone();

        let saved = store.save(&alice).await.expect("first save");
        assert_eq!(saved.revision(), 1);

        let err = store.save(&stale).await.expect_err("stale save");
        assert_eq!(err, UserPersistenceError::revision_mismatch(0_u64, 1_u64));
    }

    #[rstest]
    #[tokio::test]
    async fn save_of_unknown_user_is_missing(store: MemoryStore) {
        let err = store
            .save(&user("6390b1cd5c3c4b2a9e5d7f10", "ghost"))
            .await
            .expect_err("missing");
        assert!(matches!(err, UserPersistenceError::Missing { .. }));
    }

    #[rstest]
    #[tokio::test]
    async fn user_find_filters_by_name(store: MemoryStore) {
        for name in ["alice", "bob"] {
            UserRepository::insert(&store, &new_user(name))
                .await
                .expect("insert");
        }
        let found = UserRepository::find(&store, &Predicate::all().and_equals(Field::Name, "bob"))
            .await
            .expect("find");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name().as_str(), "bob");
    }

    #[rstest]
    #[tokio::test]
    async fn project_find_filters_then_pages(store: MemoryStore) {
        for _ in 0..3 {
            ProjectRepository::insert(&store, &draft("u1"))
                .await
                .expect("insert");
        }
        let page = PageRequest::parse(Some("2"), Some("5")).expect("page");
        let found = ProjectRepository::find(
            &store,
            &Predicate::all().and_equals(Field::Technologies, "react"),
            page,
        )
        .await
        .expect("find");
        assert_eq!(found.len(), 1);

        let none = ProjectRepository::find(
            &store,
            &Predicate::all().and_equals(Field::Technologies, "cobol"),
            PageRequest::default(),
        )
        .await
        .expect("find");
        assert!(none.is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn project_windows_follow_id_order(store: MemoryStore) {
        let mut inserted = Vec::new();
        for _ in 0..3 {
            let project = ProjectRepository::insert(&store, &draft("u1"))
                .await
                .expect("insert");
            inserted.push(project.id().clone());
        }
        let mut by_id = inserted.clone();
        by_id.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        assert_eq!(inserted, by_id);

        let window = ProjectRepository::find(&store, &Predicate::all(), PageRequest::new(1, 2))
            .await
            .expect("find");
        let ids: Vec<_> = window.iter().map(|project| project.id().clone()).collect();
        assert_eq!(ids, by_id[1..].to_vec());
    }

    #[rstest]
    #[tokio::test]
    async fn replace_and_delete_report_absence(store: MemoryStore) {
        let project = ProjectRepository::insert(&store, &draft("u1"))
            .await
            .expect("insert");

        assert!(store.replace(&project).await.expect("replace"));
        let removed = store.delete(project.id()).await.expect("delete");
        assert_eq!(removed.as_ref(), Some(&project));

        assert!(!store.replace(&project).await.expect("replace"));
        assert!(store.delete(project.id()).await.expect("delete").is_none());
    }
}
