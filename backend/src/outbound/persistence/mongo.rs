//! MongoDB adapter for the user and project repository ports.
//!
//! Each port method maps onto exactly one driver call (plus a read-back on a
//! failed compare-and-swap), so every repository operation stays atomic on a
//! single document.

use async_trait::async_trait;
use bson::{Bson, Document, doc};
use futures_util::TryStreamExt;
use mongodb::error::{Error as MongoError, ErrorKind, WriteFailure};
use mongodb::options::IndexOptions;
use mongodb::{Client, Collection, IndexModel};
use pagination::PageRequest;
use tracing::info;

use crate::domain::ports::{
    ProjectPersistenceError, ProjectRepository, UserPersistenceError, UserRepository,
};
use crate::domain::query::{Condition, Predicate};
use crate::domain::{NewUser, Project, ProjectDraft, ProjectId, User, UserId};

use super::documents::{ProjectDocument, UserDocument, new_document_id};

const USERS: &str = "users";
const PROJECTS: &str = "projects";
const DUPLICATE_KEY: i32 = 11000;

/// Repositories backed by a MongoDB database.
#[derive(Debug, Clone)]
pub struct MongoStore {
    users: Collection<UserDocument>,
    projects: Collection<ProjectDocument>,
}

impl MongoStore {
    /// Connect, verify the server answers a ping and ensure indexes exist.
    pub async fn connect(uri: &str, database: &str) -> Result<Self, MongoError> {
        let client = Client::with_uri_str(uri).await?;
        let db = client.database(database);
        db.run_command(doc! { "ping": 1 }).await?;

        let store = Self {
            users: db.collection(USERS),
            projects: db.collection(PROJECTS),
        };
        store.ensure_indexes().await?;
        info!(database, "connected to MongoDB");
        Ok(store)
    }

    async fn ensure_indexes(&self) -> Result<(), MongoError> {
        let unique_name = IndexModel::builder()
            .keys(doc! { "name": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.users.create_index(unique_name).await?;

        let by_technology = IndexModel::builder()
            .keys(doc! { "technologies": 1 })
            .build();
        self.projects.create_index(by_technology).await?;
        Ok(())
    }

    async fn read_user(&self, id: &str) -> Result<Option<UserDocument>, UserPersistenceError> {
        self.users
            .find_one(doc! { "_id": id })
            .await
            .map_err(user_error)
    }
}

fn is_connection_failure(err: &MongoError) -> bool {
    matches!(
        &*err.kind,
        ErrorKind::ServerSelection { .. } | ErrorKind::Io(_)
    )
}

fn is_duplicate_key(err: &MongoError) -> bool {
    matches!(
        &*err.kind,
        ErrorKind::Write(WriteFailure::WriteError(write)) if write.code == DUPLICATE_KEY
    )
}

fn user_error(err: MongoError) -> UserPersistenceError {
    if is_connection_failure(&err) {
        UserPersistenceError::connection(err.to_string())
    } else {
        UserPersistenceError::query(err.to_string())
    }
}

fn project_error(err: MongoError) -> ProjectPersistenceError {
    if is_connection_failure(&err) {
        ProjectPersistenceError::connection(err.to_string())
    } else {
        ProjectPersistenceError::query(err.to_string())
    }
}

fn to_stored_revision(revision: u64) -> Result<i64, UserPersistenceError> {
    i64::try_from(revision)
        .map_err(|_| UserPersistenceError::query(format!("revision {revision} overflows storage")))
}

/// Translate a predicate into a MongoDB filter document.
///
/// `Equals` on an array field matches any element, which is exactly the
/// `technologies` semantics.
pub(crate) fn filter_document(predicate: &Predicate) -> Document {
    let mut clauses: Vec<Document> = predicate
        .clauses()
        .iter()
        .map(|clause| {
            let field = clause.field.as_str();
            match &clause.condition {
                Condition::Equals(value) => doc! { field: value.as_str() },
                Condition::AnyOf(values) => {
                    let values: Vec<Bson> = values.iter().map(|v| Bson::from(v.as_str())).collect();
                    doc! { field: { "$in": values } }
                }
            }
        })
        .collect();

    match clauses.len() {
        0 => Document::new(),
        1 => clauses.remove(0),
        _ => doc! { "$and": clauses },
    }
}

#[async_trait]
impl UserRepository for MongoStore {
    async fn insert(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        let document = UserDocument::from_new(new_document_id(), user);
        match self.users.insert_one(&document).await {
            Ok(_) => {}
            Err(err) if is_duplicate_key(&err) => {
                return Err(UserPersistenceError::duplicate(user.name.as_str()));
            }
            Err(err) => return Err(user_error(err)),
        }
        User::try_from(document).map_err(|err| UserPersistenceError::query(err.to_string()))
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        self.read_user(id.as_str())
            .await?
            .map(User::try_from)
            .transpose()
            .map_err(|err| UserPersistenceError::query(err.to_string()))
    }

    async fn find(&self, predicate: &Predicate) -> Result<Vec<User>, UserPersistenceError> {
        let documents: Vec<UserDocument> = self
            .users
            .find(filter_document(predicate))
            .await
            .map_err(user_error)?
            .try_collect()
            .await
            .map_err(user_error)?;
        documents
            .into_iter()
            .map(User::try_from)
            .collect::<Result<_, _>>()
            .map_err(|err| UserPersistenceError::query(err.to_string()))
    }

    async fn save(&self, user: &User) -> Result<User, UserPersistenceError> {
        let expected = to_stored_revision(user.revision())?;
        let next = to_stored_revision(user.revision() + 1)?;
        let replacement = UserDocument::from_user(user, next);

        let result = self
            .users
            .replace_one(doc! { "_id": user.id().as_str(), "revision": expected }, &replacement)
            .await
            .map_err(user_error)?;

        if result.matched_count == 0 {
            return match self.read_user(user.id().as_str()).await? {
                None => Err(UserPersistenceError::missing(user.id().as_str())),
                Some(current) => Err(UserPersistenceError::revision_mismatch(
                    user.revision(),
                    u64::try_from(current.revision).unwrap_or_default(),
                )),
            };
        }
        Ok(user.clone().with_revision(user.revision() + 1))
    }
}

#[async_trait]
impl ProjectRepository for MongoStore {
    async fn insert(&self, draft: &ProjectDraft) -> Result<Project, ProjectPersistenceError> {
        let id = ProjectId::new(new_document_id())
            .map_err(|err| ProjectPersistenceError::query(err.to_string()))?;
        let document = ProjectDocument::from_draft(id.to_string(), draft);
        self.projects
            .insert_one(&document)
            .await
            .map_err(project_error)?;
        Ok(Project::new(id, draft.clone()))
    }

    async fn find_by_id(&self, id: &ProjectId) -> Result<Option<Project>, ProjectPersistenceError> {
        self.projects
            .find_one(doc! { "_id": id.as_str() })
            .await
            .map_err(project_error)?
            .map(Project::try_from)
            .transpose()
            .map_err(|err| ProjectPersistenceError::query(err.to_string()))
    }

    async fn find(
        &self,
        predicate: &Predicate,
        page: PageRequest,
    ) -> Result<Vec<Project>, ProjectPersistenceError> {
        // The driver reads a limit of zero as "no limit".
        if page.limit() == 0 {
            return Ok(Vec::new());
        }
        let skip = u64::try_from(page.offset())
            .map_err(|err| ProjectPersistenceError::query(err.to_string()))?;
        let limit = i64::try_from(page.limit())
            .map_err(|err| ProjectPersistenceError::query(err.to_string()))?;

        let documents: Vec<ProjectDocument> = self
            .projects
            .find(filter_document(predicate))
            .sort(project_order())
            .skip(skip)
            .limit(limit)
            .await
            .map_err(project_error)?
            .try_collect()
            .await
            .map_err(project_error)?;
        documents
            .into_iter()
            .map(Project::try_from)
            .collect::<Result<_, _>>()
            .map_err(|err| ProjectPersistenceError::query(err.to_string()))
    }

    async fn replace(&self, project: &Project) -> Result<bool, ProjectPersistenceError> {
        let result = self
            .projects
            .replace_one(
                doc! { "_id": project.id().as_str() },
                ProjectDocument::from(project),
            )
            .await
            .map_err(project_error)?;
        Ok(result.matched_count > 0)
    }

    async fn delete(&self, id: &ProjectId) -> Result<Option<Project>, ProjectPersistenceError> {
        self.projects
            .find_one_and_delete(doc! { "_id": id.as_str() })
            .await
            .map_err(project_error)?
            .map(Project::try_from)
            .transpose()
            .map_err(|err| ProjectPersistenceError::query(err.to_string()))
    }
}

/// Ascending `_id`: object ids grow with insertion, so windows are stable.
fn project_order() -> Document {
    doc! { "_id": 1 }
}
