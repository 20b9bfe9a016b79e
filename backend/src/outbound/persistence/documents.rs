//! Stored document shapes shared by the document store adapters.
//!
//! Field names follow the wire format the stores have always used:
//! `_id` for the identifier and camelCase for compound names.

use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{
    EmailAddress, NewUser, PasswordHash, Project, ProjectDraft, ProjectFields, ProjectId, User,
    UserId, Username,
};

/// A stored document failed domain validation on the way out of the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("corrupt {collection} document {id}: {reason}")]
pub struct CorruptDocument {
    collection: &'static str,
    id: String,
    reason: String,
}

impl CorruptDocument {
    fn user(id: &str, reason: impl ToString) -> Self {
        Self {
            collection: "user",
            id: id.to_owned(),
            reason: reason.to_string(),
        }
    }

    fn project(id: &str, reason: impl ToString) -> Self {
        Self {
            collection: "project",
            id: id.to_owned(),
            reason: reason.to_string(),
        }
    }
}

/// Mint a fresh 24-digit hex identifier.
pub(crate) fn new_document_id() -> String {
    ObjectId::new().to_hex()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UserDocument {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub projects: Vec<String>,
    #[serde(default)]
    pub contacts: Vec<String>,
    #[serde(default)]
    pub revision: i64,
}

impl UserDocument {
    pub(crate) fn from_new(id: String, user: &NewUser) -> Self {
        Self {
            id,
            name: user.name.as_str().to_owned(),
            email: user.email.as_str().to_owned(),
            password: user.password_hash.as_str().to_owned(),
            projects: Vec::new(),
            contacts: Vec::new(),
            revision: 0,
        }
    }

    /// Snapshot `user` with an explicit stored revision.
    pub(crate) fn from_user(user: &User, revision: i64) -> Self {
        Self {
            id: user.id().to_string(),
            name: user.name().as_str().to_owned(),
            email: user.email().as_str().to_owned(),
            password: user.password_hash().as_str().to_owned(),
            projects: user.projects().iter().map(ToString::to_string).collect(),
            contacts: user.contacts().iter().map(ToString::to_string).collect(),
            revision,
        }
    }
}

impl TryFrom<UserDocument> for User {
    type Error = CorruptDocument;

    fn try_from(doc: UserDocument) -> Result<Self, Self::Error> {
        let corrupt = |reason: &dyn std::fmt::Display| CorruptDocument::user(&doc.id, reason);
        let id = UserId::new(&doc.id).map_err(|err| corrupt(&err))?;
        let name = Username::new(doc.name.as_str()).map_err(|err| corrupt(&err))?;
        let email = EmailAddress::new(doc.email.as_str()).map_err(|err| corrupt(&err))?;
        let projects = doc
            .projects
            .iter()
            .map(ProjectId::new)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| corrupt(&err))?;
        let contacts = doc
            .contacts
            .iter()
            .map(UserId::new)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| corrupt(&err))?;
        let revision = u64::try_from(doc.revision).map_err(|err| corrupt(&err))?;

        Ok(User::new(
            id,
            NewUser {
                name,
                email,
                password_hash: PasswordHash::new(doc.password.as_str()),
            },
        )
        .with_projects(projects)
        .with_contacts(contacts)
        .with_revision(revision))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProjectDocument {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub description: String,
    pub repository: String,
    pub author: String,
    pub author_id: String,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_backup: Option<String>,
}

impl ProjectDocument {
    pub(crate) fn from_draft(id: String, draft: &ProjectDraft) -> Self {
        Self {
            id,
            name: draft.name().to_owned(),
            description: draft.description().to_owned(),
            repository: draft.repository().to_string(),
            author: draft.author().to_owned(),
            author_id: draft.author_id().to_string(),
            technologies: draft.technologies().to_vec(),
            logo: draft.logo().map(str::to_owned),
            logo_backup: draft.logo_backup().map(str::to_owned),
        }
    }
}

impl From<&Project> for ProjectDocument {
    fn from(project: &Project) -> Self {
        Self::from_draft(project.id().to_string(), project.draft())
    }
}

impl TryFrom<ProjectDocument> for Project {
    type Error = CorruptDocument;

    fn try_from(doc: ProjectDocument) -> Result<Self, Self::Error> {
        let id = ProjectId::new(&doc.id).map_err(|err| CorruptDocument::project(&doc.id, err))?;
        let draft = ProjectDraft::try_from(ProjectFields {
            name: doc.name,
            description: doc.description,
            repository: doc.repository,
            author: doc.author,
            author_id: doc.author_id,
            technologies: doc.technologies,
            logo: doc.logo,
            logo_backup: doc.logo_backup,
        })
        .map_err(|err| CorruptDocument::project(&doc.id, err))?;
        Ok(Project::new(id, draft))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn stored_user() -> UserDocument {
        UserDocument {
            id: "6390b1cd5c3c4b2a9e5d7f10".into(),
            name: "alice".into(),
            email: "alice@example.com".into(),
            password: "$argon2id$stub".into(),
            projects: vec!["6390b1cd5c3c4b2a9e5d7f20".into()],
            contacts: Vec::new(),
            revision: 3,
        }
    }

    #[rstest]
    fn user_document_uses_stored_field_names() {
        let value = serde_json::to_value(stored_user()).expect("serialise");
        assert_eq!(value["_id"], json!("6390b1cd5c3c4b2a9e5d7f10"));
        assert_eq!(value["password"], json!("$argon2id$stub"));
        assert!(value.get("id").is_none());
    }

    #[rstest]
    fn user_document_missing_lists_default_to_empty() {
        let doc: UserDocument = serde_json::from_value(json!({
            "_id": "6390b1cd5c3c4b2a9e5d7f10",
            "name": "alice",
            "email": "alice@example.com",
            "password": "hash",
        }))
        .expect("legacy document");
        let user = User::try_from(doc).expect("valid user");
        assert!(user.projects().is_empty());
        assert_eq!(user.revision(), 0);
    }

    #[rstest]
    fn user_document_keeps_revision_and_links() {
        let user = User::try_from(stored_user()).expect("valid user");
        assert_eq!(user.revision(), 3);
        assert_eq!(user.projects()[0].as_str(), "6390b1cd5c3c4b2a9e5d7f20");
    }

    #[rstest]
    #[case::bad_name(UserDocument { name: "a".into(), ..stored_user() })]
    #[case::negative_revision(UserDocument { revision: -1, ..stored_user() })]
    fn invalid_user_documents_are_corrupt(#[case] doc: UserDocument) {
        let err = User::try_from(doc).expect_err("corrupt");
        assert!(err.to_string().starts_with("corrupt user document"));
    }

    #[rstest]
    fn project_document_serialises_camel_case_author_id() {
        let doc = ProjectDocument {
            id: "p1".into(),
            name: "Showcase".into(),
            description: "Side projects".into(),
            repository: "https://github.com/example/showcase".into(),
            author: "alice".into(),
            author_id: "u1".into(),
            technologies: vec!["react".into()],
            logo: None,
            logo_backup: Some("backup.png".into()),
        };
        let value = serde_json::to_value(&doc).expect("serialise");
        assert_eq!(value["authorId"], json!("u1"));
        assert_eq!(value["logoBackup"], json!("backup.png"));
        assert!(value.get("logo").is_none());

        let project = Project::try_from(doc).expect("valid project");
        assert_eq!(project.author_id().as_str(), "u1");
    }
}
