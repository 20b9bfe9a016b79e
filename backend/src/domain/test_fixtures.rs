//! Builders shared by domain service tests.

use crate::domain::{
    EmailAddress, NewUser, PasswordHash, Project, ProjectDraft, ProjectFields, ProjectId, User,
    UserId, Username,
};

pub(crate) fn user_id(raw: &str) -> UserId {
    UserId::new(raw).expect("valid user id")
}

pub(crate) fn project_id(raw: &str) -> ProjectId {
    ProjectId::new(raw).expect("valid project id")
}

pub(crate) fn user(id: &str, name: &str) -> User {
    User::new(
        user_id(id),
        NewUser {
            name: Username::new(name).expect("valid username"),
            email: EmailAddress::new(format!("{name}@example.com")).expect("valid email"),
            password_hash: PasswordHash::new(format!("hash-of-{name}")),
        },
    )
}

pub(crate) fn draft(author_id: &str) -> ProjectDraft {
    ProjectDraft::try_from(ProjectFields {
        name: "Showcase".into(),
        description: "Portfolio of side projects".into(),
        repository: "https://github.com/example/showcase".into(),
        author: "alice".into(),
        author_id: author_id.into(),
        technologies: vec!["react".into(), "rust".into()],
        logo: Some("logos/showcase.png".into()),
        logo_backup: None,
    })
    .expect("valid draft")
}

pub(crate) fn project(id: &str, author_id: &str) -> Project {
    Project::new(project_id(id), draft(author_id))
}
