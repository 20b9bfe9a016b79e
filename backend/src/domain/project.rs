//! Project entity.
//!
//! A project names its author twice: `author` is the display name shown in
//! listings and `author_id` references the [`User`](super::User) whose
//! `projects` list must contain this project's id.

use std::fmt;

use url::Url;

use super::document_id::document_id;
use super::user::UserId;

document_id! {
    /// Store-assigned project identifier.
    ProjectId
}

/// Validation errors raised while building a [`ProjectDraft`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectValidationError {
    EmptyName,
    EmptyDescription,
    EmptyAuthor,
    InvalidAuthorId,
    InvalidRepository { reason: String },
}

impl fmt::Display for ProjectValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "name must not be empty"),
            Self::EmptyDescription => write!(f, "description must not be empty"),
            Self::EmptyAuthor => write!(f, "author must not be empty"),
            Self::InvalidAuthorId => write!(f, "authorId must be a valid identifier"),
            Self::InvalidRepository { reason } => {
                write!(f, "repository must be an http(s) URL: {reason}")
            }
        }
    }
}

impl std::error::Error for ProjectValidationError {}

/// Raw project fields as received from a client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectFields {
    pub name: String,
    pub description: String,
    pub repository: String,
    pub author: String,
    pub author_id: String,
    pub technologies: Vec<String>,
    pub logo: Option<String>,
    pub logo_backup: Option<String>,
}

/// Validated project contents without an identifier.
///
/// ## Invariants
/// - `name`, `description` and `author` are trimmed and non-empty.
/// - `repository` is an absolute `http` or `https` URL.
/// - `technologies` holds no blanks or duplicates and keeps first-seen order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDraft {
    name: String,
    description: String,
    repository: Url,
    author: String,
    author_id: UserId,
    technologies: Vec<String>,
    logo: Option<String>,
    logo_backup: Option<String>,
}

fn required(value: String, error: ProjectValidationError) -> Result<String, ProjectValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(error);
    }
    Ok(trimmed.to_owned())
}

fn parse_repository(raw: &str) -> Result<Url, ProjectValidationError> {
    let url = Url::parse(raw.trim()).map_err(|err| ProjectValidationError::InvalidRepository {
        reason: err.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ProjectValidationError::InvalidRepository {
            reason: format!("unsupported scheme `{other}`"),
        }),
    }
}

fn dedupe_technologies(raw: Vec<String>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::with_capacity(raw.len());
    for technology in raw {
        let technology = technology.trim();
        if technology.is_empty() || seen.iter().any(|known| known == technology) {
            continue;
        }
        seen.push(technology.to_owned());
    }
    seen
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_owned())
        .filter(|trimmed| !trimmed.is_empty())
}

impl TryFrom<ProjectFields> for ProjectDraft {
    type Error = ProjectValidationError;

    fn try_from(fields: ProjectFields) -> Result<Self, Self::Error> {
        let ProjectFields {
            name,
            description,
            repository,
            author,
            author_id,
            technologies,
            logo,
            logo_backup,
        } = fields;

        Ok(Self {
            name: required(name, ProjectValidationError::EmptyName)?,
            description: required(description, ProjectValidationError::EmptyDescription)?,
            repository: parse_repository(&repository)?,
            author: required(author, ProjectValidationError::EmptyAuthor)?,
            author_id: UserId::new(author_id.trim())
                .map_err(|_| ProjectValidationError::InvalidAuthorId)?,
            technologies: dedupe_technologies(technologies),
            logo: optional(logo),
            logo_backup: optional(logo_backup),
        })
    }
}

impl ProjectDraft {
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    pub fn repository(&self) -> &Url {
        &self.repository
    }

    /// Display name of the author.
    pub fn author(&self) -> &str {
        self.author.as_str()
    }

    /// Referenced author.
    pub fn author_id(&self) -> &UserId {
        &self.author_id
    }

    pub fn technologies(&self) -> &[String] {
        &self.technologies
    }

    pub fn logo(&self) -> Option<&str> {
        self.logo.as_deref()
    }

    pub fn logo_backup(&self) -> Option<&str> {
        self.logo_backup.as_deref()
    }

    /// Whether any technology equals `technology` exactly.
    pub fn uses(&self, technology: &str) -> bool {
        self.technologies.iter().any(|known| known == technology)
    }
}

/// Persisted project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    id: ProjectId,
    draft: ProjectDraft,
}

impl Project {
    pub fn new(id: ProjectId, draft: ProjectDraft) -> Self {
        Self { id, draft }
    }

    pub fn id(&self) -> &ProjectId {
        &self.id
    }

    /// Contents of the project.
    pub fn draft(&self) -> &ProjectDraft {
        &self.draft
    }

    pub fn author_id(&self) -> &UserId {
        self.draft.author_id()
    }

    /// Split into identifier and contents.
    pub fn into_parts(self) -> (ProjectId, ProjectDraft) {
        (self.id, self.draft)
    }
}

#[cfg(test)]
mod tests {
    //! Validation coverage for project drafts.
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn fields() -> ProjectFields {
        ProjectFields {
            name: " Showcase ".into(),
            description: "A portfolio of side projects".into(),
            repository: "https://github.com/example/showcase".into(),
            author: "alice".into(),
            author_id: "6390b1cd5c3c4b2a9e5d7f10".into(),
            technologies: vec!["react".into(), " rust ".into(), "react".into(), "".into()],
            logo: Some("logos/showcase.png".into()),
            logo_backup: Some("   ".into()),
        }
    }

    #[rstest]
    fn valid_fields_are_normalised(fields: ProjectFields) {
        let draft = ProjectDraft::try_from(fields).expect("valid fields");
        assert_eq!(draft.name(), "Showcase");
        assert_eq!(draft.technologies(), ["react", "rust"]);
        assert_eq!(draft.logo(), Some("logos/showcase.png"));
        assert_eq!(draft.logo_backup(), None);
        assert!(draft.uses("rust"));
        assert!(!draft.uses("Rust"));
    }

    #[rstest]
    #[case::ftp("ftp://example.com/repo")]
    #[case::relative("github.com/example/showcase")]
    #[case::blank("")]
    fn repository_must_be_http_url(mut fields: ProjectFields, #[case] repository: &str) {
        fields.repository = repository.into();
        let err = ProjectDraft::try_from(fields).expect_err("invalid repository");
        assert!(matches!(err, ProjectValidationError::InvalidRepository { .. }));
    }

    #[rstest]
    fn blank_name_is_rejected(mut fields: ProjectFields) {
        fields.name = "   ".into();
        assert_eq!(
            ProjectDraft::try_from(fields),
            Err(ProjectValidationError::EmptyName)
        );
    }

    #[rstest]
    fn author_id_must_be_an_identifier(mut fields: ProjectFields) {
        fields.author_id = "not an id".into();
        assert_eq!(
            ProjectDraft::try_from(fields),
            Err(ProjectValidationError::InvalidAuthorId)
        );
    }
}
