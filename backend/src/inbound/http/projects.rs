//! Projects API handlers.
//!
//! ```text
//! GET    /api/v1/projects/all?offset=0&limit=10&technology=react
//! GET    /api/v1/projects/{projectId}
//! GET    /api/v1/projects/author/{userId}?offset&limit&technology
//! POST   /api/v1/projects/new                   (bearer token)
//! PUT    /api/v1/projects/update/{projectId}    (bearer token)
//! DELETE /api/v1/projects/delete/{projectId}    (bearer token) {"deleteFromAuthor":true}
//! ```
//!
//! Empty listings answer 404 with a keyed message rather than the error
//! envelope, matching what existing clients parse.

use std::collections::HashMap;

use actix_web::{HttpResponse, delete, get, post, put, web};
use pagination::{Page, PageRequest, PageRequestError};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::ports::{AuthorProjects, ProjectDeletion};
use crate::domain::query::{Listing, project_predicate};
use crate::domain::{
    Error, Project, ProjectDraft, ProjectFields, ProjectId, ProjectValidationError, UserId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

const NO_PROJECTS: &str = "No projects found";

/// Project payload for create and update.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct ProjectRequest {
    #[schema(example = "Showcase")]
    pub name: String,
    pub description: String,
    #[schema(example = "https://github.com/example/showcase")]
    pub repository: String,
    #[schema(example = "alice")]
    pub author: String,
    #[schema(example = "6390b1cd5c3c4b2a9e5d7f10")]
    pub author_id: String,
    pub technologies: Vec<String>,
    pub logo: Option<String>,
    pub logo_backup: Option<String>,
}

impl From<ProjectRequest> for ProjectFields {
    fn from(value: ProjectRequest) -> Self {
        Self {
            name: value.name,
            description: value.description,
            repository: value.repository,
            author: value.author,
            author_id: value.author_id,
            technologies: value.technologies,
            logo: value.logo,
            logo_backup: value.logo_backup,
        }
    }
}

/// Optional body of `DELETE /projects/delete/{projectId}`.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct DeleteProjectRequest {
    /// Also remove the id from the author's `projects` list.
    pub delete_from_author: bool,
}

/// Public view of a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub description: String,
    pub repository: String,
    pub author: String,
    pub author_id: String,
    pub technologies: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_backup: Option<String>,
}

impl From<&Project> for ProjectResponse {
    fn from(project: &Project) -> Self {
        let draft = project.draft();
        Self {
            id: project.id().to_string(),
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

/// A window of projects as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ProjectPage {
    pub offset: usize,
    pub limit: usize,
    pub list: Vec<ProjectResponse>,
}

impl From<Page<Project>> for ProjectPage {
    fn from(page: Page<Project>) -> Self {
        let page = page.map(|project| ProjectResponse::from(&project));
        Self {
            offset: page.offset,
            limit: page.limit,
            list: page.list,
        }
    }
}

/// Projects of one author plus the author's project count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AuthorProjectsResponse {
    pub author: String,
    pub total: usize,
    pub projects: ProjectPage,
}

impl From<AuthorProjects> for AuthorProjectsResponse {
    fn from(value: AuthorProjects) -> Self {
        Self {
            author: value.author.to_string(),
            total: value.total,
            projects: value.projects.into(),
        }
    }
}

type RawQuery = web::Query<HashMap<String, String>>;

fn page_request(query: &HashMap<String, String>) -> Result<PageRequest, Error> {
    PageRequest::parse(
        query.get("offset").map(String::as_str),
        query.get("limit").map(String::as_str),
    )
    .map_err(|err| {
        let PageRequestError::NotANonNegativeInteger { param, ref value } = err;
        Error::invalid_request(err.to_string())
            .with_details(json!({ "field": param, "value": value, "code": "invalid_pagination" }))
    })
}

fn pairs(query: &HashMap<String, String>) -> impl Iterator<Item = (&str, &str)> {
    query.iter().map(|(k, v)| (k.as_str(), v.as_str()))
}

fn validation_code(err: &ProjectValidationError) -> (&'static str, &'static str) {
    match err {
        ProjectValidationError::EmptyName => ("name", "empty_name"),
        ProjectValidationError::EmptyDescription => ("description", "empty_description"),
        ProjectValidationError::EmptyAuthor => ("author", "empty_author"),
        ProjectValidationError::InvalidAuthorId => ("authorId", "invalid_author_id"),
        ProjectValidationError::InvalidRepository { .. } => ("repository", "invalid_repository"),
    }
}

fn parse_draft(message: &str, payload: ProjectRequest) -> Result<ProjectDraft, Error> {
    ProjectDraft::try_from(ProjectFields::from(payload)).map_err(|err| {
        let (field, code) = validation_code(&err);
        Error::invalid_request(message)
            .with_details(json!({ "field": field, "code": code }))
            .with_diagnostic(err.to_string())
    })
}

/// An absent body keeps the author link; anything else must parse.
fn parse_delete_options(body: &[u8]) -> Result<DeleteProjectRequest, Error> {
    if body.trim_ascii().is_empty() {
        return Ok(DeleteProjectRequest::default());
    }
    serde_json::from_slice(body).map_err(|err| {
        Error::invalid_request("Couldn't delete any project")
            .with_details(json!({ "field": "deleteFromAuthor", "code": "invalid_delete_request" }))
            .with_diagnostic(err.to_string())
    })
}

fn no_projects() -> HttpResponse {
    HttpResponse::NotFound().json(json!({ "projects": NO_PROJECTS }))
}

/// List projects, filtered by technology and paginated.
#[utoipa::path(
    get,
    path = "/api/v1/projects/all",
    params(
        ("offset" = Option<usize>, Query, description = "Items to skip (default 0)"),
        ("limit" = Option<usize>, Query, description = "Maximum items (default 10)"),
        ("technology" = Option<String>, Query, description = "Exact technology to match")
    ),
    responses(
        (status = 200, description = "`{ projects: { offset, limit, list } }`", body = ProjectPage),
        (status = 400, description = "Invalid pagination", body = ErrorSchema),
        (status = 404, description = "`{ projects: \"No projects found\" }`")
    ),
    tags = ["projects"],
    operation_id = "listProjects",
    security([])
)]
#[get("/projects/all")]
pub async fn list_projects(state: web::Data<HttpState>, query: RawQuery) -> ApiResult<HttpResponse> {
    let page = page_request(&query)?;
    let predicate = project_predicate(pairs(&query));
    match state.projects.list_projects(&predicate, page).await? {
        Listing::Found(found) => {
            Ok(HttpResponse::Ok().json(json!({ "projects": ProjectPage::from(found) })))
        }
        Listing::NoneFound => Ok(no_projects()),
    }
}

/// List the projects linked to an author.
#[utoipa::path(
    get,
    path = "/api/v1/projects/author/{userId}",
    params(
        ("userId" = String, Path, description = "Author identifier"),
        ("offset" = Option<usize>, Query, description = "Items to skip (default 0)"),
        ("limit" = Option<usize>, Query, description = "Maximum items (default 10)"),
        ("technology" = Option<String>, Query, description = "Exact technology to match")
    ),
    responses(
        (status = 200, description = "`{ projectsByAuthor: { author, total, projects } }`", body = AuthorProjectsResponse),
        (status = 400, description = "Invalid pagination", body = ErrorSchema),
        (status = 404, description = "Unknown author, or `{ projectsByAuthor: { author, total: \"0 projects\" } }`")
    ),
    tags = ["projects"],
    operation_id = "projectsByAuthor",
    security([])
)]
#[get("/projects/author/{user_id}")]
pub async fn projects_by_author(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    query: RawQuery,
) -> ApiResult<HttpResponse> {
    let author = UserId::new(path.as_str()).map_err(|err| {
        Error::not_found("Unable to get the requested projects").with_diagnostic(err.to_string())
    })?;
    let page = page_request(&query)?;
    let predicate = project_predicate(pairs(&query));
    match state
        .projects
        .projects_by_author(&author, &predicate, page)
        .await?
    {
        Listing::Found(found) => Ok(HttpResponse::Ok()
            .json(json!({ "projectsByAuthor": AuthorProjectsResponse::from(found) }))),
        Listing::NoneFound => Ok(HttpResponse::NotFound().json(json!({
            "projectsByAuthor": { "author": author.as_str(), "total": "0 projects" }
        }))),
    }
}

/// Fetch one project.
#[utoipa::path(
    get,
    path = "/api/v1/projects/{projectId}",
    params(("projectId" = String, Path, description = "Project identifier")),
    responses(
        (status = 200, description = "`{ project }`", body = ProjectResponse),
        (status = 404, description = "`{ projects: \"No projects found\" }`")
    ),
    tags = ["projects"],
    operation_id = "getProject",
    security([])
)]
#[get("/projects/{project_id}")]
pub async fn get_project(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let Ok(id) = ProjectId::new(path.as_str()) else {
        return Ok(no_projects());
    };
    match state.projects.get_project(&id).await? {
        Some(project) => {
            Ok(HttpResponse::Ok().json(json!({ "project": ProjectResponse::from(&project) })))
        }
        None => Ok(no_projects()),
    }
}

/// Create a project and link it to its author.
#[utoipa::path(
    post,
    path = "/api/v1/projects/new",
    request_body = ProjectRequest,
    responses(
        (status = 201, description = "`{ projectCreated }`", body = ProjectResponse),
        (status = 400, description = "Invalid project", body = ErrorSchema),
        (status = 401, description = "Missing or invalid token", body = ErrorSchema),
        (status = 404, description = "Author does not exist", body = ErrorSchema),
        (status = 409, description = "Author changed concurrently", body = ErrorSchema),
        (status = 500, description = "Rollback failed", body = ErrorSchema)
    ),
    tags = ["projects"],
    operation_id = "createProject",
    security(("bearerAuth" = []))
)]
#[post("/projects/new")]
pub async fn create_project(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    payload: web::Json<ProjectRequest>,
) -> ApiResult<HttpResponse> {
    let draft = parse_draft("Unable to create the project", payload.into_inner())?;
    let project = state
        .projects_command
        .create_project(caller.identity(), draft)
        .await?;
    Ok(HttpResponse::Created().json(json!({ "projectCreated": ProjectResponse::from(&project) })))
}

/// Replace a project's contents.
#[utoipa::path(
    put,
    path = "/api/v1/projects/update/{projectId}",
    params(("projectId" = String, Path, description = "Project identifier")),
    request_body = ProjectRequest,
    responses(
        (status = 200, description = "`{ updatedProject }`", body = ProjectResponse),
        (status = 400, description = "Couldn't update any project", body = ErrorSchema),
        (status = 401, description = "Missing or invalid token", body = ErrorSchema)
    ),
    tags = ["projects"],
    operation_id = "updateProject",
    security(("bearerAuth" = []))
)]
#[put("/projects/update/{project_id}")]
pub async fn update_project(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<String>,
    payload: web::Json<ProjectRequest>,
) -> ApiResult<HttpResponse> {
    let id = ProjectId::new(path.as_str()).map_err(|err| {
        Error::invalid_request("Couldn't update any project").with_diagnostic(err.to_string())
    })?;
    let draft = parse_draft("Couldn't update any project", payload.into_inner())?;
    let project = state
        .projects_command
        .update_project(caller.identity(), &id, draft)
        .await?;
    Ok(HttpResponse::Ok().json(json!({ "updatedProject": ProjectResponse::from(&project) })))
}

/// Delete a project, optionally unlinking it from its author.
#[utoipa::path(
    delete,
    path = "/api/v1/projects/delete/{projectId}",
    params(("projectId" = String, Path, description = "Project identifier")),
    request_body(content = DeleteProjectRequest, description = "Optional; defaults to `deleteFromAuthor: false`"),
    responses(
        (status = 200, description = "`{ projectDeleted: { id, status: \"Deleted\" } }`"),
        (status = 400, description = "Malformed delete options", body = ErrorSchema),
        (status = 401, description = "Missing or invalid token", body = ErrorSchema),
        (status = 404, description = "Couldn't delete any project", body = ErrorSchema),
        (status = 409, description = "Author changed concurrently", body = ErrorSchema)
    ),
    tags = ["projects"],
    operation_id = "deleteProject",
    security(("bearerAuth" = []))
)]
#[delete("/projects/delete/{project_id}")]
pub async fn delete_project(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<String>,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    let options = parse_delete_options(&body)?;
    let id = ProjectId::new(path.as_str()).map_err(|err| {
        Error::not_found("Couldn't delete any project").with_diagnostic(err.to_string())
    })?;
    let deleted = state
        .projects_command
        .delete_project(
            caller.identity(),
            &id,
            ProjectDeletion {
                unlink_author: options.delete_from_author,
            },
        )
        .await?;
    Ok(HttpResponse::Ok().json(json!({
        "projectDeleted": { "id": deleted.as_str(), "status": "Deleted" }
    })))
}

#[cfg(test)]
#[path = "projects_tests.rs"]
mod tests;
