//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint (users, projects, health), the
//! request and response DTOs, the error schema wrappers and the bearer token
//! security scheme. Swagger UI serves it in debug builds and the
//! `openapi-dump` binary prints it for external tooling.

use crate::inbound::http::projects::{
    AuthorProjectsResponse, DeleteProjectRequest, ProjectPage, ProjectRequest, ProjectResponse,
};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::users::{LogInRequest, SignUpRequest, UserResponse};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Registers the bearer token scheme referenced by mutating routes.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "bearerAuth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Token issued by POST /api/v1/users/log-in."))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Showcase backend API",
        description = "Users, contacts and the projects they author."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::users::sign_up,
        crate::inbound::http::users::log_in,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::get_user_data,
        crate::inbound::http::users::add_friend,
        crate::inbound::http::projects::list_projects,
        crate::inbound::http::projects::projects_by_author,
        crate::inbound::http::projects::get_project,
        crate::inbound::http::projects::create_project,
        crate::inbound::http::projects::update_project,
        crate::inbound::http::projects::delete_project,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        SignUpRequest,
        LogInRequest,
        UserResponse,
        ProjectRequest,
        DeleteProjectRequest,
        ProjectResponse,
        ProjectPage,
        AuthorProjectsResponse,
        ErrorSchema,
        ErrorCodeSchema
    )),
    tags(
        (name = "users", description = "Registration, log-in and contacts"),
        (name = "projects", description = "Projects and their authors"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! OpenAPI document structure.

    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    // utoipa replaces :: with . in schema names
    const ERROR_SCHEMA_NAME: &str = "crate.domain.Error";

    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[rstest]
    fn error_schema_has_required_fields() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let error_schema = schemas.get(ERROR_SCHEMA_NAME).expect("Error schema");

        assert_object_schema_has_field(error_schema, "code");
        assert_object_schema_has_field(error_schema, "message");
        assert_object_schema_has_field(error_schema, "traceId");
    }

    #[rstest]
    fn user_schema_never_exposes_the_password() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let user = schemas.get("UserResponse").expect("UserResponse schema");

        assert_object_schema_has_field(user, "_id");
        match user {
            RefOr::T(Schema::Object(obj)) => assert!(!obj.properties.contains_key("password")),
            _ => panic!("expected Object schema"),
        }
    }

    #[rstest]
    #[case("/api/v1/users/sign-up")]
    #[case("/api/v1/users/{userId}")]
    #[case("/api/v1/projects/all")]
    #[case("/api/v1/projects/author/{userId}")]
    #[case("/api/v1/projects/delete/{projectId}")]
    #[case("/health/ready")]
    fn paths_are_registered(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing path {path}");
    }

    #[rstest]
    #[case("/api/v1/users/sign-up", "post", "400")]
    #[case("/api/v1/users/{friendId}", "patch", "409")]
    #[case("/api/v1/projects/new", "post", "500")]
    #[case("/api/v1/projects/delete/{projectId}", "delete", "400")]
    fn error_responses_reference_the_error_schema(
        #[case] path: &str,
        #[case] method: &str,
        #[case] status: &str,
    ) {
        let doc = serde_json::to_value(ApiDoc::openapi()).expect("serialise document");
        let schema = &doc["paths"][path][method]["responses"][status]["content"]
            ["application/json"]["schema"]["$ref"];
        assert_eq!(
            schema.as_str(),
            Some(format!("#/components/schemas/{ERROR_SCHEMA_NAME}").as_str())
        );
    }

    #[rstest]
    fn bearer_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearerAuth"));
    }
}
