//! Server construction and middleware wiring.

mod config;
pub mod state_builders;

pub use config::ServerConfig;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
#[cfg(feature = "metrics")]
use actix_web::middleware::Condition;
use actix_web::{App, HttpServer, web};

use showcase::Trace;
#[cfg(debug_assertions)]
use showcase::doc::ApiDoc;
use showcase::inbound::http::health::{HealthState, live, ready};
use showcase::inbound::http::projects::{
    create_project, delete_project, get_project, list_projects, projects_by_author,
    update_project,
};
use showcase::inbound::http::state::HttpState;
use showcase::inbound::http::users::{add_friend, get_user_data, list_users, log_in, sign_up};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

/// Build the application with every route under `/api/v1`.
///
/// Literal segments (`/users/all`, `/projects/all`, `/projects/author/..`)
/// are registered before the parameterised routes that would shadow them.
pub fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let api = web::scope("/api/v1")
        .service(sign_up)
        .service(log_in)
        .service(list_users)
        .service(get_user_data)
        .service(add_friend)
        .service(list_projects)
        .service(projects_by_author)
        .service(create_project)
        .service(update_project)
        .service(delete_project)
        .service(get_project);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct an Actix HTTP server over prepared handler state.
///
/// Readiness flips to true once the listener is bound.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let ServerConfig {
        bind_addr,
        #[cfg(feature = "metrics")]
        prometheus,
    } = config;

    let server = HttpServer::new(move || {
        let app = build_app(server_health_state.clone(), http_state.clone());

        #[cfg(feature = "metrics")]
        let app = app.wrap(Condition::from_option(prometheus.clone()));

        app
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
