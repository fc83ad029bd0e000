//! Server construction and middleware wiring.

mod config;
mod seeding;
mod state_builders;

pub use config::ServerConfig;
pub use seeding::{SeedReport, StartupSeedingError, seed_on_startup};

use state_builders::{Repositories, build_http_state, open_media_store};

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use tracing::info;

use foodgram::AppSettings;
use foodgram::Trace;
#[cfg(debug_assertions)]
use foodgram::doc::ApiDoc;
use foodgram::inbound::http::configure;
use foodgram::inbound::http::health::{HealthState, live, ready};
use foodgram::inbound::http::state::HttpState;
use foodgram::outbound::security::Argon2PasswordHasher;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use std::sync::Arc;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
    } = deps;

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(ready)
        .service(live)
        .configure(configure);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    #[cfg(not(debug_assertions))]
    let app = app;

    app
}

/// Seed fixtures and construct an Actix HTTP server over the database.
///
/// # Parameters
/// - `health_state`: shared readiness state, marked ready once the listener is bound.
/// - `config`: pre-built [`ServerConfig`] with the pool, bind address and media settings.
/// - `settings`: loaded settings naming optional fixture files.
///
/// # Returns
/// A spawned [`Server`] that must be awaited to drive the listener.
///
/// # Errors
/// Returns [`std::io::Error`] when the media root cannot be opened, seeding
/// fails, or binding the socket fails.
pub async fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
    settings: &AppSettings,
) -> std::io::Result<Server> {
    let repositories = Repositories::new(&config.db_pool);
    let media = open_media_store(&config)?;

    let report = seed_on_startup(
        settings,
        &repositories.ingredient_service(),
        &repositories.accounts_service(Arc::new(Argon2PasswordHasher::new()), Arc::clone(&media)),
    )
    .await
    .map_err(std::io::Error::other)?;
    info!(
        ingredients = ?report.ingredients,
        users = ?report.users,
        "startup seeding finished"
    );

    let http_state = web::Data::new(build_http_state(&config, &repositories, &media));
    let server_health_state = health_state.clone();
    let bind_addr = config.bind_addr();

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
        })
    })
    .bind(bind_addr)?
    .run();

    info!(%bind_addr, "foodgram listening");
    health_state.mark_ready();
    Ok(server)
}

#[cfg(test)]
mod tests {
    //! Regression coverage for the assembled application.
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test;
    use foodgram::domain::TRACE_ID_HEADER;
    use foodgram::test_support::harness::TestBackend;
    use rstest::rstest;

    fn deps(backend: &TestBackend, is_ready: bool) -> AppDependencies {
        let health_state = web::Data::new(HealthState::new());
        if is_ready {
            health_state.mark_ready();
        }
        AppDependencies {
            health_state,
            http_state: backend.data(),
        }
    }

    #[rstest]
    #[case(true, StatusCode::OK)]
    #[case(false, StatusCode::SERVICE_UNAVAILABLE)]
    #[actix_web::test]
    async fn readiness_follows_health_state(
        #[case] is_ready: bool,
        #[case] expected: StatusCode,
    ) {
        let backend = TestBackend::new();
        let app = test::init_service(build_app(deps(&backend, is_ready))).await;

        let res = test::call_service(&app, test::TestRequest::get().uri("/health/ready").to_request()).await;

        assert_eq!(res.status(), expected);
    }

    #[actix_web::test]
    async fn api_routes_carry_trace_headers() {
        let backend = TestBackend::new();
        let app = test::init_service(build_app(deps(&backend, true))).await;

        let res = test::call_service(&app, test::TestRequest::get().uri("/api/ingredients/").to_request()).await;

        assert_eq!(res.status(), StatusCode::OK);
        assert!(res.headers().contains_key(TRACE_ID_HEADER));
    }

    #[cfg(debug_assertions)]
    #[actix_web::test]
    async fn openapi_document_is_served() {
        let backend = TestBackend::new();
        let app = test::init_service(build_app(deps(&backend, true))).await;

        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/api-docs/openapi.json").to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
    }
}
