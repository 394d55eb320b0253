//! Server construction and middleware wiring.

mod config;

pub use config::ServerConfig;

use std::sync::Arc;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use tracing::info;

use userbook::Trace;
use userbook::inbound::http::health::{HealthState, live, ready};
use userbook::inbound::http::state::HttpState;
use userbook::inbound::http::users;
use userbook::outbound::memory::InMemoryUserRepository;
use userbook::outbound::persistence::DieselUserRepository;

/// Pick the user store: PostgreSQL when a pool is configured, memory otherwise.
fn build_http_state(config: &ServerConfig) -> HttpState {
    match &config.db_pool {
        Some(pool) => HttpState::from_repository(Arc::new(DieselUserRepository::new(pool.clone()))),
        None => HttpState::from_repository(Arc::new(InMemoryUserRepository::new())),
    }
}

fn build_app(
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
    App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .configure(users::configure)
        .service(ready)
        .service(live)
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// # Returns
/// A spawned [`Server`] that must be awaited to drive the listener.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket or starting the server fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = web::Data::new(build_http_state(&config));
    let store = if config.has_db_pool() {
        "postgres"
    } else {
        "memory"
    };
    let ServerConfig {
        bind_addr,
        db_pool: _,
    } = config;

    let server = HttpServer::new(move || build_app(server_health_state.clone(), http_state.clone()))
        .bind(bind_addr)?
        .run();

    info!(%bind_addr, store, "listening");
    health_state.mark_ready();
    Ok(server)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::{StatusCode, header};
    use actix_web::test as actix_test;
    use std::net::SocketAddr;

    fn memory_config() -> ServerConfig {
        ServerConfig::new(SocketAddr::from(([127, 0, 0, 1], 0)))
    }

    #[actix_web::test]
    async fn app_serves_users_and_probes_with_trace_header() {
        let health = web::Data::new(HealthState::new());
        health.mark_ready();
        let state = web::Data::new(build_http_state(&memory_config()));
        let app = actix_test::init_service(build_app(health, state)).await;

        let index =
            actix_test::call_service(&app, actix_test::TestRequest::get().uri("/").to_request())
                .await;
        assert_eq!(index.status(), StatusCode::OK);
        assert!(index.headers().contains_key("trace-id"));

        let probe = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/health/ready").to_request(),
        )
        .await;
        assert_eq!(probe.status(), StatusCode::OK);
        assert_eq!(
            probe
                .headers()
                .get(header::CACHE_CONTROL)
                .and_then(|value| value.to_str().ok()),
            Some("no-store")
        );
    }

    #[actix_web::test]
    async fn create_server_marks_ready() {
        let health = web::Data::new(HealthState::new());
        let config = memory_config();
        assert_eq!(config.bind_addr().port(), 0);
        assert!(!config.has_db_pool());

        let server = create_server(health.clone(), config).expect("bind ephemeral port");
        assert!(health.is_ready());
        server.handle().stop(false).await;
    }
}
