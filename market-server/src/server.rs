use std::sync::Arc;
use std::time::Duration;

use actix_cors::Cors;
use actix_web::middleware::DefaultHeaders;
use actix_web::{App, HttpResponse, HttpServer, Responder, web};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::application::auth_service::AuthService;
use crate::application::lead_service::LeadService;
use crate::application::vehicle_service::VehicleService;
use crate::data::lead_repository::LeadRepository;
use crate::data::user_repository::UserRepository;
use crate::data::vehicle_repository::VehicleRepository;
use crate::domain::error::DomainError;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::security::{JwtKeys, PasswordHashing};
use crate::presentation::handlers;
use crate::presentation::middleware::{RequestIdMiddleware, TimingMiddleware};
use crate::presentation::rate_limit::RateLimiter;
use crate::presentation::utils::ClientIpSource;

/// Everything the HTTP layer needs, cloned into each worker.
#[derive(Clone)]
pub struct Services {
    pub auth: AuthService,
    pub vehicles: VehicleService,
    pub leads: LeadService,
    pub limiter: RateLimiter,
    pub ip_source: ClientIpSource,
}

impl Services {
    pub fn new(
        users: Arc<dyn UserRepository>,
        vehicles: Arc<dyn VehicleRepository>,
        leads: Arc<dyn LeadRepository>,
        config: &AppConfig,
    ) -> Self {
        Self {
            auth: AuthService::new(
                users,
                JwtKeys::new(config.jwt_secret.clone(), config.jwt_expires_in_hours),
                PasswordHashing::new(config.password_hash_iterations),
            ),
            vehicles: VehicleService::new(Arc::clone(&vehicles)),
            leads: LeadService::new(leads, vehicles),
            limiter: RateLimiter::new(
                config.lead_rate_limit_max,
                Duration::from_secs(config.lead_rate_limit_window_secs),
            ),
            ip_source: ClientIpSource::new(config.trust_proxy),
        }
    }
}

/// Registers the `/api` tree and its shared state on an app.
pub fn api(services: Services) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg: &mut web::ServiceConfig| {
        cfg.app_data(web::Data::new(services.auth))
            .app_data(web::Data::new(services.vehicles))
            .app_data(web::Data::new(services.leads))
            .app_data(web::Data::new(services.ip_source))
            .app_data(web::JsonConfig::default().error_handler(|err, _| {
                DomainError::Validation(format!("invalid request body: {}", err)).into()
            }))
            .app_data(web::QueryConfig::default().error_handler(|err, _| {
                DomainError::Validation(format!("invalid query string: {}", err)).into()
            }))
            .app_data(web::PathConfig::default().error_handler(|err, _| {
                DomainError::Validation(format!("invalid path parameter: {}", err)).into()
            }))
            .service(
                web::scope("/api")
                    .route("/health", web::get().to(health))
                    .service(handlers::auth::scope())
                    .service(handlers::vehicle::scope())
                    .service(handlers::lead::scope(services.limiter, services.ip_source)),
            );
    }
}

pub async fn start_rest_server(config: AppConfig, services: Services) -> anyhow::Result<()> {
    let bind_address = (config.host.clone(), config.port);

    info!(
        host = %bind_address.0,
        port = bind_address.1,
        "HTTP server starting"
    );

    HttpServer::new(move || {
        App::new()
            .wrap(
                DefaultHeaders::new()
                    .add(("X-Content-Type-Options", "nosniff"))
                    .add(("Referrer-Policy", "no-referrer"))
                    .add(("Permissions-Policy", "geolocation=()"))
                    .add(("Cross-Origin-Opener-Policy", "same-origin")),
            )
            .wrap(build_cors(&config))
            .wrap(TimingMiddleware)
            .wrap(RequestIdMiddleware)
            .configure(api(services.clone()))
    })
    .bind(bind_address)?
    .run()
    .await?;

    Ok(())
}

fn build_cors(config: &AppConfig) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
        .allowed_headers(vec![
            actix_web::http::header::CONTENT_TYPE,
            actix_web::http::header::AUTHORIZATION,
        ])
        .supports_credentials()
        .max_age(3600);

    for origin in &config.cors_origins {
        cors = cors.allowed_origin(origin);
    }

    cors
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
}

async fn health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok",
        timestamp: Utc::now(),
    })
}
