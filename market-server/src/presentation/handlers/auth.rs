use actix_web::{HttpRequest, HttpResponse, Scope, get, post, web};
use tracing::info;

use crate::application::auth_service::AuthService;
use crate::domain::error::DomainError;
use crate::presentation::dto::{
    AuthResponse, LoginRequest, RegisterRequest, UserResponse, validate_payload,
};
use crate::presentation::middleware::JwtAuthMiddleware;
use crate::presentation::utils::{AuthenticatedUser, request_id};

pub fn scope() -> Scope {
    web::scope("/auth")
        .service(register)
        .service(login)
        .service(web::scope("").wrap(JwtAuthMiddleware).service(me))
}

#[post("/register")]
async fn register(
    req: HttpRequest,
    auth: web::Data<AuthService>,
    payload: web::Json<RegisterRequest>,
) -> Result<HttpResponse, DomainError> {
    let payload = payload.into_inner().normalized();
    validate_payload(&payload)?;

    let session = auth
        .register(payload.name, payload.email, payload.password)
        .await?;

    info!(
        request_id = %request_id(&req),
        user_id = %session.user.id,
        "user registered"
    );

    Ok(HttpResponse::Created().json(AuthResponse {
        message: "user registered successfully",
        token: session.token,
        user: session.user.profile(),
    }))
}

#[post("/login")]
async fn login(
    req: HttpRequest,
    auth: web::Data<AuthService>,
    payload: web::Json<LoginRequest>,
) -> Result<HttpResponse, DomainError> {
    validate_payload(&payload.0)?;
    let session = auth.login(payload.email.trim(), &payload.password).await?;

    info!(
        request_id = %request_id(&req),
        user_id = %session.user.id,
        "user logged in"
    );

    Ok(HttpResponse::Ok().json(AuthResponse {
        message: "login successful",
        token: session.token,
        user: session.user.profile(),
    }))
}

#[get("/me")]
async fn me(
    user: AuthenticatedUser,
    auth: web::Data<AuthService>,
) -> Result<HttpResponse, DomainError> {
    let user = auth.get_user(user.id).await?;
    Ok(HttpResponse::Ok().json(UserResponse {
        user: user.profile(),
    }))
}
