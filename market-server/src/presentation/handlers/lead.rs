use actix_web::{HttpRequest, HttpResponse, Scope, get, guard, post, web};
use tracing::info;

use crate::application::lead_service::LeadService;
use crate::domain::error::DomainError;
use crate::presentation::dto::{
    CreateLeadRequest, LeadCreatedResponse, LeadPage, LeadQuery, LeadStatsResponse,
};
use crate::presentation::middleware::JwtAuthMiddleware;
use crate::presentation::rate_limit::{RateLimitMiddleware, RateLimiter};
use crate::presentation::utils::{AuthenticatedUser, ClientIpSource, request_id};

/// Creating a lead is public and rate limited; reading leads needs a token.
pub fn scope(limiter: RateLimiter, ip_source: ClientIpSource) -> Scope {
    web::scope("/leads")
        .service(
            web::scope("")
                .guard(guard::Post())
                .wrap(RateLimitMiddleware::new(limiter, ip_source))
                .service(create_lead),
        )
        .service(
            web::scope("")
                .wrap(JwtAuthMiddleware)
                .service(list_leads)
                .service(lead_stats),
        )
}

#[post("")]
async fn create_lead(
    req: HttpRequest,
    leads: web::Data<LeadService>,
    ip_source: web::Data<ClientIpSource>,
    payload: web::Json<CreateLeadRequest>,
) -> Result<HttpResponse, DomainError> {
    let lead = payload.into_inner().into_new_lead()?;
    let ctx = ip_source.request_context(&req);
    let summary = leads.create_lead(lead, ctx).await?;

    info!(
        request_id = %request_id(&req),
        lead_id = %summary.id,
        vehicle_id = %summary.vehicle_id,
        "lead created"
    );

    Ok(HttpResponse::Created().json(LeadCreatedResponse {
        message: "lead registered successfully",
        lead: summary,
    }))
}

#[get("")]
async fn list_leads(
    user: AuthenticatedUser,
    leads: web::Data<LeadService>,
    query: web::Query<LeadQuery>,
) -> Result<HttpResponse, DomainError> {
    let page = leads
        .list_leads(user.id, query.filter()?, query.page()?)
        .await?;
    Ok(HttpResponse::Ok().json(LeadPage::from(page)))
}

#[get("/stats")]
async fn lead_stats(
    user: AuthenticatedUser,
    leads: web::Data<LeadService>,
) -> Result<HttpResponse, DomainError> {
    let stats = leads.stats(user.id).await?;
    Ok(HttpResponse::Ok().json(LeadStatsResponse { stats }))
}
