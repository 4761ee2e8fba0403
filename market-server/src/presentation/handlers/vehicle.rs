use actix_web::{HttpRequest, HttpResponse, Scope, delete, get, post, put, web};
use tracing::info;
use uuid::Uuid;

use crate::application::vehicle_service::VehicleService;
use crate::domain::error::DomainError;
use crate::presentation::dto::{
    MessageResponse, VehicleBody, VehiclePage, VehicleQuery, VehicleResponse,
};
use crate::presentation::middleware::JwtAuthMiddleware;
use crate::presentation::utils::{AuthenticatedUser, request_id};

/// `/vehicles/public` is registered ahead of the authenticated routes so that
/// `public` is never taken for a vehicle id.
pub fn scope() -> Scope {
    web::scope("/vehicles")
        .service(
            web::scope("/public")
                .service(list_public)
                .service(get_public),
        )
        .service(
            web::scope("")
                .wrap(JwtAuthMiddleware)
                .service(list_owned)
                .service(create_vehicle)
                .service(get_vehicle)
                .service(update_vehicle)
                .service(delete_vehicle),
        )
}

#[get("")]
async fn list_public(
    vehicles: web::Data<VehicleService>,
    query: web::Query<VehicleQuery>,
) -> Result<HttpResponse, DomainError> {
    let page = vehicles.list_public(query.filter()?, query.page()?).await?;
    Ok(HttpResponse::Ok().json(VehiclePage::from(page)))
}

#[get("/{id}")]
async fn get_public(
    vehicles: web::Data<VehicleService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DomainError> {
    let vehicle = vehicles.get_public(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(VehicleResponse {
        message: None,
        vehicle,
    }))
}

#[get("")]
async fn list_owned(
    user: AuthenticatedUser,
    vehicles: web::Data<VehicleService>,
    query: web::Query<VehicleQuery>,
) -> Result<HttpResponse, DomainError> {
    let page = vehicles
        .list_owned(user.id, query.owner_filter()?, query.page()?)
        .await?;
    Ok(HttpResponse::Ok().json(VehiclePage::from(page)))
}

#[post("")]
async fn create_vehicle(
    req: HttpRequest,
    user: AuthenticatedUser,
    vehicles: web::Data<VehicleService>,
    payload: web::Json<VehicleBody>,
) -> Result<HttpResponse, DomainError> {
    let listing = payload.into_inner().into_new_vehicle()?;
    let vehicle = vehicles.create(user.id, listing).await?;

    info!(
        request_id = %request_id(&req),
        user_id = %user.id,
        vehicle_id = %vehicle.id,
        slug = %vehicle.slug,
        "vehicle created"
    );

    Ok(HttpResponse::Created().json(VehicleResponse {
        message: Some("vehicle created successfully"),
        vehicle,
    }))
}

#[get("/{id}")]
async fn get_vehicle(
    user: AuthenticatedUser,
    vehicles: web::Data<VehicleService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DomainError> {
    let vehicle = vehicles.get_for_viewer(path.into_inner(), user.id).await?;
    Ok(HttpResponse::Ok().json(VehicleResponse {
        message: None,
        vehicle,
    }))
}

#[put("/{id}")]
async fn update_vehicle(
    req: HttpRequest,
    user: AuthenticatedUser,
    vehicles: web::Data<VehicleService>,
    path: web::Path<Uuid>,
    payload: web::Json<VehicleBody>,
) -> Result<HttpResponse, DomainError> {
    let vehicle_id = path.into_inner();
    let changes = payload.into_inner().into_changes()?;
    let vehicle = vehicles.update(user.id, vehicle_id, changes).await?;

    info!(
        request_id = %request_id(&req),
        user_id = %user.id,
        vehicle_id = %vehicle_id,
        "vehicle updated"
    );

    Ok(HttpResponse::Ok().json(VehicleResponse {
        message: Some("vehicle updated successfully"),
        vehicle,
    }))
}

#[delete("/{id}")]
async fn delete_vehicle(
    req: HttpRequest,
    user: AuthenticatedUser,
    vehicles: web::Data<VehicleService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DomainError> {
    let vehicle_id = path.into_inner();
    vehicles.delete(user.id, vehicle_id).await?;

    info!(
        request_id = %request_id(&req),
        user_id = %user.id,
        vehicle_id = %vehicle_id,
        "vehicle deleted"
    );

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "vehicle deleted successfully",
    }))
}
