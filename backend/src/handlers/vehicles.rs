use actix_web::{web, HttpResponse};
use std::collections::HashMap;
use validator::Validate;

use crate::error::AppError;
use crate::services::VehicleService;
use easyloc_shared::{ApiResponse, CreateVehicleRequest, UpdateVehicleRequest, VehicleResponse};

/// List vehicles, optionally filtered and sorted by query parameters.
pub async fn list_vehicles(
    query: web::Query<HashMap<String, String>>,
    service: web::Data<VehicleService>,
) -> Result<HttpResponse, AppError> {
    let vehicles = service.list(&query).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(vehicles)))
}

/// Case-insensitive lookup by licence plate. A miss is reported in the
/// envelope status, not as an error.
pub async fn get_vehicle_by_plate(
    path: web::Path<String>,
    service: web::Data<VehicleService>,
) -> Result<HttpResponse, AppError> {
    let licence_plate = path.into_inner();
    match service.get_by_plate(&licence_plate).await? {
        Some(vehicle) => Ok(HttpResponse::Ok().json(ApiResponse::ok(vehicle))),
        None => Ok(
            HttpResponse::Ok().json(ApiResponse::<VehicleResponse>::status_only(format!(
                "Vehicle {} not found.",
                licence_plate
            ))),
        ),
    }
}

pub async fn create_vehicle(
    request: web::Json<CreateVehicleRequest>,
    service: web::Data<VehicleService>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;

    let vehicle = service.create(request).await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok_with_message(
        "Vehicle successfully created",
        vehicle,
    )))
}

pub async fn update_vehicle(
    path: web::Path<String>,
    request: web::Json<UpdateVehicleRequest>,
    service: web::Data<VehicleService>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let request = request.into_inner();
    request.validate()?;

    let vehicle = service.update(&id, request).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(
        format!("Vehicle with id:{} successfully updated.", id),
        vehicle,
    )))
}

pub async fn delete_vehicle(
    path: web::Path<String>,
    service: web::Data<VehicleService>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let vehicle = service.delete(&id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(
        format!("Vehicle with id:{} successfully deleted.", id),
        vehicle,
    )))
}
