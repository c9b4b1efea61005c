use actix_web::{web, HttpResponse};
use std::collections::HashMap;
use validator::Validate;

use crate::error::AppError;
use crate::services::CustomerService;
use easyloc_shared::{
    ApiResponse, CreateCustomerRequest, CustomerResponse, UpdateCustomerRequest,
};

/// List customers, optionally filtered and sorted by query parameters.
pub async fn list_customers(
    query: web::Query<HashMap<String, String>>,
    service: web::Data<CustomerService>,
) -> Result<HttpResponse, AppError> {
    let customers = service.list(&query).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(customers)))
}

/// Case-insensitive lookup by last and first name. A miss is reported in
/// the envelope status, not as an error.
pub async fn get_customer_by_name(
    path: web::Path<(String, String)>,
    service: web::Data<CustomerService>,
) -> Result<HttpResponse, AppError> {
    let (last_name, first_name) = path.into_inner();
    match service.get_by_name(&last_name, &first_name).await? {
        Some(customer) => Ok(HttpResponse::Ok().json(ApiResponse::ok(customer))),
        None => Ok(
            HttpResponse::Ok().json(ApiResponse::<CustomerResponse>::status_only(format!(
                "Customer {} {} not found.",
                last_name, first_name
            ))),
        ),
    }
}

pub async fn create_customer(
    request: web::Json<CreateCustomerRequest>,
    service: web::Data<CustomerService>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;

    let customer = service.create(request).await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok_with_message(
        "Customer successfully created",
        customer,
    )))
}

pub async fn update_customer(
    path: web::Path<String>,
    request: web::Json<UpdateCustomerRequest>,
    service: web::Data<CustomerService>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let request = request.into_inner();
    request.validate()?;

    let customer = service.update(&id, request).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(
        format!("Customer with id:{} successfully updated.", id),
        customer,
    )))
}

pub async fn delete_customer(
    path: web::Path<String>,
    service: web::Data<CustomerService>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let customer = service.delete(&id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(
        format!("Customer with id:{} successfully deleted.", id),
        customer,
    )))
}
