use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde::Deserialize;
use validator::Validate;

use crate::error::AppError;
use crate::models::reports::LateContractWindow;
use crate::services::{ContractService, ReportService};
use crate::utils::validation;
use easyloc_shared::{
    ApiResponse, ContractResponse, CreateContractRequest, StatusFilter, UpdateContractRequest,
};

pub async fn list_contracts(
    service: web::Data<ContractService>,
) -> Result<HttpResponse, AppError> {
    let contracts = service.list().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(contracts)))
}

pub async fn get_contract(
    path: web::Path<String>,
    service: web::Data<ContractService>,
) -> Result<HttpResponse, AppError> {
    let contract = service.get(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(contract)))
}

pub async fn create_contract(
    request: web::Json<CreateContractRequest>,
    service: web::Data<ContractService>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;

    let contract = service.create(request).await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok_with_message(
        "Contract successfully created",
        contract,
    )))
}

pub async fn update_contract(
    path: web::Path<String>,
    request: web::Json<UpdateContractRequest>,
    service: web::Data<ContractService>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let request = request.into_inner();
    request.validate()?;

    let contract = service.update(&id, request).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(
        format!("Contract with id:{} successfully updated.", id),
        contract,
    )))
}

pub async fn delete_contract(
    path: web::Path<String>,
    service: web::Data<ContractService>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let contract = service.delete(&id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(
        format!("Contract with id:{} successfully deleted.", id),
        contract,
    )))
}

// Search and report endpoints

#[derive(Debug, Deserialize)]
pub struct ContractSearchQuery {
    pub customer_id: Option<String>,
    pub vehicle_id: Option<String>,
    pub status: Option<String>,
}

/// Filtered contract list. Foreign-key filters are shape-checked before
/// they reach the query; an unknown status value is a bad request.
pub async fn search_contracts(
    query: web::Query<ContractSearchQuery>,
    reports: web::Data<ReportService>,
) -> Result<HttpResponse, AppError> {
    let query = query.into_inner();
    let customer_id = query
        .customer_id
        .map(|raw| validation::parse_object_id(&raw).map(|id| id.to_hex()))
        .transpose()?;
    let vehicle_id = query
        .vehicle_id
        .map(|raw| validation::parse_object_id(&raw).map(|id| id.to_hex()))
        .transpose()?;
    let status = match query.status.as_deref() {
        Some(raw) => raw.parse::<StatusFilter>().map_err(AppError::Validation)?,
        None => StatusFilter::All,
    };

    let now = Utc::now();
    let contracts = reports
        .search_contracts(customer_id, vehicle_id, status, now)
        .await?;
    let contracts: Vec<ContractResponse> = contracts
        .iter()
        .map(|contract| contract.to_response(now))
        .collect();
    Ok(HttpResponse::Ok().json(ApiResponse::ok(contracts)))
}

#[derive(Debug, Deserialize)]
pub struct DelayWindowQuery {
    pub begin: Option<String>,
    pub end: Option<String>,
}

/// Count late returns whose deadline falls inside `[begin, end]`.
pub async fn count_late_in_window(
    query: web::Query<DelayWindowQuery>,
    reports: web::Data<ReportService>,
) -> Result<HttpResponse, AppError> {
    let query = query.into_inner();
    let begin = query
        .begin
        .as_deref()
        .ok_or_else(|| AppError::Validation("Query parameter 'begin' is required.".to_string()))?;
    let begin = validation::parse_date(begin)?;
    let end = query
        .end
        .as_deref()
        .ok_or_else(|| AppError::Validation("Query parameter 'end' is required.".to_string()))?;
    let end = validation::parse_date(end)?;
    if end < begin {
        return Err(AppError::Validation(
            "'end' must not precede 'begin'.".to_string(),
        ));
    }

    let late_contract_count = reports.late_contracts_in_window(begin, end).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(LateContractWindow {
        begin,
        end,
        late_contract_count,
    })))
}

pub async fn count_by_customer(
    reports: web::Data<ReportService>,
) -> Result<HttpResponse, AppError> {
    let counts = reports.contracts_by_customer().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(counts)))
}

pub async fn count_by_vehicle(
    reports: web::Data<ReportService>,
) -> Result<HttpResponse, AppError> {
    let counts = reports.contracts_by_vehicle().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(counts)))
}

pub async fn average_delay_by_customer(
    reports: web::Data<ReportService>,
) -> Result<HttpResponse, AppError> {
    let delays = reports.average_delay_by_customer().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(delays)))
}

pub async fn average_delay_by_vehicle(
    reports: web::Data<ReportService>,
) -> Result<HttpResponse, AppError> {
    let delays = reports.average_delay_by_vehicle().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(delays)))
}
