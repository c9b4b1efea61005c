use actix_web::{web, HttpResponse};
use serde::Deserialize;
use validator::Validate;

use crate::error::AppError;
use crate::services::report_service::SettlementHaving;
use crate::services::{BillingService, ReportService};
use crate::utils::validation;
use easyloc_shared::{ApiResponse, BillingResponse, CreateBillingRequest, UpdateBillingRequest};

pub async fn list_billings(service: web::Data<BillingService>) -> Result<HttpResponse, AppError> {
    let billings = service.list().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(billings)))
}

pub async fn get_billing(
    path: web::Path<String>,
    service: web::Data<BillingService>,
) -> Result<HttpResponse, AppError> {
    let billing = service.get(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(billing)))
}

pub async fn create_billing(
    request: web::Json<CreateBillingRequest>,
    service: web::Data<BillingService>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;

    let billing = service.create(request).await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok_with_message(
        "Billing successfully created",
        billing,
    )))
}

pub async fn update_billing(
    path: web::Path<String>,
    request: web::Json<UpdateBillingRequest>,
    service: web::Data<BillingService>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let request = request.into_inner();
    request.validate()?;

    let billing = service.update(&id, request).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(
        format!("Billing with id:{} successfully updated.", id),
        billing,
    )))
}

pub async fn delete_billing(
    path: web::Path<String>,
    service: web::Data<BillingService>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let billing = service.delete(&id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(
        format!("Billing with id:{} successfully deleted.", id),
        billing,
    )))
}

// Search and report endpoints

#[derive(Debug, Deserialize)]
pub struct BillingSearchQuery {
    pub contract_id: Option<String>,
}

/// Billing list filtered on its contract, newest first.
pub async fn search_billings(
    query: web::Query<BillingSearchQuery>,
    reports: web::Data<ReportService>,
) -> Result<HttpResponse, AppError> {
    let contract_id = query
        .into_inner()
        .contract_id
        .as_deref()
        .map(validation::parse_integer_id)
        .transpose()?;

    let billings = reports.search_billings(contract_id).await?;
    let billings: Vec<BillingResponse> = billings.iter().map(|b| b.to_response()).collect();
    Ok(HttpResponse::Ok().json(ApiResponse::ok(billings)))
}

#[derive(Debug, Deserialize)]
pub struct SettlementQuery {
    pub contract_id: Option<String>,
    pub settled: Option<String>,
}

/// Billings grouped by contract with payment-ratio settlement state,
/// optionally narrowed to one contract and/or one settlement state.
pub async fn settlements_by_contract(
    query: web::Query<SettlementQuery>,
    reports: web::Data<ReportService>,
) -> Result<HttpResponse, AppError> {
    let query = query.into_inner();
    let mut having = Vec::new();
    if let Some(raw) = query.contract_id.as_deref() {
        having.push(SettlementHaving::ContractIs(validation::parse_integer_id(
            raw,
        )?));
    }
    if let Some(raw) = query.settled.as_deref() {
        having.push(SettlementHaving::Settled(validation::parse_bool(raw)?));
    }

    let settlements = reports.settlements(having).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(settlements)))
}
