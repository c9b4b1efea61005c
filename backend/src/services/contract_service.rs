use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::info;

use crate::error::AppError;
use crate::models::Contract;
use crate::services::ReferenceChecker;
use crate::utils::validation;
use easyloc_shared::{ContractResponse, CreateContractRequest, UpdateContractRequest};

/// Contract records live in the relational store but reference customer and
/// vehicle documents in the other store; every mutation touching a foreign
/// key re-checks the referenced document first.
#[derive(Clone)]
pub struct ContractService {
    pool: PgPool,
    references: ReferenceChecker,
}

impl ContractService {
    pub fn new(pool: PgPool, references: ReferenceChecker) -> Self {
        Self { pool, references }
    }

    pub async fn list(&self) -> Result<Vec<ContractResponse>, AppError> {
        let now = Utc::now();
        let contracts = Contract::find_all(&self.pool).await?;
        Ok(contracts
            .iter()
            .map(|contract| contract.to_response(now))
            .collect())
    }

    pub async fn get(&self, raw_id: &str) -> Result<ContractResponse, AppError> {
        let id = validation::parse_integer_id(raw_id)?;
        let contract = Contract::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Contract with id:{} not found.", id)))?;
        Ok(contract.to_response(Utc::now()))
    }

    pub async fn create(
        &self,
        request: CreateContractRequest,
    ) -> Result<ContractResponse, AppError> {
        if request.price <= Decimal::ZERO {
            return Err(AppError::Validation(
                "Contract price must be positive.".to_string(),
            ));
        }
        self.references.vehicle_ref(&request.vehicle_id).await?;
        self.references.customer_ref(&request.customer_id).await?;

        let sign_datetime = request.sign_datetime.unwrap_or_else(Utc::now);
        let contract = Contract::create(
            &self.pool,
            &request.vehicle_id,
            &request.customer_id,
            sign_datetime,
            request.loc_begin_datetime,
            request.loc_end_datetime,
            request.loc_returning_datetime,
            request.price,
        )
        .await?;

        info!("Created contract {}", contract.id);
        Ok(contract.to_response(Utc::now()))
    }

    pub async fn update(
        &self,
        raw_id: &str,
        changes: UpdateContractRequest,
    ) -> Result<ContractResponse, AppError> {
        let id = validation::parse_integer_id(raw_id)?;

        if let Some(vehicle_id) = &changes.vehicle_id {
            self.references.vehicle_ref(vehicle_id).await?;
        }
        if let Some(customer_id) = &changes.customer_id {
            self.references.customer_ref(customer_id).await?;
        }
        if let Some(price) = changes.price {
            if price <= Decimal::ZERO {
                return Err(AppError::Validation(
                    "Contract price must be positive.".to_string(),
                ));
            }
        }

        let updated = Contract::update(&self.pool, id, &changes)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Contract with id:{} not found.", id)))?;

        info!("Updated contract {}", id);
        Ok(updated.to_response(Utc::now()))
    }

    pub async fn delete(&self, raw_id: &str) -> Result<ContractResponse, AppError> {
        let id = validation::parse_integer_id(raw_id)?;

        if self.references.contract_has_billings(id).await? {
            return Err(AppError::Conflict(format!(
                "Contract with id:{} cannot be deleted due to related records in 'billings' table.",
                id
            )));
        }

        let deleted = Contract::delete(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Contract with id:{} not found.", id)))?;

        info!("Deleted contract {}", id);
        Ok(deleted.to_response(Utc::now()))
    }
}
