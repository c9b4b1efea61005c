use sqlx::PgPool;
use tracing::info;

use crate::error::AppError;
use crate::models::Billing;
use crate::services::ReferenceChecker;
use crate::utils::validation;
use easyloc_shared::{BillingResponse, CreateBillingRequest, UpdateBillingRequest};

/// Billing records reference contracts within the same relational store.
/// Billings are leaf records: they delete freely and nothing guards against
/// their absence.
#[derive(Clone)]
pub struct BillingService {
    pool: PgPool,
    references: ReferenceChecker,
}

impl BillingService {
    pub fn new(pool: PgPool, references: ReferenceChecker) -> Self {
        Self { pool, references }
    }

    pub async fn list(&self) -> Result<Vec<BillingResponse>, AppError> {
        let billings = Billing::find_all(&self.pool).await?;
        Ok(billings.iter().map(Billing::to_response).collect())
    }

    pub async fn get(&self, raw_id: &str) -> Result<BillingResponse, AppError> {
        let id = validation::parse_integer_id(raw_id)?;
        let billing = Billing::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Billing with id:{} not found.", id)))?;
        Ok(billing.to_response())
    }

    pub async fn create(&self, request: CreateBillingRequest) -> Result<BillingResponse, AppError> {
        self.references.contract_ref(request.contract_id).await?;

        let billing = Billing::create(&self.pool, request.contract_id, request.amount).await?;

        info!(
            "Created billing {} for contract {}",
            billing.id, billing.contract_id
        );
        Ok(billing.to_response())
    }

    pub async fn update(
        &self,
        raw_id: &str,
        changes: UpdateBillingRequest,
    ) -> Result<BillingResponse, AppError> {
        let id = validation::parse_integer_id(raw_id)?;

        if let Some(contract_id) = changes.contract_id {
            self.references.contract_ref(contract_id).await?;
        }

        let updated = Billing::update(&self.pool, id, &changes)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Billing with id:{} not found.", id)))?;

        info!("Updated billing {}", id);
        Ok(updated.to_response())
    }

    pub async fn delete(&self, raw_id: &str) -> Result<BillingResponse, AppError> {
        let id = validation::parse_integer_id(raw_id)?;

        let deleted = Billing::delete(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Billing with id:{} not found.", id)))?;

        info!("Deleted billing {}", id);
        Ok(deleted.to_response())
    }
}
