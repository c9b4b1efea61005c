//! Cross-store reference checks.
//!
//! The two stores share no transaction: a check and the write it guards are
//! separate operations, so the referenced record can disappear between them.
//! Checks therefore run synchronously, immediately before the write, and
//! never cache: every check is a fresh point read.

use bson::oid::ObjectId;
use mongodb::Database;
use sqlx::PgPool;

use crate::error::AppError;
use crate::models::{Customer, Vehicle};
use crate::utils::validation;

#[derive(Clone)]
pub struct ReferenceChecker {
    documents: Database,
    pool: PgPool,
}

impl ReferenceChecker {
    pub fn new(documents: Database, pool: PgPool) -> Self {
        Self { documents, pool }
    }

    /// Resolve a customer reference: shape-check the id (no query for a
    /// malformed id), then confirm the document exists.
    pub async fn customer_ref(&self, raw_id: &str) -> Result<ObjectId, AppError> {
        let id = validation::parse_object_id(raw_id)?;
        match Customer::find_by_id(&self.documents, id).await? {
            Some(_) => Ok(id),
            None => Err(AppError::NotFound(format!(
                "Customer with id:{} not found.",
                raw_id
            ))),
        }
    }

    /// Resolve a vehicle reference, same contract as [`Self::customer_ref`].
    pub async fn vehicle_ref(&self, raw_id: &str) -> Result<ObjectId, AppError> {
        let id = validation::parse_object_id(raw_id)?;
        match Vehicle::find_by_id(&self.documents, id).await? {
            Some(_) => Ok(id),
            None => Err(AppError::NotFound(format!(
                "Vehicle with id:{} not found.",
                raw_id
            ))),
        }
    }

    /// Confirm a contract row exists before a billing points at it.
    pub async fn contract_ref(&self, id: i32) -> Result<(), AppError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM contracts WHERE id = $1)",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        if exists {
            Ok(())
        } else {
            Err(AppError::NotFound(format!(
                "Contract with id:{} not found.",
                id
            )))
        }
    }

    /// Reverse guard: is any contract still referencing this customer?
    pub async fn customer_is_referenced(&self, id: &ObjectId) -> Result<bool, AppError> {
        Ok(sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM contracts WHERE customer_id = $1)",
        )
        .bind(id.to_hex())
        .fetch_one(&self.pool)
        .await?)
    }

    /// Reverse guard: is any contract still referencing this vehicle?
    pub async fn vehicle_is_referenced(&self, id: &ObjectId) -> Result<bool, AppError> {
        Ok(sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM contracts WHERE vehicle_id = $1)",
        )
        .bind(id.to_hex())
        .fetch_one(&self.pool)
        .await?)
    }

    /// Reverse guard: does any billing still reference this contract?
    pub async fn contract_has_billings(&self, id: i32) -> Result<bool, AppError> {
        Ok(sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM billings WHERE contract_id = $1)",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?)
    }
}
