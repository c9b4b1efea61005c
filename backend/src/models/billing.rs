use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};

use crate::error::AppError;
use easyloc_shared::{BillingResponse, UpdateBillingRequest};

/// A billing row: an amount billed against a contract. Leaf record with no
/// dependents of its own.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Billing {
    pub id: i32,
    pub contract_id: i32,
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Billing {
    /// All billings, newest first.
    pub async fn find_all(pool: &PgPool) -> Result<Vec<Self>, AppError> {
        Ok(
            sqlx::query_as::<_, Billing>("SELECT * FROM billings ORDER BY created_at DESC")
                .fetch_all(pool)
                .await?,
        )
    }

    /// Point read by primary key.
    pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<Self>, AppError> {
        Ok(
            sqlx::query_as::<_, Billing>("SELECT * FROM billings WHERE id = $1")
                .bind(id)
                .fetch_optional(pool)
                .await?,
        )
    }

    /// Insert a new billing row.
    pub async fn create(pool: &PgPool, contract_id: i32, amount: Decimal) -> Result<Self, AppError> {
        Ok(sqlx::query_as::<_, Billing>(
            "INSERT INTO billings (contract_id, amount) VALUES ($1, $2) RETURNING *",
        )
        .bind(contract_id)
        .bind(amount)
        .fetch_one(pool)
        .await?)
    }

    /// Apply the present fields of a partial update and return the new row.
    pub async fn update(
        pool: &PgPool,
        id: i32,
        changes: &UpdateBillingRequest,
    ) -> Result<Option<Self>, AppError> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE billings SET updated_at = ");
        qb.push_bind(Utc::now());
        if let Some(contract_id) = changes.contract_id {
            qb.push(", contract_id = ");
            qb.push_bind(contract_id);
        }
        if let Some(amount) = changes.amount {
            qb.push(", amount = ");
            qb.push_bind(amount);
        }
        qb.push(" WHERE id = ");
        qb.push_bind(id);
        qb.push(" RETURNING *");

        Ok(qb.build_query_as::<Billing>().fetch_optional(pool).await?)
    }

    /// Delete by primary key and return the removed row.
    pub async fn delete(pool: &PgPool, id: i32) -> Result<Option<Self>, AppError> {
        Ok(
            sqlx::query_as::<_, Billing>("DELETE FROM billings WHERE id = $1 RETURNING *")
                .bind(id)
                .fetch_optional(pool)
                .await?,
        )
    }

    /// Convert to response DTO
    pub fn to_response(&self) -> BillingResponse {
        BillingResponse {
            id: self.id,
            contract_id: self.contract_id,
            amount: self.amount,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
