use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};

use crate::error::AppError;
use easyloc_shared::{
    ContractResponse, ContractState, ContractStatus, UpdateContractRequest, LATE_GRACE_HOURS,
};

/// A rental contract row. `vehicle_id` and `customer_id` are hex-encoded
/// document ids living in the other store; the status and return delay are
/// derived at serialization time and never stored.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Contract {
    pub id: i32,
    pub vehicle_id: String,
    pub customer_id: String,
    pub sign_datetime: DateTime<Utc>,
    pub loc_begin_datetime: DateTime<Utc>,
    pub loc_end_datetime: DateTime<Utc>,
    pub loc_returning_datetime: Option<DateTime<Utc>>,
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Derive the contract status from its timestamps.
///
/// A missing return date means the vehicle is still out. Either way the
/// contract is late once the effective return instant (actual return, or
/// `now` while still out) passes the deadline plus the grace period.
pub fn compute_status(
    loc_end: DateTime<Utc>,
    loc_returning: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> ContractStatus {
    let deadline = loc_end + Duration::hours(LATE_GRACE_HOURS);
    match loc_returning {
        None => ContractStatus {
            state: ContractState::Ongoing,
            late: now > deadline,
        },
        Some(returned) => ContractStatus {
            state: ContractState::Completed,
            late: returned > deadline,
        },
    }
}

/// Signed hours between the deadline and the effective return instant,
/// rounded to two decimals. Negative when the vehicle came back early.
pub fn compute_delay_hours(loc_end: DateTime<Utc>, returned_or_now: DateTime<Utc>) -> f64 {
    let seconds = (returned_or_now - loc_end).num_seconds() as f64;
    (seconds / 3600.0 * 100.0).round() / 100.0
}

impl Contract {
    /// All contracts, newest first.
    pub async fn find_all(pool: &PgPool) -> Result<Vec<Self>, AppError> {
        Ok(
            sqlx::query_as::<_, Contract>("SELECT * FROM contracts ORDER BY created_at DESC")
                .fetch_all(pool)
                .await?,
        )
    }

    /// Point read by primary key.
    pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<Self>, AppError> {
        Ok(
            sqlx::query_as::<_, Contract>("SELECT * FROM contracts WHERE id = $1")
                .bind(id)
                .fetch_optional(pool)
                .await?,
        )
    }

    /// Insert a new contract row.
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        pool: &PgPool,
        vehicle_id: &str,
        customer_id: &str,
        sign_datetime: DateTime<Utc>,
        loc_begin_datetime: DateTime<Utc>,
        loc_end_datetime: DateTime<Utc>,
        loc_returning_datetime: Option<DateTime<Utc>>,
        price: Decimal,
    ) -> Result<Self, AppError> {
        Ok(sqlx::query_as::<_, Contract>(
            r#"
            INSERT INTO contracts
                (vehicle_id, customer_id, sign_datetime, loc_begin_datetime,
                 loc_end_datetime, loc_returning_datetime, price)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(vehicle_id)
        .bind(customer_id)
        .bind(sign_datetime)
        .bind(loc_begin_datetime)
        .bind(loc_end_datetime)
        .bind(loc_returning_datetime)
        .bind(price)
        .fetch_one(pool)
        .await?)
    }

    /// Apply the present fields of a partial update and return the new row.
    pub async fn update(
        pool: &PgPool,
        id: i32,
        changes: &UpdateContractRequest,
    ) -> Result<Option<Self>, AppError> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE contracts SET updated_at = ");
        qb.push_bind(Utc::now());
        if let Some(vehicle_id) = &changes.vehicle_id {
            qb.push(", vehicle_id = ");
            qb.push_bind(vehicle_id.as_str());
        }
        if let Some(customer_id) = &changes.customer_id {
            qb.push(", customer_id = ");
            qb.push_bind(customer_id.as_str());
        }
        if let Some(sign_datetime) = changes.sign_datetime {
            qb.push(", sign_datetime = ");
            qb.push_bind(sign_datetime);
        }
        if let Some(loc_begin_datetime) = changes.loc_begin_datetime {
            qb.push(", loc_begin_datetime = ");
            qb.push_bind(loc_begin_datetime);
        }
        if let Some(loc_end_datetime) = changes.loc_end_datetime {
            qb.push(", loc_end_datetime = ");
            qb.push_bind(loc_end_datetime);
        }
        if let Some(loc_returning_datetime) = changes.loc_returning_datetime {
            qb.push(", loc_returning_datetime = ");
            qb.push_bind(loc_returning_datetime);
        }
        if let Some(price) = changes.price {
            qb.push(", price = ");
            qb.push_bind(price);
        }
        qb.push(" WHERE id = ");
        qb.push_bind(id);
        qb.push(" RETURNING *");

        Ok(qb
            .build_query_as::<Contract>()
            .fetch_optional(pool)
            .await?)
    }

    /// Delete by primary key and return the removed row.
    pub async fn delete(pool: &PgPool, id: i32) -> Result<Option<Self>, AppError> {
        Ok(
            sqlx::query_as::<_, Contract>("DELETE FROM contracts WHERE id = $1 RETURNING *")
                .bind(id)
                .fetch_optional(pool)
                .await?,
        )
    }

    /// Convert to response DTO with derived fields evaluated against `now`.
    pub fn to_response(&self, now: DateTime<Utc>) -> ContractResponse {
        let status = compute_status(self.loc_end_datetime, self.loc_returning_datetime, now);
        let effective_return = self.loc_returning_datetime.unwrap_or(now);
        ContractResponse {
            id: self.id,
            vehicle_id: self.vehicle_id.clone(),
            customer_id: self.customer_id.clone(),
            sign_datetime: self.sign_datetime,
            loc_begin_datetime: self.loc_begin_datetime,
            loc_end_datetime: self.loc_end_datetime,
            loc_returning_datetime: self.loc_returning_datetime,
            price: self.price,
            status: status.tags().iter().map(|tag| tag.to_string()).collect(),
            car_return_delay_hours: compute_delay_hours(self.loc_end_datetime, effective_return),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 3, hour, minute, 0).unwrap()
    }

    #[test]
    fn ongoing_within_grace_is_on_time() {
        // deadline 00:00, grace until 01:00 inclusive
        let status = compute_status(at(0, 0), None, at(1, 0));
        assert_eq!(status.state, ContractState::Ongoing);
        assert!(!status.late);
    }

    #[test]
    fn ongoing_past_grace_is_late() {
        let status = compute_status(at(0, 0), None, at(1, 1));
        assert_eq!(status.state, ContractState::Ongoing);
        assert!(status.late);
        assert_eq!(status.tags(), vec!["ongoing", "late"]);
    }

    #[test]
    fn completed_within_grace_is_on_time() {
        let status = compute_status(at(0, 0), Some(at(0, 45)), at(12, 0));
        assert_eq!(status.state, ContractState::Completed);
        assert!(!status.late);
        assert_eq!(status.tags(), vec!["completed"]);
    }

    #[test]
    fn completed_past_grace_is_late_regardless_of_now() {
        // `now` is before the return: only the return instant matters
        let status = compute_status(at(0, 0), Some(at(3, 0)), at(0, 30));
        assert_eq!(status.state, ContractState::Completed);
        assert!(status.late);
    }

    #[test]
    fn delay_is_signed_and_rounded_to_two_decimals() {
        assert_eq!(compute_delay_hours(at(0, 0), at(1, 30)), 1.5);
        assert_eq!(compute_delay_hours(at(0, 0), at(0, 20)), 0.33);
        assert_eq!(compute_delay_hours(at(2, 0), at(0, 0)), -2.0);
        assert_eq!(compute_delay_hours(at(0, 0), at(0, 0)), 0.0);
    }
}
