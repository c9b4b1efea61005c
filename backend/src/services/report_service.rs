//! Aggregation and reporting over the relational store.
//!
//! Every dynamic clause is assembled from the typed predicate model below
//! and rendered into a `QueryBuilder`: column names come from a fixed
//! whitelist and request input only ever reaches the query as a bound
//! parameter.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::debug;

use crate::error::AppError;
use crate::models::reports::{
    AverageDelayByCustomer, AverageDelayByVehicle, ContractCountByCustomer,
    ContractCountByVehicle, ContractSettlement, SettlementRow,
};
use crate::models::{Billing, Contract};
use easyloc_shared::{StatusFilter, LATE_GRACE_HOURS};

#[cfg(test)]
mod tests;

/// A column whitelisted for use in dynamic clauses.
pub trait SqlField: Copy {
    fn column(self) -> &'static str;
}

/// Contracts-table columns reachable from request parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractField {
    CustomerId,
    VehicleId,
    LocEnd,
    LocReturning,
}

impl SqlField for ContractField {
    fn column(self) -> &'static str {
        match self {
            ContractField::CustomerId => "customer_id",
            ContractField::VehicleId => "vehicle_id",
            ContractField::LocEnd => "loc_end_datetime",
            ContractField::LocReturning => "loc_returning_datetime",
        }
    }
}

/// Billings-table columns reachable from request parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BillingField {
    ContractId,
}

impl SqlField for BillingField {
    fn column(self) -> &'static str {
        match self {
            BillingField::ContractId => "contract_id",
        }
    }
}

/// A scalar bound into the query.
#[derive(Debug, Clone)]
pub enum SqlValue {
    Text(String),
    Int(i64),
    Timestamp(DateTime<Utc>),
}

/// A typed filter clause: a fixed set of predicate kinds composed with
/// `All`/`Any` groups.
#[derive(Debug, Clone)]
pub enum Clause<F: SqlField> {
    All(Vec<Clause<F>>),
    Any(Vec<Clause<F>>),
    /// `field = value`
    Eq(F, SqlValue),
    /// `field IS NULL`
    Null(F),
    /// `field IS NOT NULL`
    NotNull(F),
    /// `field >= value`
    Ge(F, SqlValue),
    /// `field < value`
    Lt(F, SqlValue),
    /// `field > other + grace_hours`; a null `field` never matches
    FieldPastField { field: F, other: F, grace_hours: i32 },
    /// `value > field + grace_hours`
    ValuePastField {
        value: DateTime<Utc>,
        field: F,
        grace_hours: i32,
    },
}

impl<F: SqlField> Clause<F> {
    /// Render into the builder. An empty group renders as `TRUE` so callers
    /// can always emit a `WHERE`.
    pub fn push(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        match self {
            Clause::All(clauses) => Self::push_group(qb, clauses, " AND "),
            Clause::Any(clauses) => Self::push_group(qb, clauses, " OR "),
            Clause::Eq(field, value) => {
                qb.push(field.column());
                qb.push(" = ");
                push_value(qb, value);
            }
            Clause::Null(field) => {
                qb.push(field.column());
                qb.push(" IS NULL");
            }
            Clause::NotNull(field) => {
                qb.push(field.column());
                qb.push(" IS NOT NULL");
            }
            Clause::Ge(field, value) => {
                qb.push(field.column());
                qb.push(" >= ");
                push_value(qb, value);
            }
            Clause::Lt(field, value) => {
                qb.push(field.column());
                qb.push(" < ");
                push_value(qb, value);
            }
            Clause::FieldPastField {
                field,
                other,
                grace_hours,
            } => {
                qb.push(field.column());
                qb.push(" > ");
                qb.push(other.column());
                qb.push(" + make_interval(hours => ");
                qb.push_bind(*grace_hours);
                qb.push(")");
            }
            Clause::ValuePastField {
                value,
                field,
                grace_hours,
            } => {
                qb.push_bind(*value);
                qb.push(" > ");
                qb.push(field.column());
                qb.push(" + make_interval(hours => ");
                qb.push_bind(*grace_hours);
                qb.push(")");
            }
        }
    }

    fn push_group(qb: &mut QueryBuilder<'_, Postgres>, clauses: &[Clause<F>], joiner: &str) {
        if clauses.is_empty() {
            qb.push("TRUE");
            return;
        }
        qb.push("(");
        for (i, clause) in clauses.iter().enumerate() {
            if i > 0 {
                qb.push(joiner);
            }
            clause.push(qb);
        }
        qb.push(")");
    }
}

fn push_value(qb: &mut QueryBuilder<'_, Postgres>, value: &SqlValue) {
    match value {
        SqlValue::Text(text) => {
            qb.push_bind(text.clone());
        }
        SqlValue::Int(int) => {
            qb.push_bind(*int);
        }
        SqlValue::Timestamp(timestamp) => {
            qb.push_bind(*timestamp);
        }
    }
}

/// Express a logical contract status at the query level.
pub fn status_clause(filter: StatusFilter, now: DateTime<Utc>) -> Clause<ContractField> {
    let grace_hours = LATE_GRACE_HOURS as i32;
    match filter {
        StatusFilter::All => Clause::All(Vec::new()),
        StatusFilter::Ongoing => Clause::Null(ContractField::LocReturning),
        StatusFilter::Completed => Clause::NotNull(ContractField::LocReturning),
        StatusFilter::Late => Clause::Any(vec![
            Clause::All(vec![
                Clause::Null(ContractField::LocReturning),
                Clause::ValuePastField {
                    value: now,
                    field: ContractField::LocEnd,
                    grace_hours,
                },
            ]),
            Clause::All(vec![
                Clause::NotNull(ContractField::LocReturning),
                Clause::FieldPastField {
                    field: ContractField::LocReturning,
                    other: ContractField::LocEnd,
                    grace_hours,
                },
            ]),
        ]),
    }
}

/// Post-aggregation filters for the settlement report. A settled group has
/// a positive price fully covered by its billed total.
#[derive(Debug, Clone)]
pub enum SettlementHaving {
    /// Keep only the given contract's group.
    ContractIs(i32),
    /// Keep settled (`true`) or outstanding (`false`) groups.
    Settled(bool),
}

impl SettlementHaving {
    fn push(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        match self {
            SettlementHaving::ContractIs(id) => {
                qb.push("b.contract_id = ");
                qb.push_bind(*id);
            }
            SettlementHaving::Settled(true) => {
                qb.push("(MAX(c.price) > 0 AND COALESCE(SUM(b.amount), 0) >= MAX(c.price))");
            }
            SettlementHaving::Settled(false) => {
                qb.push("(MAX(c.price) <= 0 OR COALESCE(SUM(b.amount), 0) < MAX(c.price))");
            }
        }
    }
}

/// Builds and executes the grouped and filtered reports over the relational
/// store.
#[derive(Clone)]
pub struct ReportService {
    pool: PgPool,
}

impl ReportService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Filtered contract list: optional foreign-key equality plus a logical
    /// status, newest first. Ids must be pre-validated by the caller.
    pub async fn search_contracts(
        &self,
        customer_id: Option<String>,
        vehicle_id: Option<String>,
        status: StatusFilter,
        now: DateTime<Utc>,
    ) -> Result<Vec<Contract>, AppError> {
        let mut conditions = Vec::new();
        if let Some(id) = customer_id {
            conditions.push(Clause::Eq(ContractField::CustomerId, SqlValue::Text(id)));
        }
        if let Some(id) = vehicle_id {
            conditions.push(Clause::Eq(ContractField::VehicleId, SqlValue::Text(id)));
        }
        conditions.push(status_clause(status, now));
        let clause = Clause::All(conditions);

        let mut qb = QueryBuilder::new("SELECT * FROM contracts WHERE ");
        clause.push(&mut qb);
        qb.push(" ORDER BY created_at DESC");
        debug!("contract search: {}", qb.sql());

        Ok(qb.build_query_as::<Contract>().fetch_all(&self.pool).await?)
    }

    /// Count contracts returned after their deadline (no grace) whose
    /// deadline falls within the inclusive `[begin, end]` date window.
    pub async fn late_contracts_in_window(
        &self,
        begin: NaiveDate,
        end: NaiveDate,
    ) -> Result<i64, AppError> {
        let from = begin.and_time(NaiveTime::MIN).and_utc();
        let until = (end + chrono::Days::new(1)).and_time(NaiveTime::MIN).and_utc();
        let window = Clause::All(vec![
            Clause::FieldPastField {
                field: ContractField::LocReturning,
                other: ContractField::LocEnd,
                grace_hours: 0,
            },
            Clause::Ge(ContractField::LocEnd, SqlValue::Timestamp(from)),
            Clause::Lt(ContractField::LocEnd, SqlValue::Timestamp(until)),
        ]);

        let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM contracts WHERE ");
        window.push(&mut qb);
        debug!("late-window count: {}", qb.sql());

        Ok(qb
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?)
    }

    /// Contract count per customer.
    pub async fn contracts_by_customer(&self) -> Result<Vec<ContractCountByCustomer>, AppError> {
        Ok(sqlx::query_as::<_, ContractCountByCustomer>(
            r#"
            SELECT customer_id, COUNT(*) AS contract_count
            FROM contracts
            GROUP BY customer_id
            ORDER BY contract_count DESC, customer_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?)
    }

    /// Contract count per vehicle.
    pub async fn contracts_by_vehicle(&self) -> Result<Vec<ContractCountByVehicle>, AppError> {
        Ok(sqlx::query_as::<_, ContractCountByVehicle>(
            r#"
            SELECT vehicle_id, COUNT(*) AS contract_count
            FROM contracts
            GROUP BY vehicle_id
            ORDER BY contract_count DESC, vehicle_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?)
    }

    /// Average return delay in minutes per customer. A missing return date
    /// counts as zero delay rather than being excluded.
    pub async fn average_delay_by_customer(
        &self,
    ) -> Result<Vec<AverageDelayByCustomer>, AppError> {
        Ok(sqlx::query_as::<_, AverageDelayByCustomer>(
            r#"
            SELECT customer_id,
                   COUNT(*) AS contract_count,
                   ROUND(AVG(
                       CASE WHEN loc_returning_datetime IS NULL THEN 0
                            ELSE EXTRACT(EPOCH FROM (loc_returning_datetime - loc_end_datetime))::numeric / 60
                       END), 2) AS average_delay_minutes
            FROM contracts
            GROUP BY customer_id
            ORDER BY customer_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?)
    }

    /// Average return delay in minutes per vehicle, same policy as
    /// [`Self::average_delay_by_customer`].
    pub async fn average_delay_by_vehicle(&self) -> Result<Vec<AverageDelayByVehicle>, AppError> {
        Ok(sqlx::query_as::<_, AverageDelayByVehicle>(
            r#"
            SELECT vehicle_id,
                   COUNT(*) AS contract_count,
                   ROUND(AVG(
                       CASE WHEN loc_returning_datetime IS NULL THEN 0
                            ELSE EXTRACT(EPOCH FROM (loc_returning_datetime - loc_end_datetime))::numeric / 60
                       END), 2) AS average_delay_minutes
            FROM contracts
            GROUP BY vehicle_id
            ORDER BY vehicle_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?)
    }

    /// Billings grouped by contract with settlement classification:
    /// `ratio = sum(amount) / max(price)` rounded to two decimals, null when
    /// the price is zero.
    pub async fn settlements(
        &self,
        having: Vec<SettlementHaving>,
    ) -> Result<Vec<ContractSettlement>, AppError> {
        let mut qb = QueryBuilder::new(
            r#"SELECT b.contract_id,
       MAX(c.price) AS price,
       COALESCE(SUM(b.amount), 0) AS total_billed,
       ROUND(COALESCE(SUM(b.amount), 0) / NULLIF(MAX(c.price), 0), 2) AS ratio
FROM billings b
JOIN contracts c ON c.id = b.contract_id
GROUP BY b.contract_id"#,
        );
        if !having.is_empty() {
            qb.push(" HAVING ");
            for (i, condition) in having.iter().enumerate() {
                if i > 0 {
                    qb.push(" AND ");
                }
                condition.push(&mut qb);
            }
        }
        qb.push(" ORDER BY b.contract_id");
        debug!("settlement report: {}", qb.sql());

        let rows = qb
            .build_query_as::<SettlementRow>()
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(ContractSettlement::from).collect())
    }

    /// Billing list, optionally filtered on its contract, newest first.
    pub async fn search_billings(&self, contract_id: Option<i32>) -> Result<Vec<Billing>, AppError> {
        let clause = match contract_id {
            Some(id) => Clause::Eq(BillingField::ContractId, SqlValue::Int(i64::from(id))),
            None => Clause::All(Vec::new()),
        };

        let mut qb = QueryBuilder::new("SELECT * FROM billings WHERE ");
        clause.push(&mut qb);
        qb.push(" ORDER BY created_at DESC");

        Ok(qb.build_query_as::<Billing>().fetch_all(&self.pool).await?)
    }
}
