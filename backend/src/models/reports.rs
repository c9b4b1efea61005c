//! Row types produced by the reporting engine.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

use easyloc_shared::SettlementState;

/// Contract count per customer.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ContractCountByCustomer {
    pub customer_id: String,
    pub contract_count: i64,
}

/// Contract count per vehicle.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ContractCountByVehicle {
    pub vehicle_id: String,
    pub contract_count: i64,
}

/// Average return delay in minutes per customer. Contracts without a return
/// date contribute zero minutes and stay in the count.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AverageDelayByCustomer {
    pub customer_id: String,
    pub contract_count: i64,
    pub average_delay_minutes: Decimal,
}

/// Average return delay in minutes per vehicle.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AverageDelayByVehicle {
    pub vehicle_id: String,
    pub contract_count: i64,
    pub average_delay_minutes: Decimal,
}

/// Raw settlement aggregate as returned by the relational store. `ratio` is
/// null when the contract price is zero.
#[derive(Debug, Clone, FromRow)]
pub struct SettlementRow {
    pub contract_id: i32,
    pub price: Decimal,
    pub total_billed: Decimal,
    pub ratio: Option<Decimal>,
}

/// Settlement report entry: a contract's billed total against its price.
#[derive(Debug, Clone, Serialize)]
pub struct ContractSettlement {
    pub contract_id: i32,
    pub price: Decimal,
    pub total_billed: Decimal,
    pub ratio: Option<Decimal>,
    pub settlement: SettlementState,
}

impl From<SettlementRow> for ContractSettlement {
    fn from(row: SettlementRow) -> Self {
        let settlement = match row.ratio {
            Some(ratio) if ratio >= Decimal::ONE => SettlementState::Settled,
            _ => SettlementState::Outstanding,
        };
        Self {
            contract_id: row.contract_id,
            price: row.price,
            total_billed: row.total_billed,
            ratio: row.ratio,
            settlement,
        }
    }
}

/// Count of contracts returned after their deadline, for deadlines inside
/// an inclusive date window.
#[derive(Debug, Clone, Serialize)]
pub struct LateContractWindow {
    pub begin: NaiveDate,
    pub end: NaiveDate,
    pub late_contract_count: i64,
}
