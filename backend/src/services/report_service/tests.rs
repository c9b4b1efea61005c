use super::*;
use crate::models::reports::SettlementRow;
use chrono::TimeZone;
use easyloc_shared::SettlementState;
use rust_decimal::Decimal;

fn render<F: SqlField>(clause: &Clause<F>) -> String {
    let mut qb: QueryBuilder<'_, Postgres> = QueryBuilder::new("");
    clause.push(&mut qb);
    qb.sql().to_string()
}

fn noon() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

#[test]
fn empty_group_renders_true() {
    let clause: Clause<ContractField> = Clause::All(Vec::new());
    assert_eq!(render(&clause), "TRUE");
}

#[test]
fn equality_binds_the_value() {
    let clause = Clause::Eq(
        ContractField::CustomerId,
        SqlValue::Text("0123456789abcdef01234567".to_string()),
    );
    assert_eq!(render(&clause), "customer_id = $1");
}

#[test]
fn status_clauses_render_expected_predicates() {
    assert_eq!(
        render(&status_clause(StatusFilter::Ongoing, noon())),
        "loc_returning_datetime IS NULL"
    );
    assert_eq!(
        render(&status_clause(StatusFilter::Completed, noon())),
        "loc_returning_datetime IS NOT NULL"
    );
    assert_eq!(render(&status_clause(StatusFilter::All, noon())), "TRUE");
}

#[test]
fn late_status_covers_both_branches() {
    let sql = render(&status_clause(StatusFilter::Late, noon()));
    assert_eq!(
        sql,
        "((loc_returning_datetime IS NULL AND $1 > loc_end_datetime + make_interval(hours => $2)) \
         OR (loc_returning_datetime IS NOT NULL AND loc_returning_datetime > loc_end_datetime + make_interval(hours => $3)))"
    );
}

#[test]
fn window_clause_uses_half_open_timestamp_bounds() {
    let from = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let until = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
    let window = Clause::All(vec![
        Clause::FieldPastField {
            field: ContractField::LocReturning,
            other: ContractField::LocEnd,
            grace_hours: 0,
        },
        Clause::Ge(ContractField::LocEnd, SqlValue::Timestamp(from)),
        Clause::Lt(ContractField::LocEnd, SqlValue::Timestamp(until)),
    ]);
    assert_eq!(
        render(&window),
        "(loc_returning_datetime > loc_end_datetime + make_interval(hours => $1) \
         AND loc_end_datetime >= $2 AND loc_end_datetime < $3)"
    );
}

#[test]
fn having_filters_render_with_binds() {
    let mut qb: QueryBuilder<'_, Postgres> = QueryBuilder::new("");
    SettlementHaving::ContractIs(7).push(&mut qb);
    assert_eq!(qb.sql(), "b.contract_id = $1");

    let mut qb: QueryBuilder<'_, Postgres> = QueryBuilder::new("");
    SettlementHaving::Settled(true).push(&mut qb);
    assert_eq!(
        qb.sql(),
        "(MAX(c.price) > 0 AND COALESCE(SUM(b.amount), 0) >= MAX(c.price))"
    );
}

#[test]
fn full_payment_is_settled() {
    let row = SettlementRow {
        contract_id: 1,
        price: Decimal::new(300, 0),
        total_billed: Decimal::new(300, 0),
        ratio: Some(Decimal::new(100, 2)), // 1.00
    };
    let settlement = ContractSettlement::from(row);
    assert_eq!(settlement.settlement, SettlementState::Settled);
}

#[test]
fn partial_payment_is_outstanding() {
    let row = SettlementRow {
        contract_id: 2,
        price: Decimal::new(300, 0),
        total_billed: Decimal::new(150, 0),
        ratio: Some(Decimal::new(50, 2)), // 0.50
    };
    let settlement = ContractSettlement::from(row);
    assert_eq!(settlement.settlement, SettlementState::Outstanding);
}

#[test]
fn missing_ratio_is_outstanding() {
    // zero price yields a null ratio
    let row = SettlementRow {
        contract_id: 3,
        price: Decimal::ZERO,
        total_billed: Decimal::ZERO,
        ratio: None,
    };
    let settlement = ContractSettlement::from(row);
    assert_eq!(settlement.settlement, SettlementState::Outstanding);
}

#[test]
fn overpayment_is_settled() {
    let row = SettlementRow {
        contract_id: 4,
        price: Decimal::new(200, 0),
        total_billed: Decimal::new(250, 0),
        ratio: Some(Decimal::new(125, 2)), // 1.25
    };
    let settlement = ContractSettlement::from(row);
    assert_eq!(settlement.settlement, SettlementState::Settled);
}
