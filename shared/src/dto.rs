use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Uniform response envelope. `status` is `"OK"` on success and an error
/// description otherwise; `data` carries the payload when there is one.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            status: "OK".to_string(),
            message: None,
            data: Some(data),
        }
    }

    pub fn ok_with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            status: "OK".to_string(),
            message: Some(message.into()),
            data: Some(data),
        }
    }

    /// A bare status with no payload, e.g. a lookup miss reported inside
    /// a successful response.
    pub fn status_only(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            message: None,
            data: None,
        }
    }

    /// An error rendering of the envelope.
    pub fn error(status: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            message: Some(message.into()),
            data: None,
        }
    }
}

// Customer DTOs

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateCustomerRequest {
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,

    #[validate(length(min = 1, max = 100))]
    pub last_name: String,

    #[validate(length(min = 1, max = 255))]
    pub address: String,

    #[validate(length(min = 1, max = 50))]
    pub permit_number: String,
}

/// Partial update: every field optional, unknown fields rejected outright.
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateCustomerRequest {
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub last_name: Option<String>,

    #[validate(length(min = 1, max = 255))]
    pub address: Option<String>,

    #[validate(length(min = 1, max = 50))]
    pub permit_number: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerResponse {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub permit_number: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Vehicle DTOs

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateVehicleRequest {
    #[validate(length(min = 1, max = 20))]
    pub licence_plate: String,

    #[validate(length(max = 1000))]
    pub informations: Option<String>,

    #[validate(range(min = 0))]
    pub km: i64,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateVehicleRequest {
    #[validate(length(min = 1, max = 20))]
    pub licence_plate: Option<String>,

    #[validate(length(max = 1000))]
    pub informations: Option<String>,

    #[validate(range(min = 0))]
    pub km: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleResponse {
    pub id: String,
    pub licence_plate: String,
    pub informations: String,
    pub km: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Contract DTOs

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateContractRequest {
    pub vehicle_id: String,
    pub customer_id: String,
    /// Defaults to the creation instant when omitted.
    pub sign_datetime: Option<DateTime<Utc>>,
    pub loc_begin_datetime: DateTime<Utc>,
    pub loc_end_datetime: DateTime<Utc>,
    pub loc_returning_datetime: Option<DateTime<Utc>>,
    pub price: Decimal,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateContractRequest {
    pub vehicle_id: Option<String>,
    pub customer_id: Option<String>,
    pub sign_datetime: Option<DateTime<Utc>>,
    pub loc_begin_datetime: Option<DateTime<Utc>>,
    pub loc_end_datetime: Option<DateTime<Utc>>,
    pub loc_returning_datetime: Option<DateTime<Utc>>,
    pub price: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractResponse {
    pub id: i32,
    pub vehicle_id: String,
    pub customer_id: String,
    pub sign_datetime: DateTime<Utc>,
    pub loc_begin_datetime: DateTime<Utc>,
    pub loc_end_datetime: DateTime<Utc>,
    pub loc_returning_datetime: Option<DateTime<Utc>>,
    pub price: Decimal,
    /// Derived status tags, e.g. `["ongoing"]` or `["completed", "late"]`.
    pub status: Vec<String>,
    /// Signed hours past the deadline, two decimals, negative when early.
    pub car_return_delay_hours: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Billing DTOs

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateBillingRequest {
    pub contract_id: i32,
    pub amount: Decimal,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateBillingRequest {
    pub contract_id: Option<i32>,
    pub amount: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillingResponse {
    pub id: i32,
    pub contract_id: i32,
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn partial_update_rejects_unknown_fields() {
        let result = serde_json::from_value::<UpdateCustomerRequest>(json!({
            "first_name": "Jane",
            "nickname": "JJ"
        }));
        assert!(result.is_err());

        let result = serde_json::from_value::<UpdateContractRequest>(json!({
            "price": 300.0,
            "discount": 10
        }));
        assert!(result.is_err());
    }

    #[test]
    fn partial_update_accepts_any_known_subset() {
        let update: UpdateCustomerRequest = serde_json::from_value(json!({
            "address": "12 rue des Lilas"
        }))
        .expect("subset of known fields");
        assert_eq!(update.address.as_deref(), Some("12 rue des Lilas"));
        assert!(update.first_name.is_none());

        let update: UpdateBillingRequest =
            serde_json::from_value(json!({})).expect("empty patch is a valid subset");
        assert!(update.contract_id.is_none());
    }

    #[test]
    fn envelope_omits_message_when_absent() {
        let rendered = serde_json::to_value(ApiResponse::ok(1)).expect("serializable");
        assert_eq!(rendered, json!({ "status": "OK", "data": 1 }));

        let rendered = serde_json::to_value(ApiResponse::<i32>::error("Not Found", "nope"))
            .expect("serializable");
        assert_eq!(
            rendered,
            json!({ "status": "Not Found", "message": "nope", "data": null })
        );
    }
}
