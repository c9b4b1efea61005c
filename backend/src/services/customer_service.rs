use bson::Document;
use chrono::Utc;
use mongodb::Database;
use std::collections::HashMap;
use tracing::info;

use crate::error::AppError;
use crate::models::Customer;
use crate::services::ReferenceChecker;
use crate::utils::{query, validation};
use easyloc_shared::{CreateCustomerRequest, CustomerResponse, UpdateCustomerRequest};

/// Queryable fields of the customer list endpoint.
const QUERY_FIELDS: &[query::FieldSpec] = &[
    query::text("first_name"),
    query::text("last_name"),
    query::text("address"),
    query::text("permit_number"),
];

/// Customer records live in the document store; deletion is guarded by the
/// contracts that reference them from the relational store.
#[derive(Clone)]
pub struct CustomerService {
    documents: Database,
    references: ReferenceChecker,
}

impl CustomerService {
    pub fn new(documents: Database, references: ReferenceChecker) -> Self {
        Self {
            documents,
            references,
        }
    }

    pub async fn list(
        &self,
        params: &HashMap<String, String>,
    ) -> Result<Vec<CustomerResponse>, AppError> {
        let (filter, sort) = query::translate(params, QUERY_FIELDS)?;
        let customers = Customer::find(&self.documents, filter, sort).await?;
        Ok(customers.iter().map(Customer::to_response).collect())
    }

    pub async fn get_by_name(
        &self,
        last_name: &str,
        first_name: &str,
    ) -> Result<Option<CustomerResponse>, AppError> {
        let customer = Customer::find_by_name(&self.documents, last_name, first_name).await?;
        Ok(customer.map(|customer| customer.to_response()))
    }

    pub async fn create(
        &self,
        request: CreateCustomerRequest,
    ) -> Result<CustomerResponse, AppError> {
        let existing =
            Customer::find_registered(&self.documents, &request.first_name, &request.last_name)
                .await?;
        if existing.is_some() {
            return Err(AppError::Conflict("Customer already registered.".to_string()));
        }

        let now = Utc::now();
        let customer = Customer::create(
            &self.documents,
            Customer {
                id: None,
                first_name: request.first_name.trim().to_string(),
                last_name: request.last_name.trim().to_string(),
                address: request.address,
                permit_number: request.permit_number.trim().to_string(),
                created_at: now,
                updated_at: now,
            },
        )
        .await?;

        info!(
            "Created customer {} {}",
            customer.first_name, customer.last_name
        );
        Ok(customer.to_response())
    }

    pub async fn update(
        &self,
        raw_id: &str,
        changes: UpdateCustomerRequest,
    ) -> Result<CustomerResponse, AppError> {
        let id = validation::parse_object_id(raw_id)?;

        let mut set = Document::new();
        if let Some(first_name) = &changes.first_name {
            set.insert("first_name", first_name.trim());
        }
        if let Some(last_name) = &changes.last_name {
            set.insert("last_name", last_name.trim());
        }
        if let Some(address) = &changes.address {
            set.insert("address", address.as_str());
        }
        if let Some(permit_number) = &changes.permit_number {
            set.insert("permit_number", permit_number.trim());
        }
        set.insert("updated_at", bson::DateTime::now());

        let updated = Customer::update(&self.documents, id, set)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Customer with id:{} not found.", raw_id))
            })?;

        info!("Updated customer {}", raw_id);
        Ok(updated.to_response())
    }

    pub async fn delete(&self, raw_id: &str) -> Result<CustomerResponse, AppError> {
        let id = validation::parse_object_id(raw_id)?;

        if self.references.customer_is_referenced(&id).await? {
            return Err(AppError::Conflict(format!(
                "Customer with id:{} cannot be deleted due to related records in 'contracts' table.",
                raw_id
            )));
        }

        let deleted = Customer::delete(&self.documents, id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Customer with id:{} not found.", raw_id))
            })?;

        info!("Deleted customer {}", raw_id);
        Ok(deleted.to_response())
    }
}
