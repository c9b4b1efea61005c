use bson::Document;
use chrono::Utc;
use mongodb::Database;
use std::collections::HashMap;
use tracing::info;

use crate::error::AppError;
use crate::models::Vehicle;
use crate::services::ReferenceChecker;
use crate::utils::{query, validation};
use easyloc_shared::{CreateVehicleRequest, UpdateVehicleRequest, VehicleResponse};

/// Queryable fields of the vehicle list endpoint.
const QUERY_FIELDS: &[query::FieldSpec] = &[
    query::text("licence_plate"),
    query::text("informations"),
    query::integer("km"),
];

/// Vehicle records live in the document store; deletion is guarded by the
/// contracts that reference them from the relational store.
#[derive(Clone)]
pub struct VehicleService {
    documents: Database,
    references: ReferenceChecker,
}

impl VehicleService {
    pub fn new(documents: Database, references: ReferenceChecker) -> Self {
        Self {
            documents,
            references,
        }
    }

    pub async fn list(
        &self,
        params: &HashMap<String, String>,
    ) -> Result<Vec<VehicleResponse>, AppError> {
        let (filter, sort) = query::translate(params, QUERY_FIELDS)?;
        let vehicles = Vehicle::find(&self.documents, filter, sort).await?;
        Ok(vehicles.iter().map(Vehicle::to_response).collect())
    }

    pub async fn get_by_plate(
        &self,
        licence_plate: &str,
    ) -> Result<Option<VehicleResponse>, AppError> {
        let vehicle = Vehicle::find_by_plate(&self.documents, licence_plate).await?;
        Ok(vehicle.map(|vehicle| vehicle.to_response()))
    }

    pub async fn create(&self, request: CreateVehicleRequest) -> Result<VehicleResponse, AppError> {
        let existing = Vehicle::find_registered(&self.documents, &request.licence_plate).await?;
        if existing.is_some() {
            return Err(AppError::Conflict("Vehicle already registered.".to_string()));
        }

        let now = Utc::now();
        let vehicle = Vehicle::create(
            &self.documents,
            Vehicle {
                id: None,
                licence_plate: request.licence_plate.trim().to_string(),
                informations: request.informations.unwrap_or_default(),
                km: request.km,
                created_at: now,
                updated_at: now,
            },
        )
        .await?;

        info!("Created vehicle {}", vehicle.licence_plate);
        Ok(vehicle.to_response())
    }

    pub async fn update(
        &self,
        raw_id: &str,
        changes: UpdateVehicleRequest,
    ) -> Result<VehicleResponse, AppError> {
        let id = validation::parse_object_id(raw_id)?;

        let mut set = Document::new();
        if let Some(licence_plate) = &changes.licence_plate {
            set.insert("licence_plate", licence_plate.trim());
        }
        if let Some(informations) = &changes.informations {
            set.insert("informations", informations.as_str());
        }
        if let Some(km) = changes.km {
            set.insert("km", km);
        }
        set.insert("updated_at", bson::DateTime::now());

        let updated = Vehicle::update(&self.documents, id, set)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Vehicle with id:{} not found.", raw_id)))?;

        info!("Updated vehicle {}", raw_id);
        Ok(updated.to_response())
    }

    pub async fn delete(&self, raw_id: &str) -> Result<VehicleResponse, AppError> {
        let id = validation::parse_object_id(raw_id)?;

        if self.references.vehicle_is_referenced(&id).await? {
            return Err(AppError::Conflict(format!(
                "Vehicle with id:{} cannot be deleted due to related records in 'contracts' table.",
                raw_id
            )));
        }

        let deleted = Vehicle::delete(&self.documents, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Vehicle with id:{} not found.", raw_id)))?;

        info!("Deleted vehicle {}", raw_id);
        Ok(deleted.to_response())
    }
}
