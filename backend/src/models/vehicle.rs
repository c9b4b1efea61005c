use bson::{doc, oid::ObjectId, Document};
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::options::{FindOneAndUpdateOptions, FindOptions, ReturnDocument};
use mongodb::{Collection, Database};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use easyloc_shared::VehicleResponse;

const COLLECTION: &str = "vehicles";

/// A vehicle document, unique by trimmed licence plate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub licence_plate: String,
    pub informations: String,
    pub km: i64,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl Vehicle {
    fn collection(db: &Database) -> Collection<Vehicle> {
        db.collection(COLLECTION)
    }

    /// List vehicles matching a translated filter/sort pair.
    pub async fn find(db: &Database, filter: Document, sort: Document) -> Result<Vec<Self>, AppError> {
        let options = FindOptions::builder().sort(sort).build();
        let cursor = Self::collection(db).find(filter, options).await?;
        Ok(cursor.try_collect().await?)
    }

    /// Case-insensitive lookup by licence plate.
    pub async fn find_by_plate(db: &Database, licence_plate: &str) -> Result<Option<Self>, AppError> {
        let filter = doc! {
            "licence_plate": { "$regex": licence_plate, "$options": "i" },
        };
        Ok(Self::collection(db).find_one(filter, None).await?)
    }

    /// Exact lookup on the trimmed unique plate.
    pub async fn find_registered(db: &Database, licence_plate: &str) -> Result<Option<Self>, AppError> {
        let filter = doc! { "licence_plate": licence_plate.trim() };
        Ok(Self::collection(db).find_one(filter, None).await?)
    }

    /// Point read by object id.
    pub async fn find_by_id(db: &Database, id: ObjectId) -> Result<Option<Self>, AppError> {
        Ok(Self::collection(db).find_one(doc! { "_id": id }, None).await?)
    }

    /// Insert a new vehicle and return it with its assigned id.
    pub async fn create(db: &Database, mut vehicle: Vehicle) -> Result<Self, AppError> {
        let result = Self::collection(db).insert_one(&vehicle, None).await?;
        vehicle.id = result.inserted_id.as_object_id();
        Ok(vehicle)
    }

    /// Apply a partial `$set` update and return the new document.
    pub async fn update(
        db: &Database,
        id: ObjectId,
        set: Document,
    ) -> Result<Option<Self>, AppError> {
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();
        Ok(Self::collection(db)
            .find_one_and_update(doc! { "_id": id }, doc! { "$set": set }, options)
            .await?)
    }

    /// Delete by id and return the removed document.
    pub async fn delete(db: &Database, id: ObjectId) -> Result<Option<Self>, AppError> {
        Ok(Self::collection(db)
            .find_one_and_delete(doc! { "_id": id }, None)
            .await?)
    }

    /// Convert to response DTO
    pub fn to_response(&self) -> VehicleResponse {
        VehicleResponse {
            id: self.id.map(|id| id.to_hex()).unwrap_or_default(),
            licence_plate: self.licence_plate.clone(),
            informations: self.informations.clone(),
            km: self.km,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
