use bson::{doc, oid::ObjectId, Document};
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::options::{FindOneAndUpdateOptions, FindOptions, ReturnDocument};
use mongodb::{Collection, Database};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use easyloc_shared::CustomerResponse;

const COLLECTION: &str = "customers";

/// A customer document. Referenced from the relational store by its
/// hex-encoded object id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub permit_number: String,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl Customer {
    fn collection(db: &Database) -> Collection<Customer> {
        db.collection(COLLECTION)
    }

    /// List customers matching a translated filter/sort pair.
    pub async fn find(db: &Database, filter: Document, sort: Document) -> Result<Vec<Self>, AppError> {
        let options = FindOptions::builder().sort(sort).build();
        let cursor = Self::collection(db).find(filter, options).await?;
        Ok(cursor.try_collect().await?)
    }

    /// Case-insensitive lookup by last and first name.
    pub async fn find_by_name(
        db: &Database,
        last_name: &str,
        first_name: &str,
    ) -> Result<Option<Self>, AppError> {
        let filter = doc! {
            "last_name": { "$regex": last_name, "$options": "i" },
            "first_name": { "$regex": first_name, "$options": "i" },
        };
        Ok(Self::collection(db).find_one(filter, None).await?)
    }

    /// Exact lookup on the trimmed unique key (`first_name`, `last_name`).
    pub async fn find_registered(
        db: &Database,
        first_name: &str,
        last_name: &str,
    ) -> Result<Option<Self>, AppError> {
        let filter = doc! {
            "first_name": first_name.trim(),
            "last_name": last_name.trim(),
        };
        Ok(Self::collection(db).find_one(filter, None).await?)
    }

    /// Point read by object id.
    pub async fn find_by_id(db: &Database, id: ObjectId) -> Result<Option<Self>, AppError> {
        Ok(Self::collection(db).find_one(doc! { "_id": id }, None).await?)
    }

    /// Insert a new customer and return it with its assigned id.
    pub async fn create(db: &Database, mut customer: Customer) -> Result<Self, AppError> {
        let result = Self::collection(db).insert_one(&customer, None).await?;
        customer.id = result.inserted_id.as_object_id();
        Ok(customer)
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
    pub fn to_response(&self) -> CustomerResponse {
        CustomerResponse {
            id: self.id.map(|id| id.to_hex()).unwrap_or_default(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            address: self.address.clone(),
            permit_number: self.permit_number.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
