//! MongoDB-backed patient store.
//!
//! All documents live in one collection. `user.email` carries a unique index created at
//! connect time, so duplicate creates are rejected by the server rather than by a read-then-write
//! check in this process.

use super::{PatientStore, UpdateOutcome};
use crate::config::ServiceConfig;
use crate::constants::{DUPLICATE_KEY_CODE, EMAIL_FIELD_PATH, EMAIL_INDEX_NAME};
use crate::error::{StoreError, StoreResult};
use api_shared::{Contact, EmergencyContact, Medical, Patient, PatientUpdate, UserAccount};
use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::{self, doc, oid::ObjectId, Document};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::IndexOptions;
use mongodb::{Client, Collection, IndexModel};
use serde::{Deserialize, Serialize};

/// The on-disk shape: a patient plus its ObjectId.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredPatient {
    #[serde(rename = "_id")]
    id: ObjectId,
    user: UserAccount,
    contact: Contact,
    medical: Medical,
    emergency: EmergencyContact,
}

impl StoredPatient {
    fn new(patient: &Patient) -> Self {
        Self {
            id: ObjectId::new(),
            user: patient.user.clone(),
            contact: patient.contact.clone(),
            medical: patient.medical.clone(),
            emergency: patient.emergency.clone(),
        }
    }
}

impl From<StoredPatient> for Patient {
    fn from(stored: StoredPatient) -> Self {
        Patient {
            id: Some(stored.id.to_hex()),
            user: stored.user,
            contact: stored.contact,
            medical: stored.medical,
            emergency: stored.emergency,
        }
    }
}

#[derive(Clone, Debug)]
pub struct MongoPatientStore {
    collection: Collection<StoredPatient>,
}

impl MongoPatientStore {
    /// Connects using the URI in `cfg` and ensures the unique email index.
    ///
    /// The driver keeps its own connection pool; the returned store is cheap to clone and safe
    /// to share across handlers.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Connect` if the URI is invalid and `StoreError::Index` if the index
    /// cannot be created (including when existing documents already share an email).
    pub async fn connect(cfg: &ServiceConfig) -> StoreResult<Self> {
        let client = Client::with_uri_str(cfg.mongo_uri())
            .await
            .map_err(StoreError::Connect)?;
        let collection = client
            .database(cfg.database())
            .collection::<StoredPatient>(cfg.collection());

        let store = Self { collection };
        store.ensure_indexes().await?;

        tracing::info!(
            database = cfg.database(),
            collection = cfg.collection(),
            "connected to patient store"
        );

        Ok(store)
    }

    /// Creates the unique index on `user.email` if it does not exist yet.
    pub async fn ensure_indexes(&self) -> StoreResult<()> {
        let index = IndexModel::builder()
            .keys(doc! { EMAIL_FIELD_PATH: 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name(EMAIL_INDEX_NAME.to_string())
                    .build(),
            )
            .build();

        self.collection
            .create_index(index)
            .await
            .map_err(StoreError::Index)?;

        Ok(())
    }
}

#[async_trait]
impl PatientStore for MongoPatientStore {
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<Patient>> {
        let stored = self
            .collection
            .find_one(email_filter(email))
            .await
            .map_err(StoreError::Query)?;

        Ok(stored.map(Patient::from))
    }

    async fn find_all(&self) -> StoreResult<Vec<Patient>> {
        let cursor = self
            .collection
            .find(doc! {})
            .await
            .map_err(StoreError::Query)?;
        let stored: Vec<StoredPatient> = cursor.try_collect().await.map_err(StoreError::Query)?;

        Ok(stored.into_iter().map(Patient::from).collect())
    }

    async fn insert(&self, patient: &Patient) -> StoreResult<String> {
        let stored = StoredPatient::new(patient);
        self.collection
            .insert_one(&stored)
            .await
            .map_err(write_error)?;

        Ok(stored.id.to_hex())
    }

    async fn update_by_email(
        &self,
        email: &str,
        update: &PatientUpdate,
    ) -> StoreResult<UpdateOutcome> {
        let set = set_document(update)?;
        if set.is_empty() {
            let matched = self
                .collection
                .count_documents(email_filter(email))
                .await
                .map_err(StoreError::Query)?;
            return Ok(UpdateOutcome {
                matched: matched.min(1),
                modified: 0,
            });
        }

        let result = self
            .collection
            .update_one(email_filter(email), doc! { "$set": set })
            .await
            .map_err(write_error)?;

        Ok(UpdateOutcome {
            matched: result.matched_count,
            modified: result.modified_count,
        })
    }

    async fn delete_by_email(&self, email: &str) -> StoreResult<u64> {
        let result = self
            .collection
            .delete_one(email_filter(email))
            .await
            .map_err(write_error)?;

        Ok(result.deleted_count)
    }
}

fn email_filter(email: &str) -> Document {
    doc! { EMAIL_FIELD_PATH: email }
}

/// The `$set` body for an update: one entry per present group.
fn set_document(update: &PatientUpdate) -> StoreResult<Document> {
    bson::to_document(update).map_err(|e| StoreError::Encode(e.to_string()))
}

fn write_error(err: mongodb::error::Error) -> StoreError {
    if is_duplicate_key(&err) {
        StoreError::DuplicateEmail
    } else {
        StoreError::Write(err)
    }
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error)) => {
            write_error.code == DUPLICATE_KEY_CODE
        }
        ErrorKind::Command(command_error) => command_error.code == DUPLICATE_KEY_CODE,
        _ => false,
    }
}
