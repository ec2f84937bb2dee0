//! Record store adapter.
//!
//! One logical collection of patient documents, addressed by `user.email`. Implementations must
//! be safe to share across request handlers and must reject a second document with an email
//! that is already stored.

pub mod memory;
pub mod mongo;

use crate::config::{ServiceConfig, StoreKind};
use crate::error::StoreResult;
use api_shared::{Patient, PatientUpdate};
use async_trait::async_trait;
use std::sync::Arc;

pub use memory::InMemoryPatientStore;
pub use mongo::MongoPatientStore;

/// Counts reported by [`PatientStore::update_by_email`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UpdateOutcome {
    /// Documents whose email matched (0 or 1).
    pub matched: u64,
    /// Documents whose stored content changed (0 or 1).
    pub modified: u64,
}

#[async_trait]
pub trait PatientStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<Patient>>;

    /// Every stored patient, in no particular order.
    async fn find_all(&self) -> StoreResult<Vec<Patient>>;

    /// Inserts a new patient and returns the assigned identifier.
    ///
    /// Fails with `StoreError::DuplicateEmail` if `user.email` is already taken.
    async fn insert(&self, patient: &Patient) -> StoreResult<String>;

    /// Replaces the groups present in `update` on the patient with this email.
    ///
    /// Fails with `StoreError::DuplicateEmail` if the update moves `user.email` onto an email
    /// held by another patient.
    async fn update_by_email(&self, email: &str, update: &PatientUpdate)
        -> StoreResult<UpdateOutcome>;

    /// Removes the patient with this email and returns how many documents went (0 or 1).
    async fn delete_by_email(&self, email: &str) -> StoreResult<u64>;
}

/// Opens the store selected by `cfg`.
///
/// For MongoDB this connects and ensures the unique email index before returning.
pub async fn open_store(cfg: &ServiceConfig) -> StoreResult<Arc<dyn PatientStore>> {
    let store: Arc<dyn PatientStore> = match cfg.store_kind() {
        StoreKind::Mongo => Arc::new(MongoPatientStore::connect(cfg).await?),
        StoreKind::Memory => {
            tracing::warn!("using in-memory patient store; records are not persisted");
            Arc::new(InMemoryPatientStore::new())
        }
    };

    Ok(store)
}
