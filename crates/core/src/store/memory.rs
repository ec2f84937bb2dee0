//! Process-local patient store.
//!
//! Documents live in a vector behind an async `RwLock`. The email uniqueness check and the write
//! happen under the same write guard, so concurrent creates for one email cannot both succeed.

use super::{PatientStore, UpdateOutcome};
use crate::error::{StoreError, StoreResult};
use api_shared::{Patient, PatientUpdate};
use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Default)]
pub struct InMemoryPatientStore {
    patients: RwLock<Vec<Patient>>,
}

impl InMemoryPatientStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored patients.
    pub async fn len(&self) -> usize {
        self.patients.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.patients.read().await.is_empty()
    }
}

#[async_trait]
impl PatientStore for InMemoryPatientStore {
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<Patient>> {
        let patients = self.patients.read().await;
        Ok(patients.iter().find(|p| p.email() == email).cloned())
    }

    async fn find_all(&self) -> StoreResult<Vec<Patient>> {
        Ok(self.patients.read().await.clone())
    }

    async fn insert(&self, patient: &Patient) -> StoreResult<String> {
        let mut patients = self.patients.write().await;
        if patients.iter().any(|p| p.email() == patient.email()) {
            return Err(StoreError::DuplicateEmail);
        }

        let id = Uuid::new_v4().simple().to_string();
        let mut stored = patient.clone();
        stored.id = Some(id.clone());
        patients.push(stored);

        Ok(id)
    }

    async fn update_by_email(
        &self,
        email: &str,
        update: &PatientUpdate,
    ) -> StoreResult<UpdateOutcome> {
        let mut patients = self.patients.write().await;
        let Some(index) = patients.iter().position(|p| p.email() == email) else {
            return Ok(UpdateOutcome::default());
        };

        if let Some(user) = &update.user {
            let taken = patients
                .iter()
                .enumerate()
                .any(|(i, p)| i != index && p.email() == user.email);
            if taken {
                return Err(StoreError::DuplicateEmail);
            }
        }

        let current = &mut patients[index];
        let before = current.clone();
        update.apply_to(current);

        Ok(UpdateOutcome {
            matched: 1,
            modified: u64::from(*current != before),
        })
    }

    async fn delete_by_email(&self, email: &str) -> StoreResult<u64> {
        let mut patients = self.patients.write().await;
        match patients.iter().position(|p| p.email() == email) {
            Some(index) => {
                patients.remove(index);
                Ok(1)
            }
            None => Ok(0),
        }
    }
}
