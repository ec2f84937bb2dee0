//! Patient service.
//!
//! Ties the coercion layer to the store: every operation is one validation step followed by a
//! single store call. The service holds no state of its own beyond the shared store handle.

use crate::coerce::{is_empty_payload, patient_from_create, update_from_value};
use crate::error::{PatientError, PatientResult};
use crate::store::PatientStore;
use crate::validation::validate_email_param;
use api_shared::Patient;
use serde_json::Value;
use std::sync::Arc;

/// Pure patient data operations - no HTTP concerns
#[derive(Clone)]
pub struct PatientService {
    store: Arc<dyn PatientStore>,
}

impl PatientService {
    /// Creates a new instance of PatientService over `store`.
    pub fn new(store: Arc<dyn PatientStore>) -> Self {
        Self { store }
    }

    /// Creates a patient from a raw request body.
    ///
    /// # Returns
    ///
    /// The `user.email` of the new record.
    ///
    /// # Errors
    ///
    /// Returns a `PatientError` if:
    /// - the body is absent or empty (`NoBody`),
    /// - a required group is missing (`MissingFields`),
    /// - a nested field is missing or a list field is not a list (`InvalidFormat`),
    /// - the email is already stored (`DuplicateEmail`),
    /// - the store fails (`Store`).
    pub async fn create(&self, body: Option<&Value>) -> PatientResult<String> {
        let body = non_empty(body)?;
        let patient = patient_from_create(body)?;

        let id = self.store.insert(&patient).await?;
        tracing::info!(%id, email = patient.email(), "patient created");

        Ok(patient.user.email)
    }

    /// Lists every stored patient.
    pub async fn list(&self) -> PatientResult<Vec<Patient>> {
        Ok(self.store.find_all().await?)
    }

    /// Looks up one patient by email.
    ///
    /// # Errors
    ///
    /// `InvalidEmail` for an unusable parameter, `NotFound` when nothing matches.
    pub async fn get(&self, email: &str) -> PatientResult<Patient> {
        let email = validate_email_param(email)?;
        self.store
            .find_by_email(email)
            .await?
            .ok_or(PatientError::NotFound)
    }

    /// Overwrites the groups present in `body` on the patient with this email.
    ///
    /// An update that matches a patient but changes nothing still succeeds.
    ///
    /// # Errors
    ///
    /// Returns a `PatientError` if:
    /// - the parameter is unusable (`InvalidEmail`),
    /// - the body is absent, empty, or carries no known group (`NoBody`),
    /// - a present group fails coercion (`InvalidFormat`),
    /// - no patient has this email (`NotFound`),
    /// - the new `user.email` belongs to another patient (`DuplicateEmail`),
    /// - the store fails (`Store`).
    pub async fn update(&self, email: &str, body: Option<&Value>) -> PatientResult<()> {
        let email = validate_email_param(email)?;
        let update = update_from_value(non_empty(body)?)?;
        if update.is_empty() {
            return Err(PatientError::NoBody);
        }

        let outcome = self.store.update_by_email(email, &update).await?;
        if outcome.matched == 0 {
            return Err(PatientError::NotFound);
        }

        tracing::info!(email, modified = outcome.modified, "patient updated");
        Ok(())
    }

    /// Deletes the patient with this email.
    ///
    /// # Errors
    ///
    /// `InvalidEmail` for an unusable parameter, `NotFound` when nothing was removed.
    pub async fn delete(&self, email: &str) -> PatientResult<()> {
        let email = validate_email_param(email)?;
        if self.store.delete_by_email(email).await? == 0 {
            return Err(PatientError::NotFound);
        }

        tracing::info!(email, "patient deleted");
        Ok(())
    }
}

fn non_empty(body: Option<&Value>) -> PatientResult<&Value> {
    match body {
        Some(value) if !is_empty_payload(value) => Ok(value),
        _ => Err(PatientError::NoBody),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryPatientStore;
    use serde_json::json;

    fn service() -> (PatientService, Arc<InMemoryPatientStore>) {
        let store = Arc::new(InMemoryPatientStore::new());
        (PatientService::new(store.clone()), store)
    }

    fn body(email: &str) -> Value {
        json!({
            "user": {"email": email, "password": "p"},
            "contact": {"name": "A", "age": 30, "number": "1", "email": email},
            "medical": {
                "bloodtype": "O+",
                "height": "170",
                "weight": "70",
                "lastcheckup": "2024-01-01",
                "conditions": [],
                "medications": [],
                "diet": []
            },
            "emergency": {"name": "B", "phone": "2"}
        })
    }

    #[tokio::test]
    async fn create_then_get_returns_coerced_record() {
        let (service, _) = service();

        let email = service.create(Some(&body("a@x.com"))).await.unwrap();
        assert_eq!(email, "a@x.com");

        let patient = service.get("a@x.com").await.unwrap();
        assert_eq!(patient.contact.age, "30");
        assert!(patient.id.is_some());
    }

    #[tokio::test]
    async fn create_without_body_is_no_body() {
        let (service, store) = service();

        for payload in [None, Some(json!({})), Some(Value::Null)] {
            let err = service
                .create(payload.as_ref())
                .await
                .expect_err("empty body should fail");
            assert!(matches!(err, PatientError::NoBody));
        }
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn create_missing_group_persists_nothing() {
        let (service, store) = service();
        let mut payload = body("a@x.com");
        payload.as_object_mut().unwrap().remove("medical");

        let err = service.create(Some(&payload)).await.unwrap_err();

        assert!(matches!(err, PatientError::MissingFields));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn duplicate_create_leaves_original_untouched() {
        let (service, _) = service();
        service.create(Some(&body("a@x.com"))).await.unwrap();

        let mut second = body("a@x.com");
        second["contact"]["name"] = json!("Impostor");
        let err = service.create(Some(&second)).await.unwrap_err();

        assert!(matches!(err, PatientError::DuplicateEmail));
        assert_eq!(service.get("a@x.com").await.unwrap().contact.name, "A");
    }

    #[tokio::test]
    async fn get_unknown_email_is_not_found() {
        let (service, _) = service();
        let err = service.get("nobody@x.com").await.unwrap_err();
        assert!(matches!(err, PatientError::NotFound));
    }

    #[tokio::test]
    async fn get_blank_email_is_invalid() {
        let (service, _) = service();
        let err = service.get("  ").await.unwrap_err();
        assert!(matches!(err, PatientError::InvalidEmail));
    }

    #[tokio::test]
    async fn update_medical_only_leaves_other_groups() {
        let (service, _) = service();
        service.create(Some(&body("a@x.com"))).await.unwrap();
        let before = service.get("a@x.com").await.unwrap();

        let update = json!({
            "medical": {
                "bloodtype": "A-",
                "height": 171,
                "weight": "68",
                "lastcheckup": "2024-06-01",
                "conditions": ["asthma"],
                "medications": ["salbutamol"],
                "diet": []
            }
        });
        service.update("a@x.com", Some(&update)).await.unwrap();

        let after = service.get("a@x.com").await.unwrap();
        assert_eq!(after.medical.bloodtype, "A-");
        assert_eq!(after.medical.height, "171");
        assert_eq!(after.medical.conditions, vec!["asthma"]);
        assert_eq!(after.user, before.user);
        assert_eq!(after.contact, before.contact);
        assert_eq!(after.emergency, before.emergency);
    }

    #[tokio::test]
    async fn no_op_update_succeeds() {
        let (service, _) = service();
        let payload = body("a@x.com");
        service.create(Some(&payload)).await.unwrap();

        service
            .update("a@x.com", Some(&json!({"emergency": payload["emergency"]})))
            .await
            .expect("unchanged values should still succeed");
    }

    #[tokio::test]
    async fn update_unknown_email_is_not_found() {
        let (service, _) = service();
        let err = service
            .update("nobody@x.com", Some(&json!({"emergency": {"name": "C", "phone": "3"}})))
            .await
            .unwrap_err();
        assert!(matches!(err, PatientError::NotFound));
    }

    #[tokio::test]
    async fn update_without_known_groups_is_no_body() {
        let (service, _) = service();
        service.create(Some(&body("a@x.com"))).await.unwrap();

        for payload in [None, Some(json!({})), Some(json!({"notes": "x"}))] {
            let err = service
                .update("a@x.com", payload.as_ref())
                .await
                .unwrap_err();
            assert!(matches!(err, PatientError::NoBody));
        }
    }

    #[tokio::test]
    async fn update_with_incomplete_group_is_invalid_format() {
        let (service, _) = service();
        service.create(Some(&body("a@x.com"))).await.unwrap();

        let err = service
            .update("a@x.com", Some(&json!({"medical": {"bloodtype": "A-"}})))
            .await
            .unwrap_err();
        assert!(matches!(err, PatientError::InvalidFormat(_)));
    }

    #[tokio::test]
    async fn delete_then_get_is_not_found() {
        let (service, store) = service();
        service.create(Some(&body("a@x.com"))).await.unwrap();
        service.create(Some(&body("b@x.com"))).await.unwrap();

        service.delete("a@x.com").await.unwrap();

        assert!(matches!(
            service.get("a@x.com").await.unwrap_err(),
            PatientError::NotFound
        ));
        assert!(matches!(
            service.delete("a@x.com").await.unwrap_err(),
            PatientError::NotFound
        ));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn padded_email_stays_reachable() {
        let (service, store) = service();

        let email = service.create(Some(&body(" a@x.com"))).await.unwrap();
        assert_eq!(email, "a@x.com");

        assert_eq!(service.get(" a@x.com").await.unwrap().user.email, "a@x.com");
        service.delete(" a@x.com").await.unwrap();
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn create_with_blank_email_persists_nothing() {
        let (service, store) = service();

        let err = service.create(Some(&body(""))).await.unwrap_err();

        assert!(matches!(err, PatientError::InvalidEmail));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn list_returns_every_patient() {
        let (service, _) = service();
        service.create(Some(&body("a@x.com"))).await.unwrap();
        service.create(Some(&body("b@x.com"))).await.unwrap();

        let mut emails: Vec<_> = service
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.user.email)
            .collect();
        emails.sort();

        assert_eq!(emails, vec!["a@x.com", "b@x.com"]);
    }
}
