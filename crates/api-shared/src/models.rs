//! Patient document shape and JSON envelopes.
//!
//! Every leaf is a `String` and every list a `Vec<String>`: values are coerced to text before
//! they reach these types, so callers re-parse numbers and dates themselves.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Login details for a patient.
///
/// `password` is held exactly as submitted. Storing it in clear text is a known hardening
/// point for any deployment beyond development.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserAccount {
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Contact {
    pub name: String,
    pub age: String,
    pub number: String,
    pub email: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Medical {
    pub bloodtype: String,
    pub height: String,
    pub weight: String,
    pub lastcheckup: String,
    pub conditions: Vec<String>,
    pub medications: Vec<String>,
    pub diet: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct EmergencyContact {
    pub name: String,
    pub phone: String,
}

/// A complete patient record.
///
/// `id` is the store-assigned identifier rendered as a string. It is absent on records that
/// have not been persisted yet and is never used for lookups; `user.email` is the external key.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Patient {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub user: UserAccount,
    pub contact: Contact,
    pub medical: Medical,
    pub emergency: EmergencyContact,
}

impl Patient {
    /// The external key of this record.
    pub fn email(&self) -> &str {
        &self.user.email
    }
}

/// A partial update: each present group replaces the stored group wholesale.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PatientUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserAccount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<Contact>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medical: Option<Medical>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emergency: Option<EmergencyContact>,
}

impl PatientUpdate {
    /// True when no group is present.
    pub fn is_empty(&self) -> bool {
        self.user.is_none()
            && self.contact.is_none()
            && self.medical.is_none()
            && self.emergency.is_none()
    }

    /// Overwrites the groups of `patient` that this update carries.
    pub fn apply_to(&self, patient: &mut Patient) {
        if let Some(user) = &self.user {
            patient.user = user.clone();
        }
        if let Some(contact) = &self.contact {
            patient.contact = contact.clone();
        }
        if let Some(medical) = &self.medical {
            patient.medical = medical.clone();
        }
        if let Some(emergency) = &self.emergency {
            patient.emergency = emergency.clone();
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MessageRes {
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CreatePatientRes {
    pub message: String,
    pub email: String,
}

/// Body of every error response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorRes {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Patient {
        Patient {
            id: None,
            user: UserAccount {
                email: "a@x.com".into(),
                password: "p".into(),
            },
            contact: Contact {
                name: "A".into(),
                age: "30".into(),
                number: "1".into(),
                email: "a@x.com".into(),
            },
            medical: Medical {
                bloodtype: "O+".into(),
                conditions: vec!["asthma".into()],
                ..Default::default()
            },
            emergency: EmergencyContact {
                name: "B".into(),
                phone: "2".into(),
            },
        }
    }

    #[test]
    fn id_is_omitted_until_assigned() {
        let value = serde_json::to_value(sample()).unwrap();
        assert!(value.get("_id").is_none());

        let mut stored = sample();
        stored.id = Some("abc123".into());
        let value = serde_json::to_value(stored).unwrap();
        assert_eq!(value["_id"], "abc123");
    }

    #[test]
    fn update_serialises_only_present_groups() {
        let update = PatientUpdate {
            emergency: Some(EmergencyContact {
                name: "C".into(),
                phone: "3".into(),
            }),
            ..Default::default()
        };

        let value = serde_json::to_value(&update).unwrap();
        let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["emergency".to_string()]);
    }

    #[test]
    fn apply_to_leaves_absent_groups_untouched() {
        let mut patient = sample();
        let update = PatientUpdate {
            medical: Some(Medical {
                bloodtype: "A-".into(),
                ..Default::default()
            }),
            ..Default::default()
        };

        update.apply_to(&mut patient);

        assert_eq!(patient.medical.bloodtype, "A-");
        assert!(patient.medical.conditions.is_empty());
        assert_eq!(patient.contact, sample().contact);
        assert_eq!(patient.user, sample().user);
        assert_eq!(patient.emergency, sample().emergency);
    }

    #[test]
    fn empty_update_is_detected() {
        assert!(PatientUpdate::default().is_empty());
        let update = PatientUpdate {
            user: Some(UserAccount::default()),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }
}
