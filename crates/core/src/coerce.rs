//! Validation and coercion of raw JSON into patient records.
//!
//! Request bodies arrive as arbitrary `serde_json::Value`s. Each known leaf is turned into text
//! and each known list into a list of text, following one fixed table:
//!
//! | JSON value        | Text                                   |
//! |-------------------|----------------------------------------|
//! | string            | the string itself                      |
//! | number            | its JSON form (`30`, `70.5`)           |
//! | `true` / `false`  | `"true"` / `"false"`                   |
//! | `null`            | `"null"`                               |
//! | array / object    | compact JSON (`[1,2]`, `{"a":1}`)      |
//!
//! List fields must be JSON arrays; anything else is rejected rather than split apart.
//! Unknown keys are dropped. `user.email` is the lookup key, so it gets the same trimming and
//! checks as the email in a request path.

use crate::constants::REQUIRED_GROUPS;
use crate::validation::validate_email_param;
use crate::{PatientError, PatientResult};
use api_shared::{Contact, EmergencyContact, Medical, Patient, PatientUpdate, UserAccount};
use serde_json::{Map, Value};

/// Renders a single JSON value as text.
pub fn coerce_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".into(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// True for payloads that carry nothing to act on.
///
/// Covers `null`, `false`, `0`, and empty strings, arrays and objects.
pub fn is_empty_payload(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

/// Builds a full patient from a create request body.
///
/// # Errors
///
/// - `MissingFields` if the body is not an object holding every required group.
/// - `InvalidEmail` if `user.email` could never be used as a lookup key.
/// - `InvalidFormat` if a group is not an object, a nested key is missing, or a list field is
///   not an array.
pub fn patient_from_create(value: &Value) -> PatientResult<Patient> {
    let body = match value.as_object() {
        Some(body) if REQUIRED_GROUPS.iter().all(|g| body.contains_key(*g)) => body,
        _ => return Err(PatientError::MissingFields),
    };

    Ok(Patient {
        id: None,
        user: user_account(&body["user"])?,
        contact: contact(&body["contact"])?,
        medical: medical(&body["medical"])?,
        emergency: emergency_contact(&body["emergency"])?,
    })
}

/// Builds a partial update from an update request body.
///
/// Groups absent from the body stay `None`. A group that is present must be complete, since it
/// replaces the stored group as a whole.
///
/// # Errors
///
/// `InvalidFormat` if the body is not an object or a present group fails coercion, and
/// `InvalidEmail` if a present `user.email` could never be used as a lookup key.
pub fn update_from_value(value: &Value) -> PatientResult<PatientUpdate> {
    let body = value
        .as_object()
        .ok_or_else(|| PatientError::InvalidFormat("body must be a JSON object".into()))?;

    Ok(PatientUpdate {
        user: body.get("user").map(user_account).transpose()?,
        contact: body.get("contact").map(contact).transpose()?,
        medical: body.get("medical").map(medical).transpose()?,
        emergency: body.get("emergency").map(emergency_contact).transpose()?,
    })
}

fn user_account(value: &Value) -> PatientResult<UserAccount> {
    let group = Group::new("user", value)?;
    let email = group.text("email")?;
    Ok(UserAccount {
        email: validate_email_param(&email)?.to_owned(),
        password: group.text("password")?,
    })
}

fn contact(value: &Value) -> PatientResult<Contact> {
    let group = Group::new("contact", value)?;
    Ok(Contact {
        name: group.text("name")?,
        age: group.text("age")?,
        number: group.text("number")?,
        email: group.text("email")?,
    })
}

fn medical(value: &Value) -> PatientResult<Medical> {
    let group = Group::new("medical", value)?;
    Ok(Medical {
        bloodtype: group.text("bloodtype")?,
        height: group.text("height")?,
        weight: group.text("weight")?,
        lastcheckup: group.text("lastcheckup")?,
        conditions: group.text_list("conditions")?,
        medications: group.text_list("medications")?,
        diet: group.text_list("diet")?,
    })
}

fn emergency_contact(value: &Value) -> PatientResult<EmergencyContact> {
    let group = Group::new("emergency", value)?;
    Ok(EmergencyContact {
        name: group.text("name")?,
        phone: group.text("phone")?,
    })
}

/// One top-level group of a request body, with its name kept for error paths.
struct Group<'a> {
    name: &'static str,
    fields: &'a Map<String, Value>,
}

impl<'a> Group<'a> {
    fn new(name: &'static str, value: &'a Value) -> PatientResult<Self> {
        let fields = value
            .as_object()
            .ok_or_else(|| PatientError::InvalidFormat(format!("{name} must be an object")))?;
        Ok(Self { name, fields })
    }

    fn field(&self, key: &str) -> PatientResult<&'a Value> {
        self.fields
            .get(key)
            .ok_or_else(|| PatientError::InvalidFormat(format!("{}.{} is required", self.name, key)))
    }

    fn text(&self, key: &str) -> PatientResult<String> {
        self.field(key).map(coerce_text)
    }

    /// Only arrays count as lists: a string is not split into characters and an object is not
    /// turned into its keys, even though both are iterable in looser readings of the payload.
    fn text_list(&self, key: &str) -> PatientResult<Vec<String>> {
        match self.field(key)? {
            Value::Array(items) => Ok(items.iter().map(coerce_text).collect()),
            _ => Err(PatientError::InvalidFormat(format!(
                "{}.{} must be a list",
                self.name, key
            ))),
        }
    }
}
