//! # Patients Core
//!
//! Core business logic for the patient records service.
//!
//! This crate contains the data operations behind the REST API:
//! - Validation and string coercion of incoming JSON (`coerce`)
//! - The record store adapter with MongoDB and in-memory backends (`store`)
//! - `PatientService`, which runs one validation step and one store call per operation
//! - Startup configuration and the error taxonomy
//!
//! **No API concerns**: HTTP routing, status codes and CORS belong in `api-rest`.

pub mod coerce;
pub mod config;
pub mod constants;
pub mod error;
pub mod patient;
pub mod store;
pub mod validation;

pub use api_shared as models;

pub use config::{ServiceConfig, StoreKind};
pub use error::{PatientError, PatientResult, StoreError, StoreResult};
pub use patient::PatientService;
pub use store::{open_store, InMemoryPatientStore, MongoPatientStore, PatientStore, UpdateOutcome};
