//! # API Shared
//!
//! Shared definitions for the patient records API.
//!
//! Contains:
//! - The patient document and its field groups (`models` module)
//! - Request/response envelopes used by the REST layer
//! - The `HomeService` liveness message
//!
//! Used by `patients-core` for the stored shape and by `api-rest` for JSON bodies and OpenAPI
//! schemas.

pub mod health;
pub mod models;

pub use health::HomeService;
pub use models::*;
