//! HTTP mapping for core errors.
//!
//! Every failure leaves the handler as a flat `{"error": "<message>"}` body. Store and
//! configuration failures are logged in full and reported to the client as "Internal error".

use api_shared::ErrorRes;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use patients_core::PatientError;

#[derive(Debug)]
pub struct ApiError(pub PatientError);

impl From<PatientError> for ApiError {
    fn from(err: PatientError) -> Self {
        Self(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            PatientError::NoBody
            | PatientError::MissingFields
            | PatientError::InvalidFormat(_)
            | PatientError::InvalidEmail => StatusCode::BAD_REQUEST,
            PatientError::DuplicateEmail => StatusCode::CONFLICT,
            PatientError::NotFound => StatusCode::NOT_FOUND,
            PatientError::Store(_) | PatientError::InvalidConfig(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if self.0.is_client_error() {
            tracing::warn!(status = status.as_u16(), error = %self.0, "request rejected");
            self.0.to_string()
        } else {
            tracing::error!(error = ?self.0, "patient request failed");
            "Internal error".to_string()
        };

        (status, Json(ErrorRes { error: message })).into_response()
    }
}
