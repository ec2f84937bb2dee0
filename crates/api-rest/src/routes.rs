//! Router and request handlers.
//!
//! Routes:
//! - `GET /` liveness message
//! - `POST|GET /api/patients`
//! - `GET|PUT|DELETE /api/patients/:email`
//! - Swagger UI at `/swagger-ui`, OpenAPI document at `/api-docs/openapi.json`
//!
//! Cross-origin requests are allowed from any origin on `/api/*` only.

use api_shared::{CreatePatientRes, ErrorRes, HomeService, MessageRes, Patient, PatientUpdate};
use axum::{
    extract::{rejection::JsonRejection, Path as AxumPath, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use patients_core::PatientService;
use serde_json::Value;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::error::ApiError;

/// Application state for the REST API server
///
/// Holds the patient service, which in turn owns the process-wide store handle.
#[derive(Clone)]
pub struct AppState {
    pub patient_service: PatientService,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        home,
        list_patients,
        create_patient,
        get_patient,
        update_patient,
        delete_patient,
    ),
    components(schemas(
        Patient,
        PatientUpdate,
        api_shared::UserAccount,
        api_shared::Contact,
        api_shared::Medical,
        api_shared::EmergencyContact,
        MessageRes,
        CreatePatientRes,
        ErrorRes,
    ))
)]
pub struct ApiDoc;

/// Builds the full application router over `patient_service`.
pub fn router(patient_service: PatientService) -> Router {
    let api = Router::new()
        .route("/patients", get(list_patients).post(create_patient))
        .route(
            "/patients/:email",
            get(get_patient).put(update_patient).delete(delete_patient),
        )
        .layer(CorsLayer::permissive());

    Router::new()
        .route("/", get(home))
        .nest("/api", api)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(AppState { patient_service })
}

/// Unwraps a JSON body, treating every rejection (missing, malformed, wrong content type) as
/// "no body".
fn json_body(body: Result<Json<Value>, JsonRejection>) -> Option<Value> {
    match body {
        Ok(Json(value)) => Some(value),
        Err(rejection) => {
            tracing::debug!(%rejection, "request body not usable as JSON");
            None
        }
    }
}

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service is alive", body = MessageRes)
    )
)]
/// Liveness/info endpoint.
#[axum::debug_handler]
async fn home() -> Json<MessageRes> {
    Json(HomeService::welcome())
}

#[utoipa::path(
    get,
    path = "/api/patients",
    responses(
        (status = 200, description = "All patients", body = [Patient]),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// List all patients.
///
/// The store-assigned `_id` of each record is rendered as a string.
#[axum::debug_handler]
async fn list_patients(State(state): State<AppState>) -> Result<Json<Vec<Patient>>, ApiError> {
    let patients = state.patient_service.list().await?;
    Ok(Json(patients))
}

#[utoipa::path(
    post,
    path = "/api/patients",
    request_body = Patient,
    responses(
        (status = 201, description = "Patient created", body = CreatePatientRes),
        (status = 400, description = "Missing body, missing groups or invalid format", body = ErrorRes),
        (status = 409, description = "Email already registered", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// Create a new patient record
///
/// All four groups (`user`, `contact`, `medical`, `emergency`) are required. Every value is
/// stored as text; list fields must be JSON arrays.
///
/// # Errors
/// - `400` if the body is absent, a group is missing, or a field has the wrong shape
/// - `409` if `user.email` is already registered
#[axum::debug_handler]
async fn create_patient(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatePatientRes>), ApiError> {
    let body = json_body(body);
    let email = state.patient_service.create(body.as_ref()).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatePatientRes {
            message: "Patient created successfully".into(),
            email,
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/api/patients/{email}",
    params(("email" = String, Path, description = "Patient email (user.email)")),
    responses(
        (status = 200, description = "Patient found", body = Patient),
        (status = 400, description = "Invalid email parameter", body = ErrorRes),
        (status = 404, description = "Patient not found", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// Fetch one patient by email.
#[axum::debug_handler]
async fn get_patient(
    State(state): State<AppState>,
    AxumPath(email): AxumPath<String>,
) -> Result<Json<Patient>, ApiError> {
    let patient = state.patient_service.get(&email).await?;
    Ok(Json(patient))
}

#[utoipa::path(
    put,
    path = "/api/patients/{email}",
    params(("email" = String, Path, description = "Patient email (user.email)")),
    request_body = PatientUpdate,
    responses(
        (status = 200, description = "Patient updated", body = MessageRes),
        (status = 400, description = "Missing body or invalid format", body = ErrorRes),
        (status = 404, description = "Patient not found", body = ErrorRes),
        (status = 409, description = "New email already registered", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// Partially update a patient.
///
/// Only the groups present in the body are replaced. Resubmitting identical values succeeds.
#[axum::debug_handler]
async fn update_patient(
    State(state): State<AppState>,
    AxumPath(email): AxumPath<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<MessageRes>, ApiError> {
    let body = json_body(body);
    state.patient_service.update(&email, body.as_ref()).await?;

    Ok(Json(MessageRes {
        message: "Patient updated successfully".into(),
    }))
}

#[utoipa::path(
    delete,
    path = "/api/patients/{email}",
    params(("email" = String, Path, description = "Patient email (user.email)")),
    responses(
        (status = 200, description = "Patient deleted", body = MessageRes),
        (status = 400, description = "Invalid email parameter", body = ErrorRes),
        (status = 404, description = "Patient not found", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
#[axum::debug_handler]
async fn delete_patient(
    State(state): State<AppState>,
    AxumPath(email): AxumPath<String>,
) -> Result<Json<MessageRes>, ApiError> {
    state.patient_service.delete(&email).await?;

    Ok(Json(MessageRes {
        message: "Patient deleted successfully".into(),
    }))
}
