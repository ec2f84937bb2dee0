/// Failures raised by a [`PatientStore`](crate::store::PatientStore) implementation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("a patient with this email already exists")]
    DuplicateEmail,
    #[error("failed to connect to patient store: {0}")]
    Connect(mongodb::error::Error),
    #[error("failed to create patient store index: {0}")]
    Index(mongodb::error::Error),
    #[error("patient store query failed: {0}")]
    Query(mongodb::error::Error),
    #[error("patient store write failed: {0}")]
    Write(mongodb::error::Error),
    #[error("failed to encode patient for storage: {0}")]
    Encode(String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[derive(Debug, thiserror::Error)]
pub enum PatientError {
    #[error("No data provided")]
    NoBody,
    #[error("Missing required fields")]
    MissingFields,
    #[error("Invalid data format: {0}")]
    InvalidFormat(String),
    #[error("Invalid email format")]
    InvalidEmail,
    #[error("Patient with this email already exists")]
    DuplicateEmail,
    #[error("Patient not found")]
    NotFound,
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("patient store error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for PatientError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateEmail => PatientError::DuplicateEmail,
            other => PatientError::Store(other),
        }
    }
}

impl PatientError {
    /// True for failures caused by the request rather than the store or configuration.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, PatientError::Store(_) | PatientError::InvalidConfig(_))
    }
}

pub type PatientResult<T> = std::result::Result<T, PatientError>;
