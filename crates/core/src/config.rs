//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into the store and the
//! services. Nothing below reads process-wide environment variables during request handling;
//! the binary collects the raw values and hands them to [`ServiceConfig::from_values`].

use crate::constants::{
    DEFAULT_COLLECTION_NAME, DEFAULT_DATABASE_NAME, DEFAULT_MONGO_URI, DEFAULT_REST_ADDR,
};
use crate::{PatientError, PatientResult};
use std::str::FromStr;

/// Which [`PatientStore`](crate::store::PatientStore) backs the service.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StoreKind {
    #[default]
    Mongo,
    /// Process-local store; contents are lost on restart.
    Memory,
}

impl FromStr for StoreKind {
    type Err = PatientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mongo" | "mongodb" => Ok(StoreKind::Mongo),
            "memory" | "in-memory" => Ok(StoreKind::Memory),
            other => Err(PatientError::InvalidConfig(format!(
                "unknown patient store kind: {other}"
            ))),
        }
    }
}

/// Service configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct ServiceConfig {
    rest_addr: String,
    mongo_uri: String,
    database: String,
    collection: String,
    store_kind: StoreKind,
}

impl ServiceConfig {
    /// Create a new `ServiceConfig`.
    pub fn new(
        rest_addr: String,
        mongo_uri: String,
        database: String,
        collection: String,
        store_kind: StoreKind,
    ) -> PatientResult<Self> {
        if database.trim().is_empty() {
            return Err(PatientError::InvalidConfig(
                "database name cannot be empty".into(),
            ));
        }
        if collection.trim().is_empty() {
            return Err(PatientError::InvalidConfig(
                "collection name cannot be empty".into(),
            ));
        }

        Ok(Self {
            rest_addr,
            mongo_uri,
            database,
            collection,
            store_kind,
        })
    }

    /// Build a configuration from optional raw values, falling back to defaults.
    ///
    /// Blank values count as unset.
    pub fn from_values(
        rest_addr: Option<String>,
        mongo_uri: Option<String>,
        database: Option<String>,
        collection: Option<String>,
        store_kind: Option<String>,
    ) -> PatientResult<Self> {
        let store_kind = non_blank(store_kind)
            .map(|v| v.parse::<StoreKind>())
            .transpose()?
            .unwrap_or_default();

        Self::new(
            non_blank(rest_addr).unwrap_or_else(|| DEFAULT_REST_ADDR.into()),
            non_blank(mongo_uri).unwrap_or_else(|| DEFAULT_MONGO_URI.into()),
            non_blank(database).unwrap_or_else(|| DEFAULT_DATABASE_NAME.into()),
            non_blank(collection).unwrap_or_else(|| DEFAULT_COLLECTION_NAME.into()),
            store_kind,
        )
    }

    pub fn rest_addr(&self) -> &str {
        &self.rest_addr
    }

    pub fn mongo_uri(&self) -> &str {
        &self.mongo_uri
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn store_kind(&self) -> StoreKind {
        self.store_kind
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
