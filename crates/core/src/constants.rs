//! Constants used throughout the patients core crate.
//!
//! Store names, defaults and field names live here so the adapter, the coercion layer and the
//! configuration agree on them.

/// Default listen address for the REST server.
pub const DEFAULT_REST_ADDR: &str = "0.0.0.0:5000";

/// Default MongoDB connection string.
pub const DEFAULT_MONGO_URI: &str = "mongodb://localhost:27017/icare";

/// Default database name.
pub const DEFAULT_DATABASE_NAME: &str = "icare";

/// Default collection holding patient documents.
pub const DEFAULT_COLLECTION_NAME: &str = "patients";

/// Document path of the external key.
pub const EMAIL_FIELD_PATH: &str = "user.email";

/// Name of the unique index on [`EMAIL_FIELD_PATH`].
pub const EMAIL_INDEX_NAME: &str = "user_email_unique";

/// MongoDB server error code for a unique index violation.
pub const DUPLICATE_KEY_CODE: i32 = 11000;

/// Upper bound on an email path parameter, in bytes.
pub const MAX_EMAIL_LEN: usize = 320;

/// Field groups every new patient must carry.
pub const REQUIRED_GROUPS: [&str; 4] = ["user", "contact", "medical", "emergency"];
