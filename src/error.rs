use thiserror::Error;

/// Errors produced by the store and the domain containers.
#[derive(Error, Debug)]
pub enum Error {
    /// SQLite error from the durable store.
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Generic I/O error (e.g. creating the data directory).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A slot value could not be serialized or deserialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The durable store refused a write (quota, disabled, lock poisoned).
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// An update or delete targeted an id that is not in the container.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// A draft failed the form-boundary checks.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A status change that the entity lifecycle does not allow.
    #[error("Cannot move from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    /// The persisted session has not been read yet.
    #[error("Session is still loading")]
    SessionLoading,

    /// No signed-in user, or one without the required role.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
}

impl Error {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Error::NotFound {
            entity,
            id: id.into(),
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Error::Validation(msg.into())
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
