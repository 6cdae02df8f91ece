//! Error types and handling for Gridlink

/// Result type alias for Gridlink operations
pub type Result<T> = std::result::Result<T, GridlinkError>;

/// Error types for the Gridlink client substrate
#[derive(Debug, thiserror::Error)]
pub enum GridlinkError {
    /// Invalid parameters or configuration
    #[error("Invalid parameter: {parameter} - {message}")]
    InvalidParameter { parameter: String, message: String },

    /// A non-growing buffer pool has no free buffer
    #[error("Buffer pool exhausted: all {capacity} buffers are leased")]
    PoolExhausted { capacity: usize },

    /// Insufficient space for the requested length
    #[error("Insufficient space: requested {requested}, available {available}")]
    InsufficientSpace { requested: usize, available: usize },

    /// Lookup key not present
    #[error("{entity} not found: {key}")]
    NotFound { entity: String, key: String },

    /// Insert would collide with an existing key
    #[error("Duplicate key: {key}")]
    DuplicateKey { key: String },
}

impl GridlinkError {
    /// Create an invalid parameter error
    pub fn invalid_parameter(parameter: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            parameter: parameter.into(),
            message: message.into(),
        }
    }

    /// Create a pool exhausted error
    pub fn pool_exhausted(capacity: usize) -> Self {
        Self::PoolExhausted { capacity }
    }

    /// Create an insufficient space error
    pub fn insufficient_space(requested: usize, available: usize) -> Self {
        Self::InsufficientSpace {
            requested,
            available,
        }
    }

    /// Create a not found error
    pub fn not_found(entity: impl Into<String>, key: impl std::fmt::Display) -> Self {
        Self::NotFound {
            entity: entity.into(),
            key: key.to_string(),
        }
    }

    /// Create a duplicate key error
    pub fn duplicate_key(key: impl std::fmt::Display) -> Self {
        Self::DuplicateKey {
            key: key.to_string(),
        }
    }
}
