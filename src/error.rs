//! Error types for toponym.

use thiserror::Error;

/// Result type for toponym operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for toponym operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// An identifier is not 13 hexadecimal digits.
    #[error("malformed location id: {0:?}")]
    MalformedId(String),

    /// A dictionary lookup that must succeed came back empty.
    ///
    /// Every id reachable through `parent_ids` of a stored location must
    /// itself be stored; a miss here means the dictionary is corrupt.
    #[error("location not found in dictionary: {0}")]
    LocationNotFound(String),

    /// A boost was requested from a location that is not a parent of the
    /// target. Precondition violation, not a data problem.
    #[error("location {parent} is not a parent of {child}")]
    InvalidParent {
        /// Id of the location being boosted.
        child: String,
        /// Id of the supposed parent.
        parent: String,
    },

    /// A gazetteer record cannot be turned into a location.
    #[error("invalid location record: {0}")]
    InvalidRecord(String),
}

impl Error {
    /// Create a malformed-id error.
    pub fn malformed_id(id: impl Into<String>) -> Self {
        Error::MalformedId(id.into())
    }

    /// Create a location-not-found error.
    pub fn not_found(id: impl Into<String>) -> Self {
        Error::LocationNotFound(id.into())
    }

    /// Create an invalid-record error.
    pub fn invalid_record(msg: impl Into<String>) -> Self {
        Error::InvalidRecord(msg.into())
    }
}
