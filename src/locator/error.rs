use std::fmt;

/// Errors raised while building locations or resolving them to files
#[derive(Debug)]
pub enum LocatorError {
    /// A local file descriptor points at nothing
    NotFound { path: String },

    /// The requested operation does not apply to this location kind
    Unsupported { location: String, operation: String },

    /// A location builder was given incomplete or empty fields
    InvalidLocation { reason: String },

    /// A repository artifact could not be resolved
    ResolutionFailed { coordinate: String, reason: String },

    /// A filesystem operation failed while materializing a location
    Io {
        path: String,
        operation: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl fmt::Display for LocatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocatorError::NotFound { path } => {
                write!(f, "File does not exist: {}", path)
            }
            LocatorError::Unsupported {
                location,
                operation,
            } => {
                write!(f, "Cannot {} location {}", operation, location)
            }
            LocatorError::InvalidLocation { reason } => {
                write!(f, "Invalid location: {}", reason)
            }
            LocatorError::ResolutionFailed { coordinate, reason } => {
                write!(f, "Cannot resolve artifact {}: {}", coordinate, reason)
            }
            LocatorError::Io {
                path, operation, ..
            } => {
                write!(f, "Filesystem {} failed for path: {}", operation, path)
            }
        }
    }
}

impl std::error::Error for LocatorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LocatorError::Io { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

impl LocatorError {
    /// Create a not found error
    pub fn not_found(path: &str) -> Self {
        LocatorError::NotFound {
            path: path.to_string(),
        }
    }

    /// Create an unsupported operation error
    pub fn unsupported(location: &str, operation: &str) -> Self {
        LocatorError::Unsupported {
            location: location.to_string(),
            operation: operation.to_string(),
        }
    }

    /// Create an invalid location error
    pub fn invalid_location(reason: &str) -> Self {
        LocatorError::InvalidLocation {
            reason: reason.to_string(),
        }
    }

    /// Create a resolution error naming the requested coordinate
    pub fn resolution_failed(coordinate: &str, reason: &str) -> Self {
        LocatorError::ResolutionFailed {
            coordinate: coordinate.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Create a filesystem error
    pub fn io(path: &str, operation: &str, source: std::io::Error) -> Self {
        LocatorError::Io {
            path: path.to_string(),
            operation: operation.to_string(),
            source: Box::new(source),
        }
    }
}

/// Result type alias for locator operations
pub type LocatorResult<T> = Result<T, LocatorError>;
