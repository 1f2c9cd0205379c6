use std::fmt;

/// Errors raised while resolving configuration and well-known directories
#[derive(Debug)]
pub enum ConfigError {
    /// A user-supplied path is missing or not a directory
    InvalidDirectory { name: String, value: String },

    /// A configured binary does not exist under its home directory
    InvalidBinary {
        path: String,
        extensions: Vec<String>,
    },

    /// A property file could not be read or parsed
    PropertyFile { path: String, reason: String },

    /// A key declared mandatory by the caller is absent
    MissingProperty { key: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidDirectory { name, value } => {
                write!(f, "{} is not valid: {}", name, value)
            }
            ConfigError::InvalidBinary { path, extensions } => {
                write!(
                    f,
                    "Binary is not valid: {} (with one of these extensions: {:?})",
                    path, extensions
                )
            }
            ConfigError::PropertyFile { path, reason } => {
                write!(f, "Cannot load property file {}: {}", path, reason)
            }
            ConfigError::MissingProperty { key } => {
                write!(f, "Missing property: {}", key)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl ConfigError {
    /// Create an invalid directory error
    pub fn invalid_directory(name: &str, value: &str) -> Self {
        ConfigError::InvalidDirectory {
            name: name.to_string(),
            value: value.to_string(),
        }
    }

    /// Create an invalid binary error
    pub fn invalid_binary(path: &str, extensions: &[&str]) -> Self {
        ConfigError::InvalidBinary {
            path: path.to_string(),
            extensions: extensions.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Create a property file error
    pub fn property_file(path: &str, reason: &str) -> Self {
        ConfigError::PropertyFile {
            path: path.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Create a missing property error
    pub fn missing_property(key: &str) -> Self {
        ConfigError::MissingProperty {
            key: key.to_string(),
        }
    }
}

/// Result type alias for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;
