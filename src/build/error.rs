use std::fmt;

use crate::config::ConfigError;
use crate::locator::LocatorError;

/// Errors raised while preparing or running builds
#[derive(Debug)]
pub enum BuildError {
    /// Configuration could not be resolved into a filesystem layout
    Config(ConfigError),

    /// A build input could not be located
    Locator(LocatorError),

    /// The build tool could not be run to completion (spawn failure or
    /// timeout; non-zero exit codes are data, not errors)
    Execution {
        command: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A scanner distribution could not be provisioned
    ScannerInstall { version: String, reason: String },
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildError::Config(e) => write!(f, "{}", e),
            BuildError::Locator(e) => write!(f, "{}", e),
            BuildError::Execution { command, source } => {
                write!(f, "Cannot run {}: {}", command, source)
            }
            BuildError::ScannerInstall { version, reason } => {
                write!(f, "Cannot install scanner {}: {}", version, reason)
            }
        }
    }
}

impl std::error::Error for BuildError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BuildError::Config(e) => Some(e),
            BuildError::Locator(e) => Some(e),
            BuildError::Execution { source, .. } => Some(source.as_ref()),
            BuildError::ScannerInstall { .. } => None,
        }
    }
}

impl BuildError {
    /// Create an execution error naming the attempted command line
    pub fn execution(
        command: &str,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        BuildError::Execution {
            command: command.to_string(),
            source,
        }
    }

    /// Create a scanner install error naming the requested version
    pub fn scanner_install(version: &str, reason: &str) -> Self {
        BuildError::ScannerInstall {
            version: version.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl From<ConfigError> for BuildError {
    fn from(e: ConfigError) -> Self {
        BuildError::Config(e)
    }
}

impl From<LocatorError> for BuildError {
    fn from(e: LocatorError) -> Self {
        BuildError::Locator(e)
    }
}
