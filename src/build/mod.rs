//! Build tool descriptions and executors

pub mod ant;
pub mod error;
mod integration_tests;
pub mod maven;
pub mod result;
pub mod scanner;

/// Default bound on a single build tool invocation
pub(crate) const DEFAULT_TIMEOUT_SECONDS: u64 = 60 * 60;

// Re-export commonly used items
pub use ant::{AntBuild, AntBuildExecutor};
pub use error::BuildError;
pub use maven::{MavenBuild, MavenBuildExecutor};
pub use result::BuildResult;
pub use scanner::{
    ScannerInstaller, SonarScanner, SonarScannerExecutor, SonarScannerInstaller,
};
