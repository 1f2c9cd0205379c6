//! Test orchestration harness: resolves configuration and artifacts, then
//! drives Maven, Ant and scanner builds against a running server instance.

pub mod build;
pub mod config;
pub mod container;
pub mod locator;
pub mod system;
pub mod version;

// Re-export the types most harness code touches
pub use build::{AntBuild, BuildResult, MavenBuild, SonarScanner};
pub use config::{Configuration, FileSystem};
pub use container::SonarDistribution;
pub use locator::{Location, Locators, MavenCoordinate, PluginLocation};
pub use version::Version;
