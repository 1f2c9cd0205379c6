//! Artifact locations and their resolution to local files

pub mod error;
pub mod location;
pub mod locators;

// Re-export commonly used items
pub use error::{LocatorError, LocatorResult};
pub use location::{Location, MavenCoordinate, PluginLocation, ResourceLocation};
pub use locators::Locators;
