use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::PathBuf;

use super::error::{LocatorError, LocatorResult};

/// Descriptor of where an artifact can be found; immutable once built
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Location {
    /// A file on the local filesystem
    File(PathBuf),
    /// A resource embedded into the harness binary
    Resource(ResourceLocation),
    /// An artifact identified by repository coordinates
    Maven(MavenCoordinate),
    /// A server plugin identified by key and version
    Plugin(PluginLocation),
}

impl Location {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Location::File(path.into())
    }

    pub fn resource(name: &str, bytes: &'static [u8]) -> Self {
        Location::Resource(ResourceLocation::new(name, bytes))
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::File(path) => write!(f, "{}", path.display()),
            Location::Resource(resource) => write!(f, "{}", resource.name()),
            Location::Maven(coordinate) => write!(f, "{}", coordinate),
            Location::Plugin(plugin) => write!(f, "{}", plugin),
        }
    }
}

/// A named blob of bytes compiled into the harness binary
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceLocation {
    name: String,
    bytes: &'static [u8],
}

impl ResourceLocation {
    pub fn new(name: &str, bytes: &'static [u8]) -> Self {
        ResourceLocation {
            name: name.to_string(),
            bytes,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bytes(&self) -> &'static [u8] {
        self.bytes
    }
}

/// Repository coordinates of an artifact
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MavenCoordinate {
    group_id: String,
    artifact_id: String,
    version: String,
    classifier: Option<String>,
    packaging: String,
}

impl MavenCoordinate {
    pub fn builder() -> MavenCoordinateBuilder {
        MavenCoordinateBuilder::new()
    }

    pub fn create(group_id: &str, artifact_id: &str, version: &str) -> LocatorResult<Self> {
        MavenCoordinate::builder()
            .set_group_id(group_id)
            .set_artifact_id(artifact_id)
            .set_version(version)
            .build()
    }

    pub fn group_id(&self) -> &str {
        &self.group_id
    }

    pub fn artifact_id(&self) -> &str {
        &self.artifact_id
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn classifier(&self) -> Option<&str> {
        self.classifier.as_deref()
    }

    pub fn packaging(&self) -> &str {
        &self.packaging
    }

    /// File name inside a repository: artifact-version[-classifier].packaging
    pub fn filename(&self) -> String {
        match &self.classifier {
            Some(classifier) => format!(
                "{}-{}-{}.{}",
                self.artifact_id, self.version, classifier, self.packaging
            ),
            None => format!("{}-{}.{}", self.artifact_id, self.version, self.packaging),
        }
    }

    /// Relative path inside a repository laid out the Maven way
    pub fn repository_path(&self) -> PathBuf {
        let mut path = PathBuf::new();
        for segment in self.group_id.split('.') {
            path.push(segment);
        }
        path.push(&self.artifact_id);
        path.push(&self.version);
        path.push(self.filename());
        path
    }
}

impl fmt::Display for MavenCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.group_id, self.artifact_id, self.version
        )?;
        if let Some(classifier) = &self.classifier {
            write!(f, ":{}", classifier)?;
        }
        Ok(())
    }
}

/// Builds a [`MavenCoordinate`], rejecting empty mandatory fields
#[derive(Debug, Default)]
pub struct MavenCoordinateBuilder {
    group_id: String,
    artifact_id: String,
    version: String,
    classifier: Option<String>,
    packaging: Option<String>,
}

impl MavenCoordinateBuilder {
    fn new() -> Self {
        MavenCoordinateBuilder::default()
    }

    pub fn set_group_id(mut self, group_id: &str) -> Self {
        self.group_id = group_id.to_string();
        self
    }

    pub fn set_artifact_id(mut self, artifact_id: &str) -> Self {
        self.artifact_id = artifact_id.to_string();
        self
    }

    pub fn set_version(mut self, version: &str) -> Self {
        self.version = version.to_string();
        self
    }

    pub fn set_classifier(mut self, classifier: &str) -> Self {
        self.classifier = Some(classifier.to_string());
        self
    }

    pub fn set_packaging(mut self, packaging: &str) -> Self {
        self.packaging = Some(packaging.to_string());
        self
    }

    pub fn build(self) -> LocatorResult<MavenCoordinate> {
        if self.group_id.is_empty() {
            return Err(LocatorError::invalid_location("group id must be set"));
        }
        if self.artifact_id.is_empty() {
            return Err(LocatorError::invalid_location("artifact id must be set"));
        }
        if self.version.is_empty() {
            return Err(LocatorError::invalid_location("version must be set"));
        }
        Ok(MavenCoordinate {
            group_id: self.group_id,
            artifact_id: self.artifact_id,
            version: self.version,
            classifier: self.classifier,
            packaging: self.packaging.unwrap_or_else(|| "jar".to_string()),
        })
    }
}

/// A server plugin backed by repository coordinates.
///
/// Two plugin locations denote the same logical artifact when their key
/// and version match, even if the coordinates differ.
#[derive(Debug, Clone)]
pub struct PluginLocation {
    key: String,
    coordinate: MavenCoordinate,
}

impl PluginLocation {
    pub fn builder() -> PluginLocationBuilder {
        PluginLocationBuilder::new()
    }

    pub fn create(
        key: &str,
        version: &str,
        group_id: &str,
        artifact_id: &str,
    ) -> LocatorResult<Self> {
        PluginLocation::builder()
            .set_key(key)
            .set_version(version)
            .set_group_id(group_id)
            .set_artifact_id(artifact_id)
            .build()
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn version(&self) -> &str {
        self.coordinate.version()
    }

    pub fn coordinate(&self) -> &MavenCoordinate {
        &self.coordinate
    }
}

impl PartialEq for PluginLocation {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.version() == other.version()
    }
}

impl Eq for PluginLocation {}

impl Hash for PluginLocation {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
        self.version().hash(state);
    }
}

impl fmt::Display for PluginLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}:{}:{}:{}]",
            self.key,
            self.version(),
            self.coordinate.group_id(),
            self.coordinate.artifact_id()
        )
    }
}

/// Builds a [`PluginLocation`]; the key is mandatory on top of the
/// coordinate fields
#[derive(Debug, Default)]
pub struct PluginLocationBuilder {
    key: String,
    coordinate: MavenCoordinateBuilder,
}

impl PluginLocationBuilder {
    fn new() -> Self {
        PluginLocationBuilder::default()
    }

    pub fn set_key(mut self, key: &str) -> Self {
        self.key = key.to_string();
        self
    }

    pub fn set_group_id(mut self, group_id: &str) -> Self {
        self.coordinate = self.coordinate.set_group_id(group_id);
        self
    }

    pub fn set_artifact_id(mut self, artifact_id: &str) -> Self {
        self.coordinate = self.coordinate.set_artifact_id(artifact_id);
        self
    }

    pub fn set_version(mut self, version: &str) -> Self {
        self.coordinate = self.coordinate.set_version(version);
        self
    }

    pub fn set_classifier(mut self, classifier: &str) -> Self {
        self.coordinate = self.coordinate.set_classifier(classifier);
        self
    }

    pub fn set_packaging(mut self, packaging: &str) -> Self {
        self.coordinate = self.coordinate.set_packaging(packaging);
        self
    }

    pub fn build(self) -> LocatorResult<PluginLocation> {
        if self.key.is_empty() {
            return Err(LocatorError::invalid_location("key must be set"));
        }
        Ok(PluginLocation {
            key: self.key,
            coordinate: self.coordinate.build()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::path::Path;

    #[test]
    fn test_plugin_locations_equal_on_key_and_version() {
        let first = PluginLocation::create("cobol", "1.4", "com.example", "cobol-plugin").unwrap();
        let second =
            PluginLocation::create("cobol", "1.4", "org.other", "renamed-artifact").unwrap();
        let third = PluginLocation::create("cobol", "1.5", "com.example", "cobol-plugin").unwrap();

        assert_eq!(first, second);
        assert_ne!(first, third);
    }

    #[test]
    fn test_plugin_location_hash_follows_equality() {
        let first = PluginLocation::create("java", "3.0", "com.example", "java-plugin").unwrap();
        let second = PluginLocation::create("java", "3.0", "org.other", "other-artifact").unwrap();

        let mut set = HashSet::new();
        set.insert(first);
        set.insert(second);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_plugin_location_requires_key() {
        let result = PluginLocation::builder()
            .set_version("1.0")
            .set_group_id("com.example")
            .set_artifact_id("plugin")
            .build();

        match result {
            Err(LocatorError::InvalidLocation { reason }) => {
                assert_eq!(reason, "key must be set");
            }
            other => panic!("Expected InvalidLocation, got {:?}", other),
        }
    }

    #[test]
    fn test_coordinate_requires_group_artifact_version() {
        assert!(MavenCoordinate::create("", "artifact", "1.0").is_err());
        assert!(MavenCoordinate::create("group", "", "1.0").is_err());
        assert!(MavenCoordinate::create("group", "artifact", "").is_err());
    }

    #[test]
    fn test_repository_path_layout() {
        let coordinate = MavenCoordinate::create("com.example.tools", "scanner", "2.4").unwrap();
        assert_eq!(
            coordinate.repository_path(),
            Path::new("com/example/tools/scanner/2.4/scanner-2.4.jar")
        );
    }

    #[test]
    fn test_filename_with_classifier_and_packaging() {
        let coordinate = MavenCoordinate::builder()
            .set_group_id("com.example")
            .set_artifact_id("dist")
            .set_version("1.1")
            .set_classifier("linux")
            .set_packaging("tar")
            .build()
            .unwrap();

        assert_eq!(coordinate.filename(), "dist-1.1-linux.tar");
    }

    #[test]
    fn test_plugin_location_display() {
        let plugin = PluginLocation::create("pli", "1.1", "com.example", "pli-plugin").unwrap();
        assert_eq!(plugin.to_string(), "[pli:1.1:com.example:pli-plugin]");
    }
}
