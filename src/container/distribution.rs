use std::collections::BTreeMap;

use crate::locator::Location;
use crate::version::Version;

/// Describes one server instance to provision: which version, which
/// plugins, which profile backups and which server properties.
///
/// Plain configuration data with a fluent mutation API; nothing here
/// talks to a server.
#[derive(Debug, Clone)]
pub struct SonarDistribution {
    version: Option<Version>,
    port: u16,
    context: String,
    plugin_locations: Vec<Location>,
    profile_backups: Vec<Location>,
    server_properties: BTreeMap<String, String>,
    licensed_plugin_keys: Vec<String>,
    remove_distributed_plugins: bool,
}

impl Default for SonarDistribution {
    fn default() -> Self {
        SonarDistribution {
            version: None,
            port: 0,
            context: "/sonar".to_string(),
            plugin_locations: Vec::new(),
            profile_backups: Vec::new(),
            server_properties: BTreeMap::new(),
            licensed_plugin_keys: Vec::new(),
            remove_distributed_plugins: true,
        }
    }
}

impl SonarDistribution {
    /// A distribution without a version yet
    pub fn new() -> Self {
        SonarDistribution::default()
    }

    pub fn set_version(&mut self, version: Version) -> &mut Self {
        self.version = Some(version);
        self
    }

    pub fn version(&self) -> Option<&Version> {
        self.version.as_ref()
    }

    pub fn is_release(&self) -> bool {
        self.version.as_ref().is_some_and(Version::is_release)
    }

    pub fn add_plugin_location(&mut self, plugin: Location) -> &mut Self {
        self.plugin_locations.push(plugin);
        self
    }

    pub fn plugin_locations(&self) -> &[Location] {
        &self.plugin_locations
    }

    /// Register a quality profile backup to restore when the server starts
    pub fn restore_profile_at_startup(&mut self, backup: Location) -> &mut Self {
        self.profile_backups.push(backup);
        self
    }

    pub fn profile_backups(&self) -> &[Location] {
        &self.profile_backups
    }

    pub fn set_server_property(&mut self, key: &str, value: &str) -> &mut Self {
        self.server_properties
            .insert(key.to_string(), value.to_string());
        self
    }

    pub fn remove_server_property(&mut self, key: &str) -> &mut Self {
        self.server_properties.remove(key);
        self
    }

    pub fn add_server_properties(&mut self, properties: &BTreeMap<String, String>) -> &mut Self {
        for (key, value) in properties {
            self.server_properties.insert(key.clone(), value.clone());
        }
        self
    }

    pub fn server_property(&self, key: &str) -> Option<&str> {
        self.server_properties.get(key).map(String::as_str)
    }

    pub fn server_properties(&self) -> &BTreeMap<String, String> {
        &self.server_properties
    }

    pub fn activate_license(&mut self, plugin_key: &str) -> &mut Self {
        self.licensed_plugin_keys.push(plugin_key.to_string());
        self
    }

    pub fn licensed_plugin_keys(&self) -> &[String] {
        &self.licensed_plugin_keys
    }

    pub fn set_port(&mut self, port: u16) -> &mut Self {
        self.port = port;
        self
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn set_context(&mut self, context: &str) -> &mut Self {
        self.context = context.to_string();
        self
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    pub fn set_remove_distributed_plugins(&mut self, remove: bool) -> &mut Self {
        self.remove_distributed_plugins = remove;
        self
    }

    pub fn remove_distributed_plugins(&self) -> bool {
        self.remove_distributed_plugins
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locator::PluginLocation;

    #[test]
    fn test_defaults() {
        let distribution = SonarDistribution::new();

        assert_eq!(distribution.version(), None);
        assert_eq!(distribution.port(), 0);
        assert_eq!(distribution.context(), "/sonar");
        assert!(distribution.plugin_locations().is_empty());
        assert!(distribution.remove_distributed_plugins());
        assert!(!distribution.is_release());
    }

    #[test]
    fn test_fluent_mutation() {
        let mut distribution = SonarDistribution::new();
        distribution
            .set_version("5.2".parse().unwrap())
            .set_port(9000)
            .set_context("/analysis")
            .set_server_property("sonar.jdbc.dialect", "h2")
            .activate_license("cobol");

        assert_eq!(distribution.version().unwrap().to_string(), "5.2");
        assert_eq!(distribution.port(), 9000);
        assert_eq!(distribution.context(), "/analysis");
        assert_eq!(
            distribution.server_property("sonar.jdbc.dialect"),
            Some("h2")
        );
        assert_eq!(distribution.licensed_plugin_keys(), ["cobol"]);
        assert!(distribution.is_release());
    }

    #[test]
    fn test_snapshot_version_is_not_a_release() {
        let mut distribution = SonarDistribution::new();
        distribution.set_version("5.2-SNAPSHOT".parse().unwrap());
        assert!(!distribution.is_release());
    }

    #[test]
    fn test_server_property_removal() {
        let mut distribution = SonarDistribution::new();
        distribution.set_server_property("sonar.web.port", "9000");
        distribution.remove_server_property("sonar.web.port");

        assert_eq!(distribution.server_property("sonar.web.port"), None);
    }

    #[test]
    fn test_plugin_and_profile_lists_keep_order() {
        let mut distribution = SonarDistribution::new();
        let cobol = PluginLocation::create("cobol", "1.4", "com.example", "cobol-plugin").unwrap();
        let java = PluginLocation::create("java", "3.0", "com.example", "java-plugin").unwrap();

        distribution
            .add_plugin_location(Location::Plugin(cobol))
            .add_plugin_location(Location::Plugin(java))
            .restore_profile_at_startup(Location::resource("backup.xml", b"<profile/>"));

        assert_eq!(distribution.plugin_locations().len(), 2);
        assert_eq!(distribution.profile_backups().len(), 1);
        assert_eq!(
            distribution.plugin_locations()[0].to_string(),
            "[cobol:1.4:com.example:cobol-plugin]"
        );
    }

    #[test]
    fn test_add_server_properties_merges() {
        let mut distribution = SonarDistribution::new();
        distribution.set_server_property("sonar.a", "1");

        let mut extra = BTreeMap::new();
        extra.insert("sonar.a".to_string(), "2".to_string());
        extra.insert("sonar.b".to_string(), "3".to_string());
        distribution.add_server_properties(&extra);

        assert_eq!(distribution.server_property("sonar.a"), Some("2"));
        assert_eq!(distribution.server_property("sonar.b"), Some("3"));
    }
}
