use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;

use super::error::{ConfigError, ConfigResult};

/// One named key/value source consulted during lookup
#[derive(Debug, Clone)]
struct Source {
    name: String,
    values: HashMap<String, String>,
}

/// Ordered merge of key/value sources into a single lookup.
///
/// Sources are consulted in the order they were added to the builder,
/// explicit overrides first; the first source defining a key wins.
#[derive(Debug, Clone, Default)]
pub struct Configuration {
    sources: Vec<Source>,
}

impl Configuration {
    /// An empty configuration
    pub fn create() -> Self {
        Configuration::default()
    }

    /// A configuration backed by a snapshot of the process environment
    pub fn create_env() -> Self {
        Configuration::builder().add_env_variables().build()
    }

    pub fn builder() -> ConfigurationBuilder {
        ConfigurationBuilder::new()
    }

    /// Walk sources in priority order and return the first value defined
    /// for the key, if any
    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.sources
            .iter()
            .find_map(|source| source.values.get(key).map(String::as_str))
    }

    /// Like [`get_string`](Self::get_string) with a fallback value
    pub fn get_string_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get_string(key).unwrap_or(default)
    }

    /// Try each candidate key in order and return the first non-empty
    /// resolved value
    pub fn get_string_by_keys(&self, keys: &[&str]) -> Option<&str> {
        keys.iter()
            .filter_map(|key| self.get_string(key))
            .find(|value| !value.is_empty())
    }

    /// Resolve a key the caller declared mandatory
    pub fn require_string(&self, key: &str) -> ConfigResult<String> {
        match self.get_string(key) {
            Some(value) if !value.is_empty() => Ok(value.to_string()),
            _ => Err(ConfigError::missing_property(key)),
        }
    }

    /// Names of the sources in consultation order
    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name.as_str()).collect()
    }
}

/// Assembles a [`Configuration`] from explicit properties, the process
/// environment, caller-supplied maps and TOML property files
#[derive(Debug, Default)]
pub struct ConfigurationBuilder {
    overrides: HashMap<String, String>,
    sources: Vec<Source>,
}

impl ConfigurationBuilder {
    fn new() -> Self {
        ConfigurationBuilder::default()
    }

    /// Set an explicit property; these take precedence over every source
    pub fn set_property(mut self, key: &str, value: &str) -> Self {
        self.overrides.insert(key.to_string(), value.to_string());
        self
    }

    /// Add a snapshot of the process environment as a source
    pub fn add_env_variables(mut self) -> Self {
        self.sources.push(Source {
            name: "env".to_string(),
            values: env::vars().collect(),
        });
        self
    }

    /// Add an arbitrary key/value map as a source
    pub fn add_map(mut self, name: &str, values: HashMap<String, String>) -> Self {
        self.sources.push(Source {
            name: name.to_string(),
            values,
        });
        self
    }

    /// Add a TOML property file as a source. Nested tables flatten into
    /// dotted keys; non-scalar values are skipped.
    pub fn add_file(mut self, path: &Path) -> ConfigResult<Self> {
        let display = path.display().to_string();
        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::property_file(&display, &e.to_string()))?;
        let table: toml::Table = content
            .parse()
            .map_err(|e: toml::de::Error| ConfigError::property_file(&display, &e.to_string()))?;

        let mut values = HashMap::new();
        flatten_table("", &table, &mut values);
        self.sources.push(Source {
            name: display,
            values,
        });
        Ok(self)
    }

    pub fn build(self) -> Configuration {
        let mut sources = Vec::with_capacity(self.sources.len() + 1);
        if !self.overrides.is_empty() {
            sources.push(Source {
                name: "overrides".to_string(),
                values: self.overrides,
            });
        }
        sources.extend(self.sources);
        Configuration { sources }
    }
}

fn flatten_table(prefix: &str, table: &toml::Table, into: &mut HashMap<String, String>) {
    for (key, value) in table {
        let full_key = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };
        match value {
            toml::Value::Table(nested) => flatten_table(&full_key, nested, into),
            toml::Value::String(s) => {
                into.insert(full_key, s.clone());
            }
            toml::Value::Integer(i) => {
                into.insert(full_key, i.to_string());
            }
            toml::Value::Float(x) => {
                into.insert(full_key, x.to_string());
            }
            toml::Value::Boolean(b) => {
                into.insert(full_key, b.to_string());
            }
            toml::Value::Datetime(d) => {
                into.insert(full_key, d.to_string());
            }
            toml::Value::Array(_) => {}
        }
    }
}
