use std::env;
use std::path::{Path, PathBuf};

use super::configuration::Configuration;
use super::error::{ConfigError, ConfigResult};

/// Well-known directories derived from layered configuration.
///
/// User-supplied paths are validated at construction and reported as fatal
/// errors when invalid; optional directories with no override stay `None`.
#[derive(Debug, Clone)]
pub struct FileSystem {
    workspace: PathBuf,
    maven_home: Option<PathBuf>,
    maven_binary: Option<String>,
    ant_home: Option<PathBuf>,
    java_home: Option<PathBuf>,
    maven_local_repository: Option<PathBuf>,
    sonar_installs_dir: PathBuf,
}

impl FileSystem {
    pub fn new(config: &Configuration) -> ConfigResult<Self> {
        let workspace =
            PathBuf::from(config.get_string_or("orchestrator.workspaceDir", "target"));

        let maven_home = resolve_directory(
            config,
            &["maven.home", "MAVEN_HOME", "M2_HOME"],
            "Maven home",
        )?;
        let maven_binary = init_maven_binary(config, maven_home.as_deref())?;
        let ant_home = resolve_directory(config, &["ant.home", "ANT_HOME"], "Ant home")?;

        let java_home = resolve_directory(config, &["java.home", "JAVA_HOME"], "Java home")?;
        if java_home.is_none() {
            eprintln!(
                "Warning: Java home is not set. Please set the property java.home or the env variable JAVA_HOME"
            );
        }

        let maven_local_repository = resolve_directory(
            config,
            &["maven.localRepository", "MAVEN_LOCAL_REPOSITORY"],
            "Maven local repository",
        )?;

        Ok(FileSystem {
            workspace,
            maven_home,
            maven_binary,
            ant_home,
            java_home,
            maven_local_repository,
            sonar_installs_dir: init_installs_dir(config),
        })
    }

    pub fn workspace(&self) -> &Path {
        &self.workspace
    }

    pub fn maven_home(&self) -> Option<&Path> {
        self.maven_home.as_deref()
    }

    pub fn maven_binary(&self) -> Option<&str> {
        self.maven_binary.as_deref()
    }

    pub fn ant_home(&self) -> Option<&Path> {
        self.ant_home.as_deref()
    }

    pub fn java_home(&self) -> Option<&Path> {
        self.java_home.as_deref()
    }

    pub fn maven_local_repository(&self) -> Option<&Path> {
        self.maven_local_repository.as_deref()
    }

    pub fn sonar_installs_dir(&self) -> &Path {
        &self.sonar_installs_dir
    }
}

/// Resolve the first non-empty candidate key to an existing directory
fn resolve_directory(
    config: &Configuration,
    keys: &[&str],
    name: &str,
) -> ConfigResult<Option<PathBuf>> {
    match config.get_string_by_keys(keys) {
        Some(value) => {
            let path = PathBuf::from(value);
            if path.is_dir() {
                Ok(Some(path))
            } else {
                Err(ConfigError::invalid_directory(name, value))
            }
        }
        None => Ok(None),
    }
}

fn init_maven_binary(
    config: &Configuration,
    maven_home: Option<&Path>,
) -> ConfigResult<Option<String>> {
    let Some(binary) = config.get_string_by_keys(&["maven.binary", "MAVEN_BINARY"]) else {
        return Ok(None);
    };

    let base = match maven_home {
        Some(home) => home.join("bin").join(binary),
        None => PathBuf::from("bin").join(binary),
    };
    let extensions: &[&str] = if cfg!(windows) {
        &["", ".cmd", ".bat"]
    } else {
        &[""]
    };
    for ext in extensions {
        let candidate = PathBuf::from(format!("{}{}", base.display(), ext));
        if candidate.is_file() {
            return Ok(Some(binary.to_string()));
        }
    }
    Err(ConfigError::invalid_binary(
        &base.display().to_string(),
        extensions,
    ))
}

/// The installs directory always resolves: explicit property, then
/// SONAR_USER_HOME, then a dot directory under the user home
fn init_installs_dir(config: &Configuration) -> PathBuf {
    if let Some(value) = config.get_string("orchestrator.sonarInstallsDir") {
        if !value.is_empty() {
            return PathBuf::from(value);
        }
    }
    if let Ok(sonar_user_home) = env::var("SONAR_USER_HOME") {
        if !sonar_user_home.is_empty() {
            return PathBuf::from(sonar_user_home).join("installs");
        }
    }
    user_home_dir().join(".sonar").join("installs")
}

pub(crate) fn user_home_dir() -> PathBuf {
    env::var("HOME")
        .or_else(|_| env::var("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::fs::File;

    fn config_with(pairs: &[(&str, &str)]) -> Configuration {
        let values: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Configuration::builder().add_map("test", values).build()
    }

    #[test]
    fn test_workspace_defaults_to_target() {
        let fs = FileSystem::new(&Configuration::create()).unwrap();
        assert_eq!(fs.workspace(), Path::new("target"));
    }

    #[test]
    fn test_workspace_from_config() {
        let fs =
            FileSystem::new(&config_with(&[("orchestrator.workspaceDir", "build-out")])).unwrap();
        assert_eq!(fs.workspace(), Path::new("build-out"));
    }

    #[test]
    fn test_maven_home_must_be_an_existing_directory() {
        let result = FileSystem::new(&config_with(&[("maven.home", "/does/not/exist")]));

        match result {
            Err(ConfigError::InvalidDirectory { name, value }) => {
                assert_eq!(name, "Maven home");
                assert_eq!(value, "/does/not/exist");
            }
            other => panic!("Expected InvalidDirectory, got {:?}", other),
        }
    }

    #[test]
    fn test_maven_home_accepts_existing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let fs = FileSystem::new(&config_with(&[(
            "maven.home",
            dir.path().to_str().unwrap(),
        )]))
        .unwrap();

        assert_eq!(fs.maven_home(), Some(dir.path()));
    }

    #[test]
    fn test_maven_home_falls_back_to_m2_home_key() {
        let dir = tempfile::tempdir().unwrap();
        let fs = FileSystem::new(&config_with(&[("M2_HOME", dir.path().to_str().unwrap())]))
            .unwrap();

        assert_eq!(fs.maven_home(), Some(dir.path()));
    }

    #[test]
    fn test_maven_binary_validated_against_maven_home() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("bin")).unwrap();
        File::create(dir.path().join("bin").join("mvn3")).unwrap();

        let fs = FileSystem::new(&config_with(&[
            ("maven.home", dir.path().to_str().unwrap()),
            ("maven.binary", "mvn3"),
        ]))
        .unwrap();

        assert_eq!(fs.maven_binary(), Some("mvn3"));
    }

    #[test]
    fn test_missing_maven_binary_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let result = FileSystem::new(&config_with(&[
            ("maven.home", dir.path().to_str().unwrap()),
            ("maven.binary", "mvn-nope"),
        ]));

        assert!(matches!(result, Err(ConfigError::InvalidBinary { .. })));
    }

    #[test]
    fn test_empty_maven_binary_treated_as_unset() {
        let dir = tempfile::tempdir().unwrap();
        let fs = FileSystem::new(&config_with(&[
            ("maven.home", dir.path().to_str().unwrap()),
            ("maven.binary", ""),
        ]))
        .unwrap();

        assert_eq!(fs.maven_binary(), None);
    }

    #[test]
    fn test_java_home_unset_resolves_to_none() {
        let fs = FileSystem::new(&Configuration::create()).unwrap();
        assert_eq!(fs.java_home(), None);
    }

    #[test]
    fn test_installs_dir_from_config() {
        let fs = FileSystem::new(&config_with(&[(
            "orchestrator.sonarInstallsDir",
            "/opt/sonar/installs",
        )]))
        .unwrap();

        assert_eq!(fs.sonar_installs_dir(), Path::new("/opt/sonar/installs"));
    }

    #[test]
    fn test_installs_dir_always_resolves() {
        let fs = FileSystem::new(&Configuration::create()).unwrap();
        assert!(fs.sonar_installs_dir().ends_with("installs"));
    }
}
