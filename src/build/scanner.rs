use async_trait::async_trait;
use std::collections::BTreeMap;
use std::fs;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::DEFAULT_TIMEOUT_SECONDS;
use super::error::BuildError;
use super::result::{BuildLogConsumer, BuildResult};
use crate::config::{Configuration, FileSystem};
use crate::locator::{Location, Locators, MavenCoordinate};
use crate::system::{Command, CommandExecutor, RealCommandExecutor};
use crate::version::Version;

/// Description of a scanner analysis over a project directory
#[derive(Debug, Clone)]
pub struct SonarScanner {
    project_dir: PathBuf,
    runner_version: Version,
    task: Option<String>,
    arguments: Vec<String>,
    properties: BTreeMap<String, String>,
    env: BTreeMap<String, String>,
    timeout_seconds: u64,
    debug_logs: bool,
}

impl SonarScanner {
    pub fn create() -> Self {
        SonarScanner {
            project_dir: PathBuf::from("."),
            runner_version: Version::of(2, 4),
            task: None,
            arguments: Vec::new(),
            properties: BTreeMap::new(),
            env: BTreeMap::new(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            debug_logs: false,
        }
    }

    pub fn set_project_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.project_dir = dir.into();
        self
    }

    pub fn set_runner_version(mut self, version: Version) -> Self {
        self.runner_version = version;
        self
    }

    /// Ask the scanner to run a named task instead of a plain analysis
    pub fn set_task(mut self, task: &str) -> Self {
        self.task = Some(task.to_string());
        self
    }

    pub fn set_project_key(self, key: &str) -> Self {
        self.set_property("sonar.projectKey", key)
    }

    pub fn set_project_name(self, name: &str) -> Self {
        self.set_property("sonar.projectName", name)
    }

    pub fn set_project_version(self, version: &str) -> Self {
        self.set_property("sonar.projectVersion", version)
    }

    pub fn set_sources(self, sources: &str) -> Self {
        self.set_property("sonar.sources", sources)
    }

    pub fn set_property(mut self, key: &str, value: &str) -> Self {
        self.properties.insert(key.to_string(), value.to_string());
        self
    }

    pub fn add_arguments(mut self, arguments: &[&str]) -> Self {
        self.arguments
            .extend(arguments.iter().map(|a| a.to_string()));
        self
    }

    pub fn set_env(mut self, key: &str, value: &str) -> Self {
        self.env.insert(key.to_string(), value.to_string());
        self
    }

    pub fn set_timeout_seconds(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    pub fn set_debug_logs(mut self, debug: bool) -> Self {
        self.debug_logs = debug;
        self
    }

    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    pub fn runner_version(&self) -> &Version {
        &self.runner_version
    }

    pub fn task(&self) -> Option<&str> {
        self.task.as_deref()
    }

    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }

    pub fn properties(&self) -> &BTreeMap<String, String> {
        &self.properties
    }

    pub fn env(&self) -> &BTreeMap<String, String> {
        &self.env
    }

    pub fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds
    }

    pub fn debug_logs(&self) -> bool {
        self.debug_logs
    }
}

/// Provisions a scanner distribution and hands back its launcher script
#[async_trait]
pub trait ScannerInstaller: Send + Sync {
    async fn install(&self, version: &Version, to_dir: &Path) -> Result<PathBuf, BuildError>;
}

/// Default installer: reuses an existing install under the installs
/// directory, otherwise fetches the distribution archive through the
/// locator and unpacks it there
pub struct SonarScannerInstaller {
    locators: Locators,
}

impl SonarScannerInstaller {
    pub fn new(locators: Locators) -> Self {
        SonarScannerInstaller { locators }
    }
}

#[async_trait]
impl ScannerInstaller for SonarScannerInstaller {
    async fn install(&self, version: &Version, to_dir: &Path) -> Result<PathBuf, BuildError> {
        let script = script_path(version, to_dir);
        if script.exists() {
            return Ok(script);
        }

        let coordinate = MavenCoordinate::builder()
            .set_group_id("org.codehaus.sonar.runner")
            .set_artifact_id("sonar-runner-dist")
            .set_version(&version.to_string())
            .set_packaging("tar")
            .build()
            .map_err(|e| BuildError::scanner_install(&version.to_string(), &e.to_string()))?;
        let archive = self
            .locators
            .locate(&Location::Maven(coordinate))
            .await
            .map_err(|e| BuildError::scanner_install(&version.to_string(), &e.to_string()))?;

        fs::create_dir_all(to_dir)
            .map_err(|e| BuildError::scanner_install(&version.to_string(), &e.to_string()))?;
        let file = File::open(&archive)
            .map_err(|e| BuildError::scanner_install(&version.to_string(), &e.to_string()))?;
        tar::Archive::new(file)
            .unpack(to_dir)
            .map_err(|e| BuildError::scanner_install(&version.to_string(), &e.to_string()))?;

        if script.exists() {
            Ok(script)
        } else {
            Err(BuildError::scanner_install(
                &version.to_string(),
                "distribution archive did not contain the launcher script",
            ))
        }
    }
}

fn script_path(version: &Version, to_dir: &Path) -> PathBuf {
    let script = if cfg!(windows) {
        "sonar-runner.bat"
    } else {
        "sonar-runner"
    };
    to_dir
        .join(format!("sonar-runner-{}", version))
        .join("bin")
        .join(script)
}

/// Runs a scanner analysis in the project directory
#[derive(Debug, Default)]
pub struct SonarScannerExecutor;

impl SonarScannerExecutor {
    pub fn new() -> Self {
        SonarScannerExecutor
    }

    pub async fn execute(
        &self,
        build: &SonarScanner,
        config: &Configuration,
        extra_properties: &BTreeMap<String, String>,
    ) -> Result<BuildResult, BuildError> {
        let installer = SonarScannerInstaller::new(Locators::new(config));
        self.execute_with(build, config, extra_properties, &installer, &RealCommandExecutor)
            .await
    }

    pub async fn execute_with(
        &self,
        build: &SonarScanner,
        config: &Configuration,
        extra_properties: &BTreeMap<String, String>,
        installer: &dyn ScannerInstaller,
        executor: &dyn CommandExecutor,
    ) -> Result<BuildResult, BuildError> {
        let fs = FileSystem::new(config)?;
        let script = installer
            .install(build.runner_version(), fs.sonar_installs_dir())
            .await?;

        let mut command = Command::new(script.display().to_string())
            .set_directory(build.project_dir());

        // Scanner 2.1 moved tasks to a positional argument and grew the -e flag
        if build.runner_version().is_greater_than_or_equals(&Version::of(2, 1)) {
            if let Some(task) = build.task() {
                command = command.arg(task);
            }
            command = command.arg("-e");
        } else if let Some(task) = build.task() {
            command = command.arg(format!("-Dsonar.task={}", task));
        }
        if build.debug_logs() {
            command = command.arg("-X");
        }

        let mut properties = build.properties().clone();
        for (key, value) in extra_properties {
            properties.insert(key.clone(), value.clone());
        }
        for (key, value) in &properties {
            command = command.arg(format!("-D{}={}", key, value));
        }
        for argument in build.arguments() {
            command = command.arg(argument);
        }

        if let Some(java_home) = fs.java_home() {
            command = command.set_env("JAVA_HOME", &java_home.display().to_string());
        }
        for (key, value) in build.env() {
            command = command.set_env(key, value);
        }

        let timeout = Duration::from_millis(build.timeout_seconds() * 1000);
        let mut result = BuildResult::new();
        let status = {
            let mut consumer = BuildLogConsumer::new(&mut result);
            executor
                .execute(&command, &mut consumer, timeout)
                .await
                .map_err(|e| BuildError::execution(&command.to_command_line(), e))?
        };
        result.set_status(status);
        Ok(result)
    }
}
