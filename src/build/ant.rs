use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::DEFAULT_TIMEOUT_SECONDS;
use super::error::BuildError;
use super::result::{BuildLogConsumer, BuildResult};
use crate::config::{Configuration, FileSystem};
use crate::locator::{Location, Locators};
use crate::system::{Command, CommandExecutor, RealCommandExecutor};

/// Description of an Ant build: build file, targets and properties
#[derive(Debug, Clone)]
pub struct AntBuild {
    build_file: Location,
    targets: Vec<String>,
    arguments: Vec<String>,
    properties: BTreeMap<String, String>,
    env: BTreeMap<String, String>,
    timeout_seconds: u64,
    verbose: bool,
}

impl AntBuild {
    pub fn create(build_file: Location) -> Self {
        AntBuild {
            build_file,
            targets: Vec::new(),
            arguments: Vec::new(),
            properties: BTreeMap::new(),
            env: BTreeMap::new(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            verbose: false,
        }
    }

    pub fn add_target(mut self, target: &str) -> Self {
        self.targets.push(target.to_string());
        self
    }

    pub fn add_arguments(mut self, arguments: &[&str]) -> Self {
        self.arguments
            .extend(arguments.iter().map(|a| a.to_string()));
        self
    }

    pub fn set_property(mut self, key: &str, value: &str) -> Self {
        self.properties.insert(key.to_string(), value.to_string());
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

    pub fn set_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn build_file(&self) -> &Location {
        &self.build_file
    }

    pub fn targets(&self) -> &[String] {
        &self.targets
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

    pub fn verbose(&self) -> bool {
        self.verbose
    }
}

/// Runs an Ant build as a single command covering all targets
#[derive(Debug, Default)]
pub struct AntBuildExecutor;

impl AntBuildExecutor {
    pub fn new() -> Self {
        AntBuildExecutor
    }

    pub async fn execute(
        &self,
        build: &AntBuild,
        config: &Configuration,
        extra_properties: &BTreeMap<String, String>,
    ) -> Result<BuildResult, BuildError> {
        self.execute_with(build, config, extra_properties, &RealCommandExecutor)
            .await
    }

    pub async fn execute_with(
        &self,
        build: &AntBuild,
        config: &Configuration,
        extra_properties: &BTreeMap<String, String>,
        executor: &dyn CommandExecutor,
    ) -> Result<BuildResult, BuildError> {
        let fs = FileSystem::new(config)?;
        let locators = Locators::new(config);
        let build_file = locators.locate(build.build_file()).await?;

        let mut properties = build.properties().clone();
        for (key, value) in extra_properties {
            properties.insert(key.clone(), value.clone());
        }

        let mut command = Command::new(ant_path(fs.ant_home()).display().to_string())
            .arg("-f")
            .arg(build_file.display().to_string());
        if build.verbose() {
            command = command.arg("-verbose");
        }
        for (key, value) in &properties {
            command = command.arg(format!("-D{}={}", key, value));
        }
        for argument in build.arguments() {
            command = command.arg(argument);
        }
        for target in build.targets() {
            command = command.arg(target);
        }

        if let Some(ant_home) = fs.ant_home() {
            command = command.set_env("ANT_HOME", &ant_home.display().to_string());
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

/// Path of the Ant launcher: home/bin/ant (Windows batch extension
/// appended), or the bare name when no home is configured
fn ant_path(ant_home: Option<&Path>) -> PathBuf {
    let name = if cfg!(windows) { "ant.bat" } else { "ant" };
    match ant_home {
        Some(home) => home.join("bin").join(name),
        None => PathBuf::from(name),
    }
}
