use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::DEFAULT_TIMEOUT_SECONDS;
use super::error::BuildError;
use super::result::{BuildLogConsumer, BuildResult};
use crate::config::{Configuration, FileSystem};
use crate::locator::{Location, Locators};
use crate::system::{Command, CommandExecutor, RealCommandExecutor};

/// Description of a Maven build: which pom, which goals, which properties
#[derive(Debug, Clone)]
pub struct MavenBuild {
    pom: Location,
    goals: Vec<String>,
    arguments: Vec<String>,
    properties: BTreeMap<String, String>,
    env: BTreeMap<String, String>,
    timeout_seconds: u64,
    debug_logs: bool,
}

impl MavenBuild {
    pub fn create(pom: Location) -> Self {
        MavenBuild {
            pom,
            goals: Vec::new(),
            arguments: Vec::new(),
            properties: BTreeMap::new(),
            env: BTreeMap::new(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            debug_logs: false,
        }
    }

    pub fn add_goal(mut self, goal: &str) -> Self {
        self.goals.push(goal.to_string());
        self
    }

    /// Add the analysis goal understood by the server's Maven plugin
    pub fn add_sonar_goal(self) -> Self {
        self.add_goal("sonar:sonar")
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

    pub fn set_debug_logs(mut self, debug: bool) -> Self {
        self.debug_logs = debug;
        self
    }

    pub fn pom(&self) -> &Location {
        &self.pom
    }

    pub fn goals(&self) -> &[String] {
        &self.goals
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

/// Runs a Maven build one goal at a time, stopping at the first failure
#[derive(Debug, Default)]
pub struct MavenBuildExecutor;

impl MavenBuildExecutor {
    pub fn new() -> Self {
        MavenBuildExecutor
    }

    pub async fn execute(
        &self,
        build: &MavenBuild,
        config: &Configuration,
        extra_properties: &BTreeMap<String, String>,
    ) -> Result<BuildResult, BuildError> {
        self.execute_with(build, config, extra_properties, &RealCommandExecutor)
            .await
    }

    pub async fn execute_with(
        &self,
        build: &MavenBuild,
        config: &Configuration,
        extra_properties: &BTreeMap<String, String>,
        executor: &dyn CommandExecutor,
    ) -> Result<BuildResult, BuildError> {
        let fs = FileSystem::new(config)?;
        let locators = Locators::new(config);
        let pom = locators.locate(build.pom()).await?;
        let program = mvn_path(fs.maven_home(), fs.maven_binary());

        let mut properties = build.properties().clone();
        for (key, value) in extra_properties {
            properties.insert(key.clone(), value.clone());
        }

        let timeout = Duration::from_millis(build.timeout_seconds() * 1000);
        let mut result = BuildResult::new();
        for goal in build.goals() {
            let mut command = Command::new(program.display().to_string())
                .arg("-f")
                .arg(pom.display().to_string());
            if build.debug_logs() {
                command = command.arg("-X");
            }
            for (key, value) in &properties {
                command = command.arg(format!("-D{}={}", key, value));
            }
            for argument in build.arguments() {
                command = command.arg(argument);
            }
            command = command.arg(goal);

            if let Some(maven_home) = fs.maven_home() {
                command = command.set_env("M2_HOME", &maven_home.display().to_string());
            }
            if let Some(java_home) = fs.java_home() {
                command = command.set_env("JAVA_HOME", &java_home.display().to_string());
            }
            for (key, value) in build.env() {
                command = command.set_env(key, value);
            }

            let status = {
                let mut consumer = BuildLogConsumer::new(&mut result);
                executor
                    .execute(&command, &mut consumer, timeout)
                    .await
                    .map_err(|e| BuildError::execution(&command.to_command_line(), e))?
            };
            result.set_status(status);
            if status != 0 {
                break;
            }
        }
        Ok(result)
    }
}

/// Path of the Maven binary: home/bin/<binary> (default "mvn", Windows
/// script extension appended), or the bare name when no home is configured
pub(crate) fn mvn_path(maven_home: Option<&Path>, binary: Option<&str>) -> PathBuf {
    let name = match binary {
        Some(b) if !b.is_empty() => b,
        _ => "mvn",
    };
    let name = if cfg!(windows) {
        format!("{}.cmd", name)
    } else {
        name.to_string()
    };
    match maven_home {
        Some(home) => home.join("bin").join(name),
        None => PathBuf::from(name),
    }
}
