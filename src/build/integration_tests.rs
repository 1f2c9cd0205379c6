//! Integration tests for the configuration to build execution pipeline

#[cfg(test)]
mod integration_tests {
    use crate::build::maven::{MavenBuild, MavenBuildExecutor};
    use crate::build::scanner::{SonarScanner, SonarScannerExecutor, SonarScannerInstaller};
    use crate::config::{Configuration, FileSystem};
    use crate::locator::{Location, Locators, PluginLocation};
    use crate::system::RecordingCommandExecutor;
    use std::collections::{BTreeMap, HashMap};
    use std::fs;
    use std::io::Write;
    use std::path::Path;

    fn config_with(pairs: &[(&str, &str)]) -> Configuration {
        let values: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Configuration::builder().add_map("test", values).build()
    }

    #[tokio::test]
    async fn test_full_maven_pipeline() {
        let maven_home = tempfile::tempdir().unwrap();
        let pom = tempfile::Builder::new().suffix(".xml").tempfile().unwrap();
        let config = config_with(&[("maven.home", maven_home.path().to_str().unwrap())]);

        let build = MavenBuild::create(Location::file(pom.path()))
            .add_goal("clean")
            .add_sonar_goal()
            .set_timeout_seconds(30);
        let executor = RecordingCommandExecutor::with_output(
            0,
            &["[INFO] Scanning for projects...", "[INFO] BUILD SUCCESS"],
        );

        let result = MavenBuildExecutor::new()
            .execute_with(&build, &config, &BTreeMap::new(), &executor)
            .await
            .unwrap();

        assert!(result.is_success());
        assert!(result.logs().contains("[INFO] BUILD SUCCESS"));

        let executions = executor.executions();
        assert_eq!(executions.len(), 2);
        for execution in &executions {
            assert_eq!(
                execution.command.env().get("M2_HOME").map(String::as_str),
                maven_home.path().to_str()
            );
        }
    }

    #[tokio::test]
    async fn test_property_file_drives_the_filesystem() {
        let installs = tempfile::tempdir().unwrap();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[orchestrator]").unwrap();
        writeln!(file, "workspaceDir = \"pipeline-out\"").unwrap();
        writeln!(
            file,
            "sonarInstallsDir = \"{}\"",
            installs.path().display()
        )
        .unwrap();

        let config = Configuration::builder()
            .add_file(file.path())
            .unwrap()
            .build();
        let fs = FileSystem::new(&config).unwrap();

        assert_eq!(fs.workspace(), Path::new("pipeline-out"));
        assert_eq!(fs.sonar_installs_dir(), installs.path());
    }

    #[tokio::test]
    async fn test_scanner_pipeline_with_installed_distribution() {
        let installs = tempfile::tempdir().unwrap();
        let script_dir = installs.path().join("sonar-runner-2.1").join("bin");
        fs::create_dir_all(&script_dir).unwrap();
        let script_name = if cfg!(windows) {
            "sonar-runner.bat"
        } else {
            "sonar-runner"
        };
        fs::write(script_dir.join(script_name), "#!/bin/sh\n").unwrap();

        let project = tempfile::tempdir().unwrap();
        let config = config_with(&[(
            "orchestrator.sonarInstallsDir",
            installs.path().to_str().unwrap(),
        )]);
        let build = SonarScanner::create()
            .set_project_dir(project.path())
            .set_project_key("SAMPLE")
            .set_runner_version("2.1".parse().unwrap())
            .set_task("views")
            .set_timeout_seconds(30);

        let installer = SonarScannerInstaller::new(Locators::new(&config));
        let executor = RecordingCommandExecutor::new(0);
        let result = SonarScannerExecutor::new()
            .execute_with(&build, &config, &BTreeMap::new(), &installer, &executor)
            .await
            .unwrap();

        assert!(result.is_success());

        let executions = executor.executions();
        assert_eq!(executions.len(), 1);
        let command = &executions[0].command;
        assert_eq!(command.directory(), Some(project.path()));
        assert!(command.program().starts_with(installs.path().to_str().unwrap()));
        assert_eq!(command.arguments()[0], "views");
        assert!(command.arguments().contains(&"-e".to_string()));
    }

    #[tokio::test]
    async fn test_plugin_location_resolves_from_local_repository() {
        let repo = tempfile::tempdir().unwrap();
        let artifact_dir = repo.path().join("com/example/cobol-plugin/1.4");
        fs::create_dir_all(&artifact_dir).unwrap();
        fs::write(artifact_dir.join("cobol-plugin-1.4.jar"), b"jar").unwrap();

        let config = config_with(&[("maven.localRepository", repo.path().to_str().unwrap())]);
        let locators = Locators::new(&config);
        let plugin =
            PluginLocation::create("cobol", "1.4", "com.example", "cobol-plugin").unwrap();

        let located = locators.locate(&Location::Plugin(plugin)).await.unwrap();
        assert_eq!(located, artifact_dir.join("cobol-plugin-1.4.jar"));
    }
}
