use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// An external command: program, ordered arguments, optional working
/// directory and environment additions.
///
/// Environment additions iterate sorted by key so a command renders the
/// same way on every run.
#[derive(Debug, Clone)]
pub struct Command {
    program: String,
    arguments: Vec<String>,
    directory: Option<PathBuf>,
    env: BTreeMap<String, String>,
}

impl Command {
    pub fn new(program: impl Into<String>) -> Self {
        Command {
            program: program.into(),
            arguments: Vec::new(),
            directory: None,
            env: BTreeMap::new(),
        }
    }

    pub fn arg(mut self, argument: impl Into<String>) -> Self {
        self.arguments.push(argument.into());
        self
    }

    pub fn set_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = Some(directory.into());
        self
    }

    pub fn set_env(mut self, key: &str, value: &str) -> Self {
        self.env.insert(key.to_string(), value.to_string());
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }

    pub fn directory(&self) -> Option<&Path> {
        self.directory.as_deref()
    }

    pub fn env(&self) -> &BTreeMap<String, String> {
        &self.env
    }

    /// Render the command for display and assertions, quoting tokens that
    /// contain spaces
    pub fn to_command_line(&self) -> String {
        let mut line = quote(&self.program);
        for argument in &self.arguments {
            line.push(' ');
            line.push_str(&quote(argument));
        }
        line
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_command_line())
    }
}

fn quote(token: &str) -> String {
    if token.contains(' ') {
        format!("\"{}\"", token)
    } else {
        token.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_line_joins_program_and_arguments() {
        let command = Command::new("mvn").arg("-f").arg("pom.xml").arg("clean");
        assert_eq!(command.to_command_line(), "mvn -f pom.xml clean");
    }

    #[test]
    fn test_command_line_quotes_tokens_with_spaces() {
        let command = Command::new("mvn").arg("-f").arg("/home/build dir/pom.xml");
        assert_eq!(
            command.to_command_line(),
            "mvn -f \"/home/build dir/pom.xml\""
        );
    }

    #[test]
    fn test_arguments_keep_insertion_order() {
        let command = Command::new("ant").arg("-f").arg("build.xml").arg("compile").arg("test");
        assert_eq!(command.arguments(), ["-f", "build.xml", "compile", "test"]);
    }

    #[test]
    fn test_env_iterates_sorted_by_key() {
        let command = Command::new("mvn")
            .set_env("M2_HOME", "/opt/maven")
            .set_env("JAVA_HOME", "/opt/java");

        let keys: Vec<&str> = command.env().keys().map(String::as_str).collect();
        assert_eq!(keys, ["JAVA_HOME", "M2_HOME"]);
    }
}
