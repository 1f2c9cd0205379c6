use crate::system::{ConsoleConsumer, StreamConsumer};

/// Captured outcome of a build: full log text plus the final exit status.
/// Filled while the build runs, read-only for callers afterwards.
#[derive(Debug, Default)]
pub struct BuildResult {
    logs: String,
    status: Option<i32>,
}

impl BuildResult {
    pub fn new() -> Self {
        BuildResult::default()
    }

    /// Everything the build tool wrote to stdout and stderr
    pub fn logs(&self) -> &str {
        &self.logs
    }

    /// Exit code of the last executed command, if any ran
    pub fn status(&self) -> Option<i32> {
        self.status
    }

    pub fn is_success(&self) -> bool {
        self.status == Some(0)
    }

    pub(crate) fn append_log_line(&mut self, line: &str) {
        self.logs.push_str(line);
        self.logs.push('\n');
    }

    pub(crate) fn set_status(&mut self, status: i32) {
        self.status = Some(status);
    }
}

/// Appends captured lines to a build result while echoing them to the
/// terminal
pub(crate) struct BuildLogConsumer<'a> {
    result: &'a mut BuildResult,
    echo: ConsoleConsumer,
}

impl<'a> BuildLogConsumer<'a> {
    pub(crate) fn new(result: &'a mut BuildResult) -> Self {
        BuildLogConsumer {
            result,
            echo: ConsoleConsumer,
        }
    }
}

impl StreamConsumer for BuildLogConsumer<'_> {
    fn consume_line(&mut self, line: &str) {
        self.result.append_log_line(line);
        self.echo.consume_line(line);
    }
}
