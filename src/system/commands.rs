use async_trait::async_trait;
use console::style;
use std::error::Error;
use std::process::Stdio;
use std::sync::Mutex;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command as TokioCommand;
use tokio::sync::mpsc;
use tokio::time;

use super::command::Command;

/// Receives every captured output line while a command runs
pub trait StreamConsumer: Send {
    fn consume_line(&mut self, line: &str);
}

/// Echoes captured lines to the terminal with a dim timestamp prefix
pub struct ConsoleConsumer;

impl StreamConsumer for ConsoleConsumer {
    fn consume_line(&mut self, line: &str) {
        let timestamp = chrono::Local::now().format("%H:%M:%S");
        println!("{} {}", style(timestamp).dim(), line);
    }
}

/// Abstraction for command execution to enable testing without real build
/// tools. Non-zero exit codes are returned as data; only a spawn failure
/// or a timeout is an error.
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    async fn execute(
        &self,
        command: &Command,
        consumer: &mut dyn StreamConsumer,
        timeout_duration: Duration,
    ) -> Result<i32, Box<dyn Error + Send + Sync>>;
}

/// Real command executor using tokio processes
pub struct RealCommandExecutor;

#[async_trait]
impl CommandExecutor for RealCommandExecutor {
    async fn execute(
        &self,
        command: &Command,
        consumer: &mut dyn StreamConsumer,
        timeout_duration: Duration,
    ) -> Result<i32, Box<dyn Error + Send + Sync>> {
        let mut process = TokioCommand::new(command.program());
        process
            .args(command.arguments())
            .envs(command.env())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(directory) = command.directory() {
            process.current_dir(directory);
        }

        let mut child = process
            .spawn()
            .map_err(|e| format!("Cannot execute {}: {}", command.to_command_line(), e))?;

        // Both output streams feed one channel so lines arrive as captured
        let (tx, mut rx) = mpsc::channel::<String>(100);
        if let Some(stdout) = child.stdout.take() {
            spawn_line_reader(stdout, tx.clone());
        }
        if let Some(stderr) = child.stderr.take() {
            spawn_line_reader(stderr, tx.clone());
        }
        drop(tx);

        let result = time::timeout(timeout_duration, async {
            while let Some(line) = rx.recv().await {
                consumer.consume_line(&line);
            }
            child.wait().await
        })
        .await;

        match result {
            Ok(Ok(status)) => Ok(status.code().unwrap_or(-1)),
            Ok(Err(e)) => {
                Err(format!("Command failed: {}: {}", command.to_command_line(), e).into())
            }
            Err(_) => {
                let _ = child.kill().await;
                Err(format!(
                    "Command timed out after {:?}: {}",
                    timeout_duration,
                    command.to_command_line()
                )
                .into())
            }
        }
    }
}

fn spawn_line_reader<R>(stream: R, tx: mpsc::Sender<String>)
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut lines = BufReader::new(stream).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if tx.send(line).await.is_err() {
                break;
            }
        }
    });
}

/// One command run recorded by [`RecordingCommandExecutor`]
#[derive(Debug, Clone)]
pub struct RecordedExecution {
    pub command: Command,
    pub timeout: Duration,
}

/// Test double that records every command and replies with canned output
/// and a canned exit code
pub struct RecordingCommandExecutor {
    exit_code: i32,
    output_lines: Vec<String>,
    executions: Mutex<Vec<RecordedExecution>>,
}

impl RecordingCommandExecutor {
    pub fn new(exit_code: i32) -> Self {
        RecordingCommandExecutor {
            exit_code,
            output_lines: Vec::new(),
            executions: Mutex::new(Vec::new()),
        }
    }

    pub fn with_output(exit_code: i32, lines: &[&str]) -> Self {
        RecordingCommandExecutor {
            exit_code,
            output_lines: lines.iter().map(|l| l.to_string()).collect(),
            executions: Mutex::new(Vec::new()),
        }
    }

    /// Every command executed so far, in order
    pub fn executions(&self) -> Vec<RecordedExecution> {
        self.executions.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandExecutor for RecordingCommandExecutor {
    async fn execute(
        &self,
        command: &Command,
        consumer: &mut dyn StreamConsumer,
        timeout_duration: Duration,
    ) -> Result<i32, Box<dyn Error + Send + Sync>> {
        for line in &self.output_lines {
            consumer.consume_line(line);
        }
        self.executions.lock().unwrap().push(RecordedExecution {
            command: command.clone(),
            timeout: timeout_duration,
        });
        Ok(self.exit_code)
    }
}
