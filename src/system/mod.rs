//! Process-boundary abstractions: command descriptions and executors

pub mod command;
pub mod commands;

// Re-export commonly used items
pub use command::Command;
pub use commands::{
    CommandExecutor, ConsoleConsumer, RealCommandExecutor, RecordedExecution,
    RecordingCommandExecutor, StreamConsumer,
};
