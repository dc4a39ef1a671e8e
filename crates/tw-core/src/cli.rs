//! Command-line surface of the `taskwrap` binary.

use crate::logging::{LogConfig, LogFormat, LogLevel};
use crate::supervisor::{TaskSpec, DEFAULT_PROCESS_NAME, DEFAULT_TASK_ID};
use clap::Parser;

/// Run a command and turn its output into a structured event log
#[derive(Parser, Debug)]
#[command(name = "taskwrap")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Task identifier attached to every event
    #[arg(long, default_value = DEFAULT_TASK_ID)]
    pub task_id: String,

    /// Process name attached to every event
    #[arg(long, default_value = DEFAULT_PROCESS_NAME)]
    pub process_name: String,

    /// Minimum level rendered (overrides LOG_LEVEL)
    #[arg(long)]
    pub log_level: Option<LogLevel>,

    /// Output format: console or json (overrides LOG_FORMAT)
    #[arg(long)]
    pub log_format: Option<LogFormat>,

    /// Disable colored console output
    #[arg(long)]
    pub no_color: bool,

    /// Command to run, passed through verbatim
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "COMMAND")]
    pub command: Vec<String>,
}

impl Cli {
    /// Task described by the parsed arguments.
    pub fn task(&self) -> TaskSpec {
        TaskSpec::new(self.command.iter().cloned())
            .with_task_id(&self.task_id)
            .with_process_name(&self.process_name)
    }

    /// Environment configuration with command-line overrides applied.
    pub fn log_config(&self) -> LogConfig {
        let config = LogConfig::from_env(self.log_level, self.log_format);
        if self.no_color {
            config.with_color(false)
        } else {
            config
        }
    }
}
