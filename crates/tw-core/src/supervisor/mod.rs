//! Process supervision.
//!
//! Runs one command with stdout and stderr merged into a single pipe, turns
//! every non-blank output line into a `tool.output` event and maps the child's
//! termination onto a lifecycle event and an exit status.
//!
//! State machine:
//!
//! ```text
//! NotStarted ──(argv non-empty)──> Running ──> Succeeded
//!     │                               ├──────> Failed(code)
//!     └─(argv empty: wrapper.error)   └──────> Errored
//! ```
//!
//! A supervisor leaves `NotStarted` at most once.

mod lines;
pub mod quote;

pub use lines::OutputLines;

use crate::exit_codes::ExitCode;
use crate::logging::context::DynamicContext;
use crate::logging::{event_names, Event, EventLogger};
use std::io::{self, Write};
use std::process::{Command, ExitStatus, Stdio};
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, warn};

/// Reason reported when no command is given.
pub const NO_COMMAND: &str = "No command provided to execute.";

/// Reason reported when a supervisor is asked to run a second task.
pub const ALREADY_RAN: &str = "Supervisor has already run a task.";

/// Default task id when none is given.
pub const DEFAULT_TASK_ID: &str = "local";

/// Default process name when none is given.
pub const DEFAULT_PROCESS_NAME: &str = "unknown";

/// Supervisor lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisorState {
    NotStarted,
    Running,
    Succeeded,
    /// Child exited with a non-zero code.
    Failed(i32),
    /// Wrapper-side failure: capture, spawn, read, wait or signal.
    Errored,
}

/// Errors that end a supervised run.
#[derive(Debug, Error)]
pub enum SupervisorError {
    #[error("{0}")]
    Validation(String),

    #[error("failed to capture child output")]
    Capture(#[source] io::Error),

    #[error("command '{command}' returned non-zero exit status {code}")]
    ChildExit { command: String, code: i32 },

    #[error("failed to spawn '{program}'")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to read child output")]
    Read(#[source] io::Error),

    #[error("failed to wait for child")]
    Wait(#[source] io::Error),

    #[error("command '{command}' terminated without an exit code")]
    Signal {
        command: String,
        signal: Option<i32>,
    },
}

impl SupervisorError {
    /// Stable error name shown in `exc_info`.
    pub fn kind(&self) -> &'static str {
        match self {
            SupervisorError::Validation(_) => "ValidationError",
            SupervisorError::Capture(_) => "CaptureError",
            SupervisorError::ChildExit { .. } => "ChildExitError",
            SupervisorError::Spawn { .. }
            | SupervisorError::Read(_)
            | SupervisorError::Wait(_)
            | SupervisorError::Signal { .. } => "UnhandledError",
        }
    }

    /// Process exit status for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            SupervisorError::ChildExit { code, .. } => *code,
            _ => ExitCode::Failure.as_i32(),
        }
    }

    /// Signal that terminated the child, if any.
    pub fn signal(&self) -> Option<i32> {
        match self {
            SupervisorError::Signal { signal, .. } => *signal,
            _ => None,
        }
    }

    /// `Kind: message` followed by one `Caused by:` line per source.
    pub fn exc_info(&self) -> String {
        let mut out = format!("{}: {}", self.kind(), self);
        let mut source = std::error::Error::source(self);
        while let Some(err) = source {
            out.push_str("\nCaused by: ");
            out.push_str(&err.to_string());
            source = err.source();
        }
        out
    }
}

/// One task to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSpec {
    pub task_id: String,
    pub process_name: String,
    pub argv: Vec<String>,
}

impl TaskSpec {
    pub fn new<I, S>(argv: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            task_id: DEFAULT_TASK_ID.to_string(),
            process_name: DEFAULT_PROCESS_NAME.to_string(),
            argv: argv.into_iter().map(Into::into).collect(),
        }
    }

    pub fn with_task_id(mut self, task_id: impl Into<String>) -> Self {
        self.task_id = task_id.into();
        self
    }

    pub fn with_process_name(mut self, process_name: impl Into<String>) -> Self {
        self.process_name = process_name.into();
        self
    }
}

/// Runs one task and reports it through an [`EventLogger`].
pub struct Supervisor<W = io::Stdout> {
    logger: EventLogger<W>,
    state: SupervisorState,
}

impl<W: Write> Supervisor<W> {
    pub fn new(logger: EventLogger<W>) -> Self {
        Self {
            logger,
            state: SupervisorState::NotStarted,
        }
    }

    pub fn state(&self) -> SupervisorState {
        self.state
    }

    pub fn logger(&self) -> &EventLogger<W> {
        &self.logger
    }

    pub fn into_logger(self) -> EventLogger<W> {
        self.logger
    }

    /// Run the task to completion and return the process exit status.
    ///
    /// A supervisor runs at most one task: once a task has started, later
    /// calls emit `wrapper.error` and return 1 without spawning anything.
    pub fn run(&mut self, task: &TaskSpec) -> i32 {
        if self.state != SupervisorState::NotStarted {
            return self.reject(SupervisorError::Validation(ALREADY_RAN.to_string()));
        }

        let Some(tool) = task.argv.first() else {
            return self.reject(SupervisorError::Validation(NO_COMMAND.to_string()));
        };

        let dynamic = DynamicContext::for_task(&task.task_id, &task.process_name, tool);
        if let Err(err) = self.logger.bind_dynamic(dynamic) {
            return self.reject(SupervisorError::Validation(err.to_string()));
        }

        self.state = SupervisorState::Running;
        let command = quote::join(&task.argv);
        self.logger
            .log(Event::info(event_names::TASK_STARTED).with_field("command", &command));

        let start = Instant::now();
        let mut output_lines: u64 = 0;
        let result = self.execute(&task.argv, &command, &mut output_lines);
        let duration_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(()) => {
                self.state = SupervisorState::Succeeded;
                self.logger.log(
                    Event::info(event_names::TASK_SUCCEEDED)
                        .with_field("exit_code", 0)
                        .with_field("duration_ms", duration_ms)
                        .with_field("output_lines", output_lines),
                );
                ExitCode::Success.as_i32()
            }
            Err(err) => {
                let code = err.exit_code();
                self.state = match err {
                    SupervisorError::ChildExit { code, .. } => SupervisorState::Failed(code),
                    _ => SupervisorState::Errored,
                };
                debug!(kind = err.kind(), error = %err, code, "task failed");

                let mut event = Event::error(event_names::TASK_FAILED)
                    .with_field("exit_code", code)
                    .with_field("exc_info", err.exc_info());
                if let Some(signal) = err.signal() {
                    event = event.with_field("signal", signal);
                }
                self.logger.log(
                    event
                        .with_field("duration_ms", duration_ms)
                        .with_field("output_lines", output_lines),
                );
                code
            }
        }
    }

    fn reject(&mut self, err: SupervisorError) -> i32 {
        self.logger
            .log(Event::error(event_names::WRAPPER_ERROR).with_field("reason", err.to_string()));
        err.exit_code()
    }

    fn execute(
        &mut self,
        argv: &[String],
        command: &str,
        output_lines: &mut u64,
    ) -> Result<(), SupervisorError> {
        let (reader, writer) = io::pipe().map_err(SupervisorError::Capture)?;
        let writer_err = writer.try_clone().map_err(SupervisorError::Capture)?;

        let program = &argv[0];
        debug!(program = %program, args = ?&argv[1..], "spawning child");

        let mut cmd = Command::new(program);
        cmd.args(&argv[1..])
            .stdin(Stdio::inherit())
            .stdout(writer)
            .stderr(writer_err);
        let spawned = cmd.spawn();
        // The parent's copies of the write end must be closed for EOF to arrive.
        drop(cmd);

        let mut child = spawned.map_err(|source| SupervisorError::Spawn {
            program: program.clone(),
            source,
        })?;

        let mut read_error = None;
        for line in OutputLines::new(reader) {
            match line {
                Ok(line) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    self.logger
                        .log(Event::info(event_names::TOOL_OUTPUT).with_field("raw_message", line));
                    *output_lines += 1;
                }
                Err(err) => {
                    warn!(error = %err, "reading child output failed");
                    read_error = Some(err);
                    break;
                }
            }
        }

        let status = child.wait().map_err(SupervisorError::Wait)?;
        debug!(status = %status, "child exited");

        if let Some(err) = read_error {
            return Err(SupervisorError::Read(err));
        }

        match status.code() {
            Some(0) => Ok(()),
            Some(code) => Err(SupervisorError::ChildExit {
                command: command.to_string(),
                code,
            }),
            None => Err(SupervisorError::Signal {
                command: command.to_string(),
                signal: termination_signal(&status),
            }),
        }
    }
}

#[cfg(unix)]
fn termination_signal(status: &ExitStatus) -> Option<i32> {
    use std::os::unix::process::ExitStatusExt;
    status.signal()
}

#[cfg(not(unix))]
fn termination_signal(_status: &ExitStatus) -> Option<i32> {
    None
}
