//! Structured event logging for taskwrap.
//!
//! Two output channels:
//! - The event stream on stdout: lifecycle events and re-emitted child output,
//!   one record per event, console or JSON lines. Produced by [`EventLogger`].
//! - Wrapper diagnostics on stderr through `tracing`, filtered by
//!   `TASKWRAP_LOG` / `RUST_LOG` and quiet by default.
//!
//! # Usage
//!
//! ```no_run
//! use tw_core::logging::{event_names, Event, EventLogger, LogConfig};
//!
//! let config = LogConfig::from_env(None, None);
//! let mut logger = EventLogger::stdout(&config);
//! logger.log(Event::info(event_names::TASK_STARTED).with_field("command", "echo hi"));
//! ```
//!
//! # Design Notes
//!
//! - No global logger state: the logger is built from an explicit
//!   [`LogConfig`] and handed to whoever emits events.
//! - Events below the configured level never enter the pipeline.
//! - The writer is flushed after every record so lines appear as the child
//!   produces them.

pub mod config;
pub mod context;
pub mod events;
pub mod pipeline;
pub mod render;
pub mod sampler;

pub use config::{LogConfig, LogFormat, LogLevel};
pub use context::{ContextError, ContextInjector, ContextRule, DynamicContext, StaticContext};
pub use events::{event_names, Event, Level};
pub use pipeline::{Pipeline, Processed};
pub use render::Renderer;
pub use sampler::{Sampler, Sampling};

use std::io::{self, IsTerminal, Write};
use tracing::warn;
use tracing_subscriber::{fmt, EnvFilter};
use tw_redact::Redactor;

/// Environment variable controlling wrapper diagnostics on stderr.
pub const DIAGNOSTICS_ENV: &str = "TASKWRAP_LOG";

/// What happened to an event handed to [`EventLogger::log`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Written to the output stream.
    Rendered,
    /// Below the configured minimum level.
    Filtered,
    /// Dropped by the sampler.
    Sampled,
    /// Processed but the write failed.
    WriteFailed,
}

/// Severity gate, pipeline and renderer bound to one writer.
pub struct EventLogger<W = io::Stdout> {
    level: LogLevel,
    pipeline: Pipeline,
    renderer: Renderer,
    writer: W,
    write_failed: bool,
}

impl EventLogger<io::Stdout> {
    /// Logger writing to stdout, with static context resolved from the
    /// environment.
    pub fn stdout(config: &LogConfig) -> Self {
        let stdout = io::stdout();
        let is_terminal = stdout.is_terminal();
        let static_ctx = StaticContext::from_env(&config.context_rules);
        EventLogger::from_config(config, static_ctx, stdout, is_terminal)
    }
}

impl<W: Write> EventLogger<W> {
    pub fn new(level: LogLevel, pipeline: Pipeline, renderer: Renderer, writer: W) -> Self {
        EventLogger {
            level,
            pipeline,
            renderer,
            writer,
            write_failed: false,
        }
    }

    /// Logger for `config` with default redaction and an OS-seeded sampler.
    /// `is_terminal` tells whether `writer` is a terminal.
    pub fn from_config(
        config: &LogConfig,
        static_ctx: StaticContext,
        writer: W,
        is_terminal: bool,
    ) -> Self {
        let pipeline = Pipeline::new(
            static_ctx,
            Sampler::new(config.sample_rate),
            Redactor::default(),
        );
        let renderer = Renderer::from_config(config, is_terminal);
        EventLogger::new(config.level, pipeline, renderer, writer)
    }

    /// Bind per-run context for every later event.
    pub fn bind_dynamic(&mut self, dynamic: DynamicContext) -> Result<(), ContextError> {
        self.pipeline.bind_dynamic(dynamic)
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    /// Gate, process and render one event.
    pub fn log(&mut self, event: Event) -> Delivery {
        if !self.level.allows(event.level) {
            return Delivery::Filtered;
        }

        let event = match self.pipeline.process(event) {
            Processed::Emit(event) => event,
            Processed::Dropped => return Delivery::Sampled,
        };

        match self.renderer.write_to(&mut self.writer, &event) {
            Ok(()) => Delivery::Rendered,
            Err(err) => {
                // A closed stdout should not stop the child; report it once.
                if !self.write_failed {
                    warn!(error = %err, event = %event.name, "failed to write log record");
                    self.write_failed = true;
                }
                Delivery::WriteFailed
            }
        }
    }
}

/// Initialize wrapper diagnostics on stderr.
///
/// Respects `TASKWRAP_LOG`, then `RUST_LOG`; defaults to `warn`. Safe to call
/// more than once.
pub fn init_diagnostics() {
    let filter = EnvFilter::try_from_env(DIAGNOSTICS_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let use_ansi = io::stderr().is_terminal();
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .with_ansi(use_ansi)
        .try_init();
}
