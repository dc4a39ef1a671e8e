//! Logging configuration.
//!
//! Supports configuration via:
//! - Environment variables (LOG_LEVEL, LOG_FORMAT, LOG_SAMPLE_RATE,
//!   LOG_CONTEXT_VARS, NO_COLOR)
//! - CLI flags (--log-level, --log-format, --no-color)
//!
//! Unparsable values fall back to the defaults rather than failing the run;
//! the wrapped command should not be blocked by a typo in a log setting.

use super::context::{parse_rules, ContextRule, DEFAULT_CONTEXT_VARS};
use super::events::Level;
use serde::{Deserialize, Serialize};

pub const ENV_LOG_LEVEL: &str = "LOG_LEVEL";
pub const ENV_LOG_FORMAT: &str = "LOG_FORMAT";
pub const ENV_LOG_SAMPLE_RATE: &str = "LOG_SAMPLE_RATE";
pub const ENV_LOG_CONTEXT_VARS: &str = "LOG_CONTEXT_VARS";
pub const ENV_NO_COLOR: &str = "NO_COLOR";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable console format (default).
    #[default]
    Console,
    /// One JSON object per line.
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "console" | "human" | "pretty" => Ok(LogFormat::Console),
            "json" | "jsonl" => Ok(LogFormat::Json),
            _ => Err(format!("unknown log format: {}", s)),
        }
    }
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormat::Console => write!(f, "console"),
            LogFormat::Json => write!(f, "json"),
        }
    }
}

/// Minimum severity filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Most verbose.
    Trace,
    /// Debug information.
    Debug,
    /// Standard operational info (default).
    #[default]
    Info,
    /// Warnings only.
    Warn,
    /// Errors only.
    Error,
    /// Completely silent.
    Off,
}

impl LogLevel {
    /// Whether an event at `level` passes this filter.
    pub fn allows(self, level: Level) -> bool {
        match self {
            LogLevel::Trace => true,
            LogLevel::Debug => level >= Level::Debug,
            LogLevel::Info => level >= Level::Info,
            LogLevel::Warn => level >= Level::Warn,
            LogLevel::Error => level >= Level::Error,
            LogLevel::Off => false,
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "trace" | "notset" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" | "critical" | "fatal" => Ok(LogLevel::Error),
            "off" | "none" | "quiet" => Ok(LogLevel::Off),
            _ => Err(format!("unknown log level: {}", s)),
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
            LogLevel::Off => write!(f, "off"),
        }
    }
}

/// Event log configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct LogConfig {
    /// Output format.
    pub format: LogFormat,
    /// Minimum severity rendered.
    pub level: LogLevel,
    /// Fraction of debug-tier events kept, in [0, 1].
    pub sample_rate: f64,
    /// Static context resolution rules, in order.
    pub context_rules: Vec<ContextRule>,
    /// Whether console output may use ANSI colors.
    pub color: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            format: LogFormat::Console,
            level: LogLevel::Info,
            sample_rate: 0.0,
            context_rules: parse_rules(DEFAULT_CONTEXT_VARS),
            color: true,
        }
    }
}

impl LogConfig {
    /// Create config from the process environment and CLI overrides.
    pub fn from_env(cli_level: Option<LogLevel>, cli_format: Option<LogFormat>) -> Self {
        Self::from_lookup(|key| std::env::var(key).ok(), cli_level, cli_format)
    }

    /// Create config from an arbitrary variable lookup and CLI overrides.
    pub fn from_lookup<F>(lookup: F, cli_level: Option<LogLevel>, cli_format: Option<LogFormat>) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = LogConfig::default();

        if let Some(level) = lookup(ENV_LOG_LEVEL).and_then(|v| v.parse::<LogLevel>().ok()) {
            config.level = level;
        }

        if let Some(format) = lookup(ENV_LOG_FORMAT).and_then(|v| v.parse::<LogFormat>().ok()) {
            config.format = format;
        }

        if let Some(rate) = lookup(ENV_LOG_SAMPLE_RATE).and_then(|v| v.trim().parse::<f64>().ok()) {
            config.sample_rate = clamp_rate(rate);
        }

        // Set-but-empty disables static context entirely.
        if let Some(list) = lookup(ENV_LOG_CONTEXT_VARS) {
            config.context_rules = parse_rules(&list);
        }

        if lookup(ENV_NO_COLOR).is_some_and(|v| !v.is_empty()) {
            config.color = false;
        }

        // CLI overrides take final precedence
        if let Some(level) = cli_level {
            config.level = level;
        }
        if let Some(format) = cli_format {
            config.format = format;
        }

        config
    }

    /// Set log format.
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Set log level.
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Set the debug sampling rate (clamped to [0, 1]).
    pub fn with_sample_rate(mut self, rate: f64) -> Self {
        self.sample_rate = clamp_rate(rate);
        self
    }

    /// Replace the static context rules.
    pub fn with_context_rules(mut self, rules: Vec<ContextRule>) -> Self {
        self.context_rules = rules;
        self
    }

    /// Enable or disable console colors.
    pub fn with_color(mut self, enabled: bool) -> Self {
        self.color = enabled;
        self
    }
}

/// Clamp a sampling rate to [0, 1]; NaN becomes 0.
pub fn clamp_rate(rate: f64) -> f64 {
    if rate.is_nan() {
        0.0
    } else {
        rate.clamp(0.0, 1.0)
    }
}
