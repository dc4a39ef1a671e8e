//! Event rendering.
//!
//! The renderer is the last consumer of an event. It never sees a dropped
//! event and never sees one that skipped redaction.

use super::config::{LogConfig, LogFormat};
use super::events::{reserved, Event, Level};
use chrono::SecondsFormat;
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::io::{self, Write};

/// Field printed on its own lines in console mode.
pub const EXC_INFO: &str = "exc_info";

/// Width of the event-name column in console mode.
const EVENT_PAD: usize = 30;

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const CYAN: &str = "\x1b[36m";
const MAGENTA: &str = "\x1b[35m";

/// Output renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Renderer {
    /// One JSON object per line, every field included.
    Json,
    /// Human-readable, optionally colored.
    Console { colors: bool },
}

impl Renderer {
    /// Pick a renderer for `config`. `is_terminal` tells whether the output
    /// stream is a terminal; colors are only used on one.
    pub fn from_config(config: &LogConfig, is_terminal: bool) -> Self {
        match config.format {
            LogFormat::Json => Renderer::Json,
            LogFormat::Console => Renderer::Console {
                colors: config.color && is_terminal,
            },
        }
    }

    /// Render to a string, without the trailing newline.
    pub fn render(&self, event: &Event) -> String {
        match self {
            Renderer::Json => render_json(event),
            Renderer::Console { colors } => render_console(event, *colors),
        }
    }

    /// Render one record and flush it.
    pub fn write_to<W: Write + ?Sized>(&self, writer: &mut W, event: &Event) -> io::Result<()> {
        let line = self.render(event);
        writeln!(writer, "{}", line)?;
        writer.flush()
    }
}

/// Build the JSON object for an event: reserved fields first, then the
/// event's fields in order. A field that shadows a reserved name is kept
/// under `field.<name>`, with more `field.` prefixes if that key is taken.
pub fn to_json_object(event: &Event) -> Map<String, Value> {
    let mut obj = Map::new();
    obj.insert(
        reserved::TIMESTAMP.to_string(),
        Value::String(format_timestamp(event)),
    );
    obj.insert(
        reserved::LEVEL.to_string(),
        Value::String(event.level.to_string()),
    );
    obj.insert(reserved::EVENT.to_string(), Value::String(event.name.clone()));

    for (key, value) in &event.fields {
        obj.insert(output_key(key, &event.fields).into_owned(), value.clone());
    }
    obj
}

fn render_json(event: &Event) -> String {
    let obj = Value::Object(to_json_object(event));
    serde_json::to_string(&obj).unwrap_or_else(|_| {
        format!(
            r#"{{"error":"serialization_failed","event":"{}"}}"#,
            event.name
        )
    })
}

fn render_console(event: &Event, colors: bool) -> String {
    let mut out = String::new();
    let ts = format_timestamp(event);
    let level = format!("{:<9}", event.level.as_str());

    if colors {
        out.push_str(&format!(
            "{DIM}{ts}{RESET} [{}{level}{RESET}] {BOLD}{:<EVENT_PAD$}{RESET}",
            level_color(event.level),
            event.name
        ));
    } else {
        out.push_str(&format!("{ts} [{level}] {:<EVENT_PAD$}", event.name));
    }

    let mut exc_info = None;
    for (key, value) in &event.fields {
        if key == EXC_INFO {
            exc_info = Some(value);
            continue;
        }
        let key = output_key(key, &event.fields);
        let value = console_value(value);
        if colors {
            out.push_str(&format!(" {CYAN}{key}{RESET}={MAGENTA}{value}{RESET}"));
        } else {
            out.push_str(&format!(" {key}={value}"));
        }
    }

    // Trailing padding from the event column is noise when no fields follow.
    let trimmed_len = out.trim_end().len();
    out.truncate(trimmed_len);

    if let Some(exc) = exc_info {
        let text = match exc {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        for line in text.lines() {
            out.push('\n');
            out.push_str(line);
        }
    }

    out
}

fn format_timestamp(event: &Event) -> String {
    event.timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn output_key<'a>(key: &'a str, fields: &Map<String, Value>) -> Cow<'a, str> {
    if !reserved::ALL.contains(&key) {
        return Cow::Borrowed(key);
    }
    // Each reserved name gets its own prefix chain, so only event keys can clash.
    let mut renamed = format!("field.{}", key);
    while fields.contains_key(&renamed) {
        renamed.insert_str(0, "field.");
    }
    Cow::Owned(renamed)
}

fn level_color(level: Level) -> &'static str {
    match level {
        Level::Trace => "\x1b[2m",
        Level::Debug => "\x1b[34m",
        Level::Info => "\x1b[32m",
        Level::Warn => "\x1b[33m",
        Level::Error => "\x1b[31;1m",
    }
}

fn console_value(value: &Value) -> String {
    match value {
        Value::String(s) if !needs_quoting(s) => s.clone(),
        other => other.to_string(),
    }
}

fn needs_quoting(s: &str) -> bool {
    s.is_empty()
        || s
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || matches!(c, '=' | '"' | '\''))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn fixed(event: Event) -> Event {
        Event {
            timestamp: Utc.with_ymd_and_hms(2026, 1, 15, 14, 30, 22).unwrap(),
            ..event
        }
    }

    #[test]
    fn test_json_leading_fields_and_order() {
        let event = fixed(
            Event::info("task.started")
                .with_field("command", "echo 'hello world'")
                .with_field("nested", json!({"a": [1, null, true]})),
        );
        let line = Renderer::Json.render(&event);
        assert_eq!(
            line,
            r#"{"timestamp":"2026-01-15T14:30:22.000000Z","level":"info","event":"task.started","command":"echo 'hello world'","nested":{"a":[1,null,true]}}"#
        );
    }

    #[test]
    fn test_json_shadowed_reserved_field_kept() {
        let event = fixed(Event::info("x").with_field("level", "custom"));
        let parsed: Value = serde_json::from_str(&Renderer::Json.render(&event)).unwrap();
        assert_eq!(parsed["level"], json!("info"));
        assert_eq!(parsed["field.level"], json!("custom"));
    }

    #[test]
    fn test_json_shadowed_field_never_overwrites_prefixed_field() {
        let event = fixed(
            Event::info("x")
                .with_field("level", "a")
                .with_field("field.level", "b")
                .with_field("field.field.level", "c"),
        );
        let parsed: Value = serde_json::from_str(&Renderer::Json.render(&event)).unwrap();
        let obj = parsed.as_object().unwrap();
        assert_eq!(obj.len(), 6);
        assert_eq!(parsed["level"], json!("info"));
        assert_eq!(parsed["field.field.field.level"], json!("a"));
        assert_eq!(parsed["field.level"], json!("b"));
        assert_eq!(parsed["field.field.level"], json!("c"));
    }

    #[test]
    fn test_console_shadowed_field_kept() {
        let event = fixed(Event::info("x").with_field("event", "a").with_field("field.event", "b"));
        let line = Renderer::Console { colors: false }.render(&event);
        assert!(line.ends_with(" field.field.event=a field.event=b"), "{}", line);
    }

    #[test]
    fn test_console_plain() {
        let event = fixed(
            Event::info("tool.output")
                .with_field("raw_message", "hello world")
                .with_field("task_id", "local")
                .with_field("exit_code", 0),
        );
        let line = Renderer::Console { colors: false }.render(&event);
        assert_eq!(
            line,
            format!(
                "2026-01-15T14:30:22.000000Z [info     ] {:<30} raw_message=\"hello world\" task_id=local exit_code=0",
                "tool.output"
            )
        );
    }

    #[test]
    fn test_console_no_fields_no_trailing_space() {
        let event = fixed(Event::warn("quiet"));
        let line = Renderer::Console { colors: false }.render(&event);
        assert_eq!(line, "2026-01-15T14:30:22.000000Z [warn     ] quiet");
    }

    #[test]
    fn test_console_exc_info_on_following_lines() {
        let event = fixed(
            Event::error("task.failed")
                .with_field("exc_info", "ChildExitError: exit 7\nCaused by: x")
                .with_field("exit_code", 7),
        );
        let line = Renderer::Console { colors: false }.render(&event);
        let lines: Vec<&str> = line.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].ends_with("exit_code=7"));
        assert_eq!(lines[1], "ChildExitError: exit 7");
        assert_eq!(lines[2], "Caused by: x");
    }

    #[test]
    fn test_console_colors() {
        let event = fixed(Event::error("boom").with_field("k", "v"));
        let line = Renderer::Console { colors: true }.render(&event);
        assert!(line.contains("\x1b[31;1m"));
        assert!(line.contains(RESET));
        let plain = Renderer::Console { colors: false }.render(&event);
        assert!(!plain.contains('\x1b'));
    }

    #[test]
    fn test_from_config_colors_need_terminal() {
        let config = LogConfig::default();
        assert_eq!(
            Renderer::from_config(&config, false),
            Renderer::Console { colors: false }
        );
        assert_eq!(
            Renderer::from_config(&config, true),
            Renderer::Console { colors: true }
        );
        assert_eq!(
            Renderer::from_config(&config.clone().with_color(false), true),
            Renderer::Console { colors: false }
        );
        assert_eq!(
            Renderer::from_config(&config.with_format(LogFormat::Json), true),
            Renderer::Json
        );
    }

    #[test]
    fn test_write_to_appends_newline() {
        let mut buf = Vec::new();
        Renderer::Json
            .write_to(&mut buf, &fixed(Event::info("a")))
            .unwrap();
        Renderer::Json
            .write_to(&mut buf, &fixed(Event::info("b")))
            .unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn test_needs_quoting() {
        assert!(needs_quoting(""));
        assert!(needs_quoting("a b"));
        assert!(needs_quoting("k=v"));
        assert!(needs_quoting("it's"));
        assert!(!needs_quoting("echo"));
        assert!(!needs_quoting("/usr/bin/env"));
    }
}
