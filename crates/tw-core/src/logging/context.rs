//! Context injection.
//!
//! Two kinds of context are merged into every event:
//!
//! - **Static** context is resolved once per process from `field=SOURCE`
//!   rules. It only fills fields the event does not already set.
//! - **Dynamic** context (task id, process name, tool name) is bound once when
//!   the supervisor starts a task and always overwrites event fields.

use serde_json::{Map, Value};
use thiserror::Error;

/// Default static context rules.
///
/// `pod_name` appears twice: `POD_NAME` wins over `HOSTNAME` when both are set.
pub const DEFAULT_CONTEXT_VARS: &str = "pod_name=HOSTNAME,pod_name=POD_NAME,\
task_name=NXF_TASK_NAME,process=NXF_PROCESS,\
xray_trace_id=_X_AMZN_TRACE_ID";

pub const TASK_ID: &str = "task_id";
pub const PROCESS_NAME: &str = "process_name";
pub const TOOL_NAME: &str = "tool_name";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContextError {
    #[error("dynamic context is already bound")]
    AlreadyBound,
}

/// One static context rule: set `field` from the value of `source`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextRule {
    pub field: String,
    pub source: String,
}

impl ContextRule {
    pub fn new(field: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            source: source.into(),
        }
    }
}

/// Parse a comma-separated `field=SOURCE` list.
///
/// Pairs without `=` are ignored; only the first `=` splits.
pub fn parse_rules(list: &str) -> Vec<ContextRule> {
    let list = list.trim();
    if list.is_empty() {
        return Vec::new();
    }

    list.split(',')
        .filter_map(|pair| {
            let (field, source) = pair.trim().split_once('=')?;
            Some(ContextRule::new(field, source))
        })
        .collect()
}

/// Fields resolved once per process. Immutable after construction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StaticContext {
    fields: Map<String, Value>,
}

impl StaticContext {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Resolve rules against the process environment.
    pub fn from_env(rules: &[ContextRule]) -> Self {
        Self::resolve(rules, |name| std::env::var(name).ok())
    }

    /// Resolve rules in order. Empty or missing sources are skipped and a
    /// later rule for the same field overwrites an earlier one.
    pub fn resolve<F>(rules: &[ContextRule], lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut fields = Map::new();
        for rule in rules {
            match lookup(&rule.source) {
                Some(value) if !value.is_empty() => {
                    fields.insert(rule.field.clone(), Value::String(value));
                }
                _ => {}
            }
        }
        Self { fields }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(Value::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Per-run fields, bound once at supervisor startup.
#[derive(Debug, Clone, PartialEq)]
pub struct DynamicContext {
    fields: Map<String, Value>,
}

impl DynamicContext {
    /// Context for one wrapped task.
    pub fn for_task(task_id: &str, process_name: &str, tool_name: &str) -> Self {
        let mut fields = Map::new();
        fields.insert(TASK_ID.to_string(), Value::String(task_id.to_string()));
        fields.insert(PROCESS_NAME.to_string(), Value::String(process_name.to_string()));
        fields.insert(TOOL_NAME.to_string(), Value::String(tool_name.to_string()));
        Self { fields }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(Value::as_str)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }
}

/// Merges static and dynamic context into event fields.
#[derive(Debug, Clone, Default)]
pub struct ContextInjector {
    static_ctx: StaticContext,
    dynamic: Option<DynamicContext>,
}

impl ContextInjector {
    pub fn new(static_ctx: StaticContext) -> Self {
        Self {
            static_ctx,
            dynamic: None,
        }
    }

    /// Bind the dynamic context. Only the first call succeeds.
    pub fn bind(&mut self, dynamic: DynamicContext) -> Result<(), ContextError> {
        if self.dynamic.is_some() {
            return Err(ContextError::AlreadyBound);
        }
        self.dynamic = Some(dynamic);
        Ok(())
    }

    pub fn static_context(&self) -> &StaticContext {
        &self.static_ctx
    }

    pub fn dynamic_context(&self) -> Option<&DynamicContext> {
        self.dynamic.as_ref()
    }

    /// Apply static defaults, then dynamic overrides.
    pub fn inject(&self, fields: &mut Map<String, Value>) {
        for (key, value) in &self.static_ctx.fields {
            if !fields.contains_key(key) {
                fields.insert(key.clone(), value.clone());
            }
        }

        if let Some(dynamic) = &self.dynamic {
            for (key, value) in &dynamic.fields {
                fields.insert(key.clone(), value.clone());
            }
        }
    }
}
