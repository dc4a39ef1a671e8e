//! Recursive redaction of structured values.
//!
//! The Redactor walks a `serde_json::Value` once. For mappings it checks each
//! key against the sensitive set; a sensitive key gets [`REDACTED_MARKER`] and
//! its original value is never visited. Strings anywhere else are masked.
//! Numbers, booleans and null pass through.
//!
//! Keys are always strings in this value model and owned values cannot form
//! cycles, so every input is handled and the walk always terminates.

use crate::{MaskRule, MaskingEngine, SensitiveKeys};
use serde_json::{Map, Value};

/// Literal written in place of a sensitive value.
pub const REDACTED_MARKER: &str = "[REDACTED]";

/// Key-based redaction plus pattern masking.
#[derive(Debug, Clone, Default)]
pub struct Redactor {
    keys: SensitiveKeys,
    masker: MaskingEngine,
}

impl Redactor {
    /// Create a redactor from explicit parts.
    pub fn new(keys: SensitiveKeys, masker: MaskingEngine) -> Self {
        Self { keys, masker }
    }

    /// Add a sensitive key name.
    pub fn with_sensitive_key(mut self, key: &str) -> Self {
        self.keys.insert(key);
        self
    }

    /// Add a masking rule after the existing ones.
    pub fn with_mask_rule(mut self, rule: MaskRule) -> Self {
        self.masker = self.masker.with_rule(rule);
        self
    }

    pub fn sensitive_keys(&self) -> &SensitiveKeys {
        &self.keys
    }

    pub fn masker(&self) -> &MaskingEngine {
        &self.masker
    }

    /// Redact a borrowed value, returning a new one.
    pub fn redact(&self, value: &Value) -> Value {
        self.redact_value(value.clone())
    }

    /// Redact an owned value.
    pub fn redact_value(&self, value: Value) -> Value {
        match value {
            Value::Object(map) => Value::Object(self.redact_fields(map)),
            Value::Array(items) => {
                Value::Array(items.into_iter().map(|v| self.redact_value(v)).collect())
            }
            Value::String(s) => Value::String(self.masker.mask(&s)),
            other @ (Value::Null | Value::Bool(_) | Value::Number(_)) => other,
        }
    }

    /// Redact a field map. Key order is preserved.
    pub fn redact_fields(&self, fields: Map<String, Value>) -> Map<String, Value> {
        fields
            .into_iter()
            .map(|(key, value)| {
                if self.keys.contains(&key) {
                    (key, Value::String(REDACTED_MARKER.to_string()))
                } else {
                    let value = self.redact_value(value);
                    (key, value)
                }
            })
            .collect()
    }
}
