//! Pattern masking for free text.
//!
//! Rules run in list order and each one rewrites the whole output of the
//! previous one, so the order of the rule list is part of its meaning.

use crate::{RedactionError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

/// Replacement written over every match.
pub const MASK_TOKEN: &str = "*****";

static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[a-zA-Z0-9_.+-]+@[a-zA-Z0-9-]+\.[a-zA-Z0-9-.]+").unwrap());

static AWS_ACCESS_KEY_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"AKIA[0-9A-Z]{16}").unwrap());

/// A single named masking rule.
#[derive(Debug, Clone)]
pub struct MaskRule {
    /// Short identifier, used in error messages.
    pub name: String,
    /// Pattern whose matches are replaced.
    pub pattern: Regex,
}

impl MaskRule {
    /// Compile a rule from a pattern string.
    pub fn new(name: &str, pattern: &str) -> Result<Self> {
        let pattern = Regex::new(pattern).map_err(|e| RedactionError::pattern(name, e))?;
        Ok(Self {
            name: name.to_string(),
            pattern,
        })
    }

    /// Email-like tokens (`local-part@domain.tld`).
    pub fn email() -> Self {
        Self {
            name: "email".to_string(),
            pattern: EMAIL.clone(),
        }
    }

    /// AWS access key ids (`AKIA` + 16 uppercase alphanumerics).
    pub fn aws_access_key_id() -> Self {
        Self {
            name: "aws_access_key_id".to_string(),
            pattern: AWS_ACCESS_KEY_ID.clone(),
        }
    }
}

/// Ordered list of masking rules.
#[derive(Debug, Clone)]
pub struct MaskingEngine {
    rules: Vec<MaskRule>,
}

impl MaskingEngine {
    /// Create an engine from an explicit rule list.
    pub fn new(rules: Vec<MaskRule>) -> Self {
        Self { rules }
    }

    /// Append a rule after the existing ones.
    pub fn with_rule(mut self, rule: MaskRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Rules in application order.
    pub fn rules(&self) -> &[MaskRule] {
        &self.rules
    }

    /// Mask every match of every rule.
    pub fn mask(&self, text: &str) -> String {
        let mut masked = Cow::Borrowed(text);
        for rule in &self.rules {
            let replaced = match rule.pattern.replace_all(&masked, MASK_TOKEN) {
                Cow::Owned(replaced) => Some(replaced),
                Cow::Borrowed(_) => None,
            };
            if let Some(replaced) = replaced {
                masked = Cow::Owned(replaced);
            }
        }
        masked.into_owned()
    }
}

impl Default for MaskingEngine {
    fn default() -> Self {
        Self::new(vec![MaskRule::email(), MaskRule::aws_access_key_id()])
    }
}
