//! Sensitive key names.
//!
//! A value stored under one of these keys is replaced wholesale, at any depth.
//! Matching is case-insensitive.

use std::collections::HashSet;

/// Keys redacted by default.
pub const DEFAULT_SENSITIVE_KEYS: &[&str] = &[
    "password",
    "passwd",
    "pwd",
    "secret",
    "token",
    "apikey",
    "api_key",
    "authorization",
    "auth",
    "jwt",
    "bearer",
    "access_key",
    "secret_key",
];

/// Case-insensitive set of sensitive key names.
#[derive(Debug, Clone)]
pub struct SensitiveKeys {
    keys: HashSet<String>,
}

impl SensitiveKeys {
    /// Create an empty set.
    pub fn empty() -> Self {
        Self {
            keys: HashSet::new(),
        }
    }

    /// Add a key. Stored case-folded.
    pub fn insert(&mut self, key: &str) {
        self.keys.insert(key.to_lowercase());
    }

    /// Whether `key` names a sensitive field.
    pub fn contains(&self, key: &str) -> bool {
        // Fast path: most keys are already lowercase.
        self.keys.contains(key) || self.keys.contains(&key.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl Default for SensitiveKeys {
    fn default() -> Self {
        DEFAULT_SENSITIVE_KEYS.iter().copied().collect()
    }
}

impl<'a> FromIterator<&'a str> for SensitiveKeys {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut keys = SensitiveKeys::empty();
        for key in iter {
            keys.insert(key);
        }
        keys
    }
}
