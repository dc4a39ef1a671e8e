//! Redaction and masking engine for taskwrap log events.
//!
//! Every event the wrapper renders passes through this crate last, so
//! nothing downstream ever sees an unredacted value.
//!
//! # Key Features
//!
//! - **Key-based redaction**: values stored under sensitive keys (`password`,
//!   `token`, `authorization`, ...) are replaced wholesale with `[REDACTED]`,
//!   without looking inside them.
//! - **Pattern masking**: every remaining string is run through an ordered list
//!   of regex rules (emails, AWS access key ids, ...) that replace matches with
//!   `*****`.
//! - **Shape preserving**: redaction never adds or removes keys and never
//!   changes the length or order of sequences.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use tw_redact::Redactor;
//!
//! let redactor = Redactor::default();
//! let clean = redactor.redact(&json!({"password": "xyz", "note": "contact me@foo.com"}));
//! assert_eq!(clean, json!({"password": "[REDACTED]", "note": "contact *****"}));
//! ```

pub mod error;
pub mod keys;
pub mod mask;
pub mod redactor;

pub use error::{RedactionError, Result};
pub use keys::{SensitiveKeys, DEFAULT_SENSITIVE_KEYS};
pub use mask::{MaskRule, MaskingEngine, MASK_TOKEN};
pub use redactor::{Redactor, REDACTED_MARKER};
