//! taskwrap core library.
//!
//! Runs a command and turns its combined output into a sanitized, structured
//! event log:
//! - [`logging`]: event model, context injection, sampling, redaction, rendering
//! - [`supervisor`]: child process lifecycle mapped onto events and an exit status
//! - [`cli`]: command-line surface of the `taskwrap` binary

pub mod cli;
pub mod exit_codes;
pub mod logging;
pub mod supervisor;
