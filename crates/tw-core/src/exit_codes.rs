//! Exit codes for taskwrap.
//!
//! The wrapper is transparent on the happy path: a child's own exit code is
//! passed through unchanged. Only outcomes the wrapper decides on its own use
//! the codes below.

/// Wrapper-level exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Child exited with code 0
    Success = 0,

    /// No command, capture failure, spawn failure, or no code available
    Failure = 1,
}

impl ExitCode {
    /// Convert to i32 for process exit.
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}
