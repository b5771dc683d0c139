//! CLI command implementations.

pub mod get;

/// Result of a lookup command, mapped to the process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The key resolved to a value.
    Found,
    /// The key has no value in the backend.
    Missing,
}
