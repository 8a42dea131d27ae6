//! Error types for LANTERN.

use std::io;

/// Errors produced by the LANTERN console engine.
#[derive(Debug, thiserror::Error)]
pub enum LanternError {
    /// A command with the same resolved name and arity already exists.
    #[error("a command named '{name}' taking {arity} argument(s) is already registered")]
    RegistrationConflict { name: String, arity: usize },

    /// No command or alias matched the input.
    #[error("could not find the specified command: {0}")]
    Lookup(String),

    /// Argument count does not match the declared parameter count.
    #[error("'{name}' expects {expected} argument(s) but got {actual}")]
    Arity {
        name: String,
        expected: usize,
        actual: usize,
    },

    /// A raw argument could not be converted to its declared type.
    #[error("could not convert '{raw}' to {target}")]
    Coercion { raw: String, target: String },

    /// The command's own action failed.
    #[error("command failed: {0}")]
    Callback(String),

    /// Key-binding registration or parsing failed.
    #[error("binding error: {0}")]
    Binding(String),

    /// The expression evaluator rejected the input (or none is installed).
    #[error("evaluator error: {0}")]
    Evaluator(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, LanternError>;
