//! Developer console command engine.
//!
//! The console is a registry-based dispatch system: input lines are
//! tokenized, resolved against registered commands by name and arity, raw
//! arguments are coerced to each command's declared parameter types, and
//! the action runs with the typed values. Output lands in a bounded,
//! paginated scrollback. Suggestions, history, key bindings, and persisted
//! settings round out the interactive surface.
//!
//! Everything hangs off one explicitly-constructed [`ConsoleEngine`]; the
//! host injects its evaluator, key input, and preference store through the
//! traits in `lantern-platform`.

pub mod binding;
pub mod builtins;
pub mod coerce;
pub mod command;
pub mod engine;
pub mod history;
pub mod registry;
pub mod scrollback;
pub mod settings;
pub mod suggest;
pub mod token;

/// Key-combination-to-expression mapping.
pub use binding::{Binding, BindingSet};
/// Argument values and the coercion registry.
pub use coerce::{EnumSpec, ParamType, TypeCoercionRegistry, TypeKey, Value};
/// Command descriptors and action outputs.
pub use command::{Command, CommandId, CommandOutput, Parameter};
/// The owned console engine.
pub use engine::ConsoleEngine;
/// Ring of recent raw input lines.
pub use history::CommandHistory;
/// Command storage and best-arity-match resolution.
pub use registry::CommandRegistry;
/// Bounded, paginated output log and its thread-safe writer handle.
pub use scrollback::{LogPage, LogWriter, ScrollbackBuffer, ScrollbackConfig};
/// Persisted console settings.
pub use settings::ConsoleSettings;
/// Autocomplete suggestions.
pub use suggest::{Suggestion, SuggestionEngine};
