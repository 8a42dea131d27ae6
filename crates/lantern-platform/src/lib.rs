//! Host service traits for LANTERN.
//!
//! The console engine never talks to the host directly. Everything it needs
//! from the outside world (expression evaluation, key state, persisted
//! preferences) comes in through the narrow traits defined here.

mod services;

pub use services::{Evaluator, FilePrefs, KeyInput, MemoryPrefs, PrefsStore};
