//! Foundation types for LANTERN.
//!
//! This crate contains the host-agnostic core types shared by all LANTERN
//! crates: colors, key identifiers, log severities and display filters, and
//! error types.

pub mod color;
pub mod error;
pub mod key;
pub mod level;

pub use color::Color;
pub use error::{LanternError, Result};
pub use key::Key;
pub use level::{LogFilter, LogLevel};
