//! Persisted console settings.
//!
//! The whole settings object is serialized to one JSON blob stored under a
//! single named key in the host's preference store. Loading tolerates a
//! missing key (fresh defaults) and a corrupt blob (logged, defaults).

use lantern_platform::PrefsStore;
use lantern_types::error::Result;
use lantern_types::level::LogFilter;
use serde::{Deserialize, Serialize};

use crate::binding::Binding;

/// Preference-store key holding the settings blob.
pub const SETTINGS_KEY: &str = "lantern.console";

/// Everything the console persists between sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsoleSettings {
    /// Which log severities the scrollback ingests.
    #[serde(default)]
    pub log_filter: LogFilter,
    /// Namespaces/usings auto-included for the expression evaluator.
    #[serde(default)]
    pub usings: Vec<String>,
    /// Master switch for key-binding evaluation.
    #[serde(default = "default_enabled")]
    pub bindings_enabled: bool,
    /// User-defined key bindings.
    #[serde(default)]
    pub bindings: Vec<Binding>,
}

fn default_enabled() -> bool {
    true
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self {
            log_filter: LogFilter::default(),
            usings: Vec::new(),
            bindings_enabled: true,
            bindings: Vec::new(),
        }
    }
}

impl ConsoleSettings {
    /// Load from the store. Missing key or corrupt blob yields defaults;
    /// corruption is logged.
    pub fn load(store: &dyn PrefsStore) -> Self {
        let Some(blob) = store.get(SETTINGS_KEY) else {
            return Self::default();
        };
        match serde_json::from_str(&blob) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("console settings blob is corrupt, using defaults: {e}");
                Self::default()
            },
        }
    }

    /// Serialize and store under [`SETTINGS_KEY`].
    pub fn save(&self, store: &mut dyn PrefsStore) -> Result<()> {
        let blob = serde_json::to_string(self)?;
        store.set(SETTINGS_KEY, &blob)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lantern_platform::MemoryPrefs;
    use lantern_types::key::Key;

    #[test]
    fn defaults() {
        let s = ConsoleSettings::default();
        assert!(s.bindings_enabled);
        assert!(s.usings.is_empty());
        assert!(s.bindings.is_empty());
        assert_eq!(s.log_filter, LogFilter::default());
    }

    #[test]
    fn save_load_roundtrip() {
        let mut store = MemoryPrefs::new();
        let mut s = ConsoleSettings::default();
        s.log_filter = LogFilter::ERROR | LogFilter::DEBUG;
        s.usings.push("Game.Debug".to_string());
        s.bindings_enabled = false;
        s.bindings.push(Binding {
            keys: vec![Key::F5],
            expression: "reload".into(),
        });
        s.save(&mut store).unwrap();

        let loaded = ConsoleSettings::load(&store);
        assert_eq!(loaded, s);
    }

    #[test]
    fn missing_key_loads_defaults() {
        let store = MemoryPrefs::new();
        assert_eq!(ConsoleSettings::load(&store), ConsoleSettings::default());
    }

    #[test]
    fn corrupt_blob_loads_defaults() {
        let mut store = MemoryPrefs::new();
        store.set(SETTINGS_KEY, "{{{ not json").unwrap();
        assert_eq!(ConsoleSettings::load(&store), ConsoleSettings::default());
    }

    #[test]
    fn partial_blob_fills_defaults() {
        let mut store = MemoryPrefs::new();
        store.set(SETTINGS_KEY, "{\"usings\":[\"X\"]}").unwrap();
        let loaded = ConsoleSettings::load(&store);
        assert_eq!(loaded.usings, vec!["X".to_string()]);
        assert!(loaded.bindings_enabled);
    }
}
