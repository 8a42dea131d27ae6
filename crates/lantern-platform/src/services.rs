//! Service traits and reference implementations.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use lantern_types::error::Result;
use lantern_types::key::Key;

// ---------------------------------------------------------------------------
// Expression evaluator
// ---------------------------------------------------------------------------

/// Abstraction over a live-expression evaluator.
///
/// Used as a fallback when input does not resolve to a registered command,
/// and by the `eval`/`run` built-ins. The engine degrades gracefully when no
/// evaluator is installed.
pub trait Evaluator {
    /// Evaluate an expression and return a printable representation of its
    /// result.
    fn evaluate(&mut self, code: &str) -> Result<String>;

    /// Execute a statement for its side effects.
    fn run(&mut self, code: &str) -> Result<()>;

    /// Make a namespace/using available to subsequent evaluations.
    fn add_using(&mut self, using: &str);
}

// ---------------------------------------------------------------------------
// Key input
// ---------------------------------------------------------------------------

/// Abstraction over the host's key state, polled once per tick.
pub trait KeyInput {
    /// `true` if the key transitioned down during this tick.
    fn is_key_down(&self, key: Key) -> bool;

    /// `true` if the key is currently held (including the tick it went down).
    fn is_key_held(&self, key: Key) -> bool;
}

// ---------------------------------------------------------------------------
// Preference store
// ---------------------------------------------------------------------------

/// A key-value preference store for persisted console settings.
pub trait PrefsStore {
    /// Fetch the value stored under `key`, if any.
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// In-memory preference store. State dies with the process; used in tests
/// and by hosts that persist elsewhere.
#[derive(Debug, Default)]
pub struct MemoryPrefs {
    values: HashMap<String, String>,
}

impl MemoryPrefs {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PrefsStore for MemoryPrefs {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// File-backed preference store: one JSON object per file, keys at the top
/// level. The whole map is rewritten on every `set`.
#[derive(Debug)]
pub struct FilePrefs {
    path: PathBuf,
    values: HashMap<String, String>,
}

impl FilePrefs {
    /// Open (or create) the store at `path`. A missing file is an empty
    /// store; a corrupt file is logged and treated as empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match fs::read_to_string(&path) {
            Ok(data) => match serde_json::from_str(&data) {
                Ok(map) => map,
                Err(e) => {
                    log::warn!("prefs file {} is corrupt, starting empty: {e}", path.display());
                    HashMap::new()
                },
            },
            Err(_) => HashMap::new(),
        };
        Self { path, values }
    }
}

impl PrefsStore for FilePrefs {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        let data = serde_json::to_string_pretty(&self.values)?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_prefs_set_get() {
        let mut prefs = MemoryPrefs::new();
        assert!(prefs.get("k").is_none());
        prefs.set("k", "v").unwrap();
        assert_eq!(prefs.get("k").as_deref(), Some("v"));
    }

    #[test]
    fn memory_prefs_set_replaces() {
        let mut prefs = MemoryPrefs::new();
        prefs.set("k", "first").unwrap();
        prefs.set("k", "second").unwrap();
        assert_eq!(prefs.get("k").as_deref(), Some("second"));
    }

    #[test]
    fn file_prefs_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        {
            let mut prefs = FilePrefs::open(&path);
            prefs.set("console", "{\"x\":1}").unwrap();
        }
        let reopened = FilePrefs::open(&path);
        assert_eq!(reopened.get("console").as_deref(), Some("{\"x\":1}"));
    }

    #[test]
    fn file_prefs_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let prefs = FilePrefs::open(dir.path().join("nope.json"));
        assert!(prefs.get("anything").is_none());
    }

    #[test]
    fn file_prefs_corrupt_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        fs::write(&path, "not json at all").unwrap();
        let prefs = FilePrefs::open(&path);
        assert!(prefs.get("anything").is_none());
    }
}
