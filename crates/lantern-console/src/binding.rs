//! Key bindings: key-combination-to-expression mappings.
//!
//! A binding fires when every key in its set is held and at least one of
//! them transitioned down this tick. Bindings are scanned in reverse
//! registration order and at most one fires per tick; later registrations
//! win on conflicting combinations.

use lantern_platform::KeyInput;
use lantern_types::error::{LanternError, Result};
use lantern_types::key::Key;
use serde::{Deserialize, Serialize};

/// One key-combination-to-expression mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Binding {
    pub keys: Vec<Key>,
    pub expression: String,
}

impl Binding {
    /// Edge-trigger check: all keys held, at least one down this tick.
    fn performed(&self, input: &dyn KeyInput) -> bool {
        self.keys.iter().all(|&k| input.is_key_held(k))
            && self.keys.iter().any(|&k| input.is_key_down(k))
    }

    /// Same key set, ignoring order.
    fn same_keys(&self, keys: &[Key]) -> bool {
        self.keys.len() == keys.len() && keys.iter().all(|k| self.keys.contains(k))
    }
}

/// The registered bindings, in registration order.
#[derive(Debug, Default)]
pub struct BindingSet {
    bindings: Vec<Binding>,
}

impl BindingSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a binding. Rejects an empty key set and any key set that is
    /// already bound (regardless of key order).
    pub fn add(&mut self, keys: Vec<Key>, expression: impl Into<String>) -> Result<()> {
        if keys.is_empty() {
            return Err(LanternError::Binding("empty key set".to_string()));
        }
        if self.bindings.iter().any(|b| b.same_keys(&keys)) {
            let names: Vec<String> = keys.iter().map(Key::to_string).collect();
            return Err(LanternError::Binding(format!(
                "keys {} are already bound",
                names.join(",")
            )));
        }
        self.bindings.push(Binding {
            keys,
            expression: expression.into(),
        });
        Ok(())
    }

    /// Remove the binding with exactly this key set. Returns whether one
    /// was removed.
    pub fn remove(&mut self, keys: &[Key]) -> bool {
        let before = self.bindings.len();
        self.bindings.retain(|b| !b.same_keys(keys));
        before != self.bindings.len()
    }

    /// Evaluate all bindings against the current key state. At most one
    /// fires per tick; the scan runs in reverse registration order and
    /// stops at the first match.
    pub fn poll(&self, input: &dyn KeyInput) -> Option<&Binding> {
        self.bindings.iter().rev().find(|b| b.performed(input))
    }

    /// Replace all bindings (used when loading persisted settings).
    pub fn replace_all(&mut self, bindings: Vec<Binding>) {
        self.bindings = bindings;
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    /// Scripted key state for tests.
    #[derive(Default)]
    struct Keys {
        down: HashSet<Key>,
        held: HashSet<Key>,
    }

    impl Keys {
        fn down(mut self, key: Key) -> Self {
            self.down.insert(key);
            self.held.insert(key);
            self
        }

        fn held(mut self, key: Key) -> Self {
            self.held.insert(key);
            self
        }
    }

    impl KeyInput for Keys {
        fn is_key_down(&self, key: Key) -> bool {
            self.down.contains(&key)
        }

        fn is_key_held(&self, key: Key) -> bool {
            self.held.contains(&key)
        }
    }

    #[test]
    fn add_and_fire() {
        let mut set = BindingSet::new();
        set.add(vec![Key::A, Key::B], "log hello").unwrap();
        let keys = Keys::default().held(Key::A).down(Key::B);
        let fired = set.poll(&keys).unwrap();
        assert_eq!(fired.expression, "log hello");
    }

    #[test]
    fn no_fire_without_edge() {
        let mut set = BindingSet::new();
        set.add(vec![Key::A, Key::B], "log hello").unwrap();
        // Both held, neither went down this tick.
        let keys = Keys::default().held(Key::A).held(Key::B);
        assert!(set.poll(&keys).is_none());
    }

    #[test]
    fn no_fire_with_missing_key() {
        let mut set = BindingSet::new();
        set.add(vec![Key::A, Key::B], "log hello").unwrap();
        let keys = Keys::default().down(Key::A);
        assert!(set.poll(&keys).is_none());
    }

    #[test]
    fn duplicate_key_set_rejected() {
        let mut set = BindingSet::new();
        set.add(vec![Key::A, Key::B], "first").unwrap();
        assert!(set.add(vec![Key::B, Key::A], "second").is_err());
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn empty_key_set_rejected() {
        let mut set = BindingSet::new();
        assert!(set.add(vec![], "nothing").is_err());
    }

    #[test]
    fn later_registration_wins_conflicts() {
        let mut set = BindingSet::new();
        set.add(vec![Key::A], "older").unwrap();
        set.add(vec![Key::A, Key::B], "newer").unwrap();
        // Both bindings are satisfied; reverse-order scan picks the newer.
        let keys = Keys::default().down(Key::A).held(Key::B).down(Key::B);
        assert_eq!(set.poll(&keys).unwrap().expression, "newer");
    }

    #[test]
    fn remove_by_key_set_ignores_order() {
        let mut set = BindingSet::new();
        set.add(vec![Key::A, Key::B], "x").unwrap();
        assert!(set.remove(&[Key::B, Key::A]));
        assert!(set.is_empty());
        assert!(!set.remove(&[Key::A, Key::B]));
    }

    #[test]
    fn replace_all_installs_persisted_bindings() {
        let mut set = BindingSet::new();
        set.add(vec![Key::A], "old").unwrap();
        set.replace_all(vec![Binding {
            keys: vec![Key::F5],
            expression: "reload".into(),
        }]);
        assert_eq!(set.len(), 1);
        assert_eq!(set.bindings()[0].expression, "reload");
    }

    #[test]
    fn serde_roundtrip() {
        let b = Binding {
            keys: vec![Key::LeftControl, Key::T],
            expression: "log hi".into(),
        };
        let json = serde_json::to_string(&b).unwrap();
        let back: Binding = serde_json::from_str(&json).unwrap();
        assert_eq!(back, b);
    }
}
