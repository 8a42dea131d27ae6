//! Autocomplete suggestions.
//!
//! Driven by the current (unsubmitted) input text, consulting only the
//! command registry. Primary-name prefix matches come first, alias matches
//! after, both in registration order. Selection survives input edits by
//! command identity, not by index.

use crate::command::CommandId;
use crate::registry::CommandRegistry;

/// One suggestion: the display name that matched (primary name or alias)
/// plus the command it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub display: String,
    pub command: CommandId,
}

/// Ordered suggestion list with a wrapping cursor.
#[derive(Debug, Default)]
pub struct SuggestionEngine {
    items: Vec<Suggestion>,
    index: Option<usize>,
}

impl SuggestionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the suggestion list for the current input.
    ///
    /// Empty input, or input starting with a space, clears the list: the
    /// user is only typing a command name at the very start of the line.
    pub fn refresh(&mut self, input: &str, registry: &CommandRegistry) {
        let selected = self.current_command();
        self.items.clear();
        self.index = None;

        if input.is_empty() || input.starts_with(' ') {
            return;
        }

        let tokens: Vec<&str> = input.split(' ').filter(|t| !t.is_empty()).collect();
        let Some(first) = tokens.first() else {
            return;
        };
        let prefix = first.to_lowercase();
        let typed_args = tokens.len() - 1;

        // Primary names first, registry order.
        for cmd in registry.iter() {
            if cmd.arity() < typed_args {
                continue;
            }
            if cmd.name().to_lowercase().starts_with(&prefix) {
                self.items.push(Suggestion {
                    display: cmd.name().to_string(),
                    command: cmd.id(),
                });
            }
        }
        // Then aliases, registry order.
        for cmd in registry.iter() {
            if cmd.arity() < typed_args {
                continue;
            }
            for alias in cmd.alias_names() {
                if alias.to_lowercase().starts_with(&prefix) {
                    self.items.push(Suggestion {
                        display: alias.clone(),
                        command: cmd.id(),
                    });
                }
            }
        }

        if self.items.is_empty() {
            return;
        }
        // Sticky selection: keep the previously selected command if it is
        // still in the list, else fall back to the first entry.
        self.index = Some(
            selected
                .and_then(|id| self.items.iter().position(|s| s.command == id))
                .unwrap_or(0),
        );
    }

    /// Move the cursor by `direction` (+1 or -1), wrapping both ways.
    pub fn cycle(&mut self, direction: i32) {
        let len = self.items.len();
        if len == 0 {
            return;
        }
        let current = self.index.unwrap_or(0) as i64;
        let next = (current + i64::from(direction)).rem_euclid(len as i64);
        self.index = Some(next as usize);
    }

    /// Display name of the current suggestion.
    pub fn current(&self) -> Option<&str> {
        self.index
            .and_then(|i| self.items.get(i))
            .map(|s| s.display.as_str())
    }

    /// Command identity of the current suggestion.
    pub fn current_command(&self) -> Option<CommandId> {
        self.index.and_then(|i| self.items.get(i)).map(|s| s.command)
    }

    /// All current suggestions, in order.
    pub fn items(&self) -> &[Suggestion] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Accept the current suggestion against `input`.
    ///
    /// With a single typed token the full matched name replaces it; with
    /// multiple tokens the suggestion's remaining words (beyond what is
    /// already typed) are appended, space-joined.
    pub fn completed_input(&self, input: &str) -> Option<String> {
        let suggestion = self.current()?;
        let typed = input.split(' ').filter(|t| !t.is_empty()).count();
        if typed <= 1 {
            return Some(suggestion.to_string());
        }
        let extra: Vec<&str> = suggestion.split(' ').skip(typed).collect();
        if extra.is_empty() {
            Some(input.to_string())
        } else {
            Some(format!("{input} {}", extra.join(" ")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coerce::ParamType;
    use crate::command::Command;

    fn registry() -> CommandRegistry {
        let mut reg = CommandRegistry::new();
        reg.add(
            Command::new("loadscene", "").param("name", "", ParamType::Str),
            false,
        );
        reg.add(
            Command::new("loadscene_index", "").param("index", "", ParamType::Int),
            false,
        );
        reg.add(
            Command::new("log", "")
                .aliases("lg")
                .param("message", "", ParamType::Str),
            false,
        );
        reg
    }

    #[test]
    fn prefix_matches_in_registry_order() {
        let reg = registry();
        let mut s = SuggestionEngine::new();
        s.refresh("lo", &reg);
        let names: Vec<&str> = s.items().iter().map(|i| i.display.as_str()).collect();
        assert_eq!(names, vec!["loadscene", "loadscene_index", "log"]);
    }

    #[test]
    fn aliases_follow_primary_names() {
        let reg = registry();
        let mut s = SuggestionEngine::new();
        s.refresh("l", &reg);
        let names: Vec<&str> = s.items().iter().map(|i| i.display.as_str()).collect();
        // All primary matches first, alias "lg" last.
        assert_eq!(names, vec!["loadscene", "loadscene_index", "log", "lg"]);
    }

    #[test]
    fn non_matching_commands_excluded() {
        let reg = registry();
        let mut s = SuggestionEngine::new();
        s.refresh("loadsc", &reg);
        assert_eq!(s.items().len(), 2);
    }

    #[test]
    fn empty_input_clears() {
        let reg = registry();
        let mut s = SuggestionEngine::new();
        s.refresh("lo", &reg);
        assert!(!s.is_empty());
        s.refresh("", &reg);
        assert!(s.is_empty());
        assert!(s.current().is_none());
    }

    #[test]
    fn leading_space_clears() {
        let reg = registry();
        let mut s = SuggestionEngine::new();
        s.refresh(" lo", &reg);
        assert!(s.is_empty());
    }

    #[test]
    fn prefix_is_case_insensitive() {
        let reg = registry();
        let mut s = SuggestionEngine::new();
        s.refresh("LO", &reg);
        assert_eq!(s.items().len(), 3);
    }

    #[test]
    fn arity_filter_excludes_small_commands() {
        let mut reg = CommandRegistry::new();
        reg.add(Command::new("list", ""), false);
        reg.add(
            Command::new("listen", "")
                .param("a", "", ParamType::Str)
                .param("b", "", ParamType::Str),
            false,
        );
        let mut s = SuggestionEngine::new();
        // Two argument tokens already typed: zero-arity "list" cannot apply.
        s.refresh("lis a b", &reg);
        let names: Vec<&str> = s.items().iter().map(|i| i.display.as_str()).collect();
        assert_eq!(names, vec!["listen"]);
    }

    #[test]
    fn cycle_wraps_both_directions() {
        let reg = registry();
        let mut s = SuggestionEngine::new();
        s.refresh("lo", &reg);
        assert_eq!(s.current(), Some("loadscene"));
        s.cycle(-1);
        assert_eq!(s.current(), Some("log"));
        s.cycle(1);
        assert_eq!(s.current(), Some("loadscene"));
        s.cycle(1);
        assert_eq!(s.current(), Some("loadscene_index"));
    }

    #[test]
    fn selection_sticks_across_refresh() {
        let reg = registry();
        let mut s = SuggestionEngine::new();
        s.refresh("lo", &reg);
        s.cycle(1); // loadscene_index
        s.refresh("loads", &reg);
        assert_eq!(s.current(), Some("loadscene_index"));
    }

    #[test]
    fn selection_falls_back_to_first_when_gone() {
        let reg = registry();
        let mut s = SuggestionEngine::new();
        s.refresh("lo", &reg);
        s.cycle(1);
        s.cycle(1); // log
        s.refresh("loads", &reg);
        assert_eq!(s.current(), Some("loadscene"));
    }

    #[test]
    fn completed_input_single_token() {
        let reg = registry();
        let mut s = SuggestionEngine::new();
        s.refresh("loadsc", &reg);
        assert_eq!(s.completed_input("loadsc").as_deref(), Some("loadscene"));
    }

    #[test]
    fn completed_input_multi_token_appends_nothing_for_single_word() {
        let reg = registry();
        let mut s = SuggestionEngine::new();
        s.refresh("log hello", &reg);
        assert_eq!(
            s.completed_input("log hello").as_deref(),
            Some("log hello")
        );
    }

    #[test]
    fn completed_input_without_suggestions_is_none() {
        let reg = registry();
        let mut s = SuggestionEngine::new();
        s.refresh("zzz", &reg);
        assert!(s.completed_input("zzz").is_none());
    }
}
