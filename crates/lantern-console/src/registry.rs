//! Command registry: storage, lookup, and best-arity-match resolution.
//!
//! Commands are stored in registration order because suggestion ordering
//! depends on it. Registration conflicts are logged and swallowed; a console
//! must never take the host down over a bad command registration.

use crate::command::{Command, CommandId};

/// Registry of available commands, keyed by name + arity.
#[derive(Debug, Default)]
pub struct CommandRegistry {
    commands: Vec<Command>,
    next_id: u32,
}

impl CommandRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
            next_id: 0,
        }
    }

    /// Register a command, optionally marking it built-in. Returns `false`
    /// (after logging) when the name is empty or a command with the same
    /// resolved name-or-alias and the same arity already exists.
    pub fn add(&mut self, mut command: Command, builtin: bool) -> bool {
        if command.name().is_empty() {
            log::warn!("rejected command registration with empty name");
            return false;
        }
        let arity = command.arity();
        for existing in &self.commands {
            if existing.arity() != arity {
                continue;
            }
            if let Some(clash) = command.names().find(|&n| existing.matches_name(n)) {
                log::warn!(
                    "rejected command '{}': '{clash}' taking {arity} argument(s) \
                     is already registered",
                    command.name()
                );
                return false;
            }
        }
        command.id = CommandId(self.next_id);
        self.next_id += 1;
        if builtin {
            command.mark_builtin();
        }
        self.commands.push(command);
        true
    }

    /// Remove every non-built-in command matching `name` (by name or
    /// alias). Built-in commands are silently kept.
    pub fn remove(&mut self, name: &str) {
        self.commands
            .retain(|c| c.is_builtin() || !c.matches_name(name));
    }

    /// Remove one specific overload. Built-ins are silently kept.
    pub fn remove_arity(&mut self, name: &str, arity: usize) {
        self.commands.retain(|c| {
            c.is_builtin() || !(c.matches_name(name) && c.arity() == arity)
        });
    }

    /// First command whose name or any alias equals `name` (case-sensitive).
    pub fn find_by_name(&self, name: &str) -> Option<&Command> {
        self.commands.iter().find(|c| c.matches_name(name))
    }

    /// Resolve the overload best suited to `arg_count` raw arguments:
    /// exact arity first, then the highest arity still <= `arg_count`
    /// (trailing-argument merging absorbs the excess), then any name match
    /// so the caller can report a proper arity error. `None` only when
    /// nothing matches by name.
    pub fn resolve_best_match(&self, name: &str, arg_count: usize) -> Option<&Command> {
        self.index_of_best_match(name, arg_count)
            .map(|i| &self.commands[i])
    }

    /// Index variant of [`resolve_best_match`], for callers that need
    /// mutable access afterwards.
    ///
    /// [`resolve_best_match`]: Self::resolve_best_match
    pub(crate) fn index_of_best_match(&self, name: &str, arg_count: usize) -> Option<usize> {
        let mut first_match = None;
        let mut best_fit: Option<usize> = None;
        for (i, cmd) in self.commands.iter().enumerate() {
            if !cmd.matches_name(name) {
                continue;
            }
            if cmd.arity() == arg_count {
                return Some(i);
            }
            first_match.get_or_insert(i);
            if cmd.arity() < arg_count
                && best_fit.is_none_or(|b| cmd.arity() > self.commands[b].arity())
            {
                best_fit = Some(i);
            }
        }
        best_fit.or(first_match)
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> &mut Command {
        &mut self.commands[index]
    }

    pub(crate) fn get(&self, index: usize) -> &Command {
        &self.commands[index]
    }

    /// Look a command up by its stable id.
    pub fn by_id(&self, id: CommandId) -> Option<&Command> {
        self.commands.iter().find(|c| c.id() == id)
    }

    /// Commands in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Command> {
        self.commands.iter()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
