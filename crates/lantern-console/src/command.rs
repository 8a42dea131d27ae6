//! Command descriptors: typed parameters, actions, and outputs.
//!
//! A command pairs a case-preserved name (plus aliases) with an ordered list
//! of typed parameters and up to two actions: a zero-argument default action
//! and a multi-argument action taking the coerced values. Actions return a
//! [`CommandOutput`]; side effects that need engine state (clearing the
//! scrollback, closing the console, adding a binding) are expressed as
//! signal variants the engine applies after the action returns.

use lantern_types::error::Result;
use lantern_types::key::Key;

use crate::coerce::{ParamType, Value};

/// How many enum variants are listed inline in a parameter description
/// before the description points at `help` instead.
const ENUM_LIST_THRESHOLD: usize = 7;

/// Stable identity assigned at registration; used for sticky suggestion
/// selection across refreshes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CommandId(pub(crate) u32);

/// Output produced by a command action.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutput {
    /// Plain text appended to the scrollback.
    Text(String),
    /// The action produced no visible output.
    None,
    /// Signal: clear the scrollback.
    Clear,
    /// Signal: close the console overlay.
    Close,
    /// Signal: register a key binding.
    Bind { expression: String, keys: Vec<Key> },
    /// Signal: remove the binding with this exact key set.
    Unbind { keys: Vec<Key> },
    /// Signal: evaluate an expression and print its result.
    Eval(String),
    /// Signal: run a statement for its side effects.
    RunStatement(String),
    /// Signal: render help, either for one command or an overview.
    Help(Option<String>),
    /// Signal: render the registered command list.
    Commands,
}

/// A declared command parameter.
#[derive(Debug, Clone)]
pub struct Parameter {
    name: String,
    description: String,
    ty: ParamType,
    friendly_type_name: String,
}

impl Parameter {
    /// Build a parameter descriptor. Enum-typed parameters get their
    /// description augmented: small enums list every value, large ones point
    /// at the `help` command.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        ty: ParamType,
    ) -> Self {
        let name = name.into();
        let mut description = description.into();
        if let ParamType::Enum(spec) = &ty {
            if spec.variants.len() <= ENUM_LIST_THRESHOLD {
                let names: Vec<&str> =
                    spec.variants.iter().map(|(n, _)| n.as_str()).collect();
                description.push_str(&format!(" (one of: {})", names.join(", ")));
            } else {
                description
                    .push_str(&format!(" (see 'help' for {} values)", spec.name));
            }
        }
        let friendly_type_name = ty.friendly_name();
        Self {
            name,
            description,
            ty,
            friendly_type_name,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn ty(&self) -> &ParamType {
        &self.ty
    }

    pub fn friendly_type_name(&self) -> &str {
        &self.friendly_type_name
    }
}

/// Multi-argument action: receives the coerced values, one per parameter.
pub type CommandAction = Box<dyn FnMut(&[Value]) -> Result<CommandOutput>>;

/// Zero-argument default action.
pub type DefaultAction = Box<dyn FnMut() -> Result<CommandOutput>>;

/// A named, arity-specific, invokable unit with typed parameters.
pub struct Command {
    pub(crate) id: CommandId,
    name: String,
    aliases: Vec<String>,
    description: String,
    params: Vec<Parameter>,
    pub(crate) action: Option<CommandAction>,
    pub(crate) default_action: Option<DefaultAction>,
    builtin: bool,
}

impl Command {
    /// Start building a command. The name is whitespace-stripped;
    /// identity (name + arity) is fixed once registered.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: CommandId(0),
            name: name.into().trim().to_string(),
            aliases: Vec::new(),
            description: description.into(),
            params: Vec::new(),
            action: None,
            default_action: None,
            builtin: false,
        }
    }

    /// Add aliases from a comma-separated list; entries are trimmed and
    /// empty entries discarded.
    pub fn aliases(mut self, list: &str) -> Self {
        for alias in list.split(',') {
            let alias = alias.trim();
            if !alias.is_empty() {
                self.aliases.push(alias.to_string());
            }
        }
        self
    }

    /// Append a typed parameter.
    pub fn param(
        mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        ty: ParamType,
    ) -> Self {
        self.params.push(Parameter::new(name, description, ty));
        self
    }

    /// Set the multi-argument action.
    pub fn action(
        mut self,
        f: impl FnMut(&[Value]) -> Result<CommandOutput> + 'static,
    ) -> Self {
        self.action = Some(Box::new(f));
        self
    }

    /// Set the zero-argument default action.
    pub fn default_action(
        mut self,
        f: impl FnMut() -> Result<CommandOutput> + 'static,
    ) -> Self {
        self.default_action = Some(Box::new(f));
        self
    }

    pub fn id(&self) -> CommandId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn alias_names(&self) -> &[String] {
        &self.aliases
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn params(&self) -> &[Parameter] {
        &self.params
    }

    /// Declared parameter count.
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    pub fn is_builtin(&self) -> bool {
        self.builtin
    }

    /// Mark this command built-in. One-way; there is no unset.
    pub(crate) fn mark_builtin(&mut self) {
        self.builtin = true;
    }

    /// Case-sensitive match against the name or any alias.
    pub fn matches_name(&self, name: &str) -> bool {
        self.name == name || self.aliases.iter().any(|a| a == name)
    }

    /// All names this command answers to: primary name first, then aliases.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.aliases.iter().map(String::as_str))
    }

    /// Usage line, e.g. `bind <expression:string> <keys:key list>`.
    pub fn usage(&self) -> String {
        let mut out = self.name.clone();
        for p in &self.params {
            out.push_str(&format!(" <{}:{}>", p.name(), p.friendly_type_name()));
        }
        out
    }
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Command")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .field("arity", &self.params.len())
            .field("builtin", &self.builtin)
            .finish_non_exhaustive()
    }
}
