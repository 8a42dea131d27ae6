//! The console engine: one owned object tying the pieces together.
//!
//! Owns the command registry, coercion registry, scrollback, history,
//! suggestions, bindings, and settings; collaborators (evaluator, key
//! input, preference store) are injected. All state lives on this instance;
//! there is no global state. Single-threaded and tick-driven, except for
//! the scrollback's thread-safe append path.

use lantern_platform::{Evaluator, KeyInput, PrefsStore};
use lantern_types::error::{LanternError, Result};
use lantern_types::key::Key;
use lantern_types::level::LogFilter;

use crate::binding::BindingSet;
use crate::builtins;
use crate::coerce::{TypeCoercionRegistry, Value};
use crate::command::{Command, CommandOutput};
use crate::history::CommandHistory;
use crate::registry::CommandRegistry;
use crate::scrollback::{LogWriter, ScrollbackBuffer, ScrollbackConfig};
use crate::settings::ConsoleSettings;
use crate::suggest::SuggestionEngine;
use crate::token;

/// The developer console engine.
pub struct ConsoleEngine {
    registry: CommandRegistry,
    coercions: TypeCoercionRegistry,
    scrollback: ScrollbackBuffer,
    history: CommandHistory,
    suggestions: SuggestionEngine,
    bindings: BindingSet,
    settings: ConsoleSettings,
    evaluator: Option<Box<dyn Evaluator>>,
    open: bool,
}

impl ConsoleEngine {
    /// Engine with default scrollback limits and the built-in commands
    /// registered.
    pub fn new() -> Self {
        Self::with_config(ScrollbackConfig::default())
    }

    pub fn with_config(config: ScrollbackConfig) -> Self {
        let mut registry = CommandRegistry::new();
        builtins::register_builtins(&mut registry);
        let settings = ConsoleSettings::default();
        let scrollback = ScrollbackBuffer::new(config);
        scrollback.set_filter(settings.log_filter);
        Self {
            registry,
            coercions: TypeCoercionRegistry::new(),
            scrollback,
            history: CommandHistory::new(),
            suggestions: SuggestionEngine::new(),
            bindings: BindingSet::new(),
            settings,
            evaluator: None,
            open: false,
        }
    }

    // -- Collaborators --

    /// Install the expression evaluator. Persisted usings are applied to it.
    pub fn set_evaluator(&mut self, mut evaluator: Box<dyn Evaluator>) {
        for using in &self.settings.usings {
            evaluator.add_using(using);
        }
        self.evaluator = Some(evaluator);
    }

    /// Load persisted settings and apply them (filter, bindings, usings).
    pub fn load_settings(&mut self, store: &dyn PrefsStore) {
        let settings = ConsoleSettings::load(store);
        self.scrollback.set_filter(settings.log_filter);
        self.bindings.replace_all(settings.bindings.clone());
        if let Some(evaluator) = &mut self.evaluator {
            for using in &settings.usings {
                evaluator.add_using(using);
            }
        }
        self.settings = settings;
    }

    /// Snapshot current state into the settings blob and persist it.
    pub fn save_settings(&self, store: &mut dyn PrefsStore) -> Result<()> {
        let mut settings = self.settings.clone();
        settings.bindings = self.bindings.bindings().to_vec();
        settings.save(store)
    }

    // -- Registration --

    /// Register a host command. Conflicts are logged and swallowed; returns
    /// whether the command was stored.
    pub fn register(&mut self, command: Command) -> bool {
        self.registry.add(command, false)
    }

    /// Remove a host command by name. Built-ins are silently kept.
    pub fn remove_command(&mut self, name: &str) {
        self.registry.remove(name);
    }

    // -- Execution --

    /// Parse and execute one input line. Every failure path ends in a
    /// logged, user-visible scrollback message; nothing propagates.
    pub fn run_command(&mut self, raw: &str) {
        if raw.trim().is_empty() {
            return;
        }
        let (name, raw_args) = token::parse(raw);
        self.history.push(raw);
        self.scrollback.append_line(&format!("> {raw}"));

        let Some(index) = self.registry.index_of_best_match(&name, raw_args.len()) else {
            self.evaluate_fallback(raw, &name);
            return;
        };

        if raw_args.is_empty() {
            let cmd = self.registry.get_mut(index);
            let usage = cmd.usage();
            let cmd_name = cmd.name().to_string();
            let arity = cmd.arity();
            let result = match cmd.default_action.as_mut() {
                Some(action) => action(),
                None => Err(LanternError::Arity {
                    name: cmd_name,
                    expected: arity,
                    actual: 0,
                }),
            };
            self.finish(result, &usage);
            return;
        }

        let (arity, cmd_name, usage) = {
            let cmd = self.registry.get(index);
            (cmd.arity(), cmd.name().to_string(), cmd.usage())
        };
        let args = token::reconcile_arity(raw_args, arity);
        if args.len() != arity {
            let err = LanternError::Arity {
                name: cmd_name,
                expected: arity,
                actual: args.len(),
            };
            self.scrollback.append_line(&format!("{err} (usage: {usage})"));
            return;
        }

        // All-or-nothing argument binding: every argument must coerce
        // before the action runs.
        let mut values: Vec<Value> = Vec::with_capacity(arity);
        {
            let cmd = self.registry.get(index);
            for (i, (raw_arg, param)) in args.iter().zip(cmd.params()).enumerate() {
                match self.coercions.coerce(raw_arg, param.ty()) {
                    Ok(value) => values.push(value),
                    Err(err) => {
                        self.scrollback.append_line(&format!(
                            "argument {} ('{}'): {err}",
                            i + 1,
                            param.name()
                        ));
                        return;
                    },
                }
            }
        }

        let result = {
            let cmd = self.registry.get_mut(index);
            let cmd_name = cmd.name().to_string();
            match cmd.action.as_mut() {
                Some(action) => action(&values),
                None => Err(LanternError::Callback(format!(
                    "'{cmd_name}' takes no arguments"
                ))),
            }
        };
        self.finish(result, &usage);
    }

    /// Advance the console one tick: evaluate bindings (at most one fires),
    /// then flush the scrollback when open.
    pub fn tick(&mut self, keys: &dyn KeyInput) {
        if self.settings.bindings_enabled {
            let fired = self.bindings.poll(keys).map(|b| b.expression.clone());
            if let Some(expression) = fired {
                self.run_command(&expression);
            }
        }
        if self.open {
            self.scrollback.flush();
        }
    }

    fn finish(&mut self, result: Result<CommandOutput>, usage: &str) {
        match result {
            Ok(output) => self.apply_output(output),
            Err(err @ LanternError::Arity { .. }) => {
                self.scrollback.append_line(&format!("{err} (usage: {usage})"));
            },
            Err(err @ LanternError::Callback(_)) => {
                self.scrollback.append_line(&format!("{err}"));
            },
            Err(err) => {
                self.scrollback
                    .append_line(&format!("command failed: {err}"));
            },
        }
    }

    fn apply_output(&mut self, output: CommandOutput) {
        match output {
            CommandOutput::Text(text) => self.scrollback.append_line(&text),
            CommandOutput::None => {},
            CommandOutput::Clear => self.scrollback.clear(),
            CommandOutput::Close => self.open = false,
            CommandOutput::Bind { expression, keys } => {
                let combo = key_names(&keys);
                match self.bindings.add(keys, expression.clone()) {
                    Ok(()) => self
                        .scrollback
                        .append_line(&format!("bound '{expression}' to {combo}")),
                    Err(err) => self.scrollback.append_line(&format!("{err}")),
                }
            },
            CommandOutput::Unbind { keys } => {
                let combo = key_names(&keys);
                if self.bindings.remove(&keys) {
                    self.scrollback.append_line(&format!("unbound {combo}"));
                } else {
                    self.scrollback
                        .append_line(&format!("no binding for {combo}"));
                }
            },
            CommandOutput::Eval(code) => self.evaluate_and_print(&code),
            CommandOutput::RunStatement(code) => {
                let outcome = match self.evaluator.as_mut() {
                    Some(evaluator) => evaluator.run(&code).err(),
                    None => Some(no_evaluator()),
                };
                if let Some(err) = outcome {
                    self.scrollback.append_line(&format!("{err}"));
                }
            },
            CommandOutput::Help(topic) => {
                let text = self.render_help(topic.as_deref());
                self.scrollback.append_line(&text);
            },
            CommandOutput::Commands => {
                let text = self.render_command_list();
                self.scrollback.append_line(&text);
            },
        }
    }

    /// Unresolved input falls back to the evaluator before surfacing a
    /// lookup error.
    fn evaluate_fallback(&mut self, raw: &str, name: &str) {
        let evaluated = self
            .evaluator
            .as_mut()
            .and_then(|evaluator| evaluator.evaluate(raw).ok());
        match evaluated {
            Some(result) => {
                if !result.is_empty() {
                    self.scrollback.append_line(&result);
                }
            },
            None => {
                let err = LanternError::Lookup(name.to_string());
                self.scrollback.append_line(&format!("{err}"));
            },
        }
    }

    fn evaluate_and_print(&mut self, code: &str) {
        let outcome = match self.evaluator.as_mut() {
            Some(evaluator) => evaluator.evaluate(code),
            None => Err(no_evaluator()),
        };
        match outcome {
            Ok(result) => self.scrollback.append_line(&result),
            Err(err) => self.scrollback.append_line(&format!("{err}")),
        }
    }

    fn render_help(&self, topic: Option<&str>) -> String {
        match topic {
            Some(name) => {
                let overloads: Vec<&Command> = self
                    .registry
                    .iter()
                    .filter(|c| c.matches_name(name))
                    .collect();
                if overloads.is_empty() {
                    return format!("{}", LanternError::Lookup(name.to_string()));
                }
                let mut out = String::new();
                for cmd in overloads {
                    out.push_str(&format!("{}\n  {}\n", cmd.usage(), cmd.description()));
                    if !cmd.alias_names().is_empty() {
                        out.push_str(&format!(
                            "  aliases: {}\n",
                            cmd.alias_names().join(", ")
                        ));
                    }
                    for param in cmd.params() {
                        out.push_str(&format!(
                            "  {} ({}): {}\n",
                            param.name(),
                            param.friendly_type_name(),
                            param.description()
                        ));
                    }
                }
                out.trim_end().to_string()
            },
            None => {
                let mut out = format!("Commands ({}):\n", self.registry.len());
                for cmd in self.registry.iter() {
                    out.push_str(&format!("  {:28} {}\n", cmd.usage(), cmd.description()));
                }
                out.push_str("Type 'help <command>' for details.");
                out
            },
        }
    }

    fn render_command_list(&self) -> String {
        let names: Vec<&str> = self.registry.iter().map(|c| c.name()).collect();
        names.join(", ")
    }

    // -- Input-driven state (host calls these while the input has focus) --

    /// The input text changed: refresh suggestions, leave history browsing.
    pub fn update_input(&mut self, text: &str) {
        self.suggestions.refresh(text, &self.registry);
        self.history.reset_cursor();
    }

    /// Cycle the suggestion cursor (+1 or -1, wrapping).
    pub fn cycle_suggestion(&mut self, direction: i32) {
        self.suggestions.cycle(direction);
    }

    pub fn current_suggestion(&self) -> Option<&str> {
        self.suggestions.current()
    }

    /// Accept the current suggestion against `input`.
    pub fn autocomplete(&self, input: &str) -> Option<String> {
        self.suggestions.completed_input(input)
    }

    pub fn history_prev(&mut self) -> Option<&str> {
        self.history.browse_prev()
    }

    pub fn history_next(&mut self) -> Option<&str> {
        self.history.browse_next()
    }

    // -- State and accessors --

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Change the ingested log severities; applied immediately and
    /// persisted on the next `save_settings`.
    pub fn set_log_filter(&mut self, filter: LogFilter) {
        self.settings.log_filter = filter;
        self.scrollback.set_filter(filter);
    }

    pub fn set_bindings_enabled(&mut self, enabled: bool) {
        self.settings.bindings_enabled = enabled;
    }

    /// Thread-safe handle for asynchronous log ingestion.
    pub fn log_writer(&self) -> LogWriter {
        self.scrollback.writer()
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Mutable access for registering custom coercions.
    pub fn coercions_mut(&mut self) -> &mut TypeCoercionRegistry {
        &mut self.coercions
    }

    pub fn scrollback(&self) -> &ScrollbackBuffer {
        &self.scrollback
    }

    pub fn history(&self) -> &CommandHistory {
        &self.history
    }

    pub fn bindings(&self) -> &BindingSet {
        &self.bindings
    }

    pub fn settings(&self) -> &ConsoleSettings {
        &self.settings
    }
}

impl Default for ConsoleEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn key_names(keys: &[Key]) -> String {
    let names: Vec<String> = keys.iter().map(Key::to_string).collect();
    names.join(",")
}

fn no_evaluator() -> LanternError {
    LanternError::Evaluator("not supported (no evaluator installed)".to_string())
}
