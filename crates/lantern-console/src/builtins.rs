//! Built-in commands registered at engine startup.
//!
//! Every built-in is an ordinary registered [`Command`] marked built-in.
//! Actions that need engine state (clearing the scrollback, closing the
//! console, touching bindings, reaching the evaluator) return signal
//! outputs; the engine applies them after the action returns.

use crate::coerce::{ParamType, Value};
use crate::command::{Command, CommandOutput};
use crate::registry::CommandRegistry;

/// Register the built-in command surface into a registry.
pub fn register_builtins(registry: &mut CommandRegistry) {
    registry.add(help_command(), true);
    registry.add(commands_command(), true);
    registry.add(clear_command(), true);
    registry.add(close_command(), true);
    registry.add(bind_command(), true);
    registry.add(unbind_command(), true);
    registry.add(log_command(), true);
    registry.add(eval_command(), true);
    registry.add(run_command(), true);
}

fn arg_str(args: &[Value], index: usize) -> String {
    args.get(index)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

// ---------------------------------------------------------------------------
// help / commands
// ---------------------------------------------------------------------------

fn help_command() -> Command {
    Command::new("help", "Show help for a command, or an overview")
        .aliases("?")
        .param("command", "name of the command", ParamType::Str)
        .action(|args| Ok(CommandOutput::Help(Some(arg_str(args, 0)))))
        .default_action(|| Ok(CommandOutput::Help(None)))
}

fn commands_command() -> Command {
    Command::new("commands", "List all registered commands")
        .default_action(|| Ok(CommandOutput::Commands))
}

// ---------------------------------------------------------------------------
// clear / close
// ---------------------------------------------------------------------------

fn clear_command() -> Command {
    Command::new("clear", "Clear the scrollback")
        .aliases("cls")
        .default_action(|| Ok(CommandOutput::Clear))
}

fn close_command() -> Command {
    Command::new("close", "Close the console")
        .default_action(|| Ok(CommandOutput::Close))
}

// ---------------------------------------------------------------------------
// bind / unbind
// ---------------------------------------------------------------------------

fn bind_command() -> Command {
    Command::new("bind", "Run an expression when a key combination is pressed")
        .param("expression", "expression to run", ParamType::Str)
        .param("keys", "comma-separated key combination", ParamType::KeyList)
        .action(|args| {
            let expression = arg_str(args, 0);
            let keys = args
                .get(1)
                .and_then(Value::as_keys)
                .unwrap_or_default()
                .to_vec();
            Ok(CommandOutput::Bind { expression, keys })
        })
}

fn unbind_command() -> Command {
    Command::new("unbind", "Remove the binding for a key combination")
        .param("keys", "comma-separated key combination", ParamType::KeyList)
        .action(|args| {
            let keys = args
                .first()
                .and_then(Value::as_keys)
                .unwrap_or_default()
                .to_vec();
            Ok(CommandOutput::Unbind { keys })
        })
}

// ---------------------------------------------------------------------------
// log / eval / run
// ---------------------------------------------------------------------------

fn log_command() -> Command {
    Command::new("log", "Write a message to the scrollback")
        .param("message", "text to write", ParamType::Str)
        .action(|args| Ok(CommandOutput::Text(arg_str(args, 0))))
}

fn eval_command() -> Command {
    Command::new("eval", "Evaluate an expression and print its result")
        .param("expression", "expression to evaluate", ParamType::Str)
        .action(|args| Ok(CommandOutput::Eval(arg_str(args, 0))))
}

fn run_command() -> Command {
    Command::new("run", "Run a statement for its side effects")
        .param("statement", "statement to run", ParamType::Str)
        .action(|args| Ok(CommandOutput::RunStatement(arg_str(args, 0))))
}
