//! LANTERN stdin host.
//!
//! A minimal interactive loop around the console engine: reads one line per
//! tick, executes it, flushes the scrollback, and prints whatever newly
//! landed in the pages. Settings persist to `lantern_prefs.json` in the
//! working directory. Type `close` (or hit EOF) to exit.

use std::io::{self, BufRead, Write};

use anyhow::Result;

use lantern_console::{
    Command, CommandOutput, ConsoleEngine, LogPage, ParamType, ScrollbackConfig,
};
use lantern_platform::{FilePrefs, KeyInput};
use lantern_types::key::Key;
use lantern_types::Color;

/// Preference file next to the binary.
const PREFS_PATH: &str = "lantern_prefs.json";

/// The stdin host has no key polling; bindings never fire here.
struct NoKeys;

impl KeyInput for NoKeys {
    fn is_key_down(&self, _key: Key) -> bool {
        false
    }

    fn is_key_held(&self, _key: Key) -> bool {
        false
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut prefs = FilePrefs::open(PREFS_PATH);
    let mut engine = ConsoleEngine::with_config(ScrollbackConfig::default());
    engine.load_settings(&prefs);
    register_demo_commands(&mut engine);
    engine.open();

    log::info!("LANTERN console ready ({} commands)", engine.registry().len());
    println!("LANTERN console. Type 'help' for commands, 'close' to exit.");

    let stdin = io::stdin();
    let mut printed = 0usize;
    print_prompt()?;
    for line in stdin.lock().lines() {
        let line = line?;
        engine.run_command(&line);
        engine.tick(&NoKeys);
        printed = print_new_output(&engine, printed)?;
        if !engine.is_open() {
            break;
        }
        print_prompt()?;
    }

    engine.save_settings(&mut prefs)?;
    log::info!("settings saved to {PREFS_PATH}");
    Ok(())
}

fn print_prompt() -> Result<()> {
    print!("> ");
    io::stdout().flush()?;
    Ok(())
}

/// Print the part of the paged scrollback not shown yet. Page eviction and
/// `clear` shrink the total; reset the watermark when that happens.
fn print_new_output(engine: &ConsoleEngine, printed: usize) -> Result<usize> {
    let all: String = engine.scrollback().pages().map(LogPage::text).collect();
    let start = if all.len() < printed || !all.is_char_boundary(printed) {
        0
    } else {
        printed
    };
    if all.len() > start {
        print!("{}", &all[start..]);
        io::stdout().flush()?;
    }
    Ok(all.len())
}

/// A few host commands so the demo has something beyond the built-ins.
fn register_demo_commands(engine: &mut ConsoleEngine) {
    engine.register(
        Command::new("add", "Add two integers")
            .param("a", "first operand", ParamType::Int)
            .param("b", "second operand", ParamType::Int)
            .action(|args| {
                let a = args[0].as_int().unwrap_or_default();
                let b = args[1].as_int().unwrap_or_default();
                Ok(CommandOutput::Text(format!("{}", a + b)))
            }),
    );
    engine.register(
        Command::new("greet", "Greet someone")
            .aliases("hello")
            .param("name", "who to greet", ParamType::Str)
            .action(|args| {
                let name = args[0].as_str().unwrap_or("you");
                Ok(CommandOutput::Text(format!("Hello, {name}!")))
            })
            .default_action(|| Ok(CommandOutput::Text("Hello!".to_string()))),
    );
    engine.register(
        Command::new("tint", "Echo a parsed color")
            .param("color", "hex or comma components", ParamType::Color)
            .action(|args| {
                let c = args[0].as_color().unwrap_or(Color::BLACK);
                Ok(CommandOutput::Text(format!(
                    "rgba({:.3}, {:.3}, {:.3}, {:.3})",
                    c.r, c.g, c.b, c.a
                )))
            }),
    );
}
