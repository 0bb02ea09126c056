use crate::config::{Resolution, SUPPORTED_RESOLUTIONS};
use crate::prompt::Mode;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Set the custom prompt and switch to manual mode.
    Prompt(String),
    Mode(Mode),
    /// Auto-change interval in minutes.
    Interval(u64),
    Resolution(Resolution),
    Model(String),
    /// API key; empty clears it.
    Key(String),
    Save,
    Generate,
    Help,
    Quit,
}

/// Parse a `:` command line. `Err` carries a message for the status bar.
pub fn parse_command(input: &str) -> Result<Command, String> {
    let input = input.strip_prefix(':').unwrap_or(input).trim();

    if input.is_empty() {
        return Err("Empty command".into());
    }

    let (cmd, args) = match input.split_once(char::is_whitespace) {
        Some((cmd, args)) => (cmd, args.trim()),
        None => (input, ""),
    };

    match cmd {
        "prompt" | "p" if !args.is_empty() => Ok(Command::Prompt(args.to_owned())),
        "prompt" | "p" => Err("Usage: prompt <text>".into()),
        "mode" => args.parse().map(Command::Mode),
        "interval" | "i" => args
            .parse::<u64>()
            .ok()
            .filter(|m| *m > 0)
            .map(Command::Interval)
            .ok_or_else(|| format!("Invalid interval: {args:?} (minutes)")),
        "res" | "resolution" => args
            .parse()
            .map(Command::Resolution)
            .map_err(|e| format!("{e} (e.g. {})", SUPPORTED_RESOLUTIONS.join(", "))),
        "model" if !args.is_empty() => Ok(Command::Model(args.to_owned())),
        "model" => Err("Usage: model <name>".into()),
        "key" => Ok(Command::Key(args.to_owned())),
        "save" | "w" => Ok(Command::Save),
        "generate" | "gen" | "g" => Ok(Command::Generate),
        "help" | "h" => Ok(Command::Help),
        "quit" | "q" => Ok(Command::Quit),
        other => Err(format!("Unknown command: {other}")),
    }
}
