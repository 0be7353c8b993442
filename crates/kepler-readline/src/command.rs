//! REPL command parsing.

/// Slash commands offered for completion, in help order.
pub const COMMANDS: [&str; 8] = [
    "/start", "/select", "/spectra", "/ask", "/back", "/status", "/reset", "/help",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Dismiss the briefing.
    Start,
    /// Focus a planet by id or name.
    Select(String),
    /// List the reference spectra.
    Spectra,
    /// One-shot question outside the conversation.
    Ask(String),
    Back,
    Status,
    /// Drop the chat session so the next exchange opens a new one.
    Reset,
    Help,
    Quit,
    /// Free text for Mission Command.
    Say(String),
    /// A command that could not be understood, with a usage hint.
    Invalid(String),
}

impl Command {
    /// Parses one input line. Blank lines yield `None`.
    pub fn parse(line: &str) -> Option<Self> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return None;
        }
        if matches!(trimmed, "quit" | "exit") {
            return Some(Self::Quit);
        }
        if !trimmed.starts_with('/') {
            return Some(Self::Say(trimmed.to_string()));
        }

        let (name, arg) = match trimmed.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (trimmed, ""),
        };

        let command = match (name, arg.is_empty()) {
            ("/start", _) => Self::Start,
            ("/select", false) => Self::Select(arg.to_string()),
            ("/select", true) => Self::Invalid("Usage: /select <planet>".to_string()),
            ("/spectra", _) => Self::Spectra,
            ("/ask", false) => Self::Ask(arg.to_string()),
            ("/ask", true) => Self::Invalid("Usage: /ask <question>".to_string()),
            ("/back", _) => Self::Back,
            ("/status", _) => Self::Status,
            ("/reset", _) => Self::Reset,
            ("/help", _) => Self::Help,
            ("/quit" | "/exit", _) => Self::Quit,
            (other, _) => Self::Invalid(format!("Unknown command: {other}. Type /help.")),
        };
        Some(command)
    }
}
