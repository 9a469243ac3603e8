use colored::Colorize;
use std::fmt;
use std::sync::{OnceLock, PoisonError, RwLock};

/// Message categories used by the CLI output helpers.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Success,
    Warning,
    Error,
    Section,
    Detail,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct OutputPreferences {
    /// Disable colors and decorations (script mode, piped output).
    pub plain: bool,
    /// Suppress informational chatter; warnings and errors still print.
    pub quiet: bool,
}

static PREFERENCES: OnceLock<RwLock<OutputPreferences>> = OnceLock::new();

pub fn set_preferences(prefs: OutputPreferences) {
    let lock = PREFERENCES.get_or_init(|| RwLock::new(OutputPreferences::default()));
    let mut guard = lock.write().unwrap_or_else(PoisonError::into_inner);
    *guard = prefs;
    if prefs.plain {
        colored::control::set_override(false);
    }
}

pub fn current_preferences() -> OutputPreferences {
    PREFERENCES
        .get_or_init(|| RwLock::new(OutputPreferences::default()))
        .read()
        .map(|guard| *guard)
        .unwrap_or_default()
}

fn should_skip(kind: MessageKind, prefs: &OutputPreferences) -> bool {
    prefs.quiet && matches!(kind, MessageKind::Info | MessageKind::Detail)
}

/// Plain-text rendering shared by the printer and by tests.
pub fn format_message(kind: MessageKind, message: impl fmt::Display) -> String {
    let text = message.to_string();
    match kind {
        MessageKind::Section => format!("=== {} ===", text.trim()),
        MessageKind::Detail => format!("  {text}"),
        MessageKind::Info => format!("INFO: {text}"),
        MessageKind::Success => format!("SUCCESS: {text}"),
        MessageKind::Warning => format!("WARNING: {text}"),
        MessageKind::Error => format!("ERROR: {text}"),
    }
}

fn apply_style(kind: MessageKind, formatted: String, prefs: &OutputPreferences) -> String {
    if prefs.plain {
        return formatted;
    }
    match kind {
        MessageKind::Success => formatted.bright_green().to_string(),
        MessageKind::Warning => formatted.bright_yellow().to_string(),
        MessageKind::Error => formatted.bright_red().to_string(),
        MessageKind::Section => formatted.bold().to_string(),
        MessageKind::Detail => formatted.dimmed().to_string(),
        MessageKind::Info => formatted,
    }
}

pub fn print(kind: MessageKind, message: impl fmt::Display) {
    let prefs = current_preferences();
    if should_skip(kind, &prefs) {
        return;
    }
    let formatted = apply_style(kind, format_message(kind, message), &prefs);
    match kind {
        MessageKind::Section => println!("\n{}", formatted),
        _ => println!("{}", formatted),
    }
}

pub fn info(message: impl fmt::Display) {
    print(MessageKind::Info, message);
}

pub fn success(message: impl fmt::Display) {
    print(MessageKind::Success, message);
}

pub fn warning(message: impl fmt::Display) {
    print(MessageKind::Warning, message);
}

pub fn error(message: impl fmt::Display) {
    print(MessageKind::Error, message);
}

pub fn section(title: impl fmt::Display) {
    print(MessageKind::Section, title);
}

pub fn detail(message: impl fmt::Display) {
    print(MessageKind::Detail, message);
}

/// Prints pre-rendered lines verbatim. Quiet mode does not apply.
pub fn lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}
