use std::io::IsTerminal;

use weather_core::{DisplayUpdate, MessageKind, View};

/// Writes the status region and the result region to the terminal.
///
/// Info messages go to stdout, errors to stderr. Output already printed cannot be
/// taken back, so hiding the result is a no-op.
#[derive(Debug)]
pub struct TerminalView {
    stdout_color: bool,
    stderr_color: bool,
}

impl TerminalView {
    pub fn new() -> Self {
        Self::with_colors(std::io::stdout().is_terminal(), std::io::stderr().is_terminal())
    }

    pub fn with_colors(stdout_color: bool, stderr_color: bool) -> Self {
        Self {
            stdout_color,
            stderr_color,
        }
    }

    // Info goes to stdout, errors to stderr; each stream is checked on its own.
    fn colored(&self, kind: MessageKind) -> bool {
        match kind {
            MessageKind::Info => self.stdout_color,
            MessageKind::Error => self.stderr_color,
        }
    }
}

impl Default for TerminalView {
    fn default() -> Self {
        Self::new()
    }
}

impl View for TerminalView {
    fn show_message(&self, text: &str, kind: MessageKind) {
        if text.is_empty() {
            return;
        }

        match kind {
            MessageKind::Info => println!("{}", paint(text, kind, self.colored(kind))),
            MessageKind::Error => eprintln!("{}", paint(text, kind, self.colored(kind))),
        }
    }

    fn hide_result(&self) {}

    fn show_result(&self, update: &DisplayUpdate) {
        println!("{}", format_result(update));
    }
}

fn paint(text: &str, kind: MessageKind, color: bool) -> String {
    if !color {
        return text.to_string();
    }

    let code = match kind {
        MessageKind::Info => "32",
        MessageKind::Error => "31",
    };
    format!("\u{1b}[{code}m{text}\u{1b}[0m")
}

pub fn format_result(update: &DisplayUpdate) -> String {
    let rows = [
        ("Temperatur", update.temperature.as_str()),
        ("Beschreibung", update.description.as_str()),
        ("Gefühlt", update.feels_like.as_str()),
        ("Luftfeuchtigkeit", update.humidity.as_str()),
        ("Wind", update.wind.as_str()),
        ("Symbol", update.icon_url.as_str()),
    ];

    let mut out = update.city_label.clone();
    for (label, value) in rows {
        out.push_str(&format!("\n  {:<18}{value}", format!("{label}:")));
    }
    out
}
