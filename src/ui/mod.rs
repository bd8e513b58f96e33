//! Terminal UI for search results.
//!
//! - [`render`]: pure conversion of results into [`Card`]s
//! - [`state`]: the [`UiState`] machine
//! - [`presenter`]: draws states on the terminal
//! - [`interactive`]: the read-submit loop
//!
//! The helpers in this module (icons, spinner, wrapping) are shared by the
//! presenter and the binary.

pub mod interactive;
pub mod presenter;
pub mod render;
pub mod state;

pub use presenter::{OutputMode, Presenter};
pub use render::{format_authors, render_results, Card};
pub use state::{UiState, Visibility};

use owo_colors::OwoColorize;
use std::io::IsTerminal;
use std::time::Duration;
use unicode_width::UnicodeWidthStr;

/// Get the current terminal width.
pub fn terminal_width() -> usize {
    terminal_size::terminal_size()
        .map(|(w, _)| w.0 as usize)
        .unwrap_or(100)
}

/// Check if stdout is a terminal.
pub fn is_terminal() -> bool {
    std::io::stdout().is_terminal()
}

/// Icon for a source display name or id.
pub fn source_icon(source: &str) -> &'static str {
    match source.to_lowercase().as_str() {
        "arxiv" => "📝",
        "biorxiv" => "🧬",
        _ => "📄",
    }
}

/// Status types for colored output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Error,
    Warning,
    Search,
}

/// Status icons for different operations.
pub fn status_icon(status: Status) -> &'static str {
    match status {
        Status::Success => "✓",
        Status::Error => "✗",
        Status::Warning => "⚠",
        Status::Search => "🔍",
    }
}

/// Print a styled status line to stderr.
pub fn print_status(status: Status, msg: &str) {
    let icon = status_icon(status);
    match status {
        Status::Success => eprintln!("{} {}", icon.green().bold(), msg),
        Status::Error => eprintln!("{} {}", icon.red().bold(), msg.red()),
        Status::Warning => eprintln!("{} {}", icon.yellow().bold(), msg.yellow()),
        Status::Search => eprintln!("{} {}", icon.yellow(), msg),
    }
}

/// Print search results header.
pub fn print_search_header(query: &str, count: usize) {
    println!();
    println!(
        "{} Search results for: \"{}\"",
        status_icon(Status::Search).yellow().bold(),
        query.cyan().bold()
    );
    println!(
        "{} Found {} papers",
        "─".repeat(30).dimmed(),
        count.to_string().green().bold()
    );
    println!();
}

/// Print one result card.
pub fn print_card(card: &Card) {
    let width = terminal_width().saturating_sub(4).clamp(40, 100);

    println!(
        "{} {}",
        source_icon(&card.source),
        card.title.blue().bold()
    );
    println!(
        "   📅 {}   🗄  {}",
        card.published.yellow(),
        card.source.green()
    );
    for line in wrap_text(&card.summary, width) {
        println!("   {}", line.dimmed());
    }
    println!("   👥 {}", card.authors);
    println!("   🔗 Read paper: {}", card.link.underline());
    println!();
}

/// Wrap text into lines no wider than `width` display columns.
///
/// Words wider than `width` are kept whole on their own line.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;

    for word in text.split_whitespace() {
        let word_width = word.width();
        if current_width > 0 && current_width + 1 + word_width > width {
            lines.push(std::mem::take(&mut current));
            current_width = 0;
        }
        if current_width > 0 {
            current.push(' ');
            current_width += 1;
        }
        current.push_str(word);
        current_width += word_width;
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Loading spinner, drawn on stderr and hidden when stderr is not a terminal.
pub struct Spinner {
    pb: indicatif::ProgressBar,
}

impl Spinner {
    /// Create a new spinner with the given message.
    pub fn new(msg: &str) -> Self {
        let pb = indicatif::ProgressBar::new_spinner();
        if let Ok(style) = indicatif::ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            pb.set_style(style.tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ "));
        }
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));

        Self { pb }
    }

    /// Set the message.
    pub fn set_message(&self, msg: &str) {
        self.pb.set_message(msg.to_string());
    }

    /// Remove the spinner from the screen.
    pub fn clear(&self) {
        self.pb.finish_and_clear();
    }
}
