//! Interactive prompt: one line per submission until `:quit` or end of input.

use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::presenter::print_notice;
use super::Presenter;
use crate::models::{SourceCatalog, SourceId};
use crate::session::{Completion, SearchSession};

/// One parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Search text, possibly blank
    Query(String),
    /// `:source <id>`
    SelectSource(String),
    /// `:sources`
    ListSources,
    /// `:help`
    Help,
    /// `:quit`, `:q` or `:exit`
    Quit,
    /// An unrecognised `:` command
    Unknown(String),
}

/// Parse one line of input. Anything not starting with `:` is a query.
pub fn parse_line(line: &str) -> Input {
    let trimmed = line.trim();
    let Some(command) = trimmed.strip_prefix(':') else {
        return Input::Query(line.to_string());
    };

    let mut parts = command.splitn(2, char::is_whitespace);
    let name = parts.next().unwrap_or_default();
    let arg = parts.next().map(str::trim).unwrap_or_default();

    match name {
        "q" | "quit" | "exit" => Input::Quit,
        "source" | "s" if !arg.is_empty() => Input::SelectSource(arg.to_string()),
        "sources" | "source" | "s" => Input::ListSources,
        "help" | "h" | "?" => Input::Help,
        _ => Input::Unknown(trimmed.to_string()),
    }
}

/// Options for [`run`]
#[derive(Debug, Clone)]
pub struct InteractiveOptions {
    /// Check connectivity in the background before the first search
    pub probe: bool,
    /// Suppress the banner and help text
    pub quiet: bool,
}

/// Run the prompt until `:quit` or end of input.
///
/// Each query is submitted on its own task, so a new line supersedes a
/// search still in flight. On end of input the last submission is allowed to
/// finish and be drawn.
pub async fn run<R>(
    session: Arc<SearchSession>,
    catalog: SourceCatalog,
    presenter: Presenter,
    input: R,
    options: InteractiveOptions,
) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mode = presenter.mode();
    let shutdown = CancellationToken::new();
    let drawing = tokio::spawn(presenter.run(session.subscribe(), shutdown.clone()));

    if options.probe {
        let session = Arc::clone(&session);
        tokio::spawn(async move {
            let report = session.probe().await;
            print_notice(mode, report.is_ok(), &report.message());
        });
    }

    let mut selected = catalog.default_source().clone();
    if !options.quiet {
        print_help(&catalog, &selected);
    }

    let mut last: Option<JoinHandle<Completion>> = None;
    let mut lines = input.lines();

    while let Some(line) = lines.next_line().await? {
        match parse_line(&line) {
            Input::Query(text) => {
                let session = Arc::clone(&session);
                let source = selected.clone();
                last = Some(tokio::spawn(async move { session.submit(&text, source).await }));
            }
            Input::SelectSource(id) => match catalog.resolve(&id) {
                Ok(source) => {
                    print_notice(mode, true, &format!("Source set to {}", label(&catalog, &source)));
                    selected = source;
                }
                Err(e) => print_notice(mode, false, &e.to_string()),
            },
            Input::ListSources => print_sources(&catalog, &selected),
            Input::Help => print_help(&catalog, &selected),
            Input::Quit => break,
            Input::Unknown(command) => {
                print_notice(mode, false, &format!("Unknown command {} (try :help)", command))
            }
        }
    }

    if let Some(handle) = last {
        if let Err(e) = handle.await {
            tracing::warn!("Search task failed: {}", e);
        }
    }

    shutdown.cancel();
    if let Err(e) = drawing.await {
        tracing::warn!("Presenter task failed: {}", e);
    }

    Ok(())
}

fn label<'a>(catalog: &'a SourceCatalog, id: &'a SourceId) -> &'a str {
    catalog.get(id.as_str()).map(|o| o.label.as_str()).unwrap_or(id.as_str())
}

fn print_sources(catalog: &SourceCatalog, selected: &SourceId) {
    for option in catalog.options() {
        let marker = if &option.id == selected { "●" } else { "○" };
        eprintln!("  {} {:<12} {}", marker, option.id, option.label);
    }
}

fn print_help(catalog: &SourceCatalog, selected: &SourceId) {
    eprintln!("Type a search query and press Enter.");
    eprintln!("  :source <id>   switch source (current: {})", label(catalog, selected));
    eprintln!("  :sources       list sources");
    eprintln!("  :quit          exit");
}
