//! Draws [`UiState`] changes on the terminal.

use tokio::sync::watch;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::{print_card, print_search_header, print_status, Spinner, Status, UiState};

/// How results are written to stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Colored cards, revealed one by one
    Cards,
    /// Raw results as pretty-printed JSON
    Json,
    /// One paper per block, no colors
    Plain,
}

/// Terminal adapter for a search session
pub struct Presenter {
    mode: OutputMode,
    animate: bool,
    spinner: Option<Spinner>,
}

impl Presenter {
    pub fn new(mode: OutputMode, animate: bool) -> Self {
        Self {
            mode,
            animate,
            spinner: None,
        }
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    /// Draw one state
    pub async fn show(&mut self, state: &UiState) {
        self.draw(state, None).await;
    }

    /// Draw `state`, abandoning a staggered reveal once `updates` has a newer
    /// state waiting.
    async fn draw(&mut self, state: &UiState, updates: Option<&watch::Receiver<UiState>>) {
        match state {
            UiState::Idle => {}
            UiState::Loading { query } => {
                let msg = format!("Searching for \"{}\"...", query);
                match &self.spinner {
                    Some(spinner) => spinner.set_message(&msg),
                    None => self.spinner = Some(Spinner::new(&msg)),
                }
            }
            UiState::Results {
                query,
                results,
                cards,
            } => {
                self.clear_spinner();
                match self.mode {
                    OutputMode::Json => match serde_json::to_string_pretty(results) {
                        Ok(json) => println!("{}", json),
                        Err(e) => print_status(Status::Error, &format!("Failed to encode results: {}", e)),
                    },
                    OutputMode::Plain => {
                        for card in cards {
                            println!("{}", card.title);
                            println!("  {} | {}", card.published, card.source);
                            println!("  {}", card.authors);
                            println!("  {}", card.summary);
                            println!("  {}", card.link);
                            println!();
                        }
                    }
                    OutputMode::Cards => {
                        print_search_header(query, cards.len());
                        let start = Instant::now();
                        for card in cards {
                            if self.animate && !card.reveal_delay.is_zero() {
                                tokio::time::sleep_until(start + card.reveal_delay).await;
                                if updates.is_some_and(|rx| rx.has_changed().unwrap_or(true)) {
                                    tracing::debug!("Newer state pending, stopping reveal");
                                    break;
                                }
                            }
                            print_card(card);
                        }
                    }
                }
            }
            UiState::Error { error } => {
                self.clear_spinner();
                let message = error.user_message();
                match self.mode {
                    OutputMode::Plain => eprintln!("{}", message),
                    _ => print_status(Status::Error, &message),
                }
            }
        }
    }

    /// Draw every state published on `rx` until `shutdown` fires.
    ///
    /// A change published before shutdown is still drawn.
    pub async fn run(mut self, mut rx: watch::Receiver<UiState>, shutdown: CancellationToken) -> Self {
        loop {
            tokio::select! {
                biased;
                changed = rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let state = rx.borrow_and_update().clone();
                    self.draw(&state, Some(&rx)).await;
                }
                _ = shutdown.cancelled() => break,
            }
        }

        self.clear_spinner();
        self
    }

    fn clear_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.clear();
        }
    }
}

/// Print a diagnostic line in the presenter's style
pub fn print_notice(mode: OutputMode, ok: bool, msg: &str) {
    match mode {
        OutputMode::Plain => eprintln!("{}", msg),
        _ => print_status(notice_status(ok), msg),
    }
}

fn notice_status(ok: bool) -> Status {
    if ok {
        Status::Success
    } else {
        Status::Warning
    }
}
