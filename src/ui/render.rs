//! Turning paper results into display cards.
//!
//! Everything here is pure: no terminal access, no clocks. The presenter in
//! [`super::presenter`] decides how a [`Card`] reaches the screen.

use serde::Serialize;
use std::time::Duration;

use crate::models::PaperResult;

/// Authors listed before the list is shortened with "et al."
pub const MAX_LISTED_AUTHORS: usize = 3;

pub const UNKNOWN_AUTHORS: &str = "Unknown authors";
pub const NO_DATE: &str = "No date";
pub const NO_SUMMARY: &str = "No summary available";

/// One rendered result, with every fallback already applied
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Card {
    pub title: String,
    pub link: String,
    pub published: String,
    pub source: String,
    pub summary: String,
    pub authors: String,

    /// How long after the first card this one should appear
    #[serde(skip)]
    pub reveal_delay: Duration,
}

impl Card {
    pub fn from_paper(paper: &PaperResult, reveal_delay: Duration) -> Self {
        Self {
            title: paper.title.clone(),
            link: paper.link.clone(),
            published: or_fallback(paper.published.as_deref(), NO_DATE),
            source: paper.source.clone(),
            summary: or_fallback(paper.summary.as_deref(), NO_SUMMARY),
            authors: format_authors(&paper.authors),
            reveal_delay,
        }
    }
}

/// Absent and blank values both count as missing
fn or_fallback(value: Option<&str>, fallback: &str) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.to_string(),
        _ => fallback.to_string(),
    }
}

/// Author line for a card.
///
/// ```
/// use research_hub::ui::format_authors;
///
/// let authors: Vec<String> = ["A", "B", "C", "D"].iter().map(|s| s.to_string()).collect();
/// assert_eq!(format_authors(&authors), "A, B, C, et al.");
/// assert_eq!(format_authors(&[]), "Unknown authors");
/// ```
pub fn format_authors(authors: &[String]) -> String {
    let line = if authors.len() > MAX_LISTED_AUTHORS {
        format!("{}, et al.", authors[..MAX_LISTED_AUTHORS].join(", "))
    } else {
        authors.join(", ")
    };

    if line.trim().is_empty() {
        UNKNOWN_AUTHORS.to_string()
    } else {
        line
    }
}

/// One card per result, in the order received.
///
/// Card `i` is revealed `i * stagger` after the first.
pub fn render_results(results: &[PaperResult], stagger: Duration) -> Vec<Card> {
    results
        .iter()
        .enumerate()
        .map(|(i, paper)| {
            let index = u32::try_from(i).unwrap_or(u32::MAX);
            Card::from_paper(paper, stagger.saturating_mul(index))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("Author {}", i)).collect()
    }

    #[test]
    fn test_five_authors_shortened() {
        assert_eq!(
            format_authors(&names(5)),
            "Author 1, Author 2, Author 3, et al."
        );
    }

    #[test]
    fn test_three_or_fewer_authors_listed() {
        assert_eq!(format_authors(&names(1)), "Author 1");
        assert_eq!(format_authors(&names(3)), "Author 1, Author 2, Author 3");
        assert_eq!(
            format_authors(&names(4)),
            "Author 1, Author 2, Author 3, et al."
        );
    }

    #[test]
    fn test_no_authors() {
        assert_eq!(format_authors(&[]), "Unknown authors");
    }

    #[test]
    fn test_card_fallbacks() {
        let paper = PaperResult::new("Title", "https://example.com", "bioRxiv");
        let card = Card::from_paper(&paper, Duration::ZERO);

        assert_eq!(card.published, "No date");
        assert_eq!(card.summary, "No summary available");
        assert_eq!(card.authors, "Unknown authors");
        assert_eq!(card.source, "bioRxiv");
    }

    #[test]
    fn test_blank_fields_use_fallbacks() {
        let paper = PaperResult::new("Title", "#", "arXiv")
            .with_published("")
            .with_summary("   ")
            .with_authors([""]);
        let card = Card::from_paper(&paper, Duration::ZERO);

        assert_eq!(card.published, "No date");
        assert_eq!(card.summary, "No summary available");
        assert_eq!(card.authors, "Unknown authors");
    }

    #[test]
    fn test_blank_author_names() {
        let blanks = vec![String::new(), String::new()];
        assert_eq!(format_authors(&blanks), "Unknown authors");

        let mixed = vec![String::new(), "Ada Lovelace".to_string()];
        assert_eq!(format_authors(&mixed), ", Ada Lovelace");
    }

    #[test]
    fn test_render_keeps_order_and_staggers() {
        let results = vec![
            PaperResult::new("C", "#", "arXiv"),
            PaperResult::new("A", "#", "arXiv"),
            PaperResult::new("C", "#", "arXiv"),
        ];
        let cards = render_results(&results, Duration::from_millis(100));

        let titles: Vec<_> = cards.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["C", "A", "C"]);

        let delays: Vec<_> = cards.iter().map(|c| c.reveal_delay.as_millis()).collect();
        assert_eq!(delays, vec![0, 100, 200]);
    }
}
