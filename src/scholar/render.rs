//! Plain-text rendering of aggregated publications.
//!
//! The output is the Observation fed back to the reasoning engine, so it
//! must stay compact and regular: numbered entries, at most three authors,
//! abstracts truncated to a fixed width.

use std::fmt::Write;

use super::record::Publication;

/// Maximum authors listed per publication before eliding.
const MAX_AUTHORS: usize = 3;
/// Maximum abstract characters before truncation.
const MAX_ABSTRACT_CHARS: usize = 120;
/// Year shown when the source gave none.
const NO_YEAR: &str = "n.d.";

/// Renders publications as an ordered plain-text listing.
///
/// An empty slice renders as `"No publications found."` so the engine
/// receives a definite observation rather than empty text.
#[must_use]
pub fn render_observation(publications: &[Publication]) -> String {
    if publications.is_empty() {
        return "No publications found.".to_string();
    }

    let mut out = String::new();
    for (i, publication) in publications.iter().enumerate() {
        let year = publication.year.as_deref().unwrap_or(NO_YEAR);
        let _ = write!(
            out,
            "{}. {} ({year})",
            i + 1,
            publication.title
        );
        if !publication.authors.is_empty() {
            let _ = write!(out, " — {}", render_authors(&publication.authors));
        }
        let _ = writeln!(out, " [cited by {}]", publication.citation_count);
        let _ = writeln!(out, "   {}", truncate_abstract(&publication.abstract_text));
        if !publication.url.is_empty() {
            let _ = writeln!(out, "   {}", publication.url);
        }
    }
    out
}

/// Joins up to three author names, appending `...` when more exist.
fn render_authors(authors: &[String]) -> String {
    let mut shown = authors
        .iter()
        .take(MAX_AUTHORS)
        .cloned()
        .collect::<Vec<_>>()
        .join(", ");
    if authors.len() > MAX_AUTHORS {
        shown.push_str("...");
    }
    shown
}

/// Truncates an abstract to the fixed character cap, `...`-suffixed.
/// Counts characters, not bytes, so multibyte text never splits.
fn truncate_abstract(text: &str) -> String {
    if text.chars().count() <= MAX_ABSTRACT_CHARS {
        return text.to_string();
    }
    let mut truncated: String = text.chars().take(MAX_ABSTRACT_CHARS).collect();
    truncated.push_str("...");
    truncated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scholar::record::{FALLBACK_ABSTRACT, FALLBACK_TITLE};

    fn publication(title: &str, authors: &[&str], abstract_text: &str) -> Publication {
        Publication {
            title: title.to_string(),
            authors: authors.iter().map(ToString::to_string).collect(),
            year: Some("2021".to_string()),
            abstract_text: abstract_text.to_string(),
            url: "https://example.org/p".to_string(),
            citation_count: 7,
        }
    }

    #[test]
    fn test_empty_renders_no_results_line() {
        assert_eq!(render_observation(&[]), "No publications found.");
    }

    #[test]
    fn test_basic_listing() {
        let rendered = render_observation(&[publication(
            "A Study",
            &["X", "Y"],
            "Short abstract.",
        )]);
        assert!(rendered.starts_with("1. A Study (2021) — X, Y [cited by 7]"));
        assert!(rendered.contains("Short abstract."));
        assert!(rendered.contains("https://example.org/p"));
    }

    #[test]
    fn test_author_ellipsis_beyond_three() {
        let rendered = render_observation(&[publication(
            "T",
            &["A", "B", "C", "D"],
            "x",
        )]);
        assert!(rendered.contains("A, B, C..."));
        assert!(!rendered.contains("D"));
    }

    #[test]
    fn test_abstract_truncated_at_cap() {
        let long = "q".repeat(200);
        let rendered = render_observation(&[publication("T", &["A"], &long)]);
        let expected = format!("{}...", "q".repeat(120));
        assert!(rendered.contains(&expected));
    }

    #[test]
    fn test_abstract_at_cap_not_truncated() {
        let exact = "e".repeat(120);
        let rendered = render_observation(&[publication("T", &["A"], &exact)]);
        assert!(rendered.contains(&exact));
        assert!(!rendered.contains(&format!("{exact}...")));
    }

    #[test]
    fn test_multibyte_abstract_truncation() {
        let long = "研".repeat(130);
        let rendered = render_observation(&[publication("T", &["A"], &long)]);
        assert!(rendered.contains(&format!("{}...", "研".repeat(120))));
    }

    #[test]
    fn test_missing_year_renders_marker() {
        let mut p = publication("T", &[], "x");
        p.year = None;
        let rendered = render_observation(&[p]);
        assert!(rendered.contains("(n.d.)"));
        // No author segment when the list is empty.
        assert!(!rendered.contains("—"));
    }

    #[test]
    fn test_fallback_fields_render() {
        let p = Publication {
            title: FALLBACK_TITLE.to_string(),
            authors: Vec::new(),
            year: None,
            abstract_text: FALLBACK_ABSTRACT.to_string(),
            url: String::new(),
            citation_count: 0,
        };
        let rendered = render_observation(&[p]);
        assert!(rendered.contains(FALLBACK_TITLE));
        assert!(rendered.contains(FALLBACK_ABSTRACT));
        assert!(rendered.contains("[cited by 0]"));
    }
}
