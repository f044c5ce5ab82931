//! Publication records and normalization.
//!
//! The source yields best-effort [`RawRecord`]s whose fields may be absent
//! or loosely typed (a single author as a bare string, a year as either a
//! string or an integer). Normalization into [`Publication`] guarantees
//! every field downstream is present with a typed value or an explicit
//! fallback, so no consumer ever hits a missing-key failure.

use serde::{Deserialize, Serialize};

/// Placeholder title for records that arrive without one.
pub const FALLBACK_TITLE: &str = "(untitled)";
/// Placeholder abstract for records with a missing or empty abstract.
pub const FALLBACK_ABSTRACT: &str = "No abstract available.";

/// Author field as the provider delivers it: a single name or a list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AuthorField {
    /// A single author given as a bare string.
    One(String),
    /// Multiple authors.
    Many(Vec<String>),
}

/// Publication year as the provider delivers it: string or integer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum YearField {
    /// Year as a string, e.g. `"2021"`.
    Text(String),
    /// Year as an integer.
    Number(i64),
}

/// One raw publication record from the source. All fields best-effort.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawRecord {
    /// Work title.
    #[serde(default)]
    pub title: Option<String>,
    /// Author or authors.
    #[serde(default)]
    pub author: Option<AuthorField>,
    /// Publication year.
    #[serde(default)]
    pub pub_year: Option<YearField>,
    /// Abstract text.
    #[serde(default, rename = "abstract")]
    pub abstract_text: Option<String>,
    /// Canonical URL for the work.
    #[serde(default)]
    pub pub_url: Option<String>,
    /// Citation count.
    #[serde(default)]
    pub citedby: Option<i64>,
}

/// A normalized publication. Every field is present (§ fallback rules in
/// [`RawRecord`] docs); `year` uses `None` as its explicit absent-marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Publication {
    /// Work title, never empty.
    pub title: String,
    /// Ordered author names; empty when the source gave none.
    pub authors: Vec<String>,
    /// Publication year, `None` when the source gave none.
    pub year: Option<String>,
    /// Abstract text, never empty.
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    /// Canonical URL; may be empty.
    pub url: String,
    /// Citation count; 0 when the source gave none.
    pub citation_count: u32,
}

impl From<RawRecord> for Publication {
    fn from(raw: RawRecord) -> Self {
        let title = match raw.title {
            Some(t) if !t.trim().is_empty() => t,
            _ => FALLBACK_TITLE.to_string(),
        };

        let authors = match raw.author {
            Some(AuthorField::One(name)) => vec![name],
            Some(AuthorField::Many(names)) => names,
            None => Vec::new(),
        };

        let year = raw.pub_year.map(|y| match y {
            YearField::Text(s) => s,
            YearField::Number(n) => n.to_string(),
        });

        let abstract_text = match raw.abstract_text {
            Some(a) if !a.trim().is_empty() => a,
            _ => FALLBACK_ABSTRACT.to_string(),
        };

        Self {
            title,
            authors,
            year,
            abstract_text,
            url: raw.pub_url.unwrap_or_default(),
            citation_count: raw.citedby.map_or(0, |c| u32::try_from(c).unwrap_or(0)),
        }
    }
}

impl Publication {
    /// Key used for optional cross-keyword deduplication.
    #[must_use]
    pub fn dedupe_key(&self) -> (String, Option<String>) {
        (self.title.to_lowercase(), self.year.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_full_record() {
        let raw = RawRecord {
            title: Some("Attention Is All You Need".to_string()),
            author: Some(AuthorField::Many(vec![
                "A Vaswani".to_string(),
                "N Shazeer".to_string(),
            ])),
            pub_year: Some(YearField::Number(2017)),
            abstract_text: Some("The dominant sequence transduction models...".to_string()),
            pub_url: Some("https://example.org/1706.03762".to_string()),
            citedby: Some(100_000),
        };
        let publication = Publication::from(raw);
        assert_eq!(publication.title, "Attention Is All You Need");
        assert_eq!(publication.authors.len(), 2);
        assert_eq!(publication.year.as_deref(), Some("2017"));
        assert_eq!(publication.citation_count, 100_000);
    }

    #[test]
    fn test_normalize_empty_record() {
        let publication = Publication::from(RawRecord::default());
        assert_eq!(publication.title, FALLBACK_TITLE);
        assert!(publication.authors.is_empty());
        assert!(publication.year.is_none());
        assert_eq!(publication.abstract_text, FALLBACK_ABSTRACT);
        assert!(publication.url.is_empty());
        assert_eq!(publication.citation_count, 0);
    }

    #[test]
    fn test_single_string_author_becomes_one_element_list() {
        let raw = RawRecord {
            author: Some(AuthorField::One("J Smith".to_string())),
            ..RawRecord::default()
        };
        let publication = Publication::from(raw);
        assert_eq!(publication.authors, vec!["J Smith".to_string()]);
    }

    #[test]
    fn test_blank_abstract_gets_fallback() {
        let raw = RawRecord {
            abstract_text: Some("   ".to_string()),
            ..RawRecord::default()
        };
        let publication = Publication::from(raw);
        assert_eq!(publication.abstract_text, FALLBACK_ABSTRACT);
    }

    #[test]
    fn test_string_year_preserved() {
        let raw = RawRecord {
            pub_year: Some(YearField::Text("2020".to_string())),
            ..RawRecord::default()
        };
        assert_eq!(Publication::from(raw).year.as_deref(), Some("2020"));
    }

    #[test]
    fn test_negative_citedby_clamps_to_zero() {
        let raw = RawRecord {
            citedby: Some(-3),
            ..RawRecord::default()
        };
        assert_eq!(Publication::from(raw).citation_count, 0);
    }

    #[test]
    fn test_raw_record_deserializes_loose_json() {
        let json = r#"{"title": "T", "author": "Solo Author", "pub_year": 1999}"#;
        let raw: RawRecord = serde_json::from_str(json).unwrap_or_else(|e| {
            unreachable!("deserialize failed: {e}");
        });
        assert!(matches!(raw.author, Some(AuthorField::One(_))));
        assert!(matches!(raw.pub_year, Some(YearField::Number(1999))));
    }
}
