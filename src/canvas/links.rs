//! `Link` response header parsing.
//!
//! Canvas advertises pagination through an RFC 8288 style header:
//!
//! ```text
//! Link: <https://canvas.example.com/api/v1/courses?page=2&per_page=10>; rel="next",
//!       <https://canvas.example.com/api/v1/courses?page=1&per_page=10>; rel="first"
//! ```
//!
//! Parsing is lenient: entries that do not look like `<url>; rel="name"` are
//! skipped and the parser never fails.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

static LINK_ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<([^>]+)>\s*;\s*rel="([^"]+)""#).expect("link entry pattern is valid")
});

/// Relation name → URL, as advertised by one response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PageLinks(BTreeMap<String, String>);

impl PageLinks {
    /// URL for an arbitrary relation name.
    pub fn get(&self, rel: &str) -> Option<&str> {
        self.0.get(rel).map(String::as_str)
    }

    pub fn current(&self) -> Option<&str> {
        self.get("current")
    }

    /// The next page; its absence ends pagination.
    pub fn next(&self) -> Option<&str> {
        self.get("next")
    }

    pub fn prev(&self) -> Option<&str> {
        self.get("prev")
    }

    pub fn first(&self) -> Option<&str> {
        self.get("first")
    }

    pub fn last(&self) -> Option<&str> {
        self.get("last")
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(rel, url)| (rel.as_str(), url.as_str()))
    }
}

/// Parse a raw `Link` header value.
///
/// A `rel` holding several space-separated names registers the URL under each
/// of them. When a name repeats, the last entry wins.
pub fn parse_link_header(header: Option<&str>) -> PageLinks {
    let mut links = BTreeMap::new();

    let Some(header) = header else {
        return PageLinks(links);
    };

    for captures in LINK_ENTRY.captures_iter(header) {
        let url = captures[1].trim();
        if url.is_empty() {
            continue;
        }
        for rel in captures[2].split_whitespace() {
            links.insert(rel.to_string(), url.to_string());
        }
    }

    PageLinks(links)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CANVAS_HEADER: &str = concat!(
        r#"<https://canvas.example.com/api/v1/courses?page=1&per_page=10>; rel="current","#,
        r#"<https://canvas.example.com/api/v1/courses?page=2&per_page=10>; rel="next","#,
        r#"<https://canvas.example.com/api/v1/courses?page=1&per_page=10>; rel="first","#,
        r#"<https://canvas.example.com/api/v1/courses?page=5&per_page=10>; rel="last""#
    );

    #[test]
    fn test_parses_all_relations() {
        let links = parse_link_header(Some(CANVAS_HEADER));
        assert_eq!(links.len(), 4);
        assert_eq!(
            links.next(),
            Some("https://canvas.example.com/api/v1/courses?page=2&per_page=10")
        );
        assert_eq!(
            links.last(),
            Some("https://canvas.example.com/api/v1/courses?page=5&per_page=10")
        );
        assert_eq!(
            links.current(),
            Some("https://canvas.example.com/api/v1/courses?page=1&per_page=10")
        );
        assert_eq!(links.prev(), None);
    }

    #[test]
    fn test_missing_header_is_empty() {
        assert!(parse_link_header(None).is_empty());
        assert!(parse_link_header(Some("")).is_empty());
    }

    #[test]
    fn test_malformed_entries_are_skipped() {
        let links = parse_link_header(Some(
            r#"garbage, <https://a.example/x>; rel=next, <https://b.example/y>; rel="prev""#,
        ));
        assert_eq!(links.len(), 1);
        assert_eq!(links.prev(), Some("https://b.example/y"));
        assert_eq!(links.next(), None);

        assert!(parse_link_header(Some("<>; rel=\"next\"")).is_empty());
        assert!(parse_link_header(Some("not a link header at all")).is_empty());
    }

    #[test]
    fn test_tolerates_whitespace_and_commas_in_urls() {
        let links = parse_link_header(Some(
            r#"  <https://a.example/x?ids=1,2,3>  ;  rel="next" ,<https://a.example/x?page=1>;rel="first""#,
        ));
        assert_eq!(links.next(), Some("https://a.example/x?ids=1,2,3"));
        assert_eq!(links.first(), Some("https://a.example/x?page=1"));
    }

    #[test]
    fn test_multiple_relation_names() {
        let links = parse_link_header(Some(r#"<https://a.example/p5>; rel="next last""#));
        assert_eq!(links.next(), Some("https://a.example/p5"));
        assert_eq!(links.last(), Some("https://a.example/p5"));
    }

    #[test]
    fn test_last_duplicate_wins() {
        let links = parse_link_header(Some(
            r#"<https://a.example/1>; rel="next", <https://a.example/2>; rel="next""#,
        ));
        assert_eq!(links.next(), Some("https://a.example/2"));
        assert_eq!(links.iter().count(), 1);
    }
}
