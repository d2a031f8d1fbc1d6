//! Query string -> typed terms.
//!
//! `"quoted text"` is a phrase, `+term` is required, `-term` is excluded and a
//! bare term is optional. Phrases are pulled out before the rest is split.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref PHRASE: Regex = Regex::new(r#""([^"]*)""#).expect("valid regex");
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryTerm {
    Required(String),
    Optional(String),
    Excluded(String),
    /// Contiguous literal text. Always required.
    Phrase(String),
}

impl QueryTerm {
    pub fn text(&self) -> &str {
        match self {
            QueryTerm::Required(t) | QueryTerm::Optional(t) | QueryTerm::Excluded(t) | QueryTerm::Phrase(t) => t,
        }
    }

    pub fn is_required(&self) -> bool { matches!(self, QueryTerm::Required(_) | QueryTerm::Phrase(_)) }

    pub fn is_excluded(&self) -> bool { matches!(self, QueryTerm::Excluded(_)) }

    pub fn is_phrase(&self) -> bool { matches!(self, QueryTerm::Phrase(_)) }
}

/// True for queries that short-circuit to an empty result.
pub fn is_blank(query: &str) -> bool { query.trim().is_empty() }

pub fn parse_query(query: &str, case_sensitive: bool) -> Vec<QueryTerm> {
    let fold = |s: &str| if case_sensitive { s.to_string() } else { s.to_lowercase() };
    let mut terms = Vec::new();

    for caps in PHRASE.captures_iter(query) {
        let phrase = &caps[1];
        if phrase.trim().is_empty() { continue; }
        terms.push(QueryTerm::Phrase(fold(phrase)));
    }

    let remainder = PHRASE.replace_all(query, " ");
    for token in remainder.split_whitespace() {
        let term = if let Some(rest) = token.strip_prefix('+') {
            QueryTerm::Required(fold(rest))
        } else if let Some(rest) = token.strip_prefix('-') {
            QueryTerm::Excluded(fold(rest))
        } else {
            QueryTerm::Optional(fold(token))
        };
        if term.text().is_empty() { continue; }
        terms.push(term);
    }
    terms
}

#[cfg(test)]
mod tests {
    use super::*;
    use QueryTerm::*;

    #[test]
    fn operators_and_phrases() {
        let terms = parse_query(r#"+Rust -java "Memory  Safety" fast"#, false);
        assert_eq!(terms, vec![
            Phrase("memory  safety".into()),
            Required("rust".into()),
            Excluded("java".into()),
            Optional("fast".into()),
        ]);
    }

    #[test]
    fn bare_operators_are_dropped() {
        assert_eq!(parse_query("+ - x", false), vec![Optional("x".into())]);
        assert!(parse_query(r#""""#, false).is_empty());
    }

    #[test]
    fn case_sensitive_keeps_case() {
        assert_eq!(parse_query("+Rust", true), vec![Required("Rust".into())]);
        assert_eq!(parse_query(r#""Big Data""#, true), vec![Phrase("Big Data".into())]);
    }

    #[test]
    fn phrase_is_required() {
        let t = Phrase("a b".into());
        assert!(t.is_required() && t.is_phrase() && !t.is_excluded());
        assert!(!Optional("a".into()).is_required());
    }

    #[test]
    fn blank_queries() {
        assert!(is_blank("   \t"));
        assert!(!is_blank(" a "));
    }
}
