//! Query parsing module
//!
//! Turns a raw search string into include/exclude phrases and resolved options.
//! Supported syntax, one optional leading sigil per token:
//! - Exclude: `-disco`, `-"hip hop"`
//! - Include (explicit): `+bunkier`, `+"the analogs"`
//! - Option shortcut: `!c` (resolved through a caller supplied map)
//! - Quoted phrases: `"the analogs"` count as a single token

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use tracing::warn;

/// Default maximum number of tokens taken from one query
pub const DEFAULT_TOKEN_LIMIT: usize = 10;

/// A quoted run (with optional sigil) or any other whitespace-delimited run
static TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"([-+!]?)"([^"]*)"|\S+"#).expect("token pattern is valid"));

/// Short code -> option value lookup used for `!` tokens
pub type QueryOptionMap = HashMap<String, String>;

/// Parsed search query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    /// Original query, trimmed
    raw: String,
    /// Phrases that must match
    phrases: Vec<String>,
    /// Phrases that must not match
    excludes: Vec<String>,
    /// Resolved option values
    options: Vec<String>,
    /// Whether tokens were dropped because of the token limit
    limit_reached: bool,
}

/// Sigil found at the start of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sigil {
    Include,
    Exclude,
    Option,
    Bare,
}

impl Sigil {
    fn split(token: &str) -> (Self, &str) {
        match token.chars().next() {
            Some('-') => (Self::Exclude, &token[1..]),
            Some('+') => (Self::Include, &token[1..]),
            Some('!') => (Self::Option, &token[1..]),
            _ => (Self::Bare, token),
        }
    }
}

impl Query {
    /// Parse a raw query string
    ///
    /// Never fails. Tokens past `token_limit` are dropped and `limit_reached` is set,
    /// which keeps the number of predicates built from one query bounded.
    pub fn parse(raw: &str, token_limit: usize, available_options: &QueryOptionMap) -> Self {
        let raw = raw.trim();
        let tokens: Vec<&str> = TOKEN_RE.find_iter(raw).map(|m| m.as_str()).collect();

        let limit_reached = tokens.len() > token_limit;
        if limit_reached {
            warn!(
                "Query has {} tokens, keeping the first {}",
                tokens.len(),
                token_limit
            );
        }

        let mut phrases = Vec::new();
        let mut excludes = Vec::new();
        let mut options = Vec::new();

        for token in tokens.into_iter().take(token_limit) {
            let (sigil, rest) = Sigil::split(token);

            match sigil {
                Sigil::Option => {
                    if let Some(value) = available_options.get(rest) {
                        options.push(value.clone());
                    }
                }
                Sigil::Exclude => push_phrase(&mut excludes, rest),
                Sigil::Include | Sigil::Bare => push_phrase(&mut phrases, rest),
            }
        }

        Self {
            raw: raw.to_string(),
            phrases,
            excludes,
            options,
            limit_reached,
        }
    }

    /// Parse with the default token limit and no options
    pub fn simple(raw: &str) -> Self {
        Self::parse(raw, DEFAULT_TOKEN_LIMIT, &QueryOptionMap::new())
    }

    /// The trimmed raw query
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn phrases(&self) -> &[String] {
        &self.phrases
    }

    pub fn excludes(&self) -> &[String] {
        &self.excludes
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Check whether an option value was requested
    pub fn has_option(&self, value: &str) -> bool {
        self.options.iter().any(|o| o == value)
    }

    /// Is the token limit reached?
    pub fn is_limit_reached(&self) -> bool {
        self.limit_reached
    }

    /// Check if the query carries no phrases at all
    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty() && self.excludes.is_empty()
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Strip quotes and keep non-empty phrases only
fn push_phrase(target: &mut Vec<String>, text: &str) {
    let phrase = text.replace('"', "");
    if !phrase.is_empty() {
        target.push(phrase);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> QueryOptionMap {
        let mut map = QueryOptionMap::new();
        map.insert("c".to_string(), "search_in_city_only".to_string());
        map
    }

    fn parse(raw: &str) -> Query {
        Query::parse(raw, 10, &options())
    }

    #[test]
    fn test_phrase_and_exclude() {
        let query = parse("concert -disco");
        assert_eq!(query.phrases(), ["concert"]);
        assert_eq!(query.excludes(), ["disco"]);
        assert!(query.options().is_empty());
    }

    #[test]
    fn test_plain_words() {
        let query = parse("concert of the analogs");
        assert_eq!(query.phrases(), ["concert", "of", "the", "analogs"]);
        assert!(query.excludes().is_empty());
    }

    #[test]
    fn test_quoted_phrases() {
        let query = parse(r#""the analogs" and +bunkier -farben -"hip hop""#);
        assert_eq!(query.phrases(), ["the analogs", "and", "bunkier"]);
        assert_eq!(query.excludes(), ["farben", "hip hop"]);
    }

    #[test]
    fn test_options() {
        let query = parse("!c only");
        assert_eq!(query.phrases(), ["only"]);
        assert_eq!(query.options(), ["search_in_city_only"]);
        assert!(query.has_option("search_in_city_only"));
    }

    #[test]
    fn test_unknown_option_is_dropped() {
        let query = parse("!x jazz");
        assert_eq!(query.phrases(), ["jazz"]);
        assert!(query.options().is_empty());
    }

    #[test]
    fn test_raw_is_trimmed() {
        let query = parse("  concert -disco \n");
        assert_eq!(query.raw(), "concert -disco");
        assert_eq!(query.to_string(), "concert -disco");
    }

    #[test]
    fn test_token_limit() {
        let query = Query::parse("a b c d e", 3, &options());
        assert_eq!(query.phrases(), ["a", "b", "c"]);
        assert!(query.is_limit_reached());

        let query = Query::parse("a b c", 3, &options());
        assert!(!query.is_limit_reached());
    }

    #[test]
    fn test_limit_counts_every_token_kind() {
        let query = Query::parse("-a !c b c", 2, &options());
        assert_eq!(query.excludes(), ["a"]);
        assert_eq!(query.options(), ["search_in_city_only"]);
        assert!(query.phrases().is_empty());
        assert!(query.is_limit_reached());
    }

    #[test]
    fn test_malformed_input() {
        let query = parse(r#"- + "unterminated quote"#);
        assert_eq!(query.phrases(), ["unterminated", "quote"]);
        assert!(query.excludes().is_empty());

        let query = parse("");
        assert!(query.is_empty());
        assert!(!query.is_limit_reached());
    }
}
