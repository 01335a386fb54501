//! Phrase filter built from a parsed query
//!
//! Mirrors the usual storage-side translation of a query: a record matches when any of
//! its searchable fields contains any include phrase, and none of its fields contains
//! any exclude phrase. Matching is case-insensitive substring matching.

use crate::query::Query;

/// Include/exclude predicate over text fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhraseFilter {
    include: Vec<String>,
    exclude: Vec<String>,
}

impl PhraseFilter {
    /// Build a filter from the query phrases
    pub fn from_query(query: &Query) -> Self {
        Self {
            include: query.phrases().iter().map(|p| p.to_lowercase()).collect(),
            exclude: query.excludes().iter().map(|p| p.to_lowercase()).collect(),
        }
    }

    /// Check the fields of one record
    pub fn matches<'a, I>(&self, fields: I) -> bool
    where
        I: IntoIterator<Item = &'a str>,
    {
        let fields: Vec<String> = fields.into_iter().map(str::to_lowercase).collect();

        let included = self.include.is_empty()
            || fields
                .iter()
                .any(|field| self.include.iter().any(|phrase| field.contains(phrase.as_str())));

        included
            && !fields
                .iter()
                .any(|field| self.exclude.iter().any(|phrase| field.contains(phrase.as_str())))
    }

    /// A filter without phrases matches everything
    pub fn is_unrestricted(&self) -> bool {
        self.include.is_empty() && self.exclude.is_empty()
    }
}
