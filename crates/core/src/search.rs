//! Search expression parsing and filtering.
//!
//! A search expression is a space-separated list of `field:value` tokens, e.g.
//! `name:report type:pdf`. An entry matches when, for every recognised field, the field's text
//! contains the value as a case-sensitive substring. Unrecognised fields are remembered for the
//! `searchParams` diagnostics block and otherwise ignored.

use crate::constants::{UNPROCESSED_MARKER, UNSUPPORTED_MARKER};
use crate::entry::{EntryField, FileSystemEntry};
use crate::{CoreError, CoreResult};
use std::collections::BTreeMap;

/// Fields accepted in search expressions.
pub const SEARCHABLE_FIELDS: &[EntryField] = &EntryField::ALL;

/// Searchable fields that are recognised but not applied. Currently none.
pub const UNPROCESSED_SEARCH_FIELDS: &[EntryField] = &[];

/// A parsed search expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// Every requested `(field, value)` pair, deduplicated by field, in first-seen order.
    requested: Vec<(String, String)>,
    /// The subset applied while filtering.
    predicates: Vec<(EntryField, String)>,
}

impl SearchQuery {
    /// Parses `raw` into field/value predicates.
    ///
    /// Tokens are separated by single spaces. A later token for the same field replaces the
    /// earlier value.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::MalformedQuery` if any token does not contain exactly one `:`.
    pub fn parse(raw: &str) -> CoreResult<Self> {
        let mut requested: Vec<(String, String)> = Vec::new();

        for token in raw.split(' ') {
            let mut parts = token.split(':');
            let (field, value) = match (parts.next(), parts.next(), parts.next()) {
                (Some(field), Some(value), None) => (field, value),
                _ => return Err(CoreError::MalformedQuery(token.to_string())),
            };

            match requested.iter_mut().find(|(f, _)| f == field) {
                Some(existing) => existing.1 = value.to_string(),
                None => requested.push((field.to_string(), value.to_string())),
            }
        }

        let predicates = requested
            .iter()
            .filter_map(|(field, value)| {
                recognised(field)
                    .filter(|f| !UNPROCESSED_SEARCH_FIELDS.contains(f))
                    .map(|f| (f, value.clone()))
            })
            .collect();

        Ok(Self {
            requested,
            predicates,
        })
    }

    /// Whether `entry` satisfies every applied predicate.
    pub fn matches(&self, entry: &FileSystemEntry) -> bool {
        self.predicates.iter().all(|(field, value)| {
            entry.field_text(*field).contains(value.as_str())
        })
    }

    /// Applied predicates in request order.
    pub fn predicates(&self) -> &[(EntryField, String)] {
        &self.predicates
    }

    /// The `searchParams` block: each requested field mapped to its value, or to
    /// `"unsupported"` / `"unprocessed"`.
    pub fn diagnostics(&self) -> BTreeMap<String, String> {
        self.requested
            .iter()
            .map(|(field, value)| {
                let reported = match recognised(field) {
                    None => UNSUPPORTED_MARKER.to_string(),
                    Some(f) if UNPROCESSED_SEARCH_FIELDS.contains(&f) => {
                        UNPROCESSED_MARKER.to_string()
                    }
                    Some(_) => value.clone(),
                };
                (field.clone(), reported)
            })
            .collect()
    }
}

fn recognised(field: &str) -> Option<EntryField> {
    EntryField::parse(field).filter(|f| SEARCHABLE_FIELDS.contains(f))
}
