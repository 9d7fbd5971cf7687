//! Sort expression parsing and stable multi-key ordering.
//!
//! `sf` names one or more fields separated by spaces; `so=d` flips the whole ordering to
//! descending. The decomposed display size (`sizeNumber`, `sizeSuffix`) is recognised but never
//! used as a key, since it has no total order across units; `sizeBytes` sorts numerically.

use crate::entry::{EntryField, FileSystemEntry};
use crate::{CoreError, CoreResult};
use serde::Serialize;
use std::cmp::Ordering;

/// Fields accepted in sort expressions.
pub const SORTABLE_FIELDS: &[EntryField] = &[
    EntryField::Name,
    EntryField::Type,
    EntryField::Created,
    EntryField::Modified,
    EntryField::SizeBytes,
    EntryField::SizeNumber,
    EntryField::SizeSuffix,
];

/// Sortable fields that are recognised but ignored.
pub const UNPROCESSED_SORT_FIELDS: &[EntryField] = &[EntryField::SizeNumber, EntryField::SizeSuffix];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// `d` (any case) is descending; anything else, or nothing, is ascending.
    pub fn from_param(raw: Option<&str>) -> Self {
        match raw {
            Some(order) if order.eq_ignore_ascii_case("d") => SortDirection::Desc,
            _ => SortDirection::Asc,
        }
    }
}

/// The `sortingParams` block of a listing response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SortingParams {
    pub sorted_by: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unsupported_params: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unprocessed_params: Option<Vec<String>>,
    pub sorting_direction: SortDirection,
}

/// A parsed sort request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    keys: Vec<EntryField>,
    direction: SortDirection,
    /// Raw `sf` tokens, when `sf` was supplied.
    requested: Option<Vec<String>>,
    order_supplied: bool,
}

impl Default for SortSpec {
    fn default() -> Self {
        Self {
            keys: vec![EntryField::Name],
            direction: SortDirection::Asc,
            requested: None,
            order_supplied: false,
        }
    }
}

impl SortSpec {
    /// Parses the `sf` (fields) and `so` (order) parameters.
    ///
    /// Empty parameters count as absent. Keys keep their request order; duplicates, unknown and
    /// unprocessed fields are dropped. With no surviving key the listing sorts by `name`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::MalformedSort` if a field token contains anything other than ASCII
    /// letters, digits or `_`.
    pub fn parse(fields: Option<&str>, order: Option<&str>) -> CoreResult<Self> {
        let fields = fields.filter(|f| !f.is_empty());
        let order = order.filter(|o| !o.is_empty());

        let requested = fields.map(tokenise).transpose()?;

        let mut keys: Vec<EntryField> = Vec::new();
        for token in requested.iter().flatten() {
            if let Some(field) = recognised(token) {
                if !UNPROCESSED_SORT_FIELDS.contains(&field) && !keys.contains(&field) {
                    keys.push(field);
                }
            }
        }
        if keys.is_empty() {
            keys.push(EntryField::Name);
        }

        Ok(Self {
            keys,
            direction: SortDirection::from_param(order),
            requested,
            order_supplied: order.is_some(),
        })
    }

    pub fn keys(&self) -> &[EntryField] {
        &self.keys
    }

    pub fn direction(&self) -> SortDirection {
        self.direction
    }

    /// Compares two entries key by key, ascending.
    pub fn compare(&self, a: &FileSystemEntry, b: &FileSystemEntry) -> Ordering {
        self.keys
            .iter()
            .fold(Ordering::Equal, |acc, key| {
                acc.then_with(|| compare_field(a, b, *key))
            })
    }

    /// Sorts in place. The sort is stable in both directions: entries equal on every key keep
    /// their original relative order.
    pub fn sort(&self, entries: &mut [FileSystemEntry]) {
        match self.direction {
            SortDirection::Asc => entries.sort_by(|a, b| self.compare(a, b)),
            SortDirection::Desc => entries.sort_by(|a, b| self.compare(b, a)),
        }
    }

    /// The `sortingParams` block, present only when `sf` or `so` was supplied.
    pub fn diagnostics(&self) -> Option<SortingParams> {
        if self.requested.is_none() && !self.order_supplied {
            return None;
        }

        let sorted_by = self.keys.iter().map(|k| k.as_str().to_string()).collect();

        let (unsupported_params, unprocessed_params) = match &self.requested {
            Some(tokens) => {
                let unsupported: Vec<String> = tokens
                    .iter()
                    .filter(|t| recognised(t).is_none())
                    .cloned()
                    .collect();
                let unprocessed: Vec<String> = tokens
                    .iter()
                    .filter(|t| recognised(t).is_some_and(|f| UNPROCESSED_SORT_FIELDS.contains(&f)))
                    .cloned()
                    .collect();
                (
                    Some(unsupported).filter(|u| !u.is_empty()),
                    Some(unprocessed),
                )
            }
            None => (None, None),
        };

        Some(SortingParams {
            sorted_by,
            unsupported_params,
            unprocessed_params,
            sorting_direction: self.direction,
        })
    }
}

fn tokenise(raw: &str) -> CoreResult<Vec<String>> {
    raw.split(' ')
        .filter(|t| !t.is_empty())
        .map(|t| {
            if t.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                Ok(t.to_string())
            } else {
                Err(CoreError::MalformedSort(t.to_string()))
            }
        })
        .collect()
}

fn recognised(token: &str) -> Option<EntryField> {
    EntryField::parse(token).filter(|f| SORTABLE_FIELDS.contains(f))
}

fn compare_field(a: &FileSystemEntry, b: &FileSystemEntry, field: EntryField) -> Ordering {
    match field {
        EntryField::Name => a.name().cmp(b.name()),
        EntryField::Type => a.type_name().cmp(b.type_name()),
        EntryField::Created => a.created().cmp(b.created()),
        EntryField::Modified => a.modified().cmp(b.modified()),
        EntryField::SizeBytes => a.size_bytes().cmp(&b.size_bytes()),
        EntryField::SizeNumber => a.size_number().total_cmp(&b.size_number()),
        EntryField::SizeSuffix => a.size_suffix().cmp(b.size_suffix()),
    }
}
