//! Windowing over a sorted sequence and previous/next link synthesis.
//!
//! The previous window is sized to end exactly where the current window starts, so following
//! `nextPage` and then `previousPage` always lands back on the original `(start, limit)`, even
//! when `start` is not aligned to a multiple of `limit`.

use crate::constants::{DEFAULT_LIMIT, DEFAULT_START, LIMIT_PARAM, START_PARAM};
use crate::query::QueryParams;
use serde::Serialize;
use std::num::IntErrorKind;

/// Requested window, after defaulting but before clamping to a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub start: usize,
    pub limit: usize,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            start: DEFAULT_START,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageRequest {
    /// Builds a request, replacing a zero `start` with 1 and a zero `limit` with the default.
    pub fn new(start: usize, limit: usize) -> Self {
        Self {
            start: if start < 1 { DEFAULT_START } else { start },
            limit: if limit < 1 { DEFAULT_LIMIT } else { limit },
        }
    }

    /// Reads `start` and `limit` from the request parameters.
    ///
    /// Values that are not integers fall back to their defaults. Values below 1 are clamped as
    /// in [`PageRequest::new`]. Values too large for `usize` saturate.
    pub fn from_params(params: &QueryParams) -> Self {
        let start = params
            .get(START_PARAM)
            .and_then(parse_count)
            .unwrap_or(DEFAULT_START);
        let limit = params
            .get(LIMIT_PARAM)
            .and_then(parse_count)
            .unwrap_or(DEFAULT_LIMIT);
        Self::new(start, limit)
    }

    /// Effective 1-based start for a collection of `count` items.
    pub fn clamped_start(&self, count: usize) -> usize {
        if count == 0 {
            DEFAULT_START
        } else {
            self.start.min(count)
        }
    }
}

/// `None` when `raw` is not an integer; `Some(0)` for zero or negative values.
fn parse_count(raw: &str) -> Option<usize> {
    match raw.trim().parse::<i64>() {
        Ok(value) if value < 1 => Some(0),
        Ok(value) => Some(usize::try_from(value).unwrap_or(usize::MAX)),
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => Some(usize::MAX),
            IntErrorKind::NegOverflow => Some(0),
            _ => None,
        },
    }
}

/// The `paginationData` block of a listing response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationData {
    pub start: usize,
    pub limit: usize,
    pub items_count: usize,
    pub pages: usize,
    /// Empty when already on the first window.
    pub previous_page: String,
    /// Empty when the current window reaches the end.
    pub next_page: String,
}

/// One window of items plus its navigation metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub data: PaginationData,
}

/// Paginates `items` using the `start` / `limit` found in `params`.
///
/// Every other parameter in `params` is carried into the generated links in its original order.
pub fn paginate<T>(items: Vec<T>, base_url: &str, params: &QueryParams) -> Page<T> {
    let request = PageRequest::from_params(params);
    let extra = params.without(&[START_PARAM, LIMIT_PARAM]);
    paginate_window(items, base_url, request, &extra)
}

/// Paginates `items` with an explicit window. `extra` is appended to both links.
pub fn paginate_window<T>(
    items: Vec<T>,
    base_url: &str,
    request: PageRequest,
    extra: &QueryParams,
) -> Page<T> {
    let count = items.len();
    let limit = request.limit;
    let start = request.clamped_start(count);
    let pages = count.div_ceil(limit).max(1);

    let previous_page = if start == 1 {
        String::new()
    } else {
        let previous_start = start.saturating_sub(limit).max(1);
        page_link(base_url, previous_start, start - previous_start, extra)
    };

    let next_page = if start.saturating_add(limit) > count {
        String::new()
    } else {
        page_link(base_url, start + limit, limit, extra)
    };

    let items = items
        .into_iter()
        .skip(start - 1)
        .take(limit)
        .collect();

    Page {
        items,
        data: PaginationData {
            start,
            limit,
            items_count: count,
            pages,
            previous_page,
            next_page,
        },
    }
}

/// `base?start=S&limit=L[&extra...]`.
pub fn page_link(base_url: &str, start: usize, limit: usize, extra: &QueryParams) -> String {
    let mut params = QueryParams::new();
    params.push(START_PARAM, start.to_string());
    params.push(LIMIT_PARAM, limit.to_string());
    params.extend(extra.iter());
    format!("{}?{}", base_url, params.to_query_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "http://cdn.test/files/docs";

    fn numbers(count: usize) -> Vec<usize> {
        (1..=count).collect()
    }

    fn params(pairs: &[(&str, &str)]) -> QueryParams {
        QueryParams::from(pairs.to_vec())
    }

    /// Extracts `(start, limit)` from a generated link.
    fn window_of(link: &str) -> (usize, usize) {
        let query = link.split_once('?').map(|(_, q)| q).unwrap();
        let params = QueryParams::parse(query);
        (
            params.get("start").unwrap().parse().unwrap(),
            params.get("limit").unwrap().parse().unwrap(),
        )
    }

    #[test]
    fn test_defaults_on_twenty_five_items() {
        let page = paginate(numbers(25), BASE, &QueryParams::new());

        assert_eq!(page.items, numbers(10));
        assert_eq!(page.data.start, 1);
        assert_eq!(page.data.limit, 10);
        assert_eq!(page.data.items_count, 25);
        assert_eq!(page.data.pages, 3);
        assert_eq!(page.data.previous_page, "");
        assert_eq!(
            page.data.next_page,
            "http://cdn.test/files/docs?start=11&limit=10"
        );
    }

    #[test]
    fn test_iterating_all_pages_covers_everything_once() {
        let all = numbers(37);
        let mut seen = Vec::new();
        let mut query = QueryParams::from(vec![("limit", "7")]);

        loop {
            let page = paginate(all.clone(), BASE, &query);
            seen.extend(page.items);
            if page.data.next_page.is_empty() {
                break;
            }
            let (_, rest) = page.data.next_page.split_once('?').unwrap();
            query = QueryParams::parse(rest);
        }

        assert_eq!(seen, all);
    }

    #[test]
    fn test_start_beyond_count_clamps_to_last_item() {
        let page = paginate(numbers(25), BASE, &params(&[("start", "99")]));

        assert_eq!(page.data.start, 25);
        assert_eq!(page.items, vec![25]);
        assert_eq!(page.data.next_page, "");
        assert_eq!(window_of(&page.data.previous_page), (15, 10));
    }

    #[test]
    fn test_next_then_previous_roundtrip() {
        for (start, limit) in [(1, 10), (3, 10), (7, 4), (11, 10), (2, 1), (5, 20)] {
            let all = numbers(60);
            let first = paginate_window(
                all.clone(),
                BASE,
                PageRequest::new(start, limit),
                &QueryParams::new(),
            );
            let (next_start, next_limit) = window_of(&first.data.next_page);

            let second = paginate_window(
                all,
                BASE,
                PageRequest::new(next_start, next_limit),
                &QueryParams::new(),
            );

            assert_eq!(
                window_of(&second.data.previous_page),
                (start, limit),
                "start={start} limit={limit}"
            );
        }
    }

    #[test]
    fn test_previous_window_reaches_current_start() {
        let page = paginate(numbers(25), BASE, &params(&[("start", "4"), ("limit", "10")]));

        assert_eq!(window_of(&page.data.previous_page), (1, 3));
        assert_eq!(page.items, vec![4, 5, 6, 7, 8, 9, 10, 11, 12, 13]);
    }

    #[test]
    fn test_invalid_params_fall_back_to_defaults() {
        let page = paginate(
            numbers(25),
            BASE,
            &params(&[("start", "abc"), ("limit", "1.5")]),
        );

        assert_eq!((page.data.start, page.data.limit), (1, 10));
    }

    #[test]
    fn test_non_positive_params_are_clamped() {
        let page = paginate(
            numbers(25),
            BASE,
            &params(&[("start", "-3"), ("limit", "0")]),
        );

        assert_eq!((page.data.start, page.data.limit), (1, 10));
    }

    #[test]
    fn test_huge_limit_saturates() {
        let page = paginate(
            numbers(5),
            BASE,
            &params(&[("limit", "99999999999999999999999")]),
        );

        assert_eq!(page.data.limit, usize::MAX);
        assert_eq!(page.items.len(), 5);
        assert_eq!(page.data.pages, 1);
        assert_eq!(page.data.next_page, "");
    }

    #[test]
    fn test_empty_collection() {
        let page = paginate(Vec::<usize>::new(), BASE, &params(&[("start", "5")]));

        assert!(page.items.is_empty());
        assert_eq!(page.data.start, 1);
        assert_eq!(page.data.items_count, 0);
        assert_eq!(page.data.pages, 1);
        assert_eq!(page.data.previous_page, "");
        assert_eq!(page.data.next_page, "");
    }

    #[test]
    fn test_exact_fit_has_no_next_page() {
        let page = paginate(numbers(20), BASE, &params(&[("start", "11")]));

        assert_eq!(page.data.pages, 2);
        assert_eq!(page.items.len(), 10);
        assert_eq!(page.data.next_page, "");
    }

    #[test]
    fn test_extra_params_preserved_in_links() {
        let page = paginate(
            numbers(30),
            BASE,
            &params(&[
                ("q", "name:annual report"),
                ("start", "11"),
                ("sf", "type name"),
                ("dbg", "1"),
            ]),
        );

        assert_eq!(
            page.data.next_page,
            "http://cdn.test/files/docs?start=21&limit=10&q=name%3Aannual+report&sf=type+name&dbg=1"
        );
        assert_eq!(
            page.data.previous_page,
            "http://cdn.test/files/docs?start=1&limit=10&q=name%3Aannual+report&sf=type+name&dbg=1"
        );
    }

    #[test]
    fn test_page_link_parses_back_to_the_same_params() {
        let extra = params(&[("q", "name:a&b"), ("so", "d")]);

        let link = page_link(BASE, 4, 2, &extra);

        let (base, query) = link.split_once('?').unwrap();
        assert_eq!(base, BASE);
        assert_eq!(
            QueryParams::parse(query),
            params(&[("start", "4"), ("limit", "2"), ("q", "name:a&b"), ("so", "d")])
        );
    }

    #[test]
    fn test_serialised_field_names() {
        let page = paginate(numbers(3), BASE, &QueryParams::new());
        let json = serde_json::to_value(&page.data).unwrap();

        assert_eq!(json["itemsCount"], 3);
        assert_eq!(json["previousPage"], "");
        assert_eq!(json["nextPage"], "");
        assert_eq!(json["pages"], 1);
    }
}
