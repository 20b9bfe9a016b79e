//! Offset/limit pagination primitives shared by the showcase backend.
//!
//! Endpoints accept `offset` and `limit` query parameters, apply them after
//! any filtering has happened, and answer with a [`Page`] envelope echoing the
//! window that was applied:
//!
//! ```
//! use pagination::{Page, PageRequest};
//!
//! let request = PageRequest::parse(Some("1"), Some("2")).unwrap();
//! let page = Page::from_items(request, ["a", "b", "c", "d"]);
//! assert_eq!(page.list, vec!["b", "c"]);
//! assert_eq!(page.offset, 1);
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Offset used when the caller does not supply one.
pub const DEFAULT_OFFSET: usize = 0;
/// Limit used when the caller does not supply one.
pub const DEFAULT_LIMIT: usize = 10;

/// Errors raised while parsing raw pagination parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageRequestError {
    /// The parameter was present but is not a non-negative integer.
    #[error("{param} must be a non-negative integer, got `{value}`")]
    NotANonNegativeInteger {
        /// Name of the offending query parameter.
        param: &'static str,
        /// Raw value supplied by the caller.
        value: String,
    },
}

/// Requested pagination window.
///
/// ## Invariants
/// - Both values are non-negative; a `limit` of zero yields empty pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    offset: usize,
    limit: usize,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(DEFAULT_OFFSET, DEFAULT_LIMIT)
    }
}

impl PageRequest {
    /// Build a window from already validated values.
    #[must_use]
    pub const fn new(offset: usize, limit: usize) -> Self {
        Self { offset, limit }
    }

    /// Parse raw query parameter values.
    ///
    /// Missing or blank values fall back to [`DEFAULT_OFFSET`] and
    /// [`DEFAULT_LIMIT`].
    ///
    /// # Errors
    /// Returns [`PageRequestError::NotANonNegativeInteger`] when a value is
    /// present but cannot be read as a non-negative integer.
    pub fn parse(offset: Option<&str>, limit: Option<&str>) -> Result<Self, PageRequestError> {
        let offset = parse_param("offset", offset, DEFAULT_OFFSET)?;
        let limit = parse_param("limit", limit, DEFAULT_LIMIT)?;
        Ok(Self::new(offset, limit))
    }

    /// Number of matching items to skip.
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// Maximum number of items to return.
    #[must_use]
    pub const fn limit(&self) -> usize {
        self.limit
    }

    /// Apply the window to an already filtered sequence.
    #[must_use]
    pub fn apply<I>(self, items: I) -> Vec<I::Item>
    where
        I: IntoIterator,
    {
        items
            .into_iter()
            .skip(self.offset)
            .take(self.limit)
            .collect()
    }
}

fn parse_param(
    param: &'static str,
    raw: Option<&str>,
    default: usize,
) -> Result<usize, PageRequestError> {
    let Some(value) = raw.map(str::trim).filter(|value| !value.is_empty()) else {
        return Ok(default);
    };
    value
        .parse::<usize>()
        .map_err(|_| PageRequestError::NotANonNegativeInteger {
            param,
            value: value.to_owned(),
        })
}

/// Page envelope returned to clients.
///
/// Serialises as `{ "offset": 0, "limit": 10, "list": [...] }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Offset that was applied.
    pub offset: usize,
    /// Limit that was applied.
    pub limit: usize,
    /// Items inside the window.
    pub list: Vec<T>,
}

impl<T> Page<T> {
    /// Wrap items that were already windowed by `request`.
    #[must_use]
    pub const fn new(request: PageRequest, list: Vec<T>) -> Self {
        Self {
            offset: request.offset,
            limit: request.limit,
            list,
        }
    }

    /// Window `items` with `request` and wrap the result.
    #[must_use]
    pub fn from_items<I>(request: PageRequest, items: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        Self::new(request, request.apply(items))
    }

    /// Whether the window contains no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Transform every item while keeping the window metadata.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            offset: self.offset,
            limit: self.limit,
            list: self.list.into_iter().map(f).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for offset/limit parsing and windowing.

    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, None, PageRequest::new(0, 10))]
    #[case(Some(""), Some("  "), PageRequest::new(0, 10))]
    #[case(Some("5"), None, PageRequest::new(5, 10))]
    #[case(Some("0"), Some("3"), PageRequest::new(0, 3))]
    fn parse_applies_defaults(
        #[case] offset: Option<&str>,
        #[case] limit: Option<&str>,
        #[case] expected: PageRequest,
    ) {
        let parsed = PageRequest::parse(offset, limit).expect("valid parameters");
        assert_eq!(parsed, expected);
    }

    #[rstest]
    #[case(Some("-1"), None, "offset")]
    #[case(None, Some("ten"), "limit")]
    #[case(Some("1.5"), None, "offset")]
    fn parse_rejects_invalid_values(
        #[case] offset: Option<&str>,
        #[case] limit: Option<&str>,
        #[case] expected_param: &str,
    ) {
        let err = PageRequest::parse(offset, limit).expect_err("invalid parameters");
        let PageRequestError::NotANonNegativeInteger { param, .. } = err;
        assert_eq!(param, expected_param);
    }

    #[rstest]
    fn offset_beyond_total_yields_empty_page() {
        let page = Page::from_items(PageRequest::new(7, 10), 0..5);
        assert!(page.is_empty());
        assert_eq!(page.offset, 7);
    }

    #[rstest]
    fn limit_zero_yields_empty_page() {
        let page = Page::from_items(PageRequest::new(0, 0), 0..5);
        assert!(page.is_empty());
    }

    #[rstest]
    fn page_serialises_window_and_list() {
        let page = Page::from_items(PageRequest::new(1, 2), 0..5).map(|n| n * 10);
        let value = serde_json::to_value(&page).expect("serialise page");
        assert_eq!(
            value,
            serde_json::json!({ "offset": 1, "limit": 2, "list": [10, 20] })
        );
    }
}
