//! Page-number pagination shared by the Foodgram list endpoints.
//!
//! A [`PageRequest`] is parsed from the `page` and `limit` query parameters,
//! checked against the total row count with [`PageRequest::ensure_in_range`],
//! and the resulting rows are wrapped in a [`Page`]. The page renders into the
//! `{count, next, previous, results}` envelope through [`Page::into_envelope`],
//! which rewrites the `page` parameter of the request URL to build links.

use serde::Serialize;
use thiserror::Error;
use url::Url;

/// Rows returned per page when the client does not ask for a limit.
pub const DEFAULT_PAGE_SIZE: u32 = 6;

/// Upper bound for the `limit` query parameter.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Query parameter carrying the one-based page number.
pub const PAGE_PARAM: &str = "page";

/// Query parameter carrying the requested page size.
pub const LIMIT_PARAM: &str = "limit";

/// Errors raised while resolving a page request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaginationError {
    /// The `page` parameter is not a positive integer.
    #[error("invalid page `{value}`")]
    InvalidPage {
        /// Raw parameter value supplied by the client.
        value: String,
    },
    /// The requested page lies past the last page of results.
    #[error("page {page} is out of range (last page is {last_page})")]
    OutOfRange {
        /// Requested page number.
        page: u32,
        /// Highest page number holding results.
        last_page: u32,
    },
}

/// Validated page number and page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl PageRequest {
    /// Build a request, clamping `limit` into `1..=MAX_PAGE_SIZE`.
    ///
    /// # Errors
    ///
    /// Returns [`PaginationError::InvalidPage`] when `page` is zero.
    pub fn new(page: u32, limit: u32) -> Result<Self, PaginationError> {
        if page == 0 {
            return Err(PaginationError::InvalidPage {
                value: page.to_string(),
            });
        }
        Ok(Self {
            page,
            limit: limit.clamp(1, MAX_PAGE_SIZE),
        })
    }

    /// First page with the given default size.
    #[must_use]
    pub fn first(default_limit: u32) -> Self {
        Self {
            page: 1,
            limit: default_limit.clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// Parse raw query parameter values.
    ///
    /// A missing `page` means the first page. A `limit` that is missing or is
    /// not a positive integer falls back to `default_limit`; oversized limits
    /// are capped at [`MAX_PAGE_SIZE`].
    ///
    /// # Errors
    ///
    /// Returns [`PaginationError::InvalidPage`] when `page` is present but is
    /// not a positive integer.
    ///
    /// # Examples
    ///
    /// ```
    /// use pagination::PageRequest;
    ///
    /// let request = PageRequest::from_query(Some("2"), Some("500"), 6).expect("valid page");
    /// assert_eq!(request.page(), 2);
    /// assert_eq!(request.limit(), 100);
    /// ```
    pub fn from_query(
        page: Option<&str>,
        limit: Option<&str>,
        default_limit: u32,
    ) -> Result<Self, PaginationError> {
        let page = match page.map(str::trim) {
            None => 1,
            Some(raw) => match raw.parse::<u32>() {
                Ok(value) if value > 0 => value,
                _ => {
                    return Err(PaginationError::InvalidPage {
                        value: raw.to_owned(),
                    });
                }
            },
        };
        let limit = limit
            .and_then(|raw| raw.trim().parse::<u32>().ok())
            .filter(|value| *value > 0)
            .unwrap_or(default_limit);
        Self::new(page, limit)
    }

    /// One-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Maximum number of rows on the page.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of rows to skip before this page starts.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }

    /// Highest page number for `total` rows. An empty result set still has
    /// one (empty) page.
    #[must_use]
    pub fn last_page(&self, total: u64) -> u32 {
        let pages = total.div_ceil(u64::from(self.limit)).max(1);
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    /// Reject requests pointing past the last page.
    ///
    /// # Errors
    ///
    /// Returns [`PaginationError::OutOfRange`] when `page` exceeds the last
    /// page for `total` rows.
    pub fn ensure_in_range(&self, total: u64) -> Result<(), PaginationError> {
        let last_page = self.last_page(total);
        if self.page > last_page {
            return Err(PaginationError::OutOfRange {
                page: self.page,
                last_page,
            });
        }
        Ok(())
    }
}

/// One page of results together with the total row count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    items: Vec<T>,
    total: u64,
    request: PageRequest,
}

impl<T> Page<T> {
    /// Wrap fetched rows.
    #[must_use]
    pub fn new(items: Vec<T>, total: u64, request: PageRequest) -> Self {
        Self {
            items,
            total,
            request,
        }
    }

    /// Rows on this page.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Total rows across every page.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }

    /// Request that produced the page.
    #[must_use]
    pub const fn request(&self) -> PageRequest {
        self.request
    }

    /// Whether a following page exists.
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.request.page() < self.request.last_page(self.total)
    }

    /// Whether a preceding page exists.
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.request.page() > 1
    }

    /// Transform every row while keeping the paging metadata.
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            request: self.request,
        }
    }

    /// Render the response envelope, deriving links from `request_url`.
    #[must_use]
    pub fn into_envelope(self, request_url: &Url) -> PageEnvelope<T> {
        let next = self
            .has_next()
            .then(|| page_link(request_url, self.request.page() + 1));
        let previous = self
            .has_previous()
            .then(|| page_link(request_url, self.request.page() - 1));
        PageEnvelope {
            count: self.total,
            next,
            previous,
            results: self.items,
        }
    }
}

/// Serialised list response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageEnvelope<T> {
    /// Total rows across every page.
    pub count: u64,
    /// Absolute link to the next page, if any.
    pub next: Option<String>,
    /// Absolute link to the previous page, if any.
    pub previous: Option<String>,
    /// Rows on this page.
    pub results: Vec<T>,
}

/// Rebuild `base` with its `page` parameter pointing at `page`.
///
/// Other query parameters are kept in order. The first page is linked without
/// a `page` parameter.
#[must_use]
pub fn page_link(base: &Url, page: u32) -> String {
    let retained: Vec<(String, String)> = base
        .query_pairs()
        .filter(|(key, _)| key != PAGE_PARAM)
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();
    let mut link = base.clone();
    link.set_query(None);
    if !retained.is_empty() || page > 1 {
        let mut pairs = link.query_pairs_mut();
        for (key, value) in &retained {
            pairs.append_pair(key, value);
        }
        if page > 1 {
            pairs.append_pair(PAGE_PARAM, &page.to_string());
        }
    }
    link.to_string()
}

#[cfg(test)]
mod tests {
    //! Unit coverage for page parsing, range checks, and link building.

    use super::*;
    use rstest::rstest;

    fn url(raw: &str) -> Url {
        Url::parse(raw).expect("valid test url")
    }

    #[rstest]
    #[case(None, None, 1, DEFAULT_PAGE_SIZE)]
    #[case(Some("3"), Some("10"), 3, 10)]
    #[case(Some(" 2 "), Some("abc"), 2, DEFAULT_PAGE_SIZE)]
    #[case(Some("1"), Some("0"), 1, DEFAULT_PAGE_SIZE)]
    #[case(Some("1"), Some("1000"), 1, MAX_PAGE_SIZE)]
    fn parses_query_values(
        #[case] page: Option<&str>,
        #[case] limit: Option<&str>,
        #[case] expected_page: u32,
        #[case] expected_limit: u32,
    ) {
        let request =
            PageRequest::from_query(page, limit, DEFAULT_PAGE_SIZE).expect("request parses");
        assert_eq!(request.page(), expected_page);
        assert_eq!(request.limit(), expected_limit);
    }

    #[rstest]
    #[case("0")]
    #[case("-1")]
    #[case("last")]
    fn rejects_non_positive_pages(#[case] raw: &str) {
        let err = PageRequest::from_query(Some(raw), None, DEFAULT_PAGE_SIZE)
            .expect_err("page must be rejected");
        assert_eq!(
            err,
            PaginationError::InvalidPage {
                value: raw.to_owned()
            }
        );
    }

    #[rstest]
    fn offset_skips_previous_pages() {
        let request = PageRequest::new(3, 6).expect("valid request");
        assert_eq!(request.offset(), 12);
    }

    #[rstest]
    #[case(0, 1, true)]
    #[case(6, 1, true)]
    #[case(7, 2, true)]
    #[case(6, 2, false)]
    fn range_check_allows_empty_first_page(
        #[case] total: u64,
        #[case] page: u32,
        #[case] in_range: bool,
    ) {
        let request = PageRequest::new(page, 6).expect("valid request");
        assert_eq!(request.ensure_in_range(total).is_ok(), in_range);
    }

    #[rstest]
    fn envelope_links_neighbouring_pages() {
        let request = PageRequest::new(2, 2).expect("valid request");
        let page = Page::new(vec![3, 4], 5, request);
        let envelope =
            page.into_envelope(&url("http://testserver/api/recipes/?author=1&page=2&limit=2"));

        assert_eq!(envelope.count, 5);
        assert_eq!(envelope.results, vec![3, 4]);
        assert_eq!(
            envelope.next.as_deref(),
            Some("http://testserver/api/recipes/?author=1&limit=2&page=3")
        );
        assert_eq!(
            envelope.previous.as_deref(),
            Some("http://testserver/api/recipes/?author=1&limit=2")
        );
    }

    #[rstest]
    fn single_page_has_no_links() {
        let page = Page::new(vec!["a"], 1, PageRequest::first(DEFAULT_PAGE_SIZE));
        let envelope = page.into_envelope(&url("http://testserver/api/users/"));
        assert!(envelope.next.is_none());
        assert!(envelope.previous.is_none());
    }

    #[rstest]
    fn first_page_link_drops_page_parameter() {
        assert_eq!(
            page_link(&url("http://testserver/api/users/?page=2"), 1),
            "http://testserver/api/users/"
        );
    }

    #[rstest]
    fn map_preserves_metadata() {
        let request = PageRequest::new(1, 2).expect("valid request");
        let page = Page::new(vec![1, 2], 3, request).map(|value| value * 10);
        assert_eq!(page.items(), &[10, 20]);
        assert_eq!(page.total(), 3);
        assert!(page.has_next());
        assert!(!page.has_previous());
    }
}
