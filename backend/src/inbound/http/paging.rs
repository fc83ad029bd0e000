//! Query parsing and response envelopes for paginated lists.

use actix_web::HttpRequest;
use pagination::{Page, PageRequest};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::Error;

use super::links::request_url;

/// `page` and `limit` query parameters. Kept as raw strings so bad values
/// map onto the API's own errors rather than a generic query rejection.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// One-based page number.
    pub page: Option<String>,
    /// Page size; invalid values fall back to the default.
    pub limit: Option<String>,
}

impl PageQuery {
    pub(crate) fn to_request(&self, default_limit: u32) -> Result<PageRequest, Error> {
        page_request(self.page.as_deref(), self.limit.as_deref(), default_limit)
    }
}

pub(crate) fn page_request(
    page: Option<&str>,
    limit: Option<&str>,
    default_limit: u32,
) -> Result<PageRequest, Error> {
    PageRequest::from_query(page, limit, default_limit).map_err(|_| Error::not_found("invalid page"))
}

/// Paginated list response.
#[derive(Debug, Serialize, ToSchema)]
pub struct Paginated<T> {
    /// Total rows across every page.
    pub count: u64,
    /// Absolute link to the next page.
    pub next: Option<String>,
    /// Absolute link to the previous page.
    pub previous: Option<String>,
    pub results: Vec<T>,
}

/// Convert `page` into the response envelope with links built from `req`.
pub(crate) fn paginate<T, U>(
    req: &HttpRequest,
    page: Page<T>,
    render: impl FnMut(T) -> U,
) -> Result<Paginated<U>, Error> {
    let url = request_url(req)?;
    let envelope = page.map(render).into_envelope(&url);
    Ok(Paginated {
        count: envelope.count,
        next: envelope.next,
        previous: envelope.previous,
        results: envelope.results,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;
    use rstest::rstest;

    use crate::domain::ErrorCode;

    #[rstest]
    #[case(Some("0"))]
    #[case(Some("two"))]
    #[case(Some("-1"))]
    fn bad_pages_are_not_found(#[case] page: Option<&str>) {
        let err = page_request(page, None, 6).expect_err("invalid page");
        assert_eq!(err.code(), ErrorCode::NotFound);
        assert_eq!(err.message(), "invalid page");
    }

    #[rstest]
    fn bad_limits_fall_back_to_the_default() {
        let request = page_request(Some("2"), Some("lots"), 6).expect("valid");
        assert_eq!((request.page(), request.limit()), (2, 6));
    }

    #[rstest]
    fn envelope_links_keep_other_parameters() {
        let req = TestRequest::get()
            .uri("/api/users/?limit=1&page=2")
            .insert_header(("Host", "foodgram.test"))
            .to_http_request();
        let request = page_request(Some("2"), Some("1"), 6).expect("valid");
        let page = Page::new(vec![2_u32], 3, request);

        let body = paginate(&req, page, |n| n * 10).expect("envelope");

        assert_eq!(body.count, 3);
        assert_eq!(body.results, vec![20]);
        assert_eq!(
            body.next.as_deref(),
            Some("http://foodgram.test/api/users/?limit=1&page=3")
        );
        assert_eq!(
            body.previous.as_deref(),
            Some("http://foodgram.test/api/users/?limit=1")
        );
    }
}
