//! Pagination engine for the dashboard list endpoints
//!
//! Fixed window of [`PAGE_SIZE`] rows per page. Pages are 1-indexed and
//! clamped to a minimum of 1; there is no upper bound — a page past the end
//! simply yields an empty window. `next`/`previous` are absolute URLs,
//! present only when the corresponding page exists.

use http::HeaderMap;
use serde::Deserialize;

/// Rows per page, fixed across all paginated endpoints.
pub const PAGE_SIZE: i64 = 10;

/// `?page=N` query parameter.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
}

impl PageQuery {
    /// Requested page, 1-indexed, clamped to a minimum of 1.
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }
}

/// Offset of the first row of `page`.
pub fn offset(page: i64) -> i64 {
    (page - 1) * PAGE_SIZE
}

/// Total number of pages for `count` rows.
///
/// An empty collection still reports one page.
pub fn total_pages(count: i64) -> i64 {
    ((count + PAGE_SIZE - 1) / PAGE_SIZE).max(1)
}

/// Base URL (`scheme://host`) used to build absolute links.
///
/// Prefers the configured public base URL; falls back to the request's Host
/// header.
pub fn request_base(public_base_url: Option<&str>, headers: &HeaderMap) -> String {
    if let Some(base) = public_base_url {
        return base.trim_end_matches('/').to_string();
    }
    let host = headers
        .get(http::header::HOST)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("localhost");
    format!("http://{host}")
}

/// `next`/`previous` absolute links for a page envelope.
///
/// `next` exists iff `page < total_pages`; `previous` iff `page > 1`.
/// Absent links serialize as JSON null.
pub fn page_links(
    base: &str,
    path: &str,
    page: i64,
    total_pages: i64,
) -> (Option<String>, Option<String>) {
    let next = (page < total_pages).then(|| format!("{base}{path}?page={}", page + 1));
    let previous = (page > 1).then(|| format!("{base}{path}?page={}", page - 1));
    (next, previous)
}
