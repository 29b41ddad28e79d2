//! Paginated response envelope.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::PageRequest;

/// Metadata describing one page of a larger result set.
///
/// Link fields are `None` until [`Paginated::with_links`] fills them in; the
/// next and previous links stay `None` at the edges of the result set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    /// Number of items across all pages.
    pub total: u64,
    /// Page size used to cut the result set.
    pub per_page: u32,
    /// One-based number of this page.
    pub current_page: u32,
    /// Number of the final page; `1` for an empty result set.
    pub last_page: u32,
    /// Number of the first page, always `1`.
    pub first_page: u32,
    /// Relative link to the first page.
    pub first_page_url: Option<String>,
    /// Relative link to the final page.
    pub last_page_url: Option<String>,
    /// Relative link to the following page, if any.
    pub next_page_url: Option<String>,
    /// Relative link to the preceding page, if any.
    pub previous_page_url: Option<String>,
}

impl PageMeta {
    fn new(request: PageRequest, total: u64) -> Self {
        let pages = total.div_ceil(u64::from(request.limit())).max(1);
        Self {
            total,
            per_page: request.limit(),
            current_page: request.page(),
            last_page: u32::try_from(pages).unwrap_or(u32::MAX),
            first_page: 1,
            first_page_url: None,
            last_page_url: None,
            next_page_url: None,
            previous_page_url: None,
        }
    }
}

/// One page of items together with its [`PageMeta`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paginated<T> {
    /// Position of this page within the result set.
    pub meta: PageMeta,
    /// Items on this page, in result order.
    pub data: Vec<T>,
}

impl<T> Paginated<T> {
    /// Wrap an already windowed page of `data` drawn from `total` items.
    #[must_use]
    pub fn new(request: PageRequest, total: u64, data: Vec<T>) -> Self {
        Self {
            meta: PageMeta::new(request, total),
            data,
        }
    }

    /// Populate page links relative to `base`.
    ///
    /// Query parameters on `base` other than `page` and `limit` are kept so
    /// links preserve the active filters.
    ///
    /// # Examples
    ///
    /// ```
    /// use pagination::{PageRequest, Paginated};
    /// use url::Url;
    ///
    /// let base = Url::parse("http://localhost/api/v1/groups?text=es").expect("url");
    /// let request = PageRequest::new(1, 2).expect("valid request");
    /// let page = Paginated::new(request, 3, vec![1, 2]).with_links(&base);
    /// assert_eq!(
    ///     page.meta.next_page_url.as_deref(),
    ///     Some("/api/v1/groups?text=es&page=2&limit=2"),
    /// );
    /// assert!(page.meta.previous_page_url.is_none());
    /// ```
    #[must_use]
    pub fn with_links(mut self, base: &Url) -> Self {
        let limit = self.meta.per_page;
        let current = self.meta.current_page;
        let last = self.meta.last_page;
        self.meta.first_page_url = Some(page_link(base, 1, limit));
        self.meta.last_page_url = Some(page_link(base, last, limit));
        self.meta.next_page_url = (current < last).then(|| page_link(base, current + 1, limit));
        self.meta.previous_page_url =
            (current > 1).then(|| page_link(base, (current - 1).min(last), limit));
        self
    }

    /// Convert every item while keeping the metadata.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            meta: self.meta,
            data: self.data.into_iter().map(f).collect(),
        }
    }
}

fn page_link(base: &Url, page: u32, limit: u32) -> String {
    let retained: Vec<(String, String)> = base
        .query_pairs()
        .filter(|(key, _)| key != "page" && key != "limit")
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    let mut url = base.clone();
    url.query_pairs_mut()
        .clear()
        .extend_pairs(retained)
        .append_pair("page", &page.to_string())
        .append_pair("limit", &limit.to_string());

    match url.query() {
        Some(query) => format!("{}?{query}", url.path()),
        None => url.path().to_owned(),
    }
}
