//! Validated page-number requests.

/// Page size applied when the client does not supply a limit.
pub const DEFAULT_LIMIT: u32 = 10;
/// Largest page size a client may request.
pub const MAX_LIMIT: u32 = 100;

/// Errors raised while validating a page request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaginationError {
    /// Pages are numbered from one.
    #[error("page must be at least 1")]
    PageOutOfRange,
    /// The requested page size is zero or above the ceiling.
    #[error("limit must be between 1 and {max}")]
    LimitOutOfRange {
        /// Largest accepted limit.
        max: u32,
    },
}

/// A one-based page number and page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl PageRequest {
    /// Validate and construct a page request.
    ///
    /// # Errors
    ///
    /// Returns [`PaginationError::PageOutOfRange`] for page `0` and
    /// [`PaginationError::LimitOutOfRange`] for a limit outside
    /// `1..=MAX_LIMIT`.
    pub const fn new(page: u32, limit: u32) -> Result<Self, PaginationError> {
        if page == 0 {
            return Err(PaginationError::PageOutOfRange);
        }
        if limit == 0 || limit > MAX_LIMIT {
            return Err(PaginationError::LimitOutOfRange { max: MAX_LIMIT });
        }
        Ok(Self { page, limit })
    }

    /// Build a request from optional query values, applying defaults.
    ///
    /// # Errors
    ///
    /// Propagates the validation errors of [`PageRequest::new`].
    ///
    /// # Examples
    ///
    /// ```
    /// use pagination::{DEFAULT_LIMIT, PageRequest};
    ///
    /// let request = PageRequest::from_query(None, None).expect("defaults are valid");
    /// assert_eq!(request.page(), 1);
    /// assert_eq!(request.limit(), DEFAULT_LIMIT);
    /// ```
    pub fn from_query(page: Option<u32>, limit: Option<u32>) -> Result<Self, PaginationError> {
        Self::new(page.unwrap_or(1), limit.unwrap_or(DEFAULT_LIMIT))
    }

    /// One-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Maximum number of items on the page.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of items preceding this page.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }

    /// Cut this page out of an already ordered sequence.
    #[must_use]
    pub fn window<T>(&self, items: Vec<T>) -> Vec<T> {
        let skip = usize::try_from(self.offset()).unwrap_or(usize::MAX);
        let take = usize::try_from(self.limit).unwrap_or(usize::MAX);
        items.into_iter().skip(skip).take(take).collect()
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_LIMIT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, 10, PaginationError::PageOutOfRange)]
    #[case(1, 0, PaginationError::LimitOutOfRange { max: MAX_LIMIT })]
    #[case(1, MAX_LIMIT + 1, PaginationError::LimitOutOfRange { max: MAX_LIMIT })]
    fn rejects_out_of_range_values(
        #[case] page: u32,
        #[case] limit: u32,
        #[case] expected: PaginationError,
    ) {
        assert_eq!(PageRequest::new(page, limit), Err(expected));
    }

    #[rstest]
    #[case(1, 10, 0)]
    #[case(3, 10, 20)]
    #[case(2, 7, 7)]
    fn offset_counts_preceding_items(#[case] page: u32, #[case] limit: u32, #[case] offset: u64) {
        let request = PageRequest::new(page, limit).expect("valid request");
        assert_eq!(request.offset(), offset);
    }

    #[rstest]
    fn window_returns_the_requested_slice() {
        let request = PageRequest::new(2, 2).expect("valid request");
        assert_eq!(request.window(vec![1, 2, 3, 4, 5]), vec![3, 4]);
    }

    #[rstest]
    fn window_past_the_end_is_empty() {
        let request = PageRequest::new(4, 2).expect("valid request");
        assert!(request.window(vec![1, 2, 3]).is_empty());
    }

    #[rstest]
    fn from_query_keeps_supplied_values() {
        let request = PageRequest::from_query(Some(3), Some(25)).expect("valid request");
        assert_eq!((request.page(), request.limit()), (3, 25));
    }
}
