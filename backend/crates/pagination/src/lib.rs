//! Page-number pagination primitives for list endpoints.
//!
//! [`PageRequest`] validates the `page`/`limit` pair a client supplies and
//! turns it into an offset window. [`Paginated`] is the response envelope: a
//! slice of data plus [`PageMeta`] describing the whole result set, optionally
//! carrying relative links to neighbouring pages.
//!
//! # Examples
//!
//! ```
//! use pagination::{PageRequest, Paginated};
//!
//! let request = PageRequest::new(2, 2).expect("valid page request");
//! let page = Paginated::new(request, 5, vec!["c", "d"]);
//! assert_eq!(page.meta.last_page, 3);
//! assert_eq!(page.meta.current_page, 2);
//! ```

mod envelope;
mod request;

pub use envelope::{PageMeta, Paginated};
pub use request::{DEFAULT_LIMIT, MAX_LIMIT, PageRequest, PaginationError};
