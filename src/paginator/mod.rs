//! Lazy, bounded, page-driven record retrieval.
//!
//! - [`Paginator`] - Source plus [`crate::PageConfig`]; nothing is fetched until iterated
//! - [`Records`] - One item per record, drained page by page
//! - [`Pages`] - One item per non-empty page
//! - [`PageSource`] - Where pages come from; [`HttpSource`] for JSON APIs

mod engine;
mod retry;
pub(crate) mod source;

pub use engine::{Page, Pages, Paginator, Records, paginate, paginate_with};
pub use source::{HttpSource, PageSource};
