//! Client-side model of a feed view.
//!
//! - [`collection`] - Loaded items and the load lifecycle
//! - [`filter`] - Free-text and category filtering over a collection
//! - [`draft`] - The community post composer's draft and its validation
//!
//! Everything here is synchronous and free of I/O; the TUI drives it from
//! the event loop and the API client feeds it results.
//!
//! # Example
//!
//! ```
//! use lexfeed::feed::{filter, CategoryFilter, Collection};
//!
//! let collection = Collection::default();
//! let mut category = CategoryFilter::default();
//! category.toggle("Legal Advice");
//!
//! assert!(filter(collection.items(), "deposit", category.selected()).is_empty());
//! ```

mod collection;
mod draft;
mod filter;

pub use collection::{Collection, LoadState};
pub use draft::{Draft, DraftError};
pub use filter::{filter, CategoryFilter};
