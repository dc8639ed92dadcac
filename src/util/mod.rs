//! Utility functions shared by the API client and the TUI.
//!
//! - **Base URL validation**: the API base URL is checked once at startup
//! - **Text processing**: width-aware truncation, excerpts, and stripping of
//!   terminal control sequences from server-supplied text
//!
//! # Examples
//!
//! ```
//! use lexfeed::util::{excerpt, truncate_to_width, validate_base_url};
//!
//! let base = validate_base_url("http://localhost:5000").unwrap();
//! assert_eq!(base.host_str(), Some("localhost"));
//!
//! assert_eq!(truncate_to_width("Tenant Rights in 2024", 10), "Tenant ...");
//! assert_eq!(excerpt("Short body", 120), "Short body");
//! ```

mod text;
mod url_validator;

pub use text::{display_width, excerpt, strip_control_chars, truncate_to_width};
pub use url_validator::{validate_base_url, BaseUrlError};

/// Maximum accepted length of the free-text search query, in characters.
pub const MAX_SEARCH_QUERY_LENGTH: usize = 256;
