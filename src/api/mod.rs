//! REST client for the legal-services backend.
//!
//! - [`types`] - Validated item model, wire schemas and the community category set
//! - [`client`] - HTTP access to the collection and post-creation endpoints
//!
//! Every payload is decoded into explicit schemas at this boundary. A response
//! that does not match the schema is reported as [`ApiError::Malformed`] and
//! never reaches the view.

mod client;
mod types;

pub use client::{ApiClient, ApiError, MAX_RESPONSE_SIZE};
pub use types::{
    decode_collection, decode_created_post, Category, Comment, DecodeError, Engagement, FeedKind,
    Item, NewPost,
};
