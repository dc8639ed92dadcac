//! Terminal client for the Legal Insights blog and community forum.
//!
//! - [`api`] - HTTP client and wire schemas for the backend
//! - [`feed`] - Collections, filtering and the post draft
//! - [`app`] - Application state driven by the event loop
//! - [`ui`] - ratatui rendering and input handling

pub mod api;
pub mod app;
pub mod config;
pub mod feed;
pub mod keybindings;
pub mod theme;
pub mod ui;
pub mod util;
