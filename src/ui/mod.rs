//! Terminal User Interface module.
//!
//! # Module Structure
//!
//! - `loop_runner` - Main event loop and terminal management
//! - `input` - Keyboard input handling
//! - `events` - Background task event processing
//! - `helpers` - Spawning loads and submissions
//! - `render` - Screen layout and view dispatch
//! - `feed_list` - Item list widget
//! - `filters` - Category chips and search line
//! - `composer` - New post dialog
//! - `reader` - Single item view
//! - `status` - Status bar widget
//! - `help` - Keybinding overlay

mod composer;
mod events;
mod feed_list;
mod filters;
mod help;
mod helpers;
mod input;
mod loop_runner;
pub mod reader;
mod render;
mod status;

pub use loop_runner::{run, Action};
