//! Terminal user interface.
//!
//! - `loop_runner` - main event loop and terminal management
//! - `input` - keyboard input handling
//! - `events` - background task event processing
//! - `helpers` - background task spawning
//! - `render` - layout, tab bar and dialogs
//! - `articles`, `categories`, `sources`, `tags` - per-tab list widgets
//! - `status` - status bar widget

mod articles;
mod categories;
mod events;
mod helpers;
mod input;
mod loop_runner;
mod render;
mod sources;
mod status;
mod tags;

pub use loop_runner::{run, Action};
