//! # kilo-editor — Editor core for kilo
//!
//! This crate contains everything between a key event and a [`Frame`]:
//!
//! - **[`row`]** — `Row`: raw chars, tab-expanded render text, highlight tags
//! - **[`syntax`]** / **[`highlight`]** — rule table and the per-row highlighter
//! - **[`buffer`]** — `Buffer`: rows, cursor, dirty counter, multi-line comment cascade
//! - **[`search`]** — incremental search with a single-row match overlay
//! - **[`view`]** — scrolling and rendering into a `Frame`
//! - **[`editor`]** — `Editor`: key dispatch, prompts, save, status messages
//!
//! The crate never touches the terminal; `kilo-term` owns that.
//!
//! [`Frame`]: kilo_term::frame::Frame

pub mod buffer;
pub mod config;
pub mod cursor;
pub mod editor;
pub mod file;
pub mod highlight;
pub mod prompt;
pub mod row;
pub mod search;
pub mod syntax;
pub mod view;

pub use buffer::Buffer;
pub use config::EditorConfig;
pub use editor::Editor;
