//! Presentation of search results
//!
//! [`terminal`] draws the view for the console, [`html`] writes a
//! standalone page.

pub mod html;
pub mod terminal;

pub use html::render_page;
pub use terminal::{render_view, ViewerPanel};
