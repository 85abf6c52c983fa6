//! UI module for the aspect manager TUI

pub mod render;
pub mod theme;
pub mod widgets;

pub use render::Overlay;
