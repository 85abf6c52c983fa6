//! TUI widgets for the aspect manager

pub mod entity_list;
pub mod fate_card;
pub mod input;
pub mod status_bar;

pub use entity_list::EntityListWidget;
pub use fate_card::FateCardWidget;
pub use input::InputWidget;
pub use status_bar::{HotkeyBarWidget, StatusBarWidget};
