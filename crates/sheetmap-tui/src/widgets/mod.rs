//! Ratatui widgets for the sheetmap TUI.

pub mod command_bar;
pub mod help;
pub mod map_view;
pub mod side_panel;
pub mod status_bar;
