//! sheetmap — points and shapes from a published spreadsheet on a terminal map.
//!
//! This crate is the binary's shell. It re-exports the member crates so that
//! integration tests can import everything from one place.
//!
//! # Architecture
//!
//! ```text
//! Source ──► table (CSV rows) ──► Loader ──► MapSession ──► TUI
//!                                                │
//!                                                └──► headless GeoJSON export
//! ```
//!
//! Loads run on tokio tasks and report over a channel; the UI drives the main
//! thread.

pub mod headless;

pub use sheetmap_core;
pub use sheetmap_feeds;
pub use sheetmap_tui;
