//! sheetmap-core — spreadsheet-to-map core library.
//!
//! This crate holds everything that does not depend on where the sheet comes
//! from or how the map is drawn: the row types, the geometry normalizer, the
//! layers built from rows, the side panel state machine and the
//! [`MapSession`] context that ties them together.
//!
//! # Architecture
//!
//! ```text
//! Feed (CSV rows) ──► Layers ──► MapSession ──► TUI / export
//!                       ▲
//!        geometry cells ┘ (normalizer)
//! ```

pub mod config;
pub mod export;
pub mod geometry;
pub mod layer;
pub mod markup;
pub mod panel;
pub mod session;
pub mod types;

pub use session::{ClickTarget, MapSession};
pub use types::{LatLon, Row, RowError, ShapeRow};
